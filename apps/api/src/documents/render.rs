//! Scorecard → PDF.
//!
//! `TypstRenderer` writes the scorecard as Typst markup into a temporary
//! directory and shells out to `typst compile`. All user-supplied text is
//! emitted as Typst string literals, never as raw markup.

use std::fmt::Write as _;
use std::io::ErrorKind;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, error};

use crate::documents::scorecard::{
    KeywordRow, Scorecard, ScoreBand, REPORT_TYPE, SUBTITLE, TITLE,
};
use crate::errors::AppError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Typst binary `{0}` not found")]
    BinaryNotFound(String),

    #[error("Typst compilation failed: {0}")]
    Compile(String),
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Render(e.to_string())
    }
}

#[async_trait]
pub trait ScorecardRenderer: Send + Sync {
    async fn render(&self, scorecard: &Scorecard) -> Result<Vec<u8>, RenderError>;
}

pub struct TypstRenderer {
    bin: String,
}

impl TypstRenderer {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl ScorecardRenderer for TypstRenderer {
    async fn render(&self, scorecard: &Scorecard) -> Result<Vec<u8>, RenderError> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("scorecard.typ");
        let output = dir.path().join("scorecard.pdf");

        tokio::fs::write(&input, scorecard_markup(scorecard)).await?;

        let result = Command::new(&self.bin)
            .arg("compile")
            .arg(&input)
            .arg(&output)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RenderError::BinaryNotFound(self.bin.clone()),
                _ => RenderError::Io(e),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            error!("typst compile failed for report {}: {stderr}", scorecard.report_id);
            return Err(RenderError::Compile(stderr));
        }

        let pdf = tokio::fs::read(&output).await?;
        debug!("Rendered scorecard {} ({} bytes)", scorecard.report_id, pdf.len());
        Ok(pdf)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Markup
// ────────────────────────────────────────────────────────────────────────────

const PREAMBLE: &str = r##"#set page(paper: "us-letter", margin: 0.75in)
#set text(size: 11pt, fill: rgb("#374151"))
#let section(title) = block(above: 20pt, below: 12pt, text(size: 16pt, weight: "bold", fill: rgb("#2563eb"), title))
#let scorebox(colour, score, body) = table(
  columns: (1.5in, 4.5in),
  inset: 12pt,
  align: horizon,
  stroke: rgb("#e5e7eb"),
  fill: (x, y) => if x == 0 { rgb(colour) } else { rgb("#f9fafb") },
  align(center, text(size: 36pt, weight: "bold", fill: white, score)),
  body,
)
"##;

/// Typst string literal with `\`, `"` and line breaks escaped.
fn lit(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' | '\r' | '\t' => out.push(' '),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn score_box(out: &mut String, band: ScoreBand, score: u8, heading: &str, body: &str) {
    let _ = writeln!(
        out,
        "#scorebox({}, {}, [#text(weight: \"bold\", {}) \\ #text({})])",
        lit(band.colour()),
        lit(&format!("{score}%")),
        lit(heading),
        lit(body),
    );
}

fn numbered(out: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(out, "+ #text({})", lit(item));
    }
}

fn bulleted(out: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(out, "- #text({})", lit(item));
    }
}

fn keyword_table(out: &mut String, rows: &[KeywordRow]) {
    out.push_str(
        "#table(\n  columns: (1.5in, 1in, 3.5in),\n  inset: 8pt,\n  stroke: 0.5pt + rgb(\"#e5e7eb\"),\n  \
         fill: (x, y) => if y == 0 { rgb(\"#2563eb\") } else if calc.odd(y) { white } else { rgb(\"#f9fafb\") },\n  \
         text(fill: white, weight: \"bold\", \"Skill\"),\n  \
         text(fill: white, weight: \"bold\", \"Importance\"),\n  \
         text(fill: white, weight: \"bold\", \"Why It Matters\"),\n",
    );
    for row in rows {
        let _ = writeln!(
            out,
            "  text({}), text({}), text({}),",
            lit(&row.keyword),
            lit(&row.importance),
            lit(&row.why_matters),
        );
    }
    out.push_str(")\n");
}

/// Full Typst source for one scorecard.
pub fn scorecard_markup(card: &Scorecard) -> String {
    let mut out = String::from(PREAMBLE);

    let _ = writeln!(
        out,
        "#align(center, text(size: 24pt, weight: \"bold\", fill: rgb(\"#1f2937\"), {}))",
        lit(TITLE)
    );
    let _ = writeln!(out, "#align(center, text(size: 16pt, {}))", lit(SUBTITLE));
    let _ = writeln!(
        out,
        "#table(columns: (2in, 4in), stroke: none, inset: 4pt,\n  \
         text(fill: rgb(\"#6b7280\"), \"Candidate:\"), text({}),\n  \
         text(fill: rgb(\"#6b7280\"), \"Date:\"), text({}),\n  \
         text(fill: rgb(\"#6b7280\"), \"Report Type:\"), text({}),\n  \
         text(fill: rgb(\"#6b7280\"), \"Report ID:\"), text({}),\n)",
        lit(&card.candidate_name),
        lit(&card.date_label()),
        lit(REPORT_TYPE),
        lit(&card.report_id.to_string()),
    );

    let resume = &card.resume;
    out.push_str("#section(\"Resume Analysis\")\n");
    score_box(
        &mut out,
        resume.band,
        resume.score,
        resume.band.label(),
        &resume.assessment,
    );

    if !resume.key_issues.is_empty() {
        out.push_str("#section(\"Key Issues\")\n");
        numbered(&mut out, &resume.key_issues);
    }
    if !resume.missing_keywords.is_empty() {
        out.push_str("#section(\"Missing Critical Skills\")\n");
        keyword_table(&mut out, &resume.missing_keywords);
    }
    if !resume.actions.is_empty() {
        out.push_str("#section(\"Recommended Actions\")\n");
        numbered(&mut out, &resume.actions);
    }

    if let Some(interview) = &card.interview {
        out.push_str("#pagebreak()\n#section(\"Interview Performance\")\n");
        score_box(
            &mut out,
            interview.band,
            interview.score,
            &format!("Performance Level: {}", interview.performance_level),
            "Mock interview completed with detailed feedback",
        );
        if !interview.strengths.is_empty() {
            out.push_str("#section(\"Strengths Demonstrated\")\n");
            bulleted(&mut out, &interview.strengths);
        }
        if !interview.improvements.is_empty() {
            out.push_str("#section(\"Areas for Improvement\")\n");
            bulleted(&mut out, &interview.improvements);
        }
        if !interview.next_steps.is_empty() {
            out.push_str("#section(\"Next Steps\")\n");
            numbered(&mut out, &interview.next_steps);
        }
    }

    let _ = writeln!(out, "#v(0.3in)\n#emph(text({}))", lit(&card.footer()));
    out
}
