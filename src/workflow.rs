//! GitHub Actions workflow commands and step outputs.

use std::{fs::OpenOptions, io::Write, path::Path};

use crate::{assign::Outcome, error::Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Notice,
    Warning,
    Error,
}

impl AnnotationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationLevel::Notice => "notice",
            AnnotationLevel::Warning => "warning",
            AnnotationLevel::Error => "error",
        }
    }
}

fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Renders a `::level::message` workflow command.
pub fn format_annotation(level: AnnotationLevel, message: &str) -> String {
    format!("::{}::{}", level.as_str(), escape_data(message))
}

/// Step outputs describing an outcome.
pub fn outcome_outputs(outcome: &Outcome) -> Vec<(&'static str, String)> {
    vec![
        ("requested-reviewers", outcome.requested_logins().join(",")),
        ("shortfall", outcome.shortfall().to_string()),
    ]
}

/// Appends `name=value` lines to the `$GITHUB_OUTPUT` file.
pub fn write_outputs(path: &Path, outputs: &[(&str, String)]) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (name, value) in outputs {
        writeln!(file, "{name}={value}")?;
    }
    Ok(())
}
