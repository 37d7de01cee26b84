//! Cover letter template generation.
//!
//! Produces a moderncv letter skeleton alongside a CV build. The personal
//! preamble (\name, contact lines) comes from a user-maintained file so
//! the generated letter matches the CV documents without any identity
//! baked into the tool.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::fs;
use tracing::info;

/// Placeholder-based letter skeleton; LaTeX is brace-heavy, so plain
/// token substitution beats format strings here.
const LETTER_TEMPLATE: &str = r"\documentclass[10pt,letterpaper,sans]{moderncv}
\moderncvstyle{classic}
\moderncvcolor{cerulean}
\usepackage[hmargin=0.75in,vmargin=0.75in]{geometry}
\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}

% Personal information (shared with the CV documents)
@PREAMBLE@

% Cover letter recipient information
\recipient{@RECIPIENT@}{@ORGANIZATION@\\@LOCATION@}
\date{\today}
\opening{@OPENING@}
\closing{@CLOSING@}

\begin{document}

\makelettertitle

@BODY@

\makeletterclosing

\end{document}
";

const DEFAULT_BODY: &str = r"I am writing to express my interest in contributing to your organization's mission. My background and experience are summarized in the attached CV; I would welcome the opportunity to discuss how they can benefit your team.

Thank you for your consideration. I look forward to hearing from you.";

/// Everything that varies between cover letters.
#[derive(Debug, Clone)]
pub struct LetterSpec {
    pub recipient: String,
    pub organization: String,
    pub location: String,
    pub opening: String,
    pub closing: String,
    pub body: String,
}

impl LetterSpec {
    pub fn new(organization: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            recipient: "Hiring Manager".to_string(),
            organization: organization.into(),
            location: location.into(),
            opening: "Dear Hiring Manager,".to_string(),
            closing: "Sincerely,".to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }
}

/// Render the letter source for a spec and preamble
pub fn render_letter(preamble: &str, spec: &LetterSpec) -> String {
    LETTER_TEMPLATE
        .replace("@PREAMBLE@", preamble.trim())
        .replace("@RECIPIENT@", &spec.recipient)
        .replace("@ORGANIZATION@", &spec.organization)
        .replace("@LOCATION@", &spec.location)
        .replace("@OPENING@", &spec.opening)
        .replace("@CLOSING@", &spec.closing)
        .replace("@BODY@", spec.body.trim())
}

/// Write `cover_letter.tex` into an existing directory.
///
/// The directory must already exist — a letter belongs next to a CV
/// build, so a missing directory signals a typo rather than intent.
pub async fn create_cover_letter(
    dir: &Path,
    preamble_path: &Path,
    spec: &LetterSpec,
) -> Result<PathBuf> {
    if !dir.is_dir() {
        bail!("Directory {} does not exist", dir.display());
    }

    let preamble = fs::read_to_string(preamble_path).await.with_context(|| {
        format!(
            "Failed to read letter preamble: {}",
            preamble_path.display()
        )
    })?;

    let letter_path = dir.join("cover_letter.tex");
    fs::write(&letter_path, render_letter(&preamble, spec))
        .await
        .with_context(|| format!("Failed to write cover letter: {}", letter_path.display()))?;

    info!(path = %letter_path.display(), "cover letter created");
    Ok(letter_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_all_placeholders() {
        let spec = LetterSpec::new("Example Lab", "Toledo, OH");
        let letter = render_letter("\\name{Jane}{Doe}", &spec);

        assert!(letter.contains("\\name{Jane}{Doe}"));
        assert!(letter.contains("\\recipient{Hiring Manager}{Example Lab\\\\Toledo, OH}"));
        assert!(letter.contains("\\opening{Dear Hiring Manager,}"));
        assert!(!letter.contains('@'));
    }

    #[tokio::test]
    async fn test_create_cover_letter_writes_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let preamble = temp.path().join("letter_preamble.tex");
        std::fs::write(&preamble, "\\name{Jane}{Doe}\n").unwrap();

        let spec = LetterSpec::new("Example Lab", "Toledo, OH");
        let path = create_cover_letter(temp.path(), &preamble, &spec)
            .await
            .unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("\\documentclass"));
        assert!(text.contains("\\name{Jane}{Doe}"));
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let preamble = temp.path().join("letter_preamble.tex");
        std::fs::write(&preamble, "\\name{Jane}{Doe}\n").unwrap();

        let spec = LetterSpec::new("Example Lab", "Toledo, OH");
        let missing = temp.path().join("no_such_dir");
        assert!(create_cover_letter(&missing, &preamble, &spec).await.is_err());
    }
}
