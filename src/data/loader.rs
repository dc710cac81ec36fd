// ============================================================
// Layer 4 — Template Corpus Loader
// ============================================================
// Loads the flat `label|text` corpus file into TemplatePairs.
//
// File format (UTF-8, one record per line):
//
//   # greetings
//   greeting|Hello [name]!
//   greeting | Hi [name], good to see you
//
//   farewell|Bye [name]
//
// Parsing rules, applied per line:
//   1. Blank lines are skipped
//   2. Lines whose first non-whitespace char is `#` are comments
//   3. Every other line MUST contain `|`
//   4. Split on the FIRST `|` only — the text may contain more
//   5. Trim whitespace from both halves
//
// A line without a separator fails the whole load, so a broken
// corpus never reaches the trainer.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (Reading a File)

use anyhow::{bail, Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::template_pair::TemplatePair;
use crate::domain::traits::TemplateSource;

/// Loads TemplatePairs from a corpus file on disk.
/// Implements the TemplateSource trait from Layer 3.
pub struct TemplateLoader {
    /// Path to the corpus text file
    path: PathBuf,
}

impl TemplateLoader {
    /// Create a new TemplateLoader pointed at a corpus file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TemplateSource for TemplateLoader {
    fn load_all(&self) -> Result<Vec<TemplatePair>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read corpus '{}'", self.path.display()))?;

        let pairs = parse_templates(&text)
            .with_context(|| format!("Malformed corpus '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} template pairs from '{}'",
            pairs.len(),
            self.path.display()
        );
        Ok(pairs)
    }
}

/// Parse corpus text into pairs, preserving order and duplicates.
///
/// Errors name the 1-based line number of the first record
/// that lacks a `|` separator.
pub fn parse_templates(text: &str) -> Result<Vec<TemplatePair>> {
    let mut pairs = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();

        // Blank lines and comments carry no record
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // split_once splits on the FIRST occurrence only
        let Some((label, body)) = line.split_once('|') else {
            bail!("line {}: missing '|' separator in {:?}", idx + 1, line);
        };

        pairs.push(TemplatePair::new(label.trim(), body.trim()));
    }

    Ok(pairs)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parses_and_trims() {
        let pairs = parse_templates("greeting | Hello [name] \nfarewell|Bye [name]").unwrap();
        assert_eq!(pairs, vec![
            TemplatePair::new("greeting", "Hello [name]"),
            TemplatePair::new("farewell", "Bye [name]"),
        ]);
    }

    #[test]
    fn test_splits_on_first_separator_only() {
        let pairs = parse_templates("menu|soup | salad | bread").unwrap();
        assert_eq!(pairs[0].label, "menu");
        assert_eq!(pairs[0].text, "soup | salad | bread");
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let pairs = parse_templates("  # comment  \n\n   \ngreeting|Hi").unwrap();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_comment_only_corpus_is_empty() {
        let pairs = parse_templates("  # comment  \n\n").unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let pairs = parse_templates("a|x\na|x").unwrap();
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_missing_separator_is_an_error() {
        let err = parse_templates("greeting|Hi\n\nno separator here").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 3"), "unexpected error: {msg}");
        assert!(msg.contains("separator"));
    }

    #[test]
    fn test_loader_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# corpus").unwrap();
        writeln!(file, "greeting|Hello [name]").unwrap();
        writeln!(file, "farewell|Bye [name]").unwrap();

        let pairs = TemplateLoader::new(file.path()).load_all().unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], TemplatePair::new("farewell", "Bye [name]"));
    }

    #[test]
    fn test_loader_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = TemplateLoader::new(dir.path().join("nope.txt")).load_all();
        assert!(res.is_err());
    }
}
