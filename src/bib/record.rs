//! Minimal BibTeX reader/writer.
//!
//! Parses `.bib` entries into key/type/field records, preserving entry and
//! field order. Values are kept as raw text; nothing inside a field is
//! interpreted except the comma-separated `keywords` field, which carries
//! the category labels used for splitting.

use anyhow::{bail, Result};
use serde::Serialize;

/// One bibliography entry.
#[derive(Debug, Clone, Serialize)]
pub struct BibEntry {
    /// Citation key
    pub key: String,

    /// Entry type (article, inproceedings, ...), lowercased
    pub entry_type: String,

    /// Fields in source order; names lowercased, values verbatim
    pub fields: Vec<(String, String)>,
}

impl BibEntry {
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.into().to_lowercase(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    /// Field value by name (case-insensitive)
    pub fn field(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace a field, keeping its position if it already exists
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn remove_field(&mut self, name: &str) {
        let name = name.to_lowercase();
        self.fields.retain(|(n, _)| *n != name);
    }

    /// Category labels: the comma-separated `keywords` field
    pub fn labels(&self) -> Vec<String> {
        self.field("keywords")
            .map(|kw| {
                kw.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Render back to BibTeX source
    pub fn render(&self) -> String {
        let mut out = format!("@{}{{{},\n", self.entry_type, self.key);
        for (name, value) in &self.fields {
            out.push_str(&format!("  {} = {{{}}},\n", name, value));
        }
        out.push('}');
        out
    }
}

/// Parse a `.bib` file into entries, in source order.
///
/// `@comment`, `@preamble`, and `@string` blocks and free text between
/// entries are skipped. Field values may be braced (nesting allowed),
/// quoted, or bare.
pub fn parse(text: &str) -> Result<Vec<BibEntry>> {
    let mut entries = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut pos = 0;

    while pos < chars.len() {
        if chars[pos] != '@' {
            pos += 1;
            continue;
        }
        pos += 1;

        let entry_type = read_ident(&chars, &mut pos);
        if entry_type.is_empty() {
            bail!("missing entry type at offset {}", pos);
        }

        skip_ws(&chars, &mut pos);
        if pos >= chars.len() || chars[pos] != '{' {
            bail!("expected '{{' after @{}", entry_type);
        }

        if matches!(
            entry_type.to_lowercase().as_str(),
            "comment" | "preamble" | "string"
        ) {
            skip_balanced(&chars, &mut pos)?;
            continue;
        }
        pos += 1; // consume '{'

        skip_ws(&chars, &mut pos);
        let key = read_until(&chars, &mut pos, &[',', '}']);
        let key = key.trim().to_string();
        if key.is_empty() {
            bail!("entry @{} has no citation key", entry_type);
        }

        let mut entry = BibEntry::new(entry_type, key);

        loop {
            skip_ws(&chars, &mut pos);
            match chars.get(pos).copied() {
                None => bail!("unterminated entry '{}'", entry.key),
                Some('}') => {
                    pos += 1;
                    break;
                }
                Some(',') => {
                    pos += 1;
                    continue;
                }
                Some(_) => {}
            }

            let name = read_until(&chars, &mut pos, &['=', ',', '}']);
            if pos >= chars.len() || chars[pos] != '=' {
                bail!("malformed field in entry '{}'", entry.key);
            }
            pos += 1; // consume '='

            skip_ws(&chars, &mut pos);
            let value = read_value(&chars, &mut pos, &entry.key)?;
            entry.fields.push((name.trim().to_lowercase(), value));
        }

        entries.push(entry);
    }

    Ok(entries)
}

fn skip_ws(chars: &[char], pos: &mut usize) {
    while chars.get(*pos).is_some_and(|c| c.is_whitespace()) {
        *pos += 1;
    }
}

fn read_ident(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while chars
        .get(*pos)
        .is_some_and(|c| c.is_alphanumeric() || *c == '_')
    {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

fn read_until(chars: &[char], pos: &mut usize, stops: &[char]) -> String {
    let start = *pos;
    while chars.get(*pos).is_some_and(|c| !stops.contains(c)) {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

/// Skip a balanced `{...}` block, cursor on the opening brace
fn skip_balanced(chars: &[char], pos: &mut usize) -> Result<()> {
    let mut depth = 0usize;
    while *pos < chars.len() {
        match chars[*pos] {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    *pos += 1;
                    return Ok(());
                }
            }
            _ => {}
        }
        *pos += 1;
    }
    bail!("unbalanced braces");
}

fn read_value(chars: &[char], pos: &mut usize, key: &str) -> Result<String> {
    match chars.get(*pos).copied() {
        Some('{') => {
            let start = *pos + 1;
            let mut depth = 0usize;
            while *pos < chars.len() {
                match chars[*pos] {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            let value: String = chars[start..*pos].iter().collect();
                            *pos += 1;
                            return Ok(value);
                        }
                    }
                    _ => {}
                }
                *pos += 1;
            }
            bail!("unterminated braced value in entry '{}'", key)
        }
        Some('"') => {
            *pos += 1;
            let start = *pos;
            while chars.get(*pos).is_some_and(|c| *c != '"') {
                *pos += 1;
            }
            if *pos >= chars.len() {
                bail!("unterminated quoted value in entry '{}'", key);
            }
            let value: String = chars[start..*pos].iter().collect();
            *pos += 1;
            Ok(value)
        }
        Some(_) => Ok(read_until(chars, pos, &[',', '}', '\n']).trim().to_string()),
        None => bail!("missing value in entry '{}'", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
% exported bibliography

@comment{this block is ignored}

@Article{imami2023,
  author   = {Imami, A. S. and Others},
  title    = {A {Modular} Approach},
  journal  = {J. Example},
  year     = 2023,
  keywords = {pub:journal-article, topic:bioinformatics},
}

@inproceedings{talk2022,
  title = "Conference Talk",
  keywords = {pub:conference},
}
"#;

    #[test]
    fn test_parse_entries_in_order() {
        let entries = parse(SAMPLE).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "imami2023");
        assert_eq!(entries[0].entry_type, "article");
        assert_eq!(entries[1].key, "talk2022");
    }

    #[test]
    fn test_nested_braces_and_bare_values() {
        let entries = parse(SAMPLE).unwrap();
        assert_eq!(entries[0].field("title"), Some("A {Modular} Approach"));
        assert_eq!(entries[0].field("year"), Some("2023"));
        assert_eq!(entries[1].field("title"), Some("Conference Talk"));
    }

    #[test]
    fn test_labels_from_keywords() {
        let entries = parse(SAMPLE).unwrap();
        assert_eq!(
            entries[0].labels(),
            vec!["pub:journal-article", "topic:bioinformatics"]
        );
        assert!(BibEntry::new("misc", "x").labels().is_empty());
    }

    #[test]
    fn test_render_round_trip() {
        let entries = parse(SAMPLE).unwrap();
        let rendered = entries[0].render();
        let reparsed = parse(&rendered).unwrap();
        assert_eq!(reparsed.len(), 1);
        assert_eq!(reparsed[0].key, entries[0].key);
        assert_eq!(reparsed[0].fields, entries[0].fields);
    }

    #[test]
    fn test_unterminated_entry_fails() {
        assert!(parse("@article{broken, title = {no end}").is_err());
    }

    #[test]
    fn test_set_and_remove_field() {
        let mut entry = BibEntry::new("misc", "m1").with_field("keywords", "pub:other");
        entry.set_field("KEYWORDS", "pub:preprint");
        assert_eq!(entry.field("keywords"), Some("pub:preprint"));
        entry.remove_field("keywords");
        assert_eq!(entry.field("keywords"), None);
    }
}
