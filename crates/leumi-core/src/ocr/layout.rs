//! Layout analysis results and their plain-text rendering.

use serde::Deserialize;

const KEY_VALUE_HEADER: &str = "*Key-Value Pairs:*";
const PAGES_HEADER: &str = "*Pages:*";
const PARAGRAPHS_HEADER: &str = "*Paragraphs not in pages:*";

/// The `analyzeResult` object of a finished layout analysis.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeResult {
    pub content: String,
    pub pages: Vec<DocumentPage>,
    pub paragraphs: Vec<DocumentParagraph>,
    pub key_value_pairs: Vec<KeyValuePair>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentPage {
    pub page_number: u32,
    pub lines: Vec<DocumentLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentLine {
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentParagraph {
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeyValuePair {
    pub key: Option<TextSpan>,
    pub value: Option<TextSpan>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextSpan {
    pub content: String,
}

impl AnalyzeResult {
    /// Render the result as the text handed to field extraction.
    ///
    /// Three sections: detected key/value pairs as `key : value`, every page
    /// line in reading order, then paragraphs whose text matches no page line.
    /// A blank result renders as an empty string, without section headers.
    pub fn to_text(&self) -> String {
        if self.is_blank() {
            return String::new();
        }

        let page_lines: Vec<&str> = self
            .pages
            .iter()
            .flat_map(|p| p.lines.iter().map(|l| l.content.as_str()))
            .collect();

        let mut out: Vec<String> = vec![KEY_VALUE_HEADER.to_string()];

        for kv in &self.key_value_pairs {
            let key = kv.key.as_ref().map(|k| k.content.trim()).unwrap_or_default();
            let value = kv.value.as_ref().map(|v| v.content.trim()).unwrap_or_default();
            if !key.is_empty() || !value.is_empty() {
                out.push(format!("{} : {}", key, value));
            }
        }

        out.push(PAGES_HEADER.to_string());
        out.extend(page_lines.iter().map(|l| l.to_string()));

        out.push(PARAGRAPHS_HEADER.to_string());
        out.extend(
            self.paragraphs
                .iter()
                .filter(|p| !page_lines.contains(&p.content.as_str()))
                .map(|p| p.content.clone()),
        );

        out.join("\n")
    }

    /// True when the analysis recognized no text at all.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
            && self.paragraphs.iter().all(|p| p.content.trim().is_empty())
            && self
                .pages
                .iter()
                .all(|p| p.lines.iter().all(|l| l.content.trim().is_empty()))
            && self.key_value_pairs.iter().all(|kv| {
                kv.key.iter().chain(kv.value.iter()).all(|s| s.content.trim().is_empty())
            })
    }
}
