//! The document spec: what a generated document should contain, before any
//! layout has happened.
//!
//! Specs arrive as JSON objects shaped like
//!
//! ```json
//! {
//!   "title": "Acme Holdings",
//!   "subtitle": "Investor overview",
//!   "footerLinkText": "acme.example",
//!   "footerLinkUrl": "https://acme.example",
//!   "sections": [
//!     {
//!       "heading": "Overview",
//!       "blocks": [
//!         { "type": "paragraph", "text": "..." },
//!         { "type": "bulletList", "items": ["...", "..."] },
//!         { "type": "labeledField", "label": "Email", "value": "ir@acme.example", "style": "contact" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Unknown fields are ignored and missing optional fields take defaults, but a
//! section without a heading or a block without its required fields is
//! rejected with [`DocumentError::InputValidation`] before rendering starts.

use crate::error::DocumentError;
use serde::Deserialize;
use serde_json::Value;

/// How a labeled field's label and value are set relative to each other
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleHint {
    /// Bold label over a regular value
    #[default]
    Standard,
    /// Bold label over a smaller, accent-coloured value
    Contact,
    /// Small muted label over a large, bold, primary-coloured value
    Highlight,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    /// May contain hard line breaks
    Paragraph(String),
    BulletList(Vec<String>),
    LabeledField {
        label: String,
        value: String,
        style: StyleHint,
    },
}

impl Block {
    fn content_chars(&self) -> usize {
        match self {
            Block::Heading(text) | Block::Paragraph(text) => text.chars().count(),
            Block::BulletList(items) => items.iter().map(|i| i.chars().count()).sum(),
            Block::LabeledField { label, value, .. } => {
                label.chars().count() + value.chars().count()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub blocks: Vec<Block>,
}

/// A validated document spec
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<Section>,
    /// Shown at the foot of the cover page
    pub footer_link_text: String,
    pub footer_link_url: Option<String>,
    /// Shown at the foot of every content page
    pub footer_text: Option<String>,
    pub author: Option<String>,
    /// Suggested download name; derived from the title when absent
    pub filename: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    sections: Vec<Value>,
    #[serde(default)]
    footer_link_text: Option<String>,
    #[serde(default)]
    footer_link_url: Option<String>,
    #[serde(default)]
    footer_text: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    filename: Option<String>,
}

#[derive(Deserialize)]
struct RawSection {
    heading: Option<String>,
    #[serde(default)]
    blocks: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum RawBlock {
    Heading {
        text: Option<String>,
    },
    Paragraph {
        text: Option<String>,
    },
    BulletList {
        items: Option<Vec<String>>,
    },
    LabeledField {
        label: Option<String>,
        value: Option<String>,
        #[serde(default)]
        style: StyleHint,
    },
}

fn invalid(msg: String) -> DocumentError {
    DocumentError::InputValidation(msg)
}

/// A required string field: present and not blank
fn required(field: Option<String>, what: impl FnOnce() -> String) -> Result<String, DocumentError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(invalid(format!("{} is missing", what()))),
    }
}

impl Document {
    pub fn from_json(json: &str) -> Result<Document, DocumentError> {
        let value: Value = serde_json::from_str(json)?;
        Document::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Document, DocumentError> {
        if !value.is_object() {
            return Err(invalid("document spec must be a JSON object".to_string()));
        }
        let raw: RawDocument = serde_json::from_value(value)
            .map_err(|e| invalid(format!("document spec: {e}")))?;

        let title = required(raw.title, || "document title".to_string())?;
        let sections = raw
            .sections
            .into_iter()
            .enumerate()
            .map(|(i, section)| parse_section(i + 1, section))
            .collect::<Result<Vec<Section>, DocumentError>>()?;

        Ok(Document {
            title,
            subtitle: raw.subtitle.unwrap_or_default(),
            sections,
            footer_link_text: raw.footer_link_text.unwrap_or_default(),
            footer_link_url: raw.footer_link_url.filter(|url| !url.trim().is_empty()),
            footer_text: raw.footer_text,
            author: raw.author,
            filename: raw.filename,
        })
    }

    /// Characters of text across every field that ends up on a page
    pub fn content_chars(&self) -> usize {
        let sections: usize = self
            .sections
            .iter()
            .map(|s| s.heading.chars().count() + s.blocks.iter().map(Block::content_chars).sum::<usize>())
            .sum();
        sections
            + self.title.chars().count()
            + self.subtitle.chars().count()
            + self.footer_link_text.chars().count()
            + self.footer_text.as_ref().map_or(0, |t| t.chars().count())
    }

    /// Download name for the generated file: the explicit `filename` if it has
    /// anything usable in it, otherwise the slugified title, always ending in `.pdf`
    pub fn filename(&self) -> String {
        let explicit = self.filename.as_deref().map(clean_filename).unwrap_or_default();
        let stem = if explicit.is_empty() {
            slugify(&self.title)
        } else {
            explicit
        };
        if stem.is_empty() {
            return "document.pdf".to_string();
        }
        if stem.to_ascii_lowercase().ends_with(".pdf") {
            stem
        } else {
            format!("{stem}.pdf")
        }
    }
}

fn parse_section(index: usize, value: Value) -> Result<Section, DocumentError> {
    let raw: RawSection =
        serde_json::from_value(value).map_err(|e| invalid(format!("section {index}: {e}")))?;
    let heading = required(raw.heading, || format!("heading of section {index}"))?;
    let blocks = raw
        .blocks
        .into_iter()
        .enumerate()
        .map(|(b, block)| parse_block(index, b + 1, block))
        .collect::<Result<Vec<Block>, DocumentError>>()?;
    Ok(Section { heading, blocks })
}

fn parse_block(section: usize, index: usize, value: Value) -> Result<Block, DocumentError> {
    let location = || format!("block {index} of section {section}");
    let raw: RawBlock = serde_json::from_value(value)
        .map_err(|e| invalid(format!("{}: {e}", location())))?;

    let block = match raw {
        RawBlock::Heading { text } => {
            Block::Heading(required(text, || format!("text of {}", location()))?)
        }
        RawBlock::Paragraph { text } => Block::Paragraph(
            text.ok_or_else(|| invalid(format!("text of {} is missing", location())))?,
        ),
        RawBlock::BulletList { items } => Block::BulletList(
            items.ok_or_else(|| invalid(format!("items of {} are missing", location())))?,
        ),
        RawBlock::LabeledField {
            label,
            value,
            style,
        } => Block::LabeledField {
            label: required(label, || format!("label of {}", location()))?,
            value: value.ok_or_else(|| invalid(format!("value of {} is missing", location())))?,
            style,
        },
    };
    Ok(block)
}

/// Lowercase ASCII alphanumerics, with every other run of characters collapsed
/// to a single `-`
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Strip anything that can't appear in a `Content-Disposition` filename or
/// would act as a path
fn clean_filename(name: &str) -> String {
    let name = name.rsplit(['/', '\\']).next().unwrap_or_default();
    name.chars()
        .filter(|ch| ch.is_ascii_graphic() || *ch == ' ')
        .filter(|ch| !matches!(ch, '"' | ';'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r#"{
        "title": "Acme Holdings",
        "subtitle": "Investor overview",
        "footerLinkText": "acme.example",
        "footerLinkUrl": "https://acme.example",
        "unknownField": 42,
        "sections": [
            {
                "heading": "Overview",
                "blocks": [
                    { "type": "paragraph", "text": "First line\nSecond line" },
                    { "type": "heading", "text": "Markets" },
                    { "type": "bulletList", "items": ["one", "two"] },
                    { "type": "labeledField", "label": "Email", "value": "ir@acme.example", "style": "contact" },
                    { "type": "labeledField", "label": "Raised", "value": "$4M" }
                ]
            },
            { "heading": "Empty" }
        ]
    }"#;

    #[test]
    fn parses_every_block_type() {
        let doc = Document::from_json(SPEC).unwrap();
        assert_eq!(doc.title, "Acme Holdings");
        assert_eq!(doc.footer_link_url.as_deref(), Some("https://acme.example"));
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(
            doc.sections[0].blocks,
            vec![
                Block::Paragraph("First line\nSecond line".to_string()),
                Block::Heading("Markets".to_string()),
                Block::BulletList(vec!["one".to_string(), "two".to_string()]),
                Block::LabeledField {
                    label: "Email".to_string(),
                    value: "ir@acme.example".to_string(),
                    style: StyleHint::Contact,
                },
                Block::LabeledField {
                    label: "Raised".to_string(),
                    value: "$4M".to_string(),
                    style: StyleHint::Standard,
                },
            ]
        );
        assert!(doc.sections[1].blocks.is_empty());
    }

    #[test]
    fn optional_fields_default() {
        let doc = Document::from_json(r#"{ "title": "Bare" }"#).unwrap();
        assert_eq!(doc.subtitle, "");
        assert_eq!(doc.footer_link_text, "");
        assert!(doc.sections.is_empty());
        assert_eq!(doc.footer_link_url, None);
    }

    #[test]
    fn section_without_heading_is_rejected() {
        let err = Document::from_json(
            r#"{ "title": "T", "sections": [ { "heading": "Fine" }, { "blocks": [] } ] }"#,
        )
        .unwrap_err();
        match err {
            DocumentError::InputValidation(msg) => assert!(msg.contains("section 2"), "{msg}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn malformed_blocks_are_rejected() {
        let cases = [
            r#"{ "type": "paragraph" }"#,
            r#"{ "type": "bulletList", "items": "not a list" }"#,
            r#"{ "type": "labeledField", "value": "no label" }"#,
            r#"{ "type": "image", "src": "logo.png" }"#,
            r#"{ "text": "untyped" }"#,
        ];
        for block in cases {
            let json = format!(
                r#"{{ "title": "T", "sections": [ {{ "heading": "H", "blocks": [ {block} ] }} ] }}"#
            );
            let err = Document::from_json(&json).unwrap_err();
            assert_eq!(err.kind(), "InputValidationError", "{block}");
        }
    }

    #[test]
    fn non_objects_and_missing_titles_are_rejected() {
        assert_eq!(
            Document::from_json("[1, 2]").unwrap_err().kind(),
            "InputValidationError"
        );
        assert_eq!(
            Document::from_json("{ \"title\": \"  \" }").unwrap_err().kind(),
            "InputValidationError"
        );
        assert_eq!(Document::from_json("{").unwrap_err().kind(), "InputValidationError");
    }

    #[test]
    fn filenames_derive_from_titles() {
        let mut doc = Document {
            title: "Acme Holdings \u{2014} Q3 Investor Deck!".to_string(),
            ..Document::default()
        };
        assert_eq!(doc.filename(), "acme-holdings-q3-investor-deck.pdf");

        doc.filename = Some("../../etc/Deck \"final\".PDF".to_string());
        assert_eq!(doc.filename(), "Deck final.PDF");

        doc.filename = Some("report".to_string());
        assert_eq!(doc.filename(), "report.pdf");

        doc.filename = Some("\u{6F22}".to_string());
        doc.title = "\u{6F22}\u{5B57}".to_string();
        assert_eq!(doc.filename(), "document.pdf");
    }

    #[test]
    fn counts_content_characters() {
        let doc = Document::from_json(SPEC).unwrap();
        let expected = "Acme Holdings".len()
            + "Investor overview".len()
            + "acme.example".len()
            + "Overview".len()
            + "First line\nSecond line".len()
            + "Markets".len()
            + "onetwo".len()
            + "Emailir@acme.example".len()
            + "Raised$4M".len()
            + "Empty".len();
        assert_eq!(doc.content_chars(), expected);
    }
}
