use crate::error::DocumentError;
use crate::units::Pt;

/// A single wrapped line of text along with the width it was measured at
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub measured_width: Pt,
}

/// Greedily word-wraps `text` so that no line is wider than `max_width`.
///
/// Hard line breaks (`\n`, `\r\n` or `\r`) always start a new line, and each
/// paragraph between them is wrapped on its own; an empty paragraph produces an
/// empty line. Within a paragraph, whitespace-delimited words are joined with
/// single spaces for as long as the measured candidate line still fits. A word
/// that is wider than `max_width` on its own is placed alone on its line rather
/// than being split.
///
/// Because words are re-joined with single spaces and measured the same way every
/// time, re-wrapping the space-joined output of a paragraph at the same width
/// reproduces the same lines.
pub fn wrap<F>(text: &str, max_width: Pt, mut width_of: F) -> Result<Vec<Line>, DocumentError>
where
    F: FnMut(&str) -> Result<Pt, DocumentError>,
{
    // normalize newlines
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = text.trim_end_matches('\n');

    let mut lines: Vec<Line> = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = Pt(0.0);

        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                current_width = width_of(&current)?;
                continue;
            }

            let candidate = format!("{current} {word}");
            let candidate_width = width_of(&candidate)?;
            if candidate_width <= max_width {
                current = candidate;
                current_width = candidate_width;
            } else {
                lines.push(Line {
                    text: std::mem::take(&mut current),
                    measured_width: current_width,
                });
                current.push_str(word);
                current_width = width_of(&current)?;
            }
        }

        lines.push(Line {
            text: current,
            measured_width: current_width,
        });
    }

    Ok(lines)
}
