//! Placeholder substitution.
//!
//! Substitution is a single left-to-right pass over the template body. Values are
//! copied verbatim and never scanned again, so braces typed by the user stay inert.

use lazy_static::lazy_static;
use regex::Regex;

use super::fields::FieldSet;
use super::templates::AssignmentType;
use super::LetterError;

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid");
}

/// Rendered letter text for one assignment type and field set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letter {
    assignment_type: AssignmentType,
    client_name: String,
    text: String,
}

impl Letter {
    pub fn assignment_type(&self) -> AssignmentType {
        self.assignment_type
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Paragraphs, split on blank lines.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.text.split("\n\n")
    }
}

/// Placeholder names in `body`, in order of first appearance.
pub fn referenced_placeholders(body: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(body) {
        if let Some(name) = caps.get(1).map(|m| m.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Fill `body` from `fields`, failing on the first placeholder without a value.
pub fn render_body(body: &str, fields: &FieldSet) -> Result<String, LetterError> {
    let mut out = String::with_capacity(body.len() + 256);
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(body) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = fields
            .get(name.as_str())
            .ok_or_else(|| LetterError::MissingField(name.as_str().to_string()))?;
        out.push_str(&body[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }

    out.push_str(&body[last..]);
    Ok(out)
}

/// Render the letter for `assignment_type`.
pub fn render(assignment_type: AssignmentType, fields: &FieldSet) -> Result<Letter, LetterError> {
    let text = render_body(assignment_type.body(), fields)?;
    let client_name = fields
        .get(super::templates::Placeholder::ClientName.key())
        .unwrap_or_default()
        .to_string();

    Ok(Letter {
        assignment_type,
        client_name,
        text: text.trim_end().to_string(),
    })
}
