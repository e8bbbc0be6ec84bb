// interpret.rs
// Pulls the leading emotion tag out of a model reply. A tiny deterministic
// parser rather than a regex: match the first `[...]` substring at any
// position, lowercase what's inside, remove exactly that substring.

use crate::expression::Emotion;

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedReply {
    pub emotion: Emotion,
    pub text: String,
}

/// Untagged replies (or replies whose bracket never closes) come back
/// neutral with the text untouched. Unknown labels also map to neutral —
/// the expression vocabulary is closed — but their tag is still stripped.
pub fn parse_reply(raw: &str) -> ParsedReply {
    let tag = raw.find('[').and_then(|open| {
        let close = open + raw[open..].find(']')?;
        Some((open, close))
    });
    let Some((open, close)) = tag else {
        return ParsedReply { emotion: Emotion::Neutral, text: raw.to_string() };
    };

    let label = raw[open + 1..close].to_lowercase();
    let emotion = Emotion::from_label(&label).unwrap_or(Emotion::Neutral);

    let mut text = String::with_capacity(raw.len());
    text.push_str(&raw[..open]);
    text.push_str(&raw[close + 1..]);
    ParsedReply { emotion, text: text.trim().to_string() }
}
