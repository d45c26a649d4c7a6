//! Turns the model's free-text reply into a [`CaptionSet`].
//!
//! The model is asked for a fixed layout (see [`crate::prompts`]) but nothing
//! enforces it, so parsing is total: a reply with no recognizable structure
//! yields a description built from the whole text and no captions.
//!
//! ```text
//! Description: <text>
//! Main Caption: <text>        (only read when include_main_caption is set)
//! Captions:
//! 1. <caption>
//! ...
//! 10. <caption>
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Maximum number of caption options kept from a reply.
pub const MAX_CAPTIONS: usize = 10;

const DESCRIPTION_PREFIX: &str = "description:";
const MAIN_CAPTION_PREFIX: &str = "main caption:";

fn section_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"(?i)captions:").expect("valid section marker pattern"))
}

/// Selects between the two reply layouts.
///
/// With `include_main_caption` the parser also reads a `Main Caption:` line,
/// strips single as well as double quotes, and lowercases everything after
/// the first character of each caption.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOptions {
    pub include_main_caption: bool,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_main_caption(mut self, include: bool) -> Self {
        self.include_main_caption = include;
        self
    }

    fn quote_chars(&self) -> &'static [char] {
        if self.include_main_caption {
            &['"', '\'']
        } else {
            &['"']
        }
    }
}

/// Structured result of one caption generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionSet {
    pub description: String,
    pub main_caption: Option<String>,
    pub captions: Vec<String>,
}

impl CaptionSet {
    /// Split captions into two display columns, `floor(n/2)` in the first.
    pub fn columns(&self) -> (&[String], &[String]) {
        self.captions.split_at(self.captions.len() / 2)
    }

    /// Clipboard payload for the caption at `index`, surrounding quotes removed.
    pub fn copy_text(&self, index: usize) -> Option<String> {
        self.captions
            .get(index)
            .map(|caption| strip_quotes(caption, &['"', '\'']))
    }
}

/// Parse a raw model reply. Never fails.
pub fn parse(reply: &str, options: ParserOptions) -> CaptionSet {
    let (head, body) = match section_marker().find(reply) {
        Some(m) => (&reply[..m.start()], &reply[m.end()..]),
        None => (reply, ""),
    };

    let mut description = None;
    let mut main_caption = None;
    for line in head.lines() {
        if let Some(value) = field_value(line, DESCRIPTION_PREFIX) {
            description = Some(value);
        } else if options.include_main_caption {
            if let Some(value) = field_value(line, MAIN_CAPTION_PREFIX) {
                main_caption = Some(value).filter(|v| !v.is_empty());
            }
        }
    }

    let description = description.unwrap_or_else(|| {
        head.lines()
            .filter(|line| {
                !(options.include_main_caption && has_prefix(line, MAIN_CAPTION_PREFIX))
            })
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    });

    CaptionSet {
        description,
        main_caption,
        captions: parse_captions(body, options),
    }
}

fn parse_captions(body: &str, options: ParserOptions) -> Vec<String> {
    body.lines()
        .filter_map(|line| numbered_remainder(line.trim()))
        .map(|remainder| normalize_caption(remainder, options))
        .take(MAX_CAPTIONS)
        .collect()
}

/// Text after the first `.` when the line starts with `1.` through `10.`.
fn numbered_remainder(line: &str) -> Option<&str> {
    (1..=MAX_CAPTIONS)
        .find(|i| line.starts_with(&format!("{}.", i)))
        .and_then(|_| line.split_once('.'))
        .map(|(_, remainder)| remainder.trim())
        .filter(|remainder| !remainder.is_empty())
}

fn normalize_caption(raw: &str, options: ParserOptions) -> String {
    let stripped = strip_quotes(raw, options.quote_chars());
    if options.include_main_caption {
        sentence_case_lower(&stripped)
    } else {
        sentence_case(&stripped)
    }
}

fn has_prefix(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|start| start.eq_ignore_ascii_case(prefix))
}

fn field_value(line: &str, prefix: &str) -> Option<String> {
    if !has_prefix(line, prefix) {
        return None;
    }
    line.split_once(':').map(|(_, value)| value.trim().to_string())
}

/// Remove one pair of matching quote characters wrapping `text`, then trim.
pub fn strip_quotes(text: &str, quotes: &[char]) -> String {
    let text = text.trim();
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && quotes.contains(&first) => {
            chars.as_str().trim().to_string()
        }
        _ => text.to_string(),
    }
}

/// Uppercase the first character, leave the rest untouched.
pub fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase the first character and lowercase the rest.
pub fn sentence_case_lower(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}
