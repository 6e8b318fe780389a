//! Slide content formatting.
//!
//! Turns freeform slide text or embedded markup into a bounded bullet list
//! or a single paragraph, so decks look consistent whatever their source.
//! Every branch degrades to a best-effort rendering; nothing here fails.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Markup returned for empty or whitespace-only content.
pub const EMPTY_PLACEHOLDER: &str = r#"<p class="slide-empty">No content available</p>"#;

/// Regex detecting list or paragraph tags (but not `<pre>` and friends).
static STRUCTURE_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:li|ul|ol|p)\b").unwrap());

/// Regex matching opening or closing list and list-item tags.
static LIST_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(/?)(li|ul|ol)\b[^>]*>").unwrap());

/// Regex matching explicit line breaks (newlines or `<br>` tags).
static LINE_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\r\n|\r|\n|<br\s*/?>").unwrap());

/// Regex splitting content into candidate bullet lines.
static LINE_SPLIT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\r\n|\r|\n|<br\s*/?>|•").unwrap());

/// Regex matching one or more leading bullet markers.
static LEADING_BULLET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\s*(?:•|[·▪◦‣*\-–—](?:\s|$)))+\s*").unwrap());

/// Characters accepted as terminal punctuation on a list item.
const TERMINAL_PUNCTUATION: &[char] = &['.', '!', '?'];

/// Formatter projecting raw slide content into displayable markup.
#[derive(Debug, Clone)]
pub struct ContentFormatter {
    /// Maximum number of bullets shown on one slide.
    max_items: usize,

    /// Minimum number of units before content is rendered as a list.
    list_threshold: usize,

    /// Sentence fragments shorter than this (in chars) are discarded.
    min_sentence_chars: usize,
}

impl Default for ContentFormatter {
    fn default() -> Self {
        Self {
            max_items: 5,
            list_threshold: 3,
            min_sentence_chars: 10,
        }
    }
}

impl ContentFormatter {
    /// Create a formatter with the default density limits (5 bullets, list from 3).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of bullets per slide.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items.max(1);
        self
    }

    /// Set how many units are needed before content becomes a list.
    pub fn with_list_threshold(mut self, threshold: usize) -> Self {
        self.list_threshold = threshold.max(1);
        self
    }

    /// Set the minimum length of a sentence that counts as a unit.
    pub fn with_min_sentence_chars(mut self, chars: usize) -> Self {
        self.min_sentence_chars = chars;
        self
    }

    /// Render slide content as a bounded list or a paragraph.
    ///
    /// - Blank content yields [`EMPTY_PLACEHOLDER`].
    /// - Content with list or paragraph tags is kept as-is, except that
    ///   lists longer than the bullet limit are cut down and re-wrapped.
    /// - Content with bullet markers or line breaks becomes one bullet per
    ///   line when enough lines survive.
    /// - Anything else is split into sentences; short prose stays a paragraph.
    pub fn render_full(&self, content: &str) -> String {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return EMPTY_PLACEHOLDER.to_string();
        }

        if STRUCTURE_TAG_REGEX.is_match(content) {
            return self.render_preformatted(content);
        }

        let text: String = trimmed.nfc().collect();

        if has_line_markers(&text) {
            let items = self.line_items(&text);
            if items.len() >= self.list_threshold {
                return list_markup(&items);
            }
            log::debug!(
                "format: {} bullet line(s) below list threshold, splitting sentences",
                items.len()
            );
        }

        self.render_prose(&text)
    }

    fn render_preformatted(&self, content: &str) -> String {
        let items = list_items(content);
        if items.len() <= self.max_items {
            return content.to_string();
        }

        log::debug!(
            "format: truncating pre-formatted list from {} to {} items",
            items.len(),
            self.max_items
        );
        let kept: Vec<String> = items
            .into_iter()
            .take(self.max_items)
            .map(str::to_string)
            .collect();
        list_markup(&kept)
    }

    /// Split on line boundaries and normalize each surviving line.
    fn line_items(&self, text: &str) -> Vec<String> {
        LINE_SPLIT_REGEX
            .split(text)
            .filter_map(normalize_item)
            .take(self.max_items)
            .map(|item| escape_html(&item))
            .collect()
    }

    fn render_prose(&self, text: &str) -> String {
        let items: Vec<String> = split_sentences(text)
            .into_iter()
            .filter(|s| s.chars().count() >= self.min_sentence_chars)
            .filter_map(normalize_item)
            .take(self.max_items)
            .collect();

        if items.len() < self.list_threshold {
            return paragraph_markup(text);
        }

        let items: Vec<String> = items.iter().map(|item| escape_html(item)).collect();
        list_markup(&items)
    }
}

/// Whether text carries bullet markers or explicit line breaks.
fn has_line_markers(text: &str) -> bool {
    text.contains('•') || text.contains("- ") || LINE_BREAK_REGEX.is_match(text)
}

/// Inner markup of every top-level list item, in document order.
///
/// Nested lists stay inside their parent item. Unclosed items end at the
/// next sibling item or at the end of their list.
fn list_items(content: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut top_depth: Option<usize> = None;
    // Content start and list depth of the top-level item being read.
    let mut open: Option<(usize, usize)> = None;

    for tag in LIST_TAG_REGEX.captures_iter(content) {
        let Some(whole) = tag.get(0) else {
            continue;
        };
        let closing = !tag[1].is_empty();
        let is_item = tag[2].eq_ignore_ascii_case("li");

        // Any tag at the open item's own depth, other than a nested list
        // opening, ends that item.
        let ends_open_item = matches!(open, Some((_, d)) if d == depth) && (closing || is_item);
        if ends_open_item {
            if let Some((start, _)) = open.take() {
                items.push(content[start..whole.start()].trim());
            }
        }

        match (closing, is_item) {
            (false, true) => {
                if open.is_none() && top_depth.map_or(true, |top| depth <= top) {
                    top_depth = Some(depth);
                    open = Some((whole.end(), depth));
                }
            }
            (false, false) => depth += 1,
            (true, false) => depth = depth.saturating_sub(1),
            (true, true) => {}
        }
    }

    if let Some((start, _)) = open {
        items.push(content[start..].trim());
    }
    items
}

/// Split prose after `.`, `!` or `?` when followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !TERMINAL_PUNCTUATION.contains(&c) {
            continue;
        }
        if let Some(&(next_idx, next)) = chars.peek() {
            if next.is_whitespace() {
                sentences.push(&text[start..next_idx]);
                start = next_idx;
            }
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Strip bullet markers, trim, capitalize and punctuate one line.
///
/// Returns `None` when nothing is left.
fn normalize_item(line: &str) -> Option<String> {
    let stripped = LEADING_BULLET_REGEX.replace(line, "");
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut item = capitalize_first(trimmed);
    if !item.ends_with(TERMINAL_PUNCTUATION) {
        item.push('.');
    }
    Some(item)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn list_markup(items: &[String]) -> String {
    let body: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", item))
        .collect();
    format!(r#"<ul class="slide-list">{}</ul>"#, body)
}

/// Paragraph keeping the content's own line breaks as `<br>`.
fn paragraph_markup(text: &str) -> String {
    let body = LINE_BREAK_REGEX
        .split(text)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>");
    format!(r#"<p class="slide-paragraph">{}</p>"#, body)
}

/// Escape text for use as HTML element content.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
