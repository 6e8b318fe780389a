//! Collapsible previews for long slide content.
//!
//! A preview carries two co-located renderings of the same content, a
//! truncated one with a "show more" toggle and the full one with a "show
//! less" toggle, keyed by a shared id. Toggling flips which one is visible
//! without touching the content.

use std::sync::atomic::{AtomicU64, Ordering};

/// Fallback source of ids when the OS random source is unavailable.
static FALLBACK_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Inline style used for the hidden half of a preview.
const HIDDEN_STYLE: &str = r#" style="display: none;""#;

/// Renderer configuration for previews.
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    /// How far back (as a share of the max length) a cut may move to reach a space.
    backtrack_ratio: f64,

    /// Label of the toggle shown under the truncated text.
    more_label: String,

    /// Label of the toggle shown under the full text.
    less_label: String,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self {
            backtrack_ratio: 0.2,
            more_label: "Show more".to_string(),
            less_label: "Show less".to_string(),
        }
    }
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backtrack window, clamped to `0.0..=1.0`.
    pub fn with_backtrack_ratio(mut self, ratio: f64) -> Self {
        self.backtrack_ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Set the toggle labels.
    pub fn with_labels(mut self, more: impl Into<String>, less: impl Into<String>) -> Self {
        self.more_label = more.into();
        self.less_label = less.into();
        self
    }

    /// Build a collapsed preview of `content`.
    ///
    /// `slide_id` keys the preview; without one a random token is used so
    /// that previews on the same page never share an id.
    pub fn preview(&self, content: &str, max_length: usize, slide_id: Option<&str>) -> Preview {
        let id = match slide_id {
            Some(id) if !id.is_empty() => encode_id(id),
            _ => random_token(),
        };
        let full = escape_quotes(content);

        let short = if content.chars().count() <= max_length {
            None
        } else {
            let head = truncate_at_word(content, max_length, self.backtrack_ratio);
            Some(escape_quotes(head.trim_end()))
        };

        Preview {
            id,
            short,
            full,
            expanded: false,
            more_label: escape_quotes(&self.more_label),
            less_label: escape_quotes(&self.less_label),
        }
    }

    /// Render a collapsed preview straight to markup.
    pub fn render(&self, content: &str, max_length: usize, slide_id: Option<&str>) -> String {
        self.preview(content, max_length, slide_id).to_markup()
    }
}

/// Render a collapsed preview with the default renderer.
pub fn render_preview(content: &str, max_length: usize, slide_id: Option<&str>) -> String {
    PreviewRenderer::new().render(content, max_length, slide_id)
}

/// What a preview toggle link does, read from its `data-preview-action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    Expand,
    Collapse,
}

impl PreviewAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "expand" => Some(PreviewAction::Expand),
            "collapse" => Some(PreviewAction::Collapse),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PreviewAction::Expand => "expand",
            PreviewAction::Collapse => "collapse",
        }
    }

    /// CSS `display` values for the short and full halves after this action.
    pub fn displays(self) -> (&'static str, &'static str) {
        match self {
            PreviewAction::Expand => ("none", ""),
            PreviewAction::Collapse => ("", "none"),
        }
    }
}

/// Element id of the truncated half of the preview keyed by `id`.
pub fn short_element_id(id: &str) -> String {
    format!("preview-short-{}", id)
}

/// Element id of the full half of the preview keyed by `id`.
pub fn full_element_id(id: &str) -> String {
    format!("preview-full-{}", id)
}

/// A rendered preview and its visibility state.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    id: String,
    /// Escaped truncated text, `None` when the content fits.
    short: Option<String>,
    /// Escaped full text.
    full: String,
    expanded: bool,
    more_label: String,
    less_label: String,
}

impl Preview {
    /// The id shared by both halves of the preview.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_truncated(&self) -> bool {
        self.short.is_some()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Flip between the short and full form. No-op when nothing was truncated.
    pub fn toggle(&mut self) {
        if self.short.is_some() {
            self.expanded = !self.expanded;
        }
    }

    /// The text currently visible, without toggles.
    pub fn visible_text(&self) -> &str {
        match &self.short {
            Some(short) if !self.expanded => short,
            _ => &self.full,
        }
    }

    pub fn to_markup(&self) -> String {
        let Some(short) = &self.short else {
            return self.full.clone();
        };

        let (short_style, full_style) = if self.expanded {
            (HIDDEN_STYLE, "")
        } else {
            ("", HIDDEN_STYLE)
        };

        format!(
            concat!(
                r#"<span class="content-preview" id="{short_id}"{short_style}>{short}... "#,
                r##"<a href="#" class="preview-toggle" data-preview-id="{id}" data-preview-action="{expand}">{more}</a></span>"##,
                r#"<span class="content-full" id="{full_id}"{full_style}>{full} "#,
                r##"<a href="#" class="preview-toggle" data-preview-id="{id}" data-preview-action="{collapse}">{less}</a></span>"##,
            ),
            id = self.id,
            short_id = short_element_id(&self.id),
            short_style = short_style,
            short = short,
            expand = PreviewAction::Expand.as_str(),
            more = self.more_label,
            full_id = full_element_id(&self.id),
            full_style = full_style,
            full = self.full,
            collapse = PreviewAction::Collapse.as_str(),
            less = self.less_label,
        )
    }
}

/// Cut `content` at `max_length` chars, moving back to the last space when
/// it lies within `ratio * max_length` chars of the cut.
fn truncate_at_word(content: &str, max_length: usize, ratio: f64) -> &str {
    let cut = content
        .char_indices()
        .nth(max_length)
        .map(|(idx, _)| idx)
        .unwrap_or(content.len());
    let head = &content[..cut];

    let window = (max_length as f64 * ratio).floor() as usize;
    if let Some(space) = head.rfind(' ') {
        if head[space..].chars().count() <= window {
            return &head[..space];
        }
    }
    head
}

fn escape_quotes(text: &str) -> String {
    text.replace('"', "&quot;").replace('\'', "&#39;")
}

/// Encode a slide id into an attribute-safe token.
///
/// Alphanumerics and `-` pass through; everything else becomes `_hex_`,
/// so distinct slide ids always give distinct tokens.
fn encode_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for c in id.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
        } else {
            out.push_str(&format!("_{:x}_", c as u32));
        }
    }
    out
}

fn random_token() -> String {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => format!("r{:016x}", u64::from_le_bytes(bytes)),
        Err(e) => {
            log::warn!("preview: random source unavailable ({}), using counter id", e);
            let n = FALLBACK_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("c{:016x}", n)
        }
    }
}
