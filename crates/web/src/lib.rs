//! WASM bindings for slide formatting and slideshow navigation.
//!
//! This crate exposes the formatter, previews, and a `Slideshow` class to
//! browser JavaScript. The page supplies a host object whose functions act
//! as the slideshow's mount points and key-listener slot.
//!
//! Preview markup carries `preview-toggle` links with `data-preview-id` and
//! `data-preview-action` attributes. Pages wire them with one delegated
//! click handler:
//!
//! ```js
//! document.addEventListener("click", (event) => {
//!   const link = event.target.closest(".preview-toggle");
//!   if (link && togglePreview(link.dataset.previewId, link.dataset.previewAction)) {
//!     event.preventDefault();
//!   }
//! });
//! ```

mod host;

use deck_core::preview::{full_element_id, short_element_id};
use deck_core::{
    render_preview as core_render_preview, ContentFormatter, Key, PreviewAction, SlideDeck,
    SlideshowController,
};
use wasm_bindgen::prelude::*;

use host::{JsKeyboard, JsViewPort};

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Fails only when a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Warn);
}

/// Render slide content as a bounded list or a paragraph.
#[wasm_bindgen(js_name = renderFull)]
pub fn render_full(content: &str) -> String {
    ContentFormatter::new().render_full(content)
}

/// Render a collapsible preview of `content`.
///
/// # Arguments
/// * `content` - Raw slide content
/// * `max_length` - Characters shown before the "show more" toggle
/// * `slide_id` - Stable id keying the preview; a random one is used when absent
#[wasm_bindgen(js_name = renderPreview)]
pub fn render_preview(content: &str, max_length: usize, slide_id: Option<String>) -> String {
    let slide_id = slide_id.as_deref().filter(|id| !id.is_empty());
    core_render_preview(content, max_length, slide_id)
}

/// Show one half of a rendered preview and hide the other.
///
/// `action` is the toggle link's `data-preview-action` (`"expand"` or
/// `"collapse"`). Returns `false` for unknown actions or when the preview's
/// elements are not in the document.
#[wasm_bindgen(js_name = togglePreview)]
pub fn toggle_preview(id: &str, action: &str) -> bool {
    let Some(action) = PreviewAction::parse(action) else {
        log::warn!("unknown preview action {:?}", action);
        return false;
    };
    let (short, full) = action.displays();
    let short_shown = host::set_display(&short_element_id(id), short);
    let full_shown = host::set_display(&full_element_id(id), full);
    short_shown && full_shown
}

/// A slideshow bound to a JavaScript host object.
///
/// The host object may define `setTitle`, `setContent`, `setCounter`,
/// `setPreviousEnabled`, `setNextEnabled`, `notify`, `attachKeys` and
/// `detachKeys`. Missing functions are skipped with a console warning.
#[wasm_bindgen]
pub struct Slideshow {
    inner: SlideshowController<JsViewPort, JsKeyboard>,
}

#[wasm_bindgen]
impl Slideshow {
    #[wasm_bindgen(constructor)]
    pub fn new(host: JsValue) -> Slideshow {
        Slideshow {
            inner: SlideshowController::new(
                JsViewPort::new(host.clone()),
                JsKeyboard::new(host),
            ),
        }
    }

    /// Start presenting an array of `{id, title, content, order}` records.
    ///
    /// Returns `false` when the deck is empty or the value is not a slide
    /// array. Never throws.
    pub fn start(&mut self, slides: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<SlideDeck>(slides) {
            Ok(deck) => self.inner.start(deck).is_ok(),
            Err(e) => {
                log::warn!("Invalid slides array: {}", e);
                false
            }
        }
    }

    /// Start presenting a deck given as JSON text. `false` on invalid JSON.
    #[wasm_bindgen(js_name = startJson)]
    pub fn start_json(&mut self, json: &str) -> bool {
        match SlideDeck::from_json(json) {
            Ok(deck) => self.inner.start(deck).is_ok(),
            Err(e) => {
                log::warn!("Invalid slide deck: {}", e);
                false
            }
        }
    }

    pub fn next(&mut self) -> bool {
        self.inner.next()
    }

    pub fn previous(&mut self) -> bool {
        self.inner.previous()
    }

    /// Jump to a 0-based slide index.
    #[wasm_bindgen(js_name = goTo)]
    pub fn go_to(&mut self, index: usize) -> bool {
        self.inner.go_to(index)
    }

    pub fn exit(&mut self) -> bool {
        self.inner.exit()
    }

    /// Forward a `KeyboardEvent.key` value. Returns whether anything changed.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str) -> bool {
        match Key::from_dom_key(key) {
            Some(key) => self.inner.handle_key(key),
            None => false,
        }
    }

    #[wasm_bindgen(getter, js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    #[wasm_bindgen(getter, js_name = currentIndex)]
    pub fn current_index(&self) -> Option<usize> {
        self.inner.current_index()
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }
}
