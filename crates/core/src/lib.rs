//! Core slide deck types, content formatting, previews, and slideshow
//! navigation.

pub mod error;
pub mod format;
pub mod preview;
pub mod slideshow;
pub mod types;

pub use error::{Error, MountPoint, Result};
pub use format::{ContentFormatter, EMPTY_PLACEHOLDER};
pub use preview::{render_preview, Preview, PreviewAction, PreviewRenderer};
pub use slideshow::{KeyboardHost, Key, ListenerId, Notice, SlideshowController, ViewPort};
pub use types::{Slide, SlideDeck};
