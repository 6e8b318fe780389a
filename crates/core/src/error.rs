//! Error types for slide rendering and slideshow sessions.

use std::fmt;

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading decks or driving a slideshow.
///
/// None of these are fatal: the controller reports them as notices or
/// log lines and keeps whatever state it had.
#[derive(Error, Debug)]
pub enum Error {
    /// A slideshow was started with zero slides.
    #[error("No slides available")]
    EmptyDeck,

    /// The host view does not provide a rendering target.
    #[error("Missing mount point: {0}")]
    MissingMountPoint(MountPoint),

    /// The deck data is structurally unusable.
    #[error("Invalid deck: {0}")]
    InvalidDeck(String),

    /// Deck JSON could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The rendering targets a host view exposes to the slideshow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MountPoint {
    Title,
    Content,
    Counter,
    PreviousControl,
    NextControl,
}

impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::Counter => "counter",
            Self::PreviousControl => "previous control",
            Self::NextControl => "next control",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_mount_point_message() {
        let err = Error::MissingMountPoint(MountPoint::Counter);
        assert_eq!(err.to_string(), "Missing mount point: counter");
    }

    #[test]
    fn test_empty_deck_message() {
        assert_eq!(Error::EmptyDeck.to_string(), "No slides available");
    }
}
