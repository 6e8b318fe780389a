//! Domain types for representing slide decks handed over by a content service.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// A single unit of presented content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Opaque identifier, unique within a deck. Used to key previews.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,

    /// Display title. May be empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// Raw text or embedded markup. Untrusted.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,

    /// Position hint supplied by the content service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// Read a string field, treating `null` like an absent field.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Slide {
    /// Create a new slide without an order hint.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            order: None,
        }
    }

    /// Set the order hint.
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Title to display for this slide at the given 1-based position.
    ///
    /// Blank titles fall back to `"Slide N"`.
    pub fn display_title(&self, position: usize) -> String {
        let title = self.title.trim();
        if title.is_empty() {
            format!("Slide {}", position)
        } else {
            title.to_string()
        }
    }

    /// Number to display for this slide when it sits at `index` in its deck.
    pub fn display_number(&self, index: usize) -> i64 {
        self.order.unwrap_or(index as i64 + 1)
    }
}

/// An ordered sequence of slides. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideDeck {
    slides: Vec<Slide>,
}

impl SlideDeck {
    /// Create an empty deck.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a deck from a JSON array of slide records.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_array() {
            return Err(Error::InvalidDeck(
                "expected a JSON array of slides".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Add a slide at the end of the deck.
    pub fn push(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.slides.iter()
    }

    /// Copy of this deck ordered by each slide's `order` hint.
    ///
    /// Slides without a hint keep their relative position after the
    /// ordered ones. The sort is stable.
    pub fn sorted_by_order(&self) -> Self {
        let mut slides = self.slides.clone();
        slides.sort_by_key(|s| (s.order.is_none(), s.order.unwrap_or_default()));
        Self { slides }
    }
}

impl From<Vec<Slide>> for SlideDeck {
    fn from(slides: Vec<Slide>) -> Self {
        Self { slides }
    }
}

impl FromIterator<Slide> for SlideDeck {
    fn from_iter<I: IntoIterator<Item = Slide>>(iter: I) -> Self {
        Self {
            slides: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SlideDeck {
    type Item = &'a Slide;
    type IntoIter = std::slice::Iter<'a, Slide>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}
