//! Terminal host for the slideshow: a text view port and a stdin key slot.

use deck_core::{Key, KeyboardHost, ListenerId, Notice, Result, ViewPort};
use regex::Regex;
use std::sync::LazyLock;

/// Regex matching the start of a list item.
static LIST_ITEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li\b[^>]*>").unwrap());

/// Regex matching tags that end a line.
static BLOCK_END_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(?:li|p|ul|ol)\s*>|<br\s*/?>").unwrap());

/// Regex matching any remaining tag.
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// View port that keeps the latest slide state for printing.
#[derive(Debug, Default)]
pub struct TerminalView {
    title: String,
    content: String,
    counter: String,
    previous_enabled: bool,
    next_enabled: bool,
}

impl TerminalView {
    /// The current slide as plain text.
    pub fn frame(&self) -> String {
        let previous = if self.previous_enabled { "<" } else { " " };
        let next = if self.next_enabled { ">" } else { " " };
        format!(
            "\n{} {} {}  {}\n\n{}\n\n",
            previous,
            self.counter,
            next,
            self.title,
            markup_to_text(&self.content)
        )
    }
}

impl ViewPort for TerminalView {
    fn set_title(&mut self, title: &str) -> Result<()> {
        self.title = title.to_string();
        Ok(())
    }

    fn set_content(&mut self, markup: &str) -> Result<()> {
        self.content = markup.to_string();
        Ok(())
    }

    fn set_counter(&mut self, counter: &str) -> Result<()> {
        self.counter = counter.to_string();
        Ok(())
    }

    fn set_previous_enabled(&mut self, enabled: bool) -> Result<()> {
        self.previous_enabled = enabled;
        Ok(())
    }

    fn set_next_enabled(&mut self, enabled: bool) -> Result<()> {
        self.next_enabled = enabled;
        Ok(())
    }

    fn notify(&mut self, notice: Notice) {
        eprintln!("{}", notice);
    }
}

/// Key slot backed by the stdin command loop.
#[derive(Debug, Default)]
pub struct TerminalKeys {
    next_id: u64,
    active: Option<ListenerId>,
}

impl TerminalKeys {
    /// Whether the command loop should keep reading keys.
    pub fn is_listening(&self) -> bool {
        self.active.is_some()
    }
}

impl KeyboardHost for TerminalKeys {
    fn install(&mut self) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        if let Some(previous) = self.active.replace(id) {
            log::warn!("Replacing key listener {:?} that was never removed", previous);
        }
        id
    }

    fn remove(&mut self, listener: ListenerId) {
        if self.active == Some(listener) {
            self.active = None;
        }
    }
}

/// A parsed line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Key(Key),
    /// 1-based slide number.
    Jump(usize),
}

pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim().to_lowercase();
    let key = match line.as_str() {
        "" | "n" | "next" | "right" => Key::ArrowRight,
        "p" | "prev" | "previous" | "left" => Key::ArrowLeft,
        "q" | "quit" | "esc" | "escape" => Key::Escape,
        "home" => Key::Home,
        "end" => Key::End,
        other => return other.parse().ok().map(Command::Jump),
    };
    Some(Command::Key(key))
}

/// Flatten rendered slide markup into terminal text.
pub fn markup_to_text(markup: &str) -> String {
    let text = LIST_ITEM_REGEX.replace_all(markup, "  • ");
    let text = BLOCK_END_REGEX.replace_all(&text, "\n");
    let text = TAG_REGEX.replace_all(&text, "");

    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
