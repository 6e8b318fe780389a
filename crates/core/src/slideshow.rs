//! Slideshow navigation.
//!
//! [`SlideshowController`] owns the navigation state of one presentation
//! session and pushes a fresh rendering into a host [`ViewPort`] on every
//! transition. Keyboard input arrives through a single listener slot owned
//! by the host ([`KeyboardHost`]); the controller installs exactly one
//! listener while a session is open and removes it on exit.

use std::fmt;

use crate::error::MountPoint;
use crate::format::ContentFormatter;
use crate::types::{Slide, SlideDeck};
use crate::{Error, Result};

/// Rendering targets provided by the host UI.
///
/// Setters return [`Error::MissingMountPoint`] when the target does not
/// exist. The controller logs and skips that update; the others still run.
pub trait ViewPort {
    fn set_title(&mut self, title: &str) -> Result<()>;

    fn set_content(&mut self, markup: &str) -> Result<()>;

    /// Position counter, e.g. `"2 / 4"`.
    fn set_counter(&mut self, counter: &str) -> Result<()>;

    fn set_previous_enabled(&mut self, enabled: bool) -> Result<()>;

    fn set_next_enabled(&mut self, enabled: bool) -> Result<()>;

    /// Show a user-facing notice.
    fn notify(&mut self, notice: Notice);
}

/// The host's global key-listener slot.
pub trait KeyboardHost {
    /// Install a listener that forwards keys to [`SlideshowController::handle_key`].
    fn install(&mut self) -> ListenerId;

    /// Remove a previously installed listener.
    fn remove(&mut self, listener: ListenerId);
}

/// Handle for an installed key listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Notices the controller reports to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// `start` was called with an empty deck.
    NoSlides,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSlides => f.write_str("No slides available"),
        }
    }
}

/// Keys the slideshow responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Home,
    End,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value to a slideshow key.
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "Left" => Some(Self::ArrowLeft),
            "ArrowRight" | "Right" => Some(Self::ArrowRight),
            "Escape" | "Esc" => Some(Self::Escape),
            "Home" => Some(Self::Home),
            "End" => Some(Self::End),
            _ => None,
        }
    }
}

/// State of an open session.
#[derive(Debug)]
struct NavigationState {
    deck: SlideDeck,
    current_index: usize,
    listener: ListenerId,
}

/// Drives one slideshow at a time over an injected view and keyboard slot.
pub struct SlideshowController<V: ViewPort, K: KeyboardHost> {
    view: V,
    keyboard: K,
    formatter: ContentFormatter,
    /// `None` while closed.
    session: Option<NavigationState>,
}

impl<V: ViewPort, K: KeyboardHost> SlideshowController<V, K> {
    /// Create a closed controller.
    pub fn new(view: V, keyboard: K) -> Self {
        Self {
            view,
            keyboard,
            formatter: ContentFormatter::new(),
            session: None,
        }
    }

    /// Use a custom content formatter.
    pub fn with_formatter(mut self, formatter: ContentFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Open a session on `deck` and render its first slide.
    ///
    /// An empty deck emits [`Notice::NoSlides`] and leaves the controller
    /// untouched. Starting while a session is open closes it first, so at
    /// most one key listener is ever installed.
    pub fn start(&mut self, deck: SlideDeck) -> Result<()> {
        if deck.is_empty() {
            log::warn!("slideshow: refusing to start with an empty deck");
            self.view.notify(Notice::NoSlides);
            return Err(Error::EmptyDeck);
        }

        if self.session.is_some() {
            log::debug!("slideshow: start while open, closing previous session");
            self.exit();
        }

        let listener = self.keyboard.install();
        log::info!("slideshow: started with {} slides", deck.len());
        self.session = Some(NavigationState {
            deck,
            current_index: 0,
            listener,
        });
        self.render();
        Ok(())
    }

    /// Advance one slide. Returns `false` on the last slide or when closed.
    pub fn next(&mut self) -> bool {
        match self.current_index() {
            Some(index) => self.move_to(index + 1),
            None => false,
        }
    }

    /// Go back one slide. Returns `false` on the first slide or when closed.
    pub fn previous(&mut self) -> bool {
        match self.current_index().and_then(|index| index.checked_sub(1)) {
            Some(index) => self.move_to(index),
            None => false,
        }
    }

    /// Jump to a 0-based index. Out-of-range jumps are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        self.move_to(index)
    }

    /// Close the session and remove its key listener.
    pub fn exit(&mut self) -> bool {
        match self.session.take() {
            Some(state) => {
                self.keyboard.remove(state.listener);
                log::info!(
                    "slideshow: closed at slide {}/{}",
                    state.current_index + 1,
                    state.deck.len()
                );
                true
            }
            None => false,
        }
    }

    /// Dispatch a key from the installed listener.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if self.session.is_none() {
            return false;
        }

        log::debug!("slideshow: key {:?}", key);
        match key {
            Key::ArrowLeft => self.previous(),
            Key::ArrowRight => self.next(),
            Key::Escape => self.exit(),
            Key::Home => self.go_to(0),
            Key::End => self.go_to(self.len().saturating_sub(1)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Current 0-based index, `None` when closed.
    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.current_index)
    }

    /// Number of slides in the open deck, 0 when closed.
    pub fn len(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.deck.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        let state = self.session.as_ref()?;
        state.deck.get(state.current_index)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }

    fn move_to(&mut self, index: usize) -> bool {
        let Some(state) = self.session.as_mut() else {
            log::debug!("slideshow: navigation ignored, no open session");
            return false;
        };
        if index >= state.deck.len() || index == state.current_index {
            return false;
        }

        log::debug!(
            "slideshow: slide {} -> {}",
            state.current_index + 1,
            index + 1
        );
        state.current_index = index;
        self.render();
        true
    }

    /// Push the current slide into every mount point.
    fn render(&mut self) {
        let Some(state) = self.session.as_ref() else {
            return;
        };
        let Some(slide) = state.deck.get(state.current_index) else {
            return;
        };

        let position = state.current_index + 1;
        let total = state.deck.len();
        let title = slide.display_title(position);
        let content = self.formatter.render_full(&slide.content);
        let counter = format!("{} / {}", position, total);

        skip_missing(self.view.set_content(&content));
        skip_missing(self.view.set_title(&title));
        skip_missing(self.view.set_counter(&counter));
        skip_missing(self.view.set_previous_enabled(position > 1));
        skip_missing(self.view.set_next_enabled(position < total));
    }
}

impl<V: ViewPort, K: KeyboardHost> Drop for SlideshowController<V, K> {
    fn drop(&mut self) {
        self.exit();
    }
}

fn skip_missing(result: Result<()>) {
    if let Err(e) = result {
        log::warn!("slideshow: skipped view update: {}", e);
    }
}

/// Convenience for view ports: error for an absent mount point.
pub fn missing(mount: MountPoint) -> Result<()> {
    Err(Error::MissingMountPoint(mount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Default)]
    struct RecordingView {
        title: Option<String>,
        content: Option<String>,
        counter: Option<String>,
        counters: Vec<String>,
        previous_enabled: Option<bool>,
        next_enabled: Option<bool>,
        notices: Vec<Notice>,
        absent: HashSet<MountPoint>,
    }

    impl RecordingView {
        fn without(mounts: &[MountPoint]) -> Self {
            Self {
                absent: mounts.iter().copied().collect(),
                ..Self::default()
            }
        }

        fn check(&self, mount: MountPoint) -> Result<()> {
            if self.absent.contains(&mount) {
                missing(mount)
            } else {
                Ok(())
            }
        }
    }

    impl ViewPort for RecordingView {
        fn set_title(&mut self, title: &str) -> Result<()> {
            self.check(MountPoint::Title)?;
            self.title = Some(title.to_string());
            Ok(())
        }

        fn set_content(&mut self, markup: &str) -> Result<()> {
            self.check(MountPoint::Content)?;
            self.content = Some(markup.to_string());
            Ok(())
        }

        fn set_counter(&mut self, counter: &str) -> Result<()> {
            self.check(MountPoint::Counter)?;
            self.counter = Some(counter.to_string());
            self.counters.push(counter.to_string());
            Ok(())
        }

        fn set_previous_enabled(&mut self, enabled: bool) -> Result<()> {
            self.check(MountPoint::PreviousControl)?;
            self.previous_enabled = Some(enabled);
            Ok(())
        }

        fn set_next_enabled(&mut self, enabled: bool) -> Result<()> {
            self.check(MountPoint::NextControl)?;
            self.next_enabled = Some(enabled);
            Ok(())
        }

        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
    }

    #[derive(Debug, Default)]
    struct FakeKeyboard {
        next_id: u64,
        active: Vec<ListenerId>,
        installs: usize,
        removals: usize,
    }

    impl KeyboardHost for FakeKeyboard {
        fn install(&mut self) -> ListenerId {
            self.next_id += 1;
            let id = ListenerId(self.next_id);
            self.active.push(id);
            self.installs += 1;
            id
        }

        fn remove(&mut self, listener: ListenerId) {
            self.active.retain(|id| *id != listener);
            self.removals += 1;
        }
    }

    /// Deliver a key press to every active listener, like a DOM would.
    fn press(controller: &mut SlideshowController<RecordingView, FakeKeyboard>, key: Key) {
        let listeners = controller.keyboard().active.len();
        for _ in 0..listeners {
            controller.handle_key(key);
        }
    }

    fn controller() -> SlideshowController<RecordingView, FakeKeyboard> {
        SlideshowController::new(RecordingView::default(), FakeKeyboard::default())
    }

    fn deck(n: usize) -> SlideDeck {
        (1..=n)
            .map(|i| Slide::new(format!("s{}", i), format!("Title {}", i), format!("Body {}", i)))
            .collect()
    }

    #[test]
    fn test_start_renders_first_slide() {
        let mut c = controller();
        c.start(deck(3)).unwrap();

        let view = c.view();
        assert!(c.is_open());
        assert_eq!(c.current_index(), Some(0));
        assert_eq!(view.title.as_deref(), Some("Title 1"));
        assert_eq!(
            view.content.as_deref(),
            Some(r#"<p class="slide-paragraph">Body 1</p>"#)
        );
        assert_eq!(view.counter.as_deref(), Some("1 / 3"));
        assert_eq!(view.previous_enabled, Some(false));
        assert_eq!(view.next_enabled, Some(true));
        assert_eq!(c.keyboard().active.len(), 1);
    }

    #[test]
    fn test_empty_deck_is_refused() {
        let mut c = controller();

        let err = c.start(SlideDeck::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyDeck));
        assert!(!c.is_open());
        assert_eq!(c.view().notices, vec![Notice::NoSlides]);
        assert_eq!(c.keyboard().installs, 0);

        assert!(!c.next());
        assert!(!c.is_open());
        assert!(c.view().counters.is_empty());
    }

    #[test]
    fn test_empty_deck_keeps_open_session() {
        let mut c = controller();
        c.start(deck(2)).unwrap();
        c.next();

        assert!(c.start(SlideDeck::new()).is_err());
        assert_eq!(c.current_index(), Some(1));
        assert_eq!(c.keyboard().active.len(), 1);
    }

    #[test]
    fn test_navigation_boundaries() {
        let mut c = controller();
        c.start(deck(3)).unwrap();

        assert!(!c.previous());
        assert_eq!(c.current_index(), Some(0));
        assert_eq!(c.view().previous_enabled, Some(false));

        assert!(c.next());
        assert_eq!(c.current_index(), Some(1));
        assert_eq!(c.view().title.as_deref(), Some("Title 2"));
        assert_eq!(c.current_slide().map(|s| s.id.as_str()), Some("s2"));
        assert_eq!(c.view().previous_enabled, Some(true));
        assert_eq!(c.view().next_enabled, Some(true));

        assert!(c.next());
        assert!(!c.next());
        assert_eq!(c.current_index(), Some(2));
        assert_eq!(c.view().next_enabled, Some(false));
        assert_eq!(c.view().counters, vec!["1 / 3", "2 / 3", "3 / 3"]);
    }

    #[test]
    fn test_blank_title_falls_back_to_position() {
        let mut c = controller();
        let deck: SlideDeck = vec![
            Slide::new("a", "Intro", "Hello"),
            Slide::new("b", "  ", "World"),
        ]
        .into();
        c.start(deck).unwrap();

        c.next();
        assert_eq!(c.view().title.as_deref(), Some("Slide 2"));
    }

    #[test]
    fn test_full_traversal() {
        let mut c = controller();
        c.start(deck(4)).unwrap();
        let mut next_states = vec![c.view().next_enabled];

        for _ in 0..3 {
            assert!(c.next());
            next_states.push(c.view().next_enabled);
        }

        assert_eq!(c.view().counters, vec!["1 / 4", "2 / 4", "3 / 4", "4 / 4"]);
        assert_eq!(
            next_states,
            vec![Some(true), Some(true), Some(true), Some(false)]
        );
    }

    #[test]
    fn test_go_to() {
        let mut c = controller();
        c.start(deck(4)).unwrap();

        assert!(c.go_to(3));
        assert_eq!(c.view().counter.as_deref(), Some("4 / 4"));
        assert!(!c.go_to(3));
        assert!(!c.go_to(4));
        assert_eq!(c.current_index(), Some(3));
    }

    #[test]
    fn test_exit_removes_listener() {
        let mut c = controller();
        c.start(deck(2)).unwrap();

        assert!(c.exit());
        assert!(!c.is_open());
        assert!(c.keyboard().active.is_empty());
        assert_eq!(c.current_index(), None);

        assert!(!c.exit());
        assert!(!c.next());
        assert!(!c.previous());
    }

    #[test]
    fn test_restart_keeps_single_listener() {
        let mut c = controller();
        c.start(deck(3)).unwrap();
        c.go_to(2);
        c.start(deck(3)).unwrap();
        c.go_to(2);

        assert_eq!(c.keyboard().active.len(), 1);
        assert_eq!(c.keyboard().installs, 2);
        assert_eq!(c.keyboard().removals, 1);

        press(&mut c, Key::ArrowLeft);
        assert_eq!(c.current_index(), Some(1));
    }

    #[test]
    fn test_key_dispatch() {
        let mut c = controller();
        c.start(deck(3)).unwrap();

        press(&mut c, Key::ArrowRight);
        assert_eq!(c.current_index(), Some(1));
        press(&mut c, Key::End);
        assert_eq!(c.current_index(), Some(2));
        press(&mut c, Key::Home);
        assert_eq!(c.current_index(), Some(0));
        press(&mut c, Key::Escape);
        assert!(!c.is_open());
        assert!(c.keyboard().active.is_empty());

        assert!(!c.handle_key(Key::ArrowRight));
    }

    #[test]
    fn test_missing_mount_point_is_skipped() {
        let view = RecordingView::without(&[MountPoint::Title, MountPoint::NextControl]);
        let mut c = SlideshowController::new(view, FakeKeyboard::default());

        c.start(deck(2)).unwrap();
        assert!(c.next());

        let view = c.view();
        assert_eq!(view.title, None);
        assert_eq!(view.next_enabled, None);
        assert_eq!(view.counter.as_deref(), Some("2 / 2"));
        assert_eq!(view.previous_enabled, Some(true));
    }

    #[test]
    fn test_custom_formatter() {
        let deck: SlideDeck = vec![Slide::new("a", "", "- one\n- two\n- three")].into();
        let mut c = controller().with_formatter(
            ContentFormatter::new()
                .with_max_items(2)
                .with_list_threshold(2),
        );
        c.start(deck).unwrap();

        assert_eq!(
            c.view().content.as_deref(),
            Some(r#"<ul class="slide-list"><li>One.</li><li>Two.</li></ul>"#)
        );
    }

    #[test]
    fn test_key_from_dom_key() {
        assert_eq!(Key::from_dom_key("ArrowLeft"), Some(Key::ArrowLeft));
        assert_eq!(Key::from_dom_key("Right"), Some(Key::ArrowRight));
        assert_eq!(Key::from_dom_key("Esc"), Some(Key::Escape));
        assert_eq!(Key::from_dom_key("a"), None);
    }
}
