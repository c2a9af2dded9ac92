//! Input events delivered to widgets.
//!
//! A host translates whatever its platform produces (browser events, a
//! terminal, a test script) into [`DomEvent`] values and hands them to the
//! widget's event adapter.

use super::ElementId;

/// The event types widgets subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A key was pressed.
    KeyDown,
    /// A key was released.
    KeyUp,
    /// The value of a text input changed.
    Input,
    /// The element was clicked.
    Click,
    /// The pointer moved onto the element.
    MouseOver,
    /// The element gained keyboard focus.
    Focus,
    /// The element lost keyboard focus.
    Blur,
}

/// Keyboard keys widgets react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Enter / Return.
    Enter,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Escape.
    Escape,
    /// Home.
    Home,
    /// End.
    End,
    /// A printable character (including space).
    Character(char),
    /// Any other key.
    Unknown,
}

impl Key {
    /// Convert a DOM `KeyboardEvent.key` name into a [`Key`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Backspace" => Self::Backspace,
            "Delete" | "Del" => Self::Delete,
            "Escape" | "Esc" => Self::Escape,
            "Home" => Self::Home,
            "End" => Self::End,
            "Spacebar" => Self::Character(' '),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Unknown,
                }
            }
        }
    }

    /// Whether this key produces text in an input.
    pub fn is_printable(self) -> bool {
        matches!(self, Self::Character(c) if !c.is_control())
    }
}

/// Modifier keys held during a keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardModifiers {
    /// Shift key.
    pub shift: bool,
    /// Control key.
    pub control: bool,
    /// Alt / Option key.
    pub alt: bool,
    /// Meta / Command / Windows key.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Whether any command modifier (control, alt, meta) is held.
    pub fn has_command(self) -> bool {
        self.control || self.alt || self.meta
    }
}

/// An input event targeted at one element.
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    /// What happened.
    pub kind: EventKind,
    /// The element the event was dispatched to.
    pub target: ElementId,
    /// The key, for keyboard events.
    pub key: Option<Key>,
    /// Modifiers held, for keyboard events.
    pub modifiers: KeyboardModifiers,
    default_prevented: bool,
}

impl DomEvent {
    /// Create a non-keyboard event.
    pub fn new(kind: EventKind, target: ElementId) -> Self {
        Self {
            kind,
            target,
            key: None,
            modifiers: KeyboardModifiers::NONE,
            default_prevented: false,
        }
    }

    /// Create a `KeyDown` event.
    pub fn key_down(target: ElementId, key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyDown, target)
        }
    }

    /// Create a `KeyUp` event.
    pub fn key_up(target: ElementId, key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyUp, target)
        }
    }

    /// Create a `Click` event.
    pub fn click(target: ElementId) -> Self {
        Self::new(EventKind::Click, target)
    }

    /// Set the modifiers using builder pattern.
    pub fn with_modifiers(mut self, modifiers: KeyboardModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Ask the host to skip its default action for this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a handler asked the host to skip its default action.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}
