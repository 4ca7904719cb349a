use raylib::consts::KeyboardKey;

use crate::page::ElementId;

/// Keys the slideshow reacts to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Other,
}

impl From<KeyboardKey> for Key {
    fn from(key: KeyboardKey) -> Self {
        match key {
            KeyboardKey::KEY_LEFT => Key::ArrowLeft,
            KeyboardKey::KEY_RIGHT => Key::ArrowRight,
            KeyboardKey::KEY_HOME => Key::Home,
            KeyboardKey::KEY_END => Key::End,
            _ => Key::Other,
        }
    }
}

/// Events delivered to the slideshow, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    Click(ElementId),
    PointerEnter,
    PointerLeave,
    /// Horizontal screen coordinate where the touch began
    TouchStart { x: f32 },
    TouchEnd { x: f32 },
    KeyDown(Key),
    /// An `<img>` finished loading
    ImageLoad(ElementId),
    /// An `<img>` failed to load
    ImageError(ElementId),
}
