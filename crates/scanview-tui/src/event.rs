//! Semantic application events: crossterm key events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! # Keybindings
//!
//! | Key(s)              | Event              |
//! |---------------------|--------------------|
//! | `q`, `Ctrl+c`       | `Quit`             |
//! | `↑` / `k`           | `Up`               |
//! | `↓` / `j`           | `Down`             |
//! | `←` / `h`           | `PrevPage`         |
//! | `→` / `l`           | `NextPage`         |
//! | `Space`             | `ToggleSeen`       |
//! | `p`                 | `MarkPageSeen`     |
//! | `H`                 | `ToggleHideSeen`   |
//! | `X`                 | `ResetSeen`        |
//! | `s`                 | `CycleSort`        |
//! | `S`                 | `FlipSort`         |
//! | `]` / `[`           | `NextKeyword` / `PrevKeyword` |
//! | `f` / `t`           | `EditDateFrom` / `EditDateTo` |
//! | `Enter`             | `Enter` (apply filters) |
//! | `c`                 | `ResetFilters`     |
//! | `r`                 | `Reload`           |
//! | `T`                 | `ToggleTheme`      |
//! | `o`                 | `ShowUrl`          |
//! | `?`                 | `Help`             |
//! | other printable     | `Char(c)`          |
//! | terminal resize     | `Resize(w, h)`     |
//!
//! ## Insert mode
//!
//! While a date field is being edited the loop calls [`to_app_event_insert`]:
//! every printable key is a `Char`, arrows move the text cursor and only
//! `Ctrl+c`, `Escape`, `Enter` and `Backspace` keep special meaning.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    Up,
    Down,
    PrevPage,
    NextPage,
    ToggleSeen,
    MarkPageSeen,
    ToggleHideSeen,
    ResetSeen,
    CycleSort,
    FlipSort,
    NextKeyword,
    PrevKeyword,
    EditDateFrom,
    EditDateTo,
    ResetFilters,
    Reload,
    ToggleTheme,
    ShowUrl,
    Help,
    /// A printable character not bound to a shortcut, or any character in
    /// insert mode.
    Char(char),
    Backspace,
    Enter,
    Escape,
    CursorLeft,
    CursorRight,
    Resize(u16, u16),
}

/// Map a raw crossterm [`Event`] in normal (navigation) mode.
///
/// Returns `None` for events with no meaning here (mouse, unbound keys).
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

/// Map a raw crossterm [`Event`] while a text field has focus.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key_insert(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    let plain = key.modifiers == Mod::NONE;
    match key.code {
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),
        Char('q') if plain => Some(AppEvent::Quit),

        Up | Char('k') if plain => Some(AppEvent::Up),
        Down | Char('j') if plain => Some(AppEvent::Down),
        Left | Char('h') if plain => Some(AppEvent::PrevPage),
        Right | Char('l') if plain => Some(AppEvent::NextPage),
        PageUp => Some(AppEvent::PrevPage),
        PageDown => Some(AppEvent::NextPage),

        Char(' ') if plain => Some(AppEvent::ToggleSeen),
        Char('p') if plain => Some(AppEvent::MarkPageSeen),
        Char('s') if plain => Some(AppEvent::CycleSort),
        Char(']') if plain => Some(AppEvent::NextKeyword),
        Char('[') if plain => Some(AppEvent::PrevKeyword),
        Char('f') if plain => Some(AppEvent::EditDateFrom),
        Char('t') if plain => Some(AppEvent::EditDateTo),
        Char('c') if plain => Some(AppEvent::ResetFilters),
        Char('r') if plain => Some(AppEvent::Reload),
        Char('o') if plain => Some(AppEvent::ShowUrl),
        Char('?') => Some(AppEvent::Help),

        // Uppercase: SHIFT may or may not be reported, match on code alone
        Char('H') => Some(AppEvent::ToggleHideSeen),
        Char('X') => Some(AppEvent::ResetSeen),
        Char('S') => Some(AppEvent::FlipSort),
        Char('T') => Some(AppEvent::ToggleTheme),

        Char(c) if plain || key.modifiers == Mod::SHIFT => Some(AppEvent::Char(c)),

        Backspace if plain => Some(AppEvent::Backspace),
        Enter if plain => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),
        Left => Some(AppEvent::CursorLeft),
        Right => Some(AppEvent::CursorRight),
        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }
        Backspace => Some(AppEvent::Backspace),
        Enter => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
