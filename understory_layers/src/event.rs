// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host events delivered to the manager.
//!
//! The host translates its own frame, input, and platform notifications into [`HostEvent`]
//! values and hands them to [`LayerManager::handle_event`](crate::manager::LayerManager::handle_event).
//! Each event belongs to exactly one [`Topics`] bit; the manager ignores events on topics it
//! is not subscribed to.

use alloc::string::String;

use kurbo::{Point, Size};

use crate::types::{Audience, Topics};

/// Phase of a touch contact.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TouchPhase {
    /// Contact started.
    Down,
    /// Contact moved.
    Moved,
    /// Contact lifted.
    Up,
    /// Two quick taps at the same place.
    DoubleTap,
    /// The platform cancelled the contact.
    Cancelled,
}

/// A single touch contact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchEvent {
    /// What happened to the contact.
    pub phase: TouchPhase,
    /// Platform identifier of the contact, stable while it lasts.
    pub id: u32,
    /// Position in window coordinates.
    pub position: Point,
}

/// What a mouse pointer did.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PointerAction {
    /// A button went down.
    Pressed,
    /// A button went up.
    Released,
    /// The pointer moved with no button held.
    Moved,
    /// The pointer moved with a button held.
    Dragged,
}

/// A mouse pointer event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// What the pointer did.
    pub action: PointerAction,
    /// Position in window coordinates.
    pub position: Point,
    /// Button involved, if any (`None` for plain moves).
    pub button: Option<u8>,
}

/// Whether a key went down or up.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KeyState {
    /// Key pressed.
    Pressed,
    /// Key released.
    Released,
}

/// A keyboard event.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KeyEvent {
    /// Pressed or released.
    pub state: KeyState,
    /// Host key code.
    pub key: i32,
}

/// Platform lifecycle and system UI notifications (mobile hosts mostly).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The application is being paused.
    Pause,
    /// The application resumed after a pause.
    Resume,
    /// The application is being stopped.
    Stop,
    /// GPU resources were lost and must be reloaded.
    ReloadTextures,
    /// The system is low on memory.
    MemoryWarning,
    /// Device orientation changed (host orientation code).
    OrientationChanged(i32),
    /// The application window lost focus.
    FocusLost,
    /// The application window gained focus.
    FocusGained,
    /// The platform back button was pressed.
    BackPressed,
    /// The platform menu button was pressed.
    MenuPressed,
    /// A menu item was selected.
    MenuItemSelected(String),
    /// A checkable menu item was toggled.
    MenuItemChecked {
        /// Menu item identifier.
        id: String,
        /// New checked state.
        checked: bool,
    },
    /// A system dialog was confirmed.
    OkPressed,
    /// A system dialog was dismissed.
    CancelPressed,
    /// A platform key went down (platform key code).
    KeyDown(i32),
    /// A platform key went up (platform key code).
    KeyUp(i32),
    /// A file requested through the platform arrived.
    GotFile {
        /// Source location.
        url: String,
        /// Local file name.
        filename: String,
    },
    /// An image was picked from the platform gallery.
    ImageSelected(String),
    /// A platform save dialog was confirmed.
    SavePressed {
        /// Title entered by the user.
        title: String,
        /// Tags entered by the user.
        tags: String,
    },
}

impl LifecycleEvent {
    /// Which layers receive this event unless a profile says otherwise.
    ///
    /// Process-level notifications reach every set-up layer, questions are answered by the
    /// first active layer, and everything else reaches the active layers.
    pub fn default_audience(&self) -> Audience {
        match self {
            Self::Pause
            | Self::Resume
            | Self::Stop
            | Self::ReloadTextures
            | Self::MemoryWarning
            | Self::OrientationChanged(_)
            | Self::FocusLost
            | Self::FocusGained => Audience::Setup,
            Self::BackPressed
            | Self::MenuItemSelected(_)
            | Self::MenuItemChecked { .. }
            | Self::OkPressed
            | Self::CancelPressed => Audience::FirstActive,
            Self::MenuPressed
            | Self::KeyDown(_)
            | Self::KeyUp(_)
            | Self::GotFile { .. }
            | Self::ImageSelected(_)
            | Self::SavePressed { .. } => Audience::Active,
        }
    }
}

/// An event raised by the host application.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    /// Advance one frame: run the sweep.
    Update,
    /// Render one frame.
    Draw,
    /// The application is shutting down.
    Exit,
    /// Touch input.
    Touch(TouchEvent),
    /// Mouse input.
    Pointer(PointerEvent),
    /// Keyboard input.
    Key(KeyEvent),
    /// The window was resized.
    WindowResized(Size),
    /// Platform lifecycle notification.
    Lifecycle(LifecycleEvent),
}

impl HostEvent {
    /// The subscription topic this event belongs to.
    pub fn topic(&self) -> Topics {
        match self {
            Self::Update => Topics::UPDATE,
            Self::Draw => Topics::DRAW,
            Self::Exit => Topics::EXIT,
            Self::Touch(_) => Topics::TOUCH,
            Self::Pointer(_) => Topics::POINTER,
            Self::Key(_) => Topics::KEY,
            Self::WindowResized(_) => Topics::WINDOW,
            Self::Lifecycle(_) => Topics::LIFECYCLE,
        }
    }

    /// Default audience for input and platform events; `None` for frame events.
    ///
    /// Window resizes go to every set-up layer, active or not.
    pub fn default_audience(&self) -> Option<Audience> {
        match self {
            Self::Update | Self::Draw | Self::Exit => None,
            Self::Touch(_) | Self::Pointer(_) | Self::Key(_) => Some(Audience::Active),
            Self::WindowResized(_) => Some(Audience::Setup),
            Self::Lifecycle(e) => Some(e.default_audience()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_event_maps_to_a_single_topic() {
        let events = [
            HostEvent::Update,
            HostEvent::Draw,
            HostEvent::Exit,
            HostEvent::Touch(TouchEvent {
                phase: TouchPhase::Down,
                id: 0,
                position: Point::ZERO,
            }),
            HostEvent::Pointer(PointerEvent {
                action: PointerAction::Moved,
                position: Point::new(3.0, 4.0),
                button: None,
            }),
            HostEvent::Key(KeyEvent {
                state: KeyState::Pressed,
                key: 97,
            }),
            HostEvent::WindowResized(Size::new(800.0, 600.0)),
            HostEvent::Lifecycle(LifecycleEvent::Pause),
        ];
        for e in &events {
            assert_eq!(
                e.topic().bits().count_ones(),
                1,
                "{e:?} must belong to exactly one topic"
            );
        }
    }

    #[test]
    fn frame_events_have_no_audience() {
        assert_eq!(HostEvent::Update.default_audience(), None, "update is not fanned out");
        assert_eq!(HostEvent::Draw.default_audience(), None, "draw is not fanned out");
        assert_eq!(HostEvent::Exit.default_audience(), None, "exit is not fanned out");
    }

    #[test]
    fn resize_and_process_lifecycle_reach_setup_layers() {
        assert_eq!(
            HostEvent::WindowResized(Size::new(1.0, 1.0)).default_audience(),
            Some(Audience::Setup),
            "resize uses the broader predicate"
        );
        assert_eq!(
            LifecycleEvent::MemoryWarning.default_audience(),
            Audience::Setup,
            "memory warnings use the broader predicate"
        );
    }

    #[test]
    fn questions_are_answered_by_first_active_layer() {
        assert_eq!(
            LifecycleEvent::BackPressed.default_audience(),
            Audience::FirstActive,
            "back pressed returns a single answer"
        );
        assert_eq!(
            LifecycleEvent::MenuItemChecked {
                id: "grid".into(),
                checked: true
            }
            .default_audience(),
            Audience::FirstActive,
            "menu item checked returns a single answer"
        );
        assert_eq!(
            LifecycleEvent::MenuPressed.default_audience(),
            Audience::Active,
            "menu pressed fans out"
        );
    }
}
