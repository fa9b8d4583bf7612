// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input profiles: which host input the manager listens to, and who receives it.
//!
//! A profile is chosen once, when the manager is constructed, and stays fixed for the
//! manager's lifetime. It decides:
//!
//! - the input [`Topics`] subscribed on the host's [`EventSource`](crate::source::EventSource)
//!   next to the app set (update, draw, exit);
//! - the [`Audience`] of each input or platform event.
//!
//! | Profile          | Topics                                 |
//! |------------------|----------------------------------------|
//! | [`Desktop`]      | `POINTER`, `KEY`, `WINDOW`             |
//! | [`Touch`]        | `TOUCH`                                |
//! | [`Mobile<P>`]    | `P`'s topics plus `LIFECYCLE`          |

use core::fmt::Debug;

use crate::event::HostEvent;
use crate::types::{Audience, Topics};

/// Strategy selecting the input surface of a [`LayerManager`](crate::manager::LayerManager).
pub trait InputProfile: Debug {
    /// Input topics to subscribe to, next to [`Topics::APP`].
    fn topics(&self) -> Topics;

    /// Which layers receive `event`, or `None` if this profile does not handle it.
    ///
    /// The default accepts events on [`topics`](Self::topics) and uses
    /// [`HostEvent::default_audience`].
    fn audience(&self, event: &HostEvent) -> Option<Audience> {
        if self.topics().intersects(event.topic()) {
            event.default_audience()
        } else {
            None
        }
    }
}

/// Mouse, keyboard, and window events.
#[derive(Copy, Clone, Debug, Default)]
pub struct Desktop;

impl InputProfile for Desktop {
    fn topics(&self) -> Topics {
        Topics::DESKTOP
    }
}

/// Touch events only.
#[derive(Copy, Clone, Debug, Default)]
pub struct Touch;

impl InputProfile for Touch {
    fn topics(&self) -> Topics {
        Topics::TOUCH
    }
}

/// Adds the platform lifecycle set to another profile.
///
/// ```
/// use understory_layers::profile::{InputProfile, Mobile, Touch};
/// use understory_layers::types::Topics;
///
/// let profile = Mobile(Touch);
/// assert_eq!(profile.topics(), Topics::TOUCH | Topics::LIFECYCLE);
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct Mobile<P>(pub P);

impl<P: InputProfile> InputProfile for Mobile<P> {
    fn topics(&self) -> Topics {
        self.0.topics() | Topics::LIFECYCLE
    }

    fn audience(&self, event: &HostEvent) -> Option<Audience> {
        match event {
            HostEvent::Lifecycle(e) => Some(e.default_audience()),
            _ => self.0.audience(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyEvent, KeyState, LifecycleEvent, TouchEvent, TouchPhase};
    use kurbo::{Point, Size};

    fn touch() -> HostEvent {
        HostEvent::Touch(TouchEvent {
            phase: TouchPhase::Up,
            id: 1,
            position: Point::new(10.0, 20.0),
        })
    }

    fn key() -> HostEvent {
        HostEvent::Key(KeyEvent {
            state: KeyState::Released,
            key: 27,
        })
    }

    #[test]
    fn desktop_ignores_touch() {
        assert_eq!(Desktop.audience(&touch()), None, "desktop does not route touch");
        assert_eq!(
            Desktop.audience(&key()),
            Some(Audience::Active),
            "keys go to active layers"
        );
        assert_eq!(
            Desktop.audience(&HostEvent::WindowResized(Size::new(640.0, 480.0))),
            Some(Audience::Setup),
            "resize goes to set-up layers"
        );
    }

    #[test]
    fn touch_ignores_keyboard_and_lifecycle() {
        assert_eq!(Touch.audience(&key()), None, "touch profile does not route keys");
        assert_eq!(
            Touch.audience(&HostEvent::Lifecycle(LifecycleEvent::Pause)),
            None,
            "lifecycle needs the mobile wrapper"
        );
        assert_eq!(
            Touch.audience(&touch()),
            Some(Audience::Active),
            "touch goes to active layers"
        );
    }

    #[test]
    fn mobile_adds_lifecycle() {
        let profile = Mobile(Touch);
        assert_eq!(
            profile.audience(&HostEvent::Lifecycle(LifecycleEvent::BackPressed)),
            Some(Audience::FirstActive),
            "back pressed is answered by one layer"
        );
        assert_eq!(
            profile.audience(&HostEvent::Lifecycle(LifecycleEvent::Resume)),
            Some(Audience::Setup),
            "resume reaches set-up layers"
        );
        assert_eq!(profile.audience(&key()), None, "inner profile still filters keys");
    }

    #[test]
    fn frame_events_are_never_routed_by_profiles() {
        assert_eq!(Desktop.audience(&HostEvent::Update), None, "update is not input");
        assert_eq!(Mobile(Desktop).audience(&HostEvent::Draw), None, "draw is not input");
    }
}
