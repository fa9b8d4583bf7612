// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the layer manager: handles, state flags, topics, and requests.
//!
//! ## Overview
//!
//! These types describe the transition protocol and the manager's subscription surface.
//! They are referenced by the [`manager`](crate::manager) and by concrete layers through
//! [`Context`](crate::layer::Context).

use alloc::string::String;

/// Identifier for a layer registered with a [`LayerManager`](crate::manager::LayerManager).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On registration, a fresh slot is allocated with generation `1`.
/// - When the sweep (or [`LayerManager::exit`](crate::manager::LayerManager::exit)) destroys
///   the layer, the slot is freed and every `LayerId` pointing at it becomes stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `LayerId`.
///
/// Stale handles never alias a different live layer because the generation must match.
/// Use [`LayerManager::is_alive`](crate::manager::LayerManager::is_alive) to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LayerId(pub(crate) u32, pub(crate) u32);

impl LayerId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the generation counter (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Lifecycle state of a registered layer.
    ///
    /// The manager owns these flags; layers observe them only indirectly through which
    /// hooks are called.
    ///
    /// - [`SETUP`](Self::SETUP) is set once, right after the first `setup` hook, and never cleared.
    /// - [`ACTIVE`](Self::ACTIVE) is set after each `activate` hook and cleared after `deactivate`.
    /// - [`DEAD`](Self::DEAD) is set by a delete request and never cleared; the next sweep
    ///   destroys the layer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LayerFlags: u8 {
        /// One-time initialization has run.
        const SETUP  = 0b0000_0001;
        /// The layer receives update, draw, and input dispatch.
        const ACTIVE = 0b0000_0010;
        /// The layer is scheduled for teardown on the next sweep.
        const DEAD   = 0b0000_0100;
    }
}

impl LayerFlags {
    /// Returns true once the layer's `setup` hook has run.
    #[inline]
    pub fn is_setup(self) -> bool {
        self.contains(Self::SETUP)
    }

    /// Returns true while the layer receives per-frame and input dispatch.
    #[inline]
    pub fn is_active(self) -> bool {
        self.contains(Self::ACTIVE)
    }

    /// Returns true once the layer has been scheduled for teardown.
    #[inline]
    pub fn is_dead(self) -> bool {
        self.contains(Self::DEAD)
    }
}

bitflags::bitflags! {
    /// Host notification topics the manager subscribes to.
    ///
    /// See [`EventSource`](crate::source::EventSource) and
    /// [`InputProfile::topics`](crate::profile::InputProfile::topics).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Topics: u16 {
        /// Per-frame update.
        const UPDATE    = 0b0000_0000_0001;
        /// Per-frame draw.
        const DRAW      = 0b0000_0000_0010;
        /// Application exit.
        const EXIT      = 0b0000_0000_0100;
        /// Touch down/moved/up/double-tap/cancelled.
        const TOUCH     = 0b0000_0000_1000;
        /// Mouse pressed/released/moved/dragged.
        const POINTER   = 0b0000_0001_0000;
        /// Key pressed/released.
        const KEY       = 0b0000_0010_0000;
        /// Window resize.
        const WINDOW    = 0b0000_0100_0000;
        /// Platform lifecycle (pause, resume, focus, memory, back and menu buttons, ...).
        const LIFECYCLE = 0b0000_1000_0000;

        /// The application set toggled by
        /// [`LayerManager::enable`](crate::manager::LayerManager::enable) and
        /// [`LayerManager::disable`](crate::manager::LayerManager::disable).
        const APP = Self::UPDATE.bits() | Self::DRAW.bits() | Self::EXIT.bits();
        /// The desktop input set.
        const DESKTOP = Self::POINTER.bits() | Self::KEY.bits() | Self::WINDOW.bits();
    }
}

/// Which state change a [`LayerRequest`] asks for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RequestKind {
    /// Lazily set up the target, then activate it.
    Activate,
    /// Deactivate the target.
    Deactivate,
    /// Deactivate every other set-up layer, then set up and activate the target.
    Switch,
    /// Mark the target dead; the next sweep destroys it.
    Delete,
}

/// A transition request, resolved by name against the manager's registry.
///
/// Requests are issued through [`Context`](crate::layer::Context) by layers, or by the host
/// through the manager's transition methods. The `sender` is the issuing layer's name, or
/// `None` when the host issued the request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LayerRequest {
    /// Requested state change.
    pub kind: RequestKind,
    /// Name of the layer the request applies to.
    pub target: String,
    /// Name of the issuing layer, if any.
    pub sender: Option<String>,
    /// Optional payload for the target (only switch requests carry one).
    pub message: Option<String>,
}

impl LayerRequest {
    /// Create a request without a message.
    pub fn new(kind: RequestKind, target: impl Into<String>, sender: Option<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            sender,
            message: None,
        }
    }

    /// Attach a message to the request.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Which registered layers receive an input or platform event.
///
/// Chosen per event by [`InputProfile::audience`](crate::profile::InputProfile::audience).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Audience {
    /// Every active layer, in registry order.
    Active,
    /// Every layer whose setup has run, whether or not it is active.
    Setup,
    /// Only the first active layer in registry order; its answer is returned to the host.
    FirstActive,
}

/// What to do when a layer is added under a name that is already registered.
///
/// Set with [`LayerManager::set_duplicate_policy`](crate::manager::LayerManager::set_duplicate_policy).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DuplicatePolicy {
    /// Refuse the new layer with [`AddLayerError::DuplicateName`](crate::error::AddLayerError::DuplicateName).
    #[default]
    Reject,
    /// Tear down and remove the registered layer, then register the new one.
    Replace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_flags_default_is_uninitialized() {
        let flags = LayerFlags::default();
        assert!(!flags.is_setup(), "fresh layers have not been set up");
        assert!(!flags.is_active(), "fresh layers are inactive");
        assert!(!flags.is_dead(), "fresh layers are alive");
    }

    #[test]
    fn layer_flags_accessors_match_bits() {
        let flags = LayerFlags::SETUP | LayerFlags::DEAD;
        assert!(flags.is_setup(), "SETUP bit is reported");
        assert!(!flags.is_active(), "ACTIVE bit is not set");
        assert!(flags.is_dead(), "DEAD bit is reported");
    }

    #[test]
    fn topic_sets_are_disjoint() {
        assert!(
            !Topics::APP.intersects(Topics::DESKTOP),
            "app and desktop sets must not overlap"
        );
        assert!(
            !Topics::DESKTOP.contains(Topics::TOUCH),
            "touch is not part of the desktop set"
        );
        assert_eq!(
            Topics::APP,
            Topics::UPDATE | Topics::DRAW | Topics::EXIT,
            "app set is update, draw, and exit"
        );
    }

    #[test]
    fn request_builder_carries_message() {
        let req = LayerRequest::new(RequestKind::Switch, "Game", Some("Menu".into()))
            .with_message("level-2");
        assert_eq!(req.target, "Game", "target is kept");
        assert_eq!(req.sender.as_deref(), Some("Menu"), "sender is kept");
        assert_eq!(req.message.as_deref(), Some("level-2"), "message is attached");
    }
}
