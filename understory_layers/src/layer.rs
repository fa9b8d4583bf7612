// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Layer`] trait and the [`Context`] handed to every hook.
//!
//! ## Hooks
//!
//! Every hook has a no-op default, so a concrete layer overrides only what it needs.
//! Hooks are called by the [`LayerManager`](crate::manager::LayerManager) only; layers
//! never call each other.
//!
//! ## Requests
//!
//! A layer changes its own state, or a sibling's, by issuing a request through the
//! [`Context`]. Requests name their target; the manager resolves the name when it
//! applies the request, so a layer never holds a reference to another layer. Requests
//! issued during a hook are applied in issue order as soon as the hook returns, before the
//! manager dispatches to any other layer. Unknown names are ignored.
//!
//! ```
//! use understory_layers::layer::{Context, Layer};
//!
//! struct Splash {
//!     frames: u32,
//! }
//!
//! impl Layer for Splash {
//!     fn name(&self) -> &str {
//!         "Splash"
//!     }
//!
//!     fn update(&mut self, cx: &mut Context<'_>) {
//!         self.frames += 1;
//!         if self.frames == 90 {
//!             cx.switch_layer("Menu");
//!             cx.delete_self();
//!         }
//!     }
//! }
//! ```

use alloc::collections::VecDeque;
use alloc::string::{String, ToString};

use kurbo::Size;

use crate::event::{KeyEvent, LifecycleEvent, PointerEvent, TouchEvent};
use crate::types::{LayerRequest, RequestKind};

/// A named, independently activatable unit of application behavior.
///
/// `D` is the shared application data lent to every hook through [`Context::shared`].
pub trait Layer<D = ()> {
    /// Identity of the layer; read once at registration and used as the registry key.
    fn name(&self) -> &str;

    /// One-time initialization, run lazily right before the first activation.
    fn setup(&mut self, cx: &mut Context<'_, D>) {
        _ = cx;
    }

    /// Per-frame update while active.
    fn update(&mut self, cx: &mut Context<'_, D>) {
        _ = cx;
    }

    /// Per-frame draw while active.
    fn draw(&mut self, cx: &mut Context<'_, D>) {
        _ = cx;
    }

    /// Teardown, run once before the layer is destroyed if its setup ever ran.
    fn exit(&mut self, cx: &mut Context<'_, D>) {
        _ = cx;
    }

    /// The layer is becoming active. The manager sets the active flag after this returns.
    ///
    /// Also called again when an already-active layer is activated.
    fn activate(&mut self, cx: &mut Context<'_, D>) {
        _ = cx;
    }

    /// The layer is leaving the active state. The manager clears the active flag after
    /// this returns.
    fn deactivate(&mut self, cx: &mut Context<'_, D>) {
        _ = cx;
    }

    /// Touch input while active.
    fn touch(&mut self, event: &TouchEvent, cx: &mut Context<'_, D>) {
        _ = (event, cx);
    }

    /// Mouse input while active.
    fn pointer(&mut self, event: &PointerEvent, cx: &mut Context<'_, D>) {
        _ = (event, cx);
    }

    /// Keyboard input while active.
    fn key(&mut self, event: &KeyEvent, cx: &mut Context<'_, D>) {
        _ = (event, cx);
    }

    /// The window was resized. Delivered to every set-up layer, active or not.
    fn window_resized(&mut self, size: Size, cx: &mut Context<'_, D>) {
        _ = (size, cx);
    }

    /// Platform lifecycle notification.
    ///
    /// The return value answers question-style events
    /// ([`LifecycleEvent::BackPressed`], menu items, dialog buttons); it is ignored for the
    /// others.
    fn lifecycle(&mut self, event: &LifecycleEvent, cx: &mut Context<'_, D>) -> bool {
        _ = (event, cx);
        false
    }
}

/// Manager-provided handle passed to every [`Layer`] hook.
///
/// Gives access to the shared application data and queues transition requests on behalf
/// of the layer being called.
pub struct Context<'a, D = ()> {
    name: &'a str,
    shared: &'a mut D,
    outbox: &'a mut VecDeque<LayerRequest>,
    cause: Option<&'a LayerRequest>,
}

impl<D> core::fmt::Debug for Context<'_, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Context")
            .field("name", &self.name)
            .field("pending", &self.outbox.len())
            .field("cause", &self.cause)
            .finish_non_exhaustive()
    }
}

impl<'a, D> Context<'a, D> {
    pub(crate) fn new(
        name: &'a str,
        shared: &'a mut D,
        outbox: &'a mut VecDeque<LayerRequest>,
        cause: Option<&'a LayerRequest>,
    ) -> Self {
        Self {
            name,
            shared,
            outbox,
            cause,
        }
    }

    /// Name of the layer this hook runs for.
    pub fn layer_name(&self) -> &str {
        self.name
    }

    /// Shared application data.
    pub fn shared(&self) -> &D {
        self.shared
    }

    /// Shared application data, mutably.
    pub fn shared_mut(&mut self) -> &mut D {
        self.shared
    }

    /// The request that triggered this hook, if any.
    ///
    /// Set for `setup`, `activate`, and `deactivate` hooks run while applying a request;
    /// `None` for frame, input, and teardown hooks.
    pub fn cause(&self) -> Option<&LayerRequest> {
        self.cause
    }

    /// The message carried by the triggering switch request, if any.
    pub fn message(&self) -> Option<&str> {
        self.cause.and_then(|c| c.message.as_deref())
    }

    /// Deactivate every other set-up layer, then set up (if needed) and activate `name`.
    pub fn switch_layer(&mut self, name: impl Into<String>) {
        self.push(RequestKind::Switch, name.into(), None);
    }

    /// Like [`switch_layer`](Self::switch_layer), handing `message` to the target.
    ///
    /// The target reads it through [`Context::message`] in its `setup` or `activate` hook.
    pub fn switch_layer_with_message(
        &mut self,
        name: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(RequestKind::Switch, name.into(), Some(message.into()));
    }

    /// Set up (if needed) and activate `name`, leaving other layers as they are.
    pub fn activate_layer(&mut self, name: impl Into<String>) {
        self.push(RequestKind::Activate, name.into(), None);
    }

    /// Deactivate `name`.
    pub fn deactivate_layer(&mut self, name: impl Into<String>) {
        self.push(RequestKind::Deactivate, name.into(), None);
    }

    /// Schedule `name` for teardown on the next sweep. May name the calling layer.
    pub fn delete_layer(&mut self, name: impl Into<String>) {
        self.push(RequestKind::Delete, name.into(), None);
    }

    /// Schedule the calling layer for teardown on the next sweep.
    pub fn delete_self(&mut self) {
        self.push(RequestKind::Delete, self.name.to_string(), None);
    }

    fn push(&mut self, kind: RequestKind, target: String, message: Option<String>) {
        self.outbox.push_back(LayerRequest {
            kind,
            target,
            sender: Some(self.name.to_string()),
            message,
        });
    }
}
