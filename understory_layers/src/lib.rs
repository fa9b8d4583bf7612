// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_layers --heading-base-level=0

//! Understory Layers: named application layers with a deferred lifecycle sweep.
//!
//! ## Overview
//!
//! An application is split into named layers (a menu, a game screen, a settings page).
//! A [`LayerManager`](crate::manager::LayerManager) owns them, tracks which are set up,
//! active, or scheduled for teardown, and forwards host events to the right ones.
//! Layers never hold a reference to the manager. They ask for transitions by name through the
//! [`Context`](crate::layer::Context) handed to every hook.
//!
//! ## Lifecycle
//!
//! Each layer carries three [`LayerFlags`](crate::types::LayerFlags):
//!
//! - `SETUP`: the `setup` hook has run. Setup is lazy and happens at most once, on first activation.
//! - `ACTIVE`: the layer receives `update`, `draw`, and input.
//! - `DEAD`: the layer is destroyed by the next [`update`](crate::manager::LayerManager::update) sweep.
//!   Dead layers are deactivated if active and exited if set up, then dropped.
//!
//! ## Requests
//!
//! - Switch: deactivate every other set-up layer, then set up (if needed) and activate the target.
//!   An optional message is visible to the target's hooks through
//!   [`Context::message`](crate::layer::Context::message).
//! - Activate: set up (if needed) and activate the target; other layers are untouched.
//! - Deactivate: run the target's `deactivate` hook and clear ACTIVE, even if it was not active.
//! - Delete: mark the target dead.
//!
//! Requests naming an unknown layer do nothing. Requests raised inside hooks are queued and
//! applied as soon as the hook returns, before any other layer is visited. Requests raised
//! while a request is being applied are queued behind it: if the `setup` hook of a layer being
//! switched to activates a sibling, the sibling is set up and activated after the switch has
//! activated its target.
//!
//! ## Input
//!
//! An [`InputProfile`](crate::profile::InputProfile), chosen at construction, decides which
//! host [`Topics`](crate::types::Topics) the manager subscribes to through its
//! [`EventSource`](crate::source::EventSource), and which [`Audience`](crate::types::Audience)
//! receives each event: active layers, set-up layers, or the first active layer, whose answer
//! is returned to the host.
//!
//! ## Example
//!
//! ```
//! use understory_layers::layer::{Context, Layer};
//! use understory_layers::manager::LayerManager;
//!
//! struct Menu;
//! impl Layer<u32> for Menu {
//!     fn name(&self) -> &str {
//!         "Menu"
//!     }
//!     fn update(&mut self, cx: &mut Context<'_, u32>) {
//!         cx.switch_layer_with_message("Game", "level-1");
//!     }
//! }
//!
//! struct Game;
//! impl Layer<u32> for Game {
//!     fn name(&self) -> &str {
//!         "Game"
//!     }
//!     fn activate(&mut self, cx: &mut Context<'_, u32>) {
//!         if cx.message() == Some("level-1") {
//!             *cx.shared_mut() = 1;
//!         }
//!     }
//! }
//!
//! let mut layers = LayerManager::new(0_u32);
//! layers.add_layer(Menu).unwrap();
//! layers.add_layer(Game).unwrap();
//! layers.switch_layer("Menu");
//!
//! layers.update();
//! assert_eq!(layers.active_layer_name(), Some("Game"));
//! assert_eq!(*layers.shared_app_data(), 1);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to Kurbo and thiserror.
//! - `libm`: `no_std` float math for Kurbo.
//! - `trace`: delivers lifecycle events to an installed [`TraceSink`](crate::trace::TraceSink).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod error;
pub mod event;
pub mod layer;
pub mod manager;
pub mod profile;
pub mod source;
pub mod trace;
pub mod types;
