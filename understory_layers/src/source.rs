// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host event source: the subscription side of the host's notification system.
//!
//! The manager tells its source which [`Topics`] it listens to when it is constructed,
//! when [`enable`](crate::manager::LayerManager::enable) /
//! [`disable`](crate::manager::LayerManager::disable) toggle the app set, and when
//! [`exit`](crate::manager::LayerManager::exit) tears everything down. Delivery is the
//! host's job: it calls [`handle_event`](crate::manager::LayerManager::handle_event) for
//! every event on a subscribed topic.

use crate::types::Topics;

/// Subscription interface of the host's event system.
pub trait EventSource {
    /// Start delivering events on `topics`.
    fn subscribe(&mut self, topics: Topics);
    /// Stop delivering events on `topics`.
    fn unsubscribe(&mut self, topics: Topics);
}

/// A source that ignores subscriptions; the host drives the manager directly.
///
/// Used by [`LayerManager::new`](crate::manager::LayerManager::new).
#[derive(Copy, Clone, Debug, Default)]
pub struct Detached;

impl EventSource for Detached {
    #[inline]
    fn subscribe(&mut self, _topics: Topics) {}

    #[inline]
    fn unsubscribe(&mut self, _topics: Topics) {}
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn subscribe(&mut self, topics: Topics) {
        (**self).subscribe(topics);
    }

    fn unsubscribe(&mut self, topics: Topics) {
        (**self).unsubscribe(topics);
    }
}
