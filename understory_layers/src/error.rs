// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration errors.

use alloc::string::String;

/// Why [`LayerManager::add_layer`](crate::manager::LayerManager::add_layer) refused a layer.
///
/// The refused layer is dropped without any of its hooks running.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AddLayerError {
    /// The layer reported an empty name.
    #[error("layer name must not be empty")]
    EmptyName,
    /// A layer with this name is already registered and the policy is
    /// [`DuplicatePolicy::Reject`](crate::types::DuplicatePolicy::Reject).
    #[error("a layer named `{0}` is already registered")]
    DuplicateName(String),
}
