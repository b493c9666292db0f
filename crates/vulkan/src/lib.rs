// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Obsidian Vulkan
//!
//! Owned, memory-safe wrappers over the raw Vulkan API as loaded by [`ash`].
//!
//! Every wrapper is the same shape: it holds a native handle plus whatever
//! parent state is needed to release it, and it exposes a consuming
//! `destroy(self)`.  Construction always goes through a factory on the parent
//! object ([`loader::Vulkan`] creates [`instance::Instance`], `Instance` finds
//! [`physical_device::PhysicalDevice`]s, which create [`device::Device`]s,
//! which create everything else), so a wrapper can never exist without its
//! parent's function tables.
//!
//! Policy stays with the application: pipeline construction strategy,
//! descriptor management, synchronization design, and memory allocation are
//! all pass-through.  This crate only makes the raw API safe to hold.

pub mod buffer;
pub mod command;
pub mod debug;
pub mod descriptors;
pub mod device;
pub mod image;
pub mod instance;
pub mod loader;
pub mod memory;
pub mod object;
pub mod physical_device;
pub mod pipeline;
pub mod query;
pub mod queue;
pub mod result;
pub mod surface;
pub mod swapchain;
pub mod sync;

mod enumerate;
mod scratch;

use ash::vk;

pub mod prelude {
    pub use crate::VulkanError;
    pub use crate::VulkanResult;
    pub use crate::device::Device;
    pub use crate::instance::Instance;
    pub use crate::loader::Vulkan;
    pub use crate::object::VulkanObject;
    pub use crate::physical_device::PhysicalDevice;
    pub use crate::result::StatusValue;
    pub use crate::sync::SemaphoreKind;
}

pub type VulkanResult<T> = Result<T, VulkanError>;

#[derive(thiserror::Error, Debug)]
pub enum VulkanError {
    /// A native call returned a code outside the success and expected
    /// non-error sets of the operation that issued it.
    #[error("{message} ({status:?})")]
    Api {
        status: vk::Result,
        message: &'static str,
    },

    /// Programmer error caught before any native call was issued.
    #[error("precondition violated: {0}")]
    Precondition(&'static str),

    /// The Vulkan library could not be located or loaded.
    #[error("Vulkan loader: {0}")]
    Load(#[from] ash::LoadingError),

    /// A string destined for the native API contains an interior NUL byte.
    #[error("{0} contains an interior NUL byte")]
    InvalidName(&'static str),
}

impl VulkanError {
    /// The raw status code, when the failure came from a native call.
    pub fn status(&self) -> Option<vk::Result> {
        match self {
            VulkanError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
