// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Object identity
//!
//! Every wrapper exposes its handle, object type, and raw handle value the
//! same way.  The object type comes from ash's handle metadata, so it can
//! never drift from the handle type.

use ash::vk;

pub trait VulkanObject {
    type Handle: vk::Handle + Copy;

    /// The native handle. Valid until `destroy` consumes the wrapper.
    fn handle(&self) -> Self::Handle;

    fn object_type(&self) -> vk::ObjectType {
        <Self::Handle as vk::Handle>::TYPE
    }

    /// The handle as the u64 the debug-utils API wants.
    fn raw(&self) -> u64 {
        vk::Handle::as_raw(self.handle())
    }
}
