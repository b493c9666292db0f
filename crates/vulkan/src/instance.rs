// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Instance
//!
//! Owns the `ash::Instance` table plus the instance-level extension tables,
//! resolved eagerly at construction.  Calling into an extension the instance
//! did not enable is the caller's contract with Vulkan, same as in the raw
//! API.

use std::sync::Arc;

use ash::vk;

use crate::VulkanResult;
use crate::debug::{DebugMessage, DebugMessenger};
use crate::enumerate::read_vec;
use crate::object::VulkanObject;
use crate::physical_device::PhysicalDevice;
#[cfg(feature = "winit")]
use crate::result::CheckResult;
#[cfg(feature = "winit")]
use crate::surface::Surface;

pub struct Instance {
    entry: ash::Entry,
    raw: ash::Instance,
    surface_fn: ash::khr::surface::Instance,
    debug_utils_fn: ash::ext::debug_utils::Instance,
}

impl Instance {
    pub(crate) fn new(entry: ash::Entry, raw: ash::Instance) -> Self {
        let surface_fn = ash::khr::surface::Instance::new(&entry, &raw);
        let debug_utils_fn = ash::ext::debug_utils::Instance::new(&entry, &raw);
        Self {
            entry,
            raw,
            surface_fn,
            debug_utils_fn,
        }
    }

    pub fn enumerate_physical_devices(&self) -> VulkanResult<Vec<PhysicalDevice>> {
        let fp = self.raw.fp_v1_0().enumerate_physical_devices;
        let instance = self.raw.handle();
        let handles = read_vec(
            |count, data| unsafe { fp(instance, count, data) },
            "Failed to enumerate physical devices",
        )?;

        Ok(handles
            .into_iter()
            .map(|handle| {
                PhysicalDevice::new(self.raw.clone(), self.surface_fn.clone(), handle)
            })
            .collect())
    }

    /// Install a debug messenger whose callback runs on whichever thread the
    /// driver emits from.  [`crate::debug::log_message`] is a ready-made
    /// callback that forwards to the `log` facade.
    pub fn create_debug_messenger(
        &self,
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
        types: vk::DebugUtilsMessageTypeFlagsEXT,
        callback: impl Fn(&DebugMessage) + Send + Sync + 'static,
    ) -> VulkanResult<DebugMessenger> {
        DebugMessenger::create(
            self.debug_utils_fn.clone(),
            severity,
            types,
            Arc::new(callback),
        )
    }

    /// Create a surface for a winit window. The window must outlive the
    /// surface.
    #[cfg(feature = "winit")]
    pub fn create_surface_for_window(
        &self,
        window: &winit::window::Window,
    ) -> VulkanResult<Surface> {
        use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

        let display = window
            .display_handle()
            .map_err(|_| crate::VulkanError::Precondition("window has no display handle"))?
            .as_raw();
        let handle = window
            .window_handle()
            .map_err(|_| crate::VulkanError::Precondition("window has no window handle"))?
            .as_raw();
        self.create_surface(display, handle)
    }

    /// Create a surface from raw handles. The window must outlive the
    /// surface.
    #[cfg(feature = "winit")]
    pub fn create_surface(
        &self,
        display: raw_window_handle::RawDisplayHandle,
        window: raw_window_handle::RawWindowHandle,
    ) -> VulkanResult<Surface> {
        let raw = unsafe {
            ash_window::create_surface(&self.entry, &self.raw, display, window, None)
        }
        .check("Failed to create a window surface")?;
        Ok(Surface::new(self.surface_fn.clone(), raw))
    }

    pub fn raw(&self) -> &ash::Instance {
        &self.raw
    }

    pub fn destroy(self) {
        unsafe { self.raw.destroy_instance(None) };
    }
}

impl VulkanObject for Instance {
    type Handle = vk::Instance;

    fn handle(&self) -> vk::Instance {
        self.raw.handle()
    }
}
