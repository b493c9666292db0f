// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Surface
//!
//! The surface owns its `khr::surface` function table, so destruction never
//! needs the instance wrapper back.

use ash::vk;

use crate::object::VulkanObject;
#[cfg(feature = "winit")]
use crate::{VulkanError, VulkanResult, result::CheckResult};

pub struct Surface {
    surface_fn: ash::khr::surface::Instance,
    raw: vk::SurfaceKHR,
}

impl Surface {
    pub(crate) fn new(surface_fn: ash::khr::surface::Instance, raw: vk::SurfaceKHR) -> Self {
        Self { surface_fn, raw }
    }

    pub fn destroy(self) {
        unsafe { self.surface_fn.destroy_surface(self.raw, None) };
    }
}

impl VulkanObject for Surface {
    type Handle = vk::SurfaceKHR;

    fn handle(&self) -> vk::SurfaceKHR {
        self.raw
    }
}

/// The instance extensions a surface for `display` needs.
#[cfg(feature = "winit")]
pub fn required_extensions(
    display: raw_window_handle::RawDisplayHandle,
) -> VulkanResult<Vec<&'static str>> {
    let names = ash_window::enumerate_required_extensions(display)
        .check("Failed to list required surface extensions")?;
    names
        .iter()
        .map(|ptr| {
            unsafe { std::ffi::CStr::from_ptr(*ptr) }
                .to_str()
                .map_err(|_| VulkanError::Precondition("extension name is not UTF-8"))
        })
        .collect()
}
