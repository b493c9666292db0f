// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Library loader
//!
//! [`Vulkan`] wraps `ash::Entry`: the dynamically loaded library plus the
//! global-level commands.  Everything above it hangs off the [`Instance`] it
//! creates.  The library unloads when the last clone of the entry drops, so
//! there is nothing to destroy here.

use std::ptr;

use ash::vk;

use crate::VulkanResult;
use crate::enumerate::read_vec;
use crate::instance::Instance;
use crate::result::CheckResult;
use crate::scratch::Scratch;

pub const PORTABILITY_ENUMERATION_EXTENSION: &str = "VK_KHR_portability_enumeration";

pub struct Vulkan {
    entry: ash::Entry,
}

/// Everything `create_instance` needs. `Default` gives an empty, unnamed
/// Vulkan 1.3 instance.
pub struct InstanceDescriptor<'a> {
    pub application_name: Option<&'a str>,
    pub application_version: u32,
    pub engine_name: Option<&'a str>,
    pub engine_version: u32,
    pub api_version: u32,
    pub enabled_layers: &'a [&'a str],
    pub enabled_extensions: &'a [&'a str],
}

impl Default for InstanceDescriptor<'_> {
    fn default() -> Self {
        Self {
            application_name: None,
            application_version: 0,
            engine_name: None,
            engine_version: 0,
            api_version: vk::API_VERSION_1_3,
            enabled_layers: &[],
            enabled_extensions: &[],
        }
    }
}

impl Vulkan {
    /// Load the Vulkan library from the platform's usual locations.
    pub fn load() -> VulkanResult<Self> {
        let entry = unsafe { ash::Entry::load() }?;
        Ok(Self { entry })
    }

    /// The highest instance-level API version the loader supports.
    pub fn instance_version(&self) -> VulkanResult<u32> {
        // Vulkan 1.0 loaders predate the query and report through its absence.
        Ok(unsafe { self.entry.try_enumerate_instance_version() }
            .check("Failed to query the instance version")?
            .unwrap_or(vk::API_VERSION_1_0))
    }

    pub fn enumerate_instance_extension_properties(
        &self,
    ) -> VulkanResult<Vec<vk::ExtensionProperties>> {
        let fp = self.entry.fp_v1_0().enumerate_instance_extension_properties;
        read_vec(
            |count, data| unsafe { fp(ptr::null(), count, data) },
            "Failed to enumerate instance extensions",
        )
    }

    pub fn enumerate_instance_layer_properties(&self) -> VulkanResult<Vec<vk::LayerProperties>> {
        let fp = self.entry.fp_v1_0().enumerate_instance_layer_properties;
        read_vec(
            |count, data| unsafe { fp(count, data) },
            "Failed to enumerate instance layers",
        )
    }

    pub fn create_instance(&self, descriptor: &InstanceDescriptor) -> VulkanResult<Instance> {
        let mut scratch = Scratch::new();

        let application_name = match descriptor.application_name {
            Some(name) => scratch.cstr(name, "application name")?,
            None => ptr::null(),
        };
        let engine_name = match descriptor.engine_name {
            Some(name) => scratch.cstr(name, "engine name")?,
            None => ptr::null(),
        };
        let layers = scratch.cstr_array(descriptor.enabled_layers, "layer name")?;
        let extensions = scratch.cstr_array(descriptor.enabled_extensions, "extension name")?;

        let application_info = vk::ApplicationInfo {
            p_application_name: application_name,
            application_version: descriptor.application_version,
            p_engine_name: engine_name,
            engine_version: descriptor.engine_version,
            api_version: descriptor.api_version,
            ..Default::default()
        };

        let create_info = vk::InstanceCreateInfo {
            flags: instance_flags(descriptor.enabled_extensions),
            p_application_info: &application_info,
            enabled_layer_count: layers.len() as u32,
            pp_enabled_layer_names: layers.as_ptr(),
            enabled_extension_count: extensions.len() as u32,
            pp_enabled_extension_names: extensions.as_ptr(),
            ..Default::default()
        };

        let raw = unsafe { self.entry.create_instance(&create_info, None) }
            .check("Failed to create an instance")?;
        Ok(Instance::new(self.entry.clone(), raw))
    }

    pub fn entry(&self) -> &ash::Entry {
        &self.entry
    }
}

/// Requesting portability enumeration (MoltenVK) also requires the matching
/// create flag.
fn instance_flags(enabled_extensions: &[&str]) -> vk::InstanceCreateFlags {
    if enabled_extensions
        .iter()
        .any(|name| *name == PORTABILITY_ENUMERATION_EXTENSION)
    {
        vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
    } else {
        vk::InstanceCreateFlags::empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn portability_extension_sets_the_flag() {
        let flags = instance_flags(&["VK_EXT_debug_utils", PORTABILITY_ENUMERATION_EXTENSION]);
        assert_eq!(flags, vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR);

        let flags = instance_flags(&["VK_EXT_debug_utils"]);
        assert!(flags.is_empty());
    }

    #[test]
    fn descriptor_defaults_to_1_3() {
        let descriptor = InstanceDescriptor::default();
        assert_eq!(descriptor.api_version, vk::API_VERSION_1_3);
        assert!(descriptor.enabled_layers.is_empty());
        assert!(descriptor.application_name.is_none());
    }
}
