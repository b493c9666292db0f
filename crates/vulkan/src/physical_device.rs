// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Physical device
//!
//! A non-owning view: physical devices belong to the instance and are never
//! destroyed through here.  Queries plus the [`Device`] factory.

use std::ptr;

use ash::vk;
use smallvec::SmallVec;

use crate::VulkanResult;
use crate::device::Device;
use crate::enumerate::read_vec;
use crate::object::VulkanObject;
use crate::result::CheckResult;
use crate::scratch::Scratch;
use crate::surface::Surface;

pub struct PhysicalDevice {
    instance: ash::Instance,
    surface_fn: ash::khr::surface::Instance,
    raw: vk::PhysicalDevice,
}

/// Core features plus the 1.2 and 1.3 feature blocks, queried as one chain.
pub struct DeviceFeatures {
    pub core: vk::PhysicalDeviceFeatures,
    pub vulkan12: vk::PhysicalDeviceVulkan12Features<'static>,
    pub vulkan13: vk::PhysicalDeviceVulkan13Features<'static>,
}

/// One entry per queue create info; `priorities` also fixes the queue count.
pub struct QueueRequest<'a> {
    pub family_index: u32,
    pub priorities: &'a [f32],
}

pub struct DeviceDescriptor<'a> {
    pub queues: &'a [QueueRequest<'a>],
    pub enabled_extensions: &'a [&'a str],
    pub features: vk::PhysicalDeviceFeatures,
    pub features12: vk::PhysicalDeviceVulkan12Features<'static>,
    pub features13: vk::PhysicalDeviceVulkan13Features<'static>,
}

impl Default for DeviceDescriptor<'_> {
    fn default() -> Self {
        Self {
            queues: &[],
            enabled_extensions: &[],
            features: vk::PhysicalDeviceFeatures::default(),
            features12: vk::PhysicalDeviceVulkan12Features::default(),
            features13: vk::PhysicalDeviceVulkan13Features::default(),
        }
    }
}

impl PhysicalDevice {
    pub(crate) fn new(
        instance: ash::Instance,
        surface_fn: ash::khr::surface::Instance,
        raw: vk::PhysicalDevice,
    ) -> Self {
        Self {
            instance,
            surface_fn,
            raw,
        }
    }

    pub fn properties(&self) -> vk::PhysicalDeviceProperties {
        unsafe { self.instance.get_physical_device_properties(self.raw) }
    }

    pub fn properties2(&self) -> vk::PhysicalDeviceProperties2<'static> {
        let mut properties = vk::PhysicalDeviceProperties2::default();
        unsafe {
            self.instance
                .get_physical_device_properties2(self.raw, &mut properties)
        };
        properties
    }

    pub fn features(&self) -> DeviceFeatures {
        let mut vulkan12 = vk::PhysicalDeviceVulkan12Features::default();
        let mut vulkan13 = vk::PhysicalDeviceVulkan13Features::default();
        let mut features = vk::PhysicalDeviceFeatures2::default()
            .push_next(&mut vulkan12)
            .push_next(&mut vulkan13);
        unsafe {
            self.instance
                .get_physical_device_features2(self.raw, &mut features)
        };
        let core = features.features;

        // Detach the chain before handing the blocks out.
        vulkan12.p_next = ptr::null_mut();
        vulkan13.p_next = ptr::null_mut();
        DeviceFeatures {
            core,
            vulkan12,
            vulkan13,
        }
    }

    pub fn memory_properties(&self) -> vk::PhysicalDeviceMemoryProperties {
        unsafe { self.instance.get_physical_device_memory_properties(self.raw) }
    }

    pub fn queue_family_properties(&self) -> VulkanResult<Vec<vk::QueueFamilyProperties>> {
        let fp = self.instance.fp_v1_0().get_physical_device_queue_family_properties;
        let device = self.raw;
        read_vec(
            |count, data| {
                unsafe { fp(device, count, data) };
                vk::Result::SUCCESS
            },
            "Failed to get queue family properties",
        )
    }

    pub fn format_properties(&self, format: vk::Format) -> vk::FormatProperties {
        unsafe {
            self.instance
                .get_physical_device_format_properties(self.raw, format)
        }
    }

    /// Checked query: an unsupported combination is an error carrying
    /// `ERROR_FORMAT_NOT_SUPPORTED`.
    pub fn image_format_properties(
        &self,
        info: &vk::PhysicalDeviceImageFormatInfo2,
    ) -> VulkanResult<vk::ImageFormatProperties2<'static>> {
        let mut properties = vk::ImageFormatProperties2::default();
        unsafe {
            self.instance
                .get_physical_device_image_format_properties2(self.raw, info, &mut properties)
        }
        .check("Image format combination not supported")?;
        Ok(properties)
    }

    pub fn enumerate_device_extension_properties(
        &self,
    ) -> VulkanResult<Vec<vk::ExtensionProperties>> {
        let fp = self.instance.fp_v1_0().enumerate_device_extension_properties;
        let device = self.raw;
        read_vec(
            |count, data| unsafe { fp(device, ptr::null(), count, data) },
            "Failed to enumerate device extensions",
        )
    }

    pub fn surface_capabilities(
        &self,
        surface: &Surface,
    ) -> VulkanResult<vk::SurfaceCapabilitiesKHR> {
        unsafe {
            self.surface_fn
                .get_physical_device_surface_capabilities(self.raw, surface.handle())
        }
        .check("Failed to get surface capabilities")
    }

    pub fn surface_formats(&self, surface: &Surface) -> VulkanResult<Vec<vk::SurfaceFormatKHR>> {
        let fp = self.surface_fn.fp().get_physical_device_surface_formats_khr;
        let device = self.raw;
        let surface = surface.handle();
        read_vec(
            |count, data| unsafe { fp(device, surface, count, data) },
            "Failed to get surface formats",
        )
    }

    pub fn surface_present_modes(
        &self,
        surface: &Surface,
    ) -> VulkanResult<Vec<vk::PresentModeKHR>> {
        let fp = self
            .surface_fn
            .fp()
            .get_physical_device_surface_present_modes_khr;
        let device = self.raw;
        let surface = surface.handle();
        read_vec(
            |count, data| unsafe { fp(device, surface, count, data) },
            "Failed to get surface present modes",
        )
    }

    pub fn surface_support(&self, queue_family_index: u32, surface: &Surface) -> VulkanResult<bool> {
        unsafe {
            self.surface_fn.get_physical_device_surface_support(
                self.raw,
                queue_family_index,
                surface.handle(),
            )
        }
        .check("Failed to query surface support")
    }

    pub fn create_device(&self, descriptor: &DeviceDescriptor) -> VulkanResult<Device> {
        let mut scratch = Scratch::new();
        let extensions =
            scratch.cstr_array(descriptor.enabled_extensions, "device extension name")?;

        let queue_infos: SmallVec<vk::DeviceQueueCreateInfo, 4> = descriptor
            .queues
            .iter()
            .map(|request| vk::DeviceQueueCreateInfo {
                queue_family_index: request.family_index,
                queue_count: request.priorities.len() as u32,
                p_queue_priorities: request.priorities.as_ptr(),
                ..Default::default()
            })
            .collect();

        let mut features12 = descriptor.features12;
        let mut features13 = descriptor.features13;
        let create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&extensions)
            .enabled_features(&descriptor.features)
            .push_next(&mut features12)
            .push_next(&mut features13);

        let raw = unsafe { self.instance.create_device(self.raw, &create_info, None) }
            .check("Failed to create a device")?;
        Ok(Device::new(self.instance.clone(), raw))
    }
}

impl VulkanObject for PhysicalDevice {
    type Handle = vk::PhysicalDevice;

    fn handle(&self) -> vk::PhysicalDevice {
        self.raw
    }
}
