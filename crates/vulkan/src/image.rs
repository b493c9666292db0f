// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Image
//!
//! Images come in two flavors: created through the device (owned) and handed
//! out by a swapchain (owned by the swapchain, freed with it).  The wrapper
//! tracks which, so `destroy` on a swapchain image is a safe no-op.

use ash::vk;

use crate::VulkanResult;
use crate::memory::DeviceMemory;
use crate::object::VulkanObject;
use crate::result::CheckResult;

pub struct Image {
    device: ash::Device,
    raw: vk::Image,
    owned: bool,
}

impl Image {
    pub(crate) fn owned(device: ash::Device, raw: vk::Image) -> Self {
        Self {
            device,
            raw,
            owned: true,
        }
    }

    /// A swapchain image: queries work, destruction does not.
    pub(crate) fn external(device: ash::Device, raw: vk::Image) -> Self {
        Self {
            device,
            raw,
            owned: false,
        }
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    pub fn memory_requirements(&self) -> vk::MemoryRequirements {
        let info = vk::ImageMemoryRequirementsInfo2::default().image(self.raw);
        let mut requirements = vk::MemoryRequirements2::default();
        unsafe {
            self.device
                .get_image_memory_requirements2(&info, &mut requirements)
        };
        requirements.memory_requirements
    }

    pub fn bind_memory(
        &self,
        memory: &DeviceMemory,
        offset: vk::DeviceSize,
    ) -> VulkanResult<()> {
        let bind = vk::BindImageMemoryInfo::default()
            .image(self.raw)
            .memory(memory.handle())
            .memory_offset(offset);
        unsafe { self.device.bind_image_memory2(&[bind]) }.check("Failed to bind image memory")
    }

    pub fn destroy(self) {
        if self.owned {
            unsafe { self.device.destroy_image(self.raw, None) };
        }
    }
}

impl VulkanObject for Image {
    type Handle = vk::Image;

    fn handle(&self) -> vk::Image {
        self.raw
    }
}

pub struct ImageView {
    device: ash::Device,
    raw: vk::ImageView,
}

impl ImageView {
    pub(crate) fn new(device: ash::Device, raw: vk::ImageView) -> Self {
        Self { device, raw }
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_image_view(self.raw, None) };
    }
}

impl VulkanObject for ImageView {
    type Handle = vk::ImageView;

    fn handle(&self) -> vk::ImageView {
        self.raw
    }
}

pub struct Sampler {
    device: ash::Device,
    raw: vk::Sampler,
}

impl Sampler {
    pub(crate) fn new(device: ash::Device, raw: vk::Sampler) -> Self {
        Self { device, raw }
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_sampler(self.raw, None) };
    }
}

impl VulkanObject for Sampler {
    type Handle = vk::Sampler;

    fn handle(&self) -> vk::Sampler {
        self.raw
    }
}
