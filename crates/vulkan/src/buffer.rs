// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Buffer

use ash::vk;

use crate::VulkanResult;
use crate::memory::DeviceMemory;
use crate::object::VulkanObject;
use crate::result::CheckResult;

pub struct Buffer {
    device: ash::Device,
    raw: vk::Buffer,
    size: vk::DeviceSize,
}

impl Buffer {
    pub(crate) fn new(device: ash::Device, raw: vk::Buffer, size: vk::DeviceSize) -> Self {
        Self { device, raw, size }
    }

    pub fn size(&self) -> vk::DeviceSize {
        self.size
    }

    pub fn memory_requirements(&self) -> vk::MemoryRequirements {
        let info = vk::BufferMemoryRequirementsInfo2::default().buffer(self.raw);
        let mut requirements = vk::MemoryRequirements2::default();
        unsafe {
            self.device
                .get_buffer_memory_requirements2(&info, &mut requirements)
        };
        requirements.memory_requirements
    }

    pub fn bind_memory(
        &self,
        memory: &DeviceMemory,
        offset: vk::DeviceSize,
    ) -> VulkanResult<()> {
        let bind = vk::BindBufferMemoryInfo::default()
            .buffer(self.raw)
            .memory(memory.handle())
            .memory_offset(offset);
        unsafe { self.device.bind_buffer_memory2(&[bind]) }
            .check("Failed to bind buffer memory")
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_buffer(self.raw, None) };
    }
}

impl VulkanObject for Buffer {
    type Handle = vk::Buffer;

    fn handle(&self) -> vk::Buffer {
        self.raw
    }
}

pub struct BufferView {
    device: ash::Device,
    raw: vk::BufferView,
}

impl BufferView {
    pub(crate) fn new(device: ash::Device, raw: vk::BufferView) -> Self {
        Self { device, raw }
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_buffer_view(self.raw, None) };
    }
}

impl VulkanObject for BufferView {
    type Handle = vk::BufferView;

    fn handle(&self) -> vk::BufferView {
        self.raw
    }
}
