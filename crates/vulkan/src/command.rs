// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Command pools and buffers
//!
//! Command buffers belong to their pool; freeing goes through the pool and
//! consumes the wrappers, same as every other release in the crate.

use ash::vk;
use smallvec::SmallVec;

use crate::VulkanResult;
use crate::object::VulkanObject;
use crate::result::CheckResult;

pub struct CommandPool {
    device: ash::Device,
    raw: vk::CommandPool,
}

impl CommandPool {
    pub(crate) fn new(device: ash::Device, raw: vk::CommandPool) -> Self {
        Self { device, raw }
    }

    pub fn allocate_command_buffers(
        &self,
        level: vk::CommandBufferLevel,
        count: u32,
    ) -> VulkanResult<Vec<CommandBuffer>> {
        let info = vk::CommandBufferAllocateInfo::default()
            .command_pool(self.raw)
            .level(level)
            .command_buffer_count(count);
        let raw = unsafe { self.device.allocate_command_buffers(&info) }
            .check("Failed to allocate command buffers")?;
        Ok(raw
            .into_iter()
            .map(|cb| CommandBuffer::new(self.device.clone(), cb))
            .collect())
    }

    pub fn free_command_buffers(&self, buffers: Vec<CommandBuffer>) {
        let handles: SmallVec<vk::CommandBuffer, 8> =
            buffers.iter().map(|b| b.handle()).collect();
        unsafe { self.device.free_command_buffers(self.raw, &handles) };
    }

    pub fn reset(&self, flags: vk::CommandPoolResetFlags) -> VulkanResult<()> {
        unsafe { self.device.reset_command_pool(self.raw, flags) }
            .check("Failed to reset command pool")
    }

    /// Return unused pool memory to the driver.
    pub fn trim(&self) {
        unsafe {
            self.device
                .trim_command_pool(self.raw, vk::CommandPoolTrimFlags::empty())
        };
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_command_pool(self.raw, None) };
    }
}

impl VulkanObject for CommandPool {
    type Handle = vk::CommandPool;

    fn handle(&self) -> vk::CommandPool {
        self.raw
    }
}

/// Pool-owned; freed through [`CommandPool::free_command_buffers`] or along
/// with the pool.
pub struct CommandBuffer {
    device: ash::Device,
    raw: vk::CommandBuffer,
}

impl CommandBuffer {
    pub(crate) fn new(device: ash::Device, raw: vk::CommandBuffer) -> Self {
        Self { device, raw }
    }

    pub fn begin(&self, flags: vk::CommandBufferUsageFlags) -> VulkanResult<()> {
        let info = vk::CommandBufferBeginInfo::default().flags(flags);
        unsafe { self.device.begin_command_buffer(self.raw, &info) }
            .check("Failed to begin command buffer")
    }

    pub fn end(&self) -> VulkanResult<()> {
        unsafe { self.device.end_command_buffer(self.raw) }.check("Failed to end command buffer")
    }

    /// Pool must have been created with `RESET_COMMAND_BUFFER`.
    pub fn reset(&self, flags: vk::CommandBufferResetFlags) -> VulkanResult<()> {
        unsafe { self.device.reset_command_buffer(self.raw, flags) }
            .check("Failed to reset command buffer")
    }
}

impl VulkanObject for CommandBuffer {
    type Handle = vk::CommandBuffer;

    fn handle(&self) -> vk::CommandBuffer {
        self.raw
    }
}
