// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Device
//!
//! Owns the `ash::Device` table plus the device-level extension tables, and
//! is the factory for every device-owned object.  Create infos are
//! pass-through: what to create is application policy, surviving the call is
//! not.

use std::io;

use ash::vk;

use crate::buffer::{Buffer, BufferView};
use crate::command::CommandPool;
use crate::debug::DebugUtils;
use crate::descriptors::{DescriptorPool, DescriptorSetLayout};
use crate::image::{Image, ImageView, Sampler};
use crate::memory::DeviceMemory;
use crate::object::VulkanObject;
use crate::pipeline::{Pipeline, PipelineCache, PipelineLayout, ShaderModule};
use crate::query::QueryPool;
use crate::queue::Queue;
use crate::result::CheckResult;
use crate::swapchain::Swapchain;
use crate::sync::{Event, Fence, Semaphore, SemaphoreKind};
use crate::{VulkanError, VulkanResult};

pub struct Device {
    instance: ash::Instance,
    raw: ash::Device,
    swapchain_fn: ash::khr::swapchain::Device,
}

impl Device {
    pub(crate) fn new(instance: ash::Instance, raw: ash::Device) -> Self {
        let swapchain_fn = ash::khr::swapchain::Device::new(&instance, &raw);
        Self {
            instance,
            raw,
            swapchain_fn,
        }
    }

    /// The queue must have been requested at device creation.
    pub fn queue(&self, family_index: u32, index: u32) -> Queue {
        let raw = unsafe { self.raw.get_device_queue(family_index, index) };
        Queue::new(self.raw.clone(), raw, family_index)
    }

    pub fn create_buffer(&self, info: &vk::BufferCreateInfo) -> VulkanResult<Buffer> {
        let raw = unsafe { self.raw.create_buffer(info, None) }
            .check("Failed to create a buffer")?;
        Ok(Buffer::new(self.raw.clone(), raw, info.size))
    }

    pub fn create_buffer_view(&self, info: &vk::BufferViewCreateInfo) -> VulkanResult<BufferView> {
        let raw = unsafe { self.raw.create_buffer_view(info, None) }
            .check("Failed to create a buffer view")?;
        Ok(BufferView::new(self.raw.clone(), raw))
    }

    pub fn create_image(&self, info: &vk::ImageCreateInfo) -> VulkanResult<Image> {
        let raw = unsafe { self.raw.create_image(info, None) }
            .check("Failed to create an image")?;
        Ok(Image::owned(self.raw.clone(), raw))
    }

    pub fn create_image_view(&self, info: &vk::ImageViewCreateInfo) -> VulkanResult<ImageView> {
        let raw = unsafe { self.raw.create_image_view(info, None) }
            .check("Failed to create an image view")?;
        Ok(ImageView::new(self.raw.clone(), raw))
    }

    pub fn create_sampler(&self, info: &vk::SamplerCreateInfo) -> VulkanResult<Sampler> {
        let raw = unsafe { self.raw.create_sampler(info, None) }
            .check("Failed to create a sampler")?;
        Ok(Sampler::new(self.raw.clone(), raw))
    }

    pub fn create_fence(&self, signaled: bool) -> VulkanResult<Fence> {
        let flags = if signaled {
            vk::FenceCreateFlags::SIGNALED
        } else {
            vk::FenceCreateFlags::empty()
        };
        let info = vk::FenceCreateInfo {
            flags,
            ..Default::default()
        };
        let raw = unsafe { self.raw.create_fence(&info, None) }
            .check("Failed to create a fence")?;
        Ok(Fence::new(self.raw.clone(), raw))
    }

    /// `initial_value` is ignored for binary semaphores.
    pub fn create_semaphore(
        &self,
        kind: SemaphoreKind,
        initial_value: u64,
    ) -> VulkanResult<Semaphore> {
        let semaphore_type = match kind {
            SemaphoreKind::Binary => vk::SemaphoreType::BINARY,
            SemaphoreKind::Timeline => vk::SemaphoreType::TIMELINE,
        };
        let mut type_info = vk::SemaphoreTypeCreateInfo::default()
            .semaphore_type(semaphore_type)
            .initial_value(initial_value);
        let info = vk::SemaphoreCreateInfo::default().push_next(&mut type_info);
        let raw = unsafe { self.raw.create_semaphore(&info, None) }
            .check("Failed to create a semaphore")?;
        Ok(Semaphore::new(self.raw.clone(), raw, kind))
    }

    pub fn create_event(&self) -> VulkanResult<Event> {
        let info = vk::EventCreateInfo::default();
        let raw = unsafe { self.raw.create_event(&info, None) }
            .check("Failed to create an event")?;
        Ok(Event::new(self.raw.clone(), raw))
    }

    pub fn create_command_pool(
        &self,
        queue_family_index: u32,
        flags: vk::CommandPoolCreateFlags,
    ) -> VulkanResult<CommandPool> {
        let info = vk::CommandPoolCreateInfo {
            flags,
            queue_family_index,
            ..Default::default()
        };
        let raw = unsafe { self.raw.create_command_pool(&info, None) }
            .check("Failed to create a command pool")?;
        Ok(CommandPool::new(self.raw.clone(), raw))
    }

    pub fn create_descriptor_pool(
        &self,
        info: &vk::DescriptorPoolCreateInfo,
    ) -> VulkanResult<DescriptorPool> {
        let raw = unsafe { self.raw.create_descriptor_pool(info, None) }
            .check("Failed to create a descriptor pool")?;
        Ok(DescriptorPool::new(self.raw.clone(), raw))
    }

    pub fn create_descriptor_set_layout(
        &self,
        info: &vk::DescriptorSetLayoutCreateInfo,
    ) -> VulkanResult<DescriptorSetLayout> {
        let raw = unsafe { self.raw.create_descriptor_set_layout(info, None) }
            .check("Failed to create a descriptor set layout")?;
        Ok(DescriptorSetLayout::new(self.raw.clone(), raw))
    }

    /// Whether a layout could be created from `info` within device limits.
    pub fn descriptor_set_layout_support(&self, info: &vk::DescriptorSetLayoutCreateInfo) -> bool {
        let mut support = vk::DescriptorSetLayoutSupport::default();
        unsafe { self.raw.get_descriptor_set_layout_support(info, &mut support) };
        support.supported == vk::TRUE
    }

    pub fn create_pipeline_layout(
        &self,
        info: &vk::PipelineLayoutCreateInfo,
    ) -> VulkanResult<PipelineLayout> {
        let raw = unsafe { self.raw.create_pipeline_layout(info, None) }
            .check("Failed to create a pipeline layout")?;
        Ok(PipelineLayout::new(self.raw.clone(), raw))
    }

    pub fn create_pipeline_cache(&self, initial_data: &[u8]) -> VulkanResult<PipelineCache> {
        let info = vk::PipelineCacheCreateInfo {
            initial_data_size: initial_data.len(),
            p_initial_data: initial_data.as_ptr().cast(),
            ..Default::default()
        };
        let raw = unsafe { self.raw.create_pipeline_cache(&info, None) }
            .check("Failed to create a pipeline cache")?;
        Ok(PipelineCache::new(self.raw.clone(), raw))
    }

    pub fn create_shader_module(&self, code: &[u32]) -> VulkanResult<ShaderModule> {
        let info = vk::ShaderModuleCreateInfo {
            code_size: code.len() * 4,
            p_code: code.as_ptr(),
            ..Default::default()
        };
        let raw = unsafe { self.raw.create_shader_module(&info, None) }
            .check("Failed to create a shader module")?;
        Ok(ShaderModule::new(self.raw.clone(), raw))
    }

    /// Convenience for SPIR-V straight from disk; validates alignment, size
    /// and magic before touching the driver.
    pub fn create_shader_module_from_bytes(&self, bytes: &[u8]) -> VulkanResult<ShaderModule> {
        let code = ash::util::read_spv(&mut io::Cursor::new(bytes))
            .map_err(|_| VulkanError::Precondition("shader bytes are not valid SPIR-V"))?;
        self.create_shader_module(&code)
    }

    pub fn create_query_pool(&self, info: &vk::QueryPoolCreateInfo) -> VulkanResult<QueryPool> {
        let raw = unsafe { self.raw.create_query_pool(info, None) }
            .check("Failed to create a query pool")?;
        Ok(QueryPool::new(self.raw.clone(), raw))
    }

    pub fn create_graphics_pipelines(
        &self,
        infos: &[vk::GraphicsPipelineCreateInfo],
        cache: Option<&PipelineCache>,
    ) -> VulkanResult<Vec<Pipeline>> {
        let cache = cache
            .map(|c| c.handle())
            .unwrap_or(vk::PipelineCache::null());
        let raw = unsafe { self.raw.create_graphics_pipelines(cache, infos, None) }
            .map_err(|(_, status)| VulkanError::Api {
                status,
                message: "Failed to create graphics pipelines",
            })?;
        Ok(raw
            .into_iter()
            .map(|p| Pipeline::new(self.raw.clone(), p))
            .collect())
    }

    pub fn create_compute_pipelines(
        &self,
        infos: &[vk::ComputePipelineCreateInfo],
        cache: Option<&PipelineCache>,
    ) -> VulkanResult<Vec<Pipeline>> {
        let cache = cache
            .map(|c| c.handle())
            .unwrap_or(vk::PipelineCache::null());
        let raw = unsafe { self.raw.create_compute_pipelines(cache, infos, None) }
            .map_err(|(_, status)| VulkanError::Api {
                status,
                message: "Failed to create compute pipelines",
            })?;
        Ok(raw
            .into_iter()
            .map(|p| Pipeline::new(self.raw.clone(), p))
            .collect())
    }

    pub fn create_swapchain(&self, info: &vk::SwapchainCreateInfoKHR) -> VulkanResult<Swapchain> {
        let raw = unsafe { self.swapchain_fn.create_swapchain(info, None) }
            .check("Failed to create a swapchain")?;
        Ok(Swapchain::new(
            self.raw.clone(),
            self.swapchain_fn.clone(),
            raw,
        ))
    }

    pub fn allocate_memory(
        &self,
        allocation_size: vk::DeviceSize,
        memory_type_index: u32,
    ) -> VulkanResult<DeviceMemory> {
        let info = vk::MemoryAllocateInfo {
            allocation_size,
            memory_type_index,
            ..Default::default()
        };
        let raw = unsafe { self.raw.allocate_memory(&info, None) }
            .check("Failed to allocate device memory")?;
        Ok(DeviceMemory::new(self.raw.clone(), raw, allocation_size))
    }

    /// Debug-utils helper bound to this device.  Requires the instance to
    /// have enabled `VK_EXT_debug_utils`.
    pub fn debug_utils(&self) -> DebugUtils {
        DebugUtils::new(&self.instance, &self.raw)
    }

    pub fn update_descriptor_sets(
        &self,
        writes: &[vk::WriteDescriptorSet],
        copies: &[vk::CopyDescriptorSet],
    ) {
        unsafe { self.raw.update_descriptor_sets(writes, copies) };
    }

    pub fn wait_idle(&self) -> VulkanResult<()> {
        unsafe { self.raw.device_wait_idle() }.check("Failed to wait for device idle")
    }

    pub fn raw(&self) -> &ash::Device {
        &self.raw
    }

    pub fn destroy(self) {
        unsafe { self.raw.destroy_device(None) };
    }
}

impl VulkanObject for Device {
    type Handle = vk::Device;

    fn handle(&self) -> vk::Device {
        self.raw.handle()
    }
}
