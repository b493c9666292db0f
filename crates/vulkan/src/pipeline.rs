// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Pipelines
//!
//! Shader modules, layouts, caches, and the pipelines themselves.  Pipeline
//! construction strategy is application policy; creation here is
//! pass-through.  The one piece of real logic is cache serialization, where
//! the blob can grow between sizing and reading.

use ash::vk;
use smallvec::SmallVec;

use crate::VulkanResult;
use crate::enumerate::read_blob;
use crate::object::VulkanObject;
use crate::result::CheckResult;

pub struct ShaderModule {
    device: ash::Device,
    raw: vk::ShaderModule,
}

impl ShaderModule {
    pub(crate) fn new(device: ash::Device, raw: vk::ShaderModule) -> Self {
        Self { device, raw }
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_shader_module(self.raw, None) };
    }
}

impl VulkanObject for ShaderModule {
    type Handle = vk::ShaderModule;

    fn handle(&self) -> vk::ShaderModule {
        self.raw
    }
}

pub struct PipelineLayout {
    device: ash::Device,
    raw: vk::PipelineLayout,
}

impl PipelineLayout {
    pub(crate) fn new(device: ash::Device, raw: vk::PipelineLayout) -> Self {
        Self { device, raw }
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_pipeline_layout(self.raw, None) };
    }
}

impl VulkanObject for PipelineLayout {
    type Handle = vk::PipelineLayout;

    fn handle(&self) -> vk::PipelineLayout {
        self.raw
    }
}

pub struct PipelineCache {
    device: ash::Device,
    raw: vk::PipelineCache,
}

impl PipelineCache {
    pub(crate) fn new(device: ash::Device, raw: vk::PipelineCache) -> Self {
        Self { device, raw }
    }

    /// Serialize the cache for persistence.  The driver may keep compiling
    /// into the cache while we read, so the read retries until it gets a
    /// stable snapshot.
    pub fn data(&self) -> VulkanResult<Vec<u8>> {
        let fp = self.device.fp_v1_0().get_pipeline_cache_data;
        let device = self.device.handle();
        let cache = self.raw;
        read_blob(
            |size, data| unsafe { fp(device, cache, size, data) },
            "Failed to get pipeline cache data",
        )
    }

    /// Merge `sources` into this cache.
    pub fn merge(&self, sources: &[&PipelineCache]) -> VulkanResult<()> {
        let handles: SmallVec<vk::PipelineCache, 4> =
            sources.iter().map(|c| c.handle()).collect();
        unsafe { self.device.merge_pipeline_caches(self.raw, &handles) }
            .check("Failed to merge pipeline caches")
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_pipeline_cache(self.raw, None) };
    }
}

impl VulkanObject for PipelineCache {
    type Handle = vk::PipelineCache;

    fn handle(&self) -> vk::PipelineCache {
        self.raw
    }
}

pub struct Pipeline {
    device: ash::Device,
    raw: vk::Pipeline,
}

impl Pipeline {
    pub(crate) fn new(device: ash::Device, raw: vk::Pipeline) -> Self {
        Self { device, raw }
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_pipeline(self.raw, None) };
    }
}

impl VulkanObject for Pipeline {
    type Handle = vk::Pipeline;

    fn handle(&self) -> vk::Pipeline {
        self.raw
    }
}
