// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Descriptors
//!
//! Pools, set layouts, and sets.  Descriptor management policy (one big
//! bindless set, per-frame pools, whatever) stays with the application; these
//! wrappers only carry the handles through their lifecycle.

use ash::vk;
use smallvec::SmallVec;

use crate::VulkanResult;
use crate::object::VulkanObject;
use crate::result::CheckResult;

pub struct DescriptorPool {
    device: ash::Device,
    raw: vk::DescriptorPool,
}

impl DescriptorPool {
    pub(crate) fn new(device: ash::Device, raw: vk::DescriptorPool) -> Self {
        Self { device, raw }
    }

    pub fn allocate_descriptor_sets(
        &self,
        layouts: &[&DescriptorSetLayout],
    ) -> VulkanResult<Vec<DescriptorSet>> {
        let handles: SmallVec<vk::DescriptorSetLayout, 8> =
            layouts.iter().map(|l| l.handle()).collect();
        let info = vk::DescriptorSetAllocateInfo::default()
            .descriptor_pool(self.raw)
            .set_layouts(&handles);
        let raw = unsafe { self.device.allocate_descriptor_sets(&info) }
            .check("Failed to allocate descriptor sets")?;
        Ok(raw.into_iter().map(DescriptorSet::new).collect())
    }

    /// Pool must have been created with `FREE_DESCRIPTOR_SET`.
    pub fn free_descriptor_sets(&self, sets: Vec<DescriptorSet>) -> VulkanResult<()> {
        let handles: SmallVec<vk::DescriptorSet, 8> = sets.iter().map(|s| s.handle()).collect();
        unsafe { self.device.free_descriptor_sets(self.raw, &handles) }
            .check("Failed to free descriptor sets")
    }

    /// Implicitly frees every set allocated from the pool.
    pub fn reset(&self) -> VulkanResult<()> {
        unsafe {
            self.device
                .reset_descriptor_pool(self.raw, vk::DescriptorPoolResetFlags::empty())
        }
        .check("Failed to reset descriptor pool")
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_descriptor_pool(self.raw, None) };
    }
}

impl VulkanObject for DescriptorPool {
    type Handle = vk::DescriptorPool;

    fn handle(&self) -> vk::DescriptorPool {
        self.raw
    }
}

pub struct DescriptorSetLayout {
    device: ash::Device,
    raw: vk::DescriptorSetLayout,
}

impl DescriptorSetLayout {
    pub(crate) fn new(device: ash::Device, raw: vk::DescriptorSetLayout) -> Self {
        Self { device, raw }
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_descriptor_set_layout(self.raw, None) };
    }
}

impl VulkanObject for DescriptorSetLayout {
    type Handle = vk::DescriptorSetLayout;

    fn handle(&self) -> vk::DescriptorSetLayout {
        self.raw
    }
}

/// Pool-owned.  Release goes through [`DescriptorPool::free_descriptor_sets`]
/// or [`DescriptorPool::reset`]; dropping the wrapper releases nothing.
pub struct DescriptorSet {
    raw: vk::DescriptorSet,
}

impl DescriptorSet {
    pub(crate) fn new(raw: vk::DescriptorSet) -> Self {
        Self { raw }
    }

    /// No-op.  Use [`DescriptorPool::free_descriptor_sets`] to release the
    /// native set.
    pub fn destroy(self) {}
}

impl VulkanObject for DescriptorSet {
    type Handle = vk::DescriptorSet;

    fn handle(&self) -> vk::DescriptorSet {
        self.raw
    }
}
