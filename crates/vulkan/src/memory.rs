// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Device memory
//!
//! Raw allocations plus typed writes into mapped ranges.  Allocation strategy
//! (pooling, sub-allocation) is application policy; this module only makes a
//! single allocation safe to hold and write.

use std::ptr::NonNull;

use ash::vk;
use bytemuck::Pod;

use crate::object::VulkanObject;
use crate::result::CheckResult;
use crate::{VulkanError, VulkanResult};

pub struct DeviceMemory {
    device: ash::Device,
    raw: vk::DeviceMemory,
    size: vk::DeviceSize,
}

impl DeviceMemory {
    pub(crate) fn new(device: ash::Device, raw: vk::DeviceMemory, size: vk::DeviceSize) -> Self {
        Self { device, raw, size }
    }

    pub fn size(&self) -> vk::DeviceSize {
        self.size
    }

    /// Map a range.  The memory type must be host-visible; the pointer is
    /// valid until [`Self::unmap`].
    pub fn map(&self, offset: vk::DeviceSize, size: vk::DeviceSize) -> VulkanResult<NonNull<u8>> {
        let ptr = unsafe {
            self.device
                .map_memory(self.raw, offset, size, vk::MemoryMapFlags::empty())
        }
        .check("Failed to map device memory")?;
        NonNull::new(ptr.cast()).ok_or(VulkanError::Precondition("mapping returned null"))
    }

    pub fn unmap(&self) {
        unsafe { self.device.unmap_memory(self.raw) };
    }

    /// Map, copy `data` at `offset`, unmap.
    pub fn write_at<T: Pod>(&self, offset: vk::DeviceSize, data: &[T]) -> VulkanResult<()> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let ptr = self.map(offset, bytes.len() as vk::DeviceSize)?;
        unsafe { std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len()) };
        self.unmap();
        Ok(())
    }

    /// Needed after writes to non-coherent memory types.
    pub fn flush(&self, offset: vk::DeviceSize, size: vk::DeviceSize) -> VulkanResult<()> {
        let range = vk::MappedMemoryRange {
            memory: self.raw,
            offset,
            size,
            ..Default::default()
        };
        unsafe { self.device.flush_mapped_memory_ranges(&[range]) }
            .check("Failed to flush mapped memory")
    }

    pub fn free(self) {
        unsafe { self.device.free_memory(self.raw, None) };
    }
}

impl VulkanObject for DeviceMemory {
    type Handle = vk::DeviceMemory;

    fn handle(&self) -> vk::DeviceMemory {
        self.raw
    }
}

/// First memory type that satisfies both the resource's type bits and the
/// requested property flags.
pub fn find_memory_type_index(
    mem_req: &vk::MemoryRequirements,
    mem_props: &vk::PhysicalDeviceMemoryProperties,
    required: vk::MemoryPropertyFlags,
) -> Option<u32> {
    for i in 0..mem_props.memory_type_count {
        let type_supported = (mem_req.memory_type_bits & (1 << i)) != 0;
        let props = mem_props.memory_types[i as usize].property_flags;

        if type_supported && props.contains(required) {
            return Some(i);
        }
    }

    None
}

#[cfg(test)]
mod test {
    use super::*;

    fn props(flags: &[vk::MemoryPropertyFlags]) -> vk::PhysicalDeviceMemoryProperties {
        let mut props = vk::PhysicalDeviceMemoryProperties {
            memory_type_count: flags.len() as u32,
            ..Default::default()
        };
        for (i, f) in flags.iter().enumerate() {
            props.memory_types[i].property_flags = *f;
        }
        props
    }

    #[test]
    fn picks_the_first_matching_type() {
        let props = props(&[
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        ]);
        let req = vk::MemoryRequirements {
            memory_type_bits: 0b11,
            ..Default::default()
        };

        let index =
            find_memory_type_index(&req, &props, vk::MemoryPropertyFlags::HOST_VISIBLE);
        assert_eq!(index, Some(1));
    }

    #[test]
    fn respects_the_type_bits() {
        let props = props(&[
            vk::MemoryPropertyFlags::HOST_VISIBLE,
            vk::MemoryPropertyFlags::HOST_VISIBLE,
        ]);
        // Resource only allows type 1.
        let req = vk::MemoryRequirements {
            memory_type_bits: 0b10,
            ..Default::default()
        };

        let index =
            find_memory_type_index(&req, &props, vk::MemoryPropertyFlags::HOST_VISIBLE);
        assert_eq!(index, Some(1));
    }

    #[test]
    fn no_match_is_none() {
        let props = props(&[vk::MemoryPropertyFlags::DEVICE_LOCAL]);
        let req = vk::MemoryRequirements {
            memory_type_bits: 0b1,
            ..Default::default()
        };

        let index =
            find_memory_type_index(&req, &props, vk::MemoryPropertyFlags::HOST_VISIBLE);
        assert_eq!(index, None);
    }
}
