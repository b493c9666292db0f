// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Query pools

use ash::vk;

use crate::object::VulkanObject;
use crate::result::StatusValue;
use crate::{VulkanError, VulkanResult};

pub struct QueryPool {
    device: ash::Device,
    raw: vk::QueryPool,
}

impl QueryPool {
    pub(crate) fn new(device: ash::Device, raw: vk::QueryPool) -> Self {
        Self { device, raw }
    }

    /// Read back `query_count` results as 64-bit values.  Without
    /// `QueryResultFlags::WAIT` the call can legitimately come back
    /// `NOT_READY`; that rides in the envelope instead of failing.
    pub fn results_u64(
        &self,
        first_query: u32,
        query_count: u32,
        flags: vk::QueryResultFlags,
    ) -> VulkanResult<StatusValue<Vec<u64>>> {
        let mut results = vec![0u64; query_count as usize];
        let fp = self.device.fp_v1_0().get_query_pool_results;
        let status = unsafe {
            fp(
                self.device.handle(),
                self.raw,
                first_query,
                query_count,
                results.len() * size_of::<u64>(),
                results.as_mut_ptr().cast(),
                size_of::<u64>() as vk::DeviceSize,
                flags | vk::QueryResultFlags::TYPE_64,
            )
        };
        match status {
            vk::Result::SUCCESS | vk::Result::NOT_READY => Ok(StatusValue {
                value: results,
                status,
            }),
            status => Err(VulkanError::Api {
                status,
                message: "Failed to get query pool results",
            }),
        }
    }

    pub fn reset(&self, first_query: u32, query_count: u32) {
        unsafe { self.device.reset_query_pool(self.raw, first_query, query_count) };
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_query_pool(self.raw, None) };
    }
}

impl VulkanObject for QueryPool {
    type Handle = vk::QueryPool;

    fn handle(&self) -> vk::QueryPool {
        self.raw
    }
}
