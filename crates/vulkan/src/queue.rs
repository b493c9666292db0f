// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Queue
//!
//! Non-owning: queues belong to their device and go away with it, so there is
//! no `destroy` here.  Which families to request and how to spread work over
//! them is application policy.

use ash::vk;

use crate::VulkanResult;
use crate::object::VulkanObject;
use crate::result::CheckResult;
use crate::sync::Fence;

pub struct Queue {
    device: ash::Device,
    raw: vk::Queue,
    family_index: u32,
}

impl Queue {
    pub(crate) fn new(device: ash::Device, raw: vk::Queue, family_index: u32) -> Self {
        Self {
            device,
            raw,
            family_index,
        }
    }

    pub fn family_index(&self) -> u32 {
        self.family_index
    }

    pub fn submit(
        &self,
        submits: &[vk::SubmitInfo],
        fence: Option<&Fence>,
    ) -> VulkanResult<()> {
        let fence = fence.map(|f| f.handle()).unwrap_or(vk::Fence::null());
        unsafe { self.device.queue_submit(self.raw, submits, fence) }
            .check("Failed to submit to queue")
    }

    pub fn wait_idle(&self) -> VulkanResult<()> {
        unsafe { self.device.queue_wait_idle(self.raw) }.check("Failed to wait for queue idle")
    }
}

impl VulkanObject for Queue {
    type Handle = vk::Queue;

    fn handle(&self) -> vk::Queue {
        self.raw
    }
}
