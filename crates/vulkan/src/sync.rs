// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Synchronization
//!
//! Fences, semaphores, and events.  A pending fence or an expired wait is
//! data, not an error.  Timeline-only operations check the semaphore kind
//! before touching the driver, so a binary semaphore fails fast instead of
//! handing the native layer an invalid call.

use std::time::Duration;

use ash::vk;

use crate::object::VulkanObject;
use crate::result::CheckResult;
use crate::{VulkanError, VulkanResult};

/// `None` waits forever.
pub(crate) fn timeout_nanos(timeout: Option<Duration>) -> u64 {
    match timeout {
        None => u64::MAX,
        Some(duration) => u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX),
    }
}

pub struct Fence {
    device: ash::Device,
    raw: vk::Fence,
}

impl Fence {
    pub(crate) fn new(device: ash::Device, raw: vk::Fence) -> Self {
        Self { device, raw }
    }

    pub fn is_signaled(&self) -> VulkanResult<bool> {
        unsafe { self.device.get_fence_status(self.raw) }.check("Failed to get fence status")
    }

    pub fn reset(&self) -> VulkanResult<()> {
        unsafe { self.device.reset_fences(&[self.raw]) }.check("Failed to reset fence")
    }

    /// `Ok(true)` when signaled, `Ok(false)` when the timeout expired first.
    pub fn wait(&self, timeout: Option<Duration>) -> VulkanResult<bool> {
        match unsafe {
            self.device
                .wait_for_fences(&[self.raw], true, timeout_nanos(timeout))
        } {
            Ok(()) => Ok(true),
            Err(vk::Result::TIMEOUT) => Ok(false),
            Err(status) => Err(VulkanError::Api {
                status,
                message: "Failed to wait for fence",
            }),
        }
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_fence(self.raw, None) };
    }
}

impl VulkanObject for Fence {
    type Handle = vk::Fence;

    fn handle(&self) -> vk::Fence {
        self.raw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemaphoreKind {
    Binary,
    Timeline,
}

pub struct Semaphore {
    device: ash::Device,
    raw: vk::Semaphore,
    kind: SemaphoreKind,
}

fn require_timeline(kind: SemaphoreKind) -> VulkanResult<()> {
    match kind {
        SemaphoreKind::Timeline => Ok(()),
        SemaphoreKind::Binary => Err(VulkanError::Precondition(
            "operation requires a timeline semaphore",
        )),
    }
}

impl Semaphore {
    pub(crate) fn new(device: ash::Device, raw: vk::Semaphore, kind: SemaphoreKind) -> Self {
        Self { device, raw, kind }
    }

    pub fn kind(&self) -> SemaphoreKind {
        self.kind
    }

    pub fn counter_value(&self) -> VulkanResult<u64> {
        require_timeline(self.kind)?;
        unsafe { self.device.get_semaphore_counter_value(self.raw) }
            .check("Failed to get semaphore counter value")
    }

    pub fn signal(&self, value: u64) -> VulkanResult<()> {
        require_timeline(self.kind)?;
        let info = vk::SemaphoreSignalInfo::default()
            .semaphore(self.raw)
            .value(value);
        unsafe { self.device.signal_semaphore(&info) }.check("Failed to signal semaphore")
    }

    /// `Ok(true)` once the counter reaches `value`, `Ok(false)` on timeout.
    pub fn wait(&self, value: u64, timeout: Option<Duration>) -> VulkanResult<bool> {
        require_timeline(self.kind)?;
        let semaphores = [self.raw];
        let values = [value];
        let info = vk::SemaphoreWaitInfo::default()
            .semaphores(&semaphores)
            .values(&values);
        match unsafe { self.device.wait_semaphores(&info, timeout_nanos(timeout)) } {
            Ok(()) => Ok(true),
            Err(vk::Result::TIMEOUT) => Ok(false),
            Err(status) => Err(VulkanError::Api {
                status,
                message: "Failed to wait for semaphore",
            }),
        }
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_semaphore(self.raw, None) };
    }
}

impl VulkanObject for Semaphore {
    type Handle = vk::Semaphore;

    fn handle(&self) -> vk::Semaphore {
        self.raw
    }
}

pub struct Event {
    device: ash::Device,
    raw: vk::Event,
}

impl Event {
    pub(crate) fn new(device: ash::Device, raw: vk::Event) -> Self {
        Self { device, raw }
    }

    pub fn set(&self) -> VulkanResult<()> {
        unsafe { self.device.set_event(self.raw) }.check("Failed to set event")
    }

    pub fn reset(&self) -> VulkanResult<()> {
        unsafe { self.device.reset_event(self.raw) }.check("Failed to reset event")
    }

    pub fn is_set(&self) -> VulkanResult<bool> {
        unsafe { self.device.get_event_status(self.raw) }.check("Failed to get event status")
    }

    pub fn destroy(self) {
        unsafe { self.device.destroy_event(self.raw, None) };
    }
}

impl VulkanObject for Event {
    type Handle = vk::Event;

    fn handle(&self) -> vk::Event {
        self.raw
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn timeline_guard_rejects_binary() {
        let err = require_timeline(SemaphoreKind::Binary).unwrap_err();
        assert!(matches!(err, VulkanError::Precondition(_)));
        assert!(require_timeline(SemaphoreKind::Timeline).is_ok());
    }

    #[test]
    fn timeout_conversion() {
        assert_eq!(timeout_nanos(None), u64::MAX);
        assert_eq!(timeout_nanos(Some(Duration::ZERO)), 0);
        assert_eq!(timeout_nanos(Some(Duration::from_micros(3))), 3_000);
        // Saturate instead of wrapping for absurd durations.
        assert_eq!(timeout_nanos(Some(Duration::MAX)), u64::MAX);
    }
}
