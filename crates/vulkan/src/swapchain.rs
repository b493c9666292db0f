// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Swapchain
//!
//! The acquire/present codes that report a stale swapchain
//! (`ERROR_OUT_OF_DATE_KHR`, `SUBOPTIMAL_KHR`) are facts about the window,
//! not failures, so both operations return them in the envelope and leave
//! the recreate decision to the caller.

use std::time::Duration;

use ash::vk;
use smallvec::SmallVec;

use crate::enumerate::read_vec;
use crate::image::Image;
use crate::object::VulkanObject;
use crate::queue::Queue;
use crate::result::StatusValue;
use crate::sync::{Fence, Semaphore, timeout_nanos};
use crate::{VulkanError, VulkanResult};

pub struct Swapchain {
    device: ash::Device,
    swapchain_fn: ash::khr::swapchain::Device,
    raw: vk::SwapchainKHR,
}

impl Swapchain {
    pub(crate) fn new(
        device: ash::Device,
        swapchain_fn: ash::khr::swapchain::Device,
        raw: vk::SwapchainKHR,
    ) -> Self {
        Self {
            device,
            swapchain_fn,
            raw,
        }
    }

    /// The presentable images.  They belong to the swapchain; `destroy` on
    /// them is a no-op and they die with it.
    pub fn images(&self) -> VulkanResult<Vec<Image>> {
        let fp = self.swapchain_fn.fp().get_swapchain_images_khr;
        let device = self.device.handle();
        let swapchain = self.raw;
        let handles = read_vec(
            |count, data| unsafe { fp(device, swapchain, count, data) },
            "Failed to get swapchain images",
        )?;
        Ok(handles
            .into_iter()
            .map(|image| Image::external(self.device.clone(), image))
            .collect())
    }

    /// Acquire the next presentable image index.  At least one of `semaphore`
    /// and `fence` must be given for the caller to know when the image is
    /// actually usable.
    pub fn acquire_next_image(
        &self,
        timeout: Option<Duration>,
        semaphore: Option<&Semaphore>,
        fence: Option<&Fence>,
    ) -> VulkanResult<StatusValue<u32>> {
        let semaphore = semaphore
            .map(|s| s.handle())
            .unwrap_or(vk::Semaphore::null());
        let fence = fence.map(|f| f.handle()).unwrap_or(vk::Fence::null());

        let mut index = 0u32;
        let fp = self.swapchain_fn.fp().acquire_next_image_khr;
        let status = unsafe {
            fp(
                self.device.handle(),
                self.raw,
                timeout_nanos(timeout),
                semaphore,
                fence,
                &mut index,
            )
        };
        classify_present_status(status, index, "Failed to acquire a swapchain image")
    }

    /// Present `image_index` on `queue` after `wait_semaphores`.
    pub fn present(
        &self,
        queue: &Queue,
        image_index: u32,
        wait_semaphores: &[&Semaphore],
    ) -> VulkanResult<StatusValue<()>> {
        let waits: SmallVec<vk::Semaphore, 4> =
            wait_semaphores.iter().map(|s| s.handle()).collect();
        let swapchains = [self.raw];
        let indices = [image_index];
        let info = vk::PresentInfoKHR::default()
            .wait_semaphores(&waits)
            .swapchains(&swapchains)
            .image_indices(&indices);

        let fp = self.swapchain_fn.fp().queue_present_khr;
        let status = unsafe { fp(queue.handle(), &info) };
        classify_present_status(status, (), "Failed to present a swapchain image")
    }

    pub fn destroy(self) {
        unsafe { self.swapchain_fn.destroy_swapchain(self.raw, None) };
    }
}

impl VulkanObject for Swapchain {
    type Handle = vk::SwapchainKHR;

    fn handle(&self) -> vk::SwapchainKHR {
        self.raw
    }
}

fn classify_present_status<T>(
    status: vk::Result,
    value: T,
    message: &'static str,
) -> VulkanResult<StatusValue<T>> {
    match status {
        vk::Result::SUCCESS | vk::Result::SUBOPTIMAL_KHR | vk::Result::ERROR_OUT_OF_DATE_KHR => {
            Ok(StatusValue { value, status })
        }
        status => Err(VulkanError::Api { status, message }),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stale_swapchain_codes_are_data() {
        for status in [
            vk::Result::SUCCESS,
            vk::Result::SUBOPTIMAL_KHR,
            vk::Result::ERROR_OUT_OF_DATE_KHR,
        ] {
            let acquired = classify_present_status(status, 3u32, "acquire").unwrap();
            assert_eq!(acquired.value, 3);
            assert_eq!(acquired.status, status);
        }
    }

    #[test]
    fn real_failures_stay_errors() {
        for status in [
            vk::Result::ERROR_DEVICE_LOST,
            vk::Result::ERROR_SURFACE_LOST_KHR,
            vk::Result::TIMEOUT,
            vk::Result::NOT_READY,
        ] {
            let err = classify_present_status(status, 0u32, "acquire").unwrap_err();
            assert_eq!(err.status(), Some(status));
        }
    }
}
