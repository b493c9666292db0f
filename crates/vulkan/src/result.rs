// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Status translation
//!
//! One convention for the whole crate: `VK_SUCCESS` means success, and any
//! other code an operation did not explicitly bless is an error carrying that
//! exact code.  Codes that are data rather than failure (a fence that is not
//! ready, a swapchain that went out of date) ride in [`StatusValue`] on the
//! `Ok` arm and never appear as errors.

use ash::vk;

use crate::{VulkanError, VulkanResult};

/// Translate a raw status code into a result, keeping the exact code.
pub fn check_status(status: vk::Result, message: &'static str) -> VulkanResult<()> {
    if status == vk::Result::SUCCESS {
        Ok(())
    } else {
        Err(VulkanError::Api { status, message })
    }
}

/// Same translation for the results ash's safe wrappers hand back.
pub trait CheckResult<T> {
    fn check(self, message: &'static str) -> VulkanResult<T>;
}

impl<T> CheckResult<T> for Result<T, vk::Result> {
    fn check(self, message: &'static str) -> VulkanResult<T> {
        self.map_err(|status| VulkanError::Api { status, message })
    }
}

/// A value together with the non-error status code the native call returned
/// alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusValue<T> {
    pub value: T,
    pub status: vk::Result,
}

impl<T> StatusValue<T> {
    pub fn is_success(&self) -> bool {
        self.status == vk::Result::SUCCESS
    }

    pub fn is_suboptimal(&self) -> bool {
        self.status == vk::Result::SUBOPTIMAL_KHR
    }

    pub fn is_out_of_date(&self) -> bool {
        self.status == vk::Result::ERROR_OUT_OF_DATE_KHR
    }

    pub fn is_not_ready(&self) -> bool {
        self.status == vk::Result::NOT_READY
    }

    pub fn is_timeout(&self) -> bool {
        self.status == vk::Result::TIMEOUT
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn success_passes_through() {
        assert!(check_status(vk::Result::SUCCESS, "nope").is_ok());
    }

    #[test]
    fn failure_keeps_the_exact_code() {
        for status in [
            vk::Result::ERROR_OUT_OF_DEVICE_MEMORY,
            vk::Result::ERROR_DEVICE_LOST,
            vk::Result::TIMEOUT,
            vk::Result::INCOMPLETE,
        ] {
            let err = check_status(status, "call failed").unwrap_err();
            assert_eq!(err.status(), Some(status));
        }
    }

    #[test]
    fn check_maps_the_error_arm_only() {
        let ok: Result<u32, vk::Result> = Ok(7);
        assert_eq!(ok.check("call failed").unwrap(), 7);

        let err: Result<u32, vk::Result> = Err(vk::Result::ERROR_UNKNOWN);
        let err = err.check("call failed").unwrap_err();
        assert_eq!(err.status(), Some(vk::Result::ERROR_UNKNOWN));
        assert!(err.to_string().contains("call failed"));
    }

    #[test]
    fn envelope_predicates() {
        let acquired = StatusValue {
            value: 2u32,
            status: vk::Result::SUBOPTIMAL_KHR,
        };
        assert!(acquired.is_suboptimal());
        assert!(!acquired.is_success());
        assert!(!acquired.is_out_of_date());
        assert_eq!(acquired.into_value(), 2);
    }
}
