// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Two-call enumeration
//!
//! Vulkan's count-then-fill protocol, factored out once so every `enumerate*`
//! and `get*` list operation goes through the same code path.

use std::ffi::c_void;
use std::ptr;

use ash::vk;

use crate::VulkanResult;
use crate::result::check_status;

/// Run the count/fill protocol for a fixed-size element type.
///
/// `fill` receives the count pointer and the (possibly null) output pointer
/// and returns the raw status.  A zero count short-circuits to an empty vec
/// without a second call.
pub(crate) fn read_vec<T, F>(mut fill: F, message: &'static str) -> VulkanResult<Vec<T>>
where
    T: Default + Clone,
    F: FnMut(&mut u32, *mut T) -> vk::Result,
{
    let mut count = 0u32;
    check_status(fill(&mut count, ptr::null_mut()), message)?;
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut items = vec![T::default(); count as usize];
    check_status(fill(&mut count, items.as_mut_ptr()), message)?;
    // The producer may have shrunk between the two calls.
    items.truncate(count as usize);
    Ok(items)
}

/// Retrieve a driver-sized byte blob (pipeline cache data), retrying until a
/// fill succeeds at the size it was given.
///
/// The producer may grow between the sizing call and the fill.  A short
/// buffer comes back as `INCOMPLETE`; depending on the driver the size
/// pointer then holds either the new total or the bytes actually written, so
/// re-size when it did not grow and go around again.
pub(crate) fn read_blob<F>(mut fill: F, message: &'static str) -> VulkanResult<Vec<u8>>
where
    F: FnMut(&mut usize, *mut c_void) -> vk::Result,
{
    let mut size = 0usize;
    check_status(fill(&mut size, ptr::null_mut()), message)?;

    loop {
        if size == 0 {
            return Ok(Vec::new());
        }

        let requested = size;
        let mut data = vec![0u8; requested];
        let status = fill(&mut size, data.as_mut_ptr().cast());

        if status == vk::Result::INCOMPLETE {
            if size <= requested {
                check_status(fill(&mut size, ptr::null_mut()), message)?;
            }
            continue;
        }

        check_status(status, message)?;
        data.truncate(size.min(requested));
        return Ok(data);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_count_skips_the_fill_call() {
        let mut calls = 0;
        let items: Vec<u32> = read_vec(
            |count, data: *mut u32| {
                calls += 1;
                assert!(data.is_null());
                *count = 0;
                vk::Result::SUCCESS
            },
            "enumerate",
        )
        .unwrap();

        assert!(items.is_empty());
        assert_eq!(calls, 1);
    }

    #[test]
    fn fills_in_order() {
        let items: Vec<u32> = read_vec(
            |count, data: *mut u32| {
                *count = 3;
                if !data.is_null() {
                    for i in 0..3 {
                        unsafe { *data.add(i) = (i as u32) * 10 };
                    }
                }
                vk::Result::SUCCESS
            },
            "enumerate",
        )
        .unwrap();

        assert_eq!(items, vec![0, 10, 20]);
    }

    #[test]
    fn shrinking_count_truncates() {
        let items: Vec<u32> = read_vec(
            |count, data: *mut u32| {
                if data.is_null() {
                    *count = 4;
                } else {
                    *count = 2;
                    unsafe {
                        *data = 1;
                        *data.add(1) = 2;
                    }
                }
                vk::Result::SUCCESS
            },
            "enumerate",
        )
        .unwrap();

        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn sizing_failure_carries_the_code() {
        let err = read_vec::<u32, _>(|_, _| vk::Result::ERROR_OUT_OF_HOST_MEMORY, "enumerate")
            .unwrap_err();
        assert_eq!(err.status(), Some(vk::Result::ERROR_OUT_OF_HOST_MEMORY));
    }

    #[test]
    fn blob_grows_until_a_fill_succeeds() {
        // Sizes reported by successive calls: 100, then the producer grows to
        // 150 and stays there.
        let mut fills = 0;
        let data = read_blob(
            |size, data| {
                if data.is_null() {
                    *size = 100;
                    return vk::Result::SUCCESS;
                }
                fills += 1;
                if *size < 150 {
                    *size = 150;
                    vk::Result::INCOMPLETE
                } else {
                    *size = 150;
                    vk::Result::SUCCESS
                }
            },
            "cache data",
        )
        .unwrap();

        assert_eq!(data.len(), 150);
        assert_eq!(fills, 2);
    }

    #[test]
    fn blob_requeries_when_the_driver_reports_bytes_written() {
        // Some drivers report the written prefix, not the new total.
        let mut fills = 0;
        let data = read_blob(
            |size, data| {
                if data.is_null() {
                    *size = if fills == 0 { 100 } else { 150 };
                    return vk::Result::SUCCESS;
                }
                fills += 1;
                if *size < 150 {
                    vk::Result::INCOMPLETE
                } else {
                    vk::Result::SUCCESS
                }
            },
            "cache data",
        )
        .unwrap();

        assert_eq!(data.len(), 150);
        assert_eq!(fills, 2);
    }

    #[test]
    fn empty_blob() {
        let data = read_blob(
            |size, _| {
                *size = 0;
                vk::Result::SUCCESS
            },
            "cache data",
        )
        .unwrap();
        assert!(data.is_empty());
    }
}
