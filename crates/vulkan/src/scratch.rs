// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Call-scoped native strings
//!
//! Create infos want `*const c_char` arrays.  A `Scratch` lives for exactly
//! one wrapper call: it owns the `CString`s so the pointers stay valid through
//! the native call, and everything is released in one drop on return.

use std::ffi::{CString, c_char};

use smallvec::SmallVec;

use crate::{VulkanError, VulkanResult};

pub(crate) struct Scratch {
    // Pushing more strings moves the CStrings, not their heap buffers, so
    // handed-out pointers stay valid for the lifetime of the Scratch.
    strings: Vec<CString>,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
        }
    }

    /// NUL-terminate `s` and keep it alive; `what` names the field for the
    /// error message.
    pub fn cstr(&mut self, s: &str, what: &'static str) -> VulkanResult<*const c_char> {
        let c = CString::new(s).map_err(|_| VulkanError::InvalidName(what))?;
        let ptr = c.as_ptr();
        self.strings.push(c);
        Ok(ptr)
    }

    pub fn cstr_array(
        &mut self,
        items: &[&str],
        what: &'static str,
    ) -> VulkanResult<SmallVec<*const c_char, 8>> {
        let mut ptrs = SmallVec::new();
        for s in items {
            ptrs.push(self.cstr(s, what)?);
        }
        Ok(ptrs)
    }
}

#[cfg(test)]
mod test {
    use std::ffi::CStr;

    use super::*;

    #[test]
    fn pointers_survive_growth() {
        let mut scratch = Scratch::new();
        let names: Vec<String> = (0..64).map(|i| format!("VK_LAYER_test_{i}")).collect();
        let ptrs: Vec<*const c_char> = names
            .iter()
            .map(|n| scratch.cstr(n, "layer name").unwrap())
            .collect();

        for (name, ptr) in names.iter().zip(ptrs) {
            let read = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap();
            assert_eq!(read, name);
        }
    }

    #[test]
    fn interior_nul_is_rejected() {
        let mut scratch = Scratch::new();
        let err = scratch.cstr("bad\0name", "extension name").unwrap_err();
        assert!(matches!(err, VulkanError::InvalidName("extension name")));
    }

    #[test]
    fn array_preserves_order() {
        let mut scratch = Scratch::new();
        let ptrs = scratch
            .cstr_array(&["a", "b", "c"], "layer name")
            .unwrap();
        let back: Vec<&str> = ptrs
            .iter()
            .map(|p| unsafe { CStr::from_ptr(*p) }.to_str().unwrap())
            .collect();
        assert_eq!(back, ["a", "b", "c"]);
    }
}
