// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Debug utilities
//!
//! Validation-layer messengers and debug-utils object names and labels.
//!
//! The native callback is a single process-wide trampoline.  Each messenger
//! registers its Rust callback in a token-keyed map and passes the token as
//! the native user-data pointer; the trampoline looks the callback up and
//! forwards.  No Rust closure pointer ever crosses the FFI boundary, and a
//! message that races messenger destruction finds no entry and is dropped.

use std::collections::HashMap;
use std::ffi::{CStr, c_char, c_void};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

use ash::vk;

use crate::object::VulkanObject;
use crate::scratch::Scratch;
use crate::{VulkanError, VulkanResult};

/// What a validation message looks like after crossing back into Rust.
pub struct DebugMessage<'a> {
    pub severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    pub types: vk::DebugUtilsMessageTypeFlagsEXT,
    pub message_id_name: Option<&'a str>,
    pub message_id_number: i32,
    pub message: &'a str,
}

pub(crate) type Callback = dyn Fn(&DebugMessage) + Send + Sync;

static CALLBACKS: LazyLock<Mutex<HashMap<u64, Arc<Callback>>>> =
    LazyLock::new(Default::default);
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

fn register(callback: Arc<Callback>) -> u64 {
    let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
    if let Ok(mut callbacks) = CALLBACKS.lock() {
        callbacks.insert(token, callback);
    }
    token
}

fn unregister(token: u64) {
    if let Ok(mut callbacks) = CALLBACKS.lock() {
        callbacks.remove(&token);
    }
}

unsafe fn str_or_empty<'a>(ptr: *const c_char) -> &'a str {
    if ptr.is_null() {
        ""
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
    }
}

unsafe extern "system" fn trampoline(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    types: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    p_user_data: *mut c_void,
) -> vk::Bool32 {
    let Some(data) = (unsafe { p_callback_data.as_ref() }) else {
        return vk::FALSE;
    };

    let token = p_user_data as u64;
    // Clone out of the map so the callback runs without holding the lock.
    let callback = CALLBACKS
        .lock()
        .ok()
        .and_then(|callbacks| callbacks.get(&token).cloned());

    if let Some(callback) = callback {
        let id_name = if data.p_message_id_name.is_null() {
            None
        } else {
            Some(unsafe { str_or_empty(data.p_message_id_name) })
        };
        callback(&DebugMessage {
            severity,
            types,
            message_id_name: id_name,
            message_id_number: data.message_id_number,
            message: unsafe { str_or_empty(data.p_message) },
        });
    }

    // Never ask the driver to abort the call that triggered the message.
    vk::FALSE
}

/// Ready-made callback forwarding to the `log` facade at a level matching
/// the message severity.
pub fn log_message(message: &DebugMessage) {
    let level = if message
        .severity
        .contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR)
    {
        log::Level::Error
    } else if message
        .severity
        .contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING)
    {
        log::Level::Warn
    } else if message
        .severity
        .contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO)
    {
        log::Level::Info
    } else {
        log::Level::Trace
    };

    log::log!(
        level,
        "[{:?}] {}: {}",
        message.types,
        message.message_id_name.unwrap_or("unidentified"),
        message.message
    );
}

pub struct DebugMessenger {
    debug_fn: ash::ext::debug_utils::Instance,
    raw: vk::DebugUtilsMessengerEXT,
    token: u64,
}

impl DebugMessenger {
    pub(crate) fn create(
        debug_fn: ash::ext::debug_utils::Instance,
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
        types: vk::DebugUtilsMessageTypeFlagsEXT,
        callback: Arc<Callback>,
    ) -> VulkanResult<Self> {
        let token = register(callback);
        let info = vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(severity)
            .message_type(types)
            .pfn_user_callback(Some(trampoline))
            .user_data(token as usize as *mut c_void);

        match unsafe { debug_fn.create_debug_utils_messenger(&info, None) } {
            Ok(raw) => Ok(Self {
                debug_fn,
                raw,
                token,
            }),
            Err(status) => {
                unregister(token);
                Err(VulkanError::Api {
                    status,
                    message: "Failed to create a debug messenger",
                })
            }
        }
    }

    /// Inject a message into the stream, as if the driver had emitted it.
    pub fn submit_message(
        &self,
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
        types: vk::DebugUtilsMessageTypeFlagsEXT,
        message: &str,
    ) -> VulkanResult<()> {
        let mut scratch = Scratch::new();
        let message = scratch.cstr(message, "debug message")?;
        let data = vk::DebugUtilsMessengerCallbackDataEXT {
            p_message: message,
            ..Default::default()
        };
        unsafe { self.debug_fn.submit_debug_utils_message(severity, types, &data) };
        Ok(())
    }

    pub fn destroy(self) {
        unsafe { self.debug_fn.destroy_debug_utils_messenger(self.raw, None) };
        unregister(self.token);
    }
}

impl VulkanObject for DebugMessenger {
    type Handle = vk::DebugUtilsMessengerEXT;

    fn handle(&self) -> vk::DebugUtilsMessengerEXT {
        self.raw
    }
}

/// Device-level debug utils: object names and tags, command buffer labels.
/// All of it is a no-op without the validation layers, so call sites do not
/// need their own gating.
pub struct DebugUtils {
    debug_fn: ash::ext::debug_utils::Device,
}

impl DebugUtils {
    pub(crate) fn new(instance: &ash::Instance, device: &ash::Device) -> Self {
        Self {
            debug_fn: ash::ext::debug_utils::Device::new(instance, device),
        }
    }

    pub fn set_object_name<O: VulkanObject>(&self, object: &O, name: &str) -> VulkanResult<()> {
        let mut scratch = Scratch::new();
        let name = scratch.cstr(name, "object name")?;
        let info = vk::DebugUtilsObjectNameInfoEXT {
            object_type: object.object_type(),
            object_handle: object.raw(),
            p_object_name: name,
            ..Default::default()
        };
        unsafe { self.debug_fn.set_debug_utils_object_name(&info) }
            .map_err(|status| VulkanError::Api {
                status,
                message: "Failed to set an object name",
            })
    }

    pub fn set_object_tag<O: VulkanObject>(
        &self,
        object: &O,
        tag_name: u64,
        tag: &[u8],
    ) -> VulkanResult<()> {
        let info = vk::DebugUtilsObjectTagInfoEXT {
            object_type: object.object_type(),
            object_handle: object.raw(),
            tag_name,
            tag_size: tag.len(),
            p_tag: tag.as_ptr().cast(),
            ..Default::default()
        };
        unsafe { self.debug_fn.set_debug_utils_object_tag(&info) }
            .map_err(|status| VulkanError::Api {
                status,
                message: "Failed to set an object tag",
            })
    }

    pub fn begin_label(
        &self,
        command_buffer: &crate::command::CommandBuffer,
        label: &str,
        color: [f32; 4],
    ) -> VulkanResult<()> {
        let mut scratch = Scratch::new();
        let label_name = scratch.cstr(label, "label")?;
        let info = vk::DebugUtilsLabelEXT {
            p_label_name: label_name,
            color,
            ..Default::default()
        };
        unsafe {
            self.debug_fn
                .cmd_begin_debug_utils_label(command_buffer.handle(), &info)
        };
        Ok(())
    }

    pub fn end_label(&self, command_buffer: &crate::command::CommandBuffer) {
        unsafe { self.debug_fn.cmd_end_debug_utils_label(command_buffer.handle()) };
    }

    pub fn insert_label(
        &self,
        command_buffer: &crate::command::CommandBuffer,
        label: &str,
        color: [f32; 4],
    ) -> VulkanResult<()> {
        let mut scratch = Scratch::new();
        let label_name = scratch.cstr(label, "label")?;
        let info = vk::DebugUtilsLabelEXT {
            p_label_name: label_name,
            color,
            ..Default::default()
        };
        unsafe {
            self.debug_fn
                .cmd_insert_debug_utils_label(command_buffer.handle(), &info)
        };
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::ffi::CString;
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn trampoline_dispatches_to_the_registered_callback() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = seen.clone();
        let token = register(Arc::new(move |message: &DebugMessage| {
            sink.lock().unwrap().push(format!(
                "{}: {}",
                message.message_id_name.unwrap_or("-"),
                message.message
            ));
        }));

        let id_name = CString::new("VUID-test").unwrap();
        let text = CString::new("something is off").unwrap();
        let data = vk::DebugUtilsMessengerCallbackDataEXT {
            p_message_id_name: id_name.as_ptr(),
            message_id_number: 7,
            p_message: text.as_ptr(),
            ..Default::default()
        };

        let verdict = unsafe {
            trampoline(
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING,
                vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
                &data,
                token as usize as *mut c_void,
            )
        };

        assert_eq!(verdict, vk::FALSE);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            ["VUID-test: something is off"]
        );
        unregister(token);
    }

    #[test]
    fn unknown_token_is_silently_dropped() {
        let text = CString::new("orphan").unwrap();
        let data = vk::DebugUtilsMessengerCallbackDataEXT {
            p_message: text.as_ptr(),
            ..Default::default()
        };

        let verdict = unsafe {
            trampoline(
                vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL,
                &data,
                u64::MAX as usize as *mut c_void,
            )
        };
        assert_eq!(verdict, vk::FALSE);
    }

    #[test]
    fn null_callback_data_is_ignored() {
        let verdict = unsafe {
            trampoline(
                vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL,
                std::ptr::null(),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(verdict, vk::FALSE);
    }

    #[test]
    fn unregister_stops_dispatch() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let token = register(Arc::new(move |_: &DebugMessage| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let text = CString::new("once").unwrap();
        let data = vk::DebugUtilsMessengerCallbackDataEXT {
            p_message: text.as_ptr(),
            ..Default::default()
        };
        let fire = |token: u64| unsafe {
            trampoline(
                vk::DebugUtilsMessageSeverityFlagsEXT::INFO,
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL,
                &data,
                token as usize as *mut c_void,
            )
        };

        fire(token);
        unregister(token);
        fire(token);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn tokens_are_unique() {
        let a = register(Arc::new(|_: &DebugMessage| {}));
        let b = register(Arc::new(|_: &DebugMessage| {}));
        assert_ne!(a, b);
        unregister(a);
        unregister(b);
    }
}
