// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![cfg(feature = "live-tests")]

//! Smoke tests against a real Vulkan driver.  Headless: no surface or
//! swapchain coverage here.

use std::time::Duration;

use ash::vk;
use obsidian_vulkan::loader::InstanceDescriptor;
use obsidian_vulkan::prelude::*;

fn device_fixture() -> (Instance, Device) {
    let vulkan = Vulkan::load().unwrap();
    let instance = vulkan
        .create_instance(&InstanceDescriptor {
            application_name: Some("obsidian-live-tests"),
            ..Default::default()
        })
        .unwrap();

    let physical = instance
        .enumerate_physical_devices()
        .unwrap()
        .into_iter()
        .next()
        .expect("no Vulkan device present");
    let families = physical.queue_family_properties().unwrap();
    let family_index = families
        .iter()
        .position(|f| f.queue_flags.contains(vk::QueueFlags::GRAPHICS))
        .expect("no graphics queue family") as u32;

    let device = physical
        .create_device(&obsidian_vulkan::physical_device::DeviceDescriptor {
            queues: &[obsidian_vulkan::physical_device::QueueRequest {
                family_index,
                priorities: &[1.0],
            }],
            features12: vk::PhysicalDeviceVulkan12Features::default().timeline_semaphore(true),
            ..Default::default()
        })
        .unwrap();
    (instance, device)
}

#[test]
fn instance_lifecycle() {
    let vulkan = Vulkan::load().unwrap();
    assert!(vulkan.instance_version().unwrap() >= vk::API_VERSION_1_0);
    assert!(!vulkan.enumerate_instance_extension_properties().unwrap().is_empty());

    let instance = vulkan.create_instance(&InstanceDescriptor::default()).unwrap();
    assert!(!instance.enumerate_physical_devices().unwrap().is_empty());
    instance.destroy();
}

#[test]
fn fence_status_and_wait() {
    let (instance, device) = device_fixture();

    let signaled = device.create_fence(true).unwrap();
    assert!(signaled.is_signaled().unwrap());
    signaled.reset().unwrap();
    assert!(!signaled.is_signaled().unwrap());

    // Nothing will ever signal it; the wait must expire as data.
    let expired = signaled.wait(Some(Duration::from_millis(5))).unwrap();
    assert!(!expired);

    signaled.destroy();
    device.destroy();
    instance.destroy();
}

#[test]
fn timeline_semaphore_counter() {
    let (instance, device) = device_fixture();

    let timeline = device.create_semaphore(SemaphoreKind::Timeline, 3).unwrap();
    assert_eq!(timeline.counter_value().unwrap(), 3);
    timeline.signal(9).unwrap();
    assert!(timeline.wait(9, Some(Duration::from_secs(1))).unwrap());

    let binary = device.create_semaphore(SemaphoreKind::Binary, 0).unwrap();
    assert!(matches!(
        binary.counter_value(),
        Err(VulkanError::Precondition(_))
    ));

    timeline.destroy();
    binary.destroy();
    device.destroy();
    instance.destroy();
}

#[test]
fn pipeline_cache_round_trip() {
    let (instance, device) = device_fixture();

    let cache = device.create_pipeline_cache(&[]).unwrap();
    let data = cache.data().unwrap();
    // An empty cache still serializes its header.
    assert!(!data.is_empty());

    let reloaded = device.create_pipeline_cache(&data).unwrap();
    reloaded.destroy();
    cache.destroy();
    device.destroy();
    instance.destroy();
}

#[test]
fn buffer_memory_binding_and_write() {
    let (instance, device) = device_fixture();
    let physical = instance
        .enumerate_physical_devices()
        .unwrap()
        .into_iter()
        .next()
        .unwrap();

    let buffer = device
        .create_buffer(&vk::BufferCreateInfo {
            size: 1024,
            usage: vk::BufferUsageFlags::TRANSFER_SRC,
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            ..Default::default()
        })
        .unwrap();

    let requirements = buffer.memory_requirements();
    let index = obsidian_vulkan::memory::find_memory_type_index(
        &requirements,
        &physical.memory_properties(),
        vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
    )
    .expect("no host-visible memory type");

    let memory = device.allocate_memory(requirements.size, index).unwrap();
    buffer.bind_memory(&memory, 0).unwrap();
    memory.write_at(0, &[1u32, 2, 3, 4]).unwrap();

    buffer.destroy();
    memory.free();
    device.destroy();
    instance.destroy();
}

#[test]
fn event_toggling() {
    let (instance, device) = device_fixture();

    let event = device.create_event().unwrap();
    assert!(!event.is_set().unwrap());
    event.set().unwrap();
    assert!(event.is_set().unwrap());
    event.reset().unwrap();
    assert!(!event.is_set().unwrap());

    event.destroy();
    device.destroy();
    instance.destroy();
}

#[test]
fn command_pool_lifecycle() {
    let (instance, device) = device_fixture();
    let physical = instance
        .enumerate_physical_devices()
        .unwrap()
        .into_iter()
        .next()
        .unwrap();
    let family_index = physical
        .queue_family_properties()
        .unwrap()
        .iter()
        .position(|f| f.queue_flags.contains(vk::QueueFlags::GRAPHICS))
        .unwrap() as u32;

    let pool = device
        .create_command_pool(family_index, vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER)
        .unwrap();
    let buffers = pool
        .allocate_command_buffers(vk::CommandBufferLevel::PRIMARY, 2)
        .unwrap();
    assert_eq!(buffers.len(), 2);

    buffers[0]
        .begin(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT)
        .unwrap();
    buffers[0].end().unwrap();

    pool.free_command_buffers(buffers);
    pool.trim();
    pool.destroy();
    device.destroy();
    instance.destroy();
}
