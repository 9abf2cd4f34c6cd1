/*!
# GPU Lifecycle - Vulkan Backend

Vulkan implementation of the `GpuDevice` trait from `gpu_lifecycle`, using
the Ash library for Vulkan bindings and gpu-allocator for memory management.

The device is headless: it owns an instance, a logical device on the first
GPU with a graphics queue, and a memory allocator. Presentation is left to
the surrounding engine.

```no_run
use gpu_lifecycle::gfx::{GfxConfig, GfxContext, HeadlessDisplay};
use gpu_lifecycle_vulkan::{VulkanConfig, VulkanDevice};
use std::rc::Rc;

let config = GfxConfig::default();
let device = VulkanDevice::new(VulkanConfig::from_gfx_config(&config))?;
let ctx = GfxContext::new(device, Rc::new(HeadlessDisplay::new(1280, 720)), config);
# Ok::<(), gpu_lifecycle::gfx::Error>(())
```
*/

mod vulkan_config;
mod vulkan_device;
mod vulkan_format;

#[cfg(feature = "vulkan-validation")]
mod debug;

pub use vulkan_config::VulkanConfig;
pub use vulkan_device::{VulkanBuffer, VulkanDevice, VulkanImage};
pub use vulkan_format::{aspect_for_format, format_to_vk};

// Re-export debug utilities
#[cfg(feature = "vulkan-validation")]
pub use debug::{get_validation_stats, print_validation_stats_report, ValidationStats};
