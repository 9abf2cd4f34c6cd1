/// Vulkan backend configuration

use ash::vk;

/// Settings used once when the `VulkanDevice` is created
#[derive(Debug, Clone)]
pub struct VulkanConfig {
    /// Application name reported to the driver
    pub app_name: String,
    /// Application version, packed with `vk::make_api_version`
    pub app_version: u32,
    /// Enable VK_LAYER_KHRONOS_validation and the debug messenger.
    /// Ignored (with a warning) unless built with `vulkan-validation`.
    pub enable_validation: bool,
}

impl Default for VulkanConfig {
    fn default() -> Self {
        Self {
            app_name: "GPU Lifecycle Application".to_string(),
            app_version: vk::make_api_version(0, 1, 0, 0),
            enable_validation: cfg!(debug_assertions),
        }
    }
}

impl VulkanConfig {
    /// Take the validation flag from the core configuration
    pub fn from_gfx_config(config: &gpu_lifecycle::gfx::GfxConfig) -> Self {
        Self {
            enable_validation: config.enable_validation,
            ..Self::default()
        }
    }
}
