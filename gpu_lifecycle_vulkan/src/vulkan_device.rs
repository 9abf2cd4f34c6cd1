/// Vulkan implementation of the GpuDevice trait
///
/// Headless: no surface or swapchain is created. Images live in device-local
/// memory, buffers in host-visible memory written through their persistent
/// mapping, and pixel data goes through a staging buffer copied on the
/// graphics queue.

use ash::vk;
use gpu_allocator::vulkan::{
    Allocation, AllocationCreateDesc, AllocationScheme, Allocator, AllocatorCreateDesc,
};
use gpu_allocator::MemoryLocation;
use gpu_lifecycle::gfx::descriptor::DescriptorLocation;
use gpu_lifecycle::gfx::device::{
    BufferDesc, ImageDesc, ImageSubresourceData, ImageUsage, PixelFormat, TextureType,
};
use gpu_lifecycle::gfx::{Error, GpuDevice, Result};
use gpu_lifecycle::{engine_bail, engine_err, engine_error, engine_info, engine_warn};
use rustc_hash::FxHashMap;
use std::ffi::CString;
use std::mem::ManuallyDrop;

use crate::vulkan_config::VulkanConfig;
use crate::vulkan_format::{
    aspect_for_format, buffer_usage_to_vk, format_features_for_usage, format_to_vk,
    image_usage_to_vk, sample_count_to_vk, sampled_aspect_for_format, view_type_for,
};

const SOURCE: &str = "gfx::vulkan::Device";

/// Vulkan image and its device-local memory
pub struct VulkanImage {
    image: vk::Image,
    allocation: Allocation,
    desc: ImageDesc,
}

impl VulkanImage {
    /// Raw Vulkan image handle
    pub fn handle(&self) -> vk::Image {
        self.image
    }

    /// Descriptor the image was created from
    pub fn desc(&self) -> &ImageDesc {
        &self.desc
    }
}

/// Vulkan buffer and its host-visible memory
pub struct VulkanBuffer {
    buffer: vk::Buffer,
    allocation: Allocation,
    size: u64,
}

impl VulkanBuffer {
    /// Raw Vulkan buffer handle
    pub fn handle(&self) -> vk::Buffer {
        self.buffer
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Vulkan GPU device
pub struct VulkanDevice {
    /// Vulkan entry (must outlive the instance)
    _entry: ash::Entry,
    instance: ash::Instance,
    physical_device: vk::PhysicalDevice,
    device: ash::Device,
    graphics_queue: vk::Queue,
    /// GPU memory allocator (dropped before the device)
    allocator: ManuallyDrop<Allocator>,
    /// Command pool for one-shot upload command buffers
    upload_command_pool: vk::CommandPool,
    /// Image views written into descriptor heap slots
    views: FxHashMap<DescriptorLocation, vk::ImageView>,
    /// Debug messenger (validation builds only)
    debug_messenger: Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
    name: String,
}

impl VulkanDevice {
    /// Create a headless Vulkan device on the first physical device
    pub fn new(config: VulkanConfig) -> Result<Self> {
        let validation = Self::validation_requested(&config);

        unsafe {
            let entry = ash::Entry::load()
                .map_err(|e| {
                    engine_error!(SOURCE, "Failed to load Vulkan library: {:?}", e);
                    Error::InitializationFailed(format!("Failed to load Vulkan library: {:?}", e))
                })?;

            let app_name = CString::new(config.app_name.as_str())
                .map_err(|e| Error::InitializationFailed(format!("Invalid application name: {}", e)))?;

            let app_info = vk::ApplicationInfo::default()
                .application_name(&app_name)
                .application_version(config.app_version)
                .engine_name(c"GPU Lifecycle")
                .engine_version(vk::make_api_version(0, 0, 1, 0))
                .api_version(vk::API_VERSION_1_3);

            let (layer_names, extension_names) = if validation {
                (
                    vec![c"VK_LAYER_KHRONOS_validation".as_ptr()],
                    vec![ash::ext::debug_utils::NAME.as_ptr()],
                )
            } else {
                (vec![], vec![])
            };

            let create_info = vk::InstanceCreateInfo::default()
                .application_info(&app_info)
                .enabled_layer_names(&layer_names)
                .enabled_extension_names(&extension_names);

            let instance = entry
                .create_instance(&create_info, None)
                .map_err(|e| {
                    engine_error!(SOURCE, "Failed to create Vulkan instance: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create instance: {:?}", e))
                })?;

            let debug_messenger = if validation {
                Some(Self::create_debug_messenger(&entry, &instance)?)
            } else {
                None
            };

            // Pick Physical Device
            let physical_devices = instance
                .enumerate_physical_devices()
                .map_err(|e| {
                    engine_error!(SOURCE, "Failed to enumerate physical devices: {:?}", e);
                    Error::InitializationFailed(format!("Failed to enumerate physical devices: {:?}", e))
                })?;

            let physical_device = physical_devices
                .into_iter()
                .next()
                .ok_or_else(|| {
                    engine_error!(SOURCE, "No Vulkan-capable GPU found");
                    Error::InitializationFailed("No Vulkan-capable GPU found".to_string())
                })?;

            let properties = instance.get_physical_device_properties(physical_device);
            let gpu_name = properties
                .device_name_as_c_str()
                .ok()
                .and_then(|name| name.to_str().ok())
                .unwrap_or("Unknown GPU")
                .to_string();

            // Find Queue Family
            let queue_families = instance.get_physical_device_queue_family_properties(physical_device);

            let graphics_family_index = queue_families
                .iter()
                .enumerate()
                .find(|(_, qf)| qf.queue_flags.contains(vk::QueueFlags::GRAPHICS))
                .map(|(i, _)| i as u32)
                .ok_or_else(|| {
                    engine_error!(SOURCE, "No graphics queue family found");
                    Error::InitializationFailed("No graphics queue family found".to_string())
                })?;

            // Create Logical Device
            let queue_priorities = [1.0];
            let queue_create_infos = [vk::DeviceQueueCreateInfo::default()
                .queue_family_index(graphics_family_index)
                .queue_priorities(&queue_priorities)];

            let device_create_info = vk::DeviceCreateInfo::default()
                .queue_create_infos(&queue_create_infos);

            let device = instance
                .create_device(physical_device, &device_create_info, None)
                .map_err(|e| {
                    engine_error!(SOURCE, "Failed to create logical device: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create device: {:?}", e))
                })?;

            let graphics_queue = device.get_device_queue(graphics_family_index, 0);

            let allocator = Allocator::new(&AllocatorCreateDesc {
                instance: instance.clone(),
                device: device.clone(),
                physical_device,
                debug_settings: Default::default(),
                buffer_device_address: false,
                allocation_sizes: Default::default(),
            })
            .map_err(|e| {
                engine_error!(SOURCE, "Failed to create GPU allocator: {:?}", e);
                Error::InitializationFailed(format!("Failed to create allocator: {:?}", e))
            })?;

            // TRANSIENT + RESET for reusable one-shot uploads
            let upload_pool_create_info = vk::CommandPoolCreateInfo::default()
                .queue_family_index(graphics_family_index)
                .flags(vk::CommandPoolCreateFlags::TRANSIENT | vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

            let upload_command_pool = device.create_command_pool(&upload_pool_create_info, None)
                .map_err(|e| {
                    engine_error!(SOURCE, "Failed to create upload command pool: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create upload command pool: {:?}", e))
                })?;

            engine_info!(SOURCE, "Vulkan device created on {} (validation: {})", gpu_name, validation);

            Ok(Self {
                _entry: entry,
                instance,
                physical_device,
                device,
                graphics_queue,
                allocator: ManuallyDrop::new(allocator),
                upload_command_pool,
                views: FxHashMap::default(),
                debug_messenger,
                name: format!("Vulkan ({})", gpu_name),
            })
        }
    }

    #[cfg(feature = "vulkan-validation")]
    fn validation_requested(config: &VulkanConfig) -> bool {
        config.enable_validation
    }

    #[cfg(not(feature = "vulkan-validation"))]
    fn validation_requested(config: &VulkanConfig) -> bool {
        if config.enable_validation {
            engine_warn!(SOURCE, "Validation requested but the crate was built without `vulkan-validation`");
        }
        false
    }

    #[cfg(feature = "vulkan-validation")]
    unsafe fn create_debug_messenger(
        entry: &ash::Entry,
        instance: &ash::Instance,
    ) -> Result<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)> {
        let debug_utils = ash::ext::debug_utils::Instance::new(entry, instance);
        crate::debug::reset_validation_tracking();

        let debug_info = vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
                    | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
            )
            .pfn_user_callback(Some(crate::debug::vulkan_debug_callback));

        let messenger = debug_utils
            .create_debug_utils_messenger(&debug_info, None)
            .map_err(|e| {
                engine_error!(SOURCE, "Failed to create debug messenger: {:?}", e);
                Error::InitializationFailed(format!("Failed to create debug messenger: {:?}", e))
            })?;

        Ok((debug_utils, messenger))
    }

    #[cfg(not(feature = "vulkan-validation"))]
    unsafe fn create_debug_messenger(
        _entry: &ash::Entry,
        _instance: &ash::Instance,
    ) -> Result<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)> {
        Err(Error::Unsupported("debug messenger without `vulkan-validation`".to_string()))
    }

    /// Number of image views currently held in descriptor slots
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    fn create_view(
        &mut self,
        location: DescriptorLocation,
        image: &VulkanImage,
        view_type: vk::ImageViewType,
        aspect_mask: vk::ImageAspectFlags,
        level_count: u32,
        layer_count: u32,
    ) -> Result<()> {
        if self.views.contains_key(&location) {
            engine_bail!(SOURCE, "Descriptor {:?} written while still occupied", location);
        }

        let view_info = vk::ImageViewCreateInfo::default()
            .image(image.image)
            .view_type(view_type)
            .format(format_to_vk(image.desc.format))
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask,
                base_mip_level: 0,
                level_count,
                base_array_layer: 0,
                layer_count,
            });

        let view = unsafe { self.device.create_image_view(&view_info, None) }
            .map_err(|e| engine_err!(SOURCE, "Failed to create image view for {:?}: {:?}", location, e))?;

        self.views.insert(location, view);
        Ok(())
    }

    /// Host-visible buffer holding a copy of `data`
    fn create_staging_buffer(&mut self, data: &[u8]) -> Result<(vk::Buffer, Allocation)> {
        unsafe {
            let buffer_info = vk::BufferCreateInfo::default()
                .size(data.len() as u64)
                .usage(vk::BufferUsageFlags::TRANSFER_SRC)
                .sharing_mode(vk::SharingMode::EXCLUSIVE);

            let buffer = self.device.create_buffer(&buffer_info, None)
                .map_err(|e| engine_err!(SOURCE, "Failed to create staging buffer: {:?}", e))?;

            let requirements = self.device.get_buffer_memory_requirements(buffer);

            let allocation = match self.allocator.allocate(&AllocationCreateDesc {
                name: "staging_buffer",
                requirements,
                location: MemoryLocation::CpuToGpu,
                linear: true,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            }) {
                Ok(allocation) => allocation,
                Err(e) => {
                    self.device.destroy_buffer(buffer, None);
                    engine_error!(SOURCE, "Failed to allocate staging memory: {:?}", e);
                    return Err(Error::OutOfMemory);
                }
            };

            let staged = match allocation.mapped_ptr() {
                Some(ptr) => {
                    std::ptr::copy_nonoverlapping(data.as_ptr(), ptr.as_ptr() as *mut u8, data.len());
                    self.device.bind_buffer_memory(buffer, allocation.memory(), allocation.offset())
                        .map_err(|e| engine_err!(SOURCE, "Failed to bind staging buffer memory: {:?}", e))
                }
                None => Err(engine_err!(SOURCE, "Staging buffer memory is not host mapped")),
            };

            if let Err(e) = staged {
                self.device.destroy_buffer(buffer, None);
                self.free_allocation(allocation);
                return Err(e);
            }

            Ok((buffer, allocation))
        }
    }

    /// Record and submit the staging copy, then wait for it
    fn copy_staging_to_image(
        &self,
        staging_buffer: vk::Buffer,
        image: &VulkanImage,
        subresources: &[ImageSubresourceData],
    ) -> Result<()> {
        unsafe {
            let command_buffer_allocate_info = vk::CommandBufferAllocateInfo::default()
                .command_pool(self.upload_command_pool)
                .level(vk::CommandBufferLevel::PRIMARY)
                .command_buffer_count(1);

            let command_buffers = self.device.allocate_command_buffers(&command_buffer_allocate_info)
                .map_err(|e| engine_err!(SOURCE, "Failed to allocate upload command buffer: {:?}", e))?;
            let command_buffer = command_buffers[0];

            let result = self.record_and_submit(command_buffer, staging_buffer, image, subresources);

            self.device.free_command_buffers(self.upload_command_pool, &command_buffers);
            result
        }
    }

    unsafe fn record_and_submit(
        &self,
        command_buffer: vk::CommandBuffer,
        staging_buffer: vk::Buffer,
        image: &VulkanImage,
        subresources: &[ImageSubresourceData],
    ) -> Result<()> {
        let aspect_mask = sampled_aspect_for_format(image.desc.format);
        let full_range = vk::ImageSubresourceRange {
            aspect_mask,
            base_mip_level: 0,
            level_count: image.desc.mip_levels,
            base_array_layer: 0,
            layer_count: image.desc.layers,
        };

        let begin_info = vk::CommandBufferBeginInfo::default()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

        self.device.begin_command_buffer(command_buffer, &begin_info)
            .map_err(|e| engine_err!(SOURCE, "Failed to begin upload command buffer: {:?}", e))?;

        // UNDEFINED -> TRANSFER_DST_OPTIMAL
        let to_transfer = vk::ImageMemoryBarrier::default()
            .old_layout(vk::ImageLayout::UNDEFINED)
            .new_layout(vk::ImageLayout::TRANSFER_DST_OPTIMAL)
            .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .image(image.image)
            .subresource_range(full_range)
            .src_access_mask(vk::AccessFlags::empty())
            .dst_access_mask(vk::AccessFlags::TRANSFER_WRITE);

        self.device.cmd_pipeline_barrier(
            command_buffer,
            vk::PipelineStageFlags::TOP_OF_PIPE,
            vk::PipelineStageFlags::TRANSFER,
            vk::DependencyFlags::empty(),
            &[],
            &[],
            &[to_transfer],
        );

        let regions: Vec<vk::BufferImageCopy> = subresources
            .iter()
            .map(|sub| {
                vk::BufferImageCopy::default()
                    .buffer_offset(sub.offset)
                    .buffer_row_length(0)
                    .buffer_image_height(0)
                    .image_subresource(vk::ImageSubresourceLayers {
                        aspect_mask,
                        mip_level: sub.mip_level,
                        base_array_layer: sub.layer,
                        layer_count: 1,
                    })
                    .image_offset(vk::Offset3D { x: 0, y: 0, z: 0 })
                    .image_extent(vk::Extent3D {
                        width: sub.width,
                        height: sub.height,
                        depth: 1,
                    })
            })
            .collect();

        self.device.cmd_copy_buffer_to_image(
            command_buffer,
            staging_buffer,
            image.image,
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            &regions,
        );

        // TRANSFER_DST_OPTIMAL -> SHADER_READ_ONLY_OPTIMAL
        let to_shader_read = vk::ImageMemoryBarrier::default()
            .old_layout(vk::ImageLayout::TRANSFER_DST_OPTIMAL)
            .new_layout(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL)
            .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .image(image.image)
            .subresource_range(full_range)
            .src_access_mask(vk::AccessFlags::TRANSFER_WRITE)
            .dst_access_mask(vk::AccessFlags::SHADER_READ);

        self.device.cmd_pipeline_barrier(
            command_buffer,
            vk::PipelineStageFlags::TRANSFER,
            vk::PipelineStageFlags::FRAGMENT_SHADER,
            vk::DependencyFlags::empty(),
            &[],
            &[],
            &[to_shader_read],
        );

        self.device.end_command_buffer(command_buffer)
            .map_err(|e| engine_err!(SOURCE, "Failed to end upload command buffer: {:?}", e))?;

        let fence = self.device.create_fence(&vk::FenceCreateInfo::default(), None)
            .map_err(|e| engine_err!(SOURCE, "Failed to create upload fence: {:?}", e))?;

        let command_buffers_submit = [command_buffer];
        let submit_info = vk::SubmitInfo::default()
            .command_buffers(&command_buffers_submit);

        let submitted = self.device
            .queue_submit(self.graphics_queue, &[submit_info], fence)
            .map_err(|e| engine_err!(SOURCE, "Failed to submit upload commands: {:?}", e))
            .and_then(|_| {
                self.device
                    .wait_for_fences(&[fence], true, u64::MAX)
                    .map_err(|e| engine_err!(SOURCE, "Failed to wait for upload completion: {:?}", e))
            });

        self.device.destroy_fence(fence, None);
        submitted
    }

    fn free_allocation(&mut self, allocation: Allocation) {
        if let Err(e) = self.allocator.free(allocation) {
            engine_warn!(SOURCE, "Failed to free GPU allocation: {:?}", e);
        }
    }
}

impl GpuDevice for VulkanDevice {
    type Image = VulkanImage;
    type Buffer = VulkanBuffer;

    fn name(&self) -> &str {
        &self.name
    }

    fn supports_format(&self, format: PixelFormat, usage: ImageUsage) -> bool {
        let properties = unsafe {
            self.instance
                .get_physical_device_format_properties(self.physical_device, format_to_vk(format))
        };
        properties
            .optimal_tiling_features
            .contains(format_features_for_usage(usage))
    }

    fn create_image(&mut self, desc: &ImageDesc) -> Result<VulkanImage> {
        let samples = sample_count_to_vk(desc.sample_count).ok_or_else(|| {
            Error::Unsupported(format!("{} samples per pixel", desc.sample_count))
        })?;

        let flags = if desc.texture_type == TextureType::TextureCube {
            vk::ImageCreateFlags::CUBE_COMPATIBLE
        } else {
            vk::ImageCreateFlags::empty()
        };

        unsafe {
            let image_info = vk::ImageCreateInfo::default()
                .flags(flags)
                .image_type(vk::ImageType::TYPE_2D)
                .format(format_to_vk(desc.format))
                .extent(vk::Extent3D {
                    width: desc.width,
                    height: desc.height,
                    depth: 1,
                })
                .mip_levels(desc.mip_levels)
                .array_layers(desc.layers)
                .samples(samples)
                .tiling(vk::ImageTiling::OPTIMAL)
                .usage(image_usage_to_vk(desc.usage))
                .sharing_mode(vk::SharingMode::EXCLUSIVE)
                .initial_layout(vk::ImageLayout::UNDEFINED);

            let image = self.device.create_image(&image_info, None)
                .map_err(|e| engine_err!(SOURCE, "Failed to create {}x{} {:?} image: {:?}",
                    desc.width, desc.height, desc.format, e))?;

            let requirements = self.device.get_image_memory_requirements(image);

            let allocation = match self.allocator.allocate(&AllocationCreateDesc {
                name: "image",
                requirements,
                location: MemoryLocation::GpuOnly,
                linear: false,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            }) {
                Ok(allocation) => allocation,
                Err(_e) => {
                    self.device.destroy_image(image, None);
                    let size_mb = requirements.size as f64 / (1024.0 * 1024.0);
                    engine_error!(SOURCE, "Out of GPU memory for image (required: {:.2} MB)", size_mb);
                    return Err(Error::OutOfMemory);
                }
            };

            if let Err(e) = self.device.bind_image_memory(image, allocation.memory(), allocation.offset()) {
                self.device.destroy_image(image, None);
                self.free_allocation(allocation);
                return Err(engine_err!(SOURCE, "Failed to bind image memory: {:?}", e));
            }

            Ok(VulkanImage {
                image,
                allocation,
                desc: desc.clone(),
            })
        }
    }

    fn destroy_image(&mut self, image: VulkanImage) {
        unsafe { self.device.destroy_image(image.image, None) };
        self.free_allocation(image.allocation);
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<VulkanBuffer> {
        unsafe {
            let buffer_info = vk::BufferCreateInfo::default()
                .size(desc.size)
                .usage(buffer_usage_to_vk(desc.usage))
                .sharing_mode(vk::SharingMode::EXCLUSIVE);

            let buffer = self.device.create_buffer(&buffer_info, None)
                .map_err(|e| engine_err!(SOURCE, "Failed to create buffer of size {} bytes: {:?}", desc.size, e))?;

            let requirements = self.device.get_buffer_memory_requirements(buffer);

            let allocation = match self.allocator.allocate(&AllocationCreateDesc {
                name: if desc.stream { "stream_buffer" } else { "buffer" },
                requirements,
                location: MemoryLocation::CpuToGpu,
                linear: true,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            }) {
                Ok(allocation) => allocation,
                Err(_e) => {
                    self.device.destroy_buffer(buffer, None);
                    let size_mb = requirements.size as f64 / (1024.0 * 1024.0);
                    engine_error!(SOURCE, "Out of GPU memory for buffer (required: {:.2} MB)", size_mb);
                    return Err(Error::OutOfMemory);
                }
            };

            if let Err(e) = self.device.bind_buffer_memory(buffer, allocation.memory(), allocation.offset()) {
                self.device.destroy_buffer(buffer, None);
                self.free_allocation(allocation);
                return Err(engine_err!(SOURCE, "Failed to bind buffer memory: {:?}", e));
            }

            Ok(VulkanBuffer {
                buffer,
                allocation,
                size: desc.size,
            })
        }
    }

    fn destroy_buffer(&mut self, buffer: VulkanBuffer) {
        unsafe { self.device.destroy_buffer(buffer.buffer, None) };
        self.free_allocation(buffer.allocation);
    }

    fn write_render_target_view(&mut self, location: DescriptorLocation, image: &VulkanImage) -> Result<()> {
        self.create_view(
            location,
            image,
            vk::ImageViewType::TYPE_2D,
            aspect_for_format(image.desc.format),
            1,
            1,
        )
    }

    fn write_depth_stencil_view(&mut self, location: DescriptorLocation, image: &VulkanImage) -> Result<()> {
        self.create_view(
            location,
            image,
            vk::ImageViewType::TYPE_2D,
            aspect_for_format(image.desc.format),
            1,
            1,
        )
    }

    fn write_shader_resource_view(&mut self, location: DescriptorLocation, image: &VulkanImage) -> Result<()> {
        self.create_view(
            location,
            image,
            view_type_for(image.desc.texture_type),
            sampled_aspect_for_format(image.desc.format),
            image.desc.mip_levels,
            image.desc.layers,
        )
    }

    fn release_view(&mut self, location: DescriptorLocation) {
        if let Some(view) = self.views.remove(&location) {
            unsafe { self.device.destroy_image_view(view, None) };
        }
    }

    fn upload_image(
        &mut self,
        image: &VulkanImage,
        data: &[u8],
        subresources: &[ImageSubresourceData],
    ) -> Result<()> {
        if data.is_empty() || subresources.is_empty() {
            return Ok(());
        }
        if let Some(sub) = subresources.iter().find(|sub| sub.offset + sub.size > data.len() as u64) {
            engine_bail!(SOURCE, "Subresource layer {} mip {} reaches past the {} byte pixel blob",
                sub.layer, sub.mip_level, data.len());
        }

        let (staging_buffer, staging_allocation) = self.create_staging_buffer(data)?;
        let result = self.copy_staging_to_image(staging_buffer, image, subresources);

        unsafe { self.device.destroy_buffer(staging_buffer, None) };
        self.free_allocation(staging_allocation);
        result
    }

    fn upload_buffer(&mut self, buffer: &VulkanBuffer, offset: u64, data: &[u8]) -> Result<()> {
        if offset + data.len() as u64 > buffer.size {
            engine_bail!(SOURCE, "Buffer write out of bounds: offset {} + {} bytes > buffer size {}",
                offset, data.len(), buffer.size);
        }

        let ptr = buffer
            .allocation
            .mapped_ptr()
            .ok_or_else(|| engine_err!(SOURCE, "Buffer memory is not host mapped"))?;

        unsafe {
            let dst = (ptr.as_ptr() as *mut u8).add(offset as usize);
            std::ptr::copy_nonoverlapping(data.as_ptr(), dst, data.len());
        }
        Ok(())
    }
}

impl Drop for VulkanDevice {
    fn drop(&mut self) {
        unsafe {
            // Wait for device to finish
            self.device.device_wait_idle().ok();

            if !self.views.is_empty() {
                engine_warn!(SOURCE, "{} image view(s) still written at shutdown", self.views.len());
            }
            for (_, view) in self.views.drain() {
                self.device.destroy_image_view(view, None);
            }

            self.device.destroy_command_pool(self.upload_command_pool, None);

            // Free VkDeviceMemory pages BEFORE destroying the device
            ManuallyDrop::drop(&mut self.allocator);

            // Messenger goes before the instance
            if let Some((debug_utils, messenger)) = self.debug_messenger.take() {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }

            self.device.destroy_device(None);
            self.instance.destroy_instance(None);
        }
    }
}
