/*!
# GPU Lifecycle

Backend-agnostic lifecycle management for GPU resources.

Resources (render targets, pixel-data textures, meshes) are described by
immutable setup values and turned into live records by factories. Every GPU
object and descriptor slot is released through a frame-indexed deferred path,
so nothing is freed while an in-flight frame may still reference it.

## Architecture

- **GpuDevice**: Backend seam (image/buffer creation, view writes, uploads)
- **ResourceAllocator**: Owns backend objects, reference counting, deferred destruction
- **DescriptorAllocator**: Fixed-capacity view heaps with deferred slot reuse
- **TextureFactory / MeshFactory**: Build and tear down resource records
- **GfxContext**: Explicit bundle of device, allocators, frame clock and display
- **ResourceManager**: Pools of records keyed by generational ids

Backend implementations (e.g. `gpu_lifecycle_vulkan`) provide a `GpuDevice`.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod config;
pub mod display;
pub mod device;
pub mod descriptor;
pub mod allocator;
pub mod context;
pub mod resource;
pub mod factory;
pub mod utils;

// Main gfx namespace module
pub mod gfx {
    // Error types
    pub use crate::error::{Error, Result};

    // Logger owner
    pub use crate::engine::Engine;

    pub use crate::config::GfxConfig;
    pub use crate::context::{FrameClock, GfxContext, RenderState};
    pub use crate::device::GpuDevice;
    pub use crate::display::{DisplayAttrs, DisplayProvider, HeadlessDisplay};

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
    }

    pub mod device {
        pub use crate::device::*;
    }

    pub mod descriptor {
        pub use crate::descriptor::*;
    }

    pub mod allocator {
        pub use crate::allocator::*;
    }

    pub mod resource {
        pub use crate::resource::*;
    }

    pub mod factory {
        pub use crate::factory::*;
    }
}
