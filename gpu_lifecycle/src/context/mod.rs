//! Explicit device/allocator context and per-frame state

mod frame_clock;
mod gfx_context;
mod render_state;

pub use frame_clock::FrameClock;
pub use gfx_context::GfxContext;
pub use render_state::RenderState;
