//! Display/framebuffer size provider
//!
//! Relative-sized render targets resolve their size from whatever the
//! display subsystem reports at creation time.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use winit::window::Window;

/// Current framebuffer dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayAttrs {
    pub framebuffer_width: u32,
    pub framebuffer_height: u32,
}

/// Anything that can report the current framebuffer size
pub trait DisplayProvider {
    fn display_attrs(&self) -> DisplayAttrs;
}

impl DisplayProvider for Window {
    fn display_attrs(&self) -> DisplayAttrs {
        let size = self.inner_size();
        DisplayAttrs {
            framebuffer_width: size.width,
            framebuffer_height: size.height,
        }
    }
}

impl<T: DisplayProvider + ?Sized> DisplayProvider for Rc<T> {
    fn display_attrs(&self) -> DisplayAttrs {
        (**self).display_attrs()
    }
}

impl<T: DisplayProvider + ?Sized> DisplayProvider for Arc<T> {
    fn display_attrs(&self) -> DisplayAttrs {
        (**self).display_attrs()
    }
}

/// Window-less display with a settable size (offscreen tools, tests)
#[derive(Debug)]
pub struct HeadlessDisplay {
    attrs: Cell<DisplayAttrs>,
}

impl HeadlessDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            attrs: Cell::new(DisplayAttrs {
                framebuffer_width: width,
                framebuffer_height: height,
            }),
        }
    }

    /// Change the reported framebuffer size
    pub fn resize(&self, width: u32, height: u32) {
        self.attrs.set(DisplayAttrs {
            framebuffer_width: width,
            framebuffer_height: height,
        });
    }
}

impl DisplayProvider for HeadlessDisplay {
    fn display_attrs(&self) -> DisplayAttrs {
        self.attrs.get()
    }
}
