/// Monotonic frame counter, advanced once per submitted frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameClock {
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the frame currently being recorded
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Move to the next frame and return its index
    pub fn advance(&mut self) -> u64 {
        self.frame_index += 1;
        self.frame_index
    }
}
