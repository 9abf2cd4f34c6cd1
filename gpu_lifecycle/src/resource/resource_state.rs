/// Lifecycle state of a resource record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourceState {
    /// Not set up, or destroyed
    #[default]
    Initial,
    /// Fully set up and usable
    Valid,
    /// Setup rejected the input data
    Failed,
    /// Setup asked for something the backend does not provide
    InvalidState,
}

impl ResourceState {
    pub fn is_valid(&self) -> bool {
        *self == ResourceState::Valid
    }
}
