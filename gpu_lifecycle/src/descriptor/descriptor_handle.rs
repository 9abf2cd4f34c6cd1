/// Descriptor heap regions, handles and backend slot locations

/// Kind of view a descriptor heap region holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescriptorRegion {
    /// Color attachment views
    RenderTargetView,
    /// Depth/stencil attachment views
    DepthStencilView,
    /// Sampled texture views
    ShaderResourceView,
    /// Sampler states
    Sampler,
}

impl DescriptorRegion {
    /// Every region, in heap order
    pub const ALL: [DescriptorRegion; 4] = [
        DescriptorRegion::RenderTargetView,
        DescriptorRegion::DepthStencilView,
        DescriptorRegion::ShaderResourceView,
        DescriptorRegion::Sampler,
    ];

    /// Position of this region in `ALL`
    pub fn index(&self) -> usize {
        match self {
            DescriptorRegion::RenderTargetView => 0,
            DescriptorRegion::DepthStencilView => 1,
            DescriptorRegion::ShaderResourceView => 2,
            DescriptorRegion::Sampler => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DescriptorRegion::RenderTargetView => "RTV",
            DescriptorRegion::DepthStencilView => "DSV",
            DescriptorRegion::ShaderResourceView => "SRV",
            DescriptorRegion::Sampler => "Sampler",
        }
    }
}

/// Opaque reference to one slot in a descriptor heap region.
///
/// `DescriptorHandle::INVALID` (also the `Default`) marks "no descriptor".
/// Handles are plain values: copying one does not extend the slot's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorHandle {
    region: DescriptorRegion,
    slot: u32,
}

impl DescriptorHandle {
    /// The "no descriptor" sentinel
    pub const INVALID: DescriptorHandle = DescriptorHandle {
        region: DescriptorRegion::RenderTargetView,
        slot: u32::MAX,
    };

    pub(crate) fn new(region: DescriptorRegion, slot: u32) -> Self {
        Self { region, slot }
    }

    pub fn is_valid(&self) -> bool {
        self.slot != u32::MAX
    }

    pub fn region(&self) -> DescriptorRegion {
        self.region
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }
}

impl Default for DescriptorHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Backend-facing address of a heap slot.
///
/// Backends key their view objects by location; a location is only handed
/// out for live slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorLocation {
    pub region: DescriptorRegion,
    pub index: u32,
}
