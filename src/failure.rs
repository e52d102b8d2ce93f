use core::alloc::Layout;

use thiserror::Error;

/// Why an allocation request produced no memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AllocationFailure {
    /// The allocator returned null for `layout`.
    #[error("alloc failed")]
    OutOfMemory { layout: Layout },
    /// Zero elements, or an element type without size, were requested.
    #[error("zero-sized allocation requested")]
    ZeroSized,
    #[error("requested allocation size overflows isize")]
    LayoutOverflow,
}

impl AllocationFailure {
    /// The layout the allocator refused, if the request got that far.
    pub fn layout(&self) -> Option<Layout> {
        match self {
            AllocationFailure::OutOfMemory { layout } => Some(*layout),
            _ => None,
        }
    }
}
