use bytemuck::Zeroable;
use core::alloc::{GlobalAlloc, Layout};

use crate::{
    checked::allocate,
    global::{Global, GLOBAL},
    owned::Owned,
    result::CheckedResult,
};

/// Allocates a single zeroed `Self` directly on the heap, without building
/// it on the stack first.
pub trait CheckedOnHeap: Sized {
    fn checked_on_heap() -> CheckedResult<Owned<'static, Self, Global>>;
    fn checked_on_heap_in<A: GlobalAlloc>(allocator: &A) -> CheckedResult<Owned<'_, Self, A>>;
}

impl<T: Zeroable> CheckedOnHeap for T {
    fn checked_on_heap() -> CheckedResult<Owned<'static, Self, Global>> {
        Self::checked_on_heap_in(&GLOBAL)
    }

    fn checked_on_heap_in<A: GlobalAlloc>(allocator: &A) -> CheckedResult<Owned<'_, Self, A>> {
        let layout = Layout::new::<T>();
        allocate(allocator, layout, true)
            .map(|ptr| unsafe { Owned::from_raw_parts(ptr.cast::<T>(), layout, allocator) })
            .into()
    }
}
