use core::{
    alloc::{GlobalAlloc, Layout},
    mem::size_of,
    ptr::NonNull,
};

use bytemuck::Zeroable;

use crate::{
    failure::AllocationFailure,
    global::{Global, GLOBAL},
    owned::Owned,
    result::CheckedResult,
};

/// Asks `allocator` for one block of `layout`, zero-filled if `zeroed`.
/// Zero-byte layouts are refused before the allocator is called.
pub(crate) fn allocate<A: GlobalAlloc>(
    allocator: &A,
    layout: Layout,
    zeroed: bool,
) -> Result<NonNull<u8>, AllocationFailure> {
    if layout.size() == 0 {
        tracing::debug!(align = layout.align(), "refusing zero-sized allocation");
        return Err(AllocationFailure::ZeroSized);
    }
    let ptr = unsafe {
        if zeroed {
            allocator.alloc_zeroed(layout)
        } else {
            allocator.alloc(layout)
        }
    };
    match NonNull::new(ptr) {
        Some(ptr) => {
            tracing::trace!(size = layout.size(), align = layout.align(), "allocated");
            Ok(ptr)
        }
        None => {
            tracing::debug!(size = layout.size(), align = layout.align(), "allocator returned null");
            Err(AllocationFailure::OutOfMemory { layout })
        }
    }
}

fn array_layout<T>(count: usize) -> Result<Layout, AllocationFailure> {
    if count == 0 || size_of::<T>() == 0 {
        return Err(AllocationFailure::ZeroSized);
    }
    Layout::array::<T>(count).map_err(|_| {
        tracing::debug!(count, elem_size = size_of::<T>(), "array layout overflows");
        AllocationFailure::LayoutOverflow
    })
}

/// Allocates `count` zeroed `T`s from the global allocator.
///
/// ```
/// use checked_alloc::checked_alloc;
///
/// let value = checked_alloc::<i32>(1).dispatch(
///     |mut ints| {
///         ints[0] = 5;
///         ints[0]
///     },
///     |_| 0,
/// );
/// assert_eq!(value, 5);
/// ```
pub fn checked_alloc<T: Zeroable>(count: usize) -> CheckedResult<Owned<'static, [T], Global>> {
    checked_alloc_in(&GLOBAL, count)
}

/// Allocates `count` zeroed `T`s from `allocator`.
pub fn checked_alloc_in<'a, T: Zeroable, A: GlobalAlloc>(
    allocator: &'a A,
    count: usize,
) -> CheckedResult<Owned<'a, [T], A>> {
    let result = array_layout::<T>(count).and_then(|layout| {
        let ptr = allocate(allocator, layout, true)?;
        let slice = NonNull::slice_from_raw_parts(ptr.cast::<T>(), count);
        // All-zero bytes are a valid `T` because `T: Zeroable`.
        Ok(unsafe { Owned::from_raw_parts(slice, layout, allocator) })
    });
    result.into()
}

/// Moves `value` into freshly allocated global memory.
pub fn checked_new<T>(value: T) -> CheckedResult<Owned<'static, T, Global>> {
    checked_new_in(&GLOBAL, value)
}

/// Moves `value` into memory from `allocator`. On failure `value` is dropped.
pub fn checked_new_in<T, A: GlobalAlloc>(allocator: &A, value: T) -> CheckedResult<Owned<'_, T, A>> {
    let layout = Layout::new::<T>();
    let result = allocate(allocator, layout, false).map(|ptr| {
        let ptr = ptr.cast::<T>();
        unsafe {
            ptr.as_ptr().write(value);
            Owned::from_raw_parts(ptr, layout, allocator)
        }
    });
    result.into()
}
