use alloc::boxed::Box;
use core::{
    alloc::{GlobalAlloc, Layout},
    fmt::{Debug, Formatter},
    marker::PhantomData,
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
    ptr::{self, NonNull},
};

use crate::global::{Global, GLOBAL};

/// Sole owner of a value living in memory obtained from allocator `A`.
///
/// Dropping an `Owned` drops the value in place and hands the memory back to
/// the same allocator, with the layout it was allocated with.
pub struct Owned<'a, T: ?Sized, A: GlobalAlloc = Global> {
    ptr: NonNull<T>,
    layout: Layout,
    allocator: &'a A,
    marker: PhantomData<T>,
}

impl<'a, T: ?Sized, A: GlobalAlloc> Owned<'a, T, A> {
    /// # Safety
    ///
    /// `ptr` must point to an initialized `T` inside a block allocated from
    /// `allocator` with exactly `layout`, and nothing else may own that block.
    pub(crate) unsafe fn from_raw_parts(ptr: NonNull<T>, layout: Layout, allocator: &'a A) -> Self {
        Owned {
            ptr,
            layout,
            allocator,
            marker: PhantomData,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn allocator(&self) -> &'a A {
        self.allocator
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }
}

impl<T: ?Sized> Owned<'static, T, Global> {
    /// Hands the allocation over to a `Box`. Both use the global allocator
    /// and the same layout, so no copy takes place.
    pub fn into_box(self) -> Box<T> {
        let this = ManuallyDrop::new(self);
        unsafe { Box::from_raw(this.ptr.as_ptr()) }
    }

    /// The allocator `Owned<'static, T>` values come from.
    pub fn global() -> &'static Global {
        &GLOBAL
    }
}

impl<'a, T: ?Sized, A: GlobalAlloc> Deref for Owned<'a, T, A> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { self.ptr.as_ref() }
    }
}

impl<'a, T: ?Sized, A: GlobalAlloc> DerefMut for Owned<'a, T, A> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { self.ptr.as_mut() }
    }
}

impl<'a, T: ?Sized, A: GlobalAlloc> Drop for Owned<'a, T, A> {
    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(self.ptr.as_ptr());
            self.allocator
                .dealloc(self.ptr.as_ptr() as *mut u8, self.layout);
        }
    }
}

impl<'a, T: ?Sized + Debug, A: GlobalAlloc> Debug for Owned<'a, T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Owned")
            .field("value", &&**self)
            .field("size", &self.layout.size())
            .field("align", &self.layout.align())
            .finish()
    }
}

impl<'a, T: ?Sized + PartialEq, A: GlobalAlloc> PartialEq for Owned<'a, T, A> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<'a, T: ?Sized + Eq, A: GlobalAlloc> Eq for Owned<'a, T, A> {}

unsafe impl<'a, T: ?Sized + Send, A: GlobalAlloc + Sync> Send for Owned<'a, T, A> {}
unsafe impl<'a, T: ?Sized + Sync, A: GlobalAlloc + Sync> Sync for Owned<'a, T, A> {}
