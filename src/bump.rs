use core::{
    alloc::{GlobalAlloc, Layout},
    fmt::Debug,
    marker::PhantomData,
    ptr::{null_mut, NonNull},
};

#[cfg(feature = "atomics")]
use crate::head::ThreadSafeHead;
use crate::head::{Head, SingleThreadedHead};

/// Memory a [`BumpAllocator`] hands out.
pub trait BumpAllocatorMemory {
    fn start(&self) -> *mut u8;
    fn size(&self) -> usize;
}

/// A borrowed, fixed-size byte slice used as arena.
pub struct SliceMemory<'a> {
    start: NonNull<u8>,
    size: usize,
    lifetime: PhantomData<&'a mut [u8]>,
}

impl<'a> From<&'a mut [u8]> for SliceMemory<'a> {
    fn from(arena: &'a mut [u8]) -> Self {
        SliceMemory {
            size: arena.len(),
            start: NonNull::from(arena).cast::<u8>(),
            lifetime: PhantomData,
        }
    }
}

// Only ever written through pointers handed out by the allocator.
unsafe impl<'a> Send for SliceMemory<'a> {}
unsafe impl<'a> Sync for SliceMemory<'a> {}

impl<'a> BumpAllocatorMemory for SliceMemory<'a> {
    fn start(&self) -> *mut u8 {
        self.start.as_ptr()
    }

    fn size(&self) -> usize {
        self.size
    }
}

/// A bump allocator working on memory `M`, tracking where the remaining
/// free memory starts using head `H`.
///
/// Freeing is a no-op. Memory is only reclaimed by [`reset`](BumpAllocator::reset),
/// which needs exclusive access and therefore cannot run while any allocation
/// borrowing the allocator is alive.
pub struct BumpAllocator<M: BumpAllocatorMemory, H: Head = SingleThreadedHead> {
    head: H,
    memory: M,
}

impl<M: BumpAllocatorMemory, H: Head> Debug for BumpAllocator<M, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BumpAllocator")
            .field("head", &self.head.num_bytes_used())
            .field("size", &self.memory.size())
            .finish()
    }
}

#[cfg(feature = "atomics")]
impl<'a> BumpAllocator<SliceMemory<'a>, ThreadSafeHead> {
    pub fn default_threadsafe(arena: &'a mut [u8]) -> Self {
        Self::new(arena.into(), ThreadSafeHead::new())
    }
}

impl<'a> BumpAllocator<SliceMemory<'a>, SingleThreadedHead> {
    pub fn default_single_threaded(arena: &'a mut [u8]) -> Self {
        Self::new(arena.into(), SingleThreadedHead::new())
    }
}

impl<M: BumpAllocatorMemory, H: Head> BumpAllocator<M, H> {
    pub const fn new(memory: M, head: H) -> Self {
        BumpAllocator { head, memory }
    }

    pub fn num_bytes_used(&self) -> usize {
        self.head.num_bytes_used()
    }

    pub fn remaining(&self) -> usize {
        self.memory.size().saturating_sub(self.num_bytes_used())
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Marks the whole arena as free again.
    pub fn reset(&mut self) {
        self.head.set(0);
    }

    /// Offset of the first byte of an allocation of `layout` placed after
    /// `used` bytes, and the head position after it.
    fn place(&self, used: usize, layout: Layout) -> Option<(usize, usize)> {
        let cursor = (self.memory.start() as usize).checked_add(used)?;
        let padding = cursor.wrapping_neg() & (layout.align() - 1);
        let offset = used.checked_add(padding)?;
        let end = offset.checked_add(layout.size())?;
        Some((offset, end))
    }
}

unsafe impl<M: BumpAllocatorMemory, H: Head> GlobalAlloc for BumpAllocator<M, H> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        loop {
            let used = self.head.num_bytes_used();
            let Some((offset, end)) = self.place(used, layout) else {
                return null_mut();
            };
            if end > self.memory.size() {
                tracing::debug!(
                    requested = layout.size(),
                    remaining = self.remaining(),
                    "arena exhausted"
                );
                return null_mut();
            }
            if self.head.claim(used, end) {
                return self.memory.start().add(offset);
            }
        }
    }

    unsafe fn dealloc(&self, _ptr: *mut u8, _layout: Layout) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{thread_rng, Rng};
    use std::vec::Vec;

    #[test]
    fn increment() {
        let mut arena = [0u8; 1024];
        let allocator = BumpAllocator::default_single_threaded(arena.as_mut_slice());
        unsafe {
            let ptr1 = allocator.alloc(Layout::from_size_align(3, 4).unwrap()) as usize;
            assert!(ptr1 % 4 == 0);
            let ptr2 = allocator.alloc(Layout::from_size_align(3, 4).unwrap()) as usize;
            assert!(ptr2 % 4 == 0);
            assert!(
                ptr1 + 4 == ptr2,
                "Expected ptr2 to be 4 bytes after pt1, got ptr1=0x{:08x} ptr2=0x{:08x}",
                ptr1,
                ptr2
            );
        }
    }

    #[test]
    fn null() {
        let mut arena = [0u64; 1];
        let bytes = bytemuck::cast_slice_mut::<u64, u8>(&mut arena[..]);
        let allocator = BumpAllocator::default_single_threaded(&mut bytes[..4]);
        unsafe {
            let ptr1 = allocator.alloc(Layout::from_size_align(4, 4).unwrap()) as usize;
            assert_eq!(ptr1 % 4, 0);
            let ptr2 = allocator.alloc(Layout::from_size_align(4, 4).unwrap()) as usize;
            assert_eq!(ptr2, 0);
        }
    }

    #[test]
    fn use_last_byte() {
        let mut arena = [0u32; 1];
        let bytes = bytemuck::cast_slice_mut::<u32, u8>(&mut arena[..]);
        let last_byte = bytes.as_ptr() as usize + 3;
        let allocator = BumpAllocator::default_single_threaded(bytes);
        unsafe {
            let ptr1 = allocator.alloc(Layout::from_size_align(3, 4).unwrap()) as usize;
            assert_eq!(ptr1 % 4, 0);
            let ptr2 = allocator.alloc(Layout::from_size_align(1, 1).unwrap()) as usize;
            assert_eq!(ptr2, last_byte);
        }
        assert_eq!(allocator.remaining(), 0);
    }

    #[test]
    fn reset_reclaims_arena() {
        let mut arena = [0u8; 16];
        let mut allocator = BumpAllocator::default_single_threaded(arena.as_mut_slice());
        let layout = Layout::from_size_align(16, 1).unwrap();
        let first = unsafe { allocator.alloc(layout) };
        assert_eq!(first, allocator.memory().start());
        assert_eq!(allocator.memory().size(), 16);
        assert!(unsafe { allocator.alloc(layout) }.is_null());
        allocator.reset();
        assert_eq!(allocator.num_bytes_used(), 0);
        assert_eq!(unsafe { allocator.alloc(layout) }, first);
    }

    #[test]
    fn minifuzz() {
        const SIZE: usize = 1024 * 1024;

        let mut rng = thread_rng();

        for _attempts in 1..100 {
            let mut arena = Vec::with_capacity(SIZE);
            arena.resize(SIZE, 0u8);
            let start = arena.as_ptr() as usize;
            let allocator = BumpAllocator::default_single_threaded(arena.as_mut_slice());
            let mut last_end: Option<usize> = None;
            for _allocation in 1..10 {
                let size = rng.gen_range(1..=32);
                let alignment = 1 << rng.gen_range(1..=5);
                let layout = Layout::from_size_align(size, alignment).unwrap();
                let ptr = unsafe { allocator.alloc(layout) as usize };
                if let Some(last_end) = last_end {
                    assert!(ptr >= last_end, "Allocations overlap");
                }
                last_end = Some(ptr + size);
                assert_eq!(ptr % alignment, 0);
                assert!(ptr + size <= start + SIZE);
            }
        }
    }

    #[cfg(feature = "atomics")]
    #[test]
    fn threadsafe_no_overlap() {
        const THREADS: usize = 4;
        const PER_THREAD: usize = 64;

        let mut arena = std::vec![0u8; THREADS * PER_THREAD * 8];
        let allocator = BumpAllocator::default_threadsafe(arena.as_mut_slice());
        let layout = Layout::from_size_align(8, 8).unwrap();
        let mut ptrs: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(|| {
                        (0..PER_THREAD)
                            .map(|_| unsafe { allocator.alloc(layout) as usize })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        assert!(ptrs.iter().all(|&p| p != 0));
        ptrs.sort_unstable();
        ptrs.dedup();
        assert_eq!(ptrs.len(), THREADS * PER_THREAD);
    }
}
