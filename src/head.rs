use core::cell::Cell;
#[cfg(feature = "atomics")]
use core::sync::atomic::{AtomicUsize, Ordering};

/// The head is the cursor that gets bumped in a bump allocator.
/// It tracks how many bytes of the arena are in use.
pub trait Head {
    fn num_bytes_used(&self) -> usize;
    /// Moves the head from `current` to `new`. Returns `false` if the head
    /// was no longer at `current`.
    fn claim(&self, current: usize, new: usize) -> bool;
    fn set(&self, v: usize);
}

#[cfg(feature = "atomics")]
#[derive(Debug, Default)]
pub struct ThreadSafeHead(AtomicUsize);

#[cfg(feature = "atomics")]
impl ThreadSafeHead {
    pub const fn new() -> Self {
        ThreadSafeHead(AtomicUsize::new(0))
    }
}

#[cfg(feature = "atomics")]
impl Head for ThreadSafeHead {
    fn num_bytes_used(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn claim(&self, current: usize, new: usize) -> bool {
        self.0
            .compare_exchange(current, new, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn set(&self, v: usize) {
        self.0.store(v, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
pub struct SingleThreadedHead(Cell<usize>);

impl SingleThreadedHead {
    pub const fn new() -> Self {
        SingleThreadedHead(Cell::new(0))
    }
}

impl Head for SingleThreadedHead {
    fn num_bytes_used(&self) -> usize {
        self.0.get()
    }

    fn claim(&self, current: usize, new: usize) -> bool {
        if self.0.get() != current {
            return false;
        }
        self.0.set(new);
        true
    }

    fn set(&self, v: usize) {
        self.0.set(v);
    }
}
