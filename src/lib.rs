//! Allocation results as values.
//!
//! Every allocation function in this crate returns a [`CheckedResult`]: either
//! an [`AllocationFailure`] describing why no memory was handed out, or an
//! [`Owned`] handle that solely owns the new allocation. Nothing panics on
//! allocation failure; the caller has to [`dispatch`](CheckedResult::dispatch)
//! to one of two handlers.
//!
//! ```
//! use checked_alloc::{bump::BumpAllocator, checked_alloc_in, CheckedOnHeap};
//!
//! let mut result = i32::checked_on_heap();
//! result.visit_mut(|v| **v = 5, |failure| panic!("{}", failure));
//! assert_eq!(result.success().map(|v| *v), Some(5));
//!
//! let mut arena = [0u8; 4];
//! let allocator = BumpAllocator::default_single_threaded(&mut arena);
//! let message = checked_alloc_in::<u64, _>(&allocator, 1)
//!     .dispatch(|_| String::new(), |failure| failure.to_string());
//! assert_eq!(message, "alloc failed");
//! ```
#![no_std]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub(crate) mod head;

pub mod bump;
pub mod checked;
pub mod failure;
pub mod global;
pub mod on_heap;
pub mod owned;
pub mod result;

pub use checked::{checked_alloc, checked_alloc_in, checked_new, checked_new_in};
pub use failure::AllocationFailure;
pub use global::Global;
#[cfg(feature = "atomics")]
pub use head::ThreadSafeHead;
pub use head::{Head, SingleThreadedHead};
pub use on_heap::CheckedOnHeap;
pub use owned::Owned;
pub use result::CheckedResult;
