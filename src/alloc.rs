//! The allocator used by a [`List`] for its nodes.
//!
//! [`List`]: crate::List

use std::alloc::Layout;
use std::ptr::NonNull;

use crate::error::{Error, Result};

/// A source of raw memory for list nodes.
///
/// Unlike the global allocation functions, [`RawAlloc::allocate`] reports
/// exhaustion as an [`Error::Alloc`] instead of aborting, so that every list
/// operation that needs a new node can fail without touching the list.
///
/// # Safety
///
/// Implementors must return blocks that fit `layout` (size and alignment),
/// and must accept in [`RawAlloc::deallocate`] any block returned by *any*
/// instance of the same type. [`List::join`] moves nodes from one list to
/// another, so they will be released by a different instance than the one
/// that allocated them.
///
/// [`List::join`]: crate::List::join
pub unsafe trait RawAlloc {
    /// Allocate a block of memory described by `layout`.
    ///
    /// `layout` never has a zero size.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>>;

    /// Release a block of memory.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by [`RawAlloc::allocate`] with the same
    /// `layout`, and must not have been released yet.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The global memory allocator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

unsafe impl RawAlloc for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        debug_assert_ne!(layout.size(), 0);
        // SAFETY: list nodes always carry two links, so `layout` is never zero-sized.
        NonNull::new(unsafe { std::alloc::alloc(layout) }).ok_or(Error::Alloc { layout })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        std::alloc::dealloc(ptr.as_ptr(), layout)
    }
}

unsafe impl<A: RawAlloc + ?Sized> RawAlloc for &A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }
}
