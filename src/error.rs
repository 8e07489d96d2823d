use std::alloc::Layout;

use thiserror::Error;

/// The error type of fallible list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The allocator could not provide memory for a node or a list header.
    ///
    /// The list being mutated is left exactly as it was before the call.
    #[error("failed to allocate {} bytes for a list node", .layout.size())]
    Alloc { layout: Layout },
    /// The duplicate method reported that a value could not be copied.
    #[error("the duplicate method failed to copy a value")]
    Duplicate,
}

pub type Result<T> = std::result::Result<T, Error>;
