//! Construction options.

use vecbase_alloc::{ErrorHandler, Global};

/// Options recognised when constructing a [`Vector`](crate::Vector) or
/// [`GrowVec`](crate::GrowVec).
///
/// All fields are fixed for the lifetime of the vector except the
/// capacity, which starts at `initial_capacity`.
///
/// ```
/// use vecbase::{Budget, VectorOptions};
///
/// let options = VectorOptions::new()
///     .with_capacity(64)
///     .with_ext_header(16)
///     .with_backend(Budget::new(4096));
/// assert_eq!(options.initial_capacity, 64);
/// ```
#[derive(Clone, Debug)]
pub struct VectorOptions<B = Global> {
    /// Element slots allocated at construction. Also the floor below which
    /// a growable vector never shrinks.
    ///
    /// Default: 10.
    pub initial_capacity: usize,

    /// Bytes reserved for the extension header. Default: 0 (no header).
    pub ext_header_size: usize,

    /// Bytes copied into the allocator parameter region at the front of
    /// the block. Default: empty.
    pub alloc_param: Vec<u8>,

    /// The allocation backend, owned by the vector. Default: [`Global`].
    pub backend: B,

    /// Called on every allocation failure. Default: print and abort.
    pub error_handler: ErrorHandler,
}

impl VectorOptions<Global> {
    /// Default initial capacity in elements.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

    /// Default options over the global allocator.
    pub fn new() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            ext_header_size: 0,
            alloc_param: Vec::new(),
            backend: Global,
            error_handler: ErrorHandler::abort(),
        }
    }
}

impl Default for VectorOptions<Global> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> VectorOptions<B> {
    /// Set the initial capacity.
    pub fn with_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Reserve `size` bytes of extension header.
    pub fn with_ext_header(mut self, size: usize) -> Self {
        self.ext_header_size = size;
        self
    }

    /// Set the allocator parameter bytes.
    pub fn with_alloc_param(mut self, param: impl Into<Vec<u8>>) -> Self {
        self.alloc_param = param.into();
        self
    }

    /// Install an error handler.
    pub fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
        self.error_handler = handler;
        self
    }

    /// Replace the backend, keeping every other option.
    pub fn with_backend<C>(self, backend: C) -> VectorOptions<C> {
        VectorOptions {
            initial_capacity: self.initial_capacity,
            ext_header_size: self.ext_header_size,
            alloc_param: self.alloc_param,
            backend,
            error_handler: self.error_handler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecbase_alloc::Budget;

    #[test]
    fn defaults() {
        let options = VectorOptions::default();
        assert_eq!(options.initial_capacity, 10);
        assert_eq!(options.ext_header_size, 0);
        assert!(options.alloc_param.is_empty());
        assert!(options.error_handler.is_abort());
    }

    #[test]
    fn with_backend_keeps_other_fields() {
        let options = VectorOptions::new()
            .with_capacity(3)
            .with_ext_header(8)
            .with_alloc_param([1, 2])
            .with_error_handler(ErrorHandler::new(|_| {}))
            .with_backend(Budget::new(128));
        assert_eq!(options.initial_capacity, 3);
        assert_eq!(options.ext_header_size, 8);
        assert_eq!(options.alloc_param, vec![1, 2]);
        assert!(!options.error_handler.is_abort());
        assert_eq!(options.backend.limit(), 128);
    }
}
