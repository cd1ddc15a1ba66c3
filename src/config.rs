/// Options for an arena created by [`Allocator::arena_with`].
///
/// [`Allocator::arena_with`]: crate::Allocator::arena_with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaCfg {
    /// Bytes reserved up front by the arena's first chunk.
    pub initial_capacity: usize,
    /// Upper bound on the payload bytes the arena may hand out, counted the
    /// same way as [`Allocator::allocated_bytes`]. `None` means the arena
    /// grows until the system allocator refuses.
    ///
    /// [`Allocator::allocated_bytes`]: crate::Allocator::allocated_bytes
    pub allocation_limit: Option<usize>,
}

impl ArenaCfg {
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Default::default()
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.allocation_limit = Some(limit);
        self
    }
}
