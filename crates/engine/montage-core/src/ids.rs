//! Identifiers and a monotonic allocator for timeline entities.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u32);

/// Monotonic allocator for TrackId.
#[derive(Default, Debug, Clone)]
pub struct IdAllocator {
    next_track: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_track(&mut self) -> TrackId {
        let id = TrackId(self.next_track);
        self.next_track = self.next_track.wrapping_add(1);
        id
    }

    /// Make sure future allocations never collide with an id that already exists.
    #[inline]
    pub fn observe(&mut self, id: TrackId) {
        if id.0 >= self.next_track {
            self.next_track = id.0.wrapping_add(1);
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_track(), TrackId(0));
        assert_eq!(alloc.alloc_track(), TrackId(1));
        alloc.observe(TrackId(10));
        assert_eq!(alloc.alloc_track(), TrackId(11));
        alloc.observe(TrackId(2));
        assert_eq!(alloc.alloc_track(), TrackId(12));
    }
}
