use steiner_common::error::SteinerError;

// Position sentinels for the point -> slot map. Heap slots are 1-based so
// that parent(k) = k / 2 and the children of k are 2k and 2k + 1; slot 0 is
// therefore free to mean "never inserted".
const ABSENT: i32 = 0;
const VISITED: i32 = -1;

/// Indexed binary min-heap over dense point ids `0..n`.
///
/// The reverse map from point id to heap slot makes decrease-key O(log n)
/// with an O(1) position lookup, which Prim's algorithm needs once per edge
/// relaxation. After `delete_min` returns a point it is marked visited, so
/// the map doubles as the "already finalized" check during tree growth.
///
/// Storage is retained across [`reset`](Self::reset) calls and only ever
/// grows, amortizing allocation over the many nets of a routing run.
#[derive(Clone, Debug, Default)]
pub struct IndexedHeap {
    slots: Vec<u32>, // slot -> point, slots[0] unused
    keys: Vec<i64>,  // point -> key as of the last insert/decrease
    pos: Vec<i32>,   // point -> 1-based slot, or ABSENT / VISITED
    size: usize,
    points: usize,
    capacity: usize,
}

impl IndexedHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Result<Self, SteinerError> {
        let mut heap = Self::new();
        heap.reserve(n)?;
        Ok(heap)
    }

    // Grows backing storage to cover n points. Never shrinks.
    fn reserve(&mut self, n: usize) -> Result<(), SteinerError> {
        if n <= self.capacity {
            return Ok(());
        }
        let new_cap = n.max(self.capacity * 2);

        self.slots
            .try_reserve(new_cap + 1 - self.slots.len())
            .map_err(|_| SteinerError::AllocationFailed { points: n })?;
        self.keys
            .try_reserve(new_cap - self.keys.len())
            .map_err(|_| SteinerError::AllocationFailed { points: n })?;
        self.pos
            .try_reserve(new_cap - self.pos.len())
            .map_err(|_| SteinerError::AllocationFailed { points: n })?;

        self.slots.resize(new_cap + 1, 0);
        self.keys.resize(new_cap, 0);
        self.pos.resize(new_cap, ABSENT);
        self.capacity = new_cap;
        Ok(())
    }

    /// Prepares for a run over points `0..n`: logical size drops to zero and
    /// all n points become absent/unvisited. Previously grown storage is
    /// kept, so reuse across nets does not reallocate.
    pub fn reset(&mut self, n: usize) -> Result<(), SteinerError> {
        self.reserve(n)?;
        self.size = 0;
        self.points = n;
        for p in &mut self.pos[..n] {
            *p = ABSENT;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// True while the point sits in the heap awaiting finalization.
    pub fn contains(&self, point: u32) -> bool {
        debug_assert!((point as usize) < self.points);
        self.pos[point as usize] > 0
    }

    /// True once `delete_min` has returned the point.
    pub fn is_visited(&self, point: u32) -> bool {
        debug_assert!((point as usize) < self.points);
        self.pos[point as usize] == VISITED
    }

    /// The point's key as of its last insert/decrease. Only meaningful for
    /// points that have been inserted since the last reset.
    pub fn key_of(&self, point: u32) -> i64 {
        debug_assert!((point as usize) < self.points);
        self.keys[point as usize]
    }

    pub fn insert(&mut self, point: u32, key: i64) {
        debug_assert!((point as usize) < self.points);
        debug_assert_eq!(self.pos[point as usize], ABSENT);

        self.keys[point as usize] = key;

        if self.size == 0 {
            self.size = 1;
            self.slots[1] = point;
            self.pos[point as usize] = 1;
            return;
        }

        self.size += 1;
        self.sift_up(self.size, point, key);
    }

    /// Lowers the key of a present point and restores heap order.
    ///
    /// Precondition (caller-enforced, checked in debug builds only): the
    /// point is currently in the heap and `new_key` does not exceed its
    /// current key. A key increase or a call on an absent/visited point
    /// leaves the heap in an unspecified (but memory-safe) order.
    pub fn decrease_key(&mut self, point: u32, new_key: i64) {
        debug_assert!(self.contains(point));
        debug_assert!(new_key <= self.keys[point as usize]);

        self.keys[point as usize] = new_key;
        let k = self.pos[point as usize] as usize;
        self.sift_up(k, point, new_key);
    }

    // Hole-style up-sift: parents with larger keys slide down into the hole
    // at k and the point is written once into the final hole.
    fn sift_up(&mut self, mut k: usize, point: u32, key: i64) {
        let mut j = k >> 1;
        while j > 0 {
            let q = self.slots[j];
            if self.keys[q as usize] <= key {
                break;
            }
            self.slots[k] = q;
            self.pos[q as usize] = k as i32;
            k = j;
            j = k >> 1;
        }
        self.slots[k] = point;
        self.pos[point as usize] = k as i32;
    }

    /// Removes and returns the minimum-key point, marking it visited.
    /// Returns `None` once the heap is empty.
    pub fn delete_min(&mut self) -> Option<u32> {
        if self.size == 0 {
            return None;
        }

        let min = self.slots[1];
        let last = self.slots[self.size];
        self.size -= 1;
        let last_key = self.keys[last as usize];

        // Sift the hole down from the root, pulling up the smaller child,
        // until `last` fits.
        let mut k = 1;
        let mut j = 2;
        while j <= self.size {
            if j < self.size && self.keys[self.slots[j] as usize] > self.keys[self.slots[j + 1] as usize]
            {
                j += 1;
            }
            if self.keys[self.slots[j] as usize] >= last_key {
                break;
            }
            self.slots[k] = self.slots[j];
            self.pos[self.slots[k] as usize] = k as i32;
            k = j;
            j = k << 1;
        }

        if self.size > 0 {
            self.slots[k] = last;
            self.pos[last as usize] = k as i32;
        }

        self.pos[min as usize] = VISITED;
        Some(min)
    }
}
