use std::fmt;

/// A fixed-size run of allocation units, each either free or occupied.
///
/// The arena is the ground truth of memory state for a simulation run. It
/// knows nothing about which process owns which unit; owners record their
/// own offsets, and [`crate::sim::audit`] cross-checks the two views.
///
/// Invariants:
///
/// - The unit count is fixed for the lifetime of the arena.
/// - [`clear`](Arena::clear) restores every unit to free.
/// - Probing out of bounds reports "not free" rather than failing.
pub struct Arena {
    /// `true` means the unit is occupied.
    units: Vec<bool>,
}

/// A maximal run of consecutive free units.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FreeRun {
    pub start: usize,
    pub len: usize,
}

impl Arena {
    /// Create an arena of `capacity` units, all free.
    ///
    /// Callers are expected to validate `capacity > 0`; a zero-size arena is
    /// a precondition violation and the simulator's behavior over one is
    /// unspecified.
    pub fn new(capacity: usize) -> Arena {
        debug_assert!(capacity > 0, "arena capacity must be positive");
        Arena {
            units: vec![false; capacity],
        }
    }

    /// The fixed unit count.
    pub fn capacity(&self) -> usize {
        self.units.len()
    }

    /// Mark every unit free.
    pub fn clear(&mut self) {
        for unit in self.units.iter_mut() {
            *unit = false;
        }
    }

    /// Whether the unit at `index` is occupied.
    pub fn unit(&self, index: usize) -> bool {
        self.units[index]
    }

    /// True iff `[start, start + len)` lies within the arena and every unit
    /// in it is free.
    ///
    /// A range that would run past the end reports false; it is never an
    /// error, so scans can probe right up to the boundary without caring.
    pub fn is_free(&self, start: usize, len: usize) -> bool {
        match start.checked_add(len) {
            Some(end) if end <= self.units.len() => {
                self.units[start..end].iter().all(|&occupied| !occupied)
            }
            _ => false,
        }
    }

    /// Mark every unit in `[start, start + len)` occupied.
    ///
    /// The range must lie within the arena. The units need not be free
    /// beforehand: a Quick Fit placement trusts its index and may re-mark
    /// units that another record still claims.
    pub fn allocate(&mut self, start: usize, len: usize) {
        debug_assert!(
            start + len <= self.units.len(),
            "allocation [{}, {}) exceeds capacity {}",
            start,
            start + len,
            self.units.len(),
        );
        for unit in self.units[start..start + len].iter_mut() {
            *unit = true;
        }
    }

    /// Mark every unit in `[start, start + len)` free.
    pub fn free(&mut self, start: usize, len: usize) {
        debug_assert!(
            start + len <= self.units.len(),
            "free [{}, {}) exceeds capacity {}",
            start,
            start + len,
            self.units.len(),
        );
        for unit in self.units[start..start + len].iter_mut() {
            *unit = false;
        }
    }

    /// Count the consecutive free units beginning at `start`, scanning
    /// forward to the first occupied unit or the arena boundary.
    ///
    /// Returns 0 when `start` itself is occupied or past the end.
    pub fn free_run_length(&self, start: usize) -> usize {
        let start = start.min(self.units.len());
        self.units[start..]
            .iter()
            .take_while(|&&occupied| !occupied)
            .count()
    }

    /// Iterate over the maximal free runs in ascending offset order.
    pub fn free_runs(&self) -> FreeRuns<'_> {
        FreeRuns {
            units: &self.units,
            pos: 0,
        }
    }

    /// Sum the lengths of free runs strictly shorter than `min_request`.
    ///
    /// A run that short can never satisfy even the smallest known request,
    /// so it counts as externally fragmented space. Runs ended by the arena
    /// boundary count like any other; an entirely free arena therefore
    /// reports its full capacity when `capacity < min_request`, and 0
    /// otherwise.
    pub fn external_fragmentation(&self, min_request: usize) -> usize {
        self.free_runs()
            .map(|run| run.len)
            .filter(|&len| len < min_request)
            .sum()
    }

    /// Number of occupied units.
    pub fn occupied_units(&self) -> usize {
        self.units.iter().filter(|&&occupied| occupied).count()
    }

    /// Number of free units.
    pub fn free_units(&self) -> usize {
        self.capacity() - self.occupied_units()
    }

    /// Per-unit occupancy, 0 = free and 1 = occupied, ordered by unit index.
    pub fn snapshot(&self) -> Vec<u8> {
        self.units
            .iter()
            .map(|&occupied| if occupied { 1 } else { 0 })
            .collect()
    }
}

/// Iterator over an arena's maximal free runs.
pub struct FreeRuns<'a> {
    units: &'a [bool],
    pos: usize,
}

impl<'a> Iterator for FreeRuns<'a> {
    type Item = FreeRun;

    fn next(&mut self) -> Option<FreeRun> {
        while self.pos < self.units.len() && self.units[self.pos] {
            self.pos += 1;
        }
        if self.pos == self.units.len() {
            return None;
        }
        let start = self.pos;
        while self.pos < self.units.len() && !self.units[self.pos] {
            self.pos += 1;
        }
        Some(FreeRun {
            start,
            len: self.pos - start,
        })
    }
}

impl fmt::Display for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let mut start = true;
        for &occupied in &self.units {
            if !start {
                write!(f, ", ")?;
            } else {
                start = false;
            }
            write!(f, "{}", if occupied { 1 } else { 0 })?;
        }
        write!(f, "]")
    }
}
