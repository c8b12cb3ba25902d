use std::ops::{Index, IndexMut};
use std::slice;

use static_assertions::const_assert;

/// Unit count of the built-in sample arena.
pub const SAMPLE_CAPACITY: usize = 32;

/// The built-in sample workload: ten processes with sizes between 2 and 8.
const SAMPLE_PROCESSES: [(&str, usize); 10] = [
    ("P1", 5),
    ("P2", 4),
    ("P3", 2),
    ("P4", 5),
    ("P5", 8),
    ("P6", 3),
    ("P7", 5),
    ("P8", 8),
    ("P9", 2),
    ("P10", 6),
];

// The sample configuration must satisfy the constructor preconditions.
const_assert!(SAMPLE_CAPACITY > 0);
const_assert!(SAMPLE_PROCESSES.len() > 0);

/// Where a process currently sits, if anywhere.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProcessState {
    Unallocated,
    Allocated { offset: usize },
}

/// One workload record: a label, a fixed request size in units, and the
/// current allocation state.
///
/// Identity and size never change after construction; the state toggles as
/// the driver alternately places and releases the record. Records are never
/// destroyed during a run.
#[derive(Clone, Debug)]
pub struct Process {
    id: String,
    size: usize,
    state: ProcessState,
}

impl Process {
    /// Create an unallocated record. `size` must be positive; a zero-size
    /// process is a precondition violation.
    pub fn new(id: impl Into<String>, size: usize) -> Process {
        debug_assert!(size > 0, "process size must be positive");
        Process {
            id: id.into(),
            size,
            state: ProcessState::Unallocated,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// The start offset this record is allocated at, if it is allocated.
    pub fn offset(&self) -> Option<usize> {
        match self.state {
            ProcessState::Allocated { offset } => Some(offset),
            ProcessState::Unallocated => None,
        }
    }

    pub fn is_allocated(&self) -> bool {
        self.offset().is_some()
    }

    /// Record a successful placement at `offset`.
    pub fn allocate_at(&mut self, offset: usize) {
        self.state = ProcessState::Allocated { offset };
    }

    /// Mark the record unallocated.
    pub fn release(&mut self) {
        self.state = ProcessState::Unallocated;
    }
}

/// The ordered list of process records a simulation draws from.
pub struct Workload {
    processes: Vec<Process>,
}

impl Workload {
    /// Wrap a list of records. An empty workload is a precondition
    /// violation; the simulator's behavior over one is unspecified.
    pub fn new(processes: Vec<Process>) -> Workload {
        debug_assert!(!processes.is_empty(), "workload must not be empty");
        Workload { processes }
    }

    /// The sample workload the driver binary runs: P1 through P10 with
    /// sizes 5, 4, 2, 5, 8, 3, 5, 8, 2 and 6 units.
    pub fn sample() -> Workload {
        Workload::new(
            SAMPLE_PROCESSES
                .iter()
                .map(|&(id, size)| Process::new(id, size))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Process> {
        self.processes.iter()
    }

    /// The smallest request size across the workload, or 1 for an empty
    /// workload (which is a precondition violation to begin with).
    ///
    /// External fragmentation is measured against this: any free run
    /// shorter than the smallest request can satisfy nobody.
    pub fn min_size(&self) -> usize {
        self.iter().map(Process::size).min().unwrap_or(1)
    }

    /// Mark every record unallocated.
    pub fn release_all(&mut self) {
        for process in self.processes.iter_mut() {
            process.release();
        }
    }
}

impl Index<usize> for Workload {
    type Output = Process;

    fn index(&self, index: usize) -> &Process {
        &self.processes[index]
    }
}

impl IndexMut<usize> for Workload {
    fn index_mut(&mut self, index: usize) -> &mut Process {
        &mut self.processes[index]
    }
}

impl<'a> IntoIterator for &'a Workload {
    type Item = &'a Process;
    type IntoIter = slice::Iter<'a, Process>;

    fn into_iter(self) -> Self::IntoIter {
        self.processes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn sample_matches_the_published_workload() {
        let workload = Workload::sample();
        assert_eq!(workload.len(), 10);
        assert_eq!(workload[0].id(), "P1");
        assert_eq!(workload[0].size(), 5);
        assert_eq!(workload[9].id(), "P10");
        assert_eq!(workload[9].size(), 6);
        assert_eq!(workload.min_size(), 2);
        assert!(workload.iter().all(|p| !p.is_allocated()));
        assert!(workload.iter().all(|p| p.size() <= SAMPLE_CAPACITY));
    }

    #[test]
    fn state_toggles() {
        let mut process = Process::new("P1", 3);
        assert_eq!(process.state(), ProcessState::Unallocated);
        assert_eq!(process.offset(), None);

        process.allocate_at(7);
        assert!(process.is_allocated());
        assert_eq!(process.offset(), Some(7));
        assert_eq!(process.state(), ProcessState::Allocated { offset: 7 });

        process.release();
        assert!(!process.is_allocated());
        // Identity and size survive the round trip.
        assert_eq!(process.id(), "P1");
        assert_eq!(process.size(), 3);
    }

    #[test]
    fn release_all_clears_every_record() {
        let mut workload = Workload::sample();
        workload[2].allocate_at(0);
        workload[5].allocate_at(10);

        workload.release_all();
        assert!(workload.iter().all(|p| !p.is_allocated()));
    }
}
