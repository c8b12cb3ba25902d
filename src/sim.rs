//! The randomized simulation driver and its observers.
//!
//! A [`Simulation`] owns an [`Arena`] and a [`Workload`] and replays the
//! same experiment under any [`Strategy`]: each step picks one process at
//! random and toggles it, placing it if it is out and releasing it if it
//! is in. Observers receive a [`StepReport`] after every step, and
//! [`audit`] cross-checks the records against the arena at any point.

use log::debug;
use rand::Rng;

use crate::arena::Arena;
use crate::strategies::{Placer, Strategy};
use crate::workload::{Workload, SAMPLE_CAPACITY};

/// How many random steps a run takes unless the caller says otherwise.
pub const DEFAULT_STEPS: usize = 30;

/// What a single step did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepEvent {
    Allocated { id: String, offset: usize, size: usize },
    Deallocated { id: String, offset: usize, size: usize },
    Failed { id: String, size: usize },
}

/// Everything an observer sees right after a step.
pub struct StepReport<'a> {
    /// One-based step number within the run.
    pub step: usize,
    pub event: StepEvent,
    pub arena: &'a Arena,
    pub workload: &'a Workload,
    /// Total units sitting in free runs too short for the smallest request.
    pub external_fragmentation: usize,
}

/// An observer the simulation calls after every step.
pub trait Reporter {
    fn on_step(&mut self, report: &StepReport<'_>);
}

/// A reporter that ignores everything.
#[derive(Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn on_step(&mut self, _report: &StepReport<'_>) {}
}

/// One recorded step, detached from the live arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptStep {
    pub step: usize,
    pub event: StepEvent,
    /// Occupancy at the end of the step, one cell per unit, 1 if occupied.
    pub occupancy: Vec<u8>,
    pub external_fragmentation: usize,
}

/// A reporter that keeps every step. This is mainly useful for tests and
/// for comparing runs after the fact.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    pub steps: Vec<TranscriptStep>,
}

impl Reporter for Transcript {
    fn on_step(&mut self, report: &StepReport<'_>) {
        self.steps.push(TranscriptStep {
            step: report.step,
            event: report.event.clone(),
            occupancy: report.arena.snapshot(),
            external_fragmentation: report.external_fragmentation,
        });
    }
}

/// Validity holds a representation of all inconsistent states found
/// between a workload's records and its arena.
#[derive(Default, Debug)]
pub struct Validity {
    /// Units of allocated records that poke past the end of the arena.
    pub out_of_bounds: usize,
    /// Units claimed by more than one allocated record.
    ///
    /// Quick Fit can produce these when it honors a stale list entry.
    pub overlapping_units: usize,
    /// Units inside an allocated record's extent that the arena marks free.
    pub unbacked_units: usize,
    /// Units the arena marks occupied that no record claims.
    pub missing_units: usize,
}

impl Validity {
    /// A simple check that every count is 0.
    pub fn is_valid(&self) -> bool {
        self.out_of_bounds == 0
            && self.overlapping_units == 0
            && self.unbacked_units == 0
            && self.missing_units == 0
    }
}

impl From<Validity> for bool {
    fn from(v: Validity) -> bool {
        v.is_valid()
    }
}

#[derive(Default, Debug)]
pub struct Stats {
    pub allocated_records: usize,
    pub occupied_units: usize,
    pub free_units: usize,
    pub free_runs: usize,
}

/// Cross-check a workload's records against an arena's occupancy.
pub fn audit(arena: &Arena, workload: &Workload) -> (Validity, Stats) {
    let mut validity = Validity::default();
    let mut stats = Stats::default();

    let mut claims = vec![0usize; arena.capacity()];
    for process in workload {
        let offset = match process.offset() {
            Some(offset) => offset,
            None => continue,
        };
        stats.allocated_records += 1;
        for unit in offset..offset.saturating_add(process.size()) {
            match claims.get_mut(unit) {
                Some(count) => *count += 1,
                None => validity.out_of_bounds += 1,
            }
        }
    }

    for (unit, &claimed) in claims.iter().enumerate() {
        if claimed > 1 {
            validity.overlapping_units += 1;
        }
        if claimed > 0 && !arena.unit(unit) {
            validity.unbacked_units += 1;
        }
        if claimed == 0 && arena.unit(unit) {
            validity.missing_units += 1;
        }
    }

    stats.occupied_units = arena.occupied_units();
    stats.free_units = arena.free_units();
    stats.free_runs = arena.free_runs().count();

    (validity, stats)
}

/// A fixed arena plus the workload that competes for it.
pub struct Simulation {
    arena: Arena,
    workload: Workload,
}

impl Simulation {
    /// Pair an empty arena of `capacity` units with `workload`. An empty
    /// workload is a precondition violation.
    pub fn new(capacity: usize, workload: Workload) -> Simulation {
        debug_assert!(!workload.is_empty(), "workload must not be empty");
        Simulation {
            arena: Arena::new(capacity),
            workload,
        }
    }

    /// The setup the comparison driver runs: a 32 unit arena and the ten
    /// process workload from [`Workload::sample`].
    pub fn sample() -> Simulation {
        Simulation::new(SAMPLE_CAPACITY, Workload::sample())
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    /// Get statistics on the current state, and verify that records and
    /// arena agree.
    pub fn audit(&self) -> (Validity, Stats) {
        audit(&self.arena, &self.workload)
    }

    /// Run one strategy for `steps` steps, reporting after every step.
    ///
    /// The run starts from scratch whatever came before: the arena is
    /// cleared, every record is released, and the strategy gets a fresh
    /// cursor and index. Each step picks a record uniformly at random and
    /// toggles it. A placement failure changes nothing and the run
    /// carries on to the next step.
    pub fn run<R: Rng, S: Reporter>(
        &mut self,
        strategy: Strategy,
        steps: usize,
        rng: &mut R,
        reporter: &mut S,
    ) {
        self.arena.clear();
        self.workload.release_all();
        let mut placer = Placer::new(strategy, self.arena.capacity());

        debug!("running {} for {} steps", strategy, steps);

        // Sizes never change mid-run, so the fragmentation threshold is
        // fixed up front.
        let min_size = self.workload.min_size();

        for step in 1..=steps {
            let pick = rng.gen_range(0..self.workload.len());
            let process = &self.workload[pick];
            let id = process.id().to_owned();
            let size = process.size();

            let event = match process.offset() {
                Some(offset) => {
                    placer.release(&mut self.arena, offset, size);
                    self.workload[pick].release();
                    StepEvent::Deallocated { id, offset, size }
                }
                None => match placer.place(&mut self.arena, size) {
                    Some(offset) => {
                        self.workload[pick].allocate_at(offset);
                        StepEvent::Allocated { id, offset, size }
                    }
                    None => StepEvent::Failed { id, size },
                },
            };

            let report = StepReport {
                step,
                event,
                arena: &self.arena,
                workload: &self.workload,
                external_fragmentation: self.arena.external_fragmentation(min_size),
            };
            reporter.on_step(&report);
        }
    }
}
