//! A toy simulator for classical memory placement strategies.
//!
//! An [`Arena`] is a fixed row of equal units and a [`Workload`] is a
//! handful of processes that come and go. A [`Strategy`] decides where
//! each placement lands, and [`Simulation::run`] replays the same random
//! churn under First, Next, Best, Worst and Quick Fit so the placements
//! and the external fragmentation they leave behind can be compared side
//! by side.

pub mod arena;
pub mod quickfit;
pub mod sim;
pub mod strategies;
pub mod workload;

pub use crate::arena::{Arena, FreeRun, FreeRuns};
pub use crate::quickfit::QuickFitIndex;
pub use crate::sim::{
    audit, NullReporter, Reporter, Simulation, Stats, StepEvent, StepReport, Transcript,
    TranscriptStep, Validity, DEFAULT_STEPS,
};
pub use crate::strategies::{Placer, Strategy};
pub use crate::workload::{Process, ProcessState, Workload, SAMPLE_CAPACITY};
