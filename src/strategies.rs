//! The placement strategies and the engine that drives them.
//!
//! Every discipline answers the same question: given the arena's current
//! occupancy and a request for some number of contiguous units, which start
//! offset should the request land at? A strategy never splits a request and
//! never moves what is already placed, so the only lever it has is where
//! each new request goes.
//!
//! # The scanners
//!
//! [`Strategy::FirstFit`] takes the lowest viable offset and nothing else.
//! [`Strategy::BestFit`] and [`Strategy::WorstFit`] examine every viable
//! offset and keep the one whose free run, measured forward from that
//! offset, is the smallest or the largest. Measuring from the candidate
//! offset rather than from the start of the hole means Best Fit settles at
//! the tail of the first run that fits, where the measured run length
//! equals the request exactly.
//!
//! # The stateful pair
//!
//! [`Strategy::NextFit`] is First Fit with a roving cursor: the scan starts
//! wherever the previous placement succeeded and wraps past the end of the
//! arena. [`Strategy::QuickFit`] consults an exact-size free list before
//! falling back to a First Fit scan; see [`QuickFitIndex`] for what those
//! lists do and do not promise.
//!
//! A [`Placer`] bundles one strategy with the cursor and index state it
//! carries, so that a fresh `Placer` always means a fresh start.

use std::fmt;

use log::debug;

use crate::arena::Arena;
use crate::quickfit::QuickFitIndex;

/// The five placement disciplines.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    FirstFit,
    NextFit,
    BestFit,
    WorstFit,
    QuickFit,
}

impl Strategy {
    /// Every strategy, in the order the comparison driver runs them.
    pub const ALL: [Strategy; 5] = [
        Strategy::FirstFit,
        Strategy::NextFit,
        Strategy::BestFit,
        Strategy::QuickFit,
        Strategy::WorstFit,
    ];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::FirstFit => "First Fit",
            Strategy::NextFit => "Next Fit",
            Strategy::BestFit => "Best Fit",
            Strategy::WorstFit => "Worst Fit",
            Strategy::QuickFit => "Quick Fit",
        };
        f.write_str(name)
    }
}

/// Scan for the lowest offset where `size` contiguous free units start.
fn first_fit(arena: &Arena, size: usize) -> Option<usize> {
    let last = arena.capacity().checked_sub(size)?;
    (0..=last).find(|&start| arena.is_free(start, size))
}

/// Scan every viable offset and keep the one whose measured free run wins
/// under `prefer`. Ties keep the earlier offset.
fn fit_by_run<F>(arena: &Arena, size: usize, prefer: F) -> Option<usize>
where
    F: Fn(usize, usize) -> bool,
{
    let last = arena.capacity().checked_sub(size)?;
    let mut winner: Option<(usize, usize)> = None;
    for start in 0..=last {
        if !arena.is_free(start, size) {
            continue;
        }
        let run = arena.free_run_length(start);
        match winner {
            Some((incumbent, _)) if !prefer(run, incumbent) => {}
            _ => winner = Some((run, start)),
        }
    }
    winner.map(|(_, start)| start)
}

fn best_fit(arena: &Arena, size: usize) -> Option<usize> {
    fit_by_run(arena, size, |run, incumbent| run < incumbent)
}

fn worst_fit(arena: &Arena, size: usize) -> Option<usize> {
    fit_by_run(arena, size, |run, incumbent| run > incumbent)
}

/// A placement engine: one strategy plus the state it carries across a run.
///
/// First, Best and Worst Fit are stateless scans. Next Fit keeps a cursor
/// and Quick Fit keeps a [`QuickFitIndex`]; both live here so that runs
/// stay isolated. A fresh `Placer` starts with the cursor at zero and an
/// empty index.
pub struct Placer {
    strategy: Strategy,
    cursor: usize,
    index: QuickFitIndex,
}

impl Placer {
    /// A fresh engine for an arena of `capacity` units.
    pub fn new(strategy: Strategy, capacity: usize) -> Placer {
        Placer {
            strategy,
            cursor: 0,
            index: QuickFitIndex::new(capacity),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Forget all carried state: the cursor returns to zero and the
    /// exact-size lists empty out.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.index.reset();
    }

    /// Choose an offset for `size` units and mark it occupied.
    ///
    /// On failure nothing changes: the arena keeps its occupancy, the
    /// cursor stays put and the index keeps its entries.
    pub fn place(&mut self, arena: &mut Arena, size: usize) -> Option<usize> {
        debug_assert!(size > 0, "placement size must be positive");
        let found = match self.strategy {
            Strategy::FirstFit => first_fit(arena, size),
            Strategy::NextFit => self.next_fit(arena, size),
            Strategy::BestFit => best_fit(arena, size),
            Strategy::WorstFit => worst_fit(arena, size),
            Strategy::QuickFit => self.quick_fit(arena, size),
        };
        match found {
            Some(start) => {
                arena.allocate(start, size);
                debug!("{}: {} units placed at {}", self.strategy, size, start);
                Some(start)
            }
            None => {
                debug!("{}: no room for {} units", self.strategy, size);
                None
            }
        }
    }

    /// Return `size` units starting at `start` to the free pool.
    ///
    /// The exact extent is always recorded in the index, whichever
    /// strategy is active.
    pub fn release(&mut self, arena: &mut Arena, start: usize, size: usize) {
        arena.free(start, size);
        self.index.record_free(start, size);
        debug!("{}: {} units released at {}", self.strategy, size, start);
    }

    /// First Fit from the cursor, wrapping once around the arena. Success
    /// parks the cursor at the chosen offset; failure leaves it alone.
    fn next_fit(&mut self, arena: &Arena, size: usize) -> Option<usize> {
        let capacity = arena.capacity();
        let mut probe = self.cursor;
        loop {
            if arena.is_free(probe, size) {
                self.cursor = probe;
                return Some(probe);
            }
            probe = (probe + 1) % capacity;
            if probe == self.cursor {
                return None;
            }
        }
    }

    /// Pop the oldest exact-size entry, or fall back to a First Fit scan.
    /// The fallback never consults or refills the lists, and a popped
    /// entry is used as-is.
    fn quick_fit(&mut self, arena: &Arena, size: usize) -> Option<usize> {
        if let Some(start) = self.index.take(size) {
            return Some(start);
        }
        first_fit(arena, size)
    }
}
