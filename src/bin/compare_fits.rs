//! A program that runs the same randomized churn under each placement
//! strategy, printing each step together with the arena occupancy and the
//! external fragmentation it leaves behind.
//!
//! Every strategy sees the same sequence of requests. Passing the SEED of
//! an earlier run replays it exactly.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use fit_simulator::{
    Reporter, Simulation, StepEvent, StepReport, Strategy, DEFAULT_STEPS, SAMPLE_CAPACITY,
};

struct ConsolePrinter;

impl Reporter for ConsolePrinter {
    fn on_step(&mut self, report: &StepReport<'_>) {
        let line = match &report.event {
            StepEvent::Allocated { id, offset, size } => {
                format!("{} allocated {} units at {}", id, size, offset)
            }
            StepEvent::Deallocated { id, .. } => format!("{} deallocated", id),
            StepEvent::Failed { id, size } => format!("no room for {} ({} units)", id, size),
        };
        println!("step {:2}: {}", report.step, line);
        println!("    {}", report.arena);
        println!("    external fragmentation: {}", report.external_fragmentation);
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.contains(&"--help".to_owned()) {
        println!("USAGE: {} [STEPS] [SEED]", args[0]);
        return;
    }
    let steps: usize = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_STEPS);
    let seed: u64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| rand::thread_rng().next_u64());

    env_logger::init();

    let mut sim = Simulation::sample();
    println!("Comparing placement strategies.\n\nParameters:");
    println!("    {} units of arena", SAMPLE_CAPACITY);
    println!("    {} processes", sim.workload().len());
    println!("    {} steps per strategy", steps);
    log::info!("Using seed {}", seed);

    for &strategy in Strategy::ALL.iter() {
        println!("\n====== {} ======", strategy);
        // Reseeding here hands every strategy the same request sequence.
        let mut rng = StdRng::seed_from_u64(seed);
        sim.run(strategy, steps, &mut rng, &mut ConsolePrinter);

        let (validity, stats) = sim.audit();
        println!("final: {:?}", stats);
        if !validity.is_valid() {
            println!("note: records and arena disagree: {:?}", validity);
        }
    }
}
