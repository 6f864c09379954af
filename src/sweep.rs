//! Tabulation of interface angles over a range of incidence angles.
//!
//! A sweep evaluates the solver on an evenly spaced grid of incidence angles.
//! Each point is independent, so the grid is solved in parallel and collected
//! back in angle order.

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array1;
use rayon::prelude::*;

use crate::media::{Medium, WaveMode};
use crate::settings::SweepSettings;
use crate::solver::{solve, Classification, Solution};


/// Solves every incidence angle of `range` in parallel.
///
/// **Context**: Tables of angle against incidence are the usual way to read
/// off where converted and refracted waves appear and disappear.
///
/// **How it Works**: Builds a `linspace` grid, maps it through the solver on
/// the rayon pool while ticking a progress bar, and collects the solutions in
/// grid order.
pub fn sweep(
    mode: WaveMode,
    medium1: &Medium,
    medium2: &Medium,
    range: &SweepSettings,
) -> Vec<Solution> {
    let start = Instant::now();
    let angles = Array1::linspace(range.start, range.end, range.steps).to_vec();

    let pb = ProgressBar::new(angles.len() as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {bar:40.green/blue} {pos:>5}/{len:5} {msg}",
    ) {
        pb.set_style(style.progress_chars("█▇▆▅▄▃▂▁"));
    }
    pb.set_message("angle".to_string());

    let solutions: Vec<Solution> = angles
        .par_iter()
        .map(|&angle| {
            let solution = solve(mode, angle, medium1, medium2);
            pb.inc(1);
            solution
        })
        .collect();

    pb.finish_and_clear();
    tracing::info!(
        steps = solutions.len(),
        elapsed = ?start.elapsed(),
        "sweep complete"
    );

    solutions
}

/// Incidence angle of a change, with the classification before and after it.
pub type Transition = (f64, Classification, Classification);

/// Incidence angles at which `key` changes between consecutive solutions,
/// with the value before and after the change.
pub fn transitions<F>(solutions: &[Solution], key: F) -> Vec<Transition>
where
    F: Fn(&Solution) -> Classification,
{
    solutions
        .windows(2)
        .filter_map(|w| {
            let (a, b) = (key(&w[0]), key(&w[1]));
            (a != b).then_some((w[1].incident.angle, a, b))
        })
        .collect()
}
