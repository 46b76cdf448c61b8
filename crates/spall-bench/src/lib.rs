//! Benchmark profiles for the Spall solver.
//!
//! Provides pre-built [`SimulationConfig`] profiles:
//!
//! - [`quiet_bar`]: a bar at rest — pure update-loop overhead.
//! - [`shock_bar`]: sustained-shock loading on the left face, released
//!   after a plateau — the classic plate-impact spall drive.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use spall_engine::{SimulationConfig, TwoStepsPressure};
use spall_test_utils::uniform_bar_config;

/// A bar at rest with free boundaries: benchmarks the bare step loop.
pub fn quiet_bar(cell_count: usize) -> SimulationConfig {
    uniform_bar_config(cell_count)
}

/// A bar driven by a 15 GPa plateau on its left face, released to
/// ambient after 2 microseconds.
pub fn shock_bar(cell_count: usize) -> SimulationConfig {
    let mut config = uniform_bar_config(cell_count);
    config.left_boundary = Box::new(TwoStepsPressure::new(15.0e9, 1.0e5, 2.0e-6));
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_bar_validates() {
        quiet_bar(100).validate().unwrap();
    }

    #[test]
    fn shock_bar_validates() {
        shock_bar(100).validate().unwrap();
    }
}
