//! Per-step metrics for the simulation engine.

/// Counters and timings collected during a single step.
///
/// The engine refreshes the per-step fields after every `step()` call
/// and accumulates the event counters over the run; consumers read them
/// from the most recent step.
#[derive(Clone, Debug, Default)]
pub struct StepMetrics {
    /// Wall-clock time of the last step, in microseconds.
    pub total_us: u64,
    /// CFL-critical timestep computed by the last step [s].
    pub critical_dt: f64,
    /// Number of currently enriched cells.
    pub enriched_cells: usize,
    /// Number of live discontinuities.
    pub live_discontinuities: usize,
    /// Cumulative number of enrichment events.
    pub enrichment_events: u64,
    /// Cumulative number of de-enrichment events.
    pub deenrichment_events: u64,
}
