//! Throughput figures for a completed run.

use std::fmt;
use std::time::Duration;

use super::lattice::Q;
use crate::schema::SimulationConfig;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Doubles saved per node on a saving step (rho, ux, uy).
const SCALARS_SAVED: u64 = 3;

/// Memory and throughput summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceReport {
    pub allocated_bytes: usize,
    pub steps: u64,
    pub runtime: Duration,
    /// Million lattice updates per second.
    pub mlups: f64,
    /// Effective memory bandwidth in GiB/s.
    pub bandwidth_gib: f64,
}

impl PerformanceReport {
    pub fn new(config: &SimulationConfig, allocated_bytes: usize, runtime: Duration) -> Self {
        let nodes = config.node_count() as u64;
        let nodes_updated = config.steps * nodes;
        let saves = if config.save_every == 0 {
            0
        } else {
            config.steps / config.save_every
        };
        let nodes_saved = saves * nodes;

        // Each update reads and writes every population once.
        let doubles_moved = nodes_updated * 2 * Q as u64 + nodes_saved * SCALARS_SAVED;
        let bytes_moved = doubles_moved as f64 * std::mem::size_of::<f64>() as f64;

        let seconds = runtime.as_secs_f64();
        let (mlups, bandwidth_gib) = if seconds > 0.0 {
            (
                nodes_updated as f64 / (1e6 * seconds),
                bytes_moved / (seconds * BYTES_PER_GIB),
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            allocated_bytes,
            steps: config.steps,
            runtime,
            mlups,
            bandwidth_gib,
        }
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " ----- performance information -----")?;
        writeln!(
            f,
            " memory allocated: {:.1} (MiB)",
            self.allocated_bytes as f64 / BYTES_PER_MIB
        )?;
        writeln!(f, "        timesteps: {}", self.steps)?;
        writeln!(f, "          runtime: {:.3} (s)", self.runtime.as_secs_f64())?;
        writeln!(f, "            speed: {:.2} (Mlups)", self.mlups)?;
        write!(f, "        bandwidth: {:.1} (GiB/s)", self.bandwidth_gib)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput() {
        let config = SimulationConfig {
            nx: 100,
            ny: 100,
            steps: 1000,
            save_every: 500,
            ..Default::default()
        };
        let report = PerformanceReport::new(&config, 1 << 20, Duration::from_secs(2));

        // 1e7 updates in 2 s.
        assert!((report.mlups - 5.0).abs() < 1e-12);

        let bytes = (1e7 * 18.0 + 2.0 * 1e4 * 3.0) * 8.0;
        assert!((report.bandwidth_gib - bytes / (2.0 * BYTES_PER_GIB)).abs() < 1e-9);

        let text = report.to_string();
        assert!(text.contains("memory allocated: 1.0 (MiB)"));
        assert!(text.contains("speed: 5.00 (Mlups)"));
    }

    #[test]
    fn test_zero_runtime_and_no_saves() {
        let config = SimulationConfig {
            save_every: 0,
            ..Default::default()
        };
        let report = PerformanceReport::new(&config, 0, Duration::ZERO);
        assert_eq!(report.mlups, 0.0);
        assert_eq!(report.bandwidth_gib, 0.0);
    }

    #[test]
    fn test_large_grid_counts_do_not_overflow() {
        let config = SimulationConfig {
            nx: 65536,
            ny: 65536,
            steps: 10,
            ..Default::default()
        };
        let report = PerformanceReport::new(&config, 0, Duration::from_secs(1));
        assert!((report.mlups - 10.0 * 65536.0 * 65536.0 / 1e6).abs() < 1e-3);
    }
}
