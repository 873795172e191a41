//! Summary statistics for decoding runs.
//!
//! Tracks per-shot service latency and BP iteration counts so a run can
//! report both speed and convergence behaviour.

use std::time::Duration;

const LATENCY_BUCKETS: usize = 20;
const BUCKET_WIDTH_NS: u64 = 10_000;

/// Latency accumulator with a fixed 10 µs histogram.
#[derive(Clone, Debug)]
pub struct LatencyStats {
    pub min: u64,
    pub max: u64,
    pub sum: u64,
    pub count: u64,
    pub buckets: [u64; LATENCY_BUCKETS],
}

impl Default for LatencyStats {
    fn default() -> Self {
        Self::new()
    }
}

impl LatencyStats {
    pub fn new() -> Self {
        Self {
            min: u64::MAX,
            max: 0,
            sum: 0,
            count: 0,
            buckets: [0; LATENCY_BUCKETS],
        }
    }

    /// Records one measurement. The last bucket collects everything above
    /// its lower edge.
    pub fn update(&mut self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.min = self.min.min(nanos);
        self.max = self.max.max(nanos);
        self.sum = self.sum.saturating_add(nanos);
        self.count += 1;

        let idx = ((nanos / BUCKET_WIDTH_NS) as usize).min(LATENCY_BUCKETS - 1);
        self.buckets[idx] += 1;
    }

    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }

    pub fn print_report(&self) {
        println!("\nLatency (per shot)");
        println!("Count: {}", self.count);
        if self.count == 0 {
            return;
        }

        let avg_ns = self.avg();
        if avg_ns < 1000.0 {
            println!("Min:   {:.2} ns", self.min as f64);
            println!("Avg:   {:.2} ns", avg_ns);
            println!("Max:   {:.2} ns", self.max as f64);
        } else {
            println!("Min:   {:.2} us", self.min as f64 / 1000.0);
            println!("Avg:   {:.2} us", avg_ns / 1000.0);
            println!("Max:   {:.2} us", self.max as f64 / 1000.0);
        }

        println!("Distribution (10us buckets):");
        for (i, &count) in self.buckets.iter().enumerate() {
            if count > 0 {
                let open = if i == LATENCY_BUCKETS - 1 { "+" } else { "" };
                println!("[{:3}-{:3}{} us]: {}", i * 10, (i + 1) * 10, open, count);
            }
        }
    }
}

/// Convergence counters for a batch of BP decodes.
#[derive(Clone, Debug, Default)]
pub struct DecodeStats {
    pub shots: usize,
    pub converged: usize,
    pub total_iterations: usize,
    pub max_iterations_seen: usize,
    /// Shots whose residual flips a logical; only counted when errors are known.
    pub logical_failures: usize,
}

impl DecodeStats {
    pub fn record(&mut self, converged: bool, iterations: usize) {
        self.shots += 1;
        self.converged += converged as usize;
        self.total_iterations += iterations;
        self.max_iterations_seen = self.max_iterations_seen.max(iterations);
    }

    pub fn mean_iterations(&self) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.total_iterations as f64 / self.shots as f64
        }
    }

    pub fn rate(&self, count: usize) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            count as f64 / self.shots as f64
        }
    }
}
