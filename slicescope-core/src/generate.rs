//! Deterministic synthetic transaction tables.
//!
//! The analyses in this crate run over tables of *simulated* transactions;
//! this module produces such a table without an external data source. All
//! randomness comes from a single seeded [`ChaChaRng`], so a given
//! [`GeneratorConfig`] always yields the same [`Dataset`] — byte for byte.

use crate::{
    dataset::Dataset,
    defaults,
    measure::{Latency, Throughput},
    record::{CongestionLevel, TransactionRecord},
};
use rand_chacha::ChaChaRng;
use rand_core::{Rng, SeedableRng as _};

/// Configuration of the synthetic dataset.
///
/// ```
/// # use slicescope_core::generate::{self, GeneratorConfig};
/// let config = GeneratorConfig { rows: 100, seed: 7 };
/// let a = generate::generate(&config);
/// let b = generate::generate(&config);
/// assert_eq!(a, b); // same seed, same dataset
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Number of records to generate.
    pub rows: usize,
    /// Seed for the generator's [`ChaChaRng`].
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: defaults::DEFAULT_GENERATOR_ROWS,
            seed: defaults::DEFAULT_GENERATOR_SEED,
        }
    }
}

/// The traffic envelope one synthetic slice draws its rows from.
struct SliceEnvelope {
    id: &'static str,
    /// offered traffic range, mbps
    traffic: (f64, f64),
    /// requested = traffic * (1 + headroom)
    headroom: (f64, f64),
    /// allocated = requested * fulfillment, before the congestion penalty
    fulfillment: (f64, f64),
    /// base latency, ms
    base_latency_ms: f64,
    /// observed queue length range, packets
    queue: (f64, f64),
}

/// Three slices with distinct envelopes: a heavily loaded one, a
/// latency-tight one and a lightweight one.
const ENVELOPES: [SliceEnvelope; 3] = [
    SliceEnvelope {
        id: "Slice-1",
        traffic: (9.0, 11.0),
        headroom: (0.05, 0.15),
        fulfillment: (0.85, 1.0),
        base_latency_ms: 40.0,
        queue: (30.0, 60.0),
    },
    SliceEnvelope {
        id: "Slice-2",
        traffic: (4.0, 6.0),
        headroom: (0.1, 0.3),
        fulfillment: (0.9, 1.0),
        base_latency_ms: 12.0,
        queue: (5.0, 20.0),
    },
    SliceEnvelope {
        id: "Slice-3",
        traffic: (0.5, 2.0),
        headroom: (0.2, 0.5),
        fulfillment: (0.95, 1.0),
        base_latency_ms: 80.0,
        queue: (1.0, 10.0),
    },
];

/// uniform sample in `[0, 1)` from the rng's next 64 bits.
fn unit<R: Rng>(rng: &mut R) -> f64 {
    (rng.next_u64() as f64) * (1.0 / (u64::MAX as f64 + 1.0))
}

/// uniform sample in `[lo, hi)`.
fn uniform<R: Rng>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    lo + (hi - lo) * unit(rng)
}

fn congestion<R: Rng>(rng: &mut R) -> CongestionLevel {
    let u = unit(rng);
    if u < 0.5 {
        CongestionLevel::Low
    } else if u < 0.85 {
        CongestionLevel::Medium
    } else {
        CongestionLevel::High
    }
}

/// how congestion bends the other columns.
fn congestion_effects(level: CongestionLevel) -> (f64, f64, f64, f64) {
    // (allocation penalty, latency multiplier, queue multiplier, success probability)
    match level {
        CongestionLevel::Low => (1.0, 1.0, 1.0, 0.95),
        CongestionLevel::Medium => (0.95, 1.5, 1.6, 0.75),
        CongestionLevel::High => (0.85, 2.5, 2.5, 0.40),
    }
}

fn timestamp(row: usize) -> String {
    let secs = row as u64;
    let day = 1 + (secs / 86_400) % 28;
    let hour = (secs / 3_600) % 24;
    let minute = (secs / 60) % 60;
    let second = secs % 60;
    format!("2025-03-{day:02} {hour:02}:{minute:02}:{second:02}")
}

/// bounded, non-negative by construction; the fallback is unreachable.
fn throughput(mbps: f64) -> Throughput {
    Throughput::from_mbps(mbps).unwrap_or(Throughput::ZERO)
}

fn latency(ms: f64) -> Latency {
    Latency::from_millis_f64(ms).unwrap_or(Latency::ZERO)
}

/// generate a synthetic transaction table.
///
/// Rows rotate through the three slice envelopes; congestion levels are
/// drawn per row and bend allocation, latency, queue length and the success
/// probability. Deterministic for a given [`GeneratorConfig`].
pub fn generate(config: &GeneratorConfig) -> Dataset {
    let mut rng = ChaChaRng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(config.rows);

    for row in 0..config.rows {
        let envelope = &ENVELOPES[row % ENVELOPES.len()];
        let level = congestion(&mut rng);
        let (allocation_penalty, latency_factor, queue_factor, success_p) =
            congestion_effects(level);

        let traffic = uniform(&mut rng, envelope.traffic);
        let requested = traffic * (1.0 + uniform(&mut rng, envelope.headroom));
        let allocated = requested * uniform(&mut rng, envelope.fulfillment) * allocation_penalty;

        let latency_ms =
            envelope.base_latency_ms * latency_factor * (0.8 + 0.4 * unit(&mut rng));
        let queue_length = uniform(&mut rng, envelope.queue) * queue_factor;
        let success = unit(&mut rng) < success_p;

        records.push(TransactionRecord {
            timestamp: timestamp(row),
            slice: envelope.id.parse().unwrap_or_else(|_| unreachable!()),
            traffic: throughput(traffic),
            requested: throughput(requested),
            allocated: throughput(allocated),
            latency: latency(latency_ms),
            queue_length,
            success,
            congestion: level,
        });
    }

    Dataset::new(records)
}
