//! Descriptive and queuing-theory analytics over network-slice transaction
//! tables.
//!
//! A [`Dataset`] of per-transaction records is grouped by slice; each group
//! aggregates into a [`SliceSample`] whose queuing behaviour —
//! arrival rate λ, service rate µ, utilization ρ and the Little's-Law queue
//! length `L = λW` — is computed by [`QueuingMetrics::compute`] under an
//! explicit [`PacketProfile`]. [`AnalysisReport::compute`] binds all of it,
//! together with the latency and congestion bottleneck analyses, into one
//! pure snapshot for a renderer.
//!
//! ```
//! use slicescope_core::{
//!     aggregate::SliceSample,
//!     measure::{Latency, Stability, Throughput},
//!     queuing::{PacketProfile, QueuingMetrics},
//! };
//!
//! let sample = SliceSample::new(
//!     Throughput::from_mbps(10.0)?,
//!     Throughput::from_mbps(10.4)?,
//!     Latency::from_millis_f64(50.0)?,
//!     45.0,
//! )?;
//!
//! let metrics = QueuingMetrics::compute(&sample, &PacketProfile::default())?;
//!
//! assert_eq!(metrics.stability(), Stability::HighUtilization);
//! assert!((metrics.utilization().value() - 0.9615).abs() < 1e-4);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod analysis;
pub mod dataset;
pub mod defaults;
pub mod generate;
pub mod measure;
pub mod queuing;
pub mod record;
pub mod report;

pub use self::{
    aggregate::{SliceAggregate, SliceSample},
    dataset::Dataset,
    measure::{Latency, PacketRate, PacketSize, Stability, Throughput, Utilization},
    queuing::{PacketProfile, QueuingError, QueuingMetrics},
    record::{CongestionLevel, SliceId, TransactionRecord},
    report::{AnalysisReport, SliceReport},
};
