//! Bottleneck analyses over grouped transaction records: where latency
//! diverges between success and failure, and how congestion levels shape
//! the success rate.

mod bottleneck;
mod congestion;

pub use self::{
    bottleneck::{BottleneckError, LatencyBottleneck, mean_latency_ratio},
    congestion::{CongestionImpact, CongestionShare, congestion_distribution, congestion_impact},
};
