use crate::{
    measure::Latency,
    record::{SliceId, TransactionRecord},
};
use thiserror::Error;

/// Latency split by transaction outcome for one slice.
///
/// Compares the mean latency of succeeded and failed transactions; a large
/// failure/success ratio points at latency as the bottleneck behind the
/// failures.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyBottleneck {
    /// The slice under analysis.
    pub slice: SliceId,
    /// Mean latency over successful transactions. Never zero.
    pub success_latency: Latency,
    /// Mean latency over failed transactions.
    pub failure_latency: Latency,
}

impl LatencyBottleneck {
    /// partition a slice's records by outcome and compare mean latencies.
    ///
    /// # Errors
    ///
    /// Both partitions must be non-empty, and the mean success latency must
    /// be non-zero (the ratio divides by it) — each case surfaces as its own
    /// [`BottleneckError`] variant instead of a NaN or infinite ratio.
    pub fn from_records(
        slice: &SliceId,
        records: &[&TransactionRecord],
    ) -> Result<Self, BottleneckError> {
        let mean_latency = |success: bool| {
            let latencies: Vec<f64> = records
                .iter()
                .filter(|r| r.success == success)
                .map(|r| r.latency.as_millis_f64())
                .collect();
            if latencies.is_empty() {
                None
            } else {
                Some(latencies.iter().sum::<f64>() / latencies.len() as f64)
            }
        };

        let success_ms = mean_latency(true).ok_or_else(|| BottleneckError::NoSuccesses {
            slice: slice.clone(),
        })?;
        let failure_ms = mean_latency(false).ok_or_else(|| BottleneckError::NoFailures {
            slice: slice.clone(),
        })?;

        if success_ms == 0.0 {
            return Err(BottleneckError::ZeroSuccessLatency {
                slice: slice.clone(),
            });
        }

        let non_finite = BottleneckError::NonFiniteMean {
            slice: slice.clone(),
        };
        Ok(Self {
            slice: slice.clone(),
            success_latency: Latency::from_millis_f64(success_ms)
                .map_err(|_| non_finite.clone())?,
            failure_latency: Latency::from_millis_f64(failure_ms).map_err(|_| non_finite)?,
        })
    }

    /// failure minus success mean latency, in milliseconds. Usually
    /// positive; negative means failures were *faster*.
    pub fn difference_ms(&self) -> f64 {
        self.failure_latency.as_millis_f64() - self.success_latency.as_millis_f64()
    }

    /// failure over success mean latency. Well-defined by construction:
    /// the success mean is never zero.
    pub fn ratio(&self) -> f64 {
        self.failure_latency.as_millis_f64() / self.success_latency.as_millis_f64()
    }
}

/// mean failure/success latency ratio over a set of per-slice rows.
///
/// `None` for an empty set. Slices whose bottleneck analysis failed (one
/// empty partition) are simply not in `rows` — the mean covers the slices
/// where the ratio exists.
pub fn mean_latency_ratio(rows: &[LatencyBottleneck]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    Some(rows.iter().map(LatencyBottleneck::ratio).sum::<f64>() / rows.len() as f64)
}

/// Error returned when a slice's latency bottleneck cannot be computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BottleneckError {
    /// No successful transactions — the success partition is empty.
    #[error("slice {slice} has no successful transactions")]
    NoSuccesses { slice: SliceId },
    /// No failed transactions — the failure partition is empty.
    #[error("slice {slice} has no failed transactions")]
    NoFailures { slice: SliceId },
    /// The mean success latency is zero; the ratio is undefined.
    #[error("slice {slice}: mean success latency is zero, ratio undefined")]
    ZeroSuccessLatency { slice: SliceId },
    /// A mean overflowed into a non-finite value.
    #[error("slice {slice}: mean latency is not finite")]
    NonFiniteMean { slice: SliceId },
}
