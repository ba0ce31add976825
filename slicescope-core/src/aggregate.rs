use crate::{
    dataset::SliceGroup,
    measure::{Latency, Throughput},
    record::{SliceId, TransactionRecord},
};

/// One slice's aggregated observation window: the four mean values the
/// queuing model consumes.
///
/// A [`SliceSample`] is read-only input — derived metrics are recomputed
/// from it on demand, never cached. Usually obtained from
/// [`SliceAggregate::sample`], but can be built directly:
///
/// ```
/// # use slicescope_core::{aggregate::SliceSample, measure::{Latency, Throughput}};
/// let sample = SliceSample::new(
///     Throughput::from_mbps(10.0).unwrap(),
///     Throughput::from_mbps(10.4).unwrap(),
///     Latency::from_millis_f64(50.0).unwrap(),
///     45.0,
/// ).unwrap();
/// assert_eq!(sample.mean_queue_length(), 45.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceSample {
    mean_traffic: Throughput,
    mean_allocated: Throughput,
    mean_latency: Latency,
    mean_queue_length: f64,
}

impl SliceSample {
    /// create a sample from already-averaged values.
    ///
    /// # Errors
    ///
    /// Returns a [`SampleError`] if `mean_queue_length` is NaN, infinite or
    /// negative. The other fields carry their own validation.
    pub fn new(
        mean_traffic: Throughput,
        mean_allocated: Throughput,
        mean_latency: Latency,
        mean_queue_length: f64,
    ) -> Result<Self, SampleError> {
        if !mean_queue_length.is_finite() || mean_queue_length < 0.0 {
            return Err(SampleError(mean_queue_length));
        }
        Ok(Self {
            mean_traffic,
            mean_allocated,
            mean_latency,
            mean_queue_length,
        })
    }

    /// mean offered traffic volume.
    pub fn mean_traffic(&self) -> Throughput {
        self.mean_traffic
    }

    /// mean bandwidth actually granted.
    pub fn mean_allocated(&self) -> Throughput {
        self.mean_allocated
    }

    /// mean end-to-end latency.
    pub fn mean_latency(&self) -> Latency {
        self.mean_latency
    }

    /// mean observed queue length, in packets.
    pub fn mean_queue_length(&self) -> f64 {
        self.mean_queue_length
    }
}

/// Error returned when constructing a [`SliceSample`] with an invalid
/// observed queue length.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("observed queue length must be finite and non-negative, got {0}")]
pub struct SampleError(f64);

/// Per-slice descriptive statistics, computed in one pass over the slice's
/// records.
///
/// Covers the basic performance report (transaction count, success rate,
/// mean latency and queue length, bandwidth fulfillment) and projects the
/// [`SliceSample`] the queuing model runs on.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceAggregate {
    /// The slice these statistics describe.
    pub slice: SliceId,
    /// Number of transactions observed.
    pub transactions: usize,
    /// Share of successful transactions, in `[0.0, 1.0]`.
    pub success_rate: f64,
    /// Mean offered traffic volume.
    pub mean_traffic: Throughput,
    /// Mean bandwidth requested.
    pub mean_requested: Throughput,
    /// Mean bandwidth granted.
    pub mean_allocated: Throughput,
    /// Mean end-to-end latency.
    pub mean_latency: Latency,
    /// Mean observed queue length, in packets.
    pub mean_queue_length: f64,
}

impl SliceAggregate {
    /// aggregate one slice group.
    ///
    /// # Errors
    ///
    /// An empty group is an [`AggregateError::EmptySlice`] — means over
    /// nothing are refused rather than propagated as NaN.
    pub fn from_group(group: &SliceGroup<'_>) -> Result<Self, AggregateError> {
        Self::from_records(group.id, &group.records)
    }

    /// aggregate a slice's records.
    ///
    /// The records are assumed to belong to `slice`; the caller does the
    /// grouping (see [`Dataset::group_by_slice`]).
    ///
    /// # Errors
    ///
    /// [`AggregateError::EmptySlice`] for an empty record list;
    /// [`AggregateError::NonFiniteMean`] when a mean overflows or a raw
    /// queue-length value was not finite.
    ///
    /// [`Dataset::group_by_slice`]: crate::dataset::Dataset::group_by_slice
    pub fn from_records(
        slice: &SliceId,
        records: &[&TransactionRecord],
    ) -> Result<Self, AggregateError> {
        if records.is_empty() {
            return Err(AggregateError::EmptySlice {
                slice: slice.clone(),
            });
        }

        let n = records.len() as f64;
        let non_finite = |column: &'static str| AggregateError::NonFiniteMean {
            slice: slice.clone(),
            column,
        };

        let successes = records.iter().filter(|r| r.success).count();
        let success_rate = successes as f64 / n;

        let mean = |value: fn(&TransactionRecord) -> f64| {
            records.iter().map(|r| value(r)).sum::<f64>() / n
        };

        let mean_traffic = Throughput::from_mbps(mean(|r| r.traffic.as_mbps()))
            .map_err(|_| non_finite("traffic"))?;
        let mean_requested = Throughput::from_mbps(mean(|r| r.requested.as_mbps()))
            .map_err(|_| non_finite("requested bandwidth"))?;
        let mean_allocated = Throughput::from_mbps(mean(|r| r.allocated.as_mbps()))
            .map_err(|_| non_finite("allocated bandwidth"))?;
        let mean_latency = Latency::from_millis_f64(mean(|r| r.latency.as_millis_f64()))
            .map_err(|_| non_finite("latency"))?;

        let mean_queue_length = mean(|r| r.queue_length);
        if !mean_queue_length.is_finite() || mean_queue_length < 0.0 {
            return Err(non_finite("queue length"));
        }

        Ok(Self {
            slice: slice.clone(),
            transactions: records.len(),
            success_rate,
            mean_traffic,
            mean_requested,
            mean_allocated,
            mean_latency,
            mean_queue_length,
        })
    }

    /// granted over requested bandwidth, as a percentage.
    ///
    /// `None` when the mean requested bandwidth is zero — the ratio is
    /// undefined and reported as absent rather than dividing by zero.
    pub fn bandwidth_fulfillment(&self) -> Option<f64> {
        if self.mean_requested.is_zero() {
            return None;
        }
        Some(self.mean_allocated.as_mbps() / self.mean_requested.as_mbps() * 100.0)
    }

    /// the four-field observation window for the queuing model.
    pub fn sample(&self) -> SliceSample {
        SliceSample {
            mean_traffic: self.mean_traffic,
            mean_allocated: self.mean_allocated,
            mean_latency: self.mean_latency,
            mean_queue_length: self.mean_queue_length,
        }
    }
}

/// Error returned when aggregating a slice's records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    /// The record group was empty; its means are undefined.
    #[error("slice {slice} has no transactions to aggregate")]
    EmptySlice { slice: SliceId },
    /// A mean overflowed or a raw value was not finite.
    #[error("slice {slice}: mean {column} is not finite")]
    NonFiniteMean {
        slice: SliceId,
        column: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CongestionLevel;

    fn record(traffic: f64, requested: f64, allocated: f64, latency: f64) -> TransactionRecord {
        TransactionRecord {
            timestamp: "2025-03-01 00:00:00".to_string(),
            slice: "Slice-1".parse().unwrap(),
            traffic: Throughput::from_mbps(traffic).unwrap(),
            requested: Throughput::from_mbps(requested).unwrap(),
            allocated: Throughput::from_mbps(allocated).unwrap(),
            latency: Latency::from_millis_f64(latency).unwrap(),
            queue_length: 4.0,
            success: true,
            congestion: CongestionLevel::Low,
        }
    }

    fn slice() -> SliceId {
        "Slice-1".parse().unwrap()
    }

    #[test]
    fn empty_group_is_an_error() {
        let err = SliceAggregate::from_records(&slice(), &[]).unwrap_err();
        assert_eq!(
            err,
            AggregateError::EmptySlice { slice: slice() },
        );
    }

    #[test]
    fn means_over_two_records() {
        let a = record(10.0, 10.0, 5.0, 40.0);
        let mut b = record(12.0, 14.0, 7.0, 60.0);
        b.success = false;
        b.queue_length = 8.0;

        let aggregate = SliceAggregate::from_records(&slice(), &[&a, &b]).unwrap();

        assert_eq!(aggregate.transactions, 2);
        assert_eq!(aggregate.success_rate, 0.5);
        assert_eq!(aggregate.mean_traffic.as_mbps(), 11.0);
        assert_eq!(aggregate.mean_requested.as_mbps(), 12.0);
        assert_eq!(aggregate.mean_allocated.as_mbps(), 6.0);
        assert_eq!(aggregate.mean_latency.as_millis_f64(), 50.0);
        assert_eq!(aggregate.mean_queue_length, 6.0);
    }

    #[test]
    fn fulfillment_is_allocated_over_requested() {
        let a = record(10.0, 10.0, 5.0, 40.0);
        let aggregate = SliceAggregate::from_records(&slice(), &[&a]).unwrap();
        assert_eq!(aggregate.bandwidth_fulfillment(), Some(50.0));
    }

    #[test]
    fn fulfillment_undefined_for_zero_requested() {
        let a = record(10.0, 0.0, 0.0, 40.0);
        let aggregate = SliceAggregate::from_records(&slice(), &[&a]).unwrap();
        assert_eq!(aggregate.bandwidth_fulfillment(), None);
    }

    #[test]
    fn non_finite_queue_length_is_an_error() {
        let mut a = record(10.0, 10.0, 5.0, 40.0);
        a.queue_length = f64::NAN;

        let err = SliceAggregate::from_records(&slice(), &[&a]).unwrap_err();
        assert_eq!(
            err,
            AggregateError::NonFiniteMean {
                slice: slice(),
                column: "queue length",
            },
        );
    }

    #[test]
    fn sample_projection() {
        let a = record(10.0, 12.0, 10.4, 50.0);
        let aggregate = SliceAggregate::from_records(&slice(), &[&a]).unwrap();
        let sample = aggregate.sample();

        assert_eq!(sample.mean_traffic(), aggregate.mean_traffic);
        assert_eq!(sample.mean_allocated(), aggregate.mean_allocated);
        assert_eq!(sample.mean_latency(), aggregate.mean_latency);
        assert_eq!(sample.mean_queue_length(), aggregate.mean_queue_length);
    }

    #[test]
    fn direct_sample_rejects_bad_queue_length() {
        let traffic = Throughput::from_mbps(10.0).unwrap();
        let allocated = Throughput::from_mbps(10.4).unwrap();
        let latency = Latency::from_millis_f64(50.0).unwrap();

        assert!(SliceSample::new(traffic, allocated, latency, f64::NAN).is_err());
        assert!(SliceSample::new(traffic, allocated, latency, -1.0).is_err());
        assert!(SliceSample::new(traffic, allocated, latency, 0.0).is_ok());
    }
}
