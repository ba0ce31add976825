//! The assembled analysis: one pure snapshot binding every per-slice and
//! whole-table statistic, ready for a renderer.

use crate::{
    aggregate::{AggregateError, SliceAggregate},
    analysis::{
        BottleneckError, CongestionImpact, CongestionShare, LatencyBottleneck,
        congestion_distribution, congestion_impact, mean_latency_ratio,
    },
    dataset::Dataset,
    queuing::{PacketProfile, QueuingError, QueuingMetrics},
};

/// Everything computed for one slice.
///
/// The queuing and bottleneck outcomes stay as [`Result`]s: a slice whose
/// utilization is undefined (zero allocated bandwidth) or whose outcome
/// partitions are one-sided is still part of the report — renderers print
/// the reason instead of dropping the slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceReport {
    /// Descriptive statistics of the slice.
    pub aggregate: SliceAggregate,
    /// Queuing metrics, or why they could not be computed.
    pub queuing: Result<QueuingMetrics, QueuingError>,
    /// Latency-by-outcome comparison, or why it could not be computed.
    pub latency_bottleneck: Result<LatencyBottleneck, BottleneckError>,
    /// Success rate per congestion level; empty levels omitted.
    pub congestion_impact: Vec<CongestionImpact>,
}

/// The full analysis over one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// The packet model the queuing metrics were computed under.
    pub profile: PacketProfile,
    /// Per-slice reports, in first-seen order.
    pub slices: Vec<SliceReport>,
    /// Mean failure/success latency ratio over the slices where the
    /// bottleneck analysis succeeded; `None` if it succeeded nowhere.
    pub mean_latency_ratio: Option<f64>,
    /// Whole-table congestion level distribution.
    pub congestion_distribution: Vec<CongestionShare>,
}

impl AnalysisReport {
    /// run every analysis over a dataset.
    ///
    /// Slice-level degeneracies (undefined utilization, one-sided outcome
    /// partitions) are embedded in the corresponding [`SliceReport`];
    /// only a malformed aggregate — a non-finite mean — fails the whole
    /// report.
    ///
    /// ```
    /// # use slicescope_core::{
    /// #     generate::{self, GeneratorConfig},
    /// #     queuing::PacketProfile,
    /// #     report::AnalysisReport,
    /// # };
    /// let dataset = generate::generate(&GeneratorConfig::default());
    /// let report = AnalysisReport::compute(&dataset, &PacketProfile::default()).unwrap();
    /// assert_eq!(report.slices.len(), 3);
    /// ```
    pub fn compute(dataset: &Dataset, profile: &PacketProfile) -> Result<Self, AggregateError> {
        let mut slices = Vec::new();

        for group in dataset.group_by_slice() {
            let aggregate = SliceAggregate::from_group(&group)?;
            let queuing = QueuingMetrics::compute(&aggregate.sample(), profile);
            let latency_bottleneck = LatencyBottleneck::from_records(group.id, &group.records);
            let congestion_impact = congestion_impact(&group.records);

            slices.push(SliceReport {
                aggregate,
                queuing,
                latency_bottleneck,
                congestion_impact,
            });
        }

        let with_ratio: Vec<LatencyBottleneck> = slices
            .iter()
            .filter_map(|slice| slice.latency_bottleneck.clone().ok())
            .collect();

        Ok(Self {
            profile: *profile,
            slices,
            mean_latency_ratio: mean_latency_ratio(&with_ratio),
            congestion_distribution: congestion_distribution(dataset.records()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        measure::{Latency, Throughput},
        record::{CongestionLevel, TransactionRecord},
    };

    fn record(slice: &str, allocated: f64, success: bool) -> TransactionRecord {
        TransactionRecord {
            timestamp: "2025-03-01 00:00:00".to_string(),
            slice: slice.parse().unwrap(),
            traffic: Throughput::from_mbps(10.0).unwrap(),
            requested: Throughput::from_mbps(12.0).unwrap(),
            allocated: Throughput::from_mbps(allocated).unwrap(),
            latency: Latency::from_millis_f64(50.0).unwrap(),
            queue_length: 45.0,
            success,
            congestion: CongestionLevel::Medium,
        }
    }

    #[test]
    fn empty_dataset_yields_empty_report() {
        let report =
            AnalysisReport::compute(&Dataset::default(), &PacketProfile::default()).unwrap();

        assert!(report.slices.is_empty());
        assert_eq!(report.mean_latency_ratio, None);
        assert!(report.congestion_distribution.is_empty());
    }

    #[test]
    fn slices_in_first_seen_order() {
        let dataset = Dataset::new(vec![
            record("Slice-2", 10.4, true),
            record("Slice-1", 10.4, false),
            record("Slice-2", 10.4, false),
        ]);

        let report = AnalysisReport::compute(&dataset, &PacketProfile::default()).unwrap();
        let ids: Vec<&str> = report
            .slices
            .iter()
            .map(|s| s.aggregate.slice.as_str())
            .collect();
        assert_eq!(ids, ["Slice-2", "Slice-1"]);
    }

    #[test]
    fn degenerate_slice_stays_in_the_report() {
        // Slice-1 has no allocated bandwidth at all: utilization undefined.
        let dataset = Dataset::new(vec![
            record("Slice-1", 0.0, true),
            record("Slice-1", 0.0, false),
            record("Slice-2", 10.4, true),
            record("Slice-2", 10.4, false),
        ]);

        let report = AnalysisReport::compute(&dataset, &PacketProfile::default()).unwrap();
        assert_eq!(report.slices.len(), 2);

        assert_eq!(
            report.slices[0].queuing,
            Err(QueuingError::UndefinedUtilization)
        );
        assert!(report.slices[1].queuing.is_ok());
    }

    #[test]
    fn one_sided_outcomes_stay_in_the_report() {
        let dataset = Dataset::new(vec![
            record("Slice-1", 10.4, true), // successes only
            record("Slice-2", 10.4, true),
            record("Slice-2", 10.4, false),
        ]);

        let report = AnalysisReport::compute(&dataset, &PacketProfile::default()).unwrap();

        assert!(report.slices[0].latency_bottleneck.is_err());
        assert!(report.slices[1].latency_bottleneck.is_ok());
        // the mean ratio covers only Slice-2
        assert!(report.mean_latency_ratio.is_some());
    }

    #[test]
    fn distribution_spans_the_whole_table() {
        let dataset = Dataset::new(vec![
            record("Slice-1", 10.4, true),
            record("Slice-2", 10.4, true),
        ]);

        let report = AnalysisReport::compute(&dataset, &PacketProfile::default()).unwrap();
        let medium = &report.congestion_distribution[1];
        assert_eq!(medium.level, CongestionLevel::Medium);
        assert_eq!(medium.transactions, 2);
        assert_eq!(medium.share, 100.0);
    }
}
