//! JSON rendering of an [`AnalysisReport`].
//!
//! The report types in `slicescope-core` stay serialization-free; this
//! module maps them onto its own serde structs and serializes those, so the
//! JSON shape is an explicit contract of this crate rather than a mirror of
//! internal types.

use serde::Serialize;
use slicescope_core::{AnalysisReport, SliceReport};

#[derive(Serialize)]
struct ReportDto {
    packet_size_bits: u32,
    bits_per_megabit: f64,
    slices: Vec<SliceDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_latency_ratio: Option<f64>,
    congestion_distribution: Vec<ShareDto>,
}

#[derive(Serialize)]
struct SliceDto {
    slice: String,
    transactions: usize,
    success_rate: f64,
    mean_traffic_mbps: f64,
    mean_requested_mbps: f64,
    mean_allocated_mbps: f64,
    mean_latency_ms: f64,
    mean_queue_length: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    bandwidth_fulfillment_pct: Option<f64>,
    queuing: QueuingDto,
    latency_bottleneck: BottleneckDto,
    congestion_impact: Vec<ImpactDto>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum QueuingDto {
    Computed {
        arrival_rate_per_sec: f64,
        service_rate_per_sec: f64,
        utilization: f64,
        stability: String,
        theoretical_queue_length: f64,
        observed_queue_length: f64,
        queue_discrepancy: f64,
    },
    Undefined {
        reason: String,
    },
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum BottleneckDto {
    Computed {
        success_latency_ms: f64,
        failure_latency_ms: f64,
        difference_ms: f64,
        ratio: f64,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Serialize)]
struct ImpactDto {
    congestion_level: String,
    transactions: usize,
    success_rate: f64,
}

#[derive(Serialize)]
struct ShareDto {
    congestion_level: String,
    transactions: usize,
    share_pct: f64,
}

fn slice_dto(slice: &SliceReport) -> SliceDto {
    let aggregate = &slice.aggregate;

    let queuing = match &slice.queuing {
        Ok(metrics) => QueuingDto::Computed {
            arrival_rate_per_sec: metrics.arrival_rate().as_per_sec(),
            service_rate_per_sec: metrics.service_rate().as_per_sec(),
            utilization: metrics.utilization().value(),
            stability: metrics.stability().to_string(),
            theoretical_queue_length: metrics.theoretical_queue_length(),
            observed_queue_length: metrics.observed_queue_length(),
            queue_discrepancy: metrics.queue_discrepancy(),
        },
        Err(error) => QueuingDto::Undefined {
            reason: error.to_string(),
        },
    };

    let latency_bottleneck = match &slice.latency_bottleneck {
        Ok(bottleneck) => BottleneckDto::Computed {
            success_latency_ms: bottleneck.success_latency.as_millis_f64(),
            failure_latency_ms: bottleneck.failure_latency.as_millis_f64(),
            difference_ms: bottleneck.difference_ms(),
            ratio: bottleneck.ratio(),
        },
        Err(error) => BottleneckDto::Skipped {
            reason: error.to_string(),
        },
    };

    SliceDto {
        slice: aggregate.slice.to_string(),
        transactions: aggregate.transactions,
        success_rate: aggregate.success_rate,
        mean_traffic_mbps: aggregate.mean_traffic.as_mbps(),
        mean_requested_mbps: aggregate.mean_requested.as_mbps(),
        mean_allocated_mbps: aggregate.mean_allocated.as_mbps(),
        mean_latency_ms: aggregate.mean_latency.as_millis_f64(),
        mean_queue_length: aggregate.mean_queue_length,
        bandwidth_fulfillment_pct: aggregate.bandwidth_fulfillment(),
        queuing,
        latency_bottleneck,
        congestion_impact: slice
            .congestion_impact
            .iter()
            .map(|impact| ImpactDto {
                congestion_level: impact.level.to_string(),
                transactions: impact.transactions,
                success_rate: impact.success_rate,
            })
            .collect(),
    }
}

/// render a report as pretty-printed JSON.
pub fn render_json(report: &AnalysisReport) -> serde_json::Result<String> {
    let dto = ReportDto {
        packet_size_bits: report.profile.packet_size().bits(),
        bits_per_megabit: report.profile.bits_per_megabit(),
        slices: report.slices.iter().map(slice_dto).collect(),
        mean_latency_ratio: report.mean_latency_ratio,
        congestion_distribution: report
            .congestion_distribution
            .iter()
            .map(|share| ShareDto {
                congestion_level: share.level.to_string(),
                transactions: share.transactions,
                share_pct: share.share,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&dto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicescope_core::{
        CongestionLevel, Dataset, Latency, PacketProfile, Throughput, TransactionRecord,
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
            congestion: CongestionLevel::Low,
        }
    }

    fn render(dataset: &Dataset) -> serde_json::Value {
        let report = AnalysisReport::compute(dataset, &PacketProfile::default()).unwrap();
        let json = render_json(&report).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn shape_of_a_computed_slice() {
        let value = render(&Dataset::new(vec![
            record("Slice-1", 10.4, true),
            record("Slice-1", 10.4, false),
        ]));

        assert_eq!(value["packet_size_bits"], 12_000);
        assert_eq!(value["bits_per_megabit"], 1_000_000.0);

        let slice = &value["slices"][0];
        assert_eq!(slice["slice"], "Slice-1");
        assert_eq!(slice["transactions"], 2);
        assert_eq!(slice["queuing"]["status"], "computed");
        assert_eq!(slice["queuing"]["stability"], "high utilization");
        assert_eq!(slice["latency_bottleneck"]["status"], "computed");
    }

    #[test]
    fn undefined_queuing_is_tagged() {
        let value = render(&Dataset::new(vec![record("Slice-1", 0.0, true)]));

        let queuing = &value["slices"][0]["queuing"];
        assert_eq!(queuing["status"], "undefined");
        assert!(
            queuing["reason"]
                .as_str()
                .unwrap()
                .contains("service rate is zero")
        );
    }

    #[test]
    fn skipped_bottleneck_is_tagged() {
        let value = render(&Dataset::new(vec![record("Slice-1", 10.4, true)]));

        let bottleneck = &value["slices"][0]["latency_bottleneck"];
        assert_eq!(bottleneck["status"], "skipped");
    }

    #[test]
    fn distribution_serialized() {
        let value = render(&Dataset::new(vec![record("Slice-1", 10.4, true)]));

        let distribution = value["congestion_distribution"].as_array().unwrap();
        assert_eq!(distribution.len(), 3);
        assert_eq!(distribution[0]["congestion_level"], "Low");
        assert_eq!(distribution[0]["share_pct"], 100.0);
    }
}
