//! Sectioned text rendering of an [`AnalysisReport`].
//!
//! The renderer writes to any [`io::Write`] sink — stdout in the CLI, a
//! buffer in tests. It only formats: every number it prints was computed
//! upstream in `slicescope-core`.

use slicescope_core::AnalysisReport;
use std::io;

const RULE: &str = "======================================================================";
const THIN_RULE: &str = "----------------------------------------------------------------------";

/// render the whole report.
pub fn render_report(report: &AnalysisReport, out: &mut impl io::Write) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "NETWORK SLICE PERFORMANCE REPORT")?;
    writeln!(
        out,
        "packet model: {} packets, {} bits per megabit",
        report.profile.packet_size(),
        report.profile.bits_per_megabit(),
    )?;
    writeln!(out, "{RULE}")?;

    overall_performance(report, out)?;
    queuing_model(report, out)?;
    latency_bottleneck(report, out)?;
    congestion(report, out)?;

    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    Ok(())
}

fn section(out: &mut impl io::Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{THIN_RULE}")
}

fn overall_performance(report: &AnalysisReport, out: &mut impl io::Write) -> io::Result<()> {
    section(out, "1. OVERALL PERFORMANCE")?;

    for slice in &report.slices {
        let aggregate = &slice.aggregate;
        writeln!(out)?;
        writeln!(out, "{}:", aggregate.slice)?;
        writeln!(out, "  Transactions:          {}", aggregate.transactions)?;
        writeln!(
            out,
            "  Success Rate:          {:.2}%",
            aggregate.success_rate * 100.0
        )?;
        writeln!(
            out,
            "  Avg Latency:           {:.2} ms",
            aggregate.mean_latency.as_millis_f64()
        )?;
        writeln!(
            out,
            "  Avg Queue Length:      {:.2} packets",
            aggregate.mean_queue_length
        )?;
        match aggregate.bandwidth_fulfillment() {
            Some(pct) => writeln!(out, "  Bandwidth Fulfillment: {pct:.1}%")?,
            None => writeln!(out, "  Bandwidth Fulfillment: n/a (nothing requested)")?,
        }
    }

    Ok(())
}

fn queuing_model(report: &AnalysisReport, out: &mut impl io::Write) -> io::Result<()> {
    section(out, "2. PACKET-LEVEL QUEUING MODEL")?;

    for slice in &report.slices {
        writeln!(out)?;
        writeln!(out, "{}:", slice.aggregate.slice)?;

        match &slice.queuing {
            Ok(metrics) => {
                writeln!(out, "  Arrival Rate (λ):  {}", metrics.arrival_rate())?;
                writeln!(out, "  Service Rate (µ):  {}", metrics.service_rate())?;
                writeln!(
                    out,
                    "  Utilization (ρ):   {} — {}",
                    metrics.utilization(),
                    metrics.stability()
                )?;
                writeln!(
                    out,
                    "  Little's Law:      L = λW = {:.2} packets theoretical, {:.2} observed (Δ {:.2})",
                    metrics.theoretical_queue_length(),
                    metrics.observed_queue_length(),
                    metrics.queue_discrepancy(),
                )?;
            }
            Err(error) => writeln!(out, "  Utilization (ρ):   undefined — {error}")?,
        }
    }

    Ok(())
}

fn latency_bottleneck(report: &AnalysisReport, out: &mut impl io::Write) -> io::Result<()> {
    section(out, "3. LATENCY BOTTLENECK")?;

    for slice in &report.slices {
        writeln!(out)?;
        writeln!(out, "{}:", slice.aggregate.slice)?;

        match &slice.latency_bottleneck {
            Ok(bottleneck) => {
                writeln!(
                    out,
                    "  Success Latency: {:.2} ms",
                    bottleneck.success_latency.as_millis_f64()
                )?;
                writeln!(
                    out,
                    "  Failure Latency: {:.2} ms",
                    bottleneck.failure_latency.as_millis_f64()
                )?;
                writeln!(out, "  Difference:      {:+.2} ms", bottleneck.difference_ms())?;
                writeln!(out, "  Ratio:           {:.2}x", bottleneck.ratio())?;
            }
            Err(error) => writeln!(out, "  skipped — {error}")?,
        }
    }

    if let Some(ratio) = report.mean_latency_ratio {
        writeln!(out)?;
        writeln!(out, "Average Latency Ratio: {ratio:.2}x")?;
    }

    Ok(())
}

fn congestion(report: &AnalysisReport, out: &mut impl io::Write) -> io::Result<()> {
    section(out, "4. CONGESTION")?;

    for slice in &report.slices {
        writeln!(out)?;
        writeln!(out, "{}:", slice.aggregate.slice)?;
        for impact in &slice.congestion_impact {
            writeln!(
                out,
                "  {}: {:.2}% ({} transactions)",
                impact.level,
                impact.success_rate * 100.0,
                impact.transactions,
            )?;
        }
    }

    if !report.congestion_distribution.is_empty() {
        writeln!(out)?;
        writeln!(out, "Distribution:")?;
        for share in &report.congestion_distribution {
            writeln!(
                out,
                "  {}: {:.1}% ({} transactions)",
                share.level, share.share, share.transactions,
            )?;
        }
    }

    Ok(())
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
            congestion: CongestionLevel::Medium,
        }
    }

    fn render(dataset: &Dataset) -> String {
        let report = AnalysisReport::compute(dataset, &PacketProfile::default()).unwrap();
        let mut out = Vec::new();
        render_report(&report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn all_sections_present() {
        let dataset = Dataset::new(vec![
            record("Slice-1", 10.4, true),
            record("Slice-1", 10.4, false),
        ]);
        let text = render(&dataset);

        assert!(text.contains("NETWORK SLICE PERFORMANCE REPORT"));
        assert!(text.contains("1. OVERALL PERFORMANCE"));
        assert!(text.contains("2. PACKET-LEVEL QUEUING MODEL"));
        assert!(text.contains("3. LATENCY BOTTLENECK"));
        assert!(text.contains("4. CONGESTION"));
    }

    #[test]
    fn queuing_numbers_rendered() {
        let dataset = Dataset::new(vec![
            record("Slice-1", 10.4, true),
            record("Slice-1", 10.4, false),
        ]);
        let text = render(&dataset);

        assert!(text.contains("Arrival Rate (λ):  833.33pkt/s"));
        assert!(text.contains("Service Rate (µ):  866.67pkt/s"));
        assert!(text.contains("96.15% — high utilization"));
        assert!(text.contains("41.67 packets theoretical"));
    }

    #[test]
    fn undefined_utilization_rendered_not_dropped() {
        let dataset = Dataset::new(vec![record("Slice-1", 0.0, true)]);
        let text = render(&dataset);

        assert!(text.contains("Slice-1:"));
        assert!(text.contains("undefined — utilization is undefined"));
    }

    #[test]
    fn one_sided_bottleneck_explained() {
        let dataset = Dataset::new(vec![record("Slice-1", 10.4, true)]);
        let text = render(&dataset);

        assert!(text.contains("skipped — slice Slice-1 has no failed transactions"));
    }

    #[test]
    fn congestion_distribution_rendered() {
        let dataset = Dataset::new(vec![record("Slice-1", 10.4, true)]);
        let text = render(&dataset);

        assert!(text.contains("Distribution:"));
        assert!(text.contains("Medium: 100.0% (1 transactions)"));
    }
}
