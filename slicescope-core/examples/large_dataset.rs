use indicatif::ProgressBar;
use slicescope_core::{
    generate::{self, GeneratorConfig},
    queuing::PacketProfile,
    report::AnalysisReport,
};

const ROUNDS: u64 = 100;
const ROWS: usize = 100_000;

/// Runs the full analysis pipeline repeatedly over a large generated
/// dataset. Handy for eyeballing throughput outside of criterion — the
/// whole pipeline is a single pass, so wall time should scale linearly
/// with the row count.
fn main() -> anyhow::Result<()> {
    let dataset = generate::generate(&GeneratorConfig {
        rows: ROWS,
        seed: 42,
    });
    let profile = PacketProfile::default();

    let pb = ProgressBar::new(ROUNDS);
    for _ in 0..ROUNDS {
        let report = AnalysisReport::compute(&dataset, &profile)?;
        assert_eq!(report.slices.len(), 3);
        pb.inc(1);
    }
    pb.finish_with_message("All rounds done");

    Ok(())
}
