use slicescope_core::{
    aggregate::SliceSample,
    measure::{Latency, Throughput},
    queuing::{PacketProfile, QueuingMetrics},
};

fn main() -> anyhow::Result<()> {
    // One slice's observation window: 10 Mbps offered against 10.4 Mbps
    // granted, 50 ms of latency, 45 packets sitting in the queue on average.
    let sample = SliceSample::new(
        Throughput::from_mbps(10.0)?,
        Throughput::from_mbps(10.4)?,
        Latency::from_millis_f64(50.0)?,
        45.0,
    )?;

    let metrics = QueuingMetrics::compute(&sample, &PacketProfile::default())?;

    println!("arrival rate (λ):   {}", metrics.arrival_rate());
    println!("service rate (µ):   {}", metrics.service_rate());
    println!(
        "utilization (ρ):    {} — {}",
        metrics.utilization(),
        metrics.stability()
    );
    println!(
        "queue length (L=λW): {:.2} packets theoretical, {:.2} observed (Δ {:.2})",
        metrics.theoretical_queue_length(),
        metrics.observed_queue_length(),
        metrics.queue_discrepancy(),
    );

    Ok(())
}
