//! The packet-level queuing model of a slice.
//!
//! Converts one slice's observation window ([`SliceSample`]) into queuing
//! metrics: arrival rate λ, service rate µ, utilization ρ = λ/µ, a stability
//! classification, and the Little's-Law queue length `L = λW` next to the
//! observed one.

use crate::{
    aggregate::SliceSample,
    defaults,
    measure::{PacketRate, PacketSize, Stability, Throughput, Utilization},
};
use thiserror::Error;

/// The packet model rate conversions assume: how big one packet is, and how
/// many bits a megabit carries.
///
/// Both values are explicit, per-call configuration rather than process-wide
/// constants, so a report stays reproducible under different assumptions.
///
/// # Default
///
/// ```
/// # use slicescope_core::queuing::PacketProfile;
/// let profile = PacketProfile::default();
/// assert_eq!(profile.packet_size().bits(), 12_000);
/// assert_eq!(profile.bits_per_megabit(), 1_000_000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacketProfile {
    packet_size: PacketSize,
    bits_per_megabit: f64,
}

impl PacketProfile {
    /// create a profile from a packet size and a megabit definition.
    ///
    /// # Errors
    ///
    /// Returns [`PacketProfileError`] if `bits_per_megabit` is NaN, infinite
    /// or not strictly positive.
    pub fn new(packet_size: PacketSize, bits_per_megabit: f64) -> Result<Self, PacketProfileError> {
        if !bits_per_megabit.is_finite() || bits_per_megabit <= 0.0 {
            return Err(PacketProfileError(bits_per_megabit));
        }
        Ok(Self {
            packet_size,
            bits_per_megabit,
        })
    }

    /// profile with the given packet size and the default megabit.
    pub fn with_packet_size(packet_size: PacketSize) -> Self {
        Self {
            packet_size,
            bits_per_megabit: defaults::DEFAULT_BITS_PER_MEGABIT,
        }
    }

    /// the assumed packet size.
    pub fn packet_size(&self) -> PacketSize {
        self.packet_size
    }

    /// the assumed number of bits per megabit.
    pub fn bits_per_megabit(&self) -> f64 {
        self.bits_per_megabit
    }

    /// convert a throughput into a packet rate under this profile.
    ///
    /// ```
    /// # use slicescope_core::{measure::Throughput, queuing::PacketProfile};
    /// let profile = PacketProfile::default();
    /// let rate = profile
    ///     .packet_rate(Throughput::from_mbps(10.0).unwrap())
    ///     .unwrap();
    /// assert!((rate.as_per_sec() - 833.33).abs() < 0.01);
    /// ```
    ///
    /// # Errors
    ///
    /// [`QueuingError::NonFiniteComputation`] if the conversion overflows —
    /// only reachable for absurdly large throughputs.
    pub fn packet_rate(&self, throughput: Throughput) -> Result<PacketRate, QueuingError> {
        let packets = throughput.as_mbps() * self.bits_per_megabit / self.packet_size.as_f64();
        PacketRate::from_per_sec(packets).map_err(|_| QueuingError::NonFiniteComputation)
    }
}

impl Default for PacketProfile {
    fn default() -> Self {
        Self {
            packet_size: defaults::DEFAULT_PACKET_SIZE,
            bits_per_megabit: defaults::DEFAULT_BITS_PER_MEGABIT,
        }
    }
}

/// Error returned when constructing a [`PacketProfile`] with an invalid
/// megabit definition.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("bits per megabit must be finite and strictly positive, got {0}")]
pub struct PacketProfileError(f64);

/// The derived queuing metrics of one slice.
///
/// A pure value: recomputed from a [`SliceSample`] whenever the inputs
/// change, never cached or mutated. Two computations over the same sample
/// and profile yield identical values.
///
/// ```
/// # use slicescope_core::{
/// #     aggregate::SliceSample,
/// #     measure::{Latency, Stability, Throughput},
/// #     queuing::{PacketProfile, QueuingMetrics},
/// # };
/// let sample = SliceSample::new(
///     Throughput::from_mbps(10.0).unwrap(),
///     Throughput::from_mbps(10.4).unwrap(),
///     Latency::from_millis_f64(50.0).unwrap(),
///     45.0,
/// ).unwrap();
///
/// let metrics = QueuingMetrics::compute(&sample, &PacketProfile::default()).unwrap();
///
/// assert_eq!(metrics.stability(), Stability::HighUtilization);
/// assert!((metrics.theoretical_queue_length() - 41.67).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueuingMetrics {
    arrival_rate: PacketRate,
    service_rate: PacketRate,
    utilization: Utilization,
    stability: Stability,
    theoretical_queue_length: f64,
    observed_queue_length: f64,
}

impl QueuingMetrics {
    /// compute the queuing metrics for one slice sample.
    ///
    /// The computation is a pure function of its arguments: no I/O, no
    /// randomness, no shared state. Samples can be processed in any order,
    /// or in parallel, with no synchronisation.
    ///
    /// # Errors
    ///
    /// [`QueuingError::UndefinedUtilization`] when the sample's allocated
    /// bandwidth is zero: the service rate is then zero and ρ = λ/µ has no
    /// value. The error is surfaced instead of an `∞`/NaN so the caller can
    /// decide whether to skip, default or abort for that slice.
    pub fn compute(
        sample: &SliceSample,
        profile: &PacketProfile,
    ) -> Result<Self, QueuingError> {
        let arrival_rate = profile.packet_rate(sample.mean_traffic())?;
        let service_rate = profile.packet_rate(sample.mean_allocated())?;

        if service_rate.is_zero() {
            return Err(QueuingError::UndefinedUtilization);
        }

        let rho = arrival_rate.as_per_sec() / service_rate.as_per_sec();
        let utilization =
            Utilization::new(rho).map_err(|_| QueuingError::NonFiniteComputation)?;

        // Little's Law, L = λW, with W in seconds.
        let theoretical_queue_length = arrival_rate.as_per_sec() * sample.mean_latency().as_secs_f64();
        if !theoretical_queue_length.is_finite() {
            return Err(QueuingError::NonFiniteComputation);
        }

        Ok(Self {
            arrival_rate,
            service_rate,
            utilization,
            stability: utilization.stability(),
            theoretical_queue_length,
            observed_queue_length: sample.mean_queue_length(),
        })
    }

    /// arrival rate λ, in packets per second.
    pub fn arrival_rate(&self) -> PacketRate {
        self.arrival_rate
    }

    /// service rate µ, in packets per second. Always non-zero.
    pub fn service_rate(&self) -> PacketRate {
        self.service_rate
    }

    /// traffic intensity ρ = λ/µ.
    pub fn utilization(&self) -> Utilization {
        self.utilization
    }

    /// the stability bucket of [`utilization`](Self::utilization).
    pub fn stability(&self) -> Stability {
        self.stability
    }

    /// the queue length Little's Law predicts: `L = λW`.
    pub fn theoretical_queue_length(&self) -> f64 {
        self.theoretical_queue_length
    }

    /// the queue length actually observed, carried over from the sample.
    pub fn observed_queue_length(&self) -> f64 {
        self.observed_queue_length
    }

    /// absolute difference between the theoretical and observed queue
    /// lengths. Informational only — no threshold is attached to it.
    pub fn queue_discrepancy(&self) -> f64 {
        (self.theoretical_queue_length - self.observed_queue_length).abs()
    }
}

/// Error returned by [`QueuingMetrics::compute`].
///
/// There is no recovery inside the calculator: the failure propagates to
/// the caller, which decides per slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueuingError {
    /// The service rate is zero (no allocated bandwidth); ρ is undefined.
    #[error("utilization is undefined: the service rate is zero")]
    UndefinedUtilization,
    /// A conversion overflowed into a non-finite value.
    #[error("queuing computation produced a non-finite value")]
    NonFiniteComputation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::Latency;

    const TOLERANCE: f64 = 1e-9;

    fn sample(traffic: f64, allocated: f64, latency_ms: f64, queue: f64) -> SliceSample {
        SliceSample::new(
            Throughput::from_mbps(traffic).unwrap(),
            Throughput::from_mbps(allocated).unwrap(),
            Latency::from_millis_f64(latency_ms).unwrap(),
            queue,
        )
        .unwrap()
    }

    #[test]
    fn worked_example() {
        // 10 Mbps offered, 10.4 Mbps allocated, 50 ms latency, 12000-bit
        // packets: λ ≈ 833.33 pkt/s, µ ≈ 866.67 pkt/s, ρ ≈ 0.9615,
        // L = λW ≈ 41.67 packets.
        let metrics =
            QueuingMetrics::compute(&sample(10.0, 10.4, 50.0, 45.0), &PacketProfile::default())
                .unwrap();

        assert!((metrics.arrival_rate().as_per_sec() - 833.333_333_333).abs() < 1e-6);
        assert!((metrics.service_rate().as_per_sec() - 866.666_666_667).abs() < 1e-6);
        assert!((metrics.utilization().value() - 0.961_538_461_538).abs() < 1e-9);
        assert_eq!(metrics.stability(), Stability::HighUtilization);
        assert!((metrics.theoretical_queue_length() - 41.666_666_666_7).abs() < 1e-6);
        assert_eq!(metrics.observed_queue_length(), 45.0);
        assert!((metrics.queue_discrepancy() - 3.333_333_333_3).abs() < 1e-6);
    }

    #[test]
    fn utilization_is_exactly_the_rate_ratio() {
        let metrics =
            QueuingMetrics::compute(&sample(7.0, 9.0, 10.0, 0.0), &PacketProfile::default())
                .unwrap();

        let expected =
            metrics.arrival_rate().as_per_sec() / metrics.service_rate().as_per_sec();
        assert!((metrics.utilization().value() - expected).abs() < TOLERANCE);
    }

    #[test]
    fn zero_service_rate_is_undefined() {
        let err =
            QueuingMetrics::compute(&sample(10.0, 0.0, 50.0, 45.0), &PacketProfile::default())
                .unwrap_err();
        assert_eq!(err, QueuingError::UndefinedUtilization);
    }

    #[test]
    fn zero_traffic_is_fully_stable() {
        let metrics =
            QueuingMetrics::compute(&sample(0.0, 10.0, 50.0, 0.0), &PacketProfile::default())
                .unwrap();

        assert_eq!(metrics.arrival_rate(), PacketRate::ZERO);
        assert_eq!(metrics.utilization().value(), 0.0);
        assert_eq!(metrics.stability(), Stability::Stable);
        assert_eq!(metrics.theoretical_queue_length(), 0.0);
    }

    #[test]
    fn overload_is_unstable() {
        let metrics =
            QueuingMetrics::compute(&sample(12.0, 10.0, 50.0, 100.0), &PacketProfile::default())
                .unwrap();

        assert!(metrics.utilization().value() > 1.0);
        assert_eq!(metrics.stability(), Stability::Unstable);
    }

    #[test]
    fn equal_rates_are_unstable() {
        // λ == µ is the ρ = 1.0 boundary: already unstable.
        let metrics =
            QueuingMetrics::compute(&sample(10.0, 10.0, 50.0, 0.0), &PacketProfile::default())
                .unwrap();

        assert_eq!(metrics.utilization().value(), 1.0);
        assert_eq!(metrics.stability(), Stability::Unstable);
    }

    #[test]
    fn idempotent() {
        let sample = sample(10.0, 10.4, 50.0, 45.0);
        let profile = PacketProfile::default();

        let first = QueuingMetrics::compute(&sample, &profile).unwrap();
        let second = QueuingMetrics::compute(&sample, &profile).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn utilization_grows_with_arrival_rate() {
        let profile = PacketProfile::default();

        let mut previous: Option<QueuingMetrics> = None;
        for traffic in [1.0, 2.0, 4.0, 8.0, 9.0, 9.9] {
            let metrics =
                QueuingMetrics::compute(&sample(traffic, 10.0, 50.0, 0.0), &profile).unwrap();
            if let Some(previous) = previous {
                assert!(metrics.utilization().value() > previous.utilization().value());
                assert!(metrics.theoretical_queue_length() > previous.theoretical_queue_length());
            }
            previous = Some(metrics);
        }
    }

    #[test]
    fn packet_size_scales_both_rates() {
        // Double packets → half the packet rate on both sides; ρ unchanged.
        let small = PacketProfile::default();
        let large = PacketProfile::with_packet_size(PacketSize::from_bits(24_000).unwrap());
        let sample = sample(10.0, 10.4, 50.0, 45.0);

        let with_small = QueuingMetrics::compute(&sample, &small).unwrap();
        let with_large = QueuingMetrics::compute(&sample, &large).unwrap();

        assert!(
            (with_large.arrival_rate().as_per_sec() * 2.0
                - with_small.arrival_rate().as_per_sec())
            .abs()
                < TOLERANCE
        );
        assert!(
            (with_large.utilization().value() - with_small.utilization().value()).abs()
                < TOLERANCE
        );
    }

    #[test]
    fn custom_bits_per_megabit() {
        let profile =
            PacketProfile::new(PacketSize::from_bits(12_000).unwrap(), 1_048_576.0).unwrap();
        let metrics = QueuingMetrics::compute(&sample(10.0, 10.4, 50.0, 45.0), &profile).unwrap();

        assert!((metrics.arrival_rate().as_per_sec() - 10.0 * 1_048_576.0 / 12_000.0).abs()
            < TOLERANCE);
    }

    #[test]
    fn invalid_bits_per_megabit_rejected() {
        let size = PacketSize::from_bits(12_000).unwrap();
        assert!(PacketProfile::new(size, 0.0).is_err());
        assert!(PacketProfile::new(size, -1.0).is_err());
        assert!(PacketProfile::new(size, f64::NAN).is_err());
        assert!(PacketProfile::new(size, f64::INFINITY).is_err());
    }

    #[test]
    fn overflow_is_reported_not_propagated() {
        let sample = sample(f64::MAX, 10.0, 50.0, 0.0);
        let err = QueuingMetrics::compute(&sample, &PacketProfile::default()).unwrap_err();
        assert_eq!(err, QueuingError::NonFiniteComputation);
    }
}
