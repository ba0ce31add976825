use crate::measure::PacketSize;

/// Default [`PacketSize`]
///
/// 12_000 bits — a 1500-byte Ethernet-style payload. This is the packet
/// size the rate conversions assume unless a [`PacketProfile`] overrides it.
///
/// ```
/// # use slicescope_core::defaults::*;
/// assert_eq!(
///     DEFAULT_PACKET_SIZE.to_string(),
///     "1500B"
/// );
/// ```
///
/// [`PacketProfile`]: crate::queuing::PacketProfile
pub const DEFAULT_PACKET_SIZE: PacketSize = match PacketSize::from_bits(12_000) {
    Ok(size) => size,
    Err(_) => unreachable!(),
};

/// Default number of bits in one megabit.
///
/// Decimal (SI) megabits: `1 mbps = 1_000_000 bits per second`. Kept as an
/// explicit, overridable parameter so rate conversions stay reproducible
/// under different unit conventions.
pub const DEFAULT_BITS_PER_MEGABIT: f64 = 1_000_000.0;

/// Default number of rows for the synthetic dataset generator.
pub const DEFAULT_GENERATOR_ROWS: usize = 300;

/// Default seed for the synthetic dataset generator.
///
/// The generator is fully deterministic: the same seed always produces the
/// same dataset. See [`generate`](crate::generate::generate).
pub const DEFAULT_GENERATOR_SEED: u64 = 42;
