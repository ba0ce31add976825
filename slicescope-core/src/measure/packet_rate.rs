use std::{fmt, str::FromStr};

/// A packet rate in packets per second.
///
/// This is the unit both sides of the queuing model are expressed in: the
/// arrival rate λ (derived from offered traffic) and the service rate µ
/// (derived from allocated bandwidth). Always finite and non-negative.
///
/// ```
/// # use slicescope_core::measure::PacketRate;
/// let rate = PacketRate::from_per_sec(833.33).unwrap();
/// assert_eq!(rate.to_string(), "833.33pkt/s");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PacketRate(f64);

impl PacketRate {
    /// no packets at all.
    pub const ZERO: Self = Self(0.0);

    /// create a new rate from packets per second.
    ///
    /// # Errors
    ///
    /// Returns a [`PacketRateError`] if the value is NaN, infinite or
    /// negative.
    pub fn from_per_sec(packets_per_sec: f64) -> Result<Self, PacketRateError> {
        if !packets_per_sec.is_finite() || packets_per_sec < 0.0 {
            return Err(PacketRateError(packets_per_sec));
        }
        Ok(Self(packets_per_sec))
    }

    /// the rate in packets per second.
    #[inline]
    pub fn as_per_sec(self) -> f64 {
        self.0
    }

    /// `true` if the rate is exactly zero — for a service rate this is the
    /// case where utilization is undefined.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for PacketRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}pkt/s", self.0)
    }
}

impl FromStr for PacketRate {
    type Err = PacketRateParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(number) = s.trim().strip_suffix("pkt/s") else {
            return Err(PacketRateParseError::MissingSuffix);
        };
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| PacketRateParseError::InvalidNumber)?;
        Self::from_per_sec(value).map_err(PacketRateParseError::OutOfRange)
    }
}

/// Error returned when constructing a [`PacketRate`] from a value that is
/// NaN, infinite or negative.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("packet rate must be finite and non-negative, got {0}")]
pub struct PacketRateError(f64);

/// Error returned when parsing a [`PacketRate`] from a string.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PacketRateParseError {
    /// The string does not end with `pkt/s`.
    #[error("expected 'pkt/s' suffix")]
    MissingSuffix,
    /// The numeric part could not be parsed as a float.
    #[error("invalid number before 'pkt/s'")]
    InvalidNumber,
    /// The parsed value is NaN, infinite or negative.
    #[error("{0}")]
    OutOfRange(#[from] PacketRateError),
}
