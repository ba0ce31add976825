use anyhow::{bail, ensure};
use logos::{Lexer, Logos};
use std::{fmt, str::FromStr};

/// A traffic volume or bandwidth figure in megabits per second.
///
/// [`Throughput`] is the unit every bandwidth-like column of a transaction
/// table is carried in: offered traffic, requested bandwidth and allocated
/// bandwidth. Values are validated at construction time — a [`Throughput`]
/// is always finite and non-negative.
///
/// Units are decimal (SI): `1 mbps = 1_000_000 bits per second`.
///
/// # Example
///
/// ```
/// # use slicescope_core::measure::Throughput;
/// // create a throughput of `10.4mbps`
/// let offered = Throughput::from_mbps(10.4).unwrap();
/// assert_eq!(offered.as_mbps(), 10.4);
///
/// // or parse one
/// let parsed: Throughput = "10.40mbps".parse().unwrap();
/// assert_eq!(parsed, offered);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Throughput(f64);

impl Throughput {
    /// no traffic at all.
    pub const ZERO: Self = Self(0.0);

    /// create a new [`Throughput`] from megabits per second.
    ///
    /// # Errors
    ///
    /// Returns a [`ThroughputError`] if `mbps` is NaN, infinite or negative.
    pub fn from_mbps(mbps: f64) -> Result<Self, ThroughputError> {
        if !mbps.is_finite() || mbps < 0.0 {
            return Err(ThroughputError(mbps));
        }
        Ok(Self(mbps))
    }

    /// the value in megabits per second.
    #[inline]
    pub fn as_mbps(self) -> f64 {
        self.0
    }

    /// `true` if this throughput is exactly zero.
    ///
    /// A zero allocated bandwidth is the degenerate case the queuing
    /// calculator refuses to divide by.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for Throughput {
    /// Formats in the largest unit that shows the value without noise.
    ///
    /// Whole gigabit multiples print as `gbps`, whole megabit values as
    /// `mbps`, sub-megabit values as `kbps`; everything else keeps two
    /// decimal places.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mbps = self.0;

        if mbps >= 1_000.0 && (mbps / 1_000.0).fract() == 0.0 {
            write!(f, "{}gbps", (mbps / 1_000.0) as u64)
        } else if mbps >= 1.0 || mbps == 0.0 {
            if mbps.fract() == 0.0 {
                write!(f, "{}mbps", mbps as u64)
            } else {
                write!(f, "{mbps:.2}mbps")
            }
        } else {
            let kbps = mbps * 1_000.0;
            if kbps.fract() == 0.0 {
                write!(f, "{}kbps", kbps as u64)
            } else {
                write!(f, "{kbps:.2}kbps")
            }
        }
    }
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\n\f]+")] // Ignore this regex pattern between tokens
enum ThroughputToken {
    #[token("bps")]
    Bps,
    #[token("kbps")]
    Kbps,
    #[token("mbps")]
    Mbps,
    #[token("gbps")]
    Gbps,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Value,
}

impl FromStr for Throughput {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lex = Lexer::<'_, ThroughputToken>::new(s);

        let Some(Ok(ThroughputToken::Value)) = lex.next() else {
            bail!("Expecting to parse a number")
        };
        let number: f64 = lex.slice().parse()?;
        let Some(Ok(token)) = lex.next() else {
            bail!("Expecting to parse a unit")
        };
        let mbps = match token {
            ThroughputToken::Bps => number / 1_000_000.0,
            ThroughputToken::Kbps => number / 1_000.0,
            ThroughputToken::Mbps => number,
            ThroughputToken::Gbps => number * 1_000.0,
            ThroughputToken::Value => bail!("Expecting to parse a unit (bps, kbps, ...)"),
        };

        ensure!(
            lex.next().is_none(),
            "Not expecting any other tokens to parse a throughput"
        );

        Ok(Self::from_mbps(mbps)?)
    }
}

impl Default for Throughput {
    fn default() -> Self {
        Throughput::ZERO
    }
}

/// Error returned when constructing a [`Throughput`] from a value that is
/// NaN, infinite or negative.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("throughput must be finite and non-negative, got {0}mbps")]
pub struct ThroughputError(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_throughput() {
        macro_rules! assert_throughput {
            ($string:literal == $mbps:expr) => {
                assert_eq!(
                    $string.parse::<Throughput>().unwrap(),
                    Throughput::from_mbps($mbps).unwrap()
                );
            };
        }

        assert_throughput!("0mbps" == 0.0);
        assert_throughput!("42mbps" == 42.0);
        assert_throughput!("10.4mbps" == 10.4);
        assert_throughput!("500kbps" == 0.5);
        assert_throughput!("2.5gbps" == 2_500.0);
        assert_throughput!("1000000bps" == 1.0);
    }

    #[test]
    fn print_throughput() {
        macro_rules! assert_throughput {
            (($mbps:expr) == $string:literal) => {
                assert_eq!(
                    Throughput::from_mbps($mbps).unwrap().to_string(),
                    $string
                );
            };
        }

        assert_throughput!((0.0) == "0mbps");
        assert_throughput!((42.0) == "42mbps");
        assert_throughput!((10.4) == "10.40mbps");
        assert_throughput!((0.5) == "500kbps");
        assert_throughput!((2_000.0) == "2gbps");
        // 2.5 gbps is not a whole gigabit multiple, so it stays in mbps
        assert_throughput!((2_500.0) == "2500mbps");
        assert_throughput!((1_500.0) == "1500mbps");
    }

    #[test]
    fn display_round_trip() {
        for mbps in [0.0, 0.5, 1.0, 10.4, 42.0, 1_500.0, 2_500.0] {
            let original = Throughput::from_mbps(mbps).unwrap();
            let parsed: Throughput = original.to_string().parse().unwrap();
            assert_eq!(original, parsed, "round-trip failed for {original}");
        }
    }

    #[test]
    fn nan_rejected() {
        assert!(Throughput::from_mbps(f64::NAN).is_err());
    }

    #[test]
    fn infinity_rejected() {
        assert!(Throughput::from_mbps(f64::INFINITY).is_err());
    }

    #[test]
    fn negative_rejected() {
        assert!(Throughput::from_mbps(-0.1).is_err());
    }

    #[test]
    fn zero_is_zero() {
        assert!(Throughput::ZERO.is_zero());
        assert!(Throughput::from_mbps(0.0).unwrap().is_zero());
        assert!(!Throughput::from_mbps(0.1).unwrap().is_zero());
    }

    #[test]
    fn parse_invalid_strings() {
        assert!("42".parse::<Throughput>().is_err()); // no unit
        assert!("mbps".parse::<Throughput>().is_err()); // no number
        assert!("".parse::<Throughput>().is_err()); // empty
        assert!("42mbps extra".parse::<Throughput>().is_err()); // trailing token
        assert!("-1mbps".parse::<Throughput>().is_err()); // negative
    }

    #[test]
    fn ordering() {
        let low = Throughput::from_mbps(1.0).unwrap();
        let high = Throughput::from_mbps(5.0).unwrap();

        assert!(low < high);
        assert!(high > low);
        assert_eq!(low, Throughput::from_mbps(1.0).unwrap());
    }

    #[test]
    fn error_display() {
        let err = Throughput::from_mbps(-3.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "throughput must be finite and non-negative, got -3mbps"
        );
    }
}
