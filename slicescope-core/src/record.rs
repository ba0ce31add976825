use crate::measure::{Latency, Throughput};
use std::{fmt, str};

/// The identifier of a network slice.
///
/// An opaque label (`"Slice-1"`, `"embb"`, ...) taken verbatim from the
/// transaction table. Identity is exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SliceId(String);

impl SliceId {
    /// create a slice identifier from a label.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty (or whitespace-only) label.
    pub fn new(label: impl Into<String>) -> Result<Self, SliceIdError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(SliceIdError);
        }
        Ok(Self(label))
    }

    /// the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl str::FromStr for SliceId {
    type Err = SliceIdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for SliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Error returned when constructing a [`SliceId`] from an empty label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("slice identifier must not be empty")]
pub struct SliceIdError;

/// The congestion level a transaction was observed under.
///
/// The table column is restricted to these three values; anything else is
/// rejected when loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
}

impl CongestionLevel {
    /// all levels, in severity order — the order report sections and the
    /// distribution chart walk them in.
    pub const ALL: [CongestionLevel; 3] = [
        CongestionLevel::Low,
        CongestionLevel::Medium,
        CongestionLevel::High,
    ];
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CongestionLevel::Low => "Low".fmt(f),
            CongestionLevel::Medium => "Medium".fmt(f),
            CongestionLevel::High => "High".fmt(f),
        }
    }
}

impl str::FromStr for CongestionLevel {
    type Err = CongestionLevelError;

    /// Case-insensitive; the canonical forms are `Low`, `Medium`, `High`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("low") {
            Ok(CongestionLevel::Low)
        } else if s.eq_ignore_ascii_case("medium") {
            Ok(CongestionLevel::Medium)
        } else if s.eq_ignore_ascii_case("high") {
            Ok(CongestionLevel::High)
        } else {
            Err(CongestionLevelError(s.to_string()))
        }
    }
}

/// Error returned when parsing a [`CongestionLevel`] from an unknown label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown congestion level `{0}', expected Low, Medium or High")]
pub struct CongestionLevelError(String);

/// One simulated transaction on one network slice.
///
/// The raw row of the analysis: everything downstream (aggregation, the
/// queuing model, the bottleneck analyses) is a pure function over groups
/// of these.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Opaque timestamp label, carried through untouched. Every statistic
    /// computed over a slice group is order-insensitive, so records need no
    /// time ordering.
    pub timestamp: String,
    /// The slice this transaction ran on.
    pub slice: SliceId,
    /// Offered traffic volume during the transaction.
    pub traffic: Throughput,
    /// Bandwidth the transaction asked for.
    pub requested: Throughput,
    /// Bandwidth actually granted.
    pub allocated: Throughput,
    /// End-to-end latency observed.
    pub latency: Latency,
    /// Mean queue length observed, in packets.
    pub queue_length: f64,
    /// Whether the transaction succeeded.
    pub success: bool,
    /// Congestion level the transaction was observed under.
    pub congestion: CongestionLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_id_round_trip() {
        let id: SliceId = "Slice-1".parse().unwrap();
        assert_eq!(id.to_string(), "Slice-1");
        assert_eq!(id.as_str(), "Slice-1");
    }

    #[test]
    fn slice_id_empty_rejected() {
        assert!("".parse::<SliceId>().is_err());
        assert!("   ".parse::<SliceId>().is_err());
    }

    #[test]
    fn congestion_parse_canonical() {
        assert_eq!(
            "Low".parse::<CongestionLevel>().unwrap(),
            CongestionLevel::Low
        );
        assert_eq!(
            "Medium".parse::<CongestionLevel>().unwrap(),
            CongestionLevel::Medium
        );
        assert_eq!(
            "High".parse::<CongestionLevel>().unwrap(),
            CongestionLevel::High
        );
    }

    #[test]
    fn congestion_parse_case_insensitive() {
        assert_eq!(
            "low".parse::<CongestionLevel>().unwrap(),
            CongestionLevel::Low
        );
        assert_eq!(
            " HIGH ".parse::<CongestionLevel>().unwrap(),
            CongestionLevel::High
        );
    }

    #[test]
    fn congestion_parse_unknown_rejected() {
        let err = "Severe".parse::<CongestionLevel>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown congestion level `Severe', expected Low, Medium or High"
        );
    }

    #[test]
    fn congestion_display_round_trip() {
        for level in CongestionLevel::ALL {
            let parsed: CongestionLevel = level.to_string().parse().unwrap();
            assert_eq!(parsed, level);
        }
    }

    #[test]
    fn severity_order() {
        assert!(CongestionLevel::Low < CongestionLevel::Medium);
        assert!(CongestionLevel::Medium < CongestionLevel::High);
    }
}
