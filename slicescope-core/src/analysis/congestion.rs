use crate::record::{CongestionLevel, TransactionRecord};

/// Success rate under one congestion level, for one slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CongestionImpact {
    /// The congestion level this row describes.
    pub level: CongestionLevel,
    /// Number of transactions observed under this level.
    pub transactions: usize,
    /// Share of those that succeeded, in `[0.0, 1.0]`.
    pub success_rate: f64,
}

/// How often one congestion level occurs across the whole table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CongestionShare {
    /// The congestion level this row describes.
    pub level: CongestionLevel,
    /// Number of transactions observed under this level.
    pub transactions: usize,
    /// Share of the whole table, as a percentage.
    pub share: f64,
}

/// success rate per congestion level over a slice's records.
///
/// Levels with no transactions are omitted — a success rate over nothing is
/// undefined, and the report simply has no row for that level. Rows come
/// back in severity order (Low, Medium, High).
pub fn congestion_impact(records: &[&TransactionRecord]) -> Vec<CongestionImpact> {
    CongestionLevel::ALL
        .into_iter()
        .filter_map(|level| {
            let subset: Vec<_> = records.iter().filter(|r| r.congestion == level).collect();
            if subset.is_empty() {
                return None;
            }
            let successes = subset.iter().filter(|r| r.success).count();
            Some(CongestionImpact {
                level,
                transactions: subset.len(),
                success_rate: successes as f64 / subset.len() as f64,
            })
        })
        .collect()
}

/// share of each congestion level over the whole table.
///
/// All three levels are reported, including empty ones (share `0.0`), in
/// severity order. An empty table yields no rows — there is no
/// distribution to take shares of.
pub fn congestion_distribution(records: &[TransactionRecord]) -> Vec<CongestionShare> {
    if records.is_empty() {
        return Vec::new();
    }

    let total = records.len() as f64;
    CongestionLevel::ALL
        .into_iter()
        .map(|level| {
            let transactions = records.iter().filter(|r| r.congestion == level).count();
            CongestionShare {
                level,
                transactions,
                share: transactions as f64 / total * 100.0,
            }
        })
        .collect()
}
