use anyhow::{bail, ensure};
use logos::{Lexer, Logos};
use std::{fmt, str::FromStr, time::Duration};

/// The latency is a measure of how long a transaction took end to end.
///
/// Stored with microsecond precision: constructing a [`Latency`] from a
/// [`Duration`] (or from fractional milliseconds) truncates anything finer
/// than a microsecond.
///
/// ```
/// # use slicescope_core::measure::Latency;
/// # use std::time::Duration;
/// let latency = Latency::new(Duration::from_nanos(987_654_321));
/// assert_eq!(
///     latency.into_duration(),
///     Duration::from_micros(987_654),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Latency(u64);

impl Latency {
    /// The `0` latency. I.e. no latency.
    pub const ZERO: Self = Self::new(Duration::ZERO);

    /// create a new latency with the given [`Duration`].
    #[inline(always)]
    pub const fn new(duration: Duration) -> Self {
        Self(duration.as_micros() as u64)
    }

    /// create a latency from a fractional number of milliseconds, the way
    /// latency columns appear in transaction tables (`"50"`, `"23.7"`).
    ///
    /// # Errors
    ///
    /// Returns a [`LatencyError`] if `millis` is NaN, infinite or negative.
    pub fn from_millis_f64(millis: f64) -> Result<Self, LatencyError> {
        if !millis.is_finite() || millis < 0.0 {
            return Err(LatencyError(millis));
        }
        Ok(Self((millis * 1_000.0).round() as u64))
    }

    /// the latency in fractional milliseconds.
    #[inline]
    pub fn as_millis_f64(self) -> f64 {
        self.0 as f64 / 1_000.0
    }

    /// the latency in seconds — the `W` of Little's Law (`L = λW`).
    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// get the inner duration
    #[inline(always)]
    pub fn into_duration(self) -> Duration {
        Duration::from_micros(self.0)
    }
}

impl From<Latency> for Duration {
    fn from(value: Latency) -> Self {
        value.into_duration()
    }
}
impl From<Duration> for Latency {
    fn from(value: Duration) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Duration as fmt::Debug>::fmt(&self.into_duration(), f)
    }
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\n\f]+")] // Ignore this regex pattern between tokens
enum LatencyToken {
    #[token("ns")]
    NanoSeconds,
    #[regex("us|µs")]
    MicroSeconds,
    #[token("ms")]
    MilliSeconds,
    #[token("s")]
    Seconds,
    #[token("m")]
    Minutes,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Value,
}

impl FromStr for Latency {
    type Err = anyhow::Error;

    /// Parses one or more `number unit` segments and sums them:
    /// `"50ms"`, `"1.542s"`, `"1s 542ms"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lex = Lexer::<'_, LatencyToken>::new(s);

        let mut total_us = 0.0f64;
        let mut segments = 0usize;

        while let Some(next) = lex.next() {
            let Ok(LatencyToken::Value) = next else {
                bail!("Expecting a latency segment to start with a number")
            };
            let number: f64 = lex.slice().parse()?;

            let Some(Ok(unit)) = lex.next() else {
                bail!("Expecting a unit (ns, us, ms, s, m)")
            };
            let us = match unit {
                LatencyToken::NanoSeconds => number / 1_000.0,
                LatencyToken::MicroSeconds => number,
                LatencyToken::MilliSeconds => number * 1_000.0,
                LatencyToken::Seconds => number * 1_000_000.0,
                LatencyToken::Minutes => number * 60.0 * 1_000_000.0,
                LatencyToken::Value => bail!("Expecting a unit (ns, us, ms, s, m)"),
            };
            total_us += us;
            segments += 1;
        }

        ensure!(segments > 0, "Expecting at least one latency segment");
        ensure!(total_us.is_finite(), "Latency out of range");

        Ok(Self(total_us.round() as u64))
    }
}

/// Error returned when constructing a [`Latency`] from a millisecond value
/// that is NaN, infinite or negative.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("latency must be finite and non-negative, got {0}ms")]
pub struct LatencyError(f64);
