use anyhow::{bail, ensure};
use logos::{Lexer, Logos};
use std::{fmt, num::NonZeroU32, str::FromStr};

/// The size of one packet, in bits.
///
/// Rate conversions divide by the packet size, so a zero size is rejected
/// at construction time — a [`PacketSize`] is always strictly positive.
///
/// # Default
///
/// The default is [`DEFAULT_PACKET_SIZE`]: 12_000 bits, i.e. a 1500-byte
/// Ethernet-style payload.
///
/// # Example
///
/// ```
/// # use slicescope_core::measure::PacketSize;
/// let size = PacketSize::from_bytes(1_500).unwrap();
/// assert_eq!(size.bits(), 12_000);
///
/// // parsed, either in bits (`b`) or bytes (`B`)
/// let parsed: PacketSize = "1500B".parse().unwrap();
/// assert_eq!(parsed, size);
/// ```
///
/// [`DEFAULT_PACKET_SIZE`]: crate::defaults::DEFAULT_PACKET_SIZE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PacketSize(NonZeroU32);

impl PacketSize {
    /// create a packet size from a number of bits.
    ///
    /// # Errors
    ///
    /// Returns [`PacketSizeError::Zero`] for `0`.
    pub const fn from_bits(bits: u32) -> Result<Self, PacketSizeError> {
        match NonZeroU32::new(bits) {
            Some(bits) => Ok(Self(bits)),
            None => Err(PacketSizeError::Zero),
        }
    }

    /// create a packet size from a number of bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PacketSizeError::Zero`] for `0` and
    /// [`PacketSizeError::TooLarge`] if `bytes * 8` does not fit in 32 bits.
    pub const fn from_bytes(bytes: u32) -> Result<Self, PacketSizeError> {
        match bytes.checked_mul(8) {
            Some(bits) => Self::from_bits(bits),
            None => Err(PacketSizeError::TooLarge),
        }
    }

    /// the packet size in bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0.get()
    }

    /// the packet size in bits, as an `f64` for rate arithmetic.
    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0.get() as f64
    }
}

impl Default for PacketSize {
    fn default() -> Self {
        crate::defaults::DEFAULT_PACKET_SIZE
    }
}

impl fmt::Display for PacketSize {
    /// Whole-byte sizes print in bytes (`1500B`), anything else in bits
    /// (`12001b`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = self.bits();
        if bits % 8 == 0 {
            write!(f, "{}B", bits / 8)
        } else {
            write!(f, "{bits}b")
        }
    }
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\n\f]+")] // Ignore this regex pattern between tokens
enum PacketSizeToken {
    #[token("b")]
    Bits,
    #[token("B")]
    Bytes,

    #[regex("[0-9]+")]
    Value,
}

impl FromStr for PacketSize {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lex = Lexer::<'_, PacketSizeToken>::new(s);

        let Some(Ok(PacketSizeToken::Value)) = lex.next() else {
            bail!("Expecting to parse a number")
        };
        let number: u32 = lex.slice().parse()?;
        let Some(Ok(token)) = lex.next() else {
            bail!("Expecting to parse a unit (b for bits, B for bytes)")
        };
        let size = match token {
            PacketSizeToken::Bits => Self::from_bits(number)?,
            PacketSizeToken::Bytes => Self::from_bytes(number)?,
            PacketSizeToken::Value => bail!("Expecting to parse a unit (b for bits, B for bytes)"),
        };

        ensure!(
            lex.next().is_none(),
            "Not expecting any other tokens to parse a packet size"
        );

        Ok(size)
    }
}

/// Error returned when constructing a [`PacketSize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PacketSizeError {
    /// The size was zero; rate conversions would divide by it.
    #[error("packet size must be greater than zero")]
    Zero,
    /// The size in bits does not fit in 32 bits.
    #[error("packet size in bits exceeds the supported range")]
    TooLarge,
}
