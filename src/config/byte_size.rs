//! Byte size values.
//!
//! Accepts plain integers (bytes) or strings with a binary unit suffix
//! (`b`, `kb`, `mb`, `gb`, `tb`, `pb`, single-letter forms allowed).
//! Fractional values are allowed with a unit (`1.5gb`). `-1` means unlimited.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const KB: i64 = 1024;
const MB: i64 = KB * 1024;
const GB: i64 = MB * 1024;
const TB: i64 = GB * 1024;
const PB: i64 = TB * 1024;

/// Error returned when a byte size string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ByteSizeParseError {
    #[error("empty byte size value")]
    Empty,

    #[error("failed to parse [{0}]: unknown unit")]
    UnknownUnit(String),

    #[error("failed to parse [{0}]: not a number")]
    InvalidNumber(String),

    #[error("failed to parse [{0}]: value out of range")]
    OutOfRange(String),
}

/// A number of bytes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "ByteSizeRepr", into = "String")]
pub struct ByteSize(pub i64);

impl ByteSize {
    pub const UNLIMITED: ByteSize = ByteSize(-1);

    pub fn bytes(self) -> i64 {
        self.0
    }

    pub fn mb(value: i64) -> Self {
        Self(value * MB)
    }
}

impl From<ByteSize> for String {
    fn from(size: ByteSize) -> Self {
        size.to_string()
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0;
        let magnitude = bytes.unsigned_abs();
        let (divisor, suffix) = if magnitude >= PB as u64 {
            (PB, "pb")
        } else if magnitude >= TB as u64 {
            (TB, "tb")
        } else if magnitude >= GB as u64 {
            (GB, "gb")
        } else if magnitude >= MB as u64 {
            (MB, "mb")
        } else if magnitude >= KB as u64 {
            (KB, "kb")
        } else {
            return write!(f, "{}b", bytes);
        };

        let value = bytes as f64 / divisor as f64;
        let rounded = (value * 10.0).round() / 10.0;
        if rounded.fract() == 0.0 {
            write!(f, "{}{}", rounded as i64, suffix)
        } else {
            write!(f, "{:.1}{}", rounded, suffix)
        }
    }
}

impl FromStr for ByteSize {
    type Err = ByteSizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(ByteSizeParseError::Empty);
        }
        let lower = raw.to_ascii_lowercase();

        let split = lower
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(lower.len());
        let (number, unit) = lower.split_at(split);
        let number = number.trim();

        let multiplier = match unit.trim() {
            "" | "b" => 1,
            "k" | "kb" => KB,
            "m" | "mb" => MB,
            "g" | "gb" => GB,
            "t" | "tb" => TB,
            "p" | "pb" => PB,
            _ => return Err(ByteSizeParseError::UnknownUnit(raw.to_string())),
        };

        if let Ok(whole) = number.parse::<i64>() {
            return whole
                .checked_mul(multiplier)
                .map(ByteSize)
                .ok_or_else(|| ByteSizeParseError::OutOfRange(raw.to_string()));
        }

        let fractional: f64 = number
            .parse()
            .map_err(|_| ByteSizeParseError::InvalidNumber(raw.to_string()))?;
        let bytes = fractional * multiplier as f64;
        if !bytes.is_finite() || bytes.abs() >= i64::MAX as f64 {
            return Err(ByteSizeParseError::OutOfRange(raw.to_string()));
        }
        Ok(ByteSize(bytes as i64))
    }
}

/// Wire form accepted in configuration files.
#[derive(Deserialize)]
#[serde(untagged)]
enum ByteSizeRepr {
    Bytes(i64),
    Text(String),
}

impl TryFrom<ByteSizeRepr> for ByteSize {
    type Error = ByteSizeParseError;

    fn try_from(repr: ByteSizeRepr) -> Result<Self, Self::Error> {
        match repr {
            ByteSizeRepr::Bytes(bytes) => Ok(ByteSize(bytes)),
            ByteSizeRepr::Text(text) => text.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!("15".parse::<ByteSize>().unwrap(), ByteSize(15));
        assert_eq!("15b".parse::<ByteSize>().unwrap(), ByteSize(15));
        assert_eq!("2KB".parse::<ByteSize>().unwrap(), ByteSize(2048));
        assert_eq!("600mb".parse::<ByteSize>().unwrap(), ByteSize::mb(600));
        assert_eq!("1.5gb".parse::<ByteSize>().unwrap(), ByteSize(3 * GB / 2));
        assert_eq!(" 1 g ".parse::<ByteSize>().unwrap(), ByteSize(GB));
        assert_eq!("-1".parse::<ByteSize>().unwrap(), ByteSize::UNLIMITED);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<ByteSize>(), Err(ByteSizeParseError::Empty));
        assert!(matches!(
            "12xb".parse::<ByteSize>(),
            Err(ByteSizeParseError::UnknownUnit(_))
        ));
        assert!(matches!(
            "abc".parse::<ByteSize>(),
            Err(ByteSizeParseError::UnknownUnit(_))
        ));
        assert!(matches!(
            "1.2.3mb".parse::<ByteSize>(),
            Err(ByteSizeParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            "9999999pb".parse::<ByteSize>(),
            Err(ByteSizeParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(ByteSize(15).to_string(), "15b");
        assert_eq!(ByteSize(1536).to_string(), "1.5kb");
        assert_eq!(ByteSize::mb(600).to_string(), "600mb");
        assert_eq!(ByteSize::UNLIMITED.to_string(), "-1b");
    }

    #[test]
    fn test_deserialize_int_or_string() {
        #[derive(Deserialize)]
        struct Holder {
            a: ByteSize,
            b: ByteSize,
        }

        let holder: Holder = toml::from_str("a = 1024\nb = \"4mb\"").unwrap();
        assert_eq!(holder.a, ByteSize(KB));
        assert_eq!(holder.b, ByteSize::mb(4));
    }
}
