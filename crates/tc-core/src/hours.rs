//! Hour quantities and the rounding policy applied to event durations.
//!
//! Durations are carried as whole minutes so that summing many events never
//! drifts. Conversion to fractional hours happens only at the edges.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

const MINUTES_PER_HOUR: i64 = 60;

/// How a single event's duration is rounded before it is summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Round each event to one decimal hour before summation.
    #[default]
    PerEvent,
    /// Keep whole minutes; round only when displaying totals.
    Exact,
}

impl Rounding {
    /// Applies the policy to a floored minute count.
    pub fn apply(self, minutes: i64) -> Hours {
        match self {
            Self::PerEvent => Hours::from_tenths(minutes_to_tenths(minutes)),
            Self::Exact => Hours::from_minutes(minutes),
        }
    }
}

/// Rounds `minutes / 60` hours to tenths.
///
/// The quotient is taken as an `f64` and rounded by the exact value that float
/// holds, halves to even. So 15 minutes (exactly 0.25) give 0.2, while 3
/// minutes (0.05, stored slightly above) give 0.1.
pub fn minutes_to_tenths(minutes: i64) -> i64 {
    let m = minutes.unsigned_abs();
    let (quotient, remainder) = (m / 6, m % 6);
    let tenths = match remainder.cmp(&3) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal => match float_hours_vs_exact(m) {
            Ordering::Less => quotient,
            Ordering::Greater => quotient + 1,
            Ordering::Equal if quotient % 2 == 1 => quotient + 1,
            Ordering::Equal => quotient,
        },
    };
    #[allow(clippy::cast_possible_wrap)]
    let tenths = tenths as i64;
    if minutes < 0 { -tenths } else { tenths }
}

/// Compares the `f64` quotient `m / 60.0` against the exact rational `m / 60`.
/// `m` must be positive.
#[allow(clippy::cast_precision_loss)]
fn float_hours_vs_exact(m: u64) -> Ordering {
    let hours = m as f64 / MINUTES_PER_HOUR as f64;

    // Positive normal float: hours = mantissa * 2^exponent
    let bits = hours.to_bits();
    let mantissa = u128::from((bits & ((1 << 52) - 1)) | (1 << 52));
    #[allow(clippy::cast_possible_truncation)]
    let exponent = ((bits >> 52) & 0x7ff) as i32 - 1075;

    // Compare mantissa * 2^exponent * 60 with m, scaled to integers
    let scaled = mantissa * 60;
    let m = u128::from(m);
    if exponent >= 0 {
        (scaled << exponent).cmp(&m)
    } else {
        scaled.cmp(&(m << -exponent))
    }
}

/// A non-fractional amount of tracked time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hours {
    minutes: i64,
}

impl Hours {
    pub const ZERO: Self = Self { minutes: 0 };

    pub const fn from_minutes(minutes: i64) -> Self {
        Self { minutes }
    }

    pub const fn from_tenths(tenths: i64) -> Self {
        Self { minutes: tenths * 6 }
    }

    pub const fn minutes(self) -> i64 {
        self.minutes
    }

    /// The value in tenths of an hour, rounded like [`minutes_to_tenths`].
    pub fn tenths(self) -> i64 {
        minutes_to_tenths(self.minutes)
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        self.minutes as f64 / MINUTES_PER_HOUR as f64
    }

    /// The value rounded to one decimal place, as a float.
    #[allow(clippy::cast_precision_loss)]
    pub fn rounded(self) -> f64 {
        self.tenths() as f64 / 10.0
    }
}

impl Add for Hours {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            minutes: self.minutes + rhs.minutes,
        }
    }
}

impl AddAssign for Hours {
    fn add_assign(&mut self, rhs: Self) {
        self.minutes += rhs.minutes;
    }
}

impl Sum for Hours {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Hours {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Renders with exactly one decimal place, e.g. `2.3`.
impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tenths = self.tenths();
        let sign = if tenths < 0 { "-" } else { "" };
        let abs = tenths.abs();
        let s = format!("{sign}{}.{}", abs / 10, abs % 10);
        f.pad(&s)
    }
}

impl Serialize for Hours {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.rounded())
    }
}
