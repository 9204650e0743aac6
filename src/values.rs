//! Fixed-point money and calendar date value types shared by all tables.

use std::fmt;
use std::str::FromStr;

/// A two-decimal fixed point number stored as hundredths.
///
/// ```text
/// Decimal(123456) -> 1234.56
/// Decimal(-5)     -> -0.05
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(pub i64);

impl Decimal {
    pub const ZERO: Decimal = Decimal(0);

    pub fn from_hundredths(value: i64) -> Self {
        Decimal(value)
    }

    pub fn hundredths(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Decimal {
    type Err = ();

    /// Accepts `[-]digits[.d[d]]`. Values outside the `i64` hundredths range
    /// are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || frac.len() > 2 || !all_digits(whole) || !all_digits(frac) {
            return Err(());
        }
        let whole: i64 = whole.parse().map_err(|_| ())?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| ())? * 10,
            _ => frac.parse().map_err(|_| ())?,
        };
        let value = whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac))
            .ok_or(())?;
        Ok(Decimal(if negative { -value } else { value }))
    }
}

/// A calendar date in `YYYY-MM-DD` form.
///
/// Generated dates never use a day past the 28th, so every sampled
/// year/month/day triple is a real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Date {
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Date { year, month, day }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for Date {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(3, '-');
        let year = parts.next().ok_or(())?.parse().map_err(|_| ())?;
        let month: u8 = parts.next().ok_or(())?.parse().map_err(|_| ())?;
        let day: u8 = parts.next().ok_or(())?.parse().map_err(|_| ())?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(());
        }
        Ok(Date { year, month, day })
    }
}
