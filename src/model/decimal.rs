use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};

/// Decimal places kept by every quotient, rounded half away from zero.
pub const DIVISION_SCALE: u32 = 20;

/// Exact base-10 score value. Every number that reaches a report passes
/// through this type so repeated runs render identical strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(Decimal);

impl Score {
    pub const ZERO: Score = Score(Decimal::ZERO);
    pub const ONE: Score = Score(Decimal::ONE);
    pub const HUNDRED: Score = Score(Decimal::ONE_HUNDRED);

    #[cfg(test)]
    pub fn new(value: Decimal) -> Self {
        Score(value)
    }

    pub fn from_count(n: usize) -> Self {
        Score(Decimal::from(n as u64))
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// `None` when `rhs` is zero. The quotient is rounded to
    /// [`DIVISION_SCALE`] places.
    pub fn checked_div(self, rhs: Score) -> Option<Score> {
        self.0
            .checked_div(rhs.0)
            .map(|q| q.round_dp_with_strategy(DIVISION_SCALE, RoundingStrategy::MidpointAwayFromZero))
            .map(Score)
    }

    /// The one place an undefined score collapses to zero.
    pub fn or_zero(value: Option<Score>) -> Score {
        value.unwrap_or(Score::ZERO)
    }

    /// Canonical rendering: no exponent, no trailing zeros, `-0` as `0`.
    pub fn render(&self) -> String {
        self.0.normalize().to_string()
    }

    pub fn parse(text: &str) -> Option<Score> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .ok()
            .map(Score)
    }

    /// Numbers go through their shortest decimal form, numeric strings are
    /// parsed directly, anything else is zero.
    pub fn from_json(value: &serde_json::Value) -> Score {
        match value {
            serde_json::Value::Number(n) => Score::parse(&n.to_string()).unwrap_or(Score::ZERO),
            serde_json::Value::String(s) => Score::parse(s).unwrap_or(Score::ZERO),
            _ => Score::ZERO,
        }
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        Score(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Score {
    type Output = Score;

    fn sub(self, rhs: Score) -> Score {
        Score(self.0.saturating_sub(rhs.0))
    }
}

impl Mul for Score {
    type Output = Score;

    fn mul(self, rhs: Score) -> Score {
        Score(self.0.saturating_mul(rhs.0))
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Score>>(iter: I) -> Score {
        iter.fold(Score::ZERO, |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a Score> for Score {
    fn sum<I: Iterator<Item = &'a Score>>(iter: I) -> Score {
        iter.fold(Score::ZERO, |acc, v| acc + *v)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Serde hook for result documents: absent, `null` or garbage values read as zero.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Score, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(Score::from_json).unwrap_or(Score::ZERO))
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/decimal.rs"]
mod tests;
