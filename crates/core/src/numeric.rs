//! Numeric input rules for editable cells and form fields.
//!
//! Every numeric control has a kind (integer or fixed-scale decimal), bounds
//! and a step. Text that does not satisfy the rule is rejected before it can
//! reach a store; the spinner buttons clamp instead of overflowing.

use core::fmt;
use core::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A parsed, coerced field value ready to be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Decimal(Decimal),
}

impl FieldValue {
    /// Integer view; decimals are truncated toward zero.
    pub fn as_integer(&self) -> i64 {
        match self {
            FieldValue::Integer(v) => *v,
            FieldValue::Decimal(d) => d.trunc().to_i64().unwrap_or(0),
        }
    }

    pub fn as_decimal(&self) -> Decimal {
        match self {
            FieldValue::Integer(v) => Decimal::from(*v),
            FieldValue::Decimal(d) => *d,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{v}"),
            FieldValue::Decimal(d) => write!(f, "{d}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

/// Which characters a text control lets through while typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystrokeFilter {
    /// Digits only.
    Numbers,
    /// Digits and a single decimal point.
    Decimals,
    /// ASCII letters and digits (product codes).
    NumbersLetters,
}

impl KeystrokeFilter {
    /// Whether `ch` may be appended to `current`.
    pub fn accepts(&self, ch: char, current: &str) -> bool {
        match self {
            KeystrokeFilter::Numbers => ch.is_ascii_digit(),
            KeystrokeFilter::Decimals => {
                ch.is_ascii_digit() || (ch == '.' && !current.contains('.'))
            }
            KeystrokeFilter::NumbersLetters => ch.is_ascii_alphanumeric(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    /// Fixed number of decimal places.
    Decimal { scale: u32 },
}

/// Bounds, step and kind of one numeric control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericInput {
    pub kind: NumericKind,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

impl NumericInput {
    /// Tier quantities: whole units in `[0, 1_000_000]`.
    pub fn quantity() -> Self {
        Self {
            kind: NumericKind::Integer,
            min: Decimal::ZERO,
            max: Decimal::from(1_000_000),
            step: Decimal::ONE,
        }
    }

    /// Stock targets: whole units in `[0, 10_000_000]`.
    pub fn stock_target() -> Self {
        Self {
            kind: NumericKind::Integer,
            min: Decimal::ZERO,
            max: Decimal::from(10_000_000),
            step: Decimal::ONE,
        }
    }

    /// Tier net prices: `[0.00, 1_000_000.00]`, cents precision.
    pub fn net_price() -> Self {
        Self {
            kind: NumericKind::Decimal { scale: 2 },
            min: Decimal::ZERO,
            max: Decimal::from(1_000_000),
            step: Decimal::new(1, 2),
        }
    }

    /// Product purchase/sale prices: `[0.01, 1_000_000.00]`.
    pub fn unit_price() -> Self {
        Self {
            min: Decimal::new(1, 2),
            ..Self::net_price()
        }
    }

    /// Same rule with a raised floor (the sale price follows the purchase price).
    pub fn with_min(mut self, min: Decimal) -> Self {
        self.min = min.max(self.min).min(self.max);
        self
    }

    pub fn filter(&self) -> KeystrokeFilter {
        match self.kind {
            NumericKind::Integer => KeystrokeFilter::Numbers,
            NumericKind::Decimal { .. } => KeystrokeFilter::Decimals,
        }
    }

    /// Parse committed text into a value of this control's kind.
    ///
    /// Rejects signs, thousands separators, excess decimals and anything
    /// outside the bounds.
    pub fn parse(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        let text = raw.trim();
        let not_a_number = || ValidationError::NotANumber(raw.to_string());
        if text.is_empty() {
            return Err(not_a_number());
        }

        let value = match self.kind {
            NumericKind::Integer => {
                if !text.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(not_a_number());
                }
                match text.parse::<i64>() {
                    Ok(v) => Decimal::from(v),
                    Err(_) => {
                        return Err(ValidationError::AboveMaximum {
                            max: self.max.to_string(),
                        });
                    }
                }
            }
            NumericKind::Decimal { scale } => {
                let mut parts = text.splitn(2, '.');
                let whole = parts.next().unwrap_or_default();
                let frac = parts.next();
                let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
                if !digits_only(whole) || !frac.is_none_or(digits_only) {
                    return Err(not_a_number());
                }
                if whole.is_empty() && frac.is_none_or(str::is_empty) {
                    return Err(not_a_number());
                }
                if frac.is_some_and(|f| f.len() as u32 > scale) {
                    return Err(ValidationError::TooManyDecimals { max: scale });
                }
                let whole = if whole.is_empty() { "0" } else { whole };
                let normalized = match frac {
                    Some(f) if !f.is_empty() => format!("{whole}.{f}"),
                    _ => whole.to_string(),
                };
                Decimal::from_str(&normalized).map_err(|_| not_a_number())?
            }
        };

        self.check_bounds(value)?;
        Ok(self.coerce(value))
    }

    /// Whether `value` lies within the bounds.
    pub fn check_bounds(&self, value: Decimal) -> Result<(), ValidationError> {
        if value < self.min {
            return Err(ValidationError::BelowMinimum {
                min: self.min.to_string(),
            });
        }
        if value > self.max {
            return Err(ValidationError::AboveMaximum {
                max: self.max.to_string(),
            });
        }
        Ok(())
    }

    /// Clamp into bounds and convert to this control's kind.
    pub fn clamp(&self, value: Decimal) -> FieldValue {
        self.coerce(value.max(self.min).min(self.max))
    }

    pub fn step_up(&self, current: FieldValue) -> FieldValue {
        self.clamp(current.as_decimal() + self.step)
    }

    pub fn step_down(&self, current: FieldValue) -> FieldValue {
        self.clamp(current.as_decimal() - self.step)
    }

    /// Text shown inside the input control for `value`.
    pub fn format(&self, value: FieldValue) -> String {
        match self.kind {
            NumericKind::Integer => value.as_integer().to_string(),
            NumericKind::Decimal { scale } => {
                let mut d = value.as_decimal().round_dp(scale);
                d.rescale(scale);
                d.to_string()
            }
        }
    }

    fn coerce(&self, value: Decimal) -> FieldValue {
        match self.kind {
            NumericKind::Integer => FieldValue::Integer(value.trunc().to_i64().unwrap_or(0)),
            NumericKind::Decimal { scale } => {
                let mut d = value.round_dp(scale);
                d.rescale(scale);
                FieldValue::Decimal(d)
            }
        }
    }
}
