use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::ops;

use crate::errors::*;

pub use rust_decimal::prelude::Zero;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Percentage(Decimal);

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GoalId(pub i32);

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DepositId(pub i32);

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct UserId(pub String);

impl Amount {
    const SCALE: u32 = 2;

    pub fn from_scaled_i64(value: i64) -> Amount {
        Amount(Decimal::new(value, Self::SCALE))
    }

    /// Fails if the amount does not fit in `i64` cents, which can only happen
    /// after arithmetic on amounts near the limit.
    pub fn to_scaled_i64(self) -> Result<i64> {
        assert!(
            self.0.scale() == Self::SCALE,
            "Amount Decimal scale should be {}, but is {}",
            Self::SCALE,
            self.0.scale()
        );
        let mut result = self.0;
        result
            .set_scale(0)
            .expect("Amount Decimal scale should be settable to 0");
        result
            .to_i64()
            .chain_err(|| format!("Amount out of range: {}", self.0))
    }

    /// Rescales to cents, truncating extra fractional digits. Fails unless the
    /// result fits in `i64` cents.
    pub fn from_decimal(value: Decimal) -> Result<Amount> {
        value
            .checked_mul(Decimal::new(10i64.pow(Self::SCALE), 0))
            .and_then(|scaled| scaled.trunc().to_i64())
            .map(Amount::from_scaled_i64)
            .chain_err(|| format!("Amount out of range: {}", value))
    }

    pub fn to_decimal(self) -> Decimal {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Share of `target` that this amount represents, in percent. Not clamped.
    pub fn percentage_of(self, target: Amount) -> Percentage {
        if !target.is_positive() {
            return Percentage::complete();
        }
        Percentage(self.0 / target.0 * Decimal::new(100, 0))
    }
}

impl ops::Add for Amount {
    type Output = Amount;
    fn add(self, other: Amount) -> Amount {
        let result = Amount(self.0 + other.0);
        assert_eq!(result.0.scale(), Self::SCALE);
        result
    }
}

impl ops::AddAssign for Amount {
    fn add_assign(&mut self, other: Amount) {
        self.0 += other.0;
        assert_eq!(self.0.scale(), Self::SCALE);
    }
}

impl ops::Sub for Amount {
    type Output = Amount;
    fn sub(self, other: Amount) -> Amount {
        let result = Amount(self.0 - other.0);
        assert_eq!(result.0.scale(), Self::SCALE);
        result
    }
}

impl Zero for Amount {
    fn zero() -> Amount {
        Amount::from_scaled_i64(0)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Percentage {
    pub fn from_whole(value: i64) -> Percentage {
        Percentage(Decimal::new(value, 0))
    }

    pub fn complete() -> Percentage {
        Percentage::from_whole(100)
    }

    pub fn clamped(self) -> Percentage {
        if self > Percentage::complete() {
            Percentage::complete()
        } else {
            self
        }
    }

    pub fn whole_percent(self) -> i64 {
        self.0
            .round_dp(0)
            .to_i64()
            .expect("Percentage should be convertible to i64")
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.whole_percent())
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl UserId {
    pub fn new<S: Into<String>>(value: S) -> UserId {
        UserId(value.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
