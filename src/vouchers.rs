//! Vouchers
//!
//! Voucher kinds, their discount rules, and the classifier that decides which
//! voucher a group total should claim.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while building voucher rules.
#[derive(Debug, Error, PartialEq)]
pub enum VoucherError {
    /// Discount rate outside `[0, 1]`.
    #[error("discount rate {0} is outside [0, 1]")]
    InvalidRate(Decimal),

    /// Negative minimum order.
    #[error("minimum order {0} must not be negative")]
    NegativeMinimumOrder(i64),

    /// Negative discount cap.
    #[error("maximum discount {0} must not be negative")]
    NegativeMaximumDiscount(i64),

    /// The Min50k band upper bound sits below its minimum order.
    #[error("band upper bound {upper} is below the band lower bound {lower}")]
    InvertedBand {
        /// Lower bound (the Min50k minimum order)
        lower: i64,
        /// Configured upper bound
        upper: i64,
    },
}

/// The discount rule a group can claim.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherKind {
    /// No minimum order, capped discount.
    NoMinimum,

    /// 50000 minimum order, capped discount.
    #[serde(rename = "min_50k")]
    Min50k,
}

impl fmt::Display for VoucherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoucherKind::NoMinimum => f.write_str("No minimum"),
            VoucherKind::Min50k => f.write_str("Min 50k"),
        }
    }
}

/// Minimum order, cap and rate for one voucher kind.
///
/// Amounts are in minor units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VoucherSpec {
    min_order: i64,
    max_discount: i64,
    rate: Percentage,
}

impl VoucherSpec {
    /// Create a validated voucher spec.
    ///
    /// # Errors
    ///
    /// Returns a [`VoucherError`] if an amount is negative or the rate is outside `[0, 1]`.
    pub fn new(min_order: i64, max_discount: i64, rate: Percentage) -> Result<Self, VoucherError> {
        if min_order < 0 {
            return Err(VoucherError::NegativeMinimumOrder(min_order));
        }

        if max_discount < 0 {
            return Err(VoucherError::NegativeMaximumDiscount(max_discount));
        }

        let rate_decimal = rate * Decimal::ONE;

        if rate_decimal < Decimal::ZERO || rate_decimal > Decimal::ONE {
            return Err(VoucherError::InvalidRate(rate_decimal));
        }

        Ok(Self {
            min_order,
            max_discount,
            rate,
        })
    }

    /// Minimum group total needed before any discount applies.
    pub const fn min_order(&self) -> i64 {
        self.min_order
    }

    /// Discount cap.
    pub const fn max_discount(&self) -> i64 {
        self.max_discount
    }

    /// Discount rate.
    pub const fn rate(&self) -> Percentage {
        self.rate
    }

    /// Discount for a group total, in minor units.
    ///
    /// Zero below the minimum order, otherwise `floor(total * rate)` capped at
    /// the maximum discount.
    pub fn discount(&self, total: i64) -> i64 {
        if total < self.min_order || total <= 0 {
            return 0;
        }

        let uncapped = (self.rate * Decimal::ONE)
            .checked_mul(Decimal::from(total))
            .and_then(|applied| applied.floor().to_i64())
            .unwrap_or(total);

        uncapped.clamp(0, total).min(self.max_discount)
    }
}

/// Inclusive total range in which a dual family claims the Min50k voucher.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Band {
    /// Inclusive lower bound
    pub lower: i64,

    /// Inclusive upper bound
    pub upper: i64,
}

impl Band {
    /// Whether `total` falls inside the band.
    pub const fn contains(&self, total: i64) -> bool {
        total >= self.lower && total <= self.upper
    }
}

/// The vouchers available to a category.
#[derive(Clone, Debug, PartialEq)]
pub enum VoucherFamily {
    /// One voucher kind, claimed by every group.
    Single {
        /// The only kind this family offers
        kind: VoucherKind,
        /// Its discount rule
        spec: VoucherSpec,
    },

    /// Both kinds; the band rule decides between them.
    Dual {
        /// Rule for groups outside the band
        no_minimum: VoucherSpec,
        /// Rule for groups inside the band
        min_50k: VoucherSpec,
        /// Inclusive upper bound of the Min50k band
        band_upper: i64,
    },
}

/// The voucher a group claims together with the discount it earns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VoucherClaim {
    /// Claimed voucher kind
    pub voucher: VoucherKind,

    /// Discount in minor units
    pub discount: i64,
}

impl VoucherFamily {
    /// A single-voucher family.
    pub const fn single(kind: VoucherKind, spec: VoucherSpec) -> Self {
        VoucherFamily::Single { kind, spec }
    }

    /// A dual-voucher family.
    ///
    /// # Errors
    ///
    /// Returns [`VoucherError::InvertedBand`] if `band_upper` is below the Min50k minimum order.
    pub fn dual(
        no_minimum: VoucherSpec,
        min_50k: VoucherSpec,
        band_upper: i64,
    ) -> Result<Self, VoucherError> {
        if band_upper < min_50k.min_order() {
            return Err(VoucherError::InvertedBand {
                lower: min_50k.min_order(),
                upper: band_upper,
            });
        }

        Ok(VoucherFamily::Dual {
            no_minimum,
            min_50k,
            band_upper,
        })
    }

    /// The Min50k band, if this family has one.
    pub fn band(&self) -> Option<Band> {
        match self {
            VoucherFamily::Single { .. } => None,
            VoucherFamily::Dual {
                min_50k,
                band_upper,
                ..
            } => Some(Band {
                lower: min_50k.min_order(),
                upper: *band_upper,
            }),
        }
    }

    /// Rule for the given voucher kind, if this family offers it.
    pub fn spec(&self, kind: VoucherKind) -> Option<&VoucherSpec> {
        match (self, kind) {
            (VoucherFamily::Single { kind: own, spec }, kind) if *own == kind => Some(spec),
            (VoucherFamily::Dual { no_minimum, .. }, VoucherKind::NoMinimum) => Some(no_minimum),
            (VoucherFamily::Dual { min_50k, .. }, VoucherKind::Min50k) => Some(min_50k),
            _ => None,
        }
    }

    /// Decide which voucher a group total claims.
    ///
    /// Single families always return their kind. Dual families claim `Min50k`
    /// for totals inside the band and `NoMinimum` otherwise.
    pub fn classify(&self, total: i64) -> VoucherKind {
        match self {
            VoucherFamily::Single { kind, .. } => *kind,
            VoucherFamily::Dual { .. } => match self.band() {
                Some(band) if band.contains(total) => VoucherKind::Min50k,
                _ => VoucherKind::NoMinimum,
            },
        }
    }

    /// Classify a total and compute its discount.
    pub fn claim(&self, total: i64) -> VoucherClaim {
        let voucher = self.classify(total);
        let discount = self.spec(voucher).map_or(0, |spec| spec.discount(total));

        VoucherClaim { voucher, discount }
    }
}
