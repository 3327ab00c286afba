//! Band Packer
//!
//! Targets the Min50k band of a dual voucher family. Packing first tries to
//! water-fill the whole cart into `k` balanced baskets that all clear the band
//! floor, and falls back to carving baskets off one at a time.
//!
//! The fallback loop is bounded by the unit count. A pass that places nothing
//! forces the next unit into the group, and exceeding the pass limit dumps the
//! leftovers into a single group and marks the packing as degraded.

use rusty_money::iso::Currency;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{
    packers::{GreedyPacker, Packer, Packing, fill, fill_total, push_group},
    units::{Unit, sort_by_price_desc, total_minor},
    vouchers::{Band, VoucherFamily},
};

/// Water-filling first, sequential band matching as the fallback.
#[derive(Debug, Clone, Copy)]
pub struct BandPacker {
    ceiling: i64,
    fill_ceiling: i64,
    pass_limit: Option<usize>,
}

impl BandPacker {
    /// Create a band packer.
    ///
    /// `ceiling` bounds no-minimum groups; `fill_ceiling` sets the fewest
    /// baskets water-filling will try (`ceil(total / fill_ceiling)`).
    pub const fn new(ceiling: i64, fill_ceiling: i64) -> Self {
        Self {
            ceiling,
            fill_ceiling,
            pass_limit: None,
        }
    }

    /// Override the fallback pass limit, which otherwise equals the unit count.
    #[must_use]
    pub const fn with_pass_limit(mut self, limit: usize) -> Self {
        self.pass_limit = Some(limit);
        self
    }

    /// No-minimum basket ceiling.
    pub const fn ceiling(&self) -> i64 {
        self.ceiling
    }

    /// Water-filling ceiling.
    pub const fn fill_ceiling(&self) -> i64 {
        self.fill_ceiling
    }

    fn water_fill<'a>(
        &self,
        units: &[Unit<'a>],
        band: Band,
    ) -> Option<Vec<SmallVec<[Unit<'a>; 10]>>> {
        if band.lower <= 0 || self.fill_ceiling <= 0 {
            return None;
        }

        let total = total_minor(units);
        let most = usize::try_from(total / band.lower).ok()?.min(units.len());
        let fewest = div_ceil(total, self.fill_ceiling).max(1);
        let fewest = usize::try_from(fewest).ok()?;

        (fewest..=most)
            .rev()
            .map(|k| deal(units, k))
            .find(|baskets| baskets.iter().all(|(total, _)| *total >= band.lower))
            .map(|baskets| baskets.into_iter().map(|(_, basket)| basket).collect())
    }

    fn sequential<'a>(
        &self,
        units: Vec<Unit<'a>>,
        band: Band,
        family: &VoucherFamily,
        currency: &'a Currency,
    ) -> Packing<'a> {
        let pass_limit = self.pass_limit.unwrap_or(units.len());

        let mut groups = Vec::new();
        let mut remaining = units;
        let mut passes = 0;
        let mut degraded = false;

        while !remaining.is_empty() {
            if passes >= pass_limit {
                warn!(
                    passes,
                    leftover = remaining.len(),
                    "band packing pass limit reached, dumping leftovers into one group"
                );

                push_group(&mut groups, remaining.drain(..).collect(), family, currency);
                degraded = true;

                break;
            }

            passes += 1;

            let remaining_total = total_minor(&remaining);

            if band.contains(remaining_total) || remaining_total <= self.ceiling {
                debug!(remaining_total, "remaining units fit a single group");

                push_group(&mut groups, remaining.drain(..).collect(), family, currency);

                break;
            }

            let limit = if fill_total(&remaining, band.upper, false) >= band.lower {
                band.upper
            } else {
                self.ceiling
            };

            let (mut basket, rest) = fill(remaining, limit, false);
            remaining = rest;

            if basket.is_empty() {
                // Every remaining unit exceeds the ceiling on its own.
                warn!(
                    leftover = remaining.len(),
                    "no unit fits the ceiling, forcing the next unit into its own group"
                );

                let mut rest = remaining.into_iter();
                basket.extend(rest.next());
                remaining = rest.collect();
            }

            debug!(
                units = basket.len(),
                limit,
                remaining = remaining.len(),
                "carved band group"
            );

            push_group(&mut groups, basket, family, currency);
        }

        Packing { groups, degraded }
    }
}

impl Packer for BandPacker {
    fn pack<'a>(
        &self,
        mut units: Vec<Unit<'a>>,
        family: &VoucherFamily,
        currency: &'a Currency,
    ) -> Packing<'a> {
        let Some(band) = family.band() else {
            debug!("voucher family has no band, packing greedily");

            return GreedyPacker::new(self.ceiling).pack(units, family, currency);
        };

        sort_by_price_desc(&mut units);

        if let Some(baskets) = self.water_fill(&units, band) {
            debug!(
                baskets = baskets.len(),
                "water-filling cleared the band floor"
            );

            let mut groups = Vec::with_capacity(baskets.len());

            for basket in baskets {
                push_group(&mut groups, basket, family, currency);
            }

            return Packing {
                groups,
                degraded: false,
            };
        }

        self.sequential(units, band, family, currency)
    }
}

/// Deals units into `k` baskets, always topping up the currently smallest one.
fn deal<'a>(units: &[Unit<'a>], k: usize) -> Vec<(i64, SmallVec<[Unit<'a>; 10]>)> {
    let mut baskets: Vec<(i64, SmallVec<[Unit<'a>; 10]>)> = vec![(0, SmallVec::new()); k];

    for unit in units {
        if let Some((total, basket)) = baskets.iter_mut().min_by_key(|(total, _)| *total) {
            *total = total.saturating_add(unit.minor());
            basket.push(*unit);
        }
    }

    baskets
}

/// Ceiling division for non-negative totals and a positive divisor.
fn div_ceil(total: i64, divisor: i64) -> i64 {
    let quotient = total / divisor;

    if total % divisor == 0 {
        quotient
    } else {
        quotient + 1
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::{Money, iso::IDR};
    use testresult::TestResult;

    use crate::{
        groups::Group,
        vouchers::{VoucherKind, VoucherSpec},
    };

    use super::*;

    fn dual_family() -> TestResult<VoucherFamily> {
        Ok(VoucherFamily::dual(
            VoucherSpec::new(0, 37_000, Percentage::from(0.5))?,
            VoucherSpec::new(50_000, 30_000, Percentage::from(0.5))?,
            60_000,
        )?)
    }

    fn units<'a>(prices: &[i64]) -> Vec<Unit<'a>> {
        prices
            .iter()
            .map(|&price| Unit::new("unit", Money::from_minor(price, IDR)))
            .collect()
    }

    fn totals(packing: &Packing<'_>) -> Vec<i64> {
        packing.groups.iter().map(Group::total_minor).collect()
    }

    fn packer() -> BandPacker {
        BandPacker::new(74_000, 65_000)
    }

    #[test]
    fn water_fill_balances_into_band() -> TestResult {
        let packing = packer().pack(
            units(&[30_000, 30_000, 25_000, 25_000, 20_000, 20_000]),
            &dual_family()?,
            IDR,
        );

        // total 150k: k = 3 gives 30+20, 30+20, 25+25
        assert_eq!(totals(&packing), vec![50_000, 50_000, 50_000]);
        assert!(
            packing
                .groups
                .iter()
                .all(|g| g.voucher() == VoucherKind::Min50k)
        );
        assert!(!packing.degraded);

        Ok(())
    }

    #[test]
    fn falls_back_to_sequential_when_water_fill_fails() -> TestResult {
        // 80k + 30k: k = 2 leaves a 30k basket below the floor, k = 1 is skipped
        // because the fill ceiling demands at least 2 baskets. The 30k unit is
        // carved under the ceiling first, then the 80k unit is forced out.
        let packing = packer().pack(units(&[80_000, 30_000]), &dual_family()?, IDR);

        assert_eq!(totals(&packing), vec![30_000, 80_000]);
        assert!(!packing.degraded);

        Ok(())
    }

    #[test]
    fn small_cart_closes_as_one_group() -> TestResult {
        let packing = packer().pack(units(&[12_000, 8_000]), &dual_family()?, IDR);

        assert_eq!(totals(&packing), vec![20_000]);
        assert_eq!(
            packing.groups.first().map(Group::voucher),
            Some(VoucherKind::NoMinimum)
        );

        Ok(())
    }

    #[test]
    fn oversized_unit_is_forced_into_a_group() -> TestResult {
        let packing = packer().pack(units(&[10_000_000, 80_000]), &dual_family()?, IDR);

        assert_eq!(totals(&packing), vec![10_000_000, 80_000]);
        assert!(!packing.degraded);

        Ok(())
    }

    #[test]
    fn pass_limit_dumps_leftovers_and_degrades() -> TestResult {
        let packer = packer().with_pass_limit(1);
        let packing = packer.pack(units(&[10_000_000, 90_000, 90_000]), &dual_family()?, IDR);

        assert_eq!(totals(&packing), vec![10_000_000, 180_000]);
        assert!(packing.degraded);

        Ok(())
    }

    #[test]
    fn packer_keeps_both_ceilings() {
        let packer = packer();

        assert_eq!(packer.ceiling(), 74_000);
        assert_eq!(packer.fill_ceiling(), 65_000);
    }

    #[test]
    fn many_tiny_units_terminate() -> TestResult {
        let packing = packer().pack(units(&[1; 500]), &dual_family()?, IDR);

        assert_eq!(totals(&packing), vec![500]);

        Ok(())
    }

    #[test]
    fn single_family_falls_back_to_greedy() -> TestResult {
        let family = VoucherFamily::single(
            VoucherKind::NoMinimum,
            VoucherSpec::new(0, 35_000, Percentage::from(0.5))?,
        );

        let packing = packer().pack(units(&[50_000, 40_000]), &family, IDR);

        assert_eq!(totals(&packing), vec![50_000, 40_000]);

        Ok(())
    }

    #[test]
    fn div_ceil_rounds_up() {
        assert_eq!(div_ceil(150_000, 65_000), 3);
        assert_eq!(div_ceil(130_000, 65_000), 2);
        assert_eq!(div_ceil(0, 65_000), 0);
    }
}
