//! Merger
//!
//! Fuses groups whose discount does not pay for their own admin cost into the
//! group formed just before them.

use tracing::debug;

use crate::{
    groups::{Group, GroupId},
    vouchers::VoucherFamily,
};

/// Merge low-discount groups into their predecessor where one admin fee beats two.
///
/// Groups are visited in formation order. A group with `discount < admin_cost`
/// is fused into the previously accepted group when
/// `merged - admin_cost >= (previous + current) - 2 * admin_cost`.
/// Only one group of lookback is considered. Ids are renumbered afterwards.
pub fn merge_groups<'a>(
    groups: Vec<Group<'a>>,
    family: &VoucherFamily,
    admin_cost: i64,
) -> Vec<Group<'a>> {
    let mut accepted: Vec<Group<'a>> = Vec::with_capacity(groups.len());

    for group in groups {
        let previous = accepted.last_mut();

        match previous {
            Some(previous)
                if group.discount_minor() < admin_cost
                    && fusion_pays(previous, &group, family, admin_cost) =>
            {
                debug!(
                    into = %previous.id(),
                    from = %group.id(),
                    "fusing low-discount group into predecessor"
                );

                previous.absorb(group, family);
            }
            _ => accepted.push(group),
        }
    }

    for (index, group) in accepted.iter_mut().enumerate() {
        group.renumber(GroupId::from_index(index));
    }

    accepted
}

/// Whether fusing `current` into `previous` leaves at least as much net discount.
fn fusion_pays(
    previous: &Group<'_>,
    current: &Group<'_>,
    family: &VoucherFamily,
    admin_cost: i64,
) -> bool {
    let merged_total = previous.total_minor().saturating_add(current.total_minor());

    let merged = family.claim(merged_total).discount;

    let fused_net = merged.saturating_sub(admin_cost);
    let separate_net = previous
        .discount_minor()
        .saturating_add(current.discount_minor())
        .saturating_sub(admin_cost.saturating_mul(2));

    fused_net >= separate_net
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::{Money, iso::IDR};
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::{
        units::Unit,
        vouchers::{VoucherKind, VoucherSpec},
    };

    use super::*;

    fn family(rate: f64, cap: i64) -> TestResult<VoucherFamily> {
        Ok(VoucherFamily::single(
            VoucherKind::NoMinimum,
            VoucherSpec::new(0, cap, Percentage::from(rate))?,
        ))
    }

    fn group<'a>(index: usize, price: i64, family: &VoucherFamily) -> Group<'a> {
        Group::priced(
            GroupId::from_index(index),
            smallvec![Unit::new("unit", Money::from_minor(price, IDR))],
            family,
            IDR,
        )
    }

    #[test]
    fn low_discount_groups_fuse() -> TestResult {
        // 10% rate: 20k -> 2000, 30k -> 3000, fused 50k -> 5000 (>= 5000 - 5000)
        let family = family(0.1, 35_000)?;
        let groups = vec![group(0, 20_000, &family), group(1, 30_000, &family)];

        let merged = merge_groups(groups, &family, 5_000);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged.first().map(Group::total_minor), Some(50_000));
        assert_eq!(merged.first().map(Group::discount_minor), Some(5_000));

        Ok(())
    }

    #[test]
    fn capped_predecessor_still_absorbs_small_group() -> TestResult {
        // 70k -> 30000 (capped), 9k -> 4500.
        // separate: 34500 - 10000 = 24500, fused: 30000 - 5000 = 25000
        let family = family(0.5, 30_000)?;
        let groups = vec![group(0, 70_000, &family), group(1, 9_000, &family)];

        let merged = merge_groups(groups, &family, 5_000);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged.first().map(Group::total_minor), Some(79_000));

        Ok(())
    }

    #[test]
    fn discount_covering_its_fee_is_not_fused() -> TestResult {
        let family = family(0.5, 30_000)?;
        let groups = vec![group(0, 70_000, &family), group(1, 9_000, &family)];

        let kept = merge_groups(groups, &family, 1_000);

        assert_eq!(kept.len(), 2);

        Ok(())
    }

    #[test]
    fn fusion_that_leaves_the_band_is_rejected() -> TestResult {
        let family = VoucherFamily::dual(
            VoucherSpec::new(0, 10_000, Percentage::from(0.5))?,
            VoucherSpec::new(50_000, 30_000, Percentage::from(0.5))?,
            60_000,
        )?;

        // 58k -> Min50k 29000, 8k -> 4000. Fused 66k falls out of the band and
        // is capped at 10000: 10000 - 5000 < 33000 - 10000.
        let groups = vec![group(0, 58_000, &family), group(1, 8_000, &family)];

        let kept = merge_groups(groups, &family, 5_000);

        assert_eq!(kept.len(), 2);

        Ok(())
    }

    #[test]
    fn first_group_has_nothing_to_fuse_into() -> TestResult {
        let family = family(0.1, 35_000)?;
        let groups = vec![group(0, 10_000, &family)];

        let merged = merge_groups(groups, &family, 5_000);

        assert_eq!(merged.len(), 1);

        Ok(())
    }

    #[test]
    fn ids_are_renumbered_after_fusion() -> TestResult {
        let family = family(0.5, 35_000)?;
        let groups = vec![
            group(0, 70_000, &family),
            group(1, 70_000, &family),
            group(2, 4_000, &family),
            group(3, 70_000, &family),
        ];

        let merged = merge_groups(groups, &family, 5_000);
        let ids: Vec<usize> = merged.iter().map(|g| g.id().get()).collect();
        let totals: Vec<i64> = merged.iter().map(Group::total_minor).collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(totals, vec![70_000, 74_000, 70_000]);

        Ok(())
    }

    #[test]
    fn fused_group_is_reclassified() -> TestResult {
        let family = VoucherFamily::dual(
            VoucherSpec::new(0, 37_000, Percentage::from(0.5))?,
            VoucherSpec::new(50_000, 30_000, Percentage::from(0.5))?,
            60_000,
        )?;
        let groups = vec![group(0, 45_000, &family), group(1, 8_000, &family)];

        // 8k discounts 4000 < 5000; fused 53k lands in the band
        let merged = merge_groups(groups, &family, 5_000);

        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged.first().map(Group::voucher),
            Some(VoucherKind::Min50k)
        );
        assert_eq!(merged.first().map(Group::discount_minor), Some(26_500));

        Ok(())
    }
}
