//! Units
//!
//! A unit is one physical item. Carts carry quantities; packing works on units.

use rusty_money::{Money, iso::Currency};

use crate::cart::Cart;

/// A single physical item expanded from a cart line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Unit<'a> {
    name: &'a str,
    price: Money<'a, Currency>,
}

impl<'a> Unit<'a> {
    /// Creates a new unit with the given name and price.
    pub fn new(name: &'a str, price: Money<'a, Currency>) -> Self {
        Self { name, price }
    }

    /// Returns the item name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the price of the unit.
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Returns the price of the unit in minor units.
    pub fn minor(&self) -> i64 {
        self.price.to_minor_units()
    }
}

/// Expands every cart line into `quantity` units.
///
/// Line order is preserved, followed by repetition order within a line. Lines
/// with a zero quantity contribute nothing.
pub fn expand<'a>(cart: &'a Cart<'a>) -> Vec<Unit<'a>> {
    let capacity = cart
        .iter()
        .map(|line| usize::try_from(line.quantity()).unwrap_or(0))
        .sum();

    let mut units = Vec::with_capacity(capacity);

    for line in cart.iter() {
        let unit = Unit::new(line.name(), *line.unit_price());

        for _ in 0..line.quantity() {
            units.push(unit);
        }
    }

    units
}

/// Sums unit prices in minor units.
pub fn total_minor(units: &[Unit<'_>]) -> i64 {
    units.iter().map(Unit::minor).fold(0, i64::saturating_add)
}

/// Sorts units by descending price, keeping cart order between equal prices.
pub(crate) fn sort_by_price_desc(units: &mut [Unit<'_>]) {
    units.sort_by_key(|unit| std::cmp::Reverse(unit.minor()));
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::IDR;
    use testresult::TestResult;

    use crate::cart::CartLine;

    use super::*;

    #[test]
    fn expand_repeats_each_line_by_quantity() -> TestResult {
        let cart = Cart::with_lines(
            [
                CartLine::new("Latte", Money::from_minor(18_000, IDR), 2),
                CartLine::new("Croissant", Money::from_minor(22_000, IDR), 1),
            ],
            IDR,
        )?;

        let units = expand(&cart);
        let names: Vec<&str> = units.iter().map(Unit::name).collect();

        assert_eq!(names, vec!["Latte", "Latte", "Croissant"]);
        assert_eq!(total_minor(&units), 58_000);

        Ok(())
    }

    #[test]
    fn expand_skips_zero_quantity_lines() -> TestResult {
        let cart = Cart::with_lines(
            [
                CartLine::new("Nothing", Money::from_minor(5_000, IDR), 0),
                CartLine::new("Tea", Money::from_minor(8_000, IDR), 1),
            ],
            IDR,
        )?;

        let units = expand(&cart);

        assert_eq!(units.len(), 1);
        assert_eq!(units.first().map(Unit::name), Some("Tea"));

        Ok(())
    }

    #[test]
    fn expand_empty_cart_is_empty() {
        let cart = Cart::new(IDR);

        assert!(expand(&cart).is_empty());
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut units = [
            Unit::new("a", Money::from_minor(100, IDR)),
            Unit::new("b", Money::from_minor(300, IDR)),
            Unit::new("c", Money::from_minor(100, IDR)),
        ];

        sort_by_price_desc(&mut units);

        let names: Vec<&str> = units.iter().map(Unit::name).collect();

        assert_eq!(names, vec!["b", "a", "c"]);
    }
}
