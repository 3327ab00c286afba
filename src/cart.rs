//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors related to cart construction.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A line's currency differs from the cart currency (index, line currency, cart currency).
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A line has a negative unit price (index, price in minor units).
    #[error("Line {0} has a negative unit price of {1} minor units")]
    NegativePrice(usize, i64),
}

/// A quantity-bearing line of the cart, as supplied by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct CartLine<'a> {
    name: String,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> CartLine<'a> {
    /// Creates a new cart line.
    pub fn new(name: impl Into<String>, unit_price: Money<'a, Currency>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// Returns the item name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price of a single unit.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the number of units on this line.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line subtotal in minor units (`unit_price * quantity`).
    pub fn subtotal_minor(&self) -> i64 {
        self.unit_price
            .to_minor_units()
            .saturating_mul(i64::from(self.quantity))
    }
}

/// Cart
///
/// An ordered list of cart lines sharing one currency. Every price is
/// non-negative once the cart has been built.
#[derive(Debug)]
pub struct Cart<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new, empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a new cart with the given lines.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if a line has a different currency or a negative price.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();

        lines.iter().enumerate().try_for_each(|(i, line)| {
            let line_currency = line.unit_price().currency();

            if line_currency != currency {
                return Err(CartError::CurrencyMismatch(
                    i,
                    line_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            let minor = line.unit_price().to_minor_units();

            if minor < 0 {
                return Err(CartError::NegativePrice(i, minor));
            }

            Ok(())
        })?;

        Ok(Cart { lines, currency })
    }

    /// Sum of every line subtotal, in minor units.
    pub fn subtotal_minor(&self) -> i64 {
        self.lines
            .iter()
            .map(CartLine::subtotal_minor)
            .fold(0, i64::saturating_add)
    }

    /// Calculate the subtotal of the cart.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        Money::from_minor(self.subtotal_minor(), self.currency)
    }

    /// Iterate over the lines in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
