//! Cart Fixtures

use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, IDR, USD},
};
use serde::Deserialize;

use crate::{cart::CartLine, fixtures::FixtureError};

/// Cart fixture from YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// ISO currency code (e.g., "IDR")
    pub currency: String,

    /// Cart lines, in order
    #[serde(default)]
    pub lines: Vec<LineFixture>,
}

/// Cart line fixture
#[derive(Debug, Deserialize)]
pub struct LineFixture {
    /// Item name
    pub name: String,

    /// Unit price in minor units
    pub price: i64,

    /// Number of units
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

impl LineFixture {
    /// Convert to a cart line priced in `currency`.
    pub fn into_line(self, currency: &'static Currency) -> CartLine<'static> {
        let price = Money::from_minor(self.price, currency);

        CartLine::new(self.name, price, self.quantity)
    }
}

/// Parse an ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] if the code is not supported.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "IDR" => Ok(IDR),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}
