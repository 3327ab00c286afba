//! Fixtures
//!
//! YAML-backed catalogues and carts for examples and tests.

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, CartLine},
    categories::{Catalogue, CatalogueError},
    fixtures::carts::{CartFixture, parse_currency},
};

pub mod carts;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// No cart loaded yet
    #[error("No cart loaded yet; currency unknown")]
    NoCurrency,

    /// No catalogue loaded yet
    #[error("No catalogue loaded yet")]
    NoCatalogue,

    /// Not enough lines in fixture
    #[error("Not enough lines in fixture, available: {available}, requested: {requested}")]
    NotEnoughLines {
        /// Number of lines defined in the fixture
        available: usize,
        /// Number of lines requested
        requested: usize,
    },

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),

    /// Catalogue loading error
    #[error("Failed to load catalogue: {0}")]
    Catalogue(#[from] CatalogueError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded catalogue
    catalogue: Option<Catalogue>,

    /// Loaded cart lines
    lines: Vec<CartLine<'static>>,

    /// Currency for the loaded cart
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalogue: None,
            lines: Vec::new(),
            currency: None,
        }
    }

    /// Load a catalogue from `catalogue/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a category is invalid.
    pub fn load_catalogue(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalogue").join(format!("{name}.yml"));

        self.catalogue = Some(Catalogue::load(file_path)?);

        Ok(self)
    }

    /// Load cart lines from `carts/<name>.yml`, replacing any loaded before.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or names an unknown currency.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        let currency = parse_currency(&fixture.currency)?;

        self.lines = fixture
            .lines
            .into_iter()
            .map(|line| line.into_line(currency))
            .collect();
        self.currency = Some(currency);

        Ok(self)
    }

    /// Load the `default` catalogue and the named cart
    ///
    /// # Errors
    ///
    /// Returns an error if either fixture file cannot be loaded.
    pub fn from_set(cart: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalogue("default")?.load_cart(cart)?;

        Ok(fixture)
    }

    /// Get the loaded catalogue
    ///
    /// # Errors
    ///
    /// Returns an error if no catalogue has been loaded.
    pub fn catalogue(&self) -> Result<&Catalogue, FixtureError> {
        self.catalogue.as_ref().ok_or(FixtureError::NoCatalogue)
    }

    /// Get all loaded cart lines
    pub fn lines(&self) -> &[CartLine<'static>] {
        &self.lines
    }

    /// Create a cart from the first `n` loaded lines, or all of them
    ///
    /// # Errors
    ///
    /// Returns an error if no cart is loaded, `n` exceeds the line count, or
    /// a line has a negative price.
    pub fn cart(&self, n: Option<usize>) -> Result<Cart<'static>, FixtureError> {
        let currency = self.currency.ok_or(FixtureError::NoCurrency)?;

        if let Some(n) = n
            && n > self.lines.len()
        {
            return Err(FixtureError::NotEnoughLines {
                requested: n,
                available: self.lines.len(),
            });
        }

        let lines: Vec<CartLine<'static>> = self
            .lines
            .iter()
            .take(n.unwrap_or(self.lines.len()))
            .cloned()
            .collect();

        Ok(Cart::with_lines(lines, currency)?)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no cart has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
