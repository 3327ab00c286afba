//! Categories
//!
//! A category (brand) decides which voucher family applies, how baskets are
//! packed and how accounts are counted. Categories live in a [`Catalogue`].

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::vouchers::{VoucherError, VoucherFamily, VoucherKind, VoucherSpec};

new_key_type! {
    /// Category Key
    pub struct CategoryKey;
}

/// Errors raised while building or loading a catalogue.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// IO error reading a catalogue file
    #[error("Failed to read catalogue file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid voucher rule
    #[error("Invalid voucher rule in category {category}: {source}")]
    Voucher {
        /// Category name
        category: String,
        /// Underlying voucher error
        source: VoucherError,
    },

    /// Non-positive basket ceiling
    #[error("Category {0} has a non-positive ceiling of {1}")]
    InvalidCeiling(String, i64),

    /// Band packing configured for a family without a band
    #[error("Category {0} uses band packing but only offers a single voucher")]
    BandWithoutDualFamily(String),

    /// Band packing configured without a water-filling ceiling
    #[error("Category {0} uses band packing but has no fill ceiling")]
    MissingFillCeiling(String),

    /// Two categories share a name
    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),

    /// Category not found
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
}

/// How a category partitions units into groups.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingStrategy {
    /// Single-pass greedy fill under the ceiling.
    #[default]
    Greedy,

    /// Water-filling into the Min50k band, then sequential band matching.
    Band,
}

/// How many voucher-bearing accounts a set of groups needs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountPolicy {
    /// One account per group.
    #[default]
    PerGroup,

    /// One account serves one group of each voucher kind.
    Combo,
}

/// A brand or category with its voucher rules and packing settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    name: String,
    family: VoucherFamily,
    ceiling: i64,
    fill_ceiling: Option<i64>,
    strategy: PackingStrategy,
    account_policy: AccountPolicy,
}

impl Category {
    /// Create a greedy-packed category with one account per group.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::InvalidCeiling`] if `ceiling` is not positive.
    pub fn new(
        name: impl Into<String>,
        family: VoucherFamily,
        ceiling: i64,
    ) -> Result<Self, CatalogueError> {
        let name = name.into();

        if ceiling <= 0 {
            return Err(CatalogueError::InvalidCeiling(name, ceiling));
        }

        Ok(Self {
            name,
            family,
            ceiling,
            fill_ceiling: None,
            strategy: PackingStrategy::Greedy,
            account_policy: AccountPolicy::PerGroup,
        })
    }

    /// Switch the category to band packing.
    ///
    /// # Errors
    ///
    /// Returns an error if the family has no band or `fill_ceiling` is not positive.
    pub fn with_band_packing(mut self, fill_ceiling: i64) -> Result<Self, CatalogueError> {
        if self.family.band().is_none() {
            return Err(CatalogueError::BandWithoutDualFamily(self.name));
        }

        if fill_ceiling <= 0 {
            return Err(CatalogueError::InvalidCeiling(self.name, fill_ceiling));
        }

        self.strategy = PackingStrategy::Band;
        self.fill_ceiling = Some(fill_ceiling);

        Ok(self)
    }

    /// Set the account policy.
    #[must_use]
    pub fn with_account_policy(mut self, account_policy: AccountPolicy) -> Self {
        self.account_policy = account_policy;
        self
    }

    /// Category name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Voucher family.
    pub fn family(&self) -> &VoucherFamily {
        &self.family
    }

    /// No-minimum basket ceiling.
    pub const fn ceiling(&self) -> i64 {
        self.ceiling
    }

    /// Water-filling ceiling for band packing.
    pub const fn fill_ceiling(&self) -> Option<i64> {
        self.fill_ceiling
    }

    /// Packing strategy.
    pub const fn strategy(&self) -> PackingStrategy {
        self.strategy
    }

    /// Account policy.
    pub const fn account_policy(&self) -> AccountPolicy {
        self.account_policy
    }
}

/// Named categories.
#[derive(Debug, Default)]
pub struct Catalogue {
    categories: SlotMap<CategoryKey, Category>,
    keys: FxHashMap<String, CategoryKey>,
}

impl Catalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalogue: `standard`, `dual` and `compact`.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in values; the result type is shared with
    /// [`Catalogue::from_yaml_str`].
    pub fn builtin() -> Result<Self, CatalogueError> {
        Self::from_yaml_str(BUILTIN_CATALOGUE)
    }

    /// Parse a catalogue from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a category is invalid.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogueError> {
        let fixture: CatalogueFixture = serde_norway::from_str(yaml)?;

        let mut categories: Vec<(String, CategoryFixture)> =
            fixture.categories.into_iter().collect();

        // Map order is unspecified; keep keys deterministic.
        categories.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut catalogue = Self::new();

        for (name, category) in categories {
            catalogue.insert(category.try_into_category(name)?)?;
        }

        Ok(catalogue)
    }

    /// Load a catalogue from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Add a category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::DuplicateCategory`] if the name is taken.
    pub fn insert(&mut self, category: Category) -> Result<CategoryKey, CatalogueError> {
        if self.keys.contains_key(category.name()) {
            return Err(CatalogueError::DuplicateCategory(category.name.clone()));
        }

        let name = category.name.clone();
        let key = self.categories.insert(category);

        self.keys.insert(name, key);

        Ok(key)
    }

    /// Get a category by name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::CategoryNotFound`] if the name is unknown.
    pub fn category(&self, name: &str) -> Result<&Category, CatalogueError> {
        self.keys
            .get(name)
            .and_then(|key| self.categories.get(*key))
            .ok_or_else(|| CatalogueError::CategoryNotFound(name.to_string()))
    }

    /// Get a category by key.
    pub fn get(&self, key: CategoryKey) -> Option<&Category> {
        self.categories.get(key)
    }

    /// Category names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get the number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Check if the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

const BUILTIN_CATALOGUE: &str = include_str!("../fixtures/catalogue/default.yml");

/// Wrapper for categories in YAML
#[derive(Debug, Deserialize)]
struct CatalogueFixture {
    categories: FxHashMap<String, CategoryFixture>,
}

/// Category fixture from YAML
#[derive(Debug, Deserialize)]
struct CategoryFixture {
    vouchers: FamilyFixture,
    ceiling: i64,
    #[serde(default)]
    strategy: PackingStrategy,
    #[serde(default)]
    fill_ceiling: Option<i64>,
    #[serde(default)]
    account_policy: AccountPolicy,
}

/// Voucher family fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum FamilyFixture {
    Single {
        kind: VoucherKind,
        #[serde(default)]
        min_order: i64,
        max_discount: i64,
        rate: f64,
    },
    Dual {
        no_minimum: SpecFixture,
        min_50k: SpecFixture,
        band_upper: i64,
    },
}

/// Voucher spec fixture from YAML
#[derive(Debug, Deserialize)]
struct SpecFixture {
    #[serde(default)]
    min_order: i64,
    max_discount: i64,
    rate: f64,
}

impl SpecFixture {
    fn try_into_spec(self) -> Result<VoucherSpec, VoucherError> {
        VoucherSpec::new(
            self.min_order,
            self.max_discount,
            Percentage::from(self.rate),
        )
    }
}

impl FamilyFixture {
    fn try_into_family(self) -> Result<VoucherFamily, VoucherError> {
        match self {
            FamilyFixture::Single {
                kind,
                min_order,
                max_discount,
                rate,
            } => {
                let spec = SpecFixture {
                    min_order,
                    max_discount,
                    rate,
                };

                Ok(VoucherFamily::single(kind, spec.try_into_spec()?))
            }
            FamilyFixture::Dual {
                no_minimum,
                min_50k,
                band_upper,
            } => VoucherFamily::dual(
                no_minimum.try_into_spec()?,
                min_50k.try_into_spec()?,
                band_upper,
            ),
        }
    }
}

impl CategoryFixture {
    fn try_into_category(self, name: String) -> Result<Category, CatalogueError> {
        let family = match self.vouchers.try_into_family() {
            Ok(family) => family,
            Err(source) => {
                return Err(CatalogueError::Voucher {
                    category: name,
                    source,
                });
            }
        };

        let category = Category::new(name, family, self.ceiling)?
            .with_account_policy(self.account_policy);

        match self.strategy {
            PackingStrategy::Greedy => Ok(category),
            PackingStrategy::Band => {
                let fill_ceiling = self
                    .fill_ceiling
                    .ok_or_else(|| CatalogueError::MissingFillCeiling(category.name.clone()))?;

                category.with_band_packing(fill_ceiling)
            }
        }
    }
}
