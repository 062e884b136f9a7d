//! Customization state: the current fit, color, fabric and collar selection

use crate::catalog::{self, CatalogError, CollarDesign, Dimension};

/// The full option tuple sent along with every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomizationOptions {
    pub fit: &'static str,
    pub color: &'static str,
    pub fabric: &'static str,
    pub collar: &'static CollarDesign,
}

/// A single catalog entry chosen for one dimension.
///
/// Holds a catalog position rather than a value, so every [`Choice`] names
/// a real entry and [`CustomizationOptions::update`] can never store
/// anything outside the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    dimension: Dimension,
    index: usize,
}

impl Choice {
    /// Catalog entry `index` of `dimension`, wrapping out-of-range indices.
    pub fn from_index(dimension: Dimension, index: usize) -> Self {
        Self {
            dimension,
            index: index % dimension.count(),
        }
    }

    /// Look up an entry by its catalog name (case-insensitive).
    pub fn named(dimension: Dimension, name: &str) -> Result<Self, CatalogError> {
        let index = catalog::position_of(dimension, name)?;
        Ok(Self { dimension, index })
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Default for CustomizationOptions {
    fn default() -> Self {
        Self {
            fit: catalog::FITS[0],
            color: catalog::COLORS[0],
            fabric: catalog::FABRICS[0],
            collar: &catalog::COLLAR_DESIGNS[0],
        }
    }
}

impl CustomizationOptions {
    /// Replace one field.
    pub fn update(&mut self, choice: Choice) {
        let index = choice.index();
        match choice.dimension() {
            Dimension::Fit => self.fit = catalog::FITS[index],
            Dimension::Color => self.color = catalog::COLORS[index],
            Dimension::Fabric => self.fabric = catalog::FABRICS[index],
            Dimension::Collar => self.collar = &catalog::COLLAR_DESIGNS[index],
        }
    }

    /// Restore the first catalog entry of every dimension.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Display name of the current value for `dimension`.
    pub fn value(&self, dimension: Dimension) -> &'static str {
        match dimension {
            Dimension::Fit => self.fit,
            Dimension::Color => self.color,
            Dimension::Fabric => self.fabric,
            Dimension::Collar => self.collar.name,
        }
    }

    /// Catalog index of the current value for `dimension`.
    pub fn index_of(&self, dimension: Dimension) -> usize {
        let current = self.value(dimension);
        dimension
            .entries()
            .iter()
            .position(|entry| *entry == current)
            .unwrap_or(0)
    }

    /// The entry after the current one, wrapping at the end.
    pub fn next_choice(&self, dimension: Dimension) -> Choice {
        Choice::from_index(dimension, self.index_of(dimension) + 1)
    }

    /// The entry before the current one, wrapping at the start.
    pub fn previous_choice(&self, dimension: Dimension) -> Choice {
        Choice::from_index(dimension, self.index_of(dimension) + dimension.count() - 1)
    }
}
