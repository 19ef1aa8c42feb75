use crate::fixed::Units;
use crate::id::Material;
use serde::{Deserialize, Serialize};

/// Whole-unit counts for every material on the line.
///
/// Quantities are unsigned, so an inventory can never go negative; `remove`
/// hands back what it actually took and callers check the bound first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: [Units; Material::COUNT],
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity of a specific material.
    #[inline]
    pub fn quantity(&self, material: Material) -> Units {
        self.counts[material.index()]
    }

    /// Add units, saturating at `Units::MAX`.
    pub fn add(&mut self, material: Material, quantity: Units) {
        let slot = &mut self.counts[material.index()];
        *slot = slot.saturating_add(quantity);
    }

    /// Remove units. Returns the amount actually removed.
    #[must_use = "returns the quantity actually removed, which may be less than requested"]
    pub fn remove(&mut self, material: Material, quantity: Units) -> Units {
        let slot = &mut self.counts[material.index()];
        let taken = quantity.min(*slot);
        *slot -= taken;
        taken
    }

    /// Overwrite a quantity. Used to seed buffers in tests and demos.
    pub fn set(&mut self, material: Material, quantity: Units) {
        self.counts[material.index()] = quantity;
    }

    /// Total units across the buffered (pre-finished) materials.
    pub fn buffered_total(&self) -> Units {
        Material::BUFFERED
            .iter()
            .map(|m| self.quantity(*m))
            .fold(0, Units::saturating_add)
    }

    /// Iterate `(material, quantity)` in line order.
    pub fn iter(&self) -> impl Iterator<Item = (Material, Units)> + '_ {
        Material::ALL.iter().map(move |m| (*m, self.quantity(*m)))
    }

    pub fn clear(&mut self) {
        self.counts = [0; Material::COUNT];
    }
}
