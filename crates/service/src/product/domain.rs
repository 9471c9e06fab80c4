use serde::{Deserialize, Serialize};

/// Stored product row as returned to clients.
pub type Product = models::product::Model;

/// Fields accepted when creating a product; availability always starts `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
}

/// Full replacement of the mutable fields of an existing product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductChanges {
    pub name: String,
    pub price: f64,
    pub availability: bool,
}

impl ProductChanges {
    pub fn apply_to(self, product: &mut Product) {
        product.name = self.name;
        product.price = self.price;
        product.availability = self.availability;
    }
}
