//! Static product catalog and store-wide constants.
//!
//! The storefront sells a fixed set of grocery products. Prices are decimal
//! constants so totals never pass through binary floating point.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{CartLineItem, ProductId};

/// Store display name.
pub const BRAND_NAME: &str = "Fresh Market";

/// Flat delivery charge applied to every order (4.99).
pub const SHIPPING_COST: Decimal = Decimal::from_parts(499, 0, 0, false, 2);

/// Sales tax rate applied to the subtotal (9.38%).
pub const TAX_RATE: Decimal = Decimal::from_parts(938, 0, 0, false, 4);

/// Delivery window shown for every line.
pub const DEFAULT_ARRIVAL: &str = "Today, 4:00 - 5:00 PM";

/// Size label used when a product has no size options.
pub const DEFAULT_SIZE: &str = "1";

/// Catalog lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
}

/// A catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub id: &'static str,
    pub slug: &'static str,
    pub brand: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub image: &'static str,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub discount: Option<&'static str>,
    pub is_featured: bool,
}

impl Product {
    /// Build a cart line for this product.
    ///
    /// The category doubles as subtitle and color, matching how the checkout
    /// page describes catalog items.
    #[must_use]
    pub fn to_line_item(&self, size: &str, quantity: u32) -> CartLineItem {
        CartLineItem {
            id: ProductId::new(self.id),
            name: self.name.to_string(),
            subtitle: self.category.to_string(),
            price: self.price,
            size: size.to_string(),
            quantity,
            color: self.category.to_string(),
            image: self.image.to_string(),
            arrival_date: DEFAULT_ARRIVAL.to_string(),
        }
    }
}

const fn cents(value: u32) -> Decimal {
    Decimal::from_parts(value, 0, 0, false, 2)
}

static PRODUCTS: [Product; 6] = [
    Product {
        id: "grocery-1",
        slug: "artisan-sourdough-bread",
        brand: BRAND_NAME,
        name: "Artisan Sourdough Bread",
        category: "Bakery",
        description: "Hand-crafted sourdough bread made with organic flour and a 48-hour fermentation process. Crispy golden crust with a soft, tangy interior perfect for any meal.",
        image: "https://images.unsplash.com/photo-1509440159596-0249088772ff?w=600&h=600&fit=crop",
        price: cents(699),
        original_price: None,
        discount: None,
        is_featured: true,
    },
    Product {
        id: "grocery-2",
        slug: "organic-mixed-greens",
        brand: BRAND_NAME,
        name: "Organic Mixed Greens",
        category: "Produce",
        description: "Crisp organic mixed greens, locally sourced and farm-fresh.",
        image: "https://images.unsplash.com/photo-1540420773420-3366772f4999?w=600&h=600&fit=crop",
        price: cents(499),
        original_price: None,
        discount: None,
        is_featured: false,
    },
    Product {
        id: "grocery-3",
        slug: "extra-virgin-olive-oil",
        brand: BRAND_NAME,
        name: "Extra Virgin Olive Oil",
        category: "Pantry",
        description: "Cold-pressed extra virgin olive oil from Italian olives.",
        image: "https://images.unsplash.com/photo-1615484477778-ca3b77940c25?w=600&h=600&fit=crop",
        price: cents(1299),
        original_price: Some(cents(1699)),
        discount: Some("24% off"),
        is_featured: false,
    },
    Product {
        id: "grocery-4",
        slug: "aged-parmesan-cheese",
        brand: BRAND_NAME,
        name: "Aged Parmesan Cheese",
        category: "Dairy",
        description: "24-month aged Parmigiano-Reggiano, imported from Italy.",
        image: "https://images.unsplash.com/photo-1486297678162-eb2a19b0a32d?w=600&h=600&fit=crop",
        price: cents(899),
        original_price: None,
        discount: None,
        is_featured: false,
    },
    Product {
        id: "grocery-5",
        slug: "fresh-pasta-bundle",
        brand: BRAND_NAME,
        name: "Fresh Pasta Bundle",
        category: "Pantry",
        description: "Assorted fresh pasta made daily in-store.",
        image: "https://images.unsplash.com/photo-1551462147-ff29053bfc14?w=600&h=600&fit=crop",
        price: cents(749),
        original_price: None,
        discount: None,
        is_featured: false,
    },
    Product {
        id: "grocery-6",
        slug: "reserve-red-wine",
        brand: BRAND_NAME,
        name: "Reserve Red Wine",
        category: "Wine & Spirits",
        description: "Full-bodied red wine with notes of cherry and oak.",
        image: "https://images.unsplash.com/photo-1510812431401-41d2bd2722f3?w=600&h=600&fit=crop",
        price: cents(1899),
        original_price: None,
        discount: None,
        is_featured: false,
    },
];

/// All catalog products in display order.
#[must_use]
pub fn products() -> &'static [Product] {
    &PRODUCTS
}

/// The featured product shown on the home page and used as the checkout
/// fallback when the cart is empty.
#[must_use]
pub fn featured() -> &'static Product {
    let [first, ..] = &PRODUCTS;
    PRODUCTS.iter().find(|p| p.is_featured).unwrap_or(first)
}

/// Look up a product by id or slug.
#[must_use]
pub fn find(key: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == key || p.slug == key)
}

/// Like [`find`], but an unknown key is an error.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownProduct`] if no product matches.
pub fn lookup(key: &str) -> Result<&'static Product, CatalogError> {
    find(key).ok_or_else(|| CatalogError::UnknownProduct(key.to_string()))
}
