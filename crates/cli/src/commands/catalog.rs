//! Catalog listing.

use std::io::Write;

use fresh_market_core::{Price, catalog};

use super::CommandError;

/// Print every product with its id, slug and price.
pub fn list(out: &mut impl Write) -> Result<(), CommandError> {
    for product in catalog::products() {
        let price = Price::usd(product.price).display();
        let was = product
            .original_price
            .map(|p| format!(" (was {})", Price::usd(p).display()))
            .unwrap_or_default();
        let featured = if product.is_featured { " *" } else { "" };
        writeln!(
            out,
            "{:<10} {:<26} {:<16} {price}{was}{featured}",
            product.id, product.name, product.category
        )?;
    }
    Ok(())
}
