//! Local cart management.

use std::io::Write;
use std::path::Path;

use fresh_market_core::{CheckoutSummary, Price, catalog};
use fresh_market_storefront::cart::{CartStorage, CartStore, FileStorage};

use super::CommandError;

/// Open the cart persisted under `dir`.
pub fn open(dir: &Path) -> CartStore<FileStorage> {
    CartStore::load(FileStorage::new(dir))
}

/// Add `quantity` units of a catalog product.
pub fn add<S: CartStorage>(
    cart: &mut CartStore<S>,
    product: &str,
    size: &str,
    quantity: u32,
) -> Result<(), CommandError> {
    let product = catalog::lookup(product)?;
    cart.add(product.to_line_item(size, quantity));
    tracing::info!(product = product.id, size, quantity, "Added to cart");
    Ok(())
}

/// Set the quantity of an existing line.
pub fn update<S: CartStorage>(
    cart: &mut CartStore<S>,
    product: &str,
    quantity: i64,
    size: &str,
) -> Result<(), CommandError> {
    let id = line_id(cart, product, size)?;
    cart.update_quantity(&id, quantity, size);
    Ok(())
}

/// Remove an existing line.
pub fn remove<S: CartStorage>(
    cart: &mut CartStore<S>,
    product: &str,
    size: &str,
) -> Result<(), CommandError> {
    let id = line_id(cart, product, size)?;
    cart.remove(&id, size);
    Ok(())
}

/// Resolve a product id or slug to the id of a line present in the cart.
fn line_id<S: CartStorage>(
    cart: &CartStore<S>,
    product: &str,
    size: &str,
) -> Result<String, CommandError> {
    let id = catalog::find(product).map_or(product, |p| p.id);
    if cart.cart().get(id, size).is_none() {
        return Err(CommandError::NotInCart {
            product: product.to_string(),
            size: size.to_string(),
        });
    }
    Ok(id.to_string())
}

/// Print the cart lines followed by the checkout totals.
pub fn show<S: CartStorage>(cart: &CartStore<S>, out: &mut impl Write) -> Result<(), CommandError> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;
        return Ok(());
    }

    for line in cart.items() {
        writeln!(
            out,
            "{:>3} x {:<26} size {:<6} {:>9}",
            line.quantity,
            line.name,
            line.size,
            line.line_total()
                .map_or_else(|| "-".to_string(), |total| Price::usd(total).display())
        )?;
    }

    let totals = CheckoutSummary::for_cart(cart.cart()).totals;
    writeln!(out)?;
    writeln!(out, "Items:    {}", cart.item_count())?;
    writeln!(out, "Subtotal: {}", Price::usd(totals.subtotal).display())?;
    writeln!(out, "Shipping: {}", Price::usd(totals.shipping).display())?;
    writeln!(out, "Tax:      {}", Price::usd(totals.tax).display())?;
    writeln!(out, "Total:    {}", Price::usd(totals.total).display())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fresh_market_storefront::cart::MemoryStorage;

    use super::*;

    fn render<S: CartStorage>(cart: &CartStore<S>) -> String {
        let mut out = Vec::new();
        show(cart, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_add_by_slug_and_show_totals() {
        let mut cart = CartStore::load(MemoryStorage::new());
        add(&mut cart, "artisan-sourdough-bread", "1", 1).unwrap();

        let text = render(&cart);
        assert!(text.contains("Artisan Sourdough Bread"));
        assert!(text.contains("Subtotal: $6.99"));
        assert!(text.contains("Tax:      $0.66"));
        assert!(text.contains("Total:    $12.64"));
    }

    #[test]
    fn test_unknown_product_is_rejected() {
        let mut cart = CartStore::load(MemoryStorage::new());
        assert!(matches!(
            add(&mut cart, "grocery-99", "1", 1),
            Err(CommandError::Catalog(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_and_remove_require_line() {
        let mut cart = CartStore::load(MemoryStorage::new());
        assert!(matches!(
            update(&mut cart, "grocery-1", 2, "1"),
            Err(CommandError::NotInCart { .. })
        ));

        add(&mut cart, "grocery-1", "1", 1).unwrap();
        update(&mut cart, "artisan-sourdough-bread", 3, "1").unwrap();
        assert_eq!(cart.item_count(), 3);

        remove(&mut cart, "grocery-1", "1").unwrap();
        assert_eq!(render(&cart), "Cart is empty\n");
    }
}
