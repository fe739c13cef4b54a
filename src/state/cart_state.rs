//! Shopping cart lines and order summary

use serde::{Deserialize, Serialize};

use super::catalog::Product;
use crate::error::StoreError;

/// Flat delivery fee applied to every order
pub const DEFAULT_DELIVERY_FEE_CENTS: u64 = 299;

/// Largest quantity a single line may hold
pub const MAX_LINE_QUANTITY: u32 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: u64,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total_cents(&self) -> u64 {
        self.unit_price_cents * u64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Number of distinct lines, as shown in the cart header
    pub item_count: usize,
    pub subtotal_cents: u64,
    pub delivery_fee_cents: u64,
    pub total_cents: u64,
}

#[derive(Debug, Clone)]
pub struct CartState {
    lines: Vec<CartLine>,
    delivery_fee_cents: u64,
}

impl CartState {
    pub fn new(delivery_fee_cents: u64) -> Self {
        Self {
            lines: Vec::new(),
            delivery_fee_cents,
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` of a product, merging into an existing line.
    ///
    /// The resulting line quantity must stay within 1..=MAX_LINE_QUANTITY.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<&CartLine, StoreError> {
        if quantity == 0 {
            return Err(StoreError::InvalidQuantity);
        }

        let index = match self.position(&product.id) {
            Some(index) => {
                self.lines[index].quantity = bounded_sum(self.lines[index].quantity, quantity)?;
                index
            }
            None if quantity > MAX_LINE_QUANTITY => return Err(StoreError::InvalidQuantity),
            None => {
                self.lines.push(CartLine {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    unit_price_cents: product.price_cents,
                    quantity,
                });
                self.lines.len() - 1
            }
        };

        Ok(&self.lines[index])
    }

    pub fn increment(&mut self, product_id: &str) -> Result<u32, StoreError> {
        let index = self.require(product_id)?;
        self.lines[index].quantity = bounded_sum(self.lines[index].quantity, 1)?;
        Ok(self.lines[index].quantity)
    }

    /// Decrease by one; a line at quantity 1 is removed and 0 is returned
    pub fn decrement(&mut self, product_id: &str) -> Result<u32, StoreError> {
        let index = self.require(product_id)?;
        if self.lines[index].quantity <= 1 {
            self.lines.remove(index);
            return Ok(0);
        }
        self.lines[index].quantity -= 1;
        Ok(self.lines[index].quantity)
    }

    pub fn remove(&mut self, product_id: &str) -> Result<CartLine, StoreError> {
        let index = self.require(product_id)?;
        Ok(self.lines.remove(index))
    }

    pub fn summary(&self) -> OrderSummary {
        let subtotal_cents = self.lines.iter().map(CartLine::line_total_cents).sum();
        OrderSummary {
            item_count: self.lines.len(),
            subtotal_cents,
            delivery_fee_cents: self.delivery_fee_cents,
            total_cents: subtotal_cents + self.delivery_fee_cents,
        }
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.product_id == product_id)
    }

    fn require(&self, product_id: &str) -> Result<usize, StoreError> {
        self.position(product_id)
            .ok_or_else(|| StoreError::CartItemNotFound(product_id.to_string()))
    }
}

fn bounded_sum(current: u32, extra: u32) -> Result<u32, StoreError> {
    current
        .checked_add(extra)
        .filter(|total| *total <= MAX_LINE_QUANTITY)
        .ok_or(StoreError::InvalidQuantity)
}

impl Default for CartState {
    fn default() -> Self {
        Self::new(DEFAULT_DELIVERY_FEE_CENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Catalog;

    fn product(id: &str) -> Product {
        Catalog::new().product(id).cloned().unwrap()
    }

    #[test]
    fn add_merges_lines() {
        let mut cart = CartState::default();
        cart.add(&product("1"), 2).unwrap();
        let line = cart.add(&product("1"), 1).unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn zero_quantity_rejected() {
        let mut cart = CartState::default();
        assert!(matches!(
            cart.add(&product("1"), 0),
            Err(StoreError::InvalidQuantity)
        ));
    }

    #[test]
    fn quantity_above_cap_rejected_without_touching_line() {
        let mut cart = CartState::default();
        assert!(matches!(
            cart.add(&product("1"), u32::MAX),
            Err(StoreError::InvalidQuantity)
        ));
        assert!(cart.is_empty());

        cart.add(&product("1"), MAX_LINE_QUANTITY - 1).unwrap();
        assert!(matches!(
            cart.add(&product("1"), u32::MAX),
            Err(StoreError::InvalidQuantity)
        ));
        assert_eq!(cart.increment("1").unwrap(), MAX_LINE_QUANTITY);
        assert!(matches!(cart.increment("1"), Err(StoreError::InvalidQuantity)));
        assert!(matches!(cart.add(&product("1"), 1), Err(StoreError::InvalidQuantity)));

        let line = &cart.lines()[0];
        assert_eq!(line.quantity, MAX_LINE_QUANTITY);
        assert_eq!(cart.summary().subtotal_cents, 299 * u64::from(MAX_LINE_QUANTITY));
    }

    #[test]
    fn summary_adds_delivery_fee() {
        let mut cart = CartState::default();
        cart.add(&product("1"), 2).unwrap(); // 2 x 2.99
        cart.add(&product("5"), 1).unwrap(); // 1.79

        let summary = cart.summary();
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.subtotal_cents, 777);
        assert_eq!(summary.delivery_fee_cents, 299);
        assert_eq!(summary.total_cents, 1076);
    }

    #[test]
    fn empty_cart_summary_is_fee_only() {
        let cart = CartState::new(0);
        assert_eq!(cart.summary().total_cents, 0);
    }

    #[test]
    fn decrement_at_one_removes_line() {
        let mut cart = CartState::default();
        cart.add(&product("3"), 2).unwrap();
        assert_eq!(cart.decrement("3").unwrap(), 1);
        assert_eq!(cart.decrement("3").unwrap(), 0);
        assert!(cart.is_empty());
        assert!(matches!(
            cart.decrement("3"),
            Err(StoreError::CartItemNotFound(_))
        ));
    }

    #[test]
    fn increment_and_remove() {
        let mut cart = CartState::default();
        cart.add(&product("4"), 1).unwrap();
        assert_eq!(cart.increment("4").unwrap(), 2);
        let removed = cart.remove("4").unwrap();
        assert_eq!(removed.quantity, 2);
        assert!(cart.remove("4").is_err());
    }
}
