//! Sale and purchase quantity store
//!
//! A cart keeps one line per `(item type, name)` pair. Quantities are
//! clamped to `[0, max_quantity]`; changing a glass line moves the paired
//! deposit line (EcoCup) by the same delta, never below zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::{Id, NewTransaction, NewTransactionItem};
use crate::types::{ItemType, PaymentMethod, TransactionKind};

/// A catalog entry that can be put in a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub item_type: ItemType,
    pub item_id: Id,
    pub name: String,
    pub unit_price: Decimal,
    /// Upper bound for the quantity, `None` when unbounded
    pub max_quantity: Option<u32>,
}

impl CartItem {
    fn matches(&self, item_type: ItemType, name: &str) -> bool {
        self.item_type == item_type && self.name == name
    }

    fn clamp(&self, quantity: u32) -> u32 {
        match self.max_quantity {
            Some(max) => quantity.min(max),
            None => quantity,
        }
    }
}

/// An item and its selected quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item: CartItem,
    pub quantity: u32,
}

impl CartLine {
    pub fn total(&self) -> Decimal {
        crate::pricing::line_total(self.item.unit_price, self.quantity)
    }
}

/// Cart mutations exposed to the point-of-sale pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    Increment,
    Decrement,
    Reset,
}

impl std::str::FromStr for CartAction {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increment" => Ok(CartAction::Increment),
            "decrement" => Ok(CartAction::Decrement),
            "reset" => Ok(CartAction::Reset),
            _ => Err(format!("Invalid cart action: {}", s)),
        }
    }
}

/// In-memory quantity store for one sale or purchase in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    kind: TransactionKind,
    lines: Vec<CartLine>,
    deposit: Option<CartItem>,
}

impl Cart {
    /// Sale cart; glass lines drive the optional deposit item
    pub fn sale(deposit: Option<CartItem>) -> Self {
        Self {
            kind: TransactionKind::Sale,
            lines: Vec::new(),
            deposit,
        }
    }

    /// Purchase cart, no deposit link
    pub fn purchase() -> Self {
        Self {
            kind: TransactionKind::Purchase,
            lines: Vec::new(),
            deposit: None,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn deposit(&self) -> Option<&CartItem> {
        self.deposit.as_ref()
    }

    /// Lines with a positive quantity
    pub fn selected(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|l| l.quantity > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.selected().next().is_none()
    }

    pub fn quantity_of(&self, item_type: ItemType, name: &str) -> u32 {
        self.lines
            .iter()
            .find(|l| l.item.matches(item_type, name))
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    pub fn total(&self) -> Decimal {
        crate::pricing::cart_total(&self.lines)
    }

    pub fn apply(&mut self, action: CartAction, item: &CartItem) -> i64 {
        match action {
            CartAction::Increment => self.increment(item),
            CartAction::Decrement => self.decrement(item),
            CartAction::Reset => self.reset(item),
        }
    }

    /// Add one unit; returns the delta actually applied
    pub fn increment(&mut self, item: &CartItem) -> i64 {
        self.change(item, |q| q.saturating_add(1))
    }

    /// Remove one unit; returns the delta actually applied
    pub fn decrement(&mut self, item: &CartItem) -> i64 {
        self.change(item, |q| q.saturating_sub(1))
    }

    /// Set the quantity back to zero; returns the delta actually applied
    pub fn reset(&mut self, item: &CartItem) -> i64 {
        self.change(item, |_| 0)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Build the backend payload for the selected lines
    pub fn to_transaction(&self, payment_method: PaymentMethod) -> Result<NewTransaction, CoreError> {
        let items: Vec<NewTransactionItem> = self
            .selected()
            .map(|l| NewTransactionItem {
                item_type: l.item.item_type,
                item_id: l.item.item_id,
                quantity: l.quantity,
                unit_price: l.item.unit_price,
            })
            .collect();

        if items.is_empty() {
            return Err(CoreError::ValidationError {
                message: "Le panier est vide".to_string(),
            });
        }

        Ok(NewTransaction {
            kind: self.kind,
            payment_method,
            items,
        })
    }

    fn change(&mut self, item: &CartItem, update: impl Fn(u32) -> u32) -> i64 {
        let index = self.find_or_insert(item);
        let line = &mut self.lines[index];
        let before = line.quantity;
        let after = line.item.clamp(update(before));
        line.quantity = after;
        let delta = i64::from(after) - i64::from(before);

        if item.item_type == ItemType::Glass && delta != 0 {
            if let Some(deposit) = self.deposit.clone() {
                let index = self.find_or_insert(&deposit);
                let line = &mut self.lines[index];
                let moved = (i64::from(line.quantity) + delta).max(0);
                line.quantity = line.item.clamp(u32::try_from(moved).unwrap_or(u32::MAX));
            }
        }

        delta
    }

    fn find_or_insert(&mut self, item: &CartItem) -> usize {
        match self.lines.iter().position(|l| l.item.matches(item.item_type, &item.name)) {
            Some(index) => {
                // Catalog prices and stock may have moved since the line was created.
                self.lines[index].item = item.clone();
                index
            }
            None => {
                self.lines.push(CartLine {
                    item: item.clone(),
                    quantity: 0,
                });
                self.lines.len() - 1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glass(name: &str) -> CartItem {
        CartItem {
            item_type: ItemType::Glass,
            item_id: 1,
            name: name.to_string(),
            unit_price: Decimal::new(250, 2),
            max_quantity: None,
        }
    }

    fn ecocup() -> CartItem {
        CartItem {
            item_type: ItemType::NonInventoried,
            item_id: 9,
            name: "EcoCup".to_string(),
            unit_price: Decimal::ONE,
            max_quantity: None,
        }
    }

    fn crisps(stock: u32) -> CartItem {
        CartItem {
            item_type: ItemType::Consumable,
            item_id: 4,
            name: "Chips".to_string(),
            unit_price: Decimal::new(150, 2),
            max_quantity: Some(stock),
        }
    }

    #[test]
    fn test_increment_inserts_missing_line() {
        let mut cart = Cart::sale(None);
        assert_eq!(cart.increment(&crisps(3)), 1);
        assert_eq!(cart.quantity_of(ItemType::Consumable, "Chips"), 1);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_quantity_clamped_to_stock() {
        let mut cart = Cart::sale(None);
        let item = crisps(2);
        cart.increment(&item);
        cart.increment(&item);
        assert_eq!(cart.increment(&item), 0);
        assert_eq!(cart.quantity_of(ItemType::Consumable, "Chips"), 2);
    }

    #[test]
    fn test_decrement_never_goes_negative() {
        let mut cart = Cart::sale(None);
        assert_eq!(cart.decrement(&crisps(5)), 0);
        assert_eq!(cart.quantity_of(ItemType::Consumable, "Chips"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lines_matched_by_type_and_name() {
        let mut cart = Cart::sale(None);
        cart.increment(&glass("IPA"));
        cart.increment(&glass("Stout"));
        let mut same_name_other_type = crisps(5);
        same_name_other_type.name = "IPA".to_string();
        cart.increment(&same_name_other_type);
        assert_eq!(cart.lines().len(), 3);
        assert_eq!(cart.quantity_of(ItemType::Glass, "IPA"), 1);
    }

    #[test]
    fn test_glass_increment_moves_deposit() {
        let mut cart = Cart::sale(Some(ecocup()));
        cart.increment(&glass("IPA"));
        cart.increment(&glass("IPA"));
        cart.increment(&glass("Stout"));
        assert_eq!(cart.quantity_of(ItemType::NonInventoried, "EcoCup"), 3);

        cart.decrement(&glass("IPA"));
        assert_eq!(cart.quantity_of(ItemType::NonInventoried, "EcoCup"), 2);
    }

    #[test]
    fn test_glass_reset_removes_its_deposits() {
        let mut cart = Cart::sale(Some(ecocup()));
        let ipa = glass("IPA");
        for _ in 0..3 {
            cart.increment(&ipa);
        }
        assert_eq!(cart.reset(&ipa), -3);
        assert_eq!(cart.quantity_of(ItemType::NonInventoried, "EcoCup"), 0);
    }

    #[test]
    fn test_deposit_clamped_at_zero() {
        let mut cart = Cart::sale(Some(ecocup()));
        let ipa = glass("IPA");
        cart.increment(&ipa);
        cart.increment(&ipa);
        // Customer brought their own cups back.
        cart.reset(&ecocup());
        cart.decrement(&ipa);
        assert_eq!(cart.quantity_of(ItemType::NonInventoried, "EcoCup"), 0);
        assert_eq!(cart.quantity_of(ItemType::Glass, "IPA"), 1);
    }

    #[test]
    fn test_decrementing_empty_glass_leaves_deposit_alone() {
        let mut cart = Cart::sale(Some(ecocup()));
        cart.increment(&ecocup());
        cart.decrement(&glass("IPA"));
        assert_eq!(cart.quantity_of(ItemType::NonInventoried, "EcoCup"), 1);
    }

    #[test]
    fn test_purchase_cart_has_no_deposit_link() {
        let mut cart = Cart::purchase();
        cart.increment(&glass("IPA"));
        assert_eq!(cart.lines().len(), 1);
        assert!(cart.deposit().is_none());
    }

    #[test]
    fn test_refreshed_stock_applies_to_existing_line() {
        let mut cart = Cart::sale(None);
        cart.increment(&crisps(5));
        cart.increment(&crisps(5));
        cart.increment(&crisps(1));
        assert_eq!(cart.quantity_of(ItemType::Consumable, "Chips"), 1);
    }

    #[test]
    fn test_to_transaction_skips_zero_lines() {
        let mut cart = Cart::sale(Some(ecocup()));
        cart.increment(&glass("IPA"));
        cart.increment(&crisps(5));
        cart.decrement(&crisps(5));
        let tx = cart.to_transaction(PaymentMethod::Cash).unwrap();
        assert_eq!(tx.kind, TransactionKind::Sale);
        assert_eq!(tx.items.len(), 2);
        assert_eq!(tx.total(), Decimal::new(350, 2));
        assert_eq!(cart.total(), Decimal::new(350, 2));
    }

    #[test]
    fn test_empty_cart_cannot_be_checked_out() {
        let cart = Cart::sale(None);
        assert!(matches!(
            cart.to_transaction(PaymentMethod::Card),
            Err(CoreError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_cart_action_parse() {
        assert_eq!("reset".parse::<CartAction>().unwrap(), CartAction::Reset);
        assert!("clear".parse::<CartAction>().is_err());
    }
}
