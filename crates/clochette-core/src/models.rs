//! Core data models mirrored from the backend schema

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{ItemType, PaymentMethod, Role, Trade, TransactionKind};

/// Resource identifier assigned by the backend
pub type Id = i64;

// ==================== Inventory ====================

/// A drink served from barrels (beer, cider...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drink {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A keg of a given drink, either in stock or mounted on a tap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrel {
    pub id: Id,
    pub drink_id: Id,
    /// Denormalised drink name
    #[serde(default)]
    pub drink_name: String,
    /// Volume in litres
    pub volume: Decimal,
    pub buy_price: Decimal,
    /// Price of one glass
    pub sell_price: Decimal,
    #[serde(default)]
    pub is_mounted: bool,
    #[serde(default)]
    pub empty: bool,
}

impl Barrel {
    /// Estimated glasses in a full barrel
    pub fn glass_capacity(&self, glass_volume_cl: u32) -> u32 {
        if glass_volume_cl == 0 {
            return 0;
        }
        let centilitres = self.volume * Decimal::from(100);
        (centilitres / Decimal::from(glass_volume_cl))
            .floor()
            .to_u32()
            .unwrap_or(0)
    }
}

/// A stocked item sold as purchased (food, soft drinks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumable {
    pub id: Id,
    pub name: String,
    /// Units in stock
    pub quantity: u32,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    #[serde(default)]
    pub empty: bool,
}

/// A sellable or purchasable item not tracked in stock counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonInventoriedItem {
    pub id: Id,
    pub name: String,
    pub trade: Trade,
    pub price: Decimal,
}

impl NonInventoriedItem {
    /// Whether this is the deposit item configured for glass sales
    pub fn is_deposit(&self, deposit_item_name: &str) -> bool {
        self.trade == Trade::Sell && self.name.eq_ignore_ascii_case(deposit_item_name)
    }
}

// ==================== Transactions ====================

/// One line of a recorded transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionItem {
    pub item_type: ItemType,
    pub item_id: Id,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl TransactionItem {
    pub fn total(&self) -> Decimal {
        crate::pricing::line_total(self.unit_price, self.quantity)
    }
}

/// A recorded sale or purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Id,
    pub datetime: NaiveDateTime,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub payment_method: PaymentMethod,
    /// Total amount, always positive
    pub amount: Decimal,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<TransactionItem>,
}

impl Transaction {
    /// Amount with the treasury sign: sales positive, purchases negative
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Sale => self.amount,
            TransactionKind::Purchase => -self.amount,
        }
    }

    /// Number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Short text summary for list rows
    pub fn summary(&self) -> String {
        match self.items.len() {
            0 => self.description.clone().unwrap_or_default(),
            1 => format!("{} × {}", self.items[0].quantity, self.items[0].name),
            n => format!("{} × {} (+{})", self.items[0].quantity, self.items[0].name, n - 1),
        }
    }
}

// ==================== Accounts & treasury ====================

/// A staff account of the bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Account {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Aggregate balances maintained by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Treasury {
    pub id: Id,
    pub total_amount: Decimal,
    pub cash_amount: Decimal,
    pub card_amount: Decimal,
    pub lydia_amount: Decimal,
}

impl Treasury {
    /// Balance held for a payment method
    pub fn amount_for(&self, method: PaymentMethod) -> Decimal {
        match method {
            PaymentMethod::Cash => self.cash_amount,
            PaymentMethod::Card => self.card_amount,
            PaymentMethod::Lydia => self.lydia_amount,
        }
    }

    /// Move a payment method balance and the total by the same delta
    pub fn apply(&mut self, method: PaymentMethod, delta: Decimal) {
        match method {
            PaymentMethod::Cash => self.cash_amount += delta,
            PaymentMethod::Card => self.card_amount += delta,
            PaymentMethod::Lydia => self.lydia_amount += delta,
        }
        self.total_amount += delta;
    }
}

// ==================== Write payloads ====================

/// Login credentials (OAuth2 password form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Bearer token returned by the login endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDrink {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBarrel {
    pub drink_id: Id,
    pub volume: Decimal,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewConsumable {
    pub name: String,
    pub quantity: u32,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNonInventoriedItem {
    pub name: String,
    pub trade: Trade,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub active: bool,
    /// Required on creation, optional on update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransactionItem {
    pub item_type: ItemType,
    pub item_id: Id,
    pub quantity: u32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub payment_method: PaymentMethod,
    pub items: Vec<NewTransactionItem>,
}

impl NewTransaction {
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|i| crate::pricing::line_total(i.unit_price, i.quantity))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_deserializes_backend_json() {
        let json = r#"{
            "id": 7,
            "datetime": "2026-03-14T21:30:00",
            "type": "sale",
            "payment_method": "cash",
            "amount": "5.50",
            "author": "barman",
            "items": [
                {"item_type": "glass", "item_id": 1, "name": "IPA", "quantity": 2, "unit_price": 2.5},
                {"item_type": "non_inventoried", "item_id": 3, "name": "EcoCup", "quantity": 2, "unit_price": "0.25"}
            ]
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.kind, TransactionKind::Sale);
        assert_eq!(tx.amount, Decimal::new(550, 2));
        assert_eq!(tx.item_count(), 4);
        assert_eq!(tx.summary(), "2 × IPA (+1)");
        assert_eq!(tx.items[0].total(), Decimal::new(500, 2));
    }

    #[test]
    fn test_purchase_signed_amount_is_negative() {
        let tx = Transaction {
            id: 1,
            datetime: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            kind: TransactionKind::Purchase,
            payment_method: PaymentMethod::Card,
            amount: Decimal::new(12000, 2),
            author: String::new(),
            description: None,
            items: vec![],
        };
        assert_eq!(tx.signed_amount(), Decimal::new(-12000, 2));
    }

    #[test]
    fn test_glass_capacity() {
        let barrel = Barrel {
            id: 1,
            drink_id: 1,
            drink_name: "IPA".to_string(),
            volume: Decimal::from(30),
            buy_price: Decimal::from(90),
            sell_price: Decimal::new(250, 2),
            is_mounted: true,
            empty: false,
        };
        assert_eq!(barrel.glass_capacity(25), 120);
        assert_eq!(barrel.glass_capacity(0), 0);
    }

    #[test]
    fn test_deposit_detection_is_case_insensitive() {
        let item = NonInventoriedItem {
            id: 1,
            name: "ecocup".to_string(),
            trade: Trade::Sell,
            price: Decimal::ONE,
        };
        assert!(item.is_deposit("EcoCup"));
        let bought = NonInventoriedItem { trade: Trade::Buy, ..item };
        assert!(!bought.is_deposit("EcoCup"));
    }

    #[test]
    fn test_account_display_name_falls_back_to_username() {
        let account = Account {
            id: 1,
            username: "jdoe".to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Staff,
            active: true,
        };
        assert_eq!(account.display_name(), "jdoe");
    }
}
