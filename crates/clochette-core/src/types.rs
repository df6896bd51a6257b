//! Basic enumerations shared by the models

use serde::{Deserialize, Serialize};

/// Kind of sellable or purchasable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// A glass drawn from a mounted barrel
    Glass,
    /// A whole barrel (purchases only)
    Barrel,
    /// A stocked consumable
    Consumable,
    /// An item not tracked in stock (EcoCup deposit, services)
    NonInventoried,
}

impl std::str::FromStr for ItemType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "glass" => Ok(ItemType::Glass),
            "barrel" => Ok(ItemType::Barrel),
            "consumable" => Ok(ItemType::Consumable),
            "non_inventoried" | "non-inventoried" => Ok(ItemType::NonInventoried),
            _ => Err(format!("Invalid item type: {}", s)),
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemType::Glass => write!(f, "glass"),
            ItemType::Barrel => write!(f, "barrel"),
            ItemType::Consumable => write!(f, "consumable"),
            ItemType::NonInventoried => write!(f, "non_inventoried"),
        }
    }
}

impl ItemType {
    /// French label used in the UI
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Glass => "Verre",
            ItemType::Barrel => "Fût",
            ItemType::Consumable => "Consommable",
            ItemType::NonInventoried => "Hors stock",
        }
    }
}

/// Transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money in: items sold at the bar
    Sale,
    /// Money out: stock bought from suppliers
    Purchase,
}

impl std::str::FromStr for TransactionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sale" => Ok(TransactionKind::Sale),
            "purchase" => Ok(TransactionKind::Purchase),
            _ => Err(format!("Invalid transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Sale => write!(f, "sale"),
            TransactionKind::Purchase => write!(f, "purchase"),
        }
    }
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "Vente",
            TransactionKind::Purchase => "Achat",
        }
    }
}

/// Payment method of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Lydia,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Lydia];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Espèces",
            PaymentMethod::Card => "Carte",
            PaymentMethod::Lydia => "Lydia",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "lydia" => Ok(PaymentMethod::Lydia),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Lydia => write!(f, "lydia"),
        }
    }
}

/// Direction a non-inventoried item is traded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trade {
    Buy,
    Sell,
}

impl std::str::FromStr for Trade {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(Trade::Buy),
            "sell" => Ok(Trade::Sell),
            _ => Err(format!("Invalid trade: {}", s)),
        }
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trade::Buy => write!(f, "buy"),
            Trade::Sell => write!(f, "sell"),
        }
    }
}

impl Trade {
    pub const ALL: [Trade; 2] = [Trade::Sell, Trade::Buy];

    pub fn label(&self) -> &'static str {
        match self {
            Trade::Buy => "Achat",
            Trade::Sell => "Vente",
        }
    }
}

/// Account role, ordered by privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Staff,
    Treasurer,
    President,
    Admin,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Member, Role::Staff, Role::Treasurer, Role::President, Role::Admin];

    /// Treasurer and above may manage accounts and record purchases
    pub fn can_manage(&self) -> bool {
        *self >= Role::Treasurer
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Member => "Membre",
            Role::Staff => "Staff",
            Role::Treasurer => "Trésorier",
            Role::President => "Président",
            Role::Admin => "Admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "staff" => Ok(Role::Staff),
            "treasurer" => Ok(Role::Treasurer),
            "president" => Ok(Role::President),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Member => write!(f, "member"),
            Role::Staff => write!(f, "staff"),
            Role::Treasurer => write!(f, "treasurer"),
            Role::President => write!(f, "president"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_parse_and_display() {
        assert_eq!("non-inventoried".parse::<ItemType>().unwrap(), ItemType::NonInventoried);
        assert_eq!(ItemType::NonInventoried.to_string(), "non_inventoried");
        assert!("keg".parse::<ItemType>().is_err());
    }

    #[test]
    fn test_role_privileges() {
        assert!(!Role::Staff.can_manage());
        assert!(Role::Treasurer.can_manage());
        assert!(Role::Admin.can_manage());
    }

    #[test]
    fn test_serde_names_match_display() {
        let json = serde_json::to_string(&ItemType::NonInventoried).unwrap();
        assert_eq!(json, "\"non_inventoried\"");
        let method: PaymentMethod = serde_json::from_str("\"lydia\"").unwrap();
        assert_eq!(method, PaymentMethod::Lydia);
    }
}
