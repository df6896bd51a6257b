//! Domain layer of the Clochette front end
//!
//! - models/types: mirrors of the backend schema
//! - cart: sale and purchase quantity store (EcoCup deposit link)
//! - pricing: totals and currency formatting
//! - forms: form validation
//! - time/reports: period filtering and treasury summaries
//! - backend: the `BackendApi` seam implemented by `clochette-client`

pub mod backend;
pub mod cart;
pub mod error;
pub mod forms;
pub mod models;
pub mod pricing;
pub mod reports;
pub mod time;
pub mod types;

pub use backend::{BackendApi, BackendRef};
pub use cart::{Cart, CartAction, CartItem, CartLine};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use models::*;
pub use reports::{DashboardSummary, PeriodSummary, StockAlert};
pub use time::TimeContext;
pub use types::{ItemType, PaymentMethod, Role, Trade, TransactionKind};

use clochette_config::SaleConfig;

// ==================== Catalog ====================

/// Items offered on a point-of-sale page
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub glasses: Vec<CartItem>,
    pub consumables: Vec<CartItem>,
    pub non_inventoried: Vec<CartItem>,
    /// Deposit item paired with glasses, when one exists
    pub deposit: Option<CartItem>,
}

impl Catalog {
    /// Sellable items: mounted barrels (by the glass), consumables in
    /// stock and sell-trade non-inventoried items.
    pub fn for_sale(
        barrels: &[Barrel],
        consumables: &[Consumable],
        items: &[NonInventoriedItem],
        sale: &SaleConfig,
    ) -> Self {
        let glasses = barrels
            .iter()
            .filter(|b| b.is_mounted && !b.empty)
            .map(|b| CartItem {
                item_type: ItemType::Glass,
                item_id: b.id,
                name: b.drink_name.clone(),
                unit_price: b.sell_price,
                max_quantity: None,
            })
            .collect();

        let consumables = consumables
            .iter()
            .filter(|c| !c.empty && c.quantity > 0)
            .map(|c| CartItem {
                item_type: ItemType::Consumable,
                item_id: c.id,
                name: c.name.clone(),
                unit_price: c.sell_price,
                max_quantity: Some(c.quantity),
            })
            .collect();

        let sellable: Vec<&NonInventoriedItem> = items.iter().filter(|i| i.trade == Trade::Sell).collect();
        let deposit = sellable
            .iter()
            .find(|i| i.is_deposit(&sale.deposit_item_name))
            .map(|i| non_inventoried_item(i));
        let non_inventoried = sellable.iter().map(|i| non_inventoried_item(i)).collect();

        Self {
            glasses,
            consumables,
            non_inventoried,
            deposit,
        }
    }

    /// Purchasable items: barrels of known drinks, consumables to
    /// restock and buy-trade non-inventoried items, all at buy price.
    pub fn for_purchase(
        drinks: &[Drink],
        barrels: &[Barrel],
        consumables: &[Consumable],
        items: &[NonInventoriedItem],
    ) -> Self {
        // Barrels are bought per drink, at the last known price.
        let glasses = drinks
            .iter()
            .filter_map(|d| {
                let last = barrels.iter().filter(|b| b.drink_id == d.id).max_by_key(|b| b.id)?;
                Some(CartItem {
                    item_type: ItemType::Barrel,
                    item_id: last.id,
                    name: d.name.clone(),
                    unit_price: last.buy_price,
                    max_quantity: None,
                })
            })
            .collect();

        let consumables = consumables
            .iter()
            .map(|c| CartItem {
                item_type: ItemType::Consumable,
                item_id: c.id,
                name: c.name.clone(),
                unit_price: c.buy_price,
                max_quantity: None,
            })
            .collect();

        let non_inventoried = items
            .iter()
            .filter(|i| i.trade == Trade::Buy)
            .map(non_inventoried_item)
            .collect();

        Self {
            glasses,
            consumables,
            non_inventoried,
            deposit: None,
        }
    }

    /// Find an offered item by type and name
    pub fn find(&self, item_type: ItemType, name: &str) -> Option<&CartItem> {
        self.glasses
            .iter()
            .chain(self.consumables.iter())
            .chain(self.non_inventoried.iter())
            .find(|i| i.item_type == item_type && i.name == name)
    }
}

fn non_inventoried_item(item: &NonInventoriedItem) -> CartItem {
    CartItem {
        item_type: ItemType::NonInventoried,
        item_id: item.id,
        name: item.name.clone(),
        unit_price: item.price,
        max_quantity: None,
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn barrel(id: i64, drink_id: i64, name: &str, mounted: bool) -> Barrel {
        Barrel {
            id,
            drink_id,
            drink_name: name.to_string(),
            volume: Decimal::from(30),
            buy_price: Decimal::from(80 + id),
            sell_price: Decimal::new(250, 2),
            is_mounted: mounted,
            empty: false,
        }
    }

    fn items() -> Vec<NonInventoriedItem> {
        vec![
            NonInventoriedItem { id: 1, name: "EcoCup".to_string(), trade: Trade::Sell, price: Decimal::ONE },
            NonInventoriedItem { id: 2, name: "Glaçons".to_string(), trade: Trade::Buy, price: Decimal::from(5) },
        ]
    }

    #[test]
    fn test_sale_catalog_offers_mounted_barrels_only() {
        let barrels = vec![barrel(1, 1, "IPA", true), barrel(2, 2, "Stout", false)];
        let catalog = Catalog::for_sale(&barrels, &[], &items(), &SaleConfig::default());
        assert_eq!(catalog.glasses.len(), 1);
        assert_eq!(catalog.glasses[0].name, "IPA");
        assert_eq!(catalog.deposit.as_ref().map(|d| d.name.as_str()), Some("EcoCup"));
        assert!(catalog.find(ItemType::NonInventoried, "Glaçons").is_none());
    }

    #[test]
    fn test_sale_catalog_bounds_consumables_by_stock() {
        let consumables = vec![
            Consumable { id: 1, name: "Chips".to_string(), quantity: 3, buy_price: Decimal::ONE, sell_price: Decimal::TWO, empty: false },
            Consumable { id: 2, name: "Mars".to_string(), quantity: 0, buy_price: Decimal::ONE, sell_price: Decimal::TWO, empty: false },
        ];
        let catalog = Catalog::for_sale(&[], &consumables, &[], &SaleConfig::default());
        assert_eq!(catalog.consumables.len(), 1);
        assert_eq!(catalog.consumables[0].max_quantity, Some(3));
        assert!(catalog.deposit.is_none());
    }

    #[test]
    fn test_purchase_catalog_uses_latest_barrel_price() {
        let drinks = vec![
            Drink { id: 1, name: "IPA".to_string(), description: None },
            Drink { id: 2, name: "Cidre".to_string(), description: None },
        ];
        let barrels = vec![barrel(1, 1, "IPA", false), barrel(5, 1, "IPA", true)];
        let catalog = Catalog::for_purchase(&drinks, &barrels, &[], &items());
        assert_eq!(catalog.glasses.len(), 1);
        assert_eq!(catalog.glasses[0].item_type, ItemType::Barrel);
        assert_eq!(catalog.glasses[0].unit_price, Decimal::from(85));
        assert!(catalog.find(ItemType::NonInventoried, "Glaçons").is_some());
        assert!(catalog.deposit.is_none());
    }
}
