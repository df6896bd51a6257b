//! Backend REST API seam
//!
//! Every page handler talks to the Clochette backend through this trait.
//! Each call carries the bearer token of the current session.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CoreResult;
use crate::models::{
    Account, AuthToken, Barrel, Consumable, Credentials, Drink, Id, NewAccount, NewBarrel,
    NewConsumable, NewDrink, NewNonInventoriedItem, NewTransaction, NonInventoriedItem,
    Transaction, Treasury,
};

/// Backend reference type
pub type BackendRef = Arc<dyn BackendApi>;

/// Operations exposed by the Clochette backend
#[async_trait]
pub trait BackendApi: Send + Sync {
    // ---- Authentication ----
    async fn login(&self, credentials: &Credentials) -> CoreResult<AuthToken>;
    async fn current_account(&self, token: &str) -> CoreResult<Account>;

    // ---- Drinks ----
    async fn drinks(&self, token: &str) -> CoreResult<Vec<Drink>>;
    async fn create_drink(&self, token: &str, drink: &NewDrink) -> CoreResult<Drink>;
    async fn update_drink(&self, token: &str, id: Id, drink: &NewDrink) -> CoreResult<Drink>;
    async fn delete_drink(&self, token: &str, id: Id) -> CoreResult<()>;

    // ---- Barrels ----
    async fn barrels(&self, token: &str) -> CoreResult<Vec<Barrel>>;
    async fn create_barrel(&self, token: &str, barrel: &NewBarrel) -> CoreResult<Barrel>;
    async fn update_barrel(&self, token: &str, id: Id, barrel: &NewBarrel) -> CoreResult<Barrel>;
    async fn delete_barrel(&self, token: &str, id: Id) -> CoreResult<()>;
    async fn set_barrel_mounted(&self, token: &str, id: Id, mounted: bool) -> CoreResult<Barrel>;

    // ---- Consumables ----
    async fn consumables(&self, token: &str) -> CoreResult<Vec<Consumable>>;
    async fn create_consumable(&self, token: &str, consumable: &NewConsumable) -> CoreResult<Consumable>;
    async fn update_consumable(&self, token: &str, id: Id, consumable: &NewConsumable) -> CoreResult<Consumable>;
    async fn delete_consumable(&self, token: &str, id: Id) -> CoreResult<()>;

    // ---- Non-inventoried items ----
    async fn non_inventoried_items(&self, token: &str) -> CoreResult<Vec<NonInventoriedItem>>;
    async fn create_non_inventoried_item(&self, token: &str, item: &NewNonInventoriedItem) -> CoreResult<NonInventoriedItem>;
    async fn update_non_inventoried_item(&self, token: &str, id: Id, item: &NewNonInventoriedItem) -> CoreResult<NonInventoriedItem>;
    async fn delete_non_inventoried_item(&self, token: &str, id: Id) -> CoreResult<()>;

    // ---- Transactions ----
    /// Newest first
    async fn transactions(&self, token: &str, limit: usize, offset: usize) -> CoreResult<Vec<Transaction>>;
    async fn transaction(&self, token: &str, id: Id) -> CoreResult<Transaction>;
    async fn create_transaction(&self, token: &str, transaction: &NewTransaction) -> CoreResult<Transaction>;

    // ---- Accounts ----
    async fn accounts(&self, token: &str) -> CoreResult<Vec<Account>>;
    async fn create_account(&self, token: &str, account: &NewAccount) -> CoreResult<Account>;
    async fn update_account(&self, token: &str, id: Id, account: &NewAccount) -> CoreResult<Account>;
    async fn delete_account(&self, token: &str, id: Id) -> CoreResult<()>;

    // ---- Treasury ----
    async fn treasury(&self, token: &str) -> CoreResult<Treasury>;
}
