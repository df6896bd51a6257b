//! In-process backend
//!
//! Serves `--offline` runs and the HTTP handler tests. Every seeded
//! account logs in with `DEFAULT_PASSWORD`; tokens are `memory:<username>`.

use async_trait::async_trait;
use chrono::Local;
use clochette_core::{
    Account, AuthToken, BackendApi, Barrel, Consumable, CoreError, CoreResult, Credentials, Drink,
    Id, ItemType, NewAccount, NewBarrel, NewConsumable, NewDrink, NewNonInventoriedItem,
    NewTransaction, NonInventoriedItem, PaymentMethod, Role, Trade, Transaction, TransactionItem,
    TransactionKind, Treasury,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;

pub const DEFAULT_PASSWORD: &str = "clochette";

const TOKEN_PREFIX: &str = "memory:";

#[derive(Debug, Default)]
struct Store {
    next_id: Id,
    drinks: Vec<Drink>,
    barrels: Vec<Barrel>,
    consumables: Vec<Consumable>,
    items: Vec<NonInventoriedItem>,
    transactions: Vec<Transaction>,
    accounts: Vec<Account>,
    passwords: HashMap<Id, String>,
    treasury: Treasury,
}

impl Store {
    fn allocate(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn drink_name(&self, drink_id: Id) -> CoreResult<String> {
        self.drinks
            .iter()
            .find(|d| d.id == drink_id)
            .map(|d| d.name.clone())
            .ok_or_else(|| not_found("drink", drink_id))
    }

    fn account_for(&self, token: &str) -> CoreResult<&Account> {
        let username = token.strip_prefix(TOKEN_PREFIX).ok_or(CoreError::Unauthorized)?;
        self.accounts
            .iter()
            .find(|a| a.username == username && a.active)
            .ok_or(CoreError::Unauthorized)
    }

    fn require_manager(&self, token: &str) -> CoreResult<()> {
        if self.account_for(token)?.role.can_manage() {
            Ok(())
        } else {
            Err(CoreError::Forbidden {
                message: "Opération réservée aux gestionnaires".to_string(),
            })
        }
    }

    fn item_name(&self, item_type: ItemType, item_id: Id) -> CoreResult<String> {
        let name = match item_type {
            ItemType::Glass | ItemType::Barrel => self
                .barrels
                .iter()
                .find(|b| b.id == item_id)
                .map(|b| b.drink_name.clone()),
            ItemType::Consumable => self
                .consumables
                .iter()
                .find(|c| c.id == item_id)
                .map(|c| c.name.clone()),
            ItemType::NonInventoried => self
                .items
                .iter()
                .find(|i| i.id == item_id)
                .map(|i| i.name.clone()),
        };
        name.ok_or_else(|| not_found(&item_type.to_string(), item_id))
    }

    /// Apply stock movements of a transaction; all-or-nothing
    fn move_stock(&mut self, transaction: &NewTransaction) -> CoreResult<()> {
        if transaction.kind == TransactionKind::Sale {
            for line in transaction.items.iter().filter(|l| l.item_type == ItemType::Consumable) {
                let consumable = self
                    .consumables
                    .iter()
                    .find(|c| c.id == line.item_id)
                    .ok_or_else(|| not_found("consumable", line.item_id))?;
                if consumable.quantity < line.quantity {
                    return Err(CoreError::Api {
                        status: 400,
                        message: format!("Stock insuffisant : {}", consumable.name),
                    });
                }
            }
        }

        for line in &transaction.items {
            match (transaction.kind, line.item_type) {
                (TransactionKind::Sale, ItemType::Consumable) => {
                    if let Some(c) = self.consumables.iter_mut().find(|c| c.id == line.item_id) {
                        c.quantity -= line.quantity;
                        c.empty = c.quantity == 0;
                    }
                }
                (TransactionKind::Purchase, ItemType::Consumable) => {
                    if let Some(c) = self.consumables.iter_mut().find(|c| c.id == line.item_id) {
                        c.quantity += line.quantity;
                        c.empty = false;
                    }
                }
                (TransactionKind::Purchase, ItemType::Barrel) => {
                    let template = self
                        .barrels
                        .iter()
                        .find(|b| b.id == line.item_id)
                        .cloned()
                        .ok_or_else(|| not_found("barrel", line.item_id))?;
                    for _ in 0..line.quantity {
                        let id = self.allocate();
                        self.barrels.push(Barrel {
                            id,
                            buy_price: line.unit_price,
                            is_mounted: false,
                            empty: false,
                            ..template.clone()
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn not_found(resource: &str, id: Id) -> CoreError {
    CoreError::NotFound {
        resource: format!("{} {}", resource, id),
    }
}

fn position<T>(list: &[T], id: Id, key: impl Fn(&T) -> Id, resource: &str) -> CoreResult<usize> {
    list.iter().position(|x| key(x) == id).ok_or_else(|| not_found(resource, id))
}

/// Seeded in-memory `BackendApi`
#[derive(Debug)]
pub struct MemoryBackend {
    store: RwLock<Store>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::seeded()
    }
}

impl MemoryBackend {
    /// Token issued to `username` by `login`
    pub fn token_for(username: &str) -> String {
        format!("{}{}", TOKEN_PREFIX, username)
    }

    /// A small bar: two drinks, a mounted barrel, a few consumables, an
    /// EcoCup deposit and three accounts (`admin`, `tresorier`, `barman`).
    pub fn seeded() -> Self {
        let mut store = Store::default();

        for (name, description) in [("Blonde", "Bière blonde pression"), ("Cidre", "Cidre brut")] {
            let id = store.allocate();
            store.drinks.push(Drink {
                id,
                name: name.to_string(),
                description: Some(description.to_string()),
            });
        }

        let drinks = store.drinks.clone();
        for (drink, mounted) in drinks.iter().zip([true, false]) {
            let id = store.allocate();
            store.barrels.push(Barrel {
                id,
                drink_id: drink.id,
                drink_name: drink.name.clone(),
                volume: Decimal::from(30),
                buy_price: Decimal::from(90),
                sell_price: Decimal::new(250, 2),
                is_mounted: mounted,
                empty: false,
            });
        }

        for (name, quantity, buy, sell) in [("Chips", 24, 50, 100), ("Coca", 3, 60, 150), ("Mars", 0, 40, 100)] {
            let id = store.allocate();
            store.consumables.push(Consumable {
                id,
                name: name.to_string(),
                quantity,
                buy_price: Decimal::new(buy, 2),
                sell_price: Decimal::new(sell, 2),
                empty: quantity == 0,
            });
        }

        for (name, trade, price) in [("EcoCup", Trade::Sell, 100), ("Glaçons", Trade::Buy, 500)] {
            let id = store.allocate();
            store.items.push(NonInventoriedItem {
                id,
                name: name.to_string(),
                trade,
                price: Decimal::new(price, 2),
            });
        }

        for (username, first, last, role) in [
            ("admin", "Alex", "Martin", Role::Admin),
            ("tresorier", "Camille", "Durand", Role::Treasurer),
            ("barman", "Sacha", "Petit", Role::Staff),
        ] {
            let id = store.allocate();
            store.accounts.push(Account {
                id,
                username: username.to_string(),
                email: format!("{}@clochette.local", username),
                first_name: first.to_string(),
                last_name: last.to_string(),
                role,
                active: true,
            });
            store.passwords.insert(id, DEFAULT_PASSWORD.to_string());
        }

        store.treasury = Treasury {
            id: 1,
            total_amount: Decimal::new(125000, 2),
            cash_amount: Decimal::new(30000, 2),
            card_amount: Decimal::new(80000, 2),
            lydia_amount: Decimal::new(15000, 2),
        };

        Self {
            store: RwLock::new(store),
        }
    }
}

#[async_trait]
impl BackendApi for MemoryBackend {
    async fn login(&self, credentials: &Credentials) -> CoreResult<AuthToken> {
        let store = self.store.read().await;
        let account = store
            .accounts
            .iter()
            .find(|a| a.username == credentials.username && a.active)
            .filter(|a| store.passwords.get(&a.id).map(String::as_str) == Some(credentials.password.as_str()))
            .ok_or(CoreError::Unauthorized)?;

        Ok(AuthToken {
            access_token: Self::token_for(&account.username),
            token_type: "bearer".to_string(),
        })
    }

    async fn current_account(&self, token: &str) -> CoreResult<Account> {
        self.store.read().await.account_for(token).cloned()
    }

    async fn drinks(&self, token: &str) -> CoreResult<Vec<Drink>> {
        let store = self.store.read().await;
        store.account_for(token)?;
        Ok(store.drinks.clone())
    }

    async fn create_drink(&self, token: &str, drink: &NewDrink) -> CoreResult<Drink> {
        let mut store = self.store.write().await;
        store.account_for(token)?;
        let created = Drink {
            id: store.allocate(),
            name: drink.name.clone(),
            description: drink.description.clone(),
        };
        store.drinks.push(created.clone());
        Ok(created)
    }

    async fn update_drink(&self, token: &str, id: Id, drink: &NewDrink) -> CoreResult<Drink> {
        let mut store = self.store.write().await;
        store.account_for(token)?;
        let index = position(&store.drinks, id, |d| d.id, "drink")?;
        store.drinks[index].name = drink.name.clone();
        store.drinks[index].description = drink.description.clone();
        for barrel in store.barrels.iter_mut().filter(|b| b.drink_id == id) {
            barrel.drink_name = drink.name.clone();
        }
        Ok(store.drinks[index].clone())
    }

    async fn delete_drink(&self, token: &str, id: Id) -> CoreResult<()> {
        let mut store = self.store.write().await;
        store.account_for(token)?;
        let index = position(&store.drinks, id, |d| d.id, "drink")?;
        if store.barrels.iter().any(|b| b.drink_id == id) {
            return Err(CoreError::Api {
                status: 409,
                message: "Des fûts utilisent encore cette boisson".to_string(),
            });
        }
        store.drinks.remove(index);
        Ok(())
    }

    async fn barrels(&self, token: &str) -> CoreResult<Vec<Barrel>> {
        let store = self.store.read().await;
        store.account_for(token)?;
        Ok(store.barrels.clone())
    }

    async fn create_barrel(&self, token: &str, barrel: &NewBarrel) -> CoreResult<Barrel> {
        let mut store = self.store.write().await;
        store.account_for(token)?;
        let drink_name = store.drink_name(barrel.drink_id)?;
        let created = Barrel {
            id: store.allocate(),
            drink_id: barrel.drink_id,
            drink_name,
            volume: barrel.volume,
            buy_price: barrel.buy_price,
            sell_price: barrel.sell_price,
            is_mounted: false,
            empty: false,
        };
        store.barrels.push(created.clone());
        Ok(created)
    }

    async fn update_barrel(&self, token: &str, id: Id, barrel: &NewBarrel) -> CoreResult<Barrel> {
        let mut store = self.store.write().await;
        store.account_for(token)?;
        let drink_name = store.drink_name(barrel.drink_id)?;
        let index = position(&store.barrels, id, |b| b.id, "barrel")?;
        let target = &mut store.barrels[index];
        target.drink_id = barrel.drink_id;
        target.drink_name = drink_name;
        target.volume = barrel.volume;
        target.buy_price = barrel.buy_price;
        target.sell_price = barrel.sell_price;
        Ok(target.clone())
    }

    async fn delete_barrel(&self, token: &str, id: Id) -> CoreResult<()> {
        let mut store = self.store.write().await;
        store.account_for(token)?;
        let index = position(&store.barrels, id, |b| b.id, "barrel")?;
        store.barrels.remove(index);
        Ok(())
    }

    async fn set_barrel_mounted(&self, token: &str, id: Id, mounted: bool) -> CoreResult<Barrel> {
        let mut store = self.store.write().await;
        store.account_for(token)?;
        let index = position(&store.barrels, id, |b| b.id, "barrel")?;
        let target = &mut store.barrels[index];
        if mounted && target.empty {
            return Err(CoreError::Api {
                status: 400,
                message: "Impossible de monter un fût vide".to_string(),
            });
        }
        // Unmounting a barrel means it has been drained.
        if target.is_mounted && !mounted {
            target.empty = true;
        }
        target.is_mounted = mounted;
        Ok(target.clone())
    }

    async fn consumables(&self, token: &str) -> CoreResult<Vec<Consumable>> {
        let store = self.store.read().await;
        store.account_for(token)?;
        Ok(store.consumables.clone())
    }

    async fn create_consumable(&self, token: &str, consumable: &NewConsumable) -> CoreResult<Consumable> {
        let mut store = self.store.write().await;
        store.account_for(token)?;
        let created = Consumable {
            id: store.allocate(),
            name: consumable.name.clone(),
            quantity: consumable.quantity,
            buy_price: consumable.buy_price,
            sell_price: consumable.sell_price,
            empty: consumable.quantity == 0,
        };
        store.consumables.push(created.clone());
        Ok(created)
    }

    async fn update_consumable(&self, token: &str, id: Id, consumable: &NewConsumable) -> CoreResult<Consumable> {
        let mut store = self.store.write().await;
        store.account_for(token)?;
        let index = position(&store.consumables, id, |c| c.id, "consumable")?;
        let target = &mut store.consumables[index];
        target.name = consumable.name.clone();
        target.quantity = consumable.quantity;
        target.buy_price = consumable.buy_price;
        target.sell_price = consumable.sell_price;
        target.empty = consumable.quantity == 0;
        Ok(target.clone())
    }

    async fn delete_consumable(&self, token: &str, id: Id) -> CoreResult<()> {
        let mut store = self.store.write().await;
        store.account_for(token)?;
        let index = position(&store.consumables, id, |c| c.id, "consumable")?;
        store.consumables.remove(index);
        Ok(())
    }

    async fn non_inventoried_items(&self, token: &str) -> CoreResult<Vec<NonInventoriedItem>> {
        let store = self.store.read().await;
        store.account_for(token)?;
        Ok(store.items.clone())
    }

    async fn create_non_inventoried_item(&self, token: &str, item: &NewNonInventoriedItem) -> CoreResult<NonInventoriedItem> {
        let mut store = self.store.write().await;
        store.account_for(token)?;
        let created = NonInventoriedItem {
            id: store.allocate(),
            name: item.name.clone(),
            trade: item.trade,
            price: item.price,
        };
        store.items.push(created.clone());
        Ok(created)
    }

    async fn update_non_inventoried_item(&self, token: &str, id: Id, item: &NewNonInventoriedItem) -> CoreResult<NonInventoriedItem> {
        let mut store = self.store.write().await;
        store.account_for(token)?;
        let index = position(&store.items, id, |i| i.id, "non_inventoried")?;
        let target = &mut store.items[index];
        target.name = item.name.clone();
        target.trade = item.trade;
        target.price = item.price;
        Ok(target.clone())
    }

    async fn delete_non_inventoried_item(&self, token: &str, id: Id) -> CoreResult<()> {
        let mut store = self.store.write().await;
        store.account_for(token)?;
        let index = position(&store.items, id, |i| i.id, "non_inventoried")?;
        store.items.remove(index);
        Ok(())
    }

    async fn transactions(&self, token: &str, limit: usize, offset: usize) -> CoreResult<Vec<Transaction>> {
        let store = self.store.read().await;
        store.account_for(token)?;
        let mut all = store.transactions.clone();
        all.sort_by(|a, b| b.datetime.cmp(&a.datetime).then_with(|| b.id.cmp(&a.id)));
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    async fn transaction(&self, token: &str, id: Id) -> CoreResult<Transaction> {
        let store = self.store.read().await;
        store.account_for(token)?;
        store
            .transactions
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| not_found("transaction", id))
    }

    async fn create_transaction(&self, token: &str, transaction: &NewTransaction) -> CoreResult<Transaction> {
        let mut store = self.store.write().await;
        let author = store.account_for(token)?.username.clone();

        if transaction.items.is_empty() {
            return Err(CoreError::Api {
                status: 400,
                message: "Transaction sans article".to_string(),
            });
        }

        let mut items = Vec::with_capacity(transaction.items.len());
        for line in &transaction.items {
            items.push(TransactionItem {
                item_type: line.item_type,
                item_id: line.item_id,
                name: store.item_name(line.item_type, line.item_id)?,
                quantity: line.quantity,
                unit_price: line.unit_price,
            });
        }

        store.move_stock(transaction)?;

        let amount = transaction.total();
        let delta = match transaction.kind {
            TransactionKind::Sale => amount,
            TransactionKind::Purchase => -amount,
        };
        store.treasury.apply(transaction.payment_method, delta);

        let created = Transaction {
            id: store.allocate(),
            datetime: Local::now().naive_local(),
            kind: transaction.kind,
            payment_method: transaction.payment_method,
            amount,
            author,
            description: None,
            items,
        };
        store.transactions.push(created.clone());
        log::info!("Recorded {} #{} of {}", created.kind, created.id, created.amount);
        Ok(created)
    }

    async fn accounts(&self, token: &str) -> CoreResult<Vec<Account>> {
        let store = self.store.read().await;
        store.require_manager(token)?;
        Ok(store.accounts.clone())
    }

    async fn create_account(&self, token: &str, account: &NewAccount) -> CoreResult<Account> {
        let mut store = self.store.write().await;
        store.require_manager(token)?;
        if store.accounts.iter().any(|a| a.username == account.username) {
            return Err(CoreError::Api {
                status: 409,
                message: format!("L'identifiant {} est déjà pris", account.username),
            });
        }
        let password = account.password.clone().ok_or_else(|| CoreError::Api {
            status: 422,
            message: "Mot de passe requis".to_string(),
        })?;

        let created = Account {
            id: store.allocate(),
            username: account.username.clone(),
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            role: account.role,
            active: account.active,
        };
        store.passwords.insert(created.id, password);
        store.accounts.push(created.clone());
        Ok(created)
    }

    async fn update_account(&self, token: &str, id: Id, account: &NewAccount) -> CoreResult<Account> {
        let mut store = self.store.write().await;
        store.require_manager(token)?;
        let index = position(&store.accounts, id, |a| a.id, "account")?;
        if let Some(password) = &account.password {
            store.passwords.insert(id, password.clone());
        }
        let target = &mut store.accounts[index];
        target.username = account.username.clone();
        target.email = account.email.clone();
        target.first_name = account.first_name.clone();
        target.last_name = account.last_name.clone();
        target.role = account.role;
        target.active = account.active;
        Ok(target.clone())
    }

    async fn delete_account(&self, token: &str, id: Id) -> CoreResult<()> {
        let mut store = self.store.write().await;
        store.require_manager(token)?;
        if store.account_for(token)?.id == id {
            return Err(CoreError::Api {
                status: 400,
                message: "Impossible de supprimer son propre compte".to_string(),
            });
        }
        let index = position(&store.accounts, id, |a| a.id, "account")?;
        store.accounts.remove(index);
        store.passwords.remove(&id);
        Ok(())
    }

    async fn treasury(&self, token: &str) -> CoreResult<Treasury> {
        let store = self.store.read().await;
        store.account_for(token)?;
        Ok(store.treasury.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clochette_core::NewTransactionItem;

    fn admin() -> String {
        MemoryBackend::token_for("admin")
    }

    async fn consumable(backend: &MemoryBackend, name: &str) -> Consumable {
        backend
            .consumables(&admin())
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.name == name)
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_checks_password() {
        let backend = MemoryBackend::seeded();
        let ok = backend
            .login(&Credentials { username: "barman".to_string(), password: DEFAULT_PASSWORD.to_string() })
            .await
            .unwrap();
        assert_eq!(ok.access_token, MemoryBackend::token_for("barman"));

        let bad = backend
            .login(&Credentials { username: "barman".to_string(), password: "nope".to_string() })
            .await;
        assert_eq!(bad, Err(CoreError::Unauthorized));
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthorized() {
        let backend = MemoryBackend::seeded();
        assert_eq!(backend.drinks("forged").await, Err(CoreError::Unauthorized));
        assert_eq!(backend.treasury(&MemoryBackend::token_for("ghost")).await, Err(CoreError::Unauthorized));
    }

    #[tokio::test]
    async fn test_sale_decrements_stock_and_credits_treasury() {
        let backend = MemoryBackend::seeded();
        let chips = consumable(&backend, "Chips").await;
        let before = backend.treasury(&admin()).await.unwrap();

        let tx = backend
            .create_transaction(
                &admin(),
                &NewTransaction {
                    kind: TransactionKind::Sale,
                    payment_method: PaymentMethod::Lydia,
                    items: vec![NewTransactionItem {
                        item_type: ItemType::Consumable,
                        item_id: chips.id,
                        quantity: 4,
                        unit_price: chips.sell_price,
                    }],
                },
            )
            .await
            .unwrap();

        assert_eq!(tx.amount, Decimal::from(4));
        assert_eq!(tx.author, "admin");
        assert_eq!(tx.items[0].name, "Chips");
        assert_eq!(consumable(&backend, "Chips").await.quantity, chips.quantity - 4);

        let after = backend.treasury(&admin()).await.unwrap();
        assert_eq!(after.lydia_amount - before.lydia_amount, Decimal::from(4));
        assert_eq!(after.total_amount - before.total_amount, Decimal::from(4));
    }

    #[tokio::test]
    async fn test_sale_beyond_stock_is_rejected_without_side_effects() {
        let backend = MemoryBackend::seeded();
        let coca = consumable(&backend, "Coca").await;
        let before = backend.treasury(&admin()).await.unwrap();

        let result = backend
            .create_transaction(
                &admin(),
                &NewTransaction {
                    kind: TransactionKind::Sale,
                    payment_method: PaymentMethod::Cash,
                    items: vec![NewTransactionItem {
                        item_type: ItemType::Consumable,
                        item_id: coca.id,
                        quantity: coca.quantity + 1,
                        unit_price: coca.sell_price,
                    }],
                },
            )
            .await;

        assert!(matches!(result, Err(CoreError::Api { status: 400, .. })));
        assert_eq!(consumable(&backend, "Coca").await.quantity, coca.quantity);
        assert_eq!(backend.treasury(&admin()).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_purchase_restocks_and_debits_treasury() {
        let backend = MemoryBackend::seeded();
        let mars = consumable(&backend, "Mars").await;
        assert!(mars.empty);
        let barrels_before = backend.barrels(&admin()).await.unwrap();
        let barrel = barrels_before[0].clone();

        backend
            .create_transaction(
                &admin(),
                &NewTransaction {
                    kind: TransactionKind::Purchase,
                    payment_method: PaymentMethod::Card,
                    items: vec![
                        NewTransactionItem {
                            item_type: ItemType::Consumable,
                            item_id: mars.id,
                            quantity: 10,
                            unit_price: mars.buy_price,
                        },
                        NewTransactionItem {
                            item_type: ItemType::Barrel,
                            item_id: barrel.id,
                            quantity: 2,
                            unit_price: Decimal::from(85),
                        },
                    ],
                },
            )
            .await
            .unwrap();

        let restocked = consumable(&backend, "Mars").await;
        assert_eq!(restocked.quantity, 10);
        assert!(!restocked.empty);

        let barrels_after = backend.barrels(&admin()).await.unwrap();
        assert_eq!(barrels_after.len(), barrels_before.len() + 2);
        assert!(barrels_after.iter().rev().take(2).all(|b| !b.is_mounted && b.drink_id == barrel.drink_id));

        let treasury = backend.treasury(&admin()).await.unwrap();
        assert_eq!(treasury.card_amount, Decimal::new(80000, 2) - Decimal::from(174));
    }

    #[tokio::test]
    async fn test_transactions_newest_first_with_paging() {
        let backend = MemoryBackend::seeded();
        let chips = consumable(&backend, "Chips").await;
        for quantity in 1..=3 {
            backend
                .create_transaction(
                    &admin(),
                    &NewTransaction {
                        kind: TransactionKind::Sale,
                        payment_method: PaymentMethod::Cash,
                        items: vec![NewTransactionItem {
                            item_type: ItemType::Consumable,
                            item_id: chips.id,
                            quantity,
                            unit_price: chips.sell_price,
                        }],
                    },
                )
                .await
                .unwrap();
        }

        let page = backend.transactions(&admin(), 2, 0).await.unwrap();
        assert_eq!(page.len(), 2);
        assert!(page[0].id > page[1].id);
        let rest = backend.transactions(&admin(), 2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_accounts_require_manager_role() {
        let backend = MemoryBackend::seeded();
        assert_eq!(
            backend.accounts(&MemoryBackend::token_for("barman")).await,
            Err(CoreError::Forbidden {
                message: "Opération réservée aux gestionnaires".to_string(),
            })
        );
        assert_eq!(backend.accounts(&MemoryBackend::token_for("tresorier")).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_drink_in_use_cannot_be_deleted() {
        let backend = MemoryBackend::seeded();
        let drink = backend.drinks(&admin()).await.unwrap()[0].clone();
        let result = backend.delete_drink(&admin(), drink.id).await;
        assert!(matches!(result, Err(CoreError::Api { status: 409, .. })));
    }

    #[tokio::test]
    async fn test_unmount_marks_barrel_empty() {
        let backend = MemoryBackend::seeded();
        let mounted = backend
            .barrels(&admin())
            .await
            .unwrap()
            .into_iter()
            .find(|b| b.is_mounted)
            .unwrap();
        let unmounted = backend.set_barrel_mounted(&admin(), mounted.id, false).await.unwrap();
        assert!(unmounted.empty);
        let again = backend.set_barrel_mounted(&admin(), mounted.id, true).await;
        assert!(matches!(again, Err(CoreError::Api { status: 400, .. })));
    }
}
