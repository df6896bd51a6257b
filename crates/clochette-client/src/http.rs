//! REST client for the Clochette backend

use async_trait::async_trait;
use clochette_config::BackendConfig;
use clochette_core::{
    Account, AuthToken, BackendApi, Barrel, Consumable, CoreError, CoreResult, Credentials, Drink,
    Id, NewAccount, NewBarrel, NewConsumable, NewDrink, NewNonInventoriedItem, NewTransaction,
    NonInventoriedItem, Transaction, Treasury,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::error::{status_error, transport_error};

/// `BackendApi` over HTTP with bearer authentication
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> CoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::InternalError {
                message: format!("HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn request(&self, method: Method, token: &str, path: &str) -> RequestBuilder {
        log::debug!("{} {}", method, path);
        self.client.request(method, self.config.url(path)).bearer_auth(token)
    }

    /// Send and check the status; returns the raw body of a 2xx answer
    async fn send(&self, request: RequestBuilder, path: &str) -> CoreResult<String> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status.is_success() {
            Ok(body)
        } else {
            log::warn!("{} answered {}", path, status);
            Err(status_error(status.as_u16(), &body, path))
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> CoreResult<T> {
        let body = self.send(request, path).await?;
        serde_json::from_str(&body).map_err(|e| CoreError::InvalidFormat {
            message: format!("{}: {}", path, e),
        })
    }

    async fn get<T: DeserializeOwned>(&self, token: &str, path: &str) -> CoreResult<T> {
        self.fetch(self.request(Method::GET, token, path), path).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, token: &str, path: &str, body: &B) -> CoreResult<T> {
        self.fetch(self.request(Method::POST, token, path).json(body), path).await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, token: &str, path: &str, body: &B) -> CoreResult<T> {
        self.fetch(self.request(Method::PUT, token, path).json(body), path).await
    }

    async fn delete(&self, token: &str, path: &str) -> CoreResult<()> {
        self.send(self.request(Method::DELETE, token, path), path).await?;
        Ok(())
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> CoreResult<AuthToken> {
        let login_path = &self.config.login_path;
        log::debug!("POST {}", login_path);
        let request = self
            .client
            .post(self.config.url(login_path))
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ]);
        self.fetch(request, login_path).await
    }

    async fn current_account(&self, token: &str) -> CoreResult<Account> {
        self.get(token, "/account/me").await
    }

    async fn drinks(&self, token: &str) -> CoreResult<Vec<Drink>> {
        self.get(token, "/drink/").await
    }

    async fn create_drink(&self, token: &str, drink: &NewDrink) -> CoreResult<Drink> {
        self.post(token, "/drink/", drink).await
    }

    async fn update_drink(&self, token: &str, id: Id, drink: &NewDrink) -> CoreResult<Drink> {
        self.put(token, &format!("/drink/{}", id), drink).await
    }

    async fn delete_drink(&self, token: &str, id: Id) -> CoreResult<()> {
        self.delete(token, &format!("/drink/{}", id)).await
    }

    async fn barrels(&self, token: &str) -> CoreResult<Vec<Barrel>> {
        self.get(token, "/barrel/").await
    }

    async fn create_barrel(&self, token: &str, barrel: &NewBarrel) -> CoreResult<Barrel> {
        self.post(token, "/barrel/", barrel).await
    }

    async fn update_barrel(&self, token: &str, id: Id, barrel: &NewBarrel) -> CoreResult<Barrel> {
        self.put(token, &format!("/barrel/{}", id), barrel).await
    }

    async fn delete_barrel(&self, token: &str, id: Id) -> CoreResult<()> {
        self.delete(token, &format!("/barrel/{}", id)).await
    }

    async fn set_barrel_mounted(&self, token: &str, id: Id, mounted: bool) -> CoreResult<Barrel> {
        let action = if mounted { "mount" } else { "unmount" };
        let path = format!("/barrel/{}/{}", id, action);
        self.fetch(self.request(Method::POST, token, &path), &path).await
    }

    async fn consumables(&self, token: &str) -> CoreResult<Vec<Consumable>> {
        self.get(token, "/consumable/").await
    }

    async fn create_consumable(&self, token: &str, consumable: &NewConsumable) -> CoreResult<Consumable> {
        self.post(token, "/consumable/", consumable).await
    }

    async fn update_consumable(&self, token: &str, id: Id, consumable: &NewConsumable) -> CoreResult<Consumable> {
        self.put(token, &format!("/consumable/{}", id), consumable).await
    }

    async fn delete_consumable(&self, token: &str, id: Id) -> CoreResult<()> {
        self.delete(token, &format!("/consumable/{}", id)).await
    }

    async fn non_inventoried_items(&self, token: &str) -> CoreResult<Vec<NonInventoriedItem>> {
        self.get(token, "/non_inventoried/").await
    }

    async fn create_non_inventoried_item(&self, token: &str, item: &NewNonInventoriedItem) -> CoreResult<NonInventoriedItem> {
        self.post(token, "/non_inventoried/", item).await
    }

    async fn update_non_inventoried_item(&self, token: &str, id: Id, item: &NewNonInventoriedItem) -> CoreResult<NonInventoriedItem> {
        self.put(token, &format!("/non_inventoried/{}", id), item).await
    }

    async fn delete_non_inventoried_item(&self, token: &str, id: Id) -> CoreResult<()> {
        self.delete(token, &format!("/non_inventoried/{}", id)).await
    }

    async fn transactions(&self, token: &str, limit: usize, offset: usize) -> CoreResult<Vec<Transaction>> {
        let path = "/transaction/";
        let request = self
            .request(Method::GET, token, path)
            .query(&[("limit", limit), ("offset", offset)]);
        self.fetch(request, path).await
    }

    async fn transaction(&self, token: &str, id: Id) -> CoreResult<Transaction> {
        self.get(token, &format!("/transaction/{}", id)).await
    }

    async fn create_transaction(&self, token: &str, transaction: &NewTransaction) -> CoreResult<Transaction> {
        log::info!(
            "Submitting {} of {} line(s) via {}",
            transaction.kind,
            transaction.items.len(),
            transaction.payment_method
        );
        self.post(token, "/transaction/", transaction).await
    }

    async fn accounts(&self, token: &str) -> CoreResult<Vec<Account>> {
        self.get(token, "/account/").await
    }

    async fn create_account(&self, token: &str, account: &NewAccount) -> CoreResult<Account> {
        self.post(token, "/account/", account).await
    }

    async fn update_account(&self, token: &str, id: Id, account: &NewAccount) -> CoreResult<Account> {
        self.put(token, &format!("/account/{}", id), account).await
    }

    async fn delete_account(&self, token: &str, id: Id) -> CoreResult<()> {
        self.delete(token, &format!("/account/{}", id)).await
    }

    async fn treasury(&self, token: &str) -> CoreResult<Treasury> {
        self.get(token, "/treasury/").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> BackendConfig {
        BackendConfig {
            base_url: base_url.to_string(),
            timeout_secs: 2,
            login_path: "/auth/token".to_string(),
        }
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let backend = HttpBackend::new(&config("http://bar.local/api/v1/")).unwrap();
        assert_eq!(backend.config.url("/drink/"), "http://bar.local/api/v1/drink/");
        assert_eq!(backend.config.url("treasury/"), "http://bar.local/api/v1/treasury/");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) is closed on test machines.
        let backend = HttpBackend::new(&config("http://127.0.0.1:9")).unwrap();
        let result = backend.drinks("token").await;
        assert!(matches!(result, Err(CoreError::Transport { .. })));
    }
}
