//! Form validation
//!
//! Forms arrive as raw strings from `application/x-www-form-urlencoded`
//! bodies. `validate()` collects every field error at once and returns the
//! backend payload when the form is clean.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;
use crate::models::{
    Credentials, Id, NewAccount, NewBarrel, NewConsumable, NewDrink, NewNonInventoriedItem,
};
use crate::types::{PaymentMethod, Role, Trade};

/// One invalid field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All errors of one submitted form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message.as_str())
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join(" ; "))
    }
}

impl From<FormErrors> for CoreError {
    fn from(errors: FormErrors) -> Self {
        CoreError::ValidationError {
            message: errors.to_string(),
        }
    }
}

// ==================== Field parsers ====================

fn required(errors: &mut FormErrors, field: &'static str, label: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, format!("{} est obligatoire", label));
    }
    value.to_string()
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    // Accept the French decimal comma.
    Decimal::from_str(&value.trim().replace(',', ".")).ok()
}

/// Price `>= 0` with at most two decimals
fn price(errors: &mut FormErrors, field: &'static str, label: &str, value: &str) -> Decimal {
    if value.trim().is_empty() {
        errors.push(field, format!("{} est obligatoire", label));
        return Decimal::ZERO;
    }
    match parse_decimal(value) {
        Some(d) if d.is_sign_negative() && !d.is_zero() => {
            errors.push(field, format!("{} doit être positif", label));
            Decimal::ZERO
        }
        Some(d) if d.normalize().scale() > 2 => {
            errors.push(field, format!("{} : deux décimales maximum", label));
            Decimal::ZERO
        }
        Some(d) => d,
        None => {
            errors.push(field, format!("{} doit être un nombre", label));
            Decimal::ZERO
        }
    }
}

fn positive_decimal(errors: &mut FormErrors, field: &'static str, label: &str, value: &str) -> Decimal {
    match parse_decimal(value) {
        Some(d) if d > Decimal::ZERO => d,
        Some(_) => {
            errors.push(field, format!("{} doit être supérieur à 0", label));
            Decimal::ZERO
        }
        None => {
            errors.push(field, format!("{} doit être un nombre", label));
            Decimal::ZERO
        }
    }
}

fn quantity(errors: &mut FormErrors, field: &'static str, label: &str, value: &str) -> u32 {
    match value.trim().parse::<u32>() {
        Ok(q) => q,
        Err(_) => {
            errors.push(field, format!("{} doit être un entier positif", label));
            0
        }
    }
}

fn identifier(errors: &mut FormErrors, field: &'static str, label: &str, value: &str) -> Id {
    match value.trim().parse::<Id>() {
        Ok(id) if id > 0 => id,
        _ => {
            errors.push(field, format!("{} est obligatoire", label));
            0
        }
    }
}

fn choice<T: FromStr>(errors: &mut FormErrors, field: &'static str, label: &str, value: &str) -> Option<T> {
    match value.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(field, format!("{} est invalide", label));
            None
        }
    }
}

// ==================== Forms ====================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, FormErrors> {
        let mut errors = FormErrors::default();
        let username = required(&mut errors, "username", "L'identifiant", &self.username);
        if self.password.is_empty() {
            errors.push("password", "Le mot de passe est obligatoire");
        }
        errors.into_result(|| Credentials {
            username,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DrinkForm {
    pub name: String,
    pub description: String,
}

impl DrinkForm {
    pub fn validate(&self) -> Result<NewDrink, FormErrors> {
        let mut errors = FormErrors::default();
        let name = required(&mut errors, "name", "Le nom", &self.name);
        errors.into_result(|| NewDrink {
            name,
            description: optional(&self.description),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BarrelForm {
    pub drink_id: String,
    pub volume: String,
    pub buy_price: String,
    pub sell_price: String,
}

impl BarrelForm {
    pub fn validate(&self) -> Result<NewBarrel, FormErrors> {
        let mut errors = FormErrors::default();
        let drink_id = identifier(&mut errors, "drink_id", "La boisson", &self.drink_id);
        let volume = positive_decimal(&mut errors, "volume", "Le volume", &self.volume);
        let buy_price = price(&mut errors, "buy_price", "Le prix d'achat", &self.buy_price);
        let sell_price = price(&mut errors, "sell_price", "Le prix du verre", &self.sell_price);
        errors.into_result(|| NewBarrel {
            drink_id,
            volume,
            buy_price,
            sell_price,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConsumableForm {
    pub name: String,
    pub quantity: String,
    pub buy_price: String,
    pub sell_price: String,
}

impl ConsumableForm {
    pub fn validate(&self) -> Result<NewConsumable, FormErrors> {
        let mut errors = FormErrors::default();
        let name = required(&mut errors, "name", "Le nom", &self.name);
        let quantity = quantity(&mut errors, "quantity", "La quantité", &self.quantity);
        let buy_price = price(&mut errors, "buy_price", "Le prix d'achat", &self.buy_price);
        let sell_price = price(&mut errors, "sell_price", "Le prix de vente", &self.sell_price);
        errors.into_result(|| NewConsumable {
            name,
            quantity,
            buy_price,
            sell_price,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NonInventoriedItemForm {
    pub name: String,
    pub trade: String,
    pub price: String,
}

impl NonInventoriedItemForm {
    pub fn validate(&self) -> Result<NewNonInventoriedItem, FormErrors> {
        let mut errors = FormErrors::default();
        let name = required(&mut errors, "name", "Le nom", &self.name);
        let trade = choice::<Trade>(&mut errors, "trade", "Le sens", &self.trade);
        let price = price(&mut errors, "price", "Le prix", &self.price);
        match trade {
            Some(trade) => errors.into_result(|| NewNonInventoriedItem { name, trade, price }),
            None => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    /// Checkbox: "on" when ticked, absent otherwise
    pub active: String,
    pub password: String,
}

impl AccountForm {
    /// `creating` makes the password mandatory
    pub fn validate(&self, creating: bool) -> Result<NewAccount, FormErrors> {
        let mut errors = FormErrors::default();
        let username = required(&mut errors, "username", "L'identifiant", &self.username);
        let email = self.email.trim().to_string();
        if !is_email(&email) {
            errors.push("email", "L'adresse e-mail est invalide");
        }
        let role = choice::<Role>(&mut errors, "role", "Le rôle", &self.role);

        // Stored exactly as typed, like the login form sends it
        let password = (!self.password.trim().is_empty()).then(|| self.password.clone());
        match &password {
            None if creating => errors.push("password", "Le mot de passe est obligatoire"),
            Some(p) if p.chars().count() < 8 => {
                errors.push("password", "Le mot de passe doit faire au moins 8 caractères")
            }
            _ => {}
        }

        match role {
            Some(role) => errors.into_result(|| NewAccount {
                username,
                email,
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                role,
                active: !self.active.is_empty(),
                password,
            }),
            None => Err(errors),
        }
    }
}

fn is_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && !domain.is_empty(),
        _ => false,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub payment_method: String,
}

impl CheckoutForm {
    pub fn validate(&self) -> Result<PaymentMethod, FormErrors> {
        let mut errors = FormErrors::default();
        match choice::<PaymentMethod>(&mut errors, "payment_method", "Le moyen de paiement", &self.payment_method) {
            Some(method) => Ok(method),
            None => Err(errors),
        }
    }
}
