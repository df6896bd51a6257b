//! Report structures for the dashboard and treasury pages

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Barrel, Consumable, Transaction, Treasury};
use crate::time::{TimeContext, TimeFilter};
use crate::types::{PaymentMethod, TransactionKind};

/// Totals of one payment method over a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodTotal {
    pub payment_method: PaymentMethod,
    pub sales: Decimal,
    pub purchases: Decimal,
}

/// Sales and purchases over a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub description: String,
    pub sales_total: Decimal,
    pub purchases_total: Decimal,
    /// Sales minus purchases
    pub net: Decimal,
    pub transaction_count: usize,
    pub by_method: Vec<MethodTotal>,
}

impl PeriodSummary {
    pub fn from_transactions(transactions: &[Transaction], context: &TimeContext, today: NaiveDate) -> Self {
        let mut by_method: Vec<MethodTotal> = PaymentMethod::ALL
            .iter()
            .map(|m| MethodTotal {
                payment_method: *m,
                sales: Decimal::ZERO,
                purchases: Decimal::ZERO,
            })
            .collect();

        let mut sales_total = Decimal::ZERO;
        let mut purchases_total = Decimal::ZERO;
        let mut transaction_count = 0;

        for tx in transactions.iter().filter(|tx| tx.filter_by_time(context, today)) {
            transaction_count += 1;
            let slot = by_method.iter_mut().find(|m| m.payment_method == tx.payment_method);
            match tx.kind {
                TransactionKind::Sale => {
                    sales_total += tx.amount;
                    if let Some(slot) = slot {
                        slot.sales += tx.amount;
                    }
                }
                TransactionKind::Purchase => {
                    purchases_total += tx.amount;
                    if let Some(slot) = slot {
                        slot.purchases += tx.amount;
                    }
                }
            }
        }

        Self {
            description: context.description(),
            sales_total,
            purchases_total,
            net: sales_total - purchases_total,
            transaction_count,
            by_method,
        }
    }
}

/// A consumable running low
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAlert {
    pub consumable_id: i64,
    pub name: String,
    pub quantity: u32,
}

/// Consumables at or below `threshold`, lowest stock first
pub fn stock_alerts(consumables: &[Consumable], threshold: u32) -> Vec<StockAlert> {
    let mut alerts: Vec<StockAlert> = consumables
        .iter()
        .filter(|c| !c.empty && c.quantity <= threshold)
        .map(|c| StockAlert {
            consumable_id: c.id,
            name: c.name.clone(),
            quantity: c.quantity,
        })
        .collect();
    alerts.sort_by(|a, b| a.quantity.cmp(&b.quantity).then_with(|| a.name.cmp(&b.name)));
    alerts
}

/// Everything shown on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub treasury: Treasury,
    pub mounted_barrels: Vec<Barrel>,
    pub stock_alerts: Vec<StockAlert>,
    pub recent_transactions: Vec<Transaction>,
    pub period: PeriodSummary,
}

impl DashboardSummary {
    pub fn build(
        treasury: Treasury,
        barrels: Vec<Barrel>,
        consumables: &[Consumable],
        transactions: Vec<Transaction>,
        context: &TimeContext,
        low_stock_threshold: u32,
        today: NaiveDate,
    ) -> Self {
        let period = PeriodSummary::from_transactions(&transactions, context, today);
        let mut recent_transactions = transactions;
        recent_transactions.sort_by(|a, b| b.datetime.cmp(&a.datetime));
        recent_transactions.truncate(10);

        Self {
            treasury,
            mounted_barrels: barrels.into_iter().filter(|b| b.is_mounted && !b.empty).collect(),
            stock_alerts: stock_alerts(consumables, low_stock_threshold),
            recent_transactions,
            period,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clochette_config::TimeRange;

    fn tx(id: i64, day: u32, kind: TransactionKind, method: PaymentMethod, cents: i64) -> Transaction {
        Transaction {
            id,
            datetime: NaiveDate::from_ymd_opt(2026, 3, day).unwrap().and_hms_opt(20, 0, 0).unwrap(),
            kind,
            payment_method: method,
            amount: Decimal::new(cents, 2),
            author: "bar".to_string(),
            description: None,
            items: vec![],
        }
    }

    fn consumable(id: i64, name: &str, quantity: u32, empty: bool) -> Consumable {
        Consumable {
            id,
            name: name.to_string(),
            quantity,
            buy_price: Decimal::ONE,
            sell_price: Decimal::TWO,
            empty,
        }
    }

    #[test]
    fn test_period_summary_by_method() {
        let txs = vec![
            tx(1, 2, TransactionKind::Sale, PaymentMethod::Cash, 1000),
            tx(2, 3, TransactionKind::Sale, PaymentMethod::Lydia, 550),
            tx(3, 4, TransactionKind::Purchase, PaymentMethod::Card, 12000),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        let summary = PeriodSummary::from_transactions(&txs, &TimeContext::new(TimeRange::Month), today);
        assert_eq!(summary.transaction_count, 3);
        assert_eq!(summary.sales_total, Decimal::new(1550, 2));
        assert_eq!(summary.net, Decimal::new(-10450, 2));
        let lydia = summary.by_method.iter().find(|m| m.payment_method == PaymentMethod::Lydia).unwrap();
        assert_eq!(lydia.sales, Decimal::new(550, 2));
    }

    #[test]
    fn test_period_summary_excludes_out_of_range() {
        let txs = vec![tx(1, 2, TransactionKind::Sale, PaymentMethod::Cash, 1000)];
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let summary = PeriodSummary::from_transactions(&txs, &TimeContext::new(TimeRange::Month), today);
        assert_eq!(summary.transaction_count, 0);
        assert_eq!(summary.sales_total, Decimal::ZERO);
    }

    #[test]
    fn test_stock_alerts_sorted_and_skip_empty() {
        let consumables = vec![
            consumable(1, "Coca", 4, false),
            consumable(2, "Chips", 1, false),
            consumable(3, "Mars", 0, true),
            consumable(4, "Eau", 40, false),
        ];
        let alerts = stock_alerts(&consumables, 5);
        let names: Vec<&str> = alerts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Chips", "Coca"]);
    }
}
