//! Price aggregation and currency formatting

use clochette_config::{CurrencyConfig, SymbolPosition};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::cart::CartLine;

/// Price of `quantity` units
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Sum of every line total
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .fold(Decimal::ZERO, |acc, line| acc + line_total(line.item.unit_price, line.quantity))
}

/// Round half away from zero, the way receipts do
pub fn round_currency(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with the configured separators and symbol
pub fn format_amount(amount: Decimal, currency: &CurrencyConfig) -> String {
    let rounded = round_currency(amount, currency.decimal_places);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", currency.decimal_places as usize, rounded.abs());

    let (integer, fraction) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut number = clochette_utils::group_thousands(integer, &currency.thousands_separator);
    if let Some(fraction) = fraction {
        number.push_str(&currency.decimal_separator);
        number.push_str(fraction);
    }

    let sign = if negative { "-" } else { "" };
    match currency.symbol_position {
        SymbolPosition::Before => format!("{}{}{}", sign, currency.symbol, number),
        SymbolPosition::After => format!("{}{} {}", sign, number, currency.symbol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::types::ItemType;

    fn line(cents: i64, quantity: u32) -> CartLine {
        CartLine {
            item: CartItem {
                item_type: ItemType::Consumable,
                item_id: 1,
                name: format!("item-{}", cents),
                unit_price: Decimal::new(cents, 2),
                max_quantity: None,
            },
            quantity,
        }
    }

    #[test]
    fn test_cart_total_folds_lines() {
        let lines = vec![line(250, 3), line(100, 2), line(999, 0)];
        assert_eq!(cart_total(&lines), Decimal::new(950, 2));
        assert_eq!(cart_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_round_currency_midpoint() {
        assert_eq!(round_currency(Decimal::new(1005, 3), 2), Decimal::new(101, 2));
        assert_eq!(round_currency(Decimal::new(-1005, 3), 2), Decimal::new(-101, 2));
    }

    #[test]
    fn test_format_amount_french_locale() {
        let currency = CurrencyConfig::default();
        assert_eq!(format_amount(Decimal::new(123450, 2), &currency), "1 234,50 €");
        assert_eq!(format_amount(Decimal::new(-25, 1), &currency), "-2,50 €");
        assert_eq!(format_amount(Decimal::ZERO, &currency), "0,00 €");
    }

    #[test]
    fn test_format_amount_symbol_before() {
        let currency = CurrencyConfig {
            symbol: "$".to_string(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            symbol_position: SymbolPosition::Before,
            ..CurrencyConfig::default()
        };
        assert_eq!(format_amount(Decimal::new(1000000, 0), &currency), "$1,000,000.00");
    }

    #[test]
    fn test_format_amount_without_decimals() {
        let currency = CurrencyConfig {
            decimal_places: 0,
            ..CurrencyConfig::default()
        };
        assert_eq!(format_amount(Decimal::new(15, 1), &currency), "2 €");
    }
}
