//! Presentation-only formatting. Nothing here feeds back into the ledger.

use crate::types::Money;
use chrono::{DateTime, Utc};

/// pt-BR currency style: `R$ 1.234,56`, negatives as `-R$ 1.234,56`.
pub fn currency(amount: Money, symbol: &str) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{sign}{symbol} {grouped},{frac_part}")
}

/// `dd/mm/yyyy, HH:MM:SS`, as the statement headers show it.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}
