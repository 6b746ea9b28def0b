//! Display formatting for estimated ranges (Brazilian real)

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::estimation::types::RentRange;

/// Format a value as `R$ 1.530,00`
pub fn format_brl(value: f64) -> String {
    // Amounts beyond Decimal's range fall back to plain float formatting
    let plain = match Decimal::from_f64(value) {
        Some(amount) => format!(
            "{:.2}",
            amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .abs()
        ),
        None => format!("{:.2}", value.abs()),
    };
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let is_zero = !plain.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    format!("R$ {}{},{}", sign, group_thousands(int_part), frac_part)
}

/// Format a range as `R$ 1.530,00 a R$ 1.870,00`
pub fn format_range(range: &RentRange) -> String {
    format!("{} a {}", format_brl(range.min), format_brl(range.max))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
