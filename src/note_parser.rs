//! Parsing of payment-provider notes attached to amoCRM leads.
//!
//! Payment systems drop free-text notes like
//! `"Заказ №5432345 [8490.00 RUB] ✓ Платёж получен"` onto a lead; these
//! helpers classify such notes and pull out the amount and order number.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BRACKET_AMOUNT_RE: Regex =
        Regex::new(r"(?i)\[(\d+(?:\.\d+)?)\s*(?:RUB|руб|₽)\]").expect("valid amount regex");
    static ref PLAIN_AMOUNT_RE: Regex =
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:RUB|руб|рублей|₽)").expect("valid amount regex");
    static ref ORDER_RU_RE: Regex = Regex::new(r"(?i)заказ\s*№?\s*(\d+)").expect("valid order regex");
    static ref ORDER_EN_RE: Regex = Regex::new(r"(?i)order\s*#?\s*(\d+)").expect("valid order regex");
}

const PAYMENT_MARKERS: [&str; 5] = [
    "платёж получен",
    "платеж получен",
    "payment received",
    "оплачено",
    "paid",
];

/// True when the note text looks like a payment confirmation.
pub fn is_payment_note(note_text: &str) -> bool {
    if note_text.is_empty() {
        return false;
    }

    let note_lower = note_text.to_lowercase();
    if PAYMENT_MARKERS.iter().any(|marker| note_lower.contains(marker)) {
        return true;
    }

    note_text.contains('✓') && (note_lower.contains("заказ") || note_lower.contains("order"))
}

/// Payment amount from a note, e.g. `"[8490.00 RUB]"` -> 8490.0.
pub fn extract_payment_amount(note_text: &str) -> Option<f64> {
    for pattern in [&*BRACKET_AMOUNT_RE, &*PLAIN_AMOUNT_RE] {
        if let Some(caps) = pattern.captures(note_text) {
            if let Ok(amount) = caps[1].parse::<f64>() {
                return Some(amount);
            }
        }
    }
    None
}

/// Order number from a note, e.g. `"Заказ №5432345"` -> `"5432345"`.
pub fn extract_order_number(note_text: &str) -> Option<String> {
    for pattern in [&*ORDER_RU_RE, &*ORDER_EN_RE] {
        if let Some(caps) = pattern.captures(note_text) {
            return Some(caps[1].to_string());
        }
    }
    None
}
