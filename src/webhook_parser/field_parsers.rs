//! Pure parsing helpers for individual webhook fields.

use lazy_static::lazy_static;
use regex::Regex;
use std::num::ParseIntError;

use crate::models::InvoiceLine;

lazy_static! {
    static ref LEAD_LINK_RE: Regex =
        Regex::new(r"/leads/detail/(\d+)").expect("valid lead link regex");
}

/// Extracts the lead id from an amoCRM lead URL.
///
/// The LINK_TO_LEAD field carries a full account URL; only the numeric
/// segment after `/leads/detail/` matters.
pub fn lead_id_from_link(link: &str) -> Option<u64> {
    LEAD_LINK_RE
        .captures(link)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Builds one invoice line from its raw field values.
///
/// Missing price or quantity defaults to 0; a value that is present but not
/// numeric is a parse failure and the caller skips the line.
pub fn parse_invoice_item(
    description: &str,
    unit_price: Option<&str>,
    quantity: Option<&str>,
) -> Result<InvoiceLine, ParseIntError> {
    let unit_price = unit_price.map(str::parse::<i64>).transpose()?.unwrap_or(0);
    let quantity = quantity.map(str::parse::<u32>).transpose()?.unwrap_or(0);
    Ok(InvoiceLine {
        description: description.to_string(),
        unit_price,
        quantity,
    })
}

#[cfg(test)]
#[path = "field_parsers_tests.rs"]
mod tests;
