//! Parsing of the amoCRM catalog webhook body.
//!
//! amoCRM posts the "Invoices/purchases" catalog event as a form-urlencoded
//! body whose keys are bracket paths like
//! `catalogs[update][0][custom_fields][3][values][0][value]`. Custom fields
//! are encoded as parallel arrays: slot `i` carries the field code under
//! `[custom_fields][i][code]` and its values under
//! `[custom_fields][i][values][j][...]`, with slots in arbitrary order.
//!
//! [`parse_form_body`] decodes the body into an order-preserving multi-map;
//! [`CatalogEventParser`] indexes the field codes once and resolves the
//! individual fields from that index.

pub mod field_parsers;

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::models::{CatalogEvent, CatalogEventType, InvoiceLine};

const BILL_STATUS: &str = "BILL_STATUS";
const LINK_TO_LEAD: &str = "LINK_TO_LEAD";
const ITEMS: &str = "ITEMS";
const BILL_PRICE: &str = "BILL_PRICE";

/// Decodes a form-urlencoded body into a key -> values map.
///
/// Multi-valued fields keep every value in body order. Pairs that fail to
/// decode are skipped with a warning.
pub fn parse_form_body(body: &str) -> HashMap<String, Vec<String>> {
    let mut fields: HashMap<String, Vec<String>> = HashMap::new();

    for pair in body.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (raw_key, raw_value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        let (Some(key), Some(value)) = (decode_component(raw_key), decode_component(raw_value))
        else {
            warn!("Skipping undecodable form pair: {pair}");
            continue;
        };
        if key.is_empty() {
            continue;
        }
        fields.entry(key).or_default().push(value);
    }

    fields
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|cow| cow.into_owned())
}

/// Extractor over one decoded webhook body.
pub struct CatalogEventParser<'a> {
    fields: &'a HashMap<String, Vec<String>>,
    event_type: CatalogEventType,
    slots: HashMap<String, usize>,
}

impl<'a> CatalogEventParser<'a> {
    /// Detects the catalog event type and builds the field-code index.
    /// Returns `None` when the payload is not a catalog event at all.
    pub fn detect(fields: &'a HashMap<String, Vec<String>>) -> Option<Self> {
        let event_type = if fields.keys().any(|key| key.starts_with("catalogs[add][0]")) {
            CatalogEventType::Add
        } else if fields.keys().any(|key| key.starts_with("catalogs[update][0]")) {
            CatalogEventType::Update
        } else {
            return None;
        };

        let slots = index_field_codes(fields, event_type);
        debug!("Indexed {} custom field code(s)", slots.len());

        Some(Self {
            fields,
            event_type,
            slots,
        })
    }

    pub fn event_type(&self) -> CatalogEventType {
        self.event_type
    }

    /// True iff the BILL_STATUS field resolves to the configured "paid" enum.
    /// A missing field is reported distinctly but is still not paid.
    pub fn is_paid(&self, paid_enum_id: u64) -> bool {
        if !self.slots.contains_key(BILL_STATUS) {
            warn!("BILL_STATUS field not present in webhook");
            return false;
        }

        let enum_value = self.field_value(BILL_STATUS, "[values][0][enum]");
        let status_text = self
            .field_value(BILL_STATUS, "[values][0][value]")
            .unwrap_or("N/A");

        match enum_value {
            Some(raw) if raw == paid_enum_id.to_string() => {
                info!("Bill status: {status_text} (enum: {raw})");
                true
            }
            other => {
                info!(
                    "Bill status: {status_text} (enum: {}) - ignoring",
                    other.unwrap_or("N/A")
                );
                false
            }
        }
    }

    /// Lead id taken from the LINK_TO_LEAD URL, e.g.
    /// `https://example.amocrm.ru/leads/detail/39553937`.
    pub fn lead_id(&self) -> Option<u64> {
        if !self.slots.contains_key(LINK_TO_LEAD) {
            warn!("LINK_TO_LEAD field not present in webhook");
            return None;
        }
        let link = self.field_value(LINK_TO_LEAD, "[values][0][value]")?;
        match field_parsers::lead_id_from_link(link) {
            Some(lead_id) => {
                info!("Extracted lead_id {lead_id} from link: {link}");
                Some(lead_id)
            }
            None => {
                warn!("LINK_TO_LEAD value '{link}' contains no lead id");
                None
            }
        }
    }

    /// Invoice lines from the ITEMS field.
    ///
    /// The value array carries no length; iteration stops at the first index
    /// without a `[description]` entry. A line that fails to parse is logged
    /// and skipped, the rest of the invoice still goes through.
    pub fn items(&self) -> Vec<InvoiceLine> {
        let Some(&slot) = self.slots.get(ITEMS) else {
            warn!("ITEMS field not present in webhook");
            return Vec::new();
        };

        let mut items = Vec::new();
        let mut item_index = 0usize;
        loop {
            let base = format!("[values][{item_index}][value]");
            let Some(description) = self.value_at(slot, &format!("{base}[description]")) else {
                break;
            };
            let unit_price = self.value_at(slot, &format!("{base}[unit_price]"));
            let quantity = self.value_at(slot, &format!("{base}[quantity]"));

            match field_parsers::parse_invoice_item(description, unit_price, quantity) {
                Ok(item) => {
                    debug!(
                        "Item {item_index}: {} (price: {}, quantity: {})",
                        item.description, item.unit_price, item.quantity
                    );
                    items.push(item);
                }
                Err(e) => {
                    warn!("Failed to parse invoice item {item_index}: {e}");
                }
            }

            item_index += 1;
        }

        info!("Extracted {} invoice item(s)", items.len());
        items
    }

    /// Total invoice amount from BILL_PRICE; absent or unparsable means 0.
    pub fn total_amount(&self) -> i64 {
        if !self.slots.contains_key(BILL_PRICE) {
            warn!("BILL_PRICE field not present in webhook");
            return 0;
        }
        let Some(raw) = self.field_value(BILL_PRICE, "[values][0][value]") else {
            warn!("BILL_PRICE field has no value");
            return 0;
        };
        match raw.parse::<i64>() {
            Ok(amount) => {
                info!("Extracted total amount: {amount}");
                amount
            }
            Err(e) => {
                warn!("Failed to parse BILL_PRICE '{raw}': {e}");
                0
            }
        }
    }

    /// Id of the catalog element the event is about.
    pub fn catalog_element_id(&self) -> Option<u64> {
        let key = format!("catalogs[{}][0][id]", self.event_type.as_str());
        self.fields
            .get(&key)
            .and_then(|values| values.first())
            .and_then(|raw| raw.parse().ok())
    }

    /// Assembles the full [`CatalogEvent`].
    pub fn into_event(self, paid_enum_id: u64) -> CatalogEvent {
        CatalogEvent {
            event_type: self.event_type,
            catalog_element_id: self.catalog_element_id(),
            linked_deal_id: self.lead_id(),
            is_paid: self.is_paid(paid_enum_id),
            items: self.items(),
            total_amount: self.total_amount(),
        }
    }

    fn field_value(&self, code: &str, suffix: &str) -> Option<&'a str> {
        let slot = *self.slots.get(code)?;
        self.value_at(slot, suffix)
    }

    fn value_at(&self, slot: usize, suffix: &str) -> Option<&'a str> {
        let key = format!(
            "catalogs[{}][0][custom_fields][{slot}]{suffix}",
            self.event_type.as_str()
        );
        self.fields
            .get(&key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Maps every custom-field code to its slot index in the webhook's parallel
/// arrays. Slots arrive in arbitrary order; when a code appears twice the
/// smallest slot wins, which keeps the lookup deterministic.
fn index_field_codes(
    fields: &HashMap<String, Vec<String>>,
    event_type: CatalogEventType,
) -> HashMap<String, usize> {
    let prefix = format!("catalogs[{}][0][custom_fields][", event_type.as_str());
    let mut slots: HashMap<String, usize> = HashMap::new();

    for (key, values) in fields {
        let Some(rest) = key.strip_prefix(prefix.as_str()) else {
            continue;
        };
        let Some((index, tail)) = rest.split_once(']') else {
            continue;
        };
        if tail != "[code]" {
            continue;
        }
        let Ok(slot) = index.parse::<usize>() else {
            continue;
        };
        let Some(code) = values.first() else {
            continue;
        };
        match slots.get(code.as_str()) {
            Some(&existing) if existing <= slot => {}
            _ => {
                slots.insert(code.clone(), slot);
            }
        }
    }

    slots
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
