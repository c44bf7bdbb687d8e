//! Flattening of amoCRM custom-field lists into plain lookups.

use std::collections::HashMap;

use log::info;

use crate::models::{Contact, CustomField, DealContactData, FlatFieldValue, Lead};
use crate::settings::Settings;

/// Collapses `custom_fields_values` into a `field_id -> value` map.
///
/// A field with exactly one value contributes its enum id when present, else
/// its scalar value. A multi-value field contributes all enum ids if any
/// exist, else all scalar values. Fields without values are dropped.
pub fn flatten_custom_fields(fields: &[CustomField]) -> HashMap<u64, FlatFieldValue> {
    let mut result = HashMap::new();

    for field in fields {
        let Some(field_id) = field.field_id else {
            continue;
        };
        match field.values.as_slice() {
            [] => {}
            [single] => {
                if let Some(enum_id) = single.enum_id {
                    result.insert(field_id, FlatFieldValue::Enum(enum_id));
                } else if let Some(value) = &single.value {
                    result.insert(field_id, FlatFieldValue::Scalar(value.clone()));
                }
            }
            many => {
                let enum_ids: Vec<u64> = many.iter().filter_map(|v| v.enum_id).collect();
                if !enum_ids.is_empty() {
                    result.insert(field_id, FlatFieldValue::EnumList(enum_ids));
                } else {
                    let values: Vec<serde_json::Value> =
                        many.iter().filter_map(|v| v.value.clone()).collect();
                    result.insert(field_id, FlatFieldValue::ScalarList(values));
                }
            }
        }
    }

    result
}

/// Pulls the platform-relevant fields out of a lead and its contact.
///
/// Single-enum subject/course values are coerced into one-element lists so
/// the caller always sees ordered sequences. Phone and email come from the
/// contact's PHONE/EMAIL field codes, not from field ids.
pub fn extract_deal_data(lead: &Lead, contact: &Contact, settings: &Settings) -> DealContactData {
    info!("Extracting data from lead {}", lead.id);

    let flat = flatten_custom_fields(lead.custom_fields_values.as_deref().unwrap_or_default());

    let class_enum_id = single_enum(flat.get(&settings.lead_field_class));
    let subject_enum_ids = enum_id_list(flat.get(&settings.lead_field_subjects));
    let direction_enum_id = single_enum(flat.get(&settings.lead_field_direction));
    let purchased_course_enum_ids = enum_id_list(flat.get(&settings.lead_field_purchased_course));

    let mut contact_phone = None;
    let mut contact_email = None;
    for field in contact.custom_fields_values.as_deref().unwrap_or_default() {
        let Some(code) = field.field_code.as_deref() else {
            continue;
        };
        let value = field
            .values
            .first()
            .and_then(|v| v.value.as_ref())
            .and_then(|v| v.as_str())
            .map(str::to_string);
        match code {
            "PHONE" => {
                if value.is_some() {
                    contact_phone = value;
                }
            }
            "EMAIL" => {
                if value.is_some() {
                    contact_email = value;
                }
            }
            _ => {}
        }
    }

    info!(
        "Extracted lead data: price={}, class={class_enum_id:?}, subjects={subject_enum_ids:?}, direction={direction_enum_id:?}",
        lead.price
    );
    info!(
        "Extracted contact data: name={}, phone={contact_phone:?}, email={contact_email:?}",
        contact.name
    );

    DealContactData {
        lead_id: lead.id,
        price: lead.price,
        class_enum_id,
        subject_enum_ids,
        direction_enum_id,
        purchased_course_enum_ids,
        contact_name: contact.name.clone(),
        contact_phone,
        contact_email,
    }
}

fn single_enum(value: Option<&FlatFieldValue>) -> Option<u64> {
    match value {
        Some(FlatFieldValue::Enum(id)) => Some(*id),
        _ => None,
    }
}

fn enum_id_list(value: Option<&FlatFieldValue>) -> Vec<u64> {
    match value {
        Some(FlatFieldValue::EnumList(ids)) => ids.clone(),
        Some(FlatFieldValue::Enum(id)) => vec![*id],
        _ => Vec::new(),
    }
}
