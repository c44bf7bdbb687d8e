//! Wire and domain models for the webhook, the amoCRM API and the platform.

use serde::{Deserialize, Serialize};

/// Catalog webhook event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEventType {
    Add,
    Update,
}

impl CatalogEventType {
    /// Segment used in the webhook's bracket-path keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogEventType::Add => "add",
            CatalogEventType::Update => "update",
        }
    }
}

/// One invoice line from the catalog element's ITEMS field.
///
/// Order matters: line N pairs with the lead's subject enum N when the
/// platform courses are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceLine {
    pub description: String,
    pub unit_price: i64,
    pub quantity: u32,
}

/// Everything extracted from a single catalog webhook invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEvent {
    pub event_type: CatalogEventType,
    pub catalog_element_id: Option<u64>,
    pub linked_deal_id: Option<u64>,
    pub is_paid: bool,
    pub items: Vec<InvoiceLine>,
    pub total_amount: i64,
}

/// Flattened custom-field value: enum ids win over scalars, multi-value
/// fields stay lists.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatFieldValue {
    Enum(u64),
    Scalar(serde_json::Value),
    EnumList(Vec<u64>),
    ScalarList(Vec<serde_json::Value>),
}

/// Lead and contact data needed for the platform payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DealContactData {
    pub lead_id: u64,
    pub price: i64,
    pub class_enum_id: Option<u64>,
    /// Ordered like the invoice lines they pair with.
    pub subject_enum_ids: Vec<u64>,
    pub direction_enum_id: Option<u64>,
    pub purchased_course_enum_ids: Vec<u64>,
    pub contact_name: String,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

// --- amoCRM v4 API responses ---

#[derive(Debug, Clone, Deserialize)]
pub struct Lead {
    pub id: u64,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub custom_fields_values: Option<Vec<CustomField>>,
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<LeadEmbedded>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadEmbedded {
    #[serde(default)]
    pub contacts: Vec<ContactRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactRef {
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub custom_fields_values: Option<Vec<CustomField>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomField {
    #[serde(default)]
    pub field_id: Option<u64>,
    #[serde(default)]
    pub field_code: Option<String>,
    #[serde(default)]
    pub values: Vec<CustomFieldValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomFieldValue {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub enum_id: Option<u64>,
}

// --- platform payload ---

/// One course entry of the platform payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub name: String,
    pub subject_designation: String,
    pub cost: i64,
    pub months: u32,
}

/// Payment payload sent to the platform callback.
///
/// Field order here is the wire order: the body is signed in its exact
/// serialized form, so serialization must stay canonical and reproducible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformPayload {
    pub courses: Vec<Course>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: String,
    #[serde(rename = "class")]
    pub class_number: u8,
    pub amount: i64,
}
