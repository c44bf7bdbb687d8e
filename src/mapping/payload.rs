//! Assembly of the platform payment payload from invoice items and lead data.

use log::{info, warn};

use super::EnumTables;
use crate::error::{ProcessError, Result};
use crate::models::{Course, DealContactData, InvoiceLine, PlatformPayload};

/// Placeholder used when the CRM contact has no display name.
const NAME_PLACEHOLDER: &str = "Клиент";

/// Builds [`PlatformPayload`]s out of webhook items plus amoCRM lead data.
pub struct PaymentPayloadMapper<'a> {
    tables: &'a EnumTables,
}

impl<'a> PaymentPayloadMapper<'a> {
    pub fn new(tables: &'a EnumTables) -> Self {
        Self { tables }
    }

    /// Validates the lead data and assembles the payload.
    ///
    /// `amount` is the invoice total from BILL_PRICE and goes out as-is; it
    /// is authoritative even when the line prices sum to something else.
    pub fn map_to_platform_payload(
        &self,
        items: &[InvoiceLine],
        amount: i64,
        deal: &DealContactData,
    ) -> Result<PlatformPayload> {
        let class_enum_id = deal
            .class_enum_id
            .ok_or(ProcessError::MissingLeadField("class_enum_id"))?;
        if deal.subject_enum_ids.is_empty() {
            return Err(ProcessError::MissingLeadField("subject_enum_ids"));
        }
        let phone = deal
            .contact_phone
            .clone()
            .ok_or(ProcessError::MissingContactPhone)?;
        let email = deal
            .contact_email
            .clone()
            .ok_or(ProcessError::MissingContactEmail)?;

        let class_number = self.tables.class_number(class_enum_id)?;
        info!("Mapped class: enum_id={class_enum_id} -> number={class_number}");

        let (first_name, last_name) = split_name(&deal.contact_name);
        let courses = self.build_courses(items, &deal.subject_enum_ids)?;

        info!(
            "Payload ready: {} course(s), amount={amount}, client={first_name} ({email})",
            courses.len()
        );

        Ok(PlatformPayload {
            courses,
            first_name,
            last_name,
            email,
            phone,
            class_number,
            amount,
        })
    }

    /// Zips invoice lines with the lead's subject enums by position.
    fn build_courses(&self, items: &[InvoiceLine], subject_enum_ids: &[u64]) -> Result<Vec<Course>> {
        if items.len() != subject_enum_ids.len() {
            return Err(ProcessError::ItemSubjectCountMismatch {
                items: items.len(),
                subjects: subject_enum_ids.len(),
            });
        }

        let mut courses = Vec::with_capacity(items.len());
        for (idx, (item, &subject_enum_id)) in items.iter().zip(subject_enum_ids).enumerate() {
            if item.description.trim().is_empty() {
                warn!("Skipping invoice item {idx}: empty description");
                continue;
            }

            let subject_designation = self.tables.subject_designation(subject_enum_id)?;
            info!(
                "Course [{idx}]: {} -> {subject_designation} (cost: {}, months: {})",
                item.description, item.unit_price, item.quantity
            );

            courses.push(Course {
                name: item.description.clone(),
                subject_designation: subject_designation.to_string(),
                cost: item.unit_price,
                months: item.quantity,
            });
        }

        if courses.is_empty() {
            return Err(ProcessError::EmptyOrder);
        }
        Ok(courses)
    }
}

/// Splits a display name on the first whitespace run into first and last
/// name. Purely heuristic; multi-part names keep everything after the first
/// token as the last name.
pub fn split_name(full_name: &str) -> (String, Option<String>) {
    let trimmed = full_name.trim();
    if trimmed.is_empty() {
        warn!("Empty contact name, using placeholder");
        return (NAME_PLACEHOLDER.to_string(), None);
    }

    match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), Some(rest.trim_start().to_string())),
        None => (trimmed.to_string(), None),
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
