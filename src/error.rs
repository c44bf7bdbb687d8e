//! Error types for webhook processing.

use reqwest::StatusCode;

/// Unified error type for webhook processing operations.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Upstream returned an error status code
    #[error("HTTP error: {0}")]
    HttpStatus(StatusCode),
    /// Failed to parse a JSON response
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Lead lookup returned nothing
    #[error("lead {0} not found")]
    LeadNotFound(u64),
    /// Lead has no linked contacts
    #[error("no contacts found for lead {0}")]
    NoContactsForLead(u64),
    /// Contact lookup returned nothing
    #[error("contact {0} not found")]
    ContactNotFound(u64),
    /// Subject enum id missing from the mapping table
    #[error("subject mapping not found for {0}")]
    SubjectMappingNotFound(String),
    /// Class enum id missing from the mapping table
    #[error("class mapping not found for ID {0}")]
    ClassMappingNotFound(u64),
    /// Course enum id missing from the mapping table
    #[error("course mapping not found for ID {0}")]
    CourseMappingNotFound(u64),
    /// Lead data lacks a field required for the platform payload
    #[error("missing '{0}' in lead data")]
    MissingLeadField(&'static str),
    /// Contact has no phone number
    #[error("contact phone is missing")]
    MissingContactPhone,
    /// Contact has no email address
    #[error("contact email is missing")]
    MissingContactEmail,
    /// Invoice items and lead subjects cannot be paired positionally
    #[error("invoice item count ({items}) does not match subject count ({subjects})")]
    ItemSubjectCountMismatch { items: usize, subjects: usize },
    /// Every invoice item was skipped, nothing to send
    #[error("no courses could be built from the invoice items")]
    EmptyOrder,
}

impl ProcessError {
    /// Validation failures become a structured 4xx at the API boundary;
    /// network and upstream failures become a generic 500.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            ProcessError::Network(_) | ProcessError::HttpStatus(_) | ProcessError::Parse(_)
        )
    }
}

/// Result alias for webhook processing operations.
pub type Result<T> = std::result::Result<T, ProcessError>;
