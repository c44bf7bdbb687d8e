//! Environment-sourced configuration.
//!
//! Every amoCRM enumeration id is its own variable so CRM-side catalog edits
//! stay a deploy-time concern and never require a code change.

use anyhow::{Context, Result};

/// Application settings for the amoCRM -> platform integration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the amoCRM account, e.g. `https://example.amocrm.ru`
    pub amo_base_url: String,
    /// Long-live token for the amoCRM API
    pub amo_long_live_token: String,
    /// Base URL of the learning platform
    pub platform_url: String,
    /// Shared secret for the HMAC-SHA256 request signature
    pub api_secret_key: String,

    // Enum ids of the lead field "Какой предмет выбрал" (subject picked)
    pub subject_obshchestvo: u64,
    pub subject_english: u64,
    pub subject_history: u64,
    pub subject_russian: u64,
    pub subject_physics: u64,
    pub subject_chemistry: u64,
    pub subject_literature: u64,
    pub subject_math_prof_masha: u64,
    pub subject_math_base: u64,
    pub subject_biology_zhenya: u64,
    pub subject_informatics: u64,
    pub subject_math_prof_sasha: u64,
    pub subject_biology_gelya: u64,
    pub subject_math_7_8: u64,
    pub subject_math_oge: u64,

    // Enum ids of the lead field "В каком классе учится" (school class)
    pub class_5_6: u64,
    pub class_7: u64,
    pub class_8: u64,
    pub class_9: u64,
    pub class_10: u64,
    pub class_11: u64,
    pub class_younger_9: u64,
    pub class_university: u64,
    pub class_not_student: u64,

    // Enum ids of the lead field "Какой курс куплен" (purchased course)
    pub course_all_myself: u64,
    pub course_comfortik: u64,
    pub course_na_maksimalkah: u64,
    pub course_polugodovoy_oge: u64,
    pub course_normis: u64,
    pub course_imba: u64,
    pub course_spetskurs: u64,
    pub course_nu_norm: u64,
    pub course_syn_maminoy_podruge: u64,
    pub course_prohodka_na_byudzhet: u64,
    pub course_shik_blesk: u64,
    pub course_standart: u64,
    pub course_samostoyatelnyy: u64,
    pub course_platinum: u64,

    // Field ids of the four lead custom fields consumed
    pub lead_field_class: u64,
    pub lead_field_subjects: u64,
    pub lead_field_direction: u64,
    pub lead_field_purchased_course: u64,

    /// Enum id of the "Оплачен" value in the invoice BILL_STATUS field
    pub amo_bill_status_paid: u64,
    /// Attempt ceiling for outbound HTTP calls
    pub max_retry_attempts: u32,
    /// Log filter passed to env_logger, e.g. `info` or `debug`
    pub log_level: String,
}

impl Settings {
    /// Reads the full configuration from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            amo_base_url: required("AMO_BASE_URL")?,
            amo_long_live_token: required("AMO_LONG_LIVE_TOKEN")?,
            platform_url: required("PLATFORM_URL")?,
            api_secret_key: required("API_SECRET_KEY")?,

            subject_obshchestvo: required_id("AMO_SUBJECT_OBSHCHESTVO")?,
            subject_english: required_id("AMO_SUBJECT_ENGLISH")?,
            subject_history: required_id("AMO_SUBJECT_HISTORY")?,
            subject_russian: required_id("AMO_SUBJECT_RUSSIAN")?,
            subject_physics: required_id("AMO_SUBJECT_PHYSICS")?,
            subject_chemistry: required_id("AMO_SUBJECT_CHEMISTRY")?,
            subject_literature: required_id("AMO_SUBJECT_LITERATURE")?,
            subject_math_prof_masha: required_id("AMO_SUBJECT_MATH_PROF_MASHA")?,
            subject_math_base: required_id("AMO_SUBJECT_MATH_BASE")?,
            subject_biology_zhenya: required_id("AMO_SUBJECT_BIOLOGY_ZHENYA")?,
            subject_informatics: required_id("AMO_SUBJECT_INFORMATICS")?,
            subject_math_prof_sasha: required_id("AMO_SUBJECT_MATH_PROF_SASHA")?,
            subject_biology_gelya: required_id("AMO_SUBJECT_BIOLOGY_GELYA")?,
            subject_math_7_8: required_id("AMO_SUBJECT_MATH_7_8")?,
            subject_math_oge: required_id("AMO_SUBJECT_MATH_OGE")?,

            class_5_6: required_id("AMO_CLASS_5_6")?,
            class_7: required_id("AMO_CLASS_7")?,
            class_8: required_id("AMO_CLASS_8")?,
            class_9: required_id("AMO_CLASS_9")?,
            class_10: required_id("AMO_CLASS_10")?,
            class_11: required_id("AMO_CLASS_11")?,
            class_younger_9: required_id("AMO_CLASS_YOUNGER_9")?,
            class_university: required_id("AMO_CLASS_UNIVERSITY")?,
            class_not_student: required_id("AMO_CLASS_NOT_STUDENT")?,

            course_all_myself: required_id("AMO_COURSE_ALL_MYSELF")?,
            course_comfortik: required_id("AMO_COURSE_COMFORTIK")?,
            course_na_maksimalkah: required_id("AMO_COURSE_NA_MAKSIMALKAH")?,
            course_polugodovoy_oge: required_id("AMO_COURSE_POLUGODOVOY_OGE")?,
            course_normis: required_id("AMO_COURSE_NORMIS")?,
            course_imba: required_id("AMO_COURSE_IMBA")?,
            course_spetskurs: required_id("AMO_COURSE_SPETSKURS")?,
            course_nu_norm: required_id("AMO_COURSE_NU_NORM")?,
            course_syn_maminoy_podruge: required_id("AMO_COURSE_SYN_MAMINOY_PODRUGE")?,
            course_prohodka_na_byudzhet: required_id("AMO_COURSE_PROHODKA_NA_BYUDZHET")?,
            course_shik_blesk: required_id("AMO_COURSE_SHIK_BLESK")?,
            course_standart: required_id("AMO_COURSE_STANDART")?,
            course_samostoyatelnyy: required_id("AMO_COURSE_SAMOSTOYATELNYY")?,
            course_platinum: required_id("AMO_COURSE_PLATINUM")?,

            lead_field_class: required_id("AMO_LEAD_FIELD_CLASS")?,
            lead_field_subjects: required_id("AMO_LEAD_FIELD_SUBJECTS")?,
            lead_field_direction: required_id("AMO_LEAD_FIELD_DIRECTION")?,
            lead_field_purchased_course: required_id("AMO_LEAD_FIELD_PURCHASED_COURSE")?,

            amo_bill_status_paid: id_or("AMO_BILL_STATUS_PAID", 1371080)?,
            max_retry_attempts: id_or("MAX_RETRY_ATTEMPTS", 3)? as u32,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("missing required environment variable {name}"))
}

fn required_id(name: &str) -> Result<u64> {
    let raw = required(name)?;
    raw.trim()
        .parse()
        .with_context(|| format!("environment variable {name} must be a numeric id, got '{raw}'"))
}

fn id_or(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("environment variable {name} must be numeric, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Fixture with stable fake ids for unit tests across the crate.
#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        amo_base_url: "https://example.amocrm.ru".to_string(),
        amo_long_live_token: "test_token".to_string(),
        platform_url: "https://platform.example.com".to_string(),
        api_secret_key: "test_secret".to_string(),

        subject_obshchestvo: 1370001,
        subject_english: 1370003,
        subject_history: 1370005,
        subject_russian: 1370007,
        subject_physics: 1370009,
        subject_chemistry: 1370011,
        subject_literature: 1370013,
        subject_math_prof_masha: 1370015,
        subject_math_base: 1370017,
        subject_biology_zhenya: 1370019,
        subject_informatics: 1370021,
        subject_math_prof_sasha: 1370023,
        subject_biology_gelya: 1370025,
        subject_math_7_8: 1370027,
        subject_math_oge: 1370029,

        class_5_6: 1370101,
        class_7: 1370103,
        class_8: 1370105,
        class_9: 1370107,
        class_10: 1370109,
        class_11: 1370111,
        class_younger_9: 1370113,
        class_university: 1370115,
        class_not_student: 1370117,

        course_all_myself: 1370201,
        course_comfortik: 1370203,
        course_na_maksimalkah: 1370205,
        course_polugodovoy_oge: 1370207,
        course_normis: 1370209,
        course_imba: 1370211,
        course_spetskurs: 1370213,
        course_nu_norm: 1370215,
        course_syn_maminoy_podruge: 1370217,
        course_prohodka_na_byudzhet: 1370219,
        course_shik_blesk: 1370221,
        course_standart: 1370223,
        course_samostoyatelnyy: 1370225,
        course_platinum: 1370227,

        lead_field_class: 641289,
        lead_field_subjects: 641291,
        lead_field_direction: 641293,
        lead_field_purchased_course: 641295,

        amo_bill_status_paid: 1371080,
        max_retry_attempts: 3,
        log_level: "info".to_string(),
    }
}
