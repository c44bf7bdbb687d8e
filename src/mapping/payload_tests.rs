//! Unit tests for the payment payload mapper.

use super::*;
use crate::settings::test_settings;

fn deal_fixture(settings: &crate::settings::Settings) -> DealContactData {
    DealContactData {
        lead_id: 39553937,
        price: 5000,
        class_enum_id: Some(settings.class_11),
        subject_enum_ids: vec![settings.subject_math_prof_masha],
        direction_enum_id: None,
        purchased_course_enum_ids: vec![settings.course_standart],
        contact_name: "Иван Петров".to_string(),
        contact_phone: Some("+79990000000".to_string()),
        contact_email: Some("ivan@example.com".to_string()),
    }
}

fn item(description: &str, unit_price: i64, quantity: u32) -> InvoiceLine {
    InvoiceLine {
        description: description.to_string(),
        unit_price,
        quantity,
    }
}

mod map_to_platform_payload_tests {
    use super::*;

    #[test]
    fn builds_payload_from_valid_data() {
        let settings = test_settings();
        let tables = EnumTables::new(&settings);
        let mapper = PaymentPayloadMapper::new(&tables);
        let deal = deal_fixture(&settings);

        let payload = mapper
            .map_to_platform_payload(&[item("Математика", 5000, 3)], 5000, &deal)
            .unwrap();

        assert_eq!(payload.first_name, "Иван");
        assert_eq!(payload.last_name.as_deref(), Some("Петров"));
        assert_eq!(payload.email, "ivan@example.com");
        assert_eq!(payload.phone, "+79990000000");
        assert_eq!(payload.class_number, 11);
        assert_eq!(payload.amount, 5000);
        assert_eq!(
            payload.courses,
            vec![Course {
                name: "Математика".to_string(),
                subject_designation: "maths".to_string(),
                cost: 5000,
                months: 3,
            }]
        );
    }

    #[test]
    fn invoice_total_wins_over_line_sum() {
        // Lines sum to 4000 but BILL_PRICE said 5000: the total is
        // authoritative and goes out unchanged.
        let settings = test_settings();
        let tables = EnumTables::new(&settings);
        let mapper = PaymentPayloadMapper::new(&tables);
        let mut deal = deal_fixture(&settings);
        deal.subject_enum_ids = vec![settings.subject_physics, settings.subject_chemistry];

        let items = [item("Физика", 2500, 1), item("Химия", 1500, 1)];
        let payload = mapper.map_to_platform_payload(&items, 5000, &deal).unwrap();

        assert_eq!(payload.amount, 5000);
        assert_eq!(payload.courses.iter().map(|c| c.cost).sum::<i64>(), 4000);
    }

    #[test]
    fn fails_without_class_enum() {
        let settings = test_settings();
        let tables = EnumTables::new(&settings);
        let mapper = PaymentPayloadMapper::new(&tables);
        let mut deal = deal_fixture(&settings);
        deal.class_enum_id = None;

        let err = mapper
            .map_to_platform_payload(&[item("Математика", 5000, 3)], 5000, &deal)
            .unwrap_err();
        assert!(matches!(err, ProcessError::MissingLeadField("class_enum_id")));
    }

    #[test]
    fn fails_without_subjects() {
        let settings = test_settings();
        let tables = EnumTables::new(&settings);
        let mapper = PaymentPayloadMapper::new(&tables);
        let mut deal = deal_fixture(&settings);
        deal.subject_enum_ids.clear();

        let err = mapper
            .map_to_platform_payload(&[item("Математика", 5000, 3)], 5000, &deal)
            .unwrap_err();
        assert!(matches!(err, ProcessError::MissingLeadField("subject_enum_ids")));
    }

    #[test]
    fn fails_without_phone() {
        let settings = test_settings();
        let tables = EnumTables::new(&settings);
        let mapper = PaymentPayloadMapper::new(&tables);
        let mut deal = deal_fixture(&settings);
        deal.contact_phone = None;

        let err = mapper
            .map_to_platform_payload(&[item("Математика", 5000, 3)], 5000, &deal)
            .unwrap_err();
        assert!(matches!(err, ProcessError::MissingContactPhone));
    }

    #[test]
    fn fails_without_email() {
        let settings = test_settings();
        let tables = EnumTables::new(&settings);
        let mapper = PaymentPayloadMapper::new(&tables);
        let mut deal = deal_fixture(&settings);
        deal.contact_email = None;

        let err = mapper
            .map_to_platform_payload(&[item("Математика", 5000, 3)], 5000, &deal)
            .unwrap_err();
        assert!(matches!(err, ProcessError::MissingContactEmail));
    }

    #[test]
    fn fails_when_item_and_subject_counts_differ() {
        let settings = test_settings();
        let tables = EnumTables::new(&settings);
        let mapper = PaymentPayloadMapper::new(&tables);
        let deal = deal_fixture(&settings); // one subject

        let items = [item("Физика", 2500, 1), item("Химия", 1500, 1)];
        let err = mapper.map_to_platform_payload(&items, 4000, &deal).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::ItemSubjectCountMismatch { items: 2, subjects: 1 }
        ));
    }

    #[test]
    fn fails_on_unknown_subject_enum() {
        let settings = test_settings();
        let tables = EnumTables::new(&settings);
        let mapper = PaymentPayloadMapper::new(&tables);
        let mut deal = deal_fixture(&settings);
        deal.subject_enum_ids = vec![999999];

        let err = mapper
            .map_to_platform_payload(&[item("Математика", 5000, 3)], 5000, &deal)
            .unwrap_err();
        assert!(err.to_string().contains("999999"));
    }

    #[test]
    fn skips_blank_descriptions_and_keeps_the_rest() {
        let settings = test_settings();
        let tables = EnumTables::new(&settings);
        let mapper = PaymentPayloadMapper::new(&tables);
        let mut deal = deal_fixture(&settings);
        deal.subject_enum_ids = vec![settings.subject_physics, settings.subject_chemistry];

        let items = [item("   ", 2500, 1), item("Химия", 1500, 2)];
        let payload = mapper.map_to_platform_payload(&items, 4000, &deal).unwrap();

        assert_eq!(payload.courses.len(), 1);
        assert_eq!(payload.courses[0].name, "Химия");
        assert_eq!(payload.courses[0].subject_designation, "chemistry");
    }

    #[test]
    fn fails_when_every_item_is_blank() {
        let settings = test_settings();
        let tables = EnumTables::new(&settings);
        let mapper = PaymentPayloadMapper::new(&tables);
        let deal = deal_fixture(&settings);

        let err = mapper
            .map_to_platform_payload(&[item("", 5000, 3)], 5000, &deal)
            .unwrap_err();
        assert!(matches!(err, ProcessError::EmptyOrder));
    }
}

mod split_name_tests {
    use super::*;

    #[test]
    fn splits_two_part_name() {
        assert_eq!(
            split_name("Иван Петров"),
            ("Иван".to_string(), Some("Петров".to_string()))
        );
    }

    #[test]
    fn single_token_has_no_last_name() {
        assert_eq!(split_name("Иван"), ("Иван".to_string(), None));
    }

    #[test]
    fn remainder_of_multi_part_name_stays_together() {
        assert_eq!(
            split_name("Анна Мария Ивановна"),
            ("Анна".to_string(), Some("Мария Ивановна".to_string()))
        );
    }

    #[test]
    fn collapses_whitespace_run_between_tokens() {
        assert_eq!(
            split_name("Иван   Петров"),
            ("Иван".to_string(), Some("Петров".to_string()))
        );
    }

    #[test]
    fn empty_name_falls_back_to_placeholder() {
        assert_eq!(split_name(""), ("Клиент".to_string(), None));
        assert_eq!(split_name("   "), ("Клиент".to_string(), None));
    }
}
