#[cfg(test)]
mod listing_form {
    use sviluppo::services::listings::{
        parse_flag, parse_form, parse_int_or_zero, parse_or_zero, ListingDraft, ListingForm,
    };

    fn standard_form() -> ListingForm {
        ListingForm {
            title: "Loft".to_string(),
            description: "Loft ristrutturato in zona Navigli".to_string(),
            price: "250000".to_string(),
            surface_area: "80".to_string(),
            rooms: "3".to_string(),
            floor: "".to_string(),
            address: "Via Roma 1, Milano".to_string(),
            ..ListingForm::default()
        }
    }

    #[test]
    fn standard_submission_parses_numeric_fields() {
        let draft = parse_form(&standard_form()).unwrap();
        match draft {
            ListingDraft::Standard(standard) => {
                assert_eq!(standard.title, "Loft");
                assert_eq!(standard.price, 250000.0);
                assert_eq!(standard.surface_area, 80.0);
                assert_eq!(standard.rooms, 3);
                assert_eq!(standard.floor, None);
            }
            ListingDraft::External(_) => panic!("expected standard draft"),
        }
    }

    #[test]
    fn garbage_numeric_fields_default_to_zero() {
        let mut form = standard_form();
        form.price = "not-a-number".to_string();
        form.surface_area = "".to_string();
        form.rooms = "3.5".to_string();

        match parse_form(&form).unwrap() {
            ListingDraft::Standard(standard) => {
                assert_eq!(standard.price, 0.0);
                assert_eq!(standard.surface_area, 0.0);
                assert_eq!(standard.rooms, 0);
            }
            ListingDraft::External(_) => panic!("expected standard draft"),
        }
    }

    #[test]
    fn external_url_switches_to_external_mode() {
        let mut form = standard_form();
        form.external_url = "https://live-future-homes.com/borgo-san-nicola".to_string();
        // Numeric requirements are relaxed in external mode.
        form.price = "".to_string();
        form.description = "".to_string();

        match parse_form(&form).unwrap() {
            ListingDraft::External(external) => {
                assert_eq!(
                    external.external_url,
                    "https://live-future-homes.com/borgo-san-nicola"
                );
                assert_eq!(external.image_url, None);
            }
            ListingDraft::Standard(_) => panic!("expected external draft"),
        }
    }

    #[test]
    fn missing_title_is_rejected() {
        let mut form = standard_form();
        form.title = "  ".to_string();
        let err = parse_form(&form).unwrap_err();
        assert_eq!(err.field, "title");
    }

    #[test]
    fn missing_description_rejected_only_in_standard_mode() {
        let mut form = standard_form();
        form.description = "".to_string();
        assert_eq!(parse_form(&form).unwrap_err().field, "description");

        form.external_url = "https://example.com/cantiere".to_string();
        assert!(parse_form(&form).is_ok());
    }

    #[test]
    fn floor_is_optional_and_parsed() {
        let mut form = standard_form();
        form.floor = "2".to_string();
        match parse_form(&form).unwrap() {
            ListingDraft::Standard(standard) => assert_eq!(standard.floor, Some(2)),
            ListingDraft::External(_) => panic!("expected standard draft"),
        }
    }

    #[test]
    fn set_field_binds_known_names() {
        let mut form = ListingForm::default();
        form.set_field("title", "Attico".to_string());
        form.set_field("is_construction", "true".to_string());
        form.set_field("preview_index", "2".to_string());
        form.set_field("unknown_field", "ignored".to_string());

        assert_eq!(form.title, "Attico");
        assert!(form.is_construction);
        assert_eq!(form.preview_index, 2);
    }

    #[tokio::test]
    async fn editing_an_external_listing_is_a_validation_error() {
        use std::sync::Arc;
        use sviluppo::config::create_test_config;
        use sviluppo::services::{listings, ValidationError};
        use sviluppo::storage::Storage;
        use uuid::Uuid;

        let config = Arc::new(create_test_config());
        let storage = Storage::new(&config);
        let mut form = standard_form();
        form.external_url = "https://example.com/cantiere".to_string();

        // Rejected before any store call, as an inline validation failure
        // rather than a server fault.
        let err = listings::update(
            &config,
            &storage,
            None,
            Uuid::new_v4(),
            form,
            Vec::new(),
            false,
        )
        .await
        .unwrap_err();

        let validation = err
            .downcast_ref::<ValidationError>()
            .expect("expected a validation error");
        assert_eq!(validation.field, "external_url");
    }

    #[test]
    fn numeric_parsers() {
        assert_eq!(parse_or_zero(" 120.5 "), 120.5);
        assert_eq!(parse_or_zero(""), 0.0);
        assert_eq!(parse_int_or_zero("4"), 4);
        assert_eq!(parse_int_or_zero("quattro"), 0);
        assert!(parse_flag("on"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
