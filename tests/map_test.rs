#[cfg(test)]
mod map_view {
    use chrono::Utc;
    use uuid::Uuid;

    use sviluppo::models::external_construction::ExternalConstruction;
    use sviluppo::models::listing::{Listing, ListingLink};
    use sviluppo::models::property::Property;
    use sviluppo::services::map::{
        assemble_view, bounds_of, format_number, format_price, marker_for, popup_html,
        MarkerCategory, DEFAULT_CENTER, DEFAULT_ZOOM, FIT_PADDING,
    };

    fn property(latitude: Option<f64>, longitude: Option<f64>) -> Property {
        let now = Utc::now().naive_utc();
        Property {
            id: Uuid::new_v4(),
            title: "Loft".to_string(),
            description: "Loft ristrutturato".to_string(),
            price: 250000.0,
            surface_area: 80.0,
            rooms: 3,
            floor: None,
            address: "Via Roma 1, Milano".to_string(),
            latitude,
            longitude,
            is_construction: false,
            is_investment: false,
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn external() -> ExternalConstruction {
        let now = Utc::now().naive_utc();
        ExternalConstruction {
            id: Uuid::new_v4(),
            title: "Borgo San Nicola".to_string(),
            description: String::new(),
            address: "Lecce".to_string(),
            external_url: "https://live-future-homes.com/borgo-san-nicola".to_string(),
            image_url: None,
            latitude: Some(40.35),
            longitude: Some(18.17),
            is_construction: true,
            is_investment: false,
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn no_marker_without_coordinates() {
        let listing = Listing::Property(property(None, None));
        assert!(marker_for(&listing).is_none());

        // Half a coordinate pair is as good as none.
        let listing = Listing::Property(property(Some(45.46), None));
        assert!(marker_for(&listing).is_none());
    }

    #[test]
    fn category_encodes_flags_with_construction_winning() {
        assert_eq!(MarkerCategory::of(false, false), MarkerCategory::Standard);
        assert_eq!(MarkerCategory::of(true, false), MarkerCategory::Construction);
        assert_eq!(MarkerCategory::of(false, true), MarkerCategory::Investment);
        assert_eq!(MarkerCategory::of(true, true), MarkerCategory::Construction);
    }

    #[test]
    fn marker_colors_and_glyphs() {
        assert_eq!(MarkerCategory::Standard.color(), "#ef4444");
        assert_eq!(MarkerCategory::Construction.color(), "#22c55e");
        assert_eq!(MarkerCategory::Investment.color(), "#3b82f6");
        assert_eq!(MarkerCategory::Standard.glyph(), "🏠");
    }

    #[test]
    fn property_popup_shows_price_area_and_detail_link() {
        let listing = Listing::Property(property(Some(45.4642), Some(9.19)));
        let marker = marker_for(&listing).unwrap();

        assert_eq!(marker.category, MarkerCategory::Standard);
        assert!(marker.popup_html.contains("€250,000"));
        assert!(marker.popup_html.contains("80m² • 3 vani"));
        assert!(marker.popup_html.contains("Via Roma 1, Milano"));
        assert!(marker.popup_html.contains("Scopri di più"));
        assert!(matches!(marker.link, ListingLink::Detail { .. }));
    }

    #[test]
    fn external_popup_hides_zero_fields_and_links_out() {
        let listing = Listing::External(external());
        let html = popup_html(&listing);

        assert!(!html.contains("€"));
        assert!(!html.contains("vani"));
        assert!(html.contains("Visita il sito"));
        assert!(html.contains("https://live-future-homes.com/borgo-san-nicola"));

        let marker = marker_for(&listing).unwrap();
        assert_eq!(marker.category, MarkerCategory::Construction);
    }

    #[test]
    fn bounds_cover_all_markers() {
        let milan = marker_for(&Listing::Property(property(Some(45.4642), Some(9.19)))).unwrap();
        let lecce = marker_for(&Listing::External(external())).unwrap();

        let bounds = bounds_of(&[milan, lecce]).unwrap();
        assert_eq!(bounds.south, 40.35);
        assert_eq!(bounds.north, 45.4642);
        assert_eq!(bounds.west, 9.19);
        assert_eq!(bounds.east, 18.17);
    }

    #[test]
    fn empty_view_keeps_default_center_and_no_bounds() {
        let view = assemble_view(Vec::new());
        assert_eq!(view.center_latitude, DEFAULT_CENTER.0);
        assert_eq!(view.center_longitude, DEFAULT_CENTER.1);
        assert_eq!(view.zoom, DEFAULT_ZOOM);
        assert_eq!(view.padding, FIT_PADDING);
        assert!(view.bounds.is_none());
        assert!(view.markers.is_empty());
    }

    #[test]
    fn price_formatting_groups_thousands() {
        assert_eq!(format_price(250000.0), "€250,000");
        assert_eq!(format_price(1200000.0), "€1,200,000");
        assert_eq!(format_price(980.0), "€980");
        assert_eq!(format_price(250000.4), "€250,000");
    }

    #[test]
    fn number_formatting_drops_whole_value_decimals() {
        assert_eq!(format_number(80.0), "80");
        assert_eq!(format_number(85.5), "85.5");
    }
}
