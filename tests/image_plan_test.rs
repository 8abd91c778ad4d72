#[cfg(test)]
mod image_plans {
    use chrono::Utc;
    use uuid::Uuid;

    use sviluppo::models::property_image::PropertyImage;
    use sviluppo::services::listings::{plan_images, representative_image, UploadedImage};

    fn files(names: &[&str]) -> Vec<UploadedImage> {
        names
            .iter()
            .map(|name| UploadedImage {
                file_name: name.to_string(),
                bytes: vec![0u8; 4],
            })
            .collect()
    }

    #[test]
    fn three_images_preview_index_one() {
        let id = Uuid::new_v4();
        let plans = plan_images(
            id,
            1700000000000,
            0,
            Some(1),
            &files(&["a.jpg", "b.png", "c.webp"]),
        );

        assert_eq!(plans.len(), 3);
        let orders: Vec<i32> = plans.iter().map(|p| p.display_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);

        let previews: Vec<bool> = plans.iter().map(|p| p.is_preview).collect();
        assert_eq!(previews, vec![false, true, false]);
    }

    #[test]
    fn object_names_carry_owner_timestamp_and_index() {
        let id = Uuid::new_v4();
        let plans = plan_images(id, 1700000000000, 0, Some(0), &files(&["salotto.png"]));
        assert_eq!(plans[0].object_name, format!("{}-1700000000000-0.png", id));
    }

    #[test]
    fn extension_defaults_to_jpg() {
        let id = Uuid::new_v4();
        let plans = plan_images(id, 42, 0, None, &files(&["senza-estensione"]));
        assert!(plans[0].object_name.ends_with(".jpg"));
    }

    #[test]
    fn appended_images_continue_after_current_max() {
        let id = Uuid::new_v4();
        let plans = plan_images(id, 42, 3, None, &files(&["d.jpg", "e.jpg"]));

        let orders: Vec<i32> = plans.iter().map(|p| p.display_order).collect();
        assert_eq!(orders, vec![3, 4]);
        // Appending never re-flags a preview.
        assert!(plans.iter().all(|p| !p.is_preview));
    }

    #[test]
    fn out_of_range_preview_index_flags_nothing() {
        let id = Uuid::new_v4();
        let plans = plan_images(id, 42, 0, Some(9), &files(&["a.jpg", "b.jpg"]));
        assert!(plans.iter().all(|p| !p.is_preview));
    }

    fn image(order: i32, is_preview: bool, url: &str) -> PropertyImage {
        PropertyImage {
            id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            image_url: url.to_string(),
            display_order: order,
            is_preview,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn representative_image_prefers_the_preview() {
        let images = vec![
            image(0, false, "https://cdn.example.com/first.jpg"),
            image(1, true, "https://cdn.example.com/chosen.jpg"),
        ];
        assert_eq!(
            representative_image(&images, "https://cdn.example.com/placeholder.jpg"),
            "https://cdn.example.com/chosen.jpg"
        );
    }

    #[test]
    fn representative_image_falls_back_to_first_then_placeholder() {
        let images = vec![image(0, false, "https://cdn.example.com/first.jpg")];
        assert_eq!(
            representative_image(&images, "placeholder"),
            "https://cdn.example.com/first.jpg"
        );
        assert_eq!(representative_image(&[], "placeholder"), "placeholder");
    }
}
