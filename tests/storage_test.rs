#[cfg(test)]
mod storage_urls {
    use std::sync::Arc;

    use sviluppo::config::create_test_config;
    use sviluppo::storage::Storage;

    fn storage() -> Storage {
        Storage::new(&Arc::new(create_test_config()))
    }

    #[test]
    fn public_url_joins_base_and_object_name() {
        let storage = storage();
        assert_eq!(
            storage.public_url("abc-1700000000000-0.jpg"),
            "https://cdn.example.com/property-images/abc-1700000000000-0.jpg"
        );
    }

    #[test]
    fn object_name_round_trips_through_the_public_url() {
        let storage = storage();
        let url = storage.public_url("abc-1700000000000-0.jpg");
        assert_eq!(
            storage.object_name_from_url(&url).as_deref(),
            Some("abc-1700000000000-0.jpg")
        );
    }

    #[test]
    fn foreign_urls_are_not_ours() {
        let storage = storage();
        // External construction previews point at third-party images; a
        // cascade delete must leave those alone.
        assert_eq!(
            storage.object_name_from_url("https://images.unsplash.com/photo-1.jpg"),
            None
        );
        assert_eq!(
            storage.object_name_from_url("https://cdn.example.com/property-images/"),
            None
        );
    }

    #[tokio::test]
    async fn upload_delete_cycle() {
        let mut config = create_test_config();
        config.storage_root = std::env::temp_dir()
            .join(format!("sviluppo-test-{}", std::process::id()))
            .to_string_lossy()
            .to_string();
        let storage = Storage::new(&Arc::new(config));

        storage.upload("ciclo.jpg", b"fake image bytes").await.unwrap();
        storage.delete("ciclo.jpg").await.unwrap();
        assert!(storage.delete("ciclo.jpg").await.is_err());
    }

    #[tokio::test]
    async fn traversal_object_names_are_rejected() {
        let storage = storage();
        assert!(storage.upload("../fuori.jpg", b"x").await.is_err());
    }
}
