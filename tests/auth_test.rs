#[cfg(test)]
mod sessions {
    use chrono::Utc;
    use uuid::Uuid;

    use sviluppo::models::user::{User, ROLE_ADMIN, ROLE_USER};
    use sviluppo::services::auth::{hash_password, normalize_email, verify_password, Sessions};

    fn user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "agente@esempio.it".to_string(),
            password_hash: String::new(),
            role: role.to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("segretissima").unwrap();
        assert!(verify_password("segretissima", &hash).unwrap());
        assert!(!verify_password("sbagliata", &hash).unwrap());
    }

    #[test]
    fn email_lookup_key_is_case_insensitive() {
        // Sign-up, sign-in and password reset all key the users table by
        // this normalization; "Mario@Esempio.it" must find the account
        // stored as "mario@esempio.it".
        assert_eq!(normalize_email("Mario@Esempio.it"), "mario@esempio.it");
        assert_eq!(normalize_email("  mario@esempio.it  "), "mario@esempio.it");
        assert_eq!(
            normalize_email("MARIO@ESEMPIO.IT"),
            normalize_email("mario@esempio.it")
        );
    }

    #[test]
    fn session_carries_role_claim() {
        let sessions = Sessions::new(3600);
        let token = sessions.create(&user(ROLE_ADMIN));

        let session = sessions.get(&token).unwrap();
        assert!(session.is_admin());

        let token = sessions.create(&user(ROLE_USER));
        assert!(!sessions.get(&token).unwrap().is_admin());
    }

    #[test]
    fn sign_out_is_observed_on_next_lookup() {
        let sessions = Sessions::new(3600);
        let token = sessions.create(&user(ROLE_ADMIN));
        assert!(sessions.get(&token).is_some());

        sessions.remove(&token);
        assert!(sessions.get(&token).is_none());
    }

    #[test]
    fn expired_sessions_are_evicted() {
        let sessions = Sessions::new(0);
        let token = sessions.create(&user(ROLE_ADMIN));
        assert!(sessions.get(&token).is_none());
    }

    #[test]
    fn expired_sessions_are_swept_on_create() {
        // Anonymous map sessions from cookie-less clients never present
        // their token again, so creation must also evict stale entries.
        let sessions = Sessions::new(0);
        sessions.create_anonymous();
        sessions.create_anonymous();
        sessions.create(&user(ROLE_USER));
        assert_eq!(sessions.count(), 1);
    }

    #[test]
    fn map_token_lives_only_in_the_session() {
        let sessions = Sessions::new(3600);
        let token = sessions.create_anonymous();

        assert!(sessions.get(&token).unwrap().map_token.is_none());
        assert!(sessions.set_map_token(&token, "pk.visitor".to_string()));
        assert_eq!(
            sessions.get(&token).unwrap().map_token.as_deref(),
            Some("pk.visitor")
        );

        sessions.remove(&token);
        assert!(sessions.get(&token).is_none());
        assert!(!sessions.set_map_token(&token, "pk.other".to_string()));
    }

    #[test]
    fn reset_tokens_are_single_use() {
        let sessions = Sessions::new(3600);
        let account = user(ROLE_USER);

        let token = sessions.store_reset_token(account.id);
        assert_eq!(sessions.take_reset_token(&token), Some(account.id));
        assert_eq!(sessions.take_reset_token(&token), None);
        assert_eq!(sessions.take_reset_token("mai-esistito"), None);
    }
}
