use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use chrono::{Duration, NaiveDateTime, Utc};
use log::info;
use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;

use crate::config::Config;
use crate::db;
use crate::models::user::{InsertableUser, User, ROLE_USER};

const TOKEN_LENGTH: usize = 48;
const RESET_TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    /// Visitor-supplied map access token; lives only as long as the session.
    pub map_token: Option<String>,
    pub expires_at: NaiveDateTime,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == crate::models::user::ROLE_ADMIN
    }
}

#[derive(Debug)]
struct ResetEntry {
    user_id: Uuid,
    expires_at: NaiveDateTime,
}

/// In-process session registry. Every request re-reads it, so a sign-out or
/// expiry is observed on the next request without any client round trip.
pub struct Sessions {
    ttl: Duration,
    inner: Mutex<HashMap<String, Session>>,
    reset_tokens: Mutex<HashMap<String, ResetEntry>>,
}

impl Sessions {
    pub fn new(ttl_seconds: i64) -> Sessions {
        Sessions {
            ttl: Duration::seconds(ttl_seconds),
            inner: Mutex::new(HashMap::new()),
            reset_tokens: Mutex::new(HashMap::new()),
        }
    }

    pub fn create(&self, user: &User) -> String {
        let token = random_token();
        let session = Session {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            map_token: None,
            expires_at: Utc::now().naive_utc() + self.ttl,
        };
        let mut sessions = self.inner.lock().expect("session map poisoned");
        Self::sweep_expired(&mut sessions);
        sessions.insert(token.clone(), session);
        token
    }

    /// Anonymous session carrying only a map token, for the gated map
    /// variant. Public visitors are not signed in.
    pub fn create_anonymous(&self) -> String {
        let token = random_token();
        let session = Session {
            user_id: Uuid::nil(),
            email: String::new(),
            role: String::new(),
            map_token: None,
            expires_at: Utc::now().naive_utc() + self.ttl,
        };
        let mut sessions = self.inner.lock().expect("session map poisoned");
        Self::sweep_expired(&mut sessions);
        sessions.insert(token.clone(), session);
        token
    }

    /// Anonymous map sessions are minted for cookie-less visitors and their
    /// tokens may never come back, so eviction cannot rely on lookups alone.
    fn sweep_expired(sessions: &mut HashMap<String, Session>) {
        let now = Utc::now().naive_utc();
        sessions.retain(|_, session| session.expires_at > now);
    }

    pub fn count(&self) -> usize {
        self.inner.lock().expect("session map poisoned").len()
    }

    pub fn get(&self, token: &str) -> Option<Session> {
        let mut sessions = self.inner.lock().expect("session map poisoned");
        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now().naive_utc() => Some(session.clone()),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    pub fn remove(&self, token: &str) {
        self.inner
            .lock()
            .expect("session map poisoned")
            .remove(token);
    }

    pub fn set_map_token(&self, token: &str, map_token: String) -> bool {
        let mut sessions = self.inner.lock().expect("session map poisoned");
        match sessions.get_mut(token) {
            Some(session) => {
                session.map_token = Some(map_token);
                true
            }
            None => false,
        }
    }

    pub fn store_reset_token(&self, user_id: Uuid) -> String {
        let token = random_token();
        self.reset_tokens
            .lock()
            .expect("reset token map poisoned")
            .insert(
                token.clone(),
                ResetEntry {
                    user_id,
                    expires_at: Utc::now().naive_utc()
                        + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
                },
            );
        token
    }

    pub fn take_reset_token(&self, token: &str) -> Option<Uuid> {
        let mut tokens = self.reset_tokens.lock().expect("reset token map poisoned");
        let entry = tokens.remove(token)?;
        if entry.expires_at > Utc::now().naive_utc() {
            Some(entry.user_id)
        } else {
            None
        }
    }
}

/// Accounts are keyed by the lowercased address; every path that touches the
/// users table must normalize the same way or lookups go case-sensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hash error: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| anyhow!("bad stored hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn sign_up(config: &Arc<Config>, email: &str, password: &str) -> Result<User> {
    let email = normalize_email(email);
    if email.is_empty() || !email.contains('@') {
        return Err(anyhow!("invalid email address"));
    }
    if password.len() < 6 {
        return Err(anyhow!("password must be at least 6 characters"));
    }

    if db::user::find_by_email(config, &email)?.is_some() {
        return Err(anyhow!("an account with this email already exists"));
    }

    let user = InsertableUser {
        id: Uuid::new_v4(),
        email,
        password_hash: hash_password(password)?,
        role: ROLE_USER.to_string(),
        created_at: Utc::now().naive_utc(),
    };

    db::user::insert(config, user)
}

pub fn sign_in(
    config: &Arc<Config>,
    sessions: &Sessions,
    email: &str,
    password: &str,
) -> Result<(String, User)> {
    let user = db::user::find_by_email(config, &normalize_email(email))?
        .ok_or_else(|| anyhow!("invalid credentials"))?;

    if !verify_password(password, &user.password_hash)? {
        return Err(anyhow!("invalid credentials"));
    }

    let token = sessions.create(&user);
    info!("Signed in {}", user.email);
    Ok((token, user))
}

pub fn sign_out(sessions: &Sessions, token: &str) {
    sessions.remove(token);
}

/// The reset token is logged for out-of-band delivery; there is no mailer in
/// this deployment. Unknown emails are not reported back to the caller.
pub fn request_password_reset(config: &Arc<Config>, sessions: &Sessions, email: &str) -> Result<()> {
    if let Some(user) = db::user::find_by_email(config, &normalize_email(email))? {
        let token = sessions.store_reset_token(user.id);
        info!("Password reset requested for {}: token {}", user.email, token);
    }
    Ok(())
}
