// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider: credentials, session tokens and auth-state events.
//!
//! Sessions are HS256 JWTs carrying the subject ID and email. Signing out
//! revokes the token's `jti` until the token would have expired anyway.
//! Every sign-in and sign-out is published to subscribers.

use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::identity::normalize_email;
use crate::models::{Credential, Identity};
use crate::services::password::{hash_password_blocking, verify_password_blocking};
use crate::time_utils::now_rfc3339;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "studio_session";

pub const MIN_PASSWORD_LEN: usize = 6;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (identity ID)
    pub sub: String,
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Token ID, used for revocation
    pub jti: String,
}

/// A signed-in session.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
    pub token: String,
    /// Unix timestamp
    pub expires_at: usize,
}

/// Published on every sign-in (`identity: Some`) and sign-out (`None`).
#[derive(Debug, Clone)]
pub struct AuthStateChange {
    pub subject: String,
    pub identity: Option<Identity>,
}

/// Live subscription to auth-state changes. Dropping it unsubscribes.
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct IdentityProvider {
    db: DocumentStore,
    signing_key: Vec<u8>,
    session_ttl_secs: usize,
    /// Revoked token IDs mapped to their expiry
    revoked: DashMap<String, usize>,
    events: broadcast::Sender<AuthStateChange>,
}

fn unix_now() -> Result<usize> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_secs() as usize)
}

fn validate_credentials_input(email: &str, password: &str) -> Result<()> {
    if !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

impl IdentityProvider {
    pub fn new(config: &Config, db: DocumentStore) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            db,
            signing_key: config.jwt_signing_key.clone(),
            session_ttl_secs: (config.session_ttl_hours as usize).saturating_mul(3600),
            revoked: DashMap::new(),
            events,
        }
    }

    /// Create a sign-in credential. The application `User` record is created
    /// separately (at registration, or lazily by role resolution).
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        let email = normalize_email(email);
        validate_credentials_input(&email, password)?;

        let credential = Credential {
            uid: uuid::Uuid::new_v4().to_string(),
            email,
            password_hash: hash_password_blocking(password.to_string()).await?,
            created_at: now_rfc3339(),
        };

        match self.db.create_credential(&credential).await {
            Ok(()) => {}
            Err(AppError::AlreadyExists(_)) => return Err(AppError::DuplicateEmail),
            Err(e) => return Err(e),
        }

        tracing::info!(uid = %credential.uid, "Identity created");
        Ok(credential.identity())
    }

    /// Check email and password and start a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let credential = self
            .db
            .get_credential(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let valid =
            verify_password_blocking(password.to_string(), credential.password_hash.clone())
                .await?;
        if !valid {
            tracing::info!(uid = %credential.uid, "Sign-in rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        self.start_session(credential.identity())
    }

    /// Issue a session token for an already-authenticated identity.
    pub fn start_session(&self, identity: Identity) -> Result<Session> {
        let now = unix_now()?;
        let claims = Claims {
            sub: identity.uid.clone(),
            email: identity.email.clone(),
            iat: now,
            exp: now.saturating_add(self.session_ttl_secs),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.signing_key),
        )
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;

        tracing::info!(uid = %identity.uid, "Session started");
        self.publish(AuthStateChange {
            subject: identity.uid.clone(),
            identity: Some(identity.clone()),
        });

        Ok(Session {
            identity,
            token,
            expires_at: claims.exp,
        })
    }

    fn decode_claims(&self, token: &str) -> Result<Claims> {
        let key = DecodingKey::from_secret(&self.signing_key);
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &key, &validation).map_err(|_| AppError::InvalidToken)?;

        if self.revoked.contains_key(&data.claims.jti) {
            return Err(AppError::InvalidToken);
        }
        Ok(data.claims)
    }

    /// Validate a session token and return its identity.
    pub fn verify(&self, token: &str) -> Result<Identity> {
        let claims = self.decode_claims(token)?;
        Ok(Identity {
            uid: claims.sub,
            email: claims.email,
        })
    }

    /// End a session. The token is rejected from now on.
    pub fn sign_out(&self, token: &str) -> Result<Identity> {
        let claims = self.decode_claims(token)?;
        let now = unix_now()?;

        self.revoked.retain(|_, exp| *exp > now);
        self.revoked.insert(claims.jti.clone(), claims.exp);

        tracing::info!(uid = %claims.sub, "Session ended");
        self.publish(AuthStateChange {
            subject: claims.sub.clone(),
            identity: None,
        });

        Ok(Identity {
            uid: claims.sub,
            email: claims.email,
        })
    }

    /// Invoke `callback` on every auth-state change until the returned
    /// subscription is dropped. Must be called inside a tokio runtime.
    pub fn subscribe<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(AuthStateChange) + Send + 'static,
    {
        let mut receiver = self.events.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(change) => callback(change),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Auth-state subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Subscription { handle }
    }

    fn publish(&self, change: AuthStateChange) {
        // No subscribers is fine.
        let _ = self.events.send(change);
    }

    pub fn revoked_count(&self) -> usize {
        self.revoked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn provider() -> IdentityProvider {
        IdentityProvider::new(&Config::default(), DocumentStore::in_memory())
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let idp = provider();
        let identity = idp.sign_up("Ada@Example.com", "hunter22").await.unwrap();
        assert_eq!(identity.email, "ada@example.com");

        let session = idp.sign_in("ada@example.com", "hunter22").await.unwrap();
        assert_eq!(session.identity, identity);
        assert_eq!(idp.verify(&session.token).unwrap(), identity);
    }

    #[test]
    fn test_huge_session_ttl_saturates() {
        let config = Config {
            session_ttl_hours: u64::MAX,
            ..Config::default()
        };
        let idp = IdentityProvider::new(&config, DocumentStore::in_memory());
        let identity = Identity {
            uid: "U1".to_string(),
            email: "ada@example.com".to_string(),
        };

        let session = idp.start_session(identity.clone()).unwrap();

        assert_eq!(session.expires_at, usize::MAX);
        assert_eq!(idp.verify(&session.token).unwrap(), identity);
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let idp = provider();
        idp.sign_up("ada@example.com", "hunter22").await.unwrap();

        let err = idp.sign_up("ADA@example.com", "other-pass").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_sign_up_validates_input() {
        let idp = provider();
        assert!(matches!(
            idp.sign_up("not-an-email", "hunter22").await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            idp.sign_up("ada@example.com", "short").await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let idp = provider();
        idp.sign_up("ada@example.com", "hunter22").await.unwrap();

        assert!(matches!(
            idp.sign_in("ada@example.com", "hunter23").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            idp.sign_in("nobody@example.com", "hunter22").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_sign_out_revokes_token() {
        let idp = provider();
        let identity = idp.sign_up("ada@example.com", "hunter22").await.unwrap();
        let session = idp.start_session(identity).unwrap();

        idp.sign_out(&session.token).unwrap();

        assert!(matches!(idp.verify(&session.token), Err(AppError::InvalidToken)));
        assert_eq!(idp.revoked_count(), 1);
    }

    #[tokio::test]
    async fn test_verify_rejects_foreign_token() {
        let idp = provider();
        let other = IdentityProvider::new(
            &Config {
                jwt_signing_key: b"another_key_that_is_32_bytes_ok!".to_vec(),
                ..Config::default()
            },
            DocumentStore::in_memory(),
        );
        let identity = Identity {
            uid: "u1".to_string(),
            email: "ada@example.com".to_string(),
        };
        let session = other.start_session(identity).unwrap();

        assert!(matches!(idp.verify(&session.token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_subscribe_sees_sign_in_and_out() {
        let idp = provider();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscription = idp.subscribe(move |change| {
            let _ = tx.send(change);
        });

        let identity = Identity {
            uid: "u1".to_string(),
            email: "ada@example.com".to_string(),
        };
        let session = idp.start_session(identity.clone()).unwrap();
        idp.sign_out(&session.token).unwrap();

        let signed_in = rx.recv().await.unwrap();
        assert_eq!(signed_in.identity, Some(identity));
        let signed_out = rx.recv().await.unwrap();
        assert_eq!(signed_out.subject, "u1");
        assert_eq!(signed_out.identity, None);

        subscription.unsubscribe();
        let session = idp
            .start_session(Identity {
                uid: "u2".to_string(),
                email: "bob@example.com".to_string(),
            })
            .unwrap();
        assert!(idp.verify(&session.token).is_ok());
        // The callback (and its sender) is gone once the task is aborted.
        assert!(rx.recv().await.is_none());
    }
}
