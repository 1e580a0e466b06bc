// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication tests.
//!
//! These tests verify that session tokens issued by the identity provider
//! are accepted, and that tampered, expired or revoked tokens are not.

use creative_marketplace::config::Config;
use creative_marketplace::db::DocumentStore;
use creative_marketplace::error::AppError;
use creative_marketplace::services::identity::Claims;
use creative_marketplace::services::IdentityProvider;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::{SystemTime, UNIX_EPOCH};

fn provider() -> IdentityProvider {
    IdentityProvider::new(&Config::default(), DocumentStore::in_memory())
}

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

fn sign(claims: &Claims, key: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(key),
    )
    .expect("Failed to create JWT")
}

#[tokio::test]
async fn test_jwt_roundtrip() {
    let provider = provider();
    let identity = provider
        .sign_up("ada@example.com", "password123")
        .await
        .unwrap();

    let session = provider.start_session(identity.clone()).unwrap();

    // Token is a standard HS256 JWT carrying the identity
    let key = DecodingKey::from_secret(&Config::default().jwt_signing_key);
    let data = decode::<Claims>(&session.token, &key, &Validation::new(Algorithm::HS256))
        .expect("Failed to decode JWT");
    assert_eq!(data.claims.sub, identity.uid);
    assert_eq!(data.claims.email, "ada@example.com");
    assert_eq!(data.claims.exp, session.expires_at);

    assert_eq!(provider.verify(&session.token).unwrap(), identity);
}

#[test]
fn test_wrong_key_rejected() {
    let claims = Claims {
        sub: "U1".to_string(),
        email: "u1@example.com".to_string(),
        exp: now() + 3600,
        iat: now(),
        jti: "j1".to_string(),
    };
    let token = sign(&claims, b"some_other_key_32_bytes_long!!!!");

    assert!(matches!(
        provider().verify(&token),
        Err(AppError::InvalidToken)
    ));
}

#[test]
fn test_expired_token_rejected() {
    let claims = Claims {
        sub: "U1".to_string(),
        email: "u1@example.com".to_string(),
        exp: now() - 3600,
        iat: now() - 7200,
        jti: "j2".to_string(),
    };
    let token = sign(&claims, &Config::default().jwt_signing_key);

    assert!(matches!(
        provider().verify(&token),
        Err(AppError::InvalidToken)
    ));
}

#[tokio::test]
async fn test_revoked_token_rejected() {
    let provider = provider();
    let identity = provider
        .sign_up("ada@example.com", "password123")
        .await
        .unwrap();
    let first = provider.start_session(identity.clone()).unwrap();
    let second = provider.start_session(identity).unwrap();

    provider.sign_out(&first.token).unwrap();

    assert!(provider.verify(&first.token).is_err());
    // Other sessions of the same identity stay valid
    assert!(provider.verify(&second.token).is_ok());
}
