//! Authentication token tests
//!
//! Exercises the JWT claim shape used by the auth service: round trips,
//! expiry rejection, and the access/refresh type tag.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TEST_SECRET: &str = "test-secret";

/// Claim layout issued by the auth service
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    jti: String,
    token_type: String,
    exp: i64,
    iat: i64,
}

fn make_token(token_type: &str, lifetime_seconds: i64) -> (String, Claims) {
    let now = Utc::now();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        jti: Uuid::new_v4().to_string(),
        token_type: token_type.to_string(),
        exp: (now + Duration::seconds(lifetime_seconds)).timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    (token, claims)
}

fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Claims survive an encode/decode round trip
#[test]
fn test_claims_round_trip() {
    let (token, claims) = make_token("access", 3600);
    let decoded = decode_token(&token, TEST_SECRET).unwrap();

    assert_eq!(decoded.sub, claims.sub);
    assert_eq!(decoded.jti, claims.jti);
    assert_eq!(decoded.token_type, "access");
    assert_eq!(decoded.exp, claims.exp);
}

/// An expired token is rejected with the expiry error kind
#[test]
fn test_expired_token_rejected() {
    let (token, _) = make_token("access", -120);
    let err = decode_token(&token, TEST_SECRET).unwrap_err();

    assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
}

/// A token signed with another secret does not validate
#[test]
fn test_wrong_secret_rejected() {
    let (token, _) = make_token("access", 3600);
    assert!(decode_token(&token, "other-secret").is_err());
}

/// A tampered token does not validate
#[test]
fn test_tampered_token_rejected() {
    let (token, _) = make_token("access", 3600);
    let mut tampered = token.clone();
    tampered.pop();
    // Either the signature check or the base64 parse fails; both must reject.
    assert!(decode_token(&tampered, TEST_SECRET).is_err());
}

/// The token_type tag distinguishes refresh tokens from access tokens
#[test]
fn test_token_type_tag() {
    let (access, _) = make_token("access", 3600);
    let (refresh, _) = make_token("refresh", 604800);

    assert_eq!(decode_token(&access, TEST_SECRET).unwrap().token_type, "access");
    assert_eq!(decode_token(&refresh, TEST_SECRET).unwrap().token_type, "refresh");
}

/// jti values are unique per issued token
#[test]
fn test_token_ids_unique() {
    let (_, a) = make_token("access", 3600);
    let (_, b) = make_token("access", 3600);
    assert_ne!(a.jti, b.jti);
}
