//! Authentication service for login and token management
//!
//! Every issued token's id is recorded server-side at issue time; a
//! presented token whose id is unknown is treated as revoked, so a wiped
//! table invalidates every token in circulation.

use bcrypt::verify;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Token id, the blocklist key
    pub jti: String,
    /// "access" or "refresh"
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User fields echoed back on login/refresh
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub role: String,
}

/// User row as read for authentication
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    name: Option<String>,
    password_hash: String,
    role: String,
    active: bool,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Authenticate with username and password, issuing both tokens
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(AuthTokens, UserSummary)> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, name, password_hash, role, active
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::BadCredentials)?;

        if !user.active {
            return Err(AppError::BadCredentials);
        }

        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::BadCredentials);
        }

        let (access_token, access_jti, access_expires) =
            self.generate_token(user.id, TOKEN_TYPE_ACCESS, self.access_token_expiry)?;
        let (refresh_token, refresh_jti, refresh_expires) =
            self.generate_token(user.id, TOKEN_TYPE_REFRESH, self.refresh_token_expiry)?;

        self.record_token(access_jti, TOKEN_TYPE_ACCESS, user.id, access_expires)
            .await?;
        self.record_token(refresh_jti, TOKEN_TYPE_REFRESH, user.id, refresh_expires)
            .await?;

        Ok((
            AuthTokens {
                access_token,
                refresh_token,
                token_type: "Bearer".to_string(),
                expires_in: self.access_token_expiry,
            },
            UserSummary {
                id: user.id,
                username: user.username,
                name: user.name,
                role: user.role,
            },
        ))
    }

    /// Exchange a refresh token for a fresh access token
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<(String, UserSummary)> {
        let claims = self.validate_token(refresh_token, TOKEN_TYPE_REFRESH).await?;
        let user_id = parse_subject(&claims)?;

        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, name, password_hash, role, active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidToken)?;

        if !user.active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        let (access_token, access_jti, access_expires) =
            self.generate_token(user.id, TOKEN_TYPE_ACCESS, self.access_token_expiry)?;
        self.record_token(access_jti, TOKEN_TYPE_ACCESS, user.id, access_expires)
            .await?;

        Ok((
            access_token,
            UserSummary {
                id: user.id,
                username: user.username,
                name: user.name,
                role: user.role,
            },
        ))
    }

    /// Revoke the presented token (access or refresh, per `expected_type`)
    pub async fn revoke(&self, token: &str, expected_type: &str) -> AppResult<()> {
        let claims = self.validate_token(token, expected_type).await?;
        let jti = parse_token_id(&claims)?;

        let result = sqlx::query("UPDATE token_blocklist SET revoked = true WHERE jti = $1")
            .bind(jti)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::InvalidToken);
        }

        Ok(())
    }

    /// Decode a token, check its type, and consult the blocklist
    pub async fn validate_token(&self, token: &str, expected_type: &str) -> AppResult<Claims> {
        let claims = self.decode_claims(token)?;

        if claims.token_type != expected_type {
            return Err(AppError::InvalidToken);
        }

        let jti = parse_token_id(&claims)?;
        let revoked = sqlx::query_scalar::<_, bool>(
            "SELECT revoked FROM token_blocklist WHERE jti = $1",
        )
        .bind(jti)
        .fetch_optional(&self.db)
        .await?;

        match revoked {
            // Unknown tokens were not issued here; treat them as revoked.
            None => Err(AppError::TokenRevoked),
            Some(true) => Err(AppError::TokenRevoked),
            Some(false) => Ok(claims),
        }
    }

    fn decode_claims(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })
    }

    fn generate_token(
        &self,
        user_id: Uuid,
        token_type: &str,
        expiry_seconds: i64,
    ) -> AppResult<(String, Uuid, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(expiry_seconds);
        let jti = Uuid::new_v4();

        let claims = Claims {
            sub: user_id.to_string(),
            jti: jti.to_string(),
            token_type: token_type.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok((token, jti, expires_at))
    }

    /// Record an issued token; it is not revoked when it is added.
    async fn record_token(
        &self,
        jti: Uuid,
        token_type: &str,
        user_id: Uuid,
        expires: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO token_blocklist (jti, token_type, user_id, expires)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(jti)
        .bind(token_type)
        .bind(user_id)
        .bind(expires)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

fn parse_subject(claims: &Claims) -> AppResult<Uuid> {
    Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)
}

fn parse_token_id(claims: &Claims) -> AppResult<Uuid> {
    Uuid::parse_str(&claims.jti).map_err(|_| AppError::InvalidToken)
}
