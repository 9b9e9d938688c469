//! Authentication service: password hashing, JWT issuance, registration and login.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::config::JwtConfig;
use crate::errors::AppError;
use crate::models::user::{RegisterUser, User, UserRole};
use crate::services::user as user_service;

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";

/// JWT claims embedded in access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_id: i32,
    pub role: String,
    pub token_type: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token pair returned on successful login.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Hash a plaintext password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash checked when the username is unknown, so a miss costs the same
/// argon2 work as a wrong password.
fn dummy_hash() -> Result<&'static str, AppError> {
    static DUMMY: OnceLock<String> = OnceLock::new();
    if let Some(hash) = DUMMY.get() {
        return Ok(hash);
    }
    let hash = hash_password("nashstore-dummy-password")?;
    Ok(DUMMY.get_or_init(|| hash))
}

fn claims_for(user: &User, token_type: &str, expiry_secs: i64, jwt: &JwtConfig) -> Claims {
    let now = Utc::now();
    Claims {
        sub: user.username.clone(),
        user_id: user.id,
        role: user.role.as_str().to_string(),
        token_type: token_type.to_string(),
        iss: jwt.issuer.clone(),
        aud: jwt.audience.clone(),
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    }
}

/// Generate a JWT token pair (access + refresh).
pub fn generate_tokens(user: &User, jwt: &JwtConfig) -> Result<TokenPair, AppError> {
    let encoding_key = EncodingKey::from_secret(jwt.secret.as_bytes());

    let access_claims = claims_for(user, ACCESS, jwt.access_token_expiry_secs, jwt);
    let refresh_claims = claims_for(user, REFRESH, jwt.refresh_token_expiry_secs, jwt);

    let access_token = jsonwebtoken::encode(&Header::default(), &access_claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    let refresh_token = jsonwebtoken::encode(&Header::default(), &refresh_claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: jwt.access_token_expiry_secs,
    })
}

/// Validate a JWT (signature, expiry, issuer, audience) and return the claims.
pub fn validate_token(token: &str, jwt: &JwtConfig) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt.secret.as_bytes());
    let mut validation = Validation::default();
    validation.set_issuer(&[&jwt.issuer]);
    validation.set_audience(&[&jwt.audience]);

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

/// Like [`validate_token`], additionally requiring an access token.
pub fn validate_access_token(token: &str, jwt: &JwtConfig) -> Result<Claims, AppError> {
    let claims = validate_token(token, jwt)?;
    if claims.token_type != ACCESS {
        return Err(AppError::Unauthorized);
    }
    Ok(claims)
}

/// Resolve the role a self-registration asks for. Blank means `User`; `Admin`
/// cannot be self-assigned.
pub fn registration_role(requested: Option<&str>) -> Result<UserRole, AppError> {
    let requested = match requested.map(str::trim) {
        None | Some("") => return Ok(UserRole::User),
        Some(r) => r,
    };
    match UserRole::parse(requested) {
        Some(UserRole::Admin) => Err(AppError::Forbidden(
            "Admin accounts cannot be self-registered".to_string(),
        )),
        Some(role) => Ok(role),
        None => Err(AppError::Validation(format!("Unknown role '{requested}'"))),
    }
}

/// Insert a user with an already-hashed password.
pub async fn insert_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
    role: UserRole,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash, role)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Username already exists", "Invalid user reference"))
}

/// Register a new account.
pub async fn register(pool: &PgPool, input: &RegisterUser) -> Result<User, AppError> {
    input.validate()?;
    let role = registration_role(input.role.as_deref())?;
    let password_hash = hash_password(&input.password)?;

    let user = insert_user(pool, &input.username, &password_hash, role).await?;
    tracing::info!(user_id = user.id, role = role.as_str(), "User registered");
    Ok(user)
}

/// Authenticate a user by username and password, returning a token pair.
pub async fn login(
    pool: &PgPool,
    username: &str,
    password: &str,
    jwt: &JwtConfig,
) -> Result<TokenPair, AppError> {
    let Some(user) = user_service::find_by_username(pool, username).await? else {
        verify_password(password, dummy_hash()?)?;
        return Err(AppError::Unauthorized);
    };

    if !verify_password(password, &user.password_hash)? {
        tracing::info!(user_id = user.id, "Rejected login: bad password");
        return Err(AppError::Unauthorized);
    }

    generate_tokens(&user, jwt)
}

/// Refresh an access token using a valid refresh token.
pub async fn refresh_token(
    pool: &PgPool,
    refresh_token_str: &str,
    jwt: &JwtConfig,
) -> Result<TokenPair, AppError> {
    let claims = validate_token(refresh_token_str, jwt)?;

    if claims.token_type != REFRESH {
        return Err(AppError::Unauthorized);
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(claims.user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::Unauthorized)?;

    generate_tokens(&user, jwt)
}
