use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::dto::TokenResponse;
use crate::auth::repo::{RefreshToken, User};
use crate::config::JwtConfig;
use crate::state::AppState;

/// Claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username, same value as email
    pub email: String,
    pub jti: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
}

/// JWT signing and verification material derived from configuration.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub expire_hours: i64,
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            expire_hours: cfg.expire_hours,
        }
    }

    /// Sign an access token for `user`, expiring `expire_hours` from `now`.
    /// Every token carries a fresh jti.
    pub fn sign(&self, user: &User, now: OffsetDateTime) -> anyhow::Result<(String, OffsetDateTime)> {
        let expires_at = now + Duration::hours(self.expire_hours);
        let claims = Claims {
            sub: user.email.clone(),
            email: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            roles: Vec::new(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: expires_at.unix_timestamp() as usize,
            iat: now.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, "jwt signed");
        Ok((token, expires_at))
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

/// A refresh token may only be exchanged once it is within this window of
/// its expiry (or already past it).
const REFRESH_WINDOW: Duration = Duration::minutes(5);

pub fn within_refresh_window(expires_at: OffsetDateTime, now: OffsetDateTime) -> bool {
    expires_at < now + REFRESH_WINDOW
}

/// Opaque refresh-token id: uuid v4 without hyphens.
pub fn new_refresh_token_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Mint an access token and persist the paired refresh token. Each call
/// writes one new row; previously issued tokens stay valid.
pub async fn issue_tokens(
    db: &PgPool,
    keys: &JwtKeys,
    user: &User,
) -> anyhow::Result<TokenResponse> {
    let now = OffsetDateTime::now_utc();
    let (token, expires_at) = keys.sign(user, now)?;

    let refresh = RefreshToken {
        id: new_refresh_token_id(),
        user_id: user.id,
        generated_at: now,
        expires_at,
    };
    refresh.insert(db).await?;
    debug!(user_id = %user.id, "token pair issued");

    Ok(TokenResponse {
        token,
        expiry_time: expires_at.format(&Rfc3339)?,
        refresh_token: refresh.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    fn make_user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: "unused".into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn signed_token_claims_identify_the_user() {
        let keys = make_keys();
        let user = make_user("grace@example.com");
        let (token, expires_at) = keys.sign(&user, OffsetDateTime::now_utc()).expect("sign");

        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, "grace@example.com");
        assert_eq!(claims.email, "grace@example.com");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert!(claims.roles.is_empty());
        assert_eq!(claims.exp, expires_at.unix_timestamp() as usize);
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[tokio::test]
    async fn each_token_gets_a_fresh_jti() {
        let keys = make_keys();
        let user = make_user("grace@example.com");
        let now = OffsetDateTime::now_utc();
        let (first, _) = keys.sign(&user, now).expect("sign");
        let (second, _) = keys.sign(&user, now).expect("sign");
        assert_ne!(
            keys.verify(&first).unwrap().jti,
            keys.verify(&second).unwrap().jti
        );
    }

    #[tokio::test]
    async fn verify_rejects_a_foreign_issuer() {
        let keys = make_keys();
        let other = JwtKeys::from_config(&crate::config::JwtConfig {
            secret: "test-secret".into(),
            issuer: "someone-else".into(),
            audience: "test-aud".into(),
            expire_hours: 3,
        });
        let user = make_user("grace@example.com");
        let (token, _) = other.sign(&user, OffsetDateTime::now_utc()).expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let keys = make_keys();
        let user = make_user("grace@example.com");
        // Signed four hours ago with a three hour lifetime.
        let then = OffsetDateTime::now_utc() - Duration::hours(4);
        let (token, _) = keys.sign(&user, then).expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn token_far_from_expiry_is_not_refreshable() {
        let now = OffsetDateTime::now_utc();
        assert!(!within_refresh_window(now + Duration::hours(2), now));
        assert!(!within_refresh_window(now + Duration::minutes(6), now));
    }

    #[test]
    fn token_near_or_past_expiry_is_refreshable() {
        let now = OffsetDateTime::now_utc();
        assert!(within_refresh_window(now + Duration::minutes(4), now));
        assert!(within_refresh_window(now - Duration::minutes(1), now));
        assert!(within_refresh_window(now - Duration::days(30), now));
    }

    #[test]
    fn refresh_token_ids_are_opaque_and_unique() {
        let first = new_refresh_token_id();
        let second = new_refresh_token_id();
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }
}
