use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: usize,
}

pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub fn issue_session_token(
    user_id: Uuid,
    username: &str,
    secret: &str,
    ttl_hours: i64,
    issued_at: DateTime<Utc>,
) -> Result<SessionToken> {
    let expires_at = issued_at + Duration::hours(ttl_hours.max(1));
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: expires_at.timestamp().max(0) as usize,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(SessionToken { token, expires_at })
}

pub fn decode_session_token(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_decodes_with_same_secret() {
        let user_id = Uuid::new_v4();
        let session =
            issue_session_token(user_id, "tester", "secret", 24, Utc::now()).unwrap();
        let claims = decode_session_token(&session.token, "secret").unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "tester");
        assert!(decode_session_token(&session.token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued_at = Utc::now() - Duration::days(3);
        let session =
            issue_session_token(Uuid::new_v4(), "tester", "secret", 1, issued_at).unwrap();
        assert!(decode_session_token(&session.token, "secret").is_err());
    }
}
