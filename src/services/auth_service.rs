use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth_dto::{LoginPayload, RegisterPayload, SessionResponse};
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::{crypto, time, token};

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    jwt_secret: String,
    session_ttl_hours: i64,
}

impl AuthService {
    const INVALID_CREDENTIALS: &'static str = "Invalid username or password";

    pub fn new(pool: PgPool, jwt_secret: String, session_ttl_hours: i64) -> Self {
        Self {
            pool,
            jwt_secret,
            session_ttl_hours,
        }
    }

    /// Creates the user and signs them in.
    #[instrument(skip(self, payload), fields(username = %payload.username))]
    pub async fn register(&self, payload: RegisterPayload) -> Result<SessionResponse> {
        payload.validate()?;

        if self.find_by_username(&payload.username).await?.is_some() {
            return Err(Error::Conflict(format!(
                "A user named {} already exists",
                payload.username
            )));
        }

        let password_hash = crypto::hash_password(&payload.password)?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&payload.username)
        .bind(&payload.email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Error::Conflict(format!(
                "A user named {} already exists",
                payload.username
            )),
            other => Error::from(other),
        })?;

        info!(user_id = %user.id, "User registered");
        self.start_session(user)
    }

    #[instrument(skip(self, payload), fields(username = %payload.username))]
    pub async fn login(&self, payload: LoginPayload) -> Result<SessionResponse> {
        payload.validate()?;

        let Some(user) = self.find_by_username(&payload.username).await? else {
            warn!("Login attempt for unknown user");
            return Err(Error::Unauthorized(Self::INVALID_CREDENTIALS.to_string()));
        };

        if !crypto::verify_password(&payload.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(Error::Unauthorized(Self::INVALID_CREDENTIALS.to_string()));
        }

        info!(user_id = %user.id, "User logged in");
        self.start_session(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    fn start_session(&self, user: User) -> Result<SessionResponse> {
        let session = token::issue_session_token(
            user.id,
            &user.username,
            &self.jwt_secret,
            self.session_ttl_hours,
            time::now(),
        )?;
        Ok(SessionResponse {
            user,
            token: session.token,
            expires_at: session.expires_at,
        })
    }
}
