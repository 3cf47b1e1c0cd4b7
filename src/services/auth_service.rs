use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IsolationLevel, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    access::{AccessContext, ListKey, Operation, Session, SessionData},
    config::SessionConfig,
    dto::auth::{Claims, InitFirstUserRequest, LoginRequest, LoginResponse},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        tracing::warn!("stored password hash is unreadable");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub fn issue_token(user: &UserModel, config: &SessionConfig) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::seconds(config.max_age_secs))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        is_admin: user.is_admin,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Verify a token's signature and expiry and return its claims.
pub fn decode_claims(token: &str, config: &SessionConfig) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Turn a bearer token into a session. The user is re-read so that revoked
/// admin rights and deleted accounts take effect immediately.
pub async fn resolve_session(state: &AppState, token: &str) -> AppResult<Option<Session>> {
    let Some(claims) = decode_claims(token, &state.config.session) else {
        return Ok(None);
    };
    let Ok(user_id) = Uuid::parse_str(&claims.sub) else {
        return Ok(None);
    };

    let user = Users::find_by_id(user_id).one(&state.orm).await?;
    Ok(user.map(|user| Session {
        data: SessionData {
            id: user.id,
            is_admin: user.is_admin,
        },
    }))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) if verify_password(&password, &u.password_hash) => u,
        _ => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    let token = issue_token(&user, &state.config.session)?;
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(ApiResponse::success(
        "Login success",
        LoginResponse {
            token,
            session: session_for(&user),
        },
        Some(Meta::empty()),
    ))
}

/// Bootstrap an empty installation: the first user becomes an admin.
pub async fn init_first_user(
    state: &AppState,
    payload: InitFirstUserRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let users = state.registry.list(ListKey::User);
    users.validate(Operation::Create, &payload)?;

    let InitFirstUserRequest {
        name,
        email,
        password,
    } = payload;
    let password_hash = hash_password(&password.unwrap_or_default())?;

    // Serializable so two concurrent bootstraps cannot both see an empty
    // table; the loser fails to commit.
    let txn = state
        .orm
        .begin_with_config(Some(IsolationLevel::Serializable), None)
        .await?;
    // Refuse once any user exists, with the same denial as a normal create.
    if Users::find().count(&txn).await? > 0 {
        return Err(AppError::AccessDenied {
            list: ListKey::User,
            operation: Operation::Create,
        });
    }
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.unwrap_or_default()),
        email: Set(email.unwrap_or_default()),
        is_admin: Set(true),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(user_id = %user.id, "first admin created");
    let token = issue_token(&user, &state.config.session)?;

    Ok(ApiResponse::success(
        "Admin created",
        LoginResponse {
            token,
            session: session_for(&user),
        },
        Some(Meta::empty()),
    ))
}

pub fn session_for(user: &UserModel) -> Session {
    Session {
        data: SessionData {
            id: user.id,
            is_admin: user.is_admin,
        },
    }
}

/// Context for a signed-in user, as the session extractor would build it.
pub fn context_for(user: &UserModel) -> AccessContext {
    AccessContext {
        session: Some(session_for(user)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> SessionConfig {
        SessionConfig {
            secret: secret.into(),
            max_age_secs: 3600,
        }
    }

    fn user(is_admin: bool) -> UserModel {
        UserModel {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            is_admin,
            password_hash: String::new(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn token_carries_subject_and_admin_flag() {
        let user = user(true);
        let token = issue_token(&user, &config("s3cret")).unwrap();
        let claims = decode_claims(&token, &config("s3cret")).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert!(claims.is_admin);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = issue_token(&user(false), &config("one")).unwrap();
        assert!(decode_claims(&token, &config("two")).is_none());
        assert!(decode_claims("not-a-jwt", &config("one")).is_none());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
        assert!(!verify_password("anything", "not-a-hash"));
    }
}
