use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{info, warn};

use carlot_db::is_unique_violation;
use carlot_types::api::{AuthResponse, LoginRequest, RegisterRequest};
use carlot_types::models::User;

use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::{AppState, AppStateInner, blocking};

/// A freshly authenticated user and the token that proves it.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = blocking(&state, move |state| register_user(state, &req.name, &req.password)).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "user registered".to_string(),
            user: session.user,
            token: session.token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = blocking(&state, move |state| login_user(state, &req.name, &req.password)).await?;

    Ok(Json(AuthResponse {
        message: "logged in".to_string(),
        user: session.user,
        token: session.token,
    }))
}

/// Create a user and sign them in. Blocking: hashes the password.
///
/// The name lookup is only a fast path. Two registrations racing for the
/// same name both pass it, and the UNIQUE index on `users.name` turns the
/// losing insert into the same `DuplicateName` error.
pub fn register_user(state: &AppStateInner, name: &str, password: &str) -> Result<Session, ApiError> {
    if state.db.get_user_by_name(name)?.is_some() {
        return Err(ApiError::DuplicateName("user"));
    }

    let digest = state.passwords.hash(password)?;

    let id = match state.db.create_user(name, &digest) {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => {
            warn!("Registration of '{}' lost the race to a concurrent one", name);
            return Err(ApiError::DuplicateName("user"));
        }
        Err(e) => return Err(e.into()),
    };

    let token = state.tokens.issue(id, name)?;
    info!("Registered user {} ({})", id, name);

    Ok(Session {
        user: User {
            id,
            name: name.to_string(),
        },
        token,
    })
}

/// Check credentials and mint a token. Blocking: verifies the digest, a
/// decoy one when the name is unknown.
pub fn login_user(state: &AppStateInner, name: &str, password: &str) -> Result<Session, ApiError> {
    let Some(user) = state.db.get_user_by_name(name)? else {
        state.passwords.verify_decoy(password);
        return Err(ApiError::InvalidCredentials);
    };

    if !state.passwords.verify(password, &user.password)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id, &user.name)?;

    Ok(Session {
        user: User {
            id: user.id,
            name: user.name,
        },
        token,
    })
}

#[cfg(test)]
mod tests {
    use carlot_db::Database;

    use super::*;
    use crate::password::PasswordConfig;
    use crate::token::TokenConfig;

    fn state() -> AppState {
        AppStateInner::new(
            Database::open_in_memory().unwrap(),
            &TokenConfig {
                secret: "unit-test-secret".to_string(),
                ttl: chrono::Duration::hours(1),
            },
            &PasswordConfig {
                memory_kib: 1024,
                iterations: 1,
            },
        )
        .unwrap()
    }

    #[test]
    fn login_after_register_returns_the_same_user() {
        let state = state();
        let registered = register_user(&state, "alice", "secret1").unwrap();

        let session = login_user(&state, "alice", "secret1").unwrap();
        assert_eq!(session.user.id, registered.user.id);
        assert_eq!(state.tokens.verify(&session.token).unwrap().user_id, registered.user.id);
    }

    #[test]
    fn unknown_name_and_wrong_password_are_both_invalid_credentials() {
        let state = state();
        register_user(&state, "alice", "secret1").unwrap();

        assert!(matches!(
            login_user(&state, "mallory", "secret1"),
            Err(ApiError::InvalidCredentials)
        ));
        assert!(matches!(
            login_user(&state, "alice", "secret2"),
            Err(ApiError::InvalidCredentials)
        ));
    }
}
