use crate::{
    AppState,
    auth::password,
    config::Config,
    db::handlers::UserRepository,
    errors::{Error, Result},
};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64::{Engine as _, engine::general_purpose};
use tracing::{debug, instrument, trace};

/// Name recorded for requests without an operator.
pub const ANONYMOUS: &str = "anonymous";

/// The operator on whose behalf a request runs.
///
/// Resolution never fails for anonymous requests unless `auth.required` is set; credentials
/// that are present but wrong always reject the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor {
    pub username: Option<String>,
}

impl Actor {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    /// Username for log lines, `anonymous` when unauthenticated
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(ANONYMOUS)
    }
}

fn invalid_credentials() -> Error {
    Error::Unauthenticated {
        message: Some("Invalid username or password".to_string()),
    }
}

/// Extract the operator from the trusted proxy header
/// Returns:
/// - None: header absent or empty
/// - Some(Ok(actor)): header carries a username
/// - Some(Err(error)): header present but not valid text
fn try_proxy_header_auth(parts: &Parts, config: &Config) -> Option<Result<Actor>> {
    let header = parts.headers.get(&config.auth.proxy_header.header_name)?;

    let username = match header.to_str() {
        Ok(value) => value.trim(),
        Err(e) => {
            return Some(Err(Error::Unauthenticated {
                message: Some(format!("Invalid proxy header: {e}")),
            }));
        }
    };

    if username.is_empty() {
        return None;
    }

    Some(Ok(Actor::named(username)))
}

/// Split a `Basic` authorization value into username and password
fn decode_basic_credentials(value: &str) -> Option<(String, String)> {
    let decoded = general_purpose::STANDARD.decode(value.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Extract the operator from `Authorization: Basic` credentials
/// Returns:
/// - None: no Authorization header, or a scheme other than Basic
/// - Some(Ok(actor)): credentials match a stored operator
/// - Some(Err(error)): credentials present but malformed or wrong
#[instrument(skip(parts, users))]
async fn try_basic_auth(parts: &Parts, users: &dyn UserRepository) -> Option<Result<Actor>> {
    let auth_header = parts.headers.get(AUTHORIZATION)?;

    let auth_str = match auth_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::Unauthenticated {
                message: Some(format!("Invalid authorization header: {e}")),
            }));
        }
    };

    let (scheme, encoded) = auth_str.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let Some((username, password)) = decode_basic_credentials(encoded) else {
        return Some(Err(invalid_credentials()));
    };

    let user = match users.get_by_username(&username).await {
        Ok(Some(user)) => user,
        Ok(None) => return Some(Err(invalid_credentials())),
        Err(e) => return Some(Err(Error::Database(e))),
    };

    // Verify on a blocking thread to avoid stalling the runtime
    let hash = user.password_hash;
    let is_valid = match tokio::task::spawn_blocking(move || password::verify_password(&password, &hash)).await {
        Ok(is_valid) => is_valid,
        Err(e) => {
            return Some(Err(Error::Internal {
                operation: format!("spawn password verification task: {e}"),
            }));
        }
    };

    if !is_valid {
        return Some(Err(invalid_credentials()));
    }

    Some(Ok(Actor::named(user.username)))
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let auth = &state.config.auth;

        if auth.proxy_header.enabled {
            match try_proxy_header_auth(parts, &state.config) {
                Some(Ok(actor)) => {
                    debug!("Found proxy header operator: {}", actor.display_name());
                    return Ok(actor);
                }
                Some(Err(e)) => return Err(e),
                None => trace!("No proxy header authentication attempted"),
            }
        }

        if auth.basic.enabled {
            match try_basic_auth(parts, state.users.as_ref()).await {
                Some(Ok(actor)) => {
                    debug!("Found basic auth operator: {}", actor.display_name());
                    return Ok(actor);
                }
                Some(Err(e)) => return Err(e),
                None => trace!("No basic authentication attempted"),
            }
        }

        if auth.required {
            trace!("No authentication credentials found in request");
            return Err(Error::Unauthenticated { message: None });
        }

        Ok(Actor::anonymous())
    }
}
