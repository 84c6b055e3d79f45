//! HTTP Basic authentication resolving the caller into a [`Viewer`].

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use armis_core::{context::Viewer, record::ServiceNumber};
use axum::{
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use serde::Deserialize;

use crate::error::Error;

/// One login accepted by this server instance.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
  pub username:       String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash:  String,
  /// The account holder's own personnel record.
  #[serde(default)]
  pub service_number: Option<ServiceNumber>,
  #[serde(default)]
  pub admin:          bool,
}

impl Account {
  pub fn viewer(&self) -> Viewer {
    Viewer {
      username:       self.username.clone(),
      service_number: self.service_number.clone(),
      admin:          self.admin,
    }
  }
}

/// Credentials accepted as valid for this server instance.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
  pub accounts: Vec<Account>,
}

impl AuthConfig {
  fn find(&self, username: &str) -> Option<&Account> {
    self.accounts.iter().find(|a| a.username == username)
  }
}

/// Verify Basic credentials from `headers` and return the matching viewer.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<Viewer, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  let Some(account) = config.find(username) else {
    tracing::warn!(username, "login for unknown account");
    return Err(Error::Unauthorized);
  };

  let parsed_hash =
    PasswordHash::new(&account.password_hash).map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| {
      tracing::warn!(username, "wrong password");
      Error::Unauthorized
    })?;

  Ok(account.viewer())
}

/// Middleware: authenticate the request and insert its [`Viewer`] as an
/// extension for the API handlers.
pub async fn require_viewer(
  State(auth): State<Arc<AuthConfig>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error> {
  let viewer = verify_auth(req.headers(), &auth)?;
  req.extensions_mut().insert(viewer);
  Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
  use argon2::{PasswordHasher, password_hash::SaltString};
  use axum::http::{HeaderValue, header};
  use rand_core::OsRng;

  use super::*;

  fn hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  fn config() -> AuthConfig {
    AuthConfig {
      accounts: vec![
        Account {
          username:       "hq".into(),
          password_hash:  hash("secret"),
          service_number: None,
          admin:          true,
        },
        Account {
          username:       "mwamba".into(),
          password_hash:  hash("pass"),
          service_number: Some(ServiceNumber::parse("123").unwrap()),
          admin:          false,
        },
      ],
    }
  }

  fn basic(user: &str, pass: &str) -> HeaderMap {
    let encoded = B64.encode(format!("{user}:{pass}"));
    let mut h = HeaderMap::new();
    h.insert(
      header::AUTHORIZATION,
      HeaderValue::from_str(&format!("Basic {encoded}")).unwrap(),
    );
    h
  }

  #[test]
  fn correct_credentials_resolve_viewer() {
    let cfg = config();

    let hq = verify_auth(&basic("hq", "secret"), &cfg).unwrap();
    assert!(hq.admin);
    assert_eq!(hq.service_number, None);

    let member = verify_auth(&basic("mwamba", "pass"), &cfg).unwrap();
    assert!(!member.admin);
    assert_eq!(member.service_number.unwrap().as_str(), "123");
  }

  #[test]
  fn wrong_password() {
    assert!(matches!(
      verify_auth(&basic("hq", "wrong"), &config()),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn unknown_user() {
    assert!(matches!(
      verify_auth(&basic("ghost", "secret"), &config()),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn missing_header() {
    assert!(matches!(
      verify_auth(&HeaderMap::new(), &config()),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn invalid_base64() {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic !!!not-base64!!!"));
    assert!(matches!(verify_auth(&h, &config()), Err(Error::Unauthorized)));
  }

  #[test]
  fn account_from_toml_shape() {
    let account: Account = serde_json::from_value(serde_json::json!({
      "username": "ops",
      "password_hash": "$argon2id$x",
      "service_number": " 789 ",
    }))
    .unwrap();
    assert!(!account.admin);
    assert_eq!(account.viewer().service_number.unwrap().as_str(), "789");
  }
}
