//! Strong ETags for dossier responses.
//!
//! The tag is a SHA-256 over the exact JSON body sent, so any change to the
//! underlying records (or to a computed age) yields a new tag.

use axum::http::{HeaderMap, header};
use sha2::{Digest, Sha256};

/// Quoted hex SHA-256 of `body`.
pub fn etag_for(body: &[u8]) -> String {
  format!("\"{}\"", hex::encode(Sha256::digest(body)))
}

/// Whether the request's `If-None-Match` header matches `etag`.
///
/// Accepts `*`, comma-separated lists, weak tags and bare (unquoted) tags.
pub fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
  let Some(value) = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
  else {
    return false;
  };

  let wanted = etag.trim_matches('"');
  value.split(',').map(str::trim).any(|candidate| {
    candidate == "*"
      || candidate
        .trim_start_matches("W/")
        .trim_matches('"')
        == wanted
  })
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn with_inm(value: &'static str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::IF_NONE_MATCH, HeaderValue::from_static(value));
    h
  }

  #[test]
  fn etag_is_quoted_and_stable() {
    let a = etag_for(b"{}");
    assert!(a.starts_with('"') && a.ends_with('"'));
    assert_eq!(a.len(), 66);
    assert_eq!(a, etag_for(b"{}"));
    assert_ne!(a, etag_for(b"[]"));
  }

  #[test]
  fn if_none_match_forms() {
    let tag = etag_for(b"x");
    let bare = tag.trim_matches('"').to_owned();

    let mut h = HeaderMap::new();
    h.insert(header::IF_NONE_MATCH, HeaderValue::from_str(&tag).unwrap());
    assert!(if_none_match(&h, &tag));

    h.insert(header::IF_NONE_MATCH, HeaderValue::from_str(&bare).unwrap());
    assert!(if_none_match(&h, &tag));

    let list = format!("\"other\", W/{tag}");
    h.insert(header::IF_NONE_MATCH, HeaderValue::from_str(&list).unwrap());
    assert!(if_none_match(&h, &tag));

    assert!(if_none_match(&with_inm("*"), &tag));
    assert!(!if_none_match(&with_inm("\"stale\""), &tag));
    assert!(!if_none_match(&HeaderMap::new(), &tag));
  }
}
