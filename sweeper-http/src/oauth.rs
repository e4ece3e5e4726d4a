//! OAuth 1.0a request signing (HMAC-SHA1), as required by the Twitter v1.1 API.
//!
//! The signature covers the HTTP method, the request URL without its query,
//! and every query/body parameter together with the `oauth_*` protocol
//! parameters. Parameter names and values are percent-encoded with the RFC 3986
//! unreserved set, sorted, and joined before signing.
use crate::HttpError;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};
use sweeper_common::Secret;

/// Everything outside `ALPHA / DIGIT / "-" / "." / "_" / "~"` is escaped.
const OAUTH_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// The four user-context credentials. All of them are treated as secrets.
#[derive(Clone, Debug)]
pub struct OAuth1Keys {
    pub consumer_key: Secret,
    pub consumer_secret: Secret,
    pub access_token: Secret,
    pub access_token_secret: Secret,
}

impl OAuth1Keys {
    /// Build the `Authorization` header value for a request issued now.
    pub fn authorization(
        &self,
        method: &str,
        base_url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, HttpError> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.authorization_with(method, base_url, params, &nonce, timestamp)
    }

    /// Deterministic variant of [`OAuth1Keys::authorization`].
    pub fn authorization_with(
        &self,
        method: &str,
        base_url: &str,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: u64,
    ) -> Result<String, HttpError> {
        let timestamp = timestamp.to_string();
        let mut protocol: Vec<(&str, &str)> = vec![
            ("oauth_consumer_key", self.consumer_key.expose()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.access_token.expose()),
            ("oauth_version", OAUTH_VERSION),
        ];

        let mut all = params.to_vec();
        all.extend_from_slice(&protocol);
        let base = signature_base_string(method, base_url, &all);
        let signature = sign(&self.signing_key(), &base)?;

        protocol.push(("oauth_signature", signature.as_str()));
        protocol.sort();
        let fields = protocol
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {fields}"))
    }

    fn signing_key(&self) -> String {
        format!(
            "{}&{}",
            encode(self.consumer_secret.expose()),
            encode(self.access_token_secret.expose())
        )
    }
}

pub fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, OAUTH_ENCODE).to_string()
}

pub fn signature_base_string(method: &str, base_url: &str, params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> =
        params.iter().map(|(k, v)| (encode(k), encode(v))).collect();
    encoded.sort();
    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(base_url),
        encode(&normalized)
    )
}

pub fn sign(key: &str, base: &str) -> Result<String, HttpError> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| HttpError::Build(format!("oauth signing key rejected: {e}")))?;
    mac.update(base.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
