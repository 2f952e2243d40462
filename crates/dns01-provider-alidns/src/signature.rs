// # Alibaba Cloud RPC Signature (version 1.0)
//
// 1. Add the common parameters to the action parameters
// 2. Sort by key, percent-encode keys and values (RFC 3986), join `k=v` with `&`
// 3. String to sign: `GET&%2F&` + percent-encode(canonical query)
// 4. Signature: base64(HMAC-SHA1(access_key_secret + "&", string to sign))

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dns01_core::{Credentials, Error, Result};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::collections::BTreeMap;

type HmacSha1 = Hmac<Sha1>;

/// Alidns API version
pub const API_VERSION: &str = "2015-01-09";

/// Timestamp format required by the RPC API (always UTC)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Percent-encode per RFC 3986: everything but `A-Z a-z 0-9 - _ . ~`
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Sorted, encoded `k=v&k=v` form of the parameters
pub fn canonical_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// String to sign for a request with the given canonical query
pub fn string_to_sign(method: &str, canonical_query: &str) -> String {
    format!(
        "{}&{}&{}",
        method,
        percent_encode("/"),
        percent_encode(canonical_query)
    )
}

/// HMAC-SHA1 signature, base64 encoded
pub fn sign(access_key_secret: &str, string_to_sign: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(format!("{}&", access_key_secret).as_bytes())
        .map_err(|e| Error::provider("alidns", format!("HMAC error: {}", e)))?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Build the signed query string for one GET request
///
/// `timestamp` and `nonce` are passed in so requests are reproducible in tests.
pub fn signed_query(
    credentials: &Credentials,
    action: &str,
    params: &[(&str, String)],
    timestamp: &str,
    nonce: &str,
) -> Result<String> {
    let mut all: BTreeMap<String, String> = params
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();

    all.insert("Action".to_string(), action.to_string());
    all.insert("Format".to_string(), "JSON".to_string());
    all.insert("Version".to_string(), API_VERSION.to_string());
    all.insert("AccessKeyId".to_string(), credentials.access_key_id.clone());
    all.insert("SignatureMethod".to_string(), "HMAC-SHA1".to_string());
    all.insert("SignatureVersion".to_string(), "1.0".to_string());
    all.insert("SignatureNonce".to_string(), nonce.to_string());
    all.insert("Timestamp".to_string(), timestamp.to_string());

    let canonical = canonical_query(&all);
    let signature = sign(
        &credentials.access_key_secret,
        &string_to_sign("GET", &canonical),
    )?;

    Ok(format!(
        "{}&Signature={}",
        canonical,
        percent_encode(&signature)
    ))
}
