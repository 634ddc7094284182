use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::foundation::error::{CharmloomError, CharmloomResult};

/// Maximum nesting depth searched inside a structured reply.
const MAX_SEARCH_DEPTH: usize = 6;

/// Minimum length of a bare string accepted as base64 image data.
const MIN_BASE64_LEN: usize = 100;

/// Raw wire payload returned by the enhancement service.
///
/// Not interpreted until passed to [`normalize`]: the upstream contract does
/// not fix the reply shape across deployments.
#[derive(Clone, Debug)]
pub struct RawServiceReply {
    /// Declared `Content-Type`, if the response carried one.
    pub content_type: Option<String>,
    /// Response body bytes, untouched.
    pub body: Vec<u8>,
}

/// A usable image reference extracted from a service reply.
///
/// Exactly one form is produced per successful normalization.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NormalizedImage {
    /// Resolvable `http(s)` URL.
    Url(String),
    /// `blob:`-style local reference.
    LocalRef(String),
    /// Complete `data:image/...;base64,...` URI.
    DataUri(String),
}

impl NormalizedImage {
    /// The image reference as a displayable string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(s) | Self::LocalRef(s) | Self::DataUri(s) => s,
        }
    }
}

/// Extract a [`NormalizedImage`] from a reply of unknown shape.
///
/// Decision procedure, short-circuiting on first success:
///
/// 1. A declared image content type makes the body binary image data.
/// 2. A UTF-8 body whose entire trimmed text is a plausible image reference
///    (URL, `blob:` ref, data URI, or a long bare base64 string) is used
///    directly.
/// 3. Otherwise the text is parsed as JSON and its values searched
///    depth-first, bounded to [`MAX_SEARCH_DEPTH`] levels, for the first
///    string satisfying step 2.
/// 4. A non-UTF-8 body has its lossy decoding tested the same way, then
///    falls back to wrapping the raw bytes as a data URI on the assumption
///    they are image bytes.
/// 5. Anything else fails explicitly; a placeholder is never substituted.
#[tracing::instrument(skip(reply), fields(content_type = reply.content_type.as_deref()))]
pub fn normalize(reply: &RawServiceReply) -> CharmloomResult<NormalizedImage> {
    if reply.body.is_empty() {
        return Err(no_result());
    }

    if let Some(ct) = reply.content_type.as_deref()
        && ct.trim().to_ascii_lowercase().starts_with("image/")
    {
        return Ok(data_uri_from_bytes(&reply.body, image_subtype(ct)));
    }

    match std::str::from_utf8(&reply.body) {
        Ok(text) => {
            if let Some(found) = classify_candidate(text) {
                return Ok(found);
            }
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(text)
                && let Some(found) = search_value(&value, 0)
            {
                return Ok(found);
            }
            Err(no_result())
        }
        Err(_) => {
            let lossy = String::from_utf8_lossy(&reply.body);
            if let Some(found) = classify_candidate(&lossy) {
                return Ok(found);
            }
            // Undecodable bytes with no declared type: assume they genuinely
            // are image data.
            tracing::debug!("treating undecodable reply body as raw image bytes");
            Ok(data_uri_from_bytes(&reply.body, "jpeg"))
        }
    }
}

/// Test whether the entire trimmed string is a plausible image reference.
///
/// Data URIs are accepted with internal whitespace in their base64 payload
/// (some providers wrap lines) and re-emitted cleaned. A bare string longer
/// than [`MIN_BASE64_LEN`] composed only of base64 alphabet characters is
/// wrapped into a JPEG data URI unchanged.
fn classify_candidate(raw: &str) -> Option<NormalizedImage> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if s.starts_with("http") {
        return Some(NormalizedImage::Url(s.to_string()));
    }
    if s.starts_with("blob:") {
        return Some(NormalizedImage::LocalRef(s.to_string()));
    }
    if let Some((prefix, payload)) = split_data_uri(s) {
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        if cleaned.is_empty() {
            return None;
        }
        return Some(NormalizedImage::DataUri(format!("{prefix}{cleaned}")));
    }

    let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() > MIN_BASE64_LEN && cleaned.bytes().all(is_base64_byte) {
        return Some(NormalizedImage::DataUri(format!(
            "data:image/jpeg;base64,{cleaned}"
        )));
    }

    None
}

/// Depth-first search for the first qualifying string inside a JSON value.
///
/// Fields may be strings, nested objects, or arrays of either, in arbitrary
/// order; the explicit depth parameter bounds recursion against pathological
/// input. Values nested deeper than [`MAX_SEARCH_DEPTH`] are not inspected.
fn search_value(value: &serde_json::Value, depth: usize) -> Option<NormalizedImage> {
    match value {
        serde_json::Value::String(s) => classify_candidate(s),
        serde_json::Value::Array(items) if depth < MAX_SEARCH_DEPTH => {
            items.iter().find_map(|v| search_value(v, depth + 1))
        }
        serde_json::Value::Object(map) if depth < MAX_SEARCH_DEPTH => {
            map.values().find_map(|v| search_value(v, depth + 1))
        }
        _ => None,
    }
}

/// Split a `data:image/<fmt>;base64,` URI into its prefix and payload.
fn split_data_uri(s: &str) -> Option<(&str, &str)> {
    if !s.starts_with("data:image/") {
        return None;
    }
    let comma = s.find(',')?;
    let (head, payload) = s.split_at(comma + 1);
    if !head[..comma].ends_with(";base64") {
        return None;
    }
    Some((head, payload))
}

fn is_base64_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'='
}

fn image_subtype(content_type: &str) -> &str {
    let ct = content_type.trim();
    let ct = ct.split(';').next().unwrap_or(ct).trim();
    match ct.strip_prefix("image/") {
        Some(sub) if !sub.is_empty() => sub,
        _ => "jpeg",
    }
}

fn data_uri_from_bytes(bytes: &[u8], subtype: &str) -> NormalizedImage {
    NormalizedImage::DataUri(format!(
        "data:image/{subtype};base64,{}",
        BASE64.encode(bytes)
    ))
}

fn no_result() -> CharmloomError {
    CharmloomError::normalization("no result image found")
}

#[cfg(test)]
#[path = "../../tests/unit/enhance/normalize.rs"]
mod tests;
