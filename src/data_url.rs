//! `data:` URL decoding (RFC 2397).
//!
//! Uploaded photos usually reach the preview as base64 data URLs, so the
//! default loader decodes them in memory.

use base64::Engine;

use crate::loader::LoadError;

const DEFAULT_MEDIA_TYPE: &str = "text/plain";

/// The payload of a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Declared media type without parameters, `text/plain` when absent.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Decodes `data:[<mediatype>][;base64],<data>`.
pub fn decode_data_url(url: &str) -> Result<DataUrl, LoadError> {
    let url = url.trim();
    let rest = match url.split_once(':') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("data") => rest,
        _ => return Err(invalid("URL does not start with 'data:'")),
    };
    let (metadata, data) = rest
        .split_once(',')
        .ok_or_else(|| invalid("missing comma in data URL"))?;

    let (media_type, is_base64) = parse_metadata(metadata);
    let bytes = if is_base64 {
        decode_base64(data)?
    } else {
        percent_decode(data)?
    };

    Ok(DataUrl { media_type, bytes })
}

/// Short form of a data URL for logs: scheme and metadata, no payload.
pub fn describe(url: &str) -> String {
    match url.split_once(',') {
        Some((metadata, data)) => format!("{metadata},<{} chars>", data.len()),
        None => url.to_string(),
    }
}

fn parse_metadata(metadata: &str) -> (String, bool) {
    let mut parts = metadata.split(';');
    let media_type = parts.next().unwrap_or("").trim();
    let is_base64 = parts.any(|param| param.trim().eq_ignore_ascii_case("base64"));

    let media_type = if media_type.is_empty() {
        DEFAULT_MEDIA_TYPE.to_string()
    } else {
        media_type.to_ascii_lowercase()
    };
    (media_type, is_base64)
}

/// Base64 payloads may be wrapped with ASCII whitespace.
fn decode_base64(data: &str) -> Result<Vec<u8>, LoadError> {
    let cleaned: Vec<u8> = data.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(cleaned)
        .map_err(|err| invalid(format!("invalid base64: {err}")))
}

/// Percent-decodes without treating `+` as a space.
fn percent_decode(input: &str) -> Result<Vec<u8>, LoadError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let hex = bytes
            .get(i + 1..i + 3)
            .filter(|pair| pair.iter().all(u8::is_ascii_hexdigit))
            .and_then(|pair| std::str::from_utf8(pair).ok())
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .ok_or_else(|| invalid("invalid percent-escape"))?;
        out.push(hex);
        i += 3;
    }

    Ok(out)
}

fn invalid(reason: impl Into<String>) -> LoadError {
    LoadError::DataUrl(reason.into())
}
