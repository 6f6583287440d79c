use sha2::{Digest, Sha256};
use url::Url;

const MAX_HOST_CHARS: usize = 60;

/// Origin a page's local settings belong to, e.g. `https://chat.example.com`.
///
/// Unparseable input and opaque origins (such as `file:` pages) fall back to the raw text.
pub fn origin_key(page_url: &str) -> String {
    match Url::parse(page_url.trim()) {
        Ok(url) => {
            let origin = url.origin();
            if origin.is_tuple() {
                origin.ascii_serialization()
            } else {
                page_url.trim().to_string()
            }
        }
        Err(_) => page_url.trim().to_string(),
    }
}

/// Filename of the per-origin local store: `{sanitized_host}--{short_hash(origin)}.ron`.
pub fn origin_store_filename(page_url: &str) -> String {
    let key = origin_key(page_url);
    let host = Url::parse(&key)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "local".to_string());
    format!("{}--{}.ron", sanitize_host(&host), short_hash(&key))
}

fn sanitize_host(host: &str) -> String {
    let cleaned: String = host
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_HOST_CHARS)
        .collect();
    let cleaned = cleaned.trim_matches(&['_', '.'][..]);
    if cleaned.is_empty() {
        "local".to_string()
    } else {
        cleaned.to_string()
    }
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
