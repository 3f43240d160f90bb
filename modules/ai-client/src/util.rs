use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;

/// Decode a provider response body, turning non-2xx statuses into errors that
/// carry the status and the raw body text.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    provider: &str,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await?;
        return Err(anyhow!("{} API error ({}): {}", provider, status, error_text));
    }
    Ok(response.json().await?)
}

/// Truncate a string to at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Rough token count for providers that do not report usage: one token per
/// three characters.
pub fn estimate_tokens(text: &str) -> u32 {
    (text.chars().count() / 3) as u32
}
