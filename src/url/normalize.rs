use crate::UrlError;
use url::Url;

/// Schemes accepted verbatim; anything else gets `https://` prepended
const KNOWN_SCHEMES: &[&str] = &["http://", "https://"];

/// Normalizes a business-supplied website string into an absolute URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject if empty
/// 2. If the input already starts with `http://` or `https://`, parse as-is
/// 3. Otherwise prepend `https://` and parse
/// 4. Reject URLs without a host
///
/// Parsing through [`Url`] lowercases the host and turns an empty path into
/// `/`, so `example.com` becomes `https://example.com/`.
///
/// # Arguments
///
/// * `raw` - The website string as the business entered it
///
/// # Returns
///
/// * `Ok(Url)` - Absolute URL
/// * `Err(UrlError::InvalidUrl)` - Empty or unparsable input
///
/// # Examples
///
/// ```
/// use site_corpus::url::normalize_root_url;
///
/// let url = normalize_root_url("  example.com ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// ```
pub fn normalize_root_url(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid(raw, "empty URL"));
    }

    let candidate = if KNOWN_SCHEMES
        .iter()
        .any(|scheme| trimmed.starts_with(scheme))
    {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| invalid(raw, &e.to_string()))?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(raw, "missing host"));
    }

    Ok(url)
}

fn invalid(input: &str, reason: &str) -> UrlError {
    UrlError::InvalidUrl {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
