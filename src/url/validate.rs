use crate::{UrlError, UrlResult};
use url::Url;

/// Parses every seed, failing on the first entry that cannot be crawled
///
/// # Rules
///
/// - The list must not be empty
/// - Each entry must parse as an absolute URL
/// - The scheme must be `http` or `https`
/// - The URL must carry a host
///
/// # Returns
///
/// * `Ok(Vec<Url>)` - The parsed seeds, in input order
/// * `Err(UrlError::EmptyInput)` - The list was empty
/// * `Err(UrlError::InvalidUrl)` - The first offending entry
pub fn parse_seeds(urls: &[String]) -> UrlResult<Vec<Url>> {
    if urls.is_empty() {
        return Err(UrlError::EmptyInput);
    }

    urls.iter().map(|raw| parse_seed(raw)).collect()
}

/// Checks a seed list without keeping the parsed result
///
/// Runs before any network activity; a single bad entry rejects the whole
/// list.
///
/// # Example
///
/// ```
/// use wiki_reader::url::validate_urls;
///
/// assert!(validate_urls(&["https://example.com/a".to_string()]).is_ok());
/// assert!(validate_urls(&[]).is_err());
/// assert!(validate_urls(&["ftp://example.com".to_string()]).is_err());
/// ```
pub fn validate_urls(urls: &[String]) -> UrlResult<()> {
    parse_seeds(urls).map(|_| ())
}

fn parse_seed(raw: &str) -> UrlResult<Url> {
    let invalid = |reason: String| UrlError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url)
}
