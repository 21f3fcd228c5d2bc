use url::Url;

/// Extracts the politeness key for a URL
///
/// The key is the lowercase host. Ports are ignored, so two services on the
/// same host share one budget.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wiki_reader::url::extract_domain;
///
/// let url = Url::parse("https://EN.Wikipedia.org/wiki/Robot").unwrap();
/// assert_eq!(extract_domain(&url), Some("en.wikipedia.org".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
