use crate::{UrlError, UrlResult};
use url::Url;

/// Query parameter that selects a page of a topic
const PAGE_PARAM: &str = "p";

/// Normalizes a topic URL into its canonical base form
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace and parse; reject if malformed
/// 2. Accept only HTTP and HTTPS schemes
/// 3. Lowercase the host and check it against `allowed_hosts`
/// 4. Require a topic path (the site root is not a topic)
/// 5. Drop the query string (`?p=7`, `?a=popular`, ...) and the fragment
///
/// The result carries no page parameter; use [`page_url`] to address a page.
///
/// # Examples
///
/// ```
/// use sozluk_ripple::url::normalize_topic_url;
///
/// let hosts = vec!["eksisozluk.com".to_string()];
/// let url = normalize_topic_url("https://EKSISOZLUK.com/test--114?p=3#x", &hosts).unwrap();
/// assert_eq!(url.as_str(), "https://eksisozluk.com/test--114");
/// ```
pub fn normalize_topic_url(raw: &str, allowed_hosts: &[String]) -> UrlResult<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = match url.host_str() {
        Some(host) => host.to_lowercase(),
        None => return Err(UrlError::MissingDomain),
    };

    if !host_allowed(&host, allowed_hosts) {
        return Err(UrlError::UnsupportedHost(host));
    }

    url.set_host(Some(&host))
        .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;

    let path = url.path().trim_end_matches('/').to_string();
    if path.is_empty() {
        return Err(UrlError::Malformed(format!(
            "'{}' does not point at a topic",
            raw.trim()
        )));
    }
    url.set_path(&path);

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Builds the URL of a 1-based page of a normalized topic
///
/// # Examples
///
/// ```
/// use sozluk_ripple::url::page_url;
/// use url::Url;
///
/// let base = Url::parse("https://eksisozluk.com/test--114").unwrap();
/// assert_eq!(page_url(&base, 2).as_str(), "https://eksisozluk.com/test--114?p=2");
/// ```
pub fn page_url(base: &Url, page: u32) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair(PAGE_PARAM, &page.to_string());
    url
}

/// Checks a host against the allow list
///
/// A host matches an entry when it is equal to it or is one of its
/// subdomains, with or without a leading `www.`.
pub fn host_allowed(host: &str, allowed_hosts: &[String]) -> bool {
    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    allowed_hosts.iter().any(|allowed| {
        let allowed = allowed.to_lowercase();
        host == allowed || host.ends_with(&format!(".{}", allowed))
    })
}
