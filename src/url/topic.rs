use url::Url;

/// Characters that are not allowed in file names on Windows
const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const MAX_SLUG_CHARS: usize = 100;

/// Derives a filesystem-safe slug from a topic URL
///
/// The numeric topic id after `--` is dropped, hyphens become underscores,
/// and characters that are invalid in file names are removed. Falls back to
/// `"topic"` when nothing usable remains.
///
/// # Examples
///
/// ```
/// use sozluk_ripple::url::topic_slug;
/// use url::Url;
///
/// let url = Url::parse("https://eksisozluk.com/baslik-ismi--123").unwrap();
/// assert_eq!(topic_slug(&url), "baslik_ismi");
/// ```
pub fn topic_slug(url: &Url) -> String {
    let path = url.path().trim_matches('/');

    let title = match path.split_once("--") {
        Some((title, _id)) => title,
        None => path,
    };

    let cleaned: String = title
        .replace(['-', ' '], "_")
        .chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(c))
        .collect();

    let trimmed: String = cleaned
        .trim_matches(|c| c == '_' || c == '.' || c == ' ')
        .chars()
        .take(MAX_SLUG_CHARS)
        .collect();

    if trimmed.is_empty() {
        "topic".to_string()
    } else {
        trimmed
    }
}
