use url::Url;

use crate::error::{FetchError, Result};

/// Default local file name for `url`: its last path segment.
///
/// Query string and fragment are not part of the name. Fails if the URL does
/// not parse or ends with `/`.
///
/// ```
/// use dsprep_fetch::filename_from_url;
///
/// let name = filename_from_url("https://example.com/data/cifar-10.tar.gz?dl=1").unwrap();
/// assert_eq!(name, "cifar-10.tar.gz");
/// ```
pub fn filename_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;

    match parsed.path_segments().and_then(|mut s| s.next_back()) {
        Some(last) if !last.is_empty() => Ok(last.to_owned()),
        _ => Err(FetchError::InvalidUrl {
            url: url.to_owned(),
            reason: "URL path has no file name".to_owned(),
        }),
    }
}
