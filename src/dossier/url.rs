// SPDX-License-Identifier: MPL-2.0
//! URL shapes of the file service.
//!
//! Links inside dossier records carry whatever host the service saw, so every
//! service link is passed through [`rebase`] before use.

use reqwest::Url;

const DOSSIERS_SEGMENT: &str = "dossiers/";
const NOCACHE_PARAM: &str = "_nocache";

/// Percent-encodes one path or query component.
pub fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Rewrites `url` onto `base`, keeping the part after `dossiers/` and the query.
///
/// URLs without a `dossiers/` path segment are only made absolute.
pub fn rebase(base: &str, url: &str) -> String {
    let (path, query) = match url.find('?') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    };
    let path = path.split('#').next().unwrap_or_default();

    match path.find(DOSSIERS_SEGMENT) {
        Some(idx) => {
            let rest = &path[idx + DOSSIERS_SEGMENT.len()..];
            format!("{}/dossiers/{}{}", base.trim_end_matches('/'), rest, query)
        }
        None => absolutize(base, url),
    }
}

/// Resolves a server-relative link (`/path?q`) against the origin of `base`.
///
/// Absolute URLs and anything that cannot be joined are returned unchanged.
pub fn absolutize(base: &str, url: &str) -> String {
    if Url::parse(url).is_ok() {
        return url.to_string();
    }
    Url::parse(base)
        .and_then(|base| base.join(url))
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}

/// Appends the cache-busting parameter derived from a version marker.
///
/// Only the digits of `last_modified` are kept.
pub fn image_src(url: &str, last_modified: Option<&str>) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    let digits: String = last_modified
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    format!("{url}{separator}{NOCACHE_PARAM}={digits}")
}

/// Builds the image URL of a container page.
pub fn page_src(container_url: &str, page_name: &str, last_modified: Option<&str>) -> String {
    let root = container_url.replacen("index.json", "", 1);
    let root = root.strip_suffix('/').unwrap_or(&root);
    image_src(
        &format!("{root}/{}", encode_component(page_name)),
        last_modified,
    )
}

/// Returns a file name for downloaded bytes from the last path segment.
pub fn file_name_of(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .and_then(|segment| urlencoding::decode(segment).ok())
        .map(|segment| segment.into_owned())
        .filter(|segment| !segment.contains(':'))
        .unwrap_or_else(|| "blob".to_string())
}
