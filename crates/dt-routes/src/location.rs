//! Current-page location contracts.

use dt_core::RedirectError;
use dt_core::RedirectResult;
use url::Url;

/// Snapshot of the location the page is currently showing.
///
/// Matching only needs the host and path; the full href is kept so the URL
/// builder can enrich destinations with the original query and fragment, and
/// so self-redirects can be detected by byte comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    host: String,
    path: String,
    href: String,
}

impl PageLocation {
    /// Builds a location from already-separated parts.
    ///
    /// The href is not validated here: enrichment parses it lazily and
    /// degrades gracefully when it is malformed.
    pub fn new(host: impl Into<String>, path: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            host: host.into().to_ascii_lowercase(),
            path: path.into(),
            href: href.into(),
        }
    }

    /// Parses a full href into a location.
    pub fn from_href(href: &str) -> RedirectResult<Self> {
        let parsed = Url::parse(href).map_err(|error| {
            RedirectError::new(
                "routes.location.invalid",
                format!("failed to parse location `{href}`: {error}"),
            )
        })?;

        if parsed.cannot_be_a_base() {
            return Err(RedirectError::new(
                "routes.location.invalid_base",
                "location cannot be used for route matching",
            ));
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| {
                RedirectError::new("routes.location.host_missing", "location must include a host")
            })?
            .to_ascii_lowercase();

        Ok(Self {
            host,
            path: parsed.path().to_owned(),
            href: href.to_owned(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn href(&self) -> &str {
        &self.href
    }
}

#[cfg(test)]
mod tests {
    use super::PageLocation;

    #[test]
    fn parses_host_and_path_from_href() {
        let location = PageLocation::from_href("https://www.luogu.com.cn/article/123?x=1#top");
        assert!(location.is_ok());

        let location = match location {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        };
        assert_eq!(location.host(), "www.luogu.com.cn");
        assert_eq!(location.path(), "/article/123");
        assert_eq!(location.href(), "https://www.luogu.com.cn/article/123?x=1#top");
    }

    #[test]
    fn lowercases_host() {
        let location = PageLocation::new("WWW.Luogu.Com.Cn", "/paste/a1", "https://x/");
        assert_eq!(location.host(), "www.luogu.com.cn");
    }

    #[test]
    fn rejects_unparsable_href() {
        assert!(PageLocation::from_href("not a url").is_err());
    }

    #[test]
    fn rejects_non_base_href() {
        assert!(PageLocation::from_href("data:text/plain,hi").is_err());
    }
}
