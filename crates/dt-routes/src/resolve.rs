//! Route matching and destination URL building.

use crate::location::PageLocation;
use crate::rules::DEFAULT_HOST_SUFFIX;
use crate::rules::DEFAULT_RULES;
use crate::rules::Destination;
use crate::rules::RouteRule;
use crate::rules::SUBPATH_PLACEHOLDER;
use tracing::warn;
use url::Url;

/// Resolved redirect offer for the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectAction {
    pub label: String,
    pub url: String,
}

/// Activation gate plus rule list. Pure data; `resolve` never touches
/// anything but its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    pub host_suffix: &'static str,
    pub rules: &'static [RouteRule],
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            host_suffix: DEFAULT_HOST_SUFFIX,
            rules: DEFAULT_RULES,
        }
    }
}

impl RouteTable {
    /// Returns the redirect actions for the given location, in rule
    /// declaration order. Empty when the host is outside the activation
    /// suffix, when no route matches, or when every destination would
    /// redirect to the page itself.
    pub fn resolve(&self, location: &PageLocation) -> Vec<RedirectAction> {
        if !host_matches_suffix(location.host(), self.host_suffix) {
            return Vec::new();
        }

        let Some((rule, residual)) = self.matched_rule(location.path()) else {
            return Vec::new();
        };

        rule.destinations
            .iter()
            .map(|destination| RedirectAction {
                label: destination.label.to_owned(),
                url: build_destination_url(destination, residual, location.href()),
            })
            .filter(|action| action.url != location.href())
            .collect()
    }

    /// Matches the path's first segment against the rule identifiers and
    /// returns the residual sub-path (`""` on the route root, otherwise
    /// `/rest`).
    fn matched_rule<'p>(&self, path: &'p str) -> Option<(&RouteRule, &'p str)> {
        self.rules.iter().find_map(|rule| {
            let tail = path.strip_prefix('/')?.strip_prefix(rule.segment)?;
            (tail.is_empty() || tail.starts_with('/')).then_some((rule, tail))
        })
    }
}

fn host_matches_suffix(host: &str, suffix: &str) -> bool {
    let normalized = host.trim_end_matches('.');
    normalized == suffix || normalized.ends_with(&format!(".{suffix}"))
}

/// Substitutes the residual sub-path into the template and carries over the
/// current page's query and fragment, unless the template already defines its
/// own. A malformed current href skips enrichment rather than failing.
fn build_destination_url(destination: &Destination, residual: &str, current_href: &str) -> String {
    let mut target = destination.template.replacen(SUBPATH_PLACEHOLDER, residual, 1);
    if residual.is_empty() && target.ends_with('/') {
        target.pop();
    }

    match Url::parse(current_href) {
        Ok(current) => {
            if let Some(query) = current.query() {
                if !query.is_empty() && !target.contains('?') {
                    target.push('?');
                    target.push_str(query);
                }
            }

            if let Some(fragment) = current.fragment() {
                if !fragment.is_empty() && !target.contains('#') {
                    target.push('#');
                    target.push_str(fragment);
                }
            }
        }
        Err(error) => {
            warn!(
                href = current_href,
                %error,
                "skipping query/fragment enrichment for unparsable location"
            );
        }
    }

    target
}
