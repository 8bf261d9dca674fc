//! Static route rules and destination templates.

/// Sub-path placeholder inside destination templates.
pub const SUBPATH_PLACEHOLDER: &str = "$1";

/// One target a route can redirect to.
///
/// The template contains a single `$1` placeholder that receives the residual
/// sub-path (leading `/` included, or empty when the page sits on the route
/// root).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub domain: &'static str,
    pub label: &'static str,
    pub template: &'static str,
}

/// A recognized first path segment and its destinations.
///
/// Declaration order is presentation order: the first destination is the
/// primary action and renders on top. No rule declares more than two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub segment: &'static str,
    pub destinations: &'static [Destination],
}

const INTL_ARTICLE: Destination = Destination {
    domain: "luogu.com",
    label: "前往 国际站",
    template: "https://luogu.com/article$1",
};

const ME_ARTICLE: Destination = Destination {
    domain: "luogu.me",
    label: "前往 luogu.me",
    template: "https://luogu.me/article$1",
};

const INTL_PASTE: Destination = Destination {
    domain: "luogu.com",
    label: "前往 国际站",
    template: "https://luogu.com/paste$1",
};

const ME_PASTE: Destination = Destination {
    domain: "luogu.me",
    label: "前往 luogu.me",
    template: "https://luogu.me/paste$1",
};

const INTL_DISCUSS: Destination = Destination {
    domain: "luogu.com",
    label: "前往 国际站",
    template: "https://luogu.com/discuss$1",
};

/// Shipped rule set: article and paste pages offer both alternate domains,
/// discussion pages only exist on the international site.
pub const DEFAULT_RULES: &[RouteRule] = &[
    RouteRule {
        segment: "article",
        destinations: &[INTL_ARTICLE, ME_ARTICLE],
    },
    RouteRule {
        segment: "paste",
        destinations: &[INTL_PASTE, ME_PASTE],
    },
    RouteRule {
        segment: "discuss",
        destinations: &[INTL_DISCUSS],
    },
];

/// Host suffix the helper activates on.
pub const DEFAULT_HOST_SUFFIX: &str = "luogu.com.cn";
