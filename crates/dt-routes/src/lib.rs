//! Route matching contracts: locations, rule tables, and URL building.

pub mod location;
pub mod resolve;
pub mod rules;

pub use location::PageLocation;
pub use resolve::RedirectAction;
pub use resolve::RouteTable;
pub use rules::DEFAULT_HOST_SUFFIX;
pub use rules::DEFAULT_RULES;
pub use rules::Destination;
pub use rules::RouteRule;
