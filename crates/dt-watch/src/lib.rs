//! Navigation watching and affordance reconciliation.

pub mod host;
pub mod session;
pub mod signal;

pub use host::HISTORY_DEBOUNCE;
pub use host::NavigationHost;
pub use host::URL_POLL_PERIOD;
pub use session::Activation;
pub use session::UiState;
pub use session::WatcherSession;
pub use signal::NavigationSignal;
