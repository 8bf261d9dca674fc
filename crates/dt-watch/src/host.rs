//! Capabilities the host environment provides to the watcher.

use dt_core::RedirectResult;
use std::time::Duration;

/// Delay between an intercepted history call and re-evaluation, so the target
/// app's own asynchronous DOM updates can finish first.
pub const HISTORY_DEBOUNCE: Duration = Duration::from_millis(120);

/// Fallback URL poll period when mutation observation is unavailable.
pub const URL_POLL_PERIOD: Duration = Duration::from_secs(1);

/// Host-side navigation plumbing.
///
/// All callbacks are serialized by the host's event loop; implementations
/// never run a watcher method re-entrantly. After `schedule_recheck` the host
/// invokes [`WatcherSession::on_recheck_due`] once the delay elapses; an
/// active subtree observation or URL poll delivers
/// [`NavigationSignal::SubtreeMutated`] / [`NavigationSignal::PollTick`]
/// through [`WatcherSession::on_signal`].
///
/// [`WatcherSession::on_recheck_due`]: crate::WatcherSession::on_recheck_due
/// [`WatcherSession::on_signal`]: crate::WatcherSession::on_signal
/// [`NavigationSignal::SubtreeMutated`]: crate::NavigationSignal::SubtreeMutated
/// [`NavigationSignal::PollTick`]: crate::NavigationSignal::PollTick
pub trait NavigationHost {
    /// Full URL of the page as currently shown.
    fn current_href(&self) -> String;

    /// Arms a one-shot recheck timer.
    fn schedule_recheck(&mut self, delay: Duration);

    /// Starts subtree mutation observation. Fails when the mechanism is
    /// unavailable in this environment (`watch.observe_unavailable`).
    fn observe_subtree(&mut self) -> RedirectResult<()>;

    /// Stops a previously started subtree observation.
    fn disconnect_observer(&mut self);

    /// Starts the fallback URL poll.
    fn start_url_poll(&mut self, period: Duration);

    /// Stops the fallback URL poll.
    fn stop_url_poll(&mut self);
}
