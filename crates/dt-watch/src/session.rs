//! Per-page watcher session: reconciles the affordance with the current route.

use crate::host::HISTORY_DEBOUNCE;
use crate::host::NavigationHost;
use crate::host::URL_POLL_PERIOD;
use crate::signal::NavigationSignal;
use dt_routes::PageLocation;
use dt_routes::RedirectAction;
use dt_routes::RouteTable;
use dt_surface::AffordanceSpec;
use dt_surface::STYLE_ELEMENT_ID;
use dt_surface::StyleConfig;
use dt_surface::UiSurface;
use dt_surface::stylesheet;
use tracing::debug;
use tracing::warn;

/// Whether the affordance is currently mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiState {
    Absent,
    /// Mounted with the resolved actions, primary first. Transition logic
    /// does not distinguish one from two actions; the actions are kept only
    /// so section activation can look up its URL.
    Present { actions: Vec<RedirectAction> },
}

/// Outcome of a section click, reported back to the host so it can stop the
/// event from reaching ancestor handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Consumed,
    Ignored,
}

/// Owns every piece of mutable watcher state for one page session.
///
/// All methods run on the host's serialized callbacks; there is no interior
/// concurrency. `shutdown` must be called on page teardown so no observer or
/// poll outlives the page.
pub struct WatcherSession<H: NavigationHost, S: UiSurface> {
    host: H,
    surface: S,
    table: RouteTable,
    style: StyleConfig,
    last_seen_href: String,
    ui: UiState,
    style_injected: bool,
    recheck_pending: bool,
    observer_active: bool,
    poll_active: bool,
}

impl<H: NavigationHost, S: UiSurface> WatcherSession<H, S> {
    pub fn new(host: H, surface: S, table: RouteTable) -> Self {
        Self::with_style(host, surface, table, StyleConfig::default())
    }

    pub fn with_style(host: H, surface: S, table: RouteTable, style: StyleConfig) -> Self {
        Self {
            host,
            surface,
            table,
            style,
            last_seen_href: String::new(),
            ui: UiState::Absent,
            style_injected: false,
            recheck_pending: false,
            observer_active: false,
            poll_active: false,
        }
    }

    /// Initial evaluation plus change-detection wiring. Mutation observation
    /// is preferred; when the host cannot provide it, the session falls back
    /// to polling the URL.
    pub fn start(&mut self) {
        self.reconcile();

        match self.host.observe_subtree() {
            Ok(()) => self.observer_active = true,
            Err(error) => {
                warn!(%error, "subtree observation unavailable, falling back to URL polling");
                self.host.start_url_poll(URL_POLL_PERIOD);
                self.poll_active = true;
            }
        }
    }

    /// Entry point for every host-produced navigation signal.
    pub fn on_signal(&mut self, signal: NavigationSignal) {
        if signal.is_history() {
            // Coalesce bursts: one pending recheck covers any number of
            // intercepted history calls until it fires.
            if !self.recheck_pending {
                self.recheck_pending = true;
                self.host.schedule_recheck(HISTORY_DEBOUNCE);
            }
            return;
        }

        if signal.is_passive() {
            if self.host.current_href() != self.last_seen_href {
                debug!(signal = signal.as_str(), "url changed, re-evaluating");
                self.reconcile();
            }
            return;
        }

        self.reconcile();
    }

    /// Fires when the debounce timer armed via
    /// [`NavigationHost::schedule_recheck`] elapses.
    pub fn on_recheck_due(&mut self) {
        self.recheck_pending = false;
        self.reconcile();
    }

    /// Routes a click on section `index` of the mounted affordance. Returns
    /// [`Activation::Consumed`] when a destination was opened; the host must
    /// then stop the click's propagation.
    pub fn activate_section(&mut self, index: usize) -> Activation {
        let url = match &self.ui {
            UiState::Present { actions } => actions.get(index).map(|action| action.url.clone()),
            UiState::Absent => None,
        };

        match url {
            Some(url) => {
                self.surface.open_in_new_context(&url);
                Activation::Consumed
            }
            None => Activation::Ignored,
        }
    }

    /// Page teardown: removes the affordance and releases the observer and
    /// poll so nothing outlives the page.
    pub fn shutdown(&mut self) {
        self.surface.clear();
        self.ui = UiState::Absent;

        if self.observer_active {
            self.host.disconnect_observer();
            self.observer_active = false;
        }

        if self.poll_active {
            self.host.stop_url_poll();
            self.poll_active = false;
        }
    }

    pub fn ui_state(&self) -> &UiState {
        &self.ui
    }

    pub fn last_seen_href(&self) -> &str {
        &self.last_seen_href
    }

    fn reconcile(&mut self) {
        let href = self.host.current_href();
        self.last_seen_href = href.clone();

        let actions = match PageLocation::from_href(&href) {
            Ok(location) => self.table.resolve(&location),
            Err(error) => {
                debug!(%error, "current location did not parse, treating as unmatched");
                Vec::new()
            }
        };

        if actions.is_empty() {
            if !matches!(self.ui, UiState::Absent) {
                self.surface.clear();
                self.ui = UiState::Absent;
            }
            return;
        }

        // Any non-empty result rebuilds the affordance from scratch.
        self.surface.clear();
        self.ensure_style();

        let pairs: Vec<(String, String)> = actions
            .iter()
            .map(|action| (action.label.clone(), action.url.clone()))
            .collect();

        let presented = AffordanceSpec::from_actions(&pairs)
            .and_then(|spec| self.surface.present(&spec));

        match presented {
            Ok(()) => {
                debug!(href = href.as_str(), count = actions.len(), "affordance presented");
                self.ui = UiState::Present { actions };
            }
            Err(error) => {
                warn!(%error, "failed to present affordance");
                self.ui = UiState::Absent;
            }
        }
    }

    fn ensure_style(&mut self) {
        if self.style_injected {
            return;
        }

        self.surface
            .ensure_stylesheet(STYLE_ELEMENT_ID, &stylesheet(&self.style));
        self.style_injected = true;
    }
}

#[cfg(test)]
mod tests {
    use super::Activation;
    use super::NavigationSignal;
    use super::UiState;
    use super::WatcherSession;
    use crate::host::NavigationHost;
    use dt_core::RedirectError;
    use dt_core::RedirectResult;
    use dt_routes::Destination;
    use dt_routes::RouteRule;
    use dt_routes::RouteTable;
    use dt_surface::AffordanceSpec;
    use dt_surface::UiSurface;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Default)]
    struct PageModel {
        href: String,
        mounted: Option<Vec<(String, String)>>,
        stylesheet_installs: Vec<String>,
        opened: Vec<String>,
        rechecks_scheduled: Vec<Duration>,
        observe_fails: bool,
        observer_active: bool,
        poll_active: bool,
        clears: usize,
        presents: usize,
    }

    type SharedPage = Rc<RefCell<PageModel>>;

    fn page(href: &str) -> SharedPage {
        Rc::new(RefCell::new(PageModel {
            href: href.to_owned(),
            ..PageModel::default()
        }))
    }

    struct FakeHost(SharedPage);

    impl NavigationHost for FakeHost {
        fn current_href(&self) -> String {
            self.0.borrow().href.clone()
        }

        fn schedule_recheck(&mut self, delay: Duration) {
            self.0.borrow_mut().rechecks_scheduled.push(delay);
        }

        fn observe_subtree(&mut self) -> RedirectResult<()> {
            let mut model = self.0.borrow_mut();
            if model.observe_fails {
                return Err(RedirectError::new(
                    "watch.observe_unavailable",
                    "mutation observation disabled in this environment",
                ));
            }
            model.observer_active = true;
            Ok(())
        }

        fn disconnect_observer(&mut self) {
            self.0.borrow_mut().observer_active = false;
        }

        fn start_url_poll(&mut self, _period: Duration) {
            self.0.borrow_mut().poll_active = true;
        }

        fn stop_url_poll(&mut self) {
            self.0.borrow_mut().poll_active = false;
        }
    }

    struct FakeSurface(SharedPage);

    impl UiSurface for FakeSurface {
        fn ensure_stylesheet(&mut self, id: &str, _css: &str) {
            let mut model = self.0.borrow_mut();
            if !model.stylesheet_installs.iter().any(|seen| seen == id) {
                model.stylesheet_installs.push(id.to_owned());
            }
        }

        fn present(&mut self, affordance: &AffordanceSpec) -> RedirectResult<()> {
            let mut model = self.0.borrow_mut();
            model.presents += 1;
            model.mounted = Some(
                affordance
                    .sections()
                    .iter()
                    .map(|section| (section.label.clone(), section.url.clone()))
                    .collect(),
            );
            Ok(())
        }

        fn clear(&mut self) {
            let mut model = self.0.borrow_mut();
            if model.mounted.take().is_some() {
                model.clears += 1;
            }
        }

        fn open_in_new_context(&mut self, url: &str) {
            self.0.borrow_mut().opened.push(url.to_owned());
        }
    }

    fn session(model: &SharedPage) -> WatcherSession<FakeHost, FakeSurface> {
        WatcherSession::new(
            FakeHost(Rc::clone(model)),
            FakeSurface(Rc::clone(model)),
            RouteTable::default(),
        )
    }

    #[test]
    fn start_on_article_page_mounts_two_sections_primary_first() {
        let model = page("https://www.luogu.com.cn/article/456");
        let mut watcher = session(&model);
        watcher.start();

        let state = model.borrow();
        let mounted = state.mounted.clone();
        assert!(mounted.is_some());
        let mounted = match mounted {
            Some(value) => value,
            None => unreachable!(),
        };
        assert_eq!(mounted.len(), 2);
        assert_eq!(mounted[0].0, "前往 国际站");
        assert_eq!(mounted[0].1, "https://luogu.com/article/456");
        assert!(state.observer_active);
        assert!(!state.poll_active);
    }

    #[test]
    fn start_on_unmatched_page_mounts_nothing() {
        let model = page("https://www.luogu.com.cn/training/list");
        let mut watcher = session(&model);
        watcher.start();

        assert!(model.borrow().mounted.is_none());
        assert_eq!(*watcher.ui_state(), UiState::Absent);
    }

    #[test]
    fn sole_self_redirect_destination_renders_nothing() {
        static RULES: &[RouteRule] = &[RouteRule {
            segment: "discuss",
            destinations: &[Destination {
                domain: "luogu.com.cn",
                label: "loop",
                template: "https://www.luogu.com.cn/discuss$1",
            }],
        }];

        let model = page("https://www.luogu.com.cn/discuss/789");
        let mut watcher = WatcherSession::new(
            FakeHost(Rc::clone(&model)),
            FakeSurface(Rc::clone(&model)),
            RouteTable {
                host_suffix: "luogu.com.cn",
                rules: RULES,
            },
        );
        watcher.start();

        assert!(model.borrow().mounted.is_none());
        assert_eq!(model.borrow().presents, 0);
    }

    #[test]
    fn navigating_to_unmatched_route_removes_affordance() {
        let model = page("https://www.luogu.com.cn/article/456");
        let mut watcher = session(&model);
        watcher.start();
        assert!(model.borrow().mounted.is_some());

        model.borrow_mut().href = "https://www.luogu.com.cn/unrelated/page".to_owned();
        watcher.on_signal(NavigationSignal::SubtreeMutated);

        assert!(model.borrow().mounted.is_none());
        assert_eq!(*watcher.ui_state(), UiState::Absent);
    }

    #[test]
    fn unrelated_mutations_do_not_rebuild() {
        let model = page("https://www.luogu.com.cn/article/456");
        let mut watcher = session(&model);
        watcher.start();
        assert_eq!(model.borrow().presents, 1);

        watcher.on_signal(NavigationSignal::SubtreeMutated);
        watcher.on_signal(NavigationSignal::SubtreeMutated);
        watcher.on_signal(NavigationSignal::PollTick);

        assert_eq!(model.borrow().presents, 1);
    }

    #[test]
    fn spa_route_swap_reconciles_once_per_distinct_url() {
        let model = page("https://www.luogu.com.cn/article/1");
        let mut watcher = session(&model);
        watcher.start();
        assert_eq!(model.borrow().presents, 1);

        model.borrow_mut().href = "https://www.luogu.com.cn/article/2".to_owned();
        watcher.on_signal(NavigationSignal::SubtreeMutated);
        watcher.on_signal(NavigationSignal::SubtreeMutated);

        assert_eq!(model.borrow().presents, 2);
        assert_eq!(watcher.last_seen_href(), "https://www.luogu.com.cn/article/2");
    }

    #[test]
    fn history_signal_burst_schedules_one_recheck() {
        let model = page("https://www.luogu.com.cn/article/1");
        let mut watcher = session(&model);
        watcher.start();

        watcher.on_signal(NavigationSignal::HistoryPush);
        watcher.on_signal(NavigationSignal::HistoryReplace);
        watcher.on_signal(NavigationSignal::HistoryPop);
        assert_eq!(model.borrow().rechecks_scheduled.len(), 1);

        model.borrow_mut().href = "https://www.luogu.com.cn/paste/xyz".to_owned();
        watcher.on_recheck_due();

        let state = model.borrow();
        let mounted = state.mounted.clone();
        assert!(mounted.is_some_and(|sections| sections[0].1 == "https://luogu.com/paste/xyz"));
        drop(state);

        // Pending flag cleared: the next history call arms a fresh timer.
        watcher.on_signal(NavigationSignal::HistoryPush);
        assert_eq!(model.borrow().rechecks_scheduled.len(), 2);
    }

    #[test]
    fn observe_failure_falls_back_to_polling() {
        let model = page("https://www.luogu.com.cn/article/1");
        model.borrow_mut().observe_fails = true;
        let mut watcher = session(&model);
        watcher.start();

        assert!(!model.borrow().observer_active);
        assert!(model.borrow().poll_active);

        model.borrow_mut().href = "https://www.luogu.com.cn/discuss/5".to_owned();
        watcher.on_signal(NavigationSignal::PollTick);
        let mounted = model.borrow().mounted.clone();
        assert!(mounted.is_some_and(|sections| sections.len() == 1));
    }

    #[test]
    fn stylesheet_installs_once_across_rebuilds() {
        let model = page("https://www.luogu.com.cn/article/1");
        let mut watcher = session(&model);
        watcher.start();

        model.borrow_mut().href = "https://www.luogu.com.cn/paste/2".to_owned();
        watcher.on_signal(NavigationSignal::SubtreeMutated);
        model.borrow_mut().href = "https://www.luogu.com.cn/article/3".to_owned();
        watcher.on_signal(NavigationSignal::SubtreeMutated);

        assert_eq!(model.borrow().presents, 3);
        assert_eq!(model.borrow().stylesheet_installs, vec!["detour-style".to_owned()]);
    }

    #[test]
    fn section_activation_opens_destination_and_is_consumed() {
        let model = page("https://www.luogu.com.cn/article/456");
        let mut watcher = session(&model);
        watcher.start();

        assert_eq!(watcher.activate_section(1), Activation::Consumed);
        assert_eq!(
            model.borrow().opened,
            vec!["https://luogu.me/article/456".to_owned()]
        );

        assert_eq!(watcher.activate_section(5), Activation::Ignored);
    }

    #[test]
    fn activation_while_absent_is_ignored() {
        let model = page("https://www.luogu.com.cn/unmatched");
        let mut watcher = session(&model);
        watcher.start();

        assert_eq!(watcher.activate_section(0), Activation::Ignored);
        assert!(model.borrow().opened.is_empty());
    }

    #[test]
    fn shutdown_releases_observer_and_affordance() {
        let model = page("https://www.luogu.com.cn/article/456");
        let mut watcher = session(&model);
        watcher.start();
        assert!(model.borrow().observer_active);

        watcher.shutdown();
        let state = model.borrow();
        assert!(state.mounted.is_none());
        assert!(!state.observer_active);
        assert!(!state.poll_active);
    }

    #[test]
    fn shutdown_stops_fallback_poll() {
        let model = page("https://www.luogu.com.cn/article/456");
        model.borrow_mut().observe_fails = true;
        let mut watcher = session(&model);
        watcher.start();
        assert!(model.borrow().poll_active);

        watcher.shutdown();
        assert!(!model.borrow().poll_active);
    }

    #[test]
    fn unparsable_href_clears_instead_of_failing() {
        let model = page("https://www.luogu.com.cn/article/456");
        let mut watcher = session(&model);
        watcher.start();
        assert!(model.borrow().mounted.is_some());

        model.borrow_mut().href = "::torn-down::".to_owned();
        watcher.on_signal(NavigationSignal::SubtreeMutated);
        assert!(model.borrow().mounted.is_none());
    }
}
