//! In-memory page model standing in for a real browser environment.
//!
//! One shared DOM model backs both halves the watcher needs: a
//! [`NavigationHost`] for change signals and timers, and a [`UiSurface`] for
//! the affordance. Timers are modeled as flags the driver pumps explicitly,
//! which keeps the whole session deterministic.

use dt_core::RedirectError;
use dt_core::RedirectResult;
use dt_surface::AffordanceSpec;
use dt_surface::UiSurface;
use dt_watch::NavigationHost;
use dt_watch::WatcherSession;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

/// Rendered section as the fake DOM sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    pub label: String,
    pub url: String,
}

/// Mutable page state shared between the host and surface halves.
#[derive(Debug, Default)]
pub struct PageDom {
    pub href: String,
    pub style_ids: Vec<String>,
    pub mounted: Option<Vec<RenderedSection>>,
    pub opened: Vec<String>,
    pub recheck_armed: bool,
    pub observer_active: bool,
    pub poll_active: bool,
    pub observation_supported: bool,
}

pub type SharedDom = Rc<RefCell<PageDom>>;

pub fn scripted_page(initial_href: &str, observation_supported: bool) -> SharedDom {
    Rc::new(RefCell::new(PageDom {
        href: initial_href.to_owned(),
        observation_supported,
        ..PageDom::default()
    }))
}

/// Navigation half of the scripted page.
pub struct DomHost(pub SharedDom);

impl NavigationHost for DomHost {
    fn current_href(&self) -> String {
        self.0.borrow().href.clone()
    }

    fn schedule_recheck(&mut self, delay: Duration) {
        debug!(delay_ms = delay.as_millis() as u64, "recheck timer armed");
        self.0.borrow_mut().recheck_armed = true;
    }

    fn observe_subtree(&mut self) -> RedirectResult<()> {
        let mut dom = self.0.borrow_mut();
        if !dom.observation_supported {
            return Err(RedirectError::new(
                "watch.observe_unavailable",
                "scripted page was created without mutation observation",
            ));
        }
        dom.observer_active = true;
        Ok(())
    }

    fn disconnect_observer(&mut self) {
        self.0.borrow_mut().observer_active = false;
    }

    fn start_url_poll(&mut self, period: Duration) {
        debug!(period_ms = period.as_millis() as u64, "url poll started");
        self.0.borrow_mut().poll_active = true;
    }

    fn stop_url_poll(&mut self) {
        self.0.borrow_mut().poll_active = false;
    }
}

/// Rendering half of the scripted page.
pub struct DomSurface(pub SharedDom);

impl UiSurface for DomSurface {
    fn ensure_stylesheet(&mut self, id: &str, _css: &str) {
        let mut dom = self.0.borrow_mut();
        if !dom.style_ids.iter().any(|seen| seen == id) {
            dom.style_ids.push(id.to_owned());
        }
    }

    fn present(&mut self, affordance: &AffordanceSpec) -> RedirectResult<()> {
        self.0.borrow_mut().mounted = Some(
            affordance
                .sections()
                .iter()
                .map(|section| RenderedSection {
                    label: section.label.clone(),
                    url: section.url.clone(),
                })
                .collect(),
        );
        Ok(())
    }

    fn clear(&mut self) {
        self.0.borrow_mut().mounted = None;
    }

    fn open_in_new_context(&mut self, url: &str) {
        self.0.borrow_mut().opened.push(url.to_owned());
    }
}

/// Fires the pending recheck timer, if any, the way a real host would after
/// the debounce delay elapses.
pub fn pump_timers(dom: &SharedDom, watcher: &mut WatcherSession<DomHost, DomSurface>) {
    loop {
        let armed = {
            let mut dom = dom.borrow_mut();
            let armed = dom.recheck_armed;
            dom.recheck_armed = false;
            armed
        };
        if !armed {
            return;
        }
        watcher.on_recheck_due();
    }
}
