//! Scripted SPA session driving the watcher against an in-memory page.

use dt_routes::RouteTable;
use dt_watch::NavigationSignal;
use dt_watch::WatcherSession;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod page;


use page::DomHost;
use page::DomSurface;
use page::SharedDom;
use page::pump_timers;
use page::scripted_page;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let dom = scripted_page("https://www.luogu.com.cn/article/78160?from=feed#comments", true);
    let mut watcher = WatcherSession::new(
        DomHost(std::rc::Rc::clone(&dom)),
        DomSurface(std::rc::Rc::clone(&dom)),
        RouteTable::default(),
    );

    watcher.start();
    report(&dom, "initial load");

    navigate(&dom, "https://www.luogu.com.cn/paste/abc123");
    watcher.on_signal(NavigationSignal::HistoryPush);
    pump_timers(&dom, &mut watcher);
    report(&dom, "pushState to paste");

    navigate(&dom, "https://www.luogu.com.cn/discuss/luogu");
    watcher.on_signal(NavigationSignal::SubtreeMutated);
    report(&dom, "mutation-only route swap to discuss");

    watcher.activate_section(0);
    if let Some(opened) = dom.borrow().opened.last() {
        info!(url = opened.as_str(), "primary section opened in new context");
    }

    navigate(&dom, "https://www.luogu.com.cn/user/3");
    watcher.on_signal(NavigationSignal::HistoryPop);
    pump_timers(&dom, &mut watcher);
    report(&dom, "back/forward to unmatched route");

    watcher.shutdown();
    report(&dom, "page teardown");
}

fn navigate(dom: &SharedDom, href: &str) {
    dom.borrow_mut().href = href.to_owned();
}

fn report(dom: &SharedDom, step: &str) {
    let dom = dom.borrow();
    match &dom.mounted {
        Some(sections) => {
            let labels: Vec<&str> = sections.iter().map(|s| s.label.as_str()).collect();
            info!(step, sections = sections.len(), labels = ?labels, "affordance mounted");
        }
        None => info!(step, "no affordance"),
    }
}
