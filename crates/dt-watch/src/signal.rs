//! Navigation change signals produced by the host environment.

/// A point at which the visible route may have changed.
///
/// The watcher never intercepts history entry points itself; the host wires
/// its `pushState`/`replaceState` interception, `popstate` listener, mutation
/// observer, and fallback poll into this stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSignal {
    /// Initial script execution on a fresh page.
    PageLoad,
    /// Programmatic history push was intercepted.
    HistoryPush,
    /// Programmatic history replace was intercepted.
    HistoryReplace,
    /// Browser-initiated back/forward navigation.
    HistoryPop,
    /// Subtree mutation batch; URL may or may not have changed.
    SubtreeMutated,
    /// Fallback URL poll tick.
    PollTick,
}

impl NavigationSignal {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PageLoad => "page-load",
            Self::HistoryPush => "history-push",
            Self::HistoryReplace => "history-replace",
            Self::HistoryPop => "history-pop",
            Self::SubtreeMutated => "subtree-mutated",
            Self::PollTick => "poll-tick",
        }
    }

    /// History signals are debounced; the target app's own DOM updates are
    /// expected to settle before re-evaluation.
    pub fn is_history(self) -> bool {
        matches!(self, Self::HistoryPush | Self::HistoryReplace | Self::HistoryPop)
    }

    /// Passive signals only trigger re-evaluation when the URL actually
    /// changed since the last look.
    pub fn is_passive(self) -> bool {
        matches!(self, Self::SubtreeMutated | Self::PollTick)
    }
}
