//! Presentation contracts for the on-page redirect affordance.
//!
//! The actual DOM lives on the host side; this crate only describes what the
//! host must render and the capabilities the watcher expects from it.

use dt_core::RedirectError;
use dt_core::RedirectResult;

/// Element id of the injected stylesheet. Installed at most once per page.
pub const STYLE_ELEMENT_ID: &str = "detour-style";

/// Root class of the affordance container.
pub const AFFORDANCE_CLASS: &str = "detour-affordance";

/// Visual knobs for the floating affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleConfig {
    pub base_bottom_px: u32,
    pub horizontal_px: u32,
    pub min_width_px: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            base_bottom_px: 20,
            horizontal_px: 20,
            min_width_px: 120,
        }
    }
}

/// Where a section sits inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionPlacement {
    Single,
    Top,
    Bottom,
}

impl SectionPlacement {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Single => "section section-single",
            Self::Top => "section section-top",
            Self::Bottom => "section section-bottom",
        }
    }
}

/// One independently clickable region of the affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpec {
    pub label: String,
    pub url: String,
    pub placement: SectionPlacement,
}

/// The singleton affordance: one or two stacked sections, primary on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffordanceSpec {
    sections: Vec<SectionSpec>,
}

impl AffordanceSpec {
    /// Lays out `(label, url)` pairs in the order given. The first pair is
    /// the primary action. Only one or two sections are renderable.
    pub fn from_actions(actions: &[(String, String)]) -> RedirectResult<Self> {
        let placements: &[SectionPlacement] = match actions.len() {
            1 => &[SectionPlacement::Single],
            2 => &[SectionPlacement::Top, SectionPlacement::Bottom],
            other => {
                return Err(RedirectError::new(
                    "surface.action_count_invalid",
                    format!("affordance supports 1 or 2 sections, got {other}"),
                ));
            }
        };

        let sections = actions
            .iter()
            .zip(placements)
            .map(|((label, url), placement)| SectionSpec {
                label: label.clone(),
                url: url.clone(),
                placement: *placement,
            })
            .collect();

        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }

    pub fn section_url(&self, index: usize) -> Option<&str> {
        self.sections.get(index).map(|section| section.url.as_str())
    }

    pub fn is_stacked(&self) -> bool {
        self.sections.len() == 2
    }
}

/// Host-side rendering capability the watcher drives.
///
/// Implementations must make `clear` a no-op when nothing is mounted and must
/// keep `ensure_stylesheet` idempotent per id. A document body may not exist
/// yet at first call; implementations defer actual insertion until it does.
/// Clicks on a section are routed back through the watcher, which answers
/// with the URL to open; the host is responsible for not letting the click
/// reach ancestor handlers.
pub trait UiSurface {
    fn ensure_stylesheet(&mut self, id: &str, css: &str);
    fn present(&mut self, affordance: &AffordanceSpec) -> RedirectResult<()>;
    fn clear(&mut self);
    fn open_in_new_context(&mut self, url: &str);
}

/// Renders the affordance stylesheet for the given config.
pub fn stylesheet(config: &StyleConfig) -> String {
    let StyleConfig {
        base_bottom_px,
        horizontal_px,
        min_width_px,
    } = *config;

    format!(
        r#".{AFFORDANCE_CLASS} {{
    position: fixed;
    right: {horizontal_px}px;
    bottom: {base_bottom_px}px;
    display: inline-flex;
    flex-direction: column;
    min-width: {min_width_px}px;
    border-radius: 12px;
    background: rgba(255,255,255,0.06);
    backdrop-filter: blur(10px);
    -webkit-backdrop-filter: blur(10px);
    border: 1px solid rgba(255,255,255,0.12);
    color: #fff;
    font-weight: 500;
    z-index: 999999;
    box-shadow: 0 6px 24px rgba(0,0,0,0.18);
    overflow: hidden;
    user-select: none;
}}
.{AFFORDANCE_CLASS} .section {{
    padding: 10px 16px;
    display: flex;
    align-items: center;
    justify-content: center;
    cursor: pointer;
    background: transparent;
}}
.{AFFORDANCE_CLASS} .section-top {{
    border-bottom: 1px solid rgba(255,255,255,0.08);
}}
.{AFFORDANCE_CLASS} .section:hover {{
    background: rgba(255,255,255,0.08);
}}
@media (max-width: 768px) {{
    .{AFFORDANCE_CLASS} {{ right: 12px; min-width: 100px; }}
    .{AFFORDANCE_CLASS} .section {{ padding: 8px 12px; font-size: 13px; }}
}}
"#
    )
}
