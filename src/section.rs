use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ConfigError;
use crate::context::SiteContext;
use crate::loader::SiteContent;
use crate::sheet::SheetData;

/// One sheet tab of the site spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    General,
    Nav,
    Hero,
    About,
    Services,
    Testimonials,
    Team,
    Gallery,
    Contact,
    Footer,
}

impl SectionId {
    /// Every known section in page order
    pub const ALL: [SectionId; 10] = [
        SectionId::General,
        SectionId::Nav,
        SectionId::Hero,
        SectionId::About,
        SectionId::Services,
        SectionId::Testimonials,
        SectionId::Team,
        SectionId::Gallery,
        SectionId::Contact,
        SectionId::Footer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::General => "general",
            SectionId::Nav => "nav",
            SectionId::Hero => "hero",
            SectionId::About => "about",
            SectionId::Services => "services",
            SectionId::Testimonials => "testimonials",
            SectionId::Team => "team",
            SectionId::Gallery => "gallery",
            SectionId::Contact => "contact",
            SectionId::Footer => "footer",
        }
    }

    /// Site-wide sections that are rendered first and can't be hidden
    pub fn is_chrome(self) -> bool {
        matches!(self, SectionId::General | SectionId::Nav | SectionId::Footer)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        SectionId::ALL
            .into_iter()
            .find(|id| id.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownSection(name.to_string()))
    }
}

/// Renders one section's parsed data with read-only access to the site context
pub type Renderer<T> = fn(&SheetData, &SiteContext) -> T;

/// Explicit section-to-renderer table.
///
/// Built once at startup and checked against the configured sections with
/// [`RendererRegistry::validate`], so a section without a renderer is a
/// configuration error instead of silently rendering nothing.
pub struct RendererRegistry<T> {
    renderers: BTreeMap<SectionId, Renderer<T>>,
}

impl<T> Default for RendererRegistry<T> {
    fn default() -> Self {
        Self {
            renderers: BTreeMap::new(),
        }
    }
}

impl<T> RendererRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, section: SectionId, renderer: Renderer<T>) -> Self {
        self.renderers.insert(section, renderer);
        self
    }

    pub fn get(&self, section: SectionId) -> Option<Renderer<T>> {
        self.renderers.get(&section).copied()
    }

    /// Fail on the first configured section that has no renderer
    pub fn validate(&self, sections: &[SectionId]) -> Result<(), ConfigError> {
        match sections.iter().find(|s| !self.renderers.contains_key(s)) {
            Some(missing) => Err(ConfigError::NoRenderer(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Render every loaded section.
    ///
    /// `general` goes first, then `nav` and `footer`; the rest follow in
    /// `order`. Hidden sections and sections whose sheet failed to load are
    /// skipped.
    pub fn render_all(
        &self,
        order: &[SectionId],
        content: &SiteContent,
        ctx: &SiteContext,
    ) -> Vec<(SectionId, T)> {
        let chrome = [SectionId::General, SectionId::Nav, SectionId::Footer]
            .into_iter()
            .filter(|id| order.contains(id));
        let body = order.iter().copied().filter(|id| !id.is_chrome());

        let mut rendered = Vec::new();
        for section in chrome.chain(body) {
            let Some(data) = content.get(section) else {
                debug!("No data loaded for section '{}', skipping", section);
                continue;
            };
            if !section.is_chrome() && ctx.is_hidden(section) {
                info!("Section '{}' is hidden", section);
                continue;
            }
            if let Some(render) = self.get(section) {
                rendered.push((section, render(data, ctx)));
            }
        }
        rendered
    }
}
