use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::cell::{is_truthy_flag, slugify, to_key_value};
use crate::loader::SiteContent;
use crate::section::SectionId;
use crate::sheet::SheetData;

/// Anchor the hero section always gets
pub const HERO_ANCHOR: &str = "#top";

/// Cross-section facts renderers need: where each section lives on the page
/// and which sections are switched off.
///
/// Built once after every sheet is parsed, read-only afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteContext {
    anchors: BTreeMap<SectionId, String>,
    hidden: Vec<SectionId>,
}

impl SiteContext {
    pub fn build(sections: &[SectionId], content: &SiteContent) -> Self {
        let mut ctx = Self::default();

        for &section in sections {
            let Some(data) = content.get(section) else {
                continue;
            };

            if is_hidden(data) {
                ctx.hidden.push(section);
            }

            let anchor = match section {
                SectionId::Hero => HERO_ANCHOR.to_string(),
                s if s.is_chrome() => continue,
                s => {
                    let slug = section_label(data)
                        .map(|label| slugify(&label))
                        .filter(|slug| !slug.is_empty());
                    format!("#{}", slug.as_deref().unwrap_or(s.as_str()))
                }
            };
            debug!("Section '{}' anchored at {}", section, anchor);
            ctx.anchors.insert(section, anchor);
        }

        ctx
    }

    pub fn anchor(&self, section: SectionId) -> Option<&str> {
        self.anchors.get(&section).map(String::as_str)
    }

    /// Resolve a sheet link cell: a known section name maps to its anchor,
    /// anything else becomes a plain fragment.
    pub fn resolve_link(&self, link: &str) -> String {
        link.parse::<SectionId>()
            .ok()
            .and_then(|id| self.anchor(id))
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{link}"))
    }

    pub fn is_hidden(&self, section: SectionId) -> bool {
        self.hidden.contains(&section)
    }
}

/// `config.hidden == "TRUE"`, or the `hidden` row of a flat key/value sheet
pub fn is_hidden(data: &SheetData) -> bool {
    if let Some(flag) = data.config().get("hidden") {
        return is_truthy_flag(flag);
    }
    if data.config().is_empty() && data.is_flat_key_value() {
        return to_key_value(data.items())
            .get("hidden")
            .is_some_and(|flag| is_truthy_flag(flag));
    }
    false
}

/// Display label of a section: `section_label`, then `label`
pub fn section_label(data: &SheetData) -> Option<String> {
    let pick = |map: &crate::sheet::ConfigMap| {
        ["section_label", "label"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|v| !v.is_empty())
            .cloned()
    };

    pick(data.config()).or_else(|| {
        if data.is_flat_key_value() {
            pick(&to_key_value(data.items()))
        } else {
            None
        }
    })
}
