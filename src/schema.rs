//! Per-section field schemas
//!
//! Each section's sheet is expected to carry certain config keys and table
//! columns. Applying a schema right after parsing fills optional fields with
//! their defaults and rejects tables that lack a required column, so
//! renderers can read fields without re-checking them.
use thiserror::Error;
use tracing::{debug, warn};

use crate::section::SectionId;
use crate::sheet::{ConfigMap, Record, SheetData, TableSection};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Section '{section}' is missing required field '{field}'")]
    MissingField { section: String, field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    /// Used when the cell is absent or blank
    pub default: &'static str,
}

const fn required(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        required: true,
        default: "",
    }
}

const fn optional(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        required: false,
        default: "",
    }
}

const fn defaulted(name: &'static str, default: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        required: false,
        default,
    }
}

const SECTION_HEADER: [FieldSpec; 4] = [
    optional("section_label_icon"),
    optional("section_label"),
    optional("section_heading"),
    optional("section_subtitle"),
];

const LINK_ITEMS: [FieldSpec; 2] = [required("name"), required("link")];

#[derive(Debug, Clone, Copy)]
pub struct SectionSchema {
    pub config: &'static [FieldSpec],
    pub items: &'static [FieldSpec],
}

const GENERAL: SectionSchema = SectionSchema {
    config: &[
        optional("color_primary"),
        optional("color_secondary"),
        optional("color_tertiary"),
        optional("favicon"),
        optional("seo_title"),
        optional("seo_description"),
        optional("seo_image"),
        optional("gallery_cta_url"),
        optional("gallery_cta_icon"),
        optional("gallery_cta_text"),
        optional("share_bar"),
    ],
    items: &[required("platform"), optional("icon"), optional("url")],
};

const NAV: SectionSchema = SectionSchema {
    config: &[optional("logo"), optional("cta_text"), optional("cta_link")],
    items: &LINK_ITEMS,
};

const HERO: SectionSchema = SectionSchema {
    config: &[
        optional("badge"),
        optional("heading"),
        optional("description"),
        optional("hero_image"),
    ],
    items: &[
        required("text"),
        required("link"),
        defaulted("style", "primary"),
    ],
};

const ABOUT: SectionSchema = SectionSchema {
    config: &[
        optional("label_icon"),
        optional("label"),
        optional("heading"),
        optional("subtitle"),
        optional("body"),
        optional("cta"),
        optional("about_image"),
        optional("about_image_2"),
        optional("about_image_3"),
    ],
    items: &[
        defaulted("icon", "bi-star"),
        required("title"),
        optional("description"),
    ],
};

const SERVICES: SectionSchema = SectionSchema {
    config: &SECTION_HEADER,
    items: &[
        required("title"),
        defaulted("icon", "bi-gear"),
        optional("description_short"),
        optional("description_full"),
    ],
};

const TESTIMONIALS: SectionSchema = SectionSchema {
    config: &SECTION_HEADER,
    items: &[
        required("quote"),
        optional("author"),
        optional("role"),
        defaulted("stars", "5"),
    ],
};

const TEAM: SectionSchema = SectionSchema {
    config: &SECTION_HEADER,
    items: &[
        required("name"),
        optional("role"),
        optional("bio_short"),
        optional("bio_full"),
        optional("photo_url"),
    ],
};

const GALLERY: SectionSchema = SectionSchema {
    config: &SECTION_HEADER,
    items: &[required("image_url"), optional("caption"), optional("alt")],
};

// Config block or flat key/value rows; must not add config keys
const CONTACT: SectionSchema = SectionSchema {
    config: &[],
    items: &[],
};

const FOOTER: SectionSchema = SectionSchema {
    config: &[optional("logo"), optional("description"), optional("abn")],
    items: &LINK_ITEMS,
};

impl SectionSchema {
    pub fn for_section(section: SectionId) -> Self {
        match section {
            SectionId::General => GENERAL,
            SectionId::Nav => NAV,
            SectionId::Hero => HERO,
            SectionId::About => ABOUT,
            SectionId::Services => SERVICES,
            SectionId::Testimonials => TESTIMONIALS,
            SectionId::Team => TEAM,
            SectionId::Gallery => GALLERY,
            SectionId::Contact => CONTACT,
            SectionId::Footer => FOOTER,
        }
    }

    /// Check `data` against the schema and fill defaults.
    ///
    /// A required item field fails only when the table has rows but none of
    /// them carries the column; an empty table passes.
    pub fn apply(&self, section: SectionId, data: SheetData) -> Result<SheetData, SchemaError> {
        match data {
            SheetData::Items { config, items } => Ok(SheetData::Items {
                config: self.apply_config(section, config),
                items: self.apply_items(section, items)?,
            }),
            SheetData::Tables { config, tables } => {
                let tables = tables
                    .into_iter()
                    .map(|table| {
                        Ok(TableSection {
                            items: self.apply_items(section, table.items)?,
                            ..table
                        })
                    })
                    .collect::<Result<Vec<_>, SchemaError>>()?;
                Ok(SheetData::Tables {
                    config: self.apply_config(section, config),
                    tables,
                })
            }
        }
    }

    fn apply_config(&self, section: SectionId, mut config: ConfigMap) -> ConfigMap {
        for field in self.config {
            let value = config.entry(field.name.to_string()).or_default();
            if value.is_empty() {
                if field.required {
                    warn!("Section '{}' has no value for '{}'", section, field.name);
                }
                *value = field.default.to_string();
            }
        }
        config
    }

    fn apply_items(
        &self,
        section: SectionId,
        mut items: Vec<Record>,
    ) -> Result<Vec<Record>, SchemaError> {
        if let Some(first) = items.first() {
            if let Some(missing) = self
                .items
                .iter()
                .find(|f| f.required && !first.contains(f.name))
            {
                return Err(SchemaError::MissingField {
                    section: section.to_string(),
                    field: missing.name.to_string(),
                });
            }
        }

        for record in &mut items {
            for field in self.items.iter().filter(|f| !f.required) {
                if record.get(field.name).is_empty() {
                    record.insert(field.name, field.default);
                }
            }
        }
        debug!("Applied schema to {} '{}' records", items.len(), section);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, &str)]) -> Record {
        fields.iter().copied().collect()
    }

    #[test]
    fn test_apply_fills_item_defaults() {
        let data = SheetData::Items {
            config: ConfigMap::new(),
            items: vec![
                record(&[("title", "NDIS Support"), ("icon", "")]),
                record(&[("title", "Care"), ("icon", "bi-heart")]),
            ],
        };

        let schema = SectionSchema::for_section(SectionId::Services);
        let data = schema.apply(SectionId::Services, data).unwrap();

        assert_eq!(data.items()[0].get("icon"), "bi-gear");
        assert_eq!(data.items()[1].get("icon"), "bi-heart");
        assert!(data.items()[0].contains("description_short"));
        assert!(data.items()[0].contains("description_full"));
        assert!(data.config().contains_key("section_heading"));
    }

    #[test]
    fn test_apply_rejects_missing_required_column() {
        let data = SheetData::Items {
            config: ConfigMap::new(),
            items: vec![record(&[("name", "Care"), ("description_short", "We care.")])],
        };

        let err = SectionSchema::for_section(SectionId::Services)
            .apply(SectionId::Services, data)
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingField {
                section: "services".to_string(),
                field: "title".to_string(),
            }
        );
    }

    #[test]
    fn test_services_sheet_columns_pass() {
        let data = crate::sheet::parse_sheet(
            "key,value\nsection_label,Services\n---\n,,Services\ntitle,icon,description_short,description_full\nDaily Living,house,Help daily.,Long text\n",
        );

        let data = SectionSchema::for_section(SectionId::Services)
            .apply(SectionId::Services, data)
            .unwrap();
        assert_eq!(data.items()[0].get("title"), "Daily Living");
        assert_eq!(data.items()[0].get("description_full"), "Long text");
    }

    #[test]
    fn test_contact_schema_accepts_both_sheet_shapes() {
        let schema = SectionSchema::for_section(SectionId::Contact);

        let flat = crate::sheet::parse_sheet("key,value\nphone,0400 111 222\n");
        let flat = schema.apply(SectionId::Contact, flat).unwrap();
        assert!(flat.config().is_empty());

        let with_config =
            crate::sheet::parse_sheet("key,value\nphone,0400 111 222\n---\n,,x\nname\nA\n");
        assert!(schema.apply(SectionId::Contact, with_config).is_ok());
    }

    #[test]
    fn test_apply_allows_empty_table() {
        let schema = SectionSchema::for_section(SectionId::Team);
        assert!(schema.apply(SectionId::Team, SheetData::default()).is_ok());
    }

    #[test]
    fn test_apply_checks_every_table() {
        let data = SheetData::Tables {
            config: ConfigMap::new(),
            tables: vec![
                TableSection {
                    heading: "Quick Links".to_string(),
                    headers: vec!["name".to_string(), "link".to_string()],
                    items: vec![record(&[("name", "About"), ("link", "about")])],
                },
                TableSection {
                    heading: "Support".to_string(),
                    headers: vec!["name".to_string()],
                    items: vec![record(&[("name", "Help")])],
                },
            ],
        };

        let err = SectionSchema::for_section(SectionId::Footer)
            .apply(SectionId::Footer, data)
            .unwrap_err();
        assert!(matches!(err, SchemaError::MissingField { ref field, .. } if field == "link"));
    }

    #[test]
    fn test_apply_keeps_existing_config_values() {
        let mut config = ConfigMap::new();
        config.insert("stars".to_string(), "ignored".to_string());
        config.insert("section_heading".to_string(), "Kind Words".to_string());

        let data = SheetData::Items {
            config,
            items: vec![record(&[("quote", "Great"), ("stars", "")])],
        };
        let data = SectionSchema::for_section(SectionId::Testimonials)
            .apply(SectionId::Testimonials, data)
            .unwrap();

        assert_eq!(data.config()["section_heading"], "Kind Words");
        assert_eq!(data.config()["section_label"], "");
        assert_eq!(data.items()[0].get("stars"), "5");
    }
}
