use std::env;

use thiserror::Error;

use crate::section::SectionId;

/// Published-CSV endpoint of a Google Sheet; the tab name is appended
pub const GVIZ_URL_TEMPLATE: &str =
    "https://docs.google.com/spreadsheets/d/{sheet_id}/gviz/tq?tqx=out:csv&headers=1&sheet=";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),
    #[error("Invalid value for {var}: '{value}'")]
    Invalid { var: String, value: String },
    #[error("Unknown section identifier: '{0}'")]
    UnknownSection(String),
    #[error("No renderer registered for section '{0}'")]
    NoRenderer(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// URL prefix each sheet name is appended to
    pub sheet_base_url: String,
    pub sections: Vec<SectionId>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let sheet_base_url = match env::var("SHEET_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => {
                let sheet_id = env::var("SHEET_ID")
                    .map_err(|_| ConfigError::Missing("SHEET_ID".to_string()))?;
                sheet_base_url_for(&sheet_id)
            }
        };

        let sections = match env::var("SHEET_SECTIONS") {
            Ok(list) => parse_sections(&list)?,
            Err(_) => SectionId::ALL.to_vec(),
        };

        Ok(Config {
            sheet_base_url,
            sections,
        })
    }
}

pub fn sheet_base_url_for(sheet_id: &str) -> String {
    GVIZ_URL_TEMPLATE.replace("{sheet_id}", sheet_id.trim())
}

/// Comma-separated section names; blanks are ignored, duplicates dropped.
pub fn parse_sections(list: &str) -> Result<Vec<SectionId>, ConfigError> {
    let mut sections = Vec::new();
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let id: SectionId = name.parse()?;
        if !sections.contains(&id) {
            sections.push(id);
        }
    }

    if sections.is_empty() {
        return Err(ConfigError::Invalid {
            var: "SHEET_SECTIONS".to_string(),
            value: list.to_string(),
        });
    }
    Ok(sections)
}
