use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures::future::{join_all, try_join_all};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::fetch_error::FetchError;
use crate::fetcher::SheetFetcher;
use crate::schema::{SchemaError, SectionSchema};
use crate::section::SectionId;
use crate::sheet::SheetData;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Parsed data of every section that loaded, keyed by section
#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteContent {
    sections: BTreeMap<SectionId, SheetData>,
}

impl SiteContent {
    pub fn insert(&mut self, section: SectionId, data: SheetData) {
        self.sections.insert(section, data);
    }

    pub fn get(&self, section: SectionId) -> Option<&SheetData> {
        self.sections.get(&section)
    }

    pub fn sections(&self) -> impl Iterator<Item = (SectionId, &SheetData)> {
        self.sections.iter().map(|(id, data)| (*id, data))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Outcome of one batch load
#[derive(Debug)]
pub struct LoadReport {
    pub content: SiteContent,
    pub failures: Vec<(SectionId, LoadError)>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetches all configured sheets as one concurrent batch
#[derive(Clone)]
pub struct ContentLoader {
    fetcher: SheetFetcher,
}

impl ContentLoader {
    pub fn new(fetcher: SheetFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch, parse and schema-check one section
    pub async fn load_section(&self, section: SectionId) -> Result<SheetData, LoadError> {
        let data = self.fetcher.fetch_sheet(section.as_str()).await?;
        let data = SectionSchema::for_section(section).apply(section, data)?;
        Ok(data)
    }

    /// Load every section and wait for the whole batch to settle.
    ///
    /// A failing sheet is logged and reported; the sections that did load are
    /// still returned so their renderers can run.
    #[instrument(skip(self, sections), fields(section_count = sections.len()))]
    pub async fn load_all(&self, sections: &[SectionId]) -> LoadReport {
        info!("Loading {} sheets", sections.len());

        let results = join_all(sections.iter().map(|&section| async move {
            (section, self.load_section(section).await)
        }))
        .await;

        let mut content = SiteContent::default();
        let mut failures = Vec::new();
        for (section, result) in results {
            match result {
                Ok(data) => content.insert(section, data),
                Err(e) => {
                    error!("Failed to load sheet '{}': {}", section, e);
                    failures.push((section, e));
                }
            }
        }

        if !failures.is_empty() {
            warn!(
                "Loaded {} of {} sheets",
                content.len(),
                sections.len()
            );
        } else {
            info!("Loaded all {} sheets", content.len());
        }

        LoadReport {
            content,
            failures,
            loaded_at: Utc::now(),
        }
    }

    /// All-or-nothing variant: the first failing sheet fails the batch.
    #[instrument(skip(self, sections), fields(section_count = sections.len()))]
    pub async fn load_all_strict(&self, sections: &[SectionId]) -> Result<SiteContent, LoadError> {
        let loaded = try_join_all(sections.iter().map(|&section| async move {
            self.load_section(section)
                .await
                .map(|data| (section, data))
        }))
        .await?;

        let mut content = SiteContent::default();
        for (section, data) in loaded {
            content.insert(section, data);
        }
        Ok(content)
    }
}
