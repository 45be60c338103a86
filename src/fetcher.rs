use tracing::{debug, instrument};

use crate::fetch_error::FetchError;
use crate::sheet::{parse_sheet, SheetData};

/// Downloads one sheet tab's CSV export and parses it
#[derive(Clone)]
pub struct SheetFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl SheetFetcher {
    /// `base_url` is the export URL minus the sheet name, e.g. the gviz
    /// endpoint ending in `&sheet=`
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn sheet_url(&self, sheet: &str) -> String {
        format!("{}{}", self.base_url, sheet)
    }

    #[instrument(skip(self), fields(url = %self.sheet_url(sheet)))]
    pub async fn fetch_text(&self, sheet: &str) -> Result<String, FetchError> {
        debug!("Sending HTTP request for sheet");
        let response = self.client.get(self.sheet_url(sheet)).send().await?;
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if !status.is_success() {
            return Err(FetchError::Status {
                sheet: sheet.to_string(),
                status,
            });
        }

        let text = response.text().await?;
        debug!("Retrieved CSV content, size: {} bytes", text.len());
        Ok(text)
    }

    pub async fn fetch_sheet(&self, sheet: &str) -> Result<SheetData, FetchError> {
        let text = self.fetch_text(sheet).await?;
        Ok(parse_sheet(&text))
    }
}
