use crate::error::ScrapeError;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub examiners_url: String,
    pub facilities_url: String,

    /// Known register sizes; `null` makes the crawler read the count from
    /// the search page itself.
    pub examiners_total: Option<usize>,
    pub facilities_total: Option<usize>,
    pub page_size: usize,
    pub link_column: usize,

    pub headless: bool,
    pub settle_ms: u64,
    pub wait_secs: u64,

    pub out_dir: PathBuf,
    pub examiners_file: String,
    pub licenses_file: String,
    pub notices_file: String,
    pub workplaces_file: String,
    pub facilities_file: String,
    pub facility_profiles_file: String,
    pub examiners_workbook: String,
    pub facilities_workbook: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            examiners_url: "https://nsbvme.us.thentiacloud.net/webs/nsbvme/register/#/search/all"
                .to_string(),
            facilities_url:
                "https://nsbvme.us.thentiacloud.net/webs/nsbvme/register/#/search-facility/all"
                    .to_string(),
            examiners_total: Some(5124),
            facilities_total: Some(320),
            page_size: 100,
            link_column: 4,
            headless: true,
            settle_ms: 1250,
            wait_secs: 5,
            out_dir: PathBuf::from("."),
            examiners_file: "nv-examiners.csv".to_string(),
            licenses_file: "nv-examiner-licenses.csv".to_string(),
            notices_file: "nv-examiner-notices.csv".to_string(),
            workplaces_file: "nv-examiner-workplaces.csv".to_string(),
            facilities_file: "nv-facilities.csv".to_string(),
            facility_profiles_file: "nv-facility-profiles.csv".to_string(),
            examiners_workbook: "nv-examiners.xlsx".to_string(),
            facilities_workbook: "nv-facilities.xlsx".to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScrapeError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.out_dir.join(file)
    }
}
