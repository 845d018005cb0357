use crate::error::ScrapeError;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::{collections::HashMap, ffi::OsStr, fmt, sync::Arc, thread, time::Duration};
use tracing::debug;

/// Renders a URL and returns the serialized DOM once an element matching
/// `ready_selector` is present.
pub trait Renderer {
    fn render(&self, url: &str, ready_selector: &str) -> Result<String, ScrapeError>;
}

fn browser_err<E: fmt::Display>(e: E) -> ScrapeError {
    ScrapeError::Browser(e.to_string())
}

/// Drives one headless Chrome tab for the whole run.
pub struct HeadlessRenderer {
    tab: Arc<Tab>,
    settle: Duration,
    wait: Duration,
    _browser: Browser,
}

impl HeadlessRenderer {
    pub fn new(headless: bool, settle: Duration, wait: Duration) -> Result<Self, ScrapeError> {
        let options = LaunchOptions::default_builder()
            .headless(headless)
            .args(vec![OsStr::new("--disable-gpu")])
            .build()
            .map_err(browser_err)?;
        let browser = Browser::new(options).map_err(browser_err)?;
        let tab = browser.new_tab().map_err(browser_err)?;
        Ok(HeadlessRenderer {
            tab,
            settle,
            wait,
            _browser: browser,
        })
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&self, url: &str, ready_selector: &str) -> Result<String, ScrapeError> {
        debug!("Visit {}", url);
        self.tab.navigate_to(url).map_err(browser_err)?;
        self.tab.wait_until_navigated().map_err(browser_err)?;
        // The register re-renders after navigation settles.
        thread::sleep(self.settle);
        self.tab
            .wait_for_element_with_custom_timeout(ready_selector, self.wait)
            .map_err(browser_err)?;
        self.tab.get_content().map_err(browser_err)
    }
}

/// Plain HTTP fetch; `ready_selector` is not waited on. Only useful against
/// server-rendered pages.
pub struct HttpRenderer {
    client: reqwest::blocking::Client,
}

impl HttpRenderer {
    pub fn new() -> Result<Self, ScrapeError> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(HttpRenderer { client })
    }
}

impl Renderer for HttpRenderer {
    fn render(&self, url: &str, _ready_selector: &str) -> Result<String, ScrapeError> {
        debug!("Visit {}", url);
        Ok(self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .text()?)
    }
}

/// Serves pages from an in-memory map. Offline implementation used by tests.
#[derive(Debug, Default)]
pub struct StaticRenderer {
    pages: HashMap<String, String>,
}

impl StaticRenderer {
    pub fn new() -> Self {
        StaticRenderer::default()
    }

    pub fn insert<U: Into<String>, H: Into<String>>(&mut self, url: U, html: H) {
        self.pages.insert(url.into(), html.into());
    }
}

impl Renderer for StaticRenderer {
    fn render(&self, url: &str, _ready_selector: &str) -> Result<String, ScrapeError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::Browser(format!("no page registered for {}", url)))
    }
}
