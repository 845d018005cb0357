use crate::{error::ScrapeError, registry::PROFILE_URL, render::Renderer, sink::CsvSink, table};
use lazy_regex::regex;
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use std::path::Path;
use tracing::{info, warn};

const E: &str = "Invalid selector";
lazy_static! {
    static ref RESULT_COUNT: Selector =
        Selector::parse(r#"span[ng-if="resultCount > 10"]"#).expect(E);
}

/// One paged search of the register: `{base_url}/{start}/{page_size}` pages,
/// one profile link per row at a fixed column.
pub struct SearchCrawl<'a> {
    pub base_url: &'a str,
    pub total: Option<usize>,
    pub page_size: usize,
    pub link_column: usize,
}

/// Walk every page of the search, appending rows to `out` as each page is
/// parsed. Returns the number of rows written.
pub fn crawl(
    renderer: &dyn Renderer,
    search: &SearchCrawl,
    out: &Path,
) -> Result<usize, ScrapeError> {
    let mut total = search.total;
    let mut start = 0;
    let mut sink: Option<CsvSink> = None;
    let mut written = 0;

    while total.map_or(start == 0, |t| start < t) {
        let page_url = format!("{}/{}/{}", search.base_url, start, search.page_size);
        let html = renderer.render(&page_url, "table")?;
        let doc = Html::parse_document(&html);

        if total.is_none() {
            let count = result_count(&doc).ok_or(ScrapeError::ResultCount)?;
            info!("Register reports {} results", count);
            total = Some(count);
        }

        let (headers, rows) = parse_page(&doc, search.link_column)?;
        info!(
            "[{}..{}] {} rows from {}",
            start,
            start + rows.len(),
            rows.len(),
            page_url
        );

        let sink = sink.get_or_insert_with(|| CsvSink::new(out, headers));
        sink.append(&rows)?;
        written += rows.len();

        start += search.page_size;
    }

    Ok(written)
}

/// The observed header names (link column dropped, `profile_url` appended)
/// and one row per record with the detail-page href in the last position.
fn parse_page(
    doc: &Html,
    link_column: usize,
) -> Result<(Vec<String>, Vec<Vec<String>>), ScrapeError> {
    let mut tables = table::extract_tables(doc);
    if tables.is_empty() {
        return Err(ScrapeError::MissingTable(0));
    }
    let results = tables.swap_remove(0);

    // A lone row is the register's "no results" placeholder.
    if results.rows.len() == 1 {
        warn!("Single data row on search page: {:?}", results.rows[0]);
        return Err(ScrapeError::InsufficientData);
    }

    let links = table::link_column(doc, 0, link_column);

    let mut headers: Vec<String> = results
        .headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != link_column)
        .map(|(_, h)| h.clone())
        .collect();
    headers.push(PROFILE_URL.to_string());

    let rows = results
        .rows
        .into_iter()
        .zip(links)
        .map(|(row, link)| {
            let mut out: Vec<String> = row
                .into_iter()
                .enumerate()
                .filter(|(i, _)| *i != link_column)
                .map(|(_, cell)| cell)
                .collect();
            out.push(link.unwrap_or_default());
            out
        })
        .collect();

    Ok((headers, rows))
}

fn result_count(doc: &Html) -> Option<usize> {
    let span = doc.select(&RESULT_COUNT).next()?;
    let text = span.text().collect::<String>();
    // "Showing results 1 to 100 of 5124" -- the trailing integer is the total.
    regex!(r"\d+")
        .find_iter(&text)
        .last()
        .and_then(|m| m.as_str().parse().ok())
}
