use crate::{
    error::ScrapeError,
    registry::{BINDING_VALUE, PROFILE_URL},
    render::Renderer,
    sink::{self, CsvSink},
    table::{self, Table},
};
use itertools::Itertools;
use scraper::Html;
use std::path::Path;
use tracing::info;

// Target schemas per sub-table kind. The register's profile page lays the
// tables out positionally: licenses, then notices, then workplaces.
const LICENSE_COLUMNS: [&str; 5] = [
    "License Number",
    "License Category",
    "License Status",
    "Initial Licensure Date",
    "License Expiry Date",
];
const NOTICE_COLUMNS: [&str; 5] = [
    "Type",
    "Effective Date",
    "Summary",
    "Completion Date",
    "Attachments",
];
const WORKPLACE_COLUMNS: [&str; 6] = [
    "Name",
    "Street Address",
    "City",
    "Postal Code",
    "Start Date",
    "End Date",
];

pub struct ProfileOutputs<'a> {
    pub licenses: &'a Path,
    pub notices: &'a Path,
    pub workplaces: &'a Path,
}

#[derive(Debug, PartialEq, Eq)]
struct ExaminerTables {
    licenses: Vec<Vec<String>>,
    notices: Vec<Vec<String>>,
    workplaces: Vec<Vec<String>>,
}

/// Visit every distinct `profile_url` of the examiners CSV and append the
/// reindexed sub-tables to the three output files. Returns the number of
/// profiles visited.
pub fn crawl(
    renderer: &dyn Renderer,
    examiners_csv: &Path,
    outputs: &ProfileOutputs,
) -> Result<usize, ScrapeError> {
    let urls: Vec<String> = sink::column(examiners_csv, PROFILE_URL)?
        .into_iter()
        .filter(|url| !url.is_empty())
        .unique()
        .collect();

    let licenses = CsvSink::new(outputs.licenses, output_headers(&LICENSE_COLUMNS));
    let notices = CsvSink::new(outputs.notices, output_headers(&NOTICE_COLUMNS));
    let workplaces = CsvSink::new(outputs.workplaces, output_headers(&WORKPLACE_COLUMNS));

    for (i, url) in urls.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, urls.len(), url);
        let html = renderer.render(url, "body")?;
        let doc = Html::parse_document(&html);

        let profile = parse_profile(&doc, url)?;
        licenses.append(&profile.licenses)?;
        notices.append(&profile.notices)?;
        workplaces.append(&profile.workplaces)?;
    }

    Ok(urls.len())
}

fn parse_profile(doc: &Html, profile_url: &str) -> Result<ExaminerTables, ScrapeError> {
    // First three bound values of the page header: first, last, previous name.
    let names = table::select_texts(doc, &BINDING_VALUE);
    if names.len() < 3 {
        return Err(ScrapeError::InsufficientData);
    }
    let names = &names[..3];

    let tables = table::extract_tables(doc);
    Ok(ExaminerTables {
        licenses: kind_rows(&tables, 0, &LICENSE_COLUMNS, names, profile_url)?,
        notices: kind_rows(&tables, 1, &NOTICE_COLUMNS, names, profile_url)?,
        workplaces: kind_rows(&tables, 2, &WORKPLACE_COLUMNS, names, profile_url)?,
    })
}

fn kind_rows(
    tables: &[Table],
    index: usize,
    columns: &[&str],
    names: &[String],
    profile_url: &str,
) -> Result<Vec<Vec<String>>, ScrapeError> {
    let source = tables.get(index).ok_or(ScrapeError::MissingTable(index))?;
    Ok(table::reindex(source, columns)
        .into_iter()
        .map(|row| {
            let mut out = names.to_vec();
            out.extend(row);
            out.push(profile_url.to_string());
            out
        })
        .collect())
}

fn output_headers(columns: &[&str]) -> Vec<String> {
    let mut headers = vec![
        "first_name".to_string(),
        "last_name".to_string(),
        "prev_name".to_string(),
    ];
    headers.extend(columns.iter().map(ToString::to_string));
    headers.push(PROFILE_URL.to_string());
    headers
}
