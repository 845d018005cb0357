use crate::{
    error::ScrapeError,
    registry::{BINDING_VALUE, PROFILE_URL},
    render::Renderer,
    sink::{self, CsvSink},
    table,
};
use itertools::Itertools;
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use std::path::Path;
use tracing::info;

/// The label set the register renders on every facility profile, in order.
pub const EXPECTED_LABELS: [&str; 12] = [
    "License Number",
    "Practice Type",
    "License Status",
    "Initial Licensure Date",
    "License Expiry Date",
    "Address Line 1",
    "Address Line 2",
    "City",
    "State",
    "Zip Code",
    "Telephone",
    "Fax",
];

const E: &str = "Invalid selector";
lazy_static! {
    static ref H2: Selector = Selector::parse("h2").expect(E);
    static ref LABEL: Selector = Selector::parse("label").expect(E);
}

/// Visit every distinct `profile_url` of the facilities CSV and append one
/// row per profile to `out`. Returns the number of profiles visited.
pub fn crawl(
    renderer: &dyn Renderer,
    facilities_csv: &Path,
    out: &Path,
) -> Result<usize, ScrapeError> {
    let urls: Vec<String> = sink::column(facilities_csv, PROFILE_URL)?
        .into_iter()
        .filter(|url| !url.is_empty())
        .unique()
        .collect();

    let sink = CsvSink::new(out, output_headers());

    for (i, url) in urls.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, urls.len(), url);
        let html = renderer.render(url, "body")?;
        let doc = Html::parse_document(&html);

        let row = parse_profile(&doc, url)?;
        sink.append(std::slice::from_ref(&row))?;
    }

    Ok(urls.len())
}

fn parse_profile(doc: &Html, profile_url: &str) -> Result<Vec<String>, ScrapeError> {
    let name = table::select_texts(doc, &H2)
        .into_iter()
        .next()
        .ok_or(ScrapeError::InsufficientData)?;

    let labels: Vec<String> = table::select_texts(doc, &LABEL)
        .into_iter()
        .map(|label| label.trim_end_matches(':').trim().to_string())
        .collect();
    if labels != EXPECTED_LABELS {
        return Err(ScrapeError::UnexpectedColumns {
            expected: EXPECTED_LABELS.iter().map(ToString::to_string).collect(),
            observed: labels,
        });
    }

    // Values sit in the same bound divs as the labels, in document order.
    let values = table::select_texts(doc, &BINDING_VALUE);

    let mut row = Vec::with_capacity(EXPECTED_LABELS.len() + 2);
    row.push(name);
    for i in 0..EXPECTED_LABELS.len() {
        row.push(values.get(i).cloned().unwrap_or_default());
    }
    row.push(profile_url.to_string());
    Ok(row)
}

fn output_headers() -> Vec<String> {
    let mut headers = vec!["Name".to_string()];
    headers.extend(EXPECTED_LABELS.iter().map(ToString::to_string));
    headers.push(PROFILE_URL.to_string());
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::StaticRenderer;
    use pretty_assertions::assert_eq;
    use std::fs;

    const URL: &str = "https://example.test/register/#/profile-facility/2001";

    #[test]
    fn parses_a_facility_profile_into_one_row() {
        let html = fs::read_to_string("tests/fixtures/facility_profile.html")
            .expect("Invalid file path");
        let doc = Html::parse_document(&html);

        let row = parse_profile(&doc, URL).unwrap();
        assert_eq!(
            row,
            vec![
                "DESERT PAWS VETERINARY CLINIC".to_string(),
                "VF-2001".to_string(),
                "Small Animal".to_string(),
                "Active".to_string(),
                "2012-03-19".to_string(),
                "2024-06-30".to_string(),
                "100 Main St".to_string(),
                String::new(),
                "Reno".to_string(),
                "NV".to_string(),
                "89501".to_string(),
                "(775) 555-0100".to_string(),
                String::new(),
                URL.to_string(),
            ]
        );
    }

    #[test]
    fn label_mismatch_is_a_validation_error() {
        let html = fs::read_to_string("tests/fixtures/facility_profile_bad_labels.html")
            .expect("Invalid file path");
        let doc = Html::parse_document(&html);

        match parse_profile(&doc, URL) {
            Err(ScrapeError::UnexpectedColumns { expected, observed }) => {
                assert_eq!(expected.len(), EXPECTED_LABELS.len());
                assert_eq!(observed[1], "Practice Kind".to_string());
            }
            other => panic!("expected UnexpectedColumns, got {:?}", other),
        }
    }

    #[test]
    fn page_without_heading_is_an_error() {
        let doc = Html::parse_document("<html><body></body></html>");
        assert!(matches!(
            parse_profile(&doc, URL),
            Err(ScrapeError::InsufficientData)
        ));
    }

    #[test]
    fn crawl_writes_one_row_per_profile() {
        let dir = tempfile::tempdir().unwrap();

        let facilities = dir.path().join("facilities.csv");
        CsvSink::new(
            &facilities,
            vec!["Name".to_string(), PROFILE_URL.to_string()],
        )
        .append(&[vec!["DESERT PAWS VETERINARY CLINIC".to_string(), URL.to_string()]])
        .unwrap();

        let mut renderer = StaticRenderer::new();
        renderer.insert(
            URL,
            fs::read_to_string("tests/fixtures/facility_profile.html")
                .expect("Invalid file path"),
        );

        let out = dir.path().join("facility-profiles.csv");
        let visited = crawl(&renderer, &facilities, &out).unwrap();
        assert_eq!(visited, 1);

        let table = sink::read_table(&out).unwrap();
        assert_eq!(table.headers, output_headers());
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], "DESERT PAWS VETERINARY CLINIC".to_string());
        assert_eq!(table.rows[0][13], URL.to_string());
    }
}
