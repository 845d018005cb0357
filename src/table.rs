use lazy_regex::regex;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

const E: &str = "Invalid selector";
lazy_static! {
    static ref TABLE: Selector = Selector::parse("table").expect(E);
    static ref THEAD_TH: Selector = Selector::parse("thead th").expect(E);
    static ref TBODY_TR: Selector = Selector::parse("tbody tr").expect(E);
    static ref TR: Selector = Selector::parse("tr").expect(E);
    static ref TH: Selector = Selector::parse("th").expect(E);
    static ref TD: Selector = Selector::parse("td").expect(E);
    static ref A: Selector = Selector::parse("a").expect(E);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// All `<table>` elements of the document, in document order.
pub fn extract_tables(doc: &Html) -> Vec<Table> {
    doc.select(&TABLE).map(parse_table).collect()
}

fn parse_table(table: ElementRef) -> Table {
    let mut headers: Vec<String> = table.select(&THEAD_TH).map(element_text).collect();

    let mut rows = vec![];
    for tr in data_rows(table) {
        let cells: Vec<String> = tr.select(&TD).map(element_text).collect();
        if cells.is_empty() {
            // A th-only row outside a thead still carries the header.
            if headers.is_empty() {
                headers = tr.select(&TH).map(element_text).collect();
            }
            continue;
        }
        rows.push(cells);
    }

    Table { headers, rows }
}

fn data_rows(table: ElementRef) -> Vec<ElementRef> {
    let rows: Vec<ElementRef> = table.select(&TBODY_TR).collect();
    if rows.is_empty() {
        table.select(&TR).collect()
    } else {
        rows
    }
}

/// The href of the first anchor in the cell at `column`, for every data row
/// of the table at `table_index`. Aligned with `extract_tables` row order.
pub fn link_column(doc: &Html, table_index: usize, column: usize) -> Vec<Option<String>> {
    let Some(table) = doc.select(&TABLE).nth(table_index) else {
        return vec![];
    };
    data_rows(table)
        .into_iter()
        .filter(|tr| tr.select(&TD).next().is_some())
        .map(|tr| {
            tr.select(&TD)
                .nth(column)
                .and_then(|td| td.select(&A).next())
                .and_then(|a| a.value().attr("href"))
                .map(ToString::to_string)
        })
        .collect()
}

/// Trimmed, whitespace-collapsed text of every element matching `selector`.
pub fn select_texts(doc: &Html, selector: &Selector) -> Vec<String> {
    doc.select(selector).map(element_text).collect()
}

fn element_text(el: ElementRef) -> String {
    normalize(&el.text().collect::<String>())
}

pub(crate) fn normalize(s: &str) -> String {
    regex!(r"\s+").replace_all(s, " ").trim().to_string()
}

/// Map rows onto `target` by header name. Columns missing from the source
/// become empty strings; source columns absent from `target` are dropped.
pub fn reindex(table: &Table, target: &[&str]) -> Vec<Vec<String>> {
    let positions: Vec<Option<usize>> = target
        .iter()
        .map(|name| table.headers.iter().position(|h| h == name))
        .collect();

    table
        .rows
        .iter()
        .map(|row| {
            positions
                .iter()
                .map(|pos| {
                    pos.and_then(|i| row.get(i).cloned())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
        <html><body>
        <table>
          <thead>
            <tr><th>Name</th><th> License
                Number </th><th></th></tr>
          </thead>
          <tbody>
            <tr><td>ADAMS,
                KAREN</td><td>V-1001</td>
                <td><a href="https://example.test/#/profile/1001">View</a></td></tr>
            <tr><td>BAKER, JOHN</td><td>V-1002</td><td></td></tr>
          </tbody>
        </table>
        <table>
          <tr><th>Type</th><th>Date</th></tr>
          <tr><td>Renewal</td><td>2021-01-05</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn extracts_tables_in_document_order() {
        let doc = Html::parse_document(PAGE);
        let tables = extract_tables(&doc);
        assert_eq!(tables.len(), 2);

        assert_eq!(
            tables[0].headers,
            vec!["Name".to_string(), "License Number".to_string(), String::new()]
        );
        assert_eq!(
            tables[0].rows,
            vec![
                vec![
                    "ADAMS, KAREN".to_string(),
                    "V-1001".to_string(),
                    "View".to_string()
                ],
                vec![
                    "BAKER, JOHN".to_string(),
                    "V-1002".to_string(),
                    String::new()
                ],
            ]
        );
    }

    #[test]
    fn header_row_without_thead_is_recognized() {
        let doc = Html::parse_document(PAGE);
        let tables = extract_tables(&doc);
        assert_eq!(
            tables[1].headers,
            vec!["Type".to_string(), "Date".to_string()]
        );
        assert_eq!(
            tables[1].rows,
            vec![vec!["Renewal".to_string(), "2021-01-05".to_string()]]
        );
    }

    #[test]
    fn link_column_follows_row_order() {
        let doc = Html::parse_document(PAGE);
        let links = link_column(&doc, 0, 2);
        assert_eq!(
            links,
            vec![
                Some("https://example.test/#/profile/1001".to_string()),
                None
            ]
        );
        assert_eq!(link_column(&doc, 5, 2), Vec::<Option<String>>::new());
    }

    #[test]
    fn reindex_fills_missing_and_drops_extra_columns() {
        let table = Table {
            headers: vec![
                "Name".to_string(),
                "State".to_string(),
                "City".to_string(),
            ],
            rows: vec![vec![
                "Desert Paws".to_string(),
                "NV".to_string(),
                "Reno".to_string(),
            ]],
        };
        let rows = reindex(&table, &["Name", "City", "Postal Code"]);
        assert_eq!(
            rows,
            vec![vec![
                "Desert Paws".to_string(),
                "Reno".to_string(),
                String::new()
            ]]
        );
    }

    #[test]
    fn reindex_tolerates_short_rows() {
        let table = Table {
            headers: vec!["A".to_string(), "B".to_string()],
            rows: vec![vec!["only-a".to_string()]],
        };
        let rows = reindex(&table, &["A", "B"]);
        assert_eq!(rows, vec![vec!["only-a".to_string(), String::new()]]);
    }

    #[test]
    fn select_texts_normalizes_whitespace() {
        let doc = Html::parse_document("<h2>  Desert \n  Paws  </h2>");
        let sel = Selector::parse("h2").expect(E);
        assert_eq!(select_texts(&doc, &sel), vec!["Desert Paws".to_string()]);
    }
}
