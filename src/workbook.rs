use crate::{error::ScrapeError, sink};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load each flat CSV and write it as a named sheet of one workbook. All
/// cells are written as strings; formatting is out of scope.
pub fn combine(inputs: &[(PathBuf, &str)], out: &Path) -> Result<(), ScrapeError> {
    let mut workbook = Workbook::new();

    for (path, sheet) in inputs {
        let table = sink::read_table(path)?;
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*sheet)?;

        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, header.as_str())?;
        }
        for (row, cells) in table.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                worksheet.write_string(row as u32 + 1, col as u16, cell.as_str())?;
            }
        }

        info!(
            "Sheet '{}' <- {} ({} rows)",
            sheet,
            path.display(),
            table.rows.len()
        );
    }

    workbook.save(out)?;
    info!("Wrote {}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CsvSink;
    use std::fs;

    #[test]
    fn combines_two_csv_files_into_one_workbook() {
        let dir = tempfile::tempdir().unwrap();

        let facilities = dir.path().join("facilities.csv");
        CsvSink::new(&facilities, vec!["Name".to_string(), "City".to_string()])
            .append(&[vec!["Desert Paws".to_string(), "Reno".to_string()]])
            .unwrap();

        let profiles = dir.path().join("profiles.csv");
        CsvSink::new(&profiles, vec!["Name".to_string(), "Telephone".to_string()])
            .append(&[vec!["Desert Paws".to_string(), "(775) 555-0100".to_string()]])
            .unwrap();

        let out = dir.path().join("combined.xlsx");
        combine(
            &[
                (facilities, "facilities"),
                (profiles, "facility-profile"),
            ],
            &out,
        )
        .unwrap();

        assert!(fs::metadata(&out).unwrap().len() > 0);
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = combine(
            &[(dir.path().join("absent.csv"), "sheet")],
            &dir.path().join("out.xlsx"),
        );
        assert!(result.is_err());
    }
}
