#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("unexpected label set: expected {expected:?}, observed {observed:?}")]
    UnexpectedColumns {
        expected: Vec<String>,
        observed: Vec<String>,
    },

    #[error("not enough data rows in the source")]
    InsufficientData,

    #[error("no table at position {0} on the page")]
    MissingTable(usize),

    #[error("could not determine the result count")]
    ResultCount,

    #[error("browser error: {0}")]
    Browser(String),

    #[error("http error")]
    Http(#[from] reqwest::Error),

    #[error("csv error")]
    Csv(#[from] csv::Error),

    #[error("workbook error")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("io error")]
    Io(#[from] std::io::Error),

    #[error("config error")]
    Config(#[from] serde_json::Error),
}
