pub mod examiner;
pub mod facility;
pub mod search;

use lazy_static::lazy_static;
use scraper::Selector;

/// Column appended to every output row so sub-tables can be joined back to
/// their source record.
pub const PROFILE_URL: &str = "profile_url";

const E: &str = "Invalid selector";
lazy_static! {
    // The register renders every labeled profile value in this exact div.
    pub(crate) static ref BINDING_VALUE: Selector =
        Selector::parse(r#"div[class="col-md-8 col-sm-8 ng-binding"]"#).expect(E);
}
