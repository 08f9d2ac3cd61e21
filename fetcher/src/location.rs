//! Search location — the positional segments of a terminservice page path

/// Rendering used for a segment that is missing from the page path.
pub const MISSING_SEGMENT: &str = "undefined";

const CODE_SEGMENT: usize = 3;
const POSTAL_CODE_SEGMENT: usize = 4;
const VACCINE_CODE_SEGMENT: usize = 5;

/// The three values a search page carries in its path, e.g.
/// `/terminservice/suche/VCGM-F87Z-Q7VZ/75175/L920`.
///
/// Segments are taken by position and never validated. A segment that is
/// absent stays `None` and renders as `"undefined"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchLocation {
    pub code: Option<String>,
    pub postal_code: Option<String>,
    pub vaccine_code: Option<String>,
}

impl SearchLocation {
    pub fn new(
        code: impl Into<String>,
        postal_code: impl Into<String>,
        vaccine_code: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            postal_code: Some(postal_code.into()),
            vaccine_code: Some(vaccine_code.into()),
        }
    }

    /// Split `path` on `/` and pick segments 3, 4 and 5.
    pub fn from_page_path(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').collect();
        let segment = |idx: usize| segments.get(idx).map(|s| s.to_string());

        Self {
            code: segment(CODE_SEGMENT),
            postal_code: segment(POSTAL_CODE_SEGMENT),
            vaccine_code: segment(VACCINE_CODE_SEGMENT),
        }
    }

    /// The search page this location was (or would be) read from.
    pub fn page_path(&self) -> String {
        format!(
            "/terminservice/suche/{}/{}/{}",
            self.code_or_missing(),
            self.postal_code_or_missing(),
            self.vaccine_code_or_missing()
        )
    }

    pub fn code_or_missing(&self) -> &str {
        self.code.as_deref().unwrap_or(MISSING_SEGMENT)
    }

    pub fn postal_code_or_missing(&self) -> &str {
        self.postal_code.as_deref().unwrap_or(MISSING_SEGMENT)
    }

    pub fn vaccine_code_or_missing(&self) -> &str {
        self.vaccine_code.as_deref().unwrap_or(MISSING_SEGMENT)
    }
}
