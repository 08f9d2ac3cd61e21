//! Action dispatch table — action identifier to request path

use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;
use crate::location::SearchLocation;

/// Every slot of the day is acceptable.
pub const ALL_DAY_SLOTS: &str = "11111111111111";
/// Search radius around the postal code, in km.
pub const SEARCH_RADIUS: u32 = 10;

pub const VACCINATION_LIST_PATH: &str = "/assets/static/its/vaccination-list.json";
pub const VERSION_PATH: &str = "/rest/version";

/// The endpoints the fetcher knows how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// First available appointment for the location in the page path.
    #[default]
    Ersttermin,
    VaccinationList,
    Version,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Ersttermin, Action::VaccinationList, Action::Version];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Ersttermin => "get_ersttermin_json",
            Action::VaccinationList => "get_vaccination_list_json",
            Action::Version => "get_version",
        }
    }

    /// Build the request path. Only `Ersttermin` reads the page path; its
    /// values are interpolated as-is, without percent-encoding.
    pub fn resolve(&self, page_path: &str) -> String {
        match self {
            Action::Ersttermin => {
                let location = SearchLocation::from_page_path(page_path);
                format!(
                    "/rest/suche/ersttermin?allOf=&someOf={}&plz={}&daytime={}&radius={}",
                    location.vaccine_code_or_missing(),
                    location.postal_code_or_missing(),
                    ALL_DAY_SLOTS,
                    SEARCH_RADIUS
                )
            }
            Action::VaccinationList => VACCINATION_LIST_PATH.to_string(),
            Action::Version => VERSION_PATH.to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| FetchError::UnknownAction(s.to_string()))
    }
}

/// Resolve an optional action identifier against `page_path`.
///
/// `None` is the legacy single-purpose mode and means `get_ersttermin_json`.
pub fn resolve(action: Option<&str>, page_path: &str) -> Result<String, FetchError> {
    let action = match action {
        Some(id) => id.parse::<Action>()?,
        None => Action::default(),
    };
    Ok(action.resolve(page_path))
}
