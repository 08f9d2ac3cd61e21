//! Impf-o-mat fetcher
//!
//! Resolves an action identifier to one of the appointment service endpoints
//! and relays a single authenticated GET to a completion callback:
//! - `get_ersttermin_json`: first free appointment for the page's location
//! - `get_vaccination_list_json`: static vaccination list
//! - `get_version`: service version

pub mod action;
pub mod config;
pub mod credential;
pub mod error;
pub mod http;
pub mod invocation;
pub mod location;
pub mod outcome;

pub use action::{resolve, Action};
pub use config::{load_config, FetcherConfig};
pub use credential::Credential;
pub use error::{ErrorDescriptor, FetchError};
pub use http::HttpFetcher;
pub use invocation::{Callback, Client, Invocation};
pub use location::SearchLocation;
pub use outcome::Outcome;
