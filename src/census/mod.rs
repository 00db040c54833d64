// Census API module.
// Provides the client, variable groups, and types for the ACS data API.

pub mod client;
pub mod endpoints;
pub mod types;
pub mod variables;

pub use client::CensusClient;
pub use types::{Geography, RawTable, TableRequest, parse_estimate};
pub use variables::{COUNTY_GROUPS, VariableGroup};
