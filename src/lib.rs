//! Connect to Salesforce orgs using sessions issued by the `sfdx` CLI.
//!
//! [`connection::connect`] resolves an alias through
//! `sfdx force:org:display --json` and returns a [`connection::Connection`],
//! or `None` after logging a classified [`error::ConnectError`]. The
//! [`files`] helpers follow the same log-and-return-`None` convention.
pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod files;
pub mod logging;
pub mod org;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, TraceLevel};
pub use connection::{connect, try_connect, Connection};
pub use error::ConnectError;
pub use org::{resolve_org_details, OrgDetails};
