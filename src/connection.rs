//! Connections built from sfdx-issued sessions.
//!
//! A [`Connection`] only needs the instance URL and access token from the
//! resolved org details. The REST helpers are thin authenticated `GET`s so a
//! scripting session can query the org without another client library.
use crate::config::Config;
use crate::error::{alias_label, ConnectError};
use crate::org::{resolve_org_details, OrgDetails};
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};
use ureq::http::Uri;

/// REST API version used unless overridden.
pub const DEFAULT_API_VERSION: &str = "59.0";
const HTTP_TIMEOUT_SECS: u64 = 60;

/// Authenticated handle on one org.
pub struct Connection {
    instance_url: String,
    access_token: String,
    api_version: String,
    agent: ureq::Agent,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"<redacted>")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl Connection {
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Connection {
        let instance_url: String = instance_url.into();
        Connection {
            instance_url: instance_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            agent: http_agent(),
        }
    }

    /// Build from resolved org details; only `instanceUrl` and `accessToken` are used.
    pub fn from_details(details: &OrgDetails) -> Connection {
        Connection::new(details.instance_url.as_str(), details.access_token.as_str())
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Connection {
        self.api_version = version.into();
        self
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Session identifier sent as the bearer token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Absolute URL for a REST path.
    ///
    /// Absolute URLs are accepted only when their scheme and host match the
    /// instance, so the bearer token never leaves the org.
    pub fn url_for(&self, path: &str) -> Result<String> {
        if path.contains("://") {
            let requested: Uri = path
                .parse()
                .with_context(|| format!("parse request URL {path}"))?;
            let instance: Uri = self
                .instance_url
                .parse()
                .with_context(|| format!("parse instance URL {}", self.instance_url))?;
            let same_origin = requested.scheme().is_some()
                && requested.scheme() == instance.scheme()
                && requested.authority().is_some()
                && requested.authority() == instance.authority();
            if !same_origin {
                bail!(
                    "refusing to send session to {path}: not on instance {}",
                    self.instance_url
                );
            }
            return Ok(path.to_string());
        }
        if path.starts_with('/') {
            Ok(format!("{}{path}", self.instance_url))
        } else {
            Ok(format!("{}/{path}", self.instance_url))
        }
    }

    /// Path of a versioned data resource, e.g. `query` or `sobjects`.
    pub fn data_path(&self, resource: &str) -> String {
        format!(
            "/services/data/v{}/{}",
            self.api_version,
            resource.trim_start_matches('/')
        )
    }

    /// Authenticated `GET` decoding a JSON body.
    pub fn get_json(&self, path: &str) -> Result<Value> {
        self.get_with_query(path, &[])
    }

    /// Run a SOQL query and return the first page of results.
    pub fn query(&self, soql: &str) -> Result<Value> {
        self.get_with_query(&self.data_path("query"), &[("q", soql)])
    }

    /// Run a SOQL query and follow `nextRecordsUrl` until every record is read.
    ///
    /// A page that points back at an already fetched URL is an error.
    pub fn query_all(&self, soql: &str) -> Result<Vec<Value>> {
        let mut page = self.query(soql)?;
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        loop {
            records.extend(take_records(&mut page));
            let Some(next) = unvisited_next_url(&page, &mut seen)? else {
                break;
            };
            page = self.get_json(&next)?;
        }
        Ok(records)
    }

    /// List the org's sObjects.
    pub fn describe_global(&self) -> Result<Value> {
        self.get_json(&self.data_path("sobjects"))
    }

    fn get_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = self.url_for(path)?;
        let start = Instant::now();
        let mut request = self
            .agent
            .get(url.as_str())
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Accept", "application/json");
        for (key, value) in query {
            request = request.query(*key, *value);
        }
        let mut response = request.call().with_context(|| format!("GET {url}"))?;
        let value: Value = response
            .body_mut()
            .read_json()
            .with_context(|| format!("decode JSON from {url}"))?;
        let elapsed_ms = start.elapsed().as_millis();

        tracing::debug!(elapsed_ms, path, "salesforce request complete");
        Ok(value)
    }
}

fn http_agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
        .build()
        .into()
}

fn take_records(page: &mut Value) -> Vec<Value> {
    match page.get_mut("records").map(Value::take) {
        Some(Value::Array(records)) => records,
        _ => Vec::new(),
    }
}

fn next_records_url(page: &Value) -> Option<String> {
    if page.get("done").and_then(Value::as_bool).unwrap_or(true) {
        return None;
    }
    page.get("nextRecordsUrl")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn unvisited_next_url(page: &Value, seen: &mut HashSet<String>) -> Result<Option<String>> {
    let Some(next) = next_records_url(page) else {
        return Ok(None);
    };
    if !seen.insert(next.clone()) {
        bail!("query paging repeated nextRecordsUrl {next}");
    }
    Ok(Some(next))
}

/// Resolve `alias` through sfdx and build a connection, surfacing failures.
pub fn try_connect(config: &Config, alias: Option<&str>) -> Result<Connection, ConnectError> {
    let details = resolve_org_details(config, alias)?;
    let connection = Connection::from_details(&details);
    tracing::debug!(
        alias = alias_label(alias).as_str(),
        instance_url = connection.instance_url(),
        "connection ready"
    );
    Ok(connection)
}

/// Resolve `alias` and build a connection, logging any failure.
///
/// Returns `None` instead of an error so interactive callers can check the
/// result without handling error types.
pub fn connect(config: &Config, alias: Option<&str>) -> Option<Connection> {
    match try_connect(config, alias) {
        Ok(connection) => Some(connection),
        Err(err) => {
            err.log(config.trace_level);
            None
        }
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
