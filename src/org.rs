//! Org detail resolution through `sfdx force:org:display --json`.
//!
//! The tool's JSON payload, not its exit code, decides success. Launch
//! failures, unreadable payloads, and tool-reported failures each map to a
//! distinct [`ConnectError`] so callers can tell a missing CLI from a missing
//! org.
use crate::config::Config;
use crate::error::{alias_label, ConnectError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::process::{Command, Stdio};
use std::time::Instant;

const REDACTED: &str = "<redacted>";
/// Pass-through keys masked by [`OrgDetails::redacted`], compared ignoring case.
const SECRET_KEYS: &[&str] = &[
    "password",
    "refreshToken",
    "sfdxAuthUrl",
    "clientSecret",
    "privateKey",
];

/// Envelope printed by `sfdx ... --json`.
#[derive(Deserialize, Debug, Clone)]
pub struct OrgDisplayResponse {
    pub status: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stack: Option<String>,
    /// Kept untyped until the status says it should hold org details.
    #[serde(default)]
    pub result: Option<Value>,
}

/// Session details for one authenticated org.
#[derive(Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrgDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_status: Option<String>,
    pub access_token: String,
    pub instance_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Fields the tool emits beyond the ones above, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl OrgDetails {
    /// Copy with the access token and known secret pass-through fields masked.
    pub fn redacted(&self) -> OrgDetails {
        let extra = self
            .extra
            .iter()
            .map(|(key, value)| {
                if is_secret_key(key) {
                    (key.clone(), Value::String(REDACTED.to_string()))
                } else {
                    (key.clone(), value.clone())
                }
            })
            .collect();
        OrgDetails {
            access_token: REDACTED.to_string(),
            extra,
            ..self.clone()
        }
    }
}

fn is_secret_key(key: &str) -> bool {
    SECRET_KEYS
        .iter()
        .any(|secret| secret.eq_ignore_ascii_case(key))
}

impl fmt::Debug for OrgDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrgDetails")
            .field("username", &self.username)
            .field("id", &self.id)
            .field("connected_status", &self.connected_status)
            .field("access_token", &REDACTED)
            .field("instance_url", &self.instance_url)
            .field("client_id", &self.client_id)
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

/// Arguments passed after the `sfdx` command itself.
pub fn display_args(alias: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "force:org:display".to_string(),
        "--json".to_string(),
    ];
    if let Some(alias) = alias.map(str::trim).filter(|alias| !alias.is_empty()) {
        args.push("-u".to_string());
        args.push(alias.to_string());
    }
    args
}

/// Run `sfdx force:org:display --json` for `alias` and return its result record.
///
/// No timeout is applied; a hung tool blocks the caller.
pub fn resolve_org_details(
    config: &Config,
    alias: Option<&str>,
) -> Result<OrgDetails, ConnectError> {
    let label = alias_label(alias);
    let argv = command_argv(&config.sfdx_command).map_err(|message| {
        ConnectError::ToolUnavailable {
            alias: label.clone(),
            message,
        }
    })?;

    let start = Instant::now();
    let output = Command::new(&argv[0])
        .args(&argv[1..])
        .args(display_args(alias))
        .stdin(Stdio::null())
        .output()
        .map_err(|err| ConnectError::ToolUnavailable {
            alias: label.clone(),
            message: err.to_string(),
        })?;
    let elapsed_ms = start.elapsed().as_millis();

    tracing::debug!(
        elapsed_ms,
        alias = label.as_str(),
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "sfdx org display complete"
    );
    if config.trace_level.is_verbose() {
        tracing::info!(
            alias = label.as_str(),
            exit_status = %output.status,
            stdout = %String::from_utf8_lossy(&output.stdout),
            stderr = %String::from_utf8_lossy(&output.stderr),
            "sfdx raw output"
        );
    }

    parse_org_display(&output.stdout, alias)
}

/// Classify the JSON printed by `sfdx force:org:display --json`.
pub fn parse_org_display(stdout: &[u8], alias: Option<&str>) -> Result<OrgDetails, ConnectError> {
    let label = alias_label(alias);
    let response: OrgDisplayResponse =
        serde_json::from_slice(stdout).map_err(|err| malformed(&label, &err))?;

    if response.status != 0 {
        return Err(ConnectError::ResolutionFailed {
            alias: label,
            message: response
                .message
                .unwrap_or_else(|| format!("sfdx reported status {}", response.status)),
            stack: response.stack.unwrap_or_default(),
        });
    }

    let Some(result) = response.result else {
        return Err(ConnectError::MalformedResponse {
            alias: label,
            message: "sfdx reported success without a result".to_string(),
            stack: String::new(),
        });
    };
    serde_json::from_value(result).map_err(|err| malformed(&label, &err))
}

fn malformed(label: &str, err: &serde_json::Error) -> ConnectError {
    ConnectError::MalformedResponse {
        alias: label.to_string(),
        message: err.to_string(),
        stack: format!("line {}, column {}", err.line(), err.column()),
    }
}

fn command_argv(command: &str) -> Result<Vec<String>, String> {
    let argv =
        shell_words::split(command).map_err(|err| format!("parse sfdx command {command:?}: {err}"))?;
    if argv.is_empty() {
        return Err("sfdx command is empty".to_string());
    }
    Ok(argv)
}

#[cfg(test)]
#[path = "org_tests.rs"]
mod tests;
