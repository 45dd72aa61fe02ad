//! CLI argument parsing for interactive org sessions.
//!
//! The CLI is thin: each subcommand maps onto one library operation so scripts
//! and shells see the same behavior.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "sfconn",
    version,
    about = "Connect to Salesforce orgs through sfdx-issued sessions",
    after_help = "Examples:\n  sfconn display --alias dev\n  sfconn query --alias dev \"SELECT Id, Name FROM Account LIMIT 5\"\n  sfconn write-json out/accounts.json '{\"count\": 5}'\n  sfconn write-json --string out/id.json 00123\n  sfconn ls out\n\nEnvironment:\n  SFCONN_TRACE_LEVEL   -1 silent, 0 errors, >0 verbose (overridden by --trace-level)\n  SFCONN_SFDX_COMMAND  command used in place of `sfdx`",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Error logging verbosity: -1 silent, 0 errors, >0 verbose
    #[arg(long, global = true, value_name = "N", allow_negative_numbers = true)]
    pub trace_level: Option<i32>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Display(DisplayArgs),
    Query(QueryArgs),
    ReadJson(ReadJsonArgs),
    ReadText(ReadTextArgs),
    WriteJson(WriteJsonArgs),
    Ls(LsArgs),
}

/// Display command inputs for one org.
#[derive(Parser, Debug)]
#[command(about = "Print the session details sfdx reports for an org")]
pub struct DisplayArgs {
    /// Org alias or username; defaults to the sfdx default org
    #[arg(long, short = 'u', value_name = "ALIAS")]
    pub alias: Option<String>,

    /// Include the access token in the output
    #[arg(long)]
    pub show_token: bool,
}

/// Query command inputs.
#[derive(Parser, Debug)]
#[command(about = "Run a SOQL query against an org")]
pub struct QueryArgs {
    /// Org alias or username; defaults to the sfdx default org
    #[arg(long, short = 'u', value_name = "ALIAS")]
    pub alias: Option<String>,

    /// Follow nextRecordsUrl and print every record
    #[arg(long)]
    pub all: bool,

    /// SOQL statement
    #[arg(value_name = "SOQL")]
    pub soql: String,
}

#[derive(Parser, Debug)]
#[command(about = "Print a JSON file")]
pub struct ReadJsonArgs {
    /// Path, relative to the current directory
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
#[command(about = "Print a text file")]
pub struct ReadTextArgs {
    /// Path, relative to the current directory
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// Write command inputs; VALUE is parsed as JSON unless `--string` is given.
#[derive(Parser, Debug)]
#[command(about = "Write a value as indented JSON")]
pub struct WriteJsonArgs {
    /// Destination path, relative to the current directory
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// JSON value; anything that does not parse is written as a JSON string
    #[arg(value_name = "VALUE")]
    pub value: String,

    /// Write VALUE as a JSON string without parsing it
    #[arg(long)]
    pub string: bool,
}

#[derive(Parser, Debug)]
#[command(about = "List entry names in a directory")]
pub struct LsArgs {
    /// Directory, relative to the current directory
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}
