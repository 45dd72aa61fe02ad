use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use sfconn::cli::{
    Command, DisplayArgs, LsArgs, QueryArgs, ReadJsonArgs, ReadTextArgs, RootArgs, WriteJsonArgs,
};
use sfconn::{connect, files, org, Config, TraceLevel};
use std::process::ExitCode;

fn main() -> ExitCode {
    sfconn::logging::init_tracing();
    let args = RootArgs::parse();

    let mut config = Config::from_env();
    if let Some(level) = args.trace_level {
        config = config.with_trace_level(TraceLevel(level));
    }

    match run(&config, args.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Failures already logged by the library surface as `Ok(ExitCode::FAILURE)`.
fn run(config: &Config, command: Command) -> Result<ExitCode> {
    match command {
        Command::Display(args) => cmd_display(config, args),
        Command::Query(args) => cmd_query(config, args),
        Command::ReadJson(args) => cmd_read_json(config, args),
        Command::ReadText(args) => cmd_read_text(config, args),
        Command::WriteJson(args) => cmd_write_json(config, args),
        Command::Ls(args) => cmd_ls(config, args),
    }
}

fn cmd_display(config: &Config, args: DisplayArgs) -> Result<ExitCode> {
    let details = match org::resolve_org_details(config, args.alias.as_deref()) {
        Ok(details) => details,
        Err(err) => {
            err.log(config.trace_level);
            return Ok(ExitCode::FAILURE);
        }
    };
    if args.show_token {
        print_json(&details)?;
    } else {
        print_json(&details.redacted())?;
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_query(config: &Config, args: QueryArgs) -> Result<ExitCode> {
    let Some(connection) = connect(config, args.alias.as_deref()) else {
        return Ok(ExitCode::FAILURE);
    };
    if args.all {
        let records = connection.query_all(&args.soql).context("run SOQL query")?;
        print_json(&records)?;
    } else {
        let page = connection.query(&args.soql).context("run SOQL query")?;
        print_json(&page)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_read_json(config: &Config, args: ReadJsonArgs) -> Result<ExitCode> {
    match files::read_json(config, &args.path) {
        Some(value) => {
            print_json(&value)?;
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

fn cmd_read_text(config: &Config, args: ReadTextArgs) -> Result<ExitCode> {
    match files::read_text(config, &args.path) {
        Some(text) => {
            print!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

fn cmd_write_json(config: &Config, args: WriteJsonArgs) -> Result<ExitCode> {
    let value = if args.string {
        Value::String(args.value)
    } else {
        serde_json::from_str::<Value>(&args.value).unwrap_or_else(|_| Value::String(args.value))
    };
    match files::write_json(config, &args.path, &value) {
        Some(path) => {
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

fn cmd_ls(config: &Config, args: LsArgs) -> Result<ExitCode> {
    match files::list_dir(config, &args.path) {
        Some(names) => {
            for name in names {
                println!("{name}");
            }
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}
