use std::io::IsTerminal;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::classes::ClassificationSet;
use crate::client::{ServerClient, DEFAULT_SERVER_URL};
use crate::config::{mask_secret, Config};
use crate::duplicate::DuplicateControl;
use crate::error::{DuplicateError, Result};
use crate::graph::{build_request, Dispatch, GraphOptions, Target};

#[derive(Parser)]
#[command(
    name = "omero-duplicate",
    version,
    about = "Duplicate OMERO object graphs by top-node"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Duplicate entire graphs of data based on the ID of the top-node
    #[command(after_help = DUPLICATE_EXAMPLES)]
    Duplicate(DuplicateArgs),
    /// Manage omero-duplicate stored config
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

const DUPLICATE_EXAMPLES: &str = "\
Examples:
  # Duplicate a dataset, reporting all the new objects
  omero-duplicate Dataset:50 --report
  # Dry run, reporting what would have been duplicated
  omero-duplicate Dataset:53 --dry-run --report
  # Duplicate a project with its datasets but not their images
  omero-duplicate Project:15 --ignore DatasetImageLink
  # Link to the original annotations except comments and ratings
  omero-duplicate Project:15 --reference Annotation --duplicate CommentAnnotation,LongAnnotation

Ignoring a linked-to class does not suffice: ignore the link itself
(ImageAnnotationLink rather than Annotation).";

#[derive(Args)]
pub struct DuplicateArgs {
    /// Top-nodes as Type:id[,id...], optionally /Type to start below them
    #[arg(required = true, value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Kinds of object to duplicate (comma-separated, repeatable)
    #[arg(long, visible_alias = "duplicate-classes", value_name = "CLASS", num_args = 1.., action = ArgAction::Append)]
    pub duplicate: Vec<String>,

    /// Kinds of object to link to instead of duplicate
    #[arg(long, visible_alias = "reference-classes", value_name = "CLASS", num_args = 1.., action = ArgAction::Append)]
    pub reference: Vec<String>,

    /// Kinds of object to ignore, neither linking to nor duplicating
    #[arg(long, visible_alias = "ignore-classes", value_name = "CLASS", num_args = 1.., action = ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Ask the server what would happen without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the new objects created per type
    #[arg(long)]
    pub report: bool,

    /// Server base URL (or env OMERO_SERVER)
    #[arg(long)]
    pub server: Option<String>,

    /// Session key (or env OMERO_SESSION_KEY)
    #[arg(long)]
    pub session: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 60.0, value_parser = parse_timeout)]
    pub timeout: f64,
}

fn parse_timeout(value: &str) -> std::result::Result<f64, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number of seconds"))?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(format!("'{value}' must be finite and greater than 0"))
    }
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print config file path
    Path,
    /// Show stored config values
    Show,
    /// Set stored config values
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Server base URL
    #[arg(long)]
    pub server: Option<String>,

    /// Session key
    #[arg(long)]
    pub session: Option<String>,

    /// Remove stored server URL
    #[arg(long)]
    pub clear_server: bool,

    /// Remove stored session key
    #[arg(long)]
    pub clear_session: bool,
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn resolve_from_env(env_var: &str) -> Option<String> {
    std::env::var(env_var)
        .ok()
        .as_deref()
        .and_then(non_empty)
        .map(str::to_owned)
}

fn resolve_field(arg: Option<&str>, config_val: Option<&str>, env_var: &str) -> Option<String> {
    arg.and_then(non_empty)
        .or_else(|| config_val.and_then(non_empty))
        .map(str::to_owned)
        .or_else(|| resolve_from_env(env_var))
}

fn resolve_session(args_session: Option<&str>, config: &Config) -> Result<String> {
    resolve_field(args_session, config.session.as_deref(), "OMERO_SESSION_KEY")
        .ok_or(DuplicateError::MissingSession)
}

fn resolve_server(args_server: Option<&str>, config: &Config) -> String {
    resolve_field(args_server, config.server.as_deref(), "OMERO_SERVER")
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}

fn update_field(
    target: &mut Option<String>,
    value: Option<&str>,
    clear: bool,
    label: &str,
) -> Result<bool> {
    if clear && value.is_some() {
        return Err(DuplicateError::ConflictingFlags(format!(
            "cannot use --{label} and --clear-{label} together"
        )));
    }
    if clear {
        *target = None;
        return Ok(true);
    }
    match value {
        None => Ok(false),
        Some(v) => {
            *target = non_empty(v).map(str::to_owned);
            Ok(true)
        }
    }
}

pub fn handle_config(action: ConfigAction) -> Result<()> {
    handle_config_with_path(action, &Config::default_path())
}

pub fn handle_config_with_path(action: ConfigAction, path: &std::path::Path) -> Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = Config::load_from(path);
            println!("path: {}", path.display());
            println!("server: {}", config.server.as_deref().unwrap_or("(unset)"));
            let session_display = config
                .session
                .as_deref()
                .map(mask_secret)
                .unwrap_or_else(|| "(unset)".to_string());
            println!("session: {session_display}");
            Ok(())
        }
        ConfigAction::Set(args) => {
            let mut config = Config::load_from(path);
            let mut updated = false;
            updated |= update_field(
                &mut config.server,
                args.server.as_deref(),
                args.clear_server,
                "server",
            )?;
            updated |= update_field(
                &mut config.session,
                args.session.as_deref(),
                args.clear_session,
                "session",
            )?;
            if !updated {
                return Err(DuplicateError::NothingToUpdate);
            }
            config.save_to(path)?;
            Ok(())
        }
    }
}

/// Builds, adapts and sends the request; returns the lines to print.
pub fn run_duplicate(args: &DuplicateArgs, dispatcher: &dyn Dispatch) -> Result<Vec<String>> {
    let targets = args
        .targets
        .iter()
        .map(|target| Target::parse(target))
        .collect::<Result<Vec<_>>>()?;

    let classes = ClassificationSet::from_tokens(&args.duplicate, &args.reference, &args.ignore);
    if classes.is_empty() {
        tracing::debug!("no classification given, server defaults apply");
    } else {
        tracing::debug!(?classes, "collected classification");
    }
    let control = DuplicateControl::new(classes);

    let mut request = build_request(&targets);
    let options = GraphOptions {
        dry_run: args.dry_run,
    };

    let spinner = waiting_spinner();
    let outcome = control.process_request(&mut request, &options, dispatcher);
    spinner.finish_and_clear();
    let outcome = outcome?;

    let mut lines = vec![outcome.summary];
    lines.extend(control.detailed_report(&outcome.response, args.report));
    Ok(lines)
}

fn waiting_spinner() -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} Waiting for server [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn handle_duplicate(args: DuplicateArgs) -> Result<()> {
    let config = Config::load();
    let server = resolve_server(args.server.as_deref(), &config);
    let session = resolve_session(args.session.as_deref(), &config)?;

    let client = ServerClient::new(&server, &session, args.timeout)?;
    for line in run_duplicate(&args, &client)? {
        println!("{line}");
    }
    Ok(())
}
