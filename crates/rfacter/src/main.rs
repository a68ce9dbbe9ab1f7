//! rfacter - Collect and display facts about the current host.
//!
//! Without queries every fact is printed; with queries only the named
//! facts (dotted paths or legacy names) are resolved and printed.

use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, debug, error};
use tracing_subscriber::EnvFilter;

use rfacter_core::{FactCollection, FactValue, Facter, Options, to_collection};

/// Collect and display facts about the current host.
#[derive(Parser)]
#[command(name = "rfacter", about = "Collect and display host facts", version)]
struct Args {
    /// Facts to resolve (e.g. "os.release.major", "memorysize").
    /// All facts are printed when none are given.
    queries: Vec<String>,

    /// Show legacy facts when printing all facts.
    #[arg(long)]
    show_legacy: bool,

    /// Report queries that match no fact and exit with status 1.
    #[arg(long)]
    strict: bool,

    /// Disable the block list.
    #[arg(long)]
    no_block: bool,

    /// Fact or fact group to skip. May be given multiple times.
    #[arg(long, value_name = "FACT")]
    block: Vec<String>,

    /// Log the time spent resolving each fact.
    #[arg(long)]
    timing: bool,

    /// Worker threads (default: available parallelism).
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// JSON file with run options. Command line flags take precedence.
    #[arg(long, value_name = "PATH")]
    config: Option<String>,

    /// Print facts as JSON.
    #[arg(long)]
    json: bool,

    /// List the fact groups that can be blocked and exit.
    #[arg(long)]
    list_block_groups: bool,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace).
    /// Default is warn level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Logs go to stderr so stdout carries only facts.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["rfacter", "rfacter_core"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds run options from the optional config file and the flags.
fn build_options(args: &Args) -> Result<Options, String> {
    let mut options = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read config '{}': {}", path, e))?;
            serde_json::from_str(&text)
                .map_err(|e| format!("invalid config '{}': {}", path, e))?
        }
        None => Options::default(),
    };

    options.show_legacy |= args.show_legacy;
    options.strict |= args.strict;
    options.timing |= args.timing;
    if args.no_block {
        options.block = false;
    }
    options.block_list.extend(args.block.iter().cloned());
    if args.workers.is_some() {
        options.workers = args.workers;
    }
    Ok(options)
}

/// Renders a value for `name => value` output.
fn render(value: &FactValue) -> String {
    match value {
        FactValue::Null => String::new(),
        FactValue::Map(_) | FactValue::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}

fn print_collection(collection: &FactCollection) {
    for (name, value) in collection.iter() {
        println!("{} => {}", name, render(value));
    }
}

fn print_queries(collection: &FactCollection, queries: &[String]) {
    if let [query] = queries {
        if let Some(value) = collection.value(query) {
            println!("{}", render(value));
        }
        return;
    }
    for query in queries {
        let value = collection.value(query).map(render).unwrap_or_default();
        println!("{} => {}", query, value);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let options = match build_options(&args) {
        Ok(options) => options,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!("Options: {:?}", options);

    let facter = Facter::new();

    if args.list_block_groups {
        for (group, facts) in facter.block_groups(&options) {
            println!("{}", group);
            for fact in facts {
                println!("  - {}", fact);
            }
        }
        return ExitCode::SUCCESS;
    }

    let facts = match facter.resolve(&options, &args.queries) {
        Ok(facts) => facts,
        Err(e) => {
            error!("Failed to resolve facts: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let collection = to_collection(&facts);

    if args.json {
        let rendered = if args.queries.is_empty() {
            serde_json::to_string_pretty(&collection)
        } else {
            let selected: serde_json::Map<String, serde_json::Value> = args
                .queries
                .iter()
                .map(|q| {
                    let value = collection
                        .value(q)
                        .and_then(|v| serde_json::to_value(v).ok())
                        .unwrap_or(serde_json::Value::Null);
                    (q.clone(), value)
                })
                .collect();
            serde_json::to_string_pretty(&selected)
        };
        match rendered {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("Failed to serialize facts: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else if args.queries.is_empty() {
        print_collection(&collection);
    } else {
        print_queries(&collection, &args.queries);
    }

    if facts.iter().any(|f| f.unresolved) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
