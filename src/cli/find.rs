use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::update::update_local_copy;
use crate::cli::OutputFormat;
use crate::core::field::FieldName;
use crate::database::store::Database;
use crate::loader::{self, CorpusFormat};
use crate::matching::assembly::{MatchingAssembly, Operation};
use crate::matching::engine::{Match, MatchingConfig};

#[derive(Args)]
pub struct FindArgs {
    /// Partial callsign, at least three characters
    #[arg(required = true)]
    pub query: String,

    /// Use this Super Check Partial file instead of the local MASTER.SCP copy
    #[arg(long, conflicts_with = "call_history")]
    pub scp: Option<PathBuf>,

    /// Use this N1MM call history file instead of the local MASTER.SCP copy
    #[arg(short = 'c', long)]
    pub call_history: Option<PathBuf>,

    /// Show the values of these fields next to the callsigns (repeatable)
    #[arg(long = "field", value_name = "NAME")]
    pub fields: Vec<String>,

    /// Output each matching callsign in a separate line
    #[arg(short, long)]
    pub lines: bool,

    /// Print the callsigns in reverse order (best match last)
    #[arg(short, long)]
    pub reverse: bool,

    /// Maximum number of matches to show
    #[arg(short = 'n', long)]
    pub max_matches: Option<usize>,

    /// Give up if the search takes longer than this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Path to a JSON file with the matching configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum accuracy for a callsign to be reported (0.0-1.0)
    #[arg(long)]
    pub min_accuracy: Option<f64>,

    /// Do not try to update the local MASTER.SCP copy
    #[arg(long)]
    pub offline: bool,
}

/// Execute find subcommand
///
/// # Errors
///
/// Returns an error if the configuration or the corpus cannot be loaded, or the search
/// fails or times out.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FindArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let database = load_database(&args, config)?;

    if verbose {
        eprintln!(
            "Loaded {} callsigns in {} buckets",
            database.entry_count(),
            database.bucket_count()
        );
    }

    let cancel = CancellationToken::new();
    if let Some(timeout_ms) = args.timeout_ms {
        let timer = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(timeout_ms));
            timer.cancel();
        });
    }

    let mut matches = database
        .find_cancellable(&args.query, &cancel)
        .with_context(|| format!("Search for {:?} failed", args.query))?;
    if let Some(max_matches) = args.max_matches {
        matches.truncate(max_matches);
    }

    if matches.is_empty() {
        eprintln!("No matching callsigns found.");
        return Ok(());
    }

    if args.reverse {
        matches.reverse();
    }

    let fields: Vec<FieldName> = args.fields.iter().map(FieldName::new).collect();
    match format {
        OutputFormat::Text => print_text_results(&matches, &fields, args.lines),
        OutputFormat::Json => print_json_results(&matches, &fields)?,
        OutputFormat::Tsv => print_tsv_results(&matches, &fields),
    }

    Ok(())
}

fn load_config(args: &FindArgs) -> anyhow::Result<MatchingConfig> {
    let mut config = match &args.config {
        Some(path) => MatchingConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MatchingConfig::default(),
    };
    if let Some(min_accuracy) = args.min_accuracy {
        config.min_accuracy = min_accuracy;
        config.validate()?;
    }
    Ok(config)
}

fn load_database(args: &FindArgs, config: MatchingConfig) -> anyhow::Result<Database> {
    let (path, format) = if let Some(path) = &args.call_history {
        (path.clone(), CorpusFormat::CallHistory)
    } else if let Some(path) = &args.scp {
        (path.clone(), CorpusFormat::Scp)
    } else {
        let path = loader::local_filename()?;
        if !args.offline {
            match update_local_copy(loader::DEFAULT_URL, &path) {
                Ok(true) => info!(path = %path.display(), "Updated local copy"),
                Ok(false) => {}
                Err(e) => warn!("Update of local copy failed: {e:#}"),
            }
        }
        (path, CorpusFormat::Scp)
    };

    loader::load_local_with_config(&path, format, config)
        .with_context(|| format!("Failed to load {}", path.display()))
}

/// The key, followed by the requested field values
fn format_entry(m: &Match, fields: &[FieldName]) -> String {
    if fields.is_empty() {
        return m.key().to_string();
    }
    let mut columns = vec![m.key()];
    columns.extend(m.entry.values(fields));
    columns.join(",")
}

/// Compact alignment: `DL3[~N][+E]Y` marks a false friend `N` and an inserted `E`
fn annotate(assembly: &MatchingAssembly) -> String {
    assembly
        .parts()
        .iter()
        .map(|part| match part.op {
            Operation::Nop => part.value.clone(),
            Operation::Insert => format!("[+{}]", part.value),
            Operation::Delete => format!("[-{}]", part.value),
            Operation::Substitute => format!("[*{}]", part.value),
            Operation::FalseFriend => format!("[~{}]", part.value),
        })
        .collect()
}

fn print_text_results(matches: &[Match], fields: &[FieldName], lines: bool) {
    let separator = if lines { "\n" } else { " " };
    let output: Vec<String> = matches.iter().map(|m| format_entry(m, fields)).collect();
    println!("{}", output.join(separator));
}

fn print_json_results(matches: &[Match], fields: &[FieldName]) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = matches
        .iter()
        .map(|m| {
            let mut json = serde_json::json!({
                "key": m.key(),
                "distance": m.distance,
                "accuracy": m.accuracy,
                "longest_part": m.longest_part(),
                "false_friend": m.contains_false_friend(),
                "assembly": m.assembly,
            });

            let values: serde_json::Map<String, serde_json::Value> = if fields.is_empty() {
                m.entry
                    .fields
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.into()))
                    .collect()
            } else {
                fields
                    .iter()
                    .map(|name| (name.to_string(), m.entry.get(name).into()))
                    .collect()
            };
            if !values.is_empty() {
                json["fields"] = serde_json::Value::Object(values);
            }
            json
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(matches: &[Match], fields: &[FieldName]) {
    let mut header = vec![
        "rank",
        "key",
        "distance",
        "accuracy",
        "longest_part",
        "false_friend",
        "assembly",
    ];
    header.extend(fields.iter().map(FieldName::as_str));
    println!("{}", header.join("\t"));

    for (i, m) in matches.iter().enumerate() {
        let mut row = vec![
            (i + 1).to_string(),
            m.key().to_string(),
            m.distance.to_string(),
            format!("{:.4}", m.accuracy),
            m.longest_part().to_string(),
            m.contains_false_friend().to_string(),
            annotate(&m.assembly),
        ];
        row.extend(m.entry.values(fields).into_iter().map(str::to_string));
        println!("{}", row.join("\t"));
    }
}
