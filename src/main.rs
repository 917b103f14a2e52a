use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;
use cli_style::{
    get_styles, print_empty_list, print_error, print_key_value, print_key_value_highlight,
    print_section_footer, print_section_header, print_success, print_warning, TableBuilder,
};

use song_tagger::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_CALL_DELAY_MS, DEFAULT_MODEL, DEFAULT_OLLAMA_URL,
    DEFAULT_TIMEOUT_SEC,
};
use song_tagger::pipeline::{playlist_plan, BatchRunner, RepairRunner};
use song_tagger::{Classifier, Dataset, FixedDelayPacer, InferenceBackend, OllamaClient};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(
    styles = get_styles(),
    version = concat!(env!("CARGO_PKG_VERSION"), "-", env!("GIT_HASH")),
    about = "Tag a music library with language and emotion labels using a local LLM"
)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, global = true, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Base URL of the Ollama server.
    #[clap(long, global = true, default_value = DEFAULT_OLLAMA_URL)]
    pub ollama_url: String,

    /// Model used for classification.
    #[clap(long, global = true, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Timeout in seconds for one inference call (connect + generation).
    #[clap(long, global = true, default_value_t = DEFAULT_TIMEOUT_SEC)]
    pub timeout_sec: u64,

    /// Delay in milliseconds after every inference call.
    #[clap(long, global = true, default_value_t = DEFAULT_CALL_DELAY_MS)]
    pub call_delay_ms: u64,

    /// Sampling temperature. The server default applies when unset.
    #[clap(long, global = true)]
    pub temperature: Option<f32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classifies every song of INPUT and writes the labelled table to OUTPUT,
    /// one row at a time.
    Classify {
        #[clap(value_parser = parse_path)]
        input: PathBuf,

        #[clap(value_parser = parse_path)]
        output: PathBuf,

        /// Keep the rows already in OUTPUT and continue after them.
        #[clap(long)]
        resume: bool,
    },

    /// Re-classifies rows of a labelled table whose language or emotion is
    /// missing, and writes the completed table to OUTPUT.
    Repair {
        #[clap(value_parser = parse_path)]
        input: PathBuf,

        #[clap(value_parser = parse_path)]
        output: PathBuf,
    },

    /// Checks that the inference service is reachable.
    Check,

    /// Groups a labelled table into `{language}_{emotion}` playlists.
    Playlists {
        #[clap(value_parser = parse_path)]
        input: PathBuf,

        /// Write the plan as JSON to this file.
        #[clap(long, value_parser = parse_path)]
        output: Option<PathBuf>,
    },
}

impl CliArgs {
    fn cli_config(&self) -> CliConfig {
        CliConfig {
            ollama_url: self.ollama_url.clone(),
            model: self.model.clone(),
            timeout_sec: self.timeout_sec,
            call_delay_ms: self.call_delay_ms,
            temperature: self.temperature,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.cli_config(), file_config)?;

    match cli_args.command {
        Command::Classify {
            input,
            output,
            resume,
        } => classify(&config, &input, &output, resume),
        Command::Repair { input, output } => repair(&config, &input, &output),
        Command::Check => check(&config),
        Command::Playlists { input, output } => playlists(&config, &input, output.as_deref()),
    }
}

fn build_client(config: &AppConfig) -> Result<OllamaClient> {
    let client = OllamaClient::new(&config.ollama_url, &config.model, config.timeout)
        .context("Failed to create inference client")?;
    Ok(client.with_temperature(config.temperature))
}

fn build_classifier(config: &AppConfig) -> Result<Classifier> {
    info!(
        "Using model {} at {} (timeout {:?}, delay {:?})",
        config.model, config.ollama_url, config.timeout, config.call_delay
    );
    Ok(Classifier::new(
        Arc::new(build_client(config)?),
        Arc::new(FixedDelayPacer::new(config.call_delay)),
    ))
}

fn load_dataset(config: &AppConfig, path: &Path) -> Result<Dataset> {
    Dataset::read(path, &config.columns).with_context(|| format!("Cannot use input {:?}", path))
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn classify(config: &AppConfig, input: &Path, output: &Path, resume: bool) -> Result<()> {
    if same_file(input, output) {
        bail!("Output must be a different file than the input");
    }
    let dataset = load_dataset(config, input)?;
    let classifier = build_classifier(config)?;

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = Arc::clone(&cancelled);
        ctrlc::set_handler(move || {
            warn!("Interrupt received, stopping after the current song");
            cancelled.store(true, Ordering::SeqCst);
        })
        .context("Failed to install interrupt handler")?;
    }

    let summary = BatchRunner::new(&classifier)
        .with_cancellation(cancelled)
        .classify_all(&dataset, output, resume)?;

    print_section_header("Classification");
    print_key_value("Output", &output.display().to_string());
    print_key_value("Songs", &summary.total.to_string());
    if summary.skipped > 0 {
        print_key_value("Already done", &summary.skipped.to_string());
    }
    print_key_value_highlight("Classified", &summary.processed.to_string());
    print_key_value("With unknown labels", &summary.unknown.to_string());
    print_section_footer();

    if summary.cancelled {
        print_warning("Run interrupted. Continue later with --resume.");
    } else if summary.unknown > 0 {
        print_warning(&format!(
            "{} songs have unknown labels. Run `repair` to retry them.",
            summary.unknown
        ));
    } else {
        print_success("All songs classified");
    }
    Ok(())
}

fn repair(config: &AppConfig, input: &Path, output: &Path) -> Result<()> {
    if same_file(input, output) {
        bail!("Output must be a different file than the input");
    }
    let dataset = load_dataset(config, input)?;
    let classifier = build_classifier(config)?;

    let summary = RepairRunner::new(&classifier).fix_all(&dataset, output)?;

    print_section_header("Repair");
    print_key_value("Output", &output.display().to_string());
    print_key_value("Songs", &summary.total.to_string());
    print_key_value("Unchanged", &summary.passed_through.to_string());
    print_key_value_highlight("Repaired", &summary.repaired.to_string());
    print_key_value("Still unknown", &summary.still_unknown.to_string());
    print_section_footer();

    if summary.still_unknown > 0 {
        print_warning(&format!(
            "{} songs are still missing labels",
            summary.still_unknown
        ));
    } else {
        print_success("All labels complete");
    }
    Ok(())
}

fn check(config: &AppConfig) -> Result<()> {
    let client = build_client(config)?;
    client
        .health_check()
        .with_context(|| format!("Inference service at {} is not available", config.ollama_url))?;
    print_success(&format!(
        "Inference service at {} is reachable (model {})",
        config.ollama_url,
        client.model()
    ));
    Ok(())
}

fn playlists(config: &AppConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    let dataset = load_dataset(config, input)?;
    let plan = playlist_plan(&dataset, &config.columns.track_id);

    print_section_header("Playlists");
    if plan.buckets.is_empty() {
        print_empty_list("No labelled songs");
    } else {
        let mut table = TableBuilder::new(vec!["Playlist", "Songs", "With ID"]);
        let rows: Vec<(String, String, String)> = plan
            .buckets
            .iter()
            .map(|(name, bucket)| {
                (
                    name.clone(),
                    bucket.songs.to_string(),
                    bucket.track_ids.len().to_string(),
                )
            })
            .collect();
        for (name, songs, ids) in &rows {
            table.add_row(vec![name.as_str(), songs.as_str(), ids.as_str()]);
        }
        table.print();
    }
    print_key_value("Unlabelled", &plan.unlabelled.to_string());
    print_section_footer();

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&plan.to_json())?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
        print_success(&format!("Plan written to {}", path.display()));
    }
    Ok(())
}
