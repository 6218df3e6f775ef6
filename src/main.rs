use colored::*;
use env_logger::{Builder, Env, Target};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use typeahead::cli::Cli;
use typeahead::{
    CatalogProvider, Config, Item, Parser, Result as TypeaheadResult, SearchEngine, SearchState,
    SearchStatus, TypeaheadError,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> TypeaheadResult<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable config file: {e:#}");
            Config::default()
        }),
    };
    cli.apply(&mut config);
    config.validate()?;

    if let Some(path) = &cli.write_config {
        config.save(path)?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let provider = match &config.provider.catalog {
        Some(path) => CatalogProvider::from_path(path)?,
        None => CatalogProvider::sample(),
    }
    .with_latency(Duration::from_millis(config.provider.latency_ms));
    info!("Serving {} products", provider.len());

    let engine = SearchEngine::new(config.engine.clone())?;
    let mut handle = engine.start(Arc::new(provider))?;
    let renderer = tokio::spawn(render_states(handle.subscribe()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        handle.set_query(line)?;
    }

    let final_state = handle.settled().await?;
    debug!(
        "Input closed with status {} for {:?}",
        final_state.status, final_state.query
    );
    handle.shutdown().await?;
    renderer
        .await
        .map_err(|e| TypeaheadError::Other(e.to_string()))?;

    if cli.metrics {
        print!("{}", engine.metrics().gather());
    }
    Ok(())
}

fn setup_logging(cli: &Cli) -> TypeaheadResult<()> {
    let default_level = if cli.verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                fs::create_dir_all(parent_dir).map_err(TypeaheadError::Io)?;
            }
        }
        let log_file = fs::File::create(log_path).map_err(TypeaheadError::Io)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| TypeaheadError::Other(e.to_string()))?;
    Ok(())
}

async fn render_states(mut states: watch::Receiver<SearchState>) {
    let mut spinner: Option<ProgressBar> = None;
    let mut shown: Option<(SearchStatus, Vec<Item>)> = None;

    while states.changed().await.is_ok() {
        let state = states.borrow_and_update().clone();
        let snapshot = (state.status, state.results.clone());
        if shown.as_ref() == Some(&snapshot) {
            continue;
        }
        shown = Some(snapshot);
        render(&state, &mut spinner);
    }

    if let Some(pb) = spinner.take() {
        pb.finish_and_clear();
    }
}

fn render(state: &SearchState, spinner: &mut Option<ProgressBar>) {
    if state.status != SearchStatus::Loading {
        if let Some(pb) = spinner.take() {
            pb.finish_and_clear();
        }
    }

    match state.status {
        SearchStatus::Idle => {}
        SearchStatus::Loading => {
            if spinner.is_none() {
                let style = ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
                let pb = ProgressBar::new_spinner().with_style(style);
                pb.set_message("Searching...");
                pb.enable_steady_tick(Duration::from_millis(80));
                *spinner = Some(pb);
            }
        }
        SearchStatus::Success if state.query.trim().is_empty() => {}
        SearchStatus::Success if state.results.is_empty() => {
            println!(
                "{}",
                format!("No results for {:?}", state.query.trim()).yellow()
            );
        }
        SearchStatus::Success => {
            println!(
                "{}",
                format!(
                    "Found {} results for {:?}",
                    state.results.len(),
                    state.query.trim()
                )
                .green()
            );
            for item in &state.results {
                println!("  {} {}", format!("#{}", item.id).dimmed(), item);
            }
        }
        SearchStatus::Error => {
            println!("{}", "Something went wrong. Please try again.".red());
        }
    }
}
