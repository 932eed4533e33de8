use std::collections::BTreeMap;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use quotebook_core::config::{QuotebookConfig, CONFIG_FILE_NAME};
use quotebook_core::remote::HttpRemoteCollection;
use quotebook_core::services::QuoteDisplay;
use quotebook_core::sync::{SyncEngine, SyncEvent, SyncListener, SyncReport};
use quotebook_core::util::normalize_text_option;
use quotebook_core::{CategoryFilter, Quote, QuoteService};
use serde::Serialize;

use crate::error::CliError;

const APP_DIR_NAME: &str = "quotebook";
const LIST_PREVIEW_CHARS: usize = 72;

#[derive(Debug, Serialize)]
pub struct QuoteListItem {
    pub text: String,
    pub category: String,
}

impl From<&Quote> for QuoteListItem {
    fn from(quote: &Quote) -> Self {
        Self {
            text: quote.text().to_string(),
            category: quote.category().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryItem {
    pub name: String,
    pub count: usize,
    pub selected: bool,
}

/// Prints sync notifications to the terminal.
pub struct TerminalNotifier;

impl SyncListener for TerminalNotifier {
    fn on_sync_event(&self, event: &SyncEvent) {
        match event {
            SyncEvent::Succeeded {
                message,
                quote_count,
            } => println!("{message} ({quote_count} quotes)"),
            SyncEvent::Failed { message } => eprintln!("{message}"),
        }
    }
}

/// Load the config file and environment, then apply the `--remote-url` flag.
pub fn load_config(cli_remote_url: Option<String>) -> Result<QuotebookConfig, CliError> {
    let config = match default_config_path() {
        Some(path) => QuotebookConfig::load_from_path(&path)?,
        None => QuotebookConfig::default(),
    };
    let mut config = config.with_env_overrides()?;
    if let Some(remote_url) = normalize_text_option(cli_remote_url) {
        config.remote_url = Some(remote_url);
    }
    Ok(config)
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

pub fn resolve_data_dir(cli_data_dir: Option<PathBuf>, config: &QuotebookConfig) -> PathBuf {
    cli_data_dir
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(default_data_dir)
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(".").join(APP_DIR_NAME),
        |dir| dir.join(APP_DIR_NAME),
    )
}

pub fn open_service(data_dir: &Path) -> Result<QuoteService, CliError> {
    std::fs::create_dir_all(data_dir)?;
    Ok(QuoteService::open_data_dir(data_dir)?)
}

pub fn build_sync_engine(
    service: QuoteService,
    config: &QuotebookConfig,
) -> Result<SyncEngine<HttpRemoteCollection>, CliError> {
    let remote = HttpRemoteCollection::with_timeout(config.remote_url()?, config.remote_timeout())?;
    tracing::debug!("Syncing against {}", remote.endpoint());
    Ok(SyncEngine::new(service, remote, TerminalNotifier))
}

/// Join the positional words, falling back to piped stdin when they are blank.
pub fn resolve_quote_text(text_parts: &[String]) -> Result<String, CliError> {
    let joined = text_parts.join(" ");
    if !joined.trim().is_empty() {
        return Ok(joined);
    }

    Ok(read_piped_stdin()?.unwrap_or_default())
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_text_option(Some(buffer)))
}

pub fn quote_preview(quote: &Quote, max_chars: usize) -> String {
    let collapsed = quote.text().split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_quote_lines(quotes: &[Quote]) -> Vec<String> {
    let width = quotes
        .iter()
        .map(|quote| quote.category().chars().count())
        .max()
        .unwrap_or(0);

    quotes
        .iter()
        .map(|quote| {
            format!(
                "{:<width$}  {}",
                quote.category(),
                quote_preview(quote, LIST_PREVIEW_CHARS)
            )
        })
        .collect()
}

/// Render a picked quote as text line then category line.
pub fn format_quote_display(display: &QuoteDisplay) -> String {
    match display {
        QuoteDisplay::Quote(quote) => format!("{}\n  - {}", quote.text(), quote.category()),
        QuoteDisplay::Placeholder(message) => message.clone(),
    }
}

pub fn category_items(quotes: &[Quote], selected: &CategoryFilter) -> Vec<CategoryItem> {
    let mut counts = BTreeMap::<&str, usize>::new();
    for quote in quotes {
        *counts.entry(quote.category()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(name, count)| CategoryItem {
            name: name.to_string(),
            count,
            selected: selected.as_str() == name && !selected.is_all(),
        })
        .collect()
}

pub fn format_category_lines(items: &[CategoryItem], selected: &CategoryFilter) -> Vec<String> {
    let marker = |active: bool| if active { '*' } else { ' ' };
    let total = items.iter().map(|item| item.count).sum::<usize>();

    let mut lines = vec![format!("{} all ({total})", marker(selected.is_all()))];
    lines.extend(
        items
            .iter()
            .map(|item| format!("{} {} ({})", marker(item.selected), item.name, item.count)),
    );
    lines
}

pub fn format_sync_report(report: &SyncReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Pulled {} quotes at {}",
        report.pulled,
        format_sync_timestamp(report.finished_at)
    )];
    match &report.push_error {
        None => lines.push("Pushed local collection to server".to_string()),
        Some(error) => lines.push(format!("Push to server failed: {error}")),
    }
    lines
}

pub fn format_sync_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn is_stdio_path(path: &Path) -> bool {
    path.as_os_str() == "-"
}
