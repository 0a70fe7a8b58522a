// taillight - main.rs
//
// CLI entry point. Handles:
// 1. Argument parsing
// 2. Config loading and logging initialisation
// 3. The three commands: list, view, follow
//
// Rendered log lines go to stdout; status messages and logging go to stderr
// so the output stays pipeable.

use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

use taillight::app::view::ViewState;
use taillight::app::watcher::FollowManager;
use taillight::core::classify::CategoryMatcher;
use taillight::core::discovery::{list_log_files, ScanConfig};
use taillight::core::model::{Category, CategoryFilter, FollowProgress, RenderedLine};
use taillight::core::render::render_lines;
use taillight::platform::config::{load_config, AppConfig, PlatformPaths};
use taillight::util::constants;

/// taillight - severity-aware log file viewer.
///
/// Lists, classifies, filters, searches, and follows plain-text log files.
#[derive(Parser, Debug)]
#[command(name = "taillight", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Disable coloured output.
    #[arg(long = "no-color", global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List candidate log files in a directory.
    List {
        /// The watched directory.
        dir: PathBuf,
    },

    /// Render a log file with per-line classification.
    View {
        /// The log file to render.
        file: PathBuf,

        /// Highlight only this category (error, warning, security, info,
        /// debug, unclassified); other lines stay visible unhighlighted.
        #[arg(short = 'f', long = "filter", value_parser = parse_filter)]
        filter: Option<CategoryFilter>,

        /// Highlight every case-insensitive occurrence of this term.
        #[arg(short = 's', long = "search")]
        search: Option<String>,
    },

    /// Render a log file and re-render whenever it changes on disk.
    Follow {
        /// The log file to follow.
        file: PathBuf,

        /// Poll interval in seconds (one of 1, 2, 5, 10, 30).
        #[arg(short = 'i', long = "interval")]
        interval: Option<u64>,

        /// Highlight only this category.
        #[arg(short = 'f', long = "filter", value_parser = parse_filter)]
        filter: Option<CategoryFilter>,

        /// Highlight every case-insensitive occurrence of this term.
        #[arg(short = 's', long = "search")]
        search: Option<String>,
    },
}

/// clap value parser for the --filter argument.
fn parse_filter(s: &str) -> Result<CategoryFilter, String> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(CategoryFilter::All);
    }
    Category::parse(s).map(CategoryFilter::Only).ok_or_else(|| {
        format!(
            "'{s}' is not a category (expected all, error, warning, security, \
             info, debug, or unclassified)"
        )
    })
}

fn main() {
    let cli = Cli::parse();

    // Config is loaded before logging so [logging] level can take effect;
    // tracing calls inside the loader are simply dropped pre-init.
    let paths = PlatformPaths::resolve();
    let (config, config_warnings) = load_config(&paths.config_dir);

    taillight::util::logging::init(cli.debug, config.log_level.as_deref());
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    tracing::debug!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "taillight starting"
    );

    let use_color = !cli.no_color && std::io::stdout().is_terminal();

    match cli.command {
        Command::List { dir } => cmd_list(&dir, &config),
        Command::View {
            file,
            filter,
            search,
        } => cmd_view(&file, filter, search, &config, use_color),
        Command::Follow {
            file,
            interval,
            filter,
            search,
        } => cmd_follow(&file, interval, filter, search, &config, use_color),
    }
}

// =============================================================================
// Commands
// =============================================================================

fn cmd_list(dir: &PathBuf, config: &AppConfig) {
    let scan_config = ScanConfig {
        include_patterns: config.include_patterns.clone(),
        exclude_patterns: config.exclude_patterns.clone(),
        max_depth: config.max_depth,
        max_files: config.max_files,
    };

    let (files, warnings) = list_log_files(dir, &scan_config);
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    if files.is_empty() {
        eprintln!("No log files found in '{}'.", dir.display());
        return;
    }

    for file in &files {
        let modified = file
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{modified:>19}  {:>10}  {}", file.size, file.name);
    }
}

fn cmd_view(
    file: &PathBuf,
    filter: Option<CategoryFilter>,
    search: Option<String>,
    config: &AppConfig,
    use_color: bool,
) {
    let mut state = ViewState::new(build_matcher(config));
    state.set_filter(filter.unwrap_or_default());
    state.set_search(search.as_deref().unwrap_or(""));
    state.select_file(file);

    eprintln!("{}", state.status_message());
    print_rendered(&state.rendered(), use_color);
}

fn cmd_follow(
    file: &PathBuf,
    interval: Option<u64>,
    filter: Option<CategoryFilter>,
    search: Option<String>,
    config: &AppConfig,
    use_color: bool,
) {
    let matcher = build_matcher(config);
    let filter = filter.unwrap_or_default();
    let search = search.unwrap_or_default();

    let interval_secs = match interval {
        Some(secs) if constants::FOLLOW_INTERVAL_CHOICES_SECS.contains(&secs) => secs,
        Some(secs) => {
            tracing::warn!(
                requested = secs,
                choices = ?constants::FOLLOW_INTERVAL_CHOICES_SECS,
                fallback = config.poll_interval_secs,
                "Unsupported poll interval"
            );
            config.poll_interval_secs
        }
        None => config.poll_interval_secs,
    };

    // Initial render.
    let mut state = ViewState::new(matcher.clone());
    state.set_filter(filter);
    state.set_search(&search);
    state.select_file(file);
    eprintln!("{}", state.status_message());
    print_rendered(&state.rendered(), use_color);
    eprintln!("Following '{}' every {interval_secs}s. Ctrl-C to stop.", file.display());

    let mut manager = FollowManager::new();
    manager.start_follow(file.clone(), interval_secs);

    while let Some(rx) = manager.progress_rx.as_ref() {
        match rx.recv() {
            Ok(FollowProgress::Started { .. }) => {}
            Ok(FollowProgress::Reloaded { lines, modified }) => {
                let stamp = modified
                    .map(|t| t.format("%H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string());
                eprintln!("--- reloaded ({} lines, modified {stamp}) ---", lines.len());
                let rendered = render_lines(&lines, &matcher, filter, &search);
                print_rendered(&rendered, use_color);
            }
            Ok(FollowProgress::Missing { path }) => {
                eprintln!("File '{}' no longer exists; waiting...", path.display());
            }
            Ok(FollowProgress::Stopped) | Err(_) => break,
        }
    }
}

/// Build the category matcher from config triggers, falling back to the
/// built-ins when a user-supplied pattern does not compile.
fn build_matcher(config: &AppConfig) -> CategoryMatcher {
    match CategoryMatcher::from_triggers(&config.triggers) {
        Ok(matcher) => matcher,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid [categories] triggers; using built-ins");
            CategoryMatcher::with_defaults()
        }
    }
}

// =============================================================================
// Terminal rendering
// =============================================================================

fn print_rendered(lines: &[RenderedLine], use_color: bool) {
    for line in lines {
        println!("[{:>4}] {}", line.category.short_label(), format_line(line, use_color));
    }
}

/// Assemble one line: category colour when highlighted, reverse video on
/// search spans, plain text otherwise.
fn format_line(line: &RenderedLine, use_color: bool) -> String {
    if !use_color {
        return line.text.clone();
    }

    let mut out = String::with_capacity(line.text.len() + 16);
    let mut cursor = 0;
    for &(start, end) in &line.search_spans {
        out.push_str(&paint(&line.text[cursor..start], line, false));
        out.push_str(&paint(&line.text[start..end], line, true));
        cursor = end;
    }
    out.push_str(&paint(&line.text[cursor..], line, false));
    out
}

fn paint(segment: &str, line: &RenderedLine, in_search_span: bool) -> String {
    use crossterm::style::Stylize;

    if segment.is_empty() {
        return String::new();
    }
    if !line.highlighted && !in_search_span {
        return segment.to_string();
    }

    let mut styled = crossterm::style::style(segment);
    if line.highlighted {
        styled = match line.category {
            Category::Error => styled.red(),
            Category::Warning => styled.yellow(),
            Category::Security => styled.magenta(),
            Category::Info => styled.green(),
            Category::Debug => styled.dark_grey(),
            Category::Unclassified => styled,
        };
    }
    if in_search_span {
        styled = styled.reverse();
    }
    styled.to_string()
}
