// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use magmerge::app_config::{self, Config, IssueOrder};
use magmerge::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for IssueOrder to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliIssueOrder {
    Filename,
    Date,
}

impl From<CliIssueOrder> for IssueOrder {
    fn from(cli_order: CliIssueOrder) -> Self {
        match cli_order {
            CliIssueOrder::Filename => IssueOrder::Filename,
            CliIssueOrder::Date => IssueOrder::Date,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge converted issues into volumes (default command)
    Merge(MergeArgs),

    /// Generate shell completions for magmerge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Input directory with one subdirectory per magazine
    #[arg(value_name = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Output directory for merged volumes
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only merge this magazine directory
    #[arg(short = 'm', long)]
    magazine: Option<String>,

    /// Maximum words per volume
    #[arg(short = 'w', long)]
    max_words: Option<usize>,

    /// Ordering of issues within a magazine
    #[arg(long, value_enum)]
    order: Option<CliIssueOrder>,

    /// Number of magazines merged at once (1-64)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// magmerge - merge converted periodical issues into size-bounded volumes
#[derive(Parser, Debug)]
#[command(name = "magmerge")]
#[command(version)]
#[command(about = "Merge periodical issues into word-limited volumes")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "magmerge packs the converted issues of each magazine into merged volumes,
in publication order, keeping every volume under a word limit.

EXAMPLES:
    magmerge                                   # Merge converted_md/ into merged_magazines/
    magmerge ./md -o ./volumes                 # Custom input and output directories
    magmerge -m the_economist                  # Merge a single magazine
    magmerge -w 200000                         # Smaller volumes
    magmerge -j 4                              # Merge four magazines at once
    magmerge completions bash > magmerge.bash  # Generate bash completions

CONFIGURATION:
    Settings are read from conf.json when it exists. Command line options
    override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    merge: MergeArgs,
}

// @struct: Custom logger implementation, filtered by the global max level
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI colour for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("📚", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, colour) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the level is adjusted once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "magmerge", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Merge(args)) => run_merge(args).await,
        None => run_merge(cli.merge).await,
    }
}

async fn run_merge(options: MergeArgs) -> Result<()> {
    let config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;
    let summary = controller.run().await?;

    if summary.has_failures() {
        warn!("Some issues or volumes could not be processed, see {}", magmerge::app_controller::ISSUES_LOG_FILENAME);
    } else {
        info!("All done");
    }

    Ok(())
}

/// Load the configuration file and apply command line overrides
fn load_config(options: &MergeArgs) -> Result<Config> {
    let mut config = Config::load_or_default(&options.config_path)?;

    if let Some(input_dir) = &options.input_dir {
        config.input_dir = input_dir.clone();
    }

    if let Some(output) = &options.output {
        config.output_dir = output.clone();
    }

    if let Some(magazine) = &options.magazine {
        config.merge.magazine = Some(magazine.clone());
    }

    if let Some(max_words) = options.max_words {
        config.merge.max_words = max_words;
    }

    if let Some(order) = &options.order {
        config.merge.issue_order = order.clone().into();
    }

    if let Some(jobs) = options.jobs {
        config.merge.concurrent_lines = jobs;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}
