use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use source_patcher::config::{load_or_default, render_toml, PatcherConfig};
use source_patcher::patcher::join_rules;
use source_patcher::{FileOutcome, Patcher, RuleId, RunSummary};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the project root.
const ROOT_ENV: &str = "SOURCE_PATCHER_ROOT";

#[derive(Parser)]
#[command(name = "source-patcher")]
#[command(about = "Regex-driven lint fixer for front-end source files", long_about = None)]
#[command(version)]
struct Cli {
    /// Log every rule that rewrites a file (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply rewrite rules to the configured files
    Apply {
        /// Project root the file list is relative to
        #[arg(short, long, env = ROOT_ENV)]
        root: Option<PathBuf>,

        /// Config file (defaults to ./source-patcher.toml, then built-in data)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Patch every source file under the root instead of the file list
        #[arg(long)]
        all: bool,

        /// Dry run - show what would be changed without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Report files that would change, without writing; exits 1 if any would
    Check {
        /// Project root the file list is relative to
        #[arg(short, long, env = ROOT_ENV)]
        root: Option<PathBuf>,

        /// Config file (defaults to ./source-patcher.toml, then built-in data)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Check every source file under the root instead of the file list
        #[arg(long)]
        all: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List rewrite rules in application order
    Rules,

    /// Print the built-in configuration as TOML
    DefaultConfig,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Apply {
            root,
            config,
            all,
            dry_run,
            diff,
        } => cmd_apply(root, config, all, dry_run, diff),

        Commands::Check {
            root,
            config,
            all,
            json,
        } => cmd_check(root, config, all, json),

        Commands::Rules => cmd_rules(),

        Commands::DefaultConfig => {
            print!("{}", render_toml(&PatcherConfig::default()));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the project root.
///
/// Priority order:
/// 1. Explicit --root flag, or SOURCE_PATCHER_ROOT (filled in by clap)
/// 2. `root` from the config file
/// 3. Current directory
fn resolve_root(cli_root: Option<PathBuf>, config: &PatcherConfig) -> Result<PathBuf> {
    if let Some(path) = cli_root {
        return Ok(path);
    }

    if let Some(root) = &config.root {
        return Ok(PathBuf::from(root));
    }

    env::current_dir().context("could not determine current directory")
}

/// Load config, build the patcher and pick the target list.
///
/// `quiet` keeps the config/root banner off stdout.
fn prepare(
    root: Option<PathBuf>,
    config_path: Option<PathBuf>,
    all: bool,
    quiet: bool,
) -> Result<(Patcher, Vec<String>)> {
    let cwd = env::current_dir().context("could not determine current directory")?;
    let (config, source) = load_or_default(config_path.as_deref(), &cwd)?;
    let root = resolve_root(root, &config)?;

    let patcher = Patcher::new(&config, &root)
        .with_context(|| format!("cannot patch under {}", root.display()))?;

    if !quiet {
        match &source {
            Some(path) => println!("Config: {}", path.display()),
            None => println!("Config: {}", "built-in defaults".dimmed()),
        }
        println!("Root: {}", patcher.root().display());
    }

    let files = if all {
        patcher.discover_files()?
    } else {
        config.files.clone()
    };
    Ok((patcher, files))
}

/// Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => continue,
        };
        print!("{}", sign);
        if change.missing_newline() {
            println!();
        }
    }
}

fn print_report(file: &str, outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Fixed { rules, .. } => {
            println!(
                "{} Fixed {} {}",
                "✓".green(),
                file,
                format!("({})", join_rules(rules)).dimmed()
            );
        }
        FileOutcome::WouldFix { rules } => {
            println!(
                "{} Would fix {} {}",
                "✓".green(),
                file,
                format!("({})", join_rules(rules)).dimmed()
            );
        }
        FileOutcome::Unchanged => {
            println!("{} No changes needed for {}", "-".dimmed(), file);
        }
        FileOutcome::NotFound => {
            println!("{} File not found: {}", "✗".yellow(), file);
        }
        FileOutcome::Failed { reason } => {
            eprintln!("{} Error processing {}: {}", "✗".red(), file, reason);
        }
    }
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    println!();
    println!("{}", "Summary:".bold());
    let label = if dry_run { "would be fixed" } else { "fixed" };
    println!("  {} {}", format!("{}", summary.changed()).green(), label);
    println!("  {} unchanged", summary.unchanged());
    println!("  {} not found", format!("{}", summary.not_found()).yellow());
    println!("  {} failed", format!("{}", summary.failed()).red());
}

fn cmd_apply(
    root: Option<PathBuf>,
    config: Option<PathBuf>,
    all: bool,
    dry_run: bool,
    show_diff: bool,
) -> Result<ExitCode> {
    let (patcher, files) = prepare(root, config, all, false)?;
    let patcher = patcher.with_dry_run(dry_run);

    if dry_run {
        println!("{}", "[DRY RUN - showing what would be applied]".cyan());
    }
    println!();

    let summary = patcher.run(&files);

    for report in &summary.reports {
        print_report(&report.file, &report.outcome);
        if show_diff {
            if let Some((before, after)) = &report.change {
                display_diff(Path::new(&report.file), before, after);
            }
        }
    }

    print_summary(&summary, dry_run);

    // Per-file failures are reported above; the run itself succeeded.
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(
    root: Option<PathBuf>,
    config: Option<PathBuf>,
    all: bool,
    json: bool,
) -> Result<ExitCode> {
    let (patcher, files) = prepare(root, config, all, json)?;
    let summary = patcher.with_dry_run(true).run(&files);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!();
        for report in &summary.reports {
            if report.outcome != FileOutcome::Unchanged {
                print_report(&report.file, &report.outcome);
            }
        }
        print_summary(&summary, true);
    }

    if summary.changed() > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn cmd_rules() -> Result<ExitCode> {
    println!("{}", "Rewrite rules (application order):".bold());
    for rule in RuleId::ALL {
        println!("  {:<16} {}", rule.as_str().cyan(), rule.description());
    }
    Ok(ExitCode::SUCCESS)
}
