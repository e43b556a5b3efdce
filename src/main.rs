use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use mdshield::config::load_or_default;
use mdshield::front_matter::{front_matter_block, front_matter_body, parse_front_matter};
use mdshield::md::{resolve_positions, ElementKind};
use mdshield::workspace::{atomic_write, discover_markdown_files};
use mdshield::RuleSet;
use similar::{ChangeTag, TextDiff};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "mdshield")]
#[command(about = "Rewrite markdown prose without touching code, front matter or links", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the configured rules to markdown files
    Format {
        /// Files or directories (defaults to the current directory)
        paths: Vec<PathBuf>,

        /// Rule file (defaults to ./.mdshield.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Dry run - show what would be changed without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Exit non-zero if any file would be changed by the configured rules
    Check {
        /// Files or directories (defaults to the current directory)
        paths: Vec<PathBuf>,

        /// Rule file (defaults to ./.mdshield.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the byte positions of one element kind as JSON
    Positions {
        /// Markdown file to inspect
        file: PathBuf,

        /// Element kind (e.g. code, inlineCode, emphasis, footnoteDefinition)
        #[arg(short, long)]
        kind: ElementKind,
    },

    /// Print the decoded front matter as JSON
    FrontMatter {
        /// Markdown file to inspect
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("failed to install tracing subscriber")?;
    }

    match cli.command {
        Commands::Format {
            paths,
            config,
            dry_run,
            diff,
        } => cmd_format(paths, config, dry_run, diff),

        Commands::Check { paths, config } => cmd_check(paths, config),

        Commands::Positions { file, kind } => cmd_positions(&file, kind),

        Commands::FrontMatter { file } => cmd_front_matter(&file),
    }
}

/// Helper: Load rules and expand the requested paths into markdown files.
fn prepare(paths: Vec<PathBuf>, config: Option<PathBuf>) -> Result<(RuleSet, Vec<PathBuf>)> {
    let cwd = env::current_dir().context("cannot determine current directory")?;
    let config = load_or_default(config.as_deref(), &cwd)?;

    if !config.has_rules() {
        eprintln!(
            "{}",
            "Warning: no rules enabled; add tables to .mdshield.toml".yellow()
        );
    }

    let rules = RuleSet::from_config(&config);
    let roots = if paths.is_empty() { vec![cwd] } else { paths };
    let files = discover_markdown_files(&roots, &config.files.extensions)?;
    Ok((rules, files))
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (formatted)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn cmd_format(
    paths: Vec<PathBuf>,
    config: Option<PathBuf>,
    dry_run: bool,
    show_diff: bool,
) -> Result<()> {
    let (rules, files) = prepare(paths, config)?;

    let mut total_changed = 0usize;
    let mut total_unchanged = 0usize;
    let mut total_failed = 0usize;

    for file in &files {
        let original = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;

        let outcome = match rules.apply(&original) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                total_failed += 1;
                continue;
            }
        };

        if !outcome.changed {
            total_unchanged += 1;
            continue;
        }

        total_changed += 1;
        if show_diff {
            display_diff(file, &original, &outcome.text);
        }

        if dry_run {
            println!("{} {}: would be formatted", "~".yellow(), file.display());
        } else {
            atomic_write(file, outcome.text.as_bytes())
                .with_context(|| format!("failed to write {}", file.display()))?;
            println!("{} {}: formatted", "✓".green(), file.display());
        }
    }

    println!("\n{}", "Summary:".bold());
    let changed_label = if dry_run { "would change" } else { "formatted" };
    println!("  {} {}", format!("{}", total_changed).green(), changed_label);
    println!("  {} unchanged", format!("{}", total_unchanged).cyan());
    println!("  {} failed", format!("{}", total_failed).red());

    if total_failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_check(paths: Vec<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let (rules, files) = prepare(paths, config)?;

    let mut dirty = Vec::new();
    for file in &files {
        let original = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        match rules.apply(&original) {
            Ok(outcome) if outcome.changed => dirty.push(file.clone()),
            Ok(_) => {}
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                dirty.push(file.clone());
            }
        }
    }

    if dirty.is_empty() {
        println!("{} {} file(s) already formatted", "✓".green(), files.len());
        return Ok(());
    }

    for file in &dirty {
        println!("{} {}", "✗".red(), file.display());
    }
    eprintln!(
        "{}",
        format!("{} file(s) need formatting", dirty.len()).red()
    );
    std::process::exit(1);
}

fn cmd_positions(file: &Path, kind: ElementKind) -> Result<()> {
    let text =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let positions = resolve_positions(&text, kind);
    println!("{}", serde_json::to_string_pretty(&positions)?);
    Ok(())
}

fn cmd_front_matter(file: &Path) -> Result<()> {
    let text =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let Some(block) = front_matter_block(&text) else {
        anyhow::bail!("{} has no front matter", file.display());
    };
    let mapping = parse_front_matter(front_matter_body(block))
        .with_context(|| format!("invalid front matter in {}", file.display()))?;
    println!("{}", serde_json::to_string_pretty(&mapping)?);
    Ok(())
}
