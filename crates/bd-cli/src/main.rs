//! Bundle Deal Finder CLI
//!
//! Inspect links and settings files with the same logic the extension runs.

use std::fs;

use clap::{Parser, Subcommand};
use serde::Serialize;

use bd_core::extract::extract_with_rule;
use bd_core::{canonical_product_url, is_bundle_deal_url, HighlightStyle, Settings, SettingsHub};

mod bench;
#[cfg(feature = "e2e")]
mod e2e;
mod settings_file;

use settings_file::JsonFileStore;

#[derive(Parser)]
#[command(name = "bd-cli")]
#[command(about = "Bundle Deal Finder link inspector and tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract product IDs from URLs
    Extract {
        /// URLs to inspect
        #[arg(required = true)]
        urls: Vec<String>,

        /// Show which rule matched
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check whether URLs are bundle-deal links
    Check {
        /// URLs to inspect
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Classify a file of URLs, one per line
    Batch {
        /// Input file
        #[arg(short, long)]
        input: String,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show or edit a settings file
    Settings {
        /// Settings file
        #[arg(short, long, default_value = "settings.json")]
        file: String,

        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Time classification and extraction over a built-in URL corpus
    Bench {
        #[arg(long, default_value_t = 1000)]
        iterations: usize,

        #[arg(long, default_value_t = 1000)]
        warmup_ops: usize,
    },

    /// Run the extension in Firefox and check highlighting
    #[cfg(feature = "e2e")]
    E2e {
        #[arg(long, default_value = "http://localhost:4444")]
        geckodriver_url: String,

        /// Unpacked extension directory
        #[arg(long, default_value = "extension")]
        extension_path: String,

        /// Page the content script runs on
        #[arg(long, default_value = "https://www.aliexpress.com/")]
        page_url: String,

        #[arg(long)]
        headless: bool,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the settings, backfilling missing keys
    Show,

    /// Change individual settings
    Set {
        #[arg(long)]
        enabled: Option<bool>,

        #[arg(long)]
        color: Option<String>,

        /// border, background, outline or underline
        #[arg(long, value_parser = parse_style)]
        style: Option<HighlightStyle>,

        #[arg(long)]
        auto_redirect: Option<bool>,
    },

    /// Overwrite with defaults
    Reset,
}

fn parse_style(s: &str) -> Result<HighlightStyle, String> {
    s.parse().map_err(|_| {
        let names: Vec<&str> = HighlightStyle::ALL.iter().map(|style| style.as_str()).collect();
        format!("unknown style '{}', expected one of: {}", s, names.join(", "))
    })
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract { urls, verbose } => cmd_extract(&urls, verbose),
        Commands::Check { urls } => cmd_check(&urls),
        Commands::Batch { input, json } => cmd_batch(&input, json),
        Commands::Settings { file, action } => cmd_settings(&file, action),
        Commands::Bench { iterations, warmup_ops } => bench::run(bench::BenchOptions { iterations, warmup_ops }),
        #[cfg(feature = "e2e")]
        Commands::E2e {
            geckodriver_url,
            extension_path,
            page_url,
            headless,
        } => e2e::run_e2e(e2e::E2eOptions {
            geckodriver_url,
            extension_path,
            page_url,
            headless,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct LinkReport {
    url: String,
    bundle_deal: bool,
    product_id: Option<String>,
    product_url: Option<String>,
}

impl LinkReport {
    fn inspect(url: &str) -> Self {
        let product_id = extract_with_rule(Some(url)).map(|e| e.id);
        Self {
            url: url.to_string(),
            bundle_deal: is_bundle_deal_url(Some(url)),
            product_url: product_id.as_deref().map(canonical_product_url),
            product_id,
        }
    }
}

fn cmd_extract(urls: &[String], verbose: bool) -> Result<(), String> {
    for url in urls {
        match extract_with_rule(Some(url)) {
            Some(extraction) if verbose => println!(
                "{}\t{}\t{:?}",
                extraction.id,
                canonical_product_url(&extraction.id),
                extraction.rule
            ),
            Some(extraction) => println!("{}\t{}", extraction.id, canonical_product_url(&extraction.id)),
            None => println!("-\t{}", url),
        }
    }
    Ok(())
}

fn cmd_check(urls: &[String]) -> Result<(), String> {
    for url in urls {
        let verdict = if is_bundle_deal_url(Some(url)) { "bundle" } else { "-" };
        println!("{}\t{}", verdict, url);
    }
    Ok(())
}

fn read_urls(input: &str) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(input)
        .map_err(|e| format!("Failed to read '{}': {}", input, e))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn cmd_batch(input: &str, json: bool) -> Result<(), String> {
    let reports: Vec<LinkReport> = read_urls(input)?.iter().map(|url| LinkReport::inspect(url)).collect();

    if json {
        let out = serde_json::to_string_pretty(&reports)
            .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
        println!("{}", out);
        return Ok(());
    }

    let bundles = reports.iter().filter(|r| r.bundle_deal).count();
    let with_id = reports.iter().filter(|r| r.product_id.is_some()).count();
    for report in &reports {
        println!(
            "{:<6}  {:<16}  {}",
            if report.bundle_deal { "bundle" } else { "-" },
            report.product_id.as_deref().unwrap_or("-"),
            report.url
        );
    }
    println!();
    println!("URLs:     {}", reports.len());
    println!("Bundles:  {}", bundles);
    println!("With ID:  {}", with_id);

    Ok(())
}

fn print_settings(settings: &Settings) -> Result<(), String> {
    let out = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
    println!("{}", out);
    Ok(())
}

fn cmd_settings(file: &str, action: SettingsAction) -> Result<(), String> {
    let mut hub = SettingsHub::open(JsonFileStore::new(file))
        .map_err(|e| format!("Failed to open '{}': {}", file, e))?;

    match action {
        SettingsAction::Show => {}
        SettingsAction::Set {
            enabled,
            color,
            style,
            auto_redirect,
        } => {
            let changes = hub
                .update(|settings| {
                    if let Some(enabled) = enabled {
                        settings.highlight_enabled = enabled;
                    }
                    if let Some(color) = color {
                        settings.highlight_color = color;
                    }
                    if let Some(style) = style {
                        settings.highlight_style = style;
                    }
                    if let Some(auto_redirect) = auto_redirect {
                        settings.auto_redirect_enabled = auto_redirect;
                    }
                })
                .map_err(|e| e.to_string())?;
            eprintln!("Updated {} key(s) in '{}'", changes.keys.bits().count_ones(), hub.store().path().display());
        }
        SettingsAction::Reset => {
            hub.reset().map_err(|e| e.to_string())?;
            eprintln!("Reset '{}' to defaults", hub.store().path().display());
        }
    }

    print_settings(hub.current())
}
