//! Wrap every page of a PDF in the branded shell.
//!
//! Usage:
//!   pdf_shell --input ticket.pdf --icon icon.png --logo logo.png
//!   pdf_shell --input ticket.pdf --icon icon.png --logo logo.png \
//!       --title "CRUZEIRO" --bar-icon bar.png --config shell.json --output out.pdf -v
//!
//! Logging follows `RUST_LOG` (default `info`; `-v` raises it to `debug`).

use pdf_shell::{ShellConfig, ShellDocumentBuilder};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

const USAGE: &str = "usage: pdf_shell --input <pdf> --icon <image> --logo <image> \
[--title <text>] [--bar-icon <image>] [--config <json>] [--output <pdf>] [-v]";

struct CliArgs {
    input: PathBuf,
    icon: PathBuf,
    logo: PathBuf,
    title: Option<String>,
    bar_icon: Option<PathBuf>,
    config: Option<PathBuf>,
    output: PathBuf,
    verbose: bool,
}

impl CliArgs {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut input = None;
        let mut icon = None;
        let mut logo = None;
        let mut title = None;
        let mut bar_icon = None;
        let mut config = None;
        let mut output = None;
        let mut verbose = false;

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            let mut value = |name: &str| {
                iter.next()
                    .ok_or_else(|| format!("{} needs a value\n{}", name, USAGE))
            };
            match arg.as_str() {
                "--input" | "-i" => input = Some(PathBuf::from(value("--input")?)),
                "--icon" => icon = Some(PathBuf::from(value("--icon")?)),
                "--logo" => logo = Some(PathBuf::from(value("--logo")?)),
                "--title" => title = Some(value("--title")?),
                "--bar-icon" => bar_icon = Some(PathBuf::from(value("--bar-icon")?)),
                "--config" => config = Some(PathBuf::from(value("--config")?)),
                "--output" | "-o" => output = Some(PathBuf::from(value("--output")?)),
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => return Err(USAGE.to_string()),
                other => return Err(format!("unknown argument {}\n{}", other, USAGE)),
            }
        }

        let input: PathBuf = input.ok_or_else(|| format!("--input is required\n{}", USAGE))?;
        let output = output.unwrap_or_else(|| default_output(&input));
        Ok(Self {
            icon: icon.ok_or_else(|| format!("--icon is required\n{}", USAGE))?,
            logo: logo.ok_or_else(|| format!("--logo is required\n{}", USAGE))?,
            input,
            title,
            bar_icon,
            config,
            output,
            verbose,
        })
    }
}

/// `dir/name.pdf` -> `dir/name_shell.pdf`
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_shell.pdf", stem))
}

fn run(args: &CliArgs) -> pdf_shell::Result<()> {
    let mut config = match &args.config {
        Some(path) => ShellConfig::from_json_file(path)?,
        None => ShellConfig::default(),
    };
    if let Some(bar_icon) = &args.bar_icon {
        config = config.with_bar_icon(bar_icon);
    }

    let start = Instant::now();
    let builder = ShellDocumentBuilder::new(config);
    let output =
        builder.build_with_report(&args.input, &args.icon, &args.logo, args.title.as_deref())?;
    std::fs::write(&args.output, &output.bytes)?;

    for report in &output.pages {
        let skipped = report.skipped();
        if skipped.is_empty() {
            println!("page {}: complete", report.page_index + 1);
        } else {
            let list = skipped
                .iter()
                .map(|(name, reason)| format!("{} ({})", name, reason))
                .collect::<Vec<_>>()
                .join(", ");
            println!("page {}: skipped {}", report.page_index + 1, list);
        }
    }
    println!(
        "Wrote {} ({} pages, {} bytes) in {:?}",
        args.output.display(),
        output.pages.len(),
        output.bytes.len(),
        start.elapsed()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = match CliArgs::from_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        },
    };

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
