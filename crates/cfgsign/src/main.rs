#![forbid(unsafe_code)]

//! cfgsign CLI — sign a run binary and record the signature in its config.

use cfgsign::config::{sign_config, SignContext, SignOutcome};
use cfgsign::core::{layout, Error};
use cfgsign::signer::ExternalSigner;
use clap::builder::NonEmptyStringValueParser;
use clap::error::ErrorKind;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cfgsign",
    about = "Sign a run binary and record its signature in <RUN_DIR>/genode/config",
    version
)]
struct Cli {
    /// Binary to sign, as named by a <start> declaration or its <binary> child
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    binary_name: String,

    /// Run directory containing genode/config and the binary
    run_dir: PathBuf,

    /// Signer program, run as `<signer> <binary> <key>`
    #[arg(long, default_value = layout::DEFAULT_SIGNER)]
    signer: PathBuf,

    /// Private key passed to the signer
    #[arg(short = 'k', long, default_value = layout::DEFAULT_KEY)]
    key: PathBuf,

    /// Fail when no declaration names the binary
    #[arg(long)]
    strict: bool,

    /// Print the updated config to stdout instead of writing it
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Log filter (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                process::exit(1);
            }
        },
    };

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = cmd_sign(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn cmd_sign(cli: Cli) -> Result<(), Error> {
    tracing::info!(
        binary = %cli.binary_name,
        run_dir = %cli.run_dir.display(),
        signer = %cli.signer.display(),
        key = %cli.key.display(),
        "arguments"
    );

    let mut ctx = SignContext::new(Box::new(ExternalSigner::new(cli.signer))).with_key(cli.key);
    ctx.strict = cli.strict;
    ctx.dry_run = cli.dry_run;

    match sign_config(&ctx, &cli.binary_name, &cli.run_dir)? {
        SignOutcome::Signed {
            document,
            written: false,
            ..
        } => std::io::stdout().write_all(document.text().as_bytes())?,
        SignOutcome::Signed { .. } | SignOutcome::NoMatch => {}
    }
    Ok(())
}
