//! bcal - storage expression calculator
//!
//! One-shot commands run and exit. With no expression and no `-c`/`-f`,
//! an interactive prompt starts.

mod config;
mod logging;
mod render;
mod repl;

use std::process::ExitCode;

use anyhow::{bail, Context};
use bcal_engine::{parse_uint, GeometryRequest, Session};
use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug)]
#[clap(name = "bcal", version)]
#[clap(about = "Storage expression calculator")]
#[clap(after_help = "Units: B, KiB, MiB, GiB, TiB, kB, MB, GB, TB (case is ignored).\n\
                     Operands may be decimal, '0x' hex or '0b' binary.\n\
                     Geometry: -f c<C-H-S[-MH[-MS]]> or -f l<LBA[-MH[-MS]]>, \
                     MH defaults to 16 and MS to 63.")]
struct Args {
    /// Show non-negative integer N in binary, decimal and hex
    #[clap(short = 'c', value_name = "N", allow_hyphen_values = true)]
    convert: Option<String>,

    /// Convert CHS to LBA (c...) or LBA to CHS (l...)
    #[clap(short = 'f', value_name = "loc")]
    geometry: Option<String>,

    /// Sector size in bytes [default: 512]
    #[clap(short = 's', value_name = "bytes", allow_hyphen_values = true)]
    sector_size: Option<String>,

    /// Minimal output (decimal bytes only)
    #[clap(short = 'm')]
    minimal: bool,

    /// Enable debug logs
    #[clap(short = 'd')]
    debug: bool,

    /// Expression, or a value followed by its unit
    #[clap(value_name = "expr | N unit", num_args = 0..=2)]
    input: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    apply_flags(&mut config, &args)?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        sector_size = config.sector_size,
        minimal = config.minimal,
        "bcal starting"
    );

    let mut session = Session::new(config.sector_size)?;
    let mut operation = false;

    if let Some(value) = &args.convert {
        operation = true;
        let n = session.base_value(value)?;
        print!("{}", render::bases(n));
    }

    if let Some(loc) = &args.geometry {
        operation = true;
        match GeometryRequest::parse(loc)? {
            GeometryRequest::ChsToLba(params) => print!("{}", render::lba(params.to_lba()?)),
            GeometryRequest::LbaToChs(params) => print!("{}", render::chs(&params.to_chs()?)),
        }
    }

    let outcome = match args.input.as_slice() {
        [] if operation => return Ok(()),
        [] => return repl::run(&mut session, config.minimal),
        [expr] => session.evaluate(expr)?,
        [value, unit] => session.convert(value, Some(unit))?,
        _ => bail!("too many arguments"),
    };

    print!(
        "{}",
        render::outcome(&outcome, session.sector_size(), config.minimal)
    );
    Ok(())
}

/// Command-line flags take precedence over file and environment settings
fn apply_flags(config: &mut Config, args: &Args) -> anyhow::Result<()> {
    if let Some(size) = &args.sector_size {
        config.sector_size = parse_sector_size(size)?;
    }
    if args.minimal {
        config.minimal = true;
    }
    if args.debug {
        config.logging.level = "debug".to_string();
    }
    Ok(())
}

fn parse_sector_size(text: &str) -> anyhow::Result<u64> {
    let text = text.trim();
    if text.starts_with('-') {
        bail!("sector size must be positive");
    }
    let size = parse_uint(text).with_context(|| format!("invalid sector size '{text}'"))?;
    u64::try_from(size).with_context(|| format!("sector size '{text}' is too large"))
}
