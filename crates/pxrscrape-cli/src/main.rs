use clap::error::ErrorKind;
use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use pxrscrape_build::{
    compare_with_recipe, locate_targets_file, Emitter, RecipeConfig, TargetMap,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`RUST_LOG` syntax).
const LOG_ENV: &str = "PXRSCRAPE_LOG";

#[derive(Parser)]
#[command(name = "pxrscrape")]
#[command(
    author,
    version,
    about = "Generate the OpenUSD recipe component block from pxrTargets.cmake"
)]
struct Cli {
    /// pxrTargets.cmake, or an OpenUSD build/install directory containing it
    path: PathBuf,

    /// Dump the scraped targets as JSON before the block
    #[arg(short, long)]
    verbose: bool,

    /// Recipe configuration (pxrscrape.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Check the block in an existing conanfile.py instead of printing it
    #[arg(long, value_name = "CONANFILE")]
    compare: Option<PathBuf>,
}

fn print_usage() {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "pxrscrape".to_string());
    println!("USAGE:\n\t{program} </path/to/pxrTargets.cmake> [-v]\n");
    println!(
        "pxrTargets.cmake can be found in the 'cmake' install folder after performing a standard build and install.\n"
    );
    println!(
        "On Linux, you can use this command to find it:\n\tfind /path/to/openusd -name \"pxrTargets.cmake\""
    );
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => {
            print_usage();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    init_tracing();

    let config = match &cli.config {
        Some(path) => RecipeConfig::from_file(path)?,
        None => RecipeConfig::default(),
    };

    let input = locate_targets_file(&cli.path)?;
    let targets = TargetMap::from_file(&input, &config)?;
    let block = Emitter::new(&config).emit(&targets)?;

    if let Some(recipe) = &cli.compare {
        compare_with_recipe(&block, recipe, &config.method)?;
        println!("{}: {} is up to date", recipe.display(), config.method);
        return Ok(());
    }

    let mut out = String::new();
    if cli.verbose {
        out.push_str(&targets.to_json_pretty()?);
        out.push('\n');
    }
    out.push_str(&block);

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &out)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), targets = targets.len(), "wrote recipe block");
        }
        None => print!("{out}"),
    }

    Ok(())
}
