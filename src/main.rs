use clap::{Parser, Subcommand};
use pngshuffle::cli::{
    default_output_path, show_info, shuffle_file, unshuffle_file, InfoOptions, ShuffleOptions,
};
use pngshuffle::Seed;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Version info from build.rs
const VERSION: &str = env!("PNGSHUFFLE_VERSION");
const BUILD: &str = env!("PNGSHUFFLE_BUILD");
const PROFILE: &str = env!("PNGSHUFFLE_PROFILE");
const GIT_HASH: &str = env!("PNGSHUFFLE_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| {
        format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH)
    })
}

#[derive(Parser)]
#[command(name = "pngshuffle")]
#[command(author, about = "Reversibly shuffle the chunks of a PNG file", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Log every chunk as it is parsed
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Shuffle the chunks between IHDR and IEND
    #[command(alias = "s")]
    Shuffle {
        /// Seed for a reproducible shuffle: an integer or any phrase
        #[arg(long, value_parser = parse_seed)]
        seed: Option<Seed>,

        /// Canonical PNG to shuffle
        input: PathBuf,

        /// Output file (defaults to <input>.shuffled.png)
        output: Option<PathBuf>,
    },

    /// Restore canonical chunk order from a shuffled PNG
    #[command(alias = "u")]
    Unshuffle {
        /// Shuffled PNG
        input: PathBuf,

        /// Output file (defaults to <input>.unshuffled.png)
        output: Option<PathBuf>,
    },

    /// List the chunks of a canonical or shuffled PNG
    #[command(alias = "i")]
    Info {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,

        /// PNG to inspect
        file: PathBuf,
    },
}

fn parse_seed(s: &str) -> Result<Seed, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "pngshuffle=debug" } else { "pngshuffle=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("pngshuffle {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if let Err(e) = Cli::command().print_help() {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    init_tracing(cli.verbose);

    let result = match command {
        Commands::Shuffle { seed, input, output } => {
            let output = output.unwrap_or_else(|| default_output_path(&input, "shuffled"));
            let options = ShuffleOptions { seed };
            shuffle_file(&input, &output, &options).map(|bytes| {
                println!("Shuffled {} bytes to {}", bytes, output.display());
            })
        }

        Commands::Unshuffle { input, output } => {
            let output = output.unwrap_or_else(|| default_output_path(&input, "unshuffled"));
            unshuffle_file(&input, &output).map(|bytes| {
                println!("Restored {} bytes to {}", bytes, output.display());
            })
        }

        Commands::Info { json, file } => {
            let options = InfoOptions { json };
            show_info(&file, &options).map(|info| print!("{}", info))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
