use std::path::PathBuf;

use clap::{Parser, Subcommand};

use fixture_env::commands::Command;
use fixture_env::commands::clean::Cleaner;
use fixture_env::commands::copy::Copier;
use fixture_env::commands::paths::PathsReport;
use fixture_env::commands::purge_tmp::TmpPurger;
use fixture_env::error::Result;
use fixture_env::logger;
use fixture_env::{EnvOptions, TestEnv};

#[derive(Parser)]
#[command(name = "fxenv")]
#[command(author, version, about = "Manage test fixture and output directories", long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project root (or its test directory). Defaults to the current directory.
    #[arg(short, long, global = true)]
    pub base: Option<PathBuf>,

    /// JSON options file (base_path, test_dir_name, fixture_dir, output_dir, tmp_prefix)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the resolved base, test, fixture and output directories
    Paths,

    /// Empty the output directory, or one subdirectory of it
    Clean {
        /// Subdirectory of output to clean. Cleans all of output when omitted.
        subdir: Option<PathBuf>,

        /// Delete the directory itself instead of emptying it
        #[arg(short, long)]
        remove: bool,

        /// Allow targets outside the project or the project root itself
        #[arg(long)]
        force: bool,
    },

    /// Delete every tmp- directory in output
    PurgeTmp,

    /// Copy a fixture into output
    Copy {
        /// Fixture path, relative to the fixture directory
        fixture: PathBuf,

        /// Destination, relative to output. Defaults to the fixture path.
        output: Option<PathBuf>,

        /// Copy into a fresh tmp- directory instead
        #[arg(short, long)]
        tmp: bool,
    },
}

fn build_env(cli: &Cli) -> Result<TestEnv> {
    let mut options = match &cli.config {
        Some(path) => EnvOptions::from_json_file(path)?,
        None => EnvOptions::new(),
    };

    if let Some(base) = &cli.base {
        options = options.with_base_path(base);
    } else if options.base_path.is_none() {
        options = options.with_base_path(std::env::current_dir()?);
    }

    TestEnv::new(options)
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    logger::init(cli.verbose, cli.quiet);

    let env = build_env(&cli)?;

    let command: Box<dyn Command> = match cli.command {
        Commands::Paths => Box::new(PathsReport::new(env)),
        Commands::Clean {
            subdir,
            remove,
            force,
        } => Box::new(Cleaner::new(env, subdir, remove, force, cli.quiet)),
        Commands::PurgeTmp => Box::new(TmpPurger::new(env, cli.quiet)),
        Commands::Copy {
            fixture,
            output,
            tmp,
        } => Box::new(Copier::new(env, fixture, output, tmp, cli.quiet)),
    };

    command.execute().await
}
