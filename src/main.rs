mod cli;
mod commands;
mod installers;
mod libs;
mod logger;
mod package_managers;
mod schemas;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cli::type_enums::ToolKind;
use commands::{check, detect, install, list, version};
use libs::config_loading::load_settings;
use libs::paths::resolve_config_path;

#[derive(Parser)]
#[command(name = "dev")]
#[command(about = "Install developer tools with the right package manager for this machine", long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, global = true)]
    debug: bool,

    /// Path to config.yaml (defaults to ~/.dev-install/config.yaml)
    #[arg(long, global = true, env = "DEV_INSTALL_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a tool
    Install {
        /// compilers, jq, yq, go, pandoc, gitego, file, pngyu or chocolatey
        tool: ToolKind,
    },
    /// Show whether a tool is available and installed
    Check { tool: ToolKind },
    /// List every tool and its status on this machine
    List,
    /// Print the detected platform
    Detect {
        #[arg(long)]
        json: bool,
    },
    /// Print version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = || -> anyhow::Result<_> {
        let path = resolve_config_path(cli.config.as_deref());
        Ok(load_settings(&path)?)
    };

    match cli.command {
        Commands::Install { tool } => install::run(tool, settings()?),
        Commands::Check { tool } => check::run(tool, settings()?),
        Commands::List => list::run(settings()?),
        Commands::Detect { json } => detect::run(json),
        Commands::Version => {
            version::run();
            Ok(())
        }
    }
}
