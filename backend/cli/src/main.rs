mod copy_cmd;
mod host;
mod pick_cmd;
mod probe_cmd;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;

use vidpick_config::{config_dir, config_file_path, load_and_prepare};
use vidpick_core::Platform;
use vidpick_plugin::MethodResponse;

use host::DesktopHost;

#[derive(Parser)]
#[command(name = "vidpick")]
#[command(about = "Drive the native video picker from a desktop shell")]
#[command(version)]
struct Cli {
    /// Config file (default: $VIDPICK_CONFIG_DIR/config.yaml or ~/.vidpick/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full pick cycle, answering the picker with a local file
    Pick {
        /// File the simulated user selects
        #[arg(long, conflicts_with = "cancel")]
        source: Option<PathBuf>,
        /// Dismiss the picker instead of selecting
        #[arg(long)]
        cancel: bool,
        /// Android API level of the simulated device
        #[arg(long, default_value_t = 34)]
        sdk: u32,
        /// Simulate iOS instead of Android
        #[arg(long, conflicts_with = "sdk")]
        ios: bool,
        /// Cache directory for accepted clips
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
    /// Copy a video to a directory without showing a picker
    Copy {
        #[arg(long)]
        uri: String,
        #[arg(long)]
        dest_dir: String,
        #[arg(long)]
        file_name: Option<String>,
    },
    /// Print duration and type of a local video
    Probe { file: PathBuf },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let path = cli.config.clone().unwrap_or_else(|| config_file_path(&config_dir()));
    let config = load_and_prepare(&path).await?;
    vidpick_logging::init_logger(config.log_dir().as_deref(), config.log_level());
    debug!(path = %path.display(), "Config ready");

    match cli.command {
        Commands::Pick { source, cancel, sdk, ios, cache_dir } => {
            let platform = if ios { Platform::Ios } else { Platform::Android { sdk_int: sdk } };
            let args = pick_cmd::PickArgs {
                source: if cancel { None } else { source },
                platform,
                cache_dir: cache_dir.unwrap_or_else(DesktopHost::default_cache_dir),
            };
            let response = pick_cmd::run(config, args).await?;
            emit(&response)
        }
        Commands::Copy { uri, dest_dir, file_name } => {
            let response = copy_cmd::run(config, uri, dest_dir, file_name).await?;
            emit(&response)
        }
        Commands::Probe { file } => {
            print_json(&probe_cmd::run(&config, &file).await?)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config => {
            print_json(&serde_json::to_value(&config)?)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Prints the channel response; error responses exit non-zero.
fn emit(response: &MethodResponse) -> Result<ExitCode> {
    print_json(&serde_json::to_value(response)?)?;
    Ok(if response.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
