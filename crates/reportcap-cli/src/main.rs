//! reportcap CLI - on-demand visual reports from dashboards
//!
//! Usage:
//!   reportcap init                        Write a default reportcap.toml
//!   reportcap capture --url <url>         Capture a report from a URL
//!   reportcap capture --source dashboard --object-id <id>
//!   reportcap instances list              List report instances
//!   reportcap instances show <id>         Show one report instance
//!   reportcap channels list               List notification channels
//!   reportcap channels test <id>          Send a test message to a channel

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use reportcap_capture::capture;
use reportcap_client::{BackendClient, NotificationsClient};
use reportcap_core::{
    CaptureConfig, CaptureRequest, ReportError, ReportFormat, ReportSource, ReportState,
};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "reportcap")]
#[command(author, version, about = "On-demand visual reports from dashboards")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding reportcap.toml (defaults to current directory)
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default reportcap.toml to the config directory
    Init,

    /// Capture a report
    Capture {
        /// Direct URL to capture (alternative to --source/--object-id)
        #[arg(long)]
        url: Option<String>,

        /// Report source type
        #[arg(short, long, value_enum)]
        source: Option<CliSource>,

        /// Saved object id of the source
        #[arg(long)]
        object_id: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: CliFormat,

        /// Viewport width in pixels
        #[arg(long, default_value = "1680")]
        width: u32,

        /// Viewport height in pixels
        #[arg(long, default_value = "900")]
        height: u32,

        /// Directory to write the artifact to (overrides config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Report instance id to transition in the backend store
        #[arg(long)]
        update_instance: Option<String>,
    },

    /// Report instance queries
    Instances {
        #[command(subcommand)]
        action: InstanceCommands,
    },

    /// Notification channel queries
    Channels {
        #[command(subcommand)]
        action: ChannelCommands,
    },
}

#[derive(Subcommand)]
enum InstanceCommands {
    /// List all report instances
    List,

    /// Show one report instance
    Show {
        /// Instance id
        id: String,
    },
}

#[derive(Subcommand)]
enum ChannelCommands {
    /// List notification channels
    List {
        /// Restrict to these channel ids
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
    },

    /// Send a test message to a channel
    Test {
        /// Channel id
        id: String,
    },
}

/// CLI-friendly source enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliSource {
    Dashboard,
    Visualization,
    Notebook,
    SavedSearch,
    Other,
}

impl From<CliSource> for ReportSource {
    fn from(s: CliSource) -> Self {
        match s {
            CliSource::Dashboard => ReportSource::Dashboard,
            CliSource::Visualization => ReportSource::Visualization,
            CliSource::Notebook => ReportSource::Notebook,
            CliSource::SavedSearch => ReportSource::SavedSearch,
            CliSource::Other => ReportSource::Other,
        }
    }
}

/// CLI-friendly format enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Pdf,
    Png,
}

impl From<CliFormat> for ReportFormat {
    fn from(f: CliFormat) -> Self {
        match f {
            CliFormat::Pdf => ReportFormat::Pdf,
            CliFormat::Png => ReportFormat::Png,
        }
    }
}

/// Map the error taxonomy to distinct process exit codes
fn exit_code(error: &ReportError) -> i32 {
    match error {
        ReportError::InvalidRequest(_) => 2,
        ReportError::Browser(_) | ReportError::Navigation(_) => 3,
        ReportError::ReadinessTimeout(_) => 4,
        ReportError::Encoding(_) => 5,
        ReportError::Storage(_) => 6,
        ReportError::Backend(_) | ReportError::Notification(_) => 7,
        _ => 1,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = CaptureConfig::load_or_default(&cli.config_dir)
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {}", e))?;

    let result = match cli.command {
        Commands::Init => cmd_init(&cli.config_dir),
        Commands::Capture {
            url,
            source,
            object_id,
            format,
            width,
            height,
            output_dir,
            update_instance,
        } => {
            cmd_capture(
                config,
                url,
                source,
                object_id,
                format,
                width,
                height,
                output_dir,
                update_instance,
            )
            .await
        }
        Commands::Instances { action } => cmd_instances(&config, action).await,
        Commands::Channels { action } => cmd_channels(&config, action).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }

    Ok(())
}

fn cmd_init(config_dir: &PathBuf) -> reportcap_core::Result<()> {
    CaptureConfig::write_default(config_dir)?;
    println!("Wrote {}", config_dir.join("reportcap.toml").display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_capture(
    mut config: CaptureConfig,
    url: Option<String>,
    source: Option<CliSource>,
    object_id: Option<String>,
    format: CliFormat,
    width: u32,
    height: u32,
    output_dir: Option<PathBuf>,
    update_instance: Option<String>,
) -> reportcap_core::Result<()> {
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }

    let request = CaptureRequest {
        source_url: url,
        source: source.map(ReportSource::from).unwrap_or_default(),
        object_id,
        format: format.into(),
        viewport_width: width,
        viewport_height: height,
    };

    let backend = update_instance
        .as_ref()
        .map(|_| BackendClient::new(config.base_url.clone()));

    let capture_result = capture(&request, &config).await;

    // best-effort state transition; the capture outcome is what counts
    if let (Some(id), Some(backend)) = (update_instance.as_ref(), backend.as_ref()) {
        let state = if capture_result.is_ok() {
            ReportState::Shared
        } else {
            ReportState::Error
        };
        if let Err(e) = backend.update_report_instance_status(id, state).await {
            warn!("Failed to update report instance {}: {}", id, e);
        }
    }

    let artifact = capture_result?;
    info!("Capture complete");
    println!(
        "{}",
        config.output_dir.join(&artifact.file_name).display()
    );
    Ok(())
}

async fn cmd_instances(
    config: &CaptureConfig,
    action: InstanceCommands,
) -> reportcap_core::Result<()> {
    let backend = BackendClient::new(config.base_url.clone());

    match action {
        InstanceCommands::List => {
            let instances = backend.list_report_instances().await?;
            if instances.is_empty() {
                println!("No report instances");
                return Ok(());
            }
            for instance in instances {
                println!("{}  {}", instance.id, instance.status);
            }
        }
        InstanceCommands::Show { id } => {
            let instance = backend.get_report_instance(&id).await?;
            println!("id:     {}", instance.id);
            println!("status: {}", instance.status);
            if let Some(definition) = instance.report_definition {
                println!("name:   {}", definition.name);
                println!("source: {}", definition.source);
                println!("format: {}", definition.format);
                if !definition.delivery_channels.is_empty() {
                    println!("channels: {}", definition.delivery_channels.join(", "));
                }
            }
        }
    }

    Ok(())
}

async fn cmd_channels(
    config: &CaptureConfig,
    action: ChannelCommands,
) -> reportcap_core::Result<()> {
    let notifications = NotificationsClient::new(config.base_url.clone());

    match action {
        ChannelCommands::List { ids } => {
            let channels = notifications.get_channel_configs(&ids).await?;
            if channels.is_empty() {
                println!("No notification channels");
                return Ok(());
            }
            for channel in channels {
                println!("{}  {}  ({})", channel.id, channel.label, channel.channel_type);
            }
        }
        ChannelCommands::Test { id } => {
            notifications.send_test_message(&id).await?;
            println!("Test message sent to {}", id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_distinguish_stages() {
        assert_eq!(exit_code(&ReportError::InvalidRequest("x".into())), 2);
        assert_eq!(exit_code(&ReportError::Navigation("x".into())), 3);
        assert_eq!(exit_code(&ReportError::Browser("x".into())), 3);
        assert_eq!(exit_code(&ReportError::ReadinessTimeout("x".into())), 4);
        assert_eq!(exit_code(&ReportError::Encoding("x".into())), 5);
        assert_eq!(exit_code(&ReportError::Storage("x".into())), 6);
        assert_eq!(exit_code(&ReportError::Backend("x".into())), 7);
        assert_eq!(exit_code(&ReportError::Notification("x".into())), 7);
        assert_eq!(exit_code(&ReportError::Other("x".into())), 1);
    }

    #[test]
    fn test_cli_source_maps_to_report_source() {
        assert_eq!(
            ReportSource::from(CliSource::SavedSearch),
            ReportSource::SavedSearch
        );
        assert_eq!(ReportSource::from(CliSource::Other), ReportSource::Other);
    }
}
