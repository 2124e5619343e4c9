use clap::{Parser, Subcommand};
use devkit::channel_message::{Attachment, ChannelMessages};
use devkit::config::{self, Config};
use devkit::message::{self, Message};
use devkit::token::TokenStore;
use devkit::webhook::Webhook;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "devkit")]
#[command(about = "DevKit CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Print the JSON envelope an app would post to the host.
    Envelope {
        #[command(subcommand)]
        kind: EnvelopeCommand,
    },

    /// Create, update or delete a channel message through the webhook.
    Message {
        /// Config file path (default: DEVKIT_CONFIG_PATH or ~/.devkit/config.json)
        #[arg(long, short, value_name = "PATH", global = true)]
        config: Option<PathBuf>,

        /// App token (default: DEVKIT_TOKEN or webhook.token from config)
        #[arg(long, global = true)]
        token: Option<String>,

        /// Webhook base URL (default from config / environment)
        #[arg(long, global = true)]
        base_url: Option<String>,

        #[command(subcommand)]
        op: MessageCommand,
    },
}

#[derive(Subcommand)]
enum EnvelopeCommand {
    OpenPanel {
        name: String,
        url: String,
        #[arg(long)]
        channel_token: String,
    },
    OpenModal {
        name: String,
        url: String,
        #[arg(long, default_value = "640px")]
        width: String,
        #[arg(long, default_value = "480px")]
        height: String,
        #[arg(long)]
        channel_token: String,
    },
    ClosePanel,
    CloseModal,
    AuthComplete,
}

#[derive(Subcommand)]
enum MessageCommand {
    /// POST a new message to a channel.
    Create {
        #[arg(long)]
        channel: String,
        #[arg(long)]
        message: String,
        /// JSON array of attachments
        #[arg(long)]
        attachments: Option<String>,
        #[arg(long)]
        resource_id: Option<String>,
    },
    /// PUT a message by message id, or by resource id (optionally swapping it).
    Update {
        #[arg(long)]
        channel: String,
        #[arg(long, conflicts_with = "resource_id", required_unless_present = "resource_id")]
        message_id: Option<String>,
        #[arg(long)]
        resource_id: Option<String>,
        /// Replacement resource id (with --resource-id)
        #[arg(long, requires = "resource_id")]
        new_resource_id: Option<String>,
        #[arg(long)]
        message: String,
        /// JSON array of attachments
        #[arg(long)]
        attachments: Option<String>,
    },
    /// DELETE a message by message id or resource id.
    Delete {
        #[arg(long)]
        channel: String,
        #[arg(long, conflicts_with = "resource_id", required_unless_present = "resource_id")]
        message_id: Option<String>,
        #[arg(long)]
        resource_id: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("devkit {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Envelope { kind }) => {
            if let Err(e) = run_envelope(kind) {
                log::error!("envelope failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Message {
            config,
            token,
            base_url,
            op,
        }) => match run_message(config, token, base_url, op).await {
            Ok(true) => {}
            Ok(false) => std::process::exit(1),
            Err(e) => {
                log::error!("message failed: {:#}", e);
                std::process::exit(1);
            }
        },
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_envelope(kind: EnvelopeCommand) -> anyhow::Result<()> {
    let msg: Message = match kind {
        EnvelopeCommand::OpenPanel {
            name,
            url,
            channel_token,
        } => message::open_panel(&name, &url, &channel_token)?,
        EnvelopeCommand::OpenModal {
            name,
            url,
            width,
            height,
            channel_token,
        } => message::open_modal(&name, &url, &width, &height, &channel_token)?,
        EnvelopeCommand::ClosePanel => message::close_panel(),
        EnvelopeCommand::CloseModal => message::close_modal(),
        EnvelopeCommand::AuthComplete => message::auth_complete(),
    };
    println!("{}", serde_json::to_string_pretty(&msg)?);
    Ok(())
}

fn parse_attachments(raw: Option<String>) -> anyhow::Result<Vec<Attachment>> {
    match raw {
        None => Ok(Vec::new()),
        Some(s) => {
            let v: Vec<serde_json::Value> = serde_json::from_str(&s)
                .map_err(|e| anyhow::anyhow!("--attachments must be a JSON array: {}", e))?;
            Ok(v.into_iter().map(Attachment).collect())
        }
    }
}

fn client(
    config: &Config,
    token: Option<String>,
    base_url: Option<String>,
) -> anyhow::Result<ChannelMessages> {
    let base_url = base_url.unwrap_or_else(|| config::resolve_base_url(config));
    let tokens = TokenStore::new();
    if let Some(t) = token.or_else(|| config::resolve_token(config)) {
        tokens.set(t);
    }
    log::info!("using webhook {}", base_url);
    Ok(ChannelMessages::new(Webhook::new(base_url)?, Arc::new(tokens)))
}

/// Returns whether the webhook answered with a success status.
async fn run_message(
    config_path: Option<PathBuf>,
    token: Option<String>,
    base_url: Option<String>,
    op: MessageCommand,
) -> anyhow::Result<bool> {
    let (config, _path) = config::load_config(config_path)?;
    let api = client(&config, token, base_url)?;

    let res = match op {
        MessageCommand::Create {
            channel,
            message,
            attachments,
            resource_id,
        } => {
            api.create(
                &channel,
                &message,
                parse_attachments(attachments)?,
                resource_id.as_deref(),
            )
            .await?
        }
        MessageCommand::Update {
            channel,
            message_id,
            resource_id,
            new_resource_id,
            message,
            attachments,
        } => {
            let attachments = parse_attachments(attachments)?;
            match (message_id, resource_id) {
                (Some(id), _) => {
                    api.update_by_message_id(&channel, &id, &message, attachments)
                        .await?
                }
                (None, Some(rid)) => {
                    api.update_by_resource_id(
                        &channel,
                        &rid,
                        &message,
                        attachments,
                        new_resource_id.as_deref(),
                    )
                    .await?
                }
                (None, None) => anyhow::bail!("one of --message-id or --resource-id is required"),
            }
        }
        MessageCommand::Delete {
            channel,
            message_id,
            resource_id,
        } => match (message_id, resource_id) {
            (Some(id), _) => api.delete_by_message_id(&channel, &id).await?,
            (None, Some(rid)) => api.delete_by_resource_id(&channel, &rid).await?,
            (None, None) => anyhow::bail!("one of --message-id or --resource-id is required"),
        },
    };

    let status = res.status();
    let body = res.text().await.unwrap_or_default();
    println!("{}", status);
    if !body.is_empty() {
        println!("{}", body);
    }
    Ok(status.is_success())
}
