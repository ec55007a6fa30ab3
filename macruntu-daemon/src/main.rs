//! Macruntu - clipboard macros with auto-paste
//!
//! `macruntu daemon` keeps the event loop running and listens on a Unix socket.
//! `macruntu apply N` (or a `macruntu://macro/N` link) forwards to the running
//! service, or applies the macro in-process when none is running.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use macruntu_daemon::applier::{ApplyError, MacroApplier};
use macruntu_daemon::clipboard::default_clipboard;
use macruntu_daemon::config::AppConfig;
use macruntu_daemon::ipc::{self, IpcServer};
use macruntu_daemon::macro_ref::{macro_from_args, macro_uri, parse_index, parse_reference};
use macruntu_paste::{detect_session, BackendSet, PasteDispatcher};

#[derive(Parser)]
#[command(name = "macruntu", version, about = "Clipboard macros with auto-paste")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Config file (default: ~/.config/macruntu/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<std::path::PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Apply macro N (1-based)
    #[arg(long = "macro", value_name = "N")]
    macro_index: Option<String>,

    /// Start the background service without applying anything
    #[arg(long, alias = "start-hidden")]
    hidden: bool,

    /// Macro links such as macruntu://macro/2 or macro:2
    #[arg(value_name = "TARGET")]
    targets: Vec<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the background service
    Daemon,
    /// Copy a macro to the clipboard and paste it if configured
    Apply {
        /// Index, macro:N or macruntu://macro/N
        reference: String,
    },
    /// List configured macros
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show installed paste backends and the detected session
    Backends {
        #[arg(long)]
        json: bool,
    },
    /// Print the paste command a macro would run, without running it
    Plan {
        /// Index, macro:N or macruntu://macro/N
        reference: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    debug!("Configuration loaded from {}", config.config_path.display());

    match cli.command {
        Some(Commands::Daemon) => run_daemon(config).await,
        Some(Commands::Apply { reference }) => apply(config, resolve_reference(&reference)?).await,
        Some(Commands::List { json }) => list(&config, json),
        Some(Commands::Backends { json }) => backends(json),
        Some(Commands::Plan { reference }) => plan(&config, resolve_reference(&reference)?),
        None => {
            let index = cli
                .macro_index
                .as_deref()
                .and_then(parse_index)
                .or_else(|| macro_from_args(&cli.targets));

            match index {
                Some(index) => apply(config, index).await,
                None if cli.hidden => run_daemon(config).await,
                None => list(&config, false),
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "macruntu=debug,macruntu_daemon=debug,macruntu_paste=debug"
    } else {
        "macruntu=info,macruntu_daemon=info,macruntu_paste=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")
}

fn resolve_reference(reference: &str) -> Result<usize> {
    parse_reference(reference).with_context(|| format!("Invalid macro reference: {:?}", reference))
}

/// Applier wired to this host's clipboard and paste backends
fn build_applier(config: &AppConfig) -> Result<MacroApplier> {
    let backends = BackendSet::probe();
    let session = detect_session();
    info!(
        "Session: {:?}, backends: {:?}",
        session.session_type,
        backends.available().collect::<Vec<_>>()
    );

    let clipboard = default_clipboard().context("Failed to open clipboard")?;
    let dispatcher = PasteDispatcher::new(backends, session.session_type);
    Ok(MacroApplier::new(config.macros.clone(), clipboard, dispatcher))
}

async fn run_daemon(config: AppConfig) -> Result<()> {
    info!("Starting Macruntu v{}", env!("CARGO_PKG_VERSION"));

    let applier = Arc::new(build_applier(&config)?);
    let socket_path = config.socket_path().context("Failed to determine socket path")?;
    let server = IpcServer::bind(&socket_path)
        .await
        .context("Failed to start IPC server")?;

    info!("Macruntu ready with {} macros", applier.macros().len());

    tokio::select! {
        result = server.run(applier) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Macruntu stopped");
    Ok(())
}

async fn apply(config: AppConfig, index: usize) -> Result<()> {
    let socket_path = config.socket_path().context("Failed to determine socket path")?;

    match ipc::send_command(&socket_path, &format!("apply {}", index)).await {
        Ok(reply) => {
            debug!("Service replied: {}", reply);
            if let Some(error) = reply.strip_prefix("error: ") {
                anyhow::bail!("{}", error);
            }
            return Ok(());
        }
        Err(e) => debug!("{:#}; applying in-process", e),
    }

    let applier = build_applier(&config)?;
    match applier.apply_index(index) {
        Ok(report) => {
            // Stay alive until the scheduled paste has run
            if let Some(outcome) = report.finish().await {
                debug!("Paste outcome: {:?}", outcome);
            }
            Ok(())
        }
        Err(e @ ApplyError::NoSuchMacro { .. }) => {
            warn!("{}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn list(config: &AppConfig, as_json: bool) -> Result<()> {
    if as_json {
        let entries: Vec<_> = config
            .macros
            .iter()
            .enumerate()
            .map(|(i, m)| {
                json!({
                    "index": i + 1,
                    "uri": macro_uri(i + 1),
                    "label": m.label,
                    "text": if m.secret { None } else { Some(&m.text) },
                    "secret": m.secret,
                    "paste": m.paste,
                    "paste_keys": m.paste_keys,
                    "paste_backend": m.paste_backend,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (i, m) in config.macros.iter().enumerate() {
        let preview = if m.secret {
            "••••••".to_string()
        } else {
            preview_text(&m.text)
        };
        let paste = if m.paste {
            format!("  [paste {}]", m.paste_keys)
        } else {
            String::new()
        };
        println!("{:>3}  {:<16} {}{}", i + 1, m.label, preview, paste);
    }
    Ok(())
}

fn backends(as_json: bool) -> Result<()> {
    let backends = BackendSet::probe();
    let session = detect_session();

    if as_json {
        let report = json!({ "session": session, "backends": backends });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Session:  {} ({})",
        if session.session_type.is_empty() {
            "unset"
        } else {
            session.session_type.as_str()
        },
        session.display_server
    );
    if let Some(desktop) = &session.desktop_environment {
        println!("Desktop:  {}", desktop);
    }
    for backend in macruntu_paste::Backend::ALL {
        match backends.get(backend) {
            Some(path) => println!("{:<9} {}", format!("{}:", backend), path.display()),
            None => println!("{:<9} not installed", format!("{}:", backend)),
        }
    }
    Ok(())
}

fn plan(config: &AppConfig, index: usize) -> Result<()> {
    let macro_config = config.macro_at(index).with_context(|| {
        format!("Macro {} does not exist ({} configured)", index, config.macros.len())
    })?;

    let dispatcher = PasteDispatcher::new(BackendSet::probe(), detect_session().session_type);
    match dispatcher.plan(macro_config) {
        Some(plan) => println!("{}", plan.invocation()),
        None if !macro_config.paste => println!("(copy only: paste is disabled)"),
        None => println!("(copy only: no usable paste backend for {:?})", macro_config.paste_keys),
    }
    Ok(())
}

/// First line of `text`, shortened for a one-line listing
fn preview_text(text: &str) -> String {
    const MAX_CHARS: usize = 40;

    let first_line = text.lines().next().unwrap_or("");
    let mut preview: String = first_line.chars().take(MAX_CHARS).collect();
    if first_line.chars().count() > MAX_CHARS || text.lines().nth(1).is_some() {
        preview.push('…');
    }
    preview
}
