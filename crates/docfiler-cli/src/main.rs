use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

mod client;

use client::SummaryClient;
use docfiler_core::organize::AUDIT_LOG_FILENAME;
use docfiler_core::{AuditLog, Config, parse_reply};
use docfiler_relay::{AppState, DEFAULT_PORT};

/// AI document summarizer - summarize local PDF/TXT files and file them away
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a document and print the model's raw reply
    Summarize {
        /// Path to the PDF or TXT file
        file: PathBuf,

        /// Relay URL (e.g. http://127.0.0.1:8000); defaults to an embedded relay
        #[arg(long)]
        server: Option<String>,
    },

    /// Summarize a document, then move it into the suggested folder
    Organize {
        /// Path to the PDF or TXT file
        file: PathBuf,

        /// Relay URL (e.g. http://127.0.0.1:8000); defaults to an embedded relay
        #[arg(long)]
        server: Option<String>,

        /// Audit log path (default: docfiler_log.txt beside the file)
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Run the relay service in the foreground
    Serve {
        /// Port to listen on (loopback only)
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port } => serve(port),
        Command::Summarize { file, server } => summarize(&file, server),
        Command::Organize { file, server, log } => organize(&file, server, log),
    }
}

fn serve(port: u16) -> anyhow::Result<()> {
    let config = Config::load()?;
    let state = Arc::new(AppState::from_config(&config));
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = docfiler_relay::bind(SocketAddr::from(([127, 0, 0, 1], port))).await?;
        println!("Listening on http://{}", listener.local_addr()?);
        docfiler_relay::serve(listener, state).await?;
        Ok(())
    })
}

/// A relay connection plus, in embedded mode, the runtime keeping the relay
/// alive for the duration of the command.
struct Relay {
    client: SummaryClient,
    _runtime: Option<tokio::runtime::Runtime>,
}

/// Connect to a running relay, or spawn one in-process on an ephemeral
/// loopback port. The embedded listener is bound before any request is
/// issued; its bound address is the readiness signal, replacing any timed
/// startup guess.
fn connect(server: Option<String>) -> anyhow::Result<Relay> {
    if let Some(url) = server {
        let client = SummaryClient::new(url)?;
        anyhow::ensure!(
            client.ready(Duration::from_secs(2)),
            "relay at {} is not responding; start it with `docfiler serve`",
            client.base_url()
        );
        return Ok(Relay {
            client,
            _runtime: None,
        });
    }

    let config = Config::load()?;
    let state = Arc::new(AppState::from_config(&config));
    let runtime = tokio::runtime::Runtime::new()?;
    let listener =
        runtime.block_on(docfiler_relay::bind(SocketAddr::from(([127, 0, 0, 1], 0))))?;
    let addr = listener.local_addr()?;
    runtime.spawn(docfiler_relay::serve(listener, state));

    let client = SummaryClient::new(format!("http://{addr}"))?;
    Ok(Relay {
        client,
        _runtime: Some(runtime),
    })
}

fn summarize(file: &Path, server: Option<String>) -> anyhow::Result<()> {
    let relay = connect(server)?;
    let reply = relay.client.upload(file)?;
    println!("{reply}");
    Ok(())
}

fn organize(file: &Path, server: Option<String>, log: Option<PathBuf>) -> anyhow::Result<()> {
    let relay = connect(server)?;
    let raw = relay.client.upload(file)?;

    let result = match parse_reply(&raw) {
        Ok(result) => result,
        Err(failure) => {
            // Surface the reply verbatim; never guess at fields or move files
            // based on an unparseable reply.
            anyhow::bail!(
                "could not parse the model reply; no file was moved. The reply was:\n\n{}",
                failure.cleaned
            );
        }
    };

    let log_path = log.unwrap_or_else(|| {
        file.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .join(AUDIT_LOG_FILENAME)
    });
    let audit = AuditLog::new(log_path);
    let outcome = docfiler_core::organize(file, &result, &audit)?;

    println!("Summary:\n{}\n", result.summary);
    if !result.keywords.is_empty() {
        println!("Keywords: {}", result.keywords.join(", "));
    }
    println!(
        "Filed under '{}': {}",
        outcome.folder_name,
        outcome.new_path.display()
    );
    if let Some(e) = outcome.log_error {
        // The move already completed; only the audit record is missing.
        eprintln!("Warning: file moved, but the audit log was not updated: {e}");
    }
    Ok(())
}
