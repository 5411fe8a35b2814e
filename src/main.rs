use clap::Parser;
use gala::operations::FileOperations;
use gala::resolve::MediaRoot;
use gala::{config, history, output, server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gala")]
#[command(about = "Simple web gallery server for images and videos")]
#[command(long_about = "\
Simple web gallery server for images and videos

Serves every image and video below DIRECTORY as a full-screen gallery.

Supported:  jpg jpeg png gif webm mp4

Keys in the gallery:
  ← / →, space   previous / next
  r              random
  f              favorite  (copied to DIRECTORY/favorites/)
  d, Delete      delete    (moved to DIRECTORY/deleted/)

Nothing is ever unlinked: deleted files can be recovered from deleted/.")]
#[command(version)]
struct Cli {
    /// Directory to serve
    #[arg(default_value = ".")]
    directory: String,

    /// Host to bind (default: 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (default: 8000)
    #[arg(long)]
    port: Option<u16>,

    /// Do not open the browser on start
    #[arg(long)]
    no_open: bool,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a stock config file with all options documented
    #[arg(long)]
    print_config: bool,

    /// List recently served directories and exit
    #[arg(long)]
    history: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let mut config = config::load_config(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);

    if cli.history {
        output::print_history(&history::read_history(&config.history.file));
        return Ok(());
    }

    let root = match MediaRoot::open(&cli.directory) {
        Ok(root) => root,
        Err(_) => {
            let shown = std::path::absolute(&cli.directory)
                .unwrap_or_else(|_| PathBuf::from(&cli.directory));
            eprintln!("Directory not found: {}", shown.display());
            std::process::exit(1);
        }
    };

    if config.history.enabled && cli.directory != "." {
        history::record_served_directory(&root.path().to_string_lossy(), &config.history.file);
    }

    let ops = FileOperations::new(root);
    let listener = server::bind(&config.server.host, config.server.port).await?;
    let url = config.server_url();

    output::print_serve_banner(ops.root().path(), &url, ops.list().len());

    if config.server.open_browser
        && let Err(err) = open::that_detached(&url)
    {
        tracing::warn!(%url, error = %err, "could not open browser");
    }

    server::serve(listener, ops, shutdown_signal()).await?;
    Ok(())
}

/// Apply command-line flags on top of the loaded config.
fn apply_overrides(config: &mut config::GalaConfig, cli: &Cli) {
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.no_open {
        config.server.open_browser = false;
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    println!("\nShutting down server...");
}
