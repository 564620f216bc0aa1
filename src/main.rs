use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rulecast::{
    api, cli,
    config::Config,
    mcp,
    store::RuleStore,
    validate::{ManifestValidationOptions, UndeclaredDependencyPolicy},
};

#[derive(Parser)]
#[command(name = "rulecast")]
#[command(version, about = "Serve coding-assistant rules to MCP clients")]
struct Cli {
    /// Rule tree root (overrides RULES_DIR)
    #[arg(long, global = true)]
    rules_dir: Option<PathBuf>,

    /// Manifest file (overrides RULES_MANIFEST)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the streamable HTTP MCP server
    Serve {
        /// Port to listen on (overrides MCP_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides MCP_HOST)
        #[arg(long)]
        host: Option<String>,
    },
    /// Start MCP server via stdio
    Mcp,
    /// Validate the manifest and every rule file
    Validate {
        /// How to treat dependsOn ids with no techs entry
        #[arg(long, value_enum)]
        undeclared_deps: Option<UndeclaredDependencyPolicy>,

        /// markdownlint config file (overrides MARKDOWNLINT_CONFIG)
        #[arg(long)]
        markdownlint_config: Option<PathBuf>,
    },
    /// Measure how long loading the rule tree takes
    Measure {
        #[arg(short = 'n', long, default_value = "10")]
        iterations: usize,
    },
    /// Report merged rule size per project
    ContextSize,
}

/// Initialize tracing with output to stderr (for MCP mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "rulecast=info,tower_http=info".into()),
    );

    if use_stderr {
        // stdout carries the protocol in stdio mode
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let store = RuleStore::from_config(config);
    let app = api::create_router(store);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        rules_dir = %config.rules_dir.display(),
        "Rulecast MCP server listening on http://{}/mcp",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = matches!(cli.command, Some(Commands::Mcp));
    init_tracing(use_stderr);

    let mut config = Config::from_env();
    if let Some(rules_dir) = cli.rules_dir {
        if std::env::var_os("RULES_MANIFEST").is_none() {
            config.manifest_path = rules_dir.join("manifest.yml");
        }
        config.rules_dir = rules_dir;
    }
    if let Some(manifest) = cli.manifest {
        config.manifest_path = manifest;
    }

    match cli.command {
        Some(Commands::Serve { port, host }) => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            serve(&config).await?;
        }
        Some(Commands::Mcp) => {
            mcp::run_stdio_server(RuleStore::from_config(&config)).await?;
        }
        Some(Commands::Validate {
            undeclared_deps,
            markdownlint_config,
        }) => {
            let store = RuleStore::from_config(&config);
            let linter = cli::load_linter(
                markdownlint_config
                    .as_deref()
                    .unwrap_or(config.markdownlint_config.as_path()),
            );
            let options = ManifestValidationOptions {
                undeclared_dependencies: undeclared_deps.unwrap_or(config.undeclared_dependencies),
            };

            let report = cli::run_validation(&store, &linter, &options)?;
            print!("{}", report.render());
            if report.has_errors() {
                std::process::exit(1);
            }
        }
        Some(Commands::Measure { iterations }) => {
            let store = RuleStore::from_config(&config);
            let stats = cli::measure_load_time(&store, iterations)?;
            print!("{}", stats.render());
        }
        Some(Commands::ContextSize) => {
            let store = RuleStore::from_config(&config);
            let report = cli::ContextSizeReport::build(&store)?;
            print!("{}", report.render());
        }
        None => {
            serve(&config).await?;
        }
    }

    Ok(())
}
