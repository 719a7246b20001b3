//! Admin Export CLI
//!
//! Serves the export views over HTTP with in-memory backends seeded from a
//! fixture file.
//!
//! ## Usage
//!
//! ```bash
//! admin-export serve --settings admin-export.toml
//! admin-export serve --bind 0.0.0.0:8080
//! admin-export check --settings admin-export.toml
//! ```

use admin_export_conf::{Settings, bootstrap};
use admin_export_http::HttpServer;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "admin-export")]
#[command(about = "Export admin records as HTML, CSV or spreadsheet", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Run the HTTP server
	Serve {
		/// TOML settings file
		#[arg(short, long, value_name = "FILE")]
		settings: Option<PathBuf>,

		/// Listen address (overrides settings)
		#[arg(short, long, value_name = "ADDR")]
		bind: Option<String>,
	},

	/// Validate settings and fixtures, then list the exportable models
	Check {
		/// TOML settings file
		#[arg(short, long, value_name = "FILE")]
		settings: Option<PathBuf>,
	},
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();

	let result = match cli.command {
		Commands::Serve { settings, bind } => run_serve(settings, bind).await,
		Commands::Check { settings } => run_check(settings).await,
	};

	if let Err(e) = result {
		eprintln!("Error: {:#}", e);
		process::exit(1);
	}
}

fn load_settings(path: Option<PathBuf>) -> anyhow::Result<Settings> {
	let settings = Settings::load(path.as_deref()).context("failed to load settings")?;
	init_tracing(&settings.log)?;
	Ok(settings)
}

fn init_tracing(filter: &str) -> anyhow::Result<()> {
	let filter = EnvFilter::try_new(filter).with_context(|| format!("invalid log filter '{}'", filter))?;
	tracing_subscriber::fmt().with_env_filter(filter).init();
	Ok(())
}

async fn run_serve(settings: Option<PathBuf>, bind: Option<String>) -> anyhow::Result<()> {
	let mut settings = load_settings(settings)?;
	if let Some(bind) = bind {
		settings.bind = bind;
		settings.validate()?;
	}
	let addr = settings.bind_addr()?;

	let env = bootstrap(&settings).await.context("failed to install fixtures")?;
	let router = env.router(&settings);
	tracing::info!(
		prefix = router.prefix(),
		models = env.site.registered_models().len(),
		"Export views ready"
	);

	HttpServer::new(Arc::new(router))
		.listen_with_shutdown(addr, async {
			if let Err(e) = tokio::signal::ctrl_c().await {
				tracing::error!(error = %e, "Failed to listen for Ctrl-C");
			}
		})
		.await
		.map_err(|e| anyhow::anyhow!("server error: {}", e))?;

	Ok(())
}

async fn run_check(settings: Option<PathBuf>) -> anyhow::Result<()> {
	let settings = load_settings(settings)?;
	let env = bootstrap(&settings).await.context("failed to install fixtures")?;

	println!("Settings OK (bind {}, prefix {})", settings.bind, settings.url_prefix);
	println!(
		"Installed {} models, {} records, {} sessions",
		env.summary.models, env.summary.records, env.summary.sessions
	);
	for resolved in env.site.registered_models() {
		let meta = resolved.meta();
		println!(
			"  [{}] {} ({} fields, {} properties)",
			resolved.id(),
			meta.natural_key(),
			meta.fields.len(),
			meta.properties.len()
		);
	}
	Ok(())
}
