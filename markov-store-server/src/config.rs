use std::path::PathBuf;

use clap::Parser;
use markov_store_core::model::config::DEFAULT_MAX_STEPS;
use markov_store_core::{MarkovConfig, MarkovResult};

/// Command line configuration of the server.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "HTTP front-end of a store-backed Markov text model", long_about = None)]
pub struct ServerConfig {
	#[arg(long, default_value = "127.0.0.1")]
	pub host: String,

	#[arg(short, long, default_value_t = 5000)]
	pub port: u16,

	/// Snapshot file loaded at start-up (if present) and written by `PUT /v1/save`
	#[arg(short, long)]
	pub snapshot: Option<PathBuf>,

	/// Maximum number of continuation draws per walk
	#[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
	pub max_steps: usize,
}

impl ServerConfig {
	/// Model configuration derived from the command line.
	///
	/// # Errors
	/// Returns an error if `--max-steps` is 0.
	pub fn markov_config(&self) -> MarkovResult<MarkovConfig> {
		let mut config = MarkovConfig::default();
		config.set_max_steps(self.max_steps)?;
		Ok(config)
	}
}
