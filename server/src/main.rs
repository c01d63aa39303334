use sitepages::AppBuilder;
use sitepages::error::Error;

mod config;

#[tokio::main]
async fn main() -> Result<(), Error> {
	let mut builder = AppBuilder::new();

	let config = config::Config::from_env().inspect_err(|e| {
		tracing::error!("FATAL: {}", e);
	})?;
	config.apply(&mut builder)?;

	builder.run().await
}

// vim: ts=4
