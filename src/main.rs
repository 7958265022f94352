use std::sync::Arc;

use appmon::config::{load_config, print_schema};
use appmon::startup;
use appmon::utils::logger::init_logging;

const CONFIG_PATH: &str = "./config.yaml";

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--schema") {
        if let Err(e) = print_schema() {
            eprintln!("Failed to print config schema: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = match load_config(CONFIG_PATH) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", CONFIG_PATH, e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = startup::run(config).await {
        tracing::error!(err = %e, "Server stopped with an error");
        std::process::exit(1);
    }
}
