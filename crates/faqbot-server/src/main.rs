//! Faqbot CLI
//!
//! Starts the HTTP server for the FAQ chat backend.

use faqbot_server::{config::ServerConfig, init_tracing, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using defaults");
        eprintln!("Usage: faqbot --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_config()
    };

    let config = config.with_env_overrides()?;

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Faqbot - FAQ chat backend");
    println!();
    println!("USAGE:");
    println!("    faqbot --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    faqbot --config config/faqbot.toml");
    println!();
    println!("ENVIRONMENT:");
    println!("    PORT               Overrides bind_port");
    println!("    GOOGLE_API_KEY     Enables Gemini generation");
    println!("    FAQ_PATH           Overrides faq_path");
    println!("    RUST_LOG           Log filter (default: info)");
    println!();
}
