use clap::Subcommand;
use serde_json::{json, Value};
use std::time::Duration;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health status from the /health endpoint")]
    Ping {
        #[arg(long, default_value = "http://localhost:8000", help = "Server base URL")]
        url: String,
    },

    #[command(about = "Show server information from the API root endpoint")]
    Info {
        #[arg(long, default_value = "http://localhost:8000", help = "Server base URL")]
        url: String,
    },
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Ping { url } => {
            let endpoint = endpoint(&url, "/health");
            match get_json(&endpoint).await {
                Ok(body) => output_success(&output_format, &format!("{} is up", url), Some(json!({ "health": body }))),
                Err(e) => {
                    output_error(&output_format, &format!("{} is down: {}", url, e), Some("SERVER_DOWN"))?;
                    Err(e)
                }
            }
        }
        ServerCommands::Info { url } => {
            let body = get_json(&endpoint(&url, "/")).await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&body)?),
                OutputFormat::Text => {
                    let info = &body["body"];
                    println!("Server: {}", url);
                    println!("Name: {}", info["name"].as_str().unwrap_or("unknown"));
                    println!("Version: {}", info["version"].as_str().unwrap_or("unknown"));
                }
            }
            Ok(())
        }
    }
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

async fn get_json(url: &str) -> anyhow::Result<Value> {
    let response = reqwest::Client::new()
        .get(url)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await?
        .error_for_status()?;
    Ok(response.json().await?)
}
