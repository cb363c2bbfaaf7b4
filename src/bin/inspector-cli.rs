use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;

use request_inspector::parse_json_section;

#[derive(Parser)]
#[command(name = "inspector-cli")]
#[command(about = "Probe a running request inspector", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9090")]
    url: String,

    /// Accept invalid or self-signed certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Extra request header, as "Name: value" (repeatable)
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Request method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the response body verbatim
    Raw,
    /// Print the JSON section, pretty-printed
    Report,
    /// Print only the negotiated TLS parameters
    Tls,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(cli.insecure)
        .build()?;

    let method = Method::from_bytes(cli.method.to_ascii_uppercase().as_bytes())?;
    let res = client
        .request(method, &cli.url)
        .headers(parse_headers(&cli.headers)?)
        .send()
        .await?;

    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: inspector returned status {}", status);
        eprintln!("Response: {}", body);
        return Ok(());
    }

    match cli.command {
        Commands::Raw => print!("{}", body),
        Commands::Report => {
            let report = parse_json_section(&body)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Tls => {
            let report = parse_json_section(&body)?;
            if !report.info.is_encrypted() {
                println!("Plaintext connection (no TLS)");
            }
            for (field, value) in report.info.iter().filter(|(k, _)| k.starts_with("TLS-")) {
                println!("{}: {}", field, value);
            }
        }
    }

    Ok(())
}

fn parse_headers(raw: &[String]) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    for entry in raw {
        let (name, value) = entry
            .split_once(':')
            .ok_or_else(|| format!("header `{}` is not in `Name: value` form", entry))?;
        headers.append(
            HeaderName::from_bytes(name.trim().as_bytes())?,
            HeaderValue::from_str(value.trim())?,
        );
    }
    Ok(headers)
}
