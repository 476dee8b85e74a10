use anyhow::Result;
use clap::{Parser, Subcommand};
use std::time::Duration;
use tinkerdb_api::{ClientConfig, KvClient};
use tinkerdb_core::logging::{init_logging_with_config, LogConfig, LogLevel};
use tracing::debug;

mod repl;

#[derive(Parser, Debug)]
#[command(name = "tinkerdb")]
#[command(author, version, about = "Command-line client for TinkerDB", long_about = None)]
struct Args {
    /// Server address
    #[arg(short, long, env = "TINKERDB_ADDRESS", default_value = "http://127.0.0.1:8080")]
    address: String,

    /// Tenant to operate on
    #[arg(short, long, env = "TINKERDB_TENANT", default_value = "default")]
    tenant: String,

    /// Connect and request timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store a value; extra words are joined with spaces
    Set {
        key: String,
        #[arg(required = true, num_args = 1..)]
        value: Vec<String>,
    },
    /// Print the value stored under a key
    Get { key: String },
    /// Delete a key
    Delete { key: String },
    /// Check whether a key exists
    Exists { key: String },
    /// List the tenant's keys
    Keys,
    /// List every tenant with a namespace
    Tenants,
    /// Show key count for a tenant (defaults to --tenant)
    Stats { tenant: Option<String> },
    /// Delete a tenant and all of its keys
    DropTenant { tenant: String },
    /// Start the interactive shell
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args.log_level.parse::<LogLevel>().unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}', using 'warn'", args.log_level);
        LogLevel::Warn
    });
    init_logging_with_config(LogConfig::new(log_level).json_format(args.json_logs))?;

    let client = KvClient::connect(ClientConfig {
        address: args.address.clone(),
        tenant_id: args.tenant.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
    })
    .await?;
    debug!(address = %args.address, tenant = %args.tenant, "connected");

    match args.command {
        Command::Set { key, value } => {
            client.set_string(&key, &value.join(" ")).await?;
            println!("OK");
        }
        Command::Get { key } => {
            let value = client.get(&key).await?;
            match String::from_utf8(value) {
                Ok(text) => println!("{}", text),
                Err(e) => println!("{:?}", e.into_bytes()),
            }
        }
        Command::Delete { key } => {
            client.delete(&key).await?;
            println!("OK");
        }
        Command::Exists { key } => {
            println!("{}", client.exists(&key).await?);
        }
        Command::Keys => {
            for key in client.keys().await? {
                println!("{}", key);
            }
        }
        Command::Tenants => {
            for tenant in client.list_tenants().await? {
                println!("{}", tenant);
            }
        }
        Command::Stats { tenant } => {
            let tenant = tenant.unwrap_or_else(|| args.tenant.clone());
            let stats = client.tenant_stats(&tenant).await?;
            if stats.exists {
                println!("{}: {} key(s)", tenant, stats.key_count);
            } else {
                println!("{}: no such tenant", tenant);
            }
        }
        Command::DropTenant { tenant } => {
            client.delete_tenant(&tenant).await?;
            println!("OK");
        }
        Command::Shell => repl::run(client, &args.address).await?,
    }

    Ok(())
}
