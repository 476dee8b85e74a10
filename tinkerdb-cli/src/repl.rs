//! Interactive shell over a [`KvClient`]

use anyhow::Result;
use std::io::Write;
use thiserror::Error;
use tinkerdb_api::KvClient;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  set <key> <value>  - Set a key-value pair
  get <key>          - Get value for a key
  delete <key>       - Delete a key
  exists <key>       - Check if key exists
  keys               - List all keys
  tenant [id]        - Switch tenant (or show current)
  help               - Show this help
  quit               - Exit";

/// One parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Set { key: String, value: String },
    Get(String),
    Delete(String),
    Exists(String),
    Keys,
    Tenant(Option<String>),
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown command: {0} (type 'help' for commands)")]
    Unknown(String),
}

/// Parse a shell line. The value of `set` is every remaining word, joined
/// by single spaces.
pub fn parse_line(line: &str) -> Result<ReplCommand, ParseError> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(ReplCommand::Empty);
    };

    match cmd {
        "set" => {
            let key = words.next().ok_or(ParseError::Usage("set <key> <value>"))?;
            let value = words.collect::<Vec<_>>().join(" ");
            if value.is_empty() {
                return Err(ParseError::Usage("set <key> <value>"));
            }
            Ok(ReplCommand::Set {
                key: key.to_string(),
                value,
            })
        }
        "get" => required(words.next(), "get <key>").map(ReplCommand::Get),
        "delete" => required(words.next(), "delete <key>").map(ReplCommand::Delete),
        "exists" => required(words.next(), "exists <key>").map(ReplCommand::Exists),
        "keys" => Ok(ReplCommand::Keys),
        "tenant" => Ok(ReplCommand::Tenant(words.next().map(str::to_string))),
        "help" => Ok(ReplCommand::Help),
        "quit" | "exit" => Ok(ReplCommand::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

fn required(word: Option<&str>, usage: &'static str) -> Result<String, ParseError> {
    word.map(str::to_string).ok_or(ParseError::Usage(usage))
}

/// Run one command, printing its outcome. Returns `false` once the user quits.
async fn execute(client: &mut KvClient, command: ReplCommand) -> bool {
    match command {
        ReplCommand::Set { key, value } => match client.set_string(&key, &value).await {
            Ok(()) => println!("OK: set '{}' = '{}'", key, value),
            Err(e) => println!("Error: {}", e),
        },
        ReplCommand::Get(key) => match client.get_string(&key).await {
            Ok(value) => println!("{} = '{}'", key, value),
            Err(e) => println!("Error: {}", e),
        },
        ReplCommand::Delete(key) => match client.delete(&key).await {
            Ok(()) => println!("OK: deleted '{}'", key),
            Err(e) => println!("Error: {}", e),
        },
        ReplCommand::Exists(key) => match client.exists(&key).await {
            Ok(true) => println!("Key '{}' exists", key),
            Ok(false) => println!("Key '{}' does not exist", key),
            Err(e) => println!("Error: {}", e),
        },
        ReplCommand::Keys => match client.keys().await {
            Ok(keys) if keys.is_empty() => println!("No keys found"),
            Ok(keys) => {
                println!("Found {} key(s):", keys.len());
                for (i, key) in keys.iter().enumerate() {
                    println!("  {}. {}", i + 1, key);
                }
            }
            Err(e) => println!("Error: {}", e),
        },
        ReplCommand::Tenant(None) => println!("Current tenant: {}", client.tenant()),
        ReplCommand::Tenant(Some(tenant)) => {
            println!("Switched to tenant '{}'", tenant);
            client.set_tenant(tenant);
        }
        ReplCommand::Help => println!("{}\n", HELP),
        ReplCommand::Quit => {
            println!("Goodbye!");
            return false;
        }
        ReplCommand::Empty => {}
    }
    true
}

pub async fn run(mut client: KvClient, address: &str) -> Result<()> {
    println!("TinkerDB interactive shell");
    println!("Connected to: {}", address);
    println!("Current tenant: {}\n", client.tenant());
    println!("{}\n", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("[{}]> ", client.tenant());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        debug!(line = %line, "shell input");

        match parse_line(&line) {
            Ok(command) => {
                if !execute(&mut client, command).await {
                    break;
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line() {
        assert_eq!(parse_line(""), Ok(ReplCommand::Empty));
        assert_eq!(parse_line("   \t "), Ok(ReplCommand::Empty));
    }

    #[test]
    fn test_set_joins_value_words() {
        assert_eq!(
            parse_line("set greeting hello   big world"),
            Ok(ReplCommand::Set {
                key: "greeting".to_string(),
                value: "hello big world".to_string(),
            })
        );
    }

    #[test]
    fn test_set_requires_value() {
        assert_eq!(parse_line("set"), Err(ParseError::Usage("set <key> <value>")));
        assert_eq!(parse_line("set key"), Err(ParseError::Usage("set <key> <value>")));
    }

    #[test]
    fn test_key_commands() {
        assert_eq!(parse_line("get k"), Ok(ReplCommand::Get("k".to_string())));
        assert_eq!(parse_line(" delete k "), Ok(ReplCommand::Delete("k".to_string())));
        assert_eq!(parse_line("exists k extra"), Ok(ReplCommand::Exists("k".to_string())));
        assert_eq!(parse_line("get"), Err(ParseError::Usage("get <key>")));
        assert_eq!(parse_line("delete"), Err(ParseError::Usage("delete <key>")));
    }

    #[test]
    fn test_tenant() {
        assert_eq!(parse_line("tenant"), Ok(ReplCommand::Tenant(None)));
        assert_eq!(
            parse_line("tenant acme"),
            Ok(ReplCommand::Tenant(Some("acme".to_string())))
        );
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_line("keys"), Ok(ReplCommand::Keys));
        assert_eq!(parse_line("help"), Ok(ReplCommand::Help));
        assert_eq!(parse_line("quit"), Ok(ReplCommand::Quit));
        assert_eq!(parse_line("exit"), Ok(ReplCommand::Quit));
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_line("frobnicate x").unwrap_err();
        assert_eq!(err, ParseError::Unknown("frobnicate".to_string()));
        assert_eq!(
            err.to_string(),
            "Unknown command: frobnicate (type 'help' for commands)"
        );
    }
}
