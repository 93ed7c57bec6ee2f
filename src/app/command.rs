use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::constants::DEFAULT_CONFIG_FILE;
use crate::models::amount::{parse_amount, FormatOptions};
use crate::models::config::{Config, ConfigSource};
use crate::services::logger::log_info;
use crate::utils::currency::{UsdFormatter, MAX_MANTISSA};
use crate::utils::formatters::{format_dollar_amount_with, is_equal};

pub const USAGE: &str = "Usage:
  dollar-fmt [fmt] [-d|--digits <n>] [--round|--no-round] <amount>...
  dollar-fmt eq <a> <b> [-e|--epsilon <epsilon>]
  dollar-fmt help

Options:
  --config <path>   config file (default: config.json)";

#[derive(Debug, PartialEq)]
pub enum Command {
    Format {
        amounts: Vec<String>,
        digits: Option<usize>,
        round: Option<bool>,
    },
    Equal {
        a: f64,
        b: f64,
        epsilon: Option<f64>,
    },
    Help,
    Invalid(String),
}

#[derive(Debug, PartialEq)]
pub struct Cli {
    pub config_path: Option<String>,
    pub command: Command,
}

/// Parses the arguments after the program name.
pub fn parse_args(args: &[String]) -> Cli {
    let mut config_path = None;
    let mut parts: Vec<&str> = Vec::with_capacity(args.len());

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            match iter.next() {
                Some(path) => config_path = Some(path.clone()),
                None => {
                    return Cli {
                        config_path,
                        command: Command::Invalid("--config needs a path".to_string()),
                    }
                }
            }
        } else {
            parts.push(arg.as_str());
        }
    }

    Cli {
        config_path,
        command: parse_command(&parts),
    }
}

fn parse_command(parts: &[&str]) -> Command {
    match parts.first() {
        None => Command::Invalid(USAGE.to_string()),
        Some(&"help") | Some(&"-h") | Some(&"--help") => Command::Help,
        Some(&"eq") => parse_equal(&parts[1..]),
        Some(&"fmt") => parse_format(&parts[1..]),
        Some(_) => parse_format(parts),
    }
}

fn parse_format(parts: &[&str]) -> Command {
    let mut amounts = Vec::new();
    let mut digits = None;
    let mut round = None;

    let mut i = 0;
    while i < parts.len() {
        match parts[i] {
            "-d" | "--digits" => {
                match parts.get(i + 1).and_then(|d| d.parse::<usize>().ok()) {
                    Some(d) if d <= MAX_MANTISSA => digits = Some(d),
                    _ => {
                        return Command::Invalid(format!(
                            "--digits needs an integer between 0 and {}",
                            MAX_MANTISSA
                        ))
                    }
                }
                i += 1;
            }
            "--round" => round = Some(true),
            "--no-round" => round = Some(false),
            "--" => {
                amounts.extend(parts[i + 1..].iter().map(|a| a.to_string()));
                break;
            }
            amount => amounts.push(amount.to_string()),
        }
        i += 1;
    }

    if amounts.is_empty() {
        return Command::Invalid("Usage: dollar-fmt [fmt] [-d <n>] [--no-round] <amount>...".to_string());
    }

    Command::Format { amounts, digits, round }
}

fn parse_equal(parts: &[&str]) -> Command {
    let mut values = Vec::new();
    let mut epsilon = None;

    let mut i = 0;
    while i < parts.len() {
        match parts[i] {
            "-e" | "--epsilon" => {
                match parts.get(i + 1).and_then(|e| e.parse::<f64>().ok()) {
                    Some(e) if e.is_finite() && e > 0.0 => epsilon = Some(e),
                    _ => return Command::Invalid("--epsilon needs a positive number".to_string()),
                }
                i += 1;
            }
            value => match parse_amount(value) {
                Some(v) => values.push(v),
                None => return Command::Invalid(format!("Not a number: {}", value)),
            },
        }
        i += 1;
    }

    match values.as_slice() {
        [a, b] => Command::Equal { a: *a, b: *b, epsilon },
        _ => Command::Invalid("Usage: dollar-fmt eq <a> <b> [-e <epsilon>]".to_string()),
    }
}

/// Loads the config given with `--config`, or `config.json` when present,
/// and logs which one is in use.
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let (config, source) = match config_path {
        Some(path) => (Config::load(path)?, ConfigSource::File(PathBuf::from(path))),
        None => Config::load_or_default(DEFAULT_CONFIG_FILE)?,
    };
    log_info(&config.log_file, "Config", &format!("using {}", source))?;
    Ok(config)
}

/// Runs a command and returns the lines to print. Amounts that cannot be
/// parsed are logged and rendered as "-".
pub fn execute(command: &Command, config: &Config) -> Result<Vec<String>> {
    match command {
        Command::Format { amounts, digits, round } => {
            let options = FormatOptions {
                digits: digits.unwrap_or(config.format.digits),
                round: round.unwrap_or(config.format.round),
            };

            amounts
                .iter()
                .map(|raw| -> Result<String> {
                    let amount = parse_amount(raw);
                    if amount.is_none() {
                        log_info(&config.log_file, "Invalid Amount", raw)?;
                    }
                    Ok(format_dollar_amount_with(
                        &UsdFormatter,
                        amount,
                        &options,
                        &config.abbreviations,
                    ))
                })
                .collect()
        }
        Command::Equal { a, b, epsilon } => {
            let equal = match epsilon {
                Some(epsilon) => is_equal(*a, *b, *epsilon),
                None => config.is_equal(*a, *b),
            };
            Ok(vec![equal.to_string()])
        }
        Command::Help => Ok(USAGE.lines().map(str::to_string).collect()),
        Command::Invalid(msg) => bail!("{}", msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    fn test_config() -> Config {
        Config {
            log_file: std::env::temp_dir()
                .join(format!("dollar_fmt_command_{}.log", std::process::id()))
                .to_string_lossy()
                .into_owned(),
            ..Config::default()
        }
    }

    #[test]
    fn test_parse_implicit_format() {
        let cli = parse_args(&args("1500 -0.5 -d 4 --no-round"));
        assert_eq!(cli.config_path, None);
        assert_eq!(
            cli.command,
            Command::Format {
                amounts: vec!["1500".to_string(), "-0.5".to_string()],
                digits: Some(4),
                round: Some(false),
            }
        );
    }

    #[test]
    fn test_parse_config_anywhere() {
        let cli = parse_args(&args("fmt --config other.json 12"));
        assert_eq!(cli.config_path.as_deref(), Some("other.json"));
        assert_eq!(
            cli.command,
            Command::Format {
                amounts: vec!["12".to_string()],
                digits: None,
                round: None,
            }
        );
    }

    #[test]
    fn test_parse_max_digits() {
        let cli = parse_args(&args("1 -d 20"));
        assert_eq!(
            cli.command,
            Command::Format {
                amounts: vec!["1".to_string()],
                digits: Some(20),
                round: None,
            }
        );
    }

    #[test]
    fn test_parse_double_dash() {
        let cli = parse_args(&args("fmt -- -d"));
        assert_eq!(
            cli.command,
            Command::Format {
                amounts: vec!["-d".to_string()],
                digits: None,
                round: None,
            }
        );
    }

    #[test]
    fn test_parse_equal() {
        let cli = parse_args(&args("eq 1 1.25 -e 0.5"));
        assert_eq!(
            cli.command,
            Command::Equal { a: 1.0, b: 1.25, epsilon: Some(0.5) }
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(parse_args(&[]).command, Command::Invalid(_)));
        assert!(matches!(parse_args(&args("fmt")).command, Command::Invalid(_)));
        assert!(matches!(parse_args(&args("1 -d")).command, Command::Invalid(_)));
        assert!(matches!(parse_args(&args("1 -d x")).command, Command::Invalid(_)));
        assert!(matches!(parse_args(&args("1 -d 70000")).command, Command::Invalid(_)));
        assert!(matches!(parse_args(&args("1 -d 21")).command, Command::Invalid(_)));
        assert!(matches!(parse_args(&args("eq 1")).command, Command::Invalid(_)));
        assert!(matches!(parse_args(&args("eq 1 x")).command, Command::Invalid(_)));
        assert!(matches!(parse_args(&args("eq 1 2 -e 0")).command, Command::Invalid(_)));
        assert!(matches!(parse_args(&args("--config")).command, Command::Invalid(_)));
        assert_eq!(parse_args(&args("--help")).command, Command::Help);
    }

    #[test]
    fn test_execute_format() {
        let config = test_config();
        let command = Command::Format {
            amounts: args("0 0.0005 1500 2500000 -2500000 abc NaN"),
            digits: None,
            round: None,
        };
        let lines = execute(&command, &config).unwrap();
        let log = std::fs::read_to_string(&config.log_file).unwrap();
        let _ = std::fs::remove_file(&config.log_file);
        assert_eq!(
            lines,
            vec!["$0.00", "<$0.001", "$1,500.00", "$2.50M", "-$2.50M", "-", "-"]
        );
        assert!(log.contains("INFO - Invalid Amount: abc"));
        assert!(log.contains("INFO - Invalid Amount: NaN"));
    }

    #[test]
    fn test_execute_format_overrides() {
        let config = test_config();
        let command = Command::Format {
            amounts: args("0.0005 2500000"),
            digits: Some(4),
            round: Some(false),
        };
        assert_eq!(
            execute(&command, &config).unwrap(),
            vec!["$0.0005", "$2,500,000.00"]
        );
    }

    #[test]
    fn test_execute_equal() {
        let config = test_config();
        let default_epsilon = Command::Equal { a: 1.0, b: 1.25, epsilon: None };
        assert_eq!(execute(&default_epsilon, &config).unwrap(), vec!["false"]);

        let wide = Command::Equal { a: 1.0, b: 1.25, epsilon: Some(0.5) };
        assert_eq!(execute(&wide, &config).unwrap(), vec!["true"]);
    }

    #[test]
    fn test_load_config_logs_source() {
        let dir = std::env::temp_dir();
        let id = std::process::id();
        let log_path = dir.join(format!("dollar_fmt_load_{}.log", id));
        let config_path = dir.join(format!("dollar_fmt_load_{}.json", id));
        let _ = std::fs::remove_file(&log_path);
        let json = serde_json::json!({ "digits": 4, "log_file": log_path.to_string_lossy() });
        std::fs::write(&config_path, json.to_string()).unwrap();

        let config_arg = config_path.to_string_lossy().into_owned();
        let config = load_config(Some(config_arg.as_str())).unwrap();
        let log = std::fs::read_to_string(&log_path).unwrap();
        std::fs::remove_file(&config_path).unwrap();
        std::fs::remove_file(&log_path).unwrap();

        assert_eq!(config.format.digits, 4);
        assert!(log.contains(&format!("INFO - Config: using {}", config_arg)));
    }

    #[test]
    fn test_load_config_missing_file_fails() {
        let path = std::env::temp_dir().join("dollar_fmt_no_such_config.json");
        let _ = std::fs::remove_file(&path);
        assert!(load_config(Some(path.to_string_lossy().as_ref())).is_err());
    }

    #[test]
    fn test_execute_invalid() {
        let config = test_config();
        let err = execute(&Command::Invalid("bad".to_string()), &config).unwrap_err();
        assert_eq!(err.to_string(), "bad");
    }
}
