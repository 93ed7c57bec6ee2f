use std::env;
use anyhow::Result;

use dollar_fmt::app::command::{execute, load_config, parse_args, Cli};
use dollar_fmt::constants::DEFAULT_LOG_FILE;
use dollar_fmt::services::logger;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Cli { config_path, command } = parse_args(&args);

    // Load configuration
    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            logger::log_error(DEFAULT_LOG_FILE, "Config Error", &format!("{:#}", err)).unwrap_or(());
            return Err(err);
        }
    };

    match execute(&command, &config) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
        Err(err) => {
            logger::log_error(&config.log_file, "Command Error", &format!("{:#}", err)).unwrap_or(());
            Err(err)
        }
    }
}
