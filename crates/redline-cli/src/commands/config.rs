use std::path::Path;

use anyhow::Result;
use redline_config::Config;

use crate::cli::ConfigCommands;

pub fn handle(cmd: ConfigCommands, path: &Path, config: &Config) -> Result<()> {
    match cmd {
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Show => {
            let mut shown = config.clone();
            if shown.api.session_cookie.is_some() {
                shown.api.session_cookie = Some("<hidden>".to_string());
            }
            print!("{}", toml::to_string_pretty(&shown)?);
        }
    }
    Ok(())
}
