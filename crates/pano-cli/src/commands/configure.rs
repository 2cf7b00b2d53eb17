//! Configure command: store API credentials

use colored::Colorize;
use dialoguer::{Input, Password};
use pano_core::UserConfig;
use pano_fs::NormalizedPath;

use crate::error::{CliError, Result};

/// Run the configure command
///
/// Values not given on the command line are prompted for. The secret prompt
/// does not echo.
pub fn run_configure(
    path: &NormalizedPath,
    client_id: Option<String>,
    client_secret: Option<String>,
) -> Result<()> {
    let client_id = match client_id {
        Some(id) => id,
        None => Input::<String>::new().with_prompt("Enter your client_id").interact_text()?,
    };
    let client_secret = match client_secret {
        Some(secret) => secret,
        None => Password::new().with_prompt("Enter your client_secret").interact()?,
    };

    let (client_id, client_secret) = (client_id.trim(), client_secret.trim());
    if client_id.is_empty() || client_secret.is_empty() {
        return Err(CliError::user("client_id and client_secret must not be empty"));
    }

    let mut config = UserConfig::load_or_default(path)?;
    config.set_credentials(client_id, client_secret);
    config.save(path)?;
    println!("{} Credentials saved to {}", "OK".green().bold(), path);
    Ok(())
}
