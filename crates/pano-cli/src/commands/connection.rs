//! Connection commands: named warehouse connections in ~/.pano/config.yaml

use std::collections::BTreeMap;
use std::io::BufRead;

use colored::Colorize;
use dialoguer::Password;
use pano_core::{Connection, ConnectionUpdate, UserConfig};
use pano_fs::NormalizedPath;

use crate::cli::{ConnectionAction, ConnectionArgs};
use crate::error::{CliError, Result};

/// Run a connection subcommand against the config file at `path`
pub fn run_connection(path: &NormalizedPath, action: ConnectionAction) -> Result<()> {
    match action {
        ConnectionAction::Create { name, args } => {
            let password = match read_password(args.password_stdin)? {
                Some(password) => password,
                None => Password::new().with_prompt("Enter the password").interact()?,
            };
            let update = ConnectionUpdate {
                password: Some(password),
                ..into_update(args)
            };
            create_connection(path, &name, update)
        }
        ConnectionAction::Update { name, args } => {
            let password = read_password(args.password_stdin)?;
            let update = ConnectionUpdate {
                password,
                ..into_update(args)
            };
            update_connection(path, &name, update)
        }
        ConnectionAction::Remove { name } => remove_connection(path, &name),
        ConnectionAction::List { show_password } => {
            let config = UserConfig::load_or_default(path)?;
            print!("{}", render_connections(&config, show_password)?);
            Ok(())
        }
    }
}

fn into_update(args: ConnectionArgs) -> ConnectionUpdate {
    ConnectionUpdate {
        kind: args.kind,
        user: args.user,
        host: args.host,
        port: args.port,
        database: args.database,
        password: None,
    }
}

/// First line of stdin, without its line ending, when `from_stdin` is set.
fn read_password(from_stdin: bool) -> Result<Option<String>> {
    if !from_stdin {
        return Ok(None);
    }
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

pub fn create_connection(path: &NormalizedPath, name: &str, update: ConnectionUpdate) -> Result<()> {
    let missing = |option: &str| CliError::user(format!("Missing option '--{}'", option));
    let connection = Connection {
        kind: update.kind.ok_or_else(|| missing("type"))?,
        user: update.user.ok_or_else(|| missing("user"))?,
        host: update.host.ok_or_else(|| missing("host"))?,
        port: update.port.ok_or_else(|| missing("port"))?,
        database: update.database.ok_or_else(|| missing("database"))?,
        password: update.password.ok_or_else(|| missing("password-stdin"))?,
    };

    let mut config = UserConfig::load_or_default(path)?;
    config.add_connection(name, connection)?;
    config.save(path)?;
    println!("{} Connection {} created", "OK".green().bold(), name.cyan());
    Ok(())
}

pub fn update_connection(path: &NormalizedPath, name: &str, update: ConnectionUpdate) -> Result<()> {
    let mut config = UserConfig::load_or_default(path)?;
    config.update_connection(name, update)?;
    config.save(path)?;
    println!("{} Connection {} updated", "OK".green().bold(), name.cyan());
    Ok(())
}

pub fn remove_connection(path: &NormalizedPath, name: &str) -> Result<()> {
    let mut config = UserConfig::load_or_default(path)?;
    config.remove_connection(name)?;
    config.save(path)?;
    println!("{} Connection {} removed", "OK".green().bold(), name.cyan());
    Ok(())
}

/// Connections as YAML keyed by name, passwords masked unless `show_password`.
pub fn render_connections(config: &UserConfig, show_password: bool) -> Result<String> {
    if config.connections.is_empty() {
        return Ok("No connections found.\nUse \"pano connection create\" to create one.\n".to_string());
    }

    let shown: BTreeMap<&str, Connection> = config
        .connections
        .iter()
        .map(|(name, connection)| {
            let connection = if show_password {
                connection.clone()
            } else {
                connection.masked()
            };
            (name.as_str(), connection)
        })
        .collect();
    Ok(serde_yaml::to_string(&shown)?)
}
