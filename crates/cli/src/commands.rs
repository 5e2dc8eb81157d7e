//! CLI commands

use anyhow::{Result, bail};
use clap::Subcommand;
use harbor_core::validation::Validate;
use harbor_core::{
    ApiError, AuthConfig, Boat, FileStorage, GuardOutcome, LoginRequest, NewBoat, RouteGuard,
    SessionMonitor, SessionStore,
};
use harbor_http::{AuthService, BoatService, Gateway, ReqwestTransport};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{self, CliConfig};
use crate::navigator::{TerminalNavigator, command_for};

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// Account name
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long, env = "HARBOR_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show whether a session is stored
    Status {
        /// Keep running and report session changes
        #[arg(long)]
        watch: bool,
    },

    /// Manage boats
    Boats {
        #[command(subcommand)]
        command: BoatCommands,
    },

    /// Configuration file operations
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum BoatCommands {
    /// List all boats
    List,

    /// Show one boat
    Get { id: i64 },

    /// Create a boat
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Change a boat; omitted fields keep their current value
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a boat
    Delete {
        id: i64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the default configuration file
    Init {
        /// Output file path (defaults to <data-dir>/harbor.toml)
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Typed services sharing one gateway
struct Api {
    auth: AuthService,
    boats: BoatService,
}

fn open_session(data_dir: &Path, config_file: Option<PathBuf>) -> Result<(CliConfig, SessionStore)> {
    let config_file = CliConfig::resolve_file(config_file, data_dir);
    if let Some(path) = &config_file {
        debug!("Loading configuration from: {}", path.display());
    }
    let config = CliConfig::load(config_file.as_deref())?;

    let session_file = config.session_file(data_dir);
    debug!("Using session file: {}", session_file.display());
    let session = SessionStore::new(Arc::new(FileStorage::new(session_file)));

    Ok((config, session))
}

fn connect(config: &CliConfig, session: SessionStore, location: &str) -> Result<Api> {
    let mut builder = ReqwestTransport::builder().base_url(&config.api.base_url);
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    if let Some(user_agent) = &config.api.user_agent {
        builder = builder.user_agent(user_agent);
    }
    let transport = builder.build()?;

    let navigator = Arc::new(TerminalNavigator::at(location));
    let gateway = Gateway::new(Arc::new(transport), session, navigator)
        .with_login_path(&config.api.login_path);

    Ok(Api {
        auth: AuthService::new(gateway.clone()),
        boats: BoatService::new(gateway),
    })
}

/// Print per-field messages, then hand the error on
fn report(err: ApiError) -> anyhow::Error {
    if let Some(fields) = err.field_errors() {
        for (field, message) in fields {
            eprintln!("  {field}: {message}");
        }
    }
    debug!(status = err.status(), kind = ?err.kind(), "API error");
    anyhow::Error::new(err)
}

impl Commands {
    pub async fn execute(self, data_dir: PathBuf, config_file: Option<PathBuf>) -> Result<()> {
        match self {
            Self::Login { username, password } => {
                let (config, session) = open_session(&data_dir, config_file)?;
                login(&config, session, username, password).await
            }
            Self::Logout => {
                let (_, session) = open_session(&data_dir, config_file)?;
                session.clear_session()?;
                info!("Session cleared");
                println!("Logged out.");
                Ok(())
            }
            Self::Status { watch } => {
                let (config, session) = open_session(&data_dir, config_file)?;
                status(&config, session, watch).await
            }
            Self::Boats { command } => {
                let (config, session) = open_session(&data_dir, config_file)?;
                command.execute(&config, session).await
            }
            Self::Config { command } => command.execute(&data_dir),
        }
    }
}

async fn login(
    config: &CliConfig,
    session: SessionStore,
    username: String,
    password: String,
) -> Result<()> {
    let api = connect(config, session.clone(), AuthConfig::LOGIN_LOCATION)?;
    api.auth
        .login(&LoginRequest::new(username, password))
        .await
        .map_err(report)?;

    let target = RouteGuard::new(session).take_return_target();
    println!("Logged in.");
    println!("Continue with: {}", command_for(&target));
    Ok(())
}

async fn status(config: &CliConfig, session: SessionStore, watch: bool) -> Result<()> {
    print_status(session.has_active_session());
    if !watch {
        return Ok(());
    }

    let (mut rx, handle) = SessionMonitor::new(session, config.check_interval()).spawn();
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                print_status(*rx.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    handle.abort();
    Ok(())
}

fn print_status(active: bool) {
    if active {
        println!("Logged in.");
    } else {
        println!("Not logged in.");
    }
}

impl BoatCommands {
    /// Front-end location this command shows
    fn location(&self) -> String {
        match self {
            Self::Get { id } | Self::Update { id, .. } | Self::Delete { id, .. } => {
                format!("{}/{id}", AuthConfig::DASHBOARD_LOCATION)
            }
            Self::List | Self::Create { .. } => AuthConfig::DASHBOARD_LOCATION.to_string(),
        }
    }

    pub async fn execute(self, config: &CliConfig, session: SessionStore) -> Result<()> {
        let location = self.location();
        if let GuardOutcome::Redirect { return_to, .. } =
            RouteGuard::new(session.clone()).check(&location)
        {
            bail!(
                "Not logged in. Run `harbor login`, then `{}`",
                command_for(&return_to)
            );
        }

        let api = connect(config, session, &location)?;

        match self {
            Self::List => {
                let boats = api.boats.list().await.map_err(report)?;
                print_boats(&boats);
            }
            Self::Get { id } => {
                let boat = api.boats.get(id).await.map_err(report)?;
                print_boat(&boat);
            }
            Self::Create { name, description } => {
                let boat = NewBoat::new(name, description);
                boat.validate().map_err(report)?;
                let created = api.boats.create(&boat).await.map_err(report)?;
                println!("Created boat {}.", created.id);
                print_boat(&created);
            }
            Self::Update {
                id,
                name,
                description,
            } => {
                let current = api.boats.get(id).await.map_err(report)?;
                let boat = Boat {
                    id,
                    name: name.unwrap_or(current.name),
                    description: description.unwrap_or(current.description),
                };
                boat.validate().map_err(report)?;
                let saved = api.boats.update(id, &boat).await.map_err(report)?;
                println!("Updated boat {}.", saved.id);
                print_boat(&saved);
            }
            Self::Delete { id, yes } => {
                if !yes && !confirm(&format!("Delete boat {id}?"))? {
                    println!("Cancelled.");
                    return Ok(());
                }
                api.boats.delete(id).await.map_err(report)?;
                println!("Deleted boat {id}.");
            }
        }

        Ok(())
    }
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

fn print_boats(boats: &[Boat]) {
    if boats.is_empty() {
        println!("No boats to show. Add one with `harbor boats create --name <NAME>`.");
        return;
    }

    let name_width = boats
        .iter()
        .map(|boat| boat.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    println!("{:>6}  {:<name_width$}  DESCRIPTION", "ID", "NAME");
    for boat in boats {
        println!("{:>6}  {:<name_width$}  {}", boat.id, boat.name, boat.description);
    }
}

fn print_boat(boat: &Boat) {
    println!("ID:          {}", boat.id);
    println!("Name:        {}", boat.name);
    println!("Description: {}", boat.description);
}

impl ConfigCommands {
    pub fn execute(self, data_dir: &Path) -> Result<()> {
        match self {
            Self::Init { output, force } => {
                let config_path =
                    output.unwrap_or_else(|| data_dir.join(config::CONFIG_FILE_NAME));

                if config_path.exists() && !force {
                    bail!(
                        "{} already exists; pass --force to overwrite",
                        config_path.display()
                    );
                }

                // Create parent directory if it doesn't exist
                if let Some(parent) = config_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                config::generate_default_config(&config_path)?;
                println!("Generated configuration at: {}", config_path.display());
                Ok(())
            }
        }
    }
}
