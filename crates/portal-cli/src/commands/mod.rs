//! CLI command definitions and dispatch.

pub mod auth;
pub mod notices;
pub mod play;
pub mod role;
pub mod videos;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use portal_auth::gate::{Navigation, RouteAccess, SessionGate};
use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;

use crate::client::PortalClient;
use crate::output::OutputFormat;
use crate::session_file::{DEFAULT_SESSION_FILE, SessionFile};

/// Lecture Portal terminal client
#[derive(Debug, Parser)]
#[command(name = "portal", version, about, long_about = None)]
pub struct Cli {
    /// Portal server base URL
    #[arg(short, long, env = "PORTAL_SERVER", default_value = "http://localhost:3001")]
    pub server: String,

    /// File holding the signed-in session
    #[arg(long, env = "PORTAL_SESSION_FILE", default_value = DEFAULT_SESSION_FILE)]
    pub session_file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in with an identity provider ID token
    SignIn(auth::SignInArgs),
    /// End the current session
    SignOut,
    /// Show the signed-in profile
    Whoami,
    /// Show which role an email address would get
    Role(role::RoleArgs),
    /// Browse, search, and upload videos
    Videos(videos::VideosArgs),
    /// Play a video headlessly, saving progress as it goes
    Play(play::PlayArgs),
    /// Course announcements
    Notices(notices::NoticesArgs),
}

impl Commands {
    /// Whether the command needs a session.
    pub fn access(&self) -> RouteAccess {
        match self {
            Self::SignIn(_) | Self::Role(_) => RouteAccess::Public,
            _ => RouteAccess::Protected,
        }
    }
}

/// Everything a command needs: the API client and the session gate.
#[derive(Debug)]
pub struct Shell {
    /// API client carrying the current token.
    pub client: PortalClient,
    /// Client-side session state.
    pub gate: SessionGate,
    /// Where the session persists.
    pub session_file: SessionFile,
    /// Output format.
    pub format: OutputFormat,
}

impl Shell {
    /// Build the shell and resolve the stored session against the server.
    pub async fn start(cli: &Cli) -> AppResult<Self> {
        let mut shell = Self {
            client: PortalClient::new(&cli.server)?,
            gate: SessionGate::new(),
            session_file: SessionFile::new(&cli.session_file),
            format: cli.format,
        };
        shell.resolve_session().await?;
        Ok(shell)
    }

    async fn resolve_session(&mut self) -> AppResult<()> {
        let Some(stored) = self.session_file.load().await? else {
            self.gate.resolve(None);
            return Ok(());
        };

        self.client.set_token(Some(stored.token.clone()));
        match self.client.session().await {
            Ok(session) => self.gate.resolve(Some((stored.token, session))),
            Err(e) if e.kind == ErrorKind::Authentication => {
                tracing::info!("Stored session is no longer valid");
                self.session_file.clear().await?;
                self.client.set_token(None);
                self.gate.resolve(None);
            }
            Err(e) => {
                // Server unreachable: fall back to the stored record's expiry.
                tracing::warn!(error = %e, "Could not confirm stored session");
                self.gate.resolve(Some((stored.token, stored.session)));
            }
        }
        Ok(())
    }

    /// Gate a command: wait while loading, refuse when signed out.
    pub async fn enter(&self, access: RouteAccess) -> AppResult<()> {
        loop {
            match self.gate.decide(access) {
                Navigation::Proceed => return Ok(()),
                Navigation::ShowSpinner => {
                    self.gate.resolved().await;
                }
                Navigation::RedirectToSignIn => {
                    return Err(AppError::authentication(
                        "Not signed in. Run `portal sign-in` first.",
                    ));
                }
            }
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> AppResult<()> {
        let mut shell = Shell::start(self).await?;
        shell.enter(self.command.access()).await?;

        match &self.command {
            Commands::SignIn(args) => auth::sign_in(&mut shell, args).await,
            Commands::SignOut => auth::sign_out(&mut shell).await,
            Commands::Whoami => auth::whoami(&shell).await,
            Commands::Role(args) => role::execute(args),
            Commands::Videos(args) => videos::execute(&shell, args).await,
            Commands::Play(args) => play::execute(&shell, args).await,
            Commands::Notices(args) => notices::execute(&shell, args).await,
        }
    }
}
