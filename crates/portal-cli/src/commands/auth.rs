//! Sign-in, sign-out, and whoami.

use clap::Args;

use portal_core::error::AppError;
use portal_core::result::AppResult;

use crate::commands::Shell;
use crate::output::{self, OutputFormat};
use crate::session_file::StoredSession;

/// Arguments for the sign-in command
#[derive(Debug, Args)]
pub struct SignInArgs {
    /// ID token from the identity provider; prompted for when omitted
    #[arg(long, env = "PORTAL_ID_TOKEN", hide_env_values = true)]
    pub id_token: Option<String>,
}

/// Exchange an ID token for a portal session and remember it.
pub async fn sign_in(shell: &mut Shell, args: &SignInArgs) -> AppResult<()> {
    let id_token = match &args.id_token {
        Some(token) => token.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Paste your ID token")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
    };

    let reply = match shell.client.sign_in(id_token.trim()).await {
        Ok(reply) => reply,
        Err(e) => {
            shell.gate.sign_out();
            return Err(e);
        }
    };

    shell
        .session_file
        .save(&StoredSession {
            token: reply.token.clone(),
            session: reply.session.clone(),
        })
        .await?;
    shell.client.set_token(Some(reply.token.clone()));
    shell.gate.resolve(Some((reply.token, reply.session)));

    output::print_success(&format!(
        "Signed in as {} ({})",
        reply.user.email, reply.user.role
    ));
    Ok(())
}

/// End the session on the server and forget it locally.
pub async fn sign_out(shell: &mut Shell) -> AppResult<()> {
    if let Err(e) = shell.client.sign_out().await {
        tracing::warn!(error = %e, "Server sign-out failed; clearing local session anyway");
    }
    shell.session_file.clear().await?;
    shell.client.set_token(None);
    shell.gate.sign_out();
    output::print_success("Signed out");
    Ok(())
}

/// Print the stored profile.
pub async fn whoami(shell: &Shell) -> AppResult<()> {
    let profile = shell.client.me().await?;
    match shell.format {
        OutputFormat::Json => output::print_json(&profile),
        OutputFormat::Table => {
            output::print_kv("Email", &profile.email);
            output::print_kv("Role", profile.role.as_str());
            output::print_kv(
                "Name",
                profile.display_name.as_deref().unwrap_or("-"),
            );
            output::print_kv("User ID", &profile.id);
            output::print_kv("Since", &profile.created_at.to_rfc3339());
        }
    }
    Ok(())
}
