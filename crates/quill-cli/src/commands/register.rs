//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;

use quill_core::Credentials;

use crate::output;
use crate::session::Session;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Username for the new account
    #[arg(long)]
    pub username: String,

    /// Password for the new account
    #[arg(long, env = "QUILL_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: RegisterArgs, session: &Session) -> Result<()> {
    let api = session.api()?;
    let credentials = Credentials::new(&args.username, &args.password);

    output::note("Creating account...");

    let user = api
        .register(&credentials)
        .await
        .context("Failed to create account")?;

    output::success("Account created");
    output::field("ID", user.id);
    output::field("User", &user.username);
    output::note("Run 'quill login' to sign in.");

    Ok(())
}
