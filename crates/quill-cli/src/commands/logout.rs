//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::Session;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub fn run(_args: LogoutArgs, session: &Session) -> Result<()> {
    let api = session.api()?;
    api.logout().context("Failed to clear stored credentials")?;
    output::success("Logged out");
    Ok(())
}
