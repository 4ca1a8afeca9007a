//! Logout command implementation.

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub fn run(_args: LogoutArgs, session: &CliSession) -> Result<()> {
    session.client().logout();
    output::success("Logged out");
    Ok(())
}
