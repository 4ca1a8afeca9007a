//! Whoami command implementation.

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the identity as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: WhoamiArgs, session: &CliSession) -> Result<()> {
    let identity = session.restore().await?;

    if args.json {
        output::json_pretty(identity.as_ref())?;
    } else {
        output::identity(&identity);
    }

    Ok(())
}
