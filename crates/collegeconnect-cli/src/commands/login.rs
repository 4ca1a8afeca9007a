//! Login command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use collegeconnect::BearerToken;
use collegeconnect::auth::{CallbackOutcome, DEFAULT_PROVIDER};

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Token issued by the OAuth callback
    #[arg(long, conflicts_with = "callback")]
    pub token: Option<String>,

    /// Full URL of the OAuth callback page you were redirected to
    #[arg(long)]
    pub callback: Option<String>,

    /// OAuth provider to print the authorization URL for
    #[arg(long, default_value = DEFAULT_PROVIDER)]
    pub provider: String,
}

pub async fn run(args: LoginArgs, session: &CliSession) -> Result<()> {
    let client = session.client();

    let token = match (args.token, args.callback) {
        (Some(token), _) => BearerToken::new(token).context("Invalid token")?,
        (None, Some(callback)) => {
            let outcome = CallbackOutcome::parse(&callback).context("Invalid callback URL")?;
            if let Some(message) = outcome.failure_message() {
                bail!(message);
            }
            outcome.into_token()?
        }
        (None, None) => {
            println!("Open this URL in a browser to sign in:");
            println!();
            println!("  {}", client.authorization_url(&args.provider).underline());
            println!();
            output::note(
                "Then run 'collegeconnect login --callback <URL>' with the address you were sent back to.",
            );
            return Ok(());
        }
    };

    output::note("Logging in...");

    let identity = client
        .session()
        .login(token, client.api())
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("Name", output::display_name(&identity));
    if let Some(ref email) = identity.email {
        output::field("Email", email);
    }

    Ok(())
}
