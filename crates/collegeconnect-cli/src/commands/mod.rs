//! Subcommand implementations.

pub mod comments;
pub mod login;
pub mod logout;
pub mod posts;
pub mod profile;
pub mod users;
pub mod whoami;

use anyhow::Result;

use crate::cli::Commands;
use crate::session::CliSession;

pub async fn handle(command: Commands, session: &CliSession) -> Result<()> {
    match command {
        Commands::Login(args) => login::run(args, session).await,
        Commands::Logout(args) => logout::run(args, session),
        Commands::Whoami(args) => whoami::run(args, session).await,
        Commands::Posts(cmd) => posts::handle(cmd, session).await,
        Commands::Comments(cmd) => comments::handle(cmd, session).await,
        Commands::Users(cmd) => users::handle(cmd, session).await,
        Commands::Profile(cmd) => profile::handle(cmd, session).await,
    }
}
