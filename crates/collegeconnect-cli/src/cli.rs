//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use collegeconnect::types::DEFAULT_API_URL;

use crate::commands::comments::CommentsCommand;
use crate::commands::login::LoginArgs;
use crate::commands::logout::LogoutArgs;
use crate::commands::posts::PostsCommand;
use crate::commands::profile::ProfileCommand;
use crate::commands::users::UsersCommand;
use crate::commands::whoami::WhoamiArgs;

/// Command line client for the CollegeConnect social network.
#[derive(Parser, Debug)]
#[command(name = "collegeconnect")]
#[command(author, version = env!("COLLEGECONNECT_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Base URL of the CollegeConnect API
    #[arg(long, global = true, env = "COLLEGECONNECT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory holding the stored credential
    #[arg(long, global = true, env = "COLLEGECONNECT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with a token from the OAuth callback
    Login(LoginArgs),

    /// Forget the stored credential
    Logout(LogoutArgs),

    /// Display the logged-in user
    Whoami(WhoamiArgs),

    /// Browse, publish and react to posts
    Posts(PostsCommand),

    /// Read and write comments
    Comments(CommentsCommand),

    /// Search users and manage follows
    Users(UsersCommand),

    /// View or edit your profile
    Profile(ProfileCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "collegeconnect",
            "whoami",
            "--api-url",
            "https://connect.example.edu/api",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.api_url, "https://connect.example.edu/api");
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Whoami(_)));
    }
}
