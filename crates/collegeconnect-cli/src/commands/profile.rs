//! Profile subcommands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use collegeconnect::ProfileUpdate;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Show your profile
    Show {
        /// Print the profile as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change profile fields; fields not given keep their value
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Department
    #[arg(long)]
    pub department: Option<String>,

    /// Year of study
    #[arg(long)]
    pub study_year: Option<String>,

    /// Contact phone number
    #[arg(long)]
    pub contact_number: Option<String>,

    /// Postal address
    #[arg(long)]
    pub address: Option<String>,
}

impl UpdateArgs {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.department.is_none()
            && self.study_year.is_none()
            && self.contact_number.is_none()
            && self.address.is_none()
    }

    fn apply(self, update: &mut ProfileUpdate) {
        if let Some(name) = self.name {
            update.name = Some(name);
        }
        if let Some(department) = self.department {
            update.department = Some(department);
        }
        if let Some(study_year) = self.study_year {
            update.study_year = Some(study_year);
        }
        if let Some(contact_number) = self.contact_number {
            update.contact_number = Some(contact_number);
        }
        if let Some(address) = self.address {
            update.address = Some(address);
        }
    }
}

pub async fn handle(cmd: ProfileCommand, session: &CliSession) -> Result<()> {
    let identity = session.restore().await?;

    match cmd.command {
        ProfileSubcommand::Show { json } => {
            if json {
                output::json_pretty(identity.as_ref())?;
            } else {
                output::identity(&identity);
            }
            Ok(())
        }
        ProfileSubcommand::Update(args) => {
            if args.is_empty() {
                bail!("Nothing to update. Pass at least one field, e.g. --department.");
            }

            let mut update = ProfileUpdate::from_identity(&identity);
            args.apply(&mut update);

            let updated = session
                .client()
                .update_profile(&update)
                .await
                .context("Failed to update profile")?;

            output::success("Profile updated");
            println!();
            output::identity(&updated);
            Ok(())
        }
    }
}
