//! Account commands: `super-admin register` and `whoami`.

use crate::error::CliError;
use crate::utils::{execute_plan, load_configuration, open_store, GlobalOptions};
use clap::{Args, Subcommand};
use frontdesk::operations::{plan_register_super_admin, resolve_role, Role};
use frontdesk::store;

/// Manage the super-admin account.
#[derive(Args)]
pub struct SuperAdminCommand {
    #[command(subcommand)]
    pub action: SuperAdminAction,
}

/// Super-admin subcommands.
#[derive(Subcommand)]
pub enum SuperAdminAction {
    /// Register the single super-admin account
    Register {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account identifier (generated when omitted)
        #[arg(long)]
        uid: Option<String>,

        /// Preview actions without executing
        #[arg(long)]
        dry_run: bool,
    },
}

impl SuperAdminCommand {
    /// Execute the super-admin command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;

        match self.action {
            SuperAdminAction::Register {
                email,
                uid,
                dry_run,
            } => {
                let plan = plan_register_super_admin(&store, &email, uid.as_deref())?;
                execute_plan(&store, &plan, dry_run, global)?;
                if !dry_run && !global.quiet {
                    eprintln!("Registered super-admin {}", email.trim());
                }
                Ok(())
            }
        }
    }
}

/// Resolve an account email to its role.
#[derive(Args)]
pub struct WhoamiCommand {
    /// Account email to resolve
    #[arg(long)]
    pub email: String,
}

impl WhoamiCommand {
    /// Execute the whoami command.
    ///
    /// Prints `super-admin`, or the role and the property the account
    /// administers with its name.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;

        let role = resolve_role(&store, &self.email)?;
        match role {
            Role::SuperAdmin => println!("super-admin"),
            Role::HotelAdmin(ref property) | Role::RestoAdmin(ref property) => {
                let record = store::load_property(&store, property)?;
                let label = if matches!(role, Role::HotelAdmin(_)) {
                    "hotel-admin"
                } else {
                    "resto-admin"
                };
                println!("{label}\t{property}\t{}", record.name);
            }
        }
        Ok(())
    }
}
