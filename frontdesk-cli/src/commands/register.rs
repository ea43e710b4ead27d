//! Register command implementation.
//!
//! Registers a guest at the desk (the default for hotels), through the
//! self-service flow, or as a restaurant visit. On success the new guest's
//! store key is printed to stdout.

use crate::error::CliError;
use crate::utils::{
    clock_for, execute_plan, load_configuration, open_store, parse_instant, parse_property,
    GlobalOptions,
};
use chrono::NaiveDateTime;
use clap::Args;
use frontdesk::booking::RegistrationForm;
use frontdesk::links::resolve_registration_link;
use frontdesk::operations::{RegisterOptions, RegisterPlan};
use frontdesk::{NodeType, PropertyRef};

/// Register a guest.
#[derive(Args)]
pub struct RegisterCommand {
    /// Property address, e.g. hotels/h1
    #[arg(value_parser = parse_property, required_unless_present = "link")]
    pub property: Option<PropertyRef>,

    /// Registration link to resolve instead of a property address
    #[arg(long, conflicts_with = "property")]
    pub link: Option<String>,

    /// Guest name
    #[arg(long, default_value = "")]
    pub name: String,

    /// 10-digit mobile number
    #[arg(long, default_value = "")]
    pub mobile: String,

    /// Male, Female or Other
    #[arg(long, default_value = "")]
    pub gender: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    pub dob: String,

    /// Address
    #[arg(long, default_value = "")]
    pub address: String,

    /// Room number
    #[arg(long, default_value = "")]
    pub room: String,

    /// Check-in date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub check_in: Option<String>,

    /// Check-in time (HH:MM); defaults to now
    #[arg(long)]
    pub check_in_time: Option<String>,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    pub check_out: String,

    /// Check-out time (HH:MM)
    #[arg(long, default_value = "")]
    pub check_out_time: String,

    /// Use the guest self-service flow (hotels only, no room)
    #[arg(long)]
    pub self_service: bool,

    /// Register as if the current time were this instant
    #[arg(long, value_name = "YYYY-MM-DD HH:MM", value_parser = parse_instant)]
    pub at: Option<NaiveDateTime>,

    /// Preview actions without executing
    #[arg(long)]
    pub dry_run: bool,
}

impl RegisterCommand {
    /// Execute the register command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;
        let clock = clock_for(self.at);

        let property = match (&self.property, &self.link) {
            (Some(property), _) => property.clone(),
            (None, Some(link)) => resolve_registration_link(&store, link)?,
            (None, None) => {
                return Err(CliError::InvalidArguments(
                    "a property or --link is required".to_string(),
                ))
            }
        };
        if self.self_service && property.node != NodeType::Hotels {
            return Err(CliError::InvalidArguments(
                "--self-service only applies to hotels".to_string(),
            ));
        }

        let prefilled = RegistrationForm::prefilled(clock.now());
        let form = RegistrationForm {
            name: self.name,
            mobile: self.mobile,
            gender: self.gender,
            dob: self.dob,
            address: self.address,
            room_no: self.room,
            check_in: self.check_in.unwrap_or(prefilled.check_in),
            check_in_time: self.check_in_time.unwrap_or(prefilled.check_in_time),
            check_out: self.check_out,
            check_out_time: self.check_out_time,
        };

        let mut options = RegisterOptions::new(property, form);
        if self.self_service {
            options = options.self_service();
        }

        let plan = RegisterPlan::new(options).build_plan(&store, clock.as_ref())?;
        let result = execute_plan(&store, &plan, self.dry_run, global)?;

        if let Some(id) = result.guest_id {
            println!("{id}");
        }
        Ok(())
    }
}
