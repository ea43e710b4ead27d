//! Link command implementation.
//!
//! Prints the self-registration link of a property, or resolves a link back
//! to the property it names.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, parse_property, GlobalOptions};
use clap::Args;
use frontdesk::links::{registration_link, resolve_registration_link, resto_self_registration_link};
use frontdesk::store;
use frontdesk::{NodeType, PropertyRef};

/// Print or resolve a registration link.
#[derive(Args)]
pub struct LinkCommand {
    /// Property address, e.g. hotels/h1
    #[arg(value_parser = parse_property, required_unless_present = "resolve")]
    pub property: Option<PropertyRef>,

    /// Origin the link is built on (defaults to `base_url` from configuration)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Print the restaurant's QR-mode visit form link instead
    #[arg(long)]
    pub resto_form: bool,

    /// Resolve this link to the property it names
    #[arg(long, value_name = "LINK", conflicts_with_all = ["property", "resto_form"])]
    pub resolve: Option<String>,
}

impl LinkCommand {
    /// Execute the link command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;

        if let Some(ref link) = self.resolve {
            let property = resolve_registration_link(&store, link)?;
            println!("{property}");
            return Ok(());
        }

        let property = self
            .property
            .ok_or_else(|| CliError::InvalidArguments("a property is required".to_string()))?;
        store::load_property(&store, &property)?;

        let base_url = self.base_url.or(config.base_url).ok_or_else(|| {
            CliError::Config("no base URL: pass --base-url or set base_url".to_string())
        })?;

        let link = if self.resto_form {
            if property.node != NodeType::Resto {
                return Err(CliError::InvalidArguments(
                    "--resto-form only applies to restaurants".to_string(),
                ));
            }
            resto_self_registration_link(&base_url, &property.id)
        } else {
            registration_link(&base_url, &property)
        };
        println!("{link}");
        Ok(())
    }
}
