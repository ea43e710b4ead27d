//! Message template commands.

use crate::error::CliError;
use crate::utils::{
    clock_for, execute_plan, load_configuration, open_store, parse_property, GlobalOptions,
    Listing, OutputFormat,
};
use clap::{Args, Subcommand};
use frontdesk::messaging::TemplateKey;
use frontdesk::operations::templates;
use frontdesk::store;
use frontdesk::PropertyRef;

/// Manage the message templates of a property.
#[derive(Args)]
pub struct TemplatesCommand {
    #[command(subcommand)]
    pub action: TemplatesAction,
}

/// Template subcommands.
#[derive(Subcommand)]
pub enum TemplatesAction {
    /// List templates: checkin, checkout, then custom ones oldest first
    List {
        /// Property address, e.g. hotels/h1
        #[arg(value_parser = parse_property)]
        property: PropertyRef,

        /// Output format
        #[arg(long, value_enum, ignore_case = true)]
        format: Option<OutputFormat>,
    },

    /// Add a custom template and print its key
    Add {
        /// Property address, e.g. hotels/h1
        #[arg(value_parser = parse_property)]
        property: PropertyRef,

        /// Template text; the default custom text when omitted
        #[arg(long)]
        text: Option<String>,

        /// Preview actions without executing
        #[arg(long)]
        dry_run: bool,
    },

    /// Rewrite a template
    Update {
        /// Property address, e.g. hotels/h1
        #[arg(value_parser = parse_property)]
        property: PropertyRef,

        /// checkin, checkout or custom_<n>
        key: TemplateKey,

        /// New template text
        text: String,

        /// Preview actions without executing
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete a custom template
    Delete {
        /// Property address, e.g. hotels/h1
        #[arg(value_parser = parse_property)]
        property: PropertyRef,

        /// custom_<n>
        key: TemplateKey,

        /// Preview actions without executing
        #[arg(long)]
        dry_run: bool,
    },
}

impl TemplatesCommand {
    /// Execute the templates command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;

        match self.action {
            TemplatesAction::List { property, format } => {
                store::load_property(&store, &property)?;
                let set = store::load_templates(&store, &property)?;
                let rows = set
                    .iter()
                    .map(|(key, text)| vec![key.to_string(), text.to_string()])
                    .collect();
                Listing {
                    headers: &["key", "text"],
                    rows,
                    json: set.to_value(),
                }
                .print(OutputFormat::resolve(format, &config))
            }
            TemplatesAction::Add {
                property,
                text,
                dry_run,
            } => {
                let clock = clock_for(None);
                let (plan, key) =
                    templates::plan_add_custom(&store, &property, text.as_deref(), clock.as_ref())?;
                execute_plan(&store, &plan, dry_run, global)?;
                if !dry_run {
                    println!("{key}");
                }
                Ok(())
            }
            TemplatesAction::Update {
                property,
                key,
                text,
                dry_run,
            } => {
                let plan = templates::plan_update(&store, &property, key, &text)?;
                execute_plan(&store, &plan, dry_run, global).map(drop)
            }
            TemplatesAction::Delete {
                property,
                key,
                dry_run,
            } => {
                let plan = templates::plan_delete(&store, &property, key)?;
                execute_plan(&store, &plan, dry_run, global).map(drop)
            }
        }
    }
}
