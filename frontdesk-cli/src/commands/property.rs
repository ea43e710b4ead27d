//! Property provisioning commands.
//!
//! `property add/list/show/update/remove/rooms` manage the hotels and
//! restaurants in the store, the way the super-admin console does.

use crate::error::CliError;
use crate::utils::{
    execute_plan, format_millis, load_configuration, open_store, parse_property, GlobalOptions,
    Listing, OutputFormat,
};
use clap::{Args, Subcommand};
use frontdesk::clock::SystemClock;
use frontdesk::operations::provision::{self, PropertyUpdate, ProvisionOptions};
use frontdesk::store::{self, SqliteDocumentStore};
use frontdesk::{NodeType, PlanAction, Property, PropertyKind, PropertyRef};

/// Column headers for property listings.
const COLUMN_HEADERS: [&str; 7] = [
    "property",
    "name",
    "email",
    "mobile",
    "location",
    "rooms",
    "created_at",
];

/// Manage hotels and restaurants.
#[derive(Args)]
pub struct PropertyCommand {
    #[command(subcommand)]
    pub action: PropertyAction,
}

/// Property subcommands.
#[derive(Subcommand)]
pub enum PropertyAction {
    /// Create a hotel or restaurant with its default message templates
    Add(AddArgs),

    /// List properties, newest first
    List(ListArgs),

    /// Show one property
    Show(ShowArgs),

    /// Change property fields
    Update(UpdateArgs),

    /// Delete a property with all its guests and templates
    Remove(RemoveArgs),

    /// Set the room capacity of a hotel
    Rooms(RoomsArgs),
}

/// Arguments of `property add`.
#[derive(Args)]
pub struct AddArgs {
    /// Property kind (hotel or resto)
    #[arg(long)]
    pub kind: PropertyKind,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// Admin login email
    #[arg(long)]
    pub email: String,

    /// Free-text location
    #[arg(long, default_value = "")]
    pub location: String,

    /// Contact mobile number
    #[arg(long, default_value = "")]
    pub mobile: String,

    /// Use this identifier instead of a generated one
    #[arg(long)]
    pub uid: Option<String>,

    /// Room capacity of a new hotel
    #[arg(long, value_name = "COUNT")]
    pub rooms: Option<u32>,

    /// Preview actions without executing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments of `property list`.
#[derive(Args)]
pub struct ListArgs {
    /// Only list this kind
    #[arg(long)]
    pub kind: Option<PropertyKind>,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

/// Arguments of `property show`.
#[derive(Args)]
pub struct ShowArgs {
    /// Property address, e.g. hotels/h1
    #[arg(value_parser = parse_property)]
    pub property: PropertyRef,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `property update`.
#[derive(Args)]
pub struct UpdateArgs {
    /// Property address, e.g. hotels/h1
    #[arg(value_parser = parse_property)]
    pub property: PropertyRef,

    /// New display name
    #[arg(long)]
    pub name: Option<String>,

    /// New location
    #[arg(long)]
    pub location: Option<String>,

    /// New admin login email
    #[arg(long)]
    pub email: Option<String>,

    /// New contact mobile number
    #[arg(long)]
    pub mobile: Option<String>,

    /// Preview actions without executing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments of `property remove`.
#[derive(Args)]
pub struct RemoveArgs {
    /// Property address, e.g. hotels/h1
    #[arg(value_parser = parse_property)]
    pub property: PropertyRef,

    /// Preview actions without executing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments of `property rooms`.
#[derive(Args)]
pub struct RoomsArgs {
    /// Hotel address, e.g. hotels/h1
    #[arg(value_parser = parse_property)]
    pub property: PropertyRef,

    /// Number of rooms; rooms are numbered from 101
    pub capacity: u32,

    /// Preview actions without executing
    #[arg(long)]
    pub dry_run: bool,
}

impl PropertyCommand {
    /// Execute the property command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;

        match self.action {
            PropertyAction::Add(args) => add(&store, args, global),
            PropertyAction::List(args) => {
                let format = OutputFormat::resolve(args.format, &config);
                list(&store, args.kind, format)
            }
            PropertyAction::Show(args) => show(&store, &args),
            PropertyAction::Update(args) => update(&store, args, global),
            PropertyAction::Remove(args) => {
                let plan = provision::plan_remove(&store, &args.property)?;
                execute_plan(&store, &plan, args.dry_run, global)?;
                if !args.dry_run && !global.quiet {
                    eprintln!("Removed {}", args.property);
                }
                Ok(())
            }
            PropertyAction::Rooms(args) => {
                let plan = provision::plan_set_rooms(&store, &args.property, args.capacity)?;
                execute_plan(&store, &plan, args.dry_run, global).map(drop)
            }
        }
    }
}

fn add(store: &SqliteDocumentStore, args: AddArgs, global: &GlobalOptions) -> Result<(), CliError> {
    if args.rooms.is_some() && args.kind != PropertyKind::Hotel {
        return Err(CliError::InvalidArguments(
            "--rooms only applies to hotels".to_string(),
        ));
    }

    let mut options = ProvisionOptions::new(args.kind, args.name, args.email)
        .with_location(args.location)
        .with_mobile(args.mobile);
    if let Some(uid) = args.uid {
        options = options.with_uid(uid);
    }

    let (mut plan, reference) = provision::plan_create(store, &options, &SystemClock)?;
    if let Some(capacity) = args.rooms {
        // the capacity is part of this plan, so no missing-rooms warning
        plan.warnings.clear();
        plan = plan.add_action(PlanAction::SetRooms {
            property: reference.clone(),
            capacity,
        });
    }

    execute_plan(store, &plan, args.dry_run, global)?;
    if !args.dry_run {
        println!("{reference}");
    }
    Ok(())
}

fn room_count(store: &SqliteDocumentStore, property: &Property) -> Result<String, CliError> {
    if property.kind != PropertyKind::Hotel {
        return Ok(String::new());
    }
    let rooms = store::load_room_range(store, &property.reference())?;
    Ok(rooms.capacity().to_string())
}

fn list(
    store: &SqliteDocumentStore,
    kind: Option<PropertyKind>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let nodes: Vec<NodeType> = match kind {
        Some(kind) => vec![kind.node()],
        None => NodeType::ALL.to_vec(),
    };

    let mut properties = Vec::new();
    for node in nodes {
        properties.extend(store::load_properties(store, node)?);
    }
    properties.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut rows = Vec::with_capacity(properties.len());
    let mut json = Vec::with_capacity(properties.len());
    for property in &properties {
        let rooms = room_count(store, property)?;
        rows.push(vec![
            property.reference().to_string(),
            property.name.clone(),
            property.email.clone(),
            property.mobile.clone(),
            property.location.clone(),
            rooms.clone(),
            format_millis(property.created_at),
        ]);
        json.push(serde_json::json!({
            "property": property.reference().to_string(),
            "name": property.name,
            "email": property.email,
            "mobile": property.mobile,
            "location": property.location,
            "type": property.kind.to_string(),
            "rooms": rooms.parse::<u32>().ok(),
            "createdAt": property.created_at,
        }));
    }

    Listing {
        headers: &COLUMN_HEADERS,
        rows,
        json: serde_json::Value::Array(json),
    }
    .print(format)
}

fn show(store: &SqliteDocumentStore, args: &ShowArgs) -> Result<(), CliError> {
    let property = store::load_property(store, &args.property)?;
    let guests = store::load_guests(store, &args.property)?.len();
    let templates = store::load_templates(store, &args.property)?.len();

    if args.json {
        let mut value = serde_json::to_value(&property).map_err(crate::utils::io_error)?;
        value["guests"] = guests.into();
        value["templates"] = templates.into();
        println!(
            "{}",
            serde_json::to_string_pretty(&value).map_err(crate::utils::io_error)?
        );
        return Ok(());
    }

    println!("Property:   {}", args.property);
    println!("Name:       {}", property.name);
    println!("Type:       {}", property.kind);
    println!("Email:      {}", property.email);
    println!("Mobile:     {}", property.mobile);
    println!("Location:   {}", property.location);
    if property.kind == PropertyKind::Hotel {
        println!("Rooms:      {}", room_count(store, &property)?);
    }
    println!("Guests:     {guests}");
    println!("Templates:  {templates}");
    println!("Created:    {}", format_millis(property.created_at));
    Ok(())
}

fn update(
    store: &SqliteDocumentStore,
    args: UpdateArgs,
    global: &GlobalOptions,
) -> Result<(), CliError> {
    let patch = PropertyUpdate {
        name: args.name,
        location: args.location,
        email: args.email,
        mobile: args.mobile,
    };
    let plan = provision::plan_update(store, &args.property, &patch)?;
    execute_plan(store, &plan, args.dry_run, global).map(drop)
}
