//! Guest administration commands.
//!
//! `guests list/show/edit/delete/stats` operate on the guest records of one
//! property. Listings are newest first.

use crate::error::CliError;
use crate::utils::{
    clock_for, execute_plan, io_error, load_configuration, open_store, parse_instant,
    parse_property, GlobalOptions, Listing, OutputFormat,
};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Subcommand};
use frontdesk::clock::Clock;
use frontdesk::guest::{Gender, Guest, GuestRecord};
use frontdesk::operations::{guests, list_guests, resto_stats, GuestFilter, GuestUpdate};
use frontdesk::store::{self, SqliteDocumentStore};
use frontdesk::{NodeType, PropertyRef};

/// Column headers for hotel guest listings.
const HOTEL_HEADERS: [&str; 10] = [
    "id",
    "name",
    "mobile",
    "gender",
    "age",
    "room",
    "check_in",
    "check_out",
    "status",
    "message_sent",
];

/// Column headers for restaurant visit listings.
const RESTO_HEADERS: [&str; 6] = ["id", "name", "mobile", "gender", "age", "check_in_date"];

/// Administer guest records.
#[derive(Args)]
pub struct GuestsCommand {
    #[command(subcommand)]
    pub action: GuestsAction,
}

/// Guest subcommands.
#[derive(Subcommand)]
pub enum GuestsAction {
    /// List guests, newest first
    List(ListArgs),

    /// Show one guest record as JSON
    Show(GuestArgs),

    /// Change fields of a guest record
    Edit(EditArgs),

    /// Delete a guest record
    Delete {
        #[command(flatten)]
        guest: GuestArgs,

        /// Preview actions without executing
        #[arg(long)]
        dry_run: bool,
    },

    /// Restaurant dashboard counters
    Stats {
        /// Restaurant address, e.g. resto/r1
        #[arg(value_parser = parse_property)]
        property: PropertyRef,

        /// Count as if the current time were this instant
        #[arg(long, value_parser = parse_instant)]
        at: Option<NaiveDateTime>,
    },
}

/// Arguments of `guests list`.
#[derive(Args)]
pub struct ListArgs {
    /// Property address, e.g. hotels/h1
    #[arg(value_parser = parse_property)]
    pub property: PropertyRef,

    /// Name (case-insensitive) or mobile substring
    #[arg(long)]
    pub search: Option<String>,

    /// Only this gender
    #[arg(long)]
    pub gender: Option<Gender>,

    /// Only guests arriving on this date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

/// A guest of a property.
#[derive(Args)]
pub struct GuestArgs {
    /// Property address, e.g. hotels/h1
    #[arg(value_parser = parse_property)]
    pub property: PropertyRef,

    /// Guest record key
    pub id: String,
}

/// Arguments of `guests edit`. A blank value clears the field.
#[derive(Args)]
pub struct EditArgs {
    #[command(flatten)]
    pub guest: GuestArgs,

    /// Guest name
    #[arg(long)]
    pub name: Option<String>,

    /// 10-digit mobile number
    #[arg(long)]
    pub mobile: Option<String>,

    /// Male, Female or Other
    #[arg(long)]
    pub gender: Option<Gender>,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub dob: Option<String>,

    /// Address
    #[arg(long)]
    pub address: Option<String>,

    /// Room number
    #[arg(long)]
    pub room: Option<String>,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: Option<String>,

    /// Check-in time (HH:MM)
    #[arg(long)]
    pub check_in_time: Option<String>,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long)]
    pub check_out: Option<String>,

    /// Check-out time (HH:MM)
    #[arg(long)]
    pub check_out_time: Option<String>,

    /// Preview actions without executing
    #[arg(long)]
    pub dry_run: bool,
}

impl GuestsCommand {
    /// Execute the guests command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;

        match self.action {
            GuestsAction::List(args) => {
                let format = OutputFormat::resolve(args.format, &config);
                list(&store, &args, format)
            }
            GuestsAction::Show(args) => {
                let guest = store::load_guest(&store, &args.property, &args.id)?;
                print_json(&guest_json(&guest)?)
            }
            GuestsAction::Edit(args) => edit(&store, args, global),
            GuestsAction::Delete { guest, dry_run } => {
                let plan = guests::plan_delete(&store, &guest.property, &guest.id)?;
                execute_plan(&store, &plan, dry_run, global).map(drop)
            }
            GuestsAction::Stats { property, at } => {
                let stats = resto_stats(&store, &property, clock_for(at).as_ref())?;
                print_json(&serde_json::to_value(stats).map_err(io_error)?)
            }
        }
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value).map_err(io_error)?);
    Ok(())
}

/// The stored record with its key under `id`.
fn guest_json(guest: &Guest) -> Result<serde_json::Value, CliError> {
    let mut value = guest.record.encode()?;
    if let Some(object) = value.as_object_mut() {
        object.insert("id".into(), guest.id.clone().into());
    }
    Ok(value)
}

fn list(store: &SqliteDocumentStore, args: &ListArgs, format: OutputFormat) -> Result<(), CliError> {
    let filter = GuestFilter {
        search: args.search.clone(),
        gender: args.gender,
        check_in_date: args.date,
    };
    let guests = list_guests(store, &args.property, &filter)?;
    let today = clock_for(None).today();

    let rows = guests
        .iter()
        .map(|guest| {
            let profile = guest.record.profile();
            let mut row = vec![
                guest.id.clone(),
                profile.name.clone(),
                profile.mobile.clone(),
                profile.gender.map(|g| g.to_string()).unwrap_or_default(),
                profile
                    .age
                    .or_else(|| profile.age_on(today))
                    .map(|age| age.to_string())
                    .unwrap_or_default(),
            ];
            match &guest.record {
                GuestRecord::Hotel(stay) => {
                    row.push(stay.room_no.clone().unwrap_or_default());
                    row.push(joined(stay.check_in.as_deref(), stay.check_in_time.as_deref()));
                    row.push(joined(stay.check_out.as_deref(), stay.check_out_time.as_deref()));
                    row.push(stay.status().to_string());
                    row.push(stay.message_sent.to_string());
                }
                GuestRecord::Restaurant(visit) => {
                    row.push(visit.check_in_date.clone().unwrap_or_default());
                }
            }
            row
        })
        .collect();

    let json = guests
        .iter()
        .map(guest_json)
        .collect::<Result<Vec<_>, _>>()?;

    let headers: &[&str] = match args.property.node {
        NodeType::Hotels => &HOTEL_HEADERS,
        NodeType::Resto => &RESTO_HEADERS,
    };
    Listing {
        headers,
        rows,
        json: serde_json::Value::Array(json),
    }
    .print(format)
}

/// `date time`, or whichever half is present.
fn joined(date: Option<&str>, time: Option<&str>) -> String {
    match (date, time) {
        (Some(date), Some(time)) => format!("{date} {time}"),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => String::new(),
    }
}

fn edit(store: &SqliteDocumentStore, args: EditArgs, global: &GlobalOptions) -> Result<(), CliError> {
    let update = GuestUpdate {
        name: args.name,
        mobile: args.mobile,
        gender: args.gender,
        dob: args.dob,
        address: args.address,
        room_no: args.room,
        check_in: args.check_in,
        check_in_time: args.check_in_time,
        check_out: args.check_out,
        check_out_time: args.check_out_time,
    };
    let clock = clock_for(None);
    let plan = guests::plan_edit(
        store,
        &args.guest.property,
        &args.guest.id,
        &update,
        clock.as_ref(),
    )?;
    execute_plan(store, &plan, args.dry_run, global).map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_keeps_present_halves() {
        assert_eq!(joined(Some("2024-01-01"), Some("10:00")), "2024-01-01 10:00");
        assert_eq!(joined(Some("2024-01-01"), None), "2024-01-01");
        assert_eq!(joined(None, None), "");
    }
}
