//! Occupancy command implementation.
//!
//! Prints the rooms of a hotel occupied at an instant, one per line, or the
//! full room board with `--board`.

use crate::error::CliError;
use crate::utils::{
    clock_for, load_configuration, open_store, parse_instant, parse_property, GlobalOptions,
    Listing, OutputFormat,
};
use chrono::NaiveDateTime;
use clap::Args;
use frontdesk::clock::Clock;
use frontdesk::occupancy::OccupancySnapshot;
use frontdesk::store;
use frontdesk::{Error, NodeType, PropertyKind, PropertyRef};

/// Show which rooms of a hotel are occupied.
#[derive(Args)]
pub struct OccupancyCommand {
    /// Hotel address, e.g. hotels/h1
    #[arg(value_parser = parse_property)]
    pub property: PropertyRef,

    /// Resolve occupancy at this instant instead of now
    #[arg(long, value_name = "YYYY-MM-DD HH:MM", value_parser = parse_instant)]
    pub at: Option<NaiveDateTime>,

    /// List every room with its state
    #[arg(long)]
    pub board: bool,

    /// Output format of the room board
    #[arg(long, value_enum, ignore_case = true, requires = "board")]
    pub format: Option<OutputFormat>,
}

impl OccupancyCommand {
    /// Execute the occupancy command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.property.node != NodeType::Hotels {
            return Err(Error::WrongPropertyKind {
                operation: "room occupancy".into(),
                expected: PropertyKind::Hotel,
            }
            .into());
        }

        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;
        store::load_property(&store, &self.property)?;

        let at = clock_for(self.at).now();
        let snapshot = OccupancySnapshot::load(&store, &self.property, at)?;

        if !self.board {
            for room in &snapshot.occupied {
                println!("{room}");
            }
            return Ok(());
        }

        let board = snapshot.board();
        let rows = board
            .iter()
            .map(|state| {
                vec![
                    state.room.to_string(),
                    if state.occupied { "occupied" } else { "free" }.to_string(),
                ]
            })
            .collect();
        let json = serde_json::to_value(&board).map_err(crate::utils::io_error)?;

        Listing {
            headers: &["room", "state"],
            rows,
            json,
        }
        .print(OutputFormat::resolve(self.format, &config))
    }
}
