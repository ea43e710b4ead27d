//! Guest registration planning.
//!
//! Registration validates a form against the property it is for and, for
//! desk registrations, against the hotel's current room occupancy. The
//! check and the write are not atomic: two desks booking the same room at
//! the same moment can both succeed.

use crate::booking::{BookingValidator, RegistrationForm, RegistrationMode};
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::guest::GuestRecord;
use crate::occupancy::OccupancySnapshot;
use crate::property::{NodeType, PropertyRef};
use crate::store::{self, DocumentStore};

use super::plan::{OperationPlan, PlanAction};

/// Options for a registration.
#[derive(Debug, Clone)]
pub struct RegisterOptions {
    /// The property the guest registers at.
    pub property: PropertyRef,
    /// The submitted form.
    pub form: RegistrationForm,
    /// Which flow the form came from.
    pub mode: RegistrationMode,
}

impl RegisterOptions {
    /// Options for `form` at `property`, picking the flow from the
    /// property's kind: desk entry for hotels, visit form for restaurants.
    #[must_use]
    pub fn new(property: PropertyRef, form: RegistrationForm) -> Self {
        let mode = match property.node {
            NodeType::Hotels => RegistrationMode::AdminEntry,
            NodeType::Resto => RegistrationMode::Restaurant,
        };
        Self {
            property,
            form,
            mode,
        }
    }

    /// Uses the hotel self-service flow instead of desk entry.
    #[must_use]
    pub fn self_service(mut self) -> Self {
        self.mode = RegistrationMode::SelfService;
        self
    }
}

/// A registration plan builder.
///
/// # Examples
///
/// ```
/// use frontdesk::booking::RegistrationForm;
/// use frontdesk::clock::ManualClock;
/// use frontdesk::operations::{PlanExecutor, RegisterOptions, RegisterPlan};
/// use frontdesk::store::SqliteDocumentStore;
/// use frontdesk::PropertyRef;
/// use chrono::NaiveDate;
///
/// let store = SqliteDocumentStore::open_in_memory().unwrap();
/// let clock = ManualClock::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap(),
/// );
/// let form = RegistrationForm { name: "Asha".into(), ..Default::default() };
///
/// // the property does not exist yet
/// let options = RegisterOptions::new(PropertyRef::hotel("h1"), form);
/// assert!(RegisterPlan::new(options).build_plan(&store, &clock).is_err());
/// ```
#[derive(Debug)]
pub struct RegisterPlan {
    options: RegisterOptions,
}

impl RegisterPlan {
    /// Creates a plan builder.
    #[must_use]
    pub const fn new(options: RegisterOptions) -> Self {
        Self { options }
    }

    /// Validates the registration and builds the plan.
    ///
    /// # Errors
    ///
    /// - [`Error::PropertyNotFound`] if the property does not exist
    /// - [`Error::WrongPropertyKind`] if the flow does not match the property
    /// - [`Error::InvalidForm`] listing every failing field
    /// - [`Error::InvalidRoom`] or [`Error::RoomOccupied`] for desk entries
    pub fn build_plan<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        clock: &dyn Clock,
    ) -> Result<OperationPlan> {
        let property = &self.options.property;
        let record = store::load_property(store, property)?;
        self.check_mode()?;

        let validator = BookingValidator::new(self.options.mode);
        let occupancy = match self.options.mode {
            RegistrationMode::AdminEntry => {
                Some(OccupancySnapshot::load(store, property, clock.now())?)
            }
            RegistrationMode::SelfService | RegistrationMode::Restaurant => None,
        };
        let guest = validator.accept(&self.options.form, occupancy.as_ref(), clock)?;

        let id = match &guest {
            GuestRecord::Restaurant(visit) => Some(visit.uid.clone()),
            GuestRecord::Hotel(_) => None,
        };

        let mut plan = OperationPlan::new(format!(
            "Register {} at {}",
            guest.profile().name,
            if record.name.is_empty() { property.to_string() } else { record.name }
        ));
        if let Some(snapshot) = &occupancy {
            if snapshot.free_rooms().count() == 1 {
                plan = plan.add_warning(format!("this fills the last free room of {property}"));
            }
        }
        if let GuestRecord::Hotel(stay) = &guest {
            if !stay.has_checkout_info() {
                plan = plan.add_warning("no check-out given; messages start once it is filled in");
            }
        }

        Ok(plan.add_action(PlanAction::CreateGuest {
            property: property.clone(),
            id,
            record: guest,
        }))
    }

    fn check_mode(&self) -> Result<()> {
        let expected = match self.options.mode {
            RegistrationMode::AdminEntry | RegistrationMode::SelfService => NodeType::Hotels,
            RegistrationMode::Restaurant => NodeType::Resto,
        };
        if self.options.property.node == expected {
            Ok(())
        } else {
            Err(Error::WrongPropertyKind {
                operation: format!("{:?} registration", self.options.mode),
                expected: expected.kind(),
            })
        }
    }
}
