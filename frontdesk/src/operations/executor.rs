//! Plan execution engine.

use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::store::{self, DocumentStore};

use super::plan::{OperationPlan, PlanAction};

/// Result of executing a plan.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// Key of the guest record created by the plan, if any.
    pub guest_id: Option<String>,
}

impl ExecutionResult {
    fn new(plan: &OperationPlan, dry_run: bool, guest_id: Option<String>) -> Self {
        Self {
            success: true,
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            guest_id,
        }
    }
}

/// Executes operation plans against a document store.
///
/// The executor can run in normal mode (applying changes) or dry-run mode
/// (reporting without changes).
///
/// # Examples
///
/// ```
/// use frontdesk::operations::{OperationPlan, PlanAction, PlanExecutor};
/// use frontdesk::store::{self, DocumentStore, SqliteDocumentStore};
/// use frontdesk::PropertyRef;
///
/// let store = SqliteDocumentStore::open_in_memory().unwrap();
/// let hotel = PropertyRef::hotel("h1");
/// let plan = OperationPlan::new("Resize")
///     .add_action(PlanAction::SetRooms { property: hotel.clone(), capacity: 4 });
///
/// let result = PlanExecutor::new(&store).dry_run().execute(&plan).unwrap();
/// assert!(result.dry_run);
/// assert!(store.get(&store::rooms(&hotel).unwrap()).unwrap().is_none());
///
/// PlanExecutor::new(&store).execute(&plan).unwrap();
/// assert_eq!(store.get(&store::rooms(&hotel).unwrap()).unwrap(), Some(4.into()));
/// ```
pub struct PlanExecutor<'a, S: ?Sized> {
    store: &'a S,
    dry_run: bool,
}

impl<'a, S: DocumentStore + ?Sized> PlanExecutor<'a, S> {
    /// Creates a new plan executor.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// Sets the executor to dry-run mode.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// Actions run in order and stop at the first failure. Writes already
    /// made stay made; the store has no cross-path transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if any action fails to execute.
    pub fn execute(&self, plan: &OperationPlan) -> Result<ExecutionResult> {
        if self.dry_run {
            return Ok(ExecutionResult::new(plan, true, None));
        }

        let mut guest_id = None;
        for action in &plan.actions {
            log::debug!("executing: {}", action.description());
            if let Some(id) = self.execute_action(action)? {
                guest_id = Some(id);
            }
        }
        Ok(ExecutionResult::new(plan, false, guest_id))
    }

    /// Executes a single action, returning the key of a created guest.
    fn execute_action(&self, action: &PlanAction) -> Result<Option<String>> {
        match action {
            PlanAction::CreateGuest {
                property,
                id: Some(id),
                record,
            } => {
                self.store
                    .set(&store::customer(property, id)?, &record.encode()?)?;
                Ok(Some(id.clone()))
            }
            PlanAction::CreateGuest {
                property, record, ..
            } => {
                let id = self
                    .store
                    .push(&store::customers(property)?, &record.encode()?)?;
                Ok(Some(id))
            }
            PlanAction::UpdateGuest { property, id, patch } => {
                self.store.update(&store::customer(property, id)?, patch)?;
                Ok(None)
            }
            PlanAction::DeleteGuest { property, id } => {
                self.store.remove(&store::customer(property, id)?)?;
                Ok(None)
            }
            PlanAction::PutTemplate {
                property,
                key,
                text,
            } => {
                self.store
                    .set(&store::message(property, key)?, &Value::String(text.clone()))?;
                Ok(None)
            }
            PlanAction::DeleteTemplate { property, key } => {
                self.store.remove(&store::message(property, key)?)?;
                Ok(None)
            }
            PlanAction::CreateProperty(record) => {
                let Value::Object(fields) = serde_json::to_value(record)? else {
                    return Err(Error::Validation {
                        field: "property".into(),
                        message: format!("{} did not encode as an object", record.reference()),
                    });
                };
                self.store
                    .update(&store::property(&record.reference())?, &fields)?;
                Ok(None)
            }
            PlanAction::UpdateProperty { property, patch } => {
                self.store.update(&store::property(property)?, patch)?;
                Ok(None)
            }
            PlanAction::DeleteProperty(property) => {
                self.store.remove(&store::property(property)?)?;
                Ok(None)
            }
            PlanAction::SetRooms { property, capacity } => {
                self.store.set(&store::rooms(property)?, &json!(capacity))?;
                Ok(None)
            }
            PlanAction::RegisterSuperAdmin { email, uid } => {
                let mut record = Map::new();
                record.insert("email".into(), json!(email));
                record.insert("uid".into(), json!(uid));
                self.store.set(&store::super_admin(), &Value::Object(record))?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guest::{GuestProfile, GuestRecord, HotelStay};
    use crate::messaging::TemplateKey;
    use crate::property::PropertyRef;
    use crate::store::SqliteDocumentStore;

    fn stay(name: &str) -> GuestRecord {
        GuestRecord::Hotel(HotelStay {
            profile: GuestProfile {
                name: name.into(),
                mobile: "9876543210".into(),
                ..GuestProfile::default()
            },
            created_at: 5,
            ..HotelStay::default()
        })
    }

    #[test]
    fn test_create_guest_with_generated_key() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let hotel = PropertyRef::hotel("h1");
        let plan = OperationPlan::new("Register").add_action(PlanAction::CreateGuest {
            property: hotel.clone(),
            id: None,
            record: stay("Asha"),
        });

        let result = PlanExecutor::new(&store).execute(&plan).unwrap();
        let id = result.guest_id.unwrap();
        let guest = store::load_guest(&store, &hotel, &id).unwrap();
        assert_eq!(guest.record.profile().name, "Asha");
    }

    #[test]
    fn test_dry_run_does_not_modify_store() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let hotel = PropertyRef::hotel("h1");
        let plan = OperationPlan::new("Register")
            .add_action(PlanAction::CreateGuest {
                property: hotel.clone(),
                id: Some("g1".into()),
                record: stay("Asha"),
            })
            .add_warning("room 101 is the last free room");

        let result = PlanExecutor::new(&store).dry_run().execute(&plan).unwrap();
        assert!(result.dry_run);
        assert_eq!(result.guest_id, None);
        assert_eq!(result.actions_taken.len(), 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(store::load_guests(&store, &hotel).unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete_guest() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let hotel = PropertyRef::hotel("h1");
        let mut patch = Map::new();
        patch.insert("checkOut".into(), json!("2024-01-02"));
        patch.insert("checkOutTime".into(), json!("10:00"));

        let plan = OperationPlan::new("Edit")
            .add_action(PlanAction::CreateGuest {
                property: hotel.clone(),
                id: Some("g1".into()),
                record: stay("Asha"),
            })
            .add_action(PlanAction::UpdateGuest {
                property: hotel.clone(),
                id: "g1".into(),
                patch,
            });
        PlanExecutor::new(&store).execute(&plan).unwrap();

        let guest = store::load_guest(&store, &hotel, "g1").unwrap();
        assert!(guest.hotel().unwrap().has_checkout_info());
        assert_eq!(guest.record.profile().name, "Asha");

        let plan = OperationPlan::new("Delete").add_action(PlanAction::DeleteGuest {
            property: hotel.clone(),
            id: "g1".into(),
        });
        PlanExecutor::new(&store).execute(&plan).unwrap();
        assert!(store::load_guest(&store, &hotel, "g1").unwrap_err().is_identity());
    }

    #[test]
    fn test_templates_and_super_admin() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let resto = PropertyRef::resto("r1");
        let plan = OperationPlan::new("Templates")
            .add_action(PlanAction::PutTemplate {
                property: resto.clone(),
                key: TemplateKey::CheckIn,
                text: "Hi {name}".into(),
            })
            .add_action(PlanAction::PutTemplate {
                property: resto.clone(),
                key: TemplateKey::Custom(7),
                text: "later".into(),
            })
            .add_action(PlanAction::DeleteTemplate {
                property: resto.clone(),
                key: TemplateKey::Custom(7),
            })
            .add_action(PlanAction::RegisterSuperAdmin {
                email: "root@desk.test".into(),
                uid: "u0".into(),
            });
        PlanExecutor::new(&store).execute(&plan).unwrap();

        let templates = store::load_templates(&store, &resto).unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates.get(TemplateKey::CheckIn), Some("Hi {name}"));
        assert_eq!(
            store.get(&store::super_admin()).unwrap(),
            Some(json!({"email": "root@desk.test", "uid": "u0"}))
        );
    }
}
