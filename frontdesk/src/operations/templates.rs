//! Message template maintenance.
//!
//! `checkin` and `checkout` always exist once a property is provisioned
//! and can only be rewritten. Custom templates are added, rewritten and
//! deleted freely.

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::messaging::{next_custom_key, TemplateKey, TemplateSet};
use crate::property::PropertyRef;
use crate::store::{self, DocumentStore};

use super::plan::{OperationPlan, PlanAction};

/// Plans a new custom template and returns it with its allocated key.
///
/// Without `text`, the kind's default custom text is used.
///
/// # Errors
///
/// Returns [`Error::PropertyNotFound`] if the property does not exist, or
/// [`Error::Validation`] for blank text.
pub fn plan_add_custom<S: DocumentStore + ?Sized>(
    store: &S,
    property: &PropertyRef,
    text: Option<&str>,
    clock: &dyn Clock,
) -> Result<(OperationPlan, TemplateKey)> {
    store::load_property(store, property)?;
    let existing = store::load_templates(store, property)?;
    let text = match text {
        Some(text) => non_blank(text)?,
        None => TemplateSet::default_custom(property.kind()).to_string(),
    };
    let key = next_custom_key(&existing, clock.epoch_millis());

    let plan = OperationPlan::new(format!("Add custom template to {property}")).add_action(
        PlanAction::PutTemplate {
            property: property.clone(),
            key,
            text,
        },
    );
    Ok((plan, key))
}

/// Plans a rewrite of one template.
///
/// # Errors
///
/// Returns [`Error::Validation`] for blank text or for a custom key that
/// does not exist, and [`Error::PropertyNotFound`] for an unknown property.
pub fn plan_update<S: DocumentStore + ?Sized>(
    store: &S,
    property: &PropertyRef,
    key: TemplateKey,
    text: &str,
) -> Result<OperationPlan> {
    store::load_property(store, property)?;
    let text = non_blank(text)?;
    if key.is_custom() && !store::load_templates(store, property)?.contains(key) {
        return Err(missing(key));
    }
    Ok(
        OperationPlan::new(format!("Update template {key} of {property}")).add_action(
            PlanAction::PutTemplate {
                property: property.clone(),
                key,
                text,
            },
        ),
    )
}

/// Plans the deletion of a custom template.
///
/// # Errors
///
/// Returns [`Error::Validation`] for `checkin`/`checkout` or a custom key
/// that does not exist.
pub fn plan_delete<S: DocumentStore + ?Sized>(
    store: &S,
    property: &PropertyRef,
    key: TemplateKey,
) -> Result<OperationPlan> {
    if !key.is_custom() {
        return Err(Error::Validation {
            field: "key".into(),
            message: format!("the {key} template cannot be deleted, only rewritten"),
        });
    }
    if !store::load_templates(store, property)?.contains(key) {
        return Err(missing(key));
    }
    Ok(
        OperationPlan::new(format!("Delete template {key} of {property}")).add_action(
            PlanAction::DeleteTemplate {
                property: property.clone(),
                key,
            },
        ),
    )
}

fn non_blank(text: &str) -> Result<String> {
    if text.trim().is_empty() {
        return Err(Error::Validation {
            field: "text".into(),
            message: "template text is empty".into(),
        });
    }
    Ok(text.to_string())
}

fn missing(key: TemplateKey) -> Error {
    Error::Validation {
        field: "key".into(),
        message: format!("no template named {key}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::operations::PlanExecutor;
    use crate::store::SqliteDocumentStore;
    use chrono::NaiveDate;
    use serde_json::json;

    fn setup() -> (SqliteDocumentStore, PropertyRef, ManualClock) {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let hotel = PropertyRef::hotel("h1");
        store
            .set(
                &store::property(&hotel).unwrap(),
                &json!({
                    "name": "Sea View",
                    "type": "hotel",
                    "uid": "h1",
                    "messages": {"checkin": "Hi {name}", "checkout": "Bye {name}"}
                }),
            )
            .unwrap();
        let clock = ManualClock::new(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        );
        (store, hotel, clock)
    }

    #[test]
    fn test_add_custom_uses_default_text_and_fresh_keys() {
        let (store, hotel, clock) = setup();

        let (plan, first) = plan_add_custom(&store, &hotel, None, &clock).unwrap();
        PlanExecutor::new(&store).execute(&plan).unwrap();
        let (plan, second) = plan_add_custom(&store, &hotel, Some("See you {name}"), &clock).unwrap();
        PlanExecutor::new(&store).execute(&plan).unwrap();

        assert!(first.is_custom());
        assert!(second > first);
        let templates = store::load_templates(&store, &hotel).unwrap();
        assert_eq!(
            templates.get(first),
            Some("Dear {name}, this is a custom message from {hotelName}.")
        );
        assert_eq!(templates.get(second), Some("See you {name}"));
        assert_eq!(templates.customs().count(), 2);
    }

    #[test]
    fn test_update_and_delete_rules() {
        let (store, hotel, clock) = setup();

        let plan = plan_update(&store, &hotel, TemplateKey::CheckIn, "Welcome {name}").unwrap();
        PlanExecutor::new(&store).execute(&plan).unwrap();
        assert_eq!(
            store::load_templates(&store, &hotel).unwrap().get(TemplateKey::CheckIn),
            Some("Welcome {name}")
        );

        assert!(plan_update(&store, &hotel, TemplateKey::CheckOut, "  ").is_err());
        assert!(plan_update(&store, &hotel, TemplateKey::Custom(1), "x").is_err());
        assert!(plan_delete(&store, &hotel, TemplateKey::CheckOut).is_err());
        assert!(plan_delete(&store, &hotel, TemplateKey::Custom(1)).is_err());

        let (plan, key) = plan_add_custom(&store, &hotel, None, &clock).unwrap();
        PlanExecutor::new(&store).execute(&plan).unwrap();
        let plan = plan_delete(&store, &hotel, key).unwrap();
        PlanExecutor::new(&store).execute(&plan).unwrap();
        assert_eq!(store::load_templates(&store, &hotel).unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_property() {
        let (store, _, clock) = setup();
        let missing = PropertyRef::resto("nope");
        assert!(plan_add_custom(&store, &missing, None, &clock).unwrap_err().is_identity());
    }
}
