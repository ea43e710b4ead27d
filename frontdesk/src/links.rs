//! Registration links.
//!
//! Hotels and restaurants hand guests a link (usually as a QR code) that
//! opens a registration form bound to the property:
//!
//! - `{base}/customer-registration/{nodeType}/{propertyId}`
//! - `{base}/resto-admin?qrMode=true&restoId={propertyId}` for the
//!   restaurant's own visit form

use crate::error::{Error, Result};
use crate::property::{NodeType, PropertyRef};
use crate::store::{self, DocumentStore};

/// Path prefix of guest self-registration links.
pub const REGISTRATION_PREFIX: &str = "/customer-registration";

/// Path of the restaurant visit form.
pub const RESTO_FORM_PATH: &str = "/resto-admin";

/// Builds the self-registration link of `property`.
///
/// # Examples
///
/// ```
/// use frontdesk::links::registration_link;
/// use frontdesk::PropertyRef;
///
/// let link = registration_link("https://desk.example.com/", &PropertyRef::hotel("h1"));
/// assert_eq!(link, "https://desk.example.com/customer-registration/hotels/h1");
/// ```
#[must_use]
pub fn registration_link(base_url: &str, property: &PropertyRef) -> String {
    format!(
        "{}{REGISTRATION_PREFIX}/{}/{}",
        base_url.trim_end_matches('/'),
        property.node,
        property.id
    )
}

/// Builds the QR-mode visit form link of a restaurant.
///
/// # Examples
///
/// ```
/// use frontdesk::links::resto_self_registration_link;
///
/// assert_eq!(
///     resto_self_registration_link("https://desk.example.com", "r1"),
///     "https://desk.example.com/resto-admin?qrMode=true&restoId=r1",
/// );
/// ```
#[must_use]
pub fn resto_self_registration_link(base_url: &str, resto_id: &str) -> String {
    format!(
        "{}{RESTO_FORM_PATH}?qrMode=true&restoId={resto_id}",
        base_url.trim_end_matches('/')
    )
}

/// Parses a registration link (full URL or bare path) back into the
/// property it names.
///
/// Both link forms are accepted.
///
/// # Errors
///
/// Returns [`Error::InvalidLink`] if the link has neither shape, names an
/// unknown node, or has an empty property id.
///
/// # Examples
///
/// ```
/// use frontdesk::links::parse_registration_link;
/// use frontdesk::PropertyRef;
///
/// let parsed = parse_registration_link("/customer-registration/resto/r9").unwrap();
/// assert_eq!(parsed, PropertyRef::resto("r9"));
/// assert!(parse_registration_link("/customer-registration/spa/x").is_err());
/// ```
pub fn parse_registration_link(link: &str) -> Result<PropertyRef> {
    let invalid = |reason: &str| Error::InvalidLink {
        link: link.to_string(),
        reason: reason.to_string(),
    };

    let path_and_query = strip_origin(link.trim());
    let (path, query) = path_and_query
        .split_once('?')
        .map_or((path_and_query, None), |(p, q)| (p, Some(q)));
    let path = path.trim_end_matches('/');

    // the app may be served below a base path
    if let Some(start) = path.find(REGISTRATION_PREFIX) {
        let rest = &path[start + REGISTRATION_PREFIX.len()..];
        let mut segments = rest.trim_start_matches('/').split('/');
        let (Some(node), Some(id), None) = (segments.next(), segments.next(), segments.next())
        else {
            return Err(invalid("expected /customer-registration/{nodeType}/{propertyId}"));
        };
        let node: NodeType = node
            .parse()
            .map_err(|_| invalid("node type must be 'hotels' or 'resto'"))?;
        if id.is_empty() {
            return Err(invalid("property id is empty"));
        }
        return Ok(PropertyRef::new(node, id));
    }

    if path.ends_with(RESTO_FORM_PATH) {
        let id = query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .find_map(|pair| pair.strip_prefix("restoId="))
            .filter(|id| !id.is_empty())
            .ok_or_else(|| invalid("missing restoId parameter"))?;
        return Ok(PropertyRef::resto(id));
    }

    Err(invalid("not a registration link"))
}

/// Parses a registration link and checks that its property exists.
///
/// # Errors
///
/// Returns [`Error::InvalidLink`] for malformed links and
/// [`Error::PropertyNotFound`] when the property is gone.
pub fn resolve_registration_link<S: DocumentStore + ?Sized>(
    store: &S,
    link: &str,
) -> Result<PropertyRef> {
    let property = parse_registration_link(link)?;
    store::load_property(store, &property)?;
    Ok(property)
}

fn strip_origin(link: &str) -> &str {
    match link.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |i| &rest[i..]),
        None => link,
    }
}
