//! UUID-based identifiers for documents, sections and properties.
//!
//! Every addressable entity owns one RFC 4122 UUID, rendered as lowercase
//! hyphenated text.

use tracing::warn;
use uuid::Uuid;

use crate::error::{Error, Result};

/// A 128-bit UUID identifier.
pub type Id = Uuid;

/// Generates a fresh random (version 4) identifier.
pub fn generate_id() -> Id {
    Uuid::new_v4()
}

/// Formats an identifier as lowercase hyphenated hex (canonical form).
pub fn format_id(id: &Id) -> String {
    id.hyphenated().to_string()
}

/// Parses an identifier from its textual form.
///
/// Accepts the hyphenated, simple (32 hex digits), braced and URN forms.
pub fn parse_id(s: &str) -> Option<Id> {
    Uuid::try_parse(s.trim()).ok()
}

/// Returns true if `s` is a syntactically valid identifier.
pub fn is_valid_id(s: &str) -> bool {
    parse_id(s).is_some()
}

/// Resolves the identifier for a newly constructed entity.
///
/// A malformed explicit identifier never fails construction; it is replaced
/// by a freshly generated one.
pub(crate) fn id_or_generate(custom: Option<&str>) -> Id {
    match custom {
        None => generate_id(),
        Some(s) => match parse_id(s) {
            Some(id) => id,
            None => {
                warn!(id = s, "malformed identifier supplied at construction, generating a new one");
                generate_id()
            }
        },
    }
}

/// Reassigns an identifier slot.
///
/// Without `custom` a fresh identifier is generated. A malformed `custom`
/// leaves the slot untouched.
pub(crate) fn reassign(slot: &mut Id, custom: Option<&str>) -> Result<()> {
    let id = match custom {
        None => generate_id(),
        Some(s) => parse_id(s).ok_or_else(|| Error::MalformedId { id: s.to_string() })?,
    };
    *slot = id;
    Ok(())
}
