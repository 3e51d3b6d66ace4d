//! Path dialects: the domain-specific leading segments that callers strip
//! before handing a path to the generic traversal.
//!
//! Entity paths address a component first: `components.<Name>[.fields].rest`.
//! The `fields` segment is an artifact of the snapshot serialization format
//! and is skipped when present, so both `components.NPCEntity.fields.role`
//! and `components.NPCEntity.role` name the same value. Packet paths may
//! carry a leading `data` wrapper segment, likewise skipped.

use crate::error::ResolveError;

/// Split an entity path into its component name and the remaining tokens.
///
/// # Errors
///
/// Returns [`ResolveError::BadDialect`] when the path does not start with a
/// `components` segment followed by a component name.
pub fn entity_dialect<'t>(
    tokens: &'t [&'t str],
    path: &str,
) -> Result<(&'t str, &'t [&'t str]), ResolveError> {
    match tokens {
        ["components", component, rest @ ..] => {
            let rest = match rest {
                ["fields", tail @ ..] => tail,
                other => other,
            };
            Ok((*component, rest))
        }
        _ => Err(ResolveError::BadDialect {
            path: path.to_owned(),
        }),
    }
}

/// Strip the optional leading `data` wrapper from a packet path.
pub fn packet_dialect<'t>(tokens: &'t [&'t str]) -> &'t [&'t str] {
    match tokens {
        ["data", rest @ ..] => rest,
        other => other,
    }
}
