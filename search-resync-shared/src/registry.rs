//! Entity registry.
//!
//! Every entity type kept in sync is described once here. Descriptors carry
//! names only; live connections are bound to them by the initializer.

/// Static description of one synchronized entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Name of the search index reset for this entity.
    pub index_name: &'static str,
    /// Database holding the source table.
    pub database: &'static str,
    /// Source table replayed as events.
    pub table_name: &'static str,
    /// Queue or topic name, before the environment suffix is applied.
    pub destination: &'static str,
    /// Field the row is wrapped in inside the message body.
    pub envelope_field: &'static str,
}

impl EntityDescriptor {
    /// Destination name for the given environment suffix.
    ///
    /// An empty suffix leaves the destination unchanged.
    pub fn destination_name(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            self.destination.to_string()
        } else {
            format!("{}.{}", self.destination, suffix)
        }
    }
}

/// The entities reset and replayed by the job, in processing order.
pub static ENTITY_REGISTRY: &[EntityDescriptor] = &[
    EntityDescriptor {
        index_name: "library",
        database: "uh_library",
        table_name: "publications",
        destination: "sbt-library-publication-created",
        envelope_field: "publication",
    },
    EntityDescriptor {
        index_name: "organizations",
        database: "uh_organizations",
        table_name: "organizations",
        destination: "sbq-organization-created",
        envelope_field: "organization",
    },
    EntityDescriptor {
        index_name: "cars",
        database: "uh_hunt",
        table_name: "cars",
        destination: "sbt-car-created",
        envelope_field: "car",
    },
];
