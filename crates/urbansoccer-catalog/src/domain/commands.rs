//! Commands for the Archetype Catalog context.
//!
//! These are administrative writes; the campaign lifecycle only reads the
//! catalog.

use urbansoccer_core::command::Command;
use urbansoccer_core::id::UserId;
use uuid::Uuid;

use super::aggregates::{ArchetypePatch, ArchetypeStats, Rarity};

/// Command to add an archetype to the catalog.
#[derive(Debug, Clone)]
pub struct CreateArchetype {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The administrator issuing the command.
    pub caller: UserId,
    /// Display name.
    pub name: String,
    /// Optional flavour text.
    pub description: Option<String>,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Fixed stat block.
    pub stats: ArchetypeStats,
    /// Portrait location.
    pub image_url: Option<String>,
    /// 3D model location.
    pub model_url: Option<String>,
    /// Whether new campaigns may select the archetype.
    pub is_available: bool,
}

impl Command for CreateArchetype {
    fn command_type(&self) -> &'static str {
        "catalog.create_archetype"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn caller(&self) -> UserId {
        self.caller
    }
}

/// Command to change descriptive fields of an archetype.
#[derive(Debug, Clone)]
pub struct UpdateArchetype {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The administrator issuing the command.
    pub caller: UserId,
    /// The archetype identifier, as received.
    pub archetype_id: String,
    /// Fields to change.
    pub patch: ArchetypePatch,
}

impl Command for UpdateArchetype {
    fn command_type(&self) -> &'static str {
        "catalog.update_archetype"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn caller(&self) -> UserId {
        self.caller
    }
}

/// Command to flip an archetype's availability.
#[derive(Debug, Clone)]
pub struct ToggleArchetypeAvailability {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The administrator issuing the command.
    pub caller: UserId,
    /// The archetype identifier, as received.
    pub archetype_id: String,
}

impl Command for ToggleArchetypeAvailability {
    fn command_type(&self) -> &'static str {
        "catalog.toggle_archetype_availability"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn caller(&self) -> UserId {
        self.caller
    }
}

/// Command to remove an archetype from the catalog.
#[derive(Debug, Clone)]
pub struct DeleteArchetype {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The administrator issuing the command.
    pub caller: UserId,
    /// The archetype identifier, as received.
    pub archetype_id: String,
}

impl Command for DeleteArchetype {
    fn command_type(&self) -> &'static str {
        "catalog.delete_archetype"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn caller(&self) -> UserId {
        self.caller
    }
}
