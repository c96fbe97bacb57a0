//! Commands for the Campaign Lifecycle context.
//!
//! Identifiers arrive as received from the caller and are parsed by the
//! handlers; a malformed identifier is reported as not found.

use urbansoccer_core::command::Command;
use urbansoccer_core::id::UserId;
use uuid::Uuid;

use super::aggregates::{CampaignPatch, Progress};

/// Command to start a campaign against a catalog archetype.
#[derive(Debug, Clone)]
pub struct CreateCampaign {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user who will own the campaign.
    pub caller: UserId,
    /// The archetype to play, as received.
    pub archetype_id: String,
    /// Optional display name.
    pub campaign_name: Option<String>,
    /// Starting progress; the default progress when absent.
    pub progress: Option<Progress>,
}

impl Command for CreateCampaign {
    fn command_type(&self) -> &'static str {
        "campaign.create_campaign"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn caller(&self) -> UserId {
        self.caller
    }
}

/// Command to change any of name, status and progress in one step.
#[derive(Debug, Clone)]
pub struct UpdateCampaign {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user issuing the command.
    pub caller: UserId,
    /// The campaign identifier, as received.
    pub campaign_id: String,
    /// Fields to change.
    pub patch: CampaignPatch,
}

impl Command for UpdateCampaign {
    fn command_type(&self) -> &'static str {
        "campaign.update_campaign"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn caller(&self) -> UserId {
        self.caller
    }
}

/// Command to replace a campaign's progress record.
#[derive(Debug, Clone)]
pub struct UpdateProgress {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user issuing the command.
    pub caller: UserId,
    /// The campaign identifier, as received.
    pub campaign_id: String,
    /// The full replacement record.
    pub progress: Progress,
}

impl Command for UpdateProgress {
    fn command_type(&self) -> &'static str {
        "campaign.update_progress"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn caller(&self) -> UserId {
        self.caller
    }
}

/// Command to give up an active campaign.
#[derive(Debug, Clone)]
pub struct AbandonCampaign {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user issuing the command.
    pub caller: UserId,
    /// The campaign identifier, as received.
    pub campaign_id: String,
}

impl Command for AbandonCampaign {
    fn command_type(&self) -> &'static str {
        "campaign.abandon_campaign"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn caller(&self) -> UserId {
        self.caller
    }
}

/// Command to finish an active campaign.
#[derive(Debug, Clone)]
pub struct CompleteCampaign {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user issuing the command.
    pub caller: UserId,
    /// The campaign identifier, as received.
    pub campaign_id: String,
}

impl Command for CompleteCampaign {
    fn command_type(&self) -> &'static str {
        "campaign.complete_campaign"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn caller(&self) -> UserId {
        self.caller
    }
}

/// Command to remove a campaign, whatever its status.
#[derive(Debug, Clone)]
pub struct DeleteCampaign {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user issuing the command.
    pub caller: UserId,
    /// The campaign identifier, as received.
    pub campaign_id: String,
}

impl Command for DeleteCampaign {
    fn command_type(&self) -> &'static str {
        "campaign.delete_campaign"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn caller(&self) -> UserId {
        self.caller
    }
}
