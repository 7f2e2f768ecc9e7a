//! Commands for the adventure session context.

use branchtale_core::command::Command;
use branchtale_core::presentation::{SurfaceHandle, UserId};
use uuid::Uuid;

/// Command to start an adventure, or list adventures when no selector is
/// given.
#[derive(Debug, Clone)]
pub struct StartAdventure {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player starting the session.
    pub user: UserId,
    /// Game id or 1-based catalog index, already cleaned by the command
    /// layer. `None` lists the catalog.
    pub selector: Option<String>,
}

impl Command for StartAdventure {
    fn command_type(&self) -> &'static str {
        if self.selector.is_some() {
            "session.start_adventure"
        } else {
            "session.list_adventures"
        }
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to stop the session rendered on a surface.
#[derive(Debug, Clone)]
pub struct StopAdventure {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The surface whose session should stop.
    pub surface: SurfaceHandle,
}

impl Command for StopAdventure {
    fn command_type(&self) -> &'static str {
        "session.stop_adventure"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
