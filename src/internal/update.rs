use crate::internal::models::UpdateResponse;

pub const SYNCING_MESSAGE: &str = "Syncing with Hacker News...";
const GENERIC_FAILURE: &str = "Update failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePhase {
    #[default]
    Idle,
    Syncing,
    Succeeded,
    Failed,
}

/// Outcome of one `/update` call, ready to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Success(String),
    Failure(String),
}

impl UpdateOutcome {
    pub fn from_response(response: Option<UpdateResponse>) -> Self {
        match response {
            Some(r) if r.is_success() => UpdateOutcome::Success(r.message),
            Some(r) if !r.message.trim().is_empty() => UpdateOutcome::Failure(r.message),
            _ => UpdateOutcome::Failure(GENERIC_FAILURE.to_string()),
        }
    }

    /// Text for the inline notice.
    pub fn notice(&self) -> String {
        match self {
            UpdateOutcome::Success(msg) => msg.clone(),
            UpdateOutcome::Failure(msg) => format!("Error updating: {}", msg),
        }
    }
}

/// The "update" trigger: disabled from the moment it fires until the
/// post-update cool-down has elapsed, whatever the outcome.
#[derive(Debug, Default)]
pub struct UpdateTrigger {
    phase: UpdatePhase,
}

impl UpdateTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> UpdatePhase {
        self.phase
    }

    pub fn is_enabled(&self) -> bool {
        self.phase == UpdatePhase::Idle
    }

    /// Returns false when the trigger is still disabled.
    pub fn start(&mut self) -> bool {
        match self.phase {
            UpdatePhase::Idle => {
                self.phase = UpdatePhase::Syncing;
                true
            }
            _ => false,
        }
    }

    pub fn finish(&mut self, response: Option<UpdateResponse>) -> UpdateOutcome {
        let outcome = UpdateOutcome::from_response(response);
        self.phase = match outcome {
            UpdateOutcome::Success(_) => UpdatePhase::Succeeded,
            UpdateOutcome::Failure(_) => UpdatePhase::Failed,
        };
        outcome
    }

    /// Re-enable after the cool-down.
    pub fn reset(&mut self) {
        self.phase = UpdatePhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: &str, message: &str) -> Option<UpdateResponse> {
        Some(UpdateResponse {
            status: status.to_string(),
            message: message.to_string(),
        })
    }

    #[test]
    fn trigger_is_disabled_until_reset() {
        let mut trigger = UpdateTrigger::new();
        assert!(trigger.start());
        assert!(!trigger.is_enabled());
        assert!(!trigger.start());

        trigger.finish(response("success", "ok"));
        assert_eq!(trigger.phase(), UpdatePhase::Succeeded);
        assert!(!trigger.start());

        trigger.reset();
        assert!(trigger.is_enabled());
        assert!(trigger.start());
    }

    #[test]
    fn success_shows_backend_message() {
        let mut trigger = UpdateTrigger::new();
        trigger.start();
        let outcome = trigger.finish(response(
            "success",
            "Successfully updated news data. Processed 50 stories.",
        ));
        assert_eq!(
            outcome.notice(),
            "Successfully updated news data. Processed 50 stories."
        );
    }

    #[test]
    fn failures_carry_message() {
        let mut trigger = UpdateTrigger::new();
        trigger.start();
        let outcome = trigger.finish(None);
        assert_eq!(outcome.notice(), "Error updating: Update failed");
        assert_eq!(trigger.phase(), UpdatePhase::Failed);

        assert_eq!(
            UpdateOutcome::from_response(response("error", "db locked")).notice(),
            "Error updating: db locked"
        );
        assert_eq!(
            UpdateOutcome::from_response(response("error", "")).notice(),
            "Error updating: Update failed"
        );
    }
}
