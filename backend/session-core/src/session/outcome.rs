use models::UserProfile;

/// Result of a user-triggered session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure { message: String },
}

impl Outcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// Result of the start-up restore check. None of these are shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored(UserProfile),
    NoToken,
    /// The server refused the persisted token; it has been removed.
    Rejected,
    /// The token could not be checked (no connection or a server error);
    /// it is kept for next time.
    Unreachable,
    /// A logout ran while the check was in flight.
    Superseded,
}

impl RestoreOutcome {
    pub fn is_restored(&self) -> bool {
        matches!(self, RestoreOutcome::Restored(_))
    }
}
