use std::fmt;

/// Outcome of one admission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionResult {
    /// The protected action ran and the effect pipeline completed
    Accepted,
    /// The reload sub-command succeeded
    Reloaded,
    Rejected(Rejection),
}

impl AdmissionResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

/// Why an admission stopped before the protected action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NoPermission,
    InvalidSyntax,
    /// Console (or another non-player) asked for the player-only action
    NotAPlayer,
    ContextDisabled { context: String },
    OnCooldown { remaining_secs: u64 },
    ReloadFailed { cause: String },
}

impl Rejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoPermission => "no_permission",
            Self::InvalidSyntax => "invalid_syntax",
            Self::NotAPlayer => "not_a_player",
            Self::ContextDisabled { .. } => "context_disabled",
            Self::OnCooldown { .. } => "on_cooldown",
            Self::ReloadFailed { .. } => "reload_failed",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPermission => write!(f, "missing permission"),
            Self::InvalidSyntax => write!(f, "unexpected arguments"),
            Self::NotAPlayer => write!(f, "only players can do that"),
            Self::ContextDisabled { context } => write!(f, "disabled in world {}", context),
            Self::OnCooldown { remaining_secs } => {
                write!(f, "on cooldown for {}s", remaining_secs)
            }
            Self::ReloadFailed { cause } => write!(f, "reload failed: {}", cause),
        }
    }
}
