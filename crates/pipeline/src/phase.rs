use serde::Serialize;

/// Lifecycle of the orchestrator.
///
/// `Idle -> Dispatching -> AwaitingResult -> {Succeeded, Failed}`; the
/// terminal phases are left only by the next accepted `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPhase {
    #[default]
    Idle,
    /// Accepted; the transport call has not been issued yet.
    Dispatching,
    /// The transport call is outstanding.
    AwaitingResult,
    Succeeded,
    Failed,
}

impl GenerationPhase {
    /// `true` while a generation is outstanding (single-flight guard).
    pub fn is_in_flight(&self) -> bool {
        matches!(self, GenerationPhase::Dispatching | GenerationPhase::AwaitingResult)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationPhase::Succeeded | GenerationPhase::Failed)
    }
}
