use std::fmt;

/// Phases of one orchestration run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BatchState {
    Idle,
    CheckingEligibility,
    AwaitingConfirmation,
    Executing,
    Settled,
    Done,
}

impl BatchState {
    /// Whether the run may move from `self` to `next`.
    ///
    /// `Idle -> Done` covers the empty batch, `CheckingEligibility -> Done`
    /// a batch with nothing eligible, `AwaitingConfirmation -> Done` a
    /// cancelled confirmation.
    pub fn can_transition_to(self, next: BatchState) -> bool {
        use BatchState::*;
        matches!(
            (self, next),
            (Idle, CheckingEligibility)
                | (Idle, Done)
                | (CheckingEligibility, AwaitingConfirmation)
                | (CheckingEligibility, Done)
                | (AwaitingConfirmation, Executing)
                | (AwaitingConfirmation, Done)
                | (Executing, Settled)
                | (Settled, Done)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == BatchState::Done
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::CheckingEligibility => "checking-eligibility",
            Self::AwaitingConfirmation => "awaiting-confirmation",
            Self::Executing => "executing",
            Self::Settled => "settled",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::BatchState::*;

    #[test]
    fn happy_path_is_legal() {
        let path = [Idle, CheckingEligibility, AwaitingConfirmation, Executing, Settled, Done];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn execution_cannot_skip_confirmation() {
        assert!(!CheckingEligibility.can_transition_to(Executing));
        assert!(!Idle.can_transition_to(Executing));
        assert!(!Executing.can_transition_to(Done));
        assert!(!Done.can_transition_to(Idle));
    }

    #[test]
    fn only_done_is_terminal() {
        assert!(Done.is_terminal());
        assert!(!Settled.is_terminal());
    }
}
