use crate::error::StateMachineError;
use std::fmt::Debug;

/// A lifecycle with a fixed transition table.
pub trait Lifecycle: Copy + Eq + Debug + 'static {
    /// Name used in error messages
    const MACHINE: &'static str;

    /// States reachable in one step from `self`
    fn allowed_transitions(self) -> &'static [Self];

    /// Display name of the state
    fn as_str(self) -> &'static str;

    /// True when no further transition is possible
    fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

/// Lifecycle of one rendezvous worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkerState {
    /// Thread handle exists, body not yet running
    Created,
    /// Counted in the running total
    Started,
    /// Parked on the release condition
    WaitingAtBarrier,
    /// Observed a release broadcast
    Released,
    /// Removed from the running total; about to exit
    Stopped,
}

impl WorkerState {
    /// All states in lifecycle order
    pub const ALL: [WorkerState; 5] = [
        WorkerState::Created,
        WorkerState::Started,
        WorkerState::WaitingAtBarrier,
        WorkerState::Released,
        WorkerState::Stopped,
    ];
}

impl Lifecycle for WorkerState {
    const MACHINE: &'static str = "worker";

    fn allowed_transitions(self) -> &'static [Self] {
        use WorkerState::*;
        match self {
            Created => &[Started],
            Started => &[WaitingAtBarrier],
            WaitingAtBarrier => &[Released],
            Released => &[Stopped],
            Stopped => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            WorkerState::Created => "Created",
            WorkerState::Started => "Started",
            WorkerState::WaitingAtBarrier => "WaitingAtBarrier",
            WorkerState::Released => "Released",
            WorkerState::Stopped => "Stopped",
        }
    }
}

/// Lifecycle of a raise/catch chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorState {
    /// Nothing raised yet
    NoError,
    /// An [`ErrorRecord`](crate::ErrorRecord) is propagating
    Raised,
    /// The record reached its handler
    Caught,
    /// The handler is raising a new record derived from the caught one
    Rethrown,
}

impl ErrorState {
    /// All states
    pub const ALL: [ErrorState; 4] = [
        ErrorState::NoError,
        ErrorState::Raised,
        ErrorState::Caught,
        ErrorState::Rethrown,
    ];
}

impl Lifecycle for ErrorState {
    const MACHINE: &'static str = "error";

    fn allowed_transitions(self) -> &'static [Self] {
        use ErrorState::*;
        match self {
            NoError => &[Raised],
            Raised => &[Caught],
            Caught => &[Rethrown],
            Rethrown => &[Raised],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ErrorState::NoError => "NoError",
            ErrorState::Raised => "Raised",
            ErrorState::Caught => "Caught",
            ErrorState::Rethrown => "Rethrown",
        }
    }
}

/// Validates a state transition.
///
/// Illegal transitions return an error. With the `strict-debug` feature they
/// panic instead, so a debugger stops on the offending frame.
pub fn validate_transition<S: Lifecycle>(from: S, to: S) -> Result<(), StateMachineError> {
    if from.allowed_transitions().contains(&to) {
        Ok(())
    } else {
        #[cfg(feature = "strict-debug")]
        panic!(
            "Illegal {} transition attempted: {:?} -> {:?}",
            S::MACHINE,
            from,
            to
        );

        #[cfg(not(feature = "strict-debug"))]
        Err(StateMachineError::IllegalTransition {
            machine: S::MACHINE,
            from: from.as_str(),
            to: to.as_str(),
        })
    }
}

/// Checks that every consecutive pair in `history` is an allowed step.
pub fn validate_history<S: Lifecycle>(history: &[S]) -> Result<(), StateMachineError> {
    history
        .windows(2)
        .try_for_each(|pair| validate_transition(pair[0], pair[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_happy_path_is_valid() {
        assert!(validate_history(&WorkerState::ALL).is_ok());
        assert!(WorkerState::Stopped.is_terminal());
        assert!(!WorkerState::Created.is_terminal());
    }

    #[cfg(not(feature = "strict-debug"))]
    #[test]
    fn worker_cannot_skip_the_barrier() {
        let err = validate_transition(WorkerState::Started, WorkerState::Released).unwrap_err();
        assert_eq!(
            err,
            StateMachineError::IllegalTransition {
                machine: "worker",
                from: "Started",
                to: "Released",
            }
        );
    }

    #[test]
    fn rethrow_chain_is_valid() {
        use ErrorState::*;
        let chain = [NoError, Raised, Caught, Rethrown, Raised, Caught];
        assert!(validate_history(&chain).is_ok());
    }

    #[cfg(not(feature = "strict-debug"))]
    #[test]
    fn caught_error_cannot_be_raised_again_directly() {
        assert!(validate_transition(ErrorState::Caught, ErrorState::Raised).is_err());
    }

    #[cfg(feature = "strict-debug")]
    #[test]
    #[should_panic(expected = "Illegal worker transition attempted: Started -> Released")]
    fn strict_debug_panics_on_skipped_barrier() {
        let _ = validate_transition(WorkerState::Started, WorkerState::Released);
    }

    #[cfg(feature = "strict-debug")]
    #[test]
    #[should_panic(expected = "Illegal error transition attempted")]
    fn strict_debug_panics_on_bad_history() {
        let _ = validate_history(&[ErrorState::NoError, ErrorState::Caught]);
    }
}
