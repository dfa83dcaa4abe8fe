//! GamePhase enum - the session state machine.
//!
//! A game session walks a strictly linear path from idle to the final
//! report. Transitions are monotonic: there is no way back to an earlier
//! phase, and `ReportReady` is terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle phase of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Session object exists but the visitor has not started playing.
    Idle,
    /// Visitor is choosing the game mode.
    ModeSelect,
    /// Visitor is choosing their business vertical.
    NicheSelect,
    /// Visitor is entering company name and optional site URL.
    CompanyInfo,
    /// The multi-turn assistant conversation is running.
    Conversation,
    /// Report synthesis has been requested.
    GeneratingReport,
    /// A validated report is attached. Terminal.
    ReportReady,
}

impl GamePhase {
    /// Returns all phases in lifecycle order.
    pub fn all() -> &'static [GamePhase] {
        &[
            GamePhase::Idle,
            GamePhase::ModeSelect,
            GamePhase::NicheSelect,
            GamePhase::CompanyInfo,
            GamePhase::Conversation,
            GamePhase::GeneratingReport,
            GamePhase::ReportReady,
        ]
    }

    /// Returns the wire name (matches the JSON representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "idle",
            GamePhase::ModeSelect => "mode_select",
            GamePhase::NicheSelect => "niche_select",
            GamePhase::CompanyInfo => "company_info",
            GamePhase::Conversation => "conversation",
            GamePhase::GeneratingReport => "generating_report",
            GamePhase::ReportReady => "report_ready",
        }
    }

    /// Returns true once the session has produced its report.
    pub fn is_completed(&self) -> bool {
        matches!(self, GamePhase::ReportReady)
    }

    /// Returns true while the session can accept conversation turns.
    pub fn accepts_turns(&self) -> bool {
        matches!(self, GamePhase::Conversation)
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        GamePhase::Idle
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StateMachine for GamePhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use GamePhase::*;
        matches!(
            (self, target),
            (Idle, ModeSelect)
                | (ModeSelect, NicheSelect)
                | (NicheSelect, CompanyInfo)
                | (CompanyInfo, Conversation)
                | (Conversation, GeneratingReport)
                | (GeneratingReport, ReportReady)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use GamePhase::*;
        match self {
            Idle => vec![ModeSelect],
            ModeSelect => vec![NicheSelect],
            NicheSelect => vec![CompanyInfo],
            CompanyInfo => vec![Conversation],
            Conversation => vec![GeneratingReport],
            GeneratingReport => vec![ReportReady],
            ReportReady => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod ordering {
        use super::*;

        #[test]
        fn all_returns_7_phases_in_lifecycle_order() {
            let all = GamePhase::all();
            assert_eq!(all.len(), 7);
            assert_eq!(all[0], GamePhase::Idle);
            assert_eq!(all[6], GamePhase::ReportReady);
        }

        #[test]
        fn default_phase_is_idle() {
            assert_eq!(GamePhase::default(), GamePhase::Idle);
        }
    }

    mod transitions {
        use super::*;

        #[test]
        fn each_phase_advances_to_exactly_one_successor() {
            for phase in GamePhase::all() {
                let next = phase.valid_transitions();
                if *phase == GamePhase::ReportReady {
                    assert!(next.is_empty());
                } else {
                    assert_eq!(next.len(), 1, "{:?} should have one successor", phase);
                }
            }
        }

        #[test]
        fn full_lifecycle_walk_succeeds() {
            let mut phase = GamePhase::Idle;
            for target in [
                GamePhase::ModeSelect,
                GamePhase::NicheSelect,
                GamePhase::CompanyInfo,
                GamePhase::Conversation,
                GamePhase::GeneratingReport,
                GamePhase::ReportReady,
            ] {
                phase = phase.transition_to(target).unwrap();
            }
            assert_eq!(phase, GamePhase::ReportReady);
        }

        #[test]
        fn skipping_ahead_is_rejected() {
            assert!(GamePhase::Idle.transition_to(GamePhase::Conversation).is_err());
            assert!(GamePhase::ModeSelect.transition_to(GamePhase::CompanyInfo).is_err());
            assert!(GamePhase::Conversation.transition_to(GamePhase::ReportReady).is_err());
        }

        #[test]
        fn regressing_is_rejected() {
            assert!(GamePhase::Conversation.transition_to(GamePhase::ModeSelect).is_err());
            assert!(GamePhase::ReportReady.transition_to(GamePhase::Conversation).is_err());
            assert!(GamePhase::NicheSelect.transition_to(GamePhase::Idle).is_err());
        }

        #[test]
        fn self_transition_is_rejected() {
            for phase in GamePhase::all() {
                assert!(!phase.can_transition_to(phase));
            }
        }

        #[test]
        fn report_ready_is_terminal() {
            assert!(GamePhase::ReportReady.is_terminal());
            assert!(!GamePhase::Conversation.is_terminal());
        }
    }

    mod predicates {
        use super::*;

        #[test]
        fn only_report_ready_is_completed() {
            for phase in GamePhase::all() {
                assert_eq!(phase.is_completed(), *phase == GamePhase::ReportReady);
            }
        }

        #[test]
        fn only_conversation_accepts_turns() {
            for phase in GamePhase::all() {
                assert_eq!(phase.accepts_turns(), *phase == GamePhase::Conversation);
            }
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn phase_serializes_snake_case() {
            assert_eq!(
                serde_json::to_string(&GamePhase::ModeSelect).unwrap(),
                "\"mode_select\""
            );
            assert_eq!(
                serde_json::to_string(&GamePhase::GeneratingReport).unwrap(),
                "\"generating_report\""
            );
        }

        #[test]
        fn phase_deserializes_from_snake_case() {
            let phase: GamePhase = serde_json::from_str("\"report_ready\"").unwrap();
            assert_eq!(phase, GamePhase::ReportReady);
        }

        #[test]
        fn as_str_matches_serde_representation() {
            for phase in GamePhase::all() {
                let json = serde_json::to_string(phase).unwrap();
                assert_eq!(json, format!("\"{}\"", phase.as_str()));
            }
        }
    }
}
