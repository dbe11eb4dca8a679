//! Round State Machine
//!
//! Owns the match phase. Every phase change goes through `RoundFsm::transition`,
//! which rejects actions that are not valid from the current phase.

use crate::components::Player;
use crate::params::Params;

/// Match phase, with the data that only exists while in that phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Physics frozen, serve indicator shown; counts down in whole seconds
    Countdown { remaining: u8 },
    Playing,
    /// Scorer types a prompt; `waiting` is set once it went to the gateway
    AwaitingReconfiguration {
        scorer: Player,
        prompt: String,
        waiting: bool,
    },
    GameOver { winner: Player },
}

/// Data-free view of `Phase`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Countdown,
    Playing,
    AwaitingReconfiguration,
    WaitingForGateway,
    GameOver,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Countdown { .. } => PhaseKind::Countdown,
            Phase::Playing => PhaseKind::Playing,
            Phase::AwaitingReconfiguration { waiting: false, .. } => {
                PhaseKind::AwaitingReconfiguration
            }
            Phase::AwaitingReconfiguration { waiting: true, .. } => PhaseKind::WaitingForGateway,
            Phase::GameOver { .. } => PhaseKind::GameOver,
        }
    }
}

/// Actions that trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    CountdownDone,
    Scored(Player),
    MatchWon(Player),
    Submit,
    ReconfigFinished,
    Restart,
}

/// Result of a transition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionResult {
    pub success: bool,
    pub from: PhaseKind,
    pub to: PhaseKind,
    pub action: GameAction,
}

/// Round Finite State Machine
#[derive(Debug, Clone)]
pub struct RoundFsm {
    phase: Phase,
    countdown_seconds: u8,
}

impl RoundFsm {
    pub fn new() -> Self {
        Self::with_countdown(Params::COUNTDOWN_SECONDS)
    }

    pub fn with_countdown(countdown_seconds: u8) -> Self {
        Self {
            phase: Phase::Countdown {
                remaining: countdown_seconds,
            },
            countdown_seconds,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn can_transition(&self, action: GameAction) -> bool {
        self.next_phase(action).is_some()
    }

    /// Attempt a transition
    pub fn transition(&mut self, action: GameAction) -> TransitionResult {
        let from = self.kind();

        match self.next_phase(action) {
            Some(next) => {
                self.phase = next;
                TransitionResult {
                    success: true,
                    from,
                    to: self.kind(),
                    action,
                }
            }
            None => TransitionResult {
                success: false,
                from,
                to: from,
                action,
            },
        }
    }

    fn countdown(&self) -> Phase {
        Phase::Countdown {
            remaining: self.countdown_seconds,
        }
    }

    /// Get next phase for a given action (if valid)
    fn next_phase(&self, action: GameAction) -> Option<Phase> {
        match (&self.phase, action) {
            (Phase::Countdown { remaining: 0 }, GameAction::CountdownDone) => Some(Phase::Playing),

            (Phase::Playing, GameAction::Scored(scorer)) => Some(Phase::AwaitingReconfiguration {
                scorer,
                prompt: String::new(),
                waiting: false,
            }),
            (Phase::Playing, GameAction::MatchWon(winner)) => Some(Phase::GameOver { winner }),

            (
                Phase::AwaitingReconfiguration {
                    scorer,
                    prompt,
                    waiting: false,
                },
                GameAction::Submit,
            ) => Some(Phase::AwaitingReconfiguration {
                scorer: *scorer,
                prompt: prompt.clone(),
                waiting: true,
            }),
            (Phase::AwaitingReconfiguration { waiting: true, .. }, GameAction::ReconfigFinished) => {
                Some(self.countdown())
            }

            (Phase::GameOver { .. }, GameAction::Restart) => Some(self.countdown()),

            // Invalid transition
            _ => None,
        }
    }

    /// One real second elapsed during the countdown. Returns true at zero.
    pub fn countdown_second(&mut self) -> bool {
        match &mut self.phase {
            Phase::Countdown { remaining } => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            _ => false,
        }
    }

    /// Append a printable character to the prompt being typed
    pub fn push_char(&mut self, c: char) -> bool {
        match &mut self.phase {
            Phase::AwaitingReconfiguration {
                prompt,
                waiting: false,
                ..
            } if !c.is_control() => {
                prompt.push(c);
                true
            }
            _ => false,
        }
    }

    /// Remove the last character of the prompt being typed
    pub fn backspace(&mut self) -> bool {
        match &mut self.phase {
            Phase::AwaitingReconfiguration {
                prompt,
                waiting: false,
                ..
            } => prompt.pop().is_some(),
            _ => false,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.phase, Phase::Playing)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }
}

impl Default for RoundFsm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish_countdown(fsm: &mut RoundFsm) {
        while !fsm.countdown_second() {}
        assert!(fsm.transition(GameAction::CountdownDone).success);
    }

    #[test]
    fn test_initial_state() {
        let fsm = RoundFsm::new();
        assert_eq!(fsm.phase(), &Phase::Countdown { remaining: 3 });
        assert_eq!(fsm.kind(), PhaseKind::Countdown);
    }

    #[test]
    fn test_countdown_must_reach_zero() {
        let mut fsm = RoundFsm::new();
        assert!(!fsm.can_transition(GameAction::CountdownDone));
        assert!(!fsm.countdown_second());
        assert!(!fsm.countdown_second());
        assert!(fsm.countdown_second());
        let result = fsm.transition(GameAction::CountdownDone);
        assert!(result.success);
        assert_eq!(result.from, PhaseKind::Countdown);
        assert_eq!(result.to, PhaseKind::Playing);
    }

    #[test]
    fn test_invalid_transition() {
        let mut fsm = RoundFsm::new();
        let result = fsm.transition(GameAction::Restart);
        assert!(!result.success);
        assert_eq!(result.to, PhaseKind::Countdown);
        assert_eq!(fsm.kind(), PhaseKind::Countdown);
    }

    #[test]
    fn test_round_flow() {
        let mut fsm = RoundFsm::new();
        finish_countdown(&mut fsm);

        fsm.transition(GameAction::Scored(Player::Two));
        assert_eq!(fsm.kind(), PhaseKind::AwaitingReconfiguration);

        assert!(fsm.push_char('h'));
        assert!(fsm.push_char('i'));
        assert!(!fsm.push_char('\n'), "control characters are dropped");
        assert!(fsm.push_char('!'));
        assert!(fsm.backspace());

        fsm.transition(GameAction::Submit);
        assert_eq!(
            fsm.phase(),
            &Phase::AwaitingReconfiguration {
                scorer: Player::Two,
                prompt: "hi".to_string(),
                waiting: true
            }
        );
        assert!(!fsm.push_char('x'), "prompt is frozen while waiting");
        assert!(!fsm.can_transition(GameAction::Submit));

        fsm.transition(GameAction::ReconfigFinished);
        assert_eq!(fsm.phase(), &Phase::Countdown { remaining: 3 });
    }

    #[test]
    fn test_game_over_only_accepts_restart() {
        let mut fsm = RoundFsm::with_countdown(1);
        finish_countdown(&mut fsm);
        fsm.transition(GameAction::MatchWon(Player::One));
        assert!(fsm.is_game_over());

        assert!(!fsm.transition(GameAction::Submit).success);
        assert!(!fsm.transition(GameAction::Scored(Player::Two)).success);
        assert!(fsm.transition(GameAction::Restart).success);
        assert_eq!(fsm.phase(), &Phase::Countdown { remaining: 1 });
    }

    #[test]
    fn test_backspace_on_empty_prompt() {
        let mut fsm = RoundFsm::with_countdown(1);
        finish_countdown(&mut fsm);
        fsm.transition(GameAction::Scored(Player::One));
        assert!(!fsm.backspace());
    }
}
