use serde::{Deserialize, Serialize};

/// Lifecycle of a run. Only `Playing` advances the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Content loaded, waiting for the first start.
    #[default]
    Ready,
    Playing,
    Paused,
    /// Health reached zero. Terminal until restart.
    Ended,
}

impl GamePhase {
    pub fn is_active(self) -> bool {
        self == GamePhase::Playing
    }

    pub fn is_terminal(self) -> bool {
        self == GamePhase::Ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_playing_is_active() {
        assert!(GamePhase::Playing.is_active());
        assert!(!GamePhase::Ready.is_active());
        assert!(!GamePhase::Paused.is_active());
        assert!(!GamePhase::Ended.is_active());
        assert!(GamePhase::Ended.is_terminal());
        assert_eq!(GamePhase::default(), GamePhase::Ready);
    }
}
