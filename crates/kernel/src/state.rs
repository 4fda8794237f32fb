use serde::{Deserialize, Serialize};

/// Process-wide game flags, owned by the session instead of living in globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u32,
    /// The hero touched the ground during the most recent physics tick.
    pub grounded: bool,
    /// No round is running. Also the initial "not started" state.
    pub game_over: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            grounded: false,
            game_over: true,
        }
    }
}

impl GameState {
    pub fn is_running(&self) -> bool {
        !self.game_over
    }

    /// Text shown by the score label.
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.score)
    }
}
