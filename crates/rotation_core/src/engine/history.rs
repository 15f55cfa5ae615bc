use serde::{Deserialize, Serialize};

use super::{GameEngine, Side};
use crate::models::player::StintStart;
use crate::models::quintet::OpenQuintet;

/// Inverse record for one applied action.
///
/// Each variant carries exactly the pre-action fields needed to reverse that
/// action verbatim; nothing is recomputed on undo. This bounds undo-log
/// memory to a few words per action over a long game, instead of a full
/// engine copy per action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ActionRecord {
    Substitution {
        outgoing_id: u32,
        incoming_id: u32,
        /// The outgoing player's open-stint context before it was closed.
        prior_stint_start: StintStart,
        /// The open quintet as it stood before the substitution rolled it.
        prior_open_quintet: Option<OpenQuintet>,
        /// Quarter whose substitution counter the action incremented.
        quarter: u8,
    },
    ScoreChange {
        side: Side,
        amount: u16,
        scorer_id: Option<u32>,
    },
    FoulAdded {
        player_id: u32,
    },
    QuarterAdvanced {
        prior_quarter_elapsed: u32,
        prior_running: bool,
    },
    ManualEdit {
        prior_our_score: u16,
        prior_rival_score: u16,
    },
}

/// Result of an undo request. An empty history is an advisory no-op, not an
/// error: there is nothing inconsistent about having nothing to unwind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Undone,
    NothingToUndo,
}

impl GameEngine {
    /// Reverts the most recent action. Strictly single-step and chained:
    /// repeated calls walk further back. There is no redo.
    pub fn undo_last(&mut self) -> UndoOutcome {
        let Some(record) = self.history.pop() else {
            log::debug!("undo requested with empty history");
            return UndoOutcome::NothingToUndo;
        };

        match record {
            ActionRecord::Substitution {
                outgoing_id,
                incoming_id,
                prior_stint_start,
                prior_open_quintet,
                quarter,
            } => {
                if let Some(p) = self.player_mut(incoming_id) {
                    p.on_court = false;
                    p.current_stint = None;
                }
                if let Some(p) = self.player_mut(outgoing_id) {
                    p.stints.pop();
                    p.on_court = true;
                    // Restore the original stint context verbatim rather than
                    // recomputing it from current scores.
                    p.current_stint = Some(prior_stint_start);
                }
                // The substitution closed the then-open interval and opened a
                // new one; discard the new one and re-open the original.
                if prior_open_quintet.is_some() {
                    self.quintets.closed.pop();
                }
                self.quintets.open = prior_open_quintet;
                self.game.uncount_substitution(quarter);
                log::debug!("undid substitution {} -> {}", outgoing_id, incoming_id);
            }
            ActionRecord::ScoreChange { side, amount, scorer_id } => {
                match side {
                    Side::Us => {
                        self.game.our_score = self.game.our_score.saturating_sub(amount)
                    }
                    Side::Rival => {
                        self.game.rival_score = self.game.rival_score.saturating_sub(amount)
                    }
                }
                if let Some(id) = scorer_id {
                    if let Some(p) = self.player_mut(id) {
                        p.points = p.points.saturating_sub(amount);
                    }
                }
            }
            ActionRecord::FoulAdded { player_id } => {
                if let Some(p) = self.player_mut(player_id) {
                    p.fouls = p.fouls.saturating_sub(1);
                }
            }
            ActionRecord::QuarterAdvanced { prior_quarter_elapsed, prior_running } => {
                self.game.current_quarter -= 1;
                self.game.clock.quarter_elapsed = prior_quarter_elapsed;
                self.game.clock.running = prior_running;
            }
            ActionRecord::ManualEdit { prior_our_score, prior_rival_score } => {
                self.game.our_score = prior_our_score;
                self.game.rival_score = prior_rival_score;
            }
        }

        UndoOutcome::Undone
    }
}
