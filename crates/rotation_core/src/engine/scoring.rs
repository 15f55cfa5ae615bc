use super::{ActionRecord, GameEngine, Side};
use crate::error::{EngineError, Result};

/// Advisory returned by [`GameEngine::add_foul`]. Reaching the configured
/// foul limit is reported, never auto-substituted; the bench decision belongs
/// to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoulOutcome {
    pub fouls: u8,
    pub fouled_out: bool,
}

impl GameEngine {
    /// Adds points to one side of the scoreboard, optionally crediting an
    /// on-roster scorer for our baskets.
    ///
    /// Score changes do not touch the stint or quintet ledgers here: open
    /// intervals read the scores lazily when they close, so a delta is
    /// attributed to whichever stint/quintet is open at the next closing
    /// event. Plus-minus is exact at stint boundaries, not at the moment a
    /// basket lands.
    pub fn add_points(&mut self, side: Side, amount: u16, scorer_id: Option<u32>) -> Result<()> {
        self.ensure_in_progress()?;
        if amount == 0 {
            return Err(EngineError::InvalidScoreChange {
                reason: "amount must be positive".to_string(),
            });
        }
        if side == Side::Rival && scorer_id.is_some() {
            return Err(EngineError::InvalidScoreChange {
                reason: "rival points cannot credit a roster player".to_string(),
            });
        }
        if let Some(id) = scorer_id {
            // Validate before mutating anything.
            self.index_of(id)?;
        }

        match side {
            Side::Us => {
                self.game.our_score += amount;
                if let Some(id) = scorer_id {
                    if let Some(p) = self.player_mut(id) {
                        p.points += amount;
                    }
                }
            }
            Side::Rival => self.game.rival_score += amount,
        }

        self.history.push(ActionRecord::ScoreChange { side, amount, scorer_id });
        log::debug!(
            "game {}: score {}-{}",
            self.game_id,
            self.game.our_score,
            self.game.rival_score
        );
        Ok(())
    }

    /// Increments a player's foul count and reports whether the configured
    /// limit was reached.
    pub fn add_foul(&mut self, player_id: u32) -> Result<FoulOutcome> {
        self.ensure_in_progress()?;
        let limit = self.config.foul_limit;
        let game_id = self.game_id;

        let player = self
            .player_mut(player_id)
            .ok_or(EngineError::UnknownPlayer { id: player_id })?;
        player.fouls += 1;
        let fouls = player.fouls;
        let fouled_out = fouls >= limit;

        self.history.push(ActionRecord::FoulAdded { player_id });
        if fouled_out {
            log::warn!("game {}: player {} reached the foul limit ({})", game_id, player_id, fouls);
        }
        Ok(FoulOutcome { fouls, fouled_out })
    }

    /// Overwrites both team scores, for correcting entry mistakes. The prior
    /// values ride in the inverse record verbatim.
    pub fn edit_score(&mut self, our_score: u16, rival_score: u16) -> Result<()> {
        self.ensure_in_progress()?;

        self.history.push(ActionRecord::ManualEdit {
            prior_our_score: self.game.our_score,
            prior_rival_score: self.game.rival_score,
        });
        self.game.our_score = our_score;
        self.game.rival_score = rival_score;

        log::info!(
            "game {}: manual score edit to {}-{}",
            self.game_id,
            our_score,
            rival_score
        );
        Ok(())
    }
}
