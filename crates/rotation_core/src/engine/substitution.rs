use super::{ActionRecord, GameEngine};
use crate::error::{EngineError, Result};
use crate::models::player::{StintRecord, StintStart};
use crate::models::quintet::QuintetKey;

impl GameEngine {
    /// Swaps `outgoing_id` off the court for `incoming_id`, in order:
    ///
    /// 1. close the outgoing player's stint (duration and plus-minus diffed
    ///    against the context captured when it opened),
    /// 2. open the incoming player's stint at the current score and clock,
    /// 3. close the open quintet interval,
    /// 4. open a new quintet interval keyed by the updated on-court five,
    /// 5. bump the current quarter's substitution counter.
    ///
    /// Preconditions: the outgoing player is on court, the incoming player is
    /// not. Violations fail with [`EngineError::InvalidSubstitution`] and the
    /// engine is left untouched.
    pub fn substitute(&mut self, outgoing_id: u32, incoming_id: u32) -> Result<()> {
        self.ensure_in_progress()?;

        if outgoing_id == incoming_id {
            return Err(EngineError::InvalidSubstitution {
                reason: format!("player {} cannot replace themselves", outgoing_id),
            });
        }
        let out_idx = self.index_of(outgoing_id)?;
        let in_idx = self.index_of(incoming_id)?;

        if !self.players[out_idx].on_court {
            return Err(EngineError::InvalidSubstitution {
                reason: format!("outgoing player {} is not on court", outgoing_id),
            });
        }
        if self.players[in_idx].on_court {
            return Err(EngineError::InvalidSubstitution {
                reason: format!("incoming player {} is already on court", incoming_id),
            });
        }
        let Some(prior_stint_start) = self.players[out_idx].current_stint else {
            return Err(EngineError::InvalidSubstitution {
                reason: format!("outgoing player {} has no open stint", outgoing_id),
            });
        };
        let prior_open_quintet = self.quintets.open;

        self.apply_substitution(Some(out_idx), in_idx);

        self.history.push(ActionRecord::Substitution {
            outgoing_id,
            incoming_id,
            prior_stint_start,
            prior_open_quintet,
            quarter: self.game.current_quarter,
        });
        log::debug!(
            "game {}: substitution {} -> {} at {}s",
            self.game_id,
            outgoing_id,
            incoming_id,
            self.game.clock.total_elapsed
        );
        Ok(())
    }

    /// Shared substitution effect. `outgoing` is `None` for the synthetic
    /// lineup events at game start, which only bring a player on.
    pub(crate) fn apply_substitution(&mut self, outgoing: Option<usize>, incoming: usize) {
        let now = self.game.clock.total_elapsed;
        let our = self.game.our_score;
        let rival = self.game.rival_score;

        if let Some(out_idx) = outgoing {
            let player = &mut self.players[out_idx];
            if let Some(start) = player.current_stint.take() {
                player.stints.push(StintRecord {
                    duration_secs: now.saturating_sub(start.clock_seconds),
                    plus_minus: (our as i32 - start.our_score as i32)
                        - (rival as i32 - start.rival_score as i32),
                });
            }
            player.on_court = false;
        }

        let player = &mut self.players[incoming];
        player.on_court = true;
        player.current_stint =
            Some(StintStart { our_score: our, rival_score: rival, clock_seconds: now });

        // Roll the quintet interval: close the running one against the same
        // score/clock context, then key a fresh one off the new five. While
        // the lineup is still being seeded there are fewer than five players
        // on court and no interval opens.
        self.quintets.close_open(our, rival, now);
        if let Some(key) = QuintetKey::from_on_court(&self.players) {
            self.quintets.open_interval(key, our, rival, now);
        }

        self.game.count_substitution();
    }
}
