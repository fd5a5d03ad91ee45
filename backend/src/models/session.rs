//! Session ledger
//!
//! Tracks one cash game from seating to tally:
//! - Each player starts with the session buy-in
//! - Top-ups ("add funds") raise a player's total buy-in
//! - At the end every player's chips are counted and recorded as a cash-out
//! - The tally is balanced when total cash-out matches total buy-in
//!
//! A balanced session converts into settlement balances and into a
//! history record for the caller to persist. `player_stats` folds stored
//! history records into per-player totals.

use crate::models::balance::{Balance, PlayerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest buy-in/cash-out mismatch still considered balanced (dollars)
pub const TALLY_TOLERANCE: f64 = 0.01;

/// Errors that can occur during session bookkeeping
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Amount must be finite and non-negative, got {0}")]
    InvalidAmount(f64),

    #[error("Top-up must be positive, got {0}")]
    InvalidTopUp(f64),

    #[error("Player name must not be empty")]
    EmptyName,

    #[error("{missing} player(s) have no recorded cash-out")]
    TallyIncomplete { missing: usize },

    #[error("Tally does not balance: bought in {buy_in:.2}, cashed out {cash_out:.2}")]
    TallyUnbalanced { buy_in: f64, cash_out: f64 },
}

/// One seated player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: PlayerId,
    pub name: String,

    /// Buy-in at seating
    pub initial_buy_in: f64,

    /// Initial buy-in plus all top-ups
    pub total_buy_in: f64,

    /// Chips counted at the end, once recorded
    pub final_amount: Option<f64>,
}

impl PlayerEntry {
    pub fn is_complete(&self) -> bool {
        self.final_amount.is_some()
    }

    /// Cash-out minus total buy-in, once the cash-out is recorded
    pub fn profit_loss(&self) -> Option<f64> {
        self.final_amount.map(|f| f - self.total_buy_in)
    }
}

/// Per-player line of a finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerHistory {
    pub name: String,
    pub initial_buy_in: f64,
    pub total_buy_in: f64,
    pub final_amount: f64,
    pub profit_loss: f64,
}

/// Record of a finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameHistoryEntry {
    pub id: String,
    pub date: String,
    pub players: Vec<PlayerHistory>,
}

impl GameHistoryEntry {
    /// Players with the game's highest profit/loss (every one of them on a tie)
    pub fn winners(&self) -> Vec<&PlayerHistory> {
        let best = self
            .players
            .iter()
            .map(|p| p.profit_loss)
            .fold(f64::NEG_INFINITY, f64::max);
        self.players
            .iter()
            .filter(|p| p.profit_loss == best)
            .collect()
    }
}

/// Career totals for one player name across stored games
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub name: String,
    pub total_profit: f64,
    pub games_played: u32,

    /// Games in which this player was among the winners
    pub wins: u32,
}

/// Aggregate history by player name, in order of first appearance
pub fn player_stats(history: &[GameHistoryEntry]) -> Vec<PlayerStats> {
    let mut stats: Vec<PlayerStats> = Vec::new();

    for game in history {
        let winners = game.winners();
        for player in &game.players {
            let index = match stats.iter().position(|s| s.name == player.name) {
                Some(index) => index,
                None => {
                    stats.push(PlayerStats {
                        name: player.name.clone(),
                        total_profit: 0.0,
                        games_played: 0,
                        wins: 0,
                    });
                    stats.len() - 1
                }
            };

            let entry = &mut stats[index];
            entry.total_profit += player.profit_loss;
            entry.games_played += 1;
            if winners.iter().any(|w| std::ptr::eq(*w, player)) {
                entry.wins += 1;
            }
        }
    }

    stats
}

/// A cash game in progress
///
/// # Example
/// ```
/// use cashgame_core_rs::Session;
///
/// let mut session = Session::start(["alice", "bob"], 20.0).unwrap();
/// let alice = session.players()[0].id.clone();
/// let bob = session.players()[1].id.clone();
///
/// session.add_funds(&bob, 20.0).unwrap();
/// session.record_cash_out(&alice, 45.0).unwrap();
/// session.record_cash_out(&bob, 15.0).unwrap();
///
/// assert!(session.is_tally_balanced());
/// assert_eq!(session.profit(&bob).unwrap(), Some(-25.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    buy_in_amount: f64,
    players: Vec<PlayerEntry>,
    next_seat: u64,
}

impl Session {
    /// Create an empty session with the given default buy-in
    pub fn new(buy_in_amount: f64) -> Result<Self, SessionError> {
        check_amount(buy_in_amount)?;
        Ok(Self {
            buy_in_amount,
            players: Vec::new(),
            next_seat: 0,
        })
    }

    /// Create a session and seat every named player at `buy_in_amount`
    pub fn start<I, S>(names: I, buy_in_amount: f64) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut session = Self::new(buy_in_amount)?;
        for name in names {
            session.add_player(name)?;
        }
        Ok(session)
    }

    pub fn buy_in_amount(&self) -> f64 {
        self.buy_in_amount
    }

    /// Change the buy-in for players seated from now on
    pub fn set_buy_in_amount(&mut self, amount: f64) -> Result<(), SessionError> {
        check_amount(amount)?;
        self.buy_in_amount = amount;
        Ok(())
    }

    pub fn players(&self) -> &[PlayerEntry] {
        &self.players
    }

    pub fn player(&self, id: &str) -> Result<&PlayerEntry, SessionError> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| SessionError::UnknownPlayer(id.to_string()))
    }

    fn player_mut(&mut self, id: &str) -> Result<&mut PlayerEntry, SessionError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| SessionError::UnknownPlayer(id.to_string()))
    }

    /// Seat a player at the current buy-in; returns the new player's id
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, SessionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SessionError::EmptyName);
        }
        self.next_seat += 1;
        let id = format!("player-{}", self.next_seat);
        self.players.push(PlayerEntry {
            id: id.clone(),
            name,
            initial_buy_in: self.buy_in_amount,
            total_buy_in: self.buy_in_amount,
            final_amount: None,
        });
        Ok(id)
    }

    pub fn remove_player(&mut self, id: &str) -> Result<PlayerEntry, SessionError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| SessionError::UnknownPlayer(id.to_string()))?;
        Ok(self.players.remove(index))
    }

    /// Mid-game top-up
    pub fn add_funds(&mut self, id: &str, amount: f64) -> Result<(), SessionError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(SessionError::InvalidTopUp(amount));
        }
        self.player_mut(id)?.total_buy_in += amount;
        Ok(())
    }

    /// Record the chips a player walked away with
    pub fn record_cash_out(&mut self, id: &str, amount: f64) -> Result<(), SessionError> {
        check_amount(amount)?;
        self.player_mut(id)?.final_amount = Some(amount);
        Ok(())
    }

    /// Forget every recorded cash-out so the tally can start over
    pub fn reset_tally(&mut self) {
        for player in &mut self.players {
            player.final_amount = None;
        }
    }

    pub fn total_buy_in(&self) -> f64 {
        self.players.iter().map(|p| p.total_buy_in).sum()
    }

    /// Sum of recorded cash-outs (players not yet tallied count as zero)
    pub fn total_cash_out(&self) -> f64 {
        self.players.iter().filter_map(|p| p.final_amount).sum()
    }

    pub fn is_tally_balanced(&self) -> bool {
        (self.total_buy_in() - self.total_cash_out()).abs() < TALLY_TOLERANCE
    }

    /// Every player tallied and the totals balance
    pub fn all_players_complete(&self) -> bool {
        !self.players.is_empty()
            && self.players.iter().all(PlayerEntry::is_complete)
            && self.is_tally_balanced()
    }

    pub fn profit(&self, id: &str) -> Result<Option<f64>, SessionError> {
        Ok(self.player(id)?.profit_loss())
    }

    /// Net balances of tallied players, keyed by player id
    pub fn balances(&self) -> Vec<Balance> {
        self.players
            .iter()
            .filter_map(|p| p.profit_loss().map(|pl| Balance::new(p.id.clone(), pl)))
            .collect()
    }

    /// Check the tally is complete and balanced
    pub fn verify_tally(&self) -> Result<(), SessionError> {
        let missing = self.players.iter().filter(|p| !p.is_complete()).count();
        if missing > 0 {
            return Err(SessionError::TallyIncomplete { missing });
        }
        if !self.is_tally_balanced() {
            return Err(SessionError::TallyUnbalanced {
                buy_in: self.total_buy_in(),
                cash_out: self.total_cash_out(),
            });
        }
        Ok(())
    }

    /// Snapshot the finished game for the caller's history store
    pub fn history_entry(
        &self,
        id: impl Into<String>,
        date: impl Into<String>,
    ) -> Result<GameHistoryEntry, SessionError> {
        self.verify_tally()?;

        let players = self
            .players
            .iter()
            .map(|p| {
                let final_amount = p.final_amount.unwrap_or_default();
                PlayerHistory {
                    name: p.name.clone(),
                    initial_buy_in: p.initial_buy_in,
                    total_buy_in: p.total_buy_in,
                    final_amount,
                    profit_loss: final_amount - p.total_buy_in,
                }
            })
            .collect();

        Ok(GameHistoryEntry {
            id: id.into(),
            date: date.into(),
            players,
        })
    }
}

fn check_amount(amount: f64) -> Result<(), SessionError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(SessionError::InvalidAmount(amount));
    }
    Ok(())
}
