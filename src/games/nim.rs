use crate::game::{Game, GameError, REWARD_LOSS, REWARD_WIN};

/// The game of Nim with a single pile.
///
/// Players alternately take one, two or three chips. Whoever takes the last
/// chip wins, so any pile that is a multiple of four is lost for the player
/// to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nim {
    chips: u32,
    to_move: NimPlayer,
}

/// The two sides of a Nim game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NimPlayer {
    First,
    Second,
}

impl NimPlayer {
    pub fn opponent(self) -> Self {
        match self {
            NimPlayer::First => NimPlayer::Second,
            NimPlayer::Second => NimPlayer::First,
        }
    }
}

impl Nim {
    /// A pile of `chips` with [`NimPlayer::First`] to move.
    pub fn new(chips: u32) -> Self {
        Self {
            chips,
            to_move: NimPlayer::First,
        }
    }

    pub fn chips(&self) -> u32 {
        self.chips
    }
}

impl Game for Nim {
    type Move = u32;
    type Player = NimPlayer;

    fn player_to_move(&self) -> NimPlayer {
        self.to_move
    }

    fn legal_moves(&self) -> Result<Vec<u32>, GameError> {
        Ok((1..=self.chips.min(3)).collect())
    }

    fn apply(&self, mv: &u32) -> Result<Self, GameError> {
        if *mv == 0 || *mv > 3 || *mv > self.chips {
            return Err(GameError::IllegalMove(format!(
                "cannot take {mv} chips from a pile of {}",
                self.chips
            )));
        }
        Ok(Self {
            chips: self.chips - mv,
            to_move: self.to_move.opponent(),
        })
    }

    fn is_terminal(&self) -> bool {
        self.chips == 0
    }

    fn reward(&self, player: NimPlayer) -> f64 {
        // The player to move at an empty pile did not take the last chip.
        if player == self.to_move {
            REWARD_LOSS
        } else {
            REWARD_WIN
        }
    }
}
