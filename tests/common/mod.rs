//! Small games shared by the integration tests.

#![allow(dead_code)]

use mcts_uct::game::{Game, GameError, REWARD_DRAW, REWARD_LOSS, REWARD_WIN};
use mcts_uct::mcts::MonteCarloTreeSearch;
use mcts_uct::random::SeededRandomGenerator;
use mcts_uct::rollout::UniformRollout;

pub fn seeded_engine(seed: u64) -> MonteCarloTreeSearch<UniformRollout, SeededRandomGenerator> {
    MonteCarloTreeSearch::builder()
        .with_seed(seed)
        .build()
        .unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Keep,
    Pass,
    Win,
    Lose,
    Left,
    Right,
}

/// A game where `A` may keep the turn.
///
/// `Keep` gives `A` a second move that either wins or loses. `Pass` hands
/// the turn to `B`, and every move of `B` ends in a draw. Correct play is
/// `Keep` then `Win`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraTurn {
    Start,
    Again,
    Passed,
    Over(Option<Side>),
}

impl Game for ExtraTurn {
    type Move = Choice;
    type Player = Side;

    fn player_to_move(&self) -> Side {
        match self {
            ExtraTurn::Start | ExtraTurn::Again => Side::A,
            ExtraTurn::Passed | ExtraTurn::Over(_) => Side::B,
        }
    }

    fn legal_moves(&self) -> Result<Vec<Choice>, GameError> {
        Ok(match self {
            ExtraTurn::Start => vec![Choice::Keep, Choice::Pass],
            ExtraTurn::Again => vec![Choice::Win, Choice::Lose],
            ExtraTurn::Passed => vec![Choice::Left, Choice::Right],
            ExtraTurn::Over(_) => Vec::new(),
        })
    }

    fn apply(&self, mv: &Choice) -> Result<Self, GameError> {
        match (self, mv) {
            (ExtraTurn::Start, Choice::Keep) => Ok(ExtraTurn::Again),
            (ExtraTurn::Start, Choice::Pass) => Ok(ExtraTurn::Passed),
            (ExtraTurn::Again, Choice::Win) => Ok(ExtraTurn::Over(Some(Side::A))),
            (ExtraTurn::Again, Choice::Lose) => Ok(ExtraTurn::Over(Some(Side::B))),
            (ExtraTurn::Passed, Choice::Left | Choice::Right) => Ok(ExtraTurn::Over(None)),
            _ => Err(GameError::IllegalMove(format!("{mv:?} in {self:?}"))),
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, ExtraTurn::Over(_))
    }

    fn reward(&self, player: Side) -> f64 {
        match self {
            ExtraTurn::Over(Some(winner)) if *winner == player => REWARD_WIN,
            ExtraTurn::Over(Some(_)) => REWARD_LOSS,
            _ => REWARD_DRAW,
        }
    }
}

/// A game whose move generator always fails.
#[derive(Debug, Clone, Copy)]
pub struct Corrupt;

impl Game for Corrupt {
    type Move = u8;
    type Player = u8;

    fn player_to_move(&self) -> u8 {
        0
    }

    fn legal_moves(&self) -> Result<Vec<u8>, GameError> {
        Err(GameError::InvalidState("board checksum mismatch".into()))
    }

    fn apply(&self, mv: &u8) -> Result<Self, GameError> {
        Err(GameError::IllegalMove(format!("{mv}")))
    }

    fn is_terminal(&self) -> bool {
        false
    }

    fn reward(&self, _player: u8) -> f64 {
        REWARD_DRAW
    }
}

/// A counter game: each move adds 1 or 2, reaching `target` ends the game and
/// the player who reached it wins. Deep enough to exercise long playouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Race {
    pub total: u32,
    pub target: u32,
    pub to_move: Side,
}

impl Race {
    pub fn new(target: u32) -> Self {
        Self {
            total: 0,
            target,
            to_move: Side::A,
        }
    }
}

impl Game for Race {
    type Move = u32;
    type Player = Side;

    fn player_to_move(&self) -> Side {
        self.to_move
    }

    fn legal_moves(&self) -> Result<Vec<u32>, GameError> {
        Ok((1..=2).filter(|step| self.total + step <= self.target).collect())
    }

    fn apply(&self, mv: &u32) -> Result<Self, GameError> {
        if !(1..=2).contains(mv) || self.total + mv > self.target {
            return Err(GameError::IllegalMove(format!("step {mv} from {}", self.total)));
        }
        Ok(Self {
            total: self.total + mv,
            target: self.target,
            to_move: match self.to_move {
                Side::A => Side::B,
                Side::B => Side::A,
            },
        })
    }

    fn is_terminal(&self) -> bool {
        self.total >= self.target
    }

    fn reward(&self, player: Side) -> f64 {
        // The player to move did not reach the target.
        if player == self.to_move { REWARD_LOSS } else { REWARD_WIN }
    }
}

/// `A` either settles for a draw or springs a trap. After the trap `B` has
/// `replies` moves: all but the first lose for `B`, the first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trap {
    pub replies: u32,
    pub stage: TrapStage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapStage {
    Start,
    Sprung,
    Over(Option<Side>),
}

/// `Settle` and `Spring` are `A`'s moves, `Reply(i)` are `B`'s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapMove {
    Settle,
    Spring,
    Reply(u32),
}

impl Trap {
    pub fn new(replies: u32) -> Self {
        Self {
            replies,
            stage: TrapStage::Start,
        }
    }

    fn with_stage(self, stage: TrapStage) -> Self {
        Self { stage, ..self }
    }
}

impl Game for Trap {
    type Move = TrapMove;
    type Player = Side;

    fn player_to_move(&self) -> Side {
        match self.stage {
            TrapStage::Sprung => Side::B,
            _ => Side::A,
        }
    }

    fn legal_moves(&self) -> Result<Vec<TrapMove>, GameError> {
        Ok(match self.stage {
            TrapStage::Start => vec![TrapMove::Spring, TrapMove::Settle],
            TrapStage::Sprung => (0..self.replies).map(TrapMove::Reply).collect(),
            TrapStage::Over(_) => Vec::new(),
        })
    }

    fn apply(&self, mv: &TrapMove) -> Result<Self, GameError> {
        match (self.stage, *mv) {
            (TrapStage::Start, TrapMove::Settle) => Ok(self.with_stage(TrapStage::Over(None))),
            (TrapStage::Start, TrapMove::Spring) => Ok(self.with_stage(TrapStage::Sprung)),
            (TrapStage::Sprung, TrapMove::Reply(0)) => {
                Ok(self.with_stage(TrapStage::Over(Some(Side::B))))
            }
            (TrapStage::Sprung, TrapMove::Reply(i)) if i < self.replies => {
                Ok(self.with_stage(TrapStage::Over(Some(Side::A))))
            }
            _ => Err(GameError::IllegalMove(format!("{mv:?} in {self:?}"))),
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.stage, TrapStage::Over(_))
    }

    fn reward(&self, player: Side) -> f64 {
        match self.stage {
            TrapStage::Over(Some(winner)) if winner == player => REWARD_WIN,
            TrapStage::Over(Some(_)) => REWARD_LOSS,
            _ => REWARD_DRAW,
        }
    }
}
