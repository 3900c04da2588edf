use std::fmt;

use crate::game::{Game, GameError, REWARD_DRAW, REWARD_LOSS, REWARD_WIN};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// An implementation of the `Game` trait for Tic-Tac-Toe.
///
/// The board is represented by a 9-element array, where each element corresponds to a cell:
///
/// ```text
/// 0 1 2
/// 3 4 5
/// 6 7 8
/// ```
///
/// A move is a `u8` from 0 to 8. `X` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToe {
    current_player: Mark,
    field: [Option<Mark>; 9],
    winner: Option<Mark>,
}

/// The two players of Tic-Tac-Toe.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl Default for TicTacToe {
    /// An empty board with `X` to move.
    fn default() -> Self {
        Self {
            current_player: Mark::X,
            field: [None; 9],
            winner: None,
        }
    }
}

impl TicTacToe {
    /// Replays `moves` from the empty board.
    pub fn from_moves(moves: &[u8]) -> Result<Self, GameError> {
        moves
            .iter()
            .try_fold(TicTacToe::default(), |board, mv| board.apply(mv))
    }

    /// The mark in `cell`, if any.
    pub fn cell(&self, cell: usize) -> Option<Mark> {
        self.field.get(cell).copied().flatten()
    }

    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    fn find_winner(field: &[Option<Mark>; 9]) -> Option<Mark> {
        LINES.iter().find_map(|&[a, b, c]| match field[a] {
            Some(mark) if field[b] == Some(mark) && field[c] == Some(mark) => Some(mark),
            _ => None,
        })
    }
}

impl Game for TicTacToe {
    type Move = u8;
    type Player = Mark;

    fn player_to_move(&self) -> Mark {
        self.current_player
    }

    fn legal_moves(&self) -> Result<Vec<u8>, GameError> {
        if self.is_terminal() {
            return Ok(Vec::new());
        }

        Ok(self
            .field
            .iter()
            .enumerate()
            .filter(|(_, x)| x.is_none())
            .map(|(i, _)| i as u8)
            .collect())
    }

    fn apply(&self, mv: &u8) -> Result<Self, GameError> {
        let cell = *mv as usize;
        if self.is_terminal() {
            return Err(GameError::IllegalMove(format!("cell {mv}: game is over")));
        }
        match self.field.get(cell) {
            Some(None) => {}
            Some(Some(_)) => {
                return Err(GameError::IllegalMove(format!("cell {mv} is taken")));
            }
            None => return Err(GameError::IllegalMove(format!("cell {mv} is off the board"))),
        }

        let mut field = self.field;
        field[cell] = Some(self.current_player);
        Ok(Self {
            current_player: self.current_player.opponent(),
            winner: Self::find_winner(&field),
            field,
        })
    }

    fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.field.iter().all(|x| x.is_some())
    }

    fn reward(&self, player: Mark) -> f64 {
        match self.winner {
            Some(mark) if mark == player => REWARD_WIN,
            Some(_) => REWARD_LOSS,
            None => REWARD_DRAW,
        }
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.field.iter().enumerate() {
            let c = match cell {
                None => '.',
                Some(Mark::X) => 'X',
                Some(Mark::O) => 'O',
            };
            write!(f, "{c}")?;
            if i % 3 == 2 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_row_win() {
        // X X X
        // O O .
        // . . .
        let board = TicTacToe::from_moves(&[0, 3, 1, 4, 2]).unwrap();
        assert!(board.is_terminal());
        assert_eq!(board.winner(), Some(Mark::X));
        assert_eq!(board.reward(Mark::X), REWARD_WIN);
        assert_eq!(board.reward(Mark::O), REWARD_LOSS);
        assert!(board.legal_moves().unwrap().is_empty());
    }

    #[test]
    fn full_board_without_line_is_draw() {
        // X O X
        // X O O
        // O X X
        let board = TicTacToe::from_moves(&[0, 1, 2, 4, 3, 5, 7, 6, 8]).unwrap();
        assert!(board.is_terminal());
        assert_eq!(board.winner(), None);
        assert_eq!(board.reward(Mark::X), REWARD_DRAW);
    }

    #[test]
    fn rejects_taken_and_out_of_range_cells() {
        let board = TicTacToe::from_moves(&[4]).unwrap();
        assert!(matches!(board.apply(&4), Err(GameError::IllegalMove(_))));
        assert!(matches!(board.apply(&9), Err(GameError::IllegalMove(_))));
    }

    #[test]
    fn alternates_players() {
        let board = TicTacToe::default();
        assert_eq!(board.player_to_move(), Mark::X);
        let board = board.apply(&0).unwrap();
        assert_eq!(board.player_to_move(), Mark::O);
        assert_eq!(board.cell(0), Some(Mark::X));
        assert_eq!(board.legal_moves().unwrap().len(), 8);
    }

    #[test]
    fn renders_board() {
        let board = TicTacToe::from_moves(&[4, 0]).unwrap();
        assert_eq!(board.to_string(), "O..\n.X.\n...\n");
    }
}
