//! Simulation policies: how a game is played out to the end.

use crate::error::SearchError;
use crate::game::{Game, Outcome};
use crate::random::RandomGenerator;

/// Chooses moves during a playout.
pub trait RolloutPolicy<G: Game> {
    /// Returns the index into `moves` of the move to play from `state`.
    ///
    /// `moves` is never empty.
    fn choose<K: RandomGenerator>(
        &mut self,
        state: &G,
        moves: &[G::Move],
        random: &mut K,
    ) -> Result<usize, SearchError>;
}

/// The default policy: every legal move is equally likely.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformRollout;

impl<G: Game> RolloutPolicy<G> for UniformRollout {
    fn choose<K: RandomGenerator>(
        &mut self,
        _state: &G,
        moves: &[G::Move],
        random: &mut K,
    ) -> Result<usize, SearchError> {
        Ok(random.next_index(moves.len()))
    }
}

/// Plays a move that wins on the spot whenever one exists, otherwise
/// behaves like [`UniformRollout`].
///
/// Playouts get much closer to real play at the price of trying every move
/// once per ply.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecisiveRollout;

impl<G: Game> RolloutPolicy<G> for DecisiveRollout {
    fn choose<K: RandomGenerator>(
        &mut self,
        state: &G,
        moves: &[G::Move],
        random: &mut K,
    ) -> Result<usize, SearchError> {
        let mover = state.player_to_move();
        for (index, mv) in moves.iter().enumerate() {
            let next = state.apply(mv)?;
            if next.is_terminal() && Outcome::from_reward(next.reward(mover)) == Outcome::Win {
                return Ok(index);
            }
        }
        Ok(random.next_index(moves.len()))
    }
}

/// A finished playout.
#[derive(Debug, Clone)]
pub struct Playout<G> {
    /// The terminal state the playout reached.
    pub terminal: G,
    /// Number of moves played.
    pub plies: u32,
}

/// Plays `state` out until the game reports a terminal state.
///
/// The game must have finite depth; nothing here guards against endless games.
pub fn playout<G, R, K>(state: &G, policy: &mut R, random: &mut K) -> Result<Playout<G>, SearchError>
where
    G: Game,
    R: RolloutPolicy<G>,
    K: RandomGenerator,
{
    let mut current = state.clone();
    let mut plies = 0;

    while !current.is_terminal() {
        let moves = current.legal_moves()?;
        if moves.is_empty() {
            return Err(SearchError::InvalidState(
                "non-terminal state has no legal moves".into(),
            ));
        }

        let index = policy.choose(&current, &moves, random)?;
        let mv = moves.get(index).ok_or_else(|| {
            SearchError::Logic(format!(
                "rollout policy picked move {index} of {}",
                moves.len()
            ))
        })?;
        current = current.apply(mv)?;
        plies += 1;
    }

    Ok(Playout {
        terminal: current,
        plies,
    })
}
