use mcts_uct::arena::{Contestant, play_game};
use mcts_uct::config::Budget;
use mcts_uct::error::SearchError;
use mcts_uct::games::tic_tac_toe::TicTacToe;
use mcts_uct::mcts::MonteCarloTreeSearch;
use mcts_uct::rollout::DecisiveRollout;
use mcts_uct::tree::SearchTree;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SearchError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Search the opening position
    let mut mcts = MonteCarloTreeSearch::builder().with_seed(2024).build()?;
    let mut tree = SearchTree::new(TicTacToe::default())?;
    let report = mcts.search(&mut tree, Budget::iterations(5000))?;

    // Print the chances
    print!("{}", tree.children_summary());
    println!(
        "The best move is: {:?} ({} iterations in {:?})",
        report.best_move, report.iterations, report.elapsed
    );

    // Let two engines play each other
    let mut first = Contestant::new(
        MonteCarloTreeSearch::builder().with_seed(1).build()?,
        Budget::iterations(2000),
    )
    .with_tree_reuse(true);
    let mut second = Contestant::new(
        MonteCarloTreeSearch::builder()
            .with_rollout_policy(DecisiveRollout)
            .with_seed(2)
            .build()?,
        Budget::iterations(2000),
    );

    let record = play_game(TicTacToe::default(), &mut first, &mut second)?;
    println!("Moves: {:?}", record.moves);
    print!("{}", record.final_state);
    println!("Result for {:?}: {:?}", record.first_player, record.outcome);

    Ok(())
}
