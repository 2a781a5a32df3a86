use std::sync::{Arc, Mutex};
use std::time::Duration;

use lance::search::report::{final_move_channel, thinking_channel};
use lance::search::{
    iterative_deepening, nm_static_exchange_evaluation, static_exchange_evaluation, AsyncSearch,
    MaterialEvaluator, RootSearchContext, SearchConfig, SearchContext, ThinkingOutput,
};
use lance::{Board, MATE_MOVING_SIDE};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn best(fen: &str, depth: u32) -> lance::search::SearchResult {
    let mut board = Board::from_fen(fen).unwrap();
    let mut ctx = SearchContext::new(Arc::new(MaterialEvaluator));
    iterative_deepening(&mut ctx, &mut board, depth, |_| {}).unwrap()
}

#[test]
fn shorter_mates_score_higher() {
    let mate_in_1 = best("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 4);
    let mate_in_2 = best("7k/8/5K2/8/8/8/8/6R1 w - - 0 1", 4);

    assert_eq!(mate_in_1.score, MATE_MOVING_SIDE - 1);
    assert_eq!(mate_in_2.score, MATE_MOVING_SIDE - 3);
    assert_eq!(mate_in_2.mate_in(), Some(2));
    assert!(mate_in_1.score > mate_in_2.score);
}

#[test]
fn defending_side_sees_its_mate() {
    // Pretas com menos material e ameaça de mate na última fila
    let result = best("6k1/5ppp/8/8/8/8/8/R5K1 b - - 0 1", 3);
    assert!(result.score < 0);
    assert!(result.best_move.is_some());
}

#[test]
fn see_values() {
    let mut board = Board::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
    let pxq = board.parse_move("exd5").unwrap();
    assert_eq!(static_exchange_evaluation(&board, pxq), 900);

    // Troca de cavalos defendidos: N x N, p x N
    let mut board = Board::from_fen("4k3/8/4p3/3n4/8/4N3/8/4K3 w - - 0 1").unwrap();
    let nxn = board.parse_move("Nxd5").unwrap();
    assert_eq!(static_exchange_evaluation(&board, nxn), 0);

    // Cavalo em d5 atacado por peão: en prise do ponto de vista do dono
    let mut board = Board::from_fen("4k3/8/4p3/3N4/8/8/8/4K3 w - - 0 1").unwrap();
    let quiet = board.parse_move("Nb4").unwrap();
    assert_eq!(nm_static_exchange_evaluation(&board, quiet), 320);
}

#[test]
fn node_budget_result_matches_last_thinking_output() {
    init_logging();
    let budget = SearchConfig::depth_to_node_budget(6);
    let (thinking, outputs) = thinking_channel();
    let (final_move, final_rx) = final_move_channel();

    let mut context = RootSearchContext::new(
        Board::new(),
        SearchConfig::default().with_node_budget(budget),
        Arc::new(MaterialEvaluator),
    );
    context.thinking_output = Some(thinking);
    context.final_move = Some(final_move);

    let mut search = AsyncSearch::new(context);
    search.start().unwrap();
    search.join();

    let outputs: Vec<ThinkingOutput> = outputs.try_iter().collect();
    let last = outputs.last().expect("pelo menos uma iteração");
    let result = search.result().unwrap();

    assert!(last.node_count <= budget);
    assert_eq!(result.depth, last.ply);
    assert_eq!(result.score, last.score);
    assert_eq!(result.pv, last.pv);
    assert_eq!(final_rx.recv_timeout(Duration::from_secs(1)).unwrap(), result.best_move.unwrap().to_string());
}

#[test]
fn zero_completed_iterations_still_play_legal_move() {
    init_logging();
    let moves = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&moves);

    // Orçamento de um nó: nem a profundidade 1 termina
    let context = RootSearchContext::new(
        Board::new(),
        SearchConfig::default().with_node_budget(1),
        Arc::new(MaterialEvaluator),
    )
    .on_final_move(move |mv| sink.lock().unwrap().push(mv));

    let mut search = AsyncSearch::new(context);
    search.start().unwrap();
    search.join();

    assert!(search.result().is_none());
    let moves = moves.lock().unwrap();
    assert_eq!(moves.len(), 1);
    assert!(Board::new().parse_move(&moves[0]).is_ok());
}

#[test]
fn tables_carry_over_between_searches() {
    let mut first = AsyncSearch::new(RootSearchContext::new(
        Board::new(),
        SearchConfig::default().with_depth(3),
        Arc::new(MaterialEvaluator),
    ));
    first.start().unwrap();
    first.join();
    let (mut killers, mut history) = first.take_tables().unwrap();
    killers.move_made();
    history.move_made();

    let mut board = Board::new();
    let mv = board.parse_move("e2e4").unwrap();
    assert!(board.apply_move(mv));

    let mut second = AsyncSearch::new(
        RootSearchContext::new(board, SearchConfig::default().with_depth(2), Arc::new(MaterialEvaluator))
            .with_tables(killers, history),
    );
    second.start().unwrap();
    second.join();
    assert!(second.result().unwrap().best_move.is_some());
}
