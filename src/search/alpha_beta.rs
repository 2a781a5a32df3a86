// Ficheiro: src/search/alpha_beta.rs
// Descrição: Negamax com poda Alpha-Beta, quiescência e aprofundamento iterativo.

use crate::core::*;
use crate::moves::generator::{generate_moves, is_see_eligible, is_violent, MoveGenMode};
use crate::search::evaluation::Evaluator;
use crate::search::history::HistoryTable;
use crate::search::killer::{KillerTable, MAX_PLY};
use crate::search::move_ordering::{order_moves, OrderingHints};
use crate::search::see::static_exchange_evaluation;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Quantos lances para trás procurar repetições (só 2-fold).
pub const DRAW_SEARCH_WINDOW: usize = 16;

// O relógio só é consultado de tantos em tantos nós
const DEADLINE_CHECK_MASK: u64 = 1023;

/// Resultado de uma iteração completa.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    /// Do ponto de vista de quem joga na raiz.
    pub score: Score,
    pub pv: Vec<Move>,
    pub depth: u32,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl SearchResult {
    /// Número de lances até ao mate, negativo quando é a raiz que leva mate.
    pub fn mate_in(&self) -> Option<i32> {
        mate_in_moves(self.score)
    }

    pub fn pv_string(&self) -> String {
        pv_to_string(&self.pv)
    }
}

/// Estado de uma busca: contadores, limites e tabelas de ordenação.
pub struct SearchContext {
    nodes: u64,
    node_budget: Option<u64>,
    deadline: Option<Instant>,
    stop: Arc<AtomicBool>,
    stopped: bool,
    evaluator: Arc<dyn Evaluator>,
    killers: KillerTable,
    history: HistoryTable,
    root_hint: Option<Move>,
}

impl SearchContext {
    pub fn new(evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            nodes: 0,
            node_budget: None,
            deadline: None,
            stop: Arc::new(AtomicBool::new(false)),
            stopped: false,
            evaluator,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            root_hint: None,
        }
    }

    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_node_budget(mut self, budget: Option<u64>) -> Self {
        self.node_budget = budget;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_tables(mut self, killers: KillerTable, history: HistoryTable) -> Self {
        self.killers = killers;
        self.history = history;
        self
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// A busca foi interrompida (flag, nós ou prazo).
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn killers(&self) -> &KillerTable {
        &self.killers
    }

    pub fn history(&self) -> &HistoryTable {
        &self.history
    }

    pub fn into_tables(self) -> (KillerTable, HistoryTable) {
        (self.killers, self.history)
    }

    #[inline]
    fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }

        let out_of_nodes = self.node_budget.map_or(false, |budget| self.nodes >= budget);
        let out_of_time = self.nodes & DEADLINE_CHECK_MASK == 0
            && self.deadline.map_or(false, |deadline| Instant::now() >= deadline);

        self.stopped = out_of_nodes || out_of_time || self.stop.load(Ordering::Relaxed);
        self.stopped
    }
}

/// Busca negamax. Devolve a pontuação do ponto de vista de quem joga e
/// preenche `pv` com a variante principal encontrada.
///
/// Com `depth <= 0` e sem xeque entra em quiescência: só lances violentos,
/// com stand pat e descartando capturas de SEE negativo. Uma busca
/// interrompida devolve 0, que nunca deve ser usado.
pub fn search(
    ctx: &mut SearchContext,
    board: &mut Board,
    pv: &mut Vec<Move>,
    mut alpha: Score,
    beta: Score,
    depth: i32,
    ply: usize,
) -> Score {
    ctx.nodes += 1;
    pv.clear();

    if ctx.should_stop() {
        return 0;
    }

    if ply > 0
        && (board.is_2fold(DRAW_SEARCH_WINDOW) || board.is_50_moves() || board.has_insufficient_material())
    {
        return DRAW_SCORE;
    }

    if ply >= MAX_PLY {
        return ctx.evaluator.evaluate(board, alpha, beta);
    }

    let is_qs = depth <= 0 && !board.in_check();

    // Stand pat
    let mut static_eval = None;
    if is_qs {
        let eval = ctx.evaluator.evaluate(board, alpha, beta);
        if eval >= beta {
            return eval;
        }
        alpha = alpha.max(eval);
        static_eval = Some(eval);
    }

    let mode = if is_qs { MoveGenMode::Violent } else { MoveGenMode::All };
    let mut moves = generate_moves(board, mode);
    let hints = OrderingHints {
        killers: &ctx.killers,
        history: &ctx.history,
        ply,
        first: if ply == 0 { ctx.root_hint } else { None },
    };
    order_moves(board, &mut moves, &hints);

    let mut legal_move_found = false;
    let mut child_pv = Vec::new();
    let mut quiets_tried: SmallVec<[Move; 32]> = SmallVec::new();

    for &mv in moves.iter() {
        if is_qs && is_see_eligible(board, mv) && static_exchange_evaluation(board, mv) < 0 {
            continue;
        }

        let quiet = !is_violent(board, mv);

        if !board.apply_move(mv) {
            continue;
        }
        legal_move_found = true;

        let score = -search(ctx, board, &mut child_pv, -beta, -alpha, depth - 1, ply + 1);
        board.undo_move();

        if ctx.stopped {
            return 0;
        }

        let score = adjust_if_mate(score);

        if score > alpha {
            alpha = score;
            pv.clear();
            pv.push(mv);
            pv.extend_from_slice(&child_pv);
        }

        if score >= beta {
            if quiet {
                ctx.killers.notify(ply, mv);
                ctx.history.notify_cutoff(mv, depth);
                for &tried in quiets_tried.iter() {
                    ctx.history.notify_no_cutoff(tried, depth);
                }
            }
            return score;
        }

        if quiet {
            quiets_tried.push(mv);
        }
    }

    if legal_move_found {
        return alpha;
    }

    match static_eval {
        // Posição calma: fica a avaliação estática
        Some(eval) => eval,
        None if board.in_check() => MATE_OPPONENT_SIDE,
        None => DRAW_SCORE,
    }
}

/// Aprofundamento iterativo de 1 até `max_depth`.
///
/// `on_iteration` é chamado por cada iteração que terminou sem interrupção;
/// devolve o resultado da última.
pub fn iterative_deepening<F>(
    ctx: &mut SearchContext,
    board: &mut Board,
    max_depth: u32,
    mut on_iteration: F,
) -> Option<SearchResult>
where
    F: FnMut(&SearchResult),
{
    let start = Instant::now();
    let mut latest = None;

    for depth in 1..=max_depth {
        if ctx.should_stop() {
            break;
        }

        let mut pv = Vec::new();
        let score = search(ctx, board, &mut pv, -SCORE_INF, SCORE_INF, depth as i32, 0);

        if ctx.stopped {
            break;
        }

        let result = SearchResult {
            best_move: pv.first().copied(),
            score,
            pv,
            depth,
            nodes: ctx.nodes,
            elapsed: start.elapsed(),
        };

        ctx.root_hint = result.best_move;
        on_iteration(&result);
        latest = Some(result);
    }

    latest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::evaluation::MaterialEvaluator;

    fn context() -> SearchContext {
        SearchContext::new(Arc::new(MaterialEvaluator))
    }

    fn run(fen: &str, depth: u32) -> Option<SearchResult> {
        let mut board = Board::from_fen(fen).unwrap();
        let before = board.clone();
        let result = iterative_deepening(&mut context(), &mut board, depth, |_| {});
        assert!(board == before, "a busca tem de deixar o tabuleiro intacto");
        result
    }

    // Quiescência direta na raiz: devolve (pontuação, nós, avaliação estática)
    fn quiescence(fen: &str, alpha: Score, beta: Score) -> (Score, u64, Score) {
        let mut board = Board::from_fen(fen).unwrap();
        let eval = MaterialEvaluator.evaluate(&board, alpha, beta);
        let mut ctx = context();
        let mut pv = Vec::new();
        let score = search(&mut ctx, &mut board, &mut pv, alpha, beta, 0, 0);
        (score, ctx.nodes(), eval)
    }

    #[test]
    fn stand_pat_fails_high_without_expanding() {
        // Qxd5 existe, mas a avaliação já passa beta
        let (score, nodes, eval) = quiescence("4k3/8/8/3p4/8/8/8/3QK3 w - - 0 1", -100, 0);
        assert_eq!(score, eval);
        assert_eq!(nodes, 1);
    }

    #[test]
    fn quiescence_takes_winning_capture() {
        let (score, nodes, eval) = quiescence("4k3/8/8/3p4/8/8/8/3QK3 w - - 0 1", -SCORE_INF, SCORE_INF);
        assert_eq!(eval, 790);
        assert_eq!(score, 910);
        assert_eq!(nodes, 2);
    }

    #[test]
    fn quiescence_skips_losing_capture() {
        // Qxd5 perde a dama para c6xd5
        let (score, nodes, eval) = quiescence("4k3/8/2p5/3p4/8/8/8/3QK3 w - - 0 1", -SCORE_INF, SCORE_INF);
        assert_eq!(score, eval);
        assert_eq!(nodes, 1);
    }

    #[test]
    fn quiet_position_returns_static_eval() {
        let (score, nodes, eval) = quiescence("4k3/8/8/8/8/8/8/4K2R w - - 0 1", -SCORE_INF, SCORE_INF);
        assert_eq!(eval, 500);
        assert_eq!(score, eval);
        assert_eq!(nodes, 1);
    }

    #[test]
    fn finds_back_rank_mate() {
        let result = run("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 3).unwrap();
        assert_eq!(result.best_move.unwrap().to_string(), "a1a8");
        assert_eq!(result.score, MATE_MOVING_SIDE - 1);
        assert_eq!(result.mate_in(), Some(1));
    }

    #[test]
    fn checkmated_root_has_no_move() {
        let result = run("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", 2).unwrap();
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, MATE_OPPONENT_SIDE);
    }

    #[test]
    fn stalemate_scores_draw() {
        let result = run("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 2).unwrap();
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, DRAW_SCORE);
    }

    #[test]
    fn wins_hanging_queen() {
        let result = run("4k3/8/8/3q4/8/8/3R4/3K4 w - - 0 1", 2).unwrap();
        assert_eq!(result.best_move.unwrap().to_string(), "d2d5");
        assert!(result.score > 400);
    }

    #[test]
    fn pv_is_playable() {
        let mut board = Board::new();
        let result = iterative_deepening(&mut context(), &mut board, 3, |_| {}).unwrap();
        assert_eq!(result.depth, 3);
        assert!(!result.pv.is_empty());
        for &mv in &result.pv {
            assert!(board.apply_move(mv), "{} ilegal na PV", mv);
        }
    }

    #[test]
    fn node_budget_interrupts_search() {
        let mut board = Board::new();
        let mut ctx = context().with_node_budget(Some(500));
        let mut completed = Vec::new();
        let result = iterative_deepening(&mut ctx, &mut board, 50, |r| completed.push(r.depth));

        assert!(ctx.is_stopped());
        assert!(ctx.nodes() <= 500 + 1);
        assert_eq!(result.map(|r| r.depth), completed.last().copied());
    }

    #[test]
    fn stop_flag_prevents_any_iteration() {
        let mut board = Board::new();
        let mut ctx = context();
        ctx.stop_flag().store(true, Ordering::Relaxed);
        assert!(iterative_deepening(&mut ctx, &mut board, 5, |_| {}).is_none());
    }

    #[test]
    fn quiet_cutoffs_feed_killers() {
        let mut board = Board::new();
        let mut ctx = context();
        iterative_deepening(&mut ctx, &mut board, 4, |_| {});
        let any_killer = (0..4).any(|ply| !ctx.killers().killers(ply).is_empty());
        assert!(any_killer);
    }
}
