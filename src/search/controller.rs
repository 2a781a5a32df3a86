// Ficheiro: src/search/controller.rs
// Descrição: Busca assíncrona: uma thread de busca e, com tempo limitado, uma thread temporizadora.

use crate::core::*;
use crate::moves::generator::generate_legal_moves;
use crate::search::alpha_beta::{iterative_deepening, SearchContext, SearchResult};
use crate::search::config::{SearchConfig, TimeAllocation};
use crate::search::evaluation::Evaluator;
use crate::search::history::HistoryTable;
use crate::search::killer::KillerTable;
use log::{debug, info, warn};
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Texto enviado quando não há nenhum lance legal.
pub const NULL_MOVE_TEXT: &str = "0000";

/// Informação de uma iteração completa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinkingOutput {
    pub ply: u32,
    pub score: Score,
    pub time: Duration,
    pub node_count: u64,
    pub pv: Vec<Move>,
}

impl ThinkingOutput {
    fn from_result(result: &SearchResult) -> Self {
        Self {
            ply: result.depth,
            score: result.score,
            time: result.elapsed,
            node_count: result.nodes,
            pv: result.pv.clone(),
        }
    }
}

impl fmt::Display for ThinkingOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "info depth {} ", self.ply)?;
        match mate_in_moves(self.score) {
            Some(moves) => write!(f, "score mate {}", moves)?,
            None => write!(f, "score cp {}", self.score)?,
        }
        write!(
            f,
            " nodes {} time {} pv {}",
            self.node_count,
            self.time.as_millis(),
            pv_to_string(&self.pv)
        )
    }
}

pub type ThinkingCallback = Box<dyn FnMut(&ThinkingOutput) + Send>;
pub type FinalMoveCallback = Box<dyn FnOnce(String) + Send>;

/// Tudo o que uma busca a partir de uma raiz precisa.
pub struct RootSearchContext {
    pub board: Board,
    pub config: SearchConfig,
    pub evaluator: Arc<dyn Evaluator>,
    pub killers: KillerTable,
    pub history: HistoryTable,
    pub thinking_output: Option<ThinkingCallback>,
    pub final_move: Option<FinalMoveCallback>,
}

impl RootSearchContext {
    pub fn new(board: Board, config: SearchConfig, evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            board,
            config,
            evaluator,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            thinking_output: None,
            final_move: None,
        }
    }

    pub fn on_thinking<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&ThinkingOutput) + Send + 'static,
    {
        self.thinking_output = Some(Box::new(callback));
        self
    }

    pub fn on_final_move<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(String) + Send + 'static,
    {
        self.final_move = Some(Box::new(callback));
        self
    }

    /// Reaproveita tabelas de ordenação de buscas anteriores.
    pub fn with_tables(mut self, killers: KillerTable, history: HistoryTable) -> Self {
        self.killers = killers;
        self.history = history;
        self
    }
}

// Estado partilhado entre o dono, a thread de busca e o temporizador
struct Shared {
    stop: Arc<AtomicBool>,
    abort_lock: Mutex<()>,
    abort_cv: Condvar,
    result: Mutex<Option<SearchResult>>,
    done: AtomicBool,
}

impl Shared {
    fn lock_abort(&self) -> MutexGuard<'_, ()> {
        self.abort_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // A flag muda sob o mutex para o temporizador não perder o aviso
    fn request_stop(&self) {
        let _guard = self.lock_abort();
        self.stop.store(true, Ordering::SeqCst);
        self.abort_cv.notify_all();
    }

    fn publish(&self, result: &SearchResult) {
        *self.result.lock().unwrap_or_else(PoisonError::into_inner) = Some(result.clone());
    }

    fn latest(&self) -> Option<SearchResult> {
        self.result.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Dorme até ao fim do tempo normal ou até alguém pedir paragem.
    fn run_timer(&self, time: Duration) {
        let end = Instant::now() + time;
        let mut guard = self.lock_abort();

        while !self.stop.load(Ordering::SeqCst) {
            let now = Instant::now();
            if now >= end {
                break;
            }
            guard = match self.abort_cv.wait_timeout(guard, end - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }

        self.stop.store(true, Ordering::SeqCst);
    }
}

/// Busca a correr em segundo plano.
pub struct AsyncSearch {
    shared: Arc<Shared>,
    context: Option<RootSearchContext>,
    worker: Option<JoinHandle<(KillerTable, HistoryTable)>>,
    tables: Option<(KillerTable, HistoryTable)>,
}

impl AsyncSearch {
    pub fn new(context: RootSearchContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                stop: Arc::new(AtomicBool::new(false)),
                abort_lock: Mutex::new(()),
                abort_cv: Condvar::new(),
                result: Mutex::new(None),
                done: AtomicBool::new(false),
            }),
            context: Some(context),
            worker: None,
            tables: None,
        }
    }

    /// Lança a thread de busca. Só a primeira chamada tem efeito.
    pub fn start(&mut self) -> io::Result<()> {
        let Some(context) = self.context.take() else {
            warn!("busca já iniciada");
            return Ok(());
        };

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("lance-search".into())
            .spawn(move || root_search(&shared, context))?;

        self.worker = Some(handle);
        Ok(())
    }

    /// Pede a paragem; é preciso `join` para esperar pelo fim.
    pub fn abort(&self) {
        self.shared.request_stop();
    }

    pub fn join(&mut self) {
        if let Some(handle) = self.worker.take() {
            match handle.join() {
                Ok(tables) => self.tables = Some(tables),
                Err(_) => warn!("a thread de busca terminou em pânico"),
            }
        }
    }

    /// Último resultado completo, em qualquer momento.
    pub fn result(&self) -> Option<SearchResult> {
        self.shared.latest()
    }

    pub fn is_done(&self) -> bool {
        self.shared.done.load(Ordering::SeqCst)
    }

    /// Tabelas de ordenação depois de `join`, para a próxima busca.
    pub fn take_tables(&mut self) -> Option<(KillerTable, HistoryTable)> {
        self.tables.take()
    }
}

impl Drop for AsyncSearch {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.abort();
            self.join();
        }
    }
}

// ============================================================================
// THREAD DE BUSCA
// ============================================================================

fn root_search(shared: &Arc<Shared>, context: RootSearchContext) -> (KillerTable, HistoryTable) {
    let RootSearchContext { mut board, config, evaluator, killers, history, mut thinking_output, final_move } =
        context;

    let start = Instant::now();
    let timed: Option<TimeAllocation> = config.timed_allocation();

    let timer = timed.and_then(|time| {
        let shared = Arc::clone(shared);
        thread::Builder::new()
            .name("lance-timer".into())
            .spawn(move || shared.run_timer(time.normal))
            .map_err(|err| warn!("sem temporizador ({}); só o limite absoluto se aplica", err))
            .ok()
    });

    let mut ctx = SearchContext::new(evaluator)
        .with_stop_flag(Arc::clone(&shared.stop))
        .with_node_budget(config.node_budget)
        .with_deadline(timed.map(|time| start + time.max))
        .with_tables(killers, history);

    let root_fen = board.to_fen();
    let latest = iterative_deepening(&mut ctx, &mut board, config.effective_max_depth(), |result| {
        shared.publish(result);
        let output = ThinkingOutput::from_result(result);
        debug!("{}", output);
        if let Some(callback) = thinking_output.as_mut() {
            callback(&output);
        }
    });

    // Acorda o temporizador para as duas threads terminarem juntas
    shared.request_stop();
    if let Some(handle) = timer {
        if handle.join().is_err() {
            warn!("a thread temporizadora terminou em pânico");
        }
    }

    let chosen = match latest.as_ref().and_then(|r| r.best_move) {
        Some(mv) => mv.to_string(),
        None => fallback_move(&mut board, &root_fen),
    };

    info!("lance final {} ({} nós, {:?})", chosen, ctx.nodes(), start.elapsed());
    if let Some(callback) = final_move {
        callback(chosen);
    }

    shared.done.store(true, Ordering::SeqCst);
    ctx.into_tables()
}

// Sem iteração completa: qualquer lance legal serve
fn fallback_move(board: &mut Board, fen: &str) -> String {
    match generate_legal_moves(board).first() {
        Some(mv) => {
            warn!("nenhuma iteração completa em {}; a jogar {}", fen, mv);
            mv.to_string()
        }
        None => NULL_MOVE_TEXT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::evaluation::MaterialEvaluator;
    use std::sync::mpsc;

    fn root(fen: &str, config: SearchConfig) -> RootSearchContext {
        RootSearchContext::new(Board::from_fen(fen).unwrap(), config, Arc::new(MaterialEvaluator))
    }

    #[test]
    fn depth_limited_search_reports_every_iteration() {
        let (tx, rx) = mpsc::channel();
        let (final_tx, final_rx) = mpsc::channel();
        let context = root(START_FEN, SearchConfig::default().with_depth(3))
            .on_thinking(move |out| tx.send(out.clone()).unwrap())
            .on_final_move(move |mv| final_tx.send(mv).unwrap());

        let mut search = AsyncSearch::new(context);
        search.start().unwrap();
        search.join();

        assert!(search.is_done());
        let plies: Vec<u32> = rx.try_iter().map(|out| out.ply).collect();
        assert_eq!(plies, vec![1, 2, 3]);

        let result = search.result().unwrap();
        let moves: Vec<String> = final_rx.try_iter().collect();
        assert_eq!(moves, vec![result.best_move.unwrap().to_string()]);
        assert!(search.take_tables().is_some());
    }

    #[test]
    fn timer_stops_infinite_depth() {
        let config = SearchConfig::default()
            .with_time(TimeAllocation::new(Duration::from_millis(100), Duration::from_millis(300)));
        let mut search = AsyncSearch::new(root(START_FEN, config));
        let started = Instant::now();
        search.start().unwrap();
        search.join();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(search.result().is_some());
    }

    #[test]
    fn abort_ends_infinite_search() {
        let (final_tx, final_rx) = mpsc::channel();
        let config = SearchConfig::default().infinite();
        let context = root(START_FEN, config).on_final_move(move |mv| final_tx.send(mv).unwrap());
        let mut search = AsyncSearch::new(context);
        search.start().unwrap();
        thread::sleep(Duration::from_millis(50));
        search.abort();
        search.join();

        assert!(search.is_done());
        let moves: Vec<String> = final_rx.try_iter().collect();
        assert_eq!(moves.len(), 1);
        let mut board = Board::new();
        assert!(board.parse_move(&moves[0]).is_ok());
    }

    #[test]
    fn no_legal_move_sends_null_move() {
        let (final_tx, final_rx) = mpsc::channel();
        let context = root("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", SearchConfig::default().with_depth(2))
            .on_final_move(move |mv| final_tx.send(mv).unwrap());
        let mut search = AsyncSearch::new(context);
        search.start().unwrap();
        search.join();
        assert_eq!(final_rx.try_iter().collect::<Vec<_>>(), vec![NULL_MOVE_TEXT.to_string()]);
    }

    #[test]
    fn thinking_output_formats_mate() {
        let output = ThinkingOutput {
            ply: 3,
            score: MATE_MOVING_SIDE - 1,
            time: Duration::from_millis(12),
            node_count: 42,
            pv: Vec::new(),
        };
        assert_eq!(output.to_string(), "info depth 3 score mate 1 nodes 42 time 12 pv ");
    }
}
