// Ficheiro: src/search/batch.rs
// Descrição: Buscas síncronas limitadas por nós e buscas em lote num pool rayon.

use crate::core::*;
use crate::search::alpha_beta::{iterative_deepening, SearchContext, SearchResult};
use crate::search::config::SearchConfig;
use crate::search::evaluation::Evaluator;
use crate::search::history::HistoryTable;
use crate::search::killer::KillerTable;
use log::debug;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::sync::Arc;
use std::time::Instant;

/// Busca na thread atual, sem temporizador, até gastar `node_budget` nós.
///
/// Cria tabelas de ordenação próprias; `None` se nem a profundidade 1 terminou.
pub fn sync_search_node_limited(
    board: &Board,
    node_budget: u64,
    evaluator: Arc<dyn Evaluator>,
) -> Option<SearchResult> {
    let config = SearchConfig::default().with_node_budget(node_budget);
    search_with_config(board, &config, evaluator, KillerTable::new(), HistoryTable::new())
}

/// Busca síncrona com uma configuração completa. O prazo usa `time_budget.max`.
pub fn search_with_config(
    board: &Board,
    config: &SearchConfig,
    evaluator: Arc<dyn Evaluator>,
    killers: KillerTable,
    history: HistoryTable,
) -> Option<SearchResult> {
    let mut local = board.clone();
    let deadline = config.timed_allocation().map(|time| Instant::now() + time.max);

    let mut ctx = SearchContext::new(evaluator)
        .with_node_budget(config.node_budget)
        .with_deadline(deadline)
        .with_tables(killers, history);

    iterative_deepening(&mut ctx, &mut local, config.effective_max_depth(), |_| {})
}

/// Procura cada posição em paralelo num pool privado com `config.threads` threads.
///
/// Cada tarefa tem a sua cópia do tabuleiro e as suas tabelas. A ordem dos
/// resultados é a ordem das posições.
pub fn search_positions(
    boards: &[Board],
    config: &SearchConfig,
    evaluator: Arc<dyn Evaluator>,
) -> ChessResult<Vec<Option<SearchResult>>> {
    let threads = config.threads.max(1).min(boards.len().max(1));
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("lance-batch-{}", i))
        .build()?;

    let start = Instant::now();
    let results: Vec<Option<SearchResult>> = pool.install(|| {
        boards
            .par_iter()
            .map(|board| {
                search_with_config(
                    board,
                    config,
                    Arc::clone(&evaluator),
                    KillerTable::new(),
                    HistoryTable::new(),
                )
            })
            .collect()
    });

    let nodes: u64 = results.iter().flatten().map(|r| r.nodes).sum();
    debug!(
        "lote de {} posições em {} threads: {} nós em {:?}",
        boards.len(),
        threads,
        nodes,
        start.elapsed()
    );

    Ok(results)
}
