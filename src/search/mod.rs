// Ficheiro: src/search/mod.rs
// Descrição: Busca: SEE, avaliação, ordenação, Alpha-Beta e controlo assíncrono.

pub mod alpha_beta;
pub mod batch;
pub mod config;
pub mod controller;
pub mod evaluation;
pub mod history;
pub mod killer;
pub mod move_ordering;
pub mod report;
pub mod see;

pub use alpha_beta::{iterative_deepening, search, SearchContext, SearchResult};
pub use batch::{search_positions, search_with_config, sync_search_node_limited};
pub use config::{SearchConfig, SearchType, TimeAllocation};
pub use controller::{AsyncSearch, RootSearchContext, ThinkingOutput};
pub use evaluation::{Evaluator, MaterialEvaluator};
pub use history::HistoryTable;
pub use killer::KillerTable;
pub use see::{nm_static_exchange_evaluation, static_exchange_evaluation};
