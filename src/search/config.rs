// Ficheiro: src/search/config.rs
// Descrição: Parâmetros de uma busca (profundidade, nós, tempo, tipo e threads).

use std::time::Duration;

/// Profundidade máxima do aprofundamento iterativo.
pub const ID_MAX_DEPTH: u32 = 200;

/// Tempo atribuído a um lance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAllocation {
    /// Tempo normal, quando nada de especial acontece.
    pub normal: Duration,
    /// Limite absoluto.
    pub max: Duration,
}

impl TimeAllocation {
    pub fn new(normal: Duration, max: Duration) -> Self {
        Self { normal, max: max.max(normal) }
    }

    pub fn fixed(time: Duration) -> Self {
        Self { normal: time, max: time }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Usa o tempo atribuído e joga um lance no fim.
    MakeMove,
    /// Busca até ser mandada parar (análise, ponder).
    Infinite,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub max_depth: u32,
    pub node_budget: Option<u64>,
    pub time_budget: Option<TimeAllocation>,
    pub search_type: SearchType,
    /// Threads das buscas em lote.
    pub threads: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: ID_MAX_DEPTH,
            node_budget: None,
            time_budget: None,
            search_type: SearchType::MakeMove,
            threads: num_cpus::get().max(1),
        }
    }
}

impl SearchConfig {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_node_budget(mut self, nodes: u64) -> Self {
        self.node_budget = Some(nodes);
        self
    }

    pub fn with_time(mut self, time: TimeAllocation) -> Self {
        self.time_budget = Some(time);
        self
    }

    pub fn infinite(mut self) -> Self {
        self.search_type = SearchType::Infinite;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Converte uma profundidade (UCI/CECP) numa estimativa de nós.
    pub fn depth_to_node_budget(depth: u32) -> u64 {
        4u64.saturating_pow(depth)
    }

    /// Profundidade realmente usada: 0 ou valores acima do máximo passam a `ID_MAX_DEPTH`.
    pub fn effective_max_depth(&self) -> u32 {
        if self.max_depth == 0 || self.max_depth > ID_MAX_DEPTH {
            ID_MAX_DEPTH
        } else {
            self.max_depth
        }
    }

    /// Prazo que o temporizador deve aplicar, se houver.
    pub fn timed_allocation(&self) -> Option<TimeAllocation> {
        match self.search_type {
            SearchType::MakeMove => self.time_budget,
            SearchType::Infinite => None,
        }
    }
}
