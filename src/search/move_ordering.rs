// Ficheiro: src/search/move_ordering.rs
// Descrição: Ordenação de lances para maximizar podas Alpha-Beta.

use crate::core::*;
use crate::moves::generator::{is_violent, MoveList};
use crate::search::history::HistoryTable;
use crate::search::killer::KillerTable;
use smallvec::SmallVec;

// Escalões: lance sugerido > violentos (MVV-LVA) > killers > calmos (histórico)
const HINT_SCORE: i32 = 3_000_000;
const VIOLENT_BASE: i32 = 2_000_000;
const KILLER_BASE: i32 = 1_000_000;
const HISTORY_SCALE: f32 = 100_000.0;

/// Auxiliares de ordenação disponíveis num nó.
pub struct OrderingHints<'a> {
    pub killers: &'a KillerTable,
    pub history: &'a HistoryTable,
    pub ply: usize,
    /// Melhor lance da iteração anterior (só na raiz).
    pub first: Option<Move>,
}

/// Ordena movimentos do mais promissor para o menos promissor.
pub fn order_moves(board: &Board, moves: &mut MoveList, hints: &OrderingHints<'_>) {
    let killers = hints.killers.killers(hints.ply);

    let mut scored: SmallVec<[(i32, Move); 64]> = moves
        .iter()
        .map(|&mv| (score_move(board, mv, hints, &killers), mv))
        .collect();

    // Estável: em caso de empate mantém a ordem do gerador
    scored.sort_by_key(|&(score, _)| std::cmp::Reverse(score));

    moves.clear();
    moves.extend(scored.into_iter().map(|(_, mv)| mv));
}

/// Pontua movimento para ordenação (quanto maior, melhor)
fn score_move(board: &Board, mv: Move, hints: &OrderingHints<'_>, killers: &[Move]) -> i32 {
    if hints.first == Some(mv) {
        return HINT_SCORE;
    }

    if is_violent(board, mv) {
        let victim = if mv.is_en_passant() {
            Some(PieceKind::Pawn)
        } else {
            board.piece_at(mv.to()).map(|p| p.kind)
        };
        let promotion_bonus = mv.promotion().map_or(0, |kind| kind.value());
        let capture = victim.map_or(0, |v| mvv_lva_score(v, mv.kind()));
        return VIOLENT_BASE + capture + promotion_bonus;
    }

    if let Some(pos) = killers.iter().position(|&k| k == mv) {
        return KILLER_BASE - pos as i32;
    }

    (hints.history.score(mv) * HISTORY_SCALE) as i32
}

/// MVV-LVA scoring table
#[inline(always)]
fn mvv_lva_score(victim: PieceKind, attacker: PieceKind) -> i32 {
    const MVV_LVA: [[i32; 6]; 6] = [
        // Vítima: Pawn, Knight, Bishop, Rook, Queen, King
        [105, 205, 305, 405, 505, 605], // Atacante: Pawn
        [104, 204, 304, 404, 504, 604], // Atacante: Knight
        [103, 203, 303, 403, 503, 603], // Atacante: Bishop
        [102, 202, 302, 402, 502, 602], // Atacante: Rook
        [101, 201, 301, 401, 501, 601], // Atacante: Queen
        [100, 200, 300, 400, 500, 600], // Atacante: King
    ];

    MVV_LVA[attacker.index()][victim.index()]
}
