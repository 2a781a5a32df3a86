// Ficheiro: src/core/undo.rs
// Descrição: Registo de desfazer produzido por cada lance aplicado.

use super::types::{Bitboard, Move, Piece, Square};
use smallvec::SmallVec;

// Capacidades no pior caso: o roque mexe em 9 bitboards (rei, torre e alvo de
// en passant) e em 4 casas; uma torre que captura outra no canto retira 2 direitos.
pub(crate) const MAX_BB_CHANGES: usize = 9;
pub(crate) const MAX_SQUARE_CHANGES: usize = 4;
pub(crate) const MAX_CASTLING_CHANGES: usize = 4;

/// Campos alterados por um lance, guardados como pares (índice, valor antigo).
/// A reposição é feita na ordem inversa da gravação.
#[derive(Debug, Clone)]
pub struct UndoRecord {
    pub(crate) mv: Move,
    pub(crate) bitboards: SmallVec<[(u8, Bitboard); MAX_BB_CHANGES]>,
    pub(crate) squares: SmallVec<[(Square, Option<Piece>); MAX_SQUARE_CHANGES]>,
    pub(crate) castling: SmallVec<[(u8, bool); MAX_CASTLING_CHANGES]>,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) in_check: bool,
    pub(crate) hash: u64,
}

impl UndoRecord {
    pub(crate) fn new(mv: Move, halfmove_clock: u16, fullmove_number: u16, in_check: bool, hash: u64) -> Self {
        UndoRecord {
            mv,
            bitboards: SmallVec::new(),
            squares: SmallVec::new(),
            castling: SmallVec::new(),
            halfmove_clock,
            fullmove_number,
            in_check,
            hash,
        }
    }

    /// Lance que produziu este registo.
    pub fn played_move(&self) -> Move {
        self.mv
    }

    /// Nenhuma lista transbordou para o heap.
    pub fn is_inline(&self) -> bool {
        !self.bitboards.spilled() && !self.squares.spilled() && !self.castling.spilled()
    }
}
