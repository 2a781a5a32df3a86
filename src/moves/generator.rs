// Ficheiro: src/moves/generator.rs
// Descrição: Geração de lances por modo (calmos, violentos, todos) e verificação rápida de legalidade.

use super::king::generate_king_moves;
use super::knight::generate_knight_moves;
use super::pawn::generate_pawn_moves;
use super::sliding::generate_sliding_moves;
use crate::core::board::Board;
use crate::core::types::{file_of, rank_of, Bitboard, Color, Move, PieceKind, Square};
use smallvec::SmallVec;

/// Lista de lances; raramente passa de 64 entradas.
pub type MoveList = SmallVec<[Move; 64]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveGenMode {
    /// Lances sem captura, roques e sub-promoções (com ou sem captura).
    Quiet,
    /// Capturas (incluindo en passant) e promoções a dama.
    Violent,
    All,
}

impl MoveGenMode {
    #[inline(always)]
    pub fn includes_quiet(self) -> bool {
        self != MoveGenMode::Violent
    }

    #[inline(always)]
    pub fn includes_violent(self) -> bool {
        self != MoveGenMode::Quiet
    }
}

/// Gera os lances pseudo-legais do modo pedido.
pub fn generate_moves(board: &Board, mode: MoveGenMode) -> MoveList {
    let mut moves = MoveList::new();
    generate_moves_into(board, mode, &mut moves);
    moves
}

/// Como `generate_moves`, acrescentando a uma lista existente.
pub fn generate_moves_into(board: &Board, mode: MoveGenMode, moves: &mut MoveList) {
    let us = board.side_to_move();
    let targets = match mode {
        MoveGenMode::Violent => board.occupancy(!us),
        MoveGenMode::Quiet => !board.occupied(),
        MoveGenMode::All => !board.occupancy(us),
    };

    generate_pawn_moves(board, mode, moves);
    generate_knight_moves(board, targets, moves);
    for kind in [PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
        generate_sliding_moves(board, kind, targets, moves);
    }
    generate_king_moves(board, mode, targets, moves);
}

/// Lances legais (todos os modos), filtrados com `check_legal`.
pub fn generate_legal_moves(board: &mut Board) -> MoveList {
    let mut moves = generate_moves(board, MoveGenMode::All);
    let ci = CheckInfo::new(board);
    moves.retain(|mv| check_legal(board, &ci, *mv));
    moves
}

/// Existe pelo menos um lance legal?
pub fn has_legal_move(board: &mut Board) -> bool {
    let moves = generate_moves(board, MoveGenMode::All);
    let ci = CheckInfo::new(board);
    moves.iter().any(|mv| check_legal(board, &ci, *mv))
}

/// O lance pertence ao conjunto violento (o mesmo critério do gerador).
pub fn is_violent(board: &Board, mv: Move) -> bool {
    match mv.promotion() {
        Some(kind) => kind == PieceKind::Queen,
        None => mv.is_en_passant() || board.piece_at(mv.to()).is_some(),
    }
}

/// Captura sobre uma casa ocupada, onde o SEE se aplica.
#[inline]
pub fn is_see_eligible(board: &Board, mv: Move) -> bool {
    board.piece_at(mv.to()).is_some()
}

// ============================================================================
// VERIFICAÇÃO RÁPIDA DE LEGALIDADE
// ============================================================================

#[inline(always)]
fn diag0(sq: Square) -> u8 {
    rank_of(sq) + file_of(sq)
}

#[inline(always)]
fn diag1(sq: Square) -> u8 {
    rank_of(sq) + 7 - file_of(sq)
}

fn any_on(mut bb: Bitboard, line: impl Fn(Square) -> bool) -> bool {
    while bb != 0 {
        if line(bb.trailing_zeros() as Square) {
            return true;
        }
        bb &= bb - 1;
    }
    false
}

/// Linhas do rei de quem joga onde existe uma peça deslizante adversária capaz de atacar.
#[derive(Debug, Clone, Copy)]
pub struct CheckInfo {
    king_sq: Square,
    file_threat: bool,
    rank_threat: bool,
    diag0_threat: bool,
    diag1_threat: bool,
}

impl CheckInfo {
    pub fn new(board: &Board) -> Self {
        let us: Color = board.side_to_move();
        let them = !us;
        let king_sq = board.king_square(us);
        let queens = board.pieces(them, PieceKind::Queen);
        let straight = board.pieces(them, PieceKind::Rook) | queens;
        let diagonal = board.pieces(them, PieceKind::Bishop) | queens;

        CheckInfo {
            king_sq,
            file_threat: any_on(straight, |sq| file_of(sq) == file_of(king_sq)),
            rank_threat: any_on(straight, |sq| rank_of(sq) == rank_of(king_sq)),
            diag0_threat: any_on(diagonal, |sq| diag0(sq) == diag0(king_sq)),
            diag1_threat: any_on(diagonal, |sq| diag1(sq) == diag1(king_sq)),
        }
    }
}

/// Mesmo resultado que aplicar o lance, ver se o próprio rei ficou atacado e desfazer.
///
/// Só recorre à tentativa completa quando o lance pode mesmo expor o rei:
/// xeque atual, lance de rei, en passant, ou casa de origem numa linha ameaçada.
pub fn check_legal(board: &mut Board, ci: &CheckInfo, mv: Move) -> bool {
    let from = mv.from();
    let k = ci.king_sq;

    let needs_full_check = board.in_check()
        || mv.kind() == PieceKind::King
        || mv.is_en_passant()
        || (ci.file_threat && file_of(from) == file_of(k))
        || (ci.rank_threat && rank_of(from) == rank_of(k))
        || (ci.diag0_threat && diag0(from) == diag0(k))
        || (ci.diag1_threat && diag1(from) == diag1(k));

    if !needs_full_check {
        return true;
    }

    if board.apply_move(mv) {
        board.undo_move();
        true
    } else {
        false
    }
}
