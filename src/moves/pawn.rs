// Ficheiro: src/moves/pawn.rs
// Descrição: Lógica para gerar os lances dos peões, separando lances violentos e calmos.

use super::generator::{MoveGenMode, MoveList};
use crate::core::board::Board;
use crate::core::types::{Bitboard, Color, Move, Piece, PieceKind, Square};

// Constantes de colunas e filas
const NOT_A_FILE: Bitboard = 0xfefefefefefefefe;
const NOT_H_FILE: Bitboard = 0x7f7f7f7f7f7f7f7f;
const RANK_1: Bitboard = 0x00000000000000FF;
const RANK_3: Bitboard = 0x0000000000FF0000;
const RANK_6: Bitboard = 0x0000FF0000000000;
const RANK_8: Bitboard = 0xFF00000000000000;

// ============================================================================
// TABELAS PRÉ-COMPUTADAS
// ============================================================================

/// Gera a tabela de ataques de peão de uma cor para todas as 64 casas.
const fn generate_pawn_attacks_table(white: bool) -> [Bitboard; 64] {
    let mut attacks = [0u64; 64];
    let mut square = 0;

    while square < 64 {
        let bb = 1u64 << square;
        attacks[square] = if white {
            ((bb & NOT_A_FILE) << 7) | ((bb & NOT_H_FILE) << 9)
        } else {
            ((bb & NOT_A_FILE) >> 9) | ((bb & NOT_H_FILE) >> 7)
        };
        square += 1;
    }

    attacks
}

static PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    generate_pawn_attacks_table(true),
    generate_pawn_attacks_table(false),
];

/// Casas atacadas por um peão de `color` em `square`.
#[inline(always)]
pub fn get_pawn_attacks_lookup(color: Color, square: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][square as usize]
}

#[inline(always)]
fn shift(bb: Bitboard, delta: i8) -> Bitboard {
    if delta > 0 { bb << delta } else { bb >> -delta }
}

/// Promoções a gerar em cada modo: a dama é violenta, as sub-promoções são calmas.
fn promotion_kinds(mode: MoveGenMode) -> &'static [PieceKind] {
    match mode {
        MoveGenMode::Violent => &[PieceKind::Queen],
        MoveGenMode::Quiet => &[PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight],
        MoveGenMode::All => &PieceKind::PROMOTIONS,
    }
}

fn push_targets(moves: &mut MoveList, pawn: Piece, mut targets: Bitboard, delta: i8, promotions: Option<&[PieceKind]>) {
    while targets != 0 {
        let to_sq = targets.trailing_zeros() as Square;
        let from_sq = (to_sq as i8 - delta) as Square;
        match promotions {
            Some(kinds) => {
                for &kind in kinds {
                    moves.push(Move::new(pawn, from_sq, to_sq).with_promotion(kind));
                }
            }
            None => moves.push(Move::new(pawn, from_sq, to_sq)),
        }
        targets &= targets - 1;
    }
}

/// Gera os lances pseudo-legais dos peões do jogador atual para o modo pedido.
pub fn generate_pawn_moves(board: &Board, mode: MoveGenMode, moves: &mut MoveList) {
    let us = board.side_to_move();
    let pawn = Piece::new(PieceKind::Pawn, us);
    let our_pawns = board.pieces(us, PieceKind::Pawn);
    if our_pawns == 0 {
        return;
    }

    let empty = !board.occupied();
    let enemies = board.occupancy(!us);
    let push = us.pawn_push();
    let (promo_rank, double_rank) = match us {
        Color::White => (RANK_8, RANK_3),
        Color::Black => (RANK_1, RANK_6),
    };
    let promotions = promotion_kinds(mode);

    // Avanços
    let single = shift(our_pawns, push) & empty;
    if mode.includes_quiet() {
        push_targets(moves, pawn, single & !promo_rank, push, None);
        let double = shift(single & double_rank, push) & empty;
        push_targets(moves, pawn, double, 2 * push, None);
    }
    push_targets(moves, pawn, single & promo_rank, push, Some(promotions));

    // Capturas para a coluna h e para a coluna a
    for (source_mask, delta) in [(NOT_H_FILE, push + 1), (NOT_A_FILE, push - 1)] {
        let captures = shift(our_pawns & source_mask, delta) & enemies;
        if mode.includes_violent() {
            push_targets(moves, pawn, captures & !promo_rank, delta, None);
        }
        push_targets(moves, pawn, captures & promo_rank, delta, Some(promotions));
    }

    // En passant: só quando um peão nosso ataca a casa alvo
    if mode.includes_violent() {
        if let Some(ep) = board.en_passant_square() {
            let mut sources = get_pawn_attacks_lookup(!us, ep) & our_pawns;
            while sources != 0 {
                let from_sq = sources.trailing_zeros() as Square;
                moves.push(Move::en_passant(pawn, from_sq, ep));
                sources &= sources - 1;
            }
        }
    }
}
