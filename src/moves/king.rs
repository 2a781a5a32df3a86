// Ficheiro: src/moves/king.rs
// Descrição: Tabela de ataques e geração dos lances do Rei, incluindo o roque.

use super::generator::{MoveGenMode, MoveList};
use crate::core::board::{Board, CastlingRight};
use crate::core::types::{Bitboard, Color, Move, Piece, PieceKind, Square};

/// Gera a tabela de ataques de rei para todas as 64 casas.
const fn generate_king_attacks_table() -> [Bitboard; 64] {
    let mut attacks = [0u64; 64];
    let mut square = 0;

    while square < 64 {
        let king_pos = 1u64 << square;
        let mut attack_bb = 0u64;
        let s = square as i8;

        // Movimentos de um passo em todas as 8 direções.
        if s % 8 > 0 { attack_bb |= king_pos >> 1; } // Esquerda
        if s % 8 < 7 { attack_bb |= king_pos << 1; } // Direita
        if s / 8 > 0 { attack_bb |= king_pos >> 8; } // Baixo
        if s / 8 < 7 { attack_bb |= king_pos << 8; } // Cima
        if s % 8 > 0 && s / 8 > 0 { attack_bb |= king_pos >> 9; } // Baixo-Esquerda
        if s % 8 < 7 && s / 8 > 0 { attack_bb |= king_pos >> 7; } // Baixo-Direita
        if s % 8 > 0 && s / 8 < 7 { attack_bb |= king_pos << 7; } // Cima-Esquerda
        if s % 8 < 7 && s / 8 < 7 { attack_bb |= king_pos << 9; } // Cima-Direita

        attacks[square] = attack_bb;
        square += 1;
    }

    attacks
}

/// Tabela pré-calculada de ataques de rei para cada casa do tabuleiro.
static KING_ATTACKS: [Bitboard; 64] = generate_king_attacks_table();

/// Obtém o bitboard de ataque para um rei numa dada casa usando lookup table.
#[inline(always)]
pub fn get_king_attacks_lookup(square: Square) -> Bitboard {
    KING_ATTACKS[square as usize]
}

/// Gera os lances pseudo-legais do rei; o roque só entra nos modos com lances calmos.
pub fn generate_king_moves(board: &Board, mode: MoveGenMode, targets: Bitboard, moves: &mut MoveList) {
    let us = board.side_to_move();
    let king = Piece::new(PieceKind::King, us);
    let our_king = board.pieces(us, PieceKind::King);

    if our_king == 0 { return; } // Não há rei no tabuleiro (impossível em jogo normal)

    let from_sq = our_king.trailing_zeros() as Square;
    let mut valid_moves = get_king_attacks_lookup(from_sq) & targets;

    while valid_moves != 0 {
        let to_sq = valid_moves.trailing_zeros() as Square;
        moves.push(Move::new(king, from_sq, to_sq));
        valid_moves &= valid_moves - 1;
    }

    if mode.includes_quiet() && !board.in_check() {
        generate_castling(board, us, moves);
    }
}

/// Roques com direito, torre no canto, casas livres e casa de passagem não atacada.
/// A casa de destino fica para a verificação de legalidade.
fn generate_castling(board: &Board, us: Color, moves: &mut MoveList) {
    let rights = match us {
        Color::White => [CastlingRight::WhiteShort, CastlingRight::WhiteLong],
        Color::Black => [CastlingRight::BlackShort, CastlingRight::BlackLong],
    };
    let king = Piece::new(PieceKind::King, us);
    let rook = Piece::new(PieceKind::Rook, us);
    let occupied = board.occupied();

    for right in rights {
        if !board.castling_right(right)
            || board.piece_at(right.king_from()) != Some(king)
            || board.piece_at(right.rook_from()) != Some(rook)
            || occupied & right.between_mask() != 0
            || board.is_square_attacked(right.transit_square(), !us)
        {
            continue;
        }
        moves.push(Move::castling(king, right.king_from(), right.king_to()));
    }
}
