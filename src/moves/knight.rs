// Ficheiro: src/moves/knight.rs
// Descrição: Tabela de ataques e geração dos lances dos cavalos.

use super::generator::MoveList;
use crate::core::board::Board;
use crate::core::types::{Bitboard, Move, Piece, PieceKind, Square};

/// Gera a tabela de ataques de cavalo para todas as 64 casas.
const fn generate_knight_attacks_table() -> [Bitboard; 64] {
    let mut attacks = [0u64; 64];
    let mut square = 0;

    while square < 64 {
        let mut attack_bb = 0u64;
        let s = square as i8;

        // Array com os possíveis deslocamentos do cavalo
        let knight_moves = [15, 17, 6, 10, -15, -17, -6, -10];
        let mut i = 0;

        while i < knight_moves.len() {
            let target = s + knight_moves[i];

            // Dentro do tabuleiro e sem dar a volta na horizontal
            if target >= 0 && target < 64 {
                let file_diff = (s % 8 - target % 8).abs();
                if file_diff <= 2 {
                    attack_bb |= 1u64 << target;
                }
            }
            i += 1;
        }

        attacks[square] = attack_bb;
        square += 1;
    }

    attacks
}

/// Tabela pré-calculada de ataques de cavalo para cada casa do tabuleiro.
static KNIGHT_ATTACKS: [Bitboard; 64] = generate_knight_attacks_table();

/// Obtém o bitboard de ataque para um cavalo numa dada casa usando lookup table.
#[inline(always)]
pub fn get_knight_attacks_lookup(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[square as usize]
}

/// Gera os lances pseudo-legais dos cavalos do jogador atual para as casas em `targets`.
pub fn generate_knight_moves(board: &Board, targets: Bitboard, moves: &mut MoveList) {
    let us = board.side_to_move();
    let knight = Piece::new(PieceKind::Knight, us);
    let mut our_knights = board.pieces(us, PieceKind::Knight);

    while our_knights != 0 {
        let from_sq = our_knights.trailing_zeros() as Square;
        let mut valid_moves = get_knight_attacks_lookup(from_sq) & targets;

        while valid_moves != 0 {
            let to_sq = valid_moves.trailing_zeros() as Square;
            moves.push(Move::new(knight, from_sq, to_sq));
            valid_moves &= valid_moves - 1;
        }
        our_knights &= our_knights - 1;
    }
}
