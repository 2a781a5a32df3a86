// Ficheiro: src/moves/sliding.rs
// Descrição: Lógica para gerar os lances de peças deslizantes (Bispos, Torres e Damas).

use super::generator::MoveList;
use super::magic_bitboards::{get_bishop_attacks_magic, get_queen_attacks_magic, get_rook_attacks_magic};
use crate::core::board::Board;
use crate::core::types::{Bitboard, Move, Piece, PieceKind, Square};

/// Ataques de uma peça deslizante com a ocupação dada.
#[inline(always)]
pub fn slider_attacks(kind: PieceKind, square: Square, occupancy: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Bishop => get_bishop_attacks_magic(square, occupancy),
        PieceKind::Rook => get_rook_attacks_magic(square, occupancy),
        PieceKind::Queen => get_queen_attacks_magic(square, occupancy),
        _ => 0, // Não deve acontecer para esta função
    }
}

/// Função genérica para gerar lances de Bispos, Torres e Damas para as casas em `targets`.
pub fn generate_sliding_moves(board: &Board, kind: PieceKind, targets: Bitboard, moves: &mut MoveList) {
    let us = board.side_to_move();
    let piece = Piece::new(kind, us);
    let all_pieces = board.occupied();
    let mut our_sliding_pieces = board.pieces(us, kind);

    while our_sliding_pieces != 0 {
        let from_sq = our_sliding_pieces.trailing_zeros() as Square;
        let mut valid_moves = slider_attacks(kind, from_sq, all_pieces) & targets;

        while valid_moves != 0 {
            let to_sq = valid_moves.trailing_zeros() as Square;
            moves.push(Move::new(piece, from_sq, to_sq));
            valid_moves &= valid_moves - 1;
        }

        our_sliding_pieces &= our_sliding_pieces - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queen_in_open_board() {
        let board = Board::from_fen("8/7k/8/8/3Q4/8/8/1K6 w - - 0 1").unwrap();
        let mut moves = MoveList::new();
        let targets = !board.occupancy(board.side_to_move());
        generate_sliding_moves(&board, PieceKind::Queen, targets, &mut moves);
        assert_eq!(moves.len(), 27);
    }

    #[test]
    fn rook_stops_at_blockers() {
        let board = Board::from_fen("7k/8/8/8/1p1R2P1/8/8/K7 w - - 0 1").unwrap();
        let mut moves = MoveList::new();
        let targets = board.occupancy(!board.side_to_move());
        generate_sliding_moves(&board, PieceKind::Rook, targets, &mut moves);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to_string(), "d4b4");
    }
}
