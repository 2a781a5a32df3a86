// Ficheiro: src/moves/perft.rs
// Descrição: Contagem de nós folha (perft) para validar o gerador e o make/unmake.

use super::generator::{check_legal, generate_moves, CheckInfo, MoveGenMode};
use crate::core::board::Board;
use crate::core::types::Move;

/// Número de folhas legais a `depth` plies.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(board, MoveGenMode::All);

    // Contagem em bloco no último nível
    if depth == 1 {
        let ci = CheckInfo::new(board);
        return moves.iter().filter(|mv| check_legal(board, &ci, **mv)).count() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        if board.apply_move(mv) {
            nodes += perft(board, depth - 1);
            board.undo_move();
        }
    }
    nodes
}

/// Perft por lance da raiz.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(Move, u64)> {
    let mut result = Vec::new();
    if depth == 0 {
        return result;
    }
    for mv in generate_moves(board, MoveGenMode::All) {
        if board.apply_move(mv) {
            result.push((mv, perft(board, depth - 1)));
            board.undo_move();
        }
    }
    result
}
