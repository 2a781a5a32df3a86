// Ficheiro: src/search/evaluation.rs
// Descrição: Interface do avaliador de posições e uma implementação material simples.

use crate::core::*;

/// Oráculo de avaliação consumido pela busca.
///
/// Deve ser determinístico para a mesma posição e não pode alterar o tabuleiro.
/// Os limites `lower`/`upper` permitem a implementações caras parar cedo.
pub trait Evaluator: Send + Sync {
    /// Pontuação do ponto de vista das brancas.
    fn evaluate_for_white(&self, board: &Board, lower: Score, upper: Score) -> Score;

    /// Pontuação do ponto de vista de quem joga.
    fn evaluate(&self, board: &Board, lower: Score, upper: Score) -> Score {
        match board.side_to_move() {
            Color::White => self.evaluate_for_white(board, lower, upper),
            Color::Black => -self.evaluate_for_white(board, -upper, -lower),
        }
    }
}

/// Avaliação simples baseada no material das peças, com bónus de centro.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator;

const CENTER: Bitboard = 0x0000001818000000; // e4, e5, d4, d5
const CENTER_BONUS: Score = 10;

impl Evaluator for MaterialEvaluator {
    fn evaluate_for_white(&self, board: &Board, _lower: Score, _upper: Score) -> Score {
        let mut score = 0;

        for kind in [PieceKind::Pawn, PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
            score += board.piece_count(Color::White, kind) as Score * kind.value();
            score -= board.piece_count(Color::Black, kind) as Score * kind.value();
        }

        // Ocupação do centro
        score += (board.occupancy(Color::White) & CENTER).count_ones() as Score * CENTER_BONUS;
        score -= (board.occupancy(Color::Black) & CENTER).count_ones() as Score * CENTER_BONUS;

        score
    }
}
