// Ficheiro: src/search/history.rs
// Descrição: Heurística de histórico: frequência com que cada lance (cor, origem, destino) provoca cortes.

use crate::core::Move;

const TABLE_SIZE: usize = 2 * 64 * 64;

#[derive(Clone)]
pub struct HistoryTable {
    cutoffs: Vec<u64>,
    non_cutoffs: Vec<u64>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn index(mv: Move) -> usize {
    (mv.color().index() * 64 + mv.from() as usize) * 64 + mv.to() as usize
}

impl HistoryTable {
    pub fn new() -> Self {
        Self { cutoffs: vec![0; TABLE_SIZE], non_cutoffs: vec![0; TABLE_SIZE] }
    }

    /// Peso de uma observação: cortes perto da raiz contam mais.
    #[inline]
    fn weight(depth: i32) -> u64 {
        let d = depth.max(1) as u64;
        d * d
    }

    pub fn notify_cutoff(&mut self, mv: Move, depth: i32) {
        self.cutoffs[index(mv)] += Self::weight(depth);
    }

    pub fn notify_no_cutoff(&mut self, mv: Move, depth: i32) {
        self.non_cutoffs[index(mv)] += Self::weight(depth);
    }

    /// Entre 0 e 1; 0.5 quando o lance nunca foi visto.
    pub fn score(&self, mv: Move) -> f32 {
        let pos = self.cutoffs[index(mv)];
        let neg = self.non_cutoffs[index(mv)];
        if pos + neg == 0 {
            0.5
        } else {
            pos as f32 / (pos + neg) as f32
        }
    }

    /// Envelhece a tabela depois de um lance no jogo.
    pub fn move_made(&mut self) {
        self.cutoffs.iter_mut().for_each(|c| *c /= 2);
        self.non_cutoffs.iter_mut().for_each(|c| *c /= 2);
    }

    pub fn clear(&mut self) {
        self.cutoffs.iter_mut().for_each(|c| *c = 0);
        self.non_cutoffs.iter_mut().for_each(|c| *c = 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, Piece, PieceKind};

    #[test]
    fn score_tracks_cutoff_ratio() {
        let mut table = HistoryTable::new();
        let mv = Move::new(Piece::new(PieceKind::Rook, Color::Black), 63, 61);
        assert_eq!(table.score(mv), 0.5);
        table.notify_cutoff(mv, 2);
        table.notify_no_cutoff(mv, 2);
        table.notify_no_cutoff(mv, 2);
        table.notify_no_cutoff(mv, 2);
        assert!((table.score(mv) - 0.25).abs() < 1e-6);

        // A mesma geometria com a outra cor é independente
        let white = Move::new(Piece::new(PieceKind::Rook, Color::White), 63, 61);
        assert_eq!(table.score(white), 0.5);
    }

    #[test]
    fn move_made_halves_and_clear_resets() {
        let mut table = HistoryTable::new();
        let mv = Move::new(Piece::new(PieceKind::Knight, Color::White), 6, 21);
        table.notify_cutoff(mv, 1);
        table.move_made();
        assert_eq!(table.score(mv), 0.5);
        table.notify_cutoff(mv, 4);
        table.clear();
        assert_eq!(table.score(mv), 0.5);
    }
}
