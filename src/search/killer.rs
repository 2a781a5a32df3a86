// Ficheiro: src/search/killer.rs
// Descrição: Tabela de killer moves (lances calmos que provocaram cortes beta), indexada por ply.

use crate::core::Move;
use smallvec::SmallVec;

pub const MAX_PLY: usize = 128;
pub const KILLERS_PER_PLY: usize = 2;

/// Killers do ply atual, de ply-2 e de ply+2.
pub type KillerList = SmallVec<[Move; 3 * KILLERS_PER_PLY]>;

#[derive(Clone)]
pub struct KillerTable {
    killer_moves: [[Option<Move>; KILLERS_PER_PLY]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    pub fn new() -> Self {
        Self { killer_moves: [[None; KILLERS_PER_PLY]; MAX_PLY] }
    }

    /// Regista um lance que provocou corte em `ply`.
    pub fn notify(&mut self, ply: usize, mv: Move) {
        let Some(slot) = self.killer_moves.get_mut(ply) else {
            return;
        };

        // Se já é o primeiro killer, não atualiza
        if slot[0] == Some(mv) {
            return;
        }

        // Empurra os restantes uma posição
        slot.rotate_right(1);
        slot[0] = Some(mv);
    }

    pub fn killers(&self, ply: usize) -> KillerList {
        let mut list = KillerList::new();
        let mut add = |p: usize| {
            if let Some(slot) = self.killer_moves.get(p) {
                list.extend(slot.iter().flatten().copied());
            }
        };

        add(ply);
        if ply >= 2 {
            add(ply - 2);
        }
        add(ply + 2);

        list
    }

    pub fn is_killer(&self, ply: usize, mv: Move) -> bool {
        self.killer_moves
            .get(ply)
            .map_or(false, |slot| slot.contains(&Some(mv)))
    }

    /// Depois de um lance no jogo, o ply 1 passa a ser o ply 0.
    pub fn move_made(&mut self) {
        self.killer_moves.rotate_left(1);
        self.killer_moves[MAX_PLY - 1] = [None; KILLERS_PER_PLY];
    }

    pub fn clear(&mut self) {
        self.killer_moves = [[None; KILLERS_PER_PLY]; MAX_PLY];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, Piece, PieceKind};

    fn knight_move(from: u8, to: u8) -> Move {
        Move::new(Piece::new(PieceKind::Knight, Color::White), from, to)
    }

    #[test]
    fn newest_killer_comes_first() {
        let mut table = KillerTable::new();
        let (a, b, c) = (knight_move(1, 18), knight_move(6, 21), knight_move(1, 16));
        table.notify(3, a);
        table.notify(3, b);
        table.notify(3, b);
        assert_eq!(table.killers(3).as_slice(), &[b, a]);
        table.notify(3, c);
        assert_eq!(table.killers(3).as_slice(), &[c, b]);
        assert!(!table.is_killer(3, a));
    }

    #[test]
    fn neighbour_plies_are_included() {
        let mut table = KillerTable::new();
        let (a, b, c) = (knight_move(1, 18), knight_move(6, 21), knight_move(1, 16));
        table.notify(2, a);
        table.notify(4, b);
        table.notify(6, c);
        assert_eq!(table.killers(4).as_slice(), &[b, a, c]);
        assert_eq!(table.killers(0).as_slice(), &[a]);
    }

    #[test]
    fn move_made_shifts_plies() {
        let mut table = KillerTable::new();
        let a = knight_move(1, 18);
        table.notify(1, a);
        table.move_made();
        assert!(table.is_killer(0, a));
        table.clear();
        assert!(table.killers(0).is_empty());
    }
}
