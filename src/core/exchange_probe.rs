// Ficheiro: src/core/exchange_probe.rs
// Descrição: Vista leve sobre as máscaras de ocupação usada apenas pela avaliação de trocas (SEE).
//
// A sonda copia a ocupação e a mailbox e altera só essas cópias: castling, en passant
// e hash nunca são tocados, e o tabuleiro original fica emprestado (imutável) enquanto
// a sonda existir.

use super::board::Board;
use super::types::*;
use crate::moves::king::get_king_attacks_lookup;
use crate::moves::knight::get_knight_attacks_lookup;
use crate::moves::magic_bitboards::{get_bishop_attacks_magic, get_queen_attacks_magic, get_rook_attacks_magic};
use crate::moves::pawn::get_pawn_attacks_lookup;
use smallvec::SmallVec;

#[derive(Clone, Copy)]
struct ProbeStep {
    from: Square,
    to: Square,
    moved: Piece,
    captured: Option<Piece>,
}

pub struct ExchangeProbe<'a> {
    board: &'a Board,
    occupancy: Bitboard,
    mailbox: [Option<Piece>; 64],
    side: Color,
    steps: SmallVec<[ProbeStep; 32]>,
}

impl<'a> ExchangeProbe<'a> {
    /// Equivalente a `ResetSee`: ocupação total e lado a jogar `side`.
    pub fn new(board: &'a Board, side: Color) -> Self {
        ExchangeProbe {
            board,
            occupancy: board.occupied(),
            mailbox: board.mailbox,
            side,
            steps: SmallVec::new(),
        }
    }

    /// Volta ao estado do tabuleiro, descartando passos pendentes.
    pub fn reset(&mut self, side: Color) {
        self.occupancy = self.board.occupied();
        self.mailbox = self.board.mailbox;
        self.side = side;
        self.steps.clear();
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn occupancy(&self) -> Bitboard {
        self.occupancy
    }

    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// `ApplyMoveSee`: move `piece` de `from` para `to` e devolve o tipo capturado.
    pub fn apply(&mut self, piece: Piece, from: Square, to: Square) -> Option<PieceKind> {
        debug_assert_eq!(piece.color, self.side);
        let captured = self.mailbox[to as usize];
        self.steps.push(ProbeStep { from, to, moved: piece, captured });

        self.mailbox[to as usize] = Some(piece);
        self.mailbox[from as usize] = None;
        self.occupancy &= !square_bb(from);
        self.occupancy |= square_bb(to);
        self.side = !self.side;

        captured.map(|p| p.kind)
    }

    /// `UndoMoveSee`: desfaz o último `apply`.
    pub fn undo(&mut self) {
        let Some(step) = self.steps.pop() else {
            panic!("ExchangeProbe::undo sem passo pendente");
        };
        self.mailbox[step.from as usize] = Some(step.moved);
        self.mailbox[step.to as usize] = step.captured;
        self.occupancy |= square_bb(step.from);
        if step.captured.is_none() {
            self.occupancy &= !square_bb(step.to);
        }
        self.side = !self.side;
    }

    /// `GenerateSmallestCaptureSee`: atacante mais barato do lado a jogar sobre `to`.
    ///
    /// A procura percorre peão, cavalo, bispo, torre, dama e rei, e as peças
    /// deslizantes usam a ocupação atual, pelo que os raios-X aparecem à medida
    /// que as peças da frente saem.
    pub fn smallest_capture(&self, to: Square) -> Option<(Piece, Square)> {
        let side = self.side;
        let occ = self.occupancy;

        for kind in PieceKind::ALL {
            // Peças que já saíram deixam de estar na ocupação
            let ours = self.board.pieces(side, kind) & occ & !square_bb(to);
            if ours == 0 {
                continue;
            }
            let reach = match kind {
                PieceKind::Pawn => get_pawn_attacks_lookup(!side, to),
                PieceKind::Knight => get_knight_attacks_lookup(to),
                PieceKind::Bishop => get_bishop_attacks_magic(to, occ),
                PieceKind::Rook => get_rook_attacks_magic(to, occ),
                PieceKind::Queen => get_queen_attacks_magic(to, occ),
                PieceKind::King => get_king_attacks_lookup(to),
            };
            let attackers = reach & ours;
            if attackers != 0 {
                return Some((Piece::new(kind, side), attackers.trailing_zeros() as Square));
            }
        }
        None
    }
}

impl Drop for ExchangeProbe<'_> {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            debug_assert!(self.steps.is_empty(), "ExchangeProbe largada com {} passos por desfazer", self.steps.len());
        }
    }
}

impl Board {
    /// Abre uma sonda de trocas com `side` a jogar.
    pub fn exchange_probe(&self, side: Color) -> ExchangeProbe<'_> {
        ExchangeProbe::new(self, side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_and_undo_restore_probe_state() {
        let board = Board::from_fen("4k3/8/3q4/4P3/8/8/8/4K3 w - - 0 1").unwrap();
        let mut probe = board.exchange_probe(Color::White);
        let occ = probe.occupancy();

        let (piece, from) = probe.smallest_capture(43).unwrap();
        assert_eq!(piece.kind, PieceKind::Pawn);
        assert_eq!(from, 36);

        let captured = probe.apply(piece, from, 43);
        assert_eq!(captured, Some(PieceKind::Queen));
        assert_eq!(probe.side_to_move(), Color::Black);
        assert_eq!(probe.depth(), 1);
        probe.undo();
        assert_eq!(probe.occupancy(), occ);
        assert_eq!(probe.side_to_move(), Color::White);
        assert_eq!(board.to_fen(), "4k3/8/3q4/4P3/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn x_ray_attackers_appear_after_front_piece_moves() {
        // Duas torres dobradas na coluna d contra um peão em d7
        let board = Board::from_fen("4k3/3p4/8/8/8/8/3R4/3RK3 w - - 0 1").unwrap();
        let mut probe = board.exchange_probe(Color::White);
        let (first, from) = probe.smallest_capture(51).unwrap();
        assert_eq!((first.kind, from), (PieceKind::Rook, 11));
        probe.apply(first, from, 51);
        probe.apply(Piece::new(PieceKind::King, Color::Black), 60, 51);
        let (second, from) = probe.smallest_capture(51).unwrap();
        assert_eq!((second.kind, from), (PieceKind::Rook, 3));
        probe.undo();
        probe.undo();
    }

    #[test]
    fn reset_discards_pending_steps() {
        let board = Board::new();
        let mut probe = board.exchange_probe(Color::White);
        probe.apply(Piece::new(PieceKind::Pawn, Color::White), 12, 28);
        probe.reset(Color::White);
        assert_eq!(probe.depth(), 0);
        assert_eq!(probe.occupancy(), board.occupied());
    }
}
