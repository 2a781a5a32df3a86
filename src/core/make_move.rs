// Ficheiro: src/core/make_move.rs
// Descrição: Aplicação e reversão incremental de lances (make/unmake com registo de desfazer).

use super::board::{occupancy_slot, Board, CastlingRight, EN_PASSANT_SLOT};
use super::types::*;
use super::undo::UndoRecord;
use super::zobrist::zobrist;

impl Board {
    // ========================================================================
    // MUTAÇÕES ELEMENTARES (todas gravam o valor antigo no registo)
    // ========================================================================

    #[inline(always)]
    fn set_bb(&mut self, rec: &mut UndoRecord, slot: usize, value: Bitboard) {
        rec.bitboards.push((slot as u8, self.bb[slot]));
        self.bb[slot] = value;
    }

    #[inline(always)]
    fn set_square(&mut self, rec: &mut UndoRecord, sq: Square, piece: Option<Piece>) {
        rec.squares.push((sq, self.mailbox[sq as usize]));
        self.mailbox[sq as usize] = piece;
    }

    /// Retira a peça de `sq` e devolve-a.
    fn remove_piece(&mut self, rec: &mut UndoRecord, sq: Square) -> Option<Piece> {
        let piece = self.mailbox[sq as usize]?;
        let bit = square_bb(sq);
        let occ = occupancy_slot(piece.color);
        self.set_bb(rec, piece.index(), self.bb[piece.index()] & !bit);
        self.set_bb(rec, occ, self.bb[occ] & !bit);
        self.set_square(rec, sq, None);
        self.hash ^= zobrist().piece(piece, sq);
        Some(piece)
    }

    fn place_piece(&mut self, rec: &mut UndoRecord, sq: Square, piece: Piece) {
        let bit = square_bb(sq);
        let occ = occupancy_slot(piece.color);
        self.set_bb(rec, piece.index(), self.bb[piece.index()] | bit);
        self.set_bb(rec, occ, self.bb[occ] | bit);
        self.set_square(rec, sq, Some(piece));
        self.hash ^= zobrist().piece(piece, sq);
    }

    fn revoke_castling(&mut self, rec: &mut UndoRecord, sq: Square) {
        for &right in CastlingRight::touched_by(sq) {
            let idx = right.index();
            if self.castling[idx] {
                rec.castling.push((idx as u8, true));
                self.castling[idx] = false;
                self.hash ^= zobrist().castling[idx];
            }
        }
    }

    // ========================================================================
    // APLICAR / DESFAZER
    // ========================================================================

    /// Aplica um lance pseudo-legal.
    ///
    /// Devolve `false` se o lance deixar o próprio rei atacado; nesse caso o
    /// tabuleiro já foi reposto e não se deve chamar `undo_move`.
    pub fn apply_move(&mut self, mv: Move) -> bool {
        let us = self.to_move;
        let from = mv.from();
        let to = mv.to();
        let mut rec = UndoRecord::new(mv, self.halfmove_clock, self.fullmove_number, self.in_check, self.hash);

        debug_assert_eq!(self.mailbox[from as usize], Some(mv.piece()), "{} em {}", mv, self.to_fen());

        // O alvo de en passant só vale por um lance
        if let Some(ep) = self.en_passant_square() {
            self.hash ^= zobrist().en_passant[ep as usize];
            self.set_bb(&mut rec, EN_PASSANT_SLOT, 0);
        }

        let mut reset_clock = mv.kind() == PieceKind::Pawn;

        if mv.is_en_passant() {
            let captured_sq = (to as i8 - us.pawn_push()) as Square;
            self.remove_piece(&mut rec, captured_sq);
            reset_clock = true;
        } else if self.remove_piece(&mut rec, to).is_some() {
            reset_clock = true;
        }

        let moving = self.remove_piece(&mut rec, from).unwrap_or(mv.piece());
        let landed = match mv.promotion() {
            Some(kind) => Piece::new(kind, us),
            None => moving,
        };
        self.place_piece(&mut rec, to, landed);

        if mv.is_castling() {
            if let Some(right) = CastlingRight::from_king_destination(to) {
                if let Some(rook) = self.remove_piece(&mut rec, right.rook_from()) {
                    self.place_piece(&mut rec, right.rook_to(), rook);
                }
            }
        }

        // Avanço duplo: marca a casa saltada (mesmo sem peão adversário ao lado)
        if moving.kind == PieceKind::Pawn && (to as i8 - from as i8).abs() == 16 {
            let ep = (from + to) / 2;
            self.set_bb(&mut rec, EN_PASSANT_SLOT, square_bb(ep));
            self.hash ^= zobrist().en_passant[ep as usize];
        }

        self.revoke_castling(&mut rec, from);
        self.revoke_castling(&mut rec, to);

        self.halfmove_clock = if reset_clock { 0 } else { self.halfmove_clock.saturating_add(1) };
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.to_move = !us;
        self.hash ^= zobrist().side_to_move;

        if self.is_king_attacked(us) {
            self.restore(rec);
            return false;
        }

        self.in_check = self.is_king_attacked(self.to_move);
        self.undo_stack.push(rec);
        self.hash_history.push(self.hash);
        self.move_history.push(mv);
        true
    }

    /// Desfaz o último lance aplicado com sucesso.
    ///
    /// Chamar sem um `apply_move` correspondente é uma violação de contrato.
    pub fn undo_move(&mut self) {
        let Some(rec) = self.undo_stack.pop() else {
            panic!("undo_move sem lance aplicado");
        };
        self.hash_history.pop();
        self.move_history.pop();
        self.restore(rec);
    }

    /// Repõe os campos gravados, na ordem inversa.
    fn restore(&mut self, rec: UndoRecord) {
        for &(slot, value) in rec.bitboards.iter().rev() {
            self.bb[slot as usize] = value;
        }
        for &(sq, piece) in rec.squares.iter().rev() {
            self.mailbox[sq as usize] = piece;
        }
        for &(idx, value) in rec.castling.iter().rev() {
            self.castling[idx as usize] = value;
        }
        self.halfmove_clock = rec.halfmove_clock;
        self.fullmove_number = rec.fullmove_number;
        self.in_check = rec.in_check;
        self.hash = rec.hash;
        self.to_move = !self.to_move;
    }

    /// Topo da pilha de desfazer.
    pub fn last_undo_record(&self) -> Option<&UndoRecord> {
        self.undo_stack.last()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::board::Board;
    use crate::core::types::*;
    use crate::moves::generator::{generate_moves, MoveGenMode};

    fn find(board: &Board, text: &str) -> Move {
        generate_moves(board, MoveGenMode::All)
            .into_iter()
            .find(|m| m.to_string() == text)
            .unwrap()
    }

    #[test]
    fn apply_then_undo_restores_position() {
        let mut board = Board::new();
        let before = board.clone();
        let mv = find(&board, "e2e4");
        assert!(board.apply_move(mv));
        assert_eq!(board.en_passant_square(), parse_square("e3"));
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.hash(), board.compute_hash());
        board.undo_move();
        assert_eq!(board, before);
        assert_eq!(board.ply_count(), 0);
    }

    #[test]
    fn illegal_move_is_rolled_back() {
        // O cavalo está cravado pela torre
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let before = board.clone();
        let mv = find(&board, "e2c3");
        assert!(!board.apply_move(mv));
        assert_eq!(board, before);
        assert_eq!(board.ply_count(), 0);
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10").unwrap();
        let mv = find(&board, "e1g1");
        assert!(mv.is_castling());
        assert!(board.apply_move(mv));
        assert_eq!(board.piece_at(5), Some(Piece::new(PieceKind::Rook, Color::White)));
        assert_eq!(board.piece_at(7), None);
        assert_eq!(board.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 4 10");
        assert_eq!(board.hash(), board.compute_hash());
        assert!(board.last_undo_record().map_or(false, |r| r.is_inline()));
    }

    #[test]
    fn en_passant_capture_removes_passed_pawn() {
        let mut board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let before = board.clone();
        let mv = find(&board, "e5d6");
        assert!(mv.is_en_passant());
        assert!(board.apply_move(mv));
        assert_eq!(board.piece_at(35), None);
        assert_eq!(board.to_fen(), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 2");
        board.undo_move();
        assert_eq!(board, before);
    }

    #[test]
    fn promotion_capture_updates_counts() {
        let mut board = Board::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mv = find(&board, "a7b8q");
        assert!(board.apply_move(mv));
        assert_eq!(board.piece_count(Color::White, PieceKind::Queen), 1);
        assert_eq!(board.piece_count(Color::White, PieceKind::Pawn), 0);
        assert_eq!(board.piece_count(Color::Black, PieceKind::Rook), 0);
        assert!(board.in_check());
        assert!(board.last_undo_record().map_or(false, |r| r.is_inline()));
    }

    #[test]
    fn rook_capture_in_corner_revokes_both_rights() {
        let mut board = Board::from_fen("r3k3/8/8/8/8/8/8/R3K3 w Qq - 0 1").unwrap();
        let mv = find(&board, "a1a8");
        assert!(board.apply_move(mv));
        assert!(board.to_fen().contains(" b - - "));
        board.undo_move();
        assert!(board.to_fen().contains(" w Qq - "));
    }

    #[test]
    fn repetition_is_detected() {
        let mut board = Board::new();
        for _ in 0..2 {
            for text in ["g1f3", "g8f6", "f3g1", "f6g8"] {
                let mv = find(&board, text);
                assert!(board.apply_move(mv));
            }
        }
        assert!(board.is_3fold());
        assert!(board.is_2fold(4));
        assert!(!board.is_2fold(3));
    }

    #[test]
    fn en_passant_target_breaks_repetition() {
        // A casa de en passant entra no hash mesmo sem peão que possa capturar
        let with_ep = Board::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1").unwrap();
        let without_ep = Board::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - - 0 1").unwrap();
        assert_ne!(with_ep.hash(), without_ep.hash());

        let mut board = Board::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(board.apply_move(find(&board, "e2e4")));
        let after_push = board.hash();

        let shuffle = ["e8d8", "e1d1", "d8e8", "d1e1"];
        for text in shuffle {
            let mv = find(&board, text);
            assert!(board.apply_move(mv));
        }
        // Mesmas peças e mesmo lado, mas sem en passant: não conta como repetição
        assert_ne!(board.hash(), after_push);
        assert!(!board.is_2fold(16));

        for text in shuffle {
            let mv = find(&board, text);
            assert!(board.apply_move(mv));
        }
        assert!(board.is_2fold(16));
    }

    #[test]
    #[should_panic]
    fn undo_without_apply_panics() {
        let mut board = Board::new();
        board.undo_move();
    }
}
