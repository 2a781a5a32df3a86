// Ficheiro: src/core/notation.rs
// Descrição: Conversão entre lances e texto (notação de coordenadas e SAN).

use super::board::Board;
use super::error::{ChessError, ChessResult};
use super::types::*;
use crate::moves::generator::{generate_legal_moves, has_legal_move};

fn strip_decorations(text: &str) -> String {
    text.trim()
        .trim_end_matches(['+', '#', '!', '?'])
        .replace('0', "O")
        .replace('=', "")
}

impl Board {
    /// Interpreta um lance em coordenadas (`e2e4`, `e7e8q`) ou SAN (`Nf3`, `O-O`, `e8=Q+`).
    pub fn parse_move(&mut self, text: &str) -> ChessResult<Move> {
        let legal = generate_legal_moves(self);

        let lower = text.trim().to_ascii_lowercase();
        if let Some(mv) = legal.iter().find(|m| m.to_string() == lower) {
            return Ok(*mv);
        }

        let wanted = strip_decorations(text);
        for &mv in legal.iter() {
            if strip_decorations(&self.move_to_san(mv)) == wanted {
                return Ok(mv);
            }
        }

        Err(ChessError::InvalidMove { text: text.to_string(), fen: self.to_fen() })
    }

    /// Escreve um lance legal em SAN, com `+` ou `#` quando aplicável.
    pub fn move_to_san(&mut self, mv: Move) -> String {
        let mut san = String::with_capacity(8);
        let to = mv.to();

        if mv.is_castling() {
            san.push_str(if file_of(to) == 6 { "O-O" } else { "O-O-O" });
        } else {
            let is_capture = mv.is_en_passant() || self.piece_at(to).is_some();
            let kind = mv.kind();

            if kind == PieceKind::Pawn {
                if is_capture {
                    san.push((b'a' + file_of(mv.from())) as char);
                }
            } else {
                san.push(kind.to_char().to_ascii_uppercase());

                // Desambiguação entre peças iguais que chegam à mesma casa
                let rivals: Vec<Move> = generate_legal_moves(self)
                    .into_iter()
                    .filter(|m| m.kind() == kind && m.to() == to && m.from() != mv.from())
                    .collect();
                if !rivals.is_empty() {
                    let same_file = rivals.iter().any(|m| file_of(m.from()) == file_of(mv.from()));
                    let same_rank = rivals.iter().any(|m| rank_of(m.from()) == rank_of(mv.from()));
                    let from_name = square_name(mv.from());
                    if !same_file {
                        san.push_str(&from_name[..1]);
                    } else if !same_rank {
                        san.push_str(&from_name[1..]);
                    } else {
                        san.push_str(&from_name);
                    }
                }
            }

            if is_capture {
                san.push('x');
            }
            san.push_str(&square_name(to));

            if let Some(promo) = mv.promotion() {
                san.push('=');
                san.push(promo.to_char().to_ascii_uppercase());
            }
        }

        if self.apply_move(mv) {
            if self.in_check() {
                san.push(if has_legal_move(self) { '+' } else { '#' });
            }
            self.undo_move();
        }

        san
    }
}

/// Variante principal em coordenadas, separada por espaços.
pub fn pv_to_string(pv: &[Move]) -> String {
    pv.iter().map(Move::to_string).collect::<Vec<_>>().join(" ")
}
