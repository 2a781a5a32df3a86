// Ficheiro: src/core/types.rs
// Descrição: Tipos fundamentais do motor: bitboards, cores, peças, lances e pontuações.

use super::error::{ChessError, ChessResult};
use std::fmt;

// Um Bitboard é um inteiro de 64 bits sem sinal. Cada bit representa uma casa.
// Bit 0 = a1, Bit 1 = b1, ..., Bit 63 = h8.
pub type Bitboard = u64;

/// Índice de casa (0 = a1, 63 = h8).
pub type Square = u8;

/// Pontuação em centipeões, sempre do ponto de vista de quem joga.
pub type Score = i32;

// ============================================================================
// PONTUAÇÕES ESPECIAIS
// ============================================================================

pub const DRAW_SCORE: Score = 0;

/// Quem joga dá mate.
pub const MATE_MOVING_SIDE: Score = 30000;
/// Quem joga leva mate.
pub const MATE_OPPONENT_SIDE: Score = -30000;

/// Acima deste valor absoluto a pontuação é considerada de mate.
pub const MATE_THRESHOLD: Score = 20000;

/// Limite das janelas alfa-beta; fica fora de qualquer pontuação real.
pub const SCORE_INF: Score = 32000;

/// Aproxima do zero uma pontuação de mate ao subir um ply.
/// Mates mais próximos da raiz ficam com valores absolutos maiores.
#[inline]
pub fn adjust_if_mate(score: Score) -> Score {
    if score > MATE_THRESHOLD {
        score - 1
    } else if score < -MATE_THRESHOLD {
        score + 1
    } else {
        score
    }
}

#[inline]
pub fn is_mate_score(score: Score) -> bool {
    score.abs() > MATE_THRESHOLD
}

/// Número de lances (não plies) até ao mate, positivo se quem joga dá mate.
pub fn mate_in_moves(score: Score) -> Option<i32> {
    if !is_mate_score(score) {
        return None;
    }
    let moves = (MATE_MOVING_SIDE - score.abs() + 1) / 2;
    Some(if score > 0 { moves } else { -moves })
}

// ============================================================================
// CORES E PEÇAS
// ============================================================================

// Enum para representar a cor de uma peça ou de um jogador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Deslocamento de um avanço simples de peão.
    #[inline]
    pub const fn pawn_push(self) -> i8 {
        match self {
            Color::White => 8,
            Color::Black => -8,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

// Enum para representar o tipo de uma peça de xadrez.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Ordem crescente de valor, usada pelo SEE para escolher o atacante mais barato.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub const PROMOTIONS: [PieceKind; 4] =
        [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn value(&self) -> i32 {
        match self {
            PieceKind::Pawn   => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook   => 500,
            PieceKind::Queen  => 900,
            PieceKind::King   => 20000, // Valor alto para evitar trocas
        }
    }

    /// Valor material usado na avaliação de trocas.
    pub fn see_value(&self) -> Score {
        match self {
            PieceKind::King => 10000,
            other => other.value(),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

// Struct para representar uma peça no tabuleiro, combinando o tipo e a cor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color }
    }

    /// Índice do bitboard desta peça (cor * 6 + tipo).
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.color.index() * 6 + self.kind.index()
    }

    /// Letra FEN: maiúscula para as brancas.
    pub fn to_char(self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(kind, color))
    }
}

// ============================================================================
// CASAS
// ============================================================================

#[inline(always)]
pub const fn square_bb(sq: Square) -> Bitboard {
    1u64 << sq
}

#[inline(always)]
pub const fn file_of(sq: Square) -> u8 {
    sq % 8
}

#[inline(always)]
pub const fn rank_of(sq: Square) -> u8 {
    sq / 8
}

pub fn square_name(sq: Square) -> String {
    let file = file_of(sq) + b'a';
    let rank = rank_of(sq) + b'1';
    format!("{}{}", file as char, rank as char)
}

pub fn parse_square(text: &str) -> Option<Square> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some((rank - b'1') * 8 + (file - b'a'))
}

/// Como `parse_square`, mas o erro guarda o texto recusado.
pub fn square_from_name(text: &str) -> ChessResult<Square> {
    parse_square(text).ok_or_else(|| ChessError::InvalidSquare(text.to_string()))
}

// ============================================================================
// LANCE CODIFICADO
// ============================================================================

// Layout dos bits:
//  0..6   casa de origem
//  6..12  casa de destino
//  12..15 tipo da peça que se move
//  15     cor da peça que se move
//  16..19 promoção (0 = nenhuma, senão índice do tipo)
//  19     en passant
//  20     roque
const TO_SHIFT: u32 = 6;
const KIND_SHIFT: u32 = 12;
const COLOR_BIT: u32 = 1 << 15;
const PROMO_SHIFT: u32 = 16;
const EN_PASSANT_BIT: u32 = 1 << 19;
const CASTLING_BIT: u32 = 1 << 20;

/// Lance compacto. A igualdade é feita pelo padrão de bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    #[inline]
    pub const fn new(piece: Piece, from: Square, to: Square) -> Self {
        let color = match piece.color {
            Color::White => 0,
            Color::Black => COLOR_BIT,
        };
        Move(
            from as u32
                | (to as u32) << TO_SHIFT
                | (piece.kind as u32) << KIND_SHIFT
                | color,
        )
    }

    #[inline]
    pub const fn with_promotion(self, kind: PieceKind) -> Self {
        Move(self.0 | (kind as u32) << PROMO_SHIFT)
    }

    #[inline]
    pub const fn en_passant(piece: Piece, from: Square, to: Square) -> Self {
        Move(Move::new(piece, from, to).0 | EN_PASSANT_BIT)
    }

    #[inline]
    pub const fn castling(piece: Piece, from: Square, to: Square) -> Self {
        Move(Move::new(piece, from, to).0 | CASTLING_BIT)
    }

    #[inline(always)]
    pub const fn from(self) -> Square {
        (self.0 & 0x3f) as Square
    }

    #[inline(always)]
    pub const fn to(self) -> Square {
        ((self.0 >> TO_SHIFT) & 0x3f) as Square
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.0 & COLOR_BIT != 0 { Color::Black } else { Color::White }
    }

    #[inline]
    pub fn kind(self) -> PieceKind {
        PieceKind::ALL[((self.0 >> KIND_SHIFT) & 0x7) as usize]
    }

    #[inline]
    pub fn piece(self) -> Piece {
        Piece::new(self.kind(), self.color())
    }

    #[inline]
    pub fn promotion(self) -> Option<PieceKind> {
        match (self.0 >> PROMO_SHIFT) & 0x7 {
            0 => None,
            idx => Some(PieceKind::ALL[idx as usize]),
        }
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.0 & EN_PASSANT_BIT != 0
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        self.0 & CASTLING_BIT != 0
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = square_name(self.from());
        let to = square_name(self.to());
        match self.promotion() {
            Some(p) => write!(f, "{}{}{}", from, to, p.to_char()),
            None => write!(f, "{}{}", from, to),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_names_parse_or_fail() {
        assert_eq!(square_from_name("a1").unwrap(), 0);
        assert_eq!(square_from_name("h8").unwrap(), 63);
        for bad in ["i1", "a9", "e", "e44"] {
            match square_from_name(bad) {
                Err(ChessError::InvalidSquare(text)) => assert_eq!(text, bad),
                other => panic!("expected square error for {}: {:?}", bad, other),
            }
        }
    }

    #[test]
    fn move_fields_survive_encoding() {
        let pawn = Piece::new(PieceKind::Pawn, Color::Black);
        let mv = Move::new(pawn, 12, 4).with_promotion(PieceKind::Knight);
        assert_eq!(mv.from(), 12);
        assert_eq!(mv.to(), 4);
        assert_eq!(mv.piece(), pawn);
        assert_eq!(mv.promotion(), Some(PieceKind::Knight));
        assert!(!mv.is_castling());
        assert!(!mv.is_en_passant());
        assert_eq!(mv.to_string(), "e2e1n");
    }

    #[test]
    fn special_flags_are_part_of_equality() {
        let king = Piece::new(PieceKind::King, Color::White);
        assert_ne!(Move::new(king, 4, 6), Move::castling(king, 4, 6));
        assert!(Move::castling(king, 4, 6).is_castling());
    }

    #[test]
    fn square_names_round_trip() {
        assert_eq!(square_name(0), "a1");
        assert_eq!(square_name(63), "h8");
        assert_eq!(parse_square("e4"), Some(28));
        assert_eq!(parse_square("i9"), None);
        assert_eq!(parse_square("e"), None);
    }

    #[test]
    fn mate_scores_shrink_towards_zero() {
        assert_eq!(adjust_if_mate(MATE_MOVING_SIDE), MATE_MOVING_SIDE - 1);
        assert_eq!(adjust_if_mate(MATE_OPPONENT_SIDE), MATE_OPPONENT_SIDE + 1);
        assert_eq!(adjust_if_mate(150), 150);
        assert_eq!(mate_in_moves(MATE_MOVING_SIDE - 1), Some(1));
        assert_eq!(mate_in_moves(MATE_MOVING_SIDE - 3), Some(2));
        assert_eq!(mate_in_moves(-(MATE_MOVING_SIDE - 2)), Some(-1));
        assert_eq!(mate_in_moves(40), None);
    }
}
