// Ficheiro: src/core/board.rs
// Descrição: A struct Board (estado da posição), construção a partir de FEN e consultas.

use super::error::{ChessError, ChessResult, FenField};
use super::types::*;
use super::undo::UndoRecord;
use super::zobrist::zobrist;
use crate::moves::generator;
use crate::moves::king::get_king_attacks_lookup;
use crate::moves::knight::get_knight_attacks_lookup;
use crate::moves::magic_bitboards::{get_bishop_attacks_magic, get_rook_attacks_magic};
use crate::moves::pawn::get_pawn_attacks_lookup;
use std::fmt;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// Índices no array de bitboards: 0..12 são as peças (cor * 6 + tipo).
pub(crate) const WHITE_OCCUPANCY: usize = 12;
pub(crate) const BLACK_OCCUPANCY: usize = 13;
pub(crate) const EN_PASSANT_SLOT: usize = 14;
pub(crate) const NUM_BB_SLOTS: usize = 15;

#[inline(always)]
pub(crate) const fn occupancy_slot(color: Color) -> usize {
    WHITE_OCCUPANCY + color.index()
}

const LIGHT_SQUARES: Bitboard = 0x55AA55AA55AA55AA;
const BACK_RANKS: Bitboard = 0xFF00_0000_0000_00FF;

// ============================================================================
// DIREITOS DE ROQUE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastlingRight {
    WhiteShort,
    WhiteLong,
    BlackShort,
    BlackLong,
}

impl CastlingRight {
    pub const ALL: [CastlingRight; 4] = [
        CastlingRight::WhiteShort,
        CastlingRight::WhiteLong,
        CastlingRight::BlackShort,
        CastlingRight::BlackLong,
    ];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn color(self) -> Color {
        match self {
            CastlingRight::WhiteShort | CastlingRight::WhiteLong => Color::White,
            CastlingRight::BlackShort | CastlingRight::BlackLong => Color::Black,
        }
    }

    pub const fn king_from(self) -> Square {
        match self.color() {
            Color::White => 4,
            Color::Black => 60,
        }
    }

    pub const fn king_to(self) -> Square {
        match self {
            CastlingRight::WhiteShort => 6,
            CastlingRight::WhiteLong => 2,
            CastlingRight::BlackShort => 62,
            CastlingRight::BlackLong => 58,
        }
    }

    pub const fn rook_from(self) -> Square {
        match self {
            CastlingRight::WhiteShort => 7,
            CastlingRight::WhiteLong => 0,
            CastlingRight::BlackShort => 63,
            CastlingRight::BlackLong => 56,
        }
    }

    pub const fn rook_to(self) -> Square {
        match self {
            CastlingRight::WhiteShort => 5,
            CastlingRight::WhiteLong => 3,
            CastlingRight::BlackShort => 61,
            CastlingRight::BlackLong => 59,
        }
    }

    /// Casas que têm de estar vazias entre o rei e a torre.
    pub const fn between_mask(self) -> Bitboard {
        match self {
            CastlingRight::WhiteShort => 0x0000_0000_0000_0060,
            CastlingRight::WhiteLong => 0x0000_0000_0000_000E,
            CastlingRight::BlackShort => 0x6000_0000_0000_0000,
            CastlingRight::BlackLong => 0x0E00_0000_0000_0000,
        }
    }

    /// Casa que o rei atravessa (não pode estar atacada).
    pub const fn transit_square(self) -> Square {
        self.rook_to()
    }

    pub fn from_king_destination(to: Square) -> Option<CastlingRight> {
        CastlingRight::ALL.into_iter().find(|r| r.king_to() == to)
    }

    pub const fn fen_char(self) -> char {
        match self {
            CastlingRight::WhiteShort => 'K',
            CastlingRight::WhiteLong => 'Q',
            CastlingRight::BlackShort => 'k',
            CastlingRight::BlackLong => 'q',
        }
    }

    /// Direitos perdidos quando algo sai de (ou chega a) esta casa.
    pub(crate) fn touched_by(sq: Square) -> &'static [CastlingRight] {
        match sq {
            4 => &[CastlingRight::WhiteShort, CastlingRight::WhiteLong],
            7 => &[CastlingRight::WhiteShort],
            0 => &[CastlingRight::WhiteLong],
            60 => &[CastlingRight::BlackShort, CastlingRight::BlackLong],
            63 => &[CastlingRight::BlackShort],
            56 => &[CastlingRight::BlackLong],
            _ => &[],
        }
    }
}

/// Resultado de uma partida do ponto de vista do tabuleiro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    WhiteWins,
    BlackWins,
    Draw,
}

// ============================================================================
// ESTADO DA POSIÇÃO
// ============================================================================

// A struct principal do tabuleiro, usando Bitboards e uma mailbox paralela.
#[derive(Clone)]
pub struct Board {
    // Peças por cor e tipo, ocupação por cor e máscara de en passant.
    pub(crate) bb: [Bitboard; NUM_BB_SLOTS],

    // Peça em cada casa; concorda sempre com os bitboards.
    pub(crate) mailbox: [Option<Piece>; 64],

    // De quem é a vez de jogar.
    pub(crate) to_move: Color,

    pub(crate) castling: [bool; 4],

    // Para detecção de draws
    pub(crate) halfmove_clock: u16,   // Contador para regra dos 50 movimentos
    pub(crate) fullmove_number: u16,

    // Quem joga está em xeque
    pub(crate) in_check: bool,

    pub(crate) hash: u64,

    // Pilhas indexadas pelo número de lances aplicados
    pub(crate) undo_stack: Vec<UndoRecord>,
    pub(crate) hash_history: Vec<u64>,
    pub(crate) move_history: Vec<Move>,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    fn empty() -> Self {
        Board {
            bb: [0; NUM_BB_SLOTS],
            mailbox: [None; 64],
            to_move: Color::White,
            castling: [false; 4],
            halfmove_clock: 0,
            fullmove_number: 1,
            in_check: false,
            hash: 0,
            undo_stack: Vec::with_capacity(256),
            hash_history: Vec::with_capacity(256),
            move_history: Vec::with_capacity(256),
        }
    }

    /// Coloca uma peça sem registo de desfazer (só durante a construção).
    fn put_piece(&mut self, sq: Square, piece: Piece) {
        let bit = square_bb(sq);
        self.bb[piece.index()] |= bit;
        self.bb[occupancy_slot(piece.color)] |= bit;
        self.mailbox[sq as usize] = Some(piece);
    }

    /// Calcula os campos derivados depois de montar a posição.
    fn finish_setup(&mut self) {
        self.in_check = self.is_king_attacked(self.to_move);
        self.hash = self.compute_hash();
        self.hash_history.clear();
        self.hash_history.push(self.hash);
    }

    /// Cria um novo tabuleiro na posição inicial padrão.
    pub fn new() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for (file, kind) in BACK_RANK.iter().enumerate() {
            let file = file as Square;
            board.put_piece(file, Piece::new(*kind, Color::White));
            board.put_piece(8 + file, Piece::new(PieceKind::Pawn, Color::White));
            board.put_piece(48 + file, Piece::new(PieceKind::Pawn, Color::Black));
            board.put_piece(56 + file, Piece::new(*kind, Color::Black));
        }
        board.castling = [true; 4];
        board.finish_setup();
        board
    }

    /// Cria um novo tabuleiro a partir de uma string FEN (4 ou 6 campos).
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 4 && parts.len() != 6 {
            return Err(ChessError::fen(FenField::FieldCount, fen));
        }

        let mut board = Board::empty();

        // Colocação das peças (parts[0]), da oitava fila para a primeira
        let rows: Vec<&str> = parts[0].split('/').collect();
        if rows.len() != 8 {
            return Err(ChessError::fen(FenField::Placement, parts[0]));
        }
        for (i, row) in rows.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for ch in row.chars() {
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::fen(FenField::Placement, parts[0]));
                    }
                    file += digit as u8;
                } else {
                    let piece = Piece::from_char(ch)
                        .ok_or_else(|| ChessError::fen(FenField::Placement, parts[0]))?;
                    if file >= 8 {
                        return Err(ChessError::fen(FenField::Placement, parts[0]));
                    }
                    board.put_piece(rank * 8 + file, piece);
                    file += 1;
                }
                if file > 8 {
                    return Err(ChessError::fen(FenField::Placement, parts[0]));
                }
            }
            if file != 8 {
                return Err(ChessError::fen(FenField::Placement, parts[0]));
            }
        }
        for color in Color::ALL {
            if board.pieces(color, PieceKind::King).count_ones() != 1 {
                return Err(ChessError::fen(FenField::Placement, parts[0]));
            }
        }
        let pawns = board.pieces(Color::White, PieceKind::Pawn) | board.pieces(Color::Black, PieceKind::Pawn);
        if pawns & BACK_RANKS != 0 {
            return Err(ChessError::fen(FenField::Placement, parts[0]));
        }

        // Quem joga (parts[1])
        board.to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(ChessError::fen(FenField::SideToMove, other)),
        };

        // Roque (parts[2])
        if parts[2] != "-" {
            for ch in parts[2].chars() {
                let right = CastlingRight::ALL
                    .into_iter()
                    .find(|r| r.fen_char() == ch)
                    .ok_or_else(|| ChessError::fen(FenField::Castling, parts[2]))?;
                board.castling[right.index()] = true;
            }
        }

        // En passant (parts[3]): casa vazia atrás de um peão adversário
        if parts[3] != "-" {
            let us = board.to_move;
            let target_rank = if us == Color::White { 5 } else { 2 };
            let pushed_pawn = Some(Piece::new(PieceKind::Pawn, !us));
            let sq = parse_square(parts[3])
                .filter(|&sq| rank_of(sq) == target_rank)
                .filter(|&sq| board.mailbox[sq as usize].is_none())
                .filter(|&sq| board.mailbox[(sq as i8 - us.pawn_push()) as usize] == pushed_pawn)
                .ok_or_else(|| ChessError::fen(FenField::EnPassant, parts[3]))?;
            board.bb[EN_PASSANT_SLOT] = square_bb(sq);
        }

        // Relógios (parts[4], parts[5])
        if parts.len() == 6 {
            board.halfmove_clock = parts[4]
                .parse()
                .map_err(|_| ChessError::fen(FenField::HalfmoveClock, parts[4]))?;
            let fullmove: u16 = parts[5]
                .parse()
                .map_err(|_| ChessError::fen(FenField::FullmoveNumber, parts[5]))?;
            board.fullmove_number = fullmove.max(1);
        }

        board.finish_setup();

        // O lado que não joga não pode estar em xeque
        if board.is_king_attacked(!board.to_move) {
            return Err(ChessError::fen(FenField::Placement, parts[0]));
        }
        Ok(board)
    }

    /// Serializa a posição em FEN com os seis campos.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.mailbox[(rank * 8 + file) as usize] {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        let rights: String = CastlingRight::ALL
            .into_iter()
            .filter(|r| self.castling[r.index()])
            .map(CastlingRight::fen_char)
            .collect();
        if rights.is_empty() {
            fen.push('-');
        } else {
            fen.push_str(&rights);
        }

        fen.push(' ');
        match self.en_passant_square() {
            Some(sq) => fen.push_str(&square_name(sq)),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }

    // ========================================================================
    // ACESSORES
    // ========================================================================

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.to_move
    }

    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline(always)]
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    #[inline(always)]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.bb[Piece::new(kind, color).index()]
    }

    #[inline(always)]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.bb[occupancy_slot(color)]
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.bb[WHITE_OCCUPANCY] | self.bb[BLACK_OCCUPANCY]
    }

    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq as usize]
    }

    #[inline(always)]
    pub fn en_passant_mask(&self) -> Bitboard {
        self.bb[EN_PASSANT_SLOT]
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        match self.bb[EN_PASSANT_SLOT] {
            0 => None,
            mask => Some(mask.trailing_zeros() as Square),
        }
    }

    #[inline(always)]
    pub fn castling_right(&self, right: CastlingRight) -> bool {
        self.castling[right.index()]
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Número de lances aplicados desde a construção.
    pub fn ply_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Lances aplicados desde a construção, do mais antigo ao mais recente.
    pub fn move_history(&self) -> &[Move] {
        &self.move_history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.move_history.last().copied()
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(color, PieceKind::King).trailing_zeros() as Square
    }

    pub fn piece_count(&self, color: Color, kind: PieceKind) -> u32 {
        self.pieces(color, kind).count_ones()
    }

    // ========================================================================
    // ATAQUES
    // ========================================================================

    /// Todas as peças (das duas cores) que atacam `sq` com a ocupação dada.
    pub fn attackers_to(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let knights = self.bb[Piece::new(PieceKind::Knight, Color::White).index()]
            | self.bb[Piece::new(PieceKind::Knight, Color::Black).index()];
        let kings = self.bb[Piece::new(PieceKind::King, Color::White).index()]
            | self.bb[Piece::new(PieceKind::King, Color::Black).index()];
        let diagonal = self.pieces(Color::White, PieceKind::Bishop)
            | self.pieces(Color::Black, PieceKind::Bishop)
            | self.pieces(Color::White, PieceKind::Queen)
            | self.pieces(Color::Black, PieceKind::Queen);
        let straight = self.pieces(Color::White, PieceKind::Rook)
            | self.pieces(Color::Black, PieceKind::Rook)
            | self.pieces(Color::White, PieceKind::Queen)
            | self.pieces(Color::Black, PieceKind::Queen);

        // Um peão branco ataca `sq` se estiver onde um peão preto em `sq` atacaria
        (get_pawn_attacks_lookup(Color::Black, sq) & self.pieces(Color::White, PieceKind::Pawn))
            | (get_pawn_attacks_lookup(Color::White, sq) & self.pieces(Color::Black, PieceKind::Pawn))
            | (get_knight_attacks_lookup(sq) & knights)
            | (get_king_attacks_lookup(sq) & kings)
            | (get_bishop_attacks_magic(sq, occupancy) & diagonal)
            | (get_rook_attacks_magic(sq, occupancy) & straight)
    }

    /// Verifica se `square` está atacada por alguma peça de `attacking_color`.
    pub fn is_square_attacked(&self, square: Square, attacking_color: Color) -> bool {
        let them = attacking_color;

        // Verifica primeiro os atacantes mais baratos de testar
        if get_pawn_attacks_lookup(!them, square) & self.pieces(them, PieceKind::Pawn) != 0 {
            return true;
        }
        if get_knight_attacks_lookup(square) & self.pieces(them, PieceKind::Knight) != 0 {
            return true;
        }
        if get_king_attacks_lookup(square) & self.pieces(them, PieceKind::King) != 0 {
            return true;
        }

        let occupancy = self.occupied();
        let queens = self.pieces(them, PieceKind::Queen);
        let diagonal = self.pieces(them, PieceKind::Bishop) | queens;
        if diagonal != 0 && get_bishop_attacks_magic(square, occupancy) & diagonal != 0 {
            return true;
        }
        let straight = self.pieces(them, PieceKind::Rook) | queens;
        straight != 0 && get_rook_attacks_magic(square, occupancy) & straight != 0
    }

    /// O rei de `color` está atacado?
    #[inline]
    pub fn is_king_attacked(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), !color)
    }

    // ========================================================================
    // HASH E REPETIÇÕES
    // ========================================================================

    /// Calcula o hash Zobrist da posição a partir do zero.
    pub fn compute_hash(&self) -> u64 {
        let keys = zobrist();
        let mut hash = 0u64;

        for sq in 0..64u8 {
            if let Some(piece) = self.mailbox[sq as usize] {
                hash ^= keys.piece(piece, sq);
            }
        }

        for right in CastlingRight::ALL {
            if self.castling[right.index()] {
                hash ^= keys.castling[right.index()];
            }
        }

        // Conta mesmo que nenhum peão possa capturar (imprecisão conhecida)
        if let Some(sq) = self.en_passant_square() {
            hash ^= keys.en_passant[sq as usize];
        }

        if self.to_move == Color::Black {
            hash ^= keys.side_to_move;
        }

        hash
    }

    /// A posição atual já ocorreu pelo menos duas vezes antes.
    pub fn is_3fold(&self) -> bool {
        let Some((&current, earlier)) = self.hash_history.split_last() else {
            return false;
        };
        earlier.iter().filter(|&&h| h == current).count() >= 2
    }

    /// A posição atual ocorreu entre as últimas `window` posições anteriores.
    pub fn is_2fold(&self, window: usize) -> bool {
        let Some((&current, earlier)) = self.hash_history.split_last() else {
            return false;
        };
        earlier.iter().rev().take(window).any(|&h| h == current)
    }

    /// Verifica se há empate pela regra dos 50 movimentos
    pub fn is_50_moves(&self) -> bool {
        self.halfmove_clock >= 100 // 50 movimentos = 100 half-moves
    }

    /// Verifica se há empate por material insuficiente
    pub fn has_insufficient_material(&self) -> bool {
        let heavy = |c: Color| {
            self.pieces(c, PieceKind::Pawn) | self.pieces(c, PieceKind::Rook) | self.pieces(c, PieceKind::Queen)
        };
        if heavy(Color::White) | heavy(Color::Black) != 0 {
            return false;
        }

        let knights = self.pieces(Color::White, PieceKind::Knight) | self.pieces(Color::Black, PieceKind::Knight);
        let bishops = self.pieces(Color::White, PieceKind::Bishop) | self.pieces(Color::Black, PieceKind::Bishop);
        let minors = (knights | bishops).count_ones();

        // Rei contra rei, ou rei e uma peça menor contra rei
        if minors <= 1 {
            return true;
        }

        // Só bispos, todos na mesma cor de casa
        knights == 0 && (bishops & LIGHT_SQUARES == 0 || bishops & !LIGHT_SQUARES == 0)
    }

    /// Estado da partida. Precisa de `&mut` porque testa lances legais.
    pub fn game_status(&mut self) -> GameStatus {
        if !generator::has_legal_move(self) {
            return if !self.in_check {
                GameStatus::Draw
            } else if self.to_move == Color::White {
                GameStatus::BlackWins
            } else {
                GameStatus::WhiteWins
            };
        }

        if self.is_50_moves() || self.is_3fold() || self.has_insufficient_material() {
            return GameStatus::Draw;
        }

        GameStatus::Ongoing
    }
}

impl PartialEq for Board {
    /// Igualdade da posição; as pilhas de histórico não entram.
    fn eq(&self, other: &Self) -> bool {
        self.bb == other.bb
            && self.mailbox == other.mailbox
            && self.to_move == other.to_move
            && self.castling == other.castling
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
            && self.in_check == other.in_check
            && self.hash == other.hash
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = self.mailbox[(rank * 8 + file) as usize].map_or('.', Piece::to_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen())
    }
}
