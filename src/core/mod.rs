// Ficheiro: src/core/mod.rs
// Descrição: Estado da posição e tipos fundamentais.

pub mod board;
pub mod error;
pub mod exchange_probe;
pub mod make_move;
pub mod notation;
pub mod types;
pub mod undo;
pub mod zobrist;

pub use board::{Board, CastlingRight, GameStatus, START_FEN};
pub use error::{ChessError, ChessResult, FenField};
pub use exchange_probe::ExchangeProbe;
pub use notation::pv_to_string;
pub use types::*;
pub use undo::UndoRecord;
