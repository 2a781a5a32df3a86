// Ficheiro: src/moves/mod.rs
// Descrição: Tabelas de ataque e geração de lances de cada peça.

pub mod generator;
pub mod king;
pub mod knight;
pub mod magic_bitboards;
pub mod pawn;
pub mod perft;
pub mod sliding;

pub use generator::{
    check_legal, generate_legal_moves, generate_moves, has_legal_move, is_see_eligible, is_violent,
    CheckInfo, MoveGenMode, MoveList,
};
pub use perft::{perft, perft_divide};
