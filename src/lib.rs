// Motor Xadrez - núcleo de busca: tabuleiro em bitboards, geração de lances, SEE e Alpha-Beta

pub mod core;
pub mod moves;
pub mod search;

pub use core::*;
