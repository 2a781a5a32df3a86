// Ficheiro: src/core/zobrist.rs
// Descrição: Chaves Zobrist para o hash incremental e a deteção de repetições.

use super::types::{Piece, Square};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

/// Semente fixa: o mesmo tabuleiro tem sempre o mesmo hash entre execuções.
const ZOBRIST_SEED: u64 = 53_820_873;

pub struct ZobristKeys {
    pub pieces: [[u64; 64]; 12],  // [cor * 6 + tipo][casa]
    pub castling: [u64; 4],       // Um por direito de roque
    pub en_passant: [u64; 64],    // Pela casa alvo
    pub side_to_move: u64,        // Ativo quando jogam as pretas
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut keys = ZobristKeys {
            pieces: [[0; 64]; 12],
            castling: [0; 4],
            en_passant: [0; 64],
            side_to_move: 0,
        };

        for piece in keys.pieces.iter_mut() {
            for key in piece.iter_mut() {
                *key = rng.gen();
            }
        }
        for key in keys.castling.iter_mut() {
            *key = rng.gen();
        }
        for key in keys.en_passant.iter_mut() {
            *key = rng.gen();
        }
        keys.side_to_move = rng.gen();

        keys
    }

    #[inline(always)]
    pub fn piece(&self, piece: Piece, sq: Square) -> u64 {
        self.pieces[piece.index()][sq as usize]
    }
}

static ZOBRIST_KEYS: OnceLock<ZobristKeys> = OnceLock::new();

/// Instância global das chaves Zobrist.
#[inline]
pub fn zobrist() -> &'static ZobristKeys {
    ZOBRIST_KEYS.get_or_init(ZobristKeys::generate)
}
