// Ficheiro: src/moves/magic_bitboards.rs
// Descrição: Tabelas de ataque das peças deslizantes indexadas por ocupação (magic bitboards).

use crate::core::types::{Bitboard, Square};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

// ============================================================================
// ESTRUTURAS FUNDAMENTAIS PARA MAGIC BITBOARDS
// ============================================================================

/// Dados de magic bitboard para uma casa.
#[derive(Clone, Copy, Default)]
struct MagicBitboard {
    mask: Bitboard,
    magic: u64,
    shift: u8,
    offset: usize,
}

impl MagicBitboard {
    #[inline(always)]
    fn index(&self, occupancy: Bitboard) -> usize {
        self.offset + (((occupancy & self.mask).wrapping_mul(self.magic)) >> self.shift) as usize
    }
}

/// Tabelas de torre e bispo, construídas uma única vez.
struct SliderTables {
    rook: [MagicBitboard; 64],
    bishop: [MagicBitboard; 64],
    attacks: Vec<Bitboard>,
}

static SLIDER_TABLES: OnceLock<SliderTables> = OnceLock::new();

const MAGIC_SEARCH_SEED: u64 = 0x5EED_1A9C;

// Números mágicos de partida. Os que colidirem são substituídos na construção das tabelas.
const ROOK_MAGICS: [u64; 64] = [
    0x0680024001108022, 0x0880108040042000, 0x0100181100402003, 0x0100050060b00088,
    0x0200082011040600, 0x0100060864002100, 0x1480020001000180, 0x0180008002506900,
    0x0003800020804000, 0x0002401000402000, 0x2240805000200084, 0x8409001000200900,
    0x4000808004000800, 0x00a1000400082300, 0x0002001804010200, 0x0041801040801500,
    0x8000808000400020, 0x9400404008e01000, 0x02050100102001c8, 0x0608008080081000,
    0x8002020011280420, 0x000280804a000400, 0x8000808001000200, 0x30d012001082c401,
    0x0440034080208000, 0x0000400040201000, 0x0860100080802000, 0x2030080080100180,
    0x0500100500480100, 0x0011090100040009, 0x8000100400086182, 0x0504040200208045,
    0x0002488102002201, 0x1002028102004020, 0x2000100080802002, 0x0080090025001000,
    0x0808811400800800, 0x8000801400801200, 0x0000391004000802, 0x8801012842000684,
    0x600020400080800b, 0x0140100806602000, 0x060b200010008080, 0x2002320220420008,
    0x088048010031002c, 0x2002144030080120, 0x1809001200010004, 0x000104008062000d,
    0x0802801520400080, 0x802a008020410a00, 0x0000200010008180, 0x5005003000282100,
    0x0020042800d10100, 0x0002001408102a00, 0x0000131018020400, 0xa014004124008600,
    0x1008800100401023, 0x0001042380904001, 0x00400a008090c022, 0x2000100008210005,
    0x2002001084208812, 0x000500180a840001, 0x00880810022300a4, 0x8040040116408022
];

const BISHOP_MAGICS: [u64; 64] = [
    0x0040040844404084, 0x002004208a004208, 0x8068180700200100, 0x0082408100004000,
    0x0001104020083980, 0x1082080444000400, 0x2000a29a09401400, 0x0802010400928820,
    0x800840032a060a00, 0xa0000421084a0080, 0x0000100186004ca0, 0x090002208a000000,
    0x22c0011040050000, 0x8000082405200400, 0x40000a861110400f, 0x0000882212100410,
    0x009200a042300d10, 0x02080104080801c1, 0x0018002c04440c48, 0x0154030802102000,
    0x0021000290400032, 0x4140c20201100141, 0x1001c00088080980, 0x0002000101010100,
    0x4002401020040c08, 0x8002080010010840, 0x0901480004012400, 0x810a0020080080a0,
    0x6a00840080802000, 0x0088214002004208, 0x391401000c110180, 0x100892002081c400,
    0x000110c008188813, 0x0001082000021422, 0x0554580800440042, 0x0200440102100900,
    0x0428002048040100, 0x0002040300103000, 0x00411206039c0100, 0x2004810200011082,
    0x0008088804008810, 0x0000490430842000, 0x00042010c8001006, 0x0000404010400201,
    0xc000084100400408, 0x4420140500480200, 0x0010022208425400, 0x0210414a09200080,
    0x0019908821100009, 0x4041012290044000, 0x09b4010845106114, 0x0000010020882008,
    0x4000140807040000, 0x0000082008518044, 0x0008100408604010, 0x0410018800808000,
    0x0c69008450021080, 0x0000528084100204, 0x0040060100511000, 0x28020400c0840408,
    0x0100008104a08200, 0x0000004010020482, 0x1020400408218108, 0x2004101009010053
];


/// Shift values para torres (quantos bits deslocar)
const ROOK_SHIFTS: [u8; 64] = [
    52, 53, 53, 53, 53, 53, 53, 52,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    52, 53, 53, 53, 53, 53, 53, 52
];

/// Shift values para bispos
const BISHOP_SHIFTS: [u8; 64] = [
    58, 59, 59, 59, 59, 59, 59, 58,
    59, 59, 59, 59, 59, 59, 59, 59,
    59, 59, 57, 57, 57, 57, 59, 59,
    59, 59, 57, 55, 55, 57, 59, 59,
    59, 59, 57, 55, 55, 57, 59, 59,
    59, 59, 57, 57, 57, 57, 59, 59,
    59, 59, 59, 59, 59, 59, 59, 59,
    58, 59, 59, 59, 59, 59, 59, 58
];


const ROOK_DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

// ============================================================================
// GERAÇÃO DE MÁSCARAS E ATAQUES
// ============================================================================

/// Máscara de bloqueadores relevantes: o raio completo sem a última casa.
const fn relevant_mask(square: Square, directions: &[(i32, i32); 4]) -> Bitboard {
    let mut result = 0u64;
    let rank = square as i32 / 8;
    let file = square as i32 % 8;

    let mut i = 0;
    while i < 4 {
        let (dr, df) = directions[i];
        let mut r = rank + dr;
        let mut f = file + df;
        // Só entra na máscara se ainda houver uma casa a seguir no mesmo raio
        while r + dr >= 0 && r + dr < 8 && f + df >= 0 && f + df < 8 {
            result |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
        i += 1;
    }

    result
}

/// Ataques calculados raio a raio, parando no primeiro bloqueador (inclusive).
fn slide_attacks(square: Square, occupancy: Bitboard, directions: &[(i32, i32); 4]) -> Bitboard {
    let mut result = 0u64;
    let rank = square as i32 / 8;
    let file = square as i32 % 8;

    for &(dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let target_bb = 1u64 << (r * 8 + f);
            result |= target_bb;
            if (occupancy & target_bb) != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    result
}

/// Todas as sub-ocupações de uma máscara (carry-rippler).
fn generate_occupancies(mask: Bitboard) -> Vec<Bitboard> {
    let mut result = Vec::with_capacity(1 << mask.count_ones());
    let mut subset = 0u64;
    loop {
        result.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    result
}

// ============================================================================
// INICIALIZAÇÃO DAS TABELAS
// ============================================================================

/// Preenche a fatia de uma casa; devolve `false` se o magic provocar uma colisão destrutiva.
fn fill_square(
    slot: &mut [Bitboard],
    used: &mut [bool],
    magic: u64,
    shift: u8,
    occupancies: &[Bitboard],
    reference: &[Bitboard],
) -> bool {
    used.iter_mut().for_each(|u| *u = false);
    for (occ, attacks) in occupancies.iter().zip(reference) {
        let index = (occ.wrapping_mul(magic) >> shift) as usize;
        if used[index] {
            if slot[index] != *attacks {
                return false;
            }
        } else {
            used[index] = true;
            slot[index] = *attacks;
        }
    }
    true
}

fn build_kind(
    magics: &[u64; 64],
    shifts: &[u8; 64],
    directions: &[(i32, i32); 4],
    attacks: &mut Vec<Bitboard>,
    rng: &mut StdRng,
    label: &str,
) -> [MagicBitboard; 64] {
    let mut table = [MagicBitboard::default(); 64];

    for square in 0..64u8 {
        let sq = square as usize;
        let mask = relevant_mask(square, directions);
        let shift = shifts[sq];
        let size = 1usize << (64 - shift);
        let occupancies = generate_occupancies(mask);
        let reference: Vec<Bitboard> = occupancies
            .iter()
            .map(|&occ| slide_attacks(square, occ, directions))
            .collect();

        let offset = attacks.len();
        attacks.resize(offset + size, 0);
        let mut used = vec![false; size];
        let slot = &mut attacks[offset..offset + size];

        let mut magic = magics[sq];
        while !fill_square(slot, &mut used, magic, shift, &occupancies, &reference) {
            // Candidatos esparsos convergem mais depressa
            magic = loop {
                let candidate = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
                if (mask.wrapping_mul(candidate) >> 56).count_ones() >= 6 {
                    break candidate;
                }
            };
            debug!("{} magic for square {} collided, replaced by {:#018x}", label, square, magic);
        }

        table[sq] = MagicBitboard { mask, magic, shift, offset };
    }

    table
}

impl SliderTables {
    fn build() -> Self {
        let mut rng = StdRng::seed_from_u64(MAGIC_SEARCH_SEED);
        let mut attacks = Vec::new();
        let rook = build_kind(&ROOK_MAGICS, &ROOK_SHIFTS, &ROOK_DIRECTIONS, &mut attacks, &mut rng, "rook");
        let bishop = build_kind(&BISHOP_MAGICS, &BISHOP_SHIFTS, &BISHOP_DIRECTIONS, &mut attacks, &mut rng, "bishop");
        SliderTables { rook, bishop, attacks }
    }
}

#[inline(always)]
fn tables() -> &'static SliderTables {
    SLIDER_TABLES.get_or_init(SliderTables::build)
}

/// Constrói as tabelas antecipadamente (de outra forma acontece no primeiro uso).
pub fn init_magic_bitboards() {
    let _ = tables();
}

// ============================================================================
// FUNÇÕES PÚBLICAS DE ALTA PERFORMANCE
// ============================================================================

/// Ataques de torre para a ocupação dada.
#[inline(always)]
pub fn get_rook_attacks_magic(square: Square, occupancy: Bitboard) -> Bitboard {
    let t = tables();
    t.attacks[t.rook[square as usize].index(occupancy)]
}

/// Ataques de bispo para a ocupação dada.
#[inline(always)]
pub fn get_bishop_attacks_magic(square: Square, occupancy: Bitboard) -> Bitboard {
    let t = tables();
    t.attacks[t.bishop[square as usize].index(occupancy)]
}

/// Ataques de rainha (combinação de torre + bispo)
#[inline(always)]
pub fn get_queen_attacks_magic(square: Square, occupancy: Bitboard) -> Bitboard {
    get_rook_attacks_magic(square, occupancy) | get_bishop_attacks_magic(square, occupancy)
}
