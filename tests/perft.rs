use lance::moves::{perft, perft_divide};
use lance::{Board, START_FEN};

fn check(fen: &str, expected: &[u64]) {
    let mut board = Board::from_fen(fen).unwrap();
    let before = board.clone();
    for (idx, &nodes) in expected.iter().enumerate() {
        let depth = idx as u32 + 1;
        assert_eq!(perft(&mut board, depth), nodes, "{} d{}", fen, depth);
        assert!(board == before, "perft alterou o tabuleiro: {}", fen);
    }
}

#[test]
fn startpos() {
    check(START_FEN, &[20, 400, 8902, 197_281]);
}

#[test]
fn kiwipete() {
    check("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", &[48, 2039, 97_862]);
}

#[test]
fn position_3() {
    check("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812, 43_238]);
}

#[test]
fn position_4() {
    check("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", &[6, 264, 9467]);
}

#[test]
fn position_4_mirrored() {
    check("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1", &[6, 264, 9467]);
}

#[test]
fn position_5() {
    check("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8", &[44, 1486, 62_379]);
}

#[test]
fn divide_sums_to_perft() {
    let mut board = Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    let divide = perft_divide(&mut board, 2);
    assert_eq!(divide.len(), 48);
    assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 2039);
}
