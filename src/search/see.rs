// Ficheiro: src/search/see.rs
// Descrição: Static Exchange Evaluation - saldo material de uma sequência de capturas numa casa.

use crate::core::exchange_probe::ExchangeProbe;
use crate::core::*;

/// Melhor ganho do lado a jogar na sonda ao capturar em `sq`, podendo parar a qualquer momento.
fn see_square(probe: &mut ExchangeProbe<'_>, sq: Square) -> Score {
    let Some((piece, from)) = probe.smallest_capture(sq) else {
        return 0;
    };

    let captured = probe.apply(piece, from, sq);
    let gain = captured.map_or(0, |kind| kind.see_value());
    let score = (gain - see_square(probe, sq)).max(0);
    probe.undo();

    score
}

/// Saldo da troca iniciada por `mv`, do ponto de vista de quem o joga.
///
/// A primeira captura é obrigatória; as recapturas seguintes usam sempre o
/// atacante mais barato e cada lado pode recusar continuar.
pub fn static_exchange_evaluation(board: &Board, mv: Move) -> Score {
    let mut probe = board.exchange_probe(board.side_to_move());
    let to = mv.to();

    let captured = probe.apply(mv.piece(), mv.from(), to);
    let gain = captured.map_or(0, |kind| kind.see_value());
    let score = gain - see_square(&mut probe, to);
    probe.undo();

    score
}

/// Quanto o adversário ganharia a capturar na casa de origem de `mv` se
/// passássemos a vez. Positivo quando a peça está en prise; 0 em xeque.
pub fn nm_static_exchange_evaluation(board: &Board, mv: Move) -> Score {
    if board.in_check() {
        return 0;
    }
    let mut probe = board.exchange_probe(!board.side_to_move());
    see_square(&mut probe, mv.from())
}
