// Ficheiro: src/search/report.rs
// Descrição: Adapta as callbacks do controlador a canais crossbeam.

use crate::search::controller::{FinalMoveCallback, ThinkingCallback, ThinkingOutput};
use crossbeam::channel::{bounded, unbounded, Receiver};
use log::debug;

/// Callback de pensamento que envia cada iteração para um canal.
///
/// Se o recetor for largado, as iterações seguintes são descartadas.
pub fn thinking_channel() -> (ThinkingCallback, Receiver<ThinkingOutput>) {
    let (tx, rx) = unbounded();
    let callback: ThinkingCallback = Box::new(move |output: &ThinkingOutput| {
        if tx.send(output.clone()).is_err() {
            debug!("recetor do pensamento largado; iteração {} descartada", output.ply);
        }
    });
    (callback, rx)
}

/// Callback do lance final ligada a um canal de capacidade 1.
pub fn final_move_channel() -> (FinalMoveCallback, Receiver<String>) {
    let (tx, rx) = bounded(1);
    let callback: FinalMoveCallback = Box::new(move |mv: String| {
        if let Err(err) = tx.send(mv) {
            debug!("recetor do lance final largado; {} descartado", err.into_inner());
        }
    });
    (callback, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;
    use crate::search::config::SearchConfig;
    use crate::search::controller::{AsyncSearch, RootSearchContext};
    use crate::search::evaluation::MaterialEvaluator;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn channels_receive_search_output() {
        let (thinking, thinking_rx) = thinking_channel();
        let (final_move, final_rx) = final_move_channel();

        let mut context =
            RootSearchContext::new(Board::new(), SearchConfig::default().with_depth(2), Arc::new(MaterialEvaluator));
        context.thinking_output = Some(thinking);
        context.final_move = Some(final_move);

        let mut search = AsyncSearch::new(context);
        search.start().unwrap();
        search.join();

        let outputs: Vec<ThinkingOutput> = thinking_rx.try_iter().collect();
        assert_eq!(outputs.len(), 2);
        let mv = final_rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(Some(mv), outputs[1].pv.first().map(|m| m.to_string()));
    }

    #[test]
    fn dropped_receivers_are_ignored() {
        // Sem recetor, os envios falham em silêncio e a busca segue
        let (mut thinking, thinking_rx) = thinking_channel();
        let (final_move, final_rx) = final_move_channel();
        drop(thinking_rx);
        drop(final_rx);

        let output = ThinkingOutput { ply: 1, score: 0, time: Duration::ZERO, node_count: 1, pv: Vec::new() };
        thinking(&output);
        thinking(&output);
        final_move("e2e4".to_string());
    }
}
