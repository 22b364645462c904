//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree at a given depth;
//! the counts are compared against published values.

use super::{legal_moves, make_move_in_place, unmake_move};
use crate::Position;

/// Counts the leaf nodes at the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    let mut scratch = position.clone();
    perft_in_place(&mut scratch, depth)
}

fn perft_in_place(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for &m in &moves {
        let undo = make_move_in_place(position, m);
        nodes += perft_in_place(position, depth - 1);
        unmake_move(position, m, &undo);
    }
    nodes
}

/// Node count below each root move, sorted by UCI text.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let mut scratch = position.clone();
    let moves = legal_moves(position);
    let mut results = Vec::with_capacity(moves.len());

    for &m in &moves {
        let undo = make_move_in_place(&mut scratch, m);
        let nodes = perft_in_place(&mut scratch, depth.saturating_sub(1));
        unmake_move(&mut scratch, m, &undo);
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1";

    fn position(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn perft_startpos_shallow() {
        let start = Position::startpos();
        assert_eq!(perft(&start, 1), 20);
        assert_eq!(perft(&start, 2), 400);
        assert_eq!(perft(&start, 3), 8902);
    }

    #[test]
    fn perft_startpos_depth_4() {
        assert_eq!(perft(&Position::startpos(), 4), 197_281);
    }

    #[test]
    #[ignore]
    fn perft_startpos_depth_5() {
        assert_eq!(perft(&Position::startpos(), 5), 4_865_609);
    }

    #[test]
    fn perft_kiwipete() {
        let pos = position(KIWIPETE);
        assert_eq!(perft(&pos, 1), 48);
        assert_eq!(perft(&pos, 2), 2039);
    }

    #[test]
    #[ignore]
    fn perft_kiwipete_depth_3() {
        assert_eq!(perft(&position(KIWIPETE), 3), 97_862);
    }

    #[test]
    fn perft_position_3() {
        let pos = position(POSITION_3);
        assert_eq!(perft(&pos, 1), 14);
        assert_eq!(perft(&pos, 2), 191);
        assert_eq!(perft(&pos, 3), 2812);
    }

    #[test]
    fn perft_position_4() {
        let pos = position(POSITION_4);
        assert_eq!(perft(&pos, 1), 6);
        assert_eq!(perft(&pos, 2), 264);
        assert_eq!(perft(&pos, 3), 9467);
    }

    #[test]
    fn perft_position_5() {
        let pos = position(POSITION_5);
        assert_eq!(perft(&pos, 1), 44);
        assert_eq!(perft(&pos, 2), 1486);
    }

    #[test]
    fn divide_sums_to_perft() {
        let start = Position::startpos();
        let divided = perft_divide(&start, 2);
        assert_eq!(divided.len(), 20);
        assert_eq!(divided.iter().map(|(_, n)| n).sum::<u64>(), 400);
        assert_eq!(divided[0].0, "a2a3");
    }

    #[test]
    fn perft_leaves_position_untouched() {
        let pos = position(KIWIPETE);
        let before = pos.clone();
        perft(&pos, 2);
        assert_eq!(pos, before);
    }
}
