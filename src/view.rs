//! Plain-text rendering of a match for the console.

use crate::config::BOARD_SIZE;
use crate::grid::{CellMask, Coord};
use crate::session::MatchSession;

/// Print this side's fleet board and its tracking board side by side.
pub fn print_match_view(session: &MatchSession) {
    let board = session.board();
    let occupied = board.occupied();
    let attacked = board.attacked();
    let shots = session.shots();
    let shot_hits = session.shot_hits();

    // sunk enemy ships are drawn from the geometry their results revealed
    let mut enemy_wrecks = CellMask::new();
    for info in session.enemy_sunk() {
        for i in 0..info.size {
            let (x, y) = if info.vertical {
                (info.x, info.y + i)
            } else {
                (info.x + i, info.y)
            };
            if let Some(c) = Coord::new(x, y) {
                enemy_wrecks.set(c);
            }
        }
    }

    let header: String = (0..BOARD_SIZE)
        .map(|x| format!(" {}", (b'A' + x) as char))
        .collect();
    println!("\n     your fleet             your shots");
    println!("  {}     {}", header, header);
    for y in 0..BOARD_SIZE {
        let mut own = String::new();
        let mut tracking = String::new();
        for x in 0..BOARD_SIZE {
            let Some(c) = Coord::new(x, y) else {
                continue;
            };
            own.push(' ');
            own.push(if attacked.get(c) && occupied.get(c) {
                'X'
            } else if occupied.get(c) {
                '#'
            } else if attacked.get(c) {
                'o'
            } else {
                '.'
            });
            tracking.push(' ');
            tracking.push(if enemy_wrecks.get(c) {
                '#'
            } else if shot_hits.get(c) {
                'X'
            } else if shots.get(c) {
                'o'
            } else {
                '.'
            });
        }
        println!("{:2}{}  {:2}{}", y + 1, own, y + 1, tracking);
    }
    println!(
        "\nenemy ships afloat: {}   your ships afloat: {}",
        session.enemy_ships_afloat(),
        board.ships_afloat()
    );
}
