use broadside::{
    resolve, Board, BoardError, Coord, Orientation, Ship, ShipClass, ShipInfo,
};

fn coord(x: u8, y: u8) -> Coord {
    Coord::new(x, y).unwrap()
}

fn place(board: &mut Board, name: &'static str, len: u8, x: u8, y: u8, orientation: Orientation) {
    let ship = Ship::new(ShipClass::new(name, len), coord(x, y), orientation).unwrap();
    board.place_ship(ship).unwrap();
}

#[test]
fn test_placement_rejects_out_of_bounds() {
    let class = ShipClass::new("battleship", 4);
    assert_eq!(
        Ship::new(class, coord(7, 0), Orientation::Horizontal).unwrap_err(),
        BoardError::OutOfBounds
    );
    assert_eq!(
        Ship::new(class, coord(0, 8), Orientation::Vertical).unwrap_err(),
        BoardError::OutOfBounds
    );
    // x = 6 is the last horizontal origin that still fits
    let mut board = Board::new();
    place(&mut board, "battleship", 4, 6, 0, Orientation::Horizontal);
    assert_eq!(board.occupied().count(), 4);
}

#[test]
fn test_placement_enforces_adjacency_buffer() {
    let mut board = Board::new();
    place(&mut board, "destroyer", 2, 0, 0, Orientation::Horizontal);

    // sharing a cell
    let overlapping = Ship::new(
        ShipClass::new("submarine", 1),
        coord(1, 0),
        Orientation::Horizontal,
    )
    .unwrap();
    assert_eq!(board.place_ship(overlapping).unwrap_err(), BoardError::Overlap);

    // touching only diagonally is still rejected
    let diagonal = Ship::new(
        ShipClass::new("submarine", 1),
        coord(2, 1),
        Orientation::Horizontal,
    )
    .unwrap();
    assert_eq!(board.place_ship(diagonal).unwrap_err(), BoardError::Overlap);

    // one clear cell away is fine
    place(&mut board, "submarine", 1, 3, 0, Orientation::Horizontal);
    assert_eq!(board.ships().len(), 2);
}

#[test]
fn test_record_hit_miss_hit_sink() {
    let mut board = Board::new();
    place(&mut board, "destroyer", 2, 5, 5, Orientation::Vertical);

    let miss = board.record_hit(coord(0, 0)).unwrap();
    assert!(!miss.hit);
    assert!(miss.sunk_ship.is_none());

    let first = board.record_hit(coord(5, 5)).unwrap();
    assert!(first.hit);
    assert!(first.sunk_ship.is_none());
    assert_eq!(board.ships()[0].hit_count(), 1);
    assert!(!board.ships()[0].is_sunk());

    let second = board.record_hit(coord(5, 6)).unwrap();
    assert_eq!(
        second.sunk_ship,
        Some(ShipInfo {
            x: 5,
            y: 5,
            size: 2,
            vertical: true,
        })
    );
    assert!(board.ships()[0].is_sunk());
    assert!(board.is_defeated());
}

#[test]
fn test_repeat_coordinate_rejected_before_resolution() {
    let mut board = Board::new();
    place(&mut board, "destroyer", 2, 5, 5, Orientation::Vertical);

    board.record_hit(coord(5, 5)).unwrap();
    assert_eq!(
        board.record_hit(coord(5, 5)).unwrap_err(),
        BoardError::AlreadyAttacked
    );
    // the ship took exactly one hit; the repeat never reached it
    assert_eq!(board.ships()[0].hit_count(), 1);

    // a resolved miss is just as closed
    board.record_hit(coord(0, 0)).unwrap();
    assert_eq!(
        board.record_hit(coord(0, 0)).unwrap_err(),
        BoardError::AlreadyAttacked
    );
}

#[test]
fn test_sunk_flag_is_monotonic() {
    let mut board = Board::new();
    place(&mut board, "submarine", 1, 3, 3, Orientation::Horizontal);
    board.record_hit(coord(3, 3)).unwrap();
    assert!(board.ships()[0].is_sunk());
    // nothing that happens later unsinks it
    board.record_hit(coord(7, 7)).unwrap();
    assert!(board.ships()[0].is_sunk());
}

/// Full-manifest layout used by the defeat-counting test.
fn full_fleet() -> (Board, Vec<Coord>) {
    let mut board = Board::new();
    let layout: [(&'static str, u8, u8, u8); 10] = [
        ("battleship", 4, 0, 0),
        ("cruiser", 3, 5, 0),
        ("cruiser", 3, 0, 2),
        ("destroyer", 2, 4, 2),
        ("destroyer", 2, 7, 2),
        ("destroyer", 2, 0, 4),
        ("submarine", 1, 3, 4),
        ("submarine", 1, 5, 4),
        ("submarine", 1, 7, 4),
        ("submarine", 1, 0, 6),
    ];
    let mut cells = Vec::new();
    for (name, len, x, y) in layout {
        place(&mut board, name, len, x, y, Orientation::Horizontal);
        for i in 0..len {
            cells.push(coord(x + i, y));
        }
    }
    (board, cells)
}

#[test]
fn test_defeat_exactly_on_last_fleet_cell() {
    let (mut board, cells) = full_fleet();
    assert_eq!(cells.len(), 20);
    let (last, rest) = cells.split_last().unwrap();
    for c in rest {
        let record = board.record_hit(*c).unwrap();
        assert!(record.hit);
        assert!(!board.is_defeated(), "defeat reported before the last cell");
    }
    let record = board.record_hit(*last).unwrap();
    assert!(record.sunk_ship.is_some());
    assert!(board.is_defeated());
}

#[test]
fn test_resolve_single_cell_ship() {
    let mut board = Board::new();
    place(&mut board, "submarine", 1, 3, 3, Orientation::Horizontal);

    let outcome = resolve(coord(3, 3), &mut board).unwrap();
    assert!(outcome.hit);
    assert!(outcome.sunk);
    assert_eq!(
        outcome.ship,
        Some(ShipInfo {
            x: 3,
            y: 3,
            size: 1,
            vertical: false,
        })
    );
    assert!(outcome.defeated);
}

#[test]
fn test_resolve_turn_token_rule() {
    let mut board = Board::new();
    place(&mut board, "destroyer", 2, 5, 5, Orientation::Vertical);
    place(&mut board, "submarine", 1, 0, 9, Orientation::Horizontal);

    let miss = resolve(coord(0, 0), &mut board).unwrap();
    assert!(!miss.keeps_turn());

    let hit = resolve(coord(5, 5), &mut board).unwrap();
    assert!(hit.keeps_turn());

    // a sinking hit keeps the turn just like a plain hit
    let sink = resolve(coord(5, 6), &mut board).unwrap();
    assert!(sink.sunk);
    assert!(sink.keeps_turn());
    assert!(!sink.defeated);
}
