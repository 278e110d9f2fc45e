use broadside::{parse_coord, Coord};

#[test]
fn test_parse_valid_coordinates() {
    assert_eq!(parse_coord("A1"), Ok(Coord::new(0, 0).unwrap()));
    assert_eq!(parse_coord("a1"), Ok(Coord::new(0, 0).unwrap()));
    assert_eq!(parse_coord("J10"), Ok(Coord::new(9, 9).unwrap()));
    assert_eq!(parse_coord("D5"), Ok(Coord::new(3, 4).unwrap()));
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(parse_coord("").is_err());
    assert!(parse_coord("A").is_err());
    assert!(parse_coord("5A").is_err());
    assert!(parse_coord("K1").is_err(), "column past J");
    assert!(parse_coord("A0").is_err(), "rows are 1-based");
    assert!(parse_coord("A11").is_err(), "row past 10");
    assert!(parse_coord("AA").is_err());
}
