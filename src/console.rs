//! Interactive console seat: `A5`-style coordinate input.

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::config::BOARD_SIZE;
use crate::grid::{CellMask, Coord};
use crate::node::Gunner;

/// Parse a coordinate like `B7`: column letter (A–J) then 1-based row.
pub fn parse_coord(input: &str) -> Result<Coord, String> {
    if input.len() < 2 {
        return Err("need a column letter and a row number, e.g. B7".to_string());
    }
    let mut chars = input.chars();
    let col_ch = chars.next().unwrap_or(' ').to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("invalid column '{}', expected A-J", col_ch));
    }
    let x = (col_ch as u8).wrapping_sub(b'A');
    if x >= BOARD_SIZE {
        return Err(format!("column '{}' out of bounds, expected A-J", col_ch));
    }
    let row_str: String = chars.collect();
    let row: u8 = row_str
        .parse()
        .map_err(|_| format!("invalid row '{}', expected 1-{}", row_str, BOARD_SIZE))?;
    if row == 0 || row > BOARD_SIZE {
        return Err(format!("row {} out of bounds, expected 1-{}", row, BOARD_SIZE));
    }
    Coord::new(x, row - 1).ok_or_else(|| "coordinate out of bounds".to_string())
}

/// A human at the terminal, prompted for each shot.
pub struct ConsoleGunner {
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleGunner {
    pub fn new() -> Self {
        ConsoleGunner {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for ConsoleGunner {
    fn default() -> Self {
        ConsoleGunner::new()
    }
}

#[async_trait::async_trait]
impl Gunner for ConsoleGunner {
    async fn pick_target(&mut self, shots: CellMask) -> anyhow::Result<Coord> {
        loop {
            print!("fire> ");
            std::io::stdout().flush()?;
            let Some(line) = self.lines.next_line().await? else {
                anyhow::bail!("console input closed");
            };
            match parse_coord(line.trim()) {
                Ok(c) if shots.get(c) => println!("already fired at {}", c),
                Ok(c) => return Ok(c),
                Err(e) => println!("{}", e),
            }
        }
    }

    fn observe_result(&mut self, coord: Coord, hit: bool, sunk: bool, _shots: CellMask) {
        if sunk {
            println!("{}: ship sunk! fire again", coord);
        } else if hit {
            println!("{}: hit, fire again", coord);
        } else {
            println!("{}: miss", coord);
        }
    }
}
