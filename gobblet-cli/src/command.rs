//! Typed terminal commands.
//!
//! Besides the one-intent commands (`take`, `lift`, `drop`, `cancel`) a whole
//! turn can be written in move notation: `S(0,0)` places a small piece from
//! reserve at (0,0), `(0,0)->(1,1)` moves a piece on the board.

use std::str::FromStr;

use anyhow::{anyhow, bail};
use gobblet_engine::{CellCoord, Color, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick up from a reserve slot; no color means the current player.
    Take(Option<Color>, Size),
    /// Pick up the top piece of a cell.
    Lift(CellCoord),
    Drop(CellCoord),
    Cancel,
    /// Take and drop in one go.
    Place(Size, CellCoord),
    /// Lift and drop in one go.
    Slide(CellCoord, CellCoord),
    Reset,
    Show,
    Targets,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  take [A|B] S|M|L     pick up from reserve
  lift <row> <col>     pick up the top piece of a cell
  drop <row> <col>     drop the piece in hand
  cancel               put the piece in hand back
  S(r,c) M(r,c) L(r,c) place from reserve in one step
  (r,c)->(r,c)         move a piece in one step
  targets              cells the piece in hand may be dropped on
  show | reset | help | quit";

/// Parse "S", "small", ... into a size.
fn parse_size(s: &str) -> Option<Size> {
    match s.to_ascii_lowercase().as_str() {
        "s" | "small" => Some(Size::Small),
        "m" | "medium" => Some(Size::Medium),
        "l" | "large" => Some(Size::Large),
        _ => None,
    }
}

/// Parse "(r,c)" or "r,c" into a coordinate. Range is checked by the engine.
fn parse_coords(s: &str) -> Option<CellCoord> {
    let s = s.trim().trim_start_matches('(').trim_end_matches(')');
    let (row, col) = s.split_once(',')?;
    Some(CellCoord::new(row.trim().parse().ok()?, col.trim().parse().ok()?))
}

/// Coordinates given as `r c`, `r,c` or `(r,c)`.
fn parse_cell_args(args: &[&str]) -> Option<CellCoord> {
    match args {
        [row, col] => Some(CellCoord::new(row.parse().ok()?, col.parse().ok()?)),
        [joined] => parse_coords(joined),
        _ => None,
    }
}

/// Move notation for a whole turn.
fn parse_notation(s: &str) -> Option<Command> {
    if let Some((from, to)) = s.split_once("->") {
        return Some(Command::Slide(parse_coords(from)?, parse_coords(to)?));
    }
    let (size, rest) = s.split_at_checked(1)?;
    if !rest.starts_with('(') {
        return None;
    }
    Some(Command::Place(parse_size(size)?, parse_coords(rest)?))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = words.split_first() else {
            bail!("empty command");
        };
        let cell = |args: &[&str]| {
            parse_cell_args(args)
                .ok_or_else(|| anyhow!("expected a cell as '<row> <col>' or '(r,c)'"))
        };
        let size = |s: &str| parse_size(s).ok_or_else(|| anyhow!("unknown size '{s}'"));

        let command = match verb.to_ascii_lowercase().as_str() {
            "take" => match args {
                [s] => Command::Take(None, size(s)?),
                [color, s] => Command::Take(
                    Some(color.parse().map_err(|e: String| anyhow!(e))?),
                    size(s)?,
                ),
                _ => bail!("usage: take [A|B] S|M|L"),
            },
            "lift" => Command::Lift(cell(args)?),
            "drop" => Command::Drop(cell(args)?),
            "cancel" if args.is_empty() => Command::Cancel,
            "reset" if args.is_empty() => Command::Reset,
            "show" if args.is_empty() => Command::Show,
            "targets" if args.is_empty() => Command::Targets,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => match parse_notation(&words.concat()) {
                Some(command) => command,
                None => bail!("unknown command '{}', try 'help'", line.trim()),
            },
        };
        Ok(command)
    }
}
