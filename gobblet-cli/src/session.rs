//! Line-oriented game loop.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use anyhow::Context;
use gobblet_engine::{
    CellCoord, Color, EngineError, EngineState, GameEngine, Origin, Phase, Size, Source, WinCause,
};
use tracing::debug;

use crate::command::{Command, HELP};

/// What a command produced, ready to print.
#[derive(Debug)]
enum Reply {
    State(EngineState),
    Rejected(EngineError),
    Targets(Vec<CellCoord>),
    Help,
    Quit,
}

fn execute(engine: &mut GameEngine, command: Command) -> Reply {
    let result = match command {
        Command::Take(color, size) => {
            let color = color.unwrap_or(engine.current_player());
            engine.pick_up(Source::Reserve { color, size })
        }
        Command::Lift(cell) => engine.pick_up(Source::Cell(cell)),
        Command::Drop(cell) => engine.drop(cell),
        Command::Cancel => engine.cancel(),
        Command::Place(size, to) => {
            let color = engine.current_player();
            whole_turn(engine, Source::Reserve { color, size }, to)
        }
        Command::Slide(from, to) => whole_turn(engine, Source::Cell(from), to),
        Command::Reset => Ok(engine.reset()),
        Command::Show => Ok(engine.snapshot()),
        Command::Targets => {
            return match engine.phase() {
                Phase::PieceInHand => Reply::Targets(engine.legal_destinations()),
                Phase::AwaitingPickup => Reply::Rejected(EngineError::WrongPhase),
            }
        }
        Command::Help => return Reply::Help,
        Command::Quit => return Reply::Quit,
    };

    match result {
        Ok(state) => Reply::State(state),
        Err(err) => {
            debug!(%err, ?command, "command rejected");
            Reply::Rejected(err)
        }
    }
}

/// Pick up then drop. A drop that leaves the piece in hand is cancelled so
/// the command either completes a turn or changes nothing.
fn whole_turn(
    engine: &mut GameEngine,
    source: Source,
    to: CellCoord,
) -> Result<EngineState, EngineError> {
    engine.pick_up(source)?;
    engine.drop(to).inspect_err(|_| {
        if engine.phase() == Phase::PieceInHand {
            // A piece in hand during a running game can always be put back
            let cancelled = engine.cancel();
            debug_assert!(cancelled.is_ok(), "cancel with a piece in hand: {cancelled:?}");
        }
    })
}

fn size_name(size: Size) -> &'static str {
    match size {
        Size::Small => "small",
        Size::Medium => "medium",
        Size::Large => "large",
    }
}

fn reserve_line(state: &EngineState, color: Color) -> String {
    let counts = state.reserves.counts(color);
    let slots: Vec<String> = Size::all()
        .map(|size| format!("{}x{}", size.letter(), counts[size.index()]))
        .collect();
    format!("reserve {color}: {}", slots.join(" "))
}

/// Board grid, reserves and a status line.
pub fn render(state: &EngineState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "    0     1     2");
    for (row, cells) in state.board.iter().enumerate() {
        let tops: Vec<String> = cells
            .iter()
            .map(|stack| match stack.last() {
                Some(piece) if stack.len() > 1 => format!("{piece}+"),
                Some(piece) => format!("{piece} "),
                None => "-- ".to_string(),
            })
            .collect();
        let _ = writeln!(out, "{row}  {}", tops.join(" | "));
    }

    for color in Color::all() {
        let _ = writeln!(out, "{}", reserve_line(state, color));
    }

    if let Some(in_hand) = state.in_hand {
        let from = match in_hand.origin {
            Origin::Reserve => "reserve".to_string(),
            Origin::Cell(cell) => cell.to_string(),
        };
        let piece = in_hand.piece;
        let _ = writeln!(out, "holding {} {} from {from}", piece.color, size_name(piece.size));
    }

    match (state.winner, state.win_cause, state.winning_line) {
        (Some(winner), cause, Some(line)) => {
            let cells: Vec<String> = line.iter().map(ToString::to_string).collect();
            let how = match cause {
                Some(WinCause::Exposure) => " (exposed)",
                _ => "",
            };
            let _ = writeln!(out, "{winner} wins{how}: {}", cells.join(" "));
            let _ = writeln!(out, "type 'reset' to play again");
        }
        _ => {
            let action = match state.phase {
                Phase::AwaitingPickup => "pick up",
                Phase::PieceInHand => "drop",
            };
            let turn = state.move_count + 1;
            let _ = writeln!(out, "move {turn}: {} to {action}", state.current_player);
        }
    }
    out
}

/// Read commands from `input` until EOF or `quit`, writing replies to `out`.
pub fn run<R: BufRead, W: Write>(
    mut engine: GameEngine,
    input: R,
    mut out: W,
) -> anyhow::Result<()> {
    writeln!(out, "Gobblet Jr. Type 'help' for commands.")?;
    write!(out, "{}", render(&engine.snapshot()))?;
    out.flush()?;

    for line in input.lines() {
        let line = line.context("failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };

        match execute(&mut engine, command) {
            Reply::State(state) => write!(out, "{}", render(&state))?,
            Reply::Rejected(err) => writeln!(out, "rejected: {err}")?,
            Reply::Targets(cells) if cells.is_empty() => writeln!(out, "no legal destinations")?,
            Reply::Targets(cells) => {
                let cells: Vec<String> = cells.iter().map(ToString::to_string).collect();
                writeln!(out, "legal destinations: {}", cells.join(" "))?;
            }
            Reply::Help => writeln!(out, "{HELP}")?,
            Reply::Quit => break,
        }
        out.flush()?;
    }

    debug!(moves = engine.snapshot().move_count, "session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use gobblet_engine::EngineConfig;

    use super::*;

    fn play(script: &str) -> String {
        let mut out = Vec::new();
        run(GameEngine::default(), script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_empty_board() {
        let text = render(&GameEngine::default().snapshot());
        assert!(text.contains("0  --  | --  | -- "));
        assert!(text.contains("reserve A: Sx2 Mx2 Lx2"));
        assert!(text.contains("reserve B: Sx2 Mx2 Lx2"));
        assert!(text.contains("move 1: A to pick up"));
    }

    #[test]
    fn test_single_intents_take_a_turn() {
        let text = play("take L\ndrop 1 1\n");
        assert!(text.contains("holding A large from reserve"));
        assert!(text.contains("1  --  | AL  | -- "));
        assert!(text.contains("reserve A: Sx2 Mx2 Lx1"));
        assert!(text.contains("move 2: B to pick up"));
    }

    #[test]
    fn test_gobbled_stack_is_marked() {
        let text = play("S(0,0)\nL(0,0)\n");
        assert!(text.contains("0  BL+ | --  | -- "));
    }

    #[test]
    fn test_rejections_are_reported() {
        let text = play("drop 0 0\ntake S\ndrop 3 3\nfly away\n");
        assert!(text.contains("rejected: Intent not allowed in the current phase"));
        assert!(text.contains("rejected: Cell (3,3) is outside the 3x3 grid"));
        assert!(text.contains("error: unknown command 'fly away'"));
    }

    #[test]
    fn test_failed_whole_turn_changes_nothing() {
        let mut engine = GameEngine::default();
        assert!(matches!(
            execute(&mut engine, Command::Place(Size::Large, CellCoord::new(1, 1))),
            Reply::State(_)
        ));
        let before = engine.snapshot();

        // B cannot cover a large piece, nor drop off the board
        for command in [
            Command::Place(Size::Small, CellCoord::new(1, 1)),
            Command::Place(Size::Small, CellCoord::new(4, 0)),
        ] {
            assert!(matches!(execute(&mut engine, command), Reply::Rejected(_)));
            assert_eq!(engine.snapshot(), before);
        }
    }

    #[test]
    fn test_targets() {
        let mut engine = GameEngine::new(EngineConfig::default());
        assert!(matches!(
            execute(&mut engine, Command::Targets),
            Reply::Rejected(EngineError::WrongPhase)
        ));
        execute(&mut engine, Command::Take(None, Size::Small));
        match execute(&mut engine, Command::Targets) {
            Reply::Targets(cells) => assert_eq!(cells.len(), 9),
            other => panic!("expected targets, got {other:?}"),
        }
    }

    #[test]
    fn test_game_to_a_win_then_reset() {
        let text = play("S(0,0)\nS(1,0)\nS(0,1)\nS(1,1)\nM(0,2)\ntake L\nreset\nquit\ntake S\n");
        assert!(text.contains("A wins: (0,0) (0,1) (0,2)"));
        assert!(text.contains("rejected: Game is already over"));
        // Output after quit is never produced
        assert!(!text.contains("holding A small"));
        assert!(text.trim_end().ends_with("move 1: A to pick up"));
    }
}
