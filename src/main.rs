//! Bobr Ladder entry point
//!
//! Native builds run a line-oriented terminal table. The browser build is
//! driven through `bobr_ladder::web` instead.

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

/// Command-line flags for the terminal table
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "bobr-ladder", about = "Two-column wagering ladder in the terminal")]
struct Args {
    /// JSON game config (defaults are used if it is missing or invalid)
    config: Option<std::path::PathBuf>,

    /// Replay a session: the same seed deals the same rounds
    #[arg(long)]
    seed: Option<u64>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bobr_ladder::{GameConfig, Session};

    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path),
        None => GameConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut session = match Session::new(config, seed) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    log::info!("Bobr Ladder (native) starting with seed {seed}");

    let stdin = std::io::stdin();
    if let Err(e) = run(&mut session, stdin.lock(), std::io::stdout()) {
        log::error!("Terminal I/O failed: {e}");
    }
}

/// Read commands from `input` until it ends or the player quits
#[cfg(not(target_arch = "wasm32"))]
fn run(
    session: &mut bobr_ladder::Session,
    input: impl std::io::BufRead,
    mut out: impl std::io::Write,
) -> std::io::Result<()> {
    use bobr_ladder::BetAdjust;

    writeln!(out, "Commands: + - min max | bet <amount> | go | l r | q")?;
    draw(&mut out, session)?;
    prompt(&mut out)?;

    for line in input.lines() {
        let line = line?;
        let result = match line.trim() {
            "q" | "quit" => break,
            "" => {
                prompt(&mut out)?;
                continue;
            }
            "+" => Ok(session.adjust_bet(BetAdjust::Increase)),
            "-" => Ok(session.adjust_bet(BetAdjust::Decrease)),
            "min" => Ok(session.adjust_bet(BetAdjust::Min)),
            "max" => Ok(session.adjust_bet(BetAdjust::Max)),
            "go" => session.primary_action(),
            cmd => match cmd.strip_prefix("bet ") {
                Some(raw) => Ok(session.set_bet_from_input(raw)),
                None => session.choose_side_named(cmd),
            },
        };
        if let Err(e) = result {
            writeln!(out, "! {e}")?;
        }
        draw(&mut out, session)?;
        prompt(&mut out)?;
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn prompt(out: &mut impl std::io::Write) -> std::io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

#[cfg(not(target_arch = "wasm32"))]
fn draw(out: &mut impl std::io::Write, session: &bobr_ladder::Session) -> std::io::Result<()> {
    use bobr_ladder::game::{Cell, Settlement};

    let state = session.state();
    writeln!(out)?;
    for row in session.board() {
        let cell = |cell: Cell| match cell {
            Cell::Reward => row.reward.to_string(),
            Cell::Correct => "#".to_string(),
            Cell::Missed => "x".to_string(),
            Cell::Revealed => "o".to_string(),
        };
        let marker = if row.is_current { ">" } else { " " };
        writeln!(
            out,
            "{marker} {:>2} | {:>16} | {:>16}",
            row.level,
            cell(row.left),
            cell(row.right)
        )?;
    }
    match state.last_settlement {
        Some(Settlement::Completed(won)) => writeln!(out, "Ladder cleared! +{won}")?,
        Some(Settlement::CashedOut(won)) => writeln!(out, "Took {won}")?,
        Some(Settlement::Refunded(bet)) => writeln!(out, "Refunded {bet}")?,
        Some(Settlement::Forfeited(bet)) => writeln!(out, "Lost {bet}")?,
        None => {}
    }
    writeln!(
        out,
        "Balance {} | Bet {} | Reward {} | [{}]",
        state.balance,
        state.bet,
        state.accrued_reward,
        state.control_state.label()
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_main, this is just to satisfy the compiler
}
