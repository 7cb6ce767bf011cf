//! Console front end for the market-making card game.
//!
//! Usage: `market-maker [seed] [settings.json] [history.json]`
//!
//! The optional third argument receives the session record when the game ends.
//!
//! Set `RUST_LOG=card_market=debug` to trace the engine.

use std::io::{self, BufRead, Write};

use card_market::{GameSettings, MarketError, Round, Session, Side};
use tracing_subscriber::EnvFilter;

const DIVIDER_WIDTH: usize = 60;
const HISTOGRAM_BINS: usize = 12;
const HISTOGRAM_BAR: usize = 30;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse()?,
        None => rand::random(),
    };
    let settings = match args.next() {
        Some(path) => GameSettings::from_json(&std::fs::read_to_string(path)?)?,
        None => GameSettings::default(),
    };
    let history_path = args.next();

    let mut session = Session::new(settings, seed)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Market making card game");
    divider();
    println!("Game settings:");
    for line in session.settings().display_lines() {
        println!("{line}");
    }
    println!("Card values:");
    for line in session.card_value_lines() {
        println!("{line}");
    }
    println!("If a card is face-down, it is displayed as --");

    while let Some(mut round) = session.start_round()? {
        divider();
        println!("Round {}\n", round.number());
        if let Some(event) = round.event() {
            println!("Market event: {event}\n");
        }
        println!("Cards this round:\n{}\n", round.dealt_view());
        if session.settings().show_distribution {
            show_distribution(&session, &round);
        }
        if let Some(spread) = round.spread() {
            println!("Market maker quotes {spread}\n");
        }
        if session.settings().show_balance {
            println!("Balance: {}", session.balance());
        }

        place_order(&mut round, &mut input)?;

        let settlement = round.settle()?;
        println!("\nCard Reveal");
        println!("{}\n", round.show_hand(card_market::round::FACE_DOWN));

        let reported = match round.order() {
            Some(order) if order.side != Side::Pass => {
                println!("Enter profit/loss (-ve is loss)");
                Some(prompt(&mut input, ">>> ", parse_pnl)?)
            }
            _ => None,
        };
        if let Some(pnl) = reported {
            if pnl != settlement.pnl {
                println!("Actual P/L was {}", settlement.pnl);
            }
        }

        session.finish_round(round, reported)?;
        if session.settings().show_balance {
            println!("Balance: {}", session.balance());
        }
    }

    divider();
    println!("Game summary");
    println!("{}", session.summary());
    if let Some(path) = history_path {
        std::fs::write(&path, session.history_json()?)?;
        println!("\nSession record written to {path}");
    }
    Ok(())
}

/// Print the histogram of possible hand values given the face-up cards.
fn show_distribution(session: &Session, round: &Round) {
    match session.distribution(round) {
        Ok(dist) => {
            println!("Possible hand values:");
            for line in dist.text_histogram(dist.len().min(HISTOGRAM_BINS), HISTOGRAM_BAR) {
                println!("{line}");
            }
            println!();
        }
        Err(e @ MarketError::EnumerationTooLarge { .. }) => println!("{e}\n"),
        Err(e) => tracing::warn!(round = round.number(), error = %e, "no distribution"),
    }
}

fn place_order(round: &mut Round, input: &mut impl BufRead) -> io::Result<()> {
    println!("Buy (B) / Sell (S) / Pass (P) followed by how many units e.g. B,10 or S,5");
    loop {
        let (side, units) = prompt(input, "Place order >>> ", parse_order)?;
        match round.place_order(side, units) {
            Ok(_) => return Ok(()),
            Err(MarketError::OrderRejected { side: Side::Buy, .. }) => {
                println!("Long position exceeds balance");
            }
            Err(MarketError::OrderRejected { side: Side::Sell, .. }) => {
                println!("Short position exceeds balance");
            }
            Err(e) => println!("{e}"),
        }
    }
}

/// Re-prompt until `parse` accepts a line.
fn prompt<T>(input: &mut impl BufRead, label: &str, parse: fn(&str) -> Option<T>) -> io::Result<T> {
    loop {
        print!("{label}");
        io::stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        match parse(&line) {
            Some(value) => return Ok(value),
            None => println!("Invalid input"),
        }
    }
}

/// `p`, `b,<units>` or `s,<units>`, case-insensitive.
fn parse_order(line: &str) -> Option<(Side, i64)> {
    let line = line.trim().to_ascii_lowercase();
    if line == "p" {
        return Some((Side::Pass, 0));
    }
    let (action, units) = line.split_once(',')?;
    let side = match action {
        "b" => Side::Buy,
        "s" => Side::Sell,
        _ => return None,
    };
    if units.starts_with('0') || !units.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let units: i64 = units.parse().ok()?;
    Some((side, units))
}

fn parse_pnl(line: &str) -> Option<i64> {
    line.trim().parse().ok()
}

fn divider() {
    println!("{}\n", "-".repeat(DIVIDER_WIDTH));
}
