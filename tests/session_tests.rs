//! Session-level tests: several rounds against one shuffled deck.

use card_market::core::{DeckSchema, GameSettings, SeenMemory};
use card_market::round::{RoundPhase, Side};
use card_market::session::Session;
use card_market::MarketError;

/// Play a full session buying one unit every round; return (spreads, balance).
fn play_buying(seed: u64) -> (Vec<(i64, i64)>, i64) {
    let mut session = Session::new(GameSettings::default(), seed).unwrap();
    let mut spreads = Vec::new();
    while let Some(mut round) = session.start_round().unwrap() {
        let spread = round.spread().unwrap();
        spreads.push((spread.bid, spread.ask));
        round.place_order(Side::Buy, 1).unwrap();
        session.finish_round(round, None).unwrap();
    }
    (spreads, session.balance())
}

/// Same seed, same session.
#[test]
fn test_session_replays_from_seed() {
    assert_eq!(play_buying(77), play_buying(77));
}

/// Balance after the session is the start plus every round's P/L.
#[test]
fn test_balance_accounting() {
    let mut session = Session::new(GameSettings::default().with_rounds(3), 13).unwrap();
    let mut total = 0;
    let mut side = Side::Buy;
    while let Some(mut round) = session.start_round().unwrap() {
        round.place_order(side, 2).unwrap();
        total += session.finish_round(round, Some(0)).unwrap().pnl;
        side = if side == Side::Buy { Side::Sell } else { Side::Buy };
    }

    assert_eq!(session.balance(), 500 + total);
    let history = session.history();
    assert_eq!(history.len(), 3);
    for pair in history.windows(2) {
        assert_eq!(pair[1].start_balance(), pair[0].end_balance());
    }
    assert!(history.iter().all(|r| r.phase() == RoundPhase::Settled));
}

/// Orders the balance cannot cover are rejected and can be retried.
#[test]
fn test_rejected_order_retry() {
    let settings = GameSettings::default().with_start_balance(30);
    let mut session = Session::new(settings, 4).unwrap();
    let mut round = session.start_round().unwrap().unwrap();

    let err = round.place_order(Side::Buy, 100).unwrap_err();
    assert!(matches!(err, MarketError::OrderRejected { balance: 30, .. }));
    assert_eq!(round.phase(), RoundPhase::Quoted);

    round.place_order(Side::Pass, 0).unwrap();
    let settlement = session.finish_round(round, None).unwrap();
    assert_eq!(settlement.pnl, 0);
    assert_eq!(session.balance(), 30);
}

/// The distribution of a dealt round covers its true value.
#[test]
fn test_distribution_covers_true_value() {
    let mut session = Session::new(GameSettings::default(), 8).unwrap();
    let round = session.start_round().unwrap().unwrap();
    let dist = session.distribution(&round).unwrap();

    let truth = round.sum_value().unwrap();
    assert!(dist.count(truth) > 0);
    assert!(dist.total() >= 50 * 49);
    let mean = dist.mean().unwrap();
    assert!((mean - round.ev().unwrap()).abs() < 1e-9);
}

/// Session memory keeps earlier rounds' cards out of later EV estimates.
#[test]
fn test_session_memory_shrinks_population() {
    let settings = GameSettings::default()
        .with_deck(DeckSchema::animals())
        .with_seen_memory(SeenMemory::Session)
        .with_rounds(3);
    let mut session = Session::new(settings, 31).unwrap();

    let mut unseen_sizes = Vec::new();
    while let Some(mut round) = session.start_round().unwrap() {
        let unseen = round.context().unseen(round.seen()).count();
        unseen_sizes.push(unseen + round.visibility().iter().filter(|up| **up).count());
        round.place_order(Side::Pass, 0).unwrap();
        session.finish_round(round, None).unwrap();
    }
    assert_eq!(unseen_sizes, vec![100, 97, 94]);
}

/// Invalid settings never produce a session.
#[test]
fn test_invalid_settings() {
    let empty = GameSettings::default().with_deck(DeckSchema::new(["2"], Vec::<String>::new()));
    assert!(matches!(Session::new(empty, 1), Err(MarketError::EmptySuits)));

    let unvalued = GameSettings::default().with_deck(DeckSchema::new(["2", "3", "Z"], ["♥", "♠"]));
    assert!(matches!(Session::new(unvalued, 1), Err(MarketError::MissingRankValue(_))));
}

/// A bid above every possible hand value never lets a Sell overflow the balance.
#[test]
fn test_sell_above_max_exposure_settles_in_range() {
    let deck = DeckSchema::new(["5"], ["♥", "♦", "♣", "♠", "★", "●", "▲", "■", "◆"]);
    let settings = GameSettings::default().with_deck(deck);
    let (mut session, mut round) = (0..500)
        .find_map(|seed| {
            let mut session = Session::new(settings.clone(), seed).unwrap();
            let round = session.start_round().unwrap().unwrap();
            let overpriced = round.spread().unwrap().bid > round.compute_max_exposure().unwrap();
            overpriced.then_some((session, round))
        })
        .unwrap();

    assert!(!round.validate_order(Side::Sell, i64::MAX));
    assert!(matches!(
        round.place_order(Side::Sell, i64::MAX / 2),
        Err(MarketError::Overflow(_))
    ));

    let bid = round.spread().unwrap().bid;
    round.place_order(Side::Sell, 1_000).unwrap();
    let settlement = session.finish_round(round, None).unwrap();
    assert_eq!(settlement.pnl, (bid - 15) * 1_000);
    assert_eq!(session.balance(), 500 + settlement.pnl);
}
