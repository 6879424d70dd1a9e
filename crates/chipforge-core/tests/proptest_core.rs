//! Property-based tests for the Chipforge core engine.
//!
//! Uses proptest to generate random numbers and action sequences, then
//! verify the invariants that every snapshot must keep.

use chipforge_core::automation;
use chipforge_core::big::Big;
use chipforge_core::engine::Game;
use chipforge_core::fabrication;
use chipforge_core::id::*;
use chipforge_core::sim::{self, ManualClock};
use chipforge_core::state::GameState;
use chipforge_core::test_utils::*;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// Player actions for random sessions.
#[derive(Debug, Clone)]
enum Action {
    Mine(usize),
    CraftWafer(usize, u32),
    CraftChip(usize, u32),
    BuyResearch(usize),
    BuyMiner(usize),
    CancelCrafting,
    Wait(u64),
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (0..MineralId::ALL.len()).prop_map(Action::Mine),
        2 => (0..WaferId::ALL.len(), 0..4u32).prop_map(|(w, n)| Action::CraftWafer(w, n)),
        2 => (0..ChipId::ALL.len(), 0..4u32).prop_map(|(c, n)| Action::CraftChip(c, n)),
        1 => (0..ResearchId::ALL.len()).prop_map(Action::BuyResearch),
        1 => (0..AutoMinerId::ALL.len()).prop_map(Action::BuyMiner),
        1 => Just(Action::CancelCrafting),
        3 => (0..20_000u64).prop_map(Action::Wait),
    ]
}

/// A well-stocked game so that most actions are accepted.
fn rich_game() -> (Game<ManualClock>, ManualClock) {
    let mut state = with_feature(GameState::new(0), Feature::AutoMiner);
    give_minerals(&mut state, 5_000.0);
    give_wafers(&mut state, 20.0);
    state.total_flops = Big::from_f64(1e12);
    manual_game_with(state)
}

fn apply(game: &mut Game<ManualClock>, clock: &ManualClock, action: &Action) -> bool {
    match *action {
        Action::Mine(i) => game.mine(MineralId::ALL[i]),
        Action::CraftWafer(i, n) => game.start_craft_wafer(WaferId::ALL[i], n),
        Action::CraftChip(i, n) => game.start_craft_chip(ChipId::ALL[i], n),
        Action::BuyResearch(i) => game.buy_research(ResearchId::ALL[i]),
        Action::BuyMiner(i) => game.buy_auto_miner(AutoMinerId::ALL[i]),
        Action::CancelCrafting => game.cancel_crafting(),
        Action::Wait(ms) => {
            clock.advance_ms(ms);
            game.tick().is_some()
        }
    }
}

fn lifetime_totals(state: &GameState) -> Vec<Big> {
    let minerals = state.minerals.iter().map(|(_, s)| s.total);
    let wafers = state.wafers.iter().map(|(_, s)| s.total);
    let chips = state.chips.iter().map(|(_, s)| s.total);
    minerals.chain(wafers).chain(chips).collect()
}

fn assert_stock_invariants(state: &GameState) -> Result<(), TestCaseError> {
    for (id, stock) in state.minerals.iter() {
        prop_assert!(stock.amount <= stock.total, "{} amount above total", id);
    }
    for (id, stock) in state.wafers.iter() {
        prop_assert!(stock.amount <= stock.total, "{} amount above total", id);
    }
    for (id, stock) in state.chips.iter() {
        prop_assert!(stock.amount <= stock.total, "{} amount above total", id);
    }
    Ok(())
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Big ordering agrees with f64 ordering.
    #[test]
    fn big_order_follows_f64(a in 0.0..1e300f64, b in 0.0..1e300f64) {
        let (x, y) = (Big::from_f64(a), Big::from_f64(b));
        if a < b {
            prop_assert!(x <= y);
        } else if a > b {
            prop_assert!(x >= y);
        } else {
            prop_assert_eq!(x, y);
        }
    }

    /// Addition never shrinks; subtraction clamps at zero.
    #[test]
    fn big_add_sub(a in 0.0..1e200f64, b in 0.0..1e200f64) {
        let (x, y) = (Big::from_f64(a), Big::from_f64(b));
        prop_assert!(x + y >= x);
        prop_assert_eq!(x + y, y + x);
        if x < y {
            prop_assert_eq!(x - y, Big::ZERO);
            prop_assert!(x.checked_sub(y).is_none());
        }
    }

    /// Display/parse keeps the value.
    #[test]
    fn big_text_keeps_value(m in 1.0..10.0f64, e in 0i64..5_000) {
        let x = Big::new(m, e);
        let back: Big = x.to_string().parse().unwrap();
        prop_assert!(back.approx_eq(x, 1e-15));
    }

    /// Lifetime totals never decrease and held amounts never exceed them,
    /// whatever the player does.
    #[test]
    fn totals_are_monotonic(actions in proptest::collection::vec(arb_action(), 1..60)) {
        let (mut game, clock) = rich_game();
        let mut totals = lifetime_totals(game.state());
        for action in &actions {
            apply(&mut game, &clock, action);
            let next = lifetime_totals(game.state());
            for (before, after) in totals.iter().zip(&next) {
                prop_assert!(after >= before);
            }
            assert_stock_invariants(game.state())?;
            totals = next;
        }
    }

    /// A rejected action leaves the snapshot exactly as it was.
    #[test]
    fn rejections_are_atomic(actions in proptest::collection::vec(arb_action(), 1..60)) {
        let (mut game, clock) = rich_game();
        for action in &actions {
            let before = game.state().clone();
            let accepted = apply(&mut game, &clock, action);
            if !accepted && !matches!(action, Action::Wait(_)) {
                prop_assert_eq!(game.state(), &before);
            }
        }
    }

    /// Starting a wafer craft deducts exactly recipe × amount.
    #[test]
    fn wafer_cost_is_conserved(wafer in 0..WaferId::ALL.len(), amount in 1..50u32) {
        let wafer = WaferId::ALL[wafer];
        let mut state = GameState::new(0);
        give_minerals(&mut state, 1e6);
        let next = fabrication::start_craft_wafer(&state, wafer, amount, 0).unwrap();
        for (mineral, stock) in next.minerals.iter() {
            let per_unit = wafer
                .def()
                .recipe
                .iter()
                .find(|&&(id, _)| id == mineral)
                .map_or(0, |&(_, n)| n);
            let spent = state.minerals[mineral].amount - stock.amount;
            prop_assert_eq!(spent, Big::from(per_unit * amount));
        }
    }

    /// Offline catch-up matches ticking every second, within rounding.
    #[test]
    fn offline_equals_live(
        drills in 0..15u32,
        gpus in 0..40u32,
        secs in 61..1_500u64,
    ) {
        let mut state = with_feature(GameState::new(0), Feature::AutoMiner);
        state.auto_miners[AutoMinerId::Drill1].owned = drills;
        give_chips(&mut state, ChipId::GpuBasic, f64::from(gpus));

        let mut live = state.clone();
        for step in 1..=secs {
            live = sim::advance(&live, step * 1_000, 0.1).unwrap().0;
        }
        let away = automation::resume(&state, secs * 1_000, 60.0).unwrap();
        // An idle absence records no summary to claim.
        let away = match away.offline_progress {
            Some(_) => automation::dismiss_offline_progress(&away).unwrap(),
            None => away,
        };

        prop_assert!(live.total_flops.approx_eq(away.total_flops, 1e-9));
        for mineral in MineralId::ALL.iter().copied() {
            prop_assert!(live.minerals[mineral].amount.approx_eq(away.minerals[mineral].amount, 1e-9));
        }
    }
}
