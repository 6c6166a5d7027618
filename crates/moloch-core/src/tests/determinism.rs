//! Determinism and invariant tests.
//!
//! A match is a pure function of map, setup, config and intents. These tests
//! check that directly (same inputs, same state) and check the turn-level
//! invariants over randomly generated intent streams.

use std::collections::BTreeSet;

use moloch_grid::{Direction, TileCoord};
use proptest::prelude::*;

use crate::config::EngineConfig;
use crate::engine::{Snapshot, TurnEngine};
use crate::error::ReplayError;
use crate::hash::hash_state;
use crate::input::Intent;
use crate::replay::{replay, verify_history};
use crate::state::{MoveRecord, Outcome};

use super::helpers::{pillar_room, skirmish, started};

fn live_intent_strategy() -> impl Strategy<Value = Intent> {
    prop_oneof![
        Just(Intent::Move(Direction::Up)),
        Just(Intent::Move(Direction::Right)),
        Just(Intent::Move(Direction::Down)),
        Just(Intent::Move(Direction::Left)),
        Just(Intent::Attack),
    ]
}

fn intent_strategy() -> impl Strategy<Value = Intent> {
    prop_oneof![5 => live_intent_strategy(), 1 => Just(Intent::None)]
}

fn play(seed: u64, intents: &[Intent]) -> TurnEngine {
    let mut engine = started(pillar_room(), skirmish(seed));
    for &intent in intents {
        engine.submit_intent(intent);
    }
    engine
}

// =============================================================================
// Same inputs, same match
// =============================================================================

mod reproducibility {
    use super::*;

    const SCRIPT: [Intent; 8] = [
        Intent::Move(Direction::Right),
        Intent::Move(Direction::Right),
        Intent::Move(Direction::Down),
        Intent::Attack,
        Intent::Move(Direction::Right),
        Intent::Move(Direction::Down),
        Intent::Attack,
        Intent::Attack,
    ];

    #[test]
    fn same_seed_same_history() {
        let a = play(42, &SCRIPT);
        let b = play(42, &SCRIPT);
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(
            hash_state(a.state().unwrap()),
            hash_state(b.state().unwrap())
        );
    }

    #[test]
    fn replay_reproduces_state() {
        let live = play(7, &SCRIPT);
        let replayed = replay(
            pillar_room(),
            &skirmish(7),
            EngineConfig::default(),
            live.accepted_intents(),
        )
        .unwrap();
        assert_eq!(
            hash_state(live.state().unwrap()),
            hash_state(replayed.state().unwrap())
        );
    }

    #[test]
    fn verify_accepts_honest_history() {
        let live = play(9, &SCRIPT);
        let recorded = live.state().unwrap().move_history().to_vec();
        assert_eq!(
            verify_history(
                pillar_room(),
                &skirmish(9),
                EngineConfig::default(),
                live.accepted_intents(),
                &recorded,
            ),
            Ok(())
        );
    }

    #[test]
    fn verify_flags_tampered_record() {
        let live = play(9, &SCRIPT);
        let mut recorded = live.state().unwrap().move_history().to_vec();
        let honest = recorded[5];
        recorded[5] = MoveRecord {
            x: honest.x + 1,
            ..honest
        };
        let err = verify_history(
            pillar_room(),
            &skirmish(9),
            EngineConfig::default(),
            live.accepted_intents(),
            &recorded,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReplayError::Diverged {
                index: 5,
                expected: recorded[5],
                actual: honest,
            }
        );
    }

    #[test]
    fn verify_flags_truncated_history() {
        let live = play(3, &SCRIPT);
        let recorded = live.state().unwrap().move_history().to_vec();
        let truncated = &recorded[..recorded.len() - 4];
        assert!(matches!(
            verify_history(
                pillar_room(),
                &skirmish(3),
                EngineConfig::default(),
                live.accepted_intents(),
                truncated,
            ),
            Err(ReplayError::LengthMismatch { .. })
        ));
    }
}

// =============================================================================
// Turn invariants
// =============================================================================

fn living_enemy_tiles(snap: &Snapshot) -> Vec<TileCoord> {
    snap.combatants[1..]
        .iter()
        .filter(|c| c.alive)
        .map(|c| c.position)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn turn_invariants_hold(seed in any::<u64>(), intents in prop::collection::vec(intent_strategy(), 0..40)) {
        let mut engine = started(pillar_room(), skirmish(seed));
        let roster_len = engine.snapshot().combatants.len();
        let mut before = engine.snapshot();

        for intent in intents {
            let resolved = engine.submit_intent(intent).is_resolved();
            let after = engine.snapshot();

            if resolved {
                prop_assert_eq!(after.turns_remaining + 1, before.turns_remaining);
                prop_assert_eq!(after.move_history.len(), before.move_history.len() + roster_len);
                prop_assert_eq!(&after.move_history[..before.move_history.len()], &before.move_history[..]);
                prop_assert_eq!(after.move_history[before.move_history.len()].x, after.combatants[0].position.x);
                prop_assert_eq!(after.move_history[before.move_history.len()].y, after.combatants[0].position.y);
            } else {
                prop_assert_eq!(&after, &before);
            }

            // Corpses never move or change
            for (was, now) in before.combatants.iter().zip(&after.combatants) {
                if !was.alive {
                    prop_assert_eq!(was, now);
                }
                prop_assert!(now.hp <= was.hp);
            }

            // Living enemies hold distinct tiles, none of them the player's
            let tiles = living_enemy_tiles(&after);
            let distinct: BTreeSet<_> = tiles.iter().copied().collect();
            prop_assert_eq!(distinct.len(), tiles.len());
            if after.combatants[0].alive {
                prop_assert!(!distinct.contains(&after.combatants[0].position));
            }

            // Terminal flags are sticky
            if before.game_over {
                prop_assert!(after.game_over);
                prop_assert_eq!(after.victory, before.victory);
            }
            before = after;
        }
    }

    #[test]
    fn matches_end_within_budget(seed in any::<u64>(), intents in prop::collection::vec(live_intent_strategy(), 30)) {
        let engine = play(seed, &intents);
        let snap = engine.snapshot();
        prop_assert!(snap.game_over);
        prop_assert!(engine.accepted_intents().len() <= 30);
    }

    #[test]
    fn termination_priority(seed in any::<u64>(), intents in prop::collection::vec(intent_strategy(), 0..40)) {
        let engine = play(seed, &intents);
        let snap = engine.snapshot();
        if snap.game_over {
            let enemies_dead = snap.combatants[1..].iter().all(|c| !c.alive);
            let player_dead = !snap.combatants[0].alive;
            let expected = if enemies_dead {
                Outcome::Victory
            } else if player_dead {
                Outcome::Defeat
            } else {
                Outcome::Attrition
            };
            prop_assert_eq!(snap.outcome, Some(expected));
            prop_assert_eq!(snap.victory, enemies_dead);
        }
    }

    #[test]
    fn replay_matches_live_play(seed in any::<u64>(), intents in prop::collection::vec(intent_strategy(), 0..30)) {
        let live = play(seed, &intents);
        let replayed = replay(pillar_room(), &skirmish(seed), EngineConfig::default(), &intents).unwrap();
        prop_assert_eq!(live.snapshot(), replayed.snapshot());
    }
}
