//! Property tests for generation, carving, scheduling and persistence

use proptest::prelude::*;

use rlg_core::dungeon::{
    CellCost, CorridorCost, Level, Position, carve_corridor, generate_level,
};
use rlg_core::monster::ActorId;
use rlg_core::world::{GenerationConfig, RoomStrategy, decode, encode};
use rlg_core::{GameRng, TurnQueue};

const W: usize = 12;
const H: usize = 9;

fn arb_strategy() -> impl Strategy<Value = RoomStrategy> {
    prop_oneof![Just(RoomStrategy::Retry), Just(RoomStrategy::Bisection)]
}

fn arb_interior() -> impl Strategy<Value = Position> {
    (1..W - 1, 1..H - 1).prop_map(|(x, y)| Position::new(x, y))
}

/// A small level with random rock hardness and a few open cells
fn arb_level() -> impl Strategy<Value = Level> {
    (
        prop::collection::vec(1u8..=254, W * H),
        prop::collection::vec(arb_interior(), 0..6),
    )
        .prop_map(|(hardness, open)| {
            let mut level = Level::new(W, H);
            for (index, h) in hardness.into_iter().enumerate() {
                level.set_rock_hardness(level.position_of(index), h);
            }
            for pos in open {
                level.carve(pos);
            }
            level
        })
}

/// Cheapest route cost by plain relaxation until nothing changes
fn relaxed_cost(level: &Level, from: Position, to: Position, cost: &impl CellCost) -> u32 {
    let mut dist = vec![u32::MAX; W * H];
    dist[level.index(from)] = 0;
    loop {
        let mut changed = false;
        for index in 0..W * H {
            if dist[index] == u32::MAX {
                continue;
            }
            let pos = level.position_of(index);
            let steps = [(0i8, -1i8), (0, 1), (-1, 0), (1, 0)];
            for (dx, dy) in steps {
                let Some(next) = pos.offset(dx, dy).filter(|&p| level.in_bounds(p)) else {
                    continue;
                };
                let Some(step) = cost.cost(level, next) else {
                    continue;
                };
                let candidate = dist[index] + step;
                let next_index = level.index(next);
                if candidate < dist[next_index] {
                    dist[next_index] = candidate;
                    changed = true;
                }
            }
        }
        if !changed {
            return dist[level.index(to)];
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn rooms_never_overlap(seed in any::<u64>(), strategy in arb_strategy()) {
        let config = GenerationConfig { strategy, ..Default::default() };
        let level = generate_level(&config, &mut GameRng::new(seed)).unwrap();
        let rooms = level.rooms();
        for (i, a) in rooms.iter().enumerate() {
            prop_assert!(a.fits_interior(level.width(), level.height()));
            for b in &rooms[i + 1..] {
                prop_assert!(!a.overlaps(b, 1));
            }
        }
        prop_assert!(level.is_consistent());
    }

    #[test]
    fn save_roundtrip_is_lossless(seed in any::<u64>(), strategy in arb_strategy()) {
        let config = GenerationConfig { strategy, ..Default::default() };
        let level = generate_level(&config, &mut GameRng::new(seed)).unwrap();
        let player = level.rooms()[0].center();
        let bytes = encode(&level, player).unwrap();
        let saved = decode(&bytes, level.width(), level.height()).unwrap();
        prop_assert_eq!(saved.player, player);
        prop_assert_eq!(saved.level.rooms(), level.rooms());
        prop_assert_eq!(saved.level.hardness_map(), level.hardness_map());
        prop_assert_eq!(saved.level.up_stairs(), level.up_stairs());
        prop_assert_eq!(saved.level.down_stairs(), level.down_stairs());
    }
}

proptest! {
    #[test]
    fn carved_route_is_cheapest(level in arb_level(), from in arb_interior(), to in arb_interior()) {
        let cost = CorridorCost::default();
        let best = relaxed_cost(&level, from, to, &cost);

        let mut carved = level.clone();
        let path = carve_corridor(&mut carved, from, to, &cost).unwrap();
        prop_assert_eq!(path.first(), Some(&to));
        prop_assert_eq!(path.last(), Some(&from));
        let paid: u32 = path[..path.len() - 1]
            .iter()
            .map(|&pos| cost.cost(&level, pos).unwrap())
            .sum();
        prop_assert_eq!(paid, best);
        for pair in path.windows(2) {
            prop_assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
    }

    #[test]
    fn carving_is_deterministic(level in arb_level(), from in arb_interior(), to in arb_interior()) {
        let cost = CorridorCost::default();
        let mut a = level.clone();
        let mut b = level;
        let first = carve_corridor(&mut a, from, to, &cost).unwrap();
        let second = carve_corridor(&mut b, from, to, &cost).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn carving_keeps_open_cells(level in arb_level(), from in arb_interior(), to in arb_interior()) {
        let mut carved = level.clone();
        carve_corridor(&mut carved, from, to, &CorridorCost::default()).unwrap();
        for (before, after) in level.cells().iter().zip(carved.cells()) {
            if before.is_open() {
                prop_assert_eq!(before.typ, after.typ);
                prop_assert_eq!(before.hardness, after.hardness);
            }
        }
        prop_assert!(carved.is_consistent());
    }

    #[test]
    fn queue_pops_in_key_order(
        initial in prop::collection::vec(0u64..500, 1..12),
        delays in prop::collection::vec(1u64..200, 0..60),
    ) {
        let mut queue = TurnQueue::new();
        for (i, &time) in initial.iter().enumerate() {
            queue.push(ActorId(i as u32), time);
        }
        let mut last = None;
        let mut delays = delays.into_iter();
        while let Some(key) = queue.pop() {
            if let Some(prev) = last {
                prop_assert!(key > prev);
            }
            last = Some(key);
            if let Some(delay) = delays.next() {
                queue.push(key.actor, key.time + delay);
            }
        }
    }
}
