//! Enemy AI. Every kind shares one `think` step: wake up on sight, chase the
//! player along the shared reachability index, and fire according to the
//! kind's profile.

pub mod elite;
pub mod fire_control;
pub mod guard;
pub mod officer;
pub mod pathing;
pub mod reachability;
pub mod sight;
pub mod soldier;

use bevy::prelude::*;
use rand::Rng;

use crate::components::EnemyKind;
use crate::geometry::{Bounds, heading_degrees, heading_vector};
use crate::weapons::WeaponType;
use fire_control::{FireControl, FireProfile};
use pathing::PathFollower;
use reachability::ReachabilityIndex;

/// Static stats of an enemy kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    pub kind: EnemyKind,
    pub health: i32,
    /// Pixels per second.
    pub speed: f32,
    pub weapon: WeaponType,
    pub fire: FireProfile,
    pub color: Color,
}

impl EnemyKind {
    pub fn profile(self) -> &'static EnemyProfile {
        match self {
            EnemyKind::Guard => &guard::PROFILE,
            EnemyKind::Soldier => &soldier::PROFILE,
            EnemyKind::Officer => &officer::PROFILE,
            EnemyKind::Elite => &elite::PROFILE,
        }
    }
}

/// Behavioural state of one enemy. Dormant until it first sees the player,
/// alerted for the rest of its life.
#[derive(Component, Debug, Clone)]
pub struct EnemyBrain {
    pub alerted: bool,
    pub facing_player: bool,
    pub follower: PathFollower,
    pub fire: FireControl,
}

impl EnemyBrain {
    pub fn new(replan_interval: f32) -> Self {
        Self {
            alerted: false,
            facing_player: false,
            follower: PathFollower::new(replan_interval),
            fire: FireControl::default(),
        }
    }
}

/// What an enemy knows about the world for one update.
pub struct Senses<'a> {
    pub center: IVec2,
    pub player_center: IVec2,
    pub facing: f32,
    pub dt: f32,
    pub solids: &'a [Bounds],
    pub index: &'a ReachabilityIndex,
    pub tile_size: i32,
    pub waypoint_size: i32,
}

/// The outcome of one `think` step, applied by the ECS glue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intent {
    pub velocity: Vec2,
    pub facing: f32,
    /// Became alerted this update.
    pub shout: bool,
    /// Fire one shot along `facing`.
    pub fire: bool,
}

/// Run one update of an enemy's state machine.
pub fn think<R: Rng + ?Sized>(
    brain: &mut EnemyBrain,
    profile: &EnemyProfile,
    senses: &Senses,
    rng: &mut R,
) -> Intent {
    let visible = sight::has_line_of_sight(senses.center, senses.player_center, senses.solids);
    let mut intent = Intent {
        velocity: Vec2::ZERO,
        facing: senses.facing,
        shout: false,
        fire: false,
    };

    if !brain.alerted {
        if visible {
            brain.alerted = true;
            intent.shout = true;
        }
    } else {
        let target = brain.follower.step(
            senses.center,
            senses.index,
            senses.tile_size,
            senses.waypoint_size,
            senses.dt,
        );
        if let Some(target) = target {
            let heading = heading_degrees(senses.center, target);
            intent.velocity = heading_vector(heading) * profile.speed;
            intent.facing = heading;
        }

        brain.facing_player = visible;
        if visible {
            intent.facing = heading_degrees(senses.center, senses.player_center);
        }
    }

    if brain.alerted {
        let delay = profile.weapon.stats().fire_delay_secs;
        intent.fire = brain
            .fire
            .update(&profile.fire, delay, brain.facing_player, senses.dt, rng);
    }

    intent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::TilePos;
    use crate::plugins::level::LevelMap;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // Player at (1,1). The enemy room on the right is joined to the player's
    // corridor through the gap at (4,3).
    const LEVEL: &str = "\
#########
#1..#...#
#...#...#
#.......#
#########
#H......#
#########";

    struct Fixture {
        map: LevelMap,
        index: ReachabilityIndex,
        rng: ChaCha8Rng,
    }

    impl Fixture {
        fn new() -> Self {
            let map = LevelMap::parse(LEVEL, 50).unwrap();
            let index = ReachabilityIndex::build(&map, TilePos::new(1, 1));
            Self {
                map,
                index,
                rng: ChaCha8Rng::seed_from_u64(9),
            }
        }

        fn think(&mut self, brain: &mut EnemyBrain, enemy: IVec2, player: IVec2) -> Intent {
            let senses = Senses {
                center: enemy,
                player_center: player,
                facing: 0.0,
                dt: 0.016,
                solids: self.map.all_solids(),
                index: &self.index,
                tile_size: 50,
                waypoint_size: 10,
            };
            think(brain, &guard::PROFILE, &senses, &mut self.rng)
        }
    }

    fn at(x: i32, y: i32) -> IVec2 {
        TilePos::new(x, y).center(50)
    }

    #[test]
    fn dormant_enemy_behind_wall_stays_put() {
        let mut fx = Fixture::new();
        let mut brain = EnemyBrain::new(1.0);
        let intent = fx.think(&mut brain, at(6, 1), at(1, 1));
        assert!(!brain.alerted);
        assert!(!intent.shout);
        assert_eq!(intent.velocity, Vec2::ZERO);
        assert!(!intent.fire);
    }

    #[test]
    fn sighting_alerts_and_shouts_once() {
        let mut fx = Fixture::new();
        let mut brain = EnemyBrain::new(1.0);
        let intent = fx.think(&mut brain, at(6, 3), at(1, 3));
        assert!(brain.alerted);
        assert!(intent.shout);
        assert_eq!(intent.velocity, Vec2::ZERO);

        let intent = fx.think(&mut brain, at(6, 3), at(1, 3));
        assert!(!intent.shout);
        assert!(brain.alerted);
    }

    #[test]
    fn alerted_enemy_never_reverts() {
        let mut fx = Fixture::new();
        let mut brain = EnemyBrain::new(1.0);
        fx.think(&mut brain, at(6, 3), at(1, 3));
        // Player ducks behind the wall.
        fx.think(&mut brain, at(6, 3), at(1, 1));
        assert!(brain.alerted);
        assert!(!brain.facing_player);
    }

    #[test]
    fn alerted_enemy_steers_toward_next_tile() {
        let mut fx = Fixture::new();
        let mut brain = EnemyBrain::new(1.0);
        brain.alerted = true;

        // From (6,1) out of sight, the first step is diagonal toward the gap.
        let intent = fx.think(&mut brain, at(6, 1), at(1, 1));
        let next = *brain.follower.path().back().unwrap();
        assert!(next.is_adjacent8(&TilePos::new(6, 1)));
        assert!(next.y > 1 || next.x < 6);
        assert!((intent.velocity.length() - guard::PROFILE.speed).abs() < 0.5);
        let expected = heading_degrees(at(6, 1), at(next.x, next.y));
        assert!((intent.facing - expected).abs() < 1e-3);
    }

    #[test]
    fn visible_player_overrides_facing() {
        let mut fx = Fixture::new();
        let mut brain = EnemyBrain::new(1.0);
        brain.alerted = true;
        let intent = fx.think(&mut brain, at(6, 3), at(1, 3));
        assert!(brain.facing_player);
        assert!((intent.facing.abs() - 180.0).abs() < 1e-3);
        // Still moving along the path.
        assert!(intent.velocity.x < 0.0);
    }

    #[test]
    fn enemy_sharing_player_tile_wakes_at_once() {
        let mut rows = vec![".".repeat(10); 10];
        rows[0].replace_range(0..1, "1");
        rows[9].replace_range(9..10, "H");
        let map = LevelMap::parse(&rows.join("\n"), 50).unwrap();
        let index = ReachabilityIndex::build(&map, TilePos::new(5, 5));
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut brain = EnemyBrain::new(1.0);
        let senses = Senses {
            center: at(5, 5),
            player_center: at(5, 5),
            facing: 0.0,
            dt: 0.016,
            solids: &[],
            index: &index,
            tile_size: 50,
            waypoint_size: 10,
        };

        let intent = think(&mut brain, &guard::PROFILE, &senses, &mut rng);
        assert!(brain.alerted);
        assert!(intent.shout);
        assert_eq!(intent.velocity, Vec2::ZERO);
    }

    #[test]
    fn enemy_on_player_tile_holds_position() {
        let mut fx = Fixture::new();
        let mut brain = EnemyBrain::new(1.0);
        brain.alerted = true;
        let intent = fx.think(&mut brain, at(1, 1), at(1, 1) + IVec2::new(5, 0));
        assert_eq!(intent.velocity, Vec2::ZERO);
    }

    #[test]
    fn unreachable_enemy_holds_position() {
        let mut fx = Fixture::new();
        let mut brain = EnemyBrain::new(1.0);
        brain.alerted = true;
        // The bottom corridor is sealed off from the player.
        let intent = fx.think(&mut brain, at(5, 5), at(1, 1));
        assert_eq!(intent.velocity, Vec2::ZERO);
        assert!(brain.follower.path().is_empty());
    }

    #[test]
    fn every_kind_has_a_profile() {
        for kind in [
            EnemyKind::Guard,
            EnemyKind::Soldier,
            EnemyKind::Officer,
            EnemyKind::Elite,
        ] {
            let profile = kind.profile();
            assert_eq!(profile.kind, kind);
            assert!(profile.health > 0);
        }
        assert_eq!(EnemyKind::Soldier.profile().weapon, WeaponType::SubmachineGun);
    }
}
