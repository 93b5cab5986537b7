//! Soldier: carries a submachine gun and fights in bursts. Once a second
//! while it can see the player it rolls one in three to open up, and the same
//! odds to cease fire.

use bevy::prelude::*;

use super::EnemyProfile;
use super::fire_control::FireProfile;
use crate::components::EnemyKind;
use crate::weapons::WeaponType;

pub const PROFILE: EnemyProfile = EnemyProfile {
    kind: EnemyKind::Soldier,
    health: 60,
    speed: 150.0,
    weapon: WeaponType::SubmachineGun,
    fire: FireProfile::Burst {
        roll_interval: 1.0,
        start_odds: 3,
        stop_odds: 3,
    },
    color: Color::srgb(0.35, 0.45, 0.3),
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::fire_control::FireControl;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn soldier_bursts_at_full_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut fire = FireControl::default();
        let delay = PROFILE.weapon.stats().fire_delay_secs;

        // Run until a burst starts, then count shots over the next half second.
        let mut ticks = 0;
        while !fire.is_shooting() {
            fire.update(&PROFILE.fire, delay, true, 0.05, &mut rng);
            ticks += 1;
            assert!(ticks < 10_000, "burst never started");
        }
        let shots = (0..10)
            .filter(|_| fire.update(&PROFILE.fire, delay, true, 0.05, &mut rng))
            .count();
        assert!(shots >= 4, "{shots} shots");
    }

    #[test]
    fn soldier_holds_fire_out_of_sight() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut fire = FireControl::default();
        let delay = PROFILE.weapon.stats().fire_delay_secs;
        for _ in 0..200 {
            assert!(!fire.update(&PROFILE.fire, delay, false, 0.05, &mut rng));
        }
    }
}
