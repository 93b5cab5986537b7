//! Trigger discipline for enemies.

use rand::Rng;

/// How an enemy decides to pull the trigger. Odds are "one in `n`".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireProfile {
    /// Every time the weapon is ready and the player is in sight, roll to fire
    /// a single shot.
    Opportunistic { odds: u32 },
    /// Every `roll_interval` seconds in sight, roll to start (or stop) a burst.
    /// While the burst lasts the weapon fires at its full rate.
    Burst {
        roll_interval: f32,
        start_odds: u32,
        stop_odds: u32,
    },
}

#[derive(Debug, Clone, Default)]
pub struct FireControl {
    attack_timer: f32,
    roll_timer: f32,
    shooting: bool,
}

impl FireControl {
    /// True while a burst is in progress.
    pub fn is_shooting(&self) -> bool {
        self.shooting
    }

    /// Advance by `dt` and report whether a shot leaves the barrel this update.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        profile: &FireProfile,
        fire_delay: f32,
        facing_player: bool,
        dt: f32,
        rng: &mut R,
    ) -> bool {
        match *profile {
            FireProfile::Opportunistic { odds } => {
                self.attack_timer += dt;
                if self.attack_timer < fire_delay {
                    return false;
                }
                self.attack_timer = 0.0;
                facing_player && roll(odds, rng)
            }
            FireProfile::Burst {
                roll_interval,
                start_odds,
                stop_odds,
            } => {
                self.roll_timer += dt;
                if self.roll_timer >= roll_interval {
                    self.roll_timer = 0.0;
                    if facing_player {
                        let odds = if self.shooting { stop_odds } else { start_odds };
                        if roll(odds, rng) {
                            self.shooting = !self.shooting;
                        }
                    }
                }
                if !facing_player {
                    self.shooting = false;
                }

                self.attack_timer += dt;
                if self.shooting && self.attack_timer >= fire_delay {
                    self.attack_timer = 0.0;
                    return true;
                }
                false
            }
        }
    }
}

fn roll<R: Rng + ?Sized>(odds: u32, rng: &mut R) -> bool {
    rng.gen_range(0..odds.max(1)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SURE_SHOT: FireProfile = FireProfile::Opportunistic { odds: 1 };
    const SURE_BURST: FireProfile = FireProfile::Burst {
        roll_interval: 1.0,
        start_odds: 1,
        stop_odds: 1,
    };

    #[test]
    fn opportunistic_waits_for_the_weapon() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut fire = FireControl::default();
        assert!(!fire.update(&SURE_SHOT, 0.4, true, 0.3, &mut rng));
        assert!(fire.update(&SURE_SHOT, 0.4, true, 0.1, &mut rng));
        // Timer restarts after each attempt.
        assert!(!fire.update(&SURE_SHOT, 0.4, true, 0.1, &mut rng));
    }

    #[test]
    fn opportunistic_needs_sight() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut fire = FireControl::default();
        assert!(!fire.update(&SURE_SHOT, 0.4, false, 1.0, &mut rng));
        // The ready weapon was spent on the unseen attempt.
        assert!(!fire.update(&SURE_SHOT, 0.4, true, 0.1, &mut rng));
    }

    #[test]
    fn opportunistic_odds_are_roughly_respected() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut fire = FireControl::default();
        let profile = FireProfile::Opportunistic { odds: 2 };
        let shots = (0..1000)
            .filter(|_| fire.update(&profile, 0.4, true, 0.4, &mut rng))
            .count();
        assert!((400..600).contains(&shots), "{shots} shots");
    }

    #[test]
    fn burst_starts_on_roll_and_fires_at_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut fire = FireControl::default();
        // No roll before the interval.
        assert!(!fire.update(&SURE_BURST, 0.1, true, 0.5, &mut rng));
        assert!(!fire.is_shooting());

        // The roll starts the burst and the accumulated attack timer fires at once.
        assert!(fire.update(&SURE_BURST, 0.1, true, 0.5, &mut rng));
        assert!(fire.is_shooting());
        assert!(!fire.update(&SURE_BURST, 0.1, true, 0.05, &mut rng));
        assert!(fire.update(&SURE_BURST, 0.1, true, 0.05, &mut rng));
    }

    #[test]
    fn burst_stops_on_next_roll() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut fire = FireControl::default();
        fire.update(&SURE_BURST, 0.1, true, 1.0, &mut rng);
        assert!(fire.is_shooting());
        fire.update(&SURE_BURST, 0.1, true, 1.0, &mut rng);
        assert!(!fire.is_shooting());
    }

    #[test]
    fn losing_sight_ends_burst() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut fire = FireControl::default();
        fire.update(&SURE_BURST, 0.1, true, 1.0, &mut rng);
        assert!(fire.is_shooting());
        assert!(!fire.update(&SURE_BURST, 0.1, false, 0.2, &mut rng));
        assert!(!fire.is_shooting());
    }
}
