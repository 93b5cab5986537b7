//! Weapon catalog and the player's loadout.

use bevy::prelude::*;

/// Every firearm in the game. Carried by enemies and pickups as a component.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeaponType {
    Handgun,
    SubmachineGun,
    Rifle,
    Shotgun,
    AssaultRifle,
}

/// Static per-weapon tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub name: &'static str,
    pub damage: i32,
    /// Max random deviation in whole degrees, applied either side of the aim.
    pub spread_deg: i32,
    /// Projectile speed in pixels per second.
    pub projectile_speed: f32,
    /// Seconds between shots.
    pub fire_delay_secs: f32,
    pub max_ammo: i32,
    /// Ammo granted by this weapon's pickup (also dropped by enemies).
    pub weapon_pickup_ammo: i32,
    /// Ammo granted by this weapon's ammo box.
    pub ammo_pickup_ammo: i32,
    /// Projectiles launched per shot.
    pub pellets: u32,
    pub color: Color,
}

const HANDGUN: WeaponStats = WeaponStats {
    name: "Handgun",
    damage: 8,
    spread_deg: 2,
    projectile_speed: 800.0,
    fire_delay_secs: 0.4,
    max_ammo: 100,
    weapon_pickup_ammo: 5,
    ammo_pickup_ammo: 10,
    pellets: 1,
    color: Color::srgb(0.8, 0.8, 0.8),
};

const SUBMACHINE_GUN: WeaponStats = WeaponStats {
    name: "Submachine Gun",
    damage: 10,
    spread_deg: 3,
    projectile_speed: 1000.0,
    fire_delay_secs: 0.1,
    max_ammo: 200,
    weapon_pickup_ammo: 10,
    ammo_pickup_ammo: 20,
    pellets: 1,
    color: Color::srgb(0.6, 0.6, 0.9),
};

const RIFLE: WeaponStats = WeaponStats {
    name: "Rifle",
    damage: 50,
    spread_deg: 0,
    projectile_speed: 1500.0,
    fire_delay_secs: 0.7,
    max_ammo: 80,
    weapon_pickup_ammo: 2,
    ammo_pickup_ammo: 5,
    pellets: 1,
    color: Color::srgb(0.7, 0.5, 0.3),
};

const SHOTGUN: WeaponStats = WeaponStats {
    name: "Shotgun",
    damage: 15,
    spread_deg: 10,
    projectile_speed: 800.0,
    fire_delay_secs: 1.2,
    max_ammo: 50,
    weapon_pickup_ammo: 4,
    ammo_pickup_ammo: 10,
    pellets: 3,
    color: Color::srgb(0.9, 0.4, 0.2),
};

const ASSAULT_RIFLE: WeaponStats = WeaponStats {
    name: "Assault Rifle",
    damage: 20,
    spread_deg: 1,
    projectile_speed: 1300.0,
    fire_delay_secs: 0.1,
    max_ammo: 200,
    weapon_pickup_ammo: 10,
    ammo_pickup_ammo: 20,
    pellets: 1,
    color: Color::srgb(0.4, 0.7, 0.4),
};

impl WeaponType {
    pub const ALL: [WeaponType; 5] = [
        WeaponType::Handgun,
        WeaponType::SubmachineGun,
        WeaponType::Rifle,
        WeaponType::Shotgun,
        WeaponType::AssaultRifle,
    ];

    pub fn stats(self) -> &'static WeaponStats {
        match self {
            WeaponType::Handgun => &HANDGUN,
            WeaponType::SubmachineGun => &SUBMACHINE_GUN,
            WeaponType::Rifle => &RIFLE,
            WeaponType::Shotgun => &SHOTGUN,
            WeaponType::AssaultRifle => &ASSAULT_RIFLE,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The player's loadout: owned weapons in pickup order, ammo per weapon, the
/// selected weapon, the trigger, and the time since the last shot.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Arsenal {
    owned: Vec<WeaponType>,
    ammo: [i32; 5],
    selected: usize,
    pub trigger_held: bool,
    pub shoot_timer: f32,
}

impl Default for Arsenal {
    fn default() -> Self {
        let mut ammo = [0; 5];
        ammo[WeaponType::Handgun.index()] = 25;
        Self {
            owned: vec![WeaponType::Handgun],
            ammo,
            selected: 0,
            trigger_held: false,
            shoot_timer: 0.0,
        }
    }
}

impl Arsenal {
    pub fn current(&self) -> WeaponType {
        self.owned[self.selected]
    }

    pub fn owned(&self) -> &[WeaponType] {
        &self.owned
    }

    pub fn ammo(&self, weapon: WeaponType) -> i32 {
        self.ammo[weapon.index()]
    }

    pub fn has_weapon(&self, weapon: WeaponType) -> bool {
        self.owned.contains(&weapon)
    }

    /// Append a weapon to the cycle. Owning it twice is a no-op.
    pub fn add_weapon(&mut self, weapon: WeaponType) {
        if !self.has_weapon(weapon) {
            self.owned.push(weapon);
        }
    }

    /// Add ammo, clamped to the weapon's capacity. Returns false, leaving the
    /// count untouched, when the weapon is already full.
    pub fn add_ammo(&mut self, weapon: WeaponType, amount: i32) -> bool {
        let max = weapon.stats().max_ammo;
        let slot = &mut self.ammo[weapon.index()];
        if *slot >= max {
            return false;
        }
        *slot = (*slot + amount).min(max);
        true
    }

    /// Step through owned weapons by `steps` (mouse wheel notches), wrapping
    /// at both ends.
    pub fn cycle(&mut self, steps: i32) {
        let len = self.owned.len() as i32;
        self.selected = (self.selected as i32 + steps).rem_euclid(len) as usize;
    }

    /// Advance the shot clock and report whether a round is fired this
    /// update. Firing consumes one round and resets the clock.
    pub fn try_fire(&mut self, dt: f32) -> Option<WeaponType> {
        self.shoot_timer += dt;
        let weapon = self.current();
        if !self.trigger_held || self.ammo[weapon.index()] <= 0 {
            return None;
        }
        if self.shoot_timer <= weapon.stats().fire_delay_secs {
            return None;
        }
        self.shoot_timer = 0.0;
        self.ammo[weapon.index()] -= 1;
        Some(weapon)
    }
}
