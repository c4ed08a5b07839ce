//! Attack and defense position selection
//!
//! Each turn picks one zone to strike and two distinct zones to guard.

use std::fmt;

use rand::Rng;
use thiserror::Error;

/// Body zones an attack can target or a defense can cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyZone {
    Head,
    Chest,
    Belly,
    Legs,
}

impl BodyZone {
    pub const ALL: [BodyZone; 4] = [Self::Head, Self::Chest, Self::Belly, Self::Legs];

    /// Wire index (0-3)
    pub fn index(&self) -> u8 {
        match self {
            Self::Head => 0,
            Self::Chest => 1,
            Self::Belly => 2,
            Self::Legs => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Head => "Head",
            Self::Chest => "Chest",
            Self::Belly => "Belly",
            Self::Legs => "Legs",
        }
    }
}

impl fmt::Display for BodyZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One turn's choice. The two defended zones are always distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackPositions {
    attack: BodyZone,
    defense: [BodyZone; 2],
}

impl AttackPositions {
    /// Returns `None` if both defense zones are the same
    pub fn new(attack: BodyZone, first: BodyZone, second: BodyZone) -> Option<Self> {
        (first != second).then_some(Self {
            attack,
            defense: [first, second],
        })
    }

    pub fn attack(&self) -> BodyZone {
        self.attack
    }

    pub fn defense(&self) -> [BodyZone; 2] {
        self.defense
    }

    pub fn attack_index(&self) -> u8 {
        self.attack.index()
    }

    pub fn defense_indices(&self) -> [u8; 2] {
        [self.defense[0].index(), self.defense[1].index()]
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("Min value {min} cannot be greater than max value {max}")]
    Inverted { min: u8, max: u8 },

    #[error("Cannot generate a number in {min}..={max}: all values are excluded")]
    Exhausted { min: u8, max: u8 },
}

/// Uniform draw from `min..=max`, skipping anything in `exclude`
pub fn random_in_range<R>(rng: &mut R, min: u8, max: u8, exclude: &[u8]) -> Result<u8, RangeError>
where
    R: Rng + ?Sized,
{
    if min > max {
        return Err(RangeError::Inverted { min, max });
    }

    let available = (max - min) as usize + 1;
    let excluded = (min..=max).filter(|v| exclude.contains(v)).count();
    if excluded >= available {
        return Err(RangeError::Exhausted { min, max });
    }

    loop {
        let value = rng.gen_range(min..=max);
        if !exclude.contains(&value) {
            return Ok(value);
        }
    }
}

/// Random positions for a turn using the thread-local generator
pub fn pick_attack_positions() -> Result<AttackPositions, RangeError> {
    pick_attack_positions_with(&mut rand::thread_rng())
}

pub fn pick_attack_positions_with<R>(rng: &mut R) -> Result<AttackPositions, RangeError>
where
    R: Rng + ?Sized,
{
    let last = BodyZone::Legs.index();

    let attack = random_in_range(rng, 0, last, &[])?;
    let first = random_in_range(rng, 0, last, &[])?;
    let second = random_in_range(rng, 0, last, &[first])?;

    let zone = |index: u8| {
        BodyZone::from_index(index).ok_or(RangeError::Exhausted { min: 0, max: last })
    };

    Ok(AttackPositions {
        attack: zone(attack)?,
        defense: [zone(first)?, zone(second)?],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_zone_indices() {
        for (i, zone) in BodyZone::ALL.iter().enumerate() {
            assert_eq!(zone.index() as usize, i);
            assert_eq!(BodyZone::from_index(i as u8), Some(*zone));
        }
        assert_eq!(BodyZone::from_index(4), None);
        assert_eq!(BodyZone::Belly.to_string(), "Belly");
    }

    #[test]
    fn test_new_rejects_duplicate_defense() {
        assert!(AttackPositions::new(BodyZone::Head, BodyZone::Legs, BodyZone::Legs).is_none());

        let positions =
            AttackPositions::new(BodyZone::Head, BodyZone::Head, BodyZone::Legs).unwrap();
        assert_eq!(positions.attack_index(), 0);
        assert_eq!(positions.defense_indices(), [0, 3]);
    }

    #[test]
    fn test_pick_attack_positions_many() {
        for _ in 0..10_000 {
            let positions = pick_attack_positions().unwrap();
            let [first, second] = positions.defense_indices();

            assert_ne!(first, second);
            assert!(positions.attack_index() <= 3);
            assert!(first <= 3);
            assert!(second <= 3);
        }
    }

    #[test]
    fn test_pick_covers_every_zone() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 4];
        for _ in 0..1_000 {
            let positions = pick_attack_positions_with(&mut rng).unwrap();
            seen[positions.attack_index() as usize] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn test_random_in_range_inverted() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            random_in_range(&mut rng, 5, 2, &[]),
            Err(RangeError::Inverted { min: 5, max: 2 })
        );
    }

    #[test]
    fn test_random_in_range_over_constrained() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            random_in_range(&mut rng, 0, 1, &[0, 1]),
            Err(RangeError::Exhausted { min: 0, max: 1 })
        );
        assert_eq!(
            random_in_range(&mut rng, 3, 3, &[3]),
            Err(RangeError::Exhausted { min: 3, max: 3 })
        );
    }

    #[test]
    fn test_random_in_range_single_option_left() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(random_in_range(&mut rng, 0, 3, &[0, 1, 3, 9]), Ok(2));
        }
    }

    proptest! {
        #[test]
        fn prop_random_in_range_stays_in_bounds(
            min in 0u8..100,
            span in 0u8..20,
            exclude in prop::collection::vec(0u8..130, 0..8),
            seed in any::<u64>(),
        ) {
            let max = min + span;
            let excluded = (min..=max).filter(|v| exclude.contains(v)).count();
            prop_assume!(excluded < span as usize + 1);

            let mut rng = StdRng::seed_from_u64(seed);
            let value = random_in_range(&mut rng, min, max, &exclude).unwrap();

            prop_assert!(value >= min && value <= max);
            prop_assert!(!exclude.contains(&value));
        }

        #[test]
        fn prop_full_exclusion_fails(min in 0u8..100, span in 0u8..20, seed in any::<u64>()) {
            let max = min + span;
            let exclude: Vec<u8> = (min..=max).collect();

            let mut rng = StdRng::seed_from_u64(seed);
            prop_assert_eq!(
                random_in_range(&mut rng, min, max, &exclude),
                Err(RangeError::Exhausted { min, max })
            );
        }
    }
}
