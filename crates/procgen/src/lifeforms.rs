//! Surface lifeform species data.
//!
//! Danger drives the contact crew-loss roll (see the lander's collision
//! pass), value is the bio worth when canned, hits is stun-bolt
//! endurance.

/// How a creature reacts to the lander.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Awareness {
    /// Wanders, ignores the lander entirely.
    Oblivious,
    /// Flees once the lander gets close or shoots it.
    Fearful,
    /// Turns toward the lander once aware.
    Aggressive,
}

/// Static species record.
#[derive(Debug, Clone, Copy)]
pub struct CreatureSpec {
    pub name: &'static str,
    /// World units moved per tick while roaming.
    pub speed: u8,
    /// Danger level 0..3, indexing the contact crew-loss table.
    pub danger: u8,
    /// Bio units gained when canned.
    pub value: u8,
    /// Stun-bolt hits to can it.
    pub hits: u8,
    pub awareness: Awareness,
}

/// Species roster, indexed by the bio node's species id.
pub const CREATURES: [CreatureSpec; 10] = [
    CreatureSpec { name: "Roto-Dendron", speed: 0, danger: 0, value: 2, hits: 1, awareness: Awareness::Oblivious },
    CreatureSpec { name: "Macrocell", speed: 1, danger: 0, value: 3, hits: 1, awareness: Awareness::Oblivious },
    CreatureSpec { name: "Splort-Wort", speed: 0, danger: 1, value: 4, hits: 2, awareness: Awareness::Oblivious },
    CreatureSpec { name: "Whackin' Bush", speed: 2, danger: 1, value: 5, hits: 2, awareness: Awareness::Fearful },
    CreatureSpec { name: "Creeping Strand", speed: 1, danger: 1, value: 6, hits: 3, awareness: Awareness::Fearful },
    CreatureSpec { name: "Fungal Squat", speed: 0, danger: 2, value: 8, hits: 4, awareness: Awareness::Oblivious },
    CreatureSpec { name: "Penumbra Hopper", speed: 3, danger: 2, value: 8, hits: 3, awareness: Awareness::Fearful },
    CreatureSpec { name: "Carousel Beast", speed: 2, danger: 2, value: 10, hits: 5, awareness: Awareness::Aggressive },
    CreatureSpec { name: "Amorphous Trandicula", speed: 3, danger: 3, value: 12, hits: 6, awareness: Awareness::Aggressive },
    CreatureSpec { name: "Evil One", speed: 2, danger: 3, value: 15, hits: 8, awareness: Awareness::Aggressive },
];

/// Contact crew-loss chance out of 128, indexed by danger level.
pub const DANGER_CHANCES: [u32; 4] = [0, 6, 13, 26];
