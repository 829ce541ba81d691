//! Weighted loot draws for successful digs.

use core::fmt;
use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};

/// Everything a dig can turn up, common to vanishingly rare.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LootKind {
    Iron,
    Copper,
    Silver,
    Gold,
    Platinum,
    Amethyst,
    Diamond,
    Orbeez,
    Aether,
    DarkMatter,
}

impl LootKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Iron => "iron",
            Self::Copper => "copper",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
            Self::Amethyst => "amethyst",
            Self::Diamond => "diamond",
            Self::Orbeez => "orbeez",
            Self::Aether => "aether",
            Self::DarkMatter => "dark matter",
        }
    }
}

impl fmt::Display for LootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Draw ladder, evaluated top to bottom against a single uniform draw.
/// The bands sum to ~0.219, so most digs find nothing.
const LADDER: [(LootKind, f64); 10] = [
    (LootKind::Iron, 0.125),
    (LootKind::Copper, 0.05),
    (LootKind::Silver, 0.025),
    (LootKind::Gold, 0.01),
    (LootKind::Platinum, 0.005),
    (LootKind::Amethyst, 0.0025),
    (LootKind::Diamond, 0.001),
    (LootKind::Orbeez, 0.0005),
    (LootKind::Aether, 0.00025),
    (LootKind::DarkMatter, 0.0001),
];

/// Band lookup for a uniform draw in `[0, 1)`: the first band whose
/// cumulative bound exceeds the draw wins.
pub fn lookup(draw: f64) -> Option<LootKind> {
    let mut cumulative = 0.0;
    for (kind, chance) in LADDER {
        cumulative += chance;
        if draw < cumulative {
            return Some(kind);
        }
    }
    None
}

/// Rolls the ladder once. Called for the originally dug cell only;
/// cells opened by a cascade never roll.
pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Option<LootKind> {
    lookup(rng.random())
}
