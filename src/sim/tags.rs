//! Collider classification tags

use serde::{Deserialize, Serialize};

/// Bit set of labels carried by a collider, used for query filtering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tags(u16);

impl Tags {
    pub const NONE: Tags = Tags(0);
    pub const PLAYER: Tags = Tags(1 << 0);
    pub const ALIEN: Tags = Tags(1 << 1);
    /// Any laser, player or alien
    pub const LASER: Tags = Tags(1 << 2);
    pub const METEOR: Tags = Tags(1 << 3);
    pub const SMALL: Tags = Tags(1 << 4);
    pub const LARGE: Tags = Tags(1 << 5);
    pub const SHIELD: Tags = Tags(1 << 6);
    /// Fired by an alien
    pub const HOSTILE: Tags = Tags(1 << 7);

    #[inline]
    pub const fn union(self, other: Tags) -> Tags {
        Tags(self.0 | other.0)
    }

    /// True if every bit of `other` is set
    #[inline]
    pub const fn contains(self, other: Tags) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit of `other` is set
    #[inline]
    pub const fn intersects(self, other: Tags) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Tags {
    type Output = Tags;

    fn bitor(self, rhs: Tags) -> Tags {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for Tags {
    fn bitor_assign(&mut self, rhs: Tags) {
        *self = self.union(rhs);
    }
}
