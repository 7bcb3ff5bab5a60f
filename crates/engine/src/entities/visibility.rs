//! Who can notice whom.

use mudworld_domain::StatBlock;

/// How visible an actor is right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visibility {
    pub hidden: bool,
    pub invisible: bool,
}

impl Visibility {
    pub fn of(stats: &StatBlock<'_>) -> Self {
        Self {
            hidden: stats.is_hidden(),
            invisible: stats.is_invisible(),
        }
    }
}

/// What an observer is able to notice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Perception {
    pub sees_hidden: bool,
    pub sees_invisible: bool,
}

impl Perception {
    pub fn of(stats: &StatBlock<'_>) -> Self {
        Self {
            sees_hidden: stats.can_see_hidden(),
            sees_invisible: stats.can_see_invisible(),
        }
    }

    pub fn perceives(&self, target: Visibility) -> bool {
        (!target.hidden || self.sees_hidden) && (!target.invisible || self.sees_invisible)
    }
}
