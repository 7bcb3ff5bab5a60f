//! Combat arithmetic shared by every fighter.

/// Damage never drops below this, so every exchange makes progress.
pub const MIN_DAMAGE: i32 = 1;

/// Lower bound applied to every derived stat and attack value.
pub fn floor_at_zero(value: i32) -> i32 {
    value.max(0)
}

/// Damage dealt by `attack` against `defense`.
pub fn damage(attack: i32, defense: i32) -> i32 {
    (attack - defense).max(MIN_DAMAGE)
}

/// Health restored per regeneration pulse: 10% of max HP, at least one point.
pub fn regeneration_amount(max_hp: i32) -> i32 {
    (max_hp / 10).max(1)
}
