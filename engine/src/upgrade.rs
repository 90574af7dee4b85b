//! Currency needed to buy the remaining experience for a level

/// Experience granted by one purchase.
pub const XP_PER_PURCHASE: u32 = 4;

/// Currency paid per purchase.
pub const CURRENCY_PER_PURCHASE: u32 = 4;

/// Purchases needed to cover `xp_remaining`. The last one is bought whole.
pub fn purchases_needed(xp_remaining: i64) -> u32 {
    if xp_remaining <= 0 {
        return 0;
    }
    let xp = u32::try_from(xp_remaining).unwrap_or(u32::MAX);
    xp.div_ceil(XP_PER_PURCHASE)
}

/// Currency cost of `xp_remaining` experience; 0 when nothing is left.
pub fn upgrade_cost(xp_remaining: i64) -> u32 {
    purchases_needed(xp_remaining).saturating_mul(CURRENCY_PER_PURCHASE)
}
