//! Random slug generation.
//!
//! Slugs are random tokens rather than slugified titles: titles stay editable
//! after creation, and a title-derived slug would go stale on the first
//! rename. Collision checking against persisted slugs happens in the
//! repository layer; this module supplies the draw and the retry policy.

use rand::Rng;

/// Characters a slug is drawn from: ASCII letters, digits, and underscore.
pub const SLUG_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_";

/// Length of a freshly generated slug before any collision escalation.
pub const DEFAULT_SLUG_LENGTH: usize = 11;

/// Consecutive collisions tolerated at one length before growing it.
pub const MAX_COLLISIONS_PER_LENGTH: u32 = 10;

/// Hard cap on total draws. Exhausting it means the slug space is
/// pathologically full and the caller must fail rather than loop forever.
pub const MAX_SLUG_ATTEMPTS: u32 = 40;

/// Draw a random slug of the given length from [`SLUG_CHARSET`].
pub fn random_slug(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..SLUG_CHARSET.len());
            SLUG_CHARSET[idx] as char
        })
        .collect()
}

/// Length to use for the given zero-based attempt number: the base length,
/// grown by one after every [`MAX_COLLISIONS_PER_LENGTH`] collisions.
pub fn attempt_length(base: usize, attempt: u32) -> usize {
    base + (attempt / MAX_COLLISIONS_PER_LENGTH) as usize
}
