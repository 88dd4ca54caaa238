use rand::seq::SliceRandom;
use rand::Rng;

/// Pick a template from `pool`, never repeating `last` when another entry is available.
///
/// Candidates equal to `last` are filtered out before drawing, so the draw is uniform
/// over the remaining entries and always terminates. A pool whose every entry equals
/// `last` (including a single-entry pool) falls back to the whole pool.
pub fn select<'a, R>(pool: &'a [String], last: Option<&str>, rng: &mut R) -> Option<&'a str>
where
    R: Rng + ?Sized,
{
    if pool.len() > 1 {
        let fresh: Vec<&String> = pool
            .iter()
            .filter(|candidate| Some(candidate.as_str()) != last)
            .collect();
        if let Some(pick) = fresh.choose(rng).copied() {
            return Some(pick.as_str());
        }
    }
    pool.choose(rng).map(String::as_str)
}
