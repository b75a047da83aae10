//! Episode result filtering.
//!
//! Keeps hoster hits that name the right show and carry the right
//! season/episode code in any of the common spellings.

use regex_lite::Regex;
use tracing::warn;

use crate::matching::normalize::normalize;
use crate::matching::types::FileCandidate;

/// Build the episode-code pattern for one season/episode pair.
///
/// The pattern runs against normalized names (lowercase, dot separated) and
/// accepts `s01e01`, `s1e1`, `s01.e01` (from `S01 E01`), `01x01`, `1x1` and
/// `01.x.01` (from `01 x 01`). Word boundaries on both ends keep `s01e10`
/// from matching episode 1.
pub fn episode_code_pattern(season: u32, episode: u32) -> Result<Regex, regex_lite::Error> {
    Regex::new(&format!(
        r"\bs0*{s}\.?e0*{e}\b|\b0*{s}\.?x\.?0*{e}\b",
        s = season,
        e = episode
    ))
}

/// Filter hoster hits down to the requested episode.
///
/// A hit is kept when its normalized name contains the normalized show title
/// and matches [`episode_code_pattern`]. Input order is preserved. Returns an
/// empty list when nothing matches or the show title normalizes to nothing.
pub fn filter_episode_results(
    candidates: Vec<FileCandidate>,
    show_title: &str,
    season: u32,
    episode: u32,
) -> Vec<FileCandidate> {
    let normalized_show = normalize(show_title);
    if normalized_show.is_empty() {
        return Vec::new();
    }

    let pattern = match episode_code_pattern(season, episode) {
        Ok(re) => re,
        Err(e) => {
            warn!(season, episode, error = %e, "Invalid episode code pattern");
            return Vec::new();
        }
    };

    candidates
        .into_iter()
        .filter(|c| {
            let name = normalize(&c.name);
            name.contains(&normalized_show) && pattern.is_match(&name)
        })
        .collect()
}
