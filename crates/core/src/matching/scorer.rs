//! Relevance scoring for movie candidates.
//!
//! Every hit gets a score built from independent signals (title, year,
//! language tag, quality tag, low-quality marker, file type). Hits below
//! [`ScoringWeights::min_score`] are dropped and the rest are returned best
//! first.

use serde::{Deserialize, Serialize};

use crate::matching::normalize::{looks_like_year, normalize};
use crate::matching::types::{FileCandidate, ScoredCandidate};

/// Tag tokens for Czech audio or subtitles.
const LANG_CZ_TAGS: &[&str] = &["cz", "cze", "cesky"];
/// Tag tokens for Slovak audio or subtitles.
const LANG_SK_TAGS: &[&str] = &["sk", "svk", "slovensky"];
/// Tag tokens for English audio or subtitles.
const LANG_EN_TAGS: &[&str] = &["en", "eng", "english"];

/// Dotted markers of camcorder / telesync rips, matched on `"." + normalized`.
const LOW_QUALITY_MARKERS: &[&str] = &[".cam.", ".ts.", ".tc.", ".camrip.", ".telesync."];

/// Extensions a player can open.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "wmv", "flv", "ts", "mpg", "mpeg", "iso",
];

/// Tunable scoring constants.
///
/// The defaults are the empirically chosen values the ranking was built
/// around; they are loaded from the `[matching]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Candidates scoring below this are dropped.
    pub min_score: f32,
    pub title_match: f32,
    /// Score assigned when the title is missing from the filename.
    pub title_miss: f32,
    pub year_match: f32,
    /// Added (usually negative) when no year token is within tolerance.
    pub year_mismatch: f32,
    pub year_tolerance: u16,
    pub lang_cz: f32,
    pub lang_sk: f32,
    pub lang_en: f32,
    pub quality_2160: f32,
    pub quality_1080: f32,
    pub quality_720: f32,
    pub quality_bluray: f32,
    pub quality_web: f32,
    pub quality_dvd: f32,
    /// Added when a CAM / TS / TC marker is present.
    pub low_quality_penalty: f32,
    /// Score forced on files that are not playable video.
    pub bad_file_type: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            min_score: 3.0,
            title_match: 3.0,
            title_miss: -100.0,
            year_match: 2.0,
            year_mismatch: -1.0,
            year_tolerance: 1,
            lang_cz: 2.0,
            lang_sk: 1.5,
            lang_en: 0.5,
            quality_2160: 2.0,
            quality_1080: 1.5,
            quality_720: 1.0,
            quality_bluray: 1.2,
            quality_web: 0.8,
            quality_dvd: 0.5,
            low_quality_penalty: -3.0,
            bad_file_type: -200.0,
        }
    }
}

impl ScoringWeights {
    /// Quality tiers as (label, tokens, bonus) in priority order; the first hit wins.
    fn quality_tiers(&self) -> [(&'static str, &'static [&'static str], f32); 6] {
        [
            ("2160p", &["2160p", "4k"], self.quality_2160),
            ("1080p", &["1080p", "1080i"], self.quality_1080),
            ("720p", &["720p", "720i"], self.quality_720),
            ("bluray", &["bluray"], self.quality_bluray),
            ("web", &["webrip", "web"], self.quality_web),
            ("dvd", &["dvdrip", "dvd"], self.quality_dvd),
        ]
    }

    /// Language tiers in priority order; the first hit wins.
    fn language_tiers(&self) -> [(&'static str, &'static [&'static str], f32); 3] {
        [
            ("cz", LANG_CZ_TAGS, self.lang_cz),
            ("sk", LANG_SK_TAGS, self.lang_sk),
            ("en", LANG_EN_TAGS, self.lang_en),
        ]
    }
}

/// Scores and ranks file-hoster hits against a movie title and year.
#[derive(Debug, Clone, Default)]
pub struct RelevanceScorer {
    weights: ScoringWeights,
}

impl RelevanceScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Score every candidate, drop those below the threshold, and sort the
    /// rest by score descending. Ties keep their input order.
    pub fn score_and_rank(
        &self,
        candidates: Vec<FileCandidate>,
        title: &str,
        year: Option<u16>,
    ) -> Vec<ScoredCandidate> {
        let normalized_title = normalize(title);

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|c| self.score(c, &normalized_title, year))
            .filter(|s| s.score >= self.weights.min_score)
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    /// Score one candidate against an already-normalized title.
    pub fn score(
        &self,
        candidate: FileCandidate,
        normalized_title: &str,
        year: Option<u16>,
    ) -> ScoredCandidate {
        let w = &self.weights;
        let normalized_name = normalize(&candidate.name);
        let tokens: Vec<&str> = normalized_name.split('.').collect();
        let mut reasons: Vec<String> = Vec::new();

        let title_found =
            !normalized_title.is_empty() && normalized_name.contains(normalized_title);

        let mut score = if title_found {
            reasons.push(format!("title match ({:+.1})", w.title_match));
            w.title_match
        } else {
            reasons.push("title not found".to_string());
            w.title_miss
        };

        if title_found {
            if let Some(target_year) = year {
                let tolerance = w.year_tolerance;
                let matched = tokens
                    .iter()
                    .filter(|t| looks_like_year(t))
                    .filter_map(|t| t.parse::<u16>().ok())
                    .find(|y| y.abs_diff(target_year) <= tolerance);
                match matched {
                    Some(y) => {
                        score += w.year_match;
                        reasons.push(format!("year {} ({:+.1})", y, w.year_match));
                    }
                    None => {
                        score += w.year_mismatch;
                        reasons.push(format!("year mismatch ({:+.1})", w.year_mismatch));
                    }
                }
            }

            let language = w
                .language_tiers()
                .into_iter()
                .find(|(_, tags, _)| tags.iter().any(|tag| tokens.contains(tag)));
            if let Some((label, _, bonus)) = language {
                score += bonus;
                reasons.push(format!("lang {} ({:+.1})", label, bonus));
            }

            let quality = w
                .quality_tiers()
                .into_iter()
                .find(|(_, tags, _)| tags.iter().any(|tag| tokens.contains(tag)));
            if let Some((label, _, bonus)) = quality {
                score += bonus;
                reasons.push(format!("quality {} ({:+.1})", label, bonus));
            }

            let dotted = format!(".{}", normalized_name);
            if LOW_QUALITY_MARKERS.iter().any(|m| dotted.contains(m)) {
                score += w.low_quality_penalty;
                reasons.push(format!("low quality rip ({:+.1})", w.low_quality_penalty));
            }
        }

        if !has_video_extension(&candidate.name) {
            score = w.bad_file_type;
            reasons.push("not a video file".to_string());
        }

        ScoredCandidate {
            candidate,
            score,
            normalized_name,
            reasoning: reasons.join(", "),
        }
    }
}

/// Whether a raw filename ends in a playable video extension.
pub fn has_video_extension(name: &str) -> bool {
    name.trim()
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GB: u64 = 1024 * 1024 * 1024;

    fn candidate(name: &str, size: u64) -> FileCandidate {
        FileCandidate::new(format!("id-{name}"), name, Some(size)).unwrap()
    }

    fn scorer() -> RelevanceScorer {
        RelevanceScorer::new(ScoringWeights::default())
    }

    fn score_of(name: &str, title: &str, year: Option<u16>) -> f32 {
        scorer().score(candidate(name, GB), &normalize(title), year).score
    }

    #[test]
    fn test_inception_ranking() {
        let candidates = vec![
            candidate("Inception.2010.1080p.CZ.mkv", 2 * GB),
            candidate("Inception.2010.CAM.mkv", GB),
            candidate("SomeOtherMovie.2010.1080p.mkv", GB),
        ];
        let ranked = scorer().score_and_rank(candidates, "Inception", Some(2010));

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate.name, "Inception.2010.1080p.CZ.mkv");
        // title 3.0 + year 2.0 + cz 2.0 + 1080p 1.5
        assert!((ranked[0].score - 8.5).abs() < 1e-4);
        assert_eq!(ranked[0].normalized_name, "inception.2010.1080p.cz.mkv");
    }

    #[test]
    fn test_cam_rip_penalized_below_threshold() {
        let score = score_of("Inception.2010.CAM.mkv", "Inception", Some(2010));
        assert!((score - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_non_video_extension_always_excluded() {
        let candidates = vec![
            candidate("Inception.2010.2160p.BluRay.CZ.txt", GB),
            candidate("Inception 2010 CZ 1080p", GB),
        ];
        let ranked = scorer().score_and_rank(candidates, "Inception", Some(2010));
        assert!(ranked.is_empty());
        assert_eq!(score_of("Inception.2010.CZ.txt", "Inception", Some(2010)), -200.0);
    }

    #[test]
    fn test_title_miss_is_hard_disqualification() {
        let score = score_of("Interstellar.2014.CZ.1080p.mkv", "Inception", Some(2014));
        assert_eq!(score, -100.0);
    }

    #[test]
    fn test_empty_title_disqualifies_everything() {
        let candidates = vec![candidate("Anything.2010.CZ.1080p.mkv", GB)];
        assert!(scorer().score_and_rank(candidates, "  ", Some(2010)).is_empty());
    }

    #[test]
    fn test_title_with_wrong_year_falls_below_threshold() {
        let candidates = vec![candidate("Inception.mkv", GB), candidate("Inception.2014.mkv", GB)];
        assert!(scorer().score_and_rank(candidates, "Inception", Some(2010)).is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let candidates = vec![candidate("Inception.mkv", GB)];
        let ranked = scorer().score_and_rank(candidates, "Inception", None);
        assert_eq!(ranked.len(), 1);
        assert!((ranked[0].score - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_year_tolerance() {
        assert!((score_of("Movie.2011.mkv", "Movie", Some(2010)) - 5.0).abs() < 1e-4);
        assert!((score_of("Movie.2012.mkv", "Movie", Some(2010)) - 2.0).abs() < 1e-4);
        // no year token at all counts as a mismatch
        assert!((score_of("Movie.CZ.mkv", "Movie", Some(2010)) - 4.0).abs() < 1e-4);
        // no target year, no adjustment
        assert!((score_of("Movie.1999.mkv", "Movie", None) - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_language_priority_first_match_wins() {
        // cz beats en even when both are present
        assert!((score_of("Movie.EN.CZ.mkv", "Movie", None) - 5.0).abs() < 1e-4);
        assert!((score_of("Movie.Slovensky.mkv", "Movie", None) - 4.5).abs() < 1e-4);
        assert!((score_of("Movie.English.mkv", "Movie", None) - 3.5).abs() < 1e-4);
        // tags must be whole tokens
        assert!((score_of("Movie.Encore.mkv", "Movie", None) - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_quality_first_tier_in_chain_wins() {
        assert!((score_of("Movie.2160p.BluRay.mkv", "Movie", None) - 5.0).abs() < 1e-4);
        // 720p sits ahead of bluray in the chain despite the smaller bonus
        assert!((score_of("Movie.720p.BluRay.mkv", "Movie", None) - 4.0).abs() < 1e-4);
        assert!((score_of("Movie.BluRay.WEB.mkv", "Movie", None) - 4.2).abs() < 1e-4);
        assert!((score_of("Movie.WEB-DL.mkv", "Movie", None) - 3.8).abs() < 1e-4);
        assert!((score_of("Movie.DVDRip.avi", "Movie", None) - 3.5).abs() < 1e-4);
        assert!((score_of("Movie.4K.mp4", "Movie", None) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_ts_extension_is_not_telesync_marker() {
        assert!((score_of("Movie.2010.CZ.ts", "Movie", Some(2010)) - 7.0).abs() < 1e-4);
        assert!((score_of("Movie.2010.TS.CZ.mkv", "Movie", Some(2010)) - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_diacritics_insensitive_title() {
        let candidates = vec![candidate("Pelisky.1999.CZ.DVDRip.avi", GB)];
        let ranked = scorer().score_and_rank(candidates, "Pelíšky", Some(1999));
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].reasoning.contains("lang cz"));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let candidates = vec![
            candidate("Movie.2010.CZ.mkv", GB),
            candidate("Movie.2010.1080p.mkv", GB),
            candidate("Movie (2010) CZ.avi", GB),
        ];
        let ranked = scorer().score_and_rank(candidates, "Movie", Some(2010));
        let names: Vec<&str> = ranked.iter().map(|s| s.candidate.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Movie.2010.CZ.mkv", "Movie (2010) CZ.avi", "Movie.2010.1080p.mkv"]
        );
    }

    #[test]
    fn test_custom_threshold() {
        let weights = ScoringWeights {
            min_score: 0.0,
            ..ScoringWeights::default()
        };
        let candidates = vec![candidate("Inception.2014.mkv", GB)];
        let ranked =
            RelevanceScorer::new(weights).score_and_rank(candidates, "Inception", Some(2010));
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_has_video_extension() {
        assert!(has_video_extension("a.MKV"));
        assert!(has_video_extension("a.b.mpeg"));
        assert!(!has_video_extension("a.srt"));
        assert!(!has_video_extension("no extension"));
        assert!(!has_video_extension(""));
    }
}
