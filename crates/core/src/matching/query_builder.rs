//! Search query generation.
//!
//! Produces the ordered fallback chain of hoster queries for a target, from
//! the most specific string to the most general one. The orchestrator walks
//! the chain and stops at the first query that yields usable results.

use std::collections::HashSet;

use crate::matching::normalize::collapse_whitespace;
use crate::matching::types::{MediaKind, MediaTarget, QueryAttempt};

/// Builds hoster search queries for movies and episodes.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Queries for any target, dispatching on its kind.
    pub fn build_queries(&self, target: &MediaTarget) -> Vec<QueryAttempt> {
        match &target.kind {
            MediaKind::Movie => self.build_title_queries(target),
            MediaKind::Episode {
                season,
                episode,
                episode_name,
            } => self.build_episode_queries(
                &target.title,
                *season,
                *episode,
                episode_name.as_deref(),
                target.year,
            ),
        }
    }

    /// Queries for a single-shot title search.
    ///
    /// Order: title, title + year, original title, original title + year.
    /// Original-title variants are only emitted when the original title
    /// differs from the title (case-insensitively).
    pub fn build_title_queries(&self, target: &MediaTarget) -> Vec<QueryAttempt> {
        let title = collapse_whitespace(&target.title);
        if title.is_empty() {
            return Vec::new();
        }

        let original = target
            .original_title
            .as_deref()
            .map(collapse_whitespace)
            .filter(|o| !o.is_empty() && o.to_lowercase() != title.to_lowercase());

        let mut queries = Vec::new();
        for base in std::iter::once(title).chain(original) {
            queries.push((base.clone(), base.clone()));
            if let Some(year) = target.year {
                queries.push((base.clone(), format!("{} {}", base, year)));
            }
        }

        finalize(queries)
    }

    /// Queries for one episode of a show.
    ///
    /// Order:
    /// 1. with a year: `{show} {code} {name} {year}` and `{show} {code} {year}`
    ///    for the two padded primary codes (`S01E01`, `01x01`)
    /// 2. with an episode name: `{show} {code} {name}` for every code format
    /// 3. `{show} {code}` for every code format
    ///
    /// Returns an empty list when the show title is blank.
    pub fn build_episode_queries(
        &self,
        show_title: &str,
        season: u32,
        episode: u32,
        episode_name: Option<&str>,
        year: Option<u16>,
    ) -> Vec<QueryAttempt> {
        let show = collapse_whitespace(show_title);
        if show.is_empty() {
            return Vec::new();
        }
        let name = episode_name
            .map(collapse_whitespace)
            .filter(|n| !n.is_empty());

        let codes = episode_codes(season, episode);
        let primary = [
            format!("S{:02}E{:02}", season, episode),
            format!("{:02}x{:02}", season, episode),
        ];
        let mut queries = Vec::new();

        if let Some(year) = year {
            for code in &primary {
                if let Some(name) = &name {
                    queries.push(format!("{} {} {} {}", show, code, name, year));
                }
                queries.push(format!("{} {} {}", show, code, year));
            }
        }

        if let Some(name) = &name {
            for code in &codes {
                queries.push(format!("{} {} {}", show, code, name));
            }
        }

        for code in &codes {
            queries.push(format!("{} {}", show, code));
        }

        let queries = queries.into_iter().map(|q| (show.clone(), q)).collect();
        finalize(queries)
    }
}

/// Every season/episode code format, padded forms first, without duplicates.
///
/// Padded and unpadded variants of `S{s}E{e}`, `{s}x{e}` and `S{s} E{e}`, plus
/// the mixed-padding variants of the first two styles when padding changes
/// anything.
pub fn episode_codes(season: u32, episode: u32) -> Vec<String> {
    let (ps, pe) = (format!("{:02}", season), format!("{:02}", episode));
    let (us, ue) = (season.to_string(), episode.to_string());

    let mut codes = vec![
        format!("S{}E{}", ps, pe),
        format!("{}x{}", ps, pe),
        format!("S{} E{}", ps, pe),
        format!("S{}E{}", us, ue),
        format!("{}x{}", us, ue),
        format!("S{} E{}", us, ue),
    ];

    if ps != us || pe != ue {
        codes.push(format!("S{}E{}", ps, ue));
        codes.push(format!("S{}E{}", us, pe));
        codes.push(format!("{}x{}", ps, ue));
        codes.push(format!("{}x{}", us, pe));
    }

    let mut seen = HashSet::new();
    codes.retain(|c| seen.insert(c.clone()));
    codes
}

/// Normalize whitespace, drop exact duplicates keeping the first occurrence,
/// and assign ranks. Input pairs are (title, query).
fn finalize(queries: Vec<(String, String)>) -> Vec<QueryAttempt> {
    let mut seen = HashSet::new();
    queries
        .into_iter()
        .map(|(title, q)| (title, collapse_whitespace(&q)))
        .filter(|(_, q)| !q.is_empty())
        .filter(|(_, q)| seen.insert(q.clone()))
        .enumerate()
        .map(|(rank, (title, query))| QueryAttempt { rank, query, title })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(attempts: &[QueryAttempt]) -> Vec<&str> {
        attempts.iter().map(|a| a.query.as_str()).collect()
    }

    #[test]
    fn test_episode_codes_single_digit() {
        let codes = episode_codes(1, 1);
        assert_eq!(
            codes,
            vec![
                "S01E01", "01x01", "S01 E01", "S1E1", "1x1", "S1 E1", "S01E1", "S1E01", "01x1",
                "1x01",
            ]
        );
    }

    #[test]
    fn test_episode_codes_double_digit() {
        let codes = episode_codes(10, 12);
        assert_eq!(codes, vec!["S10E12", "10x12", "S10 E12"]);
    }

    #[test]
    fn test_episode_codes_mixed_padding_deduplicated() {
        let codes = episode_codes(10, 1);
        assert_eq!(
            codes,
            vec!["S10E01", "10x01", "S10 E01", "S10E1", "10x1", "S10 E1"]
        );
    }

    #[test]
    fn test_breaking_bad_pilot_order() {
        let builder = QueryBuilder::new();
        let queries = builder.build_episode_queries("Breaking Bad", 1, 1, Some("Pilot"), Some(2008));
        let queries = strings(&queries);

        assert_eq!(queries[0], "Breaking Bad S01E01 Pilot 2008");
        assert_eq!(queries[1], "Breaking Bad S01E01 2008");
        assert_eq!(queries[2], "Breaking Bad 01x01 Pilot 2008");
        assert_eq!(queries[3], "Breaking Bad 01x01 2008");

        let first_yearless = queries.iter().position(|q| !q.ends_with("2008")).unwrap();
        let pilot_with_year = queries
            .iter()
            .position(|q| *q == "Breaking Bad S01E01 Pilot 2008")
            .unwrap();
        assert!(pilot_with_year < first_yearless);
        assert!(queries.contains(&"Breaking Bad S01E01"));
        assert_eq!(*queries.last().unwrap(), "Breaking Bad 1x01");
    }

    #[test]
    fn test_episode_queries_without_year_or_name() {
        let builder = QueryBuilder::new();
        let queries = builder.build_episode_queries("Dark", 2, 3, None, None);
        let queries = strings(&queries);

        assert_eq!(queries[0], "Dark S02E03");
        assert_eq!(queries.len(), 10);
        assert!(queries.iter().all(|q| q.starts_with("Dark ")));
    }

    #[test]
    fn test_episode_queries_name_before_bare_codes() {
        let builder = QueryBuilder::new();
        let queries = builder.build_episode_queries("Dark", 1, 1, Some("Secrets"), None);
        let queries = strings(&queries);

        let last_named = queries.iter().rposition(|q| q.ends_with("Secrets")).unwrap();
        let first_bare = queries.iter().position(|q| *q == "Dark S01E01").unwrap();
        assert!(last_named < first_bare);
        assert_eq!(queries.len(), 20);
    }

    #[test]
    fn test_episode_queries_collapse_whitespace() {
        let builder = QueryBuilder::new();
        let queries =
            builder.build_episode_queries("  Breaking   Bad ", 1, 1, Some(" The  Pilot "), Some(2008));
        assert_eq!(queries[0].query, "Breaking Bad S01E01 The Pilot 2008");
        assert!(queries.iter().all(|q| !q.query.contains("  ")));
    }

    #[test]
    fn test_episode_queries_have_no_duplicates() {
        let builder = QueryBuilder::new();
        for season in [1, 10] {
            for episode in [1, 10] {
                for name in [None, Some("Name")] {
                    for year in [None, Some(2010)] {
                        let queries =
                            builder.build_episode_queries("Show", season, episode, name, year);
                        let unique: HashSet<_> = queries.iter().map(|q| &q.query).collect();
                        assert_eq!(unique.len(), queries.len(), "s{season} e{episode}");
                        assert!(!queries.is_empty());
                    }
                }
            }
        }
    }

    #[test]
    fn test_episode_queries_ranks_are_sequential() {
        let builder = QueryBuilder::new();
        let queries = builder.build_episode_queries("Show", 3, 7, Some("Name"), Some(2015));
        for (i, q) in queries.iter().enumerate() {
            assert_eq!(q.rank, i);
        }
    }

    #[test]
    fn test_episode_queries_empty_title() {
        let builder = QueryBuilder::new();
        assert!(builder.build_episode_queries("   ", 1, 1, Some("Pilot"), Some(2008)).is_empty());
    }

    #[test]
    fn test_title_queries_full_chain() {
        let builder = QueryBuilder::new();
        let target = MediaTarget::movie("Pelíšky", Some("Cosy Dens".to_string()), Some(1999));
        let queries = builder.build_title_queries(&target);
        assert_eq!(
            strings(&queries),
            vec!["Pelíšky", "Pelíšky 1999", "Cosy Dens", "Cosy Dens 1999"]
        );
    }

    #[test]
    fn test_title_queries_skip_same_original_title() {
        let builder = QueryBuilder::new();
        let target = MediaTarget::movie("Inception", Some("INCEPTION".to_string()), None);
        let queries = builder.build_title_queries(&target);
        assert_eq!(strings(&queries), vec!["Inception"]);
    }

    #[test]
    fn test_title_queries_carry_their_base_title() {
        let builder = QueryBuilder::new();
        let target = MediaTarget::movie("Počátek", Some("Inception".to_string()), Some(2010));
        let queries = builder.build_title_queries(&target);
        let titles: Vec<(&str, &str)> = queries
            .iter()
            .map(|a| (a.query.as_str(), a.title.as_str()))
            .collect();
        assert_eq!(
            titles,
            vec![
                ("Počátek", "Počátek"),
                ("Počátek 2010", "Počátek"),
                ("Inception", "Inception"),
                ("Inception 2010", "Inception"),
            ]
        );

        let episode = builder.build_episode_queries("Dark", 1, 1, None, None);
        assert!(episode.iter().all(|a| a.title == "Dark"));
    }

    #[test]
    fn test_build_queries_dispatches_on_kind() {
        let builder = QueryBuilder::new();
        let episode = MediaTarget::episode("Dark", 1, 1, None, None);
        assert_eq!(builder.build_queries(&episode)[0].query, "Dark S01E01");

        let movie = MediaTarget::movie("Dark City", None, Some(1998));
        assert_eq!(builder.build_queries(&movie)[1].query, "Dark City 1998");
    }
}
