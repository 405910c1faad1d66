use std::{
    collections::{BTreeMap, btree_map},
    ops::AddAssign,
};

use serde::{Deserialize, Serialize};

use crate::accumulate::LineTally;

/// Per-language totals for one repository.
///
/// For every value produced by the walker `lines == code + comments + blank`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub lines: u64,
    pub code: u64,
    pub comments: u64,
    pub blank: u64,
    pub files: u64,
    pub bytes: u64,
}

impl LanguageStats {
    /// Entry primed from host-declared bytes, with no scanned files yet.
    pub fn seeded(bytes: u64) -> Self {
        Self { bytes, ..Self::default() }
    }

    pub fn record_file(&mut self, tally: LineTally, bytes: u64) {
        self.lines += tally.total;
        self.code += tally.code;
        self.comments += tally.comments;
        self.blank += tally.blank;
        self.files += 1;
        self.bytes += bytes;
    }

    pub fn is_consistent(&self) -> bool {
        self.lines == self.code + self.comments + self.blank
    }
}

impl AddAssign for LanguageStats {
    fn add_assign(&mut self, rhs: Self) {
        self.lines += rhs.lines;
        self.code += rhs.code;
        self.comments += rhs.comments;
        self.blank += rhs.blank;
        self.files += rhs.files;
        self.bytes += rhs.bytes;
    }
}

/// Language label → [`LanguageStats`] for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageMap(BTreeMap<String, LanguageStats>);

impl LanguageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prime the map with host-declared byte totals.
    pub fn seed_declared<I, S>(&mut self, declared: I)
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        for (label, bytes) in declared {
            self.0.insert(label.into(), LanguageStats::seeded(bytes));
        }
    }

    pub fn record_file(&mut self, language: &str, tally: LineTally, bytes: u64) {
        match self.0.get_mut(language) {
            Some(stats) => stats.record_file(tally, bytes),
            None => {
                let mut stats = LanguageStats::default();
                stats.record_file(tally, bytes);
                self.0.insert(language.to_string(), stats);
            }
        }
    }

    pub fn get(&self, language: &str) -> Option<&LanguageStats> {
        self.0.get(language)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, LanguageStats> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_lines(&self) -> u64 {
        self.0.values().map(|s| s.lines).sum()
    }

    pub fn total_files(&self) -> u64 {
        self.0.values().map(|s| s.files).sum()
    }
}

impl<'a> IntoIterator for &'a LanguageMap {
    type Item = (&'a String, &'a LanguageStats);
    type IntoIter = btree_map::Iter<'a, String, LanguageStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Account-wide per-language totals: repository stats plus the number of
/// repositories that contributed the language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLanguageStats {
    #[serde(flatten)]
    pub stats: LanguageStats,
    pub repos: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountLanguageMap(BTreeMap<String, AccountLanguageStats>);

impl AccountLanguageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one repository's map in; each language it lists counts the
    /// repository once.
    pub fn absorb_repository(&mut self, repository: &LanguageMap) {
        for (label, stats) in repository {
            let entry = self.0.entry(label.clone()).or_default();
            entry.stats += *stats;
            entry.repos += 1;
        }
    }

    pub fn get(&self, language: &str) -> Option<&AccountLanguageStats> {
        self.0.get(language)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AccountLanguageStats> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_lines(&self) -> u64 {
        self.0.values().map(|s| s.stats.lines).sum()
    }

    pub fn total_files(&self) -> u64 {
        self.0.values().map(|s| s.stats.files).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(total: u64, code: u64, comments: u64, blank: u64) -> LineTally {
        LineTally { total, code, comments, blank }
    }

    #[test]
    fn record_file_creates_and_accumulates() {
        let mut map = LanguageMap::new();
        map.record_file("Rust", tally(3, 2, 1, 0), 40);
        map.record_file("Rust", tally(2, 1, 0, 1), 10);

        let rust = map.get("Rust").unwrap();
        assert_eq!(rust.lines, 5);
        assert_eq!(rust.files, 2);
        assert_eq!(rust.bytes, 50);
        assert!(rust.is_consistent());
    }

    #[test]
    fn seeded_languages_keep_declared_bytes() {
        let mut map = LanguageMap::new();
        map.seed_declared([("Go", 1200u64), ("Jupyter Notebook", 900)]);
        map.record_file("Go", tally(1, 1, 0, 0), 30);

        assert_eq!(map.get("Go").unwrap().bytes, 1230);
        assert_eq!(map.get("Go").unwrap().files, 1);
        assert_eq!(map.get("Jupyter Notebook").unwrap().lines, 0);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn account_map_counts_each_repository_once_per_language() {
        let mut first = LanguageMap::new();
        first.record_file("Python", tally(2, 1, 1, 0), 20);
        first.record_file("Python", tally(2, 2, 0, 0), 20);
        let mut second = LanguageMap::new();
        second.record_file("Python", tally(1, 1, 0, 0), 5);
        second.record_file("Shell", tally(1, 1, 0, 0), 5);

        let mut account = AccountLanguageMap::new();
        account.absorb_repository(&first);
        account.absorb_repository(&second);

        let python = account.get("Python").unwrap();
        assert_eq!(python.repos, 2);
        assert_eq!(python.stats.files, 3);
        assert_eq!(python.stats.lines, 5);
        assert_eq!(account.get("Shell").unwrap().repos, 1);
        assert_eq!(account.total_lines(), 6);
    }

    #[test]
    fn account_stats_serialize_flat() {
        let mut map = LanguageMap::new();
        map.record_file("C", tally(1, 1, 0, 0), 2);
        let mut account = AccountLanguageMap::new();
        account.absorb_repository(&map);

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["C"]["lines"], 1);
        assert_eq!(json["C"]["repos"], 1);
    }
}
