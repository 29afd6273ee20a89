//! Wordlist loading and candidate path generation

use std::iter::FusedIterator;
use std::path::Path;

use crate::error::{EnumError, Result};

/// Reads a wordlist, one entry per line.
/// Any read failure is reported as [`EnumError::MissingWordlist`].
pub async fn read_wordlist(path: &Path) -> Result<Vec<String>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| EnumError::MissingWordlist {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_wordlist(&bytes))
}

/// Splits wordlist bytes into entries, decoding invalid UTF-8 lossily.
/// Only line terminators are stripped; other whitespace is kept.
pub fn parse_wordlist(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Filtered wordlist entries combined with the extension set
///
/// Exclusion runs once against raw entries, so an excluded entry loses all of
/// its extension variants.
#[derive(Clone, Debug, Default)]
pub struct CandidateSet {
    entries: Vec<String>,
    extensions: Vec<String>,
    excluded: usize,
    blank_skipped: usize,
}

impl CandidateSet {
    pub fn new(
        raw_entries: Vec<String>,
        extensions: &[String],
        exclude: &[String],
        skip_blank: bool,
    ) -> Self {
        let mut entries = Vec::with_capacity(raw_entries.len());
        let mut excluded = 0;
        let mut blank_skipped = 0;

        for entry in raw_entries {
            if skip_blank && entry.trim().is_empty() {
                blank_skipped += 1;
            } else if exclude.iter().any(|needle| entry.contains(needle.as_str())) {
                excluded += 1;
            } else {
                entries.push(entry);
            }
        }

        Self {
            entries,
            extensions: extensions.to_vec(),
            excluded,
            blank_skipped,
        }
    }

    /// Number of candidates that will be probed
    pub fn len(&self) -> u64 {
        (self.entries.len() * self.extensions.len().max(1)) as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries dropped by exclude substrings
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    pub fn blank_skipped(&self) -> usize {
        self.blank_skipped
    }

    /// Lazily yields candidates, entries outer and extensions inner
    pub fn iter(&self) -> Candidates<'_> {
        Candidates {
            entries: &self.entries,
            extensions: &self.extensions,
            entry: 0,
            extension: 0,
        }
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = String;
    type IntoIter = Candidates<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over candidate paths of a [`CandidateSet`]
#[derive(Clone, Debug)]
pub struct Candidates<'a> {
    entries: &'a [String],
    extensions: &'a [String],
    entry: usize,
    extension: usize,
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let word = self.entries.get(self.entry)?;

        if self.extensions.is_empty() {
            self.entry += 1;
            return Some(word.clone());
        }

        let candidate = format!("{word}{}", self.extensions[self.extension]);
        self.extension += 1;
        if self.extension == self.extensions.len() {
            self.extension = 0;
            self.entry += 1;
        }
        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let per_entry = self.extensions.len().max(1);
        let remaining = self
            .entries
            .len()
            .saturating_sub(self.entry)
            .saturating_mul(per_entry)
            .saturating_sub(self.extension);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Candidates<'_> {}
impl FusedIterator for Candidates<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_entry_and_extension_expansion() {
        let set = CandidateSet::new(strings(&["admin", "backup"]), &strings(&[".zip"]), &[], true);
        let candidates: Vec<String> = set.iter().collect();
        assert_eq!(candidates, strings(&["admin.zip", "backup.zip"]));
    }

    #[test]
    fn test_entries_are_outer_loop() {
        let set = CandidateSet::new(
            strings(&["a", "b"]),
            &strings(&[".zip", ".bak", ".old"]),
            &[],
            true,
        );
        let candidates: Vec<String> = set.iter().collect();
        assert_eq!(
            candidates,
            strings(&["a.zip", "a.bak", "a.old", "b.zip", "b.bak", "b.old"])
        );
        assert_eq!(set.len(), 6);
    }

    #[test]
    fn test_no_extensions_yields_entries() {
        let set = CandidateSet::new(strings(&["pub", "www", "pub"]), &[], &[], true);
        let candidates: Vec<String> = set.iter().collect();
        assert_eq!(candidates, strings(&["pub", "www", "pub"])); // duplicates are kept
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_excluded_entry_drops_every_variant() {
        let set = CandidateSet::new(
            strings(&["secret", "public"]),
            &strings(&[".zip", ".tar"]),
            &strings(&["secr"]),
            true,
        );
        let candidates: Vec<String> = set.iter().collect();
        assert_eq!(candidates, strings(&["public.zip", "public.tar"]));
        assert_eq!(set.excluded(), 1);
    }

    #[test]
    fn test_exclude_matches_entry_not_extension() {
        // ".zip" is only part of the candidate, never of the raw entry
        let set = CandidateSet::new(strings(&["admin"]), &strings(&[".zip"]), &strings(&["zip"]), true);
        assert_eq!(set.iter().collect::<Vec<_>>(), strings(&["admin.zip"]));
    }

    #[test]
    fn test_only_excluded_entries_gives_empty_set() {
        let set = CandidateSet::new(strings(&["secret"]), &[], &strings(&["secr"]), true);
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn test_blank_lines_policy() {
        let raw = strings(&["pub", "", "   ", "www"]);

        let skipped = CandidateSet::new(raw.clone(), &strings(&[".txt"]), &[], true);
        assert_eq!(skipped.iter().collect::<Vec<_>>(), strings(&["pub.txt", "www.txt"]));
        assert_eq!(skipped.blank_skipped(), 2);

        let kept = CandidateSet::new(raw, &strings(&[".txt"]), &[], false);
        assert_eq!(
            kept.iter().collect::<Vec<_>>(),
            strings(&["pub.txt", ".txt", "   .txt", "www.txt"])
        );
    }

    #[test]
    fn test_iterator_is_restartable_and_sized() {
        let set = CandidateSet::new(strings(&["a", "b"]), &strings(&[".x", ".y"]), &[], true);
        let mut iter = set.iter();
        assert_eq!(iter.len(), 4);
        iter.next();
        assert_eq!(iter.len(), 3);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 1);

        let first: Vec<String> = set.iter().collect();
        let second: Vec<String> = (&set).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_wordlist_strips_line_endings() {
        let entries = parse_wordlist(b"admin\r\nbackup\n\nwww \n");
        assert_eq!(entries, strings(&["admin", "backup", "", "www "]));
    }

    #[test]
    fn test_parse_wordlist_tolerates_invalid_utf8() {
        let entries = parse_wordlist(b"caf\xe9\nok\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], "ok");
    }

    #[tokio::test]
    async fn test_read_missing_wordlist() {
        let err = read_wordlist(Path::new("/nonexistent/rsync-enum/words.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, EnumError::MissingWordlist { .. }));
    }

    #[tokio::test]
    async fn test_read_wordlist_from_file() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("words.txt");
        std::fs::write(&path, "admin\nbackup\n").expect("Failed to write");

        let entries = read_wordlist(&path).await.unwrap();
        assert_eq!(entries, strings(&["admin", "backup"]));
    }
}
