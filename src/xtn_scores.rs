// High score persistence
// One record per line: "<name> | <score> | <timestamp>"; the whole file is
// rewritten on every save, last write wins

use chrono::Local;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Field separator in the score file
const SEPARATOR: &str = " | ";

/// A single persisted score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub score: u32,        // Best score achieved, always >= 1
    pub timestamp: String, // When it was achieved ("YYYY-MM-DD HH:MM:SS")
}

/// In-memory high score table, keyed by player name
#[derive(Debug, Default)]
pub struct HighScores {
    entries: BTreeMap<String, ScoreEntry>,
}

impl HighScores {
    /// Load scores from the backing file
    /// A missing file yields an empty table; malformed lines are reported and
    /// skipped while the remaining records still load; an unreadable file is
    /// reported and yields an empty table. Never fatal.
    pub fn load(path: &Path) -> HighScores {
        let mut scores = HighScores::default();
        if !path.exists() {
            return scores;
        }
        match fs::read_to_string(path) {
            Ok(contents) => {
                for line in contents.lines() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match parse_line(line) {
                        Some((name, entry)) => {
                            scores.entries.insert(name, entry);
                        }
                        None => log::warn!("skipping malformed score record: {:?}", line),
                    }
                }
            }
            Err(e) => log::error!("error loading high scores from {}: {}", path.display(), e),
        }
        scores
    }

    /// Rewrite the backing file from the in-memory table
    /// The caller reports failures; scores simply are not persisted that call
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = String::new();
        for (name, entry) in &self.entries {
            out.push_str(&format_line(name, entry));
            out.push('\n');
        }
        fs::write(path, out)
    }

    /// Record a score if it beats the stored one
    /// The existing entry is kept unless the new score is strictly greater;
    /// returns true when the table changed
    pub fn submit(&mut self, name: &str, score: u32, timestamp: String) -> bool {
        if self.entries.get(name).map_or(true, |e| score > e.score) {
            self.entries
                .insert(name.to_string(), ScoreEntry { score, timestamp });
            true
        } else {
            false
        }
    }

    /// Stored entry for a player, if any
    pub fn get(&self, name: &str) -> Option<&ScoreEntry> {
        self.entries.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ScoreEntry)> {
        self.entries.iter()
    }
}

/// Parse one score record
/// None if the line does not have exactly three " | " fields with a
/// non-empty name and a numeric score
fn parse_line(line: &str) -> Option<(String, ScoreEntry)> {
    let fields: Vec<&str> = line.split(SEPARATOR).collect();
    if fields.len() != 3 {
        return None;
    }
    let name = fields[0].trim();
    if name.is_empty() {
        return None;
    }
    let score = fields[1].trim().parse::<u32>().ok()?;
    Some((
        name.to_string(),
        ScoreEntry {
            score,
            timestamp: fields[2].to_string(),
        },
    ))
}

fn format_line(name: &str, entry: &ScoreEntry) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        name,
        entry.score,
        entry.timestamp,
        sep = SEPARATOR
    )
}

/// Current local time in the score file's timestamp format
pub fn timestamp_now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u32, timestamp: &str) -> ScoreEntry {
        ScoreEntry {
            score,
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn test_parse_line() {
        let (name, e) = parse_line("Alice | 94 | 2024-01-01 10:30:00").expect("well-formed");
        assert_eq!(name, "Alice");
        assert_eq!(e, entry(94, "2024-01-01 10:30:00"));

        // Names may contain spaces, the separator requires the pipe
        let (name, _) = parse_line("Mary Ann | 50 | 2024-01-01 10:30:00").expect("spaced name");
        assert_eq!(name, "Mary Ann");

        assert!(parse_line("Alice 50 2024-01-01").is_none()); // missing delimiter
        assert!(parse_line("Alice | fifty | 2024-01-01 10:30:00").is_none());
        assert!(parse_line(" | 50 | 2024-01-01 10:30:00").is_none()); // empty name
        assert!(parse_line("Alice | 50").is_none()); // field count
        assert!(parse_line("a | 1 | b | c").is_none());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("high_scores.txt");

        let mut scores = HighScores::default();
        scores.submit("Alice", 94, "2024-01-01 10:30:00".to_string());
        scores.submit("Bob", 80, "2024-02-02 11:00:00".to_string());
        scores.submit("Chloé", 64, "2024-03-03 12:00:00".to_string());
        scores.save(&path).expect("save");

        let loaded = HighScores::load(&path);
        assert_eq!(loaded.len(), 3);
        let original: Vec<_> = scores.iter().collect();
        let reloaded: Vec<_> = loaded.iter().collect();
        assert_eq!(original, reloaded);
    }

    #[test]
    fn test_load_skips_malformed_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("high_scores.txt");
        fs::write(
            &path,
            "Alice | 94 | 2024-01-01 10:30:00\n\
             Alice 50 2024-01-01\n\
             Bob | 80 | 2024-02-02 11:00:00\n",
        )
        .expect("write fixture");

        let loaded = HighScores::load(&path);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("Alice"), Some(&entry(94, "2024-01-01 10:30:00")));
        assert_eq!(loaded.get("Bob"), Some(&entry(80, "2024-02-02 11:00:00")));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = HighScores::load(&dir.path().join("does_not_exist.txt"));
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_submit_keeps_maximum() {
        let mut scores = HighScores::default();
        assert!(scores.submit("Bob", 80, "2024-01-01 10:00:00".to_string()));

        // A lower score never displaces the stored one
        assert!(!scores.submit("Bob", 60, "2024-01-02 10:00:00".to_string()));
        assert_eq!(scores.get("Bob"), Some(&entry(80, "2024-01-01 10:00:00")));

        // Equal is not strictly greater
        assert!(!scores.submit("Bob", 80, "2024-01-03 10:00:00".to_string()));
        assert_eq!(scores.get("Bob"), Some(&entry(80, "2024-01-01 10:00:00")));

        // Strictly greater replaces score and timestamp
        assert!(scores.submit("Bob", 90, "2024-01-04 10:00:00".to_string()));
        assert_eq!(scores.get("Bob"), Some(&entry(90, "2024-01-04 10:00:00")));
        assert_eq!(scores.len(), 1);
    }

    #[test]
    fn test_submitted_maximum_survives_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("high_scores.txt");

        let mut scores = HighScores::default();
        scores.submit("Bob", 80, "2024-01-01 10:00:00".to_string());
        scores.save(&path).expect("save");

        let mut reloaded = HighScores::load(&path);
        reloaded.submit("Bob", 60, "2024-01-02 10:00:00".to_string());
        reloaded.save(&path).expect("save");

        let after = HighScores::load(&path);
        assert_eq!(after.get("Bob").map(|e| e.score), Some(80));
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp_now();
        // "YYYY-MM-DD HH:MM:SS"
        assert_eq!(ts.len(), 19);
        assert_eq!(ts.as_bytes()[4], b'-');
        assert_eq!(ts.as_bytes()[7], b'-');
        assert_eq!(ts.as_bytes()[10], b' ');
        assert_eq!(ts.as_bytes()[13], b':');
        assert_eq!(ts.as_bytes()[16], b':');
    }
}
