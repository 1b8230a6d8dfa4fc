use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::scoring::Score;
use crate::sentences::Difficulty;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

mod date_format {
    use super::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(raw.trim(), DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One completed test as stored in the score log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(with = "date_format")]
    pub date: NaiveDateTime,
    pub difficulty: Difficulty,
    pub wpm: u32,
    /// Older logs only carried three columns
    #[serde(default)]
    pub accuracy: Option<u32>,
}

impl ScoreRecord {
    pub fn new(difficulty: Difficulty, score: Score) -> Self {
        Self {
            date: Local::now().naive_local(),
            difficulty,
            wpm: score.wpm,
            accuracy: Some(score.accuracy),
        }
    }
}

/// Best WPM per difficulty, derived from the full score log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScores {
    best: BTreeMap<Difficulty, u32>,
}

impl Default for HighScores {
    fn default() -> Self {
        Self {
            best: Difficulty::ALL.iter().map(|d| (*d, 0)).collect(),
        }
    }
}

impl HighScores {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ScoreRecord>) -> Self {
        let mut scores = Self::default();
        for r in records {
            scores.record(r.difficulty, r.wpm);
        }
        scores
    }

    /// Keep `wpm` if it beats the current best for `difficulty`
    pub fn record(&mut self, difficulty: Difficulty, wpm: u32) {
        let best = self.best.entry(difficulty).or_insert(0);
        if wpm > *best {
            *best = wpm;
        }
    }

    pub fn get(&self, difficulty: Difficulty) -> u32 {
        self.best.get(&difficulty).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Difficulty, u32)> + '_ {
        self.best.iter().map(|(d, wpm)| (*d, *wpm))
    }

    pub fn summary_lines(&self) -> Vec<String> {
        self.iter()
            .map(|(d, wpm)| format!("{}: {} WPM", d, wpm))
            .collect()
    }

    pub fn summary_text(&self) -> String {
        format!("🏆 High Scores:\n{}", self.summary_lines().iter().join("\n"))
    }
}

/// Append-only persistence for completed tests
pub trait ScoreStore {
    fn append(&self, record: &ScoreRecord) -> Result<()>;
    /// Every readable record in the log. Malformed rows are skipped.
    fn records(&self) -> Result<Vec<ScoreRecord>>;

    fn load_high_scores(&self) -> Result<HighScores> {
        Ok(HighScores::from_records(&self.records()?))
    }
}

/// Score log kept as a CSV file with a `date,difficulty,wpm,accuracy` header
#[derive(Debug, Clone)]
pub struct CsvScoreStore {
    path: PathBuf,
}

impl CsvScoreStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::scores_path().unwrap_or_else(|| PathBuf::from("high_scores.csv"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for CsvScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore for CsvScoreStore {
    fn append(&self, record: &ScoreRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }

        // a missing or zero-byte log gets the header row first
        let needs_header = fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer
            .serialize(record)
            .with_context(|| format!("writing score to {}", self.path.display()))?;
        writer.flush()?;

        log::debug!(
            "saved {} WPM ({}) to {}",
            record.wpm,
            record.difficulty,
            self.path.display()
        );
        Ok(())
    }

    fn records(&self) -> Result<Vec<ScoreRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;

        let mut records = Vec::new();
        for row in reader.deserialize::<ScoreRecord>() {
            match row {
                Ok(record) => records.push(record),
                Err(e) if e.is_io_error() => {
                    return Err(e).with_context(|| format!("reading {}", self.path.display()));
                }
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or_default();
                    log::warn!(
                        "skipping malformed score row at {}:{}: {}",
                        self.path.display(),
                        line,
                        e
                    );
                }
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(difficulty: Difficulty, wpm: u32) -> ScoreRecord {
        ScoreRecord::new(difficulty, Score { wpm, accuracy: 100 })
    }

    #[test]
    fn test_default_high_scores_are_zero() {
        let hs = HighScores::default();
        for d in Difficulty::ALL {
            assert_eq!(hs.get(d), 0);
        }
        assert_eq!(hs.iter().count(), 3);
    }

    #[test]
    fn test_high_scores_keep_max() {
        let records = [
            record(Difficulty::Easy, 30),
            record(Difficulty::Easy, 55),
            record(Difficulty::Easy, 41),
            record(Difficulty::Hard, 12),
        ];
        let hs = HighScores::from_records(&records);
        assert_eq!(hs.get(Difficulty::Easy), 55);
        assert_eq!(hs.get(Difficulty::Medium), 0);
        assert_eq!(hs.get(Difficulty::Hard), 12);
    }

    #[test]
    fn test_summary_text() {
        let mut hs = HighScores::default();
        hs.record(Difficulty::Medium, 37);
        assert_eq!(
            hs.summary_text(),
            "🏆 High Scores:\nEasy: 0 WPM\nMedium: 37 WPM\nHard: 0 WPM"
        );
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = CsvScoreStore::with_path(dir.path().join("none.csv"));
        assert!(store.records().unwrap().is_empty());
        assert_eq!(store.load_high_scores().unwrap(), HighScores::default());
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let store = CsvScoreStore::with_path(&path);

        store.append(&record(Difficulty::Easy, 42)).unwrap();
        store.append(&record(Difficulty::Hard, 20)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "date,difficulty,wpm,accuracy");
        assert!(lines[1].ends_with(",Easy,42,100"));
        assert!(lines[2].ends_with(",Hard,20,100"));
    }

    #[test]
    fn test_append_to_empty_file_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        fs::write(&path, "").unwrap();
        let store = CsvScoreStore::with_path(&path);

        assert!(store.records().unwrap().is_empty());
        store.append(&record(Difficulty::Easy, 42)).unwrap();
        store.append(&record(Difficulty::Easy, 50)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("date,difficulty,wpm,accuracy\n"));
        assert_eq!(contents.lines().count(), 3);
        assert_eq!(store.load_high_scores().unwrap().get(Difficulty::Easy), 50);
    }

    #[test]
    fn test_append_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("scores.csv");
        let store = CsvScoreStore::with_path(&path);
        store.append(&record(Difficulty::Medium, 7)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_append_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = CsvScoreStore::with_path(dir.path().join("scores.csv"));
        let saved = ScoreRecord::new(Difficulty::Medium, Score { wpm: 33, accuracy: 80 });
        store.append(&saved).unwrap();

        let loaded = store.records().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].difficulty, Difficulty::Medium);
        assert_eq!(loaded[0].wpm, 33);
        assert_eq!(loaded[0].accuracy, Some(80));
        // second precision survives the text format
        assert_eq!(
            loaded[0].date.format(DATE_FORMAT).to_string(),
            saved.date.format(DATE_FORMAT).to_string()
        );
    }

    #[test]
    fn test_reads_legacy_three_column_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        fs::write(
            &path,
            "date,difficulty,wpm,accuracy\n2024-03-01 10:00:00,Easy,42\n2024-03-02 11:30:00,Hard,18,90\n",
        )
        .unwrap();

        let store = CsvScoreStore::with_path(&path);
        let records = store.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].accuracy, None);
        assert_eq!(records[1].accuracy, Some(90));

        let hs = store.load_high_scores().unwrap();
        assert_eq!(hs.get(Difficulty::Easy), 42);
        assert_eq!(hs.get(Difficulty::Hard), 18);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        fs::write(
            &path,
            "date,difficulty,wpm,accuracy\n\
             2024-03-01 10:00:00,Easy,42,100\n\
             2024-03-01 10:05:00,Impossible,99,100\n\
             2024-03-01 10:06:00,Medium,fast,100\n\
             not a date,Medium,80,100\n\
             2024-03-01 10:07:00\n\
             2024-03-01 10:08:00,Medium,25,60\n",
        )
        .unwrap();

        let store = CsvScoreStore::with_path(&path);
        let hs = store.load_high_scores().unwrap();
        assert_eq!(hs.get(Difficulty::Easy), 42);
        assert_eq!(hs.get(Difficulty::Medium), 25);
        assert_eq!(hs.get(Difficulty::Hard), 0);
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let dir = tempdir().unwrap();
        // a directory where the file should be
        let store = CsvScoreStore::with_path(dir.path());
        assert!(store.append(&record(Difficulty::Easy, 1)).is_err());
    }
}
