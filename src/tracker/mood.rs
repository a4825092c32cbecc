use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ToolInputError;

const NO_NOTES: &str = "Tidak ada catatan";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Bad,
    Awful,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Self::Great, Self::Good, Self::Okay, Self::Bad, Self::Awful];

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Great => "😄",
            Self::Good => "🙂",
            Self::Okay => "😐",
            Self::Bad => "🙁",
            Self::Awful => "😢",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Great => "great",
            Self::Good => "good",
            Self::Okay => "okay",
            Self::Bad => "bad",
            Self::Awful => "awful",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Mood {
    type Err = ToolInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s.is_empty() {
            return Err(ToolInputError::MissingMood);
        }

        Self::ALL
            .into_iter()
            .find(|mood| mood.name() == s || mood.emoji() == s)
            .ok_or(ToolInputError::UnknownMood(s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub timestamp: NaiveDateTime,
    pub mood: Mood,
    pub notes: String,
}

impl MoodEntry {
    pub fn new(mood: Mood, notes: &str, timestamp: NaiveDateTime) -> Self {
        let notes = match notes.trim() {
            "" => NO_NOTES,
            notes => notes,
        };

        Self {
            timestamp,
            mood,
            notes: notes.to_string(),
        }
    }

    /// Parses `<mood> [notes...]`.
    pub fn parse(args: &str, timestamp: NaiveDateTime) -> Result<Self, ToolInputError> {
        let args = args.trim();
        let (mood, notes) = args.split_once(char::is_whitespace).unwrap_or((args, ""));

        Ok(Self::new(mood.parse()?, notes, timestamp))
    }
}

/// Mood entries, newest first.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoodJournal(Vec<MoodEntry>);

impl MoodJournal {
    pub fn record(&mut self, entry: MoodEntry) {
        self.0.insert(0, entry);
    }

    pub fn entries(&self) -> &[MoodEntry] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::at;

    #[test]
    fn newest_entry_comes_first() {
        let mut journal = MoodJournal::default();
        journal.record(MoodEntry::new(Mood::Bad, "", at(8, 0)));
        journal.record(MoodEntry::new(Mood::Great, "", at(20, 0)));

        let moods: Vec<_> = journal.entries().iter().map(|e| e.mood).collect();
        assert_eq!(moods, vec![Mood::Great, Mood::Bad]);
    }

    #[test]
    fn notes_default_when_blank() {
        let entry = MoodEntry::new(Mood::Okay, "   ", at(8, 0));

        assert_eq!(entry.notes, "Tidak ada catatan");
    }

    #[test]
    fn parses_mood_with_notes() {
        let entry = MoodEntry::parse("Good  slept well today", at(8, 0)).unwrap();

        assert_eq!(entry.mood, Mood::Good);
        assert_eq!(entry.notes, "slept well today");
    }

    #[test]
    fn mood_is_required() {
        assert_eq!(MoodEntry::parse("  ", at(8, 0)), Err(ToolInputError::MissingMood));
        assert_eq!(
            MoodEntry::parse("meh", at(8, 0)),
            Err(ToolInputError::UnknownMood("meh".to_string()))
        );
    }

    #[test]
    fn entry_schema() {
        let entry = MoodEntry::new(Mood::Awful, "headache", at(9, 30));

        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            serde_json::json!({
                "timestamp": "2025-05-31T09:30:00",
                "mood": "awful",
                "notes": "headache"
            })
        );
    }
}
