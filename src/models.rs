use serde::Serialize;

/// One normalized spreadsheet row. All text fields are trimmed and may be
/// empty; `seconds` is `None` when the record cell was empty or unparseable.
#[derive(Debug, Clone, Serialize)]
pub struct PersonRecord {
    pub name: String,
    pub student_id: String,
    pub nick: String,
    pub record_raw: String,
    pub seconds: Option<f64>,
}

impl PersonRecord {
    pub fn display_name(&self) -> &str {
        if !self.nick.is_empty() {
            &self.nick
        } else if !self.name.is_empty() {
            &self.name
        } else {
            "이름 없음"
        }
    }

    pub fn has_display_name(&self) -> bool {
        !self.nick.is_empty() || !self.name.is_empty()
    }

    /// Deduplication identity: nickname when present, otherwise the
    /// name/student-id pair. Two rows with the same key are re-attempts
    /// by the same person.
    pub fn identity_key(&self) -> String {
        if !self.nick.is_empty() {
            format!("N:{}", self.nick)
        } else {
            format!("S:{}|{}", self.name, self.student_id)
        }
    }
}

/// A fully ranked view of the dataset, rebuilt on every render pass.
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    /// All entries in rank order, entries without a time last.
    pub entries: Vec<PersonRecord>,
    /// Hall of fame: the first (at most) three entries with a time.
    pub top: Vec<PersonRecord>,
}
