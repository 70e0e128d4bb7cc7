//! Header resolution for the published sheet.
//!
//! Sheet owners write headers like "이름 (ex. 홍길동)", so each logical
//! field is located by prefix match against whitespace-collapsed headers
//! rather than by exact title.

/// The four roles the sheet must provide, identified by header prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalField {
    Name,
    StudentId,
    Nick,
    Record,
}

impl LogicalField {
    pub const ALL: [LogicalField; 4] = [
        LogicalField::Name,
        LogicalField::StudentId,
        LogicalField::Nick,
        LogicalField::Record,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            LogicalField::Name => "이름",
            LogicalField::StudentId => "학번",
            LogicalField::Nick => "리더보드에 표시할 닉네임",
            LogicalField::Record => "기록",
        }
    }
}

/// Strip a leading byte-order marker and surrounding whitespace.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

/// Collapse all whitespace for prefix comparison, so
/// "이름 (ex. 홍길동)" still starts with "이름".
fn simplify(raw: &str) -> String {
    normalize_header(raw).split_whitespace().collect()
}

/// Resolution of logical fields against the sheet's actual header row.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    /// Normalized headers in original column order, kept for diagnostics.
    pub headers: Vec<String>,
    name: Option<usize>,
    student_id: Option<usize>,
    nick: Option<usize>,
    record: Option<usize>,
}

impl HeaderMap {
    /// Match each logical field to the first column whose simplified
    /// header starts with the field's prefix.
    pub fn build<'a>(raw_headers: impl IntoIterator<Item = &'a str>) -> Self {
        let headers: Vec<String> = raw_headers.into_iter().map(normalize_header).collect();

        let find = |field: LogicalField| {
            let prefix = simplify(field.prefix());
            headers
                .iter()
                .position(|header| simplify(header).starts_with(&prefix))
        };

        let name = find(LogicalField::Name);
        let student_id = find(LogicalField::StudentId);
        let nick = find(LogicalField::Nick);
        let record = find(LogicalField::Record);

        HeaderMap {
            headers,
            name,
            student_id,
            nick,
            record,
        }
    }

    pub fn index(&self, field: LogicalField) -> Option<usize> {
        match field {
            LogicalField::Name => self.name,
            LogicalField::StudentId => self.student_id,
            LogicalField::Nick => self.nick,
            LogicalField::Record => self.record,
        }
    }

    /// Matched header text for a field, if any.
    pub fn header(&self, field: LogicalField) -> Option<&str> {
        self.index(field).map(|idx| self.headers[idx].as_str())
    }

    /// Prefixes of the logical fields that no column matched.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        LogicalField::ALL
            .iter()
            .filter(|field| self.index(**field).is_none())
            .map(|field| field.prefix())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        LogicalField::ALL
            .iter()
            .all(|field| self.index(*field).is_some())
    }
}
