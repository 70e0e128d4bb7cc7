use std::fmt::Write;

use anyhow::Context;
use serde::Serialize;

use crate::models::Leaderboard;
use crate::render;
use crate::state::LoadOutcome;

pub fn build_markdown(board: &Leaderboard, outcome: &LoadOutcome) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# 타임어택 리더보드");
    let _ = writeln!(
        output,
        "Generated at {} ({} entries)",
        outcome.fetched_at.format("%Y-%m-%d %H:%M:%S"),
        board.entries.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## 명예의 전당");

    if board.top.is_empty() {
        let _ = writeln!(output, "명예의 전당을 표시할 기록이 없습니다.");
    } else {
        for (idx, record) in board.top.iter().enumerate() {
            let _ = writeln!(
                output,
                "- {}위 {}: {}",
                idx + 1,
                record.display_name(),
                render::record_text(record)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## 전체 순위");

    if board.entries.is_empty() {
        let _ = writeln!(output, "표시할 명단이 없습니다.");
    } else {
        for (idx, record) in board.entries.iter().enumerate() {
            let student_id = if record.student_id.is_empty() {
                String::new()
            } else {
                format!(" ({})", record.student_id)
            };
            let _ = writeln!(
                output,
                "- #{} {}{}: {}",
                idx + 1,
                record.display_name(),
                student_id,
                render::record_text(record)
            );
        }
    }

    output
}

pub fn build_json(board: &Leaderboard, outcome: &LoadOutcome) -> anyhow::Result<String> {
    #[derive(Serialize)]
    struct Export<'a> {
        generated_at: String,
        count: usize,
        #[serde(flatten)]
        board: &'a Leaderboard,
    }

    let export = Export {
        generated_at: outcome.fetched_at.to_rfc3339(),
        count: board.entries.len(),
        board,
    };

    serde_json::to_string_pretty(&export).context("리더보드를 JSON으로 변환하지 못했습니다")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board;
    use crate::collate::KoreanCollation;
    use crate::models::PersonRecord;

    fn outcome_with(records: Vec<PersonRecord>) -> LoadOutcome {
        LoadOutcome {
            records,
            headers: vec![
                "이름".to_string(),
                "학번".to_string(),
                "리더보드에 표시할 닉네임".to_string(),
                "기록".to_string(),
            ],
            missing_fields: Vec::new(),
            fetched_at: chrono::Local::now(),
        }
    }

    fn record(nick: &str, student_id: &str, seconds: Option<f64>) -> PersonRecord {
        PersonRecord {
            name: String::new(),
            student_id: student_id.to_string(),
            nick: nick.to_string(),
            record_raw: String::new(),
            seconds,
        }
    }

    #[test]
    fn markdown_lists_hall_of_fame_and_standings() {
        let records = vec![
            record("가", "20261111", Some(60.0)),
            record("나", "20262222", None),
        ];
        let outcome = outcome_with(records.clone());
        let board = board::build_leaderboard(&records, "", &KoreanCollation);

        let markdown = build_markdown(&board, &outcome);
        assert!(markdown.contains("# 타임어택 리더보드"));
        assert!(markdown.contains("(2 entries)"));
        assert!(markdown.contains("- 1위 가: 1분 0초 00"));
        assert!(markdown.contains("- #2 나 (20262222): 기록 없음"));
    }

    #[test]
    fn json_round_trips_entries_and_top() {
        let records = vec![
            record("가", "20261111", Some(60.0)),
            record("나", "20262222", None),
        ];
        let outcome = outcome_with(records.clone());
        let board = board::build_leaderboard(&records, "", &KoreanCollation);

        let json = build_json(&board, &outcome).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["count"], 2);
        assert_eq!(value["entries"].as_array().unwrap().len(), 2);
        assert_eq!(value["top"].as_array().unwrap().len(), 1);
        assert_eq!(value["entries"][0]["nick"], "가");
        assert_eq!(value["entries"][0]["seconds"], 60.0);
        assert!(value["entries"][1]["seconds"].is_null());
    }
}
