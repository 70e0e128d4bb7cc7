//! Terminal presentation: status line, hall of fame, ranked list, and the
//! diagnostics box. Everything is built as plain strings so the watch
//! loop can redraw the whole frame at once.

use std::fmt::Write;

use colored::Colorize;

use crate::board;
use crate::collate::Collation;
use crate::models::{Leaderboard, PersonRecord};
use crate::state::{BoardSlot, LoadStatus};
use crate::times;

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];
const TITLES: [&str; 3] = ["1위", "2위", "3위"];

pub fn record_text(record: &PersonRecord) -> String {
    match record.seconds {
        Some(seconds) => times::format_seconds(seconds),
        None => "기록 없음".to_string(),
    }
}

pub fn status_line(slot: &BoardSlot) -> String {
    let status = match slot.status() {
        None | Some(LoadStatus::Loading) => "불러오는 중입니다.".yellow(),
        Some(LoadStatus::Updated) => "업데이트되었습니다.".green(),
        Some(LoadStatus::Failed) => "불러오지 못했습니다.".red(),
    };

    match slot.dataset() {
        Some(data) => format!(
            "{status} (마지막 업데이트: {})",
            data.fetched_at.format("%Y-%m-%d %H:%M:%S")
        ),
        None => status.to_string(),
    }
}

/// The missing-header report, or `None` when every field resolved.
pub fn header_diagnostic(missing: &[&str], headers: &[String]) -> Option<String> {
    if missing.is_empty() {
        return None;
    }
    Some(format!(
        "헤더를 찾지 못했습니다.\n필요: {}\n\n실제 CSV 헤더:\n- {}",
        missing.join(", "),
        headers.join("\n- ")
    ))
}

/// The fetch-failure report with operator guidance.
pub fn failure_diagnostic(message: &str) -> String {
    format!(
        "오류가 발생했습니다.\n메시지: {message}\n\n팁:\n\
         - 스프레드시트가 '웹에 게시'로 공개되어 있는지 확인해주세요.\n\
         - CSV 내보내기 URL(output=csv)이 맞는지 확인해주세요."
    )
}

pub fn render_board(board: &Leaderboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}명", board.entries.len());

    if board.entries.is_empty() {
        let _ = writeln!(out, "표시할 명단이 없습니다.");
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "🔥 명예의 전당".bold());
    if board.top.is_empty() {
        let _ = writeln!(out, "명예의 전당을 표시할 기록이 없습니다.");
    } else {
        for (idx, record) in board.top.iter().enumerate() {
            let Some(seconds) = record.seconds else {
                continue;
            };
            let medal = MEDALS.get(idx).copied().unwrap_or("⭐");
            let title = TITLES.get(idx).copied().unwrap_or("TOP");
            let _ = writeln!(
                out,
                "{medal} {title}  {}  {}",
                record.display_name().bold(),
                times::format_seconds(seconds)
            );
        }
    }

    let _ = writeln!(out);
    for (idx, record) in board.entries.iter().enumerate() {
        let time = if record.seconds.is_some() {
            record_text(record).normal()
        } else {
            record_text(record).dimmed()
        };
        let _ = writeln!(
            out,
            "{:>4} {}  {}  {}",
            format!("#{}", idx + 1),
            record.display_name(),
            record.student_id.as_str().dimmed(),
            time
        );
    }

    out
}

/// One full frame: title, status, diagnostics, leaderboard.
pub fn render_frame(slot: &BoardSlot, query: &str, collation: &dyn Collation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "타임어택 리더보드".bold());
    let _ = writeln!(out, "{}", status_line(slot));

    if let Some(error) = slot.error() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", failure_diagnostic(error).red());
    }

    if let Some(data) = slot.dataset() {
        if let Some(diagnostic) = header_diagnostic(&data.missing_fields, &data.headers) {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", diagnostic.yellow());
        }

        let board = board::build_leaderboard(&data.records, query, collation);
        let _ = writeln!(out);
        if !query.trim().is_empty() {
            let _ = writeln!(out, "검색: {}", query.trim());
        }
        let _ = write!(out, "{}", render_board(&board));
    }

    out
}
