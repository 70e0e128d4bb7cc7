//! Best-record selection and ranking.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::collate::Collation;
use crate::models::{Leaderboard, PersonRecord};

pub const HALL_OF_FAME_SIZE: usize = 3;

/// Collapse re-attempts to one record per person, keeping the fastest.
///
/// A record with a time always beats one without; between two timed
/// records the strictly smaller time wins; otherwise the first seen stays.
/// Output order follows first appearance in the input.
pub fn best_only(records: &[PersonRecord]) -> Vec<PersonRecord> {
    let mut order: Vec<String> = Vec::new();
    let mut best: HashMap<String, PersonRecord> = HashMap::new();

    for record in records {
        let key = record.identity_key();
        match best.get(&key) {
            None => {
                order.push(key.clone());
                best.insert(key, record.clone());
            }
            Some(kept) => {
                let replace = match (kept.seconds, record.seconds) {
                    (None, Some(_)) => true,
                    (Some(prev), Some(next)) => next < prev,
                    _ => false,
                };
                if replace {
                    best.insert(key, record.clone());
                }
            }
        }
    }

    order.into_iter().filter_map(|key| best.remove(&key)).collect()
}

/// Total rank order: timed entries before untimed, faster first, ties
/// broken by nick, then student id, then name under the collation.
pub fn compare_rank(a: &PersonRecord, b: &PersonRecord, collation: &dyn Collation) -> Ordering {
    match (a.seconds, b.seconds) {
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(x), Some(y)) => {
            if x != y {
                return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            }
        }
        (None, None) => {}
    }

    collation
        .compare(&a.nick, &b.nick)
        .then_with(|| collation.compare(&a.student_id, &b.student_id))
        .then_with(|| collation.compare(&a.name, &b.name))
}

/// Case-insensitive substring filter over nick, name, and student id.
pub fn search_filter(records: Vec<PersonRecord>, query: &str) -> Vec<PersonRecord> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return records;
    }

    records
        .into_iter()
        .filter(|record| {
            record.nick.to_lowercase().contains(&query)
                || record.name.to_lowercase().contains(&query)
                || record.student_id.to_lowercase().contains(&query)
        })
        .collect()
}

/// Dedup, filter, and rank the normalized rows into a display view.
pub fn build_leaderboard(
    records: &[PersonRecord],
    query: &str,
    collation: &dyn Collation,
) -> Leaderboard {
    let mut entries = search_filter(best_only(records), query);
    entries.sort_by(|a, b| compare_rank(a, b, collation));

    let top: Vec<PersonRecord> = entries
        .iter()
        .filter(|record| record.seconds.is_some())
        .take(HALL_OF_FAME_SIZE)
        .cloned()
        .collect();

    Leaderboard { entries, top }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collate::KoreanCollation;

    fn entry(nick: &str, record_raw: &str, seconds: Option<f64>) -> PersonRecord {
        PersonRecord {
            name: String::new(),
            student_id: String::new(),
            nick: nick.to_string(),
            record_raw: record_raw.to_string(),
            seconds,
        }
    }

    fn named(name: &str, student_id: &str, seconds: Option<f64>) -> PersonRecord {
        PersonRecord {
            name: name.to_string(),
            student_id: student_id.to_string(),
            nick: String::new(),
            record_raw: String::new(),
            seconds,
        }
    }

    #[test]
    fn keeps_fastest_record_per_person() {
        let rows = vec![
            entry("A", "1분 0초 00", Some(60.0)),
            entry("A", "0분 59초 50", Some(59.5)),
            entry("A", "1분 10초 00", Some(70.0)),
        ];

        let best = best_only(&rows);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].seconds, Some(59.5));
        assert_eq!(best[0].record_raw, "0분 59초 50");
    }

    #[test]
    fn timed_record_beats_untimed() {
        let rows = vec![entry("A", "", None), entry("A", "1분 0초 00", Some(60.0))];
        let best = best_only(&rows);
        assert_eq!(best[0].seconds, Some(60.0));

        // And an existing time is never given up for a blank re-attempt.
        let rows = vec![entry("A", "1분 0초 00", Some(60.0)), entry("A", "", None)];
        let best = best_only(&rows);
        assert_eq!(best[0].seconds, Some(60.0));
    }

    #[test]
    fn first_seen_wins_when_neither_has_a_time() {
        let rows = vec![entry("A", "first", None), entry("A", "second", None)];
        let best = best_only(&rows);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].record_raw, "first");
    }

    #[test]
    fn nick_and_name_identities_stay_separate() {
        let rows = vec![
            entry("A", "1분 0초 00", Some(60.0)),
            named("홍길동", "20261234", Some(55.0)),
            named("홍길동", "20265678", Some(50.0)),
        ];

        let best = best_only(&rows);
        assert_eq!(best.len(), 3);
    }

    #[test]
    fn dedup_is_idempotent() {
        let rows = vec![
            entry("A", "1분 0초 00", Some(60.0)),
            entry("A", "0분 59초 50", Some(59.5)),
            entry("B", "", None),
        ];

        let once = best_only(&rows);
        let twice = best_only(&once);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.identity_key(), b.identity_key());
            assert_eq!(a.seconds, b.seconds);
        }
    }

    #[test]
    fn timed_entries_rank_before_untimed() {
        let collation = KoreanCollation;
        let a = entry("가", "", Some(60.0));
        let b = entry("나", "", None);
        assert_eq!(compare_rank(&a, &b, &collation), Ordering::Less);
        assert_eq!(compare_rank(&b, &a, &collation), Ordering::Greater);
    }

    #[test]
    fn ties_break_by_nick_then_student_id_then_name() {
        let collation = KoreanCollation;

        let a = entry("가", "", Some(60.0));
        let b = entry("나", "", Some(60.0));
        assert_eq!(compare_rank(&a, &b, &collation), Ordering::Less);

        let a = named("홍길동", "20261111", Some(60.0));
        let b = named("홍길동", "20262222", Some(60.0));
        assert_eq!(compare_rank(&a, &b, &collation), Ordering::Less);

        let a = named("김철수", "20261111", Some(60.0));
        let b = named("홍길동", "20261111", Some(60.0));
        assert_eq!(compare_rank(&a, &b, &collation), Ordering::Less);
    }

    #[test]
    fn scenario_best_then_rank_then_top3() {
        let rows = vec![
            entry("A", "1분 0초 00", Some(60.0)),
            entry("A", "0분 59초 50", Some(59.5)),
            entry("B", "", None),
        ];

        let board = build_leaderboard(&rows, "", &KoreanCollation);

        assert_eq!(board.entries.len(), 2);
        assert_eq!(board.entries[0].nick, "A");
        assert_eq!(board.entries[0].seconds, Some(59.5));
        assert_eq!(board.entries[1].nick, "B");

        assert_eq!(board.top.len(), 1);
        assert_eq!(board.top[0].nick, "A");
    }

    #[test]
    fn untimed_entries_never_reach_hall_of_fame() {
        let rows = vec![
            entry("가", "", None),
            entry("나", "", None),
            entry("다", "", None),
            entry("라", "1분 0초 00", Some(60.0)),
        ];

        let board = build_leaderboard(&rows, "", &KoreanCollation);
        assert_eq!(board.top.len(), 1);
        assert_eq!(board.top[0].nick, "라");
    }

    #[test]
    fn hall_of_fame_takes_first_three_in_rank_order() {
        let rows = vec![
            entry("가", "", Some(63.0)),
            entry("나", "", Some(61.0)),
            entry("다", "", Some(62.0)),
            entry("라", "", Some(60.0)),
        ];

        let board = build_leaderboard(&rows, "", &KoreanCollation);
        let top: Vec<&str> = board.top.iter().map(|r| r.nick.as_str()).collect();
        assert_eq!(top, vec!["라", "나", "다"]);
    }

    #[test]
    fn search_matches_any_identity_field_case_insensitively() {
        let rows = vec![
            entry("Speedy", "", Some(60.0)),
            named("홍길동", "20261234", Some(61.0)),
            named("김철수", "20265678", Some(62.0)),
        ];

        let board = build_leaderboard(&rows, "speed", &KoreanCollation);
        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.entries[0].nick, "Speedy");

        let board = build_leaderboard(&rows, "20265678", &KoreanCollation);
        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.entries[0].name, "김철수");

        let board = build_leaderboard(&rows, "", &KoreanCollation);
        assert_eq!(board.entries.len(), 3);
    }

    #[test]
    fn rank_order_is_total_and_transitive() {
        let collation = KoreanCollation;
        let records = vec![
            entry("가", "", Some(60.0)),
            entry("나", "", Some(60.0)),
            entry("다", "", None),
            named("홍길동", "20261234", None),
            entry("라", "", Some(59.0)),
        ];

        for a in &records {
            for b in &records {
                let ab = compare_rank(a, b, &collation);
                let ba = compare_rank(b, a, &collation);
                assert_eq!(ab, ba.reverse());
            }
        }

        let mut sorted = records.clone();
        sorted.sort_by(|a, b| compare_rank(a, b, &collation));
        for pair in sorted.windows(2) {
            assert_ne!(
                compare_rank(&pair[0], &pair[1], &collation),
                Ordering::Greater
            );
        }
    }
}
