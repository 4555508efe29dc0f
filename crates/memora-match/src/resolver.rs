//! Candidate ranking and disambiguation gating.

use chrono::NaiveDate;

use memora_core::CalendarEvent;

use crate::similarity::similarity;

/// Minimum combined score required to auto-select a match instead of
/// listing alternatives for the user to choose from.
pub const CONFIRM_THRESHOLD: f64 = 0.3;

const NAME_WEIGHT: f64 = 0.7;
const DESCRIPTION_WEIGHT: f64 = 0.3;

/// A candidate event with its computed similarity scores.
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    pub event: CalendarEvent,
    pub name_score: f64,
    pub description_score: f64,
    pub total_score: f64,
}

/// Outcome of a resolution attempt.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// The top match cleared the threshold; callers act on it directly.
    Confirmed(ScoredMatch),
    /// No candidate cleared the threshold. The considered candidates are
    /// returned so the caller can present them for an explicit choice.
    NoGoodMatch { candidates: Vec<CalendarEvent> },
}

impl MatchOutcome {
    /// The confirmed match, if any.
    pub fn confirmed(&self) -> Option<&ScoredMatch> {
        match self {
            MatchOutcome::Confirmed(m) => Some(m),
            MatchOutcome::NoGoodMatch { .. } => None,
        }
    }
}

/// Score a single candidate against a query.
fn score_event(query: &str, event: &CalendarEvent) -> ScoredMatch {
    let name_score = similarity(query, &event.name);
    let description_score = similarity(query, &event.description);
    ScoredMatch {
        event: event.clone(),
        name_score,
        description_score,
        total_score: NAME_WEIGHT * name_score + DESCRIPTION_WEIGHT * description_score,
    }
}

/// Rank candidates by combined score, best first.
///
/// When `date_filter` is given, only candidates on exactly that date are
/// considered.
pub fn rank(
    query: &str,
    candidates: &[CalendarEvent],
    date_filter: Option<NaiveDate>,
) -> Vec<ScoredMatch> {
    let mut scored: Vec<ScoredMatch> = candidates
        .iter()
        .filter(|e| date_filter.map_or(true, |d| e.date == d))
        .map(|e| score_event(query, e))
        .collect();
    scored.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    scored
}

/// Find the best-scoring candidate, gated by [`CONFIRM_THRESHOLD`].
pub fn find_best(
    query: &str,
    candidates: &[CalendarEvent],
    date_filter: Option<NaiveDate>,
) -> MatchOutcome {
    find_best_with_threshold(query, candidates, date_filter, CONFIRM_THRESHOLD)
}

/// [`find_best`] with a caller-supplied threshold.
pub fn find_best_with_threshold(
    query: &str,
    candidates: &[CalendarEvent],
    date_filter: Option<NaiveDate>,
    threshold: f64,
) -> MatchOutcome {
    let ranked = rank(query, candidates, date_filter);
    match ranked.into_iter().next() {
        Some(best) if best.total_score >= threshold => MatchOutcome::Confirmed(best),
        _ => MatchOutcome::NoGoodMatch {
            candidates: candidates
                .iter()
                .filter(|e| date_filter.map_or(true, |d| e.date == d))
                .cloned()
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str, description: &str, date: NaiveDate) -> CalendarEvent {
        CalendarEvent::new("user-1", name, description, date)
    }

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    // ---- Ranking ----

    #[test]
    fn test_rank_orders_best_first() {
        let candidates = vec![
            event("Grocery Shopping", "weekly shop", june(12)),
            event("Doctor Appointment", "annual checkup", june(12)),
        ];
        let ranked = rank("doctor appt", &candidates, None);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].event.name, "Doctor Appointment");
        assert!(ranked[0].total_score > ranked[1].total_score);
    }

    #[test]
    fn test_rank_empty_candidates() {
        assert!(rank("anything", &[], None).is_empty());
    }

    #[test]
    fn test_combined_weighting() {
        let ev = event("Checkup", "doctor appointment downtown", june(12));
        let ranked = rank("doctor appointment", &[ev], None);
        let m = &ranked[0];
        let expected = 0.7 * m.name_score + 0.3 * m.description_score;
        assert!((m.total_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_description_match_contributes() {
        let candidates = vec![
            event("Morning slot", "doctor appointment with Dr. Okafor", june(12)),
            event("Morning slot", "walk in the park", june(12)),
        ];
        let ranked = rank("doctor appointment", &candidates, None);
        assert_eq!(
            ranked[0].event.description,
            "doctor appointment with Dr. Okafor"
        );
    }

    // ---- Date filtering ----

    #[test]
    fn test_date_filter_excludes_other_days() {
        let candidates = vec![
            event("Doctor Appointment", "", june(12)),
            event("Doctor Appointment", "", june(14)),
        ];
        let ranked = rank("doctor", &candidates, Some(june(14)));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].event.date, june(14));
    }

    #[test]
    fn test_date_filter_no_matching_day() {
        let candidates = vec![event("Doctor Appointment", "", june(12))];
        let outcome = find_best("doctor", &candidates, Some(june(20)));
        match outcome {
            MatchOutcome::NoGoodMatch { candidates } => assert!(candidates.is_empty()),
            MatchOutcome::Confirmed(_) => panic!("expected no match"),
        }
    }

    // ---- Threshold gating ----

    #[test]
    fn test_confirmed_above_threshold() {
        let candidates = vec![event("Doctor Appointment", "annual checkup", june(12))];
        let outcome = find_best("doctor appt", &candidates, None);
        let m = outcome.confirmed().expect("should confirm");
        assert_eq!(m.event.name, "Doctor Appointment");
        assert!(m.total_score >= CONFIRM_THRESHOLD);
    }

    #[test]
    fn test_no_good_match_returns_full_candidate_list() {
        let candidates = vec![
            event("Grocery Shopping", "", june(12)),
            event("Book Club", "", june(13)),
        ];
        let outcome = find_best("zzzz qqqq", &candidates, None);
        match outcome {
            MatchOutcome::NoGoodMatch { candidates } => {
                // Never a silently-wrong top pick: all considered candidates
                // come back for the user to choose from.
                assert_eq!(candidates.len(), 2);
            }
            MatchOutcome::Confirmed(m) => {
                panic!("should not confirm {} at {}", m.event.name, m.total_score)
            }
        }
    }

    #[test]
    fn test_empty_candidates_is_no_match() {
        let outcome = find_best("doctor", &[], None);
        assert!(outcome.confirmed().is_none());
    }

    #[test]
    fn test_custom_threshold() {
        let candidates = vec![event("Doctor Appointment", "annual checkup", june(12))];
        // An impossible threshold forces disambiguation even for good matches.
        let outcome = find_best_with_threshold("doctor appt", &candidates, None, 1.1);
        assert!(outcome.confirmed().is_none());
    }

    #[test]
    fn test_exact_name_wins_over_fuzzy() {
        let candidates = vec![
            event("Lunch with Rosa", "", june(12)),
            event("Lunch", "", june(12)),
        ];
        let outcome = find_best("lunch", &candidates, None);
        let m = outcome.confirmed().expect("should confirm");
        assert_eq!(m.event.name, "Lunch");
        assert_eq!(m.name_score, 1.0);
    }
}
