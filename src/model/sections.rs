//! Section Timeline Operations
//!
//! A section list is kept gapless: sorted by start, first start at zero,
//! each end equal to the next start, and every duration at least
//! [`MIN_SECTION_SEC`]. Every operation rebuilds the whole list and
//! finishes with [`enforce_gapless`], so callers replace their list
//! wholesale. Inputs are never mutated. Edits that would end the timeline
//! past [`MAX_TIME_SEC`] are skipped.

use crate::model::outcome::{EditOutcome, SkipReason};
use crate::model::types::Section;
use crate::model::values::{compare_time, FLOAT_TOLERANCE, MAX_TIME_SEC, MIN_SECTION_SEC};

/// Correction made to one section while laying out the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LayoutAdjustment {
    /// Duration was below the minimum and was raised to it.
    MinimumDuration { index: usize },

    /// Start or end moved to close a gap or overlap.
    Repositioned { index: usize },
}

/// Editable, non-positional fields of a section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionDetails {
    pub name: Option<String>,
    pub color_id: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Lay sections end to end from zero, keeping their order and durations.
///
/// Durations under [`MIN_SECTION_SEC`] are raised to it. When a section
/// already starts where it should and needs no flooring, its stored end is
/// kept as-is, so running the pass twice gives bit-identical output.
pub(crate) fn lay_out(sections: Vec<Section>) -> (Vec<Section>, Vec<LayoutAdjustment>) {
    let mut adjustments = Vec::new();
    let mut laid_out = Vec::with_capacity(sections.len());
    let mut cursor = 0.0;

    for (index, mut section) in sections.into_iter().enumerate() {
        let raw = section.end_sec - section.start_sec;
        let floored = !(raw >= MIN_SECTION_SEC - FLOAT_TOLERANCE);
        let duration = if floored { MIN_SECTION_SEC } else { raw };

        let start_sec = cursor;
        let end_sec = if !floored && section.start_sec == start_sec {
            section.end_sec
        } else {
            start_sec + duration
        };

        if floored {
            adjustments.push(LayoutAdjustment::MinimumDuration { index });
        }
        if section.start_sec != start_sec || section.end_sec != end_sec {
            adjustments.push(LayoutAdjustment::Repositioned { index });
        }

        section.start_sec = start_sec;
        section.end_sec = end_sec;
        cursor = end_sec;
        laid_out.push(section);
    }

    (laid_out, adjustments)
}

/// Re-derive absolute positions from durations, left to right from zero.
///
/// Idempotent: `enforce_gapless(enforce_gapless(s)) == enforce_gapless(s)`.
pub fn enforce_gapless(sections: Vec<Section>) -> Vec<Section> {
    lay_out(sections).0
}

/// Whether `sections` already satisfies the timeline invariants.
pub fn is_gapless(sections: &[Section]) -> bool {
    let Some(first) = sections.first() else {
        return true;
    };
    if first.start_sec != 0.0 {
        return false;
    }
    let durations_ok = sections
        .iter()
        .all(|s| s.duration() >= MIN_SECTION_SEC - FLOAT_TOLERANCE);
    let joined = sections.windows(2).all(|pair| pair[0].end_sec == pair[1].start_sec);
    durations_ok && joined
}

/// Section covering `sec`, if any.
pub fn section_at(sections: &[Section], sec: f64) -> Option<&Section> {
    sections.iter().find(|s| s.contains(sec))
}

/// Applied when the laid-out timeline still ends within range.
fn within_time_limit(sections: Vec<Section>) -> EditOutcome<Vec<Section>> {
    let end = sections.last().map_or(0.0, |s| s.end_sec);
    match SkipReason::check_time(end) {
        Some(reason) => EditOutcome::skip(reason),
        None => EditOutcome::Applied(sections),
    }
}

/// Sort key used by repair: start, then end, then id.
pub(crate) fn compare_sections(a: &Section, b: &Section) -> std::cmp::Ordering {
    compare_time(a.start_sec, b.start_sec)
        .then_with(|| compare_time(a.end_sec, b.end_sec))
        .then_with(|| a.id.cmp(&b.id))
}

/// Move the end of `target_id` to `new_end_sec`, shifting every later
/// section by the same delta.
///
/// The new end is clamped so the target keeps at least
/// [`MIN_SECTION_SEC`].
pub fn ripple_resize(
    sections: &[Section],
    target_id: &str,
    new_end_sec: f64,
) -> EditOutcome<Vec<Section>> {
    if let Some(reason) = SkipReason::check_time(new_end_sec) {
        return EditOutcome::skip(reason);
    }
    let Some(index) = sections.iter().position(|s| s.id == target_id) else {
        return EditOutcome::skip(SkipReason::UnknownSection {
            id: target_id.to_string(),
        });
    };

    let mut next = sections.to_vec();
    let clamped_end = new_end_sec.max(next[index].start_sec + MIN_SECTION_SEC);
    let delta = clamped_end - next[index].end_sec;
    next[index].end_sec = clamped_end;

    for section in next.iter_mut().skip(index + 1) {
        section.start_sec += delta;
        section.end_sec += delta;
    }
    if let Some(following) = next.get_mut(index + 1) {
        following.start_sec = clamped_end;
    }

    within_time_limit(enforce_gapless(next))
}

/// Insert a new section right after `boundary_index`.
///
/// The new section needs `max(duration_sec, MIN_SECTION_SEC)`. That time is
/// taken from the sections after the insertion point, left to right, each
/// giving up everything above the minimum. Any shortfall lengthens the last
/// section, or the new section itself when it is inserted at the very end.
pub fn insert_section_at_boundary(
    sections: &[Section],
    boundary_index: usize,
    duration_sec: f64,
    id: &str,
    name: &str,
    color_id: &str,
) -> EditOutcome<Vec<Section>> {
    if boundary_index >= sections.len() {
        return EditOutcome::skip(SkipReason::BoundaryOutOfRange {
            index: boundary_index,
            len: sections.len(),
        });
    }
    if let Some(reason) = SkipReason::check_time(duration_sec) {
        return EditOutcome::skip(reason);
    }

    let mut insert_duration = duration_sec.max(MIN_SECTION_SEC);
    let mut durations: Vec<f64> = sections.iter().map(Section::duration).collect();

    let mut remaining = insert_duration;
    for duration in durations.iter_mut().skip(boundary_index + 1) {
        if remaining <= 0.0 {
            break;
        }
        let available = (*duration - MIN_SECTION_SEC).max(0.0);
        let steal = available.min(remaining);
        *duration -= steal;
        remaining -= steal;
    }
    if remaining > 0.0 {
        match durations
            .get_mut(boundary_index + 1..)
            .and_then(|trailing| trailing.last_mut())
        {
            Some(last) => *last += remaining,
            None => insert_duration += remaining,
        }
    }

    let mut inserted = Section::new(id, name, color_id, 0.0, 0.0);
    inserted.end_sec = insert_duration;
    durations.insert(boundary_index + 1, insert_duration);

    let mut reordered = sections.to_vec();
    reordered.insert(boundary_index + 1, inserted);
    for (section, duration) in reordered.iter_mut().zip(&durations) {
        section.start_sec = 0.0;
        section.end_sec = *duration;
    }

    within_time_limit(enforce_gapless(reordered))
}

/// Replace the name, colour, notes or tags of one section.
pub fn update_section_details(
    sections: &[Section],
    id: &str,
    details: SectionDetails,
) -> EditOutcome<Vec<Section>> {
    let Some(index) = sections.iter().position(|s| s.id == id) else {
        return EditOutcome::skip(SkipReason::UnknownSection { id: id.to_string() });
    };

    let mut next = sections.to_vec();
    let target = &mut next[index];
    if let Some(name) = details.name {
        target.name = name;
    }
    if let Some(color_id) = details.color_id {
        target.color_id = color_id;
    }
    if let Some(notes) = details.notes {
        target.notes = notes;
    }
    if let Some(tags) = details.tags {
        target.tags = tags;
    }

    EditOutcome::Applied(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn make_sections() -> Vec<Section> {
        vec![
            Section::new("s1", "A", "slate_01", 0.0, 8.0),
            Section::new("s2", "B", "navy_01", 8.0, 16.0),
            Section::new("s3", "C", "maroon_01", 16.0, 24.0),
        ]
    }

    fn bounds(sections: &[Section]) -> Vec<(f64, f64)> {
        sections.iter().map(|s| (s.start_sec, s.end_sec)).collect()
    }

    #[test]
    fn test_ripple_resize_shifts_later_sections() {
        let next = ripple_resize(&make_sections(), "s1", 6.0).applied().unwrap();
        assert_eq!(bounds(&next), vec![(0.0, 6.0), (6.0, 14.0), (14.0, 22.0)]);
        assert!(is_gapless(&next));
    }

    #[test]
    fn test_ripple_resize_enforces_minimum_duration() {
        let next = ripple_resize(&make_sections(), "s1", 0.01).applied().unwrap();
        assert_abs_diff_eq!(next[0].end_sec, MIN_SECTION_SEC, epsilon = 1e-12);
        assert_eq!(next[1].start_sec, next[0].end_sec);
        assert!(is_gapless(&next));
    }

    #[test]
    fn test_ripple_resize_growing_middle_section() {
        let next = ripple_resize(&make_sections(), "s2", 20.0).applied().unwrap();
        assert_eq!(bounds(&next), vec![(0.0, 8.0), (8.0, 20.0), (20.0, 28.0)]);
    }

    #[test]
    fn test_ripple_resize_unknown_id_is_skipped() {
        let sections = make_sections();
        let outcome = ripple_resize(&sections, "missing", 3.0);
        assert_eq!(
            outcome.skip_reason(),
            Some(&SkipReason::UnknownSection {
                id: "missing".to_string()
            })
        );
        assert_eq!(outcome.unwrap_or(sections.clone()), sections);
    }

    #[test]
    fn test_ripple_resize_rejects_non_finite_end() {
        let outcome = ripple_resize(&make_sections(), "s1", f64::NAN);
        assert!(matches!(
            outcome.skip_reason(),
            Some(SkipReason::NonFiniteTime { .. })
        ));
    }

    #[test]
    fn test_ripple_resize_does_not_mutate_input() {
        let sections = make_sections();
        let before = sections.clone();
        let _ = ripple_resize(&sections, "s2", 2.0);
        assert_eq!(sections, before);
    }

    #[test_case("s1", 0.0; "first collapsed")]
    #[test_case("s2", 9.5; "middle shrunk")]
    #[test_case("s3", 100.0; "last grown")]
    #[test_case("s2", -40.0; "negative end")]
    fn test_ripple_resize_keeps_invariants(target: &str, new_end: f64) {
        let next = ripple_resize(&make_sections(), target, new_end).applied().unwrap();
        assert_eq!(next.len(), 3);
        assert!(is_gapless(&next));
    }

    #[test]
    fn test_ripple_resize_past_time_limit_is_skipped() {
        let outcome = ripple_resize(&make_sections(), "s2", 1e17);
        assert_eq!(
            outcome.skip_reason(),
            Some(&SkipReason::TimeOutOfRange {
                value: 1e17,
                max: MAX_TIME_SEC
            })
        );

        // The later sections would be pushed beyond the limit
        let outcome = ripple_resize(&make_sections(), "s1", MAX_TIME_SEC);
        assert!(matches!(
            outcome.skip_reason(),
            Some(SkipReason::TimeOutOfRange { .. })
        ));
    }

    #[test]
    fn test_ripple_resize_up_to_time_limit() {
        let next = ripple_resize(&make_sections(), "s3", MAX_TIME_SEC)
            .applied()
            .unwrap();
        assert_eq!(next[2].end_sec, MAX_TIME_SEC);
        assert!(is_gapless(&next));
    }

    #[test]
    fn test_oversized_timeline_cannot_be_edited() {
        let huge = vec![
            Section::new("s1", "A", "c", 0.0, 1e17),
            Section::new("s2", "B", "c", 1e17, 2e17),
            Section::new("s3", "C", "c", 2e17, 3e17),
        ];
        let outcome = ripple_resize(&huge, "s2", 5.0);
        assert!(matches!(
            outcome.skip_reason(),
            Some(SkipReason::TimeOutOfRange { .. })
        ));
    }

    #[test]
    fn test_insert_past_time_limit_is_skipped() {
        let outcome = insert_section_at_boundary(&make_sections(), 2, MAX_TIME_SEC, "n", "N", "c");
        assert!(matches!(
            outcome.skip_reason(),
            Some(SkipReason::TimeOutOfRange { .. })
        ));

        let outcome = insert_section_at_boundary(&make_sections(), 0, 1.7e308, "n", "N", "c");
        assert!(matches!(
            outcome.skip_reason(),
            Some(SkipReason::TimeOutOfRange { .. })
        ));
    }

    #[test]
    fn test_insert_steals_from_the_right() {
        let next = insert_section_at_boundary(&make_sections(), 0, 4.0, "new", "New", "c")
            .applied()
            .unwrap();
        assert_eq!(next.len(), 4);
        assert_eq!(next[1].id, "new");
        assert_eq!((next[1].start_sec, next[1].end_sec), (8.0, 12.0));
        assert_eq!(
            bounds(&next),
            vec![(0.0, 8.0), (8.0, 12.0), (12.0, 16.0), (16.0, 24.0)]
        );
        assert!(is_gapless(&next));
    }

    #[test]
    fn test_insert_steals_across_several_sections() {
        let next = insert_section_at_boundary(&make_sections(), 0, 10.0, "new", "New", "c")
            .applied()
            .unwrap();
        // s2 gives 7.9, s3 gives the remaining 2.1
        assert_abs_diff_eq!(next[1].duration(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(next[2].duration(), MIN_SECTION_SEC, epsilon = 1e-9);
        assert_abs_diff_eq!(next[3].duration(), 5.9, epsilon = 1e-9);
        assert_abs_diff_eq!(next[3].end_sec, 24.0, epsilon = 1e-9);
        assert!(is_gapless(&next));
    }

    #[test]
    fn test_insert_extends_tail_when_short_of_time() {
        let base = vec![
            Section::new("s1", "A", "slate_01", 0.0, 2.0),
            Section::new("s2", "B", "navy_01", 2.0, 2.0 + MIN_SECTION_SEC),
        ];
        let next = insert_section_at_boundary(&base, 0, 5.0, "new", "New", "forest_01")
            .applied()
            .unwrap();
        assert!(next.last().unwrap().end_sec > base.last().unwrap().end_sec);
        assert_abs_diff_eq!(next[1].duration(), 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(next[2].duration(), 5.0 + MIN_SECTION_SEC, epsilon = 1e-9);
        assert!(is_gapless(&next));
    }

    #[test]
    fn test_insert_at_end_extends_new_section() {
        let sections = make_sections();
        let next = insert_section_at_boundary(&sections, 2, 4.0, "new", "New", "c")
            .applied()
            .unwrap();
        assert_eq!(next.len(), 4);
        assert_eq!(next[3].id, "new");
        assert_eq!(next[3].start_sec, 24.0);
        // Nothing to steal from, so the whole shortfall lands on the new section
        assert_eq!(next[3].end_sec, 32.0);
        assert!(is_gapless(&next));
    }

    #[test]
    fn test_insert_uses_minimum_duration() {
        let next = insert_section_at_boundary(&make_sections(), 1, 0.0, "new", "New", "c")
            .applied()
            .unwrap();
        assert_abs_diff_eq!(next[2].duration(), MIN_SECTION_SEC, epsilon = 1e-12);
        assert!(is_gapless(&next));
    }

    #[test]
    fn test_insert_out_of_range_is_skipped() {
        let sections = make_sections();
        let outcome = insert_section_at_boundary(&sections, 3, 4.0, "new", "New", "c");
        assert_eq!(
            outcome.skip_reason(),
            Some(&SkipReason::BoundaryOutOfRange { index: 3, len: 3 })
        );

        let outcome = insert_section_at_boundary(&[], 0, 4.0, "new", "New", "c");
        assert!(!outcome.is_applied());
    }

    #[test]
    fn test_enforce_gapless_closes_gaps_and_floors() {
        let sections = vec![
            Section::new("a", "A", "c", 3.0, 7.0),
            Section::new("b", "B", "c", 9.0, 9.05),
            Section::new("c", "C", "c", 1.0, 2.0),
        ];
        let next = enforce_gapless(sections);
        assert_eq!(next[0].start_sec, 0.0);
        assert_eq!(next[0].end_sec, 4.0);
        assert_abs_diff_eq!(next[1].duration(), MIN_SECTION_SEC, epsilon = 1e-12);
        assert_abs_diff_eq!(next[2].end_sec, 5.1, epsilon = 1e-9);
        assert!(is_gapless(&next));
    }

    #[test]
    fn test_enforce_gapless_is_idempotent() {
        let sections = vec![
            Section::new("a", "A", "c", 0.3, 0.7),
            Section::new("b", "B", "c", 0.1, 0.2),
            Section::new("c", "C", "c", 1.1, 3.3),
            Section::new("d", "D", "c", 0.0, 0.05),
        ];
        let once = enforce_gapless(sections);
        let twice = enforce_gapless(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_lay_out_reports_adjustments() {
        let sections = vec![
            Section::new("a", "A", "c", 0.0, 4.0),
            Section::new("b", "B", "c", 5.0, 8.0),
            Section::new("c", "C", "c", 8.0, 8.0),
        ];
        let (_, adjustments) = lay_out(sections);
        assert_eq!(
            adjustments,
            vec![
                LayoutAdjustment::Repositioned { index: 1 },
                LayoutAdjustment::MinimumDuration { index: 2 },
                LayoutAdjustment::Repositioned { index: 2 },
            ]
        );
    }

    #[test]
    fn test_update_section_details() {
        let details = SectionDetails {
            name: Some("Bridge".to_string()),
            tags: Some(vec!["bridge".to_string()]),
            ..SectionDetails::default()
        };
        let next = update_section_details(&make_sections(), "s2", details)
            .applied()
            .unwrap();
        assert_eq!(next[1].name, "Bridge");
        assert_eq!(next[1].color_id, "navy_01");
        assert_eq!(next[1].tags, vec!["bridge"]);
        assert_eq!(bounds(&next), bounds(&make_sections()));

        let outcome = update_section_details(&make_sections(), "nope", SectionDetails::default());
        assert!(!outcome.is_applied());
    }

    #[test]
    fn test_section_at() {
        let sections = make_sections();
        assert_eq!(section_at(&sections, 9.0).map(|s| s.id.as_str()), Some("s2"));
        assert_eq!(section_at(&sections, 16.0).map(|s| s.id.as_str()), Some("s3"));
        assert!(section_at(&sections, 24.0).is_none());
    }

    #[test]
    fn test_is_gapless() {
        assert!(is_gapless(&make_sections()));
        assert!(is_gapless(&[]));
        let mut gap = make_sections();
        gap[1].start_sec = 9.0;
        assert!(!is_gapless(&gap));
    }
}
