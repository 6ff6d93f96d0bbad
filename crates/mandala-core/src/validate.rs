use crate::error::{MandalaError, Result};

// ---------------------------------------------------------------------------
// Field limits
// ---------------------------------------------------------------------------

/// Sub-goal and action-plan entries render into a 3x3 chart cell.
pub const ENTRY_MAX_CHARS: usize = 50;
pub const CENTER_GOAL_MAX_CHARS: usize = 100;
pub const LONG_TEXT_MAX_CHARS: usize = 1000;

pub const REFLECTION_QUESTION_COUNT: u8 = 3;
pub const SUB_GOAL_BATCH_SIZE: usize = 4;
pub const SUB_GOAL_COUNT: usize = 8;
pub const ACTION_PLAN_COUNT: usize = 8;

// ---------------------------------------------------------------------------
// Single-field checks
// ---------------------------------------------------------------------------

fn invalid(field: &str, reason: impl Into<String>) -> MandalaError {
    MandalaError::InvalidField {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Trim and require a non-blank value no longer than `max` chars.
/// Returns the trimmed value; this is what gets stored.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(field, "must not be blank"));
    }
    if trimmed.chars().count() > max {
        return Err(invalid(field, format!("must be at most {max} characters")));
    }
    Ok(trimmed.to_string())
}

/// Optional free text: blank collapses to `None`, otherwise trimmed.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => Ok(Some(required_text(field, v, max)?)),
    }
}

// ---------------------------------------------------------------------------
// Batch checks
// ---------------------------------------------------------------------------

/// A sub-goal batch is exactly 4 non-blank entries of at most 50 chars.
pub fn sub_goal_batch(entries: &[String]) -> Result<Vec<String>> {
    if entries.len() != SUB_GOAL_BATCH_SIZE {
        return Err(invalid(
            "sub_goals",
            format!("batch must contain exactly {SUB_GOAL_BATCH_SIZE} entries"),
        ));
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| required_text(&format!("sub_goals[{i}]"), e, ENTRY_MAX_CHARS))
        .collect()
}

/// An action-plan batch is exactly 8 non-blank entries of at most 50 chars,
/// stored trimmed in submission order.
pub fn action_plan_batch(index: u8, entries: &[String]) -> Result<Vec<String>> {
    if index as usize >= SUB_GOAL_COUNT {
        return Err(invalid(
            "action_plans",
            format!("sub-goal index {index} out of range (0-7)"),
        ));
    }
    if entries.len() != ACTION_PLAN_COUNT {
        return Err(invalid(
            "action_plans",
            format!("batch must contain exactly {ACTION_PLAN_COUNT} entries"),
        ));
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| required_text(&format!("action_plans[{index}][{i}]"), e, ENTRY_MAX_CHARS))
        .collect()
}

/// Reflection submission: every question index 0..3 must carry a
/// non-blank answer.
pub fn reflection_answers(
    answers: &std::collections::BTreeMap<u8, String>,
) -> Result<std::collections::BTreeMap<u8, String>> {
    let mut out = std::collections::BTreeMap::new();
    for q in 0..REFLECTION_QUESTION_COUNT {
        let answer = answers
            .get(&q)
            .ok_or_else(|| invalid("reflection_answers", format!("missing answer {q}")))?;
        out.insert(
            q,
            required_text(
                &format!("reflection_answers[{q}]"),
                answer,
                LONG_TEXT_MAX_CHARS,
            )?,
        );
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn batch(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("f", "  hello  ", 50).unwrap(), "hello");
    }

    #[test]
    fn required_text_rejects_blank() {
        assert!(required_text("f", "   ", 50).is_err());
        assert!(required_text("f", "", 50).is_err());
    }

    #[test]
    fn required_text_rejects_overlong() {
        let long = "x".repeat(51);
        assert!(required_text("f", &long, 50).is_err());
        let exact = "x".repeat(50);
        assert_eq!(required_text("f", &exact, 50).unwrap(), exact);
    }

    #[test]
    fn optional_text_blank_is_none() {
        assert_eq!(optional_text("f", Some("   "), 50).unwrap(), None);
        assert_eq!(optional_text("f", None, 50).unwrap(), None);
        assert_eq!(
            optional_text("f", Some(" note "), 50).unwrap(),
            Some("note".to_string())
        );
    }

    #[test]
    fn sub_goal_batch_accepts_four_non_blank() {
        let out = sub_goal_batch(&batch(&["run 5k", " read ", "save", "sleep"])).unwrap();
        assert_eq!(out, vec!["run 5k", "read", "save", "sleep"]);
    }

    #[test]
    fn sub_goal_batch_rejects_blank_entry() {
        assert!(sub_goal_batch(&batch(&["a", "  ", "c", "d"])).is_err());
    }

    #[test]
    fn sub_goal_batch_rejects_wrong_size() {
        assert!(sub_goal_batch(&batch(&["a", "b", "c"])).is_err());
        assert!(sub_goal_batch(&batch(&["a", "b", "c", "d", "e"])).is_err());
    }

    #[test]
    fn action_plan_batch_preserves_order() {
        let entries = batch(&["p1", "p2", "p3", "p4", "p5", "p6", "p7", " p8 "]);
        let out = action_plan_batch(3, &entries).unwrap();
        assert_eq!(out[0], "p1");
        assert_eq!(out[7], "p8");
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn action_plan_batch_rejects_bad_index() {
        let entries = batch(&["a"; 8]);
        assert!(action_plan_batch(8, &entries).is_err());
    }

    #[test]
    fn action_plan_batch_rejects_seven_entries() {
        assert!(action_plan_batch(0, &batch(&["a"; 7])).is_err());
    }

    #[test]
    fn reflection_requires_all_three_answers() {
        let mut answers = BTreeMap::new();
        answers.insert(0, "a".to_string());
        answers.insert(1, "b".to_string());
        assert!(reflection_answers(&answers).is_err());

        answers.insert(2, "c".to_string());
        let out = reflection_answers(&answers).unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn reflection_rejects_blank_answer() {
        let mut answers = BTreeMap::new();
        answers.insert(0, "a".to_string());
        answers.insert(1, "   ".to_string());
        answers.insert(2, "c".to_string());
        assert!(reflection_answers(&answers).is_err());
    }
}
