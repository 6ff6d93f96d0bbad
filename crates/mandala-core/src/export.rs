use crate::plan::PlanRecord;

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Render the chart as CSV: one row per cell, `section,index,content`.
/// PDF rendering lives outside this crate; this is the portable export.
pub fn to_csv(record: &PlanRecord) -> String {
    let mut out = String::from("section,index,content\n");

    if let Some(goal) = &record.center_goal {
        push_row(&mut out, "center_goal", "", goal);
    }
    for (i, sub_goal) in record.sub_goals.iter().enumerate() {
        push_row(&mut out, "sub_goal", &i.to_string(), sub_goal);
    }
    for (index, plans) in &record.action_plans {
        for (i, plan) in plans.iter().enumerate() {
            push_row(&mut out, "action_plan", &format!("{index}.{i}"), plan);
        }
    }
    if let Some(summary) = &record.summary {
        push_row(&mut out, "reflection_summary", "", &summary.reflection_summary);
        push_row(&mut out, "goal_analysis", "", &summary.goal_analysis);
        push_row(&mut out, "keywords", "", &summary.keywords.join("; "));
        push_row(&mut out, "insights", "", &summary.insights);
    }
    out
}

fn push_row(out: &mut String, section: &str, index: &str, content: &str) {
    out.push_str(section);
    out.push(',');
    out.push_str(index);
    out.push(',');
    out.push_str(&escape(content));
    out.push('\n');
}

/// Minimal CSV quoting: wrap when the value contains a comma, quote or
/// newline, doubling embedded quotes.
fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
