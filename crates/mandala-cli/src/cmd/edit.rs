use crate::output::print_json;
use anyhow::anyhow;
use chrono::Utc;
use mandala_core::intent::MandalaEdit;
use std::collections::BTreeMap;
use std::path::Path;

/// `mandala edit <owner> <year>` — free-edit of the chart after the guided
/// steps. Only the fields passed on the command line are overwritten.
#[allow(clippy::too_many_arguments)]
pub fn run(
    root: &Path,
    owner: &str,
    year: i32,
    center_goal: Option<String>,
    sub_goals: Vec<String>,
    plan_index: Option<u8>,
    plans: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    let action_plans = match (plan_index, plans.is_empty()) {
        (Some(index), false) => {
            let mut map = BTreeMap::new();
            map.insert(index, plans);
            Some(map)
        }
        (None, true) => None,
        _ => {
            return Err(anyhow!(
                "--plan-index and --plan must be given together (eight --plan entries)"
            ))
        }
    };

    let edit = MandalaEdit {
        center_goal,
        sub_goals: if sub_goals.is_empty() {
            None
        } else {
            Some(sub_goals)
        },
        action_plans,
    };

    let mut record = mandala_core::store::get(root, owner, year)?
        .ok_or_else(|| anyhow!("no plan for {owner}/{year}"))?;
    let expected_version = record.version;
    edit.apply(&mut record)?;
    record.updated_at = Utc::now();
    let stored = mandala_core::store::update(root, &record, expected_version)?;

    if json {
        return print_json(&serde_json::json!({
            "owner_id": stored.owner_id,
            "year": stored.year,
            "center_goal": stored.center_goal,
            "sub_goals": stored.sub_goals,
            "action_plans": stored.action_plans,
            "version": stored.version,
        }));
    }
    println!("Chart updated (version {})", stored.version);
    Ok(())
}
