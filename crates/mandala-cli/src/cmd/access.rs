use crate::output::print_json;
use chrono::Utc;
use mandala_core::progression::{self, Access};
use mandala_core::types::Step;
use std::path::Path;

/// `mandala access <owner> <year> <step>` — evaluate whether the step is
/// reachable right now.
pub fn run(
    root: &Path,
    owner: &str,
    year: i32,
    step: u32,
    role: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let step = Step::new(step)?;
    let role = super::parse_role(role)?;
    let record = mandala_core::store::get(root, owner, year)?;
    let access = progression::evaluate_access(record.as_ref(), step, role, Utc::now());

    if json {
        let mut body = serde_json::to_value(&access)?;
        body["step"] = serde_json::json!(step);
        body["role"] = serde_json::json!(role);
        return print_json(&body);
    }

    match access {
        Access::Granted => println!("Step {step}: granted"),
        Access::Wait { until } => println!("Step {step}: wait until {until}"),
        Access::Locked { reason } => println!("Step {step}: locked ({reason})"),
    }
    Ok(())
}
