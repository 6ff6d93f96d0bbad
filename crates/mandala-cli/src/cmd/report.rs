use crate::output::print_json;
use anyhow::anyhow;
use chrono::Utc;
use gemini_agent::{GeminiClient, ReportContext};
use mandala_core::intent::PlanIntent;
use mandala_core::plan::{PlanRecord, ReportSummary};
use mandala_core::progression::{self, Access};
use mandala_core::types::Step;
use std::path::Path;

/// `mandala report <owner> <year>` — generate the AI summary and complete
/// step 14. Requires `GEMINI_API_KEY`.
pub fn run(root: &Path, owner: &str, year: i32, role: Option<&str>, json: bool) -> anyhow::Result<()> {
    let role = super::parse_role(role)?;

    let mut record = mandala_core::store::get(root, owner, year)?
        .ok_or_else(|| anyhow!("no plan for {owner}/{year}"))?;

    // Check accessibility before spending an AI call.
    if !record.is_step_completed(Step::LAST) {
        match progression::evaluate_access(Some(&record), Step::LAST, role, Utc::now()) {
            Access::Granted => {}
            Access::Wait { until } => {
                return Err(anyhow!("the report step is gated until {until}"))
            }
            Access::Locked { reason } => return Err(anyhow!("report step locked: {reason}")),
        }
    }

    let client = GeminiClient::from_env()?;
    let rt = tokio::runtime::Runtime::new()?;
    let generated = rt.block_on(client.generate(&report_context(&record)))?;

    let summary = ReportSummary {
        reflection_summary: generated.reflection_summary,
        goal_analysis: generated.goal_analysis,
        keywords: generated.keywords,
        insights: generated.insights,
    };
    let expected_version = record.version;
    let intent = PlanIntent::ReportGenerated { summary };
    progression::complete_step(&mut record, &intent, role, Utc::now())?;
    let stored = mandala_core::store::update(root, &record, expected_version)?;

    if json {
        return print_json(&serde_json::json!({
            "owner_id": stored.owner_id,
            "year": stored.year,
            "summary": stored.summary,
            "complete": stored.is_complete(),
            "version": stored.version,
        }));
    }
    let summary = stored
        .summary
        .as_ref()
        .ok_or_else(|| anyhow!("report missing after generation"))?;
    println!("Report for {}/{}", stored.owner_id, stored.year);
    println!("\n{}", summary.reflection_summary);
    println!("\n{}", summary.goal_analysis);
    println!("\nKeywords: {}", summary.keywords.join(", "));
    println!("\n{}", summary.insights);
    Ok(())
}

fn report_context(record: &PlanRecord) -> ReportContext {
    ReportContext {
        theme: record.theme.map(|t| t.to_string()).unwrap_or_default(),
        reflection_answers: record.reflection_answers.values().cloned().collect(),
        reflection_notes: record.reflection_notes.clone(),
        center_goal: record.center_goal.clone().unwrap_or_default(),
        sub_goals: record.sub_goals.clone(),
        action_plans: (0..8)
            .map(|i| record.action_plans.get(&i).cloned().unwrap_or_default())
            .collect(),
    }
}
