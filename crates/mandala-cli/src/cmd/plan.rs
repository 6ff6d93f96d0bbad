use crate::output::{print_json, print_table};
use anyhow::anyhow;
use mandala_core::plan::PlanRecord;
use std::path::Path;

/// `mandala create <owner> <year>` — idempotent create.
pub fn create(root: &Path, owner: &str, year: i32, consent: bool, json: bool) -> anyhow::Result<()> {
    let record = mandala_core::store::create(root, owner, year, consent)?;
    if json {
        return print_json(&record);
    }
    println!(
        "Plan for {}/{} ready (step {} of 14)",
        record.owner_id, record.year, record.current_step
    );
    Ok(())
}

/// `mandala show <owner> [year]` — one record, or all years for the owner.
pub fn show(root: &Path, owner: &str, year: Option<i32>, json: bool) -> anyhow::Result<()> {
    match year {
        Some(year) => {
            let record = mandala_core::store::get(root, owner, year)?
                .ok_or_else(|| anyhow!("no plan for {owner}/{year}"))?;
            if json {
                return print_json(&record);
            }
            print_record(&record);
            Ok(())
        }
        None => {
            let records = mandala_core::store::list(root, owner)?;
            if json {
                return print_json(&records);
            }
            if records.is_empty() {
                println!("No plans for {owner}. Run: mandala create {owner} <year>");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = records
                .iter()
                .map(|r| {
                    vec![
                        r.year.to_string(),
                        format!("{}/14", r.current_step),
                        if r.is_complete() { "yes" } else { "" }.to_string(),
                        r.version.to_string(),
                    ]
                })
                .collect();
            print_table(&["YEAR", "STEP", "COMPLETE", "VERSION"], rows);
            Ok(())
        }
    }
}

fn print_record(record: &PlanRecord) {
    println!("Plan: {}/{}", record.owner_id, record.year);
    println!(
        "Step: {} of 14 ({} completed)",
        record.current_step,
        record.completed_steps.len()
    );
    if let Some(theme) = record.theme {
        println!("Theme: {theme}");
    }
    if let Some(goal) = &record.center_goal {
        println!("\nCenter goal: {goal}");
    }
    if !record.sub_goals.is_empty() {
        println!("\nSub-goals:");
        for (i, sub_goal) in record.sub_goals.iter().enumerate() {
            println!("  {}. {}", i + 1, sub_goal);
            if let Some(plans) = record.action_plans.get(&(i as u8)) {
                for plan in plans {
                    println!("     - {plan}");
                }
            }
        }
    }
    if let Some(summary) = &record.summary {
        println!("\nReport:");
        println!("  {}", summary.reflection_summary);
        println!("  {}", summary.goal_analysis);
        println!("  keywords: {}", summary.keywords.join(", "));
        println!("  {}", summary.insights);
    }
}
