use anyhow::anyhow;
use std::path::Path;

/// `mandala export <owner> <year>` — CSV to stdout, or to `--out <file>`.
pub fn run(root: &Path, owner: &str, year: i32, out: Option<&Path>) -> anyhow::Result<()> {
    let record = mandala_core::store::get(root, owner, year)?
        .ok_or_else(|| anyhow!("no plan for {owner}/{year}"))?;
    let csv = mandala_core::export::to_csv(&record);

    match out {
        Some(path) => {
            std::fs::write(path, csv)?;
            println!("Exported {}/{} to {}", owner, year, path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}
