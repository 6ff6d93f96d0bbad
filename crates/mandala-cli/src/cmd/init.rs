use std::path::Path;

/// `mandala init` — create the plan store directory tree.
pub fn run(root: &Path) -> anyhow::Result<()> {
    mandala_core::io::ensure_dir(&mandala_core::paths::plans_dir(root))?;
    println!(
        "Initialized mandala plan store in {}",
        mandala_core::paths::mandala_dir(root).display()
    );
    Ok(())
}
