use anyhow::Context;
use bmad_core::backup::{self, Backup};
use bmad_core::config::{self, BmadConfig};
use bmad_core::docs::{self, Replacement};
use bmad_core::fields::{self, Answers};
use bmad_core::paths::{self, PackageLayout};
use bmad_core::prompt::Prompter;
use bmad_core::{compress, BmadError};
use std::path::Path;

use super::install::{copy_cheat_sheet, report_compression, write_coding_standards};
use crate::templates::Templates;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default)]
pub struct UpdateOptions {
    pub force: bool,
    pub backup: bool,
}

/// `bmad-minimal update`: replace the installed templates with the current
/// ones while keeping the workspace's `config.json`.
pub fn run(
    root: &Path,
    templates: Option<&Path>,
    prompter: &mut dyn Prompter,
    options: UpdateOptions,
) -> anyhow::Result<()> {
    println!("bmad-minimal update\n");

    let location = config::find_config(root).ok_or(BmadError::NotInstalled)?;
    println!(
        "Found configuration at: {}/{}",
        location.dir,
        paths::CONFIG_FILE
    );

    let mut config = BmadConfig::load(&location.path)
        .with_context(|| format!("failed to read {}", location.path.display()))?;

    let config_updated = fill_missing_fields(root, &location.path, &mut config, prompter)?;

    if !options.force {
        println!("\nThis will update all bmad-minimal files to the latest version.");
        if config_updated {
            println!("   Your config.json was updated with missing fields and other fields will be preserved; all other files will be overwritten.");
        } else {
            println!("   Your config.json will be preserved, but all other files will be overwritten.");
        }
        if !prompter.confirm("Do you want to proceed with the update?", true)? {
            println!("Update cancelled.");
            return Ok(());
        }
    }

    let templates = Templates::resolve(templates)?;
    let base_dir = root.join(&location.dir);

    let snapshot = if options.backup {
        let snapshot = backup::create_backup(&base_dir).context("failed to back up base directory")?;
        println!("  Backed up {} to {}", location.dir, snapshot.path.display());
        Some(snapshot)
    } else {
        None
    };

    println!("\nUpdating bmad-minimal files...\n");

    if let Err(e) = refresh(
        templates.layout(),
        root,
        &base_dir,
        &location.path,
        config,
        prompter,
    ) {
        if let Some(snapshot) = &snapshot {
            restore(snapshot);
        }
        return Err(e);
    }

    println!("\nbmad-minimal update complete!");
    println!("\nUpdated components:");
    println!("   ✓ Engineering files");
    println!("   ✓ Planning files");
    println!("   ✓ Coding standards");
    println!("   ✓ Configuration");
    if let Some(snapshot) = &snapshot {
        println!("\nBackup kept at {}", snapshot.path.display());
    }
    println!("\nVersion: {VERSION}");

    Ok(())
}

/// Ask for config fields the installed `config.json` lacks and persist the
/// answers. Returns true if the file was rewritten.
fn fill_missing_fields(
    root: &Path,
    config_path: &Path,
    config: &mut BmadConfig,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<bool> {
    let missing = fields::find_missing_fields(config, root);
    if missing.is_empty() {
        return Ok(false);
    }

    let mut answers = Answers::new();
    fields::ask(&missing, prompter, &mut answers)?;
    if fields::apply_answers(&missing, &answers, config) == 0 {
        return Ok(false);
    }
    config
        .save(config_path)
        .context("failed to write config.json")?;
    Ok(true)
}

fn refresh(
    layout: &PackageLayout,
    root: &Path,
    base_dir: &Path,
    config_path: &Path,
    mut config: BmadConfig,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<()> {
    let core_dir = layout.core_dir();
    let loaded = config.clone();
    config.ensure_docs_defaults();
    let preserved = config;

    match docs::replace_category(&core_dir, base_dir, paths::ENGINEERING_DIR, true)? {
        Replacement::Updated => println!("  Updating engineering files..."),
        Replacement::Installed => println!("  Installing engineering files..."),
        Replacement::Skipped => {}
    }
    if docs::replace_category(&core_dir, base_dir, paths::PLANNING_DIR, false)?
        == Replacement::Updated
    {
        println!("  Updating planning files...");
    }

    println!("  Compressing agent configurations...");
    report_compression(&compress::compress_tree(base_dir));

    if preserved != loaded {
        println!("  Filling in docs defaults...");
        preserved
            .save(config_path)
            .context("failed to write config.json")?;
    } else {
        println!("  Preserving configuration...");
    }

    write_coding_standards(layout, root, &preserved, prompter)?;
    copy_cheat_sheet(layout, root, &preserved);
    docs::ensure_docs_structure(root, &preserved).context("failed to create docs directories")?;
    Ok(())
}

fn restore(snapshot: &Backup) {
    println!("  Restoring backup from {}...", snapshot.path.display());
    if let Err(e) = snapshot.restore() {
        tracing::error!(backup = %snapshot.path.display(), "failed to restore backup: {e}");
    }
}
