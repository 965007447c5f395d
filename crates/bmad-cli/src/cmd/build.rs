use anyhow::Context;
use bmad_core::diagnostics::FileWarning;
use bmad_core::paths::PackageLayout;
use bmad_core::{bundle, cheatsheet};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::output::{print_json, print_warnings};
use crate::templates::Templates;

#[derive(Debug, Serialize)]
struct BuildReport {
    bundles: Vec<PathBuf>,
    cheat_sheet: Option<PathBuf>,
    warnings: Vec<FileWarning>,
}

/// `bmad-minimal build`: write one bundle per agent and regenerate the
/// cheat sheet from the agents' JSON blocks.
pub fn run(templates: Option<&Path>, out: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let templates = Templates::resolve(templates)?;
    let layout = templates.layout();

    let output = match out {
        Some(dir) => PackageLayout::new(dir),
        None if templates.is_embedded() => {
            anyhow::bail!("--out is required when building from the built-in templates")
        }
        None => layout.clone(),
    };

    let agent_dirs = layout.agent_dirs();

    let bundled = bundle::bundle_agents(&agent_dirs, &output.bundled_dir())
        .context("failed to bundle agents")?;
    let mut warnings = bundled.warnings;

    let sheet_path = output.cheat_sheet();
    let (written, sheet_warnings) = cheatsheet::write_cheat_sheet(&agent_dirs, &sheet_path)
        .context("failed to write cheat sheet")?;
    warnings.extend(sheet_warnings);

    let report = BuildReport {
        bundles: bundled.bundles,
        cheat_sheet: written.then_some(sheet_path),
        warnings,
    };

    if json {
        return print_json(&report);
    }

    for path in &report.bundles {
        println!("bundled {}", path.display());
    }
    match &report.cheat_sheet {
        Some(path) => println!("wrote {}", path.display()),
        None => println!("no agent sections found; cheat sheet not written"),
    }
    print_warnings(&report.warnings);
    Ok(())
}
