use anyhow::Context;
use bmad_core::compress::{self, CompressionStats};
use bmad_core::config::{self, BmadConfig};
use bmad_core::fields::{self, FieldOptions};
use bmad_core::paths::{self, PackageLayout};
use bmad_core::prompt::Prompter;
use bmad_core::standards::{self, PromptContext};
use bmad_core::{docs, io};
use serde_json::Value;
use std::path::Path;

use crate::output::print_warnings;
use crate::templates::Templates;

#[derive(Debug, Default)]
pub struct InstallOptions {
    pub project: Option<String>,
    pub dir: Option<String>,
}

/// `bmad-minimal install`: copy the templates into the workspace and write
/// a `config.json` built from the user's answers.
pub fn run(
    root: &Path,
    templates: Option<&Path>,
    prompter: &mut dyn Prompter,
    options: InstallOptions,
) -> anyhow::Result<()> {
    println!("bmad-minimal installation\n");

    let templates = Templates::resolve(templates)?;
    let layout = templates.layout();
    let core_dir = layout.core_dir();

    let existing = paths::config_path(&root.join(paths::DEFAULT_BASE_DIR));
    if existing.is_file() {
        println!("bmad-minimal configuration already exists:");
        println!("   - {}/{}", paths::DEFAULT_BASE_DIR, paths::CONFIG_FILE);
        if !prompter.confirm("Do you want to overwrite the existing configuration?", false)? {
            println!("Installation cancelled.");
            return Ok(());
        }
    }

    let field_options = FieldOptions {
        project: options.project,
        dir: options.dir,
    };
    let answers = fields::gather_install_answers(root, &field_options, prompter)?;

    println!("\nInstalling bmad-minimal files...\n");

    let base_name = answers
        .get("baseDir")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(paths::DEFAULT_BASE_DIR)
        .to_string();
    let base_dir = root.join(&base_name);
    io::ensure_dir(&base_dir)?;

    println!("  Copying engineering and planning files...");
    docs::copy_core_directories(&core_dir, &base_dir)
        .context("failed to copy engineering and planning files")?;

    println!("  Compressing agent configurations...");
    report_compression(&compress::compress_tree(&base_dir));

    let defaults = config::load_default_config(&core_dir)?;
    let config = config::merge_config(&defaults, &answers);
    println!("  Writing configuration...");
    config
        .save(&paths::config_path(&base_dir))
        .context("failed to write config.json")?;
    docs::ensure_docs_structure(root, &config).context("failed to create docs directories")?;

    copy_cheat_sheet(layout, root, &config);

    match io::ensure_ignored(root, &base_name) {
        Ok(true) => println!("  Added \"{base_name}\" to .gitignore"),
        Ok(false) => println!("  .gitignore already includes \"{base_name}\""),
        Err(e) => println!("  Warning: failed to update .gitignore: {e}"),
    }

    write_coding_standards(layout, root, &config, prompter)?;

    println!("\nbmad-minimal installation complete!\n");
    println!("Structure created:");
    println!("   {base_name}/");
    println!("   ├── {}", paths::CONFIG_FILE);
    println!("   ├── {}/", paths::ENGINEERING_DIR);
    println!("   └── {}/", paths::PLANNING_DIR);
    println!("   {}/", config.docs_dir());
    for (_, subdir) in config.docs_subdirs() {
        println!("   ├── {subdir}/");
    }
    println!("   └── {}", paths::CODING_STANDARDS_FILE);

    Ok(())
}

pub(crate) fn report_compression(stats: &CompressionStats) {
    println!(
        "    {} agent files processed, {} compressed, {} errors",
        stats.processed, stats.modified, stats.errors
    );
    print_warnings(&stats.warnings);
}

/// Copy the packaged cheat sheet into the docs directory. Failure is only
/// reported.
pub(crate) fn copy_cheat_sheet(layout: &PackageLayout, root: &Path, config: &BmadConfig) {
    match docs::copy_cheat_sheet_to_workspace(layout, root, config) {
        Ok(Some(_)) => println!(
            "  Copied cheat sheet to {}/{}",
            config.docs_dir(),
            paths::CHEAT_SHEET_FILE
        ),
        Ok(None) => {}
        Err(e) => println!("  Warning: failed to copy cheat sheet: {e}"),
    }
}

/// Write the coding-standards template when the workspace has none, then
/// offer a prompt the user can paste into an LLM to fill it in.
pub(crate) fn write_coding_standards(
    layout: &PackageLayout,
    root: &Path,
    config: &BmadConfig,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<()> {
    let target = paths::workspace_coding_standards(root, config.docs_dir());
    if target.exists() {
        return Ok(());
    }
    println!("  Writing coding standards template...");
    standards::write_coding_standards(layout, root, config)
        .context("failed to write coding standards template")?;

    if prompter.confirm("Generate coding standards prompt?", true)? {
        let prompt = standards::build_coding_standards_prompt(&PromptContext::from_config(config));
        println!("\nPrompt for your LLM/agent (copy/paste):");
        println!("{prompt}\n");
    }
    Ok(())
}
