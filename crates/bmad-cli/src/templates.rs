//! Where template content comes from: an explicit directory, or the copy
//! built into the binary.

use anyhow::Context;
use bmad_core::io;
use bmad_core::paths::PackageLayout;
use rust_embed::Embed;
use std::path::Path;
use tempfile::TempDir;

#[derive(Embed)]
#[folder = "$CARGO_MANIFEST_DIR/../../assets/"]
struct Assets;

/// A resolved template root. Embedded templates live in a temporary
/// directory that is removed when this value is dropped.
pub struct Templates {
    layout: PackageLayout,
    materialized: Option<TempDir>,
}

impl Templates {
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(dir) => {
                if !dir.is_dir() {
                    anyhow::bail!("template directory not found: {}", dir.display());
                }
                Ok(Self {
                    layout: PackageLayout::new(dir),
                    materialized: None,
                })
            }
            None => Self::materialize(),
        }
    }

    pub fn is_embedded(&self) -> bool {
        self.materialized.is_some()
    }

    pub fn layout(&self) -> &PackageLayout {
        &self.layout
    }

    fn materialize() -> anyhow::Result<Self> {
        let tmp = TempDir::new().context("failed to create template directory")?;
        let mut count = 0usize;
        for name in Assets::iter() {
            let Some(file) = Assets::get(&name) else {
                continue;
            };
            let dest = tmp.path().join(&*name);
            io::atomic_write(&dest, &file.data)
                .with_context(|| format!("failed to write template {name}"))?;
            count += 1;
        }
        tracing::debug!(files = count, dir = %tmp.path().display(), "materialized embedded templates");
        Ok(Self {
            layout: PackageLayout::new(tmp.path()),
            materialized: Some(tmp),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_templates_have_core_content() {
        let templates = Templates::resolve(None).unwrap();
        assert!(templates.is_embedded());
        let layout = templates.layout();
        assert!(layout.core_dir().join("config.json").is_file());
        assert!(layout.core_dir().join("engineering/agents").is_dir());
        assert!(layout.cheat_sheet().is_file());
        assert!(layout.coding_standards_template().is_file());
    }

    #[test]
    fn missing_explicit_dir_is_an_error() {
        assert!(Templates::resolve(Some(Path::new("/definitely/not/here"))).is_err());
    }
}
