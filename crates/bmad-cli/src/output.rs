use bmad_core::diagnostics::FileWarning;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print soft failures as indented warning lines.
pub fn print_warnings(warnings: &[FileWarning]) {
    for warning in warnings {
        println!("  Warning: {warning}");
    }
}
