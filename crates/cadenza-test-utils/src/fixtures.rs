//! Fixture loading for workflow documents stored next to the test suites.

use anyhow::Context;
use cadenza_dsl::{load_workflow_file, Workflow};
use std::path::{Path, PathBuf};

/// Path of `name` inside `<crate>/tests/fixtures`
pub fn fixture_path(manifest_dir: &str, name: &str) -> PathBuf {
    Path::new(manifest_dir).join("tests").join("fixtures").join(name)
}

/// Load a workflow fixture of the calling crate.
///
/// Pass `env!("CARGO_MANIFEST_DIR")` as `manifest_dir`.
pub fn load_fixture_workflow(manifest_dir: &str, name: &str) -> anyhow::Result<Workflow> {
    let path = fixture_path(manifest_dir, name);
    load_workflow_file(&path)
        .with_context(|| format!("failed to load workflow fixture {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fixture_mentions_path() {
        let err = load_fixture_workflow(env!("CARGO_MANIFEST_DIR"), "missing.yaml").unwrap_err();
        assert!(format!("{:#}", err).contains("missing.yaml"));
    }
}
