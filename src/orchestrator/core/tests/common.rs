//! Common test utilities for orchestrator core tests.

use std::{path::Path, sync::Arc};

use crate::{
    orchestrator::core::Core,
    plugin::RunOptions,
    test_helpers::create_test_run_options,
    vcs::{MockVcs, VcsManager},
    version::{VersionFormat, YearMonth},
};

pub use crate::test_helpers::{
    create_test_monorepo as monorepo, create_test_single_package as single_package,
    create_test_vcs as mock_vcs,
};

/// Creates a core for `root` where the current month is 25.08.
pub fn create_core(root: &Path, vcs: MockVcs) -> Core {
    Core::new(
        Arc::new(VcsManager::new(Box::new(vcs), false)),
        root.to_path_buf(),
        YearMonth::new(25, 8),
    )
}

pub fn run_options(
    root: &Path,
    format: VersionFormat,
    auto_update_month: bool,
) -> RunOptions {
    RunOptions {
        version_format: format,
        auto_update_month,
        ..create_test_run_options(root)
    }
}
