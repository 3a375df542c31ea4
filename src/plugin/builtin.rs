//! Plugins shipped with calver-release.

mod commit_analyzer;
mod exec;
mod git;
mod npm;
mod release_notes;

pub use commit_analyzer::CommitAnalyzerPlugin;
pub use exec::ExecPlugin;
pub use git::GitPlugin;
pub use npm::NpmPlugin;
pub use release_notes::ReleaseNotesPlugin;

use crate::plugin::LifecycleContext;

/// Releases in the context, or an empty slice before analysis.
fn releases(ctx: &LifecycleContext) -> &[crate::plugin::ReleaseRecord] {
    ctx.next_release().map(|r| r.releases()).unwrap_or_default()
}
