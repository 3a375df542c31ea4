use async_trait::async_trait;
use serde::Serialize;
use tera::{Context, Tera};

use crate::{
    Result,
    plugin::{
        LifecycleContext, LifecycleStage, Plugin, ReleaseRecord,
        builtin::releases,
    },
};

/// Renders release notes from a Tera template.
pub struct ReleaseNotesPlugin {
    template: String,
}

#[derive(Serialize)]
struct NotesContext<'a> {
    releases: &'a [ReleaseRecord],
    branch: &'a str,
    dry_run: bool,
}

impl ReleaseNotesPlugin {
    pub fn new(template: String) -> Self {
        Self { template }
    }

    fn render(&self, ctx: &LifecycleContext) -> Result<String> {
        let notes_ctx = NotesContext {
            releases: releases(ctx),
            branch: &ctx.options().branch,
            dry_run: ctx.options().dry_run,
        };

        let context = Context::from_serialize(notes_ctx)?;
        let rendered = Tera::one_off(&self.template, &context, false)?;

        Ok(rendered.trim().to_string())
    }
}

#[async_trait]
impl Plugin for ReleaseNotesPlugin {
    fn name(&self) -> String {
        "release-notes".into()
    }

    fn stages(&self) -> Vec<LifecycleStage> {
        vec![LifecycleStage::GenerateNotes]
    }

    async fn generate_notes(
        &self,
        ctx: &mut LifecycleContext,
    ) -> Result<Option<String>> {
        let notes = self.render(ctx)?;

        if notes.is_empty() {
            return Ok(None);
        }

        Ok(Some(notes))
    }
}
