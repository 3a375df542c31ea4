use async_trait::async_trait;
use log::*;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::{
    Result,
    error::CalverError,
    plugin::{LifecycleContext, LifecycleStage, Plugin, builtin::releases},
    workspace::{DESCRIPTOR_FILE, descriptor::set_descriptor_version},
};

/// Writes released versions into `package.json` and publishes packages to
/// the npm registry.
pub struct NpmPlugin {
    root: PathBuf,
}

impl NpmPlugin {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn package_dir(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl Plugin for NpmPlugin {
    fn name(&self) -> String {
        "npm".into()
    }

    fn stages(&self) -> Vec<LifecycleStage> {
        vec![
            LifecycleStage::VerifyConditions,
            LifecycleStage::VerifyRelease,
            LifecycleStage::Prepare,
            LifecycleStage::Publish,
        ]
    }

    async fn verify_conditions(&self, _ctx: &mut LifecycleContext) -> Result<()> {
        if !self.root.join(DESCRIPTOR_FILE).is_file() {
            return Err(CalverError::invalid_config(format!(
                "no {DESCRIPTOR_FILE} in {}",
                self.root.display()
            )));
        }

        Ok(())
    }

    async fn verify_release(&self, ctx: &mut LifecycleContext) -> Result<()> {
        for record in releases(ctx) {
            let file = self.package_dir(&record.package().path).join(DESCRIPTOR_FILE);
            if !file.is_file() {
                return Err(CalverError::invalid_config(format!(
                    "{} has no {DESCRIPTOR_FILE}",
                    record.package().name
                )));
            }
        }

        Ok(())
    }

    async fn prepare(&self, ctx: &mut LifecycleContext) -> Result<()> {
        for record in releases(ctx) {
            let file = self.package_dir(&record.package().path).join(DESCRIPTOR_FILE);
            let content = tokio::fs::read_to_string(&file).await?;
            let updated = set_descriptor_version(&content, record.version())?;
            tokio::fs::write(&file, updated).await?;
            info!("{}: set version {}", record.package().name, record.version());
        }

        Ok(())
    }

    async fn publish(&self, ctx: &mut LifecycleContext) -> Result<()> {
        for record in releases(ctx) {
            let package = record.package();
            if package.private {
                debug!("{} is private, not publishing", package.name);
                continue;
            }

            info!("publishing {}@{}", package.name, record.version());
            npm_publish(&self.package_dir(&package.path)).await?;
        }

        Ok(())
    }
}

async fn npm_publish(dir: &Path) -> Result<()> {
    let output = Command::new("npm")
        .arg("publish")
        .current_dir(dir)
        .output()
        .await?;

    if !output.status.success() {
        return Err(CalverError::Other(color_eyre::eyre::eyre!(
            "npm publish failed in {}: {}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        plugin::NextRelease,
        test_helpers::{
            create_test_release, create_test_release_record,
            create_test_run_options,
        },
        workspace::Package,
    };
    use std::fs;
    use tempfile::TempDir;

    fn context(dir: &Path, records: Vec<crate::plugin::ReleaseRecord>) -> LifecycleContext {
        let mut ctx = LifecycleContext::new(create_test_run_options(dir));
        ctx.set_next_release(NextRelease::new(records).unwrap());
        ctx
    }

    #[tokio::test]
    async fn requires_root_descriptor() {
        let dir = TempDir::new().unwrap();
        let plugin = NpmPlugin::new(dir.path().into());
        let mut ctx = LifecycleContext::new(create_test_run_options(dir.path()));

        assert!(plugin.verify_conditions(&mut ctx).await.is_err());

        fs::write(dir.path().join(DESCRIPTOR_FILE), "{}").unwrap();
        plugin.verify_conditions(&mut ctx).await.unwrap();
    }

    #[tokio::test]
    async fn verify_release_checks_each_package() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("packages/core")).unwrap();
        fs::write(dir.path().join("packages/core/package.json"), "{}").unwrap();
        let plugin = NpmPlugin::new(dir.path().into());

        let mut ctx = context(
            dir.path(),
            vec![
                create_test_release_record("core", "packages/core", true),
                create_test_release_record("ui", "packages/ui", true),
            ],
        );

        let err = plugin.verify_release(&mut ctx).await.unwrap_err();
        assert!(err.to_string().contains("ui"));
    }

    #[tokio::test]
    async fn prepare_writes_version_keeping_key_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DESCRIPTOR_FILE),
            r#"{"name":"app","version":"25.07.3","private":true}"#,
        )
        .unwrap();
        let plugin = NpmPlugin::new(dir.path().into());
        let mut ctx = context(dir.path(), vec![create_test_release_record("app", ".", false)]);

        plugin.prepare(&mut ctx).await.unwrap();

        let written = fs::read_to_string(dir.path().join(DESCRIPTOR_FILE)).unwrap();
        assert_eq!(
            written,
            "{\n  \"name\": \"app\",\n  \"version\": \"25.08.1\",\n  \"private\": true\n}\n"
        );
    }

    #[tokio::test]
    async fn private_packages_are_not_published() {
        let dir = TempDir::new().unwrap();
        let mut package = Package::new("internal", ".");
        package.private = true;
        let plugin = NpmPlugin::new(dir.path().into());
        let mut ctx = context(dir.path(), vec![create_test_release(package, false)]);

        plugin.publish(&mut ctx).await.unwrap();
    }
}
