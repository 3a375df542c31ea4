//! Next release preview.
use log::*;
use std::path::Path;
use tokio::fs;

use crate::{Result, cli, command::common, plugin::NextRelease};

/// Runs the lifecycle as a dry run and prints the computed release as JSON,
/// or writes it to `out_file`. The JSON is `null` when nothing would be
/// released.
pub async fn execute(args: &cli::Args, out_file: Option<String>) -> Result<()> {
    let orchestrator = common::setup_orchestrator(args)?;

    let outcome = orchestrator.run().await?;
    let next = outcome.next_release();

    if next.is_none() {
        info!("no release needed");
    }

    write_next_release(next, out_file).await
}

async fn write_next_release(
    next: Option<&NextRelease>,
    out_file: Option<String>,
) -> Result<()> {
    let content = serde_json::to_string_pretty(&next)?;

    if let Some(out_file) = out_file {
        let file_path = Path::new(&out_file);

        if let Some(parent) = file_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await?;
        }

        info!("writing next release json to: {}", file_path.display());
        fs::write(file_path, &content).await?;
    } else {
        println!("{content}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_release_record;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_release_json_to_out_file() {
        let dir = TempDir::new().unwrap();
        let out_file = dir.path().join("nested/next.json");
        let next =
            NextRelease::new(vec![create_test_release_record("app", ".", false)])
                .unwrap();

        write_next_release(
            Some(&next),
            Some(out_file.to_str().unwrap().to_string()),
        )
        .await
        .unwrap();

        let content = tokio::fs::read_to_string(&out_file).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json, serde_json::to_value(&next).unwrap());
    }

    #[tokio::test]
    async fn writes_null_when_nothing_to_release() {
        let dir = TempDir::new().unwrap();
        let out_file = dir.path().join("next.json");

        write_next_release(None, Some(out_file.to_str().unwrap().to_string()))
            .await
            .unwrap();

        let content = tokio::fs::read_to_string(&out_file).await.unwrap();
        assert_eq!(content, "null");
    }
}
