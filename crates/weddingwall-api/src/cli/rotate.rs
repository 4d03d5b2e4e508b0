//! One-shot rotation command.
//!
//! Runs the same conveyor step as `GET /api/photo_slide`, which is handy for
//! checking a deployment without the kiosk page.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use weddingwall_core::rotation::service::PollOutcome;

use crate::state::AppState;

/// Advance the slideshow once and report what would be shown.
pub async fn rotate(state: &AppState, output: Option<&Path>, json: bool) -> Result<()> {
    let outcome = state.rotation.poll().await?;

    let action = match &outcome {
        PollOutcome::Rotated(_) => "rotated",
        PollOutcome::Reserved(_) => "unchanged",
        PollOutcome::Empty => "empty",
    };

    if let (Some(path), Some(img)) = (output, outcome.image()) {
        tokio::fs::write(path, &img.bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if json {
        let body = serde_json::json!({
            "action": action,
            "image": outcome.image().map(|img| img.name.to_string()),
            "bytes": outcome.image().map(|img| img.bytes.len()),
            "output": output.map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!();
    match outcome.image() {
        Some(img) => {
            let mark = if matches!(outcome, PollOutcome::Rotated(_)) {
                style("→").green()
            } else {
                style("=").dim()
            };
            println!(
                "  {} {} ({action}, {} bytes)",
                mark,
                style(&img.name).cyan(),
                img.bytes.len()
            );
            if let Some(path) = output {
                println!("  Written to {}", style(path.display()).dim());
            }
        }
        None => println!("  {}", style("No image available to display").yellow()),
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use weddingwall_infra::config::LineCredentials;
    use weddingwall_types::config::WallConfig;

    fn state_for(base: &Path) -> AppState {
        let mut config = WallConfig::default();
        config.storage.base_dir = base.to_path_buf();
        let credentials = LineCredentials {
            channel_secret: SecretString::from("secret"),
            access_token: SecretString::from("token"),
            missing: Vec::new(),
        };
        AppState::build(config, credentials).unwrap()
    }

    #[tokio::test]
    async fn test_rotate_writes_output_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("before")).unwrap();
        std::fs::write(tmp.path().join("before").join("a.jpg"), b"AAA").unwrap();
        let state = state_for(tmp.path());
        let out = tmp.path().join("out.jpg");

        rotate(&state, Some(&out), true).await.unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), b"AAA");
        assert!(tmp.path().join("displaying").join("a.jpg").is_file());
    }

    #[tokio::test]
    async fn test_rotate_on_empty_store_succeeds_without_output() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_for(tmp.path());
        let out = tmp.path().join("out.jpg");

        rotate(&state, Some(&out), false).await.unwrap();
        assert!(!out.exists());
    }
}
