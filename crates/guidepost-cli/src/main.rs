//! Guidepost CLI: browse, upload and inspect analyzed photos.
//!
//! Service URLs come from GUIDEPOST_UPLOAD_URL and GUIDEPOST_ANALYSIS_URL.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use guidepost_api_client::{ApiClient, FileImageSource, HttpImageRepository, ImageRepository};
use guidepost_cli::{health_report, init_tracing, visible_results};
use guidepost_ui::{encode_detail_route, DetailController, GridController, RefreshOutcome};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "guidepost", about = "Guidepost photo analysis CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List analysis results
    List {
        /// Keep only results whose keywords, description, text or filename contain this
        #[arg(long)]
        search: Option<String>,
    },
    /// Get the analysis of one image
    Get {
        /// Image ID
        id: String,
    },
    /// Upload an image for analysis
    Upload {
        /// Path to the image file
        file: PathBuf,
    },
    /// Download a stored image
    Image {
        /// Image ID
        id: String,
        /// Where to write the bytes
        #[arg(long)]
        output: PathBuf,
    },
    /// Check both services
    Health,
    /// Print the detail-screen route for an image
    Route {
        /// Image ID
        id: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let client = ApiClient::from_env().context(
        "Failed to create API client. Check GUIDEPOST_UPLOAD_URL and GUIDEPOST_ANALYSIS_URL",
    )?;
    let repository = Arc::new(HttpImageRepository::new(client));

    let cli = Cli::parse();

    match cli.command {
        Commands::List { search } => {
            let grid = GridController::new(repository).await;
            if let Some(text) = search {
                grid.update_search_text(text);
            }
            print_json(&visible_results(&grid.state())?)?;
        }
        Commands::Get { id } => {
            let detail = DetailController::new(repository);
            if detail.refresh_analysis(&id).await == RefreshOutcome::Failed {
                let state = detail.state();
                bail!("{}", state.error_message.unwrap_or_default());
            }
            print_json(&detail.state().analysis_result)?;
        }
        Commands::Upload { file } => {
            let grid = GridController::new(repository).await;
            grid.upload_image(&FileImageSource::new(file)).await;
            let state = grid.state();
            if let Some(error) = &state.upload_error {
                bail!("Upload failed: {}", error);
            }
            print_json(&serde_json::json!({
                "success": state.upload_success,
                "analysisResults": visible_results(&state)?,
            }))?;
        }
        Commands::Image { id, output } => {
            let bytes = repository.fetch_image_data(&id).await?;
            tokio::fs::write(&output, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!(image_id = %id, size = bytes.len(), "Image written");
            print_json(&serde_json::json!({
                "imageId": id,
                "output": output,
                "size": bytes.len(),
            }))?;
        }
        Commands::Health => {
            let health = repository.check_health().await;
            print_json(&health_report(&health))?;
        }
        Commands::Route { id } => {
            let result = repository.fetch_analysis(&id).await?;
            print_json(&serde_json::json!({ "route": encode_detail_route(&result) }))?;
        }
    }

    Ok(())
}
