use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use clap::Args;
use solvesphere_application::Dashboard;
use solvesphere_core::module::AppMode;
use solvesphere_core::secret::CredentialGate;
use solvesphere_core::solve::{InlineImage, SolutionResult};
use solvesphere_core::view::ViewState;
use solvesphere_infrastructure::{FileCredentialGate, FileHistoryRepository};
use solvesphere_interaction::GeminiReasoningClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Args)]
pub struct SolveArgs {
    /// Catalog module id (see `solvesphere modules`)
    #[arg(long, default_value = "academic-solver")]
    pub module: String,
    /// Problem statement text
    #[arg(long)]
    pub input: Option<String>,
    /// Path to a problem image attached to the solve
    #[arg(long)]
    pub image: Option<PathBuf>,
    /// Augment the solve with search grounding
    #[arg(long)]
    pub search: bool,
    /// Display name that keys the history storage
    #[arg(long, default_value = "you")]
    pub user: String,
    /// Dashboard mode (student or business)
    #[arg(long, default_value = "student", value_parser = super::parse_mode)]
    pub mode: AppMode,
    /// Write the rendered visual (visual modules) to this file
    #[arg(long)]
    pub save_visual: Option<PathBuf>,
}

pub async fn run(args: SolveArgs) -> Result<()> {
    if args.input.is_none() && args.image.is_none() {
        bail!("provide --input text or an --image to solve");
    }

    let gate = Arc::new(FileCredentialGate::new()?);
    if !gate.has_credential().await {
        println!("No API credential configured.");
        println!("Run `solvesphere credential init` and add your Gemini API key.");
        return Ok(());
    }

    let client = Arc::new(GeminiReasoningClient::try_from_secret()?);
    let repository = Arc::new(FileHistoryRepository::new()?);
    let dashboard = Arc::new(Dashboard::new(client, repository, gate).await);

    dashboard.login(&args.user, args.mode).await;
    dashboard.select_module(&args.module).await?;
    let is_visual = dashboard.selected_module().await.is_visual();

    if let Some(path) = &args.image {
        dashboard.attach_image(Some(load_image(path)?)).await;
    }
    if let Some(input) = args.input {
        dashboard.set_input(input).await;
    }
    dashboard.set_use_search(args.search).await;

    // Ctrl-C cancels the in-flight solve; a cancelled solve exits silently.
    tokio::select! {
        _ = dashboard.submit() => {}
        _ = tokio::signal::ctrl_c() => {
            dashboard.cancel().await;
        }
    }

    match dashboard.view().await {
        // Cancelled: silent return to the input state, no error banner.
        ViewState::Input => return Ok(()),
        ViewState::Result { error: Some(message), .. } => {
            bail!("{message}");
        }
        _ => {}
    }

    let Some(active) = dashboard.current().await else {
        return Ok(());
    };
    print_result(&active.result);

    if is_visual {
        wait_for_visual(&dashboard, &active.history_id, args.save_visual.as_deref()).await?;
    }

    Ok(())
}

/// Waits for the pipelined schematic render and optionally saves it.
async fn wait_for_visual(
    dashboard: &Arc<Dashboard>,
    item_id: &str,
    save_to: Option<&Path>,
) -> Result<()> {
    println!();
    println!("Rendering visual...");

    let mut visual = None;
    for _ in 0..300 {
        let history = dashboard.history().await;
        if let Some(item) = history.iter().find(|item| item.id == item_id) {
            if let Some(image) = &item.result.visual {
                visual = Some(image.clone());
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    let Some(image) = visual else {
        println!("No visual was produced.");
        return Ok(());
    };

    match save_to {
        Some(path) => {
            let bytes = BASE64_STANDARD
                .decode(&image.data)
                .context("visual payload is not valid base64")?;
            std::fs::write(path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Visual ({}) saved to {}", image.mime_type, path.display());
        }
        None => {
            println!(
                "Visual generated ({}, {} bytes base64). Pass --save-visual to keep it.",
                image.mime_type,
                image.data.len()
            );
        }
    }

    Ok(())
}

/// Reads an image file into an inline payload.
fn load_image(path: &Path) -> Result<InlineImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mime_type = mime_guess::from_path(path).first_or_octet_stream().to_string();
    Ok(InlineImage::new(mime_type, BASE64_STANDARD.encode(bytes)))
}

/// Prints the structured sections of one result.
pub fn print_result(result: &SolutionResult) {
    println!("== Analysis ==");
    println!("{}", result.analysis);
    println!();
    println!("== Logical Steps ==");
    for (index, step) in result.steps.iter().enumerate() {
        println!("{}. {}", index + 1, step);
    }
    println!();
    println!("== The Solution ==");
    println!("{}", result.solution);
    println!();
    println!("== Recommendations ==");
    println!("{}", result.recommendations);

    if !result.diagram_nodes.is_empty() {
        println!();
        println!("== Diagram Nodes ==");
        for node in &result.diagram_nodes {
            println!("- {}: {}", node.label, node.description);
        }
    }

    if !result.links.is_empty() {
        println!();
        println!("== Grounding Sources ==");
        for link in &result.links {
            println!("- {} ({})", link.title, link.uri);
        }
    }
}
