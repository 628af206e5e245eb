use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use egui::ViewportBuilder;
use image::ImageReader;
use std::sync::Arc;

mod app;
mod config;
mod hn_client;
mod models;
mod search;
mod theme;
mod view;

use crate::app::HackerNewsReaderApp;
use crate::config::Cli;
use crate::hn_client::HackerNewsClient;

fn load_icon(path: &str) -> Result<egui::IconData> {
    let img = ImageReader::open(path)?.decode()?;
    let rgba_image = img.into_rgba8();
    let (width, height) = rgba_image.dimensions();

    Ok(egui::IconData {
        rgba: rgba_image.into_raw(),
        width,
        height,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = config::load_settings(&cli);
    tracing::debug!(?settings, "resolved settings");

    let hn_client = HackerNewsClient::new(&settings).context("failed to build HTTP client")?;

    let mut options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([960.0, 800.0])
            .with_min_inner_size([480.0, 400.0])
            .with_title("Hacker News Top 100"),
        ..Default::default()
    };

    match load_icon("logo/logo.png") {
        Ok(icon) => options.viewport.icon = Some(Arc::new(icon)),
        Err(err) => tracing::warn!("failed to load icon: {err}"),
    }

    eframe::run_native(
        "Hacker News Top 100",
        options,
        Box::new(move |cc| Ok(Box::new(HackerNewsReaderApp::new(&cc.egui_ctx, hn_client)))),
    )
    .map_err(|err| anyhow!("failed to start the UI: {err}"))
}
