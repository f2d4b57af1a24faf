use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use clap::Parser;
use dg_core::clock::FrameClock;
use dg_core::config::RenderConfig;
use dg_palette::Palette;

pub mod app;
pub mod cli;
pub mod hotreload;
pub mod pipeline;

fn main() -> Result<()> {
    // 1. Arguments CLI
    let cli = cli::Cli::parse();

    // 2. Logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config
    let mut config = resolve_config(&cli)?;

    // 3b. Appliquer les overrides CLI
    if let Some(threshold) = cli.threshold {
        config.threshold = threshold;
    }
    if let Some(fps) = cli.fps {
        config.target_fps = fps;
    }
    if let Some(size) = cli.size {
        config.width = size;
        config.height = size;
    }
    if cli.no_dither {
        config.dither = false;
    }
    if let Some(ref path) = cli.envmap {
        config.envmap = Some(path.clone());
    }
    if let Some(ref palette_arg) = cli.palette {
        config.palette_colors = cli::resolve_palette_arg(palette_arg);
    }
    config.clamp_all();

    // 3c. Valider la palette avant de toucher au terminal
    Palette::from_hex_strs(&config.palette_colors).context("Palette invalide")?;

    let config = Arc::new(ArcSwap::from_pointee(config));

    // 4. Lancer le hot-reload config (thread interne notify)
    let _watcher = hotreload::spawn_config_watcher(&cli.config, &config)?;

    // 5. Charger l'environment map (fichier ou ciel procédural)
    let env = Arc::new(dg_scene::create_env_map(&config.load())?);

    // 6. Démarrer le thread scène
    let clock = Arc::new(FrameClock::new(config.load().target_fps));
    let (initial_frame, frame_rx) = pipeline::start_scene(
        Arc::clone(&config),
        Arc::clone(&clock),
        env,
    )?;

    // 7. Initialiser le terminal ratatui
    let terminal = ratatui::init();

    // 8. Construire l'App
    let mut app_instance = match app::App::new(config, clock, frame_rx) {
        Ok(a) => a,
        Err(e) => {
            ratatui::restore();
            return Err(e);
        }
    };
    app_instance.current_frame = initial_frame;

    // 9. Boucle principale
    let result = app_instance.run(terminal);

    // 10. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    ratatui::restore();

    result
}

/// Charge la config depuis le fichier CLI, ou les défauts si absent.
fn resolve_config(cli: &cli::Cli) -> Result<RenderConfig> {
    if cli.config.exists() {
        dg_core::config::load_config(&cli.config)
            .with_context(|| format!("Lecture de {}", cli.config.display()))
    } else {
        log::warn!(
            "Config {} introuvable, utilisation des défauts",
            cli.config.display()
        );
        Ok(RenderConfig::default())
    }
}
