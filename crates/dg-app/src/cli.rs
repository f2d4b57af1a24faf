use std::path::PathBuf;

use clap::Parser;
use dg_palette::PalettePreset;

/// ditherglass — Constrained-palette glass sphere for the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Texture équirectangulaire (PNG/JPEG) pour l'environment map.
    #[arg(long)]
    pub envmap: Option<PathBuf>,

    /// Palette : nom de preset (glass, mono, gameboy, cga, grayscale)
    /// ou liste hex séparée par des virgules : "#000000,#FFFFFF,...".
    #[arg(long)]
    pub palette: Option<String>,

    /// Threshold de dither [0.0, 1.0].
    #[arg(long)]
    pub threshold: Option<f32>,

    /// FPS cible de la boucle d'affichage.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Résolution interne carrée du rendu (pixels de côté).
    #[arg(long)]
    pub size: Option<u32>,

    /// Désactiver le dither (quantization au plus proche pur).
    #[arg(long, default_value_t = false)]
    pub no_dither: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Résout `--palette` en liste de chaînes hex.
///
/// Un nom de preset connu gagne; sinon la valeur est découpée sur les
/// virgules et traitée comme une liste hex (validée plus loin à la
/// construction de la `Palette`).
///
/// # Example
/// ```
/// use dg_app::cli::resolve_palette_arg;
/// assert_eq!(resolve_palette_arg("mono").len(), 2);
/// assert_eq!(resolve_palette_arg("#102030,#405060").len(), 2);
/// ```
#[must_use]
pub fn resolve_palette_arg(arg: &str) -> Vec<String> {
    if let Some(preset) = PalettePreset::find(arg) {
        return preset.colors.iter().map(|s| (*s).to_string()).collect();
    }
    arg.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_name_expands() {
        let colors = resolve_palette_arg("GameBoy");
        assert_eq!(colors.len(), 4);
        assert_eq!(colors[0], "#0F380F");
    }

    #[test]
    fn hex_list_splits_and_trims() {
        let colors = resolve_palette_arg(" #000000 , #FFFFFF ,");
        assert_eq!(colors, vec!["#000000".to_string(), "#FFFFFF".to_string()]);
    }
}
