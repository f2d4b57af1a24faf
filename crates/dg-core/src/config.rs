use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Palette de référence : 8 couleurs, du noir au magenta électrique.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#000000", "#FFFFFF", "#BADBDC", "#E209AC", "#8B4ED5", "#BAD0DC", "#60DBFB", "#C800FF",
];

/// Configuration complète du rendu, hot-rechargeable.
///
/// Sérialisable en TOML (sections `[render]`, `[scene]`, `[palette]`).
/// Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use dg_core::config::RenderConfig;
/// let config = RenderConfig::default();
/// assert_eq!(config.target_fps, 30);
/// assert_eq!(config.palette_colors.len(), 8);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RenderConfig {
    // === Rendu ===
    /// Largeur interne du rendu en pixels.
    pub width: u32,
    /// Hauteur interne du rendu en pixels.
    pub height: u32,
    /// FPS cible de la boucle d'affichage.
    pub target_fps: u32,
    /// Mode plein écran (sans barre de statut).
    pub fullscreen: bool,
    /// Afficher la barre de statut (fps, palette, threshold).
    pub show_status: bool,

    // === Scène ===
    /// Vitesse d'auto-rotation de l'orbite en rad/s.
    pub orbit_speed: f32,
    /// Distance caméra → centre de la sphère.
    pub camera_distance: f32,
    /// Offset d'azimut ajouté à l'auto-rotation, en radians.
    pub camera_azimuth: f32,
    /// Élévation de la caméra en radians.
    pub camera_elevation: f32,
    /// Champ de vision vertical en degrés.
    pub camera_fov: f32,
    /// Indice de réfraction du verre.
    pub ior: f32,
    /// Intensité de l'environment map sur la couche réflexion.
    pub env_intensity: f32,
    /// Facteur d'échelle de la coque silhouette (1.0 = désactivé).
    pub outline_scale: f32,
    /// Chemin optionnel vers une texture équirectangulaire (PNG/JPEG).
    pub envmap: Option<PathBuf>,

    // === Palette ===
    /// Couleurs de la palette, en hex `#rrggbb`. Minimum 2 entrées.
    pub palette_colors: Vec<String>,
    /// Seuil de déclenchement du dither [0.0, 1.0].
    pub threshold: f32,
    /// Activer le dither damier. `false` équivaut à threshold = 0.
    pub dither: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            target_fps: 30,
            fullscreen: false,
            show_status: true,
            orbit_speed: 0.5,
            camera_distance: 7.35,
            camera_azimuth: 0.0,
            camera_elevation: 0.14,
            camera_fov: 60.0,
            ior: 2.5,
            env_intensity: 2.0,
            outline_scale: 1.1,
            envmap: None,
            palette_colors: DEFAULT_PALETTE.iter().map(|s| (*s).to_string()).collect(),
            threshold: 0.03,
            dither: true,
        }
    }
}

impl RenderConfig {
    /// Seuil effectif de dither : 0.0 quand le dither est désactivé.
    #[inline]
    #[must_use]
    pub fn effective_threshold(&self) -> f32 {
        if self.dither {
            self.threshold
        } else {
            0.0
        }
    }

    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.width = self.width.clamp(16, 1024);
        self.height = self.height.clamp(16, 1024);
        self.target_fps = self.target_fps.clamp(5, 120);
        self.orbit_speed = self.orbit_speed.clamp(-5.0, 5.0);
        self.camera_distance = self.camera_distance.clamp(3.0, 50.0);
        self.camera_elevation = self.camera_elevation.clamp(-1.3, 1.3);
        self.camera_fov = self.camera_fov.clamp(20.0, 120.0);
        self.ior = self.ior.clamp(1.0, 4.0);
        self.env_intensity = self.env_intensity.clamp(0.0, 8.0);
        self.outline_scale = self.outline_scale.clamp(1.0, 1.5);
        self.threshold = self.threshold.clamp(0.0, 1.0);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize, Default)]
struct ConfigFile {
    render: Option<RenderSection>,
    scene: Option<SceneSection>,
    palette: Option<PaletteSection>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize, Default)]
struct RenderSection {
    width: Option<u32>,
    height: Option<u32>,
    target_fps: Option<u32>,
    fullscreen: Option<bool>,
    show_status: Option<bool>,
}

/// Scene section of the TOML config, all fields optional.
#[derive(Deserialize, Default)]
struct SceneSection {
    orbit_speed: Option<f32>,
    camera_distance: Option<f32>,
    camera_azimuth: Option<f32>,
    camera_elevation: Option<f32>,
    camera_fov: Option<f32>,
    ior: Option<f32>,
    env_intensity: Option<f32>,
    outline_scale: Option<f32>,
    envmap: Option<PathBuf>,
}

/// Palette section of the TOML config, all fields optional.
#[derive(Deserialize, Default)]
struct PaletteSection {
    colors: Option<Vec<String>>,
    threshold: Option<f32>,
    dither: Option<bool>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use dg_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    let mut config = RenderConfig::default();

    if let Some(r) = file.render {
        if let Some(v) = r.width {
            config.width = v;
        }
        if let Some(v) = r.height {
            config.height = v;
        }
        if let Some(v) = r.target_fps {
            config.target_fps = v;
        }
        if let Some(v) = r.fullscreen {
            config.fullscreen = v;
        }
        if let Some(v) = r.show_status {
            config.show_status = v;
        }
    }

    if let Some(s) = file.scene {
        if let Some(v) = s.orbit_speed {
            config.orbit_speed = v;
        }
        if let Some(v) = s.camera_distance {
            config.camera_distance = v;
        }
        if let Some(v) = s.camera_azimuth {
            config.camera_azimuth = v;
        }
        if let Some(v) = s.camera_elevation {
            config.camera_elevation = v;
        }
        if let Some(v) = s.camera_fov {
            config.camera_fov = v;
        }
        if let Some(v) = s.ior {
            config.ior = v;
        }
        if let Some(v) = s.env_intensity {
            config.env_intensity = v;
        }
        if let Some(v) = s.outline_scale {
            config.outline_scale = v;
        }
        if let Some(v) = s.envmap {
            config.envmap = Some(v);
        }
    }

    if let Some(p) = file.palette {
        if let Some(v) = p.colors {
            config.palette_colors = v;
        }
        if let Some(v) = p.threshold {
            config.threshold = v;
        }
        if let Some(v) = p.dither {
            config.dither = v;
        }
    }

    config.clamp_all();
    log::debug!("Config chargée depuis {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference() {
        let config = RenderConfig::default();
        assert_eq!(config.width, 128);
        assert_eq!(config.height, 128);
        assert!((config.threshold - 0.03).abs() < f32::EPSILON);
        assert!((config.ior - 2.5).abs() < f32::EPSILON);
        assert_eq!(config.palette_colors[0], "#000000");
        assert_eq!(config.palette_colors[1], "#FFFFFF");
    }

    #[test]
    fn effective_threshold_respects_dither_flag() {
        let mut config = RenderConfig::default();
        assert!((config.effective_threshold() - 0.03).abs() < f32::EPSILON);
        config.dither = false;
        assert_eq!(config.effective_threshold(), 0.0);
    }

    #[test]
    fn clamp_all_bounds_everything() {
        let mut config = RenderConfig {
            width: 4,
            height: 100_000,
            target_fps: 500,
            threshold: 3.0,
            ior: 0.1,
            outline_scale: 9.0,
            ..RenderConfig::default()
        };
        config.clamp_all();
        assert_eq!(config.width, 16);
        assert_eq!(config.height, 1024);
        assert_eq!(config.target_fps, 120);
        assert_eq!(config.threshold, 1.0);
        assert_eq!(config.ior, 1.0);
        assert_eq!(config.outline_scale, 1.5);
    }

    #[test]
    fn partial_toml_merges_with_defaults() {
        let content = r##"
            [palette]
            colors = ["#000000", "#FFFFFF"]
            threshold = 0.1

            [render]
            target_fps = 60
        "##;
        let file: ConfigFile = toml::from_str(content).unwrap();
        let mut config = RenderConfig::default();
        if let Some(p) = file.palette {
            if let Some(v) = p.colors {
                config.palette_colors = v;
            }
            if let Some(v) = p.threshold {
                config.threshold = v;
            }
        }
        if let Some(r) = file.render {
            if let Some(v) = r.target_fps {
                config.target_fps = v;
            }
        }
        assert_eq!(config.palette_colors.len(), 2);
        assert!((config.threshold - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.target_fps, 60);
        // untouched fields keep defaults
        assert_eq!(config.width, 128);
        assert!(config.dither);
    }
}
