//! Scène ditherglass : sphère de verre environment-mappée, rendue en software.

pub mod camera;
pub mod envmap;
pub mod math;
pub mod sphere;

use dg_core::config::RenderConfig;
pub use envmap::EnvMap;
pub use sphere::SphereSource;

/// Fabrique l'environment map selon la config : texture disque si un chemin
/// est fourni, ciel procédural sinon.
///
/// # Errors
/// Retourne une erreur si la texture configurée ne peut pas être chargée.
pub fn create_env_map(config: &RenderConfig) -> anyhow::Result<EnvMap> {
    match &config.envmap {
        Some(path) => EnvMap::load(path),
        None => {
            log::debug!("Pas d'environment map configurée, ciel procédural");
            Ok(EnvMap::procedural())
        }
    }
}
