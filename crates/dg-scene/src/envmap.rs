use std::path::Path;

use anyhow::{Context, Result};
use dg_core::color::Rgb;

use crate::math::Vec3;

/// Environment map équirectangulaire, échantillonnée par direction.
///
/// Deux variantes : une texture chargée depuis le disque, ou un ciel
/// procédural (dégradé + disque solaire) pour tourner sans aucun asset.
///
/// # Example
/// ```
/// use dg_scene::envmap::EnvMap;
/// use dg_scene::math::Vec3;
/// let env = EnvMap::procedural();
/// let zenith = env.sample(Vec3::new(0.0, 1.0, 0.0));
/// let nadir = env.sample(Vec3::new(0.0, -1.0, 0.0));
/// assert_ne!(zenith, nadir);
/// ```
pub enum EnvMap {
    /// Texture équirectangulaire RGBA8, row-major, origine en haut.
    Image {
        /// Pixels RGBA.
        data: Vec<u8>,
        /// Largeur en pixels.
        width: u32,
        /// Hauteur en pixels.
        height: u32,
    },
    /// Ciel procédural : dégradé vertical chaud/froid avec soleil.
    Procedural,
}

/// Direction du soleil procédural — même position que la point light de la
/// scène, pour que le highlight et le disque coïncident.
const SUN_DIR: Vec3 = Vec3::new(10.0, 6.0, -10.0);

impl EnvMap {
    /// Charge une texture équirectangulaire (PNG/JPEG) depuis le disque.
    ///
    /// # Errors
    /// Retourne une erreur si l'image ne peut pas être chargée ou décodée.
    ///
    /// # Example
    /// ```no_run
    /// use dg_scene::envmap::EnvMap;
    /// use std::path::Path;
    /// let env = EnvMap::load(Path::new("sky.png")).unwrap();
    /// ```
    pub fn load(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("Impossible de charger {}", path.display()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::info!(
            "Environment map chargée : {} ({width}×{height})",
            path.display()
        );
        Ok(Self::Image {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Ciel procédural par défaut.
    #[must_use]
    pub fn procedural() -> Self {
        Self::Procedural
    }

    /// Échantillonne la couleur dans la direction unitaire `dir`.
    ///
    /// Mapping équirectangulaire : u depuis l'azimut (atan2), v depuis
    /// l'inclinaison (acos de y). Nearest sampling — le quantizer aval rend
    /// tout filtrage invisible.
    #[inline(always)]
    #[must_use]
    pub fn sample(&self, dir: Vec3) -> Rgb {
        match self {
            Self::Image {
                data,
                width,
                height,
            } => {
                let u = 0.5 + dir.z.atan2(dir.x) / (2.0 * std::f32::consts::PI);
                let v = dir.y.clamp(-1.0, 1.0).acos() / std::f32::consts::PI;
                let x = ((u * (*width as f32)) as u32).min(width.saturating_sub(1));
                let y = ((v * (*height as f32)) as u32).min(height.saturating_sub(1));
                let idx = ((y * width + x) * 4) as usize;
                if idx + 2 >= data.len() {
                    return Rgb::BLACK;
                }
                Rgb::from_u8(data[idx], data[idx + 1], data[idx + 2])
            }
            Self::Procedural => sample_procedural(dir),
        }
    }
}

/// Dégradé ciel/sol avec disque solaire, même gamme que l'éclairage de la
/// scène (ciel chaud 0xFFFFCC, sol cyan 0x19BBDC).
#[inline(always)]
fn sample_procedural(dir: Vec3) -> Rgb {
    let sky = Rgb::from_hex(0xFFFFCC);
    let ground = Rgb::from_hex(0x19BBDC);
    let t = 0.5 * (dir.y + 1.0);
    let mut color = ground.lerp(sky, t * t * (3.0 - 2.0 * t));

    let to_sun = SUN_DIR.normalized();
    let facing = dir.normalized().dot(to_sun);
    if facing > 0.995 {
        color = Rgb::from_hex(0xFFFF99);
    } else if facing > 0.97 {
        // halo doux autour du disque
        let halo = (facing - 0.97) / 0.025;
        color = color.lerp(Rgb::from_hex(0xFFFF99), halo);
    }
    color.clamped()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_sky_is_warm_up_cool_down() {
        let env = EnvMap::procedural();
        let up = env.sample(Vec3::new(0.0, 1.0, 0.0));
        let down = env.sample(Vec3::new(0.0, -1.0, 0.0));
        // zenith leans warm (r ≥ b), ground leans cyan (b > r)
        assert!(up.r >= up.b);
        assert!(down.b > down.r);
    }

    #[test]
    fn procedural_sun_disc_is_bright() {
        let env = EnvMap::procedural();
        let sun = env.sample(SUN_DIR.normalized());
        assert_eq!(sun.to_u8(), (0xFF, 0xFF, 0x99));
    }

    #[test]
    fn image_sampling_maps_poles_to_rows() {
        // 2×2 texture: top row red, bottom row blue
        let data = vec![
            255, 0, 0, 255, 255, 0, 0, 255, // row 0
            0, 0, 255, 255, 0, 0, 255, 255, // row 1
        ];
        let env = EnvMap::Image {
            data,
            width: 2,
            height: 2,
        };
        let up = env.sample(Vec3::new(0.0, 1.0, 0.0));
        let down = env.sample(Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(up.to_u8(), (255, 0, 0));
        assert_eq!(down.to_u8(), (0, 0, 255));
    }

    #[test]
    fn sampling_is_defined_for_all_axes() {
        let env = EnvMap::procedural();
        for dir in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
        ] {
            let c = env.sample(dir);
            assert!(c.r >= 0.0 && c.r <= 1.0);
            assert!(c.g >= 0.0 && c.g <= 1.0);
            assert!(c.b >= 0.0 && c.b <= 1.0);
        }
    }
}
