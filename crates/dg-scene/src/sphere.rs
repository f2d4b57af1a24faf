use std::sync::Arc;

use arc_swap::ArcSwap;
use dg_core::clock::FrameClock;
use dg_core::color::Rgb;
use dg_core::config::RenderConfig;
use dg_core::frame::{put_row_pixel, FrameBuffer};
use dg_core::traits::Source;
use rayon::prelude::*;

use crate::camera::OrbitCamera;
use crate::envmap::EnvMap;
use crate::math::Vec3;

/// Rayon de la sphère de verre.
const SPHERE_RADIUS: f32 = 2.0;
/// Fond : clear color blanc.
const BACKGROUND: Rgb = Rgb::WHITE;
/// Lumière hémisphérique, ciel chaud.
const HEMI_SKY: u32 = 0xFF_FFCC;
/// Lumière hémisphérique, sol cyan.
const HEMI_GROUND: u32 = 0x19_BBDC;
/// Point light jaune pâle.
const SUN_COLOR: u32 = 0xFF_FF99;
/// Position de la point light.
const SUN_POS: Vec3 = Vec3::new(10.0, 6.0, -10.0);

/// Source procédurale : sphère de verre environment-mappée en orbite.
///
/// Évalue la scène analytiquement par pixel avec `rayon`, une ligne par tâche.
/// Zéro allocation en hot path : les frames viennent d'un pool pré-alloué
/// recyclé via `Arc::strong_count`. Le temps d'animation vient de la
/// `FrameClock` partagée — une pose par frame affichée, figée en pause.
pub struct SphereSource {
    width: u32,
    height: u32,
    pool: Vec<Arc<FrameBuffer>>,
    config: Arc<ArcSwap<RenderConfig>>,
    clock: Arc<FrameClock>,
    env: Arc<EnvMap>,
}

impl SphereSource {
    /// Crée la source aux dimensions de rendu de la config courante.
    #[must_use]
    pub fn new(
        config: Arc<ArcSwap<RenderConfig>>,
        clock: Arc<FrameClock>,
        env: Arc<EnvMap>,
    ) -> Self {
        let cur = config.load();
        let (width, height) = (cur.width, cur.height);
        drop(cur);
        let pool = (0..4)
            .map(|_| Arc::new(FrameBuffer::new(width, height)))
            .collect();
        Self {
            width,
            height,
            pool,
            config,
            clock,
            env,
        }
    }
}

impl Source for SphereSource {
    fn next_frame(&mut self) -> Option<Arc<FrameBuffer>> {
        // Zero-alloc : chercher un slot libre dans le pool pré-alloué
        let free_idx = self
            .pool
            .iter()
            .position(|a| Arc::strong_count(a) == 1)
            .unwrap_or(0);
        let fb = Arc::get_mut(&mut self.pool[free_idx])?;

        let cur = self.config.load();
        let time = self.clock.pos_secs() as f32;
        let azimuth = cur.camera_azimuth + time * cur.orbit_speed;

        let camera = OrbitCamera::new(
            azimuth,
            cur.camera_elevation,
            cur.camera_distance,
            cur.camera_fov,
            self.width as f32 / self.height as f32,
        );
        let shell_radius = SPHERE_RADIUS * cur.outline_scale;
        let shader = SphereShader {
            env: &self.env,
            ior: cur.ior,
            env_intensity: cur.env_intensity,
        };

        let width = self.width;
        let stride = (width * 4) as usize;

        fb.data
            .par_chunks_exact_mut(stride)
            .enumerate()
            .for_each(|(py, row)| {
                for px in 0..width {
                    let (origin, dir) = camera.ray(px, py as u32, width, self.height);
                    let color = if let Some(t) = intersect_sphere(origin, dir, SPHERE_RADIUS) {
                        shader.shade(origin + dir * t, dir)
                    } else if intersect_sphere(origin, dir, shell_radius).is_some() {
                        // coque silhouette : back-face noire agrandie
                        Rgb::BLACK
                    } else {
                        BACKGROUND
                    };
                    put_row_pixel(row, px, color);
                }
            });

        Some(Arc::clone(&self.pool[free_idx]))
    }

    fn native_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_live(&self) -> bool {
        true
    }
}

/// Intersection rayon/sphère centrée à l'origine. Retourne le t d'entrée
/// (> 0) le plus proche, ou `None`.
#[inline(always)]
fn intersect_sphere(origin: Vec3, dir: Vec3, radius: f32) -> Option<f32> {
    let b = origin.dot(dir);
    let c = origin.dot(origin) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t > 0.0).then_some(t)
}

/// Paramètres de shading figés pour une frame.
struct SphereShader<'a> {
    env: &'a EnvMap,
    ior: f32,
    env_intensity: f32,
}

impl SphereShader<'_> {
    /// Shading stylisé du verre : mix Fresnel réflexion/réfraction sur
    /// l'environment map, hémisphérique + point light, assombrissement de
    /// la tranche en incidence rasante.
    #[inline(always)]
    fn shade(&self, hit: Vec3, dir: Vec3) -> Rgb {
        let n = hit.normalized();
        let cos_i = (-dir.dot(n)).max(0.0);

        // Schlick
        let f0 = ((self.ior - 1.0) / (self.ior + 1.0)).powi(2);
        let fresnel = f0 + (1.0 - f0) * (1.0 - cos_i).powi(5);

        let refl_dir = dir.reflect(n);
        let reflection = self
            .env
            .sample(refl_dir)
            .scale(self.env_intensity)
            .clamped();
        // TIR retombe sur la réflexion
        let refraction = match dir.refract(n, 1.0 / self.ior) {
            Some(t) => self.env.sample(t),
            None => reflection,
        };
        let base = refraction.lerp(reflection, fresnel.clamp(0.0, 1.0));

        // hémisphérique : sol cyan → ciel chaud selon la normale
        let ambient =
            Rgb::from_hex(HEMI_GROUND).lerp(Rgb::from_hex(HEMI_SKY), 0.5 * (n.y + 1.0));
        let to_sun = (SUN_POS - hit).normalized();
        let diffuse = n.dot(to_sun).max(0.0);
        let sun = Rgb::from_hex(SUN_COLOR);

        let lighting = Rgb::WHITE
            .scale(0.45)
            .add(ambient.scale(0.35))
            .add(sun.scale(0.5 * diffuse));
        let specular = refl_dir.dot(to_sun).max(0.0).powi(32);

        let mut color = base.mul(lighting).add(Rgb::WHITE.scale(0.6 * specular));

        // tranche sombre en incidence rasante, raccord avec la coque
        let rim = ((0.18 - cos_i) / 0.18).clamp(0.0, 1.0);
        color = color.lerp(Rgb::BLACK, rim);

        color.clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Arc<ArcSwap<RenderConfig>> {
        let config = RenderConfig {
            orbit_speed: 0.0,
            camera_elevation: 0.0,
            ..RenderConfig::default()
        };
        Arc::new(ArcSwap::from_pointee(config))
    }

    fn render_one(config: &Arc<ArcSwap<RenderConfig>>) -> Arc<FrameBuffer> {
        let clock = Arc::new(FrameClock::new(30));
        let env = Arc::new(EnvMap::procedural());
        let mut source = SphereSource::new(Arc::clone(config), clock, env);
        source.next_frame().unwrap()
    }

    #[test]
    fn intersect_misses_and_hits() {
        let origin = Vec3::new(0.0, 0.0, 7.35);
        let toward = Vec3::new(0.0, 0.0, -1.0);
        let away = Vec3::new(0.0, 0.0, 1.0);
        let t = intersect_sphere(origin, toward, SPHERE_RADIUS).unwrap();
        assert!((t - 5.35).abs() < 1e-4);
        assert!(intersect_sphere(origin, away, SPHERE_RADIUS).is_none());
        // grazing wide miss
        let side = Vec3::new(1.0, 0.0, 0.0);
        assert!(intersect_sphere(origin, side, SPHERE_RADIUS).is_none());
    }

    #[test]
    fn corners_are_background_white() {
        let config = test_config();
        let frame = render_one(&config);
        assert_eq!(frame.pixel(0, 0), (255, 255, 255, 255));
        assert_eq!(frame.pixel(127, 127), (255, 255, 255, 255));
    }

    #[test]
    fn center_hits_the_sphere() {
        let config = test_config();
        let frame = render_one(&config);
        let center = frame.pixel(64, 64);
        assert_ne!((center.0, center.1, center.2), (255, 255, 255));
        assert_eq!(center.3, 255);
    }

    #[test]
    fn silhouette_shell_renders_black() {
        // Angular radius of the sphere is asin(2/7.35) ≈ 15.8°, the shell
        // extends to asin(2.2/7.35) ≈ 17.4°. Pixel 97 on the center row sits
        // at ≈16.8° off-axis with a 60° vertical fov: shell only.
        let config = test_config();
        let frame = render_one(&config);
        assert_eq!(frame.pixel(97, 64), (0, 0, 0, 255));
    }

    #[test]
    fn paused_clock_renders_identical_frames() {
        let config = test_config();
        let clock = Arc::new(FrameClock::new(30));
        let env = Arc::new(EnvMap::procedural());
        let mut source = SphereSource::new(Arc::clone(&config), clock, env);
        let a = source.next_frame().unwrap();
        let b = source.next_frame().unwrap();
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn pool_hands_out_distinct_buffers_while_held() {
        let config = test_config();
        let clock = Arc::new(FrameClock::new(30));
        let env = Arc::new(EnvMap::procedural());
        let mut source = SphereSource::new(Arc::clone(&config), clock, env);
        let a = source.next_frame().unwrap();
        let b = source.next_frame().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
