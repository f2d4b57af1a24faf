use crate::math::Vec3;

/// Caméra orbitale en perspective, pointée sur l'origine.
///
/// Équivalent d'un orbit control en auto-rotation : l'azimut avance avec le
/// temps d'animation, l'élévation et la distance viennent de la config. La
/// base orthonormée est recalculée à chaque frame — la caméra est jetable,
/// reconstruite pour chaque rendu.
///
/// # Example
/// ```
/// use dg_scene::camera::OrbitCamera;
/// let cam = OrbitCamera::new(0.0, 0.0, 7.35, 60.0, 1.0);
/// let (origin, dir) = cam.ray(64, 64, 128, 128);
/// // center ray points from the camera toward the origin
/// assert!(dir.dot(-origin.normalized()) > 0.99);
/// ```
pub struct OrbitCamera {
    origin: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    tan_half_fov: f32,
    aspect: f32,
}

impl OrbitCamera {
    /// Construit la caméra pour une pose d'orbite donnée.
    ///
    /// `azimuth` et `elevation` en radians, `fov_deg` = champ de vision
    /// vertical, `aspect` = largeur/hauteur du rendu.
    #[must_use]
    pub fn new(azimuth: f32, elevation: f32, distance: f32, fov_deg: f32, aspect: f32) -> Self {
        let cos_e = elevation.cos();
        let origin = Vec3::new(
            distance * cos_e * azimuth.sin(),
            distance * elevation.sin(),
            distance * cos_e * azimuth.cos(),
        );

        let forward = (-origin).normalized();
        let world_up = Vec3::new(0.0, 1.0, 0.0);
        let mut right = Vec3::new(
            forward.y * world_up.z - forward.z * world_up.y,
            forward.z * world_up.x - forward.x * world_up.z,
            forward.x * world_up.y - forward.y * world_up.x,
        )
        .normalized();
        if right == Vec3::ZERO {
            // caméra au pôle : n'importe quelle base horizontale convient
            right = Vec3::new(1.0, 0.0, 0.0);
        }
        let up = Vec3::new(
            right.y * forward.z - right.z * forward.y,
            right.z * forward.x - right.x * forward.z,
            right.x * forward.y - right.y * forward.x,
        );

        Self {
            origin,
            right,
            up,
            forward,
            tan_half_fov: (fov_deg.to_radians() * 0.5).tan(),
            aspect,
        }
    }

    /// Position de la caméra dans le monde.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Rayon primaire pour le pixel (px, py) d'un rendu width×height.
    ///
    /// py = 0 est la ligne du HAUT du buffer; l'axe NDC vertical est inversé
    /// en conséquence. Le rayon passe par le centre du pixel.
    #[inline(always)]
    #[must_use]
    pub fn ray(&self, px: u32, py: u32, width: u32, height: u32) -> (Vec3, Vec3) {
        let ndc_x = (2.0 * (px as f32 + 0.5) / width as f32 - 1.0) * self.aspect;
        let ndc_y = 1.0 - 2.0 * (py as f32 + 0.5) / height as f32;
        let dir = (self.forward
            + self.right * (ndc_x * self.tan_half_fov)
            + self.up * (ndc_y * self.tan_half_fov))
            .normalized();
        (self.origin, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_orbits_at_constant_distance() {
        for azimuth in [0.0, 1.0, 2.5, -1.2] {
            let cam = OrbitCamera::new(azimuth, 0.14, 7.35, 60.0, 1.0);
            assert!((cam.origin().length() - 7.35).abs() < 1e-4);
        }
    }

    #[test]
    fn center_ray_aims_at_the_origin() {
        let cam = OrbitCamera::new(0.7, 0.3, 10.0, 60.0, 1.0);
        let (origin, dir) = cam.ray(50, 50, 100, 100);
        let to_center = (-origin).normalized();
        assert!(dir.dot(to_center) > 0.999);
    }

    #[test]
    fn vertical_axis_points_up_in_screen_space() {
        let cam = OrbitCamera::new(0.0, 0.0, 7.35, 60.0, 1.0);
        let (_, top) = cam.ray(50, 0, 100, 100);
        let (_, bottom) = cam.ray(50, 99, 100, 100);
        assert!(top.y > bottom.y);
    }

    #[test]
    fn rays_are_unit_length() {
        let cam = OrbitCamera::new(0.4, -0.2, 5.0, 90.0, 2.0);
        for (px, py) in [(0, 0), (99, 0), (0, 99), (99, 99), (50, 50)] {
            let (_, dir) = cam.ray(px, py, 100, 100);
            assert!((dir.length() - 1.0).abs() < 1e-5);
        }
    }
}
