use std::ops::{Add, Mul, Neg, Sub};

/// Vecteur 3D minimal pour le ray tracing de la scène.
///
/// Pas de crate externe : la scène n'a besoin que de produits scalaires,
/// normalisation, réflexion et réfraction.
///
/// # Example
/// ```
/// use dg_scene::math::Vec3;
/// let v = Vec3::new(3.0, 0.0, 4.0);
/// assert!((v.length() - 5.0).abs() < 1e-6);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// Composante x.
    pub x: f32,
    /// Composante y (vertical, vers le haut).
    pub y: f32,
    /// Composante z.
    pub z: f32,
}

impl Vec3 {
    /// Construit un vecteur.
    #[inline(always)]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Vecteur nul.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Produit scalaire.
    #[inline(always)]
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Norme euclidienne.
    #[inline(always)]
    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Vecteur unitaire de même direction. Le vecteur nul reste nul.
    #[inline(always)]
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            return Self::ZERO;
        }
        self * (1.0 / len)
    }

    /// Réflexion de `self` (incident) autour de la normale unitaire `n`.
    ///
    /// # Example
    /// ```
    /// use dg_scene::math::Vec3;
    /// let down = Vec3::new(0.0, -1.0, 0.0);
    /// let up = Vec3::new(0.0, 1.0, 0.0);
    /// assert_eq!(down.reflect(up), up);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn reflect(self, n: Self) -> Self {
        self - n * (2.0 * self.dot(n))
    }

    /// Réfraction de Snell. `self` incident unitaire, `n` normale unitaire
    /// orientée vers l'incident, `eta` = n1/n2.
    ///
    /// `None` en réflexion totale interne.
    #[inline(always)]
    #[must_use]
    pub fn refract(self, n: Self, eta: f32) -> Option<Self> {
        let cos_i = (-self.dot(n)).clamp(-1.0, 1.0);
        let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
        if sin2_t > 1.0 {
            return None;
        }
        let cos_t = (1.0 - sin2_t).sqrt();
        Some(self * eta + n * (eta * cos_i - cos_t))
    }

    /// Interpolation linéaire composante par composante.
    #[inline(always)]
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, k: f32) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}
