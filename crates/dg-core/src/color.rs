use crate::error::CoreError;

/// Couleur RGB en intensités normalisées [0.0, 1.0], une par canal.
///
/// Tout le pipeline (scène, quantization, affichage) travaille dans cet
/// espace; la conversion vers u8 n'arrive qu'aux bords (frame buffer, TUI).
///
/// # Example
/// ```
/// use dg_core::color::Rgb;
/// let c = Rgb::new(1.0, 0.5, 0.0);
/// assert_eq!(c.to_u8(), (255, 128, 0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    /// Red channel [0.0, 1.0].
    pub r: f32,
    /// Green channel [0.0, 1.0].
    pub g: f32,
    /// Blue channel [0.0, 1.0].
    pub b: f32,
}

impl Rgb {
    /// Crée une couleur à partir de trois canaux normalisés.
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Noir pur.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// Blanc pur.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Convertit depuis des canaux 8 bits [0, 255].
    ///
    /// # Example
    /// ```
    /// use dg_core::color::Rgb;
    /// let c = Rgb::from_u8(255, 0, 0);
    /// assert!((c.r - 1.0).abs() < f32::EPSILON);
    /// ```
    #[inline]
    #[must_use]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
        }
    }

    /// Convertit vers des canaux 8 bits, clampés sur [0, 255].
    #[inline]
    #[must_use]
    pub fn to_u8(self) -> (u8, u8, u8) {
        (
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
        )
    }

    /// Construit une couleur depuis un entier 0xRRGGBB.
    ///
    /// # Example
    /// ```
    /// use dg_core::color::Rgb;
    /// let magenta = Rgb::from_hex(0xE209AC);
    /// assert_eq!(magenta.to_u8(), (0xE2, 0x09, 0xAC));
    /// ```
    #[inline]
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        Self::from_u8(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Distance euclidienne entre deux couleurs dans l'espace RGB.
    ///
    /// Bornée par sqrt(3) ≈ 1.732 pour des canaux dans [0, 1].
    ///
    /// # Example
    /// ```
    /// use dg_core::color::Rgb;
    /// let d = Rgb::BLACK.distance(Rgb::WHITE);
    /// assert!((d - 3.0f32.sqrt()).abs() < 1e-6);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Multiplie chaque canal par un scalaire.
    #[inline(always)]
    #[must_use]
    pub fn scale(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    /// Somme canal à canal.
    #[inline(always)]
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }

    /// Produit canal à canal (modulation).
    #[inline(always)]
    #[must_use]
    pub fn mul(self, other: Self) -> Self {
        Self::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    /// Interpolation linéaire canal à canal. `t` = 0 retourne `self`.
    #[inline(always)]
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Clamp chaque canal sur [0, 1].
    #[inline(always)]
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }
}

/// Parse une couleur hexadécimale `#rrggbb` ou `rrggbb` (casse libre).
///
/// # Errors
/// Retourne `CoreError::Config` si la chaîne n'est pas un hex RGB valide.
///
/// # Example
/// ```
/// use dg_core::color::parse_hex;
/// let c = parse_hex("#60DBFB").unwrap();
/// assert_eq!(c.to_u8(), (0x60, 0xDB, 0xFB));
/// assert!(parse_hex("not-a-color").is_err());
/// ```
pub fn parse_hex(s: &str) -> Result<Rgb, CoreError> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CoreError::Config(format!(
            "couleur hex invalide : {s} (attendu #rrggbb)"
        )));
    }
    let value = u32::from_str_radix(digits, 16)
        .map_err(|e| CoreError::Config(format!("couleur hex invalide : {s} ({e})")))?;
    Ok(Rgb::from_hex(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_roundtrip() {
        for v in [0u8, 1, 9, 127, 128, 200, 254, 255] {
            let c = Rgb::from_u8(v, v, v);
            assert_eq!(c.to_u8(), (v, v, v), "roundtrip failed for {v}");
        }
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = Rgb::from_hex(0xE209AC);
        let b = Rgb::from_hex(0x60DBFB);
        assert!((a.distance(b) - b.distance(a)).abs() < 1e-7);
        assert_eq!(a.distance(a), 0.0);
    }

    #[test]
    fn to_u8_clamps_out_of_range() {
        let c = Rgb::new(1.5, -0.25, 0.5);
        assert_eq!(c.to_u8(), (255, 0, 128));
    }

    #[test]
    fn parse_hex_accepts_both_forms() {
        assert_eq!(parse_hex("#000000").map(Rgb::to_u8).ok(), Some((0, 0, 0)));
        assert_eq!(
            parse_hex("badbdc").map(Rgb::to_u8).ok(),
            Some((0xBA, 0xDB, 0xDC))
        );
    }

    #[test]
    fn parse_hex_rejects_garbage() {
        assert!(parse_hex("#fff").is_err());
        assert!(parse_hex("#gg0000").is_err());
        assert!(parse_hex("").is_err());
    }
}
