use crate::color::Rgb;

/// Buffer de pixels réutilisable. Pré-alloué, jamais redimensionné en hot path.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel, origine en haut à
/// gauche. Les passes per-pixel (scène, quantizer) travaillent ligne par ligne
/// sur `data` via des chunks de `stride()` bytes.
///
/// # Example
/// ```
/// use dg_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer pré-alloué aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use dg_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(128, 128);
    /// assert_eq!(fb.data.len(), 128 * 128 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; (width * height * 4) as usize],
            width,
            height,
        }
    }

    /// Stride d'une ligne en bytes.
    #[inline(always)]
    #[must_use]
    pub fn stride(&self) -> usize {
        (self.width * 4) as usize
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    ///
    /// # Example
    /// ```
    /// use dg_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(10, 10);
    /// assert_eq!(fb.pixel(0, 0), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = ((y * self.width + x) * 4) as usize;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Pixel (x, y) en `Rgb` normalisé [0, 1] (alpha ignoré).
    ///
    /// L'entrée 8 bits est bornée par construction, pas de clamp nécessaire.
    #[inline(always)]
    #[must_use]
    pub fn pixel_rgb(&self, x: u32, y: u32) -> Rgb {
        let (r, g, b, _) = self.pixel(x, y);
        Rgb::from_u8(r, g, b)
    }

    /// Écrit un pixel opaque à (x, y).
    ///
    /// # Example
    /// ```
    /// use dg_core::frame::FrameBuffer;
    /// use dg_core::color::Rgb;
    /// let mut fb = FrameBuffer::new(2, 2);
    /// fb.set_pixel(1, 1, Rgb::WHITE);
    /// assert_eq!(fb.pixel(1, 1), (255, 255, 255, 255));
    /// ```
    #[inline(always)]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = ((y * self.width + x) * 4) as usize;
        if idx + 3 >= self.data.len() {
            return;
        }
        let (r, g, b) = color.to_u8();
        self.data[idx] = r;
        self.data[idx + 1] = g;
        self.data[idx + 2] = b;
        self.data[idx + 3] = 255;
    }

    /// Copie les dimensions et le contenu de `other`. No-op si tailles différentes.
    ///
    /// Zero allocation — réutilise le buffer existant.
    #[inline]
    pub fn copy_from(&mut self, other: &FrameBuffer) {
        if self.width == other.width && self.height == other.height {
            self.data.copy_from_slice(&other.data);
        }
    }
}

/// Écrit une couleur opaque dans une ligne déjà découpée (chunk de stride bytes).
///
/// Utilisé par les passes rayon qui itèrent en `par_chunks_exact_mut`.
#[inline(always)]
pub fn put_row_pixel(row: &mut [u8], x: u32, color: Rgb) {
    let idx = (x * 4) as usize;
    let (r, g, b) = color.to_u8();
    row[idx] = r;
    row[idx + 1] = g;
    row[idx + 2] = b;
    row[idx + 3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_roundtrip() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.set_pixel(3, 2, Rgb::from_hex(0x8B4ED5));
        assert_eq!(fb.pixel(3, 2), (0x8B, 0x4E, 0xD5, 255));
        let c = fb.pixel_rgb(3, 2);
        assert_eq!(c.to_u8(), (0x8B, 0x4E, 0xD5));
    }

    #[test]
    fn copy_from_requires_matching_dims() {
        let mut a = FrameBuffer::new(2, 2);
        let mut b = FrameBuffer::new(2, 2);
        b.set_pixel(0, 0, Rgb::WHITE);
        a.copy_from(&b);
        assert_eq!(a.pixel(0, 0), (255, 255, 255, 255));

        let c = FrameBuffer::new(3, 2);
        a.copy_from(&c); // no-op
        assert_eq!(a.pixel(0, 0), (255, 255, 255, 255));
    }

    #[test]
    fn row_writes_match_set_pixel() {
        let mut fb = FrameBuffer::new(4, 2);
        let stride = fb.stride();
        {
            let row = &mut fb.data[stride..2 * stride];
            put_row_pixel(row, 2, Rgb::from_hex(0x60DBFB));
        }
        assert_eq!(fb.pixel(2, 1), (0x60, 0xDB, 0xFB, 255));
    }
}
