use dg_core::color::Rgb;
use dg_core::error::CoreError;
use dg_core::frame::{put_row_pixel, FrameBuffer};
use dg_core::traits::FramePass;
use rayon::prelude::*;

use crate::palette::Palette;

/// Résultat du scan linéaire : première et seconde couleur les plus proches.
#[derive(Clone, Copy)]
struct NearestPair {
    closest: Rgb,
    closest_dist: f32,
    closest_index: usize,
    second: Rgb,
    second_dist: f32,
    second_index: usize,
}

/// Quantizer à palette contrainte avec dither damier sur les quasi-égalités.
///
/// Fonction pure et stateless de (couleur, coordonnées, palette, threshold) :
/// aucune mémoire inter-frame, chaque pixel est indépendant. La palette et le
/// threshold sont figés à la construction; changer l'un ou l'autre demande une
/// nouvelle instance (la boucle de scan est dimensionnée sur N).
///
/// # Example
/// ```
/// use dg_core::color::Rgb;
/// use dg_palette::{Palette, PaletteQuantizer};
/// let p = Palette::new(vec![Rgb::BLACK, Rgb::WHITE]).unwrap();
/// let q = PaletteQuantizer::new(p, 0.03).unwrap();
/// // gris moyen, équidistant : dither, parité paire → noir (index inférieur)
/// assert_eq!(q.quantize(Rgb::new(0.5, 0.5, 0.5), 0, 0), Rgb::BLACK);
/// // parité impaire → blanc
/// assert_eq!(q.quantize(Rgb::new(0.5, 0.5, 0.5), 1, 0), Rgb::WHITE);
/// ```
pub struct PaletteQuantizer {
    palette: Palette,
    threshold: f32,
}

impl PaletteQuantizer {
    /// Construit un quantizer pour une palette et un threshold donnés.
    ///
    /// Le threshold est clampé sur [0, 1]. À 0.0, le dither ne se déclenche
    /// jamais : quantization au plus proche pur.
    ///
    /// # Errors
    /// `CoreError::PaletteTooSmall` — jamais en pratique, `Palette` garantit
    /// déjà N ≥ 2; la vérification reste ici comme précondition explicite.
    pub fn new(palette: Palette, threshold: f32) -> Result<Self, CoreError> {
        if palette.len() < 2 {
            return Err(CoreError::PaletteTooSmall { len: palette.len() });
        }
        Ok(Self {
            palette,
            threshold: threshold.clamp(0.0, 1.0),
        })
    }

    /// La palette configurée.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Le threshold configuré.
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Scan linéaire de la palette, sémantique du shader de référence.
    ///
    /// Les distances initiales valent 1.0 — sentinelle « infinie » héritée du
    /// shader (les vraies distances restent ≤ sqrt(3)). Comparaison `<=`, pas
    /// `<` : une égalité exacte promeut toujours l'entrée scannée le plus
    /// tard. Les deux détails sont contractuels, ne pas « simplifier ».
    #[inline(always)]
    fn scan(&self, color: Rgb) -> NearestPair {
        let colors = self.palette.colors();
        let mut pair = NearestPair {
            closest: colors[0],
            closest_dist: 1.0,
            closest_index: 0,
            second: colors[1],
            second_dist: 1.0,
            second_index: 0,
        };

        for (i, &entry) in colors.iter().enumerate() {
            let d = color.distance(entry);
            if d <= pair.closest_dist {
                pair.second_index = pair.closest_index;
                pair.second_dist = pair.closest_dist;
                pair.second = pair.closest;
                pair.closest_index = i;
                pair.closest_dist = d;
                pair.closest = entry;
            } else if d <= pair.second_dist {
                pair.second_index = i;
                pair.second_dist = d;
                pair.second = entry;
            }
        }
        pair
    }

    /// Quantize un pixel. `(x, y)` en convention fragment : origine verticale
    /// en bas de l'image; seule la parité de `x + y` est consommée.
    ///
    /// Sortie toujours opaque côté frame (alpha géré par l'écriture buffer).
    #[inline(always)]
    #[must_use]
    pub fn quantize(&self, color: Rgb, x: u32, y: u32) -> Rgb {
        let pair = self.scan(color);

        if (pair.closest_dist - pair.second_dist).abs() < self.threshold {
            // Les deux candidates sont quasi équidistantes : damier stable,
            // ordonné par index de palette (pas par distance).
            let even = (x + y) % 2 == 0;
            let (a, b) = if pair.closest_index < pair.second_index {
                (pair.closest, pair.second)
            } else {
                (pair.second, pair.closest)
            };
            if even {
                a
            } else {
                b
            }
        } else {
            pair.closest
        }
    }

    /// `true` si la règle de dither se déclencherait pour cette couleur.
    ///
    /// Indépendant des coordonnées — seule la paire de distances compte.
    #[inline]
    #[must_use]
    pub fn is_ambiguous(&self, color: Rgb) -> bool {
        let pair = self.scan(color);
        (pair.closest_dist - pair.second_dist).abs() < self.threshold
    }
}

impl FramePass for PaletteQuantizer {
    /// Passe plein-écran : chaque pixel remappé indépendamment, rayon par
    /// ligne, zéro allocation. Les lignes du buffer sont stockées origine en
    /// haut; la parité du dither se calcule en coordonnées fragment, donc y
    /// est retourné avant le calcul.
    fn apply(&self, input: &FrameBuffer, output: &mut FrameBuffer) {
        if input.width != output.width || input.height != output.height {
            log::warn!(
                "quantize: dimensions dépareillées {}×{} → {}×{}, frame ignorée",
                input.width,
                input.height,
                output.width,
                output.height
            );
            return;
        }

        let width = input.width;
        let height = input.height;
        let stride = input.stride();

        output
            .data
            .par_chunks_exact_mut(stride)
            .zip(input.data.par_chunks_exact(stride))
            .enumerate()
            .for_each(|(row, (out_row, in_row))| {
                let y = height - 1 - row as u32;
                for x in 0..width {
                    let idx = (x * 4) as usize;
                    let c = Rgb::from_u8(in_row[idx], in_row[idx + 1], in_row[idx + 2]);
                    put_row_pixel(out_row, x, self.quantize(c, x, y));
                }
            });
    }

    fn name(&self) -> &'static str {
        "palette-quantize"
    }
}
