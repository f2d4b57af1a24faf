use dg_core::color::{parse_hex, Rgb};
use dg_core::error::CoreError;

/// Palette ordonnée de couleurs de quantization.
///
/// La taille est figée à la construction — la boucle de scan du quantizer est
/// bornée par cette taille, changer de N demande une nouvelle instance.
/// L'ordre des entrées ne compte que pour le tie-break du dither, pas pour la
/// sémantique de « plus proche ».
///
/// # Example
/// ```
/// use dg_palette::Palette;
/// let p = Palette::from_hex_strs(&["#000000".into(), "#FFFFFF".into()]).unwrap();
/// assert_eq!(p.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Palette {
    colors: Box<[Rgb]>,
}

impl Palette {
    /// Construit une palette depuis des couleurs déjà parsées.
    ///
    /// # Errors
    /// `CoreError::PaletteTooSmall` si moins de 2 entrées — l'algorithme
    /// traque explicitement une première ET une seconde couleur.
    pub fn new(colors: Vec<Rgb>) -> Result<Self, CoreError> {
        if colors.len() < 2 {
            return Err(CoreError::PaletteTooSmall { len: colors.len() });
        }
        Ok(Self {
            colors: colors.into_boxed_slice(),
        })
    }

    /// Construit une palette depuis des chaînes hex `#rrggbb`.
    ///
    /// # Errors
    /// Erreur de parsing hex, ou `PaletteTooSmall` si moins de 2 entrées.
    ///
    /// # Example
    /// ```
    /// use dg_palette::Palette;
    /// assert!(Palette::from_hex_strs(&["#000000".into()]).is_err());
    /// ```
    pub fn from_hex_strs(strs: &[String]) -> Result<Self, CoreError> {
        let colors = strs
            .iter()
            .map(|s| parse_hex(s))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Les entrées, dans l'ordre de scan.
    #[inline(always)]
    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Nombre d'entrées N (≥ 2).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Toujours `false` — une palette valide a au moins 2 entrées.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Palette nommée, built-in, cyclable au runtime.
pub struct PalettePreset {
    /// Nom affiché dans la barre de statut.
    pub name: &'static str,
    /// Couleurs hex, dans l'ordre de scan.
    pub colors: &'static [&'static str],
}

/// Presets built-in. Le premier est la palette de référence.
pub const PRESETS: &[PalettePreset] = &[
    PalettePreset {
        name: "glass",
        colors: &[
            "#000000", "#FFFFFF", "#BADBDC", "#E209AC", "#8B4ED5", "#BAD0DC", "#60DBFB", "#C800FF",
        ],
    },
    PalettePreset {
        name: "mono",
        colors: &["#000000", "#FFFFFF"],
    },
    PalettePreset {
        name: "gameboy",
        colors: &["#0F380F", "#306230", "#8BAC0F", "#9BBC0F"],
    },
    PalettePreset {
        name: "cga",
        colors: &["#000000", "#55FFFF", "#FF55FF", "#FFFFFF"],
    },
    PalettePreset {
        name: "grayscale",
        colors: &["#000000", "#555555", "#AAAAAA", "#FFFFFF"],
    },
];

impl PalettePreset {
    /// Cherche un preset par nom (insensible à la casse).
    ///
    /// # Example
    /// ```
    /// use dg_palette::PalettePreset;
    /// assert!(PalettePreset::find("GameBoy").is_some());
    /// assert!(PalettePreset::find("vaporwave").is_none());
    /// ```
    #[must_use]
    pub fn find(name: &str) -> Option<&'static PalettePreset> {
        PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Construit la `Palette` du preset.
    ///
    /// # Errors
    /// Jamais en pratique — les presets built-in sont valides; l'erreur est
    /// propagée pour garder une API uniforme.
    pub fn to_palette(&self) -> Result<Palette, CoreError> {
        let strs: Vec<String> = self.colors.iter().map(|s| (*s).to_string()).collect();
        Palette::from_hex_strs(&strs)
    }
}
