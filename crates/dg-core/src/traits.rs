use std::sync::Arc;

use crate::frame::FrameBuffer;

/// Fournit des frames rendues au pipeline.
///
/// Implémenté par : `SphereSource` (et toute autre source procédurale).
///
/// # Example
/// ```
/// use dg_core::traits::Source;
/// use dg_core::frame::FrameBuffer;
/// use std::sync::Arc;
///
/// struct DummySource;
/// impl Source for DummySource {
///     fn next_frame(&mut self) -> Option<Arc<FrameBuffer>> { None }
///     fn native_size(&self) -> (u32, u32) { (0, 0) }
///     fn is_live(&self) -> bool { false }
/// }
/// ```
pub trait Source: Send + 'static {
    /// Retourne la prochaine frame disponible.
    ///
    /// Retourne `None` si aucun buffer n'est libre dans le pool.
    /// Ne bloque JAMAIS.
    fn next_frame(&mut self) -> Option<Arc<FrameBuffer>>;

    /// Dimensions natives de la source.
    fn native_size(&self) -> (u32, u32);

    /// Indique si la source est infinie (procédural) ou finie.
    fn is_live(&self) -> bool;
}

/// Transforme une frame rendue en une frame de sortie, pixel par pixel.
///
/// Une passe de post-processing pure : aucune mémoire inter-frame, chaque
/// pixel est indépendant. Une nouvelle frame remplace simplement la
/// précédente — pas de backpressure ni d'annulation dans la passe.
///
/// # Example
/// ```
/// use dg_core::traits::FramePass;
/// use dg_core::frame::FrameBuffer;
///
/// struct Identity;
/// impl FramePass for Identity {
///     fn apply(&self, input: &FrameBuffer, output: &mut FrameBuffer) {
///         output.copy_from(input);
///     }
///     fn name(&self) -> &'static str { "identity" }
/// }
/// ```
pub trait FramePass: Send + Sync {
    /// Traite `input` et écrit le résultat dans `output`.
    ///
    /// CONTRAT : ne doit PAS allouer. `output` est pré-alloué aux mêmes
    /// dimensions que `input` et réutilisé chaque frame.
    fn apply(&self, input: &FrameBuffer, output: &mut FrameBuffer);

    /// Nom lisible pour le debug/UI.
    fn name(&self) -> &'static str;
}
