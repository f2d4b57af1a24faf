use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

/// Horloge d'animation partagée entre la boucle d'affichage et le thread scène.
///
/// La boucle d'affichage est le maître : elle appelle `advance()` une fois par
/// frame affichée (sauf en pause). Le thread scène lit `pos_secs()` pour caler
/// l'angle d'orbite. Une frame manquée est simplement sautée — le temps
/// d'animation ne dépend que des frames réellement affichées.
///
/// Champs atomiques uniquement : partage sans verrou entre les deux threads.
///
/// # Example
/// ```
/// use dg_core::clock::FrameClock;
/// let clock = FrameClock::new(30);
/// clock.advance();
/// assert_eq!(clock.frame_pos(), 1);
/// clock.set_paused(true);
/// clock.advance();
/// assert_eq!(clock.frame_pos(), 1);
/// ```
pub struct FrameClock {
    /// Nombre de frames affichées depuis le démarrage.
    frame_pos: AtomicU64,
    /// Cadence cible en frames par seconde (mise à jour au hot-reload).
    frame_rate: AtomicU32,
    /// `true` si l'animation est gelée (la scène continue de rendre la même pose).
    paused: AtomicBool,
}

impl FrameClock {
    /// Crée une horloge à la cadence donnée.
    #[must_use]
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame_pos: AtomicU64::new(0),
            frame_rate: AtomicU32::new(frame_rate),
            paused: AtomicBool::new(false),
        }
    }

    /// Temps d'animation courant en secondes, dérivé de `frame_pos / frame_rate`.
    #[inline]
    #[must_use]
    pub fn pos_secs(&self) -> f64 {
        let rate = self.frame_rate.load(Ordering::Relaxed);
        if rate == 0 {
            return 0.0;
        }
        self.frame_pos.load(Ordering::Relaxed) as f64 / f64::from(rate)
    }

    /// Position courante en frames.
    #[inline]
    #[must_use]
    pub fn frame_pos(&self) -> u64 {
        self.frame_pos.load(Ordering::Relaxed)
    }

    /// Avance d'une frame. No-op en pause.
    #[inline]
    pub fn advance(&self) {
        if !self.paused.load(Ordering::Relaxed) {
            self.frame_pos.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Met à jour la cadence cible (hot-reload de `target_fps`).
    #[inline]
    pub fn set_frame_rate(&self, rate: u32) {
        self.frame_rate.store(rate, Ordering::Relaxed);
    }

    /// Gèle ou reprend l'avancement du temps d'animation.
    #[inline]
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }

    /// `true` si l'animation est en pause.
    #[inline]
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_basic_operations() {
        let clock = FrameClock::new(30);
        assert_eq!(clock.frame_pos(), 0);
        assert!(!clock.is_paused());

        for _ in 0..30 {
            clock.advance();
        }
        assert!((clock.pos_secs() - 1.0).abs() < 1e-9);

        clock.set_paused(true);
        clock.advance();
        assert_eq!(clock.frame_pos(), 30);

        clock.set_paused(false);
        clock.advance();
        assert_eq!(clock.frame_pos(), 31);
    }

    #[test]
    fn clock_zero_frame_rate() {
        let clock = FrameClock::new(0);
        clock.advance();
        assert_eq!(clock.pos_secs(), 0.0);
    }
}
