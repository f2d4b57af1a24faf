use std::time::Instant;

/// Lissage : poids du dernier échantillon dans la moyenne mobile.
const ALPHA: f64 = 0.1;

/// Compteur FPS lissé par moyenne mobile exponentielle.
///
/// Un échantillon par frame affichée; l'EMA absorbe le jitter du terminal
/// sans garder d'historique. Zéro allocation.
///
/// # Example
/// ```
/// use dg_render::fps::FpsCounter;
/// let mut counter = FpsCounter::new();
/// counter.tick();
/// assert!(counter.fps() >= 0.0);
/// ```
pub struct FpsCounter {
    last: Option<Instant>,
    smoothed_secs: f64,
}

impl FpsCounter {
    /// Crée un compteur à zéro.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: None,
            smoothed_secs: 0.0,
        }
    }

    /// Appeler une fois par frame, APRÈS le rendu.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last {
            let dt = now.duration_since(last).as_secs_f64();
            self.smoothed_secs = if self.smoothed_secs == 0.0 {
                dt
            } else {
                self.smoothed_secs + ALPHA * (dt - self.smoothed_secs)
            };
        }
        self.last = Some(now);
    }

    /// FPS lissé. 0.0 tant qu'il n'y a pas deux ticks.
    #[must_use]
    pub fn fps(&self) -> f64 {
        if self.smoothed_secs > 0.0 {
            1.0 / self.smoothed_secs
        } else {
            0.0
        }
    }

    /// Durée lissée d'une frame en millisecondes.
    #[must_use]
    pub fn frame_time_ms(&self) -> f64 {
        self.smoothed_secs * 1000.0
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn fps_starts_at_zero() {
        let mut counter = FpsCounter::new();
        assert_eq!(counter.fps(), 0.0);
        counter.tick();
        // a single tick has no interval yet
        assert_eq!(counter.fps(), 0.0);
    }

    #[test]
    fn fps_is_positive_after_two_ticks() {
        let mut counter = FpsCounter::new();
        counter.tick();
        sleep(Duration::from_millis(5));
        counter.tick();
        let fps = counter.fps();
        assert!(fps > 0.0 && fps < 1000.0, "implausible fps {fps}");
        assert!(counter.frame_time_ms() >= 5.0 - 1.0);
    }
}
