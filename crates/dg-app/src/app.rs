use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use dg_core::clock::FrameClock;
use dg_core::config::RenderConfig;
use dg_core::frame::FrameBuffer;
use dg_core::traits::FramePass;
use dg_palette::{Palette, PaletteQuantizer, PRESETS};
use dg_render::canvas;
use dg_render::fps::FpsCounter;
use dg_render::ui::{self, StatusInfo, STATUS_HEIGHT};
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;

/// Application state.
///
/// # Example
/// ```
/// use dg_app::app::AppState;
/// let state = AppState::Running;
/// assert!(matches!(state, AppState::Running));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppState {
    /// L'application est en cours d'exécution normale.
    Running,
    /// Pause : orbite gelée, rendu continue sur la même pose.
    Paused,
    /// Overlay d'aide affiché (touche ?).
    Help,
    /// Fermeture de l'application au prochain tour de boucle.
    Quitting,
}

/// Clé de reconstruction du quantizer : la palette et le threshold sont figés
/// par instance, tout changement demande une nouvelle instance.
type QuantizerKey = (Vec<String>, u32);

/// Contexte applicatif explicite : tout l'état process-wide vit ici, passé à
/// la boucle de rendu — pas de globals de module.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Config courante (lecture via arc-swap depuis tous les threads).
    pub config: Arc<ArcSwap<RenderConfig>>,
    /// Horloge d'animation partagée avec le thread scène.
    pub clock: Arc<FrameClock>,
    /// Dernière frame rendue par la scène.
    pub current_frame: Option<Arc<FrameBuffer>>,
    /// Frame quantizée, pré-allouée, réutilisée chaque frame.
    pub quantized: FrameBuffer,
    /// Récepteur de frames depuis le thread scène.
    pub frame_rx: flume::Receiver<Arc<FrameBuffer>>,
    /// Compteur FPS.
    pub fps_counter: FpsCounter,
    quantizer: PaletteQuantizer,
    quantizer_key: QuantizerKey,
    preset_idx: usize,
    palette_name: String,
}

impl App {
    /// Construit l'application à partir de la config résolue.
    ///
    /// # Errors
    /// Retourne une erreur si la palette configurée est invalide — précondition
    /// de construction, on échoue tôt plutôt que de dégrader en silence.
    pub fn new(
        config: Arc<ArcSwap<RenderConfig>>,
        clock: Arc<FrameClock>,
        frame_rx: flume::Receiver<Arc<FrameBuffer>>,
    ) -> Result<Self> {
        let cur = config.load_full();
        let palette = Palette::from_hex_strs(&cur.palette_colors)
            .context("Palette invalide dans la configuration")?;
        let threshold = cur.effective_threshold();
        let quantizer =
            PaletteQuantizer::new(palette, threshold).context("Construction du quantizer")?;
        let quantizer_key = (cur.palette_colors.clone(), threshold.to_bits());
        let (preset_idx, palette_name) = match find_preset(&cur.palette_colors) {
            Some((i, name)) => (i, name.to_string()),
            None => (0, "custom".to_string()),
        };

        Ok(Self {
            state: AppState::Running,
            quantized: FrameBuffer::new(cur.width, cur.height),
            config,
            clock,
            current_frame: None,
            frame_rx,
            fps_counter: FpsCounter::new(),
            quantizer,
            quantizer_key,
            preset_idx,
            palette_name,
        })
    }

    /// Boucle principale : une frame affichée par tick de `target_fps`, input
    /// poll entre les frames. Le corps de frame est non-bloquant et
    /// n'accumule aucun état — une frame manquée est simplement sautée.
    ///
    /// # Errors
    /// Propage les erreurs du terminal (draw/poll).
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut last_frame = Instant::now();

        loop {
            if self.state == AppState::Quitting {
                break;
            }

            let config_guard = self.config.load();
            let frame_duration = Duration::from_secs_f64(1.0 / f64::from(config_guard.target_fps));
            drop(config_guard);

            let now = Instant::now();
            let elapsed = now - last_frame;

            if elapsed < frame_duration {
                // Dormir le temps restant, mais rester réactif aux événements
                let remaining = frame_duration.saturating_sub(elapsed);
                if event::poll(remaining)? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }
            last_frame = now;

            // === Polling événements non-bloquant ===
            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }

            // === Lire frame scène (non-bloquant) ===
            if let Ok(frame) = self.frame_rx.try_recv() {
                self.current_frame = Some(frame);
            }

            // === Reconstruire le quantizer si palette/threshold ont changé ===
            self.refresh_quantizer();

            // === Post-process : quantization palette ===
            if let Some(frame) = self.current_frame.clone() {
                if (self.quantized.width, self.quantized.height) != (frame.width, frame.height) {
                    self.quantized = FrameBuffer::new(frame.width, frame.height);
                }
                self.quantizer.apply(&frame, &mut self.quantized);
            }

            terminal.draw(|f| self.draw(f))?;

            self.clock.advance();
            self.fps_counter.tick();
        }

        Ok(())
    }

    /// Resynchronise le quantizer et l'horloge avec la config courante.
    ///
    /// Un rechargement avec une palette invalide garde l'ancien quantizer —
    /// on log, on ne crash pas en plein rendu.
    pub fn refresh_quantizer(&mut self) {
        let cur = self.config.load();
        self.clock.set_frame_rate(cur.target_fps);

        let threshold = cur.effective_threshold();
        let key = (cur.palette_colors.clone(), threshold.to_bits());
        if key == self.quantizer_key {
            return;
        }

        match Palette::from_hex_strs(&cur.palette_colors)
            .and_then(|p| PaletteQuantizer::new(p, threshold))
        {
            Ok(q) => {
                self.quantizer = q;
                self.quantizer_key = key;
                if let Some((i, name)) = find_preset(&cur.palette_colors) {
                    self.preset_idx = i;
                    self.palette_name = name.to_string();
                } else {
                    self.palette_name = "custom".to_string();
                }
            }
            Err(e) => log::warn!("Palette rechargée invalide, quantizer conservé : {e}"),
        }
    }

    /// Dessine la frame quantizée + la barre de statut + l'aide éventuelle.
    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let area = frame.area();
        let cur = self.config.load();
        let show_status = cur.show_status && !cur.fullscreen && area.height > STATUS_HEIGHT;

        let canvas_area = if show_status {
            Rect {
                height: area.height - STATUS_HEIGHT,
                ..area
            }
        } else {
            area
        };
        let target = canvas::centered_square(canvas_area);
        canvas::render_frame(frame.buffer_mut(), target, &self.quantized);

        if show_status {
            let status_area = Rect {
                y: area.y + area.height - STATUS_HEIGHT,
                height: STATUS_HEIGHT,
                ..area
            };
            let info = StatusInfo {
                fps: self.fps_counter.fps(),
                palette_name: &self.palette_name,
                palette_len: self.quantizer.palette().len(),
                threshold: cur.threshold,
                dither: cur.dither,
                paused: self.state == AppState::Paused,
            };
            ui::draw_status(frame, status_area, &info);
        }

        if self.state == AppState::Help {
            ui::draw_help(frame, area);
        }
    }

    /// Traite un événement terminal.
    pub fn handle_event(&mut self, ev: &Event) {
        match ev {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        // L'aide capture tout sauf quit
        if self.state == AppState::Help {
            match key.code {
                KeyCode::Char('q') => self.state = AppState::Quitting,
                _ => {
                    // retour à l'état d'avant l'aide, la pause est dans l'horloge
                    self.state = if self.clock.is_paused() {
                        AppState::Paused
                    } else {
                        AppState::Running
                    };
                }
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.state = AppState::Quitting,
            KeyCode::Char('?') => self.state = AppState::Help,
            KeyCode::Char(' ') => self.toggle_pause(),
            KeyCode::Char('d') => self.mutate_config(|c| c.dither = !c.dither),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.mutate_config(|c| c.threshold += 0.005);
            }
            KeyCode::Char('-') => self.mutate_config(|c| c.threshold -= 0.005),
            KeyCode::Char('p') => self.cycle_preset(1),
            KeyCode::Char('P') => self.cycle_preset(-1),
            KeyCode::Char('s') => self.mutate_config(|c| c.show_status = !c.show_status),
            KeyCode::Left => self.mutate_config(|c| c.camera_azimuth -= 0.1),
            KeyCode::Right => self.mutate_config(|c| c.camera_azimuth += 0.1),
            KeyCode::Up => self.mutate_config(|c| c.camera_elevation += 0.05),
            KeyCode::Down => self.mutate_config(|c| c.camera_elevation -= 0.05),
            _ => {}
        }
    }

    fn toggle_pause(&mut self) {
        self.state = if self.state == AppState::Paused {
            AppState::Running
        } else {
            AppState::Paused
        };
        self.clock.set_paused(self.state == AppState::Paused);
    }

    /// Clone la config courante, applique `f`, clamp, publie.
    fn mutate_config(&self, f: impl FnOnce(&mut RenderConfig)) {
        let mut new_config = RenderConfig::clone(&self.config.load());
        f(&mut new_config);
        new_config.clamp_all();
        self.config.store(Arc::new(new_config));
    }

    fn cycle_preset(&mut self, step: isize) {
        let len = PRESETS.len() as isize;
        let next = (self.preset_idx as isize + step).rem_euclid(len) as usize;
        self.preset_idx = next;
        let preset = &PRESETS[next];
        self.palette_name = preset.name.to_string();
        self.mutate_config(|c| {
            c.palette_colors = preset.colors.iter().map(|s| (*s).to_string()).collect();
        });
        log::info!("Palette : {}", preset.name);
    }
}

/// Retrouve le preset correspondant à une liste de couleurs (casse libre).
fn find_preset(colors: &[String]) -> Option<(usize, &'static str)> {
    PRESETS.iter().enumerate().find_map(|(i, p)| {
        let matches = p.colors.len() == colors.len()
            && p.colors
                .iter()
                .zip(colors)
                .all(|(a, b)| a.eq_ignore_ascii_case(b));
        matches.then_some((i, p.name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn make_app() -> App {
        let config = Arc::new(ArcSwap::from_pointee(RenderConfig::default()));
        let clock = Arc::new(FrameClock::new(30));
        let (_tx, rx) = flume::bounded(3);
        App::new(config, clock, rx).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn default_palette_resolves_to_glass_preset() {
        let app = make_app();
        assert_eq!(app.palette_name, "glass");
        assert_eq!(app.quantizer.palette().len(), 8);
    }

    #[test]
    fn quit_keys_set_quitting() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.state, AppState::Quitting);

        let mut app = make_app();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn space_toggles_pause_and_clock() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.state, AppState::Paused);
        assert!(app.clock.is_paused());
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.state, AppState::Running);
        assert!(!app.clock.is_paused());
    }

    #[test]
    fn help_closes_on_any_key_but_quits_on_q() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::Help);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state, AppState::Running);

        press(&mut app, KeyCode::Char('?'));
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn closing_help_keeps_the_pause() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::Help);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state, AppState::Paused);
        assert!(app.clock.is_paused());
    }

    #[test]
    fn threshold_keys_are_clamped() {
        let mut app = make_app();
        for _ in 0..500 {
            press(&mut app, KeyCode::Char('+'));
        }
        assert!((app.config.load().threshold - 1.0).abs() < f32::EPSILON);
        for _ in 0..500 {
            press(&mut app, KeyCode::Char('-'));
        }
        assert_eq!(app.config.load().threshold, 0.0);
    }

    #[test]
    fn refresh_rebuilds_quantizer_on_change() {
        let mut app = make_app();
        let before = app.quantizer.threshold();

        let mut new_config = RenderConfig::clone(&app.config.load());
        new_config.threshold = 0.25;
        app.config.store(Arc::new(new_config));
        app.refresh_quantizer();

        assert!((app.quantizer.threshold() - 0.25).abs() < f32::EPSILON);
        assert!((before - 0.03).abs() < f32::EPSILON);
    }

    #[test]
    fn dither_toggle_means_zero_threshold() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('d'));
        app.refresh_quantizer();
        assert_eq!(app.quantizer.threshold(), 0.0);
        press(&mut app, KeyCode::Char('d'));
        app.refresh_quantizer();
        assert!((app.quantizer.threshold() - 0.03).abs() < f32::EPSILON);
    }

    #[test]
    fn preset_cycle_wraps_both_ways() {
        let mut app = make_app();
        assert_eq!(app.preset_idx, 0);
        press(&mut app, KeyCode::Char('P'));
        assert_eq!(app.preset_idx, PRESETS.len() - 1);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.preset_idx, 0);
        app.refresh_quantizer();
        assert_eq!(app.palette_name, "glass");
    }

    #[test]
    fn invalid_reloaded_palette_keeps_old_quantizer() {
        let mut app = make_app();
        let mut new_config = RenderConfig::clone(&app.config.load());
        new_config.palette_colors = vec!["#zzzzzz".to_string(), "#000000".to_string()];
        app.config.store(Arc::new(new_config));
        app.refresh_quantizer();
        // old 8-entry palette still in place
        assert_eq!(app.quantizer.palette().len(), 8);
    }
}
