use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use dg_core::clock::FrameClock;
use dg_core::config::RenderConfig;
use dg_core::frame::FrameBuffer;
use dg_core::traits::Source;
use dg_scene::{EnvMap, SphereSource};

/// Frames rendues prêtes pour le post-processing.
pub type SceneResult = (Option<Arc<FrameBuffer>>, flume::Receiver<Arc<FrameBuffer>>);

/// Démarre le thread scène : rend la sphère en continu et pousse les frames
/// dans un canal borné. La première frame est rendue de façon synchrone pour
/// que l'app ait toujours quelque chose à afficher.
///
/// Le canal borné (3) fournit la backpressure : si l'affichage prend du
/// retard, le rendu s'aligne dessus au lieu d'empiler des frames.
///
/// # Errors
/// Retourne une erreur si le thread ne peut pas être créé.
pub fn start_scene(
    config: Arc<ArcSwap<RenderConfig>>,
    clock: Arc<FrameClock>,
    env: Arc<EnvMap>,
) -> anyhow::Result<SceneResult> {
    let (frame_tx, frame_rx) = flume::bounded(3);

    let mut source = SphereSource::new(Arc::clone(&config), clock, env);
    let initial_frame = source.next_frame();

    std::thread::Builder::new()
        .name("scene_renderer".into())
        .spawn(move || {
            loop {
                let cur = config.load();
                let target = Duration::from_secs_f64(1.0 / f64::from(cur.target_fps.max(1)));
                drop(cur);

                let start = Instant::now();
                match source.next_frame() {
                    Some(frame) => {
                        if frame_tx.send(frame).is_err() {
                            break; // receiver dropped, app is quitting
                        }
                    }
                    None => {
                        // pool saturé : l'affichage tient encore toutes les
                        // frames, on lui laisse un battement
                        std::thread::sleep(Duration::from_millis(1));
                        continue;
                    }
                }

                let sleep_dur = target.saturating_sub(start.elapsed());
                if !sleep_dur.is_zero() {
                    std::thread::sleep(sleep_dur);
                }
            }
            log::debug!("Thread scène terminé");
        })?;

    Ok((initial_frame, frame_rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_thread_produces_frames() {
        let config = Arc::new(ArcSwap::from_pointee(RenderConfig::default()));
        let clock = Arc::new(FrameClock::new(30));
        let env = Arc::new(EnvMap::procedural());
        let (initial, rx) = start_scene(config, clock, env).unwrap();

        let first = initial.unwrap();
        assert_eq!((first.width, first.height), (128, 128));

        let next = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!((next.width, next.height), (128, 128));
        drop(rx); // thread exits on disconnect
    }
}
