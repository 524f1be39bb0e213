//! A mounted journey scene.
//!
//! [`Scene`] is the host shell around the timeline: it owns one driver, one
//! camera rig and one cue dispatcher for the lifetime of a mounted view,
//! wires them together each frame, and is the only place that talks to the
//! [`SessionStore`].

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::{CameraPose, CameraRig};
use crate::config::SceneConfig;
use crate::cue::{AudioEngine, CueDispatcher, CueReport, DeviceProvider};
use crate::error::Result;
use crate::geometry::Path;
use crate::session::{keys, SessionStore};
use crate::timeline::{Frame, TimelineDriver, TimelineEvent};
use crate::waypoint::Waypoint;

/// Everything produced for one rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub timeline: Frame,
    pub camera: CameraPose,
    pub cues: CueReport,
}

/// One mounted journey.
#[derive(Debug)]
pub struct Scene<S: SessionStore> {
    driver: TimelineDriver,
    camera: CameraRig,
    cues: CueDispatcher,
    session: S,
    rng: StdRng,
}

impl<S: SessionStore> Scene<S> {
    /// Mounts a scene over a prebuilt path.
    ///
    /// Audio stays locked until [`Scene::on_user_gesture`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the driver
    /// rejects the path.
    pub fn mount(
        path: Path,
        config: &SceneConfig,
        provider: Box<dyn DeviceProvider>,
        session: S,
    ) -> Result<Self> {
        config.validate()?;
        let driver = TimelineDriver::new(path, config.driver)?;
        let camera = CameraRig::new(config.camera)?;

        let mut audio = AudioEngine::new(provider);
        audio.set_muted(session.flag(keys::AUDIO_MUTED));

        let rng = match config.shake_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        tracing::info!(
            "[scene] mounted with {} waypoints, path length {:.1}",
            driver.path().waypoint_count(),
            driver.path().length()
        );

        Ok(Self {
            driver,
            camera,
            cues: CueDispatcher::new(audio),
            session,
            rng,
        })
    }

    /// Builds the path from `waypoints` using `config.path`, then mounts.
    ///
    /// # Errors
    ///
    /// Returns path construction errors as well as those of [`Scene::mount`].
    pub fn from_waypoints(
        waypoints: Vec<Waypoint>,
        config: &SceneConfig,
        provider: Box<dyn DeviceProvider>,
        session: S,
    ) -> Result<Self> {
        let path = Path::builder(waypoints).config(&config.path).build()?;
        Self::mount(path, config, provider, session)
    }

    #[must_use]
    pub fn driver(&self) -> &TimelineDriver {
        &self.driver
    }

    #[must_use]
    pub fn cues(&self) -> &CueDispatcher {
        &self.cues
    }

    #[must_use]
    pub fn session(&self) -> &S {
        &self.session
    }

    /// First click or scroll: the platform now allows audio output.
    pub fn on_user_gesture(&mut self) {
        self.cues.audio_mut().unlock();
    }

    /// Mutes or unmutes cue audio and remembers the choice.
    pub fn set_muted(&mut self, muted: bool) {
        self.cues.audio_mut().set_muted(muted);
        if muted {
            self.session.set(keys::AUDIO_MUTED, "true");
        } else {
            self.session.remove(keys::AUDIO_MUTED);
        }
    }

    /// Advances one frame at `progress`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::GeometryError::ParameterOutOfRange`] if
    /// `progress` is outside `[0, 1]`; nothing is updated in that case.
    pub fn frame(&mut self, progress: f64) -> Result<SceneFrame> {
        let timeline = self.driver.update(progress)?;

        let intensity = timeline.threshold_intensity;
        let shake = self.camera.config().shake;
        let camera = self
            .camera
            .update(&timeline.position, &timeline.orientation, intensity)
            .shaken(shake, intensity, &mut self.rng);

        let cues = self.cues.dispatch(&timeline, self.driver.path().waypoints());

        if timeline
            .events
            .iter()
            .any(|e| matches!(e, TimelineEvent::JourneyComplete { .. }))
        {
            self.session.set(keys::JOURNEY_COMPLETED, "true");
        }

        Ok(SceneFrame {
            timeline,
            camera,
            cues,
        })
    }

    /// Starts the journey over without remounting. Session flags survive.
    ///
    /// # Errors
    ///
    /// See [`TimelineDriver::reset`].
    pub fn restart(&mut self) -> Result<()> {
        self.driver.reset()?;
        self.camera.reset();
        self.cues.reset();
        tracing::debug!("[scene] restarted");
        Ok(())
    }

    /// Tears the scene down, releasing the audio device, and hands the
    /// session store back. Dropping a scene releases the device too.
    pub fn unmount(mut self) -> S {
        self.cues.release();
        tracing::info!("[scene] unmounted");
        self.session
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::cue::{AudioStatus, CueKind, NoAudio, RecordingProvider};
    use crate::session::MemorySessionStore;
    use std::rc::Rc;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn seeded() -> SceneConfig {
        SceneConfig {
            shake_seed: Some(1),
            ..SceneConfig::default()
        }
    }

    fn silent() -> Scene<MemorySessionStore> {
        Scene::mount(
            catalog::solar_path().unwrap(),
            &seeded(),
            Box::new(NoAudio),
            MemorySessionStore::new(),
        )
        .unwrap()
    }

    #[test]
    fn full_solar_journey() {
        init_tracing();
        let provider = RecordingProvider::default();
        let log = Rc::clone(&provider.log);
        let mut store = MemorySessionStore::new();
        let mut scene =
            Scene::mount(catalog::solar_path().unwrap(), &seeded(), Box::new(provider), &mut store)
                .unwrap();

        // Cues before the first gesture are reported but silent.
        let first = scene.frame(0.0).unwrap();
        assert_eq!(first.cues.cues, vec![CueKind::Chime]);
        assert!(log.borrow().is_empty());

        scene.on_user_gesture();
        let mut crossings = 1;
        let mut last = first;
        for i in 1..=600 {
            last = scene.frame(f64::from(i) / 600.0).unwrap();
            crossings += last
                .timeline
                .events
                .iter()
                .filter(|e| e.waypoint_index().is_some())
                .count();
            assert!((last.camera.position - last.timeline.position).norm() > 1.0);
        }
        assert_eq!(crossings, 10);
        assert!(matches!(
            scene.cues().current_display(),
            Some(crate::cue::DisplayPayload::Complete { .. })
        ));
        assert!(last.cues.distortion > 0.99);
        assert!(last.camera.fov_degrees > 114.0);

        let played = log.borrow().clone();
        assert_eq!(played.iter().filter(|c| **c == CueKind::Chime).count(), 8);
        assert_eq!(played.iter().filter(|c| **c == CueKind::Fanfare).count(), 1);
        assert_eq!(played.iter().filter(|c| **c == CueKind::WarpSweep).count(), 1);

        assert!(scene.session().flag(keys::JOURNEY_COMPLETED));
        scene.unmount();
        assert!(store.flag(keys::JOURNEY_COMPLETED));
    }

    #[test]
    fn muted_preference_is_read_at_mount() {
        let mut store = MemorySessionStore::new();
        store.set(keys::AUDIO_MUTED, "true");
        let provider = RecordingProvider::default();
        let log = Rc::clone(&provider.log);
        let mut scene = Scene::mount(
            catalog::solar_path().unwrap(),
            &seeded(),
            Box::new(provider),
            store,
        )
        .unwrap();
        scene.on_user_gesture();
        scene.frame(0.0).unwrap();
        assert!(log.borrow().is_empty());

        scene.set_muted(false);
        scene.frame(0.5).unwrap();
        assert_eq!(*log.borrow(), vec![CueKind::Chime]);
        let store = scene.unmount();
        assert_eq!(store.get(keys::AUDIO_MUTED), None);
    }

    #[test]
    fn audio_failure_does_not_disturb_frames() {
        let mut scene = silent();
        scene.on_user_gesture();
        assert_eq!(scene.cues().audio().status(), AudioStatus::Unavailable);
        let frame = scene.frame(0.95).unwrap();
        assert_eq!(frame.cues.cues, vec![CueKind::Chime, CueKind::WarpSweep]);
    }

    #[test]
    fn restart_replays_the_first_crossing() {
        let mut scene = silent();
        scene.frame(0.0).unwrap();
        scene.frame(0.5).unwrap();
        scene.restart().unwrap();
        let frame = scene.frame(0.0).unwrap();
        assert_eq!(frame.timeline.events, vec![TimelineEvent::WaypointCrossed { index: 0 }]);
    }

    #[test]
    fn dropping_a_mounted_scene_releases_audio() {
        let provider = RecordingProvider::default();
        let log = Rc::clone(&provider.log);
        let mut scene = Scene::mount(
            catalog::solar_path().unwrap(),
            &seeded(),
            Box::new(provider),
            MemorySessionStore::new(),
        )
        .unwrap();
        scene.on_user_gesture();
        assert_eq!(Rc::strong_count(&log), 3);
        drop(scene);
        assert_eq!(Rc::strong_count(&log), 1);
    }

    #[test]
    fn bad_progress_is_reported() {
        let mut scene = silent();
        assert!(scene.frame(-0.5).is_err());
        assert!(scene.frame(0.2).is_ok());
    }

    #[test]
    fn mounts_from_json_waypoints() {
        let waypoints = crate::waypoint::load_json(
            r##"[
                {"name": "A", "position": [0, 0, 0], "scale": 1, "color": "#FFFFFF"},
                {"name": "B", "position": [10, 2, 0], "scale": 1, "color": "#FFFFFF"},
                {"name": "C", "position": [20, 0, 0], "scale": 1, "color": "#FFFFFF"}
            ]"##,
        )
        .unwrap();
        let config =
            SceneConfig::from_json(r#"{"shake_seed": 3, "path": {"samples_per_segment": 16}}"#)
                .unwrap();
        let mut scene =
            Scene::from_waypoints(waypoints, &config, Box::new(NoAudio), MemorySessionStore::new())
                .unwrap();
        let frame = scene.frame(1.0).unwrap();
        assert_eq!(frame.timeline.events[0], TimelineEvent::JourneyComplete { index: 2 });
    }
}
