//! Launch playback: one flight at a time, animated over a fixed duration.

use crate::controls::Controls;
use crate::session::Session;
use crate::ticker::FrameTicker;
use crate::trajectory::{judge_landing, Landing, Point, Trajectory};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub(crate) const FLIGHT_DURATION: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Playing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LaunchOutcome {
    Started,
    /// A flight was already in the air; nothing changed.
    Ignored,
}

pub(crate) struct Playback {
    phase: Phase,
    duration: Duration,
    ticker: FrameTicker,
    trajectory: Option<Trajectory>,
    visible: usize,
    session: Session,
}

impl Playback {
    pub(crate) fn new(session: Session, ticker: FrameTicker) -> Self {
        Self::with_duration(session, ticker, FLIGHT_DURATION)
    }

    pub(crate) fn with_duration(session: Session, ticker: FrameTicker, duration: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            duration,
            ticker,
            trajectory: None,
            visible: 0,
            session,
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    #[cfg(test)]
    pub(crate) fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    /// The part of the path flown so far.
    pub(crate) fn visible_path(&self) -> &[Point] {
        match &self.trajectory {
            Some(t) => t.prefix(self.visible),
            None => &[],
        }
    }

    /// Projectile position while in flight.
    pub(crate) fn marker(&self) -> Option<Point> {
        if !self.is_playing() {
            return None;
        }
        self.visible_path().last().copied()
    }

    /// Where the last completed flight came down.
    pub(crate) fn landing_marker(&self) -> Option<Point> {
        if self.is_playing() {
            return None;
        }
        self.trajectory.as_ref().map(Trajectory::landing_point)
    }

    pub(crate) fn launch(&mut self, controls: &Controls, now: Instant) -> LaunchOutcome {
        if self.is_playing() {
            debug!("launch ignored, flight in progress");
            return LaunchOutcome::Ignored;
        }
        let trajectory = Trajectory::from_controls(controls);
        info!(
            power = controls.power(),
            gravity = controls.gravity(),
            scale = controls.scale(),
            "launch"
        );
        self.trajectory = Some(trajectory);
        self.visible = 0;
        self.session.forget_last_letter();
        self.phase = Phase::Playing;
        self.ticker.start(now);
        LaunchOutcome::Started
    }

    /// Advances the animation. Returns the landing once, on the frame that
    /// completes the flight.
    pub(crate) fn tick(&mut self, now: Instant) -> Option<Landing> {
        if !self.is_playing() {
            return None;
        }
        let elapsed = self.ticker.poll(now)?;
        let n = self.trajectory.as_ref().map_or(0, Trajectory::len);
        if n == 0 {
            self.teardown();
            return None;
        }

        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        let current = (progress * (n - 1) as f64).floor() as usize;
        self.visible = current + 1;

        if progress < 1.0 {
            return None;
        }
        Some(self.finish())
    }

    fn finish(&mut self) -> Landing {
        self.ticker.stop();
        self.phase = Phase::Idle;
        let landing = self
            .trajectory
            .as_ref()
            .map_or(Landing::OffTarget, |t| judge_landing(t.landing_point()));
        self.session.record_landing(landing);
        match landing {
            Landing::Letter(c) => info!(letter = %c, "landed on target"),
            Landing::OffTarget => info!("landed off target"),
        }
        landing
    }

    /// Stops an in-flight animation without judging it. The password and
    /// last letter are left exactly as they were, and the unjudged path is
    /// dropped so no landing marker points at it.
    pub(crate) fn teardown(&mut self) {
        if self.ticker.is_running() || self.is_playing() {
            debug!("playback torn down mid-flight");
            self.trajectory = None;
            self.visible = 0;
        }
        self.ticker.stop();
        self.phase = Phase::Idle;
    }

    /// Resets the password and the drawn flight. Refused while playing.
    pub(crate) fn clear(&mut self) -> bool {
        if self.is_playing() {
            return false;
        }
        self.session.clear();
        self.trajectory = None;
        self.visible = 0;
        info!("cleared");
        true
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn playback() -> Playback {
        Playback::new(Session::new(true), FrameTicker::new(ms(16)))
    }

    fn fly(pb: &mut Playback, t0: Instant) -> Option<Landing> {
        let mut out = None;
        for step in 0..=70 {
            if let Some(l) = pb.tick(t0 + ms(step * 16)) {
                assert!(out.is_none(), "landing reported twice");
                out = Some(l);
            }
        }
        out
    }

    #[test]
    fn on_target_flight_appends_letter() {
        let mut pb = playback();
        let t0 = Instant::now();
        let c = Controls::new(66, 40, 40).unwrap();
        assert_eq!(pb.launch(&c, t0), LaunchOutcome::Started);
        assert!(pb.is_playing());

        assert_eq!(fly(&mut pb, t0), Some(Landing::Letter('z')));
        assert_eq!(pb.phase(), Phase::Idle);
        assert_eq!(pb.session().password(), "z");
        assert_eq!(pb.session().last_letter(), Some('z'));
        assert_eq!(pb.visible_path().len(), 201);
        assert_eq!(pb.marker(), None);
        assert!(pb.landing_marker().is_some());
    }

    #[test]
    fn overshoot_leaves_password_alone() {
        let mut pb = playback();
        let t0 = Instant::now();
        pb.launch(&Controls::new(66, 40, 40).unwrap(), t0);
        fly(&mut pb, t0);

        let t1 = t0 + ms(5000);
        pb.launch(&Controls::new(100, 0, 50).unwrap(), t1);
        assert_eq!(pb.session().last_letter(), None);
        assert_eq!(fly(&mut pb, t1), Some(Landing::OffTarget));
        assert_eq!(pb.session().password(), "z");
        assert_eq!(pb.session().last_letter(), None);
    }

    #[test]
    fn prefix_tracks_progress() {
        let mut pb = playback();
        let t0 = Instant::now();
        pb.launch(&Controls::default(), t0);
        assert!(pb.visible_path().is_empty());

        pb.tick(t0);
        assert_eq!(pb.visible_path().len(), 1);

        // 500ms of 1000ms -> index floor(0.5 * 200) = 100
        assert_eq!(pb.tick(t0 + ms(500)), None);
        assert_eq!(pb.visible_path().len(), 101);
        assert_eq!(pb.marker(), pb.visible_path().last().copied());
        assert_eq!(pb.landing_marker(), None);
    }

    #[test]
    fn relaunch_while_playing_is_ignored() {
        let mut pb = playback();
        let t0 = Instant::now();
        pb.launch(&Controls::default(), t0);
        pb.tick(t0 + ms(300));
        let before = pb.trajectory().cloned();

        let other = Controls::new(10, 90, 90).unwrap();
        assert_eq!(pb.launch(&other, t0 + ms(400)), LaunchOutcome::Ignored);
        assert_eq!(pb.trajectory().cloned(), before);

        // elapsed still counts from the first launch
        pb.tick(t0 + ms(500));
        assert_eq!(pb.visible_path().len(), 101);
    }

    #[test]
    fn clear_is_refused_mid_flight_and_idempotent_after() {
        let mut pb = playback();
        let t0 = Instant::now();
        pb.launch(&Controls::new(30, 50, 50).unwrap(), t0);
        assert!(!pb.clear());
        fly(&mut pb, t0);
        assert!(!pb.session().password().is_empty());

        assert!(pb.clear());
        assert!(pb.clear());
        assert_eq!(pb.session().password(), "");
        assert_eq!(pb.session().last_letter(), None);
        assert!(pb.trajectory().is_none());
        assert!(pb.visible_path().is_empty());
        assert_eq!(pb.landing_marker(), None);
    }

    #[test]
    fn teardown_mid_flight_does_not_judge() {
        let mut pb = playback();
        let t0 = Instant::now();
        pb.launch(&Controls::new(66, 40, 40).unwrap(), t0);
        pb.tick(t0 + ms(200));
        pb.teardown();

        assert_eq!(pb.phase(), Phase::Idle);
        assert_eq!(pb.tick(t0 + ms(2000)), None);
        assert_eq!(pb.session().password(), "");
        assert_eq!(pb.session().last_letter(), None);
        assert_eq!(pb.landing_marker(), None);
        assert!(pb.visible_path().is_empty());
    }

    #[test]
    fn teardown_after_landing_keeps_the_landing() {
        let mut pb = playback();
        let t0 = Instant::now();
        pb.launch(&Controls::new(66, 40, 40).unwrap(), t0);
        fly(&mut pb, t0);
        let landed = pb.landing_marker();
        assert!(landed.is_some());

        pb.teardown();
        assert_eq!(pb.landing_marker(), landed);
        assert_eq!(pb.visible_path().len(), 201);
        assert_eq!(pb.session().password(), "z");
    }

    #[test]
    fn late_first_frame_completes_immediately() {
        let mut pb = playback();
        let t0 = Instant::now();
        pb.launch(&Controls::new(0, 0, 1).unwrap(), t0);
        // app stalled; first poll is already past the duration
        assert_eq!(pb.tick(t0 + ms(1500)), Some(Landing::Letter('a')));
        assert_eq!(pb.tick(t0 + ms(1600)), None);
    }

    #[test]
    fn zero_duration_lands_on_first_frame() {
        let mut pb =
            Playback::with_duration(Session::default(), FrameTicker::new(ms(16)), Duration::ZERO);
        let t0 = Instant::now();
        pb.launch(&Controls::new(20, 50, 50).unwrap(), t0);
        assert!(matches!(pb.tick(t0), Some(Landing::Letter(_))));
        assert!(!pb.is_playing());
    }
}
