use crate::controls::{Controls, Param};
use crate::playback::Playback;
use crate::session::{LoginReport, Session};
use crate::ticker::FrameTicker;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Main,
    Help,
    EditUsername,
    LoginReport(LoginReport),
}

pub(crate) struct GameState {
    pub(crate) controls: Controls,
    pub(crate) selected: Param,
    pub(crate) playback: Playback,
    pub(crate) scene: Scene,
    /// One-line feedback under the chart, e.g. why an action was refused.
    pub(crate) status: Option<String>,
}

impl GameState {
    pub(crate) fn new(controls: Controls, show_password: bool, fps: u32) -> Self {
        Self {
            controls,
            selected: Param::Power,
            playback: Playback::new(Session::new(show_password), FrameTicker::from_fps(fps)),
            scene: Scene::Main,
            status: None,
        }
    }

    pub(crate) fn session(&self) -> &Session {
        self.playback.session()
    }
}
