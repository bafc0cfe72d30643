use crate::model::{GameState, Scene};
use crate::playback::LaunchOutcome;
use crate::trajectory::Landing;
use std::time::Instant;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PlayerAction {
    SelectParam(i32),
    Nudge(i32),
    Launch,
    Clear,
    TogglePassword,
    Login,
    EditUsername,
    UsernameChar(char),
    UsernameBackspace,
    UsernameDone,
    HelpToggle,
    Back,
    Quit,
}

const LOCKED: &str = "Locked while the shot is in the air";

impl GameState {
    pub(crate) fn apply(&mut self, action: PlayerAction, now: Instant) {
        match action {
            PlayerAction::SelectParam(delta) => {
                self.selected = self.selected.step(delta);
            }
            PlayerAction::Nudge(delta) => {
                if self.playback.is_playing() {
                    self.status = Some(LOCKED.to_string());
                    return;
                }
                self.controls = self.controls.nudged(self.selected, delta);
            }
            PlayerAction::Launch => {
                if self.playback.launch(&self.controls, now) == LaunchOutcome::Started {
                    self.status = None;
                }
            }
            PlayerAction::Clear => {
                if self.playback.clear() {
                    self.status = Some("Password cleared".to_string());
                } else {
                    self.status = Some(LOCKED.to_string());
                }
            }
            PlayerAction::TogglePassword => {
                if self.playback.is_playing() {
                    self.status = Some(LOCKED.to_string());
                    return;
                }
                self.playback.session_mut().toggle_password_visibility();
            }
            PlayerAction::Login => {
                let report = self.session().login();
                info!(
                    username = %report.username,
                    password_len = report.password.len(),
                    "login requested"
                );
                self.scene = Scene::LoginReport(report);
            }
            PlayerAction::EditUsername => self.scene = Scene::EditUsername,
            PlayerAction::UsernameChar(ch) => self.playback.session_mut().push_username_char(ch),
            PlayerAction::UsernameBackspace => self.playback.session_mut().pop_username_char(),
            PlayerAction::UsernameDone => self.scene = Scene::Main,
            PlayerAction::HelpToggle => {
                self.scene = match self.scene {
                    Scene::Help => Scene::Main,
                    _ => Scene::Help,
                };
            }
            PlayerAction::Back => self.scene = Scene::Main,
            PlayerAction::Quit => {}
        }
    }

    /// Drives the in-flight animation, if any.
    pub(crate) fn tick(&mut self, now: Instant) {
        if let Some(landing) = self.playback.tick(now) {
            self.status = Some(match landing {
                Landing::Letter(c) => format!("Landed on '{c}'"),
                Landing::OffTarget => "Missed: no letter this time".to_string(),
            });
        }
    }
}
