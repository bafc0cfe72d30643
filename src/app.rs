use crate::config::{
    load_settings, project_paths, save_settings_atomic, Paths, Settings, SettingsSource,
};
use crate::controls::Controls;
use crate::input::{collect_input_nonblocking, map_event_to_action};
use crate::logging;
use crate::model::GameState;
use crate::render::{draw_frame, Terminal};
use crate::sim::PlayerAction;
use crate::ticker::pace_frame;
use crate::Args;
use anyhow::Context;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub(crate) struct App {
    /// What goes back to disk; CLI overrides never land here.
    stored: Settings,
    /// `stored` plus this run's CLI overrides.
    settings: Settings,
    state: GameState,
    paths: Paths,
    term: Terminal,
    should_quit: bool,
}

impl App {
    fn init(args: Args) -> anyhow::Result<Self> {
        let paths = project_paths()?;
        let (stored, source) = load_settings(&paths.settings_path);
        let settings = run_settings(&stored, &args);
        logging::init(&paths.log_path, &settings.log_level)?;

        let path = paths.settings_path.display();
        match source {
            SettingsSource::File => info!(path = %path, "settings loaded"),
            SettingsSource::Missing => info!(path = %path, "no settings file, using defaults"),
            SettingsSource::Corrupt(error) => {
                warn!(path = %path, %error, "ignoring unreadable settings, using defaults")
            }
        }

        let defaults = Controls::default();
        let controls = Controls::new(
            args.power.unwrap_or(defaults.power() as i64),
            args.gravity.unwrap_or(defaults.gravity() as i64),
            args.scale.unwrap_or(defaults.scale() as i64),
        )
        .context("invalid starting controls")?;

        let state = GameState::new(controls, settings.show_password, settings.clamped_fps());
        let term = Terminal::begin()?;

        Ok(Self {
            stored,
            settings,
            state,
            paths,
            term,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_secs_f32(1.0 / self.settings.clamped_fps() as f32);

        while !self.should_quit {
            let frame_start = Instant::now();
            self.term.resize_if_needed()?;

            let events = collect_input_nonblocking(frame_dt)?;
            for ev in events {
                let Some(action) = map_event_to_action(&self.state.scene, ev) else {
                    continue;
                };
                if action == PlayerAction::Quit {
                    self.should_quit = true;
                    break;
                }
                self.state.apply(action, Instant::now());
            }

            self.state.tick(Instant::now());

            draw_frame(
                &mut self.term.cur,
                &mut self.term.canvas,
                &self.state,
                &self.settings,
            );
            self.term.present()?;

            pace_frame(frame_dt, frame_start);
        }
        Ok(())
    }

    /// Stops any flight in progress, restores the terminal and keeps the
    /// visibility preference for next time.
    fn shutdown(&mut self) -> anyhow::Result<()> {
        self.state.playback.teardown();
        self.term.end()?;

        let out = persisted(&self.stored, self.state.session().show_password());
        save_settings_atomic(&self.paths.settings_path, &out)?;
        info!("settings saved");
        Ok(())
    }
}

/// Layers this run's CLI flags over the stored settings.
fn run_settings(stored: &Settings, args: &Args) -> Settings {
    let mut s = stored.clone();
    if let Some(level) = &args.log_level {
        s.log_level = level.clone();
    }
    if let Some(fps) = args.fps {
        s.fps_cap = fps;
    }
    if args.ascii {
        s.enable_braille = false;
    }
    if args.no_color {
        s.enable_color = false;
    }
    s
}

/// The settings written on exit: as loaded, with only the visibility
/// preference updated.
fn persisted(stored: &Settings, show_password: bool) -> Settings {
    Settings {
        show_password,
        ..stored.clone()
    }
}

pub(crate) fn run(args: Args) -> anyhow::Result<()> {
    let mut app = App::init(args)?;
    let result = app.run();
    if let Err(e) = &result {
        warn!(error = %e, "main loop failed");
    }
    app.shutdown()?;
    result
}
