use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;

use anyhow::Context;
use clap::Parser;
use overlay_logging::{overlay_debug, overlay_error, overlay_info, overlay_warn};
use thread_jump_core::{update, AppState, Msg, Point, PointerTarget, Viewport};
use thread_jump_engine::{
    ChangeFeed, ChannelChangeSink, ExtractorConfig, LayoutMetrics, MessageExtractor,
    SettingsStore, SubscriptionId,
};

use super::cli::Cli;
use super::effects::{EffectRunner, PageHost};
use super::ui::commands::{parse_command, UserCommand};
use super::ui::constants::PROMPT_HINT;
use super::{logging, persistence, ui};

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, &cli.log_file, cli.log_level());
    overlay_info!("Starting thread-jump for {:?}", cli.page);

    let config = match &cli.config {
        Some(path) => load_extractor_config(path)?,
        None => ExtractorConfig::default(),
    };
    let extractor = MessageExtractor::new(config).context("invalid extractor config")?;
    let (width, height) = cli.viewport;
    let metrics = LayoutMetrics {
        viewport_width: width,
        viewport_height: height,
        ..LayoutMetrics::default()
    };
    let host = PageHost::load(cli.page.clone(), cli.charset.clone(), extractor, metrics)
        .inspect_err(|err| overlay_error!("Failed to load page: {:#}", err))?;
    let store = persistence::open_settings_store(&cli.profile_dir, &cli.page_origin());
    let mut session = OverlaySession::new(host, Box::new(store), Viewport::new(width, height));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{PROMPT_HINT}")?;
    session.show(&mut out)?;
    out.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(command) => {
                if !session.handle(command, &mut out)? {
                    break;
                }
            }
            Err(err) => writeln!(out, "{err}")?,
        }
        out.flush()?;
    }

    session.shutdown();
    overlay_info!("thread-jump finished");
    Ok(())
}

fn load_extractor_config(path: &Path) -> anyhow::Result<ExtractorConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading extractor config {:?}", path))?;
    ExtractorConfig::from_ron(&text).with_context(|| format!("parsing extractor config {:?}", path))
}

/// One overlay installed on one page. Owns everything the overlay needs; no globals.
pub struct OverlaySession {
    state: AppState,
    runner: EffectRunner,
    feed: ChangeFeed,
    subscription: Option<SubscriptionId>,
    msg_rx: mpsc::Receiver<Msg>,
    msg_tx: mpsc::Sender<Msg>,
    viewport: Viewport,
}

impl OverlaySession {
    pub fn new(host: PageHost, store: Box<dyn SettingsStore>, viewport: Viewport) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
        let mut session = Self {
            state: AppState::new(),
            runner: EffectRunner::new(host, store, msg_tx.clone()),
            feed: ChangeFeed::new(),
            subscription: None,
            msg_rx,
            msg_tx,
            viewport,
        };
        session.install();
        session
    }

    /// Adds the toggle and starts listening for page changes. Idempotent.
    fn install(&mut self) {
        self.runner.overlay_mut().install_toggle();
        if self.subscription.is_none() {
            let sink = ChannelChangeSink::new(self.msg_tx.clone(), |_| Msg::DocumentChanged);
            self.subscription = Some(self.feed.subscribe(Box::new(sink)));
        }
    }

    /// Removes the overlay and stops listening. Idempotent.
    pub fn shutdown(&mut self) {
        self.dispatch(Msg::Teardown);
        if let Some(id) = self.subscription.take() {
            self.feed.unsubscribe(id);
        }
    }

    /// Tears the overlay down and builds a fresh toggle.
    pub fn reinit(&mut self) {
        self.shutdown();
        self.install();
        overlay_info!("Overlay re-initialized");
    }

    /// Reloads the page and notifies change subscribers.
    pub fn reload(&mut self) -> anyhow::Result<()> {
        self.runner.host_mut().reload()?;
        self.page_changed();
        Ok(())
    }

    fn page_changed(&mut self) {
        let change = self.feed.publish();
        overlay_debug!("Page revision {}", change.revision);
        self.pump();
    }

    /// Applies `msg` and everything its effects post back, in order.
    pub fn dispatch(&mut self, msg: Msg) {
        self.apply(msg);
        self.pump();
    }

    fn pump(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.apply(msg);
        }
    }

    fn apply(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns false when the session should end.
    pub fn handle(&mut self, command: UserCommand, out: &mut impl Write) -> io::Result<bool> {
        match command {
            UserCommand::Toggle => {
                self.dispatch(Msg::PointerDown {
                    target: PointerTarget::ToggleButton,
                });
                self.dispatch(Msg::ToggleClicked);
            }
            UserCommand::Open => self.dispatch(Msg::OpenRequested),
            UserCommand::Close => self.dispatch(Msg::CloseRequested),
            UserCommand::Escape => self.dispatch(Msg::EscapePressed),
            UserCommand::Frame => {
                if self.runner.take_frame_request() {
                    self.dispatch(Msg::AnimationFrame);
                } else {
                    writeln!(out, "no frame requested")?;
                }
            }
            UserCommand::Tab(category) => self.dispatch(Msg::TabSelected(category)),
            UserCommand::Search(text) => self.dispatch(Msg::SearchChanged(text)),
            UserCommand::Click(row) => {
                let id = self
                    .state
                    .view()
                    .list
                    .rows()
                    .get(row.saturating_sub(1))
                    .map(|found| found.id.clone());
                match id {
                    Some(id) if row > 0 && self.state.is_visible() => {
                        self.dispatch(Msg::PointerDown {
                            target: PointerTarget::Panel,
                        });
                        self.dispatch(Msg::RowClicked(id));
                    }
                    _ => writeln!(out, "no row {row} in the open panel")?,
                }
            }
            UserCommand::Outside => self.dispatch(Msg::PointerDown {
                target: PointerTarget::Page,
            }),
            UserCommand::Drag { dx, dy } => {
                if !self.drag(dx, dy) {
                    writeln!(out, "open the panel before resizing it")?;
                }
            }
            UserCommand::Reload => {
                if let Err(err) = self.reload() {
                    overlay_warn!("Reload failed: {:#}", err);
                    writeln!(out, "reload failed: {err:#}")?;
                }
            }
            UserCommand::Reinit => self.reinit(),
            UserCommand::Show => {
                self.show(out)?;
                return Ok(true);
            }
            UserCommand::Help => writeln!(out, "{PROMPT_HINT}")?,
            UserCommand::Quit => return Ok(false),
        }
        if self.state.consume_dirty() {
            self.show(out)?;
        }
        Ok(true)
    }

    /// Drags the bottom-right resize corner by `(dx, dy)` and releases it.
    fn drag(&mut self, dx: f64, dy: f64) -> bool {
        if !self.state.is_visible() {
            return false;
        }
        let (width, height) = self.state.panel_size();
        let panel = self.state.anchor().place(width, height, self.viewport);
        let grab = Point::new(panel.right() - 1.0, panel.bottom() - 1.0);
        if !panel.in_resize_corner(grab) {
            return false;
        }
        self.dispatch(Msg::ResizeStarted {
            pointer: grab,
            panel,
        });
        self.dispatch(Msg::ResizeMoved {
            pointer: Point::new(grab.x + dx, grab.y + dy),
            viewport: self.viewport,
        });
        self.dispatch(Msg::ResizeEnded);
        true
    }

    pub fn show(&self, out: &mut impl Write) -> io::Result<()> {
        for line in ui::render::render(&self.state.view(), self.runner.overlay(), self.viewport) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}
