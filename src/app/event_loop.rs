use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::storage::{CONTENT_KEY, FileStore, KeyValueStore, MemoryStore};
use crate::theme::ThemeController;

impl App {
    /// Run the editor until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the opening file cannot be read, or if terminal
    /// initialization or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let run_scope = crate::perf::scope("app.run.total");

        // Restore state before touching the terminal so read errors print normally.
        let store = self.open_store();
        let content = self.initial_content(store.as_ref())?;
        let mut theme = ThemeController::restore(store.as_ref());
        if let Some(mode) = self.theme {
            theme.set(mode.into());
        }

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - hangeuldown requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let mut model = Model::new(&content, store, theme, (size.width, size.height));
        model.output_dir.clone_from(&self.output_dir);
        model.document_name = self
            .file_path
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned());
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        // An opened file replaces the stored content right away.
        if self.file_path.is_some() {
            model.persist_content();
        }
        if self.theme.is_some() {
            model.persist_theme();
        }
        crate::perf::log_event(
            "init.layout",
            format!(
                "terminal={}x{} preview_w={} theme={}",
                size.width,
                size.height,
                model.viewport.width(),
                model.theme.as_str()
            ),
        );

        let result = execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)
            .map_err(anyhow::Error::from)
            .and_then(|()| Self::event_loop(&mut terminal, &mut model));

        // Restore terminal
        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        drop(run_scope);
        crate::perf::log_summary();
        result
    }

    /// The persistent store, or an in-memory one if the file is unusable.
    fn open_store(&self) -> Box<dyn KeyValueStore> {
        match FileStore::open(&self.storage_path) {
            Ok(store) => Box::new(store),
            Err(err) => {
                tracing::warn!(
                    path = %self.storage_path.display(),
                    error = %err,
                    "store unavailable, changes will not survive a restart"
                );
                Box::new(MemoryStore::new())
            }
        }
    }

    /// The opening file if one was given, else the stored content, else the
    /// welcome document.
    fn initial_content(&self, store: &dyn KeyValueStore) -> Result<String> {
        if let Some(path) = &self.file_path {
            return crate::files::read_document(path);
        }
        match store.get(CONTENT_KEY) {
            Ok(Some(content)) => Ok(content),
            Ok(None) => Ok(crate::document::WELCOME_MARKDOWN.to_string()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored content");
                Ok(crate::document::WELCOME_MARKDOWN.to_string())
            }
        }
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let poll_ms = if needs_render { 0 } else { 250 };
            if event::poll(Duration::from_millis(poll_ms))? {
                if let Some(msg) = Self::handle_event(&event::read()?, model) {
                    crate::perf::log_event(
                        "event.message",
                        format!("frame={frame_idx} msg={msg:?}"),
                    );
                    Self::dispatch(model, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                let mut drained = 0_u32;
                while !model.should_quit && event::poll(Duration::from_millis(0))? {
                    if let Some(msg) = Self::handle_event(&event::read()?, model) {
                        drained += 1;
                        Self::dispatch(model, msg);
                        needs_render = true;
                    }
                }
                if drained > 0 {
                    crate::perf::log_event(
                        "event.drain",
                        format!("frame={frame_idx} drained={drained}"),
                    );
                }
            }

            if model.should_quit {
                break;
            }

            if needs_render {
                frame_idx += 1;

                let prep_start = Instant::now();
                model.ensure_highlight_overscan();
                crate::perf::log_event(
                    "frame.prep",
                    format!(
                        "frame={} prep_ms={:.3} viewport={}..{}",
                        frame_idx,
                        prep_start.elapsed().as_secs_f64() * 1000.0,
                        model.viewport.offset(),
                        model.viewport.offset() + model.viewport.height() as usize,
                    ),
                );

                let draw_start = Instant::now();
                terminal.draw(|frame| Self::view(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0
                    ),
                );
                needs_render = false;
            }
        }
        Ok(())
    }

    /// Apply one message: state transition, then its I/O.
    pub(super) fn dispatch(model: &mut Model, msg: Message) {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(model, &side_msg);
    }
}
