// Full-screen chooser: checkbox list, selection text, queue toggle, exec field.
mod app_logic;
mod app_state;
mod event_handler;
mod ui_renderer;

pub use self::run_tui::run_chooser;

// Terminal setup/teardown and the event loop.
mod run_tui {
    use super::app_logic::ChooserApp;
    use super::event_handler::handle_events;
    use super::ui_renderer::ui_frame;
    use crate::selection::ChooserOutcome;
    use anyhow::Result;
    use crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };
    use ratatui::prelude::{CrosstermBackend, Terminal};
    use std::io::{self, Stdout};

    /// Let the user pick from `candidates` and return the picked paths in
    /// list order together with the final queue flag and exec command.
    pub fn run_chooser(
        title: &str,
        candidates: &[String],
        enqueue: bool,
        exec_cmd: &str,
    ) -> Result<ChooserOutcome> {
        let mut app = ChooserApp::new(title, candidates, enqueue, exec_cmd);

        let mut terminal = init_terminal()?;
        let loop_result = run_event_loop(&mut terminal, &mut app);
        restore_terminal(terminal)?;
        loop_result?;

        Ok(app.outcome())
    }

    fn run_event_loop(
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        app: &mut ChooserApp,
    ) -> Result<()> {
        while !app.is_finished() {
            terminal.draw(|frame| ui_frame(frame, app))?;
            handle_events(app)?;
        }
        Ok(())
    }

    fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).map_err(Into::into)
    }

    fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor().map_err(Into::into)
    }
}
