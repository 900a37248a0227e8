use super::app_logic::ChooserApp;
use super::app_state::ChooserEvent;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseEventKind};

/// Translate a raw terminal event into a chooser event, if it matters.
pub(super) fn translate_event(raw: Event) -> Option<ChooserEvent> {
    match raw {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            Some(ChooserEvent::Key(key_event))
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(ChooserEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(ChooserEvent::ScrollDown),
            _ => None,
        },
        Event::Resize(width, height) => Some(ChooserEvent::Resize(width, height)),
        _ => None,
    }
}

/// Block until the next terminal event and run it to completion.
pub(super) fn handle_events(app: &mut ChooserApp) -> Result<()> {
    if let Some(chooser_event) = translate_event(event::read()?) {
        app.handle_event(chooser_event);
    }
    Ok(())
}
