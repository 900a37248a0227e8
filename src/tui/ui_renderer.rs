use super::app_logic::ChooserApp;
use super::app_state::{Focus, LineEdit};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const HELP_TEXT: &str =
    " Space: Toggle | Enter: Pick & Go | Esc: Done | q: Queue | Tab: Focus | Ctrl+C: Cancel ";

fn heading_style() -> Style {
    Style::default().fg(Color::White).bg(Color::Red)
}

fn field_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Black).bg(Color::White)
    } else {
        Style::default().fg(Color::Black).bg(Color::Gray)
    }
}

/// Render `edit` into a one-line `area`, scrolled so the cursor stays in view.
fn draw_line_edit(f: &mut Frame, edit: &LineEdit, area: Rect, focused: bool) {
    let width = area.width as usize;
    if width == 0 {
        return;
    }
    let offset = edit.cursor.saturating_sub(width - 1);
    let visible: String = edit.text.chars().skip(offset).take(width).collect();
    f.render_widget(Paragraph::new(visible).style(field_style(focused)), area);
    if focused {
        f.set_cursor_position((area.x + (edit.cursor - offset) as u16, area.y));
    }
}

fn draw_header_block(f: &mut Frame, app: &ChooserApp, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {} ", app.title), heading_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(6), Constraint::Min(1)])
        .split(inner);
    f.render_widget(Paragraph::new("Exec:"), columns[0]);
    draw_line_edit(f, &app.exec_text, columns[1], app.focus == Focus::Exec);
}

fn draw_main_list_block(f: &mut Frame, app: &mut ChooserApp, area: Rect) {
    app.list_viewport_height = area.height.saturating_sub(2) as usize;
    app.ensure_selection_is_visible_in_viewport();

    let num_rows = app.rows.len();
    let rows_to_render = app
        .rows
        .get(app.scroll_offset..(app.scroll_offset + app.list_viewport_height).min(num_rows))
        .unwrap_or(&[]);

    let list_items: Vec<ListItem> = rows_to_render
        .iter()
        .map(|row| {
            let checkbox = if app.model.is_selected(row.index) {
                "[x] "
            } else {
                "[ ] "
            };
            let zebra = if row.index % 2 == 0 {
                Color::Gray
            } else {
                Color::DarkGray
            };
            ListItem::new(format!("{}{:>3}) {}", checkbox, row.index, row.label))
                .style(Style::default().fg(Color::White).bg(zebra))
        })
        .collect();

    let list_title = format!(
        "Candidates ({} selected of {})",
        app.model.selected_count(),
        num_rows
    );
    let highlight = if app.focus == Focus::List {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::White)
            .bg(Color::Blue)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list_widget = List::new(list_items)
        .block(Block::default().borders(Borders::ALL).title(list_title))
        .highlight_style(highlight)
        .highlight_symbol("❯ ");

    let mut list_state_for_view = ListState::default();
    if app.current_row >= app.scroll_offset
        && app.current_row < app.scroll_offset + app.list_viewport_height
    {
        list_state_for_view.select(Some(app.current_row - app.scroll_offset));
    }
    f.render_stateful_widget(list_widget, area, &mut list_state_for_view);
}

fn draw_footer_block(f: &mut Frame, app: &ChooserApp, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(HELP_TEXT, heading_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(10),
            Constraint::Min(1),
            Constraint::Length(10),
        ])
        .split(inner);
    f.render_widget(Paragraph::new("Selected:"), columns[0]);
    draw_line_edit(f, &app.selected_text, columns[1], app.focus == Focus::Selected);

    let queue_box = if app.model.enqueue { " [x] " } else { " [ ] " };
    let queue_style = if app.focus == Focus::Queue {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    let queue_line = Line::from(vec![
        Span::styled(queue_box, queue_style),
        Span::styled("Q", queue_style.add_modifier(Modifier::UNDERLINED)),
        Span::styled("ueue", queue_style),
    ]);
    f.render_widget(Paragraph::new(queue_line), columns[2]);
}

pub(super) fn ui_frame(frame: &mut Frame, app: &mut ChooserApp) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header_block(frame, app, main_chunks[0]);
    draw_main_list_block(frame, app, main_chunks[1]);
    draw_footer_block(frame, app, main_chunks[2]);
}
