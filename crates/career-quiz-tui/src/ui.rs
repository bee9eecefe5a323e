use career_quiz_core::{Region, Resource};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::App;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    if app.view.is_visible(Region::ResultsView) {
        render_results(app, frame, body_area);
    } else if app.view.is_visible(Region::QuestionView) {
        render_question(app, frame, body_area);
    } else {
        render_start(app, frame, body_area);
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let session = app.controller.session();
    let mut spans = vec![Span::styled(
        " Career Quiz ",
        Style::default().fg(Color::Cyan).bold(),
    )];

    if session.is_started() {
        spans.push(Span::raw(format!(" {} ", session.career())));
        spans.push(Span::styled(
            format!(
                "[{} answered, {}/{} correct]",
                session.answers().len(),
                session.correct_count(),
                session.total_questions()
            ),
            Style::default().fg(Color::Gray),
        ));
    }

    let stage = app.view.text(Region::Stage);
    if !stage.is_empty() {
        spans.push(Span::styled(
            format!(" stage: {}", stage),
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        format!("v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::Gray),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut spans: Vec<Span> = Vec::new();
    let mut hint = |key: &'static str, label: &'static str| {
        spans.push(Span::styled(format!(" {} ", key), key_style));
        spans.push(Span::raw(label));
    };

    if app.view.is_visible(Region::StartView) {
        hint("Enter", "start ");
        hint("Esc", "quit ");
    } else {
        if app.view.is_visible(Region::RevealControl) {
            hint("r", "reveal answer ");
        }
        if app.view.is_visible(Region::CorrectControl) {
            hint("y", "I was right ");
        }
        if app.view.is_visible(Region::IncorrectControl) {
            hint("n", "I was wrong ");
        }
        if app.view.is_visible(Region::RetryControl) {
            hint("t", "retry ");
        }
        if app.view.is_visible(Region::ResourcesPanel) || app.view.is_visible(Region::ResultsView) {
            hint("j/k", "select ");
        }
        hint("q", "quit ");
    }

    let (mode_text, mode_style) = if app.is_loading() {
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        (
            format!(" LOADING{:<3} ", dots),
            Style::default().bg(Color::Yellow).fg(Color::Black),
        )
    } else if app.view.is_visible(Region::ResultsView) {
        (" RESULTS ".to_string(), Style::default().bg(Color::Green).fg(Color::Black))
    } else if app.view.is_visible(Region::StartView) {
        (" START ".to_string(), Style::default().bg(Color::Blue).fg(Color::White))
    } else {
        (" QUIZ ".to_string(), Style::default().bg(Color::Blue).fg(Color::White))
    };

    let mut line = vec![Span::styled(mode_text, mode_style)];
    line.extend(spans);
    frame.render_widget(Paragraph::new(Line::from(line)), area);
}

fn render_start(app: &App, frame: &mut Frame, area: Rect) {
    let [_, form_area, notice_area, info_area, _] = Layout::vertical([
        Constraint::Percentage(30),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    let [_, input_area, _] = Layout::horizontal([
        Constraint::Percentage(20),
        Constraint::Percentage(60),
        Constraint::Percentage(20),
    ])
    .areas(form_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Which career are you aiming for? ");
    let input = Paragraph::new(app.career_input.as_str()).block(input_block);
    frame.render_widget(input, input_area);

    // Cursor inside the border
    frame.set_cursor_position((cursor_column(input_area, app.career_cursor), input_area.y + 1));

    let notice = app.view.text(Region::Notice);
    if !notice.is_empty() {
        let notice = Paragraph::new(Span::styled(notice, Style::default().fg(Color::Red)))
            .centered();
        frame.render_widget(notice, notice_area);
    }

    let info = Paragraph::new(Span::styled(
        format!("assessment service: {}", app.server_url),
        Style::default().fg(Color::DarkGray),
    ))
    .centered();
    frame.render_widget(info, info_area);
}

/// Terminal column for a cursor `chars` characters into a bordered input,
/// clamped to the last column inside the border.
fn cursor_column(input_area: Rect, chars: usize) -> u16 {
    let offset = u16::try_from(chars).unwrap_or(u16::MAX);
    let column = input_area.x.saturating_add(1).saturating_add(offset);
    column.min(input_area.right().saturating_sub(2))
}

fn render_question(app: &mut App, frame: &mut Frame, area: Rect) {
    let show_answer = app.view.is_visible(Region::AnswerPanel);
    let show_resources = app.view.is_visible(Region::ResourcesPanel);

    let mut constraints = vec![Constraint::Length(4), Constraint::Min(5)];
    if show_answer {
        constraints.push(Constraint::Length(6));
    }
    if show_resources {
        constraints.push(Constraint::Percentage(40));
    }
    let areas = Layout::vertical(constraints).split(area);

    let message = Paragraph::new(app.view.text(Region::Message).to_string())
        .block(Block::default().borders(Borders::ALL).title(" Coach "))
        .wrap(Wrap { trim: true });
    frame.render_widget(message, areas[0]);

    let question_text = if app.is_loading() && app.controller.question().is_none() {
        Text::from(Span::styled(
            "Waiting for the assessment service...",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
    } else {
        Text::from(app.view.text(Region::Question).to_string())
    };
    let question = Paragraph::new(question_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Question "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(question, areas[1]);

    let mut next = 2;
    if show_answer {
        let answer = Paragraph::new(app.view.text(Region::AnswerPanel).to_string())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green))
                    .title(" Answer "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(answer, areas[next]);
        next += 1;
    }

    if show_resources {
        let heading = format!(" {} ", app.view.text(Region::ResourcesPanel));
        let items = resource_items(app.view.list(Region::ResourcesPanel));
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta))
                    .title(heading),
            )
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, areas[next], &mut app.resources_state);
    }
}

fn render_results(app: &mut App, frame: &mut Frame, area: Rect) {
    let [message_area, list_area] =
        Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).areas(area);

    let message = Paragraph::new(app.view.text(Region::Message).to_string())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(" Assessment complete "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(message, message_area);

    let results = app.view.list(Region::Results);
    if results.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No results were returned.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(Block::default().borders(Borders::ALL).title(" Opportunities "));
        frame.render_widget(empty, list_area);
        return;
    }

    let list = List::new(resource_items(results))
        .block(Block::default().borders(Borders::ALL).title(" Opportunities "))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, &mut app.results_state);
}

fn resource_items(resources: &[Resource]) -> Vec<ListItem<'static>> {
    resources
        .iter()
        .map(|resource| {
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    format!("[{}] ", resource.kind),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    resource.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ])];
            if let Some(href) = resource.href() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", href),
                    Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                )));
            }
            ListItem::new(lines)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_stays_inside_input_border() {
        let area = Rect::new(10, 2, 20, 3);
        assert_eq!(cursor_column(area, 0), 11);
        assert_eq!(cursor_column(area, 5), 16);
        assert_eq!(cursor_column(area, 500), 28);
        assert_eq!(cursor_column(area, 70_000), 28);
        assert_eq!(cursor_column(area, usize::MAX), 28);
    }
}
