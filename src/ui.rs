use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{app::App, sentences::Difficulty};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const INPUT_HEIGHT: u16 = 7;

const DARK_BG: Color = Color::Rgb(30, 30, 30);
const HIGHLIGHT: Color = Color::Rgb(185, 55, 93);

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // styles
        let base_style = Style::default().bg(DARK_BG).fg(Color::White);
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let highlight_style = Style::default().fg(HIGHLIGHT);
        let highlight_bold_style = highlight_style.patch(bold_style);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let timer_style = Style::default().fg(Color::Red).patch(bold_style);

        Block::default().style(base_style).render(area, buf);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_lines =
            ((self.sentence().width() as f64 / max_chars_per_line as f64).ceil() as u16).max(1);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),            // selector label
                Constraint::Length(1),            // selector options
                Constraint::Length(2),            // title
                Constraint::Length(prompt_lines), // prompt
                Constraint::Length(1),            // padding
                Constraint::Length(INPUT_HEIGHT), // input
                Constraint::Length(1),            // time left
                Constraint::Length(2),            // result
                Constraint::Length(4),            // high scores
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new("Select Difficulty:")
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let options = Difficulty::ALL
            .iter()
            .flat_map(|d| {
                let (marker, style) = if *d == self.difficulty() {
                    ("(•) ", highlight_bold_style)
                } else {
                    ("( ) ", dim_style)
                };
                [Span::styled(format!("{marker}{d}"), style), Span::raw("   ")]
            })
            .collect::<Vec<Span>>();
        Paragraph::new(Line::from(options))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        Paragraph::new(Span::styled("Typing Speed Tester", highlight_bold_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        Paragraph::new(Span::styled(self.sentence(), highlight_bold_style))
            .alignment(if prompt_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[3], buf);

        let mut input = Text::from(self.session.typed_text());
        let input_title = if self.session.entry_enabled {
            input.push_span(Span::styled("▏", dim_style));
            " your text "
        } else {
            " your text (locked) "
        };
        Paragraph::new(input)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(input_title)
                    .border_style(if self.session.entry_enabled {
                        Style::default()
                    } else {
                        dim_style
                    }),
            )
            .wrap(Wrap { trim: false })
            .render(chunks[5], buf);

        Paragraph::new(Span::styled(
            format!("Time Left: {} sec", self.remaining_secs()),
            timer_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);

        if let Some(score) = self.result() {
            Paragraph::new(Span::styled(
                format!("WPM: {} | Accuracy: {}%", score.wpm, score.accuracy),
                bold_style,
            ))
            .alignment(Alignment::Center)
            .render(chunks[7], buf);
        }

        Paragraph::new(Text::styled(self.high_scores.summary_text(), highlight_style))
            .alignment(Alignment::Center)
            .render(chunks[8], buf);

        Paragraph::new(Span::styled(
            "(←/→) difficulty / (ctrl+d) done / (ctrl+r) try again / (esc)ape",
            italic_style,
        ))
        .render(chunks[10], buf);
    }
}
