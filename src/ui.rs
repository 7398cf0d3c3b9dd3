//! Terminal rendering of the replay: floating windows composited back to
//! front plus a one-line status bar.
//!
//! Windows may hang off any screen edge, so each one is painted into an
//! offscreen buffer at its logical size and then blitted onto the frame
//! through [`UiFrame`], which clips every write to the visible area.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use crate::engine::StepEngine;
use crate::script::{EntryKind, LineColor};
use crate::state::{AccumulatedState, BrowserTab, LineKind};
use crate::window::{FloatRect, WindowId, WindowManager};

/// Wrapper around a frame buffer that clamps drawing to the visible area.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    pub(crate) fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        let clipped = area.intersection(self.area);
        if clipped.width > 0 && clipped.height > 0 {
            widget.render(clipped, self.buffer);
        }
    }

    /// Copy `src` so its top-left cell lands on `dest`'s signed origin.
    pub fn blit_from_signed(&mut self, src: &Buffer, dest: FloatRect) {
        let frame_x0 = self.area.x as i32;
        let frame_y0 = self.area.y as i32;
        let frame_x1 = frame_x0 + self.area.width as i32;
        let frame_y1 = frame_y0 + self.area.height as i32;
        for sy in 0..dest.height as i32 {
            let dy = dest.y + sy;
            if dy < frame_y0 || dy >= frame_y1 {
                continue;
            }
            for sx in 0..dest.width as i32 {
                let dx = dest.x + sx;
                if dx < frame_x0 || dx >= frame_x1 {
                    continue;
                }
                if let (Some(src_cell), Some(dst_cell)) = (
                    src.cell((sx as u16, sy as u16)),
                    self.buffer.cell_mut((dx as u16, dy as u16)),
                ) {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }
}

/// Split the screen into the window desktop and the status row.
pub fn split_screen(area: Rect) -> (Rect, Rect) {
    let [desktop, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    (desktop, status)
}

pub fn draw(frame: &mut Frame<'_>, engine: &StepEngine<WindowManager>, hints: &str) {
    let (desktop, status) = split_screen(frame.area());
    let wm = engine.focus();
    let state = engine.state();
    let mut ui = UiFrame::new(frame);

    for id in wm.draw_order() {
        let rect = wm.float_rect(id);
        let rect = FloatRect {
            x: rect.x + desktop.x as i32,
            y: rect.y + desktop.y as i32,
            ..rect
        };
        if rect.visible_in(desktop).area() == 0 {
            continue;
        }
        let extent = offscreen_extent(rect, desktop);
        let mut offscreen = Buffer::empty(extent);
        render_window(&mut offscreen, extent, id, state);
        ui.blit_from_signed(
            &offscreen,
            FloatRect {
                width: extent.width,
                height: extent.height,
                ..rect
            },
        );
    }

    ui.render_widget(status_line(engine, hints), status);
}

/// Offscreen size for a window: its full size, except that anything more
/// than one cell past the right or bottom edge of `bounds` is dropped.
fn offscreen_extent(rect: FloatRect, bounds: Rect) -> Rect {
    let limit = |origin: i32, size: u16, end: u16| {
        let reach = (end as i32 + 1 - origin).max(0);
        (size as i32).min(reach) as u16
    };
    Rect::new(
        0,
        0,
        limit(rect.x, rect.width, bounds.right()),
        limit(rect.y, rect.height, bounds.bottom()),
    )
}

fn render_window(buf: &mut Buffer, area: Rect, id: WindowId, state: &AccumulatedState) {
    let active = state.active_window() == Some(id);
    let block = Block::bordered()
        .title(Line::from(format!(" {} ", id.title())))
        .border_type(if active {
            BorderType::Double
        } else {
            BorderType::Rounded
        })
        .border_style(if active {
            Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(Color::DarkGray)
        });
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    match id {
        WindowId::Chat => tail(chat_lines(state), inner).render(inner, buf),
        WindowId::Terminal => tail(terminal_lines(state), inner).render(inner, buf),
        WindowId::Browser => Paragraph::new(browser_lines(state)).render(inner, buf),
        WindowId::Design => Paragraph::new(design_lines(state)).render(inner, buf),
        WindowId::Editor => {
            if state.files().is_empty() {
                Paragraph::new(editor_lines(state)).render(inner, buf);
            } else {
                let [files, editor] =
                    Layout::horizontal([Constraint::Percentage(30), Constraint::Fill(1)])
                        .spacing(1)
                        .areas(inner);
                Paragraph::new(file_lines(state)).render(files, buf);
                Paragraph::new(editor_lines(state)).render(editor, buf);
            }
        }
    }
}

/// Scroll a log so its last lines stay visible.
fn tail(lines: Vec<Line<'static>>, area: Rect) -> Paragraph<'static> {
    let overflow = lines.len().saturating_sub(area.height as usize);
    let offset = u16::try_from(overflow).unwrap_or(u16::MAX);
    Paragraph::new(lines).scroll((offset, 0))
}

fn line_color(color: Option<LineColor>) -> Color {
    match color {
        Some(LineColor::Green) => Color::Green,
        Some(LineColor::Yellow) => Color::Yellow,
        Some(LineColor::Cyan) => Color::Cyan,
        Some(LineColor::Red) => Color::Red,
        Some(LineColor::White) | None => Color::Gray,
    }
}

fn chat_lines(state: &AccumulatedState) -> Vec<Line<'static>> {
    state
        .chat()
        .iter()
        .map(|msg| {
            let mut spans = vec![
                Span::styled(
                    format!("[{}] ", msg.from.role.label()),
                    Style::new().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{}: ", msg.from.name),
                    Style::new().add_modifier(Modifier::BOLD),
                ),
                Span::raw(msg.text.clone()),
            ];
            if msg.is_approval {
                spans.push(Span::styled(" ✔", Style::new().fg(Color::Green)));
            }
            Line::from(spans)
        })
        .collect()
}

fn terminal_lines(state: &AccumulatedState) -> Vec<Line<'static>> {
    state
        .terminal()
        .iter()
        .map(|line| match line.kind {
            LineKind::Command => Line::from(vec![
                Span::styled("$ ", Style::new().fg(Color::Green)),
                Span::styled(line.text.clone(), Style::new().add_modifier(Modifier::BOLD)),
            ]),
            LineKind::Output => {
                Line::styled(line.text.clone(), Style::new().fg(line_color(line.color)))
            }
        })
        .collect()
}

fn browser_lines(state: &AccumulatedState) -> Vec<Line<'static>> {
    let view = state.browser();
    let tab = |label: &'static str, selected: bool| {
        if selected {
            Span::styled(
                format!("[{label}]"),
                Style::new().add_modifier(Modifier::REVERSED),
            )
        } else {
            Span::raw(format!(" {label} "))
        }
    };
    let mut lines = vec![
        Line::from(vec![
            tab("Workspace", view.tab == BrowserTab::Workspace),
            Span::raw(" "),
            tab("Endpoints", view.tab == BrowserTab::Endpoints),
        ]),
        Line::default(),
    ];
    match view.tab {
        BrowserTab::Workspace => {
            lines.push(Line::from(format!("state: {:?}", view.workspace).to_lowercase()));
            lines.extend(state.markers().iter().map(|m| {
                Line::from(format!(
                    "◉ {} ({:.0}%, {:.0}%) {}°",
                    m.name,
                    m.x * 100.0,
                    m.y * 100.0,
                    m.angle
                ))
            }));
        }
        BrowserTab::Endpoints => {
            lines.extend(view.endpoints.iter().map(|e| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<7}", e.method.as_str()),
                        Style::new().fg(Color::Magenta),
                    ),
                    Span::raw(format!("{} ", e.path)),
                    Span::styled(e.summary.clone(), Style::new().fg(Color::DarkGray)),
                ])
            }));
        }
    }
    lines
}

fn file_lines(state: &AccumulatedState) -> Vec<Line<'static>> {
    state
        .files()
        .iter()
        .map(|entry| {
            let icon = match entry.kind {
                EntryKind::Folder => "▸ ",
                EntryKind::File => "  ",
            };
            let style = if entry.modified {
                Style::new().fg(Color::Yellow)
            } else {
                Style::new()
            };
            Line::styled(format!("{icon}{}", entry.path), style)
        })
        .collect()
}

fn editor_lines(state: &AccumulatedState) -> Vec<Line<'static>> {
    let Some(file) = state.editor() else {
        return vec![Line::styled("no file open", Style::new().fg(Color::DarkGray))];
    };
    let mut lines = vec![Line::styled(
        format!("{} ({})", file.path, file.language),
        Style::new().add_modifier(Modifier::UNDERLINED),
    )];
    lines.extend(file.content.lines().map(|l| Line::from(l.to_string())));
    lines
}

fn design_lines(state: &AccumulatedState) -> Vec<Line<'static>> {
    let Some(doc) = state.design() else {
        return vec![Line::styled("no design", Style::new().fg(Color::DarkGray))];
    };
    let mut lines = vec![Line::styled(
        doc.file.clone(),
        Style::new().add_modifier(Modifier::UNDERLINED),
    )];
    for screen in &doc.screens {
        lines.push(Line::styled(
            format!("▣ {}", screen.name),
            Style::new().add_modifier(Modifier::BOLD),
        ));
        lines.extend(screen.elements.iter().map(|el| {
            Line::from(format!(
                "  {} @ {},{} {}×{}",
                el.label, el.x, el.y, el.w, el.h
            ))
        }));
    }
    lines
}

fn status_line(engine: &StepEngine<WindowManager>, hints: &str) -> Paragraph<'static> {
    let phase_name = engine
        .current_phase()
        .map_or_else(|| "-".to_string(), |phase| phase.name.clone());
    let nav = engine.state().nav();
    let mut spans = vec![
        Span::styled(
            format!(" {} ", engine.script().title),
            Style::new().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "│ Phase {}/{}: {} │ Step {}/{} │ {}/{} ",
            engine.current_phase_index() + 1,
            engine.script().phases.len(),
            phase_name,
            engine.step_in_phase(),
            engine.total_steps_in_phase(),
            nav.step_index + 1,
            nav.total_steps,
        )),
    ];
    if let Some(description) = engine
        .current_step()
        .and_then(|step| step.description.as_deref())
    {
        spans.push(Span::styled(
            format!("│ {description} "),
            Style::new().fg(Color::Cyan),
        ));
    }
    if engine.paused() {
        spans.push(Span::styled(
            "│ PAUSED: press any key ",
            Style::new().fg(Color::Yellow),
        ));
    }
    spans.push(Span::styled(
        format!("│ {hints}"),
        Style::new().fg(Color::DarkGray),
    ));
    Paragraph::new(Line::from(spans)).style(Style::new().bg(Color::Black))
}
