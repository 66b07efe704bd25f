#![forbid(unsafe_code)]

//! Event loop and drawing.

use std::io::{self, Write};

use crossterm::event::{
    self, Event, KeyCode as CtKeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, queue, terminal};
use relist_core::event::{KeyEvent, RowEvent};
use relist_widgets::{EventResult, Item, ReorderList};

use crate::pointer::{PointerTracker, RowLayout};

const HEADER_LINES: u16 = 2;

pub struct App {
    list: ReorderList,
    pointer: PointerTracker,
    focused_line: Option<u16>,
}

impl App {
    #[must_use]
    pub fn new(list: ReorderList) -> Self {
        Self {
            list,
            pointer: PointerTracker::default(),
            focused_line: None,
        }
    }

    fn layout(&self) -> RowLayout {
        RowLayout {
            top: HEADER_LINES,
            len: self.list.committed().len(),
        }
    }

    /// Run until the user quits; returns the final committed order.
    pub fn run(mut self) -> io::Result<Vec<Item>> {
        self.draw()?;
        loop {
            let quit = match event::read()? {
                Event::Key(key) => self.on_key(key),
                Event::Mouse(mouse) => {
                    self.on_mouse(mouse);
                    false
                }
                Event::Resize(..) => {
                    self.draw()?;
                    false
                }
                _ => false,
            };
            if quit {
                break;
            }
            if self.list.take_render_request() {
                self.draw()?;
            }
        }
        Ok(self.list.committed().to_vec())
    }

    fn on_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        let Some(event) = KeyEvent::from_crossterm(key) else {
            return false;
        };
        if self.list.handle_event(RowEvent::Key(event)) == EventResult::Consumed {
            return false;
        }
        let ctrl_c =
            key.code == CtKeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        ctrl_c || key.code == CtKeyCode::Char('q')
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let layout = self.layout();
        let events = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pointer.press(layout, mouse.row),
            MouseEventKind::Drag(MouseButton::Left) => self.pointer.drag(layout, mouse.row),
            MouseEventKind::Up(MouseButton::Left) => {
                let payload = self
                    .list
                    .gesture()
                    .active()
                    .map(|g| g.active_item().id().to_string());
                self.pointer.release(layout, mouse.row, payload)
            }
            _ => Vec::new(),
        };
        for event in events {
            self.list.handle_event(event);
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        let width = usize::from(width);
        let layout = self.layout();
        let mut out = io::stdout().lock();

        queue!(
            out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
            SetAttribute(Attribute::Bold),
            Print(truncate(
                &format!("{}. Drag with the mouse. q quits.", self.list.operation_hint()),
                width
            )),
            SetAttribute(Attribute::Reset)
        )?;

        let lines = self.list.render_lines(width);
        for (index, line) in lines.iter().enumerate() {
            queue!(out, cursor::MoveTo(0, layout.line_of(index)), Print(line))?;
        }

        if let Some(request) = self.list.take_focus_request() {
            self.focused_line = Some(layout.line_of(request.index));
        }
        let status_line = height.saturating_sub(1);
        queue!(
            out,
            cursor::MoveTo(0, status_line),
            SetAttribute(Attribute::Reverse),
            Print(truncate(self.list.announcement(), width)),
            SetAttribute(Attribute::Reset)
        )?;
        match self.focused_line {
            Some(line) => queue!(out, cursor::MoveTo(0, line), cursor::Show)?,
            None => queue!(out, cursor::Hide)?,
        }
        out.flush()
    }
}

fn truncate(text: &str, width: usize) -> String {
    relist_widgets::view::truncate_with_ellipsis(text, width)
}
