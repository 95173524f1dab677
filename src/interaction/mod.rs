//! Pointer drags and viewport resizes, delivered to a simulation as queued
//! commands. The simulation drains its queue at the start of each tick, so
//! nothing touches node state mid-tick even when events arrive from another
//! thread.

mod resize;

use std::sync::mpsc::Sender;

use eframe::egui::{Vec2, vec2};

pub use resize::ResizeDebouncer;

/// Identifies one pointer (mouse, pen or touch contact) for the duration of
/// a drag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Reheat, then pin `node` where it currently is.
    DragStart { pointer: PointerId, node: String },
    /// Move the node held by `pointer` to `position`.
    DragMove { pointer: PointerId, position: Vec2 },
    /// Unpin the node held by `pointer`.
    DragEnd { pointer: PointerId },
    Reheat,
    UpdateCenter { width: f32, height: f32 },
}

/// Sending half of a simulation's command queue. Cheap to clone; once the
/// simulation is disposed every call is silently dropped.
#[derive(Clone, Debug)]
pub struct InteractionController {
    commands: Sender<Command>,
}

impl InteractionController {
    pub(crate) fn new(commands: Sender<Command>) -> Self {
        Self { commands }
    }

    fn send(&self, command: Command) {
        let _ = self.commands.send(command);
    }

    pub fn drag_start(&self, pointer: PointerId, node: impl Into<String>) {
        self.send(Command::DragStart {
            pointer,
            node: node.into(),
        });
    }

    pub fn drag_move(&self, pointer: PointerId, x: f32, y: f32) {
        self.send(Command::DragMove {
            pointer,
            position: vec2(x, y),
        });
    }

    pub fn drag_end(&self, pointer: PointerId) {
        self.send(Command::DragEnd { pointer });
    }

    pub fn reheat(&self) {
        self.send(Command::Reheat);
    }

    pub fn update_center(&self, width: f32, height: f32) {
        self.send(Command::UpdateCenter { width, height });
    }
}
