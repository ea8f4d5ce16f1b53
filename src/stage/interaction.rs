//! Pointer and keyboard state of one canvas session.
//!
//! Nothing here touches the DOM: the controller feeds events in and performs
//! the DOM side of each accepted transition.

use crate::config::{CANVAS_SIZE, CASCADE_ORIGIN, CASCADE_STEP};
use crate::types::{is_text_tag, Dimensions, ElementId, Point, Position};

/// An in-progress drag of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub id: ElementId,
    /// Pointer position when the drag began, in client coordinates.
    pub origin: Point,
    /// Element left/top when the drag began, relative to its offset parent.
    pub initial: Position,
    /// Canvas position of the offset parent's origin; zero for top-level nodes.
    pub anchor: Position,
}

impl DragSession {
    pub fn new(id: ElementId, origin: Point, initial: Position) -> Self {
        Self {
            id,
            origin,
            initial,
            anchor: Position::new(0, 0),
        }
    }

    pub fn anchored_at(mut self, anchor: Position) -> Self {
        self.anchor = anchor;
        self
    }

    /// Left/top for the current pointer. The clamp applies to the node's
    /// canvas position; the result is relative to its offset parent again.
    pub fn position_at(&self, pointer: Point, extent: Dimensions) -> Position {
        let dx = (pointer.x - self.origin.x).round() as i32;
        let dy = (pointer.y - self.origin.y).round() as i32;
        let x = self.initial.x.saturating_add(dx).saturating_add(self.anchor.x);
        let y = self.initial.y.saturating_add(dy).saturating_add(self.anchor.y);
        Position::new(
            clamp_axis(x, extent.width) - self.anchor.x,
            clamp_axis(y, extent.height) - self.anchor.y,
        )
    }
}

/// Clamp one coordinate to `[0, CANVAS_SIZE - extent]`.
///
/// An element larger than the canvas pins to 0.
pub fn clamp_axis(value: i32, extent: f64) -> i32 {
    let max = (CANVAS_SIZE - extent).floor() as i32;
    value.min(max).max(0)
}

/// Default position for the `step`-th added element.
pub fn cascade_position(step: i32) -> Position {
    let offset = CASCADE_ORIGIN + CASCADE_STEP * step;
    Position::new(offset, offset)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Idle,
    Selected(ElementId),
    Dragging(DragSession),
    Editing { id: ElementId, restore: String },
}

impl Interaction {
    pub fn selection(&self) -> Option<&ElementId> {
        match self {
            Interaction::Idle => None,
            Interaction::Selected(id) => Some(id),
            Interaction::Dragging(session) => Some(&session.id),
            Interaction::Editing { id, .. } => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageState {
    Empty,
    Populated(Interaction),
}

/// How an inline edit ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Enter or loss of focus.
    Commit,
    /// Escape.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTrigger {
    /// The Delete key. Only honoured while an element is plainly selected.
    Key,
    /// The toolbar command.
    Command,
}

/// What a closed click window turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickIntent {
    Drag { id: ElementId, origin: Point },
    Edit(ElementId),
    /// A single press that was released inside the window.
    Click,
}

/// Fixed-window click/double-click disambiguation.
///
/// The first press on an element opens the window; a second press on the same
/// element inside it makes the window resolve to [`ClickIntent::Edit`]. A slow
/// double-click therefore reads as two single clicks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickTracker {
    target: Option<(ElementId, Point)>,
    presses: u32,
    released: bool,
}

impl ClickTracker {
    /// Record a press. Returns true when the press opens a new window.
    pub fn press(&mut self, id: ElementId, pointer: Point) -> bool {
        match &self.target {
            Some((current, _)) if *current == id && self.presses > 0 => {
                self.presses += 1;
                false
            }
            _ => {
                self.target = Some((id, pointer));
                self.presses = 1;
                self.released = false;
                true
            }
        }
    }

    pub fn release(&mut self) {
        if self.presses > 0 {
            self.released = true;
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.presses > 0
    }

    /// Close the window and report what it was.
    pub fn resolve(&mut self) -> Option<ClickIntent> {
        let (id, origin) = self.target.take()?;
        let intent = match (self.presses, self.released) {
            (1, false) => ClickIntent::Drag { id, origin },
            (1, true) => ClickIntent::Click,
            _ => ClickIntent::Edit(id),
        };
        self.reset();
        Some(intent)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageMachine {
    state: StageState,
    clicks: ClickTracker,
}

impl Default for StageMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StageMachine {
    pub fn new() -> Self {
        Self {
            state: StageState::Empty,
            clicks: ClickTracker::default(),
        }
    }

    pub fn state(&self) -> &StageState {
        &self.state
    }

    pub fn clicks(&mut self) -> &mut ClickTracker {
        &mut self.clicks
    }

    pub fn interaction(&self) -> Option<&Interaction> {
        match &self.state {
            StageState::Empty => None,
            StageState::Populated(interaction) => Some(interaction),
        }
    }

    pub fn selection(&self) -> Option<&ElementId> {
        self.interaction().and_then(Interaction::selection)
    }

    pub fn is_editing(&self, id: &ElementId) -> bool {
        matches!(self.interaction(), Some(Interaction::Editing { id: editing, .. }) if editing == id)
    }

    pub fn is_editing_any(&self) -> bool {
        matches!(self.interaction(), Some(Interaction::Editing { .. }))
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        match self.interaction() {
            Some(Interaction::Dragging(session)) => Some(session),
            _ => None,
        }
    }

    /// Fresh content replaced the canvas.
    pub fn imported(&mut self) {
        self.clicks.reset();
        self.state = StageState::Populated(Interaction::Idle);
    }

    /// Content was added to an empty canvas.
    pub fn populate(&mut self) {
        if self.state == StageState::Empty {
            self.state = StageState::Populated(Interaction::Idle);
        }
    }

    /// The canvas went away.
    pub fn unmount(&mut self) {
        self.clicks.reset();
        self.state = StageState::Empty;
    }

    /// Select `id`, or clear the selection with `None`.
    ///
    /// Ignored on an empty canvas and while the same element is being edited.
    /// Returns whether the selection was applied.
    pub fn select(&mut self, id: Option<ElementId>) -> bool {
        let StageState::Populated(interaction) = &self.state else {
            return false;
        };
        if let (Some(id), Interaction::Editing { id: editing, .. }) = (&id, interaction) {
            if id == editing {
                return false;
            }
        }
        self.state = StageState::Populated(match id {
            Some(id) => Interaction::Selected(id),
            None => Interaction::Idle,
        });
        true
    }

    pub fn clear_selection(&mut self) {
        self.select(None);
    }

    pub fn begin_drag(&mut self, session: DragSession) -> bool {
        match &self.state {
            StageState::Populated(Interaction::Selected(id)) if *id == session.id => {
                self.state = StageState::Populated(Interaction::Dragging(session));
                true
            }
            _ => false,
        }
    }

    pub fn end_drag(&mut self) -> Option<ElementId> {
        let StageState::Populated(Interaction::Dragging(session)) = &self.state else {
            return None;
        };
        let id = session.id.clone();
        self.state = StageState::Populated(Interaction::Selected(id.clone()));
        Some(id)
    }

    /// Enter inline editing of a selected text-bearing element.
    pub fn begin_edit(&mut self, id: &ElementId, tag_name: &str, restore: String) -> bool {
        if !is_text_tag(tag_name) {
            return false;
        }
        match &self.state {
            StageState::Populated(Interaction::Selected(selected)) if selected == id => {
                self.state = StageState::Populated(Interaction::Editing {
                    id: id.clone(),
                    restore,
                });
                true
            }
            _ => false,
        }
    }

    /// Leave inline editing. Returns the element and, on cancel, the text to
    /// put back.
    pub fn finish_edit(&mut self, outcome: EditOutcome) -> Option<(ElementId, Option<String>)> {
        let StageState::Populated(Interaction::Editing { id, restore }) = &self.state else {
            return None;
        };
        let id = id.clone();
        let restore = match outcome {
            EditOutcome::Commit => None,
            EditOutcome::Cancel => Some(restore.clone()),
        };
        self.state = StageState::Populated(Interaction::Selected(id.clone()));
        Some((id, restore))
    }

    /// The element a delete request applies to, if any.
    pub fn delete_target(&self, trigger: DeleteTrigger) -> Option<ElementId> {
        match (trigger, self.interaction()?) {
            (DeleteTrigger::Key, Interaction::Selected(id)) => Some(id.clone()),
            (DeleteTrigger::Key, _) => None,
            (DeleteTrigger::Command, interaction) => interaction.selection().cloned(),
        }
    }
}
