//! The stage controller owns the canvas subtree.
//!
//! All canvas mutation goes through [`StageController`]. Components and DOM
//! listeners reach it through a [`StageHandle`]; a listener that fires while
//! the controller is already busy is dropped instead of re-entering it.

use gloo::timers::callback::Timeout;
use gloo_events::{EventListener, EventListenerOptions};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys::{
    DomParser, Event, EventTarget, HtmlElement, KeyboardEvent, MouseEvent, SupportedType,
};
use yew::Callback;

use crate::config::{
    DEFAULT_FONT_SIZE, DEFAULT_IMAGE_ALT, DEFAULT_IMAGE_SIZE, DEFAULT_TEXT, DEFAULT_TEXT_COLOR,
    DOUBLE_CLICK_WINDOW_MS, DRAG_Z_INDEX, OVERLAY_MARGIN, PLACEHOLDER_IMAGE,
};
use crate::error::{StageError, StageResult};
use crate::export::{clean_markup, download, poster_document, poster_filename, today};
use crate::sanitize::sanitize;
use crate::stage::dom::DomNode;
use crate::stage::interaction::{
    cascade_position, ClickIntent, DeleteTrigger, DragSession, EditOutcome, StageMachine, StageState,
};
use crate::stage::projection::{apply_update, drag_start, read_snapshot, ElementHandle};
use crate::stage::registry::Registry;
use crate::types::{BoundingBox, Dimensions, ElementData, ElementId, ElementKind, Point};
use crate::utils::{client_point, px};

/// What a finished operation tells the selection subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum Publish {
    Unchanged,
    Selection(Option<ElementData>),
}

pub struct StageController {
    this: Weak<RefCell<StageController>>,
    canvas: Option<HtmlElement>,
    registry: Registry,
    machine: StageMachine,
    /// Cascade step for the next added element.
    cascade: i32,
    click_timer: Option<Timeout>,
    session_listeners: Vec<EventListener>,
    drag_listeners: Vec<EventListener>,
    edit_listeners: Vec<EventListener>,
    /// Element lifted for a drag and the z-index it had before.
    z_restore: Option<(ElementId, String)>,
    on_select: Callback<Option<ElementData>>,
}

impl StageController {
    fn new(this: Weak<RefCell<StageController>>, on_select: Callback<Option<ElementData>>) -> Self {
        Self {
            this,
            canvas: None,
            registry: Registry::new(),
            machine: StageMachine::new(),
            cascade: 0,
            click_timer: None,
            session_listeners: Vec::new(),
            drag_listeners: Vec::new(),
            edit_listeners: Vec::new(),
            z_restore: None,
            on_select,
        }
    }

    fn canvas(&self) -> StageResult<HtmlElement> {
        self.canvas.clone().ok_or(StageError::NotAttached)
    }

    pub fn state(&self) -> &StageState {
        self.machine.state()
    }

    pub fn selection(&self) -> Option<&ElementId> {
        self.machine.selection()
    }

    pub fn element_ids(&self) -> Vec<ElementId> {
        self.registry.ids()
    }

    pub fn resolve(&self, id: &ElementId) -> Option<HtmlElement> {
        let canvas = self.canvas.as_ref()?;
        self.registry.resolve(canvas, id)
    }

    pub fn snapshot(&self, id: &ElementId) -> Option<ElementData> {
        let canvas = self.canvas.as_ref()?;
        let element = self.registry.resolve(canvas, id)?;
        Some(read_snapshot(&DomNode::new(&element, canvas), id))
    }

    /// Highlight rectangle for the selected node, relative to the canvas.
    pub fn selection_frame(&self) -> Option<BoundingBox> {
        let canvas = self.canvas.as_ref()?;
        let id = self.machine.selection()?;
        let element = self.registry.resolve(canvas, id)?;
        Some(DomNode::new(&element, canvas).frame().inflate(OVERLAY_MARGIN))
    }

    /// Live node for `id` together with the canvas it sits on.
    fn node(&self, id: &ElementId) -> StageResult<(HtmlElement, HtmlElement)> {
        let canvas = self.canvas()?;
        let element = self
            .registry
            .resolve(&canvas, id)
            .ok_or_else(|| StageError::StaleElement(id.clone()))?;
        Ok((element, canvas))
    }

    /// Turn a stale-node failure into "no selection"; other errors pass through.
    fn drop_stale(&mut self, err: StageError) -> StageResult<Publish> {
        match err {
            StageError::StaleElement(id) => {
                log::debug!("{id} is gone, clearing selection");
                self.machine.clear_selection();
                Ok(Publish::Selection(None))
            }
            err => Err(err),
        }
    }

    /// Snapshot of the current selection. A selection whose node is gone is
    /// cleared and published as "no selection".
    fn publish_selection(&mut self) -> Publish {
        let Some(id) = self.machine.selection().cloned() else {
            return Publish::Selection(None);
        };
        match self.snapshot(&id) {
            Some(data) => {
                if log::log_enabled!(log::Level::Debug) {
                    if let Ok(json) = serde_json::to_string(&data) {
                        log::debug!("selection {json}");
                    }
                }
                Publish::Selection(Some(data))
            }
            None => {
                log::debug!("selection {id} is stale");
                self.machine.clear_selection();
                Publish::Selection(None)
            }
        }
    }

    fn listen<F>(
        &self,
        target: &EventTarget,
        event_type: &'static str,
        options: EventListenerOptions,
        f: F,
    ) -> EventListener
    where
        F: Fn(&StageHandle, &Event) + 'static,
    {
        let this = self.this.clone();
        EventListener::new_with_options(target, event_type, options, move |event| {
            if let Some(handle) = StageHandle::upgrade(&this) {
                f(&handle, event);
            }
        })
    }

    pub fn attach(&mut self, canvas: HtmlElement) {
        let document: EventTarget = gloo_utils::document().into();
        self.session_listeners = vec![
            self.listen(&document, "mouseup", EventListenerOptions::default(), |handle, _| {
                handle.release();
            }),
            self.listen(&document, "keydown", EventListenerOptions::default(), |handle, event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    handle.key_down(event);
                }
            }),
        ];
        self.canvas = Some(canvas);
        log::debug!("stage attached");
    }

    pub fn detach(&mut self) {
        self.drop_transients();
        self.session_listeners.clear();
        self.registry.revoke_all();
        self.machine.unmount();
        self.canvas = None;
        log::debug!("stage detached");
    }

    /// Drop every listener and timer tied to a single gesture.
    fn drop_transients(&mut self) {
        self.click_timer = None;
        self.drag_listeners.clear();
        self.edit_listeners.clear();
        self.z_restore = None;
    }

    /// Replace the canvas content with sanitized `raw` markup.
    pub fn import(&mut self, raw: &str) -> StageResult<Publish> {
        let canvas = self.canvas()?;
        self.drop_transients();
        self.registry.revoke_all();

        let markup = extract_body(&sanitize(raw))?;
        canvas.set_inner_html(&markup);

        let scripts = canvas.query_selector_all("script")?;
        for index in 0..scripts.length() {
            let script = scripts
                .item(index)
                .and_then(|node| node.dyn_into::<web_sys::Element>().ok());
            if let Some(script) = script {
                script.remove();
            }
        }

        let nodes = canvas.query_selector_all("*")?;
        let elements: Vec<HtmlElement> = (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect();
        for element in &elements {
            self.register(element, &canvas)?;
        }

        self.cascade = elements.len() as i32;
        self.machine.imported();
        log::info!("imported {} elements", elements.len());
        Ok(Publish::Selection(None))
    }

    fn register(&mut self, element: &HtmlElement, canvas: &HtmlElement) -> StageResult<ElementId> {
        let id = self.registry.register(&DomNode::new(element, canvas))?;
        let listeners = self.node_listeners(&id, element);
        self.registry.grant(&id, listeners);
        Ok(id)
    }

    fn node_listeners(&self, id: &ElementId, element: &HtmlElement) -> Vec<EventListener> {
        let id = id.clone();
        vec![self.listen(
            element,
            "mousedown",
            EventListenerOptions::enable_prevent_default(),
            move |handle, event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                if event.button() == 0 {
                    handle.press_node(&id, event);
                }
            },
        )]
    }

    /// A left-button press on a registered node.
    ///
    /// Selects the node and opens (or completes) the double-click window.
    pub fn press(&mut self, id: &ElementId, pointer: Point) -> StageResult<Publish> {
        if self.machine.is_editing(id) {
            return Ok(Publish::Unchanged);
        }
        let mut publish = Publish::Unchanged;
        if self.machine.is_editing_any() {
            publish = self.finish_edit(EditOutcome::Commit)?;
        }
        if self.machine.selection() != Some(id) {
            self.machine.select(Some(id.clone()));
            publish = self.publish_selection();
        }

        if self.machine.clicks().press(id.clone(), pointer) {
            let this = self.this.clone();
            self.click_timer = Some(Timeout::new(DOUBLE_CLICK_WINDOW_MS, move || {
                if let Some(handle) = StageHandle::upgrade(&this) {
                    handle.resolve_click();
                }
            }));
            Ok(publish)
        } else {
            match self.resolve_click()? {
                Publish::Unchanged => Ok(publish),
                resolved => Ok(resolved),
            }
        }
    }

    /// Button released anywhere on the page.
    pub fn release(&mut self) {
        self.machine.clicks().release();
    }

    /// Close the double-click window and act on what it saw.
    pub fn resolve_click(&mut self) -> StageResult<Publish> {
        self.click_timer = None;
        match self.machine.clicks().resolve() {
            Some(ClickIntent::Drag { id, origin }) => self.begin_drag(&id, origin),
            Some(ClickIntent::Edit(id)) => self.begin_edit(&id),
            Some(ClickIntent::Click) | None => Ok(Publish::Unchanged),
        }
    }

    fn begin_drag(&mut self, id: &ElementId, origin: Point) -> StageResult<Publish> {
        let (element, canvas) = match self.node(id) {
            Ok(found) => found,
            Err(err) => return self.drop_stale(err),
        };
        let (initial, anchor) = drag_start(&DomNode::new(&element, &canvas));
        let session = DragSession::new(id.clone(), origin, initial).anchored_at(anchor);
        if !self.machine.begin_drag(session) {
            return Ok(Publish::Unchanged);
        }

        let style = element.style();
        let previous = style.get_property_value("z-index").unwrap_or_default();
        style.set_property("z-index", DRAG_Z_INDEX)?;
        self.z_restore = Some((id.clone(), previous));

        let document: EventTarget = gloo_utils::document().into();
        self.drag_listeners = vec![
            self.listen(&document, "mousemove", EventListenerOptions::default(), |handle, event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                // the button came up outside the window
                if event.buttons() & 1 == 0 {
                    handle.end_drag();
                } else {
                    handle.drag_to(client_point(event));
                }
            }),
            self.listen(&document, "mouseup", EventListenerOptions::default(), |handle, _| {
                handle.end_drag();
            }),
        ];
        log::debug!("drag {id} from {initial:?}");
        Ok(Publish::Unchanged)
    }

    /// Move the dragged node so it follows `pointer`.
    pub fn drag_to(&mut self, pointer: Point) -> StageResult<Publish> {
        let Some(session) = self.machine.drag_session().cloned() else {
            return Ok(Publish::Unchanged);
        };
        let element = match self.node(&session.id) {
            Ok((element, _)) => element,
            Err(err) => {
                self.end_drag()?;
                return self.drop_stale(err);
            }
        };

        let rect = element.get_bounding_client_rect();
        let next = session.position_at(pointer, Dimensions::new(rect.width(), rect.height()));
        let style = element.style();
        style.set_property("position", "absolute")?;
        style.set_property("left", &px(next.x))?;
        style.set_property("top", &px(next.y))?;
        log::debug!("drag {} to {next:?}", session.id);
        Ok(self.publish_selection())
    }

    pub fn end_drag(&mut self) -> StageResult<Publish> {
        self.drag_listeners.clear();
        let Some(id) = self.machine.end_drag() else {
            return Ok(Publish::Unchanged);
        };
        if let Some((lifted, previous)) = self.z_restore.take() {
            if let Some(element) = self.resolve(&lifted) {
                let style = element.style();
                if previous.is_empty() {
                    style.remove_property("z-index")?;
                } else {
                    style.set_property("z-index", &previous)?;
                }
            }
        }
        log::debug!("drag {id} done");
        Ok(self.publish_selection())
    }

    fn begin_edit(&mut self, id: &ElementId) -> StageResult<Publish> {
        let element = match self.node(id) {
            Ok((element, _)) => element,
            Err(err) => return self.drop_stale(err),
        };
        let tag_name = element.tag_name().to_lowercase();
        let restore = element.text_content().unwrap_or_default();
        if !self.machine.begin_edit(id, &tag_name, restore) {
            return Ok(Publish::Unchanged);
        }

        element.set_attribute("contenteditable", "true")?;
        element.focus()?;
        let range = gloo_utils::document().create_range()?;
        range.select_node_contents(&element)?;
        if let Some(selection) = gloo_utils::window().get_selection()? {
            selection.remove_all_ranges()?;
            selection.add_range(&range)?;
        }

        self.edit_listeners = vec![
            self.listen(
                &element,
                "keydown",
                EventListenerOptions::enable_prevent_default(),
                |handle, event| {
                    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    let outcome = match event.key().as_str() {
                        "Enter" if !event.shift_key() => EditOutcome::Commit,
                        "Escape" => EditOutcome::Cancel,
                        _ => return,
                    };
                    event.prevent_default();
                    handle.finish_edit(outcome);
                },
            ),
            self.listen(&element, "blur", EventListenerOptions::default(), |handle, _| {
                handle.finish_edit(EditOutcome::Commit);
            }),
        ];
        log::debug!("editing {id}");
        Ok(Publish::Unchanged)
    }

    /// Leave inline editing, restoring the original text on cancel.
    pub fn finish_edit(&mut self, outcome: EditOutcome) -> StageResult<Publish> {
        // the blur listener must be gone before the node loses focus
        self.edit_listeners.clear();
        let Some((id, restore)) = self.machine.finish_edit(outcome) else {
            return Ok(Publish::Unchanged);
        };
        if let Some(element) = self.resolve(&id) {
            if let Some(text) = &restore {
                element.set_text_content(Some(text));
            }
            element.remove_attribute("contenteditable")?;
        }
        log::debug!("edit of {id} finished: {outcome:?}");
        Ok(self.publish_selection())
    }

    /// A click on the canvas. Background clicks clear the selection.
    pub fn canvas_click(&mut self, target: Option<EventTarget>) -> Publish {
        let on_background = match (&self.canvas, target) {
            (Some(canvas), Some(target)) => {
                let canvas: &EventTarget = canvas.as_ref();
                *canvas == target
            }
            _ => false,
        };
        if on_background && self.machine.selection().is_some() && self.machine.select(None) {
            return Publish::Selection(None);
        }
        Publish::Unchanged
    }

    pub fn key_down(&mut self, event: &KeyboardEvent) -> StageResult<Publish> {
        if event.key() != "Delete" || is_typing_target(event.target()) {
            return Ok(Publish::Unchanged);
        }
        self.delete(DeleteTrigger::Key)
    }

    /// Remove the selected node and everything beneath it.
    pub fn delete(&mut self, trigger: DeleteTrigger) -> StageResult<Publish> {
        let Some(id) = self.machine.delete_target(trigger) else {
            return Ok(Publish::Unchanged);
        };
        if self.machine.is_editing_any() {
            self.finish_edit(EditOutcome::Commit)?;
        }
        if self.machine.drag_session().is_some() {
            self.end_drag()?;
        }

        match self.resolve(&id) {
            Some(element) => {
                self.registry.revoke_subtree(&element);
                element.remove();
            }
            None => {
                self.registry.revoke(&id);
            }
        }
        self.machine.clear_selection();
        log::info!("deleted {id}");
        Ok(Publish::Selection(None))
    }

    /// Create a default element at the next cascade position and select it.
    pub fn add_element(&mut self, kind: ElementKind) -> StageResult<Publish> {
        let canvas = self.canvas()?;
        if self.machine.is_editing_any() {
            self.finish_edit(EditOutcome::Commit)?;
        }
        if self.machine.drag_session().is_some() {
            self.end_drag()?;
        }

        let element: HtmlElement = gloo_utils::document()
            .create_element(kind.tag_name())?
            .dyn_into()
            .map_err(|_| StageError::Dom(format!("failed to create <{}>", kind.tag_name())))?;
        let style = element.style();
        match kind {
            ElementKind::Text => {
                element.set_text_content(Some(DEFAULT_TEXT));
                style.set_property("font-size", DEFAULT_FONT_SIZE)?;
                style.set_property("color", DEFAULT_TEXT_COLOR)?;
            }
            ElementKind::Image => {
                element.set_attribute("src", PLACEHOLDER_IMAGE)?;
                element.set_attribute("alt", DEFAULT_IMAGE_ALT)?;
                style.set_property("width", DEFAULT_IMAGE_SIZE)?;
                style.set_property("height", DEFAULT_IMAGE_SIZE)?;
            }
        }
        let position = cascade_position(self.cascade);
        style.set_property("position", "absolute")?;
        style.set_property("left", &px(position.x))?;
        style.set_property("top", &px(position.y))?;

        canvas.append_child(&element)?;
        let id = self.register(&element, &canvas)?;
        self.cascade += 1;

        self.machine.populate();
        self.machine.select(Some(id.clone()));
        log::info!("added {} as {id} at {position:?}", kind.tag_name());
        Ok(self.publish_selection())
    }

    /// Apply panel edits to the node `proposed` names.
    pub fn update(&mut self, proposed: &ElementData) -> StageResult<Publish> {
        let (element, canvas) = match self.node(&proposed.id) {
            Ok(found) => found,
            Err(err) => return self.drop_stale(err),
        };
        let node = DomNode::new(&element, &canvas);
        apply_update(&node, proposed)?;

        if self.machine.selection() != Some(&proposed.id) {
            return Ok(Publish::Unchanged);
        }
        let mut snapshot = read_snapshot(&node, &proposed.id);
        snapshot.attributes = proposed.attributes.clone();
        Ok(Publish::Selection(Some(snapshot)))
    }

    /// The full poster document for the current canvas.
    pub fn export_document(&self, date: &str) -> StageResult<String> {
        let markup = clean_markup(&self.canvas()?)?;
        Ok(poster_document(&markup, date))
    }
}

/// Body content when `markup` is a whole document, otherwise `markup` itself.
fn extract_body(markup: &str) -> StageResult<String> {
    if !markup.to_ascii_lowercase().contains("<body") {
        return Ok(markup.to_string());
    }
    let document = DomParser::new()?.parse_from_string(markup, SupportedType::TextHtml)?;
    Ok(document
        .body()
        .map(|body| body.inner_html())
        .unwrap_or_else(|| markup.to_string()))
}

/// Whether keystrokes aimed at `target` belong to a text field.
fn is_typing_target(target: Option<EventTarget>) -> bool {
    let Some(element) = target.and_then(|target| target.dyn_into::<HtmlElement>().ok()) else {
        return false;
    };
    element.is_content_editable()
        || matches!(
            element.tag_name().to_ascii_lowercase().as_str(),
            "input" | "textarea" | "select"
        )
}

/// Shared, re-entrancy safe access to a [`StageController`].
#[derive(Clone)]
pub struct StageHandle(Rc<RefCell<StageController>>);

impl PartialEq for StageHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl StageHandle {
    pub fn new(on_select: Callback<Option<ElementData>>) -> Self {
        Self(Rc::new_cyclic(|this| {
            RefCell::new(StageController::new(this.clone(), on_select))
        }))
    }

    fn upgrade(this: &Weak<RefCell<StageController>>) -> Option<Self> {
        this.upgrade().map(Self)
    }

    /// Run `op` on the controller, then notify the subscriber outside the
    /// borrow.
    fn dispatch<F>(&self, label: &str, op: F)
    where
        F: FnOnce(&mut StageController) -> StageResult<Publish>,
    {
        let (result, on_select) = match self.0.try_borrow_mut() {
            Ok(mut controller) => {
                let result = op(&mut controller);
                (result, controller.on_select.clone())
            }
            Err(_) => {
                log::debug!("{label} ignored: stage busy");
                return;
            }
        };
        match result {
            Ok(Publish::Selection(data)) => on_select.emit(data),
            Ok(Publish::Unchanged) => {}
            Err(err) => log::warn!("{label} failed: {err}"),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&StageController) -> T) -> Option<T> {
        self.0.try_borrow().ok().map(|controller| f(&controller))
    }

    pub fn attach(&self, canvas: HtmlElement) {
        self.dispatch("attach", |controller| {
            controller.attach(canvas);
            Ok(Publish::Unchanged)
        });
    }

    pub fn detach(&self) {
        self.dispatch("detach", |controller| {
            controller.detach();
            Ok(Publish::Unchanged)
        });
    }

    pub fn import(&self, raw: &str) {
        self.dispatch("import", |controller| controller.import(raw));
    }

    pub fn add_element(&self, kind: ElementKind) {
        self.dispatch("add element", |controller| controller.add_element(kind));
    }

    pub fn delete_selected(&self) {
        self.dispatch("delete", |controller| controller.delete(DeleteTrigger::Command));
    }

    pub fn update(&self, proposed: ElementData) {
        self.dispatch("update", |controller| controller.update(&proposed));
    }

    /// Serialize the canvas and hand it to the browser as a download.
    pub fn export(&self) {
        self.dispatch("export", |controller| {
            let date = today();
            let document = controller.export_document(&date)?;
            download(&poster_filename(&date), &document)?;
            Ok(Publish::Unchanged)
        });
    }

    pub fn export_document(&self, date: &str) -> StageResult<String> {
        self.0
            .try_borrow()
            .map_err(|_| StageError::Dom("stage busy".to_string()))?
            .export_document(date)
    }

    pub fn press(&self, id: &ElementId, pointer: Point) {
        self.dispatch("press", |controller| controller.press(id, pointer));
    }

    fn press_node(&self, id: &ElementId, event: &MouseEvent) {
        let editing = self.read(|controller| controller.machine.is_editing(id)).unwrap_or(false);
        if editing {
            return;
        }
        event.prevent_default();
        event.stop_propagation();
        self.press(id, client_point(event));
    }

    pub fn release(&self) {
        self.dispatch("release", |controller| {
            controller.release();
            Ok(Publish::Unchanged)
        });
    }

    pub fn resolve_click(&self) {
        self.dispatch("click window", StageController::resolve_click);
    }

    pub fn drag_to(&self, pointer: Point) {
        self.dispatch("drag", |controller| controller.drag_to(pointer));
    }

    pub fn end_drag(&self) {
        self.dispatch("end drag", StageController::end_drag);
    }

    pub fn finish_edit(&self, outcome: EditOutcome) {
        self.dispatch("finish edit", |controller| controller.finish_edit(outcome));
    }

    pub fn key_down(&self, event: &KeyboardEvent) {
        self.dispatch("keydown", |controller| controller.key_down(event));
    }

    pub fn canvas_click(&self, event: &MouseEvent) {
        event.prevent_default();
        let target = event.target();
        self.dispatch("canvas click", |controller| Ok(controller.canvas_click(target)));
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.read(|controller| controller.selection().cloned()).flatten()
    }

    pub fn selection_frame(&self) -> Option<BoundingBox> {
        self.read(StageController::selection_frame).flatten()
    }

    pub fn snapshot(&self, id: &ElementId) -> Option<ElementData> {
        self.read(|controller| controller.snapshot(id)).flatten()
    }

    pub fn resolve(&self, id: &ElementId) -> Option<HtmlElement> {
        self.read(|controller| controller.resolve(id)).flatten()
    }

    pub fn element_ids(&self) -> Vec<ElementId> {
        self.read(StageController::element_ids).unwrap_or_default()
    }

    pub fn state(&self) -> Option<StageState> {
        self.read(|controller| controller.state().clone())
    }

    pub fn is_editing(&self) -> bool {
        self.read(|controller| controller.machine.is_editing_any())
            .unwrap_or(false)
    }
}
