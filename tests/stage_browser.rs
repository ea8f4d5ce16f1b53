#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use gloo_events::EventListener;
use html_poster_editor::config::ELEMENT_ID_ATTR;
use html_poster_editor::sample::SAMPLE_POSTER;
use html_poster_editor::stage::interaction::clamp_axis;
use html_poster_editor::stage::{EditOutcome, Interaction, StageHandle, StageState};
use html_poster_editor::types::{ElementData, ElementId, ElementKind, Point, Position};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{HtmlElement, KeyboardEvent, KeyboardEventInit, MouseEvent, MouseEventInit};
use yew::Callback;

wasm_bindgen_test_configure!(run_in_browser);

type Published = Rc<RefCell<Vec<Option<ElementData>>>>;

fn mount() -> (StageHandle, HtmlElement, Published) {
    let document = gloo_utils::document();
    let canvas: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    canvas
        .set_attribute("style", "position: relative; width: 720px; height: 720px; overflow: hidden;")
        .unwrap();
    document.body().unwrap().append_child(&canvas).unwrap();

    let published: Published = Rc::default();
    let sink = published.clone();
    let handle = StageHandle::new(Callback::from(move |data| sink.borrow_mut().push(data)));
    handle.attach(canvas.clone());
    (handle, canvas, published)
}

fn last(published: &Published) -> Option<ElementData> {
    published.borrow().last().cloned().flatten()
}

fn id_of(canvas: &HtmlElement, selector: &str) -> ElementId {
    let element = canvas.query_selector(selector).unwrap().unwrap();
    ElementId::new(element.get_attribute(ELEMENT_ID_ATTR).unwrap())
}

/// Dispatch a cancelable keydown on `target` and hand the event back.
fn key_on(target: &web_sys::EventTarget, key: &str, shift: bool) -> KeyboardEvent {
    let init = KeyboardEventInit::new();
    init.set_key(key);
    init.set_shift_key(shift);
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    target.dispatch_event(&event).unwrap();
    event
}

fn enter_edit(handle: &StageHandle, id: &ElementId) {
    handle.press(id, Point::zero());
    handle.release();
    handle.press(id, Point::zero());
    assert!(handle.is_editing());
}

fn press_delete() {
    let init = KeyboardEventInit::new();
    init.set_key("Delete");
    init.set_bubbles(true);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    gloo_utils::document().dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
fn import_registers_every_element_once() {
    let (handle, canvas, published) = mount();
    handle.import(
        r#"<div class="card"><h1>Title</h1><p>Body <strong>bold</strong></p><script>window.hacked = 1</script></div>"#,
    );

    let nodes = canvas.query_selector_all(&format!("[{ELEMENT_ID_ATTR}]")).unwrap();
    assert_eq!(nodes.length(), 4);
    assert!(canvas.query_selector("script").unwrap().is_none());

    let ids: HashSet<String> = (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .filter_map(|element| element.get_attribute(ELEMENT_ID_ATTR))
        .collect();
    assert_eq!(ids.len(), 4);
    assert_eq!(handle.element_ids().len(), 4);

    assert_eq!(published.borrow().last(), Some(&None));
    assert_eq!(handle.state(), Some(StageState::Populated(Interaction::Idle)));
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn drag_sample_title_and_export() {
    let (handle, canvas, published) = mount();
    handle.import(SAMPLE_POSTER);
    let id = id_of(&canvas, "h1");

    handle.press(&id, Point::new(100.0, 100.0));
    let before = last(&published).expect("title selected");
    assert_eq!(before.tag_name, "h1");
    assert!(before.position_in_sync());
    let start = before.position.unwrap();

    // the double-click window closes with the button still down
    handle.resolve_click();
    let title = handle.resolve(&id).unwrap();
    assert_eq!(title.style().get_property_value("z-index").unwrap(), "1000");

    handle.drag_to(Point::new(130.0, 90.0));
    let rect = title.get_bounding_client_rect();
    let expected = Position::new(
        clamp_axis(start.x + 30, rect.width()),
        clamp_axis(start.y - 10, rect.height()),
    );
    let moved = last(&published).unwrap();
    assert_eq!(moved.position, Some(expected));
    assert!(moved.position_in_sync());

    handle.end_drag();
    assert_eq!(title.style().get_property_value("z-index").unwrap(), "");
    assert_eq!(handle.state(), Some(StageState::Populated(Interaction::Selected(id.clone()))));

    let document = handle.export_document("2024-06-01").unwrap();
    assert!(document.contains(&format!("left: {}px;", expected.x)));
    assert!(document.contains(&format!("top: {}px;", expected.y)));
    assert!(document.contains("Summer Sale"));
    assert!(document.contains("<title>HTML Poster - 2024-06-01</title>"));
    assert!(!document.contains(ELEMENT_ID_ATTR));
    assert!(!document.contains("cursor"));

    // export never touches the live canvas
    assert!(title.get_attribute(ELEMENT_ID_ATTR).is_some());
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn drag_is_clamped_to_canvas() {
    let (handle, canvas, published) = mount();
    handle.import(r#"<p style="left: 10px; top: 10px; width: 100px; height: 40px; margin: 0;">x</p>"#);
    let id = id_of(&canvas, "p");

    handle.press(&id, Point::new(0.0, 0.0));
    handle.resolve_click();
    handle.drag_to(Point::new(5_000.0, -5_000.0));
    let moved = last(&published).unwrap();
    assert_eq!(moved.position, Some(Position::new(620, 0)));
    handle.end_drag();
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn nested_drag_moves_relative_to_parent() {
    let (handle, canvas, published) = mount();
    handle.import(
        r#"<div style="left: 100px; top: 100px; width: 300px; height: 200px; margin: 0; padding: 0;"><span>tag</span></div>"#,
    );
    let id = id_of(&canvas, "span");
    let span = handle.resolve(&id).unwrap();
    assert_eq!(span.offset_left(), 0);

    handle.press(&id, Point::zero());
    handle.resolve_click();
    handle.drag_to(Point::new(5.0, 5.0));
    assert_eq!(span.style().get_property_value("left").unwrap(), "5px");
    assert_eq!(span.style().get_property_value("top").unwrap(), "5px");
    assert_eq!(last(&published).unwrap().position, Some(Position::new(5, 5)));

    // clamped against the canvas edge, not the parent's
    handle.drag_to(Point::new(-5_000.0, -5_000.0));
    assert_eq!(span.style().get_property_value("left").unwrap(), "-100px");
    handle.end_drag();
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn plain_click_does_not_drag() {
    let (handle, canvas, _published) = mount();
    handle.import("<p>click me</p>");
    let id = id_of(&canvas, "p");

    handle.press(&id, Point::zero());
    handle.release();
    handle.resolve_click();
    assert_eq!(handle.state(), Some(StageState::Populated(Interaction::Selected(id))));
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn inline_edit_cancel_and_commit() {
    let (handle, canvas, published) = mount();
    handle.import("<h2>Original</h2>");
    let id = id_of(&canvas, "h2");
    let heading = handle.resolve(&id).unwrap();

    handle.press(&id, Point::zero());
    handle.release();
    handle.press(&id, Point::zero());
    assert!(handle.is_editing());
    assert_eq!(heading.get_attribute("contenteditable").as_deref(), Some("true"));

    heading.set_text_content(Some("Scribbles"));
    handle.finish_edit(EditOutcome::Cancel);
    assert!(!handle.is_editing());
    assert_eq!(heading.text_content().as_deref(), Some("Original"));
    assert_eq!(heading.get_attribute("contenteditable"), None);

    handle.press(&id, Point::zero());
    handle.release();
    handle.press(&id, Point::zero());
    assert!(handle.is_editing());
    heading.set_text_content(Some("Edited"));
    handle.finish_edit(EditOutcome::Commit);
    assert_eq!(last(&published).unwrap().content.as_deref(), Some("Edited"));
    assert_eq!(heading.text_content().as_deref(), Some("Edited"));
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn edit_keys_commit_and_cancel() {
    let (handle, canvas, published) = mount();
    handle.import("<p>Original</p>");
    let id = id_of(&canvas, "p");
    let paragraph = handle.resolve(&id).unwrap();
    let target: &web_sys::EventTarget = paragraph.as_ref();

    enter_edit(&handle, &id);
    paragraph.set_text_content(Some("Scribbles"));
    let escape = key_on(target, "Escape", false);
    assert!(escape.default_prevented());
    assert!(!handle.is_editing());
    assert_eq!(paragraph.text_content().as_deref(), Some("Original"));
    assert_eq!(paragraph.get_attribute("contenteditable"), None);

    enter_edit(&handle, &id);
    paragraph.set_text_content(Some("Two lines"));
    let soft_break = key_on(target, "Enter", true);
    assert!(!soft_break.default_prevented());
    assert!(handle.is_editing());

    let enter = key_on(target, "Enter", false);
    assert!(enter.default_prevented());
    assert!(!handle.is_editing());
    assert_eq!(paragraph.get_attribute("contenteditable"), None);
    assert_eq!(last(&published).unwrap().content.as_deref(), Some("Two lines"));
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn edit_commits_on_blur() {
    let (handle, canvas, published) = mount();
    handle.import("<h2>Heading</h2>");
    let id = id_of(&canvas, "h2");
    let heading = handle.resolve(&id).unwrap();

    enter_edit(&handle, &id);
    heading.set_text_content(Some(""));
    heading.dispatch_event(&web_sys::Event::new("blur").unwrap()).unwrap();

    assert!(!handle.is_editing());
    assert_eq!(heading.get_attribute("contenteditable"), None);
    assert_eq!(last(&published).unwrap().content.as_deref(), Some(""));
    assert_eq!(handle.state(), Some(StageState::Populated(Interaction::Selected(id))));
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn delete_key_removes_selection() {
    let (handle, canvas, published) = mount();
    handle.import("<h1>Keep</h1><p>Drop</p>");
    let id = id_of(&canvas, "p");

    handle.press(&id, Point::zero());
    handle.release();
    handle.resolve_click();
    assert!(last(&published).is_some());

    press_delete();
    assert!(handle.resolve(&id).is_none());
    assert!(canvas.query_selector("p").unwrap().is_none());
    assert!(canvas.query_selector("h1").unwrap().is_some());
    assert_eq!(handle.selection(), None);
    assert_eq!(published.borrow().last(), Some(&None));
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn delete_key_ignored_while_editing() {
    let (handle, canvas, _published) = mount();
    handle.import("<p>Typing</p>");
    let id = id_of(&canvas, "p");

    handle.press(&id, Point::zero());
    handle.release();
    handle.press(&id, Point::zero());
    assert!(handle.is_editing());

    press_delete();
    assert!(handle.resolve(&id).is_some());

    handle.delete_selected();
    assert!(handle.resolve(&id).is_none());
    assert_eq!(handle.selection(), None);
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn added_elements_cascade() {
    let (handle, canvas, published) = mount();
    assert_eq!(handle.state(), Some(StageState::Empty));

    handle.add_element(ElementKind::Text);
    let text = last(&published).unwrap();
    handle.add_element(ElementKind::Image);
    let image = last(&published).unwrap();
    handle.add_element(ElementKind::Text);
    let second = last(&published).unwrap();

    assert_eq!(text.position, Some(Position::new(50, 50)));
    assert_eq!(image.position, Some(Position::new(70, 70)));
    assert_eq!(second.position, Some(Position::new(90, 90)));
    for data in [&text, &image, &second] {
        assert!(data.position_in_sync());
    }

    assert_eq!(text.content.as_deref(), Some("New text element"));
    assert_eq!(image.tag_name, "img");
    assert_eq!(image.alt.as_deref(), Some("New image"));
    assert_eq!(image.style.width.as_deref(), Some("150px"));

    let ids: HashSet<ElementId> = [&text, &image, &second].iter().map(|data| data.id.clone()).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(handle.selection(), Some(second.id.clone()));
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn cascade_continues_after_import() {
    let (handle, canvas, published) = mount();
    handle.import("<h1>A</h1><p>B</p>");
    handle.add_element(ElementKind::Text);
    assert_eq!(last(&published).unwrap().position, Some(Position::new(90, 90)));
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn panel_update_applies_changed_fields() {
    let (handle, canvas, published) = mount();
    handle.import("<p>Before</p>");
    let id = id_of(&canvas, "p");
    handle.press(&id, Point::zero());
    handle.release();
    handle.resolve_click();

    let mut proposed = last(&published).unwrap();
    proposed.content = Some("After".to_string());
    proposed.style.color = Some("#ff0000".to_string());
    proposed.set_position(Position::new(200, 120));
    proposed.attributes.insert("title".to_string(), "caption".to_string());
    handle.update(proposed);

    let updated = last(&published).unwrap();
    assert_eq!(updated.content.as_deref(), Some("After"));
    assert_eq!(updated.position, Some(Position::new(200, 120)));
    assert_eq!(updated.attributes.get("title").map(String::as_str), Some("caption"));

    let node = handle.resolve(&id).unwrap();
    assert_eq!(node.style().get_property_value("left").unwrap(), "200px");
    assert_eq!(node.get_attribute("title").as_deref(), Some("caption"));
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn stale_identifiers_resolve_to_nothing() {
    let (handle, canvas, published) = mount();
    handle.import("<p>First</p>");
    let old = id_of(&canvas, "p");
    handle.press(&old, Point::zero());
    handle.release();
    handle.resolve_click();
    let stale = last(&published).unwrap();

    handle.import("<p>Second</p>");
    assert!(handle.resolve(&old).is_none());
    assert!(handle.snapshot(&old).is_none());
    assert_ne!(id_of(&canvas, "p"), old);

    handle.update(stale);
    assert_eq!(published.borrow().last(), Some(&None));
    assert_eq!(canvas.text_content().as_deref(), Some("Second"));
    handle.detach();
    canvas.remove();
}

#[wasm_bindgen_test]
fn pointer_events_reach_the_stage() {
    let (handle, canvas, published) = mount();
    handle.import("<h3>Hit me</h3>");
    let id = id_of(&canvas, "h3");
    let heading = handle.resolve(&id).unwrap();

    let init = MouseEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_button(0);
    let down = MouseEvent::new_with_mouse_event_init_dict("mousedown", &init).unwrap();
    heading.dispatch_event(&down).unwrap();
    assert!(down.default_prevented());
    assert_eq!(handle.selection(), Some(id));
    assert!(last(&published).is_some());

    let click_handle = handle.clone();
    let _click = EventListener::new(&canvas, "click", move |event| {
        if let Some(event) = event.dyn_ref::<MouseEvent>() {
            click_handle.canvas_click(event);
        }
    });
    let click = MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap();
    canvas.dispatch_event(&click).unwrap();
    assert_eq!(handle.selection(), None);
    assert_eq!(published.borrow().last(), Some(&None));

    handle.detach();
    canvas.remove();
}
