use crate::components::overlay::SelectionOverlay;
use crate::config::CANVAS_SIZE;
use crate::stage::StageHandle;
use crate::types::ElementData;
use web_sys::HtmlElement;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct StageCanvasProps {
    pub handle: StageHandle,
    /// Latest published snapshot; a change re-measures the highlight
    #[prop_or_default]
    pub selected: Option<ElementData>,
}

/// The 720x720 editing surface.
///
/// Yew never renders children into the canvas div; its content belongs to
/// the stage controller from mount to unmount.
#[function_component(StageCanvas)]
pub fn stage_canvas(props: &StageCanvasProps) -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with(props.handle.clone(), move |handle| {
            let handle = handle.clone();
            match canvas_ref.cast::<HtmlElement>() {
                Some(canvas) => handle.attach(canvas),
                None => log::warn!("stage canvas missing at mount"),
            }
            move || handle.detach()
        });
    }

    let onclick = {
        let handle = props.handle.clone();
        Callback::from(move |e: MouseEvent| handle.canvas_click(&e))
    };

    let frame = props
        .selected
        .as_ref()
        .and_then(|_| props.handle.selection_frame());

    html! {
        <div
            class="relative bg-gray-50 border-2 border-gray-300 box-content"
            style={format!("width: {0}px; height: {0}px;", CANVAS_SIZE)}
        >
            <div
                ref={canvas_ref}
                {onclick}
                class="stage-canvas relative overflow-hidden"
                style={format!("width: {0}px; height: {0}px;", CANVAS_SIZE)}
            />
            <SelectionOverlay {frame} />
        </div>
    }
}
