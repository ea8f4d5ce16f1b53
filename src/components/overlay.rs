use crate::config::CANVAS_SIZE;
use crate::types::BoundingBox;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct SelectionOverlayProps {
    /// Highlight rectangle in canvas coordinates, margin included
    #[prop_or_default]
    pub frame: Option<BoundingBox>,
}

/// SVG layer drawn over the canvas. Never takes pointer events.
#[function_component(SelectionOverlay)]
pub fn selection_overlay(props: &SelectionOverlayProps) -> Html {
    let highlight = match &props.frame {
        Some(frame) => html! {
            <rect
                x={format!("{}", frame.x)}
                y={format!("{}", frame.y)}
                width={format!("{}", frame.width)}
                height={format!("{}", frame.height)}
                fill="rgba(59, 130, 246, 0.15)"
                stroke="#3b82f6"
                stroke-width="2"
            />
        },
        None => html! {},
    };

    html! {
        <svg
            style="position: absolute; top: 0; left: 0; z-index: 1000; pointer-events: none; overflow: visible;"
            width={format!("{}", CANVAS_SIZE)}
            height={format!("{}", CANVAS_SIZE)}
            viewBox={format!("0 0 {} {}", CANVAS_SIZE, CANVAS_SIZE)}
        >
            {highlight}
        </svg>
    }
}
