pub mod overlay;
pub mod stage_canvas;

pub use overlay::SelectionOverlay;
pub use stage_canvas::StageCanvas;
