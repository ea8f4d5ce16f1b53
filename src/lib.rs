mod app;
mod import_dialog;
mod properties_panel;
mod toolbar;

pub mod components;
pub mod config;
pub mod error;
pub mod export;
pub mod sample;
pub mod sanitize;
pub mod stage;
pub mod types;
pub mod utils;

use app::App;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
