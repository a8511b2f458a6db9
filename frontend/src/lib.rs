mod api;
mod components;
mod hooks;
mod pages;
mod session;
pub mod utils;

use pages::WorkbenchPage;
use yew::prelude::*;

#[function_component(App)]
fn app() -> Html {
    html! {
        <WorkbenchPage />
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
