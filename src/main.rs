mod calibration;
mod components;
mod config;
mod error;
mod model;
mod state;
mod transport;
mod util;

fn main() {
    console_error_panic_hook::set_once();
    let search = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    let debug = util::query_param(&search, "debug").is_some_and(|v| v == "1" || v == "true");
    let level = if debug {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // Ignore a second init (hot reload).
    let _ = console_log::init_with_level(level);
    log::info!("web radar starting");
    yew::Renderer::<components::app::App>::new().render();
}
