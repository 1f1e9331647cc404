use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, HtmlElement, HtmlImageElement};
use yew::prelude::*;

use crate::model::{Marker, MarkerState, RadarAction, RadarState};

/// Input that starts inside this element never reaches the camera.
const UI_OVERLAY_SELECTOR: &str = "#ui-overlay";

const DOM_DELTA_LINE: u32 = 1;
const DOM_DELTA_PAGE: u32 = 2;

/// Convert a wheel delta in lines/pages to pixel-like units.
pub fn wheel_delta_pixels(delta_y: f64, delta_mode: u32) -> f64 {
    match delta_mode {
        DOM_DELTA_LINE => delta_y * 40.0,
        DOM_DELTA_PAGE => delta_y * 400.0,
        _ => delta_y,
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct RadarViewProps {
    pub state: UseReducerHandle<RadarState>,
    pub map_image_url: String,
    #[prop_or_default]
    pub children: Children,
}

fn from_overlay(e: &web_sys::Event) -> bool {
    e.target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest(UI_OVERLAY_SELECTOR).ok().flatten())
        .is_some()
}

fn viewport_size(el: &HtmlElement) -> (f64, f64) {
    (el.client_width() as f64, el.client_height() as f64)
}

// Blips are unkeyed: ids repeat within a snapshot and every tick replaces
// the whole list.
fn render_marker(m: &Marker, inv_scale: f64) -> Html {
    let color = match (m.state, m.is_local) {
        (MarkerState::Dead, _) => "#6e7681",
        (MarkerState::Low, _) => "#d29922",
        (MarkerState::Normal, true) => "#3fb950",
        (MarkerState::Normal, false) => "#58a6ff",
    };
    let class = classes!("blip", m.state.css_class(), m.is_local.then_some("local"));
    let style = format!(
        "position:absolute; left:{}%; top:{}%; width:10px; height:10px; border-radius:50%; background:{}; border:1px solid #0e1116; transform:translate(-50%, -50%) scale({});",
        m.u * 100.0,
        m.v * 100.0,
        color,
        inv_scale
    );
    html! {
        <div {class} {style}>
            if m.is_local {
                <div class="detection-zone" style="position:absolute; left:50%; top:50%; width:120px; height:120px; transform:translate(-50%, -50%); border:1px solid rgba(63,185,80,0.6); background:rgba(63,185,80,0.08); border-radius:50%;"></div>
            }
            if let Some(label) = &m.label {
                <div class="blip-label" style="position:absolute; left:14px; top:-4px; white-space:nowrap; font-size:12px; color:#e6edf3; text-shadow:0 0 3px #000;">{ label.clone() }</div>
            }
        </div>
    }
}

#[function_component(RadarView)]
pub fn radar_view(props: &RadarViewProps) -> Html {
    let container_ref = use_node_ref();
    let image_ref = use_node_ref();
    let dragging = use_mut_ref(|| false);

    // Main mount effect (listeners)
    {
        let container_ref = container_ref.clone();
        let image_ref = image_ref.clone();
        let state = props.state.clone();
        let dragging = dragging.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let container = container_ref.cast::<HtmlElement>();

            if let Some(el) = &container {
                let (width, height) = viewport_size(el);
                state.dispatch(RadarAction::ViewportResized { width, height });
            }
            if let Some(img) = image_ref.cast::<HtmlImageElement>() {
                if img.complete() && img.natural_width() > 0 {
                    state.dispatch(RadarAction::ImageLoaded {
                        width: img.natural_width() as f64,
                        height: img.natural_height() as f64,
                    });
                }
            }

            // Wheel zoom
            let wheel_cb = {
                let state = state.clone();
                let container = container.clone();
                Closure::wrap(Box::new(move |e: web_sys::WheelEvent| {
                    if from_overlay(&e) {
                        return;
                    }
                    e.prevent_default();
                    let Some(el) = &container else { return };
                    let rect = el.get_bounding_client_rect();
                    state.dispatch(RadarAction::Wheel {
                        delta_y: wheel_delta_pixels(e.delta_y(), e.delta_mode()),
                        cursor_x: e.client_x() as f64 - rect.left(),
                        cursor_y: e.client_y() as f64 - rect.top(),
                    });
                }) as Box<dyn FnMut(_)>)
            };
            // Mouse events
            let mousedown_cb = {
                let state = state.clone();
                let dragging = dragging.clone();
                let container = container.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    if e.button() != 0 || from_overlay(&e) {
                        return;
                    }
                    let Some(el) = &container else { return };
                    let rect = el.get_bounding_client_rect();
                    *dragging.borrow_mut() = true;
                    state.dispatch(RadarAction::PointerDown {
                        x: e.client_x() as f64 - rect.left(),
                        y: e.client_y() as f64 - rect.top(),
                    });
                }) as Box<dyn FnMut(_)>)
            };
            let mousemove_cb = {
                let state = state.clone();
                let dragging = dragging.clone();
                let container = container.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    if !*dragging.borrow() {
                        return;
                    }
                    e.prevent_default();
                    let Some(el) = &container else { return };
                    let rect = el.get_bounding_client_rect();
                    state.dispatch(RadarAction::PointerMove {
                        x: e.client_x() as f64 - rect.left(),
                        y: e.client_y() as f64 - rect.top(),
                    });
                }) as Box<dyn FnMut(_)>)
            };
            let mouseup_cb = {
                let state = state.clone();
                let dragging = dragging.clone();
                Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    if dragging.replace(false) {
                        state.dispatch(RadarAction::PointerUp);
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let resize_cb = {
                let state = state.clone();
                let container = container.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    if let Some(el) = &container {
                        let (width, height) = viewport_size(el);
                        state.dispatch(RadarAction::ViewportResized { width, height });
                    }
                }) as Box<dyn FnMut(_)>)
            };

            if let Some(el) = &container {
                let opts = web_sys::AddEventListenerOptions::new();
                opts.set_passive(false);
                let _ = el.add_event_listener_with_callback_and_add_event_listener_options(
                    "wheel",
                    wheel_cb.as_ref().unchecked_ref(),
                    &opts,
                );
                let _ = el.add_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                );
                let _ = el.add_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = el.add_event_listener_with_callback(
                    "mouseleave",
                    mouseup_cb.as_ref().unchecked_ref(),
                );
            }
            if let Some(w) = &window {
                let _ = w.add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref());
                let _ = w.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());
            }

            // Cleanup
            move || {
                if let Some(el) = &container {
                    let _ = el.remove_event_listener_with_callback(
                        "wheel",
                        wheel_cb.as_ref().unchecked_ref(),
                    );
                    let _ = el.remove_event_listener_with_callback(
                        "mousedown",
                        mousedown_cb.as_ref().unchecked_ref(),
                    );
                    let _ = el.remove_event_listener_with_callback(
                        "mousemove",
                        mousemove_cb.as_ref().unchecked_ref(),
                    );
                    let _ = el.remove_event_listener_with_callback(
                        "mouseleave",
                        mouseup_cb.as_ref().unchecked_ref(),
                    );
                }
                if let Some(w) = &window {
                    let _ = w.remove_event_listener_with_callback(
                        "mouseup",
                        mouseup_cb.as_ref().unchecked_ref(),
                    );
                    let _ = w.remove_event_listener_with_callback(
                        "resize",
                        resize_cb.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    let onload = {
        let state = props.state.clone();
        let image_ref = image_ref.clone();
        Callback::from(move |_e: Event| {
            if let Some(img) = image_ref.cast::<HtmlImageElement>() {
                log::info!(
                    "map image loaded: {}x{}",
                    img.natural_width(),
                    img.natural_height()
                );
                state.dispatch(RadarAction::ImageLoaded {
                    width: img.natural_width() as f64,
                    height: img.natural_height() as f64,
                });
            }
        })
    };

    let transform = props.state.transform();
    let inv_scale = 1.0 / transform.scale;
    let markers = props.state.markers();
    let cursor = if props.state.camera.is_dragging() {
        "grabbing"
    } else {
        "grab"
    };

    html! {<div id="map-container" ref={container_ref} style={format!("position:relative; width:100vw; height:100vh; overflow:hidden; background:#0e1116; cursor:{cursor};")}>
        <div id="map-wrapper" style={format!("position:absolute; left:0; top:0; transform-origin:0 0; transform:{};", transform.css())}>
            <img id="map-image" ref={image_ref} src={props.map_image_url.clone()} {onload} draggable="false" style="display:block; user-select:none;" />
            <div id="blips-container" style="position:absolute; inset:0; pointer-events:none;">
                { for markers.iter().map(|m| render_marker(m, inv_scale)) }
            </div>
        </div>
        <div id="ui-overlay">{ for props.children.iter() }</div>
    </div>}
}
