use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::calibration::CalibrationParams;
use crate::state::Transform;

/// Developer-only live calibration. Shown with `?debug=1`.
#[derive(Properties, PartialEq, Clone)]
pub struct CalibrationPanelProps {
    pub calibration: CalibrationParams,
    pub transform: Transform,
    pub on_offset_x: Callback<f64>,
    pub on_offset_y: Callback<f64>,
}

fn numeric_input(cb: Callback<f64>) -> Callback<Event> {
    Callback::from(move |e: Event| {
        let input = e.target_unchecked_into::<HtmlInputElement>();
        match input.value().trim().parse::<f64>() {
            Ok(v) if v.is_finite() => cb.emit(v),
            _ => log::warn!("ignoring calibration value {:?}", input.value()),
        }
    })
}

#[function_component]
pub fn CalibrationPanel(props: &CalibrationPanelProps) -> Html {
    let c = props.calibration;
    let t = props.transform;
    let on_x = numeric_input(props.on_offset_x.clone());
    let on_y = numeric_input(props.on_offset_y.clone());
    let row = "display:flex; align-items:center; gap:8px;";
    html! {<div style="position:absolute; right:12px; bottom:12px; background:#161b22; border:1px solid #30363d; border-radius:12px; padding:12px 16px; min-width:260px; display:flex; flex-direction:column; gap:8px; font-size:12px;">
        <h3 style="margin:0; font-size:14px;">{"Calibration"}</h3>
        <label style={row}>
            <span style="flex:1;">{"offsetX"}</span>
            <input type="number" step="1" value={c.offset_x.to_string()} onchange={on_x} style="width:100px;" />
        </label>
        <label style={row}>
            <span style="flex:1;">{"offsetY"}</span>
            <input type="number" step="1" value={c.offset_y.to_string()} onchange={on_y} style="width:100px;" />
        </label>
        <div style="font-family:monospace; opacity:0.7; line-height:1.4;">
            { format!("scale {:.4} / {:.4}", c.scale_x, c.scale_y) }<br/>
            { format!("pan {:.1}, {:.1} @ {:.3}x", t.pan_x, t.pan_y, t.scale) }
        </div>
    </div>}
}
