use yew::prelude::*;

use crate::model::ConnectionStatus;

#[derive(Properties, PartialEq, Clone)]
pub struct StatusPanelProps {
    pub room: String,
    pub status: ConnectionStatus,
    pub entity_count: usize,
    pub stale: bool,
}

#[function_component]
pub fn StatusPanel(props: &StatusPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;";
    let label_style = "flex:1; font-weight:500; opacity:0.8;";
    let value_style = "min-width:90px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    let status_color = match props.status.css_class() {
        "connected" => "#3fb950",
        "connecting" => "#d29922",
        _ => "#f85149",
    };
    html! {
        <div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:230px; display:flex; flex-direction:column; gap:8px; font-size:14px;">
            <div style={row_style}>
                <span style={label_style}>{"Room"}</span>
                <span id="room-id-display" style={value_style}>{ props.room.clone() }</span>
            </div>
            <div style={row_style}>
                <span style={label_style}>{"Status"}</span>
                <span id="connection-status" class={props.status.css_class()} style={format!("{} color:{};", value_style, status_color)}>{ props.status.label() }</span>
            </div>
            <div style={row_style}>
                <span style={label_style}>{"Entities"}</span>
                <span id="entities-count" style={value_style}>{ props.entity_count }</span>
            </div>
            if props.stale {
                <div style="font-size:11px; color:#d29922;">{"No recent updates, positions may be stale"}</div>
            }
        </div>
    }
}
