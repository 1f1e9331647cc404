use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::model::FollowOption;
use crate::state::FollowTarget;

#[derive(Properties, PartialEq, Clone)]
pub struct FollowPanelProps {
    pub options: Vec<FollowOption>,
    /// [`FollowTarget::key`] of the current target.
    pub selected: String,
    pub on_change: Callback<FollowTarget>,
}

#[function_component]
pub fn FollowPanel(props: &FollowPanelProps) -> Html {
    let onchange = {
        let cb = props.on_change.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            cb.emit(FollowTarget::from_key(&value));
        })
    };
    html! {<div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:200px; display:flex; flex-direction:column; gap:6px;">
        <label for="follow-select" style="font-size:12px; opacity:0.8;">{"Follow"}</label>
        <select id="follow-select" {onchange}>
            <option value={FollowTarget::LOCAL_KEY} selected={props.selected == FollowTarget::LOCAL_KEY}>{"Local player"}</option>
            { for props.options.iter().map(|o| {
                let key = FollowTarget::Entity(o.id.clone()).key();
                html! {
                    <option value={key.clone()} selected={props.selected == key}>{ o.name.clone() }</option>
                }
            }) }
        </select>
    </div>}
}
