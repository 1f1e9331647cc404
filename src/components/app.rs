use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::prelude::*;

use super::{
    calibration_panel::CalibrationPanel, camera_controls::CameraControls,
    follow_panel::FollowPanel, radar_view::RadarView, status_panel::StatusPanel,
};
use crate::config::RadarConfig;
use crate::model::{ConnectionStatus, RadarAction, RadarState};
use crate::state::FollowTarget;
use crate::transport::{self, RadarSocket, TransportEvent};
use crate::util::now_ms;

fn location_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| RadarConfig::from_query(&location_search()));
    match &*config {
        Ok(cfg) => html! { <Radar config={cfg.clone()} /> },
        Err(err) => {
            log::error!("{err}");
            html! {
                <div style="width:100vw; height:100vh; display:flex; align-items:center; justify-content:center; background:#0e1116;">
                    <h1 style="color:#f85149; font-family:monospace;">{"NO ROOM PROVIDED"}</h1>
                </div>
            }
        }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct RadarProps {
    pub config: RadarConfig,
}

impl From<TransportEvent> for RadarAction {
    fn from(ev: TransportEvent) -> Self {
        match ev {
            TransportEvent::Connecting => RadarAction::Connection(ConnectionStatus::Connecting),
            TransportEvent::Connected => RadarAction::Connection(ConnectionStatus::Connected),
            TransportEvent::Disconnected => {
                RadarAction::Connection(ConnectionStatus::Disconnected)
            }
            TransportEvent::Error(msg) => RadarAction::Connection(ConnectionStatus::Error(msg)),
            TransportEvent::Snapshot(snapshot) => RadarAction::Snapshot {
                snapshot,
                now_ms: now_ms(),
            },
        }
    }
}

#[function_component(Radar)]
fn radar(props: &RadarProps) -> Html {
    let state = {
        let cfg = props.config.clone();
        use_reducer(move || RadarState::new(&cfg))
    };
    let socket = use_mut_ref(|| None::<RadarSocket>);

    // Fetch credentials, then connect
    {
        let state = state.clone();
        let socket = socket.clone();
        let cfg = props.config.clone();
        use_effect_with((), move |_| {
            let on_event = {
                let state = state.clone();
                Callback::from(move |ev: TransportEvent| state.dispatch(ev.into()))
            };
            {
                let socket = socket.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let server = match transport::fetch_server_config(&cfg.config_endpoint).await {
                        Ok(server) => server,
                        Err(err) => {
                            log::error!("{err}");
                            state.dispatch(RadarAction::Connection(ConnectionStatus::Error(
                                "Error fetching config".into(),
                            )));
                            return;
                        }
                    };
                    match RadarSocket::open(&cfg, &server, on_event) {
                        Ok(s) => *socket.borrow_mut() = Some(s),
                        Err(err) => {
                            log::error!("{err}");
                            state.dispatch(RadarAction::Connection(ConnectionStatus::Error(
                                "Error".into(),
                            )));
                        }
                    }
                });
            }
            move || {
                socket.borrow_mut().take();
            }
        });
    }

    // Staleness poll
    {
        let state = state.clone();
        let period = props.config.stale_poll_ms as i32;
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let tick = Closure::wrap(Box::new(move || {
                state.dispatch(RadarAction::Tick { now_ms: now_ms() });
            }) as Box<dyn FnMut()>);
            let id = window.as_ref().and_then(|w| {
                w.set_interval_with_callback_and_timeout_and_arguments_0(
                    tick.as_ref().unchecked_ref(),
                    period,
                )
                .ok()
            });
            move || {
                if let (Some(w), Some(id)) = (window, id) {
                    w.clear_interval_with_handle(id);
                }
                drop(tick);
            }
        });
    }

    let on_zoom_in = {
        let state = state.clone();
        Callback::from(move |_: ()| state.dispatch(RadarAction::ZoomStep { zoom_in: true }))
    };
    let on_zoom_out = {
        let state = state.clone();
        Callback::from(move |_: ()| state.dispatch(RadarAction::ZoomStep { zoom_in: false }))
    };
    let on_recenter = {
        let state = state.clone();
        Callback::from(move |_: ()| state.dispatch(RadarAction::RecenterRequested))
    };
    let on_follow = {
        let state = state.clone();
        Callback::from(move |target: FollowTarget| {
            state.dispatch(RadarAction::FollowTargetChanged(target))
        })
    };
    let on_offset_x = {
        let state = state.clone();
        Callback::from(move |v: f64| state.dispatch(RadarAction::SetOffsetX(v)))
    };
    let on_offset_y = {
        let state = state.clone();
        Callback::from(move |v: f64| state.dispatch(RadarAction::SetOffsetY(v)))
    };

    let cfg = &props.config;
    html! {
        <RadarView state={state.clone()} map_image_url={cfg.map_image_url.clone()}>
            <StatusPanel
                room={cfg.room.clone()}
                status={state.connection.clone()}
                entity_count={state.snapshot.count()}
                stale={state.staleness.is_stale()}
            />
            <FollowPanel
                options={state.followable_targets()}
                selected={state.camera.followed.key()}
                on_change={on_follow}
            />
            <CameraControls
                tracking={state.camera.is_tracking()}
                {on_zoom_in}
                {on_zoom_out}
                {on_recenter}
            />
            if cfg.debug {
                <CalibrationPanel
                    calibration={state.calibration}
                    transform={state.transform()}
                    {on_offset_x}
                    {on_offset_y}
                />
            }
        </RadarView>
    }
}
