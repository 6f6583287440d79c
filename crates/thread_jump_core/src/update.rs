use crate::{AppState, Effect, Msg, PanelPhase, PointerTarget, ResizeDrag};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ToggleClicked => match state.phase() {
            PanelPhase::Absent => begin_loading(&mut state),
            PanelPhase::Loading => Vec::new(),
            PanelPhase::Hidden => open(&mut state),
            PanelPhase::Visible => close(&mut state),
        },
        Msg::OpenRequested => match state.phase() {
            PanelPhase::Absent => begin_loading(&mut state),
            PanelPhase::Loading => Vec::new(),
            PanelPhase::Hidden | PanelPhase::Visible => open(&mut state),
        },
        Msg::CloseRequested | Msg::EscapePressed => {
            if state.is_visible() {
                close(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::SettingsLoaded(geometry) => {
            if state.phase() == PanelPhase::Loading {
                state.set_geometry(geometry);
                let mut effects = vec![Effect::BuildPanel { geometry }];
                effects.extend(open(&mut state));
                effects
            } else {
                Vec::new()
            }
        }
        Msg::PointerDown { target } => match target {
            PointerTarget::Page if state.is_visible() && state.outside_click_armed() => {
                close(&mut state)
            }
            PointerTarget::Page | PointerTarget::Panel | PointerTarget::ToggleButton => {
                Vec::new()
            }
        },
        Msg::AnimationFrame => {
            if state.run_pending_frame() {
                vec![Effect::FocusSearch]
            } else {
                Vec::new()
            }
        }
        Msg::TabSelected(category) => {
            state.switch_tab(category);
            rescan_if_visible(&state)
        }
        Msg::SearchChanged(term) => {
            state.set_search_term(term);
            rescan_if_visible(&state)
        }
        Msg::DocumentChanged => rescan_if_visible(&state),
        Msg::MessagesExtracted(messages) => {
            state.set_messages(messages);
            Vec::new()
        }
        Msg::RowClicked(id) => {
            if state.is_visible() && state.knows_message(&id) {
                let mut effects = vec![Effect::ScrollToMessage { id }];
                effects.extend(close(&mut state));
                effects
            } else {
                Vec::new()
            }
        }
        Msg::ResizeStarted { pointer, panel } => {
            if state.is_visible() && !state.is_resizing() {
                state.start_resize(ResizeDrag::begin(pointer, panel.width, panel.height));
                vec![Effect::SuspendPagePointerEvents]
            } else {
                Vec::new()
            }
        }
        Msg::ResizeMoved { pointer, viewport } => {
            let tracked = state.resize_mut().map(|drag| drag.track(pointer, viewport));
            if let Some((width, height)) = tracked {
                let anchor = state.anchor().keep_on_screen(width, height, viewport);
                state.set_anchor(anchor);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ResizeEnded => match state.take_resize() {
            Some(drag) => {
                let geometry = drag.finish();
                state.set_geometry(geometry);
                vec![
                    Effect::RestorePagePointerEvents,
                    Effect::PersistGeometry(geometry),
                ]
            }
            None => Vec::new(),
        },
        Msg::Teardown => {
            let was_resizing = state.is_resizing();
            state = AppState::new();
            state.mark_dirty();
            let mut effects = Vec::with_capacity(2);
            if was_resizing {
                effects.push(Effect::RestorePagePointerEvents);
            }
            effects.push(Effect::RemoveOverlay);
            effects
        }
    };

    (state, effects)
}

fn begin_loading(state: &mut AppState) -> Vec<Effect> {
    state.begin_loading();
    vec![Effect::LoadSettings]
}

fn open(state: &mut AppState) -> Vec<Effect> {
    state.show();
    vec![
        Effect::ShowPanel,
        Effect::RescanMessages,
        Effect::RequestAnimationFrame,
    ]
}

fn close(state: &mut AppState) -> Vec<Effect> {
    state.hide();
    vec![Effect::HidePanel]
}

fn rescan_if_visible(state: &AppState) -> Vec<Effect> {
    if state.is_visible() {
        vec![Effect::RescanMessages]
    } else {
        Vec::new()
    }
}
