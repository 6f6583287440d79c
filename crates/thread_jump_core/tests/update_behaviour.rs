use std::sync::Once;

use pretty_assertions::assert_eq;
use thread_jump_core::{
    update, AppState, Category, Effect, ListView, MessageEntry, MessageId, Msg, PanelGeometry,
    PanelPhase, PointerTarget, Role, NO_MESSAGES_NOTICE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(overlay_logging::initialize_for_tests);
}

fn entry(id: &str, role: Role, text: &str) -> MessageEntry {
    MessageEntry {
        id: MessageId::from(id),
        role,
        normalized_text: text.to_lowercase(),
        snippet: text.to_string(),
    }
}

fn sample_messages() -> Vec<MessageEntry> {
    vec![
        entry("m1", Role::User, "How do I parse HTML?"),
        entry("m2", Role::Assistant, "Use a parser crate."),
        entry("m3", Role::User, "Thanks, that helps"),
    ]
}

fn open_panel(messages: Vec<MessageEntry>) -> AppState {
    let (state, _) = update(AppState::new(), Msg::ToggleClicked);
    let (state, _) = update(state, Msg::SettingsLoaded(PanelGeometry::default()));
    let (state, _) = update(state, Msg::MessagesExtracted(messages));
    let (state, _) = update(state, Msg::AnimationFrame);
    state
}

#[test]
fn first_toggle_waits_for_settings_before_building() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ToggleClicked);
    assert_eq!(state.phase(), PanelPhase::Loading);
    assert_eq!(effects, vec![Effect::LoadSettings]);

    // Further toggles while loading are ignored.
    let (state, effects) = update(state, Msg::ToggleClicked);
    assert_eq!(state.phase(), PanelPhase::Loading);
    assert!(effects.is_empty());

    let geometry = PanelGeometry {
        width: 640,
        height: 480,
    };
    let (state, effects) = update(state, Msg::SettingsLoaded(geometry));
    assert_eq!(state.phase(), PanelPhase::Visible);
    assert_eq!(state.geometry(), geometry);
    assert_eq!(
        effects,
        vec![
            Effect::BuildPanel { geometry },
            Effect::ShowPanel,
            Effect::RescanMessages,
            Effect::RequestAnimationFrame,
        ]
    );
}

#[test]
fn focus_and_outside_click_wait_one_frame() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ToggleClicked);
    let (state, _) = update(state, Msg::SettingsLoaded(PanelGeometry::default()));
    assert!(!state.outside_click_armed());

    // The click that opened the panel must not close it again.
    let (state, effects) = update(
        state,
        Msg::PointerDown {
            target: PointerTarget::Page,
        },
    );
    assert_eq!(state.phase(), PanelPhase::Visible);
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::AnimationFrame);
    assert_eq!(effects, vec![Effect::FocusSearch]);
    assert!(state.outside_click_armed());

    // A second frame has nothing left to do.
    let (_state, effects) = update(state, Msg::AnimationFrame);
    assert!(effects.is_empty());
}

#[test]
fn outside_click_closes_but_panel_and_toggle_clicks_do_not() {
    init_logging();
    let state = open_panel(sample_messages());

    let (state, effects) = update(
        state,
        Msg::PointerDown {
            target: PointerTarget::Panel,
        },
    );
    assert!(state.is_visible());
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::PointerDown {
            target: PointerTarget::ToggleButton,
        },
    );
    assert!(state.is_visible());
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::PointerDown {
            target: PointerTarget::Page,
        },
    );
    assert_eq!(state.phase(), PanelPhase::Hidden);
    assert!(!state.outside_click_armed());
    assert_eq!(effects, vec![Effect::HidePanel]);

    // Ignored while hidden.
    let (state, effects) = update(
        state,
        Msg::PointerDown {
            target: PointerTarget::Page,
        },
    );
    assert_eq!(state.phase(), PanelPhase::Hidden);
    assert!(effects.is_empty());
}

#[test]
fn toggle_reopens_a_built_panel_without_reloading_settings() {
    init_logging();
    let state = open_panel(sample_messages());
    let (state, effects) = update(state, Msg::ToggleClicked);
    assert_eq!(state.phase(), PanelPhase::Hidden);
    assert_eq!(effects, vec![Effect::HidePanel]);

    let (state, effects) = update(state, Msg::ToggleClicked);
    assert_eq!(state.phase(), PanelPhase::Visible);
    assert_eq!(
        effects,
        vec![
            Effect::ShowPanel,
            Effect::RescanMessages,
            Effect::RequestAnimationFrame
        ]
    );
}

#[test]
fn escape_closes_only_when_open() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::EscapePressed);
    assert_eq!(state.phase(), PanelPhase::Absent);
    assert!(effects.is_empty());

    let state = open_panel(sample_messages());
    let (state, effects) = update(state, Msg::EscapePressed);
    assert_eq!(state.phase(), PanelPhase::Hidden);
    assert_eq!(effects, vec![Effect::HidePanel]);
}

#[test]
fn row_click_scrolls_then_closes_in_one_update() {
    init_logging();
    let state = open_panel(sample_messages());
    let (state, effects) = update(state, Msg::RowClicked(MessageId::from("m2")));

    assert_eq!(state.phase(), PanelPhase::Hidden);
    assert_eq!(
        effects,
        vec![
            Effect::ScrollToMessage {
                id: MessageId::from("m2")
            },
            Effect::HidePanel,
        ]
    );
}

#[test]
fn row_click_for_unknown_message_is_ignored() {
    init_logging();
    let state = open_panel(sample_messages());
    let (state, effects) = update(state, Msg::RowClicked(MessageId::from("gone")));
    assert!(state.is_visible());
    assert!(effects.is_empty());
}

#[test]
fn tab_switch_keeps_search_term_and_rescans() {
    init_logging();
    let state = open_panel(sample_messages());
    let (state, _) = update(state, Msg::SearchChanged("thanks".into()));
    let (state, effects) = update(state, Msg::TabSelected(Category::Assistant));

    assert_eq!(effects, vec![Effect::RescanMessages]);
    let view = state.view();
    assert_eq!(view.active_category, Category::Assistant);
    assert_eq!(view.search_text, "thanks");
    assert_eq!(view.placeholder, "Filter AI answers...");
    assert!(view.tabs.iter().any(|tab| tab.active && tab.label == "AI"));
    assert_eq!(
        view.list,
        ListView::Empty {
            notice: NO_MESSAGES_NOTICE
        }
    );
}

#[test]
fn search_rows_carry_badges_and_highlights() {
    init_logging();
    let state = open_panel(sample_messages());
    let (state, _) = update(state, Msg::SearchChanged("  THAT ".into()));
    let view = state.view();
    let rows = view.list.rows();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, MessageId::from("m3"));
    assert_eq!(rows[0].badge, "[You]");
    let marked: Vec<&str> = rows[0]
        .segments
        .iter()
        .filter(|segment| segment.highlighted)
        .map(|segment| segment.text.as_str())
        .collect();
    assert_eq!(marked, vec!["that"]);
}

#[test]
fn document_changes_rescan_only_while_visible() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::DocumentChanged);
    assert!(effects.is_empty());
    assert!(!state.is_visible());

    let state = open_panel(sample_messages());
    let (state, effects) = update(state, Msg::DocumentChanged);
    assert_eq!(effects, vec![Effect::RescanMessages]);

    let (state, _) = update(state, Msg::CloseRequested);
    let (_state, effects) = update(state, Msg::DocumentChanged);
    assert!(effects.is_empty());
}

#[test]
fn identical_extraction_does_not_mark_dirty() {
    init_logging();
    let mut state = open_panel(sample_messages());
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::MessagesExtracted(sample_messages()));
    assert!(!state.consume_dirty());

    let (mut state, _) = update(state, Msg::MessagesExtracted(Vec::new()));
    assert!(state.consume_dirty());
    assert_eq!(
        state.view().list,
        ListView::Empty {
            notice: NO_MESSAGES_NOTICE
        }
    );
}

#[test]
fn teardown_resets_the_session() {
    init_logging();
    let state = open_panel(sample_messages());
    let (state, effects) = update(state, Msg::Teardown);
    assert_eq!(state.phase(), PanelPhase::Absent);
    assert!(state.messages().is_empty());
    assert_eq!(effects, vec![Effect::RemoveOverlay]);
}
