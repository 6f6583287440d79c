use std::sync::Once;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use thread_jump_engine::{
    ConversationPage, Extractor, ExtractorConfig, MessageExtractor, Role, RoleSource, ELLIPSIS,
    SNIPPET_CHARS,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(overlay_logging::initialize_for_tests);
}

fn extractor() -> MessageExtractor {
    MessageExtractor::new(ExtractorConfig::default()).unwrap()
}

fn roles(html: &str) -> Vec<(String, Role, RoleSource)> {
    let page = ConversationPage::parse(html);
    extractor()
        .extract(page.html())
        .into_iter()
        .map(|message| (message.id, message.role, message.role_source))
        .collect()
}

#[test]
fn unmarked_messages_alternate_starting_with_user() {
    init_logging();
    let html = r#"<main>
        <div data-message-id="a">Question one</div>
        <div data-message-id="b">Answer one</div>
        <div data-message-id="c">Question two</div>
        <div data-message-id="d">Answer two</div>
    </main>"#;

    assert_eq!(
        roles(html),
        vec![
            ("a".to_string(), Role::User, RoleSource::Position),
            ("b".to_string(), Role::Assistant, RoleSource::Position),
            ("c".to_string(), Role::User, RoleSource::Position),
            ("d".to_string(), Role::Assistant, RoleSource::Position),
        ]
    );
}

#[test]
fn explicit_attribute_beats_markup_and_position() {
    init_logging();
    let html = r#"
        <div data-message-id="a" data-message-author-role="assistant">
            <img alt="User avatar">Odd but explicit
        </div>
        <div data-message-id="b" data-message-author-role="USER">Shouting role</div>
    "#;

    assert_eq!(
        roles(html),
        vec![
            ("a".to_string(), Role::Assistant, RoleSource::Attribute),
            ("b".to_string(), Role::User, RoleSource::Attribute),
        ]
    );
}

#[test]
fn indicator_markup_decides_when_unambiguous() {
    init_logging();
    let html = r#"
        <div data-message-id="a"><div class="markdown">An answer first</div></div>
        <div data-message-id="b"><span class="user-message-bubble-color">Then a question</span></div>
        <div data-message-id="c">
            <div class="markdown">both</div><img alt="User">
            Ambiguous markup
        </div>
    "#;

    assert_eq!(
        roles(html),
        vec![
            ("a".to_string(), Role::Assistant, RoleSource::Markup),
            ("b".to_string(), Role::User, RoleSource::Markup),
            ("c".to_string(), Role::User, RoleSource::Position),
        ]
    );
}

#[test]
fn chrome_and_invisible_text_are_left_out() {
    init_logging();
    let html = r#"
        <div data-message-id="a">
            <button>Copy</button>
            <span class="sr-only">You said:</span>
            Keep   this
            <script>var hidden = 1;</script>
            <p>and this</p>
        </div>
    "#;
    let page = ConversationPage::parse(html);
    let messages = extractor().extract(page.html());

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].raw_text, "Keep this and this");
    assert_eq!(messages[0].normalized_text, "keep this and this");
    assert_eq!(messages[0].snippet, "Keep this and this");
}

#[test]
fn bad_elements_are_skipped_without_losing_the_rest() {
    init_logging();
    let html = r#"
        <div data-message-id="ok-1">first</div>
        <div data-message-id="  ">blank id</div>
        <div data-message-id="ok-1">duplicate</div>
        <div data-message-id="odd" data-message-author-role="system">unknown role</div>
        <div data-message-id="empty"><button>Only chrome</button></div>
        <div data-message-id="ok-2">second</div>
    "#;
    let page = ConversationPage::parse(html);
    let ids: Vec<_> = extractor()
        .extract(page.html())
        .into_iter()
        .map(|message| message.id)
        .collect();

    assert_eq!(ids, vec!["ok-1".to_string(), "ok-2".to_string()]);
}

#[test]
fn long_message_is_snipped_but_fully_searchable() {
    init_logging();
    let text = format!("Well, hello there{}", " and more".repeat(14));
    assert_eq!(text.chars().count(), 143);
    let html = format!(r#"<div data-message-id="m">{text}</div>"#);
    let page = ConversationPage::parse(&html);
    let message = extractor().extract(page.html()).remove(0);

    assert!(message.normalized_text.contains("hello"));
    assert_eq!(message.normalized_text, text.to_lowercase());
    assert!(message.snippet.ends_with(ELLIPSIS));
    assert!(message.snippet.starts_with("Well, hello there"));
}

#[test]
fn custom_markers_from_config() {
    init_logging();
    let config = ExtractorConfig::from_ron(
        r#"(id_attribute: "data-turn", role_attribute: "data-author", chrome_selectors: [".meta"])"#,
    )
    .unwrap();
    let html = r#"
        <section data-turn="t1" data-author="user"><i class="meta">12:00</i>Hi</section>
        <section data-message-id="ignored">Not a turn</section>
    "#;
    let page = ConversationPage::parse(html);
    let messages = MessageExtractor::new(config).unwrap().extract(page.html());

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, "t1");
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].raw_text, "Hi");
}

#[test]
fn invalid_selector_in_config_is_rejected() {
    let config = ExtractorConfig {
        chrome_selectors: vec!["%%not a selector".to_string()],
        ..ExtractorConfig::default()
    };
    assert!(MessageExtractor::new(config).is_err());
}

#[test]
fn empty_page_yields_no_messages() {
    let page = ConversationPage::parse("<html><body><p>No chat here</p></body></html>");
    assert!(extractor().extract(page.html()).is_empty());
}

proptest! {
    #[test]
    fn snippet_is_bounded_and_text_non_empty(words in prop::collection::vec("[a-zA-Z0-9éü]{1,12}", 1..60)) {
        let body = words.join(" ");
        let html = format!(r#"<div data-message-id="p">{body}</div>"#);
        let page = ConversationPage::parse(&html);
        let messages = extractor().extract(page.html());

        prop_assert_eq!(messages.len(), 1);
        let message = &messages[0];
        prop_assert!(!message.normalized_text.trim().is_empty());
        prop_assert!(message.snippet.chars().count() <= SNIPPET_CHARS + ELLIPSIS.len());
        prop_assert_eq!(message.snippet.ends_with(ELLIPSIS), body.chars().count() > SNIPPET_CHARS);
    }
}
