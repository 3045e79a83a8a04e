use crate::components::thread::config::ClientConfig;
use crate::components::thread::error::ThreadError;
use crate::components::thread::intents::{
    delete_message_with_toast, DeleteDoubleCheck, DeleteMessage, Dispatch, History, Intent,
    ModalPayload, DELETE_MESSAGE_PROMPT,
};
use crate::components::thread::links::{get_thread_link, slugify, thread_id_from_slug};
use crate::components::thread::message::{
    should_update, Interaction, MessageController, MessageServices, RenderedMessage,
};
use crate::components::thread::message_view::{DomClick, MessageViewProps};
use crate::components::thread::models::{
    can_moderate_message, show_author_context, Author, CurrentUser, Message, MessageBody,
    MessageId, Reactions, RouteLocation, Thread, ThreadRecord, ThreadState, ThreadType, ToastKind,
    User,
};
use crate::components::thread::selection::{is_optimistic, message_url, selection_id};
use crate::components::thread::storage::parse_state_from_str;
use crate::components::thread::time_format::{format_date, format_time};
use chrono::{TimeZone, Utc};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct RecordingDispatch {
    intents: RefCell<Vec<Intent>>,
}

impl Dispatch for RecordingDispatch {
    fn dispatch(&self, intent: Intent) {
        self.intents.borrow_mut().push(intent);
    }
}

struct FakeDeleter {
    outcome: fn(&MessageId) -> Result<bool, ThreadError>,
    calls: RefCell<Vec<MessageId>>,
}

impl FakeDeleter {
    fn new(outcome: fn(&MessageId) -> Result<bool, ThreadError>) -> Self {
        Self {
            outcome,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl DeleteMessage for FakeDeleter {
    fn delete_message(&self, id: &MessageId) -> Result<bool, ThreadError> {
        self.calls.borrow_mut().push(id.clone());
        (self.outcome)(id)
    }
}

#[derive(Default)]
struct RecordingHistory {
    pushed: RefCell<Vec<RouteLocation>>,
}

impl History for RecordingHistory {
    fn push(&self, location: RouteLocation) {
        self.pushed.borrow_mut().push(location);
    }
}

struct Harness {
    dispatch: Rc<RecordingDispatch>,
    deleter: Rc<FakeDeleter>,
    history: Rc<RecordingHistory>,
    selected: Rc<RefCell<Vec<MessageId>>>,
    services: MessageServices,
}

impl Harness {
    fn new() -> Self {
        Self::with_deleter(FakeDeleter::new(|_| Ok(true)))
    }

    fn with_deleter(deleter: FakeDeleter) -> Self {
        let dispatch = Rc::new(RecordingDispatch::default());
        let deleter = Rc::new(deleter);
        let history = Rc::new(RecordingHistory::default());
        let selected = Rc::new(RefCell::new(Vec::<MessageId>::new()));
        let select_log = selected.clone();
        let services = MessageServices {
            dispatch: dispatch.clone(),
            deleter: deleter.clone(),
            history: history.clone(),
            links: Rc::new(|thread: &Thread| format!("/story/{}", thread.id)),
            select_message: Rc::new(move |id: MessageId| select_log.borrow_mut().push(id)),
            client_url: "https://chat.example".to_string(),
        };
        Self {
            dispatch,
            deleter,
            history,
            selected,
            services,
        }
    }

    fn intents(&self) -> Vec<Intent> {
        self.dispatch.intents.borrow().clone()
    }
}

fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: id.to_uppercase(),
        username: id.to_string(),
        profile_photo: String::new(),
    }
}

fn message(id: MessageId, timestamp: i64) -> Message {
    Message {
        id,
        timestamp,
        modified_at: None,
        author: Author {
            user: user("lin"),
            roles: Vec::new(),
        },
        bot: false,
        reactions: Reactions::default(),
        body: MessageBody::Text("hello".to_string()),
    }
}

fn thread(id: &str) -> Thread {
    Thread {
        id: id.to_string(),
        ..Thread::default()
    }
}

fn controller<'a>(
    message: &'a Message,
    thread: Option<&'a Thread>,
    thread_type: ThreadType,
    location: &'a RouteLocation,
    services: &'a MessageServices,
) -> MessageController<'a> {
    MessageController {
        message,
        thread,
        thread_type,
        location,
        services,
    }
}

fn props(message: Message, thread: Thread, location: RouteLocation, services: &MessageServices) -> MessageViewProps {
    MessageViewProps {
        me: false,
        show_author_context: true,
        message,
        can_moderate_message: true,
        thread: Some(thread),
        thread_type: ThreadType::Story,
        location,
        current_user: None,
        services: services.clone(),
    }
}

#[test]
fn test_rerender_only_on_identity_or_reaction_change() {
    let harness = Harness::new();
    let base = message(MessageId::from("m1"), 1000);
    let before = props(base.clone(), thread("t1"), RouteLocation::new("/t", ""), &harness.services);

    let mut other_context = props(base.clone(), thread("t2"), RouteLocation::new("/x", "?m=abc"), &harness.services);
    other_context.me = true;
    other_context.can_moderate_message = false;
    other_context.thread_type = ThreadType::DirectMessageThread;
    assert!(before == other_context);

    let mut edited = base.clone();
    edited.body = MessageBody::Text("changed".to_string());
    edited.modified_at = Some(2000);
    assert!(!should_update(&base, &edited));

    let mut counted = base.clone();
    counted.reactions.count = 1;
    assert!(should_update(&base, &counted));
    assert!(before != props(counted, thread("t1"), RouteLocation::new("/t", ""), &harness.services));

    let mut reacted = base.clone();
    reacted.reactions.has_reacted = true;
    assert!(should_update(&base, &reacted));

    let renamed = message(MessageId::from("m2"), 1000);
    assert!(should_update(&base, &renamed));
}

#[test]
fn test_selection_id_depends_only_on_timestamp() {
    let mut a = message(MessageId::from("a"), 1000);
    let b = message(MessageId::Number(7), 1000);
    a.reactions.count = 4;
    assert_eq!(selection_id(a.timestamp), selection_id(b.timestamp));
    assert_eq!(selection_id(1000), "OTk5");
}

#[test]
fn test_is_selected_matches_own_id_only() {
    let harness = Harness::new();
    let msg = message(MessageId::from("m1"), 1000);
    let t = thread("t1");

    let own = RouteLocation::new("/story/t1", "?m=OTk5");
    assert!(controller(&msg, Some(&t), ThreadType::Story, &own, &harness.services).is_selected());

    let other = RouteLocation::new("/story/t1", "?m=MTAwMA==");
    assert!(!controller(&msg, Some(&t), ThreadType::Story, &other, &harness.services).is_selected());

    let absent = RouteLocation::new("/story/t1", "");
    assert!(!controller(&msg, Some(&t), ThreadType::Story, &absent, &harness.services).is_selected());

    let malformed = RouteLocation::new("/story/t1", "?m");
    assert!(!controller(&msg, Some(&t), ThreadType::Story, &malformed, &harness.services).is_selected());
}

#[test]
fn test_optimistic_messages_hide_actions() {
    let harness = Harness::new();
    let t = thread("t1");
    let location = RouteLocation::default();

    let pending = message(MessageId::Number(-3), 1000);
    assert!(is_optimistic(&pending));
    assert_eq!(
        controller(&pending, Some(&t), ThreadType::Story, &location, &harness.services)
            .action_row(true),
        None
    );

    for confirmed in [
        message(MessageId::Number(0), 1000),
        message(MessageId::Number(12), 1000),
        message(MessageId::from("-3"), 1000),
    ] {
        assert!(!is_optimistic(&confirmed));
        let row = controller(&confirmed, Some(&t), ThreadType::Story, &location, &harness.services)
            .action_row(true)
            .expect("confirmed messages show actions");
        assert!(row.delete);
        assert!(row.copy_link);
    }
}

#[test]
fn test_action_row_gates() {
    let harness = Harness::new();
    let t = thread("dm1");
    let msg = message(MessageId::from("m1"), 1000);
    let location = RouteLocation::default();
    let row = controller(&msg, Some(&t), ThreadType::DirectMessageThread, &location, &harness.services)
        .action_row(false)
        .expect("actions visible");
    assert!(!row.delete);
    assert!(!row.copy_link);
}

#[test]
fn test_story_message_url_uses_thread_link() {
    let harness = Harness::new();
    let t = thread("t1");
    let msg = message(MessageId::from("m1"), 1000);
    let location = RouteLocation::default();
    let c = controller(&msg, Some(&t), ThreadType::Story, &location, &harness.services);
    assert_eq!(c.message_url(), "/story/t1?m=OTk5");
    assert_eq!(
        c.copy_link_text().as_deref(),
        Some("https://chat.example/story/t1?m=OTk5")
    );
}

#[test]
fn test_direct_message_url() {
    let harness = Harness::new();
    let t = thread("dm1");
    let msg = message(MessageId::from("m1"), 1000);
    let location = RouteLocation::default();
    let c = controller(&msg, Some(&t), ThreadType::DirectMessageThread, &location, &harness.services);
    assert_eq!(c.message_url(), format!("/messages/dm1?m={}", selection_id(1000)));
    assert_eq!(c.copy_link_text(), None);
}

#[test]
fn test_message_url_without_thread_falls_back() {
    let harness = Harness::new();
    let url = message_url(ThreadType::Story, None, harness.services.links.as_ref(), "OTk5");
    assert_eq!(url, "/thread/?m=OTk5");
}

#[test]
fn test_shift_delete_skips_confirmation() {
    let harness = Harness::new();
    let t = thread("t1");
    let msg = message(MessageId::from("m1"), 1000);
    let location = RouteLocation::default();
    let c = controller(&msg, Some(&t), ThreadType::Story, &location, &harness.services);

    let mut interaction = Interaction::new(true, None);
    c.handle_delete(&mut interaction);

    assert!(interaction.propagation_stopped());
    assert_eq!(*harness.deleter.calls.borrow(), vec![MessageId::from("m1")]);
    let intents = harness.intents();
    assert_eq!(
        intents,
        vec![Intent::toast(ToastKind::Neutral, "Message deleted.")]
    );
    assert!(!intents.iter().any(|i| matches!(i, Intent::OpenModal(_))));
}

#[test]
fn test_plain_delete_opens_confirmation() {
    let harness = Harness::new();
    let t = thread("t1");
    let msg = message(MessageId::from("m1"), 1000);
    let location = RouteLocation::default();
    let c = controller(&msg, Some(&t), ThreadType::Story, &location, &harness.services);

    let mut interaction = Interaction::new(false, None);
    c.handle_delete(&mut interaction);

    assert!(interaction.propagation_stopped());
    assert!(harness.deleter.calls.borrow().is_empty());
    let expected = ModalPayload::DeleteDoubleCheck(DeleteDoubleCheck {
        id: MessageId::from("m1"),
        entity: "message".to_string(),
        message: DELETE_MESSAGE_PROMPT.to_string(),
        thread_type: ThreadType::Story,
        thread_id: "t1".to_string(),
    });
    assert_eq!(expected.name(), "DELETE_DOUBLE_CHECK_MODAL");
    assert_eq!(harness.intents(), vec![Intent::OpenModal(expected)]);
}

#[test]
fn test_delete_failures_become_error_toasts() {
    let dispatch = RecordingDispatch::default();
    let refused = FakeDeleter::new(|_| Ok(false));
    delete_message_with_toast(&dispatch, &refused, &MessageId::from("m1"));
    let failed = FakeDeleter::new(|id| Err(ThreadError::MessageNotFound(id.clone())));
    delete_message_with_toast(&dispatch, &failed, &MessageId::from("m9"));

    assert_eq!(
        *dispatch.intents.borrow(),
        vec![
            Intent::toast(ToastKind::Error, "Could not delete message."),
            Intent::toast(ToastKind::Error, "message m9 not found"),
        ]
    );
}

#[test]
fn test_outside_click_clears_selection() {
    let harness = Harness::new();
    let t = thread("t1");
    let msg = message(MessageId::from("m1"), 1000);
    let location = RouteLocation::new("/story/t1", "?m=OTk5&ref=email");
    let c = controller(&msg, Some(&t), ThreadType::Story, &location, &harness.services);
    let region = RenderedMessage {
        message_id: MessageId::from("m1"),
    };

    assert!(!c.handle_outside_click(&Interaction::new(false, Some(MessageId::from("m1"))), &region));
    assert!(harness.history.pushed.borrow().is_empty());

    assert!(c.handle_outside_click(&Interaction::new(false, Some(MessageId::from("m2"))), &region));
    assert!(c.handle_outside_click(&Interaction::new(false, None), &region));
    assert_eq!(
        *harness.history.pushed.borrow(),
        vec![
            RouteLocation::new("/story/t1", ""),
            RouteLocation::new("/story/t1", ""),
        ]
    );
}

#[test]
fn test_outside_click_ignored_when_not_selected() {
    let harness = Harness::new();
    let t = thread("t1");
    let msg = message(MessageId::from("m1"), 1000);
    let location = RouteLocation::new("/story/t1", "?m=other");
    let c = controller(&msg, Some(&t), ThreadType::Story, &location, &harness.services);
    let region = c.region();

    assert!(!c.handle_outside_click(&Interaction::new(false, None), &region));
    assert!(harness.history.pushed.borrow().is_empty());
}

#[test]
fn test_mobile_tap_selects_message() {
    let harness = Harness::new();
    let t = thread("t1");
    let msg = message(MessageId::from("m1"), 1000);
    let location = RouteLocation::default();
    let c = controller(&msg, Some(&t), ThreadType::Story, &location, &harness.services);
    let region = c.region();

    let mut wide = Interaction::new(false, Some(MessageId::from("m1")));
    assert!(!c.handle_select_message(&mut wide, &1024.0, &region));
    assert!(!wide.propagation_stopped());

    let mut at_breakpoint = Interaction::new(false, Some(MessageId::from("m1")));
    assert!(!c.handle_select_message(&mut at_breakpoint, &768.0, &region));

    let mut elsewhere = Interaction::new(false, Some(MessageId::from("m2")));
    assert!(!c.handle_select_message(&mut elsewhere, &500.0, &region));
    assert!(!elsewhere.propagation_stopped());

    let mut inside = Interaction::new(false, Some(MessageId::from("m1")));
    assert!(c.handle_select_message(&mut inside, &767.0, &region));
    assert!(inside.propagation_stopped());

    assert_eq!(*harness.selected.borrow(), vec![MessageId::from("m1")]);
}

#[test]
fn test_gallery_and_copy_dispatch() {
    let harness = Harness::new();
    let t = thread("t1");
    let msg = message(MessageId::from("m1"), 1000);
    let location = RouteLocation::default();
    let c = controller(&msg, Some(&t), ThreadType::Story, &location, &harness.services);

    let mut interaction = Interaction::default();
    c.toggle_open_gallery(&mut interaction);
    assert!(interaction.propagation_stopped());
    c.on_copy_success();

    assert_eq!(
        harness.intents(),
        vec![
            Intent::OpenGallery {
                thread_id: "t1".to_string(),
                message_id: MessageId::from("m1"),
            },
            Intent::toast(ToastKind::Success, "Copied to clipboard"),
        ]
    );
}

#[test]
fn test_reaction_toggle_skips_own_messages() {
    let harness = Harness::new();
    let t = thread("t1");
    let msg = message(MessageId::from("m1"), 1000);
    let location = RouteLocation::default();
    let c = controller(&msg, Some(&t), ThreadType::Story, &location, &harness.services);

    c.toggle_reaction(true, &mut Interaction::default());
    assert!(harness.intents().is_empty());

    c.toggle_reaction(false, &mut Interaction::default());
    assert_eq!(
        harness.intents(),
        vec![Intent::ToggleReaction {
            message_id: MessageId::from("m1")
        }]
    );
}

fn state_with(messages: Vec<Message>) -> ThreadState {
    ThreadState {
        threads: vec![ThreadRecord {
            thread: thread("t1"),
            thread_type: ThreadType::Story,
            messages,
        }],
        ..ThreadState::default()
    }
}

#[test]
fn test_reducer_toggles_reactions() {
    let mut state = state_with(vec![message(MessageId::from("m1"), 1000)]);
    let toggle = Intent::ToggleReaction {
        message_id: MessageId::from("m1"),
    };

    state.apply(toggle.clone());
    let reactions = state.find_message(&MessageId::from("m1")).unwrap().1.reactions;
    assert_eq!(reactions, Reactions { count: 1, has_reacted: true });

    state.apply(toggle);
    let reactions = state.find_message(&MessageId::from("m1")).unwrap().1.reactions;
    assert_eq!(reactions, Reactions { count: 0, has_reacted: false });

    state.apply(Intent::ToggleReaction {
        message_id: MessageId::from("missing"),
    });
}

#[test]
fn test_reducer_toasts_modals_gallery() {
    let mut state = state_with(Vec::new());

    state.apply(Intent::toast(ToastKind::Success, "Copied to clipboard"));
    assert_eq!(state.toasts.len(), 1);
    let id = state.toasts[0].id.clone();
    state.apply(Intent::RemoveToast(id));
    assert!(state.toasts.is_empty());

    let payload = ModalPayload::DeleteDoubleCheck(DeleteDoubleCheck {
        id: MessageId::from("m1"),
        entity: "message".to_string(),
        message: DELETE_MESSAGE_PROMPT.to_string(),
        thread_type: ThreadType::Story,
        thread_id: "t1".to_string(),
    });
    state.apply(Intent::OpenModal(payload.clone()));
    assert_eq!(state.modal, Some(payload));
    state.apply(Intent::CloseModal);
    assert_eq!(state.modal, None);

    state.apply(Intent::OpenGallery {
        thread_id: "t1".to_string(),
        message_id: MessageId::from("m1"),
    });
    assert!(state.gallery.is_some());
    state.apply(Intent::CloseGallery);
    assert!(state.gallery.is_none());

    state.apply(Intent::SelectMessage(MessageId::from("m1")));
    assert_eq!(state.focused_message, Some(MessageId::from("m1")));
    state.apply(Intent::SelectMessage(MessageId::from("m1")));
    assert_eq!(state.focused_message, None);
}

#[test]
fn test_remove_message() {
    let mut state = state_with(vec![
        message(MessageId::from("m1"), 1000),
        message(MessageId::Number(-1), 2000),
    ]);

    assert!(state.remove_message(&MessageId::from("m1")).unwrap());
    assert!(state.find_message(&MessageId::from("m1")).is_none());
    assert!(matches!(
        state.remove_message(&MessageId::from("m1")),
        Err(ThreadError::MessageNotFound(_))
    ));
    assert!(matches!(
        state.remove_message(&MessageId::Number(-1)),
        Err(ThreadError::Unconfirmed(_))
    ));
}

#[test]
fn test_moderation_and_grouping() {
    let msg = message(MessageId::from("m1"), 1000);
    let author = CurrentUser {
        user: user("lin"),
        ..CurrentUser::default()
    };
    let stranger = CurrentUser {
        user: user("ada"),
        ..CurrentUser::default()
    };
    let moderator = CurrentUser {
        user: user("ada"),
        is_moderator: true,
        ..CurrentUser::default()
    };
    assert!(can_moderate_message(Some(&author), &msg));
    assert!(!can_moderate_message(Some(&stranger), &msg));
    assert!(can_moderate_message(Some(&moderator), &msg));
    assert!(!can_moderate_message(None, &msg));

    let soon = message(MessageId::from("m2"), 1000 + 60_000);
    let later = message(MessageId::from("m3"), 1000 + 11 * 60_000);
    let mut other_author = message(MessageId::from("m4"), 1000 + 60_000);
    other_author.author.user = user("ada");
    assert!(show_author_context(None, &msg));
    assert!(!show_author_context(Some(&msg), &soon));
    assert!(show_author_context(Some(&msg), &later));
    assert!(show_author_context(Some(&msg), &other_author));
}

#[test]
fn test_thread_links() {
    assert_eq!(slugify("Launch checklist: v2, now!"), "launch-checklist-v2-now");
    assert_eq!(slugify("  --  "), "");
    let t = Thread {
        id: "t-launch".to_string(),
        title: "Launch checklist for the new editor".to_string(),
        community_slug: "makers".to_string(),
        channel_slug: "general".to_string(),
    };
    let link = get_thread_link(&t);
    assert_eq!(link, "/makers/general/launch-checklist-for-the-new-editor~t-launch");
    assert_eq!(thread_id_from_slug("launch-checklist-for-the-new-editor~t-launch"), "t-launch");
    assert_eq!(get_thread_link(&thread("t1")), "/thread/t1");
}

#[test]
fn test_route_location_split() {
    let location = RouteLocation::from_path("/thread/t1?m=OTk5");
    assert_eq!(location, RouteLocation::new("/thread/t1", "?m=OTk5"));
    assert_eq!(location.to_string(), "/thread/t1?m=OTk5");
    assert_eq!(RouteLocation::from_path("/thread/t1"), RouteLocation::new("/thread/t1", ""));
}

#[test]
fn test_time_formatting() {
    let date = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    assert_eq!(format_time(&date), "10:13pm");
    assert_eq!(format_date(&date), "November 14, 2023 · 10:13pm");
    let morning = Utc.with_ymd_and_hms(2019, 1, 3, 0, 5, 0).unwrap();
    assert_eq!(format_time(&morning), "12:05am");
}

#[test]
fn test_client_config() {
    let config = ClientConfig::from_json(r#"{"client_url": "https://chat.example/"}"#).unwrap();
    assert_eq!(config.client_url, "https://chat.example");
    assert_eq!(config.toast_timeout_ms, 4000);
    assert!(matches!(
        ClientConfig::from_json("{"),
        Err(ThreadError::Config(_))
    ));
}

#[test]
fn test_bundled_state_parses() {
    let state = parse_state_from_str(include_str!("../../thread_dx_state_default.json")).unwrap();
    assert_eq!(state.threads.len(), 2);
    let dm = state.thread("dm-ada-lin").unwrap();
    assert_eq!(dm.thread_type, ThreadType::DirectMessageThread);
    assert!(dm.messages.iter().any(is_optimistic));
    let (_, media) = state.find_message(&MessageId::from("m-3")).unwrap();
    assert!(matches!(media.body, MessageBody::Media { .. }));
    assert!(matches!(
        parse_state_from_str("{"),
        Err(ThreadError::State(_))
    ));
}

#[test]
fn test_message_dom_keys_keep_id_kinds_apart() {
    let optimistic = MessageId::Number(-1);
    let text = MessageId::from("-1");
    assert_eq!(optimistic.dom_key(), "n:-1");
    assert_eq!(text.dom_key(), "s:-1");
    assert_eq!(MessageId::from_dom_key("n:-1"), Some(optimistic));
    assert_eq!(MessageId::from_dom_key("s:-1"), Some(text));
    assert_eq!(MessageId::from_dom_key("s:m:1"), Some(MessageId::from("m:1")));
    assert_eq!(MessageId::from_dom_key("n:abc"), None);
    assert_eq!(MessageId::from_dom_key("m-1"), None);

    let click = DomClick {
        shift_key: true,
        target: Some("s:m-2".to_string()),
    };
    assert_eq!(
        click.into_interaction(),
        Interaction::new(true, Some(MessageId::from("m-2")))
    );
    assert_eq!(DomClick::default().into_interaction(), Interaction::default());
    let click: DomClick = serde_json::from_str(r#"{"shift_key":false,"target":null}"#).unwrap();
    assert_eq!(click.into_interaction().target, None);
}

#[test]
fn test_markers_follow_selection_and_confirmation() {
    let harness = Harness::new();
    let t = thread("t1");
    let mut msg = message(MessageId::from("m1"), 1000);
    let selected = RouteLocation::new("/story/t1", "?m=OTk5");
    let plain = RouteLocation::new("/story/t1", "");

    let markers = controller(&msg, Some(&t), ThreadType::Story, &selected, &harness.services)
        .markers(true);
    assert_eq!(markers.container_class, "message message-selected");
    assert_eq!(markers.data_cy, "message-selected");
    assert_eq!(markers.dom_key, "s:m1");
    assert_eq!(markers.edited_tooltip, None);
    assert!(markers.action_row.is_some());

    msg.modified_at = Some(2000);
    let markers = controller(&msg, Some(&t), ThreadType::Story, &plain, &harness.services)
        .markers(true);
    assert_eq!(markers.container_class, "message");
    assert_eq!(markers.data_cy, "message");
    assert!(markers
        .edited_tooltip
        .as_deref()
        .is_some_and(|tooltip| tooltip.starts_with("Edited ")));

    let pending = message(MessageId::Number(-2), 1000);
    let markers = controller(&pending, Some(&t), ThreadType::Story, &selected, &harness.services)
        .markers(true);
    assert_eq!(markers.action_row, None);
    assert_eq!(markers.dom_key, "n:-2");
}

mod click_tracking {
    use super::{Interaction, MessageId, RenderedMessage};
    use crate::components::thread::message_view::{ClickTracker, DomClick, OutsideClickHandler};
    use dioxus::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct OutsideClicks(Rc<RefCell<Vec<Interaction>>>);

    fn selected_message() -> Element {
        let clicks = use_context::<OutsideClicks>();
        rsx! {
            OutsideClickHandler {
                region: RenderedMessage { message_id: MessageId::from("m1") },
                on_outside_click: move |interaction: Interaction| {
                    clicks.0.borrow_mut().push(interaction);
                },
                span { "selected" }
            }
        }
    }

    fn click_on(target: &str, shift_key: bool) -> Interaction {
        DomClick {
            shift_key,
            target: Some(MessageId::from(target).dom_key()),
        }
        .into_interaction()
    }

    fn settle(dom: &mut VirtualDom) {
        for _ in 0..3 {
            dom.render_immediate_to_vec();
        }
    }

    fn mount(before_mount: &[Interaction]) -> (VirtualDom, ClickTracker, OutsideClicks) {
        let clicks = OutsideClicks::default();
        let mut dom = VirtualDom::new(selected_message);
        let tracker = dom.in_scope(ScopeId::ROOT, ClickTracker::new);
        for interaction in before_mount {
            dom.in_scope(ScopeId::ROOT, || tracker.publish(interaction.clone()));
        }
        dom.provide_root_context(tracker);
        dom.provide_root_context(clicks.clone());
        dom.rebuild_in_place();
        settle(&mut dom);
        (dom, tracker, clicks)
    }

    #[test]
    fn test_click_on_other_message_delete_reaches_selected_message() {
        let (mut dom, tracker, clicks) = mount(&[]);
        assert!(clicks.0.borrow().is_empty());

        // The delete handler of m2 stops propagation; the capture listener has
        // already reported the click.
        dom.in_scope(ScopeId::ROOT, || tracker.publish(click_on("m2", true)));
        settle(&mut dom);

        assert_eq!(
            *clicks.0.borrow(),
            vec![Interaction::new(true, Some(MessageId::from("m2")))]
        );
    }

    #[test]
    fn test_clicks_inside_selected_message_are_ignored() {
        let (mut dom, tracker, clicks) = mount(&[]);

        dom.in_scope(ScopeId::ROOT, || tracker.publish(click_on("m1", false)));
        settle(&mut dom);
        assert!(clicks.0.borrow().is_empty());

        dom.in_scope(ScopeId::ROOT, || {
            tracker.publish(DomClick::default().into_interaction())
        });
        settle(&mut dom);
        assert_eq!(*clicks.0.borrow(), vec![Interaction::new(false, None)]);
    }

    #[test]
    fn test_click_published_before_mount_is_ignored() {
        let (mut dom, tracker, clicks) = mount(&[click_on("m2", false)]);
        assert_eq!(tracker.seq(), 1);
        assert!(clicks.0.borrow().is_empty());

        dom.in_scope(ScopeId::ROOT, || tracker.publish(click_on("m3", false)));
        settle(&mut dom);
        assert_eq!(clicks.0.borrow().len(), 1);
    }
}
