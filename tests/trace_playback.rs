/// End-to-end: engine JSON -> call tree -> step sequence -> timed playback.

use calltrace::application::{Navigator, ShowOutcome};
use calltrace::domain::playback::{PlaybackController, PlaybackEvent, PlaybackState};
use calltrace::domain::symbol::Location;
use calltrace::domain::view_tree::CallTree;
use calltrace::infrastructure::{parse_callers, parse_trace, NavigatorConfig, VirtualScheduler};
use std::time::Duration;

const CREATE_TODO_TRACE: &str = r#"{
    "start": "app.handlers.create_todo",
    "callers": {
        "name": "create_todo", "qualified_name": "app.handlers.create_todo", "type": "function",
        "file": "app/handlers.py", "line": 20, "depth": 0,
        "is_conditional": false, "condition": null, "is_loop": false, "is_try_block": false,
        "children": [
            {"name": "handle_request", "qualified_name": "app.server.handle_request", "type": "function",
             "file": "app/server.py", "line": 8, "depth": 1,
             "is_conditional": false, "condition": null, "is_loop": false, "is_try_block": false,
             "children": []}
        ]
    },
    "callees": {
        "name": "create_todo", "qualified_name": "app.handlers.create_todo", "type": "function",
        "file": "app/handlers.py", "line": 20, "depth": 0,
        "is_conditional": false, "condition": null, "is_loop": false, "is_try_block": false,
        "children": [
            {"name": "validate_request", "qualified_name": "app.validation.validate_request",
             "type": "function", "file": "app/validation.py", "line": 5, "depth": 1,
             "is_conditional": true, "condition": "request.json", "is_loop": false,
             "is_try_block": false, "children": []},
            {"name": "TodoService.create", "qualified_name": "app.services.TodoService.create",
             "type": "method", "file": "app/services.py", "line": 31, "depth": 1,
             "is_conditional": false, "condition": null, "is_loop": false, "is_try_block": true,
             "children": []}
        ]
    }
}"#;

type TestNavigator = Navigator<VirtualScheduler, Vec<PlaybackEvent>>;

fn navigator(config: &NavigatorConfig) -> (TestNavigator, VirtualScheduler) {
    let clock = VirtualScheduler::new();
    let playback = PlaybackController::new(clock.clone(), Vec::new(), config.interval());
    (Navigator::new(CallTree::new(), playback), clock)
}

#[test]
fn test_create_todo_trace_plays_in_order() {
    let config = NavigatorConfig::default();
    let (mut nav, clock) = navigator(&config);

    let trace = parse_trace(CREATE_TODO_TRACE).unwrap();
    assert_eq!(nav.show_trace(Some(&trace)), ShowOutcome::Shown { steps: 4 });
    assert_eq!(
        nav.sequence().labels(),
        vec![
            "handle_request",
            "▶ create_todo ◀",
            "validate_request [if request.json]",
            "TodoService.create [try]",
        ]
    );

    nav.playback.sink_mut().clear();
    nav.play();
    clock.advance(config.interval() * 10, |id| nav.playback.tick(id));

    let expected = vec![
        PlaybackEvent::Reveal { index: 0, location: Location::new("app/server.py", 8) },
        PlaybackEvent::Reveal { index: 1, location: Location::new("app/handlers.py", 20) },
        PlaybackEvent::Reveal { index: 2, location: Location::new("app/validation.py", 5) },
        PlaybackEvent::Reveal { index: 3, location: Location::new("app/services.py", 31) },
        PlaybackEvent::Completed,
    ];
    assert_eq!(nav.playback.sink(), &expected);
    assert_eq!(nav.playback.state(), PlaybackState::Idle);
    assert_eq!(nav.playback.position(), 0);
    assert_eq!(clock.active_timers(), 0);
}

#[test]
fn test_tree_links_follow_trace_nesting() {
    let (mut nav, _clock) = navigator(&NavigatorConfig::default());
    nav.show_trace(Some(&parse_trace(CREATE_TODO_TRACE).unwrap()));

    let roots = nav.tree.roots().to_vec();
    assert_eq!(roots.len(), 3);
    for root in &roots {
        assert_eq!(nav.tree.parent(*root), None);
    }
    let callees_section = roots[2];
    for child in nav.tree.children(callees_section) {
        assert_eq!(nav.tree.parent(*child), Some(callees_section));
        assert_eq!(nav.tree.ancestors(*child), vec![callees_section]);
    }
}

#[test]
fn test_requery_mid_playback_drops_old_timer() {
    let config = NavigatorConfig::from_toml_str("[playback]\ninterval_ms = 200\n").unwrap();
    let (mut nav, clock) = navigator(&config);

    nav.show_trace(Some(&parse_trace(CREATE_TODO_TRACE).unwrap()));
    nav.play();
    clock.advance(Duration::from_millis(400), |id| nav.playback.tick(id));
    assert_eq!(nav.playback.position(), 2);
    let stale = nav.playback.active_timer().unwrap();

    let callers = parse_callers(
        r#"[{"symbol": {"id": 1, "name": "save", "file": "db.py", "line": 3},
             "callers": [{"id": 2, "name": "create", "file": "svc.py", "line": 10, "call_line": 14}]}]"#,
    )
    .unwrap();
    assert_eq!(nav.show_callers(callers.as_ref()), ShowOutcome::Shown { steps: 1 });
    assert_eq!(nav.playback.state(), PlaybackState::Idle);
    assert_eq!(nav.playback.position(), 0);

    nav.playback.tick(stale);
    clock.advance(Duration::from_secs(5), |id| nav.playback.tick(id));
    assert_eq!(nav.playback.position(), 0);
    assert_eq!(nav.playback.current().unwrap().location, Some(Location::new("svc.py", 14)));
}
