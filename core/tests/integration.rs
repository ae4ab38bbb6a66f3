//! Drive `TodoApp` against the live mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port in a background
//! thread, then talks to it over real HTTP through `UreqTransport`. The list
//! held by the app is compared against what the server reports directly, so
//! any client-side drift shows up as a mismatch.

use todo_sync::{
    ApiError, Operation, SyncError, Todo, TodoApp, TodoClient, TodoDraft, TodoId, Transport,
    UreqTransport, ValidationPolicy,
};

fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// What the server holds right now, bypassing the app.
fn server_todos(base_url: &str, transport: &UreqTransport) -> Vec<Todo> {
    let client = TodoClient::new(base_url);
    let response = transport.execute(&client.build_list_todos()).unwrap();
    client.parse_list_todos(response).unwrap()
}

fn new_app(base_url: &str) -> TodoApp {
    TodoApp::new(TodoClient::new(base_url), ValidationPolicy::default())
}

fn create(app: &mut TodoApp, transport: &UreqTransport, title: &str, description: &str) {
    *app.form_mut() = TodoDraft::new(title, description);
    app.create(transport).unwrap();
}

#[test]
fn crud_lifecycle_stays_in_sync() {
    let base_url = spawn_server();
    let transport = UreqTransport::new();
    let mut app = new_app(&base_url);

    // Step 1: initial load — empty.
    app.load(&transport).unwrap();
    assert!(app.todos().is_empty());

    // Step 2: create with a title only.
    create(&mut app, &transport, "Buy milk", "");
    assert!(app.form().is_blank());
    assert_eq!(app.todos().len(), 1);
    let milk = app.todos()[0].id;
    assert_eq!(app.todos()[0].title, "Buy milk");

    // Step 3: create with a description only.
    create(&mut app, &transport, "", "no title here");
    assert_eq!(app.todos().len(), 2);

    // Step 4: rename the first, description untouched.
    app.begin_edit(milk).unwrap();
    app.edit_draft_mut().unwrap().title = "Renamed".to_string();
    app.update(&transport).unwrap();
    assert!(!app.editing().is_active());
    let renamed = app.store().find(milk).unwrap();
    assert_eq!(renamed.title, "Renamed");
    assert_eq!(renamed.description, "");

    // Step 5: delete it.
    app.begin_delete(milk).unwrap();
    app.delete(&transport).unwrap();
    assert!(!app.deleting().is_active());
    assert!(app.store().find(milk).is_none());

    // Step 6: the app's list is exactly the server's.
    assert_eq!(app.todos(), server_todos(&base_url, &transport).as_slice());
}

#[test]
fn interleaved_writes_and_loads_end_in_server_state() {
    let base_url = spawn_server();
    let transport = UreqTransport::new();
    let mut app = new_app(&base_url);
    app.load(&transport).unwrap();

    for i in 0..5 {
        create(&mut app, &transport, &format!("item {i}"), "batch");
    }
    let ids: Vec<TodoId> = app.todos().iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), 5);

    for id in ids.iter().step_by(2) {
        app.begin_delete(*id).unwrap();
        app.delete(&transport).unwrap();
        app.load(&transport).unwrap();
    }
    for id in ids.iter().skip(1).step_by(2) {
        app.begin_edit(*id).unwrap();
        app.edit_draft_mut().unwrap().description = "edited".to_string();
        app.update(&transport).unwrap();
    }

    app.load(&transport).unwrap();
    let server = server_todos(&base_url, &transport);
    assert_eq!(app.todos(), server.as_slice());
    assert_eq!(server.len(), 2);
    assert!(server.iter().all(|t| t.description == "edited"));
}

#[test]
fn update_of_a_vanished_todo_keeps_the_modal_open() {
    let base_url = spawn_server();
    let transport = UreqTransport::new();
    let mut app = new_app(&base_url);
    app.load(&transport).unwrap();
    create(&mut app, &transport, "Ephemeral", "gone soon");
    let id = app.todos()[0].id;

    // Someone else deletes it behind our back.
    let client = TodoClient::new(&base_url);
    let request = client
        .build_delete_todo(id, &TodoDraft::default())
        .unwrap();
    client
        .parse_delete_todo(transport.execute(&request).unwrap())
        .unwrap();

    app.begin_edit(id).unwrap();
    *app.edit_draft_mut().unwrap() = TodoDraft::new("Still here?", "no");
    let err = app.update(&transport).unwrap_err();

    assert!(matches!(
        err,
        SyncError::Api {
            op: Operation::Update,
            source: ApiError::NotFound
        }
    ));
    assert_eq!(app.editing().draft(), Some(&TodoDraft::new("Still here?", "no")));
    assert_eq!(app.todos().len(), 1, "list is only refreshed by a reload");
    assert_eq!(app.take_notice().unwrap().operation, Operation::Update);

    app.cancel_edit();
    app.load(&transport).unwrap();
    assert!(app.todos().is_empty());
}

#[test]
fn blank_create_never_reaches_the_server() {
    let base_url = spawn_server();
    let transport = UreqTransport::new();
    let mut app = new_app(&base_url);
    app.load(&transport).unwrap();

    let err = app.create(&transport).unwrap_err();
    assert!(matches!(err, SyncError::Validation(_)));
    assert!(server_todos(&base_url, &transport).is_empty());
}

#[test]
fn unreachable_server_is_recorded_on_the_store() {
    let dead = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let transport = UreqTransport::new();
    let mut app = new_app(&format!("http://{dead}"));

    assert!(matches!(app.load(&transport), Err(ApiError::Transport(_))));
    assert!(app.todos().is_empty());
    assert!(app.store().last_error().is_some());
    assert!(app.notice().is_none());
}
