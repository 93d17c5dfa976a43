//! In-process stand-in for the board API.
//!
//! Serves the same REST surface as the real backend on an ephemeral port,
//! keeps everything in memory, and authenticates with a `session` cookie.
//! Tests can flip [`MockBackend::fail_writes`] to make every non-auth write
//! answer 500, and inspect [`MockBackend::requests`] afterwards.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use trellis_common::{
    AssigneeWithUser, Board, BoardMember, Card, CardAssignee, CardWithDetails, Comment,
    CommentWithUser, Invite, InviteStatus, List, ListWithCards, MemberRole, MemberWithUser, User,
};

const STAMP: &str = "2024-01-01T00:00:00";

type Shared = Arc<Mutex<Store>>;
type Reply = Result<Response, Response>;

#[derive(Default)]
struct Store {
    next_id: i64,
    users: Vec<(User, String)>,
    sessions: HashMap<String, i64>,
    boards: Vec<Board>,
    members: Vec<BoardMember>,
    lists: Vec<List>,
    cards: Vec<Card>,
    assignees: Vec<CardAssignee>,
    comments: Vec<Comment>,
    invites: Vec<Invite>,
    fail_writes: bool,
    requests: Vec<String>,
}

impl Store {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, id: i64) -> Option<User> {
        self.users.iter().find(|(u, _)| u.id == id).map(|(u, _)| u.clone())
    }

    fn new_user(&mut self, email: &str, username: &str, password: &str, full_name: Option<String>) -> User {
        let user = User {
            id: self.id(),
            email: email.to_string(),
            username: username.to_string(),
            full_name,
            avatar_url: None,
            created_at: STAMP.into(),
            updated_at: STAMP.into(),
        };
        self.users.push((user.clone(), password.to_string()));
        user
    }

    fn open_session(&mut self, user_id: i64) -> String {
        let token = format!("tok_{}", self.id());
        self.sessions.insert(token.clone(), user_id);
        token
    }

    fn members_of(&self, board_id: i64) -> Vec<MemberWithUser> {
        self.members
            .iter()
            .filter(|m| m.board_id == board_id)
            .filter_map(|m| {
                self.user(m.user_id).map(|user| MemberWithUser {
                    member: m.clone(),
                    user,
                })
            })
            .collect()
    }

    fn role_on(&self, board_id: i64, user_id: i64) -> Option<MemberRole> {
        self.members
            .iter()
            .find(|m| m.board_id == board_id && m.user_id == user_id)
            .map(|m| m.role)
    }

    fn board_of_list(&self, list_id: i64) -> Option<i64> {
        self.lists.iter().find(|l| l.id == list_id).map(|l| l.board_id)
    }

    fn board_of_card(&self, card_id: i64) -> Option<i64> {
        let list_id = self.cards.iter().find(|c| c.id == card_id)?.list_id;
        self.board_of_list(list_id)
    }

    fn resequence(&mut self, list_id: i64) {
        let mut ids: Vec<(i32, i64)> = self
            .cards
            .iter()
            .filter(|c| c.list_id == list_id)
            .map(|c| (c.position, c.id))
            .collect();
        ids.sort();
        for (index, (_, id)) in ids.into_iter().enumerate() {
            if let Some(card) = self.cards.iter_mut().find(|c| c.id == id) {
                card.position = index as i32;
            }
        }
    }

    fn card_detail(&self, card: &Card) -> CardWithDetails {
        CardWithDetails {
            card: card.clone(),
            assignees: self
                .assignees
                .iter()
                .filter(|a| a.card_id == card.id)
                .filter_map(|a| {
                    self.user(a.user_id).map(|user| AssigneeWithUser {
                        assignee: a.clone(),
                        user,
                    })
                })
                .collect(),
            comments: self
                .comments
                .iter()
                .filter(|c| c.card_id == card.id)
                .filter_map(|c| {
                    self.user(c.user_id).map(|user| CommentWithUser {
                        comment: c.clone(),
                        user,
                    })
                })
                .collect(),
        }
    }

    fn delete_cards_where(&mut self, keep: impl Fn(&Card) -> bool) {
        let gone: Vec<i64> = self.cards.iter().filter(|c| !keep(c)).map(|c| c.id).collect();
        self.cards.retain(|c| keep(c));
        self.assignees.retain(|a| !gone.contains(&a.card_id));
        self.comments.retain(|c| !gone.contains(&c.card_id));
    }
}

pub struct MockBackend {
    /// Base URL including the `/api` prefix.
    pub base_url: String,
    state: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(Store::default()));
        let app = router(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// Register a user directly, bypassing the signup endpoint.
    pub fn add_user(&self, email: &str, username: &str, password: &str) -> User {
        self.state.lock().unwrap().new_user(email, username, password, None)
    }

    pub fn fail_writes(&self, on: bool) {
        self.state.lock().unwrap().fail_writes = on;
    }

    /// `"METHOD /path?query"` for every request received so far.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn session_count(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/boards", get(list_boards).post(create_board))
        .route(
            "/api/boards/{id}",
            get(get_board).put(update_board).delete(delete_board),
        )
        .route("/api/boards/{id}/lists", get(board_lists))
        .route("/api/boards/{id}/members", get(board_members).post(add_member))
        .route("/api/boards/{id}/invites", get(board_invites))
        .route("/api/lists", post(create_list))
        .route("/api/lists/{id}", put(update_list).delete(delete_list))
        .route("/api/cards", post(create_card))
        .route(
            "/api/cards/{id}",
            get(get_card).put(update_card).delete(delete_card),
        )
        .route("/api/cards/{id}/move", put(move_card))
        .route("/api/cards/{id}/assignees", post(assign))
        .route("/api/assignees/{id}", axum::routing::delete(unassign))
        .route("/api/comments", post(create_comment))
        .route(
            "/api/comments/{id}",
            put(update_comment).delete(delete_comment),
        )
        .route("/api/members/{id}", put(update_member).delete(remove_member))
        .route("/api/invites", post(create_invite))
        .route("/api/invites/{token}/accept", post(accept_invite))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let fail = {
        let mut store = state.lock().unwrap();
        store
            .requests
            .push(format!("{} {}", request.method(), request.uri()));
        store.fail_writes
            && request.method() != Method::GET
            && !request.uri().path().starts_with("/api/auth")
    };
    if fail {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    next.run(request).await
}

fn error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn ok<T: serde::Serialize>(value: T) -> Reply {
    Ok(Json(value).into_response())
}

fn message(text: &str) -> Reply {
    ok(json!({ "message": text }))
}

fn not_found(what: &str) -> Response {
    error(StatusCode::NOT_FOUND, &format!("{} not found", what))
}

fn caller(store: &Store, headers: &HeaderMap) -> Result<i64, Response> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix("session="))
        .find_map(|token| store.sessions.get(token).copied())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Not authenticated"))
}

fn require_member(store: &Store, board_id: i64, user_id: i64) -> Result<MemberRole, Response> {
    if !store.boards.iter().any(|b| b.id == board_id) {
        return Err(not_found("Board"));
    }
    store
        .role_on(board_id, user_id)
        .ok_or_else(|| error(StatusCode::FORBIDDEN, "Not a member of this board"))
}

fn require_admin(store: &Store, board_id: i64, user_id: i64) -> Result<(), Response> {
    match require_member(store, board_id, user_id)? {
        role if role.can_manage_members() => Ok(()),
        _ => Err(error(StatusCode::FORBIDDEN, "Only admins can do that")),
    }
}

fn with_session_cookie(body: Value, token: &str) -> Response {
    (
        [(
            header::SET_COOKIE,
            format!("session={}; Path=/; HttpOnly", token),
        )],
        Json(body),
    )
        .into_response()
}

fn str_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

async fn signup(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut store = state.lock().unwrap();
    let email = str_field(&body, "email").unwrap_or_default().to_string();
    if store.users.iter().any(|(u, _)| u.email == email) {
        return Err(error(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    let user = store.new_user(
        &email,
        str_field(&body, "username").unwrap_or_default(),
        str_field(&body, "password").unwrap_or_default(),
        str_field(&body, "full_name").map(str::to_string),
    );
    let token = store.open_session(user.id);
    Ok(with_session_cookie(json!({ "user": user, "token": token }), &token))
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut store = state.lock().unwrap();
    let email = str_field(&body, "email").unwrap_or_default();
    let password = str_field(&body, "password").unwrap_or_default();
    let user = store
        .users
        .iter()
        .find(|(u, p)| u.email == email && p == password)
        .map(|(u, _)| u.clone())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    let token = store.open_session(user.id);
    Ok(with_session_cookie(json!({ "user": user, "token": token }), &token))
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    store.sessions.retain(|_, id| *id != user_id);
    Ok((
        [(header::SET_COOKIE, "session=; Path=/; Max-Age=0")],
        Json(json!({ "message": "Logged out" })),
    )
        .into_response())
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    ok(store.user(user_id))
}

async fn list_boards(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let boards: Vec<&Board> = store
        .boards
        .iter()
        .filter(|b| store.role_on(b.id, user_id).is_some())
        .collect();
    ok(boards)
}

async fn create_board(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let board = Board {
        id: store.id(),
        title: str_field(&body, "title").unwrap_or_default().to_string(),
        description: str_field(&body, "description").map(str::to_string),
        background_color: str_field(&body, "background_color")
            .unwrap_or("#0079bf")
            .to_string(),
        owner_id: user_id,
        created_at: STAMP.into(),
        updated_at: STAMP.into(),
    };
    let member = BoardMember {
        id: store.id(),
        board_id: board.id,
        user_id,
        role: MemberRole::Owner,
        joined_at: STAMP.into(),
    };
    store.boards.push(board.clone());
    store.members.push(member);
    ok(board)
}

async fn get_board(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    let store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    require_member(&store, id, user_id)?;
    let board = store.boards.iter().find(|b| b.id == id).cloned();
    let mut value = serde_json::to_value(board).unwrap_or_default();
    value["members"] = serde_json::to_value(store.members_of(id)).unwrap_or_default();
    ok(value)
}

async fn update_board(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    require_member(&store, id, user_id)?;
    let board = store
        .boards
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or_else(|| not_found("Board"))?;
    if let Some(title) = str_field(&body, "title") {
        board.title = title.to_string();
    }
    if let Some(description) = body.get("description") {
        board.description = description.as_str().map(str::to_string);
    }
    if let Some(color) = str_field(&body, "background_color") {
        board.background_color = color.to_string();
    }
    ok(board.clone())
}

async fn delete_board(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    if require_member(&store, id, user_id)? != MemberRole::Owner {
        return Err(error(StatusCode::FORBIDDEN, "Only the owner can delete a board"));
    }
    let lists: Vec<i64> = store
        .lists
        .iter()
        .filter(|l| l.board_id == id)
        .map(|l| l.id)
        .collect();
    store.delete_cards_where(|c| !lists.contains(&c.list_id));
    store.lists.retain(|l| l.board_id != id);
    store.members.retain(|m| m.board_id != id);
    store.invites.retain(|i| i.board_id != id);
    store.boards.retain(|b| b.id != id);
    message("Board deleted")
}

async fn board_lists(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    let store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    require_member(&store, id, user_id)?;
    let mut lists: Vec<ListWithCards> = store
        .lists
        .iter()
        .filter(|l| l.board_id == id)
        .map(|l| {
            let mut cards: Vec<Card> = store
                .cards
                .iter()
                .filter(|c| c.list_id == l.id)
                .cloned()
                .collect();
            cards.sort_by_key(|c| c.position);
            ListWithCards {
                list: l.clone(),
                cards,
            }
        })
        .collect();
    lists.sort_by_key(|l| l.list.position);
    ok(lists)
}

async fn board_members(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    let store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    require_member(&store, id, user_id)?;
    ok(store.members_of(id))
}

async fn add_member(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    require_admin(&store, id, user_id)?;
    let email = str_field(&body, "email").unwrap_or_default();
    let invitee = store
        .users
        .iter()
        .find(|(u, _)| u.email == email)
        .map(|(u, _)| u.id)
        .ok_or_else(|| not_found("User"))?;
    if store.role_on(id, invitee).is_some() {
        return Err(error(StatusCode::BAD_REQUEST, "User is already a member"));
    }
    let role = str_field(&body, "role")
        .and_then(|r| r.parse().ok())
        .unwrap_or(MemberRole::Member);
    let member = BoardMember {
        id: store.id(),
        board_id: id,
        user_id: invitee,
        role,
        joined_at: STAMP.into(),
    };
    store.members.push(member.clone());
    ok(member)
}

async fn board_invites(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    let store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    require_member(&store, id, user_id)?;
    let invites: Vec<&Invite> = store.invites.iter().filter(|i| i.board_id == id).collect();
    ok(invites)
}

async fn create_list(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let board_id = body.get("board_id").and_then(Value::as_i64).unwrap_or_default();
    require_member(&store, board_id, user_id)?;
    let list = List {
        id: store.id(),
        board_id,
        title: str_field(&body, "title").unwrap_or_default().to_string(),
        position: body.get("position").and_then(Value::as_i64).unwrap_or_default() as i32,
        created_at: STAMP.into(),
        updated_at: STAMP.into(),
    };
    store.lists.push(list.clone());
    ok(list)
}

async fn update_list(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let board_id = store.board_of_list(id).ok_or_else(|| not_found("List"))?;
    require_member(&store, board_id, user_id)?;
    let list = store
        .lists
        .iter_mut()
        .find(|l| l.id == id)
        .ok_or_else(|| not_found("List"))?;
    if let Some(title) = str_field(&body, "title") {
        list.title = title.to_string();
    }
    if let Some(position) = body.get("position").and_then(Value::as_i64) {
        list.position = position as i32;
    }
    ok(list.clone())
}

async fn delete_list(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let board_id = store.board_of_list(id).ok_or_else(|| not_found("List"))?;
    require_member(&store, board_id, user_id)?;
    store.delete_cards_where(|c| c.list_id != id);
    store.lists.retain(|l| l.id != id);
    message("List deleted")
}

async fn create_card(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let list_id = body.get("list_id").and_then(Value::as_i64).unwrap_or_default();
    let board_id = store.board_of_list(list_id).ok_or_else(|| not_found("List"))?;
    require_member(&store, board_id, user_id)?;
    let card = Card {
        id: store.id(),
        list_id,
        title: str_field(&body, "title").unwrap_or_default().to_string(),
        description: str_field(&body, "description").map(str::to_string),
        position: body.get("position").and_then(Value::as_i64).unwrap_or_default() as i32,
        due_date: None,
        created_at: STAMP.into(),
        updated_at: STAMP.into(),
    };
    store.cards.push(card.clone());
    ok(card)
}

async fn get_card(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    let store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let board_id = store.board_of_card(id).ok_or_else(|| not_found("Card"))?;
    require_member(&store, board_id, user_id)?;
    let card = store
        .cards
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| not_found("Card"))?;
    ok(store.card_detail(card))
}

async fn update_card(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let board_id = store.board_of_card(id).ok_or_else(|| not_found("Card"))?;
    require_member(&store, board_id, user_id)?;
    let card = store
        .cards
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| not_found("Card"))?;
    if let Some(title) = str_field(&body, "title") {
        card.title = title.to_string();
    }
    if let Some(description) = body.get("description") {
        card.description = description.as_str().map(str::to_string);
    }
    if let Some(due) = body.get("due_date") {
        card.due_date = due.as_str().map(str::to_string);
    }
    ok(card.clone())
}

async fn move_card(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let board_id = store.board_of_card(id).ok_or_else(|| not_found("Card"))?;
    require_member(&store, board_id, user_id)?;
    let to_list = body.get("list_id").and_then(Value::as_i64).unwrap_or_default();
    if store.board_of_list(to_list) != Some(board_id) {
        return Err(not_found("List"));
    }
    let position = body.get("position").and_then(Value::as_i64).unwrap_or_default() as i32;

    let from_list = store
        .cards
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.list_id)
        .ok_or_else(|| not_found("Card"))?;
    // Make room at the target slot, then close gaps in both lists.
    for card in store.cards.iter_mut() {
        if card.list_id == to_list && card.id != id && card.position >= position {
            card.position += 1;
        }
    }
    if let Some(card) = store.cards.iter_mut().find(|c| c.id == id) {
        card.list_id = to_list;
        card.position = position;
    }
    store.resequence(from_list);
    store.resequence(to_list);
    let card = store.cards.iter().find(|c| c.id == id).cloned();
    ok(card)
}

async fn delete_card(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let board_id = store.board_of_card(id).ok_or_else(|| not_found("Card"))?;
    require_member(&store, board_id, user_id)?;
    store.delete_cards_where(|c| c.id != id);
    message("Card deleted")
}

async fn assign(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let board_id = store.board_of_card(id).ok_or_else(|| not_found("Card"))?;
    require_member(&store, board_id, user_id)?;
    let assignee_id = body.get("user_id").and_then(Value::as_i64).unwrap_or_default();
    if store.role_on(board_id, assignee_id).is_none() {
        return Err(error(StatusCode::BAD_REQUEST, "User is not a member of this board"));
    }
    let assignee = CardAssignee {
        id: store.id(),
        card_id: id,
        user_id: assignee_id,
        assigned_at: STAMP.into(),
    };
    store.assignees.push(assignee.clone());
    ok(assignee)
}

async fn unassign(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    let mut store = state.lock().unwrap();
    caller(&store, &headers)?;
    if !store.assignees.iter().any(|a| a.id == id) {
        return Err(not_found("Assignee"));
    }
    store.assignees.retain(|a| a.id != id);
    message("Assignee removed")
}

async fn create_comment(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let card_id = body.get("card_id").and_then(Value::as_i64).unwrap_or_default();
    let board_id = store.board_of_card(card_id).ok_or_else(|| not_found("Card"))?;
    require_member(&store, board_id, user_id)?;
    let comment = Comment {
        id: store.id(),
        card_id,
        user_id,
        content: str_field(&body, "content").unwrap_or_default().to_string(),
        created_at: STAMP.into(),
        updated_at: STAMP.into(),
    };
    store.comments.push(comment.clone());
    ok(comment)
}

async fn update_comment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let comment = store
        .comments
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| not_found("Comment"))?;
    if comment.user_id != user_id {
        return Err(error(StatusCode::FORBIDDEN, "Not the author"));
    }
    comment.content = str_field(&body, "content").unwrap_or_default().to_string();
    ok(comment.clone())
}

async fn delete_comment(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let author = store
        .comments
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.user_id)
        .ok_or_else(|| not_found("Comment"))?;
    if author != user_id {
        return Err(error(StatusCode::FORBIDDEN, "Not the author"));
    }
    store.comments.retain(|c| c.id != id);
    message("Comment deleted")
}

async fn update_member(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let board_id = store
        .members
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.board_id)
        .ok_or_else(|| not_found("Member"))?;
    require_admin(&store, board_id, user_id)?;
    let role = str_field(&body, "role")
        .and_then(|r| r.parse().ok())
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Invalid role"))?;
    let member = store
        .members
        .iter_mut()
        .find(|m| m.id == id)
        .ok_or_else(|| not_found("Member"))?;
    member.role = role;
    ok(member.clone())
}

async fn remove_member(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let board_id = store
        .members
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.board_id)
        .ok_or_else(|| not_found("Member"))?;
    require_admin(&store, board_id, user_id)?;
    store.members.retain(|m| m.id != id);
    message("Member removed")
}

async fn create_invite(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let board_id = body.get("board_id").and_then(Value::as_i64).unwrap_or_default();
    require_admin(&store, board_id, user_id)?;
    let id = store.id();
    let invite = Invite {
        id,
        board_id,
        email: str_field(&body, "email").unwrap_or_default().to_string(),
        token: format!("invite_{}", id),
        invited_by: Some(user_id),
        status: InviteStatus::Pending,
        created_at: STAMP.into(),
        expires_at: "2024-01-08T00:00:00".into(),
    };
    store.invites.push(invite.clone());
    ok(invite)
}

async fn accept_invite(State(state): State<Shared>, headers: HeaderMap, Path(token): Path<String>) -> Reply {
    let mut store = state.lock().unwrap();
    let user_id = caller(&store, &headers)?;
    let (board_id, status) = store
        .invites
        .iter()
        .find(|i| i.token == token)
        .map(|i| (i.board_id, i.status))
        .ok_or_else(|| not_found("Invite"))?;
    if status != InviteStatus::Pending {
        return Err(error(StatusCode::BAD_REQUEST, "Invite is no longer valid"));
    }
    if store.role_on(board_id, user_id).is_none() {
        let id = store.id();
        store.members.push(BoardMember {
            id,
            board_id,
            user_id,
            role: MemberRole::Member,
            joined_at: STAMP.into(),
        });
    }
    if let Some(invite) = store.invites.iter_mut().find(|i| i.token == token) {
        invite.status = InviteStatus::Accepted;
    }
    message("Invite accepted")
}
