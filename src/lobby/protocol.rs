use super::*;
use crate::game_logic::Action;

use serde::{Deserialize, Serialize};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

use log::{debug, info};

pub type GlobalPool = Arc<SessionPool>;

/// Who is asking, from `?pid=<id>&uuid=<token>`
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub pid: usize,
    pub uuid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatBody {
    pub msg: String,
}

#[derive(Debug, Serialize)]
struct ErrorReply {
    error: String,
}

#[derive(Debug, Serialize)]
struct GameList {
    games: Vec<ListEntry>,
}

#[derive(Debug, Serialize)]
struct Suggestion {
    game: String,
}

#[derive(Debug, Serialize)]
struct Status {
    status: &'static str,
}

/// Successes are 200 with the body, failures 400 with `{"error": ...}`
fn respond<T: Serialize>(result: Result<T, LobbyError>) -> Result<WithStatus<Json>, Rejection> {
    let reply = match result {
        Ok(body) => warp::reply::with_status(warp::reply::json(&body), StatusCode::OK),
        Err(err) => {
            debug!("Request rejected: {}", err);
            let body = ErrorReply {
                error: err.to_string(),
            };
            warp::reply::with_status(warp::reply::json(&body), StatusCode::BAD_REQUEST)
        }
    };
    Ok(reply)
}

fn with_pool(pool: GlobalPool) -> impl Filter<Extract = (GlobalPool,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || pool.clone())
}

fn credentials() -> impl Filter<Extract = (Credentials,), Error = Rejection> + Clone {
    warp::query::<Credentials>()
}

fn chat_body() -> impl Filter<Extract = (ChatBody,), Error = Rejection> + Clone {
    warp::body::content_length_limit(1024 * 16).and(warp::body::json())
}

/// Path parameters arrive still percent-encoded
fn decode(segment: &str) -> Result<String, LobbyError> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| LobbyError::InvalidPath)
}

pub async fn create(key: String, pool: GlobalPool) -> Result<impl Reply, Rejection> {
    respond(decode(&key).and_then(|key| pool.create(&key)))
}

pub async fn join(key: String, pool: GlobalPool) -> Result<impl Reply, Rejection> {
    let result = match decode(&key) {
        Ok(key) => pool.join(&key).await,
        Err(err) => Err(err),
    };
    respond(result)
}

pub async fn spectate(key: String, pool: GlobalPool) -> Result<impl Reply, Rejection> {
    let result = match decode(&key) {
        Ok(key) => pool.watch(&key).await,
        Err(err) => Err(err),
    };
    respond(result)
}

pub async fn start(key: String, starter: String, pool: GlobalPool) -> Result<impl Reply, Rejection> {
    let result = match decode(&key) {
        Ok(key) => pool.start(&key, &starter).await,
        Err(err) => Err(err),
    };
    respond(result.map(|_| serde_json::json!({})))
}

pub async fn chat(
    key: String,
    who: Credentials,
    body: ChatBody,
    pool: GlobalPool,
) -> Result<impl Reply, Rejection> {
    let result = match decode(&key) {
        Ok(key) => pool.chat(&key, who.pid, &who.uuid, &body.msg).await,
        Err(err) => Err(err),
    };
    respond(result)
}

pub async fn next_turn(key: String, who: Credentials, pool: GlobalPool) -> Result<impl Reply, Rejection> {
    let result = match decode(&key) {
        Ok(key) => pool.next_turn(&key, who.pid, &who.uuid).await,
        Err(err) => Err(err),
    };
    respond(result)
}

pub async fn act(
    key: String,
    action: String,
    target: String,
    who: Credentials,
    pool: GlobalPool,
) -> Result<impl Reply, Rejection> {
    let result = match (decode(&key), Action::from_request(&action, &target)) {
        (Err(err), _) => Err(err),
        (Ok(key), Some(action)) => pool.act(&key, who.pid, &who.uuid, action).await,
        (Ok(_), None) => Err(LobbyError::InvalidAction),
    };
    respond(result)
}

pub async fn rename(
    key: String,
    name: String,
    who: Credentials,
    pool: GlobalPool,
) -> Result<impl Reply, Rejection> {
    let result = match (decode(&key), decode(&name)) {
        (Ok(key), Ok(name)) => pool.rename(&key, who.pid, &who.uuid, &name).await,
        (Err(err), _) | (_, Err(err)) => Err(err),
    };
    respond(result.map(|_| Status { status: "ok" }))
}

pub async fn suggest(pool: GlobalPool) -> Result<impl Reply, Rejection> {
    respond(Ok(Suggestion {
        game: pool.suggest_name(),
    }))
}

pub async fn stat(key: String, who: Credentials, pool: GlobalPool) -> Result<impl Reply, Rejection> {
    let result = match decode(&key) {
        Ok(key) => pool.stat(&key, who.pid, &who.uuid).await,
        Err(err) => Err(err),
    };
    respond(result)
}

pub async fn poll(key: String, who: Credentials, pool: GlobalPool) -> Result<impl Reply, Rejection> {
    let result = match decode(&key) {
        Ok(key) => pool.poll(&key, who.pid, &who.uuid).await,
        Err(err) => Err(err),
    };
    respond(result)
}

pub async fn list(pool: GlobalPool) -> Result<impl Reply, Rejection> {
    respond(Ok(GameList {
        games: pool.list().await,
    }))
}

/// Every lobby endpoint
pub fn routes(pool: GlobalPool) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let pool = with_pool(pool);

    // POST /create/{game}
    let create = warp::post()
        .and(warp::path!("create" / String))
        .and(pool.clone())
        .and_then(create);

    // POST /join/{game}
    let join = warp::post()
        .and(warp::path!("join" / String))
        .and(pool.clone())
        .and_then(join);

    // POST /spectate/{game}
    let spectate = warp::post()
        .and(warp::path!("spectate" / String))
        .and(pool.clone())
        .and_then(spectate);

    // POST /start/{game}/{starter}
    let start = warp::post()
        .and(warp::path!("start" / String / String))
        .and(pool.clone())
        .and_then(start);

    // POST /game/{game}/chat
    let chat = warp::post()
        .and(warp::path!("game" / String / "chat"))
        .and(credentials())
        .and(chat_body())
        .and(pool.clone())
        .and_then(chat);

    // POST /game/{game}/next
    let next = warp::post()
        .and(warp::path!("game" / String / "next"))
        .and(credentials())
        .and(pool.clone())
        .and_then(next_turn);

    // POST /game/{game}/{action}/{target}
    let act = warp::post()
        .and(warp::path!("game" / String / String / String))
        .and(credentials())
        .and(pool.clone())
        .and_then(act);

    // POST /rename/{game}/{name}
    let rename = warp::post()
        .and(warp::path!("rename" / String / String))
        .and(credentials())
        .and(pool.clone())
        .and_then(rename);

    let suggest = warp::get()
        .and(warp::path!("suggest"))
        .and(pool.clone())
        .and_then(suggest);

    let stat = warp::get()
        .and(warp::path!("stat" / String))
        .and(credentials())
        .and(pool.clone())
        .and_then(stat);

    let poll = warp::get()
        .and(warp::path!("poll" / String))
        .and(credentials())
        .and(pool.clone())
        .and_then(poll);

    let list = warp::get()
        .and(warp::path!("list"))
        .and(pool)
        .and_then(list);

    create
        .or(join)
        .or(spectate)
        .or(start)
        .or(chat)
        .or(next)
        .or(act)
        .or(rename)
        .or(suggest)
        .or(stat)
        .or(poll)
        .or(list)
}

/// Serves the lobby, and the front end from `static_dir` if given, until the process exits
pub async fn serve(pool: GlobalPool, addr: SocketAddr, static_dir: Option<PathBuf>) {
    let api = routes(pool);
    match static_dir {
        Some(dir) => {
            info!("Serving front end from {}", dir.display());
            warp::serve(api.or(warp::fs::dir(dir))).run(addr).await
        }
        None => warp::serve(api).run(addr).await,
    }
}
