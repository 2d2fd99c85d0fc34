//! Single binary REST server for tournaments and their brackets. State lives in memory.
//! Run with: cargo run --bin web
//! Configure with env: HOST, PORT, INACTIVITY_TIMEOUT_SECS, CLEANUP_INTERVAL_SECS, RUST_LOG.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_tournament_web::{
    dispute_match, end_tournament, generate_tournament_bracket, report_match_result,
    resolve_match_by_admin, shuffle_seeds, start_tournament, ErrorKind, MatchResult,
    ServerConfig, Tournament, TournamentError, TournamentId,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::time::Instant;

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// All tournaments by id. Handlers hold the write lock for the whole update, so result
/// reports for one tournament are applied one at a time.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    max_participants: Option<usize>,
    /// Round number -> best-of.
    #[serde(default)]
    round_formats: BTreeMap<u32, u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody {
    user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveMatchBody {
    winner: String,
    resolved_by: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and user id.
#[derive(Deserialize)]
struct ParticipantPath {
    id: TournamentId,
    user_id: String,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: String,
}

fn not_found_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Map an engine error to its HTTP status: 400 validation, 404 unknown, 409 wrong state.
fn error_response(e: &TournamentError) -> HttpResponse {
    log::warn!("Rejected: {}", e);
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::Conflict => HttpResponse::Conflict().json(body),
    }
}

/// Run `action` on the tournament `id`, refreshing its activity time, and answer with the
/// updated tournament or the error.
fn with_tournament<F>(state: &AppState, id: TournamentId, action: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found_tournament(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match action(t) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-tournament-web",
    })
}

/// Create a new tournament in Draft.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let name = body.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Name is required" }));
    }
    let mut tournament = Tournament::new(name).with_round_formats(body.round_formats);
    if let Some(max) = body.max_participants {
        tournament = tournament.with_max_participants(max);
    }
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    log::info!("Created tournament {} ({})", id, name);
    let entry = g.entry(id).or_insert(TournamentEntry {
        tournament,
        last_activity: Instant::now(),
    });
    HttpResponse::Ok().json(&entry.tournament)
}

/// Get a tournament by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |_| Ok(()))
}

/// Open sign-ups (Draft -> Registration).
#[post("/api/tournaments/{id}/registration/open")]
async fn api_open_registration(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.open_registration())
}

/// Register a participant (Draft or Registration).
#[post("/api/tournaments/{id}/participants")]
async fn api_register(state: AppState, path: Path<TournamentPath>, body: Json<RegisterBody>) -> HttpResponse {
    let user_id = body.user_id.trim();
    if user_id.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "userId is required" }));
    }
    with_tournament(&state, path.id, |t| t.register_participant(user_id))
}

/// Withdraw a participant (Draft or Registration); seeds are renumbered.
#[delete("/api/tournaments/{id}/participants/{user_id}")]
async fn api_withdraw(state: AppState, path: Path<ParticipantPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.withdraw_participant(&path.user_id))
}

/// Randomise seeds before the bracket is generated.
#[post("/api/tournaments/{id}/seeds/shuffle")]
async fn api_shuffle_seeds(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| shuffle_seeds(t, &mut rand::thread_rng()))
}

/// Generate the bracket and close registration.
#[post("/api/tournaments/{id}/bracket")]
async fn api_generate_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, generate_tournament_bracket)
}

/// Start accepting results.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, start_tournament)
}

/// Report scores (and optionally the winner) for one match.
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_report_result(state: AppState, path: Path<MatchPath>, body: Json<MatchResult>) -> HttpResponse {
    with_tournament(&state, path.id, |t| report_match_result(t, &path.match_id, &body))
}

/// Decide a match by admin ruling.
#[post("/api/tournaments/{id}/matches/{match_id}/resolve")]
async fn api_resolve_match(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ResolveMatchBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        resolve_match_by_admin(t, &path.match_id, &body.winner, &body.resolved_by)
    })
}

/// Put a match on hold as disputed.
#[post("/api/tournaments/{id}/matches/{match_id}/dispute")]
async fn api_dispute_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| dispute_match(t, &path.match_id))
}

/// Finish the tournament once the final is decided.
#[post("/api/tournaments/{id}/end")]
async fn api_end_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, end_tournament)
}

/// Cancel the tournament.
#[post("/api/tournaments/{id}/cancel")]
async fn api_cancel_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.cancel())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: periodically drop tournaments nobody has touched for a while.
    let state_cleanup = state.clone();
    let inactivity_timeout = config.inactivity_timeout;
    let cleanup_interval = config.cleanup_interval;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < inactivity_timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for {:?})",
                    removed,
                    inactivity_timeout
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_open_registration)
            .service(api_register)
            .service(api_withdraw)
            .service(api_shuffle_seeds)
            .service(api_generate_bracket)
            .service(api_start_tournament)
            .service(api_report_result)
            .service(api_resolve_match)
            .service(api_dispute_match)
            .service(api_end_tournament)
            .service(api_cancel_tournament)
    })
    .bind(bind)?
    .run()
    .await
}
