//! `brainSort` functions exported to the game pages and the service worker
//!
//! Structured values cross the boundary as JSON strings, the same encoding
//! used in storage. Failures are logged and replaced by empty values so a
//! page script never throws because of storage trouble. The cache exports
//! reject their promise instead, so the worker's install can fail.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::achievements;
use crate::cache::web::{self as cache_web, WebCacheStorage, WebNetwork};
use crate::cache::{CacheError, CacheWorker, Manifest, Request};
use crate::controls;
use crate::difficulty::Difficulty;
use crate::highscores::{self, HighScoreEntry};
use crate::platform::StorageError;
use crate::platform::web::{self, DomControls, DomList, LocalStorage};
use crate::preferences::{self, Preferences};
use crate::render;
use crate::scoring;
use crate::theme::{self, ThemeMode};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already set by the host page
        return;
    }
    log::info!("BrainSort helpers loaded");
}

fn with_storage<T>(op: &str, f: impl FnOnce(&LocalStorage) -> Result<T, StorageError>) -> Option<T> {
    let result = LocalStorage::open().and_then(|store| f(&store));
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("{} failed: {}", op, e);
            None
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

#[wasm_bindgen(js_name = computeScore)]
pub fn compute_score(time_seconds: f64, num_elements: f64, difficulty: u16) -> f64 {
    let count = scoring::element_count_from_f64(num_elements);
    scoring::compute_score(time_seconds, count, Difficulty::from(difficulty)) as f64
}

/// Record a `{name, score, time, elements, difficulty}` JSON entry.
/// Returns the rank reached, or 0 if it did not make the board.
#[wasm_bindgen(js_name = recordScore)]
pub fn record_score(entry_json: &str) -> u32 {
    let entry: HighScoreEntry = match serde_json::from_str(entry_json) {
        Ok(entry) => entry,
        Err(e) => {
            log::warn!("Rejected score entry: {}", e);
            return 0;
        }
    };
    with_storage("recordScore", |store| highscores::record_score(store, entry))
        .flatten()
        .map_or(0, |rank| rank as u32)
}

#[wasm_bindgen(js_name = getLeaderboard)]
pub fn get_leaderboard() -> String {
    with_storage("getLeaderboard", |store| highscores::leaderboard(store))
        .map_or_else(|| "[]".to_string(), |scores| to_json(&scores, "[]"))
}

#[wasm_bindgen(js_name = recordRound)]
pub fn record_round(time_seconds: f64, difficulty: u16) -> String {
    with_storage("recordRound", |store| {
        achievements::record_round(store, time_seconds, Difficulty::from(difficulty))
    })
    .map_or_else(|| "{}".to_string(), |ach| to_json(&ach, "{}"))
}

#[wasm_bindgen(js_name = getAchievements)]
pub fn get_achievements() -> String {
    with_storage("getAchievements", |store| achievements::achievements(store))
        .map_or_else(|| "{}".to_string(), |ach| to_json(&ach, "{}"))
}

/// Returns false if the record was malformed or could not be stored
#[wasm_bindgen(js_name = savePreferences)]
pub fn save_preferences(prefs_json: &str) -> bool {
    let prefs: Preferences = match serde_json::from_str(prefs_json) {
        Ok(prefs) => prefs,
        Err(e) => {
            log::warn!("Rejected preferences: {}", e);
            return false;
        }
    };
    with_storage("savePreferences", |store| preferences::save_preferences(store, &prefs)).is_some()
}

/// Last saved preferences as JSON, or `undefined`
#[wasm_bindgen(js_name = loadPreferences)]
pub fn load_preferences() -> Option<String> {
    with_storage("loadPreferences", |store| preferences::load_preferences(store))
        .flatten()
        .map(|prefs| to_json(&prefs, "{}"))
}

#[wasm_bindgen(js_name = computeTheme)]
pub fn compute_theme(mode: &str) -> String {
    let theme = theme::compute_theme(ThemeMode::parse(mode), &mut rand::rng());
    to_json(&theme, "{}")
}

#[wasm_bindgen(js_name = applyTheme)]
pub fn apply_theme(mode: &str, body_selector: Option<String>, panels_selector: Option<String>) {
    let theme = theme::compute_theme(ThemeMode::parse(mode), &mut rand::rng());
    web::apply_theme(&theme, body_selector.as_deref(), panels_selector.as_deref());
}

#[wasm_bindgen(js_name = showLeaderboard)]
pub fn show_leaderboard(list_id: &str, container_id: Option<String>) {
    let Some(mut view) = DomList::by_id(list_id, container_id.as_deref()) else {
        return;
    };
    let scores = with_storage("showLeaderboard", |store| highscores::leaderboard(store)).unwrap_or_default();
    render::render_leaderboard(&mut view, &scores);
}

#[wasm_bindgen(js_name = showAchievements)]
pub fn show_achievements(list_id: &str, container_id: Option<String>) {
    let Some(mut view) = DomList::by_id(list_id, container_id.as_deref()) else {
        return;
    };
    let ach = with_storage("showAchievements", |store| achievements::achievements(store)).unwrap_or_default();
    render::render_achievements(&mut view, &ach);
}

/// Current state of the settings controls as preferences JSON
#[wasm_bindgen(js_name = collectPrefs)]
pub fn collect_prefs() -> String {
    DomControls::current()
        .map(|page| controls::collect_preferences(&page))
        .map_or_else(|| "{}".to_string(), |prefs| to_json(&prefs, "{}"))
}

/// Push a preferences JSON record into the settings controls
#[wasm_bindgen(js_name = applyPrefs)]
pub fn apply_prefs(prefs_json: &str) {
    let prefs: Preferences = match serde_json::from_str(prefs_json) {
        Ok(prefs) => prefs,
        Err(e) => {
            log::warn!("Rejected preferences: {}", e);
            return;
        }
    };
    if let Some(mut page) = DomControls::current() {
        controls::apply_preferences(&mut page, &prefs);
    }
}

#[wasm_bindgen(js_name = showNextBadge)]
pub fn show_next_badge(badge_id: &str, number_id: &str, value: &str) {
    if let Some(mut page) = DomControls::current() {
        controls::show_next_badge(&mut page, badge_id, number_id, value);
    }
}

#[wasm_bindgen(js_name = hideNextBadge)]
pub fn hide_next_badge(badge_id: &str) {
    if let Some(mut page) = DomControls::current() {
        controls::hide_next_badge(&mut page, badge_id);
    }
}

/// `sorted_json` is the solution as a JSON array of numbers or strings
#[wasm_bindgen(js_name = highlightExpected)]
pub fn highlight_expected(button_selector: Option<String>, expected_index: i32, sorted_json: &str) {
    let sorted: Vec<serde_json::Value> = match serde_json::from_str(sorted_json) {
        Ok(sorted) => sorted,
        Err(e) => {
            log::warn!("Rejected sorted elements: {}", e);
            return;
        }
    };
    let labels: Vec<String> = sorted
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect();
    if let Some(mut page) = DomControls::current() {
        controls::highlight_expected(
            &mut page,
            button_selector.as_deref(),
            i64::from(expected_index),
            &labels,
        );
    }
}

type WebWorker = CacheWorker<WebCacheStorage, WebNetwork>;

thread_local! {
    static CACHE_WORKER: RefCell<Option<Rc<WebWorker>>> = const { RefCell::new(None) };
}

fn cache_error(e: CacheError) -> JsValue {
    log::error!("{}", e);
    JsValue::from_str(&e.to_string())
}

/// The worker for this service worker scope, created on first use
fn cache_worker() -> Result<Rc<WebWorker>, JsValue> {
    if let Some(worker) = CACHE_WORKER.with(|w| w.borrow().clone()) {
        return Ok(worker);
    }
    let scope = cache_web::worker_scope().map_err(cache_error)?;
    let caches = WebCacheStorage::from_scope(&scope).map_err(cache_error)?;
    let base = cache_web::script_directory(&scope);
    let worker = Rc::new(CacheWorker::new(
        Manifest::default(),
        &base,
        caches,
        WebNetwork::new(scope),
    ));
    CACHE_WORKER.with(|w| *w.borrow_mut() = Some(Rc::clone(&worker)));
    Ok(worker)
}

/// `install` event: precache the manifest. Resolves to the asset count.
#[wasm_bindgen(js_name = cacheInstall)]
pub async fn cache_install() -> Result<u32, JsValue> {
    let worker = cache_worker()?;
    let count = worker.install().await.map_err(cache_error)?;
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// `activate` event: drop stale buckets. Resolves to the deleted names.
#[wasm_bindgen(js_name = cacheActivate)]
pub async fn cache_activate() -> Result<js_sys::Array, JsValue> {
    let worker = cache_worker()?;
    worker.resume_installed();
    let deleted = worker.activate().await.map_err(cache_error)?;
    Ok(deleted.into_iter().map(JsValue::from).collect())
}

/// `fetch` event: answer from the cache, else the network
#[wasm_bindgen(js_name = cacheFetch)]
pub async fn cache_fetch(request: web_sys::Request) -> Result<web_sys::Response, JsValue> {
    let scope = cache_web::worker_scope().map_err(cache_error)?;
    if !request.method().eq_ignore_ascii_case("GET") {
        // Forward the original request so its body and headers survive
        let response = wasm_bindgen_futures::JsFuture::from(scope.fetch_with_request(&request)).await?;
        return response.dyn_into::<web_sys::Response>();
    }

    let worker = cache_worker()?;
    let request = Request::get(request.url());
    let response = worker.handle_fetch(&request).await.map_err(cache_error)?;
    cache_web::to_web_response(&response)
}
