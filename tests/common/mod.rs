//! In-memory stand-in for the recipe backend.
//!
//! Routes the same paths as the real server, records every request and can
//! be told to fail any route with a status code (0 means "no response").

#![allow(dead_code)]

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use recipe_manager::api::{ApiClient, ApiError, ApiRequest, ApiResponse, ApiResult, Method, Transport};
use recipe_manager::controllers::AppShell;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use time::Date;

pub const BASE_URL: &str = "http://backend.test";
pub const DEFAULT_PEOPLE: u32 = 4;

#[derive(Default)]
struct Store {
    next_id: i64,
    recipes: Vec<Value>,
    categories: Vec<Value>,
    meal_plans: Vec<Value>,
    shopping_lists: Vec<Value>,
}

impl Store {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn category_name(&self, id: &Value) -> Value {
        self.categories
            .iter()
            .find(|c| &c["id"] == id)
            .map(|c| c["name"].clone())
            .unwrap_or(Value::Null)
    }

    fn recipe_name(&self, id: &Value) -> Value {
        self.recipes
            .iter()
            .find(|r| &r["id"] == id)
            .map(|r| r["name"].clone())
            .unwrap_or(Value::Null)
    }
}

#[derive(Default)]
pub struct FakeBackend {
    store: Mutex<Store>,
    log: Mutex<Vec<ApiRequest>>,
    failures: Mutex<Vec<(Method, String, u16)>>,
    chat_reply: Mutex<Option<Value>>,
    export_filename: Mutex<Option<String>>,
}

pub fn backend() -> Arc<FakeBackend> {
    let backend = FakeBackend::default();
    *backend.export_filename.lock().unwrap() = Some("weekly-groceries.pdf".to_string());
    Arc::new(backend)
}

pub fn shell(backend: &Arc<FakeBackend>, today: Date) -> AppShell {
    let api = ApiClient::new(backend.clone(), BASE_URL);
    AppShell::new(api, today, DEFAULT_PEOPLE)
}

/// Messages of the toasts currently on screen, oldest first.
pub fn toasts(shell: &AppShell) -> Vec<String> {
    shell
        .notify()
        .toasts()
        .into_iter()
        .map(|toast| toast.message)
        .collect()
}

impl FakeBackend {
    // ---------------
    // Seeding
    // ---------------

    pub fn seed_category(&self, name: &str, kind: &str) -> i64 {
        let mut store = self.store.lock().unwrap();
        let id = store.id();
        store
            .categories
            .push(json!({"id": id, "name": name, "type": kind}));
        id
    }

    pub fn seed_recipe(&self, name: &str, category_id: Option<i64>) -> i64 {
        self.seed_recipe_with(name, category_id, json!([]))
    }

    pub fn seed_recipe_with(&self, name: &str, category_id: Option<i64>, ingredients: Value) -> i64 {
        let mut store = self.store.lock().unwrap();
        let id = store.id();
        let category_name = category_id
            .map(|c| store.category_name(&json!(c)))
            .unwrap_or(Value::Null);
        store.recipes.push(json!({
            "id": id,
            "name": name,
            "description": format!("{name} description"),
            "instructions": "Cook it.",
            "servings": 4,
            "category_id": category_id,
            "category_name": category_name,
            "ingredients": ingredients,
        }));
        id
    }

    pub fn seed_meal(&self, date: &str, category_id: i64, recipe_id: i64, people: u32) -> i64 {
        let mut store = self.store.lock().unwrap();
        let id = store.id();
        let recipe_name = store.recipe_name(&json!(recipe_id));
        let category_name = store.category_name(&json!(category_id));
        store.meal_plans.push(json!({
            "id": id,
            "date": date,
            "meal_category_id": category_id,
            "recipe_id": recipe_id,
            "people_count": people,
            "recipe_name": recipe_name,
            "meal_category_name": category_name,
        }));
        id
    }

    pub fn seed_list(&self, name: &str, items: Value) -> i64 {
        let mut store = self.store.lock().unwrap();
        let id = store.id();
        store.shopping_lists.push(json!({
            "id": id,
            "name": name,
            "items": items,
            "created_at": "2024-01-15T10:30:00",
        }));
        id
    }

    // ---------------
    // Knobs
    // ---------------

    /// Answer `method path` (query ignored) with `status`; 0 drops the
    /// connection instead.
    pub fn fail(&self, method: Method, path: &str, status: u16) {
        self.failures
            .lock()
            .unwrap()
            .push((method, path.to_string(), status));
    }

    pub fn set_chat_reply(&self, reply: Value) {
        *self.chat_reply.lock().unwrap() = Some(reply);
    }

    /// Stop sending `Content-Disposition` on exports.
    pub fn export_without_filename(&self) {
        *self.export_filename.lock().unwrap() = None;
    }

    // ---------------
    // Inspection
    // ---------------

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    /// Requests with this method whose path (query ignored) equals `path`.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && split_url(&r.url).0 == path)
            .count()
    }

    pub fn body_of_last(&self, method: Method, path: &str) -> Option<Value> {
        self.requests()
            .iter()
            .rev()
            .find(|r| r.method == method && split_url(&r.url).0 == path)
            .and_then(|r| r.body.as_deref())
            .and_then(|body| serde_json::from_str(body).ok())
    }

    pub fn recipe_count(&self) -> usize {
        self.store.lock().unwrap().recipes.len()
    }

    pub fn meal_plan_count(&self) -> usize {
        self.store.lock().unwrap().meal_plans.len()
    }

    // ---------------
    // Routing
    // ---------------

    fn route(&self, method: Method, path: &str, query: &HashMap<String, String>, body: Value) -> Reply {
        let mut store = self.store.lock().unwrap();
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        match (method, segments.as_slice()) {
            // Recipes
            (Method::Get, ["api", "recipes"]) => {
                let search = query.get("search").map(|s| s.to_lowercase());
                let category = query.get("category_id").and_then(|c| c.parse::<i64>().ok());
                let recipes: Vec<Value> = store
                    .recipes
                    .iter()
                    .filter(|r| match &search {
                        Some(needle) => r["name"]
                            .as_str()
                            .unwrap_or("")
                            .to_lowercase()
                            .contains(needle),
                        None => true,
                    })
                    .filter(|r| match category {
                        Some(id) => r["category_id"] == json!(id),
                        None => true,
                    })
                    .cloned()
                    .collect();
                Reply::json(json!(recipes))
            }
            (Method::Post, ["api", "recipes", "adjust-portions"]) => {
                let Some(recipe) = store.recipes.iter().find(|r| r["id"] == body["recipe_id"])
                else {
                    return Reply::status(404);
                };
                let people = body["people_count"].as_f64().unwrap_or(1.0);
                let servings = recipe["servings"].as_f64().unwrap_or(4.0);
                let factor = people / servings;
                let adjusted: Vec<Value> = recipe["ingredients"]
                    .as_array()
                    .cloned()
                    .unwrap_or_default()
                    .iter()
                    .map(|i| {
                        json!({
                            "name": i["name"],
                            "original_quantity": i["quantity"],
                            "adjusted_quantity": i["quantity"].as_f64().unwrap_or(0.0) * factor,
                            "unit": i["unit"],
                        })
                    })
                    .collect();
                Reply::json(json!({
                    "recipe_id": recipe["id"],
                    "recipe_name": recipe["name"],
                    "original_servings": recipe["servings"],
                    "adjusted_servings": body["people_count"],
                    "scaling_factor": factor,
                    "adjusted_ingredients": adjusted,
                }))
            }
            (Method::Get, ["api", "recipes", id]) => find(&store.recipes, id),
            (Method::Post, ["api", "recipes"]) => {
                let id = store.id();
                let mut recipe = body;
                recipe["id"] = json!(id);
                recipe["category_name"] = store.category_name(&recipe["category_id"]);
                store.recipes.push(recipe);
                Reply::created(id)
            }
            (Method::Put, ["api", "recipes", id]) => {
                let category_name = store.category_name(&body["category_id"]);
                replace(&mut store.recipes, id, body, |r| {
                    r["category_name"] = category_name;
                })
            }
            (Method::Delete, ["api", "recipes", id]) => remove(&mut store.recipes, id),

            // Categories
            (Method::Get, ["api", "categories"]) => {
                let kind = query.get("type");
                let categories: Vec<Value> = store
                    .categories
                    .iter()
                    .filter(|c| kind.is_none_or(|k| c["type"] == json!(k)))
                    .cloned()
                    .collect();
                Reply::json(json!(categories))
            }
            (Method::Post, ["api", "categories"]) => {
                if duplicate_category(&store.categories, &body, None) {
                    return Reply::status(409);
                }
                let id = store.id();
                let mut category = body;
                category["id"] = json!(id);
                store.categories.push(category);
                Reply::created(id)
            }
            (Method::Put, ["api", "categories", id]) => {
                if duplicate_category(&store.categories, &body, id.parse().ok()) {
                    return Reply::status(409);
                }
                replace(&mut store.categories, id, body, |_| {})
            }
            (Method::Delete, ["api", "categories", id]) => {
                let target = id.parse::<i64>().ok().map(|id| json!(id));
                for recipe in store.recipes.iter_mut() {
                    if Some(&recipe["category_id"]) == target.as_ref() {
                        recipe["category_id"] = Value::Null;
                        recipe["category_name"] = Value::Null;
                    }
                }
                remove(&mut store.categories, id)
            }

            // Meal plans
            (Method::Get, ["api", "meal-plans"]) => {
                let start = query.get("start_date").cloned();
                let end = query.get("end_date").cloned();
                let plans: Vec<Value> = store
                    .meal_plans
                    .iter()
                    .filter(|p| {
                        let date = p["date"].as_str().unwrap_or("");
                        start.as_deref().is_none_or(|s| date >= s)
                            && end.as_deref().is_none_or(|e| date <= e)
                    })
                    .cloned()
                    .collect();
                Reply::json(json!(plans))
            }
            (Method::Post, ["api", "meal-plans"]) => {
                let taken = store.meal_plans.iter().any(|p| {
                    p["date"] == body["date"] && p["meal_category_id"] == body["meal_category_id"]
                });
                if taken {
                    return Reply::status(409);
                }
                let id = store.id();
                let mut plan = body;
                plan["id"] = json!(id);
                plan["recipe_name"] = store.recipe_name(&plan["recipe_id"]);
                plan["meal_category_name"] = store.category_name(&plan["meal_category_id"]);
                store.meal_plans.push(plan);
                Reply::created(id)
            }
            (Method::Put, ["api", "meal-plans", id]) => {
                let Some(plan) = store.meal_plans.iter_mut().find(|p| matches_id(p, id)) else {
                    return Reply::status(404);
                };
                plan["people_count"] = body["people_count"].clone();
                Reply::json(plan.clone())
            }
            (Method::Delete, ["api", "meal-plans", id]) => remove(&mut store.meal_plans, id),

            // Shopping lists
            (Method::Get, ["api", "shopping-lists"]) => Reply::json(json!(store.shopping_lists)),
            (Method::Post, ["api", "shopping-lists", "generate"]) => {
                let ids = body["meal_plan_ids"].as_array().cloned().unwrap_or_default();
                let mut items: Vec<Value> = Vec::new();
                for plan in store.meal_plans.iter().filter(|p| ids.contains(&p["id"])) {
                    let recipe = store.recipes.iter().find(|r| r["id"] == plan["recipe_id"]);
                    let ingredients = recipe
                        .and_then(|r| r["ingredients"].as_array().cloned())
                        .unwrap_or_default();
                    for ingredient in ingredients {
                        items.push(json!({
                            "ingredient_name": ingredient["name"],
                            "quantity": ingredient["quantity"],
                            "unit": ingredient["unit"],
                        }));
                    }
                }
                let id = store.id();
                store.shopping_lists.push(json!({
                    "id": id,
                    "name": body["name"],
                    "items": items,
                }));
                Reply::created(id)
            }
            (Method::Get, ["api", "shopping-lists", id, "export"]) => {
                if store.shopping_lists.iter().all(|l| !matches_id(l, id)) {
                    return Reply::status(404);
                }
                let format = query.get("format").cloned().unwrap_or_default();
                let mut headers = Vec::new();
                if let Some(name) = self.export_filename.lock().unwrap().clone() {
                    let name = match format.as_str() {
                        "excel" => name.replace(".pdf", ".xlsx"),
                        _ => name,
                    };
                    headers.push((
                        "Content-Disposition".to_string(),
                        format!("attachment; filename=\"{name}\""),
                    ));
                }
                Reply {
                    status: 200,
                    headers,
                    body: format!("{format} export of list {id}").into_bytes(),
                }
            }
            (Method::Get, ["api", "shopping-lists", id]) => find(&store.shopping_lists, id),
            (Method::Post, ["api", "shopping-lists"]) => {
                let id = store.id();
                let mut list = body;
                list["id"] = json!(id);
                store.shopping_lists.push(list);
                Reply::created(id)
            }
            (Method::Put, ["api", "shopping-lists", id]) => {
                replace(&mut store.shopping_lists, id, body, |_| {})
            }
            (Method::Delete, ["api", "shopping-lists", id]) => remove(&mut store.shopping_lists, id),

            // Assistant
            (Method::Post, ["api", "ai-assistant", "chat"]) => {
                let reply = self.chat_reply.lock().unwrap().clone().unwrap_or_else(|| {
                    json!({"response": format!("You said: {}", body["message"].as_str().unwrap_or(""))})
                });
                Reply::json(reply)
            }

            _ => Reply::status(404),
        }
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        self.log.lock().unwrap().push(request.clone());
        let (path, query) = split_url(&request.url);
        // Chat replies take a scheduler turn so concurrent sends interleave.
        if path == "/api/ai-assistant/chat" {
            tokio::task::yield_now().await;
        }

        let injected = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .find(|(method, failing, _)| *method == request.method && failing == path)
            .map(|(_, _, status)| *status);
        match injected {
            Some(0) => return Err(ApiError::Network("connection refused".to_string())),
            Some(status) => {
                return Ok(ApiResponse {
                    status,
                    headers: Vec::new(),
                    body: b"{\"error\":\"injected\"}".to_vec(),
                });
            }
            None => {}
        }

        let body = request
            .body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
            .unwrap_or(Value::Null);
        let reply = self.route(request.method, path, &parse_query(query), body);
        Ok(ApiResponse {
            status: reply.status,
            headers: reply.headers,
            body: reply.body,
        })
    }
}

struct Reply {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Reply {
    fn json(value: Value) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: value.to_string().into_bytes(),
        }
    }

    fn created(id: i64) -> Self {
        let mut reply = Self::json(json!({"id": id}));
        reply.status = 201;
        reply
    }

    fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }
}

fn split_url(url: &str) -> (&str, &str) {
    let rest = url.strip_prefix(BASE_URL).unwrap_or(url);
    rest.split_once('?').unwrap_or((rest, ""))
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), percent_decode_str(v).decode_utf8_lossy().into_owned()))
        .collect()
}

fn matches_id(record: &Value, id: &str) -> bool {
    id.parse::<i64>().is_ok_and(|id| record["id"] == json!(id))
}

fn find(records: &[Value], id: &str) -> Reply {
    match records.iter().find(|r| matches_id(r, id)) {
        Some(record) => Reply::json(record.clone()),
        None => Reply::status(404),
    }
}

fn replace(records: &mut [Value], id: &str, body: Value, fix: impl FnOnce(&mut Value)) -> Reply {
    let Some(record) = records.iter_mut().find(|r| matches_id(r, id)) else {
        return Reply::status(404);
    };
    let kept_id = record["id"].clone();
    *record = body;
    record["id"] = kept_id;
    fix(record);
    Reply::json(record.clone())
}

fn remove(records: &mut Vec<Value>, id: &str) -> Reply {
    let before = records.len();
    records.retain(|r| !matches_id(r, id));
    if records.len() == before {
        Reply::status(404)
    } else {
        Reply::json(json!({"message": "deleted"}))
    }
}

fn duplicate_category(categories: &[Value], body: &Value, skip: Option<i64>) -> bool {
    let name = body["name"].as_str().unwrap_or("").to_lowercase();
    categories.iter().any(|c| {
        c["type"] == body["type"]
            && c["name"].as_str().unwrap_or("").to_lowercase() == name
            && skip.is_none_or(|id| c["id"] != json!(id))
    })
}
