//! HTTP/JSON front end.
//!
//! Routes are registered from the schema's HTTP bindings
//! ([`targetservice::descriptor::HTTP_RULES`]) and call the same handlers as
//! the gRPC server.

use actix_web::{web, HttpRequest, HttpResponse, Responder, Route};
use serde::de::DeserializeOwned;
use tonic::Status;
use tracing::{debug, instrument, warn};

use targetservice::{
    descriptor::{HttpRule, HttpVerb, HTTP_RULES},
    BallIn, Body, EchoMsg, HelloRequest, Limb,
};

use crate::{error::RestError, service};

type QueryPairs = web::Query<Vec<(String, String)>>;

/// Registers one route per HTTP binding plus `/health`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    for rule in HTTP_RULES {
        let Some(route) = route_for(rule) else {
            warn!(method = rule.method, path = rule.path, "No handler for HTTP binding");
            continue;
        };
        cfg.route(&actix_path(rule.path), route);
    }
    cfg.route("/health", web::get().to(health_check));
}

fn route_for(rule: &HttpRule) -> Option<Route> {
    let route = match (rule.method, rule.verb) {
        ("SayHello", HttpVerb::Get) => web::get().to(say_hello_get),
        ("SayHello", HttpVerb::Post) => web::post().to(say_hello_post),
        ("UnknownMethod", HttpVerb::Get) => web::get().to(unknown_method),
        ("BounceIt", HttpVerb::Post) => web::post().to(bounce_it),
        ("GrowTail", HttpVerb::Get) => web::get().to(grow_tail),
        ("Echo", HttpVerb::Post) => web::post().to(echo),
        ("EchoHeaders", HttpVerb::Get) => web::get().to(echo_headers),
        _ => return None,
    };
    Some(route)
}

/// Rewrites an HTTP rule template into actix syntax: `{field=**}` matches
/// the rest of the path, `{field=*}` a single segment.
fn actix_path(template: &str) -> String {
    template.replace("=**}", ":.*}").replace("=*}", "}")
}

#[instrument(skip(greeting, query))]
async fn say_hello_get(
    greeting: web::Path<String>,
    query: QueryPairs,
) -> Result<HttpResponse, RestError> {
    let mut req: HelloRequest = from_query(&query)?;
    req.greeting = greeting.into_inner();
    Ok(HttpResponse::Ok().json(service::say_hello(req)))
}

#[instrument(skip(body))]
async fn say_hello_post(body: web::Bytes) -> Result<HttpResponse, RestError> {
    let req: HelloRequest = from_body(&body)?;
    Ok(HttpResponse::Ok().json(service::say_hello(req)))
}

#[instrument(skip(greeting, query))]
async fn unknown_method(
    greeting: web::Path<String>,
    query: QueryPairs,
) -> Result<HttpResponse, RestError> {
    let mut req: HelloRequest = from_query(&query)?;
    req.greeting = greeting.into_inner();
    let reply = service::unknown_method(req)?;
    Ok(HttpResponse::Ok().json(reply))
}

#[instrument(skip(body))]
async fn bounce_it(body: web::Bytes) -> Result<HttpResponse, RestError> {
    let ball: BallIn = from_body(&body)?;
    let reply = service::bounce_it(ball, service::current_time())?;
    Ok(HttpResponse::Ok().json(reply))
}

#[instrument(skip(query))]
async fn grow_tail(query: QueryPairs) -> Result<HttpResponse, RestError> {
    let body: Body = from_query(&query)?;
    Ok(HttpResponse::Ok().json(service::grow_tail(body)))
}

#[instrument(skip(body))]
async fn echo(body: web::Bytes) -> Result<HttpResponse, RestError> {
    let msg: EchoMsg = from_body(&body)?;
    Ok(HttpResponse::Ok().json(service::echo(msg)))
}

#[instrument(skip(req))]
async fn echo_headers(req: HttpRequest) -> HttpResponse {
    let headers = service::echo_headers(
        req.headers()
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_bytes())),
    );
    HttpResponse::Ok().json(headers)
}

// A simple health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Decodes a `body: "*"` request; an empty body is the zero message.
fn from_body<T>(body: &[u8]) -> Result<T, RestError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| Status::invalid_argument(format!("invalid request body: {e}")).into())
}

/// Request messages that can be filled from query parameters.
trait QueryFields: Default {
    /// Sets the field at `path`; `Ok(false)` when no such field exists.
    fn set_field(&mut self, path: &str, value: &str) -> Result<bool, Status>;
}

fn from_query<T: QueryFields>(pairs: &[(String, String)]) -> Result<T, RestError> {
    let mut message = T::default();
    for (path, value) in pairs {
        if !message.set_field(path, value)? {
            debug!(%path, "Ignoring unknown query parameter");
        }
    }
    Ok(message)
}

impl QueryFields for HelloRequest {
    fn set_field(&mut self, path: &str, value: &str) -> Result<bool, Status> {
        match path {
            "greeting" => self.greeting = value.to_string(),
            "boolean_test" | "booleanTest" => self.boolean_test = parse_bool(path, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl QueryFields for Body {
    fn set_field(&mut self, path: &str, value: &str) -> Result<bool, Status> {
        if path == "name" {
            self.name = value.to_string();
            return Ok(true);
        }
        let Some((limb, field)) = path.split_once('.') else {
            return Ok(false);
        };
        let limb = match limb {
            "hands" => &mut self.hands,
            "legs" => &mut self.legs,
            "tail" => &mut self.tail,
            _ => return Ok(false),
        };
        limb.get_or_insert_with(Limb::default).set_field(field, value)
    }
}

impl QueryFields for Limb {
    fn set_field(&mut self, path: &str, value: &str) -> Result<bool, Status> {
        match path {
            "count" => {
                self.count = value
                    .parse()
                    .map_err(|_| Status::invalid_argument(format!("count: invalid int32 {value:?}")))?
            }
            "endings" => self.endings = value.to_string(),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, Status> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err(Status::invalid_argument(format!(
            "{field}: invalid bool {value:?}"
        ))),
    }
}
