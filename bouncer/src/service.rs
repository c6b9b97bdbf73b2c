//! Fixture behaviour shared by the gRPC and REST front ends.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use prost_types::Timestamp;
use tonic::Status;
use tracing::{debug, info, instrument};

use targetservice::{BallIn, BallOut, Body, EchoMsg, Headers, HelloRequest, HelloResponse, Limb};

#[instrument(skip(req), fields(greeting = %req.greeting))]
pub fn say_hello(req: HelloRequest) -> HelloResponse {
    info!("Saying hello");
    HelloResponse {
        reply: format!("hello {}", req.greeting),
        boolean_test: req.boolean_test,
    }
}

/// Declared in the schema but never served.
#[instrument(skip(req), fields(greeting = %req.greeting))]
pub fn unknown_method(req: HelloRequest) -> Result<HelloResponse, Status> {
    info!("Rejecting call to unimplemented method");
    Err(Status::unimplemented("method UnknownMethod not implemented"))
}

/// `clock` stands in for `now` when the ball carries none.
#[instrument(skip(ball, clock), fields(message = %ball.message))]
pub fn bounce_it(ball: BallIn, clock: Timestamp) -> Result<BallOut, Status> {
    let when = to_datetime(ball.when_or_default(), "when")?;
    let now_ts = ball.now.clone().unwrap_or(clock);
    let now = to_datetime(now_ts.clone(), "now")?;

    let ago = now.signed_duration_since(when).num_seconds();
    let time_message = format!(
        "{} was {} ago",
        when.to_rfc3339_opts(SecondsFormat::Secs, true),
        format_elapsed(ago)
    );
    info!(%time_message, "Bounced ball");

    Ok(BallOut {
        reply: format!("hello {}", ball.message),
        time_message,
        now: Some(now_ts),
    })
}

#[instrument(skip(body), fields(name = %body.name))]
pub fn grow_tail(mut body: Body) -> Body {
    let tail = body.tail.get_or_insert_with(Limb::default);
    tail.count = tail.count.saturating_add(1);
    info!(tail = tail.count, "Grew tail");
    body
}

#[instrument(skip(msg), fields(items = msg.array.len()))]
pub fn echo(msg: EchoMsg) -> EchoMsg {
    debug!("Echoing message");
    msg
}

/// Collects request headers into a [`Headers`] reply.
///
/// Binary (`-bin`) entries and values that are not valid UTF-8 are left out;
/// repeated names are joined with `", "`.
#[instrument(skip(entries))]
pub fn echo_headers<'a, I>(entries: I) -> Headers
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut headers = HashMap::<String, String>::new();
    for (name, value) in entries {
        let name = name.to_ascii_lowercase();
        if name.ends_with("-bin") {
            continue;
        }
        let Ok(value) = std::str::from_utf8(value) else {
            debug!(%name, "Skipping non UTF-8 header");
            continue;
        };
        headers
            .entry(name)
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    info!(count = headers.len(), "Echoing headers");
    Headers { headers }
}

pub fn current_time() -> Timestamp {
    Timestamp::from(std::time::SystemTime::now())
}

fn to_datetime(mut ts: Timestamp, field: &str) -> Result<DateTime<Utc>, Status> {
    ts.normalize();
    u32::try_from(ts.nanos)
        .ok()
        .and_then(|nanos| DateTime::<Utc>::from_timestamp(ts.seconds, nanos))
        .ok_or_else(|| Status::invalid_argument(format!("{field} is out of range")))
}

/// Formats whole seconds as `1h2m3s`, dropping leading zero units.
fn format_elapsed(total: i64) -> String {
    if total == 0 {
        return "0s".to_string();
    }
    let sign = if total < 0 { "-" } else { "" };
    let abs = total.unsigned_abs();
    let (hours, minutes, seconds) = (abs / 3600, abs / 60 % 60, abs % 60);
    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    fn ts(seconds: i64) -> Timestamp {
        Timestamp { seconds, nanos: 0 }
    }

    #[test]
    fn say_hello_prefixes_greeting() {
        let resp = say_hello(HelloRequest {
            greeting: "john_doe".to_string(),
            boolean_test: true,
        });
        assert_eq!(resp.reply, "hello john_doe");
        assert!(resp.boolean_test);
    }

    #[test]
    fn unknown_method_is_unimplemented() {
        let err = unknown_method(HelloRequest::default()).unwrap_err();
        assert_eq!(err.code(), Code::Unimplemented);
    }

    #[test]
    fn bounce_reports_elapsed_time() {
        let ball = BallIn {
            message: "world".to_string(),
            when: Some(ts(1_600_000_000)),
            now: Some(ts(1_600_003_725)),
        };
        let out = bounce_it(ball, ts(0)).unwrap();
        assert_eq!(out.reply, "hello world");
        assert_eq!(out.time_message, "2020-09-13T12:26:40Z was 1h2m5s ago");
        assert_eq!(out.now, Some(ts(1_600_003_725)));
    }

    #[test]
    fn bounce_defaults_when_to_epoch_and_now_to_clock() {
        let out = bounce_it(BallIn::default(), ts(90)).unwrap();
        assert_eq!(out.reply, "hello ");
        assert_eq!(out.time_message, "1970-01-01T00:00:00Z was 1m30s ago");
        assert_eq!(out.now, Some(ts(90)));
    }

    #[test]
    fn bounce_truncates_subsecond_and_negative_durations() {
        let ball = BallIn {
            message: String::new(),
            when: Some(Timestamp {
                seconds: 10,
                nanos: 0,
            }),
            now: Some(Timestamp {
                seconds: 5,
                nanos: 400_000_000,
            }),
        };
        let out = bounce_it(ball, ts(0)).unwrap();
        assert_eq!(out.time_message, "1970-01-01T00:00:10Z was -4s ago");
    }

    #[test]
    fn bounce_rejects_out_of_range_timestamps() {
        let ball = BallIn {
            when: Some(ts(i64::MAX)),
            ..Default::default()
        };
        let err = bounce_it(ball, ts(0)).unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
    }

    #[test]
    fn grow_tail_increments_or_creates_tail() {
        let body = Body {
            name: "lizard".to_string(),
            legs: Some(Limb {
                count: 4,
                endings: "claws".to_string(),
            }),
            tail: Some(Limb {
                count: 1,
                endings: "tip".to_string(),
            }),
            ..Default::default()
        };
        let grown = grow_tail(body.clone());
        assert_eq!(grown.tail_or_default().count, 2);
        assert_eq!(grown.tail_or_default().endings, "tip");
        assert_eq!(grown.legs, body.legs);

        let grown = grow_tail(Body::default());
        assert_eq!(grown.tail_or_default().count, 1);

        let grown = grow_tail(Body {
            tail: Some(Limb {
                count: i32::MAX,
                endings: String::new(),
            }),
            ..Default::default()
        });
        assert_eq!(grown.tail_or_default().count, i32::MAX);
    }

    #[test]
    fn echo_returns_message_unchanged() {
        let msg = EchoMsg {
            array: vec!["a".to_string(), "b".to_string()],
            nullable: String::new(),
        };
        assert_eq!(echo(msg.clone()), msg);
    }

    #[test]
    fn echo_headers_joins_and_filters() {
        let entries: Vec<(&str, &[u8])> = vec![
            ("X-Test", b"one"),
            ("x-test", b"two"),
            ("trace-bin", b"\x00\x01"),
            ("x-bad", b"\xff\xfe"),
            ("host", b"localhost"),
        ];
        let headers = echo_headers(entries).headers;
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["x-test"], "one, two");
        assert_eq!(headers["host"], "localhost");
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(0), "0s");
        assert_eq!(format_elapsed(59), "59s");
        assert_eq!(format_elapsed(60), "1m0s");
        assert_eq!(format_elapsed(3600), "1h0m0s");
        assert_eq!(format_elapsed(90_061), "25h1m1s");
        assert_eq!(format_elapsed(-75), "-1m15s");
    }
}
