//! Command-line client for the Bouncer fixture service.
//!
//! Calls one RPC and prints the reply as JSON.

use clap::{Parser, Subcommand};
use prost_types::Timestamp;
use serde::Serialize;
use tonic::{
    metadata::{Ascii, MetadataKey, MetadataValue},
    transport::Channel,
    Request,
};
use tracing::{error, info, instrument};
use tracing_subscriber::prelude::*;

use targetservice::{
    bouncer_client::BouncerClient, BallIn, Body, EchoMsg, HelloRequest, Limb, Void,
};

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:15010";

#[derive(Debug, Parser)]
#[command(name = "bouncer-client")]
#[command(version, about = "Call the Bouncer fixture service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// gRPC endpoint of the fixture server
    #[arg(long, env = "BOUNCER_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    endpoint: String,

    /// Extra request metadata as `name=value`; may be repeated
    #[arg(long = "header", value_parser = parse_header, global = true)]
    headers: Vec<(String, String)>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// SayHello: greet the server
    SayHello {
        greeting: String,
        #[arg(long)]
        boolean_test: bool,
    },

    /// UnknownMethod: a declared method the server does not implement
    Unknown { greeting: String },

    /// BounceIt: send a ball and get the elapsed time back
    Bounce {
        message: String,

        /// RFC 3339 time the ball was thrown (defaults to the epoch server-side)
        #[arg(long, value_parser = parse_timestamp)]
        when: Option<Timestamp>,

        /// RFC 3339 "current" time (defaults to the server clock)
        #[arg(long, value_parser = parse_timestamp)]
        now: Option<Timestamp>,
    },

    /// GrowTail: send a body and get it back with a longer tail
    GrowTail {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        hands: Option<i32>,
        #[arg(long)]
        legs: Option<i32>,
        #[arg(long, default_value_t = 0)]
        tail: i32,
        #[arg(long, default_value = "")]
        tail_endings: String,
    },

    /// Echo: send strings and get them back unchanged
    Echo {
        items: Vec<String>,
        #[arg(long, default_value = "")]
        nullable: String,
    },

    /// EchoHeaders: show the metadata the server received
    EchoHeaders,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))?;
    if name.is_empty() {
        return Err(format!("empty header name in {raw:?}"));
    }
    Ok((name.to_ascii_lowercase(), value.to_string()))
}

fn parse_timestamp(raw: &str) -> Result<Timestamp, String> {
    raw.parse::<Timestamp>()
        .map_err(|e| format!("invalid RFC 3339 timestamp {raw:?}: {e}"))
}

fn limb(count: Option<i32>) -> Option<Limb> {
    count.map(|count| Limb {
        count,
        endings: String::new(),
    })
}

impl Command {
    fn grow_tail_body(
        name: &str,
        hands: Option<i32>,
        legs: Option<i32>,
        tail: i32,
        tail_endings: &str,
    ) -> Body {
        Body {
            name: name.to_string(),
            hands: limb(hands),
            legs: limb(legs),
            tail: Some(Limb {
                count: tail,
                endings: tail_endings.to_string(),
            }),
        }
    }
}

/// Wraps `message` with the user supplied metadata.
fn request<T>(
    message: T,
    headers: &[(String, String)],
) -> Result<Request<T>, Box<dyn std::error::Error>> {
    let mut request = Request::new(message);
    for (name, value) in headers {
        let key = MetadataKey::<Ascii>::from_bytes(name.as_bytes())?;
        let value = MetadataValue::try_from(value.as_str())?;
        request.metadata_mut().append(key, value);
    }
    Ok(request)
}

fn print_json<T: Serialize>(reply: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(reply)?);
    Ok(())
}

#[instrument(skip(client, cli), fields(endpoint = %cli.endpoint))]
async fn run(
    client: &mut BouncerClient<Channel>,
    cli: Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    let headers = &cli.headers;
    match cli.command {
        Command::SayHello {
            greeting,
            boolean_test,
        } => {
            let req = request(
                HelloRequest {
                    greeting,
                    boolean_test,
                },
                headers,
            )?;
            print_json(&client.say_hello(req).await?.into_inner())
        }
        Command::Unknown { greeting } => {
            let req = request(
                HelloRequest {
                    greeting,
                    boolean_test: false,
                },
                headers,
            )?;
            print_json(&client.unknown_method(req).await?.into_inner())
        }
        Command::Bounce { message, when, now } => {
            let req = request(BallIn { message, when, now }, headers)?;
            print_json(&client.bounce_it(req).await?.into_inner())
        }
        Command::GrowTail {
            name,
            hands,
            legs,
            tail,
            tail_endings,
        } => {
            let body = Command::grow_tail_body(&name, hands, legs, tail, &tail_endings);
            let req = request(body, headers)?;
            print_json(&client.grow_tail(req).await?.into_inner())
        }
        Command::Echo { items, nullable } => {
            let req = request(
                EchoMsg {
                    array: items,
                    nullable,
                },
                headers,
            )?;
            print_json(&client.echo(req).await?.into_inner())
        }
        Command::EchoHeaders => {
            let req = request(Void {}, headers)?;
            print_json(&client.echo_headers(req).await?.into_inner())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    info!(endpoint = %cli.endpoint, "Connecting to bouncer");
    let mut client = BouncerClient::connect(cli.endpoint.clone()).await?;

    if let Err(e) = run(&mut client, cli).await {
        error!("Call failed: {}", e);
        return Err(e);
    }
    Ok(())
}
