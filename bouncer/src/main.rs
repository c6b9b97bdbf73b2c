use actix_web::{App, HttpServer};
use tonic::transport::Server;
use tracing::info;
use tracing_subscriber::prelude::*;

use targetservice::{bouncer_server::BouncerServer, descriptor::FILE_DESCRIPTOR_SET};

mod config;
mod error;
mod grpc;
mod rest;
mod service;

use config::Config;
use grpc::BouncerService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    // --- gRPC Server Task ---
    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build()?;
    let grpc_server = Server::builder()
        .add_service(BouncerServer::new(BouncerService))
        .add_service(reflection);
    info!("gRPC server listening on {}", config.grpc_addr);
    let grpc_handle = tokio::spawn(grpc_server.serve(config.grpc_addr));

    // --- REST Server Task (Actix-Web) ---
    info!("REST server listening on {}", config.rest_addr);
    let rest_server = HttpServer::new(|| App::new().configure(rest::configure))
        .bind(config.rest_addr)?
        .run();
    let rest_handle = tokio::spawn(rest_server);

    // Wait for both servers to complete
    let (grpc_res, rest_res) = tokio::join!(grpc_handle, rest_handle);
    grpc_res??;
    rest_res??;

    Ok(())
}
