use tonic::{Request, Response, Status};
use tracing::instrument;

use targetservice::{
    bouncer_server::Bouncer, BallIn, BallOut, Body, EchoMsg, Headers, HelloRequest, HelloResponse,
    Void,
};

use crate::service;

/// The gRPC face of the fixture; every call goes straight to [`service`].
#[derive(Debug, Default, Clone)]
pub struct BouncerService;

#[tonic::async_trait]
impl Bouncer for BouncerService {
    #[instrument(skip(self, request))]
    async fn say_hello(
        &self,
        request: Request<HelloRequest>,
    ) -> Result<Response<HelloResponse>, Status> {
        Ok(Response::new(service::say_hello(request.into_inner())))
    }

    #[instrument(skip(self, request))]
    async fn unknown_method(
        &self,
        request: Request<HelloRequest>,
    ) -> Result<Response<HelloResponse>, Status> {
        service::unknown_method(request.into_inner()).map(Response::new)
    }

    #[instrument(skip(self, request))]
    async fn bounce_it(&self, request: Request<BallIn>) -> Result<Response<BallOut>, Status> {
        service::bounce_it(request.into_inner(), service::current_time()).map(Response::new)
    }

    #[instrument(skip(self, request))]
    async fn grow_tail(&self, request: Request<Body>) -> Result<Response<Body>, Status> {
        Ok(Response::new(service::grow_tail(request.into_inner())))
    }

    #[instrument(skip(self, request))]
    async fn echo(&self, request: Request<EchoMsg>) -> Result<Response<EchoMsg>, Status> {
        Ok(Response::new(service::echo(request.into_inner())))
    }

    #[instrument(skip(self, request))]
    async fn echo_headers(&self, request: Request<Void>) -> Result<Response<Headers>, Status> {
        let metadata = request.metadata().clone().into_headers();
        let headers = service::echo_headers(
            metadata
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_bytes())),
        );
        Ok(Response::new(headers))
    }
}
