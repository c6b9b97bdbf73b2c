use std::net::SocketAddr;

pub const DEFAULT_GRPC_ADDR: &str = "127.0.0.1:15010";
pub const DEFAULT_REST_ADDR: &str = "127.0.0.1:15011";

pub const GRPC_ADDR_VAR: &str = "BOUNCER_GRPC_ADDR";
pub const REST_ADDR_VAR: &str = "BOUNCER_REST_ADDR";

#[derive(Debug, thiserror::Error)]
#[error("invalid {var} address {value:?}: {source}")]
pub struct ConfigError {
    var: &'static str,
    value: String,
    source: std::net::AddrParseError,
}

/// Listen addresses for the two front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub grpc_addr: SocketAddr,
    pub rest_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = |var: &'static str, default: &str| {
            let value = lookup(var).unwrap_or_else(|| default.to_string());
            value
                .parse::<SocketAddr>()
                .map_err(|source| ConfigError { var, value, source })
        };
        Ok(Self {
            grpc_addr: addr(GRPC_ADDR_VAR, DEFAULT_GRPC_ADDR)?,
            rest_addr: addr(REST_ADDR_VAR, DEFAULT_REST_ADDR)?,
        })
    }
}
