//! Descriptor lookup for the Bouncer schema and its HTTP bindings.

use prost::Message;
use prost_types::{DescriptorProto, FileDescriptorProto, FileDescriptorSet, MethodDescriptorProto};

/// Encoded `FileDescriptorSet` for `targetservice.proto` and its imports.
pub const FILE_DESCRIPTOR_SET: &[u8] =
    tonic::include_file_descriptor_set!("targetservice_descriptor");

pub const PACKAGE: &str = "targetservice";
pub const SERVICE: &str = "Bouncer";

/// Decodes [`FILE_DESCRIPTOR_SET`].
pub fn file_descriptor_set() -> Result<FileDescriptorSet, prost::DecodeError> {
    FileDescriptorSet::decode(FILE_DESCRIPTOR_SET)
}

/// The decoded schema, indexed by the names used on the wire.
#[derive(Debug, Clone)]
pub struct Schema {
    file: FileDescriptorProto,
}

impl Schema {
    pub fn load() -> Result<Self, prost::DecodeError> {
        let set = file_descriptor_set()?;
        let file = set
            .file
            .into_iter()
            .find(|f| f.package() == PACKAGE)
            .ok_or_else(|| prost::DecodeError::new("descriptor set has no targetservice file"))?;
        Ok(Self { file })
    }

    /// Finds a message by short (`Body`) or fully qualified
    /// (`.targetservice.Body`) name.
    pub fn find_message(&self, name: &str) -> Option<&DescriptorProto> {
        let name = local_name(name);
        self.file.message_type.iter().find(|m| m.name() == name)
    }

    /// Finds a Bouncer method by name, e.g. `SayHello`.
    pub fn find_method(&self, name: &str) -> Option<&MethodDescriptorProto> {
        self.methods().find(|m| m.name() == name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDescriptorProto> {
        self.file
            .service
            .iter()
            .filter(|s| s.name() == SERVICE)
            .flat_map(|s| s.method.iter())
    }

    pub fn message_names(&self) -> impl Iterator<Item = &str> {
        self.file.message_type.iter().map(|m| m.name())
    }
}

/// Full gRPC path of a Bouncer method, `/targetservice.Bouncer/<method>`.
pub fn grpc_path(method: &str) -> String {
    format!("/{PACKAGE}.{SERVICE}/{method}")
}

fn local_name(name: &str) -> &str {
    let name = name.trim_start_matches('.');
    name.strip_prefix(PACKAGE)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
}

/// One `google.api.http` binding of a Bouncer method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpRule {
    pub method: &'static str,
    pub verb: HttpVerb,
    /// Path template; `{field}` binds one segment, `{field=**}` the rest of the path.
    pub path: &'static str,
    /// `Some("*")` when the whole request message comes from the body.
    pub body: Option<&'static str>,
}

/// HTTP bindings declared for the Bouncer service, primary binding first.
///
/// Nested `additional_bindings` are flattened into sibling rules. Two
/// declared `body` values are normalised to what a transcoder can serve:
/// the primary SayHello GET declares `body: "*"` but a GET carries no body,
/// so it is `None` and the request comes from the path and query; the
/// `POST /v1/messages/` binding declares no body and has no path field, so it
/// reads the whole request from the body.
pub const HTTP_RULES: &[HttpRule] = &[
    HttpRule {
        method: "SayHello",
        verb: HttpVerb::Get,
        path: "/v1/messages/{greeting}",
        // declared `body: "*"`
        body: None,
    },
    HttpRule {
        method: "SayHello",
        verb: HttpVerb::Get,
        path: "/v1/messages/legacy/{greeting=**}",
        body: None,
    },
    HttpRule {
        method: "SayHello",
        verb: HttpVerb::Post,
        path: "/v1/messages/",
        // declared without a body
        body: Some("*"),
    },
    HttpRule {
        method: "UnknownMethod",
        verb: HttpVerb::Get,
        path: "/v1/unknown/{greeting}",
        body: None,
    },
    HttpRule {
        method: "BounceIt",
        verb: HttpVerb::Post,
        path: "/bounce",
        body: Some("*"),
    },
    HttpRule {
        method: "GrowTail",
        verb: HttpVerb::Get,
        path: "/v1/grow/tail",
        body: None,
    },
    HttpRule {
        method: "Echo",
        verb: HttpVerb::Post,
        path: "/v1/echo",
        body: Some("*"),
    },
    HttpRule {
        method: "EchoHeaders",
        verb: HttpVerb::Get,
        path: "/v1/echoheaders",
        body: None,
    },
];

/// Bindings of one method, in declaration order.
pub fn http_rules(method: &str) -> impl Iterator<Item = &'static HttpRule> + '_ {
    HTTP_RULES.iter().filter(move |rule| rule.method == method)
}
