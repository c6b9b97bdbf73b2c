use std::{env, path::PathBuf};

const TIMESTAMP_FIELDS: &[&str] = &[
    ".targetservice.BallIn.when",
    ".targetservice.BallIn.now",
    ".targetservice.BallOut.now",
];

// Scalar, repeated and map fields, where JSON `null` means the zero value.
const DEFAULTED_FIELDS: &[&str] = &[
    ".targetservice.HelloRequest.greeting",
    ".targetservice.HelloRequest.boolean_test",
    ".targetservice.HelloResponse.reply",
    ".targetservice.HelloResponse.boolean_test",
    ".targetservice.BallIn.message",
    ".targetservice.BallOut.reply",
    ".targetservice.BallOut.time_message",
    ".targetservice.Limb.count",
    ".targetservice.Limb.endings",
    ".targetservice.Body.name",
    ".targetservice.EchoMsg.array",
    ".targetservice.EchoMsg.nullable",
    ".targetservice.Headers.headers",
];

// lowerCamelCase JSON names accepted alongside the proto names.
const CAMEL_ALIASES: &[(&str, &str)] = &[
    (".targetservice.HelloRequest.boolean_test", "booleanTest"),
    (".targetservice.HelloResponse.boolean_test", "booleanTest"),
    (".targetservice.BallOut.time_message", "timeMessage"),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Build protoc from source so the crate does not depend on a system install.
    std::env::set_var("PROTOC", protobuf_src::protoc());

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    let mut builder = tonic_build::configure()
        .file_descriptor_set_path(out_dir.join("targetservice_descriptor.bin"))
        // JSON mapping keeps the proto field names and zero-fills missing fields
        .type_attribute(".", "#[derive(serde::Serialize, serde::Deserialize)]")
        .type_attribute(".", "#[serde(default)]");

    for field in TIMESTAMP_FIELDS {
        builder = builder.field_attribute(
            *field,
            "#[serde(with = \"crate::json::timestamp\", skip_serializing_if = \"Option::is_none\")]",
        );
    }

    for field in DEFAULTED_FIELDS {
        builder = builder.field_attribute(
            *field,
            "#[serde(deserialize_with = \"crate::json::null_as_default::deserialize\")]",
        );
    }

    for (field, alias) in CAMEL_ALIASES {
        builder = builder.field_attribute(*field, format!("#[serde(alias = \"{alias}\")]"));
    }

    builder.compile(
        &[PathBuf::from("proto/targetservice.proto")],
        &[PathBuf::from("proto"), protobuf_src::include()],
    )?;

    println!("cargo:rerun-if-changed=proto/targetservice.proto");
    Ok(())
}
