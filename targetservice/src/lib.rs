// Protobuf bindings for the `targetservice.Bouncer` fixture, shared by the
// fixture server and the client.

// The `include_proto!` macro pulls in the code tonic-build generated from
// `proto/targetservice.proto`: the message structs plus the Bouncer client
// and server modules.
pub mod targetservice {
    tonic::include_proto!("targetservice");
}

pub mod descriptor;
pub mod json;
mod accessors;

pub use targetservice::*;

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use prost_types::Timestamp;

    fn round_trip<M: Message + Default + PartialEq + std::fmt::Debug>(msg: M) {
        let bytes = msg.encode_to_vec();
        assert_eq!(bytes.len(), msg.encoded_len());
        let decoded = M::decode(bytes.as_slice()).expect("decodes");
        assert_eq!(decoded, msg);
    }

    fn limb(count: i32, endings: &str) -> Limb {
        Limb {
            count,
            endings: endings.to_string(),
        }
    }

    #[test]
    fn hello_request_wire_bytes() {
        let req = HelloRequest {
            greeting: "a".to_string(),
            boolean_test: true,
        };
        assert_eq!(req.encode_to_vec(), [0x0a, 0x01, 0x61, 0x10, 0x01]);
    }

    #[test]
    fn every_message_survives_encode_decode() {
        round_trip(HelloRequest {
            greeting: "john_doe".to_string(),
            boolean_test: true,
        });
        round_trip(HelloResponse {
            reply: "hello john_doe".to_string(),
            boolean_test: true,
        });
        round_trip(BallIn {
            message: "ball".to_string(),
            when: Some(Timestamp {
                seconds: 1_600_000_000,
                nanos: 250,
            }),
            now: Some(Timestamp {
                seconds: 1_600_003_725,
                nanos: 0,
            }),
        });
        round_trip(BallOut {
            reply: "hello ball".to_string(),
            time_message: "2020-09-13T12:26:40Z was 1h2m5s ago".to_string(),
            now: Some(Timestamp {
                seconds: -5,
                nanos: 999_999_999,
            }),
        });
        round_trip(limb(-3, "claws"));
        round_trip(Body {
            name: "lizard".to_string(),
            hands: Some(limb(2, "fingers")),
            legs: Some(limb(4, "claws")),
            tail: Some(limb(1, "tip")),
        });
        round_trip(EchoMsg {
            array: vec!["one".to_string(), String::new(), "three".to_string()],
            nullable: "set".to_string(),
        });
        round_trip(Headers {
            headers: [("x-one", "1"), ("x-two", "2"), ("host", "localhost")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        round_trip(Void {});
    }

    #[test]
    fn present_but_zero_limb_is_kept_on_the_wire() {
        let body = Body {
            tail: Some(Limb::default()),
            ..Default::default()
        };
        let decoded = Body::decode(body.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded.tail, Some(Limb::default()));
        assert!(decoded.hands.is_none());
    }
}
