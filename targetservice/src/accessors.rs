//! Zero-value accessors for message-typed fields.
//!
//! prost models an unset sub-message as `None`; these helpers hand back the
//! zero value instead, which is what the handlers want to compute with.

use prost_types::Timestamp;

use crate::targetservice::{BallIn, BallOut, Body, Limb};

impl BallIn {
    /// `when`, or the Unix epoch if it was not sent.
    pub fn when_or_default(&self) -> Timestamp {
        self.when.clone().unwrap_or_default()
    }

    /// `now`, or the Unix epoch if it was not sent.
    pub fn now_or_default(&self) -> Timestamp {
        self.now.clone().unwrap_or_default()
    }
}

impl BallOut {
    pub fn now_or_default(&self) -> Timestamp {
        self.now.clone().unwrap_or_default()
    }
}

impl Body {
    pub fn hands_or_default(&self) -> Limb {
        self.hands.clone().unwrap_or_default()
    }

    pub fn legs_or_default(&self) -> Limb {
        self.legs.clone().unwrap_or_default()
    }

    pub fn tail_or_default(&self) -> Limb {
        self.tail.clone().unwrap_or_default()
    }
}
