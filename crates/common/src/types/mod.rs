use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Plain `{ "msg": ... }` payload used by informational endpoints.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiMessage {
    pub msg: String,
}

impl ApiMessage {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}
