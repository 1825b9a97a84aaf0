//! Frames exchanged over a connection. Every call names its service and method.

pub mod client;
pub mod server;

use crate::{dispatcher::DispatchError, schema::ServiceSchema, types::Value};
use serde::{Deserialize, Serialize};

/// `service/method`, e.g. `greet.Greeter/Greet`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MethodPath {
    pub service: String,
    pub method: String,
}

impl MethodPath {
    pub fn new(service: &str, method: &str) -> Self {
        Self {
            service: service.to_owned(),
            method: method.to_owned(),
        }
    }
}

impl std::fmt::Display for MethodPath {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.service, self.method)
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub(crate) enum Frame {
    Ping,
    ListServices,
    Invoke { path: MethodPath, args: Value },
}

#[derive(Serialize, Deserialize, Debug)]
pub(crate) enum Reply {
    Pong,
    Services(Vec<ServiceSchema>),
    Invoked(Result<Value, DispatchError>),
}
