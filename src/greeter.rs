//! The greeter service: one operation, `Greet`, turning a name into a greeting.
//!
//! Both binaries link this module, so the schema they speak is the same by
//! construction. [`GreeterClient::verify_schema`] checks it against a running
//! server anyway.

use crate::{
    rpc_method, Client, ClientError, Decode, Encode, InferType, RpcMethod, SchemaMismatch, Server,
    ServiceSchema, Type, TypeMismatchError, Value,
};
use tokio::net::ToSocketAddrs;
use tracing::{error, info};

pub const SERVICE_NAME: &str = "greet.Greeter";
pub const GREET: &str = "Greet";

pub const DEFAULT_PORT: u16 = 50051;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloReply {
    pub message: String,
}

impl InferType for HelloRequest {
    fn infer_type() -> Type {
        Type::record([("name", Type::String)])
    }
}

impl Encode for HelloRequest {
    fn encode(self) -> Value {
        Value::Record(vec![("name".to_owned(), self.name.encode())])
    }
}

impl Decode for HelloRequest {
    fn decode(mut val: Value) -> Result<Self, TypeMismatchError> {
        match val.take_field("name") {
            Some(name) => Ok(Self {
                name: String::decode(name)?,
            }),
            None => Err(TypeMismatchError::new(val, Self::infer_type())),
        }
    }
}

impl InferType for HelloReply {
    fn infer_type() -> Type {
        Type::record([("message", Type::String)])
    }
}

impl Encode for HelloReply {
    fn encode(self) -> Value {
        Value::Record(vec![("message".to_owned(), self.message.encode())])
    }
}

impl Decode for HelloReply {
    fn decode(mut val: Value) -> Result<Self, TypeMismatchError> {
        match val.take_field("message") {
            Some(message) => Ok(Self {
                message: String::decode(message)?,
            }),
            None => Err(TypeMismatchError::new(val, Self::infer_type())),
        }
    }
}

/// The name is used verbatim: no trimming, no case changes, no validation.
pub fn greeting(name: &str) -> String {
    format!("Hello, {name}!")
}

pub struct Greet;

impl RpcMethod for Greet {
    rpc_method! {
        name = GREET;
        async fn call(&self, request: HelloRequest) -> HelloReply {
            info!("Received request for {GREET}: {}", request.name);
            HelloReply {
                message: greeting(&request.name),
            }
        }
    }
}

pub fn schema() -> ServiceSchema {
    ServiceSchema::new(SERVICE_NAME).operation(GREET, Greet.signature())
}

/// A [`Server`] with the greeter service registered.
pub fn server() -> Server {
    let mut server = Server::new();
    server.insert(SERVICE_NAME, Greet);
    server
}

pub struct GreeterClient(Client);

impl GreeterClient {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, ClientError> {
        Ok(Self(Client::connect(addr).await?))
    }

    pub async fn greet(&mut self, name: &str) -> Result<String, ClientError> {
        let request = HelloRequest {
            name: name.to_owned(),
        };
        let reply: HelloReply = self.0.call(SERVICE_NAME, GREET, request).await?;
        Ok(reply.message)
    }

    /// Fetches the server's service list and checks it against [`schema`].
    pub async fn verify_schema(&mut self) -> Result<Result<(), SchemaMismatch>, ClientError> {
        let advertised = self.0.services().await?;
        Ok(schema().verify(&advertised))
    }
}

/// Greets `name` once and logs the outcome. Errors are logged, not raised.
pub async fn run_client<A: ToSocketAddrs>(addr: A, name: &str) -> Result<String, ClientError> {
    let result = greet_once(addr, name).await;
    match &result {
        Ok(message) => info!("Greeting: {message}"),
        Err(e) => error!("Error calling {GREET}: {e}"),
    }
    result
}

async fn greet_once<A: ToSocketAddrs>(addr: A, name: &str) -> Result<String, ClientError> {
    GreeterClient::connect(addr).await?.greet(name).await
}
