//! A small typed RPC layer over TCP and the greeter service built on it.
//!
//! Servers host services made of [`RpcMethod`]s; every call is checked
//! against the method's [`Signature`] on the way in and on the way out. The
//! [`greeter`] module holds the one service this crate ships.

pub mod dispatcher;
pub mod greeter;
pub mod logging;
mod macros;
pub mod net;
pub mod schema;
pub mod types;

pub use dispatcher::{CallError, DispatchError};
pub use futures::future::BoxFuture;
pub use net::{
    client::{Client, ClientError},
    server::{Listener, Server},
    MethodPath,
};
pub use schema::{OperationInfo, SchemaMismatch, ServiceSchema};
pub use types::{Decode, Encode, InferType, Signature, Type, TypeMismatchError, Value};

/// One method of a service. Usually implemented with [`rpc_method!`].
pub trait RpcMethod {
    type Domain: Decode;
    type Range: Encode;

    fn name(&self) -> &str;
    fn signature(&self) -> Signature;
    fn call(&self, args: Self::Domain) -> BoxFuture<'_, Self::Range>;
}
