use crate::{
    net::MethodPath,
    schema::{OperationInfo, ServiceSchema},
    types::{DecodeTypeCheck, EncodeTypeCheck, Signature, TypeMismatchError, Value},
    RpcMethod,
};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use thiserror::Error;

type Handler = Arc<dyn ErasedMethod + Send + Sync + 'static>;

/// Routes a [`MethodPath`] to the method registered under it.
///
/// Arguments are checked against the method's domain before the call and the
/// return value against its range after it.
#[derive(Default)]
pub(crate) struct Dispatcher {
    methods: BTreeMap<MethodPath, Handler>,
}

impl Dispatcher {
    pub(crate) fn register<M>(&mut self, service: &str, method: M)
    where
        M: RpcMethod + Send + Sync + 'static,
        M::Domain: Send,
    {
        let path = MethodPath::new(service, method.name());
        let signature = method.signature();
        self.methods
            .insert(path, Arc::new(Checked { method, signature }));
    }

    pub(crate) async fn dispatch(&self, path: &MethodPath, args: Value) -> Result<Value, DispatchError> {
        let Some(handler) = self.methods.get(path) else {
            let known_service = self.methods.keys().any(|p| p.service == path.service);
            return Err(if known_service {
                DispatchError::NoSuchMethod(path.to_string())
            } else {
                DispatchError::NoSuchService(path.service.clone())
            });
        };
        Ok(handler.invoke(args).await?)
    }

    /// One schema per registered service, ordered by service name.
    pub(crate) fn services(&self) -> Vec<ServiceSchema> {
        let mut services: Vec<ServiceSchema> = Vec::new();
        for (path, handler) in &self.methods {
            let op = OperationInfo {
                name: path.method.clone(),
                signature: handler.signature().clone(),
            };
            match services.last_mut() {
                Some(last) if last.name == path.service => last.operations.push(op),
                _ => services.push(ServiceSchema {
                    name: path.service.clone(),
                    operations: vec![op],
                }),
            }
        }
        services
    }
}

struct Checked<M> {
    method: M,
    signature: Signature,
}

trait ErasedMethod {
    fn signature(&self) -> &Signature;
    fn invoke(&self, args: Value) -> BoxFuture<'_, Result<Value, CallError>>;
}

impl<M> ErasedMethod for Checked<M>
where
    M: RpcMethod + Send + Sync,
    M::Domain: Send,
{
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn invoke(&self, args: Value) -> BoxFuture<'_, Result<Value, CallError>> {
        Box::pin(async move {
            let Signature { domain, range } = &self.signature;
            let args = M::Domain::decode_typeck(domain, args).map_err(CallError::Domain)?;
            let retval = self.method.call(args).await;
            M::Range::encode_typeck(range, retval).map_err(CallError::Range)
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unknown service {0}")]
    NoSuchService(String),

    #[error("unknown method {0}")]
    NoSuchMethod(String),

    #[error("calling method: {0}")]
    CallError(#[from] CallError),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("bad arguments: {0}")]
    Domain(TypeMismatchError),

    #[error("method returned a value outside its signature: {0}")]
    Range(TypeMismatchError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rpc_method, types::Type};

    struct Shout;

    impl RpcMethod for Shout {
        rpc_method! {
            name = "Shout";
            async fn call(&self, word: String) -> String {
                word.to_uppercase()
            }
        }
    }

    /// Claims to return an Int but actually returns a String.
    struct Liar;

    impl RpcMethod for Liar {
        rpc_method! {
            name = "Liar";
            signature = Type::String => Type::Int;
            async fn call(&self, word: String) -> String {
                word
            }
        }
    }

    fn dispatcher() -> Dispatcher {
        let mut dispatcher = Dispatcher::default();
        dispatcher.register("test.Loud", Shout);
        dispatcher.register("test.Loud", Liar);
        dispatcher.register("test.Quiet", Shout);
        dispatcher
    }

    #[tokio::test]
    async fn dispatches_by_service_and_method() {
        let path = MethodPath::new("test.Quiet", "Shout");
        let retval = dispatcher().dispatch(&path, "hey".into()).await.unwrap();
        assert_eq!(retval, Value::from("HEY"));
    }

    #[tokio::test]
    async fn unknown_service_and_method() {
        let dispatcher = dispatcher();

        let err = dispatcher
            .dispatch(&MethodPath::new("test.Loud", "Whisper"), "hey".into())
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::NoSuchMethod("test.Loud/Whisper".into()));

        let err = dispatcher
            .dispatch(&MethodPath::new("test.Silent", "Shout"), "hey".into())
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::NoSuchService("test.Silent".into()));
    }

    #[tokio::test]
    async fn domain_and_range_are_checked() {
        let dispatcher = dispatcher();

        let shout = MethodPath::new("test.Loud", "Shout");
        let err = dispatcher.dispatch(&shout, Value::Int(3)).await.unwrap_err();
        assert!(matches!(err, DispatchError::CallError(CallError::Domain(_))));

        let liar = MethodPath::new("test.Loud", "Liar");
        let err = dispatcher.dispatch(&liar, "x".into()).await.unwrap_err();
        assert!(matches!(err, DispatchError::CallError(CallError::Range(_))));
    }

    #[test]
    fn services_group_methods() {
        let services = dispatcher().services();
        let names: Vec<_> = services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["test.Loud", "test.Quiet"]);

        let loud: Vec<_> = services[0].operations.iter().map(|op| op.name.as_str()).collect();
        assert_eq!(loud, ["Liar", "Shout"]);
        assert_eq!(services[0].operations[0].signature.range, Type::Int);
        assert_eq!(services[1].operations[0].signature.domain, Type::String);
    }
}
