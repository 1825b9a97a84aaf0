/// Fills in an [`RpcMethod`](crate::RpcMethod) impl from one async function.
///
/// The signature is inferred from the argument and return types unless given
/// as `signature = domain => range;`.
///
/// ```ignore
/// impl RpcMethod for Echo {
///     rpc_method! {
///         name = "Echo";
///         async fn call(&self, text: String) -> String {
///             text
///         }
///     }
/// }
/// ```
#[macro_export]
macro_rules! rpc_method {
    (
        name = $name:expr;
        $(signature = $domain:expr => $range:expr;)?
        async fn call(& $self:ident, $arg:ident : $domain_ty:ty) -> $range_ty:ty { $($body:tt)* }
    ) => {
        type Domain = $domain_ty;
        type Range = $range_ty;

        fn name(&self) -> &str {
            $name
        }

        $crate::rpc_method!(@signature $($domain => $range)?);

        fn call<'call>(&'call $self, $arg: $domain_ty) -> $crate::BoxFuture<'call, Self::Range> {
            Box::pin(async move { $($body)* })
        }
    };

    (@signature) => {
        fn signature(&self) -> $crate::Signature {
            $crate::Signature {
                domain: <Self::Domain as $crate::InferType>::infer_type(),
                range: <Self::Range as $crate::InferType>::infer_type(),
            }
        }
    };

    (@signature $domain:expr => $range:expr) => {
        fn signature(&self) -> $crate::Signature {
            $crate::Signature {
                domain: $domain,
                range: $range,
            }
        }
    };
}
