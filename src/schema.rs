//! Service descriptions: compiled into both ends, and sent by the server on request.

use crate::types::Signature;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name and signature of one method of a service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OperationInfo {
    pub name: String,
    pub signature: Signature,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServiceSchema {
    pub name: String,
    pub operations: Vec<OperationInfo>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaMismatch {
    #[error("server does not provide service {0}")]
    Service(String),

    #[error("server does not provide {0}")]
    Missing(String),

    #[error("{name}: expected {local}, server has {remote}")]
    Signature {
        name: String,
        local: String,
        remote: String,
    },
}

impl ServiceSchema {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            operations: Vec::new(),
        }
    }

    pub fn operation(mut self, name: &str, signature: Signature) -> Self {
        self.operations.push(OperationInfo {
            name: name.to_owned(),
            signature,
        });
        self
    }

    /// Finds this service among `advertised` and checks that each of its
    /// operations is there with an identical signature. Extra advertised
    /// services and operations are ignored.
    pub fn verify(&self, advertised: &[ServiceSchema]) -> Result<(), SchemaMismatch> {
        let remote = advertised
            .iter()
            .find(|service| service.name == self.name)
            .ok_or_else(|| SchemaMismatch::Service(self.name.clone()))?;

        for op in &self.operations {
            let remote_op = remote
                .operations
                .iter()
                .find(|info| info.name == op.name)
                .ok_or_else(|| SchemaMismatch::Missing(format!("{}/{}", self.name, op.name)))?;

            if remote_op.signature != op.signature {
                return Err(SchemaMismatch::Signature {
                    name: op.name.clone(),
                    local: fmt_signature(&op.signature),
                    remote: fmt_signature(&remote_op.signature),
                });
            }
        }
        Ok(())
    }
}

fn fmt_signature(Signature { domain, range }: &Signature) -> String {
    format!("{domain} -> {range}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;

    fn echo() -> Signature {
        Signature {
            domain: Type::String,
            range: Type::String,
        }
    }

    #[test]
    fn verify() {
        let schema = ServiceSchema::new("test.Echo").operation("Echo", echo());
        let other = ServiceSchema::new("test.Other").operation("Echo", echo());

        assert_eq!(schema.verify(&[other.clone(), schema.clone()]), Ok(()));
        assert_eq!(
            schema.verify(&[other]),
            Err(SchemaMismatch::Service("test.Echo".into()))
        );

        let no_echo = ServiceSchema::new("test.Echo").operation("Shout", echo());
        assert_eq!(
            schema.verify(&[no_echo]),
            Err(SchemaMismatch::Missing("test.Echo/Echo".into()))
        );

        let int_echo = ServiceSchema::new("test.Echo").operation(
            "Echo",
            Signature {
                domain: Type::Int,
                range: Type::String,
            },
        );
        let err = schema.verify(&[int_echo]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Echo: expected String -> String, server has Int -> String"
        );
    }
}
