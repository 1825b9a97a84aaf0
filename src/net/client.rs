use super::{Frame, MethodPath, Reply};
use crate::{
    dispatcher::DispatchError,
    schema::ServiceSchema,
    types::{Decode, Encode, TypeMismatchError},
};
use async_bincode::{tokio::AsyncBincodeStream, AsyncDestination};
use futures::{SinkExt, StreamExt};
use std::io;
use thiserror::Error;
use tokio::{
    io::BufStream,
    net::{TcpStream, ToSocketAddrs},
};

type Connection = AsyncBincodeStream<BufStream<TcpStream>, Reply, Frame, AsyncDestination>;

/// One connection to a [`Server`](crate::Server). Requests are sent one at a time.
pub struct Client {
    sock: Connection,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connecting: {0}")]
    Io(#[from] io::Error),

    #[error("transport: {0}")]
    Transport(#[from] bincode::Error),

    #[error("no response from server")]
    NoResponse,

    #[error("unexpected response from server")]
    UnexpectedResponse,

    #[error("{0}")]
    Dispatch(#[from] DispatchError),

    #[error("decoding return value: {0}")]
    Decode(#[from] TypeMismatchError),
}

impl Client {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, ClientError> {
        let sock = TcpStream::connect(addr).await?;
        let sock = AsyncBincodeStream::from(BufStream::new(sock)).for_async();
        Ok(Self { sock })
    }

    async fn round_trip(&mut self, frame: Frame) -> Result<Reply, ClientError> {
        self.sock.send(frame).await?;
        let reply = self.sock.next().await.ok_or(ClientError::NoResponse)??;
        Ok(reply)
    }

    pub async fn ping(&mut self) -> Result<(), ClientError> {
        match self.round_trip(Frame::Ping).await? {
            Reply::Pong => Ok(()),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Schemas of every service the server hosts.
    pub async fn services(&mut self) -> Result<Vec<ServiceSchema>, ClientError> {
        match self.round_trip(Frame::ListServices).await? {
            Reply::Services(services) => Ok(services),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn call<Domain, Range>(
        &mut self,
        service: &str,
        method: &str,
        args: Domain,
    ) -> Result<Range, ClientError>
    where
        Domain: Encode,
        Range: Decode,
    {
        let frame = Frame::Invoke {
            path: MethodPath::new(service, method),
            args: args.encode(),
        };
        match self.round_trip(frame).await? {
            Reply::Invoked(result) => Ok(Range::decode(result?)?),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }
}
