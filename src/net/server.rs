use crate::{
    dispatcher::Dispatcher,
    net::{Frame, Reply},
    RpcMethod,
};
use async_bincode::tokio::AsyncBincodeStream;
use futures::{SinkExt, StreamExt};
use std::{io, net::SocketAddr, sync::Arc};
use tokio::{
    io::BufStream,
    net::{TcpListener, TcpStream, ToSocketAddrs},
    task,
};
use tracing::{debug, warn};

/// Hosts any number of services; each method is reachable as `service/method`.
#[derive(Default)]
pub struct Server {
    dispatcher: Dispatcher,
}

impl Server {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<M>(&mut self, service: &str, method: M)
    where
        M: RpcMethod + Send + Sync + 'static,
        M::Domain: Send,
    {
        self.dispatcher.register(service, method);
    }

    /// Binds the listening socket. Nothing is accepted until [`Listener::serve`].
    pub async fn bind<A: ToSocketAddrs>(self, addr: A) -> io::Result<Listener> {
        let tcp = TcpListener::bind(addr).await?;
        Ok(Listener {
            server: Arc::new(self),
            tcp,
        })
    }

    pub async fn serve_tcp<A: ToSocketAddrs>(self, addr: A) -> io::Result<()> {
        self.bind(addr).await?.serve().await
    }

    async fn answer(&self, frame: Frame) -> Reply {
        match frame {
            Frame::Ping => Reply::Pong,
            Frame::ListServices => Reply::Services(self.dispatcher.services()),
            Frame::Invoke { path, args } => {
                let result = self.dispatcher.dispatch(&path, args).await;
                if let Err(e) = &result {
                    debug!(%path, "call failed: {e}");
                }
                Reply::Invoked(result)
            }
        }
    }

    async fn handle_connection(self: Arc<Self>, sock: TcpStream, peer: SocketAddr) {
        let mut sock =
            AsyncBincodeStream::<_, Frame, Reply, _>::from(BufStream::new(sock)).for_async();

        while let Some(frame) = sock.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(%peer, "bad frame: {e}");
                    return;
                }
            };

            let reply = self.answer(frame).await;
            if let Err(e) = sock.send(reply).await {
                warn!(%peer, "sending reply: {e}");
                return;
            }
        }

        debug!(%peer, "connection closed");
    }
}

/// A [`Server`] with a bound socket.
pub struct Listener {
    server: Arc<Server>,
    tcp: TcpListener,
}

impl Listener {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.tcp.local_addr()
    }

    /// Accepts connections until an accept error occurs, one task per connection.
    pub async fn serve(self) -> io::Result<()> {
        loop {
            let (sock, peer) = self.tcp.accept().await?;
            debug!(%peer, "accepted connection");
            task::spawn(self.server.clone().handle_connection(sock, peer));
        }
    }
}
