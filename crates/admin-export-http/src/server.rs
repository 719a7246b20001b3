//! HTTP/1 server

use crate::{Handler, Request, Response};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// Serves a [`Handler`] over HTTP/1
pub struct HttpServer {
	pub handler: Arc<dyn Handler>,
}

impl HttpServer {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self { handler }
	}

	/// Accept connections until the process ends
	pub async fn listen(self, addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
		self.listen_with_shutdown(addr, std::future::pending()).await
	}

	/// Accept connections until `shutdown` resolves
	///
	/// Connections already accepted keep running on their own tasks.
	pub async fn listen_with_shutdown(
		self,
		addr: SocketAddr,
		shutdown: impl Future<Output = ()>,
	) -> Result<(), Box<dyn std::error::Error>> {
		let listener = TcpListener::bind(addr).await?;
		tracing::info!(addr = %listener.local_addr()?, "Server listening");
		self.serve(listener, shutdown).await
	}

	/// Serve on an already bound listener
	pub async fn serve(
		self,
		listener: TcpListener,
		shutdown: impl Future<Output = ()>,
	) -> Result<(), Box<dyn std::error::Error>> {
		tokio::pin!(shutdown);

		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, socket_addr) = result?;
					let handler = self.handler.clone();

					tokio::task::spawn(async move {
						if let Err(err) = Self::handle_connection(stream, socket_addr, handler).await {
							tracing::warn!(peer = %socket_addr, error = %err, "Error handling connection");
						}
					});
				}
				_ = &mut shutdown => {
					tracing::info!("Shutdown signal received, stopping server");
					break;
				}
			}
		}

		Ok(())
	}

	pub async fn handle_connection(
		stream: TcpStream,
		socket_addr: SocketAddr,
		handler: Arc<dyn Handler>,
	) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr: socket_addr,
		};

		http1::Builder::new().serve_connection(io, service).await?;

		Ok(())
	}
}

struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Box<dyn std::error::Error + Send + Sync>;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body_bytes = body.collect().await?.to_bytes();

			let mut request = Request::new(parts.method, parts.uri, parts.version, parts.headers, body_bytes);
			request.remote_addr = Some(remote_addr);

			let response = handler
				.handle(request)
				.await
				.unwrap_or_else(Response::from);

			let mut hyper_response = hyper::Response::builder().status(response.status);
			for (key, value) in response.headers.iter() {
				hyper_response = hyper_response.header(key, value);
			}

			Ok(hyper_response.body(Full::new(response.body))?)
		})
	}
}
