//! HTTP front end: a single `GET /` page.

use crate::errors::{Error, Result};
use crate::page::PageRenderer;
use crate::projector::Projector;
use crate::snapshot::ContainerSource;
use http::{header, Method, Request, Response, StatusCode};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Server};
use log::*;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

/// Everything a request needs, shared read-only between connections.
pub struct App<S> {
    source: S,
    projector: Projector,
    renderer: PageRenderer,
}

impl<S: ContainerSource> App<S> {
    pub fn new(source: S, projector: Projector) -> Result<Self> {
        Ok(Self {
            source,
            projector,
            renderer: PageRenderer::new()?,
        })
    }

    async fn index(&self) -> Result<String> {
        let containers = self.source.running_containers().await?;
        let rows = self.projector.project(&containers);
        self.renderer.render(self.projector.host_ip(), &rows)
    }

    pub async fn handle(&self, req: Request<Body>) -> Response<Body> {
        if req.uri().path() != "/" {
            return plain(StatusCode::NOT_FOUND, "not found");
        }
        if req.method() != Method::GET && req.method() != Method::HEAD {
            let mut res = plain(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
            res.headers_mut()
                .insert(header::ALLOW, header::HeaderValue::from_static("GET, HEAD"));
            return res;
        }

        match self.index().await {
            Ok(html) => Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
                .body(Body::from(html))
                .unwrap_or_else(|_| plain(StatusCode::INTERNAL_SERVER_ERROR, "response error")),
            Err(err) => error_response(&err),
        }
    }
}

fn plain(status: StatusCode, body: impl Into<Body>) -> Response<Body> {
    let mut res = Response::new(body.into());
    *res.status_mut() = status;
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    res
}

fn error_response(err: &Error) -> Response<Body> {
    match err {
        Error::Template(e) => {
            error!("failed to render page: {e:?}");
            plain(StatusCode::INTERNAL_SERVER_ERROR, "failed to render page")
        }
        _ => {
            if err.is_unreachable() {
                error!("docker daemon unreachable: {err}");
            } else {
                error!("failed to list containers: {err}");
            }
            plain(
                StatusCode::BAD_GATEWAY,
                format!("failed to query docker daemon: {err}"),
            )
        }
    }
}

/// Serve `app` on `addr` until `shutdown` resolves.
pub async fn serve<S, F>(app: App<S>, addr: SocketAddr, shutdown: F) -> Result<()>
where
    S: ContainerSource + Send + Sync + 'static,
    F: Future<Output = ()>,
{
    let app = Arc::new(app);
    let make_svc = make_service_fn(move |_conn| {
        let app = Arc::clone(&app);
        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let app = Arc::clone(&app);
                async move {
                    debug!("{} {}", req.method(), req.uri());
                    Ok::<_, Infallible>(app.handle(req).await)
                }
            }))
        }
    });

    let server = Server::try_bind(&addr)?.serve(make_svc);
    info!("listening on http://{}", server.local_addr());
    server.with_graceful_shutdown(shutdown).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DockerError;
    use crate::projector::{DEFAULT_PORTAINER_PORT, STACK_LABEL};
    use crate::snapshot::{ContainerSnapshot, HostMapping, PortBinding};
    use std::io;

    struct Fixed(Vec<ContainerSnapshot>);

    #[async_trait::async_trait]
    impl ContainerSource for Fixed {
        async fn running_containers(&self) -> Result<Vec<ContainerSnapshot>> {
            Ok(self.0.clone())
        }
    }

    struct Refused;

    #[async_trait::async_trait]
    impl ContainerSource for Refused {
        async fn running_containers(&self) -> Result<Vec<ContainerSnapshot>> {
            Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused").into())
        }
    }

    struct Failing;

    #[async_trait::async_trait]
    impl ContainerSource for Failing {
        async fn running_containers(&self) -> Result<Vec<ContainerSnapshot>> {
            Err(DockerError {
                message: "internal server error".to_owned(),
            }
            .into())
        }
    }

    fn projector() -> Projector {
        Projector::new(Some("203.0.113.5".to_owned()), None, DEFAULT_PORTAINER_PORT)
    }

    fn request(method: Method, path: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_string(res: Response<Body>) -> String {
        let bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn index_lists_containers() {
        let web1 = ContainerSnapshot {
            id: "c1".to_owned(),
            name: "web1".to_owned(),
            labels: [(STACK_LABEL.to_owned(), "blog".to_owned())].into(),
            ports: vec![PortBinding {
                port: 80,
                protocol: "tcp".to_owned(),
                mappings: vec![HostMapping {
                    host_ip: "0.0.0.0".to_owned(),
                    host_port: "8081".to_owned(),
                }],
            }],
            ..Default::default()
        };
        let app = App::new(Fixed(vec![web1]), projector()).unwrap();

        let res = app.handle(request(Method::GET, "/")).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let body = body_string(res).await;
        assert!(body.contains("<td>web1</td>"));
        assert!(body.contains("http:&#x2F;&#x2F;203.0.113.5:8081"));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let app = App::new(Fixed(vec![]), projector()).unwrap();
        let res = app.handle(request(Method::GET, "/api/containers")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn post_is_not_allowed() {
        let app = App::new(Fixed(vec![]), projector()).unwrap();
        let res = app.handle(request(Method::POST, "/")).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()[header::ALLOW], "GET, HEAD");
    }

    #[tokio::test]
    async fn unreachable_daemon_is_bad_gateway() {
        let app = App::new(Refused, projector()).unwrap();
        let res = app.handle(request(Method::GET, "/")).await;
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        assert!(body_string(res).await.contains("connection refused"));
    }

    #[tokio::test]
    async fn daemon_error_is_bad_gateway() {
        let app = App::new(Failing, projector()).unwrap();
        let res = app.handle(request(Method::GET, "/")).await;
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        assert!(body_string(res).await.contains("internal server error"));
    }

    #[tokio::test]
    async fn serves_over_tcp_until_shutdown() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let app = App::new(Fixed(vec![]), projector()).unwrap();
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let handle = tokio::spawn(serve(app, addr, async move {
            rx.await.ok();
        }));
        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
