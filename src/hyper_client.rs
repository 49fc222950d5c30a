use crate::errors::Error as DvError;
use crate::http_client::HttpClient;
use http::{HeaderMap, Request, Response};
use hyper::Uri;
use std::str::FromStr;

#[derive(Clone, Debug)]
enum Client {
    Tcp(hyper::Client<hyper::client::HttpConnector>),
    #[cfg(unix)]
    Unix(hyper::Client<hyperlocal::UnixConnector>),
}

impl Client {
    fn request(&self, req: Request<hyper::Body>) -> hyper::client::ResponseFuture {
        match self {
            Client::Tcp(client) => client.request(req),
            #[cfg(unix)]
            Client::Unix(client) => client.request(req),
        }
    }
}

/// Http client using hyper
#[derive(Debug, Clone)]
pub struct HyperClient {
    /// http client
    client: Client,
    /// base connection address
    base: Uri,
}

fn join_uri(uri: &Uri, path: &str) -> Result<Uri, DvError> {
    let base = uri.to_string();
    let joined = format!("{}{path}", base.trim_end_matches('/'));
    Uri::from_str(&joined).map_err(|err| DvError::InvalidUri {
        var: joined,
        source: err,
    })
}

fn request_builder(method: &http::Method, uri: &Uri, headers: &HeaderMap) -> http::request::Builder {
    let mut request = Request::builder().method(method).uri(uri);
    for (name, value) in headers.iter() {
        request = request.header(name, value);
    }
    request
}

async fn fetch_body(resp: Response<hyper::Body>) -> Result<Response<Vec<u8>>, DvError> {
    let (p, b) = resp.into_parts();
    let b = hyper::body::to_bytes(b).await?.to_vec();
    Ok(Response::from_parts(p, b))
}

impl HyperClient {
    fn new(client: Client, base: Uri) -> Self {
        Self { client, base }
    }

    /// path to unix socket
    #[cfg(unix)]
    pub fn connect_with_unix(path: &str) -> Self {
        let url = hyperlocal::Uri::new(path, "").into();
        // Prevent from using connection pooling.
        // See https://github.com/hyperium/hyper/issues/2312.
        let client: hyper::Client<_> = hyper::Client::builder()
            .pool_idle_timeout(std::time::Duration::from_millis(0))
            .pool_max_idle_per_host(0)
            .build(hyperlocal::UnixConnector);
        Self::new(Client::Unix(client), url)
    }

    pub fn connect_with_http(addr: &str) -> Result<Self, DvError> {
        // docker-machine style addresses: tcp://host:port
        let addr_http = addr.replacen("tcp://", "http://", 1);
        let url = Uri::from_str(&addr_http).map_err(|err| DvError::InvalidUri {
            var: addr_http,
            source: err,
        })?;
        Ok(Self::new(Client::Tcp(hyper::Client::new()), url))
    }
}

#[async_trait::async_trait]
impl HttpClient for HyperClient {
    type Err = DvError;

    async fn get(&self, headers: &HeaderMap, path: &str) -> Result<Response<Vec<u8>>, Self::Err> {
        let url = join_uri(&self.base, path)?;
        log::debug!("GET {url}");
        let request = request_builder(&http::Method::GET, &url, headers).body(hyper::Body::empty())?;
        let res = self.client.request(request).await?;
        fetch_body(res).await
    }
}
