//! Blocking HTTP transport for the rollup node API.

use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use rollup_config::NodeEndpoint;

use crate::process::ShutdownFlag;
use crate::protocol::{Advance, DecodeError, Inspect, Notice, RequestKind, Verdict, Voucher};

use super::wire::{self, FinishBody, FinishResponse, NoticeBody, OutputIndex, VoucherBody};
use super::{RollupTransport, TRANSPORT_TARGET, TransportError};

const FINISH_ROUTE: &str = "finish";
const VOUCHER_ROUTE: &str = "voucher";
const NOTICE_ROUTE: &str = "notice";

/// Settings used to construct an [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportOptions {
    /// Base URL of the node.
    pub endpoint: NodeEndpoint,
    /// Timeout applied to each HTTP call.
    pub timeout: Duration,
    /// Pause before re-posting `finish` while the node has no request.
    pub idle_backoff: Duration,
    /// Flag checked between idle retries.
    pub shutdown: ShutdownFlag,
}

/// Request data received from the last `finish` call and not yet read.
#[derive(Debug)]
struct PendingRequest {
    kind: RequestKind,
    data: Value,
}

/// [`RollupTransport`] backed by the node's HTTP/JSON API.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint: NodeEndpoint,
    idle_backoff: Duration,
    shutdown: ShutdownFlag,
    pending: Option<PendingRequest>,
}

impl HttpTransport {
    /// Builds the HTTP client. No network traffic happens until the first
    /// negotiation call.
    pub fn connect(options: HttpTransportOptions) -> Result<Self, TransportError> {
        let HttpTransportOptions {
            endpoint,
            timeout,
            idle_backoff,
            shutdown,
        } = options;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::Client { source })?;
        Ok(Self {
            client,
            endpoint,
            idle_backoff,
            shutdown,
            pending: None,
        })
    }

    /// Base URL of the node this transport talks to.
    #[must_use]
    pub fn endpoint(&self) -> &NodeEndpoint {
        &self.endpoint
    }

    fn url(&self, route: &'static str) -> Result<Url, TransportError> {
        self.endpoint
            .join(route)
            .map_err(|source| TransportError::Route { route, source })
    }

    fn post<B: Serialize>(&self, route: &'static str, body: &B) -> Result<Response, TransportError> {
        let url = self.url(route)?;
        self.client
            .post(url)
            .json(body)
            .send()
            .map_err(|source| TransportError::Request { route, source })
    }

    fn read_body(route: &'static str, response: Response) -> Result<String, TransportError> {
        response
            .text()
            .map_err(|source| TransportError::Request { route, source })
    }

    fn unexpected_status(route: &'static str, response: Response) -> TransportError {
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        TransportError::Status {
            route,
            status,
            body,
        }
    }

    fn emit<B: Serialize>(&self, route: &'static str, body: &B) -> Result<(), TransportError> {
        let response = self.post(route, body)?;
        if !response.status().is_success() {
            return Err(Self::unexpected_status(route, response));
        }
        let text = Self::read_body(route, response)?;
        match serde_json::from_str::<OutputIndex>(&text) {
            Ok(ack) => debug!(target: TRANSPORT_TARGET, route, index = ack.index, "output accepted"),
            Err(_) => debug!(target: TRANSPORT_TARGET, route, "output accepted without index"),
        }
        Ok(())
    }

    fn take_pending(&mut self, expected: RequestKind) -> Result<Value, DecodeError> {
        let pending = self.pending.take().ok_or(DecodeError::NoPendingRequest)?;
        if pending.kind != expected {
            return Err(DecodeError::KindMismatch {
                expected,
                actual: pending.kind,
            });
        }
        Ok(pending.data)
    }
}

impl RollupTransport for HttpTransport {
    fn finish(&mut self, verdict: Verdict) -> Result<RequestKind, TransportError> {
        self.pending = None;
        let body = FinishBody::new(verdict);
        loop {
            let response = self.post(FINISH_ROUTE, &body)?;
            match response.status() {
                StatusCode::OK => {
                    let text = Self::read_body(FINISH_ROUTE, response)?;
                    let parsed: FinishResponse =
                        serde_json::from_str(&text).map_err(|source| TransportError::Response {
                            route: FINISH_ROUTE,
                            source,
                        })?;
                    let kind = wire::classify(&parsed.request_type)?;
                    self.pending = Some(PendingRequest {
                        kind,
                        data: parsed.data,
                    });
                    return Ok(kind);
                }
                StatusCode::ACCEPTED => {
                    debug!(target: TRANSPORT_TARGET, "no pending request; retrying finish");
                    thread::sleep(self.idle_backoff);
                    if self.shutdown.is_requested() {
                        return Err(TransportError::Interrupted);
                    }
                }
                _ => return Err(Self::unexpected_status(FINISH_ROUTE, response)),
            }
        }
    }

    fn read_advance(&mut self) -> Result<Advance, DecodeError> {
        let data = self.take_pending(RequestKind::Advance)?;
        wire::decode_advance(data)
    }

    fn read_inspect(&mut self) -> Result<Inspect, DecodeError> {
        let data = self.take_pending(RequestKind::Inspect)?;
        wire::decode_inspect(data)
    }

    fn emit_voucher(&mut self, voucher: &Voucher) -> Result<(), TransportError> {
        self.emit(VOUCHER_ROUTE, &VoucherBody::from(voucher))
    }

    fn emit_notice(&mut self, notice: &Notice) -> Result<(), TransportError> {
        self.emit(NOTICE_ROUTE, &NoticeBody::from(notice))
    }
}
