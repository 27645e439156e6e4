use tracing::debug;

use super::handlers;
use super::types::Request;
use crate::ipc::error::err;

pub fn handle_request(req: Request) -> serde_json::Value {
    debug!(method = %req.method, id = %req.id, "dispatch");

    if let Some(resp) = handlers::core::try_handle(&req) {
        return resp;
    }
    if let Some(resp) = handlers::scales::try_handle(&req) {
        return resp;
    }
    if let Some(resp) = handlers::periods::try_handle(&req) {
        return resp;
    }
    if let Some(resp) = handlers::subjects::try_handle(&req) {
        return resp;
    }
    if let Some(resp) = handlers::cfs::try_handle(&req) {
        return resp;
    }
    if let Some(resp) = handlers::curriculum::try_handle(&req) {
        return resp;
    }
    if let Some(resp) = handlers::settings::try_handle(&req) {
        return resp;
    }
    if let Some(resp) = handlers::board::try_handle(&req) {
        return resp;
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}
