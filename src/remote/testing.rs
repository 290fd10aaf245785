//! Scripted transport for unit tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::{json, Value};

use super::{RawResponse, Transport};
use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Answers from a queue; the last answer repeats once the queue runs dry.
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RawResponse>>>,
    last: Mutex<Option<Result<RawResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<RawResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    fn answer(&self, request: RecordedRequest) -> Result<RawResponse> {
        self.requests.lock().push(request);
        let next = self.script.lock().pop_front();
        match next {
            Some(answer) => {
                *self.last.lock() = Some(answer.clone());
                answer
            }
            None => self.last.lock().clone().unwrap_or_else(|| {
                Err(DashboardError::Internal("transport script is empty".into()))
            }),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<RawResponse> {
        self.answer(RecordedRequest {
            method: Method::GET,
            path: path.to_string(),
            query: query.to_vec(),
            body: None,
        })
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<RawResponse> {
        self.answer(RecordedRequest {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: body.cloned(),
        })
    }
}

// == Canned Responses ==
pub(crate) fn ok_page(list: Value, last_page: u32) -> Result<RawResponse> {
    let count = list.as_array().map(Vec::len).unwrap_or(0);
    Ok(RawResponse::new(
        200,
        json!({
            "success": true,
            "message": "",
            "data": {
                "list": list,
                "meta": {
                    "current_page": 1,
                    "last_page": last_page,
                    "total_items": count,
                    "pagesize": 10
                }
            }
        })
        .to_string(),
    ))
}

pub(crate) fn ok_message(message: &str) -> Result<RawResponse> {
    Ok(RawResponse::new(
        200,
        json!({"success": true, "message": message, "data": null}).to_string(),
    ))
}

pub(crate) fn status(code: u16, message: &str) -> Result<RawResponse> {
    Ok(RawResponse::new(code, json!({"message": message}).to_string()))
}
