//! Generic graph-command plumbing: turning targets into a base request,
//! dry-run marking, dispatch and the one-line outcome summary.
//!
//! Command-specific behaviour (see [`crate::duplicate`]) mutates the base
//! request and then hands it to [`process_request`].

use std::collections::BTreeMap;

use crate::error::{DuplicateError, Result};
use crate::format::format_targets;
use crate::request::{DoAll, Duplicate, ErrorResponse, Request, Response, SkipHead};

/// A top-node argument such as `Dataset:50`, `Image:1,2` or `Project:1/Dataset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub type_name: String,
    pub ids: Vec<i64>,
    /// Types to start from below the top-node; non-empty means skip-head.
    pub start_from: Vec<String>,
}

impl Target {
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || DuplicateError::InvalidTarget(value.to_string());

        let mut segments = value.split('/');
        let head = segments.next().unwrap_or_default();
        let (type_name, ids) = head.split_once(':').ok_or_else(invalid)?;
        let type_name = type_name.trim();
        if type_name.is_empty() {
            return Err(invalid());
        }

        let ids = ids
            .split(',')
            .map(|id| id.trim().parse::<i64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>>>()?;

        let start_from = segments
            .map(|segment| {
                let segment = segment.trim();
                if segment.is_empty() {
                    Err(invalid())
                } else {
                    Ok(segment.to_string())
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            type_name: type_name.to_string(),
            ids,
            start_from,
        })
    }

    fn target_objects(&self) -> BTreeMap<String, Vec<i64>> {
        BTreeMap::from([(self.type_name.clone(), self.ids.clone())])
    }

    fn to_request(&self) -> Request {
        if self.start_from.is_empty() {
            return Request::Duplicate(Duplicate {
                target_objects: self.target_objects(),
                ..Default::default()
            });
        }
        Request::SkipHead(SkipHead {
            target_objects: self.target_objects(),
            start_from: self.start_from.clone(),
            request: Box::new(Request::Duplicate(Duplicate::default())),
        })
    }
}

/// One request per target; several targets are batched in a do-all.
pub fn build_request(targets: &[Target]) -> Request {
    let mut requests: Vec<Request> = targets.iter().map(Target::to_request).collect();
    if requests.len() == 1 {
        requests.swap_remove(0)
    } else {
        Request::DoAll(DoAll { requests })
    }
}

/// Sends one request to the server and returns its reply.
pub trait Dispatch {
    fn submit(&self, request: &Request) -> Result<Response>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct Outcome {
    pub response: Response,
    pub summary: String,
}

/// Marks every concrete duplicate request reachable from `request`.
pub fn mark_dry_run(request: &mut Request) {
    match request {
        Request::Duplicate(dup) => dup.dry_run = true,
        Request::SkipHead(skip) => mark_dry_run(&mut skip.request),
        Request::DoAll(all) => all.requests.iter_mut().for_each(mark_dry_run),
        Request::Other(_) => {}
    }
}

/// Fails on the first error reply, or on a reply of a known kind whose
/// body could not be read.
pub fn check_response(response: &Response) -> Result<()> {
    match response {
        Response::Error(err) => Err(server_error(err)),
        Response::DoAll(all) => all.responses.iter().try_for_each(check_response),
        Response::Duplicate(_) => Ok(()),
        Response::Other(_) => match response.unreadable_kind() {
            Some(kind) => Err(DuplicateError::UnreadableReply(kind.to_string())),
            None => Ok(()),
        },
    }
}

/// Short description of what a request targets, e.g. `Project:1/Dataset`.
pub fn describe(request: &Request) -> String {
    match request {
        Request::Duplicate(dup) => format_targets(&dup.target_objects),
        Request::SkipHead(skip) => {
            let mut label = format_targets(&skip.target_objects);
            for start in &skip.start_from {
                label.push('/');
                label.push_str(start);
            }
            label
        }
        Request::DoAll(all) => all
            .requests
            .iter()
            .map(describe)
            .filter(|label| !label.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        Request::Other(_) => String::new(),
    }
}

fn server_error(err: &ErrorResponse) -> DuplicateError {
    let message = if err.parameters.is_empty() {
        err.category.clone()
    } else {
        err.parameters
            .iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(text) => format!("{key}={text}"),
                other => format!("{key}={other}"),
            })
            .collect::<Vec<_>>()
            .join(", ")
    };
    DuplicateError::Server {
        name: err.name.clone(),
        message,
    }
}

/// Standard lifecycle of a graph command once its request is ready.
pub fn process_request(
    command: &str,
    request: &mut Request,
    options: &GraphOptions,
    dispatcher: &dyn Dispatch,
) -> Result<Outcome> {
    if options.dry_run {
        mark_dry_run(request);
    }
    let label = describe(request);
    tracing::debug!(command, target = %label, dry_run = options.dry_run, "submitting request");

    let response = dispatcher.submit(request)?;
    if let Err(err) = check_response(&response) {
        tracing::warn!(command, %err, "server reported failure");
        return Err(err);
    }

    let mut summary = format!("{command} {label} ... ok");
    if options.dry_run {
        summary.push_str(" (dry run)");
    }
    Ok(Outcome { response, summary })
}
