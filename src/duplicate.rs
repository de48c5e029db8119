//! The `duplicate` command: injects class classification into the base
//! request and renders the "Duplicates" section of the detailed report.

use crate::classes::ClassificationSet;
use crate::error::Result;
use crate::format::format_object_ids;
use crate::graph::{self, Dispatch, GraphOptions, Outcome};
use crate::request::{DuplicateResponse, Request, Response};

pub struct DuplicateControl {
    classes: ClassificationSet,
}

impl DuplicateControl {
    pub const COMMAND: &'static str = "Duplicate";

    pub fn new(classes: ClassificationSet) -> Self {
        Self { classes }
    }

    /// Sets the classification on each duplicate request in `request`.
    ///
    /// A do-all is walked one level, and a skip-head child is unwrapped
    /// once. Children that turn out not to be duplicate requests are left
    /// as they are.
    pub fn apply_classification(&self, request: &mut Request) {
        match request {
            Request::DoAll(all) => {
                for child in &mut all.requests {
                    self.apply_to_child(child);
                }
            }
            _ => self.apply_to_child(request),
        }
    }

    fn apply_to_child(&self, child: &mut Request) {
        match child {
            Request::SkipHead(skip) => self.apply_to_concrete(&mut skip.request),
            _ => self.apply_to_concrete(child),
        }
    }

    fn apply_to_concrete(&self, request: &mut Request) {
        let Request::Duplicate(dup) = request else {
            tracing::debug!("skipping non-duplicate request");
            return;
        };
        let classes = &self.classes;
        if !classes.to_duplicate.is_empty() {
            dup.types_to_duplicate = Some(classes.to_duplicate.clone());
        }
        if !classes.to_reference.is_empty() {
            dup.types_to_reference = Some(classes.to_reference.clone());
        }
        if !classes.to_ignore.is_empty() {
            dup.types_to_ignore = Some(classes.to_ignore.clone());
        }
    }

    pub fn process_request(
        &self,
        request: &mut Request,
        options: &GraphOptions,
        dispatcher: &dyn Dispatch,
    ) -> Result<Outcome> {
        self.apply_classification(request);
        graph::process_request(Self::COMMAND, request, options, dispatcher)
    }

    /// Lines of the duplicate-specific report; empty unless `report` is set.
    pub fn detailed_report(&self, response: &Response, report: bool) -> Vec<String> {
        let mut lines = Vec::new();
        if report {
            collect_duplicates(response, &mut lines);
        }
        lines
    }
}

fn collect_duplicates(response: &Response, lines: &mut Vec<String>) {
    match response {
        Response::Duplicate(dup) => lines.extend(duplicate_lines(dup)),
        Response::DoAll(all) => {
            for sub in &all.responses {
                collect_duplicates(sub, lines);
            }
        }
        Response::Error(_) | Response::Other(_) => {}
    }
}

pub fn duplicate_lines(response: &DuplicateResponse) -> Vec<String> {
    if response.duplicates.is_empty() {
        return Vec::new();
    }
    let mut lines = vec!["Duplicates".to_string()];
    for (name, ids) in format_object_ids(&response.duplicates) {
        lines.push(format!("  {name}:{ids}"));
    }
    lines
}
