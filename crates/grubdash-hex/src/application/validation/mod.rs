//! Ordered validation chains.
//!
//! A chain is a list of plain functions run strictly in declaration order.
//! Each step looks at the incoming [`Request`] and either returns `Ok(())`,
//! possibly recording a derived value in the per-request locals, or halts
//! with an [`AppError`]. The first halt stops the chain; later steps and the
//! handler never run.
//!
//! Steps always read the fields they check from the request body. Locals are
//! written for the handler's benefit only and are never consulted by a later
//! step.

use serde_json::Value;

use crate::errors::AppError;

pub mod dish;
pub mod order;

/// Everything a step may inspect.
pub struct Request<'a, T> {
    /// Path identifier (`/dishes/{id}`), when the route has one.
    pub route_id: Option<&'a str>,
    /// Record the route id resolved to before the chain started.
    pub found: Option<&'a T>,
    body: &'a Value,
}

impl<'a, T> Request<'a, T> {
    pub fn new(route_id: Option<&'a str>, body: &'a Value, found: Option<&'a T>) -> Self {
        Self {
            route_id,
            found,
            body,
        }
    }

    /// A field of the `data` object. `None` when the body, `data`, or the
    /// field itself is missing.
    pub fn field(&self, name: &str) -> Option<&'a Value> {
        self.body.get("data")?.get(name)
    }
}

pub type Step<T, L> = fn(&Request<'_, T>, &mut L) -> Result<(), AppError>;

pub struct Chain<T, L> {
    name: &'static str,
    steps: Vec<(&'static str, Step<T, L>)>,
}

impl<T, L> Chain<T, L> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, label: &'static str, step: Step<T, L>) -> Self {
        self.steps.push((label, step));
        self
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.steps.iter().map(|(label, _)| *label).collect()
    }

    pub fn run(&self, request: &Request<'_, T>, locals: &mut L) -> Result<(), AppError> {
        for (label, step) in &self.steps {
            if let Err(err) = step(request, locals) {
                tracing::debug!(chain = self.name, step = *label, error = %err, "validation halted");
                return Err(err);
            }
        }
        Ok(())
    }
}

fn missing(field: &str) -> AppError {
    AppError::Validation(format!("A '{field}' property is required."))
}

/// Missing, `null` and `""` all count as absent.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

pub(crate) fn required_value<'a, T>(
    request: &Request<'a, T>,
    field: &str,
) -> Result<&'a Value, AppError> {
    let value = request.field(field);
    match value {
        Some(v) if !is_blank(value) => Ok(v),
        _ => Err(missing(field)),
    }
}

pub(crate) fn required_text<T>(request: &Request<'_, T>, field: &str) -> Result<String, AppError> {
    match request.field(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(missing(field)),
    }
}

/// The record resolved from the route id, or a 404 naming `kind`.
pub(crate) fn located<'a, T>(request: &Request<'a, T>, kind: &str) -> Result<&'a T, AppError> {
    request.found.ok_or_else(|| {
        AppError::NotFound(format!(
            "{kind} id not found: {}",
            request.route_id.unwrap_or_default()
        ))
    })
}

/// A body `id` is optional, but when given it must equal the route id.
pub(crate) fn body_id_matches_route<T>(
    request: &Request<'_, T>,
    param: &str,
) -> Result<(), AppError> {
    let id = request.field("id");
    if is_blank(id) {
        return Ok(());
    }
    match (id, request.route_id) {
        (Some(Value::String(s)), Some(route)) if s == route => Ok(()),
        (Some(Value::String(s)), _) => Err(AppError::Validation(format!(
            "id {s} must match {param} provided in parameters"
        ))),
        (Some(other), _) => Err(AppError::Validation(format!(
            "id {other} must match {param} provided in parameters"
        ))),
        (None, _) => Ok(()),
    }
}
