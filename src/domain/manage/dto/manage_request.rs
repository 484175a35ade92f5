use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::core::client::deployments::DeploymentRef;
use crate::domain::manage::errors::ManageError;

pub const DEFAULT_NAMESPACE: &str = "default";

/// Replica count used by `scale` when the caller sends none.
pub const DEFAULT_REPLICAS: i32 = 1;

const DNS_LABEL_MAX_LEN: usize = 63;
const DNS_SUBDOMAIN_MAX_LEN: usize = 253;

const BINARY_SI_SUFFIXES: &[&str] = &["Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];
const DECIMAL_SI_SUFFIXES: &[&str] = &["n", "u", "m", "", "k", "M", "G", "T", "P", "E"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageAction {
    Scale,
    Restart,
    Status,
    UpdateResources,
}

impl ManageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManageAction::Scale => "scale",
            ManageAction::Restart => "restart",
            ManageAction::Status => "status",
            ManageAction::UpdateResources => "update_resources",
        }
    }
}

impl fmt::Display for ManageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManageAction {
    type Err = ManageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scale" => Ok(ManageAction::Scale),
            "restart" => Ok(ManageAction::Restart),
            "status" => Ok(ManageAction::Status),
            "update_resources" => Ok(ManageAction::UpdateResources),
            other => Err(ManageError::Validation(format!(
                "Action '{other}' not supported."
            ))),
        }
    }
}

/// Body of `POST /manage` as received from the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ManageRequest {
    /// One of `scale`, `restart`, `status`, `update_resources`.
    pub action: String,

    /// Deployment name: an RFC 1123 DNS subdomain.
    #[validate(custom(function = "validate_dns_subdomain"))]
    pub deployment: String,

    /// Namespace name: an RFC 1123 DNS label.
    #[serde(default = "default_namespace")]
    #[validate(custom(function = "validate_dns_label"))]
    pub namespace: String,

    /// Used by `scale`; defaults to [`DEFAULT_REPLICAS`].
    #[serde(default)]
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub replicas: Option<i32>,

    /// Used by `update_resources`, e.g. `256Mi` or `1Gi`.
    #[serde(default)]
    #[validate(custom(function = "validate_quantity"))]
    pub memory_limit: Option<String>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// A request that passed validation, carrying only what its action needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageCommand {
    Scale { target: DeploymentRef, replicas: i32 },
    Restart { target: DeploymentRef },
    Status { target: DeploymentRef },
    UpdateResources { target: DeploymentRef, memory_limit: String },
}

impl ManageCommand {
    pub fn action(&self) -> ManageAction {
        match self {
            ManageCommand::Scale { .. } => ManageAction::Scale,
            ManageCommand::Restart { .. } => ManageAction::Restart,
            ManageCommand::Status { .. } => ManageAction::Status,
            ManageCommand::UpdateResources { .. } => ManageAction::UpdateResources,
        }
    }

    pub fn target(&self) -> &DeploymentRef {
        match self {
            ManageCommand::Scale { target, .. }
            | ManageCommand::Restart { target }
            | ManageCommand::Status { target }
            | ManageCommand::UpdateResources { target, .. } => target,
        }
    }
}

impl ManageRequest {
    /// Checks the action and its required fields and produces a [`ManageCommand`].
    ///
    /// Fields the action does not use are ignored.
    pub fn into_command(mut self) -> Result<ManageCommand, ManageError> {
        let action: ManageAction = self.action.parse()?;

        match action {
            ManageAction::Scale => self.memory_limit = None,
            ManageAction::UpdateResources => {
                self.replicas = None;
                if self.memory_limit.as_deref().map_or(true, |m| m.trim().is_empty()) {
                    return Err(ManageError::Validation(
                        "memory_limit is required for this action".to_string(),
                    ));
                }
            }
            ManageAction::Restart | ManageAction::Status => {
                self.replicas = None;
                self.memory_limit = None;
            }
        }

        self.validate()
            .map_err(|errs| ManageError::Validation(describe(&errs)))?;

        let target = DeploymentRef::new(self.deployment, self.namespace);
        let command = match action {
            ManageAction::Scale => ManageCommand::Scale {
                target,
                replicas: self.replicas.unwrap_or(DEFAULT_REPLICAS),
            },
            ManageAction::Restart => ManageCommand::Restart { target },
            ManageAction::Status => ManageCommand::Status { target },
            ManageAction::UpdateResources => ManageCommand::UpdateResources {
                target,
                memory_limit: self.memory_limit.unwrap_or_default().trim().to_string(),
            },
        };
        Ok(command)
    }
}

/// Flattens validator output into one stable, human-readable line.
fn describe(errs: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errs
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                let reason = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{field}: {reason}")
            })
        })
        .collect();
    parts.sort();
    format!("Invalid request: {}", parts.join("; "))
}

fn name_error(value: &str, kind: &'static str) -> ValidationError {
    let mut err = ValidationError::new(kind);
    err.message = Some(if value.is_empty() {
        "must not be empty".into()
    } else {
        format!("'{value}' is not a valid {kind}").into()
    });
    err
}

/// Lowercase alphanumerics and `-`, starting and ending with an alphanumeric, at most 63 chars.
fn is_dns_label(raw: &str) -> bool {
    let alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    !raw.is_empty()
        && raw.len() <= DNS_LABEL_MAX_LEN
        && raw.chars().all(|c| alnum(c) || c == '-')
        && raw.starts_with(alnum)
        && raw.ends_with(alnum)
}

/// Dot-separated DNS labels, at most 253 chars in total.
fn is_dns_subdomain(raw: &str) -> bool {
    !raw.is_empty() && raw.len() <= DNS_SUBDOMAIN_MAX_LEN && raw.split('.').all(is_dns_label)
}

/// Names end up in the request path unescaped, so `/`, `?` and friends must never get through.
fn validate_dns_subdomain(value: &str) -> Result<(), ValidationError> {
    if is_dns_subdomain(value) {
        Ok(())
    } else {
        Err(name_error(value, "DNS subdomain name"))
    }
}

fn validate_dns_label(value: &str) -> Result<(), ValidationError> {
    if is_dns_label(value) {
        Ok(())
    } else {
        Err(name_error(value, "DNS label name"))
    }
}

/// Accepts Kubernetes resource quantities such as `512Mi`, `1Gi`, `1.5G`, `128974848` or `129e6`.
fn validate_quantity(value: &str) -> Result<(), ValidationError> {
    if is_quantity(value.trim()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("quantity");
        err.message = Some(format!("'{value}' is not a valid resource quantity").into());
        Err(err)
    }
}

fn is_quantity(raw: &str) -> bool {
    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(raw.len());
    let (number, suffix) = raw.split_at(split);

    let number_ok = number.chars().any(|c| c.is_ascii_digit())
        && number.matches('.').count() <= 1;
    if !number_ok {
        return false;
    }

    if BINARY_SI_SUFFIXES.contains(&suffix) || DECIMAL_SI_SUFFIXES.contains(&suffix) {
        return true;
    }

    // Decimal exponent: e3, E-2, e+6
    match suffix.strip_prefix(['e', 'E']) {
        Some(exp) => {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
