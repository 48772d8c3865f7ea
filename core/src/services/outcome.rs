use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::error::ServiceError;

/// Result of one component call.
///
/// `Degraded` is a success whose data is semantically thin (for example silent
/// audio); callers decide whether to continue with it.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceOutcome<T> {
    Ok(T),
    Degraded { data: T, warning: String },
    Failed(ServiceError),
}

impl<T> ServiceOutcome<T> {
    pub fn is_success(&self) -> bool {
        !matches!(self, ServiceOutcome::Failed(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ServiceOutcome::Ok(data) | ServiceOutcome::Degraded { data, .. } => Some(data),
            ServiceOutcome::Failed(_) => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            ServiceOutcome::Ok(data) | ServiceOutcome::Degraded { data, .. } => Some(data),
            ServiceOutcome::Failed(_) => None,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            ServiceOutcome::Degraded { warning, .. } => Some(warning),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ServiceError> {
        match self {
            ServiceOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ServiceOutcome<U> {
        match self {
            ServiceOutcome::Ok(data) => ServiceOutcome::Ok(f(data)),
            ServiceOutcome::Degraded { data, warning } => ServiceOutcome::Degraded {
                data: f(data),
                warning,
            },
            ServiceOutcome::Failed(err) => ServiceOutcome::Failed(err),
        }
    }
}

impl<T> From<Result<T, ServiceError>> for ServiceOutcome<T> {
    fn from(result: Result<T, ServiceError>) -> Self {
        match result {
            Ok(data) => ServiceOutcome::Ok(data),
            Err(err) => ServiceOutcome::Failed(err),
        }
    }
}

/// Serialises as the `{success, data, warning?, error?}` envelope callers expect.
impl<T: Serialize> Serialize for ServiceOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ServiceOutcome", 4)?;
        state.serialize_field("success", &self.is_success())?;
        state.serialize_field("data", &self.data())?;
        match self {
            ServiceOutcome::Ok(_) => {}
            ServiceOutcome::Degraded { warning, .. } => {
                state.serialize_field("warning", warning)?;
            }
            ServiceOutcome::Failed(err) => {
                state.serialize_field("error", &err.to_string())?;
                state.serialize_field("errorKind", &err.kind())?;
            }
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_shapes() {
        let ok: ServiceOutcome<String> = ServiceOutcome::Ok("namaste".into());
        assert_eq!(
            serde_json::to_value(&ok).expect("serialise"),
            json!({"success": true, "data": "namaste"})
        );

        let degraded: ServiceOutcome<String> = ServiceOutcome::Degraded {
            data: String::new(),
            warning: "No speech recognized".into(),
        };
        assert_eq!(
            serde_json::to_value(&degraded).expect("serialise"),
            json!({"success": true, "data": "", "warning": "No speech recognized"})
        );

        let failed: ServiceOutcome<String> =
            ServiceOutcome::Failed(ServiceError::Configuration("translation suite"));
        assert_eq!(
            serde_json::to_value(&failed).expect("serialise"),
            json!({
                "success": false,
                "data": null,
                "error": "translation suite is not configured",
                "errorKind": "configuration"
            })
        );
    }

    #[test]
    fn map_keeps_warning() {
        let degraded: ServiceOutcome<&str> = ServiceOutcome::Degraded {
            data: "",
            warning: "thin".into(),
        };
        let mapped = degraded.map(str::len);
        assert_eq!(mapped.warning(), Some("thin"));
        assert_eq!(mapped.data(), Some(&0));
    }
}
