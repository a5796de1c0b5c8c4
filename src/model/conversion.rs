use super::integration::IntegrationPatch;
use crate::error::ImportError;

/// A trait for external payloads that can be brought into the editor.
///
/// This is the import boundary. Any identifiers carried by the payload are thrown
/// away and recomputed once the patch is applied, so implementors only need to get
/// the shape of the tree right.
///
/// # Example
///
/// ```rust,no_run
/// use kumitate::prelude::*;
/// use std::result::Result;
///
/// struct Pipeline { stages: Vec<String> }
///
/// impl IntoIntegration for Pipeline {
///     fn into_integration(self) -> Result<IntegrationPatch, ImportError> {
///         let steps = self.stages.into_iter().map(Step::transform).collect();
///         Ok(IntegrationPatch::with_steps(steps))
///     }
/// }
/// ```
pub trait IntoIntegration {
    fn into_integration(self) -> Result<IntegrationPatch, ImportError>;
}

impl IntoIntegration for IntegrationPatch {
    fn into_integration(self) -> Result<IntegrationPatch, ImportError> {
        Ok(self)
    }
}

impl IntoIntegration for &str {
    fn into_integration(self) -> Result<IntegrationPatch, ImportError> {
        serde_json::from_str(self).map_err(|e| ImportError::JsonParseError(e.to_string()))
    }
}

impl IntoIntegration for serde_json::Value {
    fn into_integration(self) -> Result<IntegrationPatch, ImportError> {
        serde_json::from_value(self).map_err(|e| ImportError::JsonParseError(e.to_string()))
    }
}
