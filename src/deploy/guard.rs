use crate::buddy::{Branch, Pipeline};
use crate::config::Protected;
use crate::error::{BuddyError, Result};

/// Refuse to deploy a protected pipeline or branch.
///
/// Names are compared exactly; `main` does not protect `Main`.
pub fn ensure_deployable(
    protected: Option<&Protected>,
    pipeline: &Pipeline,
    branch: &Branch,
) -> Result<()> {
    let Some(protected) = protected else {
        return Ok(());
    };

    if protected.pipeline.as_deref() == Some(pipeline.name.as_str()) {
        return Err(BuddyError::ProtectedPipeline(pipeline.name.clone()));
    }
    if protected.branch.as_deref() == Some(branch.name.as_str()) {
        return Err(BuddyError::ProtectedBranch(branch.name.clone()));
    }

    Ok(())
}
