use hirematch_types::{Principal, Role};

use crate::error::{EngineError, Result};

pub fn authenticated(caller: Option<&Principal>) -> Result<&Principal> {
    caller.ok_or(EngineError::NotAuthenticated)
}

/// Checks the caller exists and holds `role`; `denial` is the Forbidden message.
pub fn require_role<'a>(
    caller: Option<&'a Principal>,
    role: Role,
    denial: &str,
) -> Result<&'a Principal> {
    let principal = authenticated(caller)?;
    if principal.role != role {
        return Err(EngineError::Forbidden(denial.to_string()));
    }
    Ok(principal)
}
