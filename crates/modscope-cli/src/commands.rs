//! Subcommand handlers
//!
//! Each handler returns the text to print so it can be checked without a
//! process boundary.

use anyhow::Result;
use modscope_core::{ActionOutcome, Caller, ModerationService};
use modscope_types::{EntityId, ScopePayload, UserId};

/// Identity used for admin operations issued from the command line
pub(crate) const OPERATOR: &str = "modscope-cli";

pub(crate) fn operator() -> Caller {
    Caller::admin(OPERATOR)
}

pub(crate) async fn check(
    service: &ModerationService,
    moderator: &UserId,
    entity: &EntityId,
) -> String {
    let decision = service.explain(moderator, entity).await;
    let verdict = if decision.allowed { "allow" } else { "deny" };
    format!("{verdict} ({})", decision.reason)
}

pub(crate) async fn describe(service: &ModerationService, moderator: &UserId) -> Result<String> {
    let info = service.get_scope_info(&operator(), moderator).await?;
    Ok(info.description.unwrap_or_else(|| "no scope".to_string()))
}

pub(crate) async fn list(service: &ModerationService) -> Result<String> {
    let directory = service.scope_directory(&operator()).await?;
    if directory.is_empty() {
        return Ok("no scopes assigned".to_string());
    }

    let lines: Vec<String> = directory
        .into_iter()
        .map(|s| format!("{}\t{}\t{}", s.moderator_id, s.scope_type, s.description))
        .collect();
    Ok(lines.join("\n"))
}

/// Apply a scope and report the outcome as JSON
///
/// Rejections are part of the output, not an error of the command.
pub(crate) async fn assign(
    service: &ModerationService,
    moderator: &UserId,
    payload: &ScopePayload,
    promote: bool,
) -> Result<String> {
    let caller = operator();
    let result = if promote {
        service.promote_with_scope(&caller, moderator, payload).await
    } else {
        service.assign_scope(&caller, moderator, payload).await
    };

    if let Err(err) = &result {
        tracing::warn!(moderator = %moderator, error = %err, "assignment rejected");
    }
    Ok(serde_json::to_string(&ActionOutcome::from_result(&result))?)
}
