//! Preference management tool definition.
//!
//! Export, import and prune the preference history. Paths go through the
//! same security checks as every other filesystem access.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::core::ServerContext;
use crate::core::security::{validate_existing_path, validate_output_path};
use crate::domains::tools::definitions::common::{
    error_result, non_blank, parse_arguments, structured_result,
};

const DEFAULT_RETENTION_DAYS: u32 = 90;

fn default_merge() -> bool {
    true
}

/// Management operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceAction {
    /// Write all preferences to `path`.
    Export,
    /// Load preferences from `path`.
    Import,
    /// Remove preferences older than `days`.
    ClearOld,
}

/// Parameters for the preference management tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ManagePreferencesParams {
    /// "export", "import" or "clear_old".
    pub action: PreferenceAction,

    /// File to export to or import from.
    #[serde(default)]
    pub path: Option<String>,

    /// On import, append to the existing history instead of replacing it.
    #[serde(default = "default_merge")]
    pub merge: bool,

    /// On clear_old, keep preferences from the last N days (default 90).
    #[serde(default)]
    pub days: Option<u32>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ManagePreferencesOutput {
    pub success: bool,
    pub action: PreferenceAction,
    /// Records written, read or removed.
    pub affected: usize,
    pub total_preferences: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Preference management tool.
pub struct ManagePreferencesTool;

impl ManagePreferencesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "manage_preferences";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Manage the preference history: 'export' writes it to a JSON file, 'import' loads a JSON file (merging by default), 'clear_old' removes entries older than the given number of days.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(action = ?params.action))]
    pub async fn execute(params: &ManagePreferencesParams, ctx: &ServerContext) -> CallToolResult {
        match params.action {
            PreferenceAction::Export => Self::export(params, ctx).await,
            PreferenceAction::Import => Self::import(params, ctx).await,
            PreferenceAction::ClearOld => Self::clear_old(params, ctx).await,
        }
    }

    async fn export(params: &ManagePreferencesParams, ctx: &ServerContext) -> CallToolResult {
        let Some(raw) = non_blank(&params.path) else {
            return error_result("The export action requires a 'path'");
        };
        let path = match validate_output_path(raw, &ctx.config.security) {
            Ok(path) => path,
            Err(e) => return error_result(format!("Path security validation failed: {}", e)),
        };

        let store = ctx.preferences.lock().await;
        let exported = match store.export_preferences(&path) {
            Ok(n) => n,
            Err(e) => return error_result(e.to_string()),
        };
        let total_preferences = store.len();
        drop(store);

        info!("Exported {} preferences to {}", exported, path.display());
        let output = ManagePreferencesOutput {
            success: true,
            action: params.action,
            affected: exported,
            total_preferences,
            path: Some(path.display().to_string()),
            warning: None,
        };
        structured_result(
            format!("Exported {} preferences to {}", exported, path.display()),
            &output,
        )
    }

    async fn import(params: &ManagePreferencesParams, ctx: &ServerContext) -> CallToolResult {
        let Some(raw) = non_blank(&params.path) else {
            return error_result("The import action requires a 'path'");
        };
        let path = match validate_existing_path(raw, &ctx.config.security) {
            Ok(path) => path,
            Err(e) => return error_result(format!("Path security validation failed: {}", e)),
        };

        let mut store = ctx.preferences.lock().await;
        let report = match store.import_preferences(&path, params.merge) {
            Ok(report) => report,
            Err(e) => return error_result(e.to_string()),
        };
        let total_preferences = store.len();
        drop(store);

        let output = ManagePreferencesOutput {
            success: true,
            action: params.action,
            affected: report.imported,
            total_preferences,
            path: Some(path.display().to_string()),
            warning: report.status.warning(),
        };
        structured_result(
            format!(
                "Imported {} preferences ({} total)",
                report.imported, total_preferences
            ),
            &output,
        )
    }

    async fn clear_old(params: &ManagePreferencesParams, ctx: &ServerContext) -> CallToolResult {
        let days = params.days.unwrap_or(DEFAULT_RETENTION_DAYS);

        let mut store = ctx.preferences.lock().await;
        let report = store.clear_old_preferences(days);
        let total_preferences = store.len();
        drop(store);

        let output = ManagePreferencesOutput {
            success: true,
            action: params.action,
            affected: report.removed,
            total_preferences,
            path: None,
            warning: report.status.warning(),
        };
        structured_result(
            format!(
                "Removed {} preferences older than {} days",
                report.removed, days
            ),
            &output,
        )
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: Arc<ServerContext>,
    ) -> Result<serde_json::Value, String> {
        use crate::domains::tools::definitions::common::{parse_http_arguments, to_http_value};

        let params: ManagePreferencesParams = parse_http_arguments(arguments)?;
        info!("Manage preferences tool (HTTP) called: {:?}", params.action);
        to_http_value(&Self::execute(&params, &ctx).await)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<ManagePreferencesParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<ManagePreferencesOutput>().into()),
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(ctx: Arc<ServerContext>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |call: ToolCallContext<'_, S>| {
            let args = call.arguments.clone();
            let ctx = ctx.clone();
            async move {
                let params: ManagePreferencesParams = parse_arguments(args)?;
                Ok(Self::execute(&params, &ctx).await)
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::preferences::PreferenceTags;
    use crate::domains::tools::definitions::testing::{FakeComposer, test_context};
    use serde_json::json;

    fn params(value: serde_json::Value) -> ManagePreferencesParams {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_export_then_import_replace_and_merge() {
        let (dir, ctx) = test_context(Arc::new(FakeComposer::succeeding()));
        {
            let mut store = ctx.preferences.lock().await;
            let _ = store.record_preference("one", true, PreferenceTags::default());
            let _ = store.record_preference("two", false, PreferenceTags::default());
        }
        let export_path = dir.path().join("backup.json");

        let output = ManagePreferencesTool::execute(
            &params(json!({ "action": "export", "path": export_path.to_str().unwrap() })),
            &ctx,
        )
        .await
        .structured_content
        .unwrap();
        assert_eq!(output["affected"], 2);
        assert!(export_path.exists());

        let output = ManagePreferencesTool::execute(
            &params(json!({ "action": "import", "path": export_path.to_str().unwrap() })),
            &ctx,
        )
        .await
        .structured_content
        .unwrap();
        assert_eq!(output["affected"], 2);
        assert_eq!(output["total_preferences"], 4);

        let output = ManagePreferencesTool::execute(
            &params(json!({ "action": "import", "path": export_path.to_str().unwrap(), "merge": false })),
            &ctx,
        )
        .await
        .structured_content
        .unwrap();
        assert_eq!(output["total_preferences"], 2);
    }

    #[tokio::test]
    async fn test_missing_path_and_missing_file() {
        let (dir, ctx) = test_context(Arc::new(FakeComposer::succeeding()));

        let result = ManagePreferencesTool::execute(&params(json!({ "action": "export" })), &ctx).await;
        assert_eq!(result.is_error, Some(true));

        let missing = dir.path().join("nope.json");
        let result = ManagePreferencesTool::execute(
            &params(json!({ "action": "import", "path": missing.to_str().unwrap() })),
            &ctx,
        )
        .await;
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_export_outside_root_refused() {
        let dir = tempfile::TempDir::new().unwrap();
        let outside = tempfile::TempDir::new().unwrap();
        let mut config = crate::domains::tools::definitions::testing::temp_config(&dir);
        config.security.root_path = Some(dir.path().to_path_buf());
        let ctx = ServerContext::with_composer(config, Arc::new(FakeComposer::succeeding()));

        let target = outside.path().join("leak.json");
        let result = ManagePreferencesTool::execute(
            &params(json!({ "action": "export", "path": target.to_str().unwrap() })),
            &ctx,
        )
        .await;
        assert_eq!(result.is_error, Some(true));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_clear_old_keeps_recent() {
        let (_dir, ctx) = test_context(Arc::new(FakeComposer::succeeding()));
        {
            let mut store = ctx.preferences.lock().await;
            let _ = store.record_preference("fresh", true, PreferenceTags::default());
        }
        let output = ManagePreferencesTool::execute(&params(json!({ "action": "clear_old", "days": 30 })), &ctx)
            .await
            .structured_content
            .unwrap();
        assert_eq!(output["affected"], 0);
        assert_eq!(output["total_preferences"], 1);
    }

    #[test]
    fn test_unknown_action_is_invalid_params() {
        let mut args = rmcp::model::JsonObject::new();
        args.insert("action".to_string(), json!("delete_everything"));
        assert!(parse_arguments::<ManagePreferencesParams>(Some(args)).is_err());
    }
}
