//! Module type and plugin permission flags mirrored from the Safe{Core} protocol contracts.

pub const MODULE_TYPE_PLUGIN: u8 = 1;
pub const MODULE_TYPE_FUNCTION_HANDLER: u8 = 2;
pub const MODULE_TYPE_HOOKS: u8 = 4;

pub const PLUGIN_PERMISSION_NONE: u8 = 0;
pub const PLUGIN_PERMISSION_EXECUTE_CALL: u8 = 1;
pub const PLUGIN_PERMISSION_CALL_TO_SELF: u8 = 2;
pub const PLUGIN_PERMISSION_EXECUTE_DELEGATECALL: u8 = 4;

/// Artifact names of the contracts the runner deploys.
pub mod contracts {
    pub const SAMPLE_ACCOUNT: &str = "SampleAccount";
    pub const PROTOCOL_MANAGER: &str = "SafeProtocolManager";
    pub const PROTOCOL_REGISTRY: &str = "SafeProtocolRegistry";
    pub const INTENT_PLUGIN: &str = "IntentPlugin";
}
