//! Local `.smia` script loading.

use std::path::Path;

use shared::error::ClientError;

pub const SCRIPT_EXTENSION: &str = "smia";

/// Read a script file into a command buffer. Files without the `.smia`
/// extension are rejected before any read is attempted; no further
/// validation of the content occurs.
pub fn load_script(path: &Path) -> Result<String, ClientError> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(SCRIPT_EXTENSION) {
        return Err(ClientError::UnsupportedFile);
    }
    std::fs::read_to_string(path).map_err(|err| {
        ClientError::ScriptRead(format!("no se pudo leer '{}': {err}", path.display()))
    })
}
