//! CLI commands for GUID conversion

use crate::guid::to_companion_format;
use crate::resolve::path_hash_guid;

/// Print the companion-metadata form of a hex GUID
pub fn companion(hex: &str) -> anyhow::Result<()> {
    println!("{}", to_companion_format(hex.trim())?);
    Ok(())
}

/// Print the path-hash GUID of a resource path, in both forms
pub fn hash(path: &str) -> anyhow::Result<()> {
    let guid = path_hash_guid(path);
    println!("guid:      {guid}");
    println!("companion: {}", guid.companion_hex());
    Ok(())
}
