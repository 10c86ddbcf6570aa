//! VM inventory and template queries over an open connection.

use anyhow::Result;

use crate::application::ports::{HypervisorConnection, VmLookup};
use crate::domain::{DatastorePath, VmError, VmRecord};

/// All VMs on the host, sorted by name.
///
/// # Errors
///
/// Returns an error if the inventory query fails.
pub async fn list_vms(conn: &impl HypervisorConnection) -> Result<Vec<VmRecord>> {
    let mut vms = conn.virtual_machines().await?;
    vms.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(vms)
}

/// Re-query the inventory and return the VM named `name`.
///
/// # Errors
///
/// Returns an error if the inventory query fails.
pub async fn find_vm(conn: &impl HypervisorConnection, name: &str) -> Result<Option<VmRecord>> {
    let vms = conn.virtual_machines().await?;
    Ok(vms.into_iter().find(|vm| vm.name == name))
}

/// Template files under the configured templates directory.
///
/// # Errors
///
/// Returns an error if no directory is configured, it is not a datastore
/// path, or the listing fails.
pub async fn list_templates(
    conn: &impl HypervisorConnection,
    templates_dir: &str,
) -> Result<Vec<String>> {
    if templates_dir.trim().is_empty() {
        return Err(VmError::TemplatesDirNotSet.into());
    }
    let dir = DatastorePath::parse(templates_dir)?;
    let mut templates = conn.list_templates(&dir).await?;
    templates.sort();
    Ok(templates)
}

/// `VmLookup` backed by a live connection's inventory.
pub struct ConnectionLookup<'a, C> {
    conn: &'a C,
}

impl<'a, C: HypervisorConnection> ConnectionLookup<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }
}

impl<C: HypervisorConnection> VmLookup for ConnectionLookup<'_, C> {
    async fn find_vm(&self, name: &str) -> Result<Option<VmRecord>> {
        find_vm(self.conn, name).await
    }
}
