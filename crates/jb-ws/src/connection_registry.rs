use crate::{ConnectionEntry, ConnectionId};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::extract::ws::Message;
use jb_core::Role;
use log::{debug, info};
use tokio::sync::{RwLock, mpsc};

/// Registry of currently-connected users, keyed by user_id with a
/// role-membership index.
///
/// Explicitly constructed and shared by cloning the handle; mutations and
/// reads go through a single guard, and no await point is reached while it
/// is held.
pub struct ConnectionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

struct RegistryInner {
    /// All active connections by user_id (at most one per user)
    connections: HashMap<String, ConnectionEntry>,
    /// user_ids grouped by role, kept consistent with `connections`
    by_role: HashMap<Role, HashSet<String>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                connections: HashMap::new(),
                by_role: HashMap::new(),
            })),
        }
    }

    /// Register a connection for `user_id`, last-connection-wins.
    ///
    /// Returns the new connection's id plus the displaced entry, if any.
    /// The caller is responsible for closing the displaced transport.
    pub async fn register(
        &self,
        user_id: String,
        role: Role,
        sender: mpsc::Sender<Message>,
    ) -> (ConnectionId, Option<ConnectionEntry>) {
        let entry = ConnectionEntry {
            connection_id: ConnectionId::new(),
            user_id: user_id.clone(),
            role,
            connected_at: chrono::Utc::now(),
            sender,
        };
        let connection_id = entry.connection_id;

        let mut inner = self.inner.write().await;

        let previous = inner.connections.insert(user_id.clone(), entry);

        // A reconnect may arrive under a different role; drop the stale
        // membership before indexing the new one.
        if let Some(ref prev) = previous
            && prev.role != role
        {
            Self::remove_role_membership(&mut inner, prev.role, &user_id);
        }
        inner.by_role.entry(role).or_default().insert(user_id.clone());

        info!(
            "Registered connection {connection_id} for user {user_id} ({} total)",
            inner.connections.len()
        );

        (connection_id, previous)
    }

    /// Remove the entry for `user_id` if present; no-op otherwise.
    pub async fn unregister(&self, user_id: &str) {
        let mut inner = self.inner.write().await;

        if let Some(entry) = inner.connections.remove(user_id) {
            Self::remove_role_membership(&mut inner, entry.role, user_id);
            info!(
                "Unregistered user {user_id} ({} total remaining)",
                inner.connections.len()
            );
        }
    }

    /// Remove the entry for `user_id` only if it still belongs to
    /// `connection_id`. Returns whether an entry was removed.
    ///
    /// Used by connection teardown and stale-handle eviction so that a
    /// replacement registered by a racing reconnect is never evicted.
    pub async fn unregister_connection(
        &self,
        user_id: &str,
        connection_id: ConnectionId,
    ) -> bool {
        let mut inner = self.inner.write().await;

        let matches = inner
            .connections
            .get(user_id)
            .is_some_and(|entry| entry.connection_id == connection_id);
        if !matches {
            debug!("Skipping unregister for user {user_id}: connection {connection_id} superseded");
            return false;
        }

        if let Some(entry) = inner.connections.remove(user_id) {
            Self::remove_role_membership(&mut inner, entry.role, user_id);
            info!(
                "Unregistered connection {connection_id} for user {user_id} ({} total remaining)",
                inner.connections.len()
            );
        }
        true
    }

    /// Whether `user_id` currently has a live connection
    pub async fn is_online(&self, user_id: &str) -> bool {
        let inner = self.inner.read().await;
        inner.connections.contains_key(user_id)
    }

    /// Get the entry for `user_id`
    pub async fn get(&self, user_id: &str) -> Option<ConnectionEntry> {
        let inner = self.inner.read().await;
        inner.connections.get(user_id).cloned()
    }

    /// Total connection count
    pub async fn count_all(&self) -> usize {
        let inner = self.inner.read().await;
        inner.connections.len()
    }

    /// Connection count for one role
    pub async fn count_by_role(&self, role: Role) -> usize {
        let inner = self.inner.read().await;
        inner.by_role.get(&role).map_or(0, HashSet::len)
    }

    /// Snapshot of all entries with the given role; order undefined
    pub async fn list_by_role(&self, role: Role) -> Vec<ConnectionEntry> {
        let inner = self.inner.read().await;
        match inner.by_role.get(&role) {
            Some(members) => members
                .iter()
                .filter_map(|user_id| inner.connections.get(user_id).cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Snapshot of every entry; order undefined
    pub(crate) async fn list_all(&self) -> Vec<ConnectionEntry> {
        let inner = self.inner.read().await;
        inner.connections.values().cloned().collect()
    }

    fn remove_role_membership(inner: &mut RegistryInner, role: Role, user_id: &str) {
        if let Some(members) = inner.by_role.get_mut(&role) {
            members.remove(user_id);
            if members.is_empty() {
                inner.by_role.remove(&role);
            }
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ConnectionRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
