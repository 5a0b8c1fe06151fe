//! Command label routing
//!
//! Maps every label a player can type (canonical name and aliases) to one handler.
//! Labels are case-insensitive. Re-registering a command replaces its alias set, so
//! aliases removed from the config stop routing after a reload.

use std::collections::HashMap;

#[derive(Debug)]
pub struct CommandTable<H> {
    commands: HashMap<String, H>,
    /// label -> canonical command name
    labels: HashMap<String, String>,
}

impl<H> Default for CommandTable<H> {
    fn default() -> Self {
        Self {
            commands: HashMap::new(),
            labels: HashMap::new(),
        }
    }
}

impl<H> CommandTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `name` with `aliases`, replacing any previous registration of `name`.
    ///
    /// Aliases already owned by another command are left alone and returned. The
    /// canonical name always routes to this command, even if another command had
    /// claimed it as an alias.
    pub fn register<S: AsRef<str>>(&mut self, name: &str, aliases: &[S], handler: H) -> Vec<String> {
        let name = name.trim().to_lowercase();

        // Drop stale labels from an earlier registration
        self.labels.retain(|_, owner| *owner != name);

        // A command's own name outranks another command's alias
        if let Some(owner) = self.labels.insert(name.clone(), name.clone()) {
            tracing::warn!(label = %name, %owner, "Command name reclaimed from another command's alias");
        }

        let mut skipped = Vec::new();
        for alias in aliases {
            let alias = alias.as_ref().trim().to_lowercase();
            if alias.is_empty() {
                continue;
            }
            match self.labels.get(&alias) {
                Some(owner) if *owner != name => {
                    tracing::warn!(%alias, command = %name, owner = %owner, "Alias already taken, skipping");
                    skipped.push(alias);
                }
                _ => {
                    self.labels.insert(alias, name.clone());
                }
            }
        }

        self.commands.insert(name, handler);
        skipped
    }

    /// Remove a command and every label routed to it.
    pub fn unregister(&mut self, name: &str) -> Option<H> {
        let name = name.trim().to_lowercase();
        self.labels.retain(|_, owner| *owner != name);
        self.commands.remove(&name)
    }

    /// Look up the command a typed label routes to.
    pub fn resolve(&self, label: &str) -> Option<(&str, &H)> {
        let name = self.labels.get(&label.trim().to_lowercase())?;
        self.commands
            .get_key_value(name)
            .map(|(name, handler)| (name.as_str(), handler))
    }

    /// All labels routed to `name`, sorted
    pub fn labels_for(&self, name: &str) -> Vec<&str> {
        let name = name.trim().to_lowercase();
        let mut labels: Vec<_> = self
            .labels
            .iter()
            .filter(|(_, owner)| **owner == name)
            .map(|(label, _)| label.as_str())
            .collect();
        labels.sort_unstable();
        labels
    }
}
