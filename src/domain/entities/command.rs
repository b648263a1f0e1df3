use std::collections::HashMap;

/// Trigger of the synthesized command that lists every other trigger
pub const LIST_TRIGGER: &str = "!list";

/// Prefix of the listing reply
pub const LIST_HEADER: &str = "Available commands: ";

/// Marker that starts a bare command
pub const COMMAND_MARKER: char = '!';

/// A canned reply selected by its trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub trigger: String,
    pub reply: String,
}

impl Command {
    pub fn new(trigger: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            reply: reply.into(),
        }
    }
}

/// Trigger to reply lookup, frozen after [`CommandTable::build`].
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: HashMap<String, String>,
}

impl CommandTable {
    /// Builds the table from commands in load order. A later duplicate
    /// trigger replaces the earlier reply. The listing entry is computed from
    /// the loaded triggers and inserted last, so it never lists itself.
    pub fn build(entries: impl IntoIterator<Item = Command>) -> Self {
        let mut table = Self::default();
        for command in entries {
            if table.commands.insert(command.trigger.clone(), command.reply).is_some() {
                tracing::debug!(trigger = %command.trigger, "Duplicate trigger, keeping the later reply");
            }
        }

        let listing = table.list_all();
        table.commands.insert(LIST_TRIGGER.to_string(), listing);
        table
    }

    /// Header followed by the sorted, comma-joined triggers
    pub fn list_all(&self) -> String {
        format!("{}{}", LIST_HEADER, self.triggers().join(", "))
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, trigger: &str) -> Option<&str> {
        self.commands.get(trigger).map(String::as_str)
    }

    /// All triggers in lexicographic order
    pub fn triggers(&self) -> Vec<&str> {
        let mut triggers: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        triggers.sort_unstable();
        triggers
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
