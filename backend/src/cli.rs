//! Minimal CLI parsing for the compile and query commands.

use std::collections::HashMap;
use std::env;

use anyhow::{Result, bail};

/// Entities reachable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    AccessControl,
    Permission,
    UserPermission,
    AccessControlPermission,
    Library,
    LibraryTemplate,
    AccessControlTree,
    UserAccessControl,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::User,
        EntityKind::AccessControl,
        EntityKind::Permission,
        EntityKind::UserPermission,
        EntityKind::AccessControlPermission,
        EntityKind::Library,
        EntityKind::LibraryTemplate,
        EntityKind::AccessControlTree,
        EntityKind::UserAccessControl,
    ];

    pub fn as_arg(&self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::AccessControl => "access-controls",
            EntityKind::Permission => "permissions",
            EntityKind::UserPermission => "user-permissions",
            EntityKind::AccessControlPermission => "access-control-permissions",
            EntityKind::Library => "libraries",
            EntityKind::LibraryTemplate => "library-templates",
            EntityKind::AccessControlTree => "access-control-tree",
            EntityKind::UserAccessControl => "user-access-controls",
        }
    }

    pub fn from_arg(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_arg() == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the compiled WHERE clause and its bind values
    Compile {
        entity: EntityKind,
        params: HashMap<String, String>,
    },
    /// Run the filter and print the matching page
    Query {
        entity: EntityKind,
        params: HashMap<String, String>,
        count_only: bool,
    },
    Help,
}

#[derive(Debug)]
pub struct CliOptions {
    pub command: Command,
}

impl CliOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse(env::args().skip(1))
    }

    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = args.into_iter();
        let Some(verb) = args.next() else {
            return Ok(Self { command: Command::Help });
        };

        let command = match verb.as_str() {
            "-h" | "--help" | "help" => Command::Help,
            "compile" | "query" => {
                let Some(name) = args.next() else {
                    bail!("Missing entity name after '{}'", verb);
                };
                let Some(entity) = EntityKind::from_arg(&name) else {
                    bail!("Unknown entity '{}', expected one of: {}", name, entity_list());
                };

                let mut params = HashMap::new();
                let mut count_only = false;
                for arg in args {
                    if arg == "--count" {
                        count_only = true;
                        continue;
                    }
                    match arg.split_once('=') {
                        Some((key, value)) if !key.is_empty() => {
                            params.insert(key.to_string(), value.to_string());
                        }
                        _ => bail!("Expected key=value, got '{}'", arg),
                    }
                }

                if verb == "compile" {
                    Command::Compile { entity, params }
                } else {
                    Command::Query {
                        entity,
                        params,
                        count_only,
                    }
                }
            }
            other => bail!("Unknown command '{}'", other),
        };

        Ok(Self { command })
    }
}

fn entity_list() -> String {
    EntityKind::ALL
        .iter()
        .map(EntityKind::as_arg)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn usage() -> String {
    format!(
        "Usage:\n  warden compile <entity> [key=value ...]\n  warden query <entity> [--count] [key=value ...]\n\nEntities: {}",
        entity_list()
    )
}
