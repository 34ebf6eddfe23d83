//! Static command table and dispatch.

use super::{
    AnalyzeCommand, Command, ConnectCommand, Context, DescribeCommand, HelpCommand,
    InspectCommand, VersionCommand,
};
use hedgedb_core::{HedgeError, Result};
use std::collections::HashMap;

// `help` is always preceded by the `version` banner.
const HELP: &str = "help";
const VERSION: &str = "version";

/// Name and description of a registered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
}

/// How a dispatched command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl From<Outcome> for std::process::ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Self::SUCCESS,
            Outcome::Failure => Self::FAILURE,
        }
    }
}

/// Maps command names to implementations, in registration order.
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
    by_name: HashMap<&'static str, usize>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.commands.iter().map(|c| c.name()))
            .finish()
    }
}

impl CommandRegistry {
    /// Builds a registry from `commands`.
    ///
    /// # Errors
    /// Returns [`HedgeError::DuplicateCommand`] if two commands share a name.
    pub fn new(commands: Vec<Box<dyn Command>>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(commands.len());
        for (index, command) in commands.iter().enumerate() {
            if by_name.insert(command.name(), index).is_some() {
                return Err(HedgeError::DuplicateCommand {
                    name: command.name().to_string(),
                });
            }
        }
        Ok(Self { commands, by_name })
    }

    /// The built-in command set.
    pub fn builtin() -> Result<Self> {
        Self::new(vec![
            Box::new(HelpCommand),
            Box::new(VersionCommand),
            Box::new(ConnectCommand),
            Box::new(AnalyzeCommand),
            Box::new(DescribeCommand),
            Box::new(InspectCommand),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.by_name
            .get(name)
            .and_then(|&index| self.commands.get(index))
            .map(|command| &**command)
    }

    /// Registered commands in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = CommandDescriptor> + '_ {
        self.commands.iter().map(|command| CommandDescriptor {
            name: command.name(),
            description: command.description(),
            usage: command.usage(),
        })
    }

    /// Runs the named command, reporting any failure as one diagnostic line.
    pub async fn dispatch(&self, name: &str, args: &[String], ctx: &mut Context<'_>) -> Outcome {
        let outcome = match self.run(name, args, ctx).await {
            Ok(()) => Outcome::Success,
            Err(e) => {
                tracing::debug!("Command '{}' failed: {:?}", name, e);
                if let Err(write_error) = ctx.diagnostic(&e) {
                    tracing::error!("{}", write_error);
                }
                Outcome::Failure
            }
        };
        ctx.flush();
        outcome
    }

    async fn run(&self, name: &str, args: &[String], ctx: &mut Context<'_>) -> Result<()> {
        let command = self.get(name).ok_or_else(|| HedgeError::UnknownCommand {
            name: name.to_string(),
        })?;

        if name == HELP {
            if let Some(version) = self.get(VERSION) {
                version.run(self, ctx, &[]).await?;
            }
        }

        tracing::debug!("Running command '{}' with {} arguments", name, args.len());
        command.run(self, ctx, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Settings;
    use async_trait::async_trait;
    use hedgedb_core::Connector;
    use hedgedb_core::connector::memory::StaticDriver;

    struct Echo(&'static str);

    #[async_trait]
    impl Command for Echo {
        fn name(&self) -> &'static str {
            self.0
        }

        fn description(&self) -> &'static str {
            "Echo arguments"
        }

        async fn run(
            &self,
            _registry: &CommandRegistry,
            ctx: &mut Context<'_>,
            args: &[String],
        ) -> Result<()> {
            ctx.line(args.join(" "))
        }
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let err = CommandRegistry::new(vec![Box::new(Echo("echo")), Box::new(Echo("echo"))])
            .unwrap_err();
        assert!(matches!(err, HedgeError::DuplicateCommand { name } if name == "echo"));
    }

    #[test]
    fn test_builtin_registration_order() {
        let registry = CommandRegistry::builtin().unwrap();
        let names: Vec<_> = registry.descriptors().map(|d| d.name).collect();
        assert_eq!(
            names,
            ["help", "version", "connect", "analyze", "describe", "inspect"]
        );
    }

    #[tokio::test]
    async fn test_dispatch_custom_command() {
        let registry = CommandRegistry::new(vec![Box::new(Echo("echo"))]).unwrap();
        let settings = Settings::default();
        let connector = Connector::new(StaticDriver::new());
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut ctx = Context::new("hedgedb", &settings, &connector, &mut out, &mut err);

        let outcome = registry
            .dispatch("echo", &["a".to_string(), "b".to_string()], &mut ctx)
            .await;
        assert_eq!(outcome, Outcome::Success);

        let outcome = registry.dispatch("help", &[], &mut ctx).await;
        assert_eq!(outcome, Outcome::Failure);

        drop(ctx);
        assert_eq!(String::from_utf8(out).unwrap(), "a b\n");
        assert_eq!(String::from_utf8(err).unwrap(), "Unknown command: help\n");
    }
}
