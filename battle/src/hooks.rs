//! Lifecycle hooks
//!
//! A [`HookRegistry`] maps each [`HookEvent`] to an ordered list of handlers.
//! Handlers run one after another and are awaited before the bot moves on;
//! the first failure stops the chain and is returned to the caller.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use walls_protocol::{AttackResponse, StateSnapshot};

use crate::error::HookError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    CycleStarted,
    CycleCompleted,
    BattleStarted,
    BeforeAttack,
    AfterAttack,
    BattleEnded,
}

impl HookEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CycleStarted => "cycleStarted",
            Self::CycleCompleted => "cycleCompleted",
            Self::BattleStarted => "battleStarted",
            Self::BeforeAttack => "beforeAttack",
            Self::AfterAttack => "afterAttack",
            Self::BattleEnded => "battleEnded",
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a handler gets to look at
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub event: HookEvent,

    /// Snapshot the event was raised from
    pub snapshot: &'a StateSnapshot,

    /// Only set for [`HookEvent::AfterAttack`]
    pub attack: Option<&'a AttackResponse>,
}

/// A side-effecting handler for one or more lifecycle events
///
/// # Example
///
/// ```ignore
/// struct Announce;
///
/// #[async_trait]
/// impl Hook for Announce {
///     async fn call(&self, ctx: &HookContext<'_>) -> anyhow::Result<()> {
///         let hp = ctx.snapshot.player.health.current;
///         tracing::info!(event = %ctx.event, hp, "Hook fired");
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Hook: Send + Sync {
    async fn call(&self, ctx: &HookContext<'_>) -> anyhow::Result<()>;
}

/// Adapter for plain synchronous closures
pub struct FnHook<F>(pub F);

#[async_trait]
impl<F> Hook for FnHook<F>
where
    F: Fn(&HookContext<'_>) -> anyhow::Result<()> + Send + Sync,
{
    async fn call(&self, ctx: &HookContext<'_>) -> anyhow::Result<()> {
        (self.0)(ctx)
    }
}

#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<HookEvent, Vec<Arc<dyn Hook>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to the event's list
    pub fn register<H: Hook + 'static>(&mut self, event: HookEvent, hook: H) -> &mut Self {
        self.register_shared(event, Arc::new(hook))
    }

    /// Append an already shared handler, e.g. one registered on several events
    pub fn register_shared(&mut self, event: HookEvent, hook: Arc<dyn Hook>) -> &mut Self {
        self.hooks.entry(event).or_default().push(hook);
        self
    }

    /// Append a synchronous closure
    pub fn on<F>(&mut self, event: HookEvent, f: F) -> &mut Self
    where
        F: Fn(&HookContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(event, FnHook(f))
    }

    pub fn count(&self, event: HookEvent) -> usize {
        self.hooks.get(&event).map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.values().all(Vec::is_empty)
    }

    /// Run every handler for `event` in registration order
    pub async fn fire(
        &self,
        event: HookEvent,
        snapshot: &StateSnapshot,
        attack: Option<&AttackResponse>,
    ) -> Result<(), HookError> {
        let Some(hooks) = self.hooks.get(&event) else {
            return Ok(());
        };

        let ctx = HookContext {
            event,
            snapshot,
            attack,
        };

        for hook in hooks {
            hook.call(&ctx)
                .await
                .map_err(|source| HookError { event, source })?;
        }

        Ok(())
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<(HookEvent, usize)> =
            self.hooks.iter().map(|(e, h)| (*e, h.len())).collect();
        counts.sort_by_key(|(e, _)| e.as_str());
        f.debug_struct("HookRegistry").field("hooks", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::testing::idle_snapshot;

    #[tokio::test]
    async fn test_fire_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();

        for label in ["first", "second", "third"] {
            let log = log.clone();
            registry.on(HookEvent::CycleStarted, move |_| {
                log.lock().unwrap().push(label);
                Ok(())
            });
        }

        registry
            .fire(HookEvent::CycleStarted, &idle_snapshot(100, 100), None)
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
        assert_eq!(registry.count(HookEvent::CycleStarted), 3);
        assert_eq!(registry.count(HookEvent::BattleEnded), 0);
    }

    #[tokio::test]
    async fn test_fire_without_hooks() {
        let registry = HookRegistry::new();
        assert!(registry.is_empty());

        registry
            .fire(HookEvent::BattleEnded, &idle_snapshot(10, 100), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failure_stops_chain() {
        let ran = Arc::new(Mutex::new(0));
        let mut registry = HookRegistry::new();

        registry.on(HookEvent::AfterAttack, |_| anyhow::bail!("potion shop closed"));
        let counter = ran.clone();
        registry.on(HookEvent::AfterAttack, move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        let err = registry
            .fire(HookEvent::AfterAttack, &idle_snapshot(10, 100), None)
            .await
            .unwrap_err();

        assert_eq!(err.event, HookEvent::AfterAttack);
        assert!(err.to_string().contains("potion shop closed"));
        assert_eq!(*ran.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_context_exposes_snapshot() {
        let seen = Arc::new(Mutex::new(None));
        let mut registry = HookRegistry::new();

        let slot = seen.clone();
        registry.on(HookEvent::CycleCompleted, move |ctx| {
            *slot.lock().unwrap() = Some((ctx.event, ctx.snapshot.player.health.current));
            Ok(())
        });

        registry
            .fire(HookEvent::CycleCompleted, &idle_snapshot(42, 100), None)
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), Some((HookEvent::CycleCompleted, 42)));
    }
}
