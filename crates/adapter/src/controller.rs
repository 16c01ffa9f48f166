//! Turn loop - consume snapshots, act when eligible
//!
//! [`TurnLoopController::run`] drives one session: it opens the watch
//! stream and feeds every snapshot, in arrival order, through a
//! [`TurnGate`]. The first snapshot binds the strategy and declares
//! readiness; later snapshots produce at most one move per turn number.
//! Any error ends the session.

use std::sync::Arc;

use futures::StreamExt;
use log::{debug, error, info, warn};

use crate::client::GameHandler;
use crate::command::CommandBuilder;
use crate::core::{Messenger, Step, Strategy, StrategyFactory, TurnGate};
use crate::error::ClientError;
use crate::types::{AgentType, GameView};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A `Finished` snapshot was processed.
    Finished,
    /// The server ended the stream before the game finished.
    StreamClosed,
    /// An error stopped the loop. It has already been logged.
    Aborted,
}

/// Cloneable chat handle. Sends go straight to the server with no turn
/// gating, so any task may hold one.
#[derive(Clone)]
pub struct Phone {
    handler: Arc<dyn GameHandler>,
    commands: Arc<CommandBuilder>,
}

impl Phone {
    pub fn new(handler: Arc<dyn GameHandler>, commands: Arc<CommandBuilder>) -> Self {
        Self { handler, commands }
    }

    pub async fn send_message(&self, text: &str) -> Result<(), ClientError> {
        debug!("chat: {}", text);
        self.handler.send_message(self.commands.chat(text)).await
    }
}

#[async_trait::async_trait]
impl Messenger for Phone {
    async fn send_message(&self, text: &str) -> anyhow::Result<()> {
        Phone::send_message(self, text).await?;
        Ok(())
    }
}

/// Client-side turn loop for one agent.
pub struct TurnLoopController {
    handler: Arc<dyn GameHandler>,
    commands: Arc<CommandBuilder>,
    factory: Box<dyn StrategyFactory>,
    gate: TurnGate,
    strategy: Option<Box<dyn Strategy>>,
}

impl TurnLoopController {
    pub fn new(
        handler: Arc<dyn GameHandler>,
        commands: Arc<CommandBuilder>,
        factory: impl StrategyFactory + 'static,
    ) -> Self {
        Self {
            handler,
            commands,
            factory: Box::new(factory),
            gate: TurnGate::new(),
            strategy: None,
        }
    }

    /// Chat handle sharing this controller's connection.
    pub fn phone(&self) -> Phone {
        Phone::new(Arc::clone(&self.handler), Arc::clone(&self.commands))
    }

    pub fn gate(&self) -> &TurnGate {
        &self.gate
    }

    pub fn has_strategy(&self) -> bool {
        self.strategy.is_some()
    }

    /// Send a chat line. Does not touch turn state.
    pub async fn send_message(&self, text: &str) -> Result<(), ClientError> {
        self.phone().send_message(text).await
    }

    /// Run the session to completion.
    ///
    /// Errors are logged here and reported as [`SessionOutcome::Aborted`];
    /// they are never returned to the caller.
    pub async fn run(&mut self) -> SessionOutcome {
        match self.drive().await {
            Ok(outcome) => {
                info!("session ended: {:?}", outcome);
                outcome
            }
            Err(e) => {
                error!("session aborted: {}", e);
                SessionOutcome::Aborted
            }
        }
    }

    async fn drive(&mut self) -> Result<SessionOutcome, ClientError> {
        let mut views = self.handler.watch(self.commands.watch()).await?;
        info!("watching game");

        while let Some(view) = views.next().await {
            let view = view?;
            let step = self.gate.step(&view);
            debug!(
                "turn {} ({}) status {}: {:?}",
                view.turn_number(),
                view.turn_type().as_str(),
                view.status.as_str(),
                step
            );

            match step {
                Step::Initialize => {
                    self.initialize(&view).await?;
                    // A session may be joined after the game already ended.
                    if view.is_finished() {
                        return Ok(SessionOutcome::Finished);
                    }
                }
                Step::Move => self.make_move(&view).await?,
                Step::Finish => return Ok(SessionOutcome::Finished),
                Step::Idle => {}
            }
        }

        Ok(SessionOutcome::StreamClosed)
    }

    /// Bind the strategy for `role`. Only the first call has an effect;
    /// returns whether this call bound it.
    pub fn bind_strategy(&mut self, role: AgentType) -> bool {
        if self.strategy.is_some() {
            warn!("strategy already bound, ignoring rebind as {}", role.as_str());
            return false;
        }
        let phone: Arc<dyn Messenger> = Arc::new(self.phone());
        self.strategy = Some(self.factory.create(role, phone));
        true
    }

    async fn initialize(&mut self, view: &GameView) -> Result<(), ClientError> {
        if self.bind_strategy(view.role()) {
            info!("playing as {} (agent {})", view.role().as_str(), view.viewer.id);
        }

        let strategy = self.strategy.as_mut().ok_or(ClientError::Uninitialized)?;
        let start = strategy
            .starting_node(view)
            .await
            .map_err(ClientError::Strategy)?;

        self.handler
            .declare_readiness(self.commands.declare_readiness(start))
            .await?;
        info!("ready at node {}", start);
        Ok(())
    }

    async fn make_move(&mut self, view: &GameView) -> Result<(), ClientError> {
        let strategy = self.strategy.as_mut().ok_or(ClientError::Uninitialized)?;
        let to = strategy
            .next_move(view)
            .await
            .map_err(ClientError::Strategy)?;

        self.handler.move_to(self.commands.move_to(to)).await?;
        self.gate.mark_acted();
        debug!("turn {}: moved to {}", view.turn_number(), to);
        Ok(())
    }
}
