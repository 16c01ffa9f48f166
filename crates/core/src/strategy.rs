//! Strategy seam - pluggable move decisions
//!
//! The turn loop treats a [`Strategy`] as an opaque oracle: it asks once for
//! a starting node and then at most once per turn for a destination. Which
//! strategy plays is decided by a [`StrategyFactory`] from the viewer's role
//! in the first snapshot.
//!
//! Strategies receive a [`Messenger`] so they can chat with teammates while
//! deciding; the client passes the same connection the turn loop uses.

use std::sync::Arc;

use anyhow::Result;

use crate::rng::SimpleRng;
use crate::types::{AgentType, GameView, NodeId};

/// Out-of-band chat channel handed to strategies.
#[async_trait::async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<()>;
}

/// Decision-making collaborator for one agent.
///
/// Errors abort the session; there is no retry.
#[async_trait::async_trait]
pub trait Strategy: Send {
    /// Node to declare as the starting position. Called once per session.
    async fn starting_node(&mut self, view: &GameView) -> Result<NodeId>;
    /// Destination for this turn. Called at most once per turn number.
    async fn next_move(&mut self, view: &GameView) -> Result<NodeId>;
}

/// Builds the strategy for a role. Called once per session.
pub trait StrategyFactory: Send + Sync {
    fn create(&self, role: AgentType, phone: Arc<dyn Messenger>) -> Box<dyn Strategy>;
}

impl<F> StrategyFactory for F
where
    F: Fn(AgentType, Arc<dyn Messenger>) -> Box<dyn Strategy> + Send + Sync,
{
    fn create(&self, role: AgentType, phone: Arc<dyn Messenger>) -> Box<dyn Strategy> {
        self(role, phone)
    }
}

/// Factory for the bundled reference strategies.
#[derive(Debug, Clone, Copy)]
pub struct DefaultStrategies {
    seed: u32,
}

impl DefaultStrategies {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl Default for DefaultStrategies {
    fn default() -> Self {
        Self::new(1)
    }
}

impl StrategyFactory for DefaultStrategies {
    fn create(&self, role: AgentType, phone: Arc<dyn Messenger>) -> Box<dyn Strategy> {
        match role {
            AgentType::Police => Box::new(PoliceStrategy::new(phone, self.seed)),
            AgentType::Thief => Box::new(ThiefStrategy::new(phone, self.seed)),
        }
    }
}

/// Police reference strategy.
///
/// Steps onto an adjacent visible thief when there is one (and tells the
/// team where it was seen), otherwise wanders to a random neighbour.
pub struct PoliceStrategy {
    phone: Arc<dyn Messenger>,
    rng: SimpleRng,
    last_reported: Option<NodeId>,
}

impl PoliceStrategy {
    pub fn new(phone: Arc<dyn Messenger>, seed: u32) -> Self {
        Self {
            phone,
            rng: SimpleRng::new(seed),
            last_reported: None,
        }
    }
}

#[async_trait::async_trait]
impl Strategy for PoliceStrategy {
    async fn starting_node(&mut self, view: &GameView) -> Result<NodeId> {
        // Police placement is server-assigned; echo it back when known.
        if view.viewer.node_id != 0 {
            return Ok(view.viewer.node_id);
        }
        Ok(view.config.graph.nodes.first().map(|n| n.id).unwrap_or(1))
    }

    async fn next_move(&mut self, view: &GameView) -> Result<NodeId> {
        let here = view.viewer.node_id;
        let neighbours = view.config.graph.neighbours(here);

        let thief = view
            .visible(AgentType::Thief)
            .find(|a| a.team != view.viewer.team)
            .map(|a| a.node_id);

        if let Some(node) = thief {
            if self.last_reported != Some(node) {
                self.phone
                    .send_message(&format!("thief seen at {}", node))
                    .await?;
                self.last_reported = Some(node);
            }
            if node == here || neighbours.contains(&node) {
                return Ok(node);
            }
        }

        Ok(self.rng.choose(&neighbours).copied().unwrap_or(here))
    }
}

/// Thief reference strategy.
///
/// Starts on a random node and moves to a random neighbour that is neither
/// occupied by nor adjacent to a visible police agent, staying put when
/// every neighbour is watched. Warns the team about newly spotted police.
pub struct ThiefStrategy {
    phone: Arc<dyn Messenger>,
    rng: SimpleRng,
    last_warned: Option<NodeId>,
}

impl ThiefStrategy {
    pub fn new(phone: Arc<dyn Messenger>, seed: u32) -> Self {
        Self {
            phone,
            rng: SimpleRng::new(seed),
            last_warned: None,
        }
    }
}

#[async_trait::async_trait]
impl Strategy for ThiefStrategy {
    async fn starting_node(&mut self, view: &GameView) -> Result<NodeId> {
        let nodes: Vec<NodeId> = view.config.graph.nodes.iter().map(|n| n.id).collect();
        Ok(self.rng.choose(&nodes).copied().unwrap_or(view.viewer.node_id.max(1)))
    }

    async fn next_move(&mut self, view: &GameView) -> Result<NodeId> {
        let graph = &view.config.graph;
        let here = view.viewer.node_id;

        let mut danger: Vec<NodeId> = Vec::new();
        for police in view.visible(AgentType::Police) {
            if police.team == view.viewer.team {
                continue;
            }
            danger.push(police.node_id);
            danger.extend(graph.neighbours(police.node_id));
        }

        if let Some(&spotted) = danger.first() {
            if self.last_warned != Some(spotted) {
                self.phone
                    .send_message(&format!("police at {}", spotted))
                    .await?;
                self.last_warned = Some(spotted);
            }
        }

        let safe: Vec<NodeId> = graph
            .neighbours(here)
            .into_iter()
            .filter(|n| !danger.contains(n))
            .collect();

        Ok(self.rng.choose(&safe).copied().unwrap_or(here))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Agent, GameStatus, Graph, Node, Path, Team, Turn, TurnType};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    #[async_trait::async_trait]
    impl Messenger for Recorder {
        async fn send_message(&self, text: &str) -> Result<()> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    // 1 - 2 - 3 - 4 - 5 (a line)
    fn line_graph() -> Graph {
        Graph {
            nodes: (1..=5).map(|id| Node { id }).collect(),
            paths: (1..5)
                .map(|i| Path {
                    id: i,
                    first_node_id: i,
                    second_node_id: i + 1,
                    price: 0.0,
                })
                .collect(),
        }
    }

    fn view(role: AgentType, at: NodeId, t: TurnType) -> GameView {
        let mut viewer = Agent::new(1, role);
        viewer.node_id = at;
        let mut v = GameView::new(GameStatus::Ongoing, Turn::new(2, t), viewer);
        v.config.graph = line_graph();
        v
    }

    fn enemy(id: u32, role: AgentType, at: NodeId) -> Agent {
        let mut a = Agent::new(id, role);
        a.team = Team::Second;
        a.node_id = at;
        a
    }

    #[tokio::test]
    async fn police_starts_on_assigned_node() {
        let phone = Arc::new(Recorder::default());
        let mut s = PoliceStrategy::new(phone, 1);
        let v = view(AgentType::Police, 3, TurnType::PoliceTurn);
        assert_eq!(s.starting_node(&v).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn police_wanders_to_a_neighbour() {
        let phone = Arc::new(Recorder::default());
        let mut s = PoliceStrategy::new(phone.clone(), 5);
        let v = view(AgentType::Police, 3, TurnType::PoliceTurn);
        for _ in 0..20 {
            let dest = s.next_move(&v).await.unwrap();
            assert!(dest == 2 || dest == 4, "unexpected destination {dest}");
        }
        assert!(phone.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn police_catches_adjacent_thief_and_reports_once() {
        let phone = Arc::new(Recorder::default());
        let mut s = PoliceStrategy::new(phone.clone(), 5);
        let mut v = view(AgentType::Police, 3, TurnType::PoliceTurn);
        v.visible_agents.push(enemy(9, AgentType::Thief, 4));

        assert_eq!(s.next_move(&v).await.unwrap(), 4);
        assert_eq!(s.next_move(&v).await.unwrap(), 4);
        assert_eq!(*phone.0.lock().unwrap(), vec!["thief seen at 4".to_string()]);
    }

    #[tokio::test]
    async fn police_stays_on_isolated_node() {
        let phone = Arc::new(Recorder::default());
        let mut s = PoliceStrategy::new(phone, 5);
        let mut v = view(AgentType::Police, 3, TurnType::PoliceTurn);
        v.config.graph.paths.clear();
        assert_eq!(s.next_move(&v).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn thief_starts_on_a_graph_node() {
        let phone = Arc::new(Recorder::default());
        let mut s = ThiefStrategy::new(phone, 11);
        let v = view(AgentType::Thief, 0, TurnType::ThiefTurn);
        let start = s.starting_node(&v).await.unwrap();
        assert!((1..=5).contains(&start));
    }

    #[tokio::test]
    async fn thief_avoids_police_neighbourhood() {
        let phone = Arc::new(Recorder::default());
        let mut s = ThiefStrategy::new(phone.clone(), 11);
        let mut v = view(AgentType::Thief, 3, TurnType::ThiefTurn);
        // Police on 1 watches 1 and 2, so the only safe step from 3 is 4.
        v.visible_agents.push(enemy(8, AgentType::Police, 1));
        for _ in 0..20 {
            assert_eq!(s.next_move(&v).await.unwrap(), 4);
        }
        assert_eq!(*phone.0.lock().unwrap(), vec!["police at 1".to_string()]);
    }

    #[tokio::test]
    async fn thief_stays_when_surrounded() {
        let phone = Arc::new(Recorder::default());
        let mut s = ThiefStrategy::new(phone, 11);
        let mut v = view(AgentType::Thief, 3, TurnType::ThiefTurn);
        v.visible_agents.push(enemy(8, AgentType::Police, 2));
        v.visible_agents.push(enemy(9, AgentType::Police, 4));
        assert_eq!(s.next_move(&v).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn default_factory_picks_by_role() {
        let factory = DefaultStrategies::new(3);
        let phone: Arc<dyn Messenger> = Arc::new(Recorder::default());

        // The police strategy echoes its assigned node; the thief one ignores it.
        let mut police = factory.create(AgentType::Police, phone.clone());
        let mut v = view(AgentType::Police, 5, TurnType::PoliceTurn);
        v.config.graph.nodes.truncate(1);
        assert_eq!(police.starting_node(&v).await.unwrap(), 5);

        let mut thief = factory.create(AgentType::Thief, phone);
        assert_eq!(thief.starting_node(&v).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn closures_are_factories() {
        let factory = |_role: AgentType, phone: Arc<dyn Messenger>| -> Box<dyn Strategy> {
            Box::new(ThiefStrategy::new(phone, 1))
        };
        let phone: Arc<dyn Messenger> = Arc::new(Recorder::default());
        let mut s = factory.create(AgentType::Police, phone);
        let v = view(AgentType::Thief, 3, TurnType::ThiefTurn);
        let dest = s.next_move(&v).await.unwrap();
        assert!(dest == 2 || dest == 4);
    }
}
