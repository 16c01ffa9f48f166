//! Shared game data model for the hide-and-seek client.
//!
//! Everything in this crate is plain data: the snapshot the server streams
//! to each agent ([`GameView`]) and the small enums it is built from. There
//! is no I/O here, so the types are usable from the pure turn-gating logic,
//! from strategies and from the wire protocol alike.
//!
//! # Turn model
//!
//! The game alternates between thief turns and police turns. Each turn has
//! a number (starting at 1) and a [`TurnType`]. An agent may act only during
//! turns of its own side:
//!
//! | Agent | Acts during |
//! |-------|-------------|
//! | `Police` | `PoliceTurn` |
//! | `Thief` | `ThiefTurn` |
//!
//! # Examples
//!
//! ```
//! use hide_and_seek_types::{AgentType, TurnType};
//!
//! assert!(AgentType::Police.acts_during(TurnType::PoliceTurn));
//! assert!(!AgentType::Police.acts_during(TurnType::ThiefTurn));
//! assert_eq!(AgentType::from_str("THIEF"), Some(AgentType::Thief));
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a node (vertex) in the game graph.
pub type NodeId = u32;

/// Identifier of an agent in the game.
pub type AgentId = u32;

/// Turn number of the first turn of a game.
pub const FIRST_TURN: u32 = 1;

/// Overall lifecycle of a game as seen by one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameStatus {
    /// Agents are still joining / declaring readiness.
    #[serde(rename = "pending")]
    #[default]
    Pending,
    #[serde(rename = "ongoing")]
    Ongoing,
    #[serde(rename = "finished")]
    Finished,
    /// Any status this client does not know. Such snapshots are skipped.
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Pending => "pending",
            GameStatus::Ongoing => "ongoing",
            GameStatus::Finished => "finished",
            GameStatus::Unknown => "unknown",
        }
    }
}

/// Outcome of a game. `Unknown` until the game is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameResult {
    #[serde(rename = "unknown")]
    #[default]
    Unknown,
    #[serde(rename = "police_won")]
    PoliceWon,
    #[serde(rename = "thief_won")]
    ThiefWon,
    #[serde(rename = "draw")]
    Draw,
}

/// Whose move the current turn is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnType {
    #[serde(rename = "thief_turn")]
    ThiefTurn,
    #[serde(rename = "police_turn")]
    PoliceTurn,
}

impl TurnType {
    /// Parse turn type from string (case-insensitive)
    ///
    /// ```
    /// use hide_and_seek_types::TurnType;
    ///
    /// assert_eq!(TurnType::from_str("police_turn"), Some(TurnType::PoliceTurn));
    /// assert_eq!(TurnType::from_str("THIEF_TURN"), Some(TurnType::ThiefTurn));
    /// assert_eq!(TurnType::from_str("nobody"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "thief_turn" => Some(TurnType::ThiefTurn),
            "police_turn" => Some(TurnType::PoliceTurn),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TurnType::ThiefTurn => "thief_turn",
            TurnType::PoliceTurn => "police_turn",
        }
    }
}

/// Role of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentType {
    #[serde(rename = "police")]
    Police,
    #[serde(rename = "thief")]
    Thief,
}

impl AgentType {
    /// Parse agent type from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "police" => Some(AgentType::Police),
            "thief" => Some(AgentType::Thief),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Police => "police",
            AgentType::Thief => "thief",
        }
    }

    /// Whether an agent of this type may act during a turn of `turn_type`.
    pub fn acts_during(&self, turn_type: TurnType) -> bool {
        (*self == AgentType::Police && turn_type == TurnType::PoliceTurn)
            || (*self == AgentType::Thief && turn_type == TurnType::ThiefTurn)
    }
}

/// Team an agent belongs to. Police of one team chase thieves of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Team {
    #[serde(rename = "first")]
    #[default]
    First,
    #[serde(rename = "second")]
    Second,
}

/// Turn counter and the side expected to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    pub turn_number: u32,
    pub turn_type: TurnType,
}

impl Turn {
    pub fn new(turn_number: u32, turn_type: TurnType) -> Self {
        Self {
            turn_number,
            turn_type,
        }
    }
}

/// An agent on the board. The viewer is the agent receiving the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    #[serde(default)]
    pub team: Team,
    pub agent_type: AgentType,
    #[serde(default)]
    pub node_id: NodeId,
    #[serde(default)]
    pub is_dead: bool,
}

impl Agent {
    pub fn new(id: AgentId, agent_type: AgentType) -> Self {
        Self {
            id,
            team: Team::First,
            agent_type,
            node_id: 0,
            is_dead: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
}

/// Undirected edge between two nodes. Moving along it costs `price`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub id: u32,
    pub first_node_id: NodeId,
    pub second_node_id: NodeId,
    #[serde(default)]
    pub price: f64,
}

impl Path {
    /// The node on the other end of this path, if `from` is one of its ends.
    pub fn other_end(&self, from: NodeId) -> Option<NodeId> {
        if self.first_node_id == from {
            Some(self.second_node_id)
        } else if self.second_node_id == from {
            Some(self.first_node_id)
        } else {
            None
        }
    }
}

/// Map of the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub paths: Vec<Path>,
}

impl Graph {
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == node)
    }

    /// Nodes reachable from `node` in one step, in path order.
    ///
    /// ```
    /// use hide_and_seek_types::{Graph, Node, Path};
    ///
    /// let graph = Graph {
    ///     nodes: vec![Node { id: 1 }, Node { id: 2 }, Node { id: 3 }],
    ///     paths: vec![
    ///         Path { id: 1, first_node_id: 1, second_node_id: 2, price: 0.0 },
    ///         Path { id: 2, first_node_id: 3, second_node_id: 1, price: 0.0 },
    ///     ],
    /// };
    /// assert_eq!(graph.neighbours(1), vec![2, 3]);
    /// assert_eq!(graph.neighbours(2), vec![1]);
    /// ```
    pub fn neighbours(&self, node: NodeId) -> Vec<NodeId> {
        self.paths.iter().filter_map(|p| p.other_end(node)).collect()
    }
}

/// Static game settings delivered with every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameConfig {
    #[serde(default)]
    pub graph: Graph,
}

/// A chat line visible to the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: u32,
    pub from_agent_id: AgentId,
    pub text: String,
}

/// Point-in-time description of the game, as seen by one agent.
///
/// Sent by the server on every change. Only `status`, `turn` and `viewer`
/// are required on the wire; the rest default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameView {
    pub status: GameStatus,
    #[serde(default)]
    pub result: GameResult,
    pub turn: Turn,
    pub viewer: Agent,
    #[serde(default)]
    pub config: GameConfig,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub visible_agents: Vec<Agent>,
    #[serde(default)]
    pub chat_box: Vec<Chat>,
}

impl GameView {
    /// Minimal snapshot with an empty map.
    pub fn new(status: GameStatus, turn: Turn, viewer: Agent) -> Self {
        Self {
            status,
            result: GameResult::Unknown,
            turn,
            viewer,
            config: GameConfig::default(),
            balance: 0.0,
            visible_agents: Vec::new(),
            chat_box: Vec::new(),
        }
    }

    pub fn role(&self) -> AgentType {
        self.viewer.agent_type
    }

    pub fn turn_number(&self) -> u32 {
        self.turn.turn_number
    }

    pub fn turn_type(&self) -> TurnType {
        self.turn.turn_type
    }

    pub fn is_ongoing(&self) -> bool {
        self.status == GameStatus::Ongoing
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// Visible agents of the given type, excluding dead ones.
    pub fn visible(&self, agent_type: AgentType) -> impl Iterator<Item = &Agent> {
        self.visible_agents
            .iter()
            .filter(move |a| a.agent_type == agent_type && !a.is_dead)
    }
}
