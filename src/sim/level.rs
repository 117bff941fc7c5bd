//! Level catalog
//!
//! Static level data (start, goal, obstacles) and the [`Course`] bundling a
//! list of levels with the geometry strategy that interprets them.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::{CupRoom, FlatCourt, Geometry, cup_capture, square_capture};
use crate::consts::*;

/// Axis-aligned rectangle in the flat court plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Where a shot scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Goal {
    /// Square target on a flat court, `origin` at its lower-left corner
    Square { origin: Vec2, size: f32 },
    /// Open cylindrical cup standing on the room floor, `base` in (x, z)
    Cup { base: Vec2, radius: f32, rim_height: f32 },
}

impl Goal {
    /// Point the ball snaps to on capture, and the opponent's aim point
    pub fn center(&self) -> Vec3 {
        match *self {
            Goal::Square { origin, size } => {
                Vec3::new(origin.x + size / 2.0, origin.y + size / 2.0, 0.0)
            }
            Goal::Cup {
                base, rim_height, ..
            } => Vec3::new(base.x, rim_height / 2.0, base.y),
        }
    }

    /// Whether a ball centred at `pos` is inside the goal
    pub fn captures(&self, pos: Vec3) -> bool {
        match *self {
            Goal::Square { origin, size } => square_capture(origin, size, pos),
            Goal::Cup {
                base,
                radius,
                rim_height,
            } => cup_capture(base, radius, rim_height, pos),
        }
    }
}

/// Static obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    /// Rectangular bar on a flat court
    Block(Rect),
    /// Floor-to-ceiling cylinder in the cup room, `base` in (x, z)
    Pillar { base: Vec2, radius: f32 },
}

/// One level: immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub start: Vec3,
    pub goal: Goal,
    pub obstacles: Vec<Obstacle>,
}

/// Course construction errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CourseError {
    #[error("course has no levels")]
    Empty,

    #[error("level {level}: goal shape is not supported by this geometry")]
    UnsupportedGoal { level: usize },

    #[error("level {level}: obstacle {index} is not supported by this geometry")]
    UnsupportedObstacle { level: usize, index: usize },

    #[error("level {level}: start position lies outside the playfield")]
    StartOutOfBounds { level: usize },
}

/// An ordered, validated list of levels plus their geometry strategy
#[derive(Debug, Clone)]
pub struct Course<G> {
    geometry: G,
    levels: Vec<Level>,
}

impl<G: Geometry> Course<G> {
    /// Validate that every level fits the geometry
    pub fn new(geometry: G, levels: Vec<Level>) -> Result<Self, CourseError> {
        if levels.is_empty() {
            return Err(CourseError::Empty);
        }
        for (i, level) in levels.iter().enumerate() {
            if !geometry.supports_goal(&level.goal) {
                return Err(CourseError::UnsupportedGoal { level: i });
            }
            if let Some(index) = level
                .obstacles
                .iter()
                .position(|o| !geometry.supports_obstacle(o))
            {
                return Err(CourseError::UnsupportedObstacle { level: i, index });
            }
            if !geometry.contains(level.start) {
                return Err(CourseError::StartOutOfBounds { level: i });
            }
        }
        Ok(Self { geometry, levels })
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Level by index. Indices past the end clamp to the last level.
    pub fn level(&self, index: usize) -> &Level {
        &self.levels[index.min(self.levels.len() - 1)]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.levels.len()
    }
}

impl Course<FlatCourt> {
    /// The built-in flat court levels
    pub fn flat() -> Self {
        Self {
            geometry: FlatCourt::default(),
            levels: flat_levels(),
        }
    }
}

impl Course<CupRoom> {
    /// The built-in cup room levels
    pub fn cup_room() -> Self {
        Self {
            geometry: CupRoom::default(),
            levels: cup_room_levels(),
        }
    }
}

fn flat_levels() -> Vec<Level> {
    let start = Vec3::new(60.0, 100.0, 0.0);
    let goal = Goal::Square {
        origin: Vec2::new(COURT_WIDTH - 60.0, COURT_HEIGHT - 100.0),
        size: 40.0,
    };

    vec![
        Level {
            start,
            goal,
            obstacles: vec![Obstacle::Block(Rect::new(
                COURT_WIDTH / 2.0 - 50.0,
                COURT_HEIGHT / 2.0 - 20.0,
                100.0,
                20.0,
            ))],
        },
        Level {
            start,
            goal,
            obstacles: Vec::new(),
        },
    ]
}

fn cup_room_levels() -> Vec<Level> {
    vec![
        Level {
            start: Vec3::new(0.0, 0.1, 2.5),
            goal: Goal::Cup {
                base: Vec2::new(0.0, -2.0),
                radius: 0.3,
                rim_height: 0.25,
            },
            obstacles: Vec::new(),
        },
        Level {
            start: Vec3::new(-1.5, 0.1, 2.5),
            goal: Goal::Cup {
                base: Vec2::new(1.2, -2.2),
                radius: 0.25,
                rim_height: 0.25,
            },
            obstacles: vec![Obstacle::Pillar {
                base: Vec2::new(0.6, 0.0),
                radius: 0.2,
            }],
        },
        Level {
            start: Vec3::new(1.5, 0.1, 2.5),
            goal: Goal::Cup {
                base: Vec2::new(-1.4, -2.4),
                radius: 0.22,
                rim_height: 0.3,
            },
            obstacles: vec![
                Obstacle::Pillar {
                    base: Vec2::new(-0.2, 0.5),
                    radius: 0.15,
                },
                Obstacle::Pillar {
                    base: Vec2::new(-1.0, -1.0),
                    radius: 0.15,
                },
            ],
        },
    ]
}
