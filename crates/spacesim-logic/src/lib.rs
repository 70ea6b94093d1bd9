//! Pure combat logic for SpaceSim.
//!
//! This crate contains all game logic that is independent of any ECS,
//! engine, or runtime. Functions take plain data and return results, making
//! them unit-testable and usable from the `hecs` simulation context, the
//! headless harness, or a host game engine.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`ai`] | Patrol / attack / chase controller emitting ship commands |
//! | [`attachments`] | Data-driven weapon and engine kinds, fire and thrust gates |
//! | [`config`] | Runtime tuning (`SimConfig`) with validation |
//! | [`constants`] | Compile-time defaults for every tunable |
//! | [`damage`] | Ship ids, damage metadata, bounded attacker history |
//! | [`geometry`] | 2D vectors, angles, circle overlap |
//! | [`hull`] | Integrity, fuel, temperature, overheating, self-destruct |
//! | [`level`] | The `Level` query trait and the `GridLevel` tile map |
//! | [`pathfinding`] | BFS over a tile walkability predicate |
//! | [`projectile`] | Projectile spawn, flight, expiry, hit and knockback |
//! | [`scheduler`] | Priority tiers, tick timers, throttles |
//! | [`score`] | Per-ship stats, accuracy, score, leaderboard |
//! | [`supply`] | Fuel / ammo / repair pickups |
//! | [`vision`] | View cone, view distance, line of sight |

pub mod ai;
pub mod attachments;
pub mod config;
pub mod constants;
pub mod damage;
pub mod geometry;
pub mod hull;
pub mod level;
pub mod pathfinding;
pub mod projectile;
pub mod scheduler;
pub mod score;
pub mod supply;
pub mod vision;
