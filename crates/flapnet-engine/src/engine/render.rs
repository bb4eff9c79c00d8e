use crate::core::{Actor, Obstacle};

use super::Termination;

/// Read-only view of an episode at one point in time.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeSnapshot<'a> {
    pub actor: &'a Actor,
    pub obstacles: &'a [Obstacle],
    pub score: usize,
    pub steps: usize,
    pub termination: Option<Termination>,
}

/// Something that can draw an episode.
///
/// Renderers only ever see [`EpisodeSnapshot`]s; the simulation has no
/// knowledge of any concrete renderer.
pub trait Renderer {
    fn render(&mut self, snapshot: &EpisodeSnapshot<'_>);
}
