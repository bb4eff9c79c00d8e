use std::{fmt::Write as _, io, thread, time::Duration};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use flapnet_engine::{EpisodeSnapshot, Rect, Renderer};

const COLUMNS: u16 = 40;
const ROWS: u16 = 30;
const CELL_WIDTH: f32 = 10.0;
const CELL_HEIGHT: f32 = 20.0;

const ACTOR_CELL: char = '@';
const OBSTACLE_CELL: char = '#';
const EMPTY_CELL: char = ' ';

/// Draws episodes as coarse character grids, one frame per step.
#[derive(Debug)]
pub struct TextRenderer<W> {
    writer: W,
    frame_delay: Duration,
    frame: String,
}

impl TextRenderer<io::Stderr> {
    pub fn stderr(frame_delay: Duration) -> Self {
        Self::new(io::stderr(), frame_delay)
    }
}

impl<W> TextRenderer<W>
where
    W: io::Write,
{
    pub fn new(writer: W, frame_delay: Duration) -> Self {
        Self {
            writer,
            frame_delay,
            frame: String::new(),
        }
    }

    fn draw(&mut self, snapshot: &EpisodeSnapshot<'_>) {
        let actor_box = snapshot.actor.bounding_box();
        let columns: Vec<Rect> = snapshot
            .obstacles
            .iter()
            .flat_map(|o| {
                let (top, bottom) = o.columns();
                [top, bottom]
            })
            .collect();

        self.frame.clear();
        let border = "-".repeat(usize::from(COLUMNS));
        let _ = writeln!(
            self.frame,
            "step {:>5}  score {:>3}",
            snapshot.steps, snapshot.score
        );
        let _ = writeln!(self.frame, "+{border}+");
        for row in 0..ROWS {
            self.frame.push('|');
            for col in 0..COLUMNS {
                let cell = Rect::new(
                    f32::from(col) * CELL_WIDTH,
                    f32::from(row) * CELL_HEIGHT,
                    CELL_WIDTH,
                    CELL_HEIGHT,
                );
                let ch = if cell.overlaps(&actor_box) {
                    ACTOR_CELL
                } else if columns.iter().any(|c| c.overlaps(&cell)) {
                    OBSTACLE_CELL
                } else {
                    EMPTY_CELL
                };
                self.frame.push(ch);
            }
            self.frame.push_str("|\n");
        }
        let _ = writeln!(self.frame, "+{border}+");
        if let Some(termination) = snapshot.termination {
            let _ = writeln!(self.frame, "episode over: {termination}");
        }
    }
}

impl<W> Renderer for TextRenderer<W>
where
    W: io::Write,
{
    fn render(&mut self, snapshot: &EpisodeSnapshot<'_>) {
        self.draw(snapshot);
        let result = queue!(
            self.writer,
            MoveTo(0, 0),
            Clear(ClearType::All),
            Print(&self.frame)
        )
        .and_then(|()| self.writer.flush());
        if let Err(err) = result {
            tracing::warn!(%err, "failed to draw frame");
        }
        if !self.frame_delay.is_zero() {
            thread::sleep(self.frame_delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use flapnet_engine::{Episode, Obstacle, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, Seed};

    use super::*;

    fn render_to_string(snapshot: &EpisodeSnapshot<'_>) -> String {
        let mut renderer = TextRenderer::new(vec![], Duration::ZERO);
        renderer.render(snapshot);
        String::from_utf8(renderer.writer).unwrap()
    }

    #[test]
    fn test_frame_shows_actor_and_obstacle() {
        let episode = Episode::with_seed(Seed::from_u64(1));
        let frame = render_to_string(&episode.snapshot());
        assert!(frame.contains("step     0  score   0"));
        assert!(frame.contains(ACTOR_CELL));
        // the fresh obstacle sits at the right edge, outside the grid
        assert!(!frame.contains(OBSTACLE_CELL));

        let obstacles = [Obstacle::new(200.0, 200.0)];
        let snapshot = EpisodeSnapshot {
            obstacles: &obstacles,
            ..episode.snapshot()
        };
        let frame = render_to_string(&snapshot);
        assert!(frame.contains(OBSTACLE_CELL));
        assert_eq!(frame.lines().filter(|l| l.starts_with('|')).count(), usize::from(ROWS));
    }

    #[test]
    fn test_grid_covers_playfield() {
        assert_eq!(f32::from(COLUMNS) * CELL_WIDTH, PLAYFIELD_WIDTH);
        assert_eq!(f32::from(ROWS) * CELL_HEIGHT, PLAYFIELD_HEIGHT);
    }

    #[test]
    fn test_each_frame_starts_from_a_cleared_screen() {
        let episode = Episode::with_seed(Seed::from_u64(3));
        let mut expected = Vec::<u8>::new();
        queue!(expected, MoveTo(0, 0), Clear(ClearType::All)).unwrap();

        let mut renderer = TextRenderer::new(vec![], Duration::ZERO);
        renderer.render(&episode.snapshot());
        renderer.render(&episode.snapshot());
        let output = renderer.writer;
        assert!(output.starts_with(&expected));
        let frames = output
            .windows(expected.len())
            .filter(|w| *w == expected.as_slice())
            .count();
        assert_eq!(frames, 2);
    }

    #[test]
    fn test_final_frame_reports_termination() {
        let mut episode = Episode::with_seed(Seed::from_u64(2));
        while !episode.step(false).1 {}
        let frame = render_to_string(&episode.snapshot());
        assert!(frame.contains("episode over: hit the floor"));
    }
}
