use std::{fmt::Debug, time::Instant};

use crate::{event::TICK_FPS, ui::theme::Theme};
use tui_logger::*;

pub struct UiState {
    pub tick: f64,
    pub time: Instant,
    pub theme: Theme,
    pub debug: bool,
    pub logger_state: TuiWidgetState,
}

impl Debug for UiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiState")
            .field("tick", &self.tick)
            .field("time", &self.time)
            .field("debug", &self.debug)
            .finish()
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            logger_state: TuiWidgetState::new(),
            tick: Default::default(),
            time: Instant::now(),
            theme: Theme::dark(),
            debug: false,
        }
    }
}

impl UiState {
    pub fn tick(&mut self) {
        self.tick += 1.0;
        if self.tick > 2.0 * TICK_FPS {
            self.tick = 0.0;
            self.time = Instant::now();
        }
    }

    pub fn step_of_8_in_1_second(&self) -> usize {
        (self.tick * 8.0 / TICK_FPS) as usize % 8
    }

    pub fn step_of_4_in_1_second(&self) -> usize {
        (self.tick * 4.0 / TICK_FPS) as usize % 4
    }

    pub fn step_of_8_in_2_second(&self) -> usize {
        (self.tick * 4.0 / TICK_FPS) as usize % 8
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKS_AND_STEPS: [(usize, usize, usize, usize); 13] = [
        (0, 0, 0, 0),
        (1, 0, 0, 0),
        (2, 0, 0, 0),
        (1, 0, 1, 0),
        (3, 0, 1, 0),
        (1, 1, 2, 1),
        (3, 1, 2, 1),
        (1, 1, 3, 1),
        (2, 1, 3, 1),
        (1, 2, 4, 2),
        (15, 0, 0, 4),
        (15, 2, 4, 6),
        (15, 0, 0, 0),
    ];

    #[test]
    fn all_the_throbs() {
        let mut t = UiState::default();
        let mut c = 0;
        for (ticks, s4i1, s8i1, s8i2) in TICKS_AND_STEPS {
            for _ in 0..ticks {
                t.tick();
                c += 1;
            }
            assert_eq!(
                t.step_of_4_in_1_second(),
                s4i1,
                "After {} ticks, 4/1 should be {}",
                c,
                s4i1
            );
            assert_eq!(
                t.step_of_8_in_1_second(),
                s8i1,
                "After {} ticks, 8/1 should be {}",
                c,
                s8i1
            );
            assert_eq!(
                t.step_of_8_in_2_second(),
                s8i2,
                "After {} ticks, 8/2 should be {}",
                c,
                s8i2
            );
        }
    }
}
