use std::{collections::VecDeque, mem};

use log::debug;

use crate::engine::Engine;

pub type Job = Box<dyn FnOnce(&mut dyn Engine)>;

/// FIFO queue of world-mutating work, drained at tick boundaries.
#[derive(Default)]
pub struct Scheduler {
    queue: VecDeque<Job>,
    ticks: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a job for the next tick.
    pub fn run<F>(&mut self, job: F)
    where
        F: FnOnce(&mut dyn Engine) + 'static,
    {
        self.queue.push_back(Box::new(job));
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs everything queued before this call, in submission order. Returns the
    /// number of jobs run.
    pub fn tick(&mut self, engine: &mut dyn Engine) -> usize {
        self.ticks += 1;

        let jobs = mem::take(&mut self.queue);
        let count = jobs.len();

        if count > 0 {
            debug!("Tick {}: running {} deferred jobs", self.ticks, count);
        }

        for job in jobs {
            job(&mut *engine);
        }

        count
    }
}
