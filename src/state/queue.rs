/// Ordered queue of pending images with single-step back-navigation
///
/// The queue is fixed at startup. Advancing pushes the departed index onto
/// the history stack; going back pops it. History is bounded by the queue
/// length and never deletes files already written to the output folder.

use crate::scan::ImageTask;

#[derive(Debug)]
pub struct ImageQueue {
    tasks: Vec<ImageTask>,
    current: usize,
    history: Vec<usize>,
}

impl ImageQueue {
    pub fn new(tasks: Vec<ImageTask>) -> Self {
        Self {
            tasks,
            current: 0,
            history: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Zero-based index of the current image (equals `len` when finished).
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&ImageTask> {
        self.tasks.get(self.current)
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.tasks.len()
    }

    /// Move to the next image, remembering where we came from.
    pub fn advance(&mut self) {
        self.history.push(self.current);
        self.current += 1;
    }

    /// Return to the previously visited image. False when there is nowhere
    /// to go back to; the caller reports the notice.
    pub fn go_back(&mut self) -> bool {
        match self.history.pop() {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }
}
