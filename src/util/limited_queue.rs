use std::{collections::VecDeque, ops::Index};

/// An indexed queue that drops its oldest element once `capacity` is
/// exceeded.
///
/// Index `0` is the oldest element still stored.
#[derive(Clone, Debug)]
pub struct LimitedQueue<T> {
    queue: VecDeque<T>,
    capacity: usize,
}

impl<T> LimitedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, elem: T) {
        if self.capacity == 0 {
            return;
        }

        if self.queue.len() == self.capacity {
            self.queue.pop_front();
        }

        self.queue.push_back(elem);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

impl<T> Index<usize> for LimitedQueue<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.queue[idx]
    }
}

#[cfg(test)]
mod tests {
    use std::cmp;

    use super::LimitedQueue;

    #[test]
    fn empty() {
        let queue = LimitedQueue::<u8>::new(4);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn overfull() {
        let mut queue = LimitedQueue::new(4);

        for i in 1..=5_u8 {
            queue.push(i);
            assert_eq!(cmp::min(usize::from(i), 4), queue.len());
        }

        assert_eq!(queue[0], 2);
        assert_eq!(queue[3], 5);
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut queue = LimitedQueue::new(0);
        queue.push(1);
        assert_eq!(queue.len(), 0);
    }
}
