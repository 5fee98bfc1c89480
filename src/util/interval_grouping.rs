use std::ops::Range;

use crate::util::float_ext::FloatExt;

/// Maximum difference of two intervals in ms for them to count as equal.
const MARGIN_OF_ERROR: f64 = 5.0;

/// Something that is spaced by an interval from its predecessor.
pub trait HasInterval {
    fn interval(&self) -> f64;
}

/// Split `items` into consecutive groups of roughly equal intervals.
///
/// The groups are returned as index ranges into `items`.
pub const fn group_by_interval<T: HasInterval>(items: &[T]) -> GroupedByInterval<'_, T> {
    GroupedByInterval { items, i: 0 }
}

pub struct GroupedByInterval<'a, T> {
    items: &'a [T],
    i: usize,
}

impl<T: HasInterval> Iterator for GroupedByInterval<'_, T> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        (self.i < self.items.len()).then(|| self.next_group())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len() - self.i;

        (usize::from(remaining > 0), Some(remaining))
    }
}

impl<T: HasInterval> GroupedByInterval<'_, T> {
    fn next_group(&mut self) -> Range<usize> {
        let &mut Self { items, ref mut i } = self;
        let start = *i;

        // The first two items of a group are never compared
        *i += 1;

        while *i < items.len() - 1 {
            let curr = items[*i].interval();
            let next = items[*i + 1].interval();

            if !curr.almost_eq(next, MARGIN_OF_ERROR) {
                // An increased interval still belongs to the group
                if next > curr + MARGIN_OF_ERROR {
                    *i += 1;
                }

                return start..*i;
            }

            *i += 1;
        }

        // Flat ending
        let len = items.len();

        if len > 2
            && *i < len
            && items[len - 1]
                .interval()
                .almost_eq(items[len - 2].interval(), MARGIN_OF_ERROR)
        {
            *i += 1;
        }

        start..*i
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl HasInterval for f64 {
        fn interval(&self) -> f64 {
            *self
        }
    }

    fn groups(intervals: &[f64]) -> Vec<Range<usize>> {
        group_by_interval(intervals).collect()
    }

    #[test]
    fn empty() {
        assert!(groups(&[]).is_empty());
    }

    #[test]
    fn constant_intervals_form_one_group() {
        assert_eq!(groups(&[100.0; 6]), [0..6]);
    }

    #[test]
    fn decreased_interval_starts_new_group() {
        assert_eq!(groups(&[200.0, 200.0, 200.0, 100.0, 100.0]), [0..2, 2..5]);
    }

    #[test]
    fn increased_interval_joins_previous_group() {
        assert_eq!(groups(&[100.0, 100.0, 100.0, 200.0, 200.0]), [0..3, 3..5]);
    }

    #[test]
    fn margin_of_error() {
        assert_eq!(groups(&[100.0, 103.0, 98.0, 102.0]), [0..4]);
    }
}
