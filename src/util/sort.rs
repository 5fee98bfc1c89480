use std::cmp::Ordering;

const QUICK_SORT_DEPTH_THRESHOLD: usize = 32;

/// osu!'s legacy sorting algorithm.
///
/// It is *not* stable and the exact order of equal elements matters for
/// mania conversion, so it must be used wherever osu! uses it.
///
/// <https://github.com/ppy/osu/blob/e669e28dc9b6d79d82a36053e6a279de8dafddd1/osu.Game.Rulesets.Mania/MathUtils/LegacySortHelper.cs#L19>
pub fn osu_legacy<T, F>(keys: &mut [T], cmp: F)
where
    F: Fn(&T, &T) -> Ordering,
{
    if keys.len() < 2 {
        return;
    }

    depth_limited_quick_sort(keys, 0, keys.len() - 1, QUICK_SORT_DEPTH_THRESHOLD, &cmp);
}

fn depth_limited_quick_sort<T, F>(
    keys: &mut [T],
    mut left: usize,
    mut right: usize,
    mut depth_limit: usize,
    cmp: &F,
) where
    F: Fn(&T, &T) -> Ordering,
{
    loop {
        if depth_limit == 0 {
            heap_sort(keys, left, right, cmp);

            return;
        }

        let mut i = left;
        let mut j = right;

        let mut mid = i + ((j - i) >> 1);

        swap_if_greater(keys, cmp, i, mid);
        swap_if_greater(keys, cmp, i, j);
        swap_if_greater(keys, cmp, mid, j);

        loop {
            while cmp(&keys[i], &keys[mid]).is_lt() {
                i += 1;
            }

            while cmp(&keys[mid], &keys[j]).is_lt() {
                j -= 1;
            }

            match i.cmp(&j) {
                Ordering::Less => {
                    keys.swap(i, j);

                    // The pivot moves along with the swap
                    if mid == i {
                        mid = j;
                    } else if mid == j {
                        mid = i;
                    }
                }
                Ordering::Equal => {}
                Ordering::Greater => break,
            }

            i += 1;
            j = j.saturating_sub(1);

            if i > j {
                break;
            }
        }

        depth_limit -= 1;

        if j.saturating_sub(left) <= right - i {
            if left < j {
                depth_limited_quick_sort(keys, left, j, depth_limit, cmp);
            }

            left = i;
        } else {
            if i < right {
                depth_limited_quick_sort(keys, i, right, depth_limit, cmp);
            }

            right = j;
        }

        if left >= right {
            break;
        }
    }
}

fn heap_sort<T, F>(keys: &mut [T], lo: usize, hi: usize, cmp: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    let n = hi - lo + 1;

    for i in (1..=n / 2).rev() {
        down_heap(keys, i, n, lo, cmp);
    }

    for i in (2..=n).rev() {
        keys.swap(lo, lo + i - 1);
        down_heap(keys, 1, i - 1, lo, cmp);
    }
}

fn down_heap<T, F>(keys: &mut [T], mut i: usize, n: usize, lo: usize, cmp: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    while i <= n / 2 {
        let mut child = 2 * i;

        if child < n && cmp(&keys[lo + child - 1], &keys[lo + child]).is_lt() {
            child += 1;
        }

        if cmp(&keys[lo + i - 1], &keys[lo + child - 1]).is_ge() {
            break;
        }

        keys.swap(lo + i - 1, lo + child - 1);
        i = child;
    }
}

fn swap_if_greater<T, F>(keys: &mut [T], cmp: &F, a: usize, b: usize)
where
    F: Fn(&T, &T) -> Ordering,
{
    if a != b && cmp(&keys[a], &keys[b]).is_gt() {
        keys.swap(a, b);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::osu_legacy;

    proptest! {
        #[test]
        fn sorts_like_std(mut values in prop::collection::vec(-1000_i32..1000, 0..300)) {
            let mut expected = values.clone();
            expected.sort_unstable();

            osu_legacy(&mut values, i32::cmp);

            prop_assert_eq!(values, expected);
        }
    }
}
