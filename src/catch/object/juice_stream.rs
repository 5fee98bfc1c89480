use std::vec::Drain;

use rosu_map::section::hit_objects::{CurveBuffers, SliderEvent, SliderEventType, SliderEventsIter};

use crate::{
    catch::{attributes::ObjectCountBuilder, PLAYFIELD_WIDTH},
    model::{
        beatmap::Beatmap,
        control_point::{DifficultyPoint, TimingPoint},
        hit_object::Slider,
        mode::GameMode,
    },
};

const BASE_SCORING_DIST: f64 = 100.0;

/// The nested objects of a slider in osu!catch.
pub struct JuiceStream<'a> {
    pub nested_objects: Drain<'a, NestedJuiceStreamObject>,
}

impl<'a> JuiceStream<'a> {
    pub fn new(
        x: f32,
        start_time: f64,
        slider: &Slider,
        map: &Beatmap,
        count: &mut ObjectCountBuilder,
        bufs: &'a mut JuiceStreamBufs,
    ) -> Self {
        let beat_len = map
            .timing_point_at(start_time)
            .map_or(TimingPoint::DEFAULT_BEAT_LEN, |point| point.beat_len);

        let slider_velocity = map
            .difficulty_point_at(start_time)
            .map_or(DifficultyPoint::DEFAULT_SLIDER_VELOCITY, |point| {
                point.slider_velocity
            });

        let path = slider.curve(GameMode::Catch, &mut bufs.curve);

        let velocity = BASE_SCORING_DIST * map.slider_multiplier / beat_len * slider_velocity;
        let tick_dist =
            BASE_SCORING_DIST * map.slider_multiplier / map.slider_tick_rate * slider_velocity;

        let span_count = slider.span_count() as f64;
        let duration = span_count * path.dist() / velocity;
        let span_duration = duration / span_count;

        let events = SliderEventsIter::new(
            start_time,
            span_duration,
            velocity,
            tick_dist,
            path.dist(),
            slider.span_count() as i32,
            &mut bufs.ticks,
        );

        bufs.nested_objects.clear();
        let mut last_event_time: Option<f64> = None;

        for e in events {
            let gap = last_event_time.map_or(0.0, |last| e.time - last);

            for _ in 0..tiny_droplets_between(gap) {
                count.record_tiny_droplet();

                // Position and time are irrelevant for tiny droplets
                bufs.nested_objects.push(NestedJuiceStreamObject {
                    pos: 0.0,
                    start_time: 0.0,
                    kind: NestedJuiceStreamObjectKind::TinyDroplet,
                });
            }

            last_event_time = Some(e.time);

            let kind = match e.kind {
                SliderEventType::Tick => {
                    count.record_droplet();

                    NestedJuiceStreamObjectKind::Droplet
                }
                SliderEventType::Head | SliderEventType::Repeat | SliderEventType::Tail => {
                    count.record_fruit();

                    NestedJuiceStreamObjectKind::Fruit
                }
                SliderEventType::LastTick => continue,
            };

            bufs.nested_objects.push(NestedJuiceStreamObject {
                pos: (x + path.position_at(e.path_progress).x).clamp(0.0, PLAYFIELD_WIDTH),
                start_time: e.time,
                kind,
            });
        }

        Self {
            nested_objects: bufs.nested_objects.drain(..),
        }
    }
}

/// Gaps above 80ms are filled with tiny droplets at most 100ms apart.
fn tiny_droplets_between(gap: f64) -> usize {
    if gap <= 80.0 {
        return 0;
    }

    let mut step = gap;

    while step > 100.0 {
        step /= 2.0;
    }

    let mut count = 0;
    let mut t = step;

    while t < gap {
        count += 1;
        t += step;
    }

    count
}

pub struct NestedJuiceStreamObject {
    pub pos: f32,
    pub start_time: f64,
    pub kind: NestedJuiceStreamObjectKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NestedJuiceStreamObjectKind {
    Fruit,
    Droplet,
    TinyDroplet,
}

/// Buffers that are reused across all juice streams of a map.
#[derive(Default)]
pub struct JuiceStreamBufs {
    pub nested_objects: Vec<NestedJuiceStreamObject>,
    pub curve: CurveBuffers,
    pub ticks: Vec<SliderEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_gaps_have_no_tiny_droplets() {
        assert_eq!(tiny_droplets_between(0.0), 0);
        assert_eq!(tiny_droplets_between(80.0), 0);
    }

    #[test]
    fn tiny_droplets_are_spread_evenly() {
        // 90ms step, nothing fits before the next tick
        assert_eq!(tiny_droplets_between(90.0), 0);
        // 75ms steps
        assert_eq!(tiny_droplets_between(150.0), 1);
        // 100ms steps
        assert_eq!(tiny_droplets_between(400.0), 3);
    }
}
