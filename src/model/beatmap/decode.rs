
use rosu_map::{
    section::{
        difficulty::{Difficulty, DifficultyState, ParseDifficultyError},
        events::{BreakPeriod, EventType, ParseEventTypeError},
        general::{GameMode, GeneralKey, ParseGameModeError},
        hit_objects::{
            hit_samples::{HitSoundType, ParseHitSoundTypeError},
            HitObjectType, ParseHitObjectTypeError, PathControlPoint, PathType,
        },
        timing_points::{ControlPoint, EffectFlags, ParseEffectFlagsError},
    },
    util::{KeyValue, ParseNumber, ParseNumberError, Pos, StrExt, MAX_PARSE_VALUE},
    DecodeBeatmap, DecodeState,
};

use crate::{
    model::{
        control_point::{point_at, DifficultyPoint, EffectPoint, TimingPoint},
        hit_object::{HitObject, HitObjectKind, HoldNote, Slider, Spinner},
    },
    util::{float_ext::FloatExt, sort},
};

use super::{Beatmap, DEFAULT_STACK_LENIENCY};

/// The state of a [`Beatmap`] while it is being decoded.
pub struct BeatmapState {
    version: i32,
    stack_leniency: f32,
    mode: GameMode,
    difficulty: DifficultyState,
    breaks: Vec<BreakPeriod>,
    timing_points: Vec<TimingPoint>,
    difficulty_points: Vec<DifficultyPoint>,
    effect_points: Vec<EffectPoint>,
    hit_objects: Vec<HitObject>,
    hit_sounds: Vec<HitSoundType>,

    pending_control_points_time: f64,
    pending_timing_point: Option<TimingPoint>,
    pending_difficulty_point: Option<DifficultyPoint>,
    pending_effect_point: Option<EffectPoint>,

    curve_points: Vec<PathControlPoint>,
    vertices: Vec<PathControlPoint>,
}

impl BeatmapState {
    fn add_pending_point<P: Pending>(&mut self, time: f64, point: P, timing_change: bool) {
        if time.not_eq(self.pending_control_points_time) {
            self.flush_pending_points();
        }

        if timing_change {
            point.push_front(self);
        } else {
            point.push_back(self);
        }

        self.pending_control_points_time = time;
    }

    fn flush_pending_points(&mut self) {
        if let Some(point) = self.pending_timing_point.take() {
            self.add_control_point(point);
        }

        if let Some(point) = self.pending_difficulty_point.take() {
            self.add_control_point(point);
        }

        if let Some(point) = self.pending_effect_point.take() {
            self.add_control_point(point);
        }
    }

    fn add_control_point<P: ControlPoint<Self>>(&mut self, point: P) {
        if !point.check_already_existing(self) {
            point.add(self);
        }
    }

    /// Parses the slider specific fields up to and including the node banks.
    fn parse_slider<'a, I>(&mut self, split: &mut I, pos: Pos) -> Result<Slider, ParseBeatmapError>
    where
        I: Iterator<Item = &'a str>,
    {
        let (path, repeats) = split
            .next()
            .zip(split.next())
            .ok_or(ParseBeatmapError::InvalidHitObjectLine)?;

        let repeats = repeats.parse_num::<i32>()?;

        if repeats > MAX_REPEAT_COUNT {
            return Err(ParseBeatmapError::InvalidRepeatCount);
        }

        let expected_dist = split
            .next()
            .map(|len| len.parse_with_limits(f64::from(MAX_COORDINATE_VALUE)))
            .transpose()?
            .map(|len| len.max(0.0))
            .filter(|len| len.not_eq(0.0));

        let node_sounds = split.next().map_or_else(Box::default, |sounds| {
            sounds
                .split('|')
                .map(|sound| sound.parse().unwrap_or_default())
                .collect()
        });

        let _node_banks = split.next();

        self.convert_path_str(path, pos)?;

        Ok(Slider {
            expected_dist,
            repeats: (repeats - 1).max(0) as usize,
            control_points: self.curve_points.drain(..).collect(),
            node_sounds,
        })
    }

    /// Parse the `|`-separated path of a slider into `self.curve_points`.
    ///
    /// A letter starts a new segment; the first point of each following
    /// segment doubles as the last point of the previous one.
    fn convert_path_str(&mut self, point_str: &str, offset: Pos) -> Result<(), ParseBeatmapError> {
        let point_split: Vec<&str> = point_str.split('|').collect();

        let mut start_idx = 0;
        let mut first = true;

        for end_idx in 1..point_split.len() {
            let is_letter = point_split[end_idx]
                .chars()
                .next()
                .ok_or(ParseBeatmapError::InvalidHitObjectLine)?
                .is_ascii_alphabetic();

            if !is_letter {
                continue;
            }

            let end_point = point_split.get(end_idx + 1).copied();
            self.convert_points(&point_split[start_idx..end_idx], end_point, first, offset)?;

            start_idx = end_idx;
            first = false;
        }

        if point_split.len() > start_idx {
            self.convert_points(&point_split[start_idx..], None, first, offset)?;
        }

        Ok(())
    }

    fn convert_points(
        &mut self,
        points: &[&str],
        end_point: Option<&str>,
        first: bool,
        offset: Pos,
    ) -> Result<(), ParseBeatmapError> {
        fn read_point(value: &str, start_pos: Pos) -> Result<PathControlPoint, ParseBeatmapError> {
            let mut v = value
                .split(':')
                .map(|s| s.parse_with_limits(f64::from(MAX_COORDINATE_VALUE)));

            let (x, y) = v
                .next()
                .zip(v.next())
                .ok_or(ParseBeatmapError::InvalidHitObjectLine)?;

            let pos = Pos::new(x? as i32 as f32, y? as i32 as f32);

            Ok(PathControlPoint::new(pos - start_pos))
        }

        fn is_linear(p0: Pos, p1: Pos, p2: Pos) -> bool {
            ((p1.y - p0.y) * (p2.x - p0.x)).eq((p1.x - p0.x) * (p2.y - p0.y))
        }

        let mut path_type = points
            .first()
            .copied()
            .map(PathType::new_from_str)
            .ok_or(ParseBeatmapError::InvalidHitObjectLine)?;

        let end_point_len = usize::from(end_point.is_some());

        self.vertices.clear();

        if first {
            self.vertices.push(PathControlPoint::default());
        }

        for &point in points.iter().skip(1) {
            self.vertices.push(read_point(point, offset)?);
        }

        if let Some(end_point) = end_point {
            self.vertices.push(read_point(end_point, offset)?);
        }

        if self.vertices.is_empty() {
            return Err(ParseBeatmapError::InvalidHitObjectLine);
        }

        if path_type == PathType::PERFECT_CURVE {
            if let [a, b, c] = self.vertices.as_slice() {
                if is_linear(a.pos, b.pos, c.pos) {
                    path_type = PathType::LINEAR;
                }
            } else {
                path_type = PathType::BEZIER;
            }
        }

        self.vertices[0].path_type = Some(path_type);

        // Duplicate consecutive vertices split the path into segments
        let last_idx = self.vertices.len() - end_point_len;
        let mut start_idx = 0;

        for end_idx in 1..last_idx {
            if self.vertices[end_idx].pos != self.vertices[end_idx - 1].pos {
                continue;
            }

            if path_type == PathType::CATMULL && end_idx > 1 {
                continue;
            }

            if end_idx == last_idx - 1 {
                continue;
            }

            self.vertices[end_idx - 1].path_type = Some(path_type);
            self.curve_points
                .extend_from_slice(&self.vertices[start_idx..end_idx]);

            start_idx = end_idx + 1;
        }

        let end_idx = last_idx.max(1);

        if end_idx > start_idx {
            self.curve_points
                .extend_from_slice(&self.vertices[start_idx..end_idx]);
        }

        Ok(())
    }
}

impl DecodeState for BeatmapState {
    fn create(version: i32) -> Self {
        Self {
            version,
            stack_leniency: DEFAULT_STACK_LENIENCY,
            mode: GameMode::Osu,
            difficulty: DifficultyState::create(version),
            breaks: Vec::new(),
            timing_points: Vec::with_capacity(1),
            difficulty_points: Vec::new(),
            effect_points: Vec::with_capacity(32),
            hit_objects: Vec::with_capacity(512),
            hit_sounds: Vec::with_capacity(512),
            pending_control_points_time: 0.0,
            pending_timing_point: None,
            pending_difficulty_point: None,
            pending_effect_point: None,
            curve_points: Vec::with_capacity(8),
            vertices: Vec::with_capacity(8),
        }
    }
}

impl From<BeatmapState> for Beatmap {
    fn from(mut state: BeatmapState) -> Self {
        state.flush_pending_points();

        let Difficulty {
            hp_drain_rate,
            circle_size,
            overall_difficulty,
            approach_rate,
            slider_multiplier,
            slider_tick_rate,
        } = state.difficulty.into();

        // Hit sounds must stay aligned with their hit object
        let mut pairs: Vec<_> = state
            .hit_objects
            .into_iter()
            .zip(state.hit_sounds)
            .collect();

        pairs.sort_by(|(a, _), (b, _)| a.start_time.total_cmp(&b.start_time));

        if state.mode == GameMode::Mania {
            sort::osu_legacy(&mut pairs, |(a, _), (b, _)| {
                a.start_time.total_cmp(&b.start_time)
            });
        }

        let (hit_objects, hit_sounds): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();

        tracing::debug!(
            version = state.version,
            mode = ?state.mode,
            n_objects = hit_objects.len(),
            "decoded beatmap"
        );

        Beatmap {
            version: state.version,
            is_convert: false,
            stack_leniency: state.stack_leniency,
            mode: state.mode,
            ar: approach_rate,
            cs: circle_size,
            hp: hp_drain_rate,
            od: overall_difficulty,
            slider_multiplier,
            slider_tick_rate,
            breaks: state.breaks,
            timing_points: state.timing_points,
            difficulty_points: state.difficulty_points,
            effect_points: state.effect_points,
            hit_objects,
            hit_sounds,
        }
    }
}

/// All the ways that parsing a [`Beatmap`] can fail.
#[derive(Debug, thiserror::Error)]
pub enum ParseBeatmapError {
    #[error("failed to parse effect flags")]
    EffectFlags(#[from] ParseEffectFlagsError),
    #[error("failed to parse event type")]
    EventType(#[from] ParseEventTypeError),
    #[error("failed to parse hit object type")]
    HitObjectType(#[from] ParseHitObjectTypeError),
    #[error("failed to parse hit sound type")]
    HitSoundType(#[from] ParseHitSoundTypeError),
    #[error("invalid event line")]
    InvalidEventLine,
    #[error("repeat count is way too high")]
    InvalidRepeatCount,
    #[error("invalid timing point line")]
    InvalidTimingPointLine,
    #[error("invalid hit object line")]
    InvalidHitObjectLine,
    #[error("failed to parse mode")]
    Mode(#[from] ParseGameModeError),
    #[error("failed to parse number")]
    Number(#[from] ParseNumberError),
    #[error("beat length cannot be NaN in a timing control point")]
    TimingControlPointNaN,
    #[error("unknown hit object type")]
    UnknownHitObjectType,
}

impl From<ParseDifficultyError> for ParseBeatmapError {
    fn from(e: ParseDifficultyError) -> Self {
        match e {
            ParseDifficultyError::Number(e) => Self::Number(e),
        }
    }
}

const MAX_COORDINATE_VALUE: i32 = 131_072;
const MAX_REPEAT_COUNT: i32 = 9000;

/// Coordinates are truncated to whole osu!pixels.
fn parse_coordinate(s: &str) -> Result<f32, ParseNumberError> {
    s.parse_with_limits(MAX_COORDINATE_VALUE as f32)
        .map(|n| n as i32 as f32)
}

/// Whether the `normal:additional:index:volume:filename` bank info names a
/// custom sample file, which replaces the regular hit sound.
fn has_custom_sample(bank_info: Option<&str>) -> Result<bool, ParseNumberError> {
    let Some(bank_info) = bank_info.filter(|s| !s.is_empty()) else {
        return Ok(false);
    };

    let mut split = bank_info.split(':');

    for _ in 0..4 {
        split.next().map(i32::parse).transpose()?;
    }

    Ok(split.next().is_some_and(|filename| !filename.is_empty()))
}

impl DecodeBeatmap for Beatmap {
    type Error = ParseBeatmapError;
    type State = BeatmapState;

    fn parse_general(state: &mut Self::State, line: &str) -> Result<(), Self::Error> {
        let Ok(KeyValue { key, value }) = KeyValue::parse(line.trim_comment()) else {
            return Ok(());
        };

        match key {
            GeneralKey::StackLeniency => state.stack_leniency = value.parse_num()?,
            GeneralKey::Mode => state.mode = value.parse()?,
            _ => {}
        }

        Ok(())
    }

    fn parse_editor(_: &mut Self::State, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn parse_metadata(_: &mut Self::State, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn parse_difficulty(state: &mut Self::State, line: &str) -> Result<(), Self::Error> {
        Difficulty::parse_difficulty(&mut state.difficulty, line).map_err(ParseBeatmapError::from)
    }

    fn parse_events(state: &mut Self::State, line: &str) -> Result<(), Self::Error> {
        let mut split = line.trim_comment().split(',');

        let event_type: EventType = split
            .next()
            .ok_or(ParseBeatmapError::InvalidEventLine)?
            .parse()?;

        if event_type == EventType::Break {
            let Some((start_time, end_time)) = split.next().zip(split.next()) else {
                return Err(ParseBeatmapError::InvalidEventLine);
            };

            let start_time = f64::parse(start_time)?;
            let end_time = start_time.max(f64::parse(end_time)?);

            state.breaks.push(BreakPeriod {
                start_time,
                end_time,
            });
        }

        Ok(())
    }

    fn parse_timing_points(state: &mut Self::State, line: &str) -> Result<(), Self::Error> {
        let mut split = line.trim_comment().split(',');

        let (time, beat_len) = split
            .next()
            .zip(split.next())
            .ok_or(ParseBeatmapError::InvalidTimingPointLine)?;

        let time = time.parse_num::<f64>()?;

        // NaN is only an error for timing changes
        let beat_len = beat_len
            .trim()
            .parse::<f64>()
            .map_err(ParseNumberError::InvalidFloat)?;

        if beat_len < f64::from(-MAX_PARSE_VALUE) {
            return Err(ParseNumberError::NumberUnderflow.into());
        } else if beat_len > f64::from(MAX_PARSE_VALUE) {
            return Err(ParseNumberError::NumberOverflow.into());
        }

        let speed_multiplier = if beat_len < 0.0 {
            100.0 / -beat_len
        } else {
            1.0
        };

        let _ = split.next(); // timing signature
        let _ = split.next(); // sample set
        let _ = split.next(); // custom sample bank
        let _ = split.next(); // sample volume

        let timing_change = split
            .next()
            .map_or(true, |next| matches!(next.chars().next(), Some('1')));

        let kiai = split
            .next()
            .map(str::parse::<EffectFlags>)
            .transpose()?
            .is_some_and(|flags| flags.has_flag(EffectFlags::KIAI));

        if timing_change {
            if beat_len.is_nan() {
                return Err(ParseBeatmapError::TimingControlPointNaN);
            }

            let timing = TimingPoint::new(time, beat_len);
            state.add_pending_point(time, timing, timing_change);
        }

        let difficulty = DifficultyPoint::new(time, beat_len, speed_multiplier);
        state.add_pending_point(time, difficulty, timing_change);

        let mut effect = EffectPoint::new(time, kiai);

        // osu!taiko and osu!mania scroll by effect points
        if matches!(state.mode, GameMode::Taiko | GameMode::Mania) {
            effect.scroll_speed = speed_multiplier;
        }

        state.add_pending_point(time, effect, timing_change);

        state.pending_control_points_time = time;

        Ok(())
    }

    fn parse_colors(_: &mut Self::State, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn parse_hit_objects(state: &mut Self::State, line: &str) -> Result<(), Self::Error> {
        let mut split = line.trim_comment().split(',');

        let (Some(x), Some(y), Some(start_time), Some(kind), Some(sound)) = (
            split.next(),
            split.next(),
            split.next(),
            split.next(),
            split.next(),
        ) else {
            return Err(ParseBeatmapError::InvalidHitObjectLine);
        };

        let pos = Pos::new(parse_coordinate(x)?, parse_coordinate(y)?);
        let start_time = f64::parse(start_time)?;
        let object_type: HitObjectType = kind.parse()?;
        let mut sound: HitSoundType = sound.parse()?;

        let (kind, bank_info) = if object_type.has_flag(HitObjectType::CIRCLE) {
            (HitObjectKind::Circle, split.next())
        } else if object_type.has_flag(HitObjectType::SLIDER) {
            let slider = state.parse_slider(&mut split, pos)?;

            (HitObjectKind::Slider(slider), split.next())
        } else if object_type.has_flag(HitObjectType::SPINNER) {
            let end_time = split
                .next()
                .ok_or(ParseBeatmapError::InvalidHitObjectLine)?
                .parse_num::<f64>()?;

            let spinner = Spinner {
                duration: (end_time - start_time).max(0.0),
            };

            (HitObjectKind::Spinner(spinner), split.next())
        } else if object_type.has_flag(HitObjectType::HOLD) {
            // Mania holds store their end time in front of the bank info
            match split.next().filter(|s| !s.is_empty()) {
                Some(s) => {
                    let (end_time, bank_info) = s
                        .split_once(':')
                        .ok_or(ParseBeatmapError::InvalidHitObjectLine)?;

                    let duration = end_time.parse_num::<f64>()?.max(start_time) - start_time;

                    (HitObjectKind::Hold(HoldNote { duration }), Some(bank_info))
                }
                None => (HitObjectKind::Hold(HoldNote { duration: 0.0 }), None),
            }
        } else {
            return Err(ParseBeatmapError::UnknownHitObjectType);
        };

        if has_custom_sample(bank_info)? {
            sound = HitSoundType::default();
        }

        state.hit_objects.push(HitObject {
            pos,
            start_time,
            kind,
        });
        state.hit_sounds.push(sound);

        Ok(())
    }

    fn parse_variables(_: &mut Self::State, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn parse_catch_the_beat(_: &mut Self::State, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn parse_mania(_: &mut Self::State, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Control points at the same time are gathered before being added so that
/// a timing change takes precedence over an inherited point.
trait Pending: Sized {
    fn pending(state: &mut BeatmapState) -> &mut Option<Self>;

    fn push_front(self, state: &mut BeatmapState) {
        let pending = Self::pending(state);

        if pending.is_none() {
            *pending = Some(self);
        }
    }

    fn push_back(self, state: &mut BeatmapState) {
        *Self::pending(state) = Some(self);
    }
}

impl Pending for TimingPoint {
    fn pending(state: &mut BeatmapState) -> &mut Option<Self> {
        &mut state.pending_timing_point
    }
}

impl Pending for DifficultyPoint {
    fn pending(state: &mut BeatmapState) -> &mut Option<Self> {
        &mut state.pending_difficulty_point
    }
}

impl Pending for EffectPoint {
    fn pending(state: &mut BeatmapState) -> &mut Option<Self> {
        &mut state.pending_effect_point
    }
}

fn insert_sorted<P, F>(points: &mut Vec<P>, point: P, time: F)
where
    F: Fn(&P) -> f64,
{
    let t = time(&point);

    match points.binary_search_by(|point| time(point).total_cmp(&t)) {
        Err(i) => points.insert(i, point),
        Ok(i) => points[i] = point,
    }
}

impl ControlPoint<BeatmapState> for TimingPoint {
    fn check_already_existing(&self, _: &BeatmapState) -> bool {
        false
    }

    fn add(self, state: &mut BeatmapState) {
        insert_sorted(&mut state.timing_points, self, |p| p.time);
    }
}

impl ControlPoint<BeatmapState> for DifficultyPoint {
    fn check_already_existing(&self, state: &BeatmapState) -> bool {
        match point_at(&state.difficulty_points, self.time) {
            Some(existing) => self.is_redundant(existing),
            None => self.is_redundant(&DifficultyPoint::default()),
        }
    }

    fn add(self, state: &mut BeatmapState) {
        insert_sorted(&mut state.difficulty_points, self, |p| p.time);
    }
}

impl ControlPoint<BeatmapState> for EffectPoint {
    fn check_already_existing(&self, state: &BeatmapState) -> bool {
        match point_at(&state.effect_points, self.time) {
            Some(existing) => self.is_redundant(existing),
            None => self.is_redundant(&EffectPoint::default()),
        }
    }

    fn add(self, state: &mut BeatmapState) {
        insert_sorted(&mut state.effect_points, self, |p| p.time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "osu file format v14

[General]
StackLeniency: 0.5
Mode: 0

[Difficulty]
HPDrainRate:4
CircleSize:3.5
OverallDifficulty:7
ApproachRate:8.5
SliderMultiplier:1.6
SliderTickRate:2

[Events]
2,3000,5000

[TimingPoints]
0,400,4,2,0,50,1,0
1000,-50,4,2,0,50,0,1
1000,-50,4,2,0,50,0,1

[HitObjects]
256,192,2000,1,0,0:0:0:0:
100,100,500,2,0,B|200:100|200:200,2,150
256,192,6000,12,0,7000,0:0:0:0:
";

    #[test]
    fn decodes_sections() {
        let map: Beatmap = MAP.parse().unwrap();

        assert_eq!(map.version, 14);
        assert_eq!(map.mode, GameMode::Osu);
        assert!((map.stack_leniency - 0.5).abs() < f32::EPSILON);
        assert!((map.cs - 3.5).abs() < f32::EPSILON);
        assert!((map.ar - 8.5).abs() < f32::EPSILON);
        assert!(map.slider_multiplier.eq(1.6));

        assert_eq!(map.breaks.len(), 1);
        assert_eq!(map.timing_points.len(), 1);
        assert_eq!(map.difficulty_points.len(), 1);
        assert!(map.difficulty_points[0].slider_velocity.eq(2.0));
        assert_eq!(map.effect_points.len(), 1);
        assert!(map.effect_points[0].kiai);
    }

    #[test]
    fn sorts_objects_and_keeps_sounds_aligned() {
        let map: Beatmap = MAP.parse().unwrap();

        let times: Vec<_> = map.hit_objects.iter().map(|h| h.start_time).collect();
        assert_eq!(times, [500.0, 2000.0, 6000.0]);
        assert_eq!(map.hit_sounds.len(), 3);

        let HitObjectKind::Slider(ref slider) = map.hit_objects[0].kind else {
            panic!("expected slider");
        };

        assert_eq!(slider.repeats, 1);
        assert_eq!(slider.expected_dist, Some(150.0));
        assert_eq!(slider.control_points.len(), 3);
        assert_eq!(slider.control_points[0].path_type, Some(PathType::BEZIER));

        assert_eq!(
            map.hit_objects[2].kind,
            HitObjectKind::Spinner(Spinner { duration: 1000.0 })
        );
    }

    #[test]
    fn taiko_scrolls_by_effect_points() {
        let taiko = MAP.replace("Mode: 0", "Mode: 1");
        let map: Beatmap = taiko.parse().unwrap();

        assert_eq!(map.effect_points.len(), 1);
        assert!(map.effect_points[0].scroll_speed.eq(2.0));

        let map: Beatmap = MAP.parse().unwrap();
        assert!(map.effect_points[0].scroll_speed.eq(1.0));
    }

    #[test]
    fn skips_broken_hit_object() {
        let map = "osu file format v14\n\n[HitObjects]\n256,192\n64,64,1000,1,0\n";
        let map: Beatmap = map.parse().unwrap();

        let times: Vec<_> = map.hit_objects.iter().map(|h| h.start_time).collect();
        assert_eq!(times, [1000.0]);
        assert_eq!(map.hit_sounds.len(), 1);
    }
}
