//! Scalability groups, activation conditions and streams.

use once_cell::sync::Lazy;

use super::{curve, parse_block, parse_block_body, trigger, KeywordTable};
use crate::error::StfError;
use crate::model::{Activation, ScalabilityGroup, Stream};
use crate::normalize::normalize_stream_volume;
use crate::reader::Reader;
use crate::units::Units;

static GROUP_KEYWORDS: Lazy<KeywordTable<ScalabilityGroup>> = Lazy::new(|| {
    KeywordTable::<ScalabilityGroup>::new()
        .on("activation", |r, g| {
            g.activation = Some(build_activation(r)?);
            Ok(())
        })
        .on("deactivation", |r, g| {
            g.deactivation = Some(build_activation(r)?);
            Ok(())
        })
        .on("streams", |r, g| {
            g.streams = Some(build_streams(r, g.volume)?);
            Ok(())
        })
        .on("volume", |r, g| {
            g.volume = r.read_float_block(Units::None)?;
            Ok(())
        })
        .on("stereo", |r, g| {
            g.stereo = r.read_bool_flag(true)?;
            Ok(())
        })
        .on("ignore3d", |r, g| {
            g.ignore_3d = r.read_bool_flag(true)?;
            Ok(())
        })
});

static ACTIVATION_KEYWORDS: Lazy<KeywordTable<Activation>> = Lazy::new(|| {
    KeywordTable::<Activation>::new()
        .on("externalcam", |r, a| {
            a.external_cam = r.read_bool_flag(true)?;
            Ok(())
        })
        .on("cabcam", |r, a| {
            a.cab_cam = r.read_bool_flag(true)?;
            Ok(())
        })
        .on("passengercam", |r, a| {
            a.passenger_cam = r.read_bool_flag(true)?;
            Ok(())
        })
        .on("distance", |r, a| {
            a.distance = r.read_float_block(Units::Distance)?;
            Ok(())
        })
        .on("tracktype", |r, a| {
            a.track_type = r.read_int_block(Units::None)?;
            Ok(())
        })
});

/// Streams under construction, with the volume new streams start from.
struct StreamsDraft {
    inherited_volume: f32,
    streams: Vec<Stream>,
}

static STREAMS_KEYWORDS: Lazy<KeywordTable<StreamsDraft>> = Lazy::new(|| {
    KeywordTable::<StreamsDraft>::new().on("stream", |r, d| {
        let stream = build_stream(r, d.inherited_volume)?;
        d.streams.push(stream);
        Ok(())
    })
});

static STREAM_KEYWORDS: Lazy<KeywordTable<Stream>> = Lazy::new(|| {
    KeywordTable::<Stream>::new()
        .on("priority", |r, s| {
            s.priority = r.read_int_block(Units::None)?;
            Ok(())
        })
        .on("triggers", |r, s| {
            s.triggers = trigger::build_triggers(r)?;
            Ok(())
        })
        .on("volumecurve", |r, s| {
            s.volume_curve = Some(curve::build_curve(r)?);
            Ok(())
        })
        .on("frequencycurve", |r, s| {
            s.frequency_curve = Some(curve::build_curve(r)?);
            Ok(())
        })
        .on("volume", |r, s| {
            s.volume = r.read_float_block(Units::None)?;
            Ok(())
        })
});

/// `ScalabiltyGroup ( level ... )`, positioned after the keyword.
pub(crate) fn build_group(r: &mut dyn Reader) -> Result<ScalabilityGroup, StfError> {
    r.must_match("(")?;
    let detail_level = r.read_int(Units::None)?;
    let mut group = ScalabilityGroup::new(detail_level);
    parse_block_body(r, &mut group, &GROUP_KEYWORDS)?;
    Ok(group)
}

pub(crate) fn build_activation(r: &mut dyn Reader) -> Result<Activation, StfError> {
    let mut activation = Activation::default();
    parse_block(r, &mut activation, &ACTIVATION_KEYWORDS)?;
    Ok(activation)
}

/// `Streams ( count Stream ( ... ) ... )`. Every parsed stream is kept even
/// when the declared count disagrees.
pub(crate) fn build_streams(
    r: &mut dyn Reader,
    inherited_volume: f32,
) -> Result<Vec<Stream>, StfError> {
    r.must_match("(")?;
    let declared = r.read_int(Units::None)?;
    let mut draft = StreamsDraft {
        inherited_volume,
        streams: Vec::new(),
    };
    parse_block_body(r, &mut draft, &STREAMS_KEYWORDS)?;

    let found = draft.streams.len();
    if i64::from(declared) != found as i64 {
        r.warn(&format!(
            "stream count mismatch: found {}, expected {}",
            found, declared
        ));
        for (i, stream) in draft.streams.iter().enumerate() {
            let kinds: Vec<&str> = stream.triggers.iter().map(|t| t.kind.name()).collect();
            log::debug!(
                "stream {}: priority {}, volume {}, triggers [{}]",
                i,
                stream.priority,
                stream.volume,
                kinds.join(", ")
            );
        }
    }
    Ok(draft.streams)
}

pub(crate) fn build_stream(r: &mut dyn Reader, inherited_volume: f32) -> Result<Stream, StfError> {
    let mut stream = Stream::new(inherited_volume);
    parse_block(r, &mut stream, &STREAM_KEYWORDS)?;
    stream.volume = normalize_stream_volume(stream.volume);
    Ok(stream)
}
