use std::path::Path;

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{fmt_f64, ExportError};
use crate::trajectory::{Pose, Trajectory};

/// Serialize a trajectory as the `sensor_data.xml` camera description for
/// Meshroom/AliceVision import.
///
/// The document is a `<SensorData>` root wrapping one
/// `<View sensorId="0" poseId="N">` per pose, where N is the pose's
/// 0-based position in trajectory order. Every view carries an
/// `<Img image="..."/>` reference plus `GPS`, `Orientation`,
/// `FocalLength`, `Aperture` and `SensorWidth` metadata entries.
///
/// All views share sensor id 0: the pipeline assumes a single fixed
/// camera model per video.
pub fn trajectory_to_sensor_xml(trajectory: &Trajectory) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("SensorData")))
        .map_err(xml_err)?;

    for (pose_id, pose) in trajectory.iter().enumerate() {
        write_view(&mut writer, pose_id, pose)?;
    }

    writer
        .write_event(Event::End(BytesStart::new("SensorData").to_end()))
        .map_err(xml_err)?;

    String::from_utf8(writer.into_inner()).map_err(|e| ExportError::Xml(e.to_string()))
}

fn write_view(writer: &mut Writer<Vec<u8>>, pose_id: usize, pose: &Pose) -> Result<(), ExportError> {
    let mut view = BytesStart::new("View");
    view.push_attribute(("sensorId", "0"));
    view.push_attribute(("poseId", pose_id.to_string().as_str()));
    writer.write_event(Event::Start(view)).map_err(xml_err)?;

    let mut img = BytesStart::new("Img");
    img.push_attribute(("image", pose.frame.as_str()));
    writer.write_event(Event::Empty(img)).map_err(xml_err)?;

    let o = &pose.orientation;
    let c = &pose.camera;
    let gps = format!(
        "{},{},{}",
        fmt_f64(pose.lat),
        fmt_f64(pose.lon),
        fmt_f64(pose.alt)
    );
    let orientation = format!(
        "{},{},{}",
        fmt_f64(o.roll),
        fmt_f64(o.pitch),
        fmt_f64(o.yaw)
    );

    write_metadata(writer, "GPS", &gps)?;
    write_metadata(writer, "Orientation", &orientation)?;
    write_metadata(writer, "FocalLength", &fmt_f64(c.focal_length))?;
    write_metadata(writer, "Aperture", &fmt_f64(c.aperture))?;
    write_metadata(writer, "SensorWidth", &fmt_f64(c.sensor_width))?;

    writer
        .write_event(Event::End(BytesStart::new("View").to_end()))
        .map_err(xml_err)
}

fn write_metadata(writer: &mut Writer<Vec<u8>>, key: &str, value: &str) -> Result<(), ExportError> {
    let mut elem = BytesStart::new("metadata");
    elem.push_attribute(("key", key));
    writer.write_event(Event::Start(elem)).map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesStart::new("metadata").to_end()))
        .map_err(xml_err)
}

fn xml_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Xml(e.to_string())
}

/// Serialize a trajectory with [`trajectory_to_sensor_xml`] and write it
/// to `path`.
pub fn write_sensor_xml(trajectory: &Trajectory, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let xml = trajectory_to_sensor_xml(trajectory)?;
    std::fs::write(path, xml)?;
    Ok(())
}
